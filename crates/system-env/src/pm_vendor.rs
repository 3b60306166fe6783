macro_rules! string_vec {
    ($($item:expr),+ $(,)?) => {{
        vec![
            $( String::from($item), )*
        ]
    }};
}

#[derive(Clone, Debug)]
pub struct PackageManagerConfig {
    /// Command that prints the directory global package binaries are linked into.
    pub global_bin_command: Vec<String>,
    /// Substring in an executable path that identifies this manager's install tree.
    pub invocation_marker: String,
    /// Sub-commands that update an installed package.
    pub update_args: Vec<String>,
}

pub fn npm() -> PackageManagerConfig {
    PackageManagerConfig {
        global_bin_command: string_vec!["npm", "bin", "-g"],
        invocation_marker: "npm".into(),
        update_args: string_vec!["up", "update", "upgrade"],
    }
}

pub fn yarn() -> PackageManagerConfig {
    PackageManagerConfig {
        global_bin_command: string_vec!["yarn", "global", "bin"],
        invocation_marker: "yarn".into(),
        update_args: string_vec!["upgrade"],
    }
}
