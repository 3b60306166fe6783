use crate::env::SystemOS;
use std::env;
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use tracing::trace;

/// Return an absolute path to the provided program (without extension)
/// by checking `PATH` and cycling through script and executable extensions.
#[cfg(windows)]
pub fn find_command_on_path<T: AsRef<OsStr>>(name: T) -> Option<PathBuf> {
    let system_path = env::var_os("PATH")?;
    let name = name.as_ref();
    let has_ext = Path::new(name).extension().is_some();

    for path_dir in env::split_paths(&system_path) {
        if has_ext {
            let path = path_dir.join(name);

            if path.exists() {
                return Some(path);
            }

            continue;
        }

        // npm and yarn ship as .cmd scripts on Windows
        for ext in [".exe", ".cmd", ".ps1", ".bat"] {
            let mut file_name = name.to_os_string();
            file_name.push(ext);

            let path = path_dir.join(file_name);

            if path.exists() {
                return Some(path);
            }
        }
    }

    None
}

/// Return an absolute path to the provided command by checking `PATH`.
#[cfg(not(windows))]
pub fn find_command_on_path<T: AsRef<OsStr>>(name: T) -> Option<PathBuf> {
    let system_path = env::var_os("PATH")?;
    let name = name.as_ref();

    env::split_paths(&system_path)
        .map(|dir| dir.join(name))
        .find(|path| path.exists())
}

/// Create a new process [`Command`] for the provided arguments, where the first
/// argument is the binary. If the binary is not an absolute path, we'll attempt
/// to find it on `PATH` using [`find_command_on_path`].
///
/// If the binary resolves to a Windows script (`.ps1`, `.cmd`, `.bat`), it's wrapped
/// in a PowerShell command and passed via `-Command`.
pub fn create_process_command<I: IntoIterator<Item = A>, A: AsRef<str>>(
    args: I,
) -> Option<Command> {
    let mut args = args
        .into_iter()
        .map(|arg| arg.as_ref().to_owned())
        .collect::<Vec<_>>();

    if args.is_empty() {
        return None;
    }

    let bin = args.remove(0);
    let bin_path = if bin.contains('/') || bin.contains('\\') {
        PathBuf::from(&bin)
    } else {
        find_command_on_path(&bin).unwrap_or_else(|| bin.clone().into())
    };

    let bin_ext = bin_path
        .extension()
        .map(|ext| ext.to_string_lossy().to_lowercase());

    let command = match bin_ext.as_deref() {
        Some("ps1" | "cmd" | "bat") => {
            let mut cmd =
                Command::new(find_command_on_path("pwsh").unwrap_or_else(|| "powershell".into()));
            cmd.arg("-Command");
            cmd.arg(format!("{} {}", bin_path.display(), shell_words::join(args)).trim());
            cmd
        }
        _ => {
            let mut cmd = Command::new(bin_path);
            cmd.args(args);
            cmd
        }
    };

    Some(command)
}

/// Run the provided command and return its trimmed standard output. Returns `None`
/// if the command could not be spawned, exited unsuccessfully, or printed nothing.
pub fn capture_command_stdout<I: IntoIterator<Item = A>, A: AsRef<str>>(
    args: I,
) -> Option<String> {
    let mut command = create_process_command(args)?;
    command.stdin(Stdio::null()).stderr(Stdio::null());

    trace!(command = ?command, "Capturing command output");

    let output = match command.output() {
        Ok(output) => output,
        Err(error) => {
            trace!("Failed to spawn command: {error}");

            return None;
        }
    };

    if !output.status.success() {
        trace!(code = ?output.status.code(), "Command exited unsuccessfully");

        return None;
    }

    let stdout = String::from_utf8_lossy(&output.stdout).trim().to_owned();

    if stdout.is_empty() {
        None
    } else {
        Some(stdout)
    }
}

/// Normalize a directory so that it can be compared against `PATH` entries:
/// backslashes become forward slashes, a leading drive letter is stripped
/// (case-insensitively), and trailing separators are removed. On Windows
/// the result is also lowercased.
pub fn normalize_path_entry(value: &str, os: SystemOS) -> String {
    let mut value = value.trim().replace('\\', "/");
    let bytes = value.as_bytes();

    if bytes.len() >= 2 && bytes[0].is_ascii_alphabetic() && bytes[1] == b':' {
        value = value[2..].to_owned();
    }

    while value.len() > 1 && value.ends_with('/') {
        value.pop();
    }

    if os.is_windows() {
        value.to_lowercase()
    } else {
        value
    }
}

/// Return true if the directory is listed in the provided `PATH` value,
/// after normalizing both sides with [`normalize_path_entry`].
pub fn is_dir_on_path(dir: &Path, path_var: &str, os: SystemOS) -> bool {
    let needle = normalize_path_entry(&dir.to_string_lossy(), os);

    path_var
        .split(os.path_list_separator())
        .filter(|entry| !entry.trim().is_empty())
        .any(|entry| normalize_path_entry(entry, os) == needle)
}
