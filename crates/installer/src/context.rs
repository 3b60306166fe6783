use regex::Regex;
use system_env::{NodePackageManager, ProcessChain, ProcessTable};
use tracing::{debug, trace};

/// Build the command line signature of a package manager updating the package,
/// for example `npm update -g devspace` or `yarn global upgrade devspace`.
fn create_update_signature(package_name: &str) -> Option<Regex> {
    let mut managers = vec![];
    let mut update_args = vec![];

    for manager in NodePackageManager::all() {
        let config = manager.get_config();

        managers.push(regex::escape(&config.invocation_marker));

        for arg in config.update_args {
            if !update_args.contains(&arg) {
                update_args.push(arg);
            }
        }
    }

    let update_args = update_args
        .iter()
        .map(|arg| regex::escape(arg))
        .collect::<Vec<_>>();

    Regex::new(&format!(
        r"(?i)\b({})\b.*\s({})\s(.*\s)?{}(\s|$)",
        managers.join("|"),
        update_args.join("|"),
        regex::escape(package_name),
    ))
    .ok()
}

/// Return true if the process chain shows that a package manager is updating
/// the package, in which case nobody is around to answer prompts. Only the
/// grandparent is inspected: the package manager runs lifecycle scripts
/// through a shell, which in turn runs the installer.
pub fn is_automated_update(chain: &ProcessChain, package_name: &str) -> bool {
    if chain.ancestors.len() != 2 {
        trace!(
            ancestors = chain.ancestors.len(),
            "Incomplete process ancestry, assuming an interactive invocation"
        );

        return false;
    }

    let Some(grandparent) = chain.grandparent() else {
        return false;
    };

    let Some(signature) = create_update_signature(package_name) else {
        return false;
    };

    signature.is_match(&grandparent.command_line)
}

/// Walk the current process ancestry and classify the invocation.
pub fn detect_automated_update(table: &dyn ProcessTable, package_name: &str) -> bool {
    let chain = ProcessChain::for_current_process(table);
    let automated = is_automated_update(&chain, package_name);

    debug!(automated, "Classified invocation context");

    automated
}
