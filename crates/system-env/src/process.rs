use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System, UpdateKind};
use tracing::trace;

/// A single entry from the operating system's process table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProcessDescriptor {
    pub pid: u32,
    pub parent_pid: Option<u32>,
    pub command_line: String,
}

/// Lookup of processes by ID. Lookups are best-effort: any failure is
/// reported as `None` and never as an error.
pub trait ProcessTable {
    fn lookup(&self, pid: u32) -> Option<ProcessDescriptor>;
}

/// Process table backed by the host operating system.
#[derive(Debug, Default)]
pub struct SystemProcessTable;

impl ProcessTable for SystemProcessTable {
    fn lookup(&self, pid: u32) -> Option<ProcessDescriptor> {
        let pid = Pid::from_u32(pid);
        let mut system = System::new();

        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            false,
            ProcessRefreshKind::nothing().with_cmd(UpdateKind::Always),
        );

        let process = system.process(pid)?;
        let command_line = process
            .cmd()
            .iter()
            .map(|arg| arg.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");

        Some(ProcessDescriptor {
            pid: pid.as_u32(),
            parent_pid: process.parent().map(|parent| parent.as_u32()),
            command_line,
        })
    }
}

/// Ordered ancestors of a process, closest first (parent, then grandparent).
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ProcessChain {
    pub ancestors: Vec<ProcessDescriptor>,
}

impl ProcessChain {
    /// Walk up to `depth` ancestors of the process with the provided ID.
    /// The walk stops at the first failed lookup, so the chain may be
    /// shorter than requested, or empty.
    pub fn collect(table: &dyn ProcessTable, pid: u32, depth: usize) -> Self {
        let mut ancestors = vec![];
        let mut next = table.lookup(pid).and_then(|process| process.parent_pid);

        while let Some(parent_pid) = next {
            if ancestors.len() >= depth {
                break;
            }

            let Some(parent) = table.lookup(parent_pid) else {
                trace!(pid = parent_pid, "Unable to inspect ancestor process");
                break;
            };

            next = parent.parent_pid;
            ancestors.push(parent);
        }

        trace!(
            pid,
            ancestors = ?ancestors.iter().map(|p| p.pid).collect::<Vec<_>>(),
            "Collected process ancestry"
        );

        ProcessChain { ancestors }
    }

    /// Collect the parent and grandparent of the current process.
    pub fn for_current_process(table: &dyn ProcessTable) -> Self {
        Self::collect(table, std::process::id(), 2)
    }

    pub fn grandparent(&self) -> Option<&ProcessDescriptor> {
        self.ancestors.get(1)
    }
}
