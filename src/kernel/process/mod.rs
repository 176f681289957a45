// src/kernel/process/mod.rs

//! Process records and the process table.
//!
//! The table is the authoritative registry of every process ever
//! created. Records are never removed; a terminated process simply
//! owns no resources. Relationships are stored as PIDs and resolved
//! through the table, never as references between records.

use core::fmt;

/// Process ID type
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ProcessId(u64);

/// Sentinel PID meaning "no process" (also "no parent").
pub const NO_PROCESS: ProcessId = ProcessId(0);

impl ProcessId {
    /// Create a new process ID
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Get the raw ID value
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ProcessId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Process state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProcessState {
    /// Created but not yet admitted to the scheduler
    New,
    /// In the ready queue
    Ready,
    /// Using the CPU
    Running,
    /// Blocked waiting for a child to terminate
    Waiting,
    /// Blocked on a disk request
    BlockedIo,
    /// Terminated but not yet reaped by its parent
    Zombie,
    /// Terminated and fully reaped
    Terminated,
}

impl ProcessState {
    /// Whether a process in this state can still own frames or sit in
    /// a queue.
    #[must_use]
    pub const fn is_live(self) -> bool {
        !matches!(self, ProcessState::Zombie | ProcessState::Terminated)
    }
}

/// One process record
#[derive(Debug, Clone)]
pub struct Process {
    pid: ProcessId,
    state: ProcessState,
    parent: Option<ProcessId>,
    /// Children in fork order.
    children: Vec<ProcessId>,
}

impl Process {
    #[must_use]
    pub fn new(pid: ProcessId, parent: Option<ProcessId>) -> Self {
        Self {
            pid,
            state: ProcessState::New,
            parent,
            children: Vec::new(),
        }
    }

    /// Get process ID
    #[must_use]
    pub const fn pid(&self) -> ProcessId {
        self.pid
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> ProcessState {
        self.state
    }

    /// Set process state
    pub const fn set_state(&mut self, state: ProcessState) {
        self.state = state;
    }

    /// Get parent PID
    #[must_use]
    pub const fn parent(&self) -> Option<ProcessId> {
        self.parent
    }

    /// Children in fork order
    #[must_use]
    pub fn children(&self) -> &[ProcessId] {
        &self.children
    }

    pub fn add_child(&mut self, child: ProcessId) {
        self.children.push(child);
    }

    pub fn remove_child(&mut self, child: ProcessId) {
        self.children.retain(|&c| c != child);
    }

    #[must_use]
    pub fn has_children(&self) -> bool {
        !self.children.is_empty()
    }
}

/// Process table - registry of all processes in the system
///
/// PIDs are handed out sequentially starting at 1 and never reused,
/// so a record lives at index `pid - 1` for the whole run.
pub struct ProcessTable {
    processes: Vec<Process>,
    next_pid: u64,
}

impl ProcessTable {
    /// Create a new empty process table
    #[must_use]
    pub const fn new() -> Self {
        Self {
            processes: Vec::new(),
            next_pid: 1, // PID 0 is the NO_PROCESS sentinel
        }
    }

    /// Allocate the next PID and insert a fresh record for it
    pub fn allocate(&mut self, parent: Option<ProcessId>) -> ProcessId {
        let pid = ProcessId::new(self.next_pid);
        self.next_pid += 1;
        self.processes.push(Process::new(pid, parent));
        log::debug!("process {pid} created (parent {parent:?})");
        pid
    }

    /// Get a process by ID
    #[must_use]
    pub fn get(&self, pid: ProcessId) -> Option<&Process> {
        let index = pid.as_u64().checked_sub(1)?;
        self.processes.get(index as usize)
    }

    /// Get a mutable process by ID
    pub fn get_mut(&mut self, pid: ProcessId) -> Option<&mut Process> {
        let index = pid.as_u64().checked_sub(1)?;
        self.processes.get_mut(index as usize)
    }

    /// Number of records ever created
    #[must_use]
    pub fn len(&self) -> usize {
        self.processes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.processes.is_empty()
    }

    /// State of a process, `Terminated` for unknown PIDs.
    #[must_use]
    pub fn state_of(&self, pid: ProcessId) -> ProcessState {
        self.get(pid)
            .map_or(ProcessState::Terminated, Process::state)
    }

    /// All descendants of `pid` in post-order (deepest first, `pid`
    /// itself excluded). The walk follows the children lists, so a
    /// child is always visited before the parent that forked it.
    #[must_use]
    pub fn descendants(&self, pid: ProcessId) -> Vec<ProcessId> {
        let mut out = Vec::new();
        if let Some(p) = self.get(pid) {
            for &child in p.children() {
                self.collect_subtree(child, &mut out);
            }
        }
        out
    }

    fn collect_subtree(&self, pid: ProcessId, out: &mut Vec<ProcessId>) {
        if let Some(p) = self.get(pid) {
            for &child in p.children() {
                self.collect_subtree(child, out);
            }
        }
        out.push(pid);
    }

    /// Earliest (fork-order) child of `pid` in the given state
    #[must_use]
    pub fn find_child_in_state(&self, pid: ProcessId, state: ProcessState) -> Option<ProcessId> {
        self.get(pid)?
            .children()
            .iter()
            .copied()
            .find(|&c| self.state_of(c) == state)
    }
}

impl Default for ProcessTable {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pids_are_sequential_from_one() {
        let mut table = ProcessTable::new();
        assert_eq!(table.allocate(None), ProcessId::new(1));
        assert_eq!(table.allocate(None), ProcessId::new(2));
        assert_eq!(table.allocate(Some(ProcessId::new(1))), ProcessId::new(3));
        assert_eq!(table.len(), 3);
    }

    #[test]
    fn lookup_by_pid() {
        let mut table = ProcessTable::new();
        let a = table.allocate(None);
        let b = table.allocate(Some(a));

        assert_eq!(table.get(a).map(Process::pid), Some(a));
        assert_eq!(table.get(b).and_then(Process::parent), Some(a));
        assert!(table.get(NO_PROCESS).is_none());
        assert!(table.get(ProcessId::new(99)).is_none());
    }

    #[test]
    fn descendants_are_post_order() {
        // 1 forks 2 and 4; 2 forks 3.
        let mut table = ProcessTable::new();
        let p1 = table.allocate(None);
        let p2 = table.allocate(Some(p1));
        table.get_mut(p1).unwrap().add_child(p2);
        let p3 = table.allocate(Some(p2));
        table.get_mut(p2).unwrap().add_child(p3);
        let p4 = table.allocate(Some(p1));
        table.get_mut(p1).unwrap().add_child(p4);

        assert_eq!(table.descendants(p1), vec![p3, p2, p4]);
        assert_eq!(table.descendants(p2), vec![p3]);
        assert!(table.descendants(p4).is_empty());
    }

    #[test]
    fn find_child_in_state_prefers_fork_order() {
        let mut table = ProcessTable::new();
        let p1 = table.allocate(None);
        let p2 = table.allocate(Some(p1));
        table.get_mut(p1).unwrap().add_child(p2);
        let p3 = table.allocate(Some(p1));
        table.get_mut(p1).unwrap().add_child(p3);

        table.get_mut(p2).unwrap().set_state(ProcessState::Zombie);
        table.get_mut(p3).unwrap().set_state(ProcessState::Zombie);

        assert_eq!(
            table.find_child_in_state(p1, ProcessState::Zombie),
            Some(p2)
        );
    }
}
