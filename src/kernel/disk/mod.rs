// src/kernel/disk/mod.rs

//! Simulated disk controllers.
//!
//! Each disk serves one request at a time and parks the rest in a
//! FIFO queue. An idle disk holds the default request `(0, "")`.

use std::collections::VecDeque;

use crate::kernel::process::{NO_PROCESS, ProcessId};

/// One read request: the issuing process and the file it asked for
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileReadRequest {
    pub pid: ProcessId,
    pub file_name: String,
}

impl FileReadRequest {
    #[must_use]
    pub fn new(pid: ProcessId, file_name: &str) -> Self {
        Self {
            pid,
            file_name: file_name.to_string(),
        }
    }
}

/// One disk: an in-service slot plus a waiting queue
#[derive(Debug, Clone, Default)]
pub struct DiskController {
    in_service: FileReadRequest,
    waiting: VecDeque<FileReadRequest>,
}

impl DiskController {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the disk is serving nothing
    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.in_service.pid == NO_PROCESS
    }

    /// Request currently being served (default if idle)
    #[must_use]
    pub const fn in_service(&self) -> &FileReadRequest {
        &self.in_service
    }

    /// Waiting requests, front = next to be served
    #[must_use]
    pub const fn waiting(&self) -> &VecDeque<FileReadRequest> {
        &self.waiting
    }

    /// Start serving the request right away if idle, otherwise queue it
    pub fn enqueue(&mut self, request: FileReadRequest) {
        if self.is_idle() {
            log::trace!("disk: serving {} for {}", request.file_name, request.pid);
            self.in_service = request;
        } else {
            log::trace!("disk: queued {} for {}", request.file_name, request.pid);
            self.waiting.push_back(request);
        }
    }

    /// Finish the in-service request and promote the next waiter.
    ///
    /// Returns the PID whose request just finished, or `None` if the
    /// disk was idle.
    pub fn complete(&mut self) -> Option<ProcessId> {
        if self.is_idle() {
            return None;
        }
        let served = self.in_service.pid;
        self.in_service = self.waiting.pop_front().unwrap_or_default();
        Some(served)
    }

    /// Purge every request a process has on this disk. If the purged
    /// process was being served, the next waiter is promoted.
    pub fn remove_pid(&mut self, pid: ProcessId) {
        self.waiting.retain(|r| r.pid != pid);
        if self.in_service.pid == pid {
            self.in_service = self.waiting.pop_front().unwrap_or_default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kernel::process::ProcessId;

    fn req(pid: u64, name: &str) -> FileReadRequest {
        FileReadRequest::new(ProcessId::new(pid), name)
    }

    #[test]
    fn idle_disk_serves_immediately() {
        let mut disk = DiskController::new();
        assert!(disk.is_idle());

        disk.enqueue(req(1, "a.txt"));
        assert_eq!(disk.in_service(), &req(1, "a.txt"));
        assert!(disk.waiting().is_empty());
    }

    #[test]
    fn busy_disk_queues_in_fifo_order() {
        let mut disk = DiskController::new();
        disk.enqueue(req(1, "a.txt"));
        disk.enqueue(req(2, "b.txt"));
        disk.enqueue(req(3, "c.txt"));

        assert_eq!(disk.waiting().front(), Some(&req(2, "b.txt")));

        assert_eq!(disk.complete(), Some(ProcessId::new(1)));
        assert_eq!(disk.in_service(), &req(2, "b.txt"));
        assert_eq!(disk.complete(), Some(ProcessId::new(2)));
        assert_eq!(disk.complete(), Some(ProcessId::new(3)));

        assert!(disk.is_idle());
        assert_eq!(disk.complete(), None);
        assert_eq!(disk.in_service(), &FileReadRequest::default());
    }

    #[test]
    fn remove_pid_promotes_next_waiter() {
        let mut disk = DiskController::new();
        disk.enqueue(req(1, "a.txt"));
        disk.enqueue(req(2, "b.txt"));
        disk.enqueue(req(1, "c.txt"));
        disk.enqueue(req(3, "d.txt"));

        disk.remove_pid(ProcessId::new(1));
        assert_eq!(disk.in_service(), &req(2, "b.txt"));
        assert_eq!(
            disk.waiting().iter().cloned().collect::<Vec<_>>(),
            [req(3, "d.txt")]
        );
    }
}
