//! CPU scheduler: one running slot plus a strict FIFO ready queue.
//!
//! The scheduler stores only PIDs; process records stay in the
//! process table and state changes are applied by the façade from the
//! values these operations report.

use std::collections::VecDeque;

use crate::kernel::process::{ProcessId, ProcessState};

/// Round-robin CPU scheduler
#[derive(Debug, Default)]
pub struct CpuScheduler {
    running: Option<ProcessId>,
    ready: VecDeque<ProcessId>,
}

impl CpuScheduler {
    /// Create a new scheduler with an idle CPU
    #[must_use]
    pub const fn new() -> Self {
        Self {
            running: None,
            ready: VecDeque::new(),
        }
    }

    /// PID currently using the CPU, if any
    #[must_use]
    pub const fn running(&self) -> Option<ProcessId> {
        self.running
    }

    /// The ready queue, front = next to run
    #[must_use]
    pub const fn ready(&self) -> &VecDeque<ProcessId> {
        &self.ready
    }

    /// Whether the CPU slot holds a process
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.running.is_some()
    }

    /// Admit a process: it starts running if the CPU is idle,
    /// otherwise it joins the tail of the ready queue.
    ///
    /// Returns the state the process ends up in.
    pub fn admit(&mut self, pid: ProcessId) -> ProcessState {
        if self.running.is_none() {
            self.running = Some(pid);
            log::trace!("scheduler: {pid} running");
            ProcessState::Running
        } else {
            self.ready.push_back(pid);
            log::trace!("scheduler: {pid} queued");
            ProcessState::Ready
        }
    }

    /// Pop the ready-queue head onto the CPU. The slot stays empty if
    /// the queue is empty.
    pub fn run_next(&mut self) -> Option<ProcessId> {
        self.running = self.ready.pop_front();
        self.running
    }

    /// Move the running process to the ready-queue tail and pop the
    /// head onto the CPU. With an empty queue the same process is
    /// popped right back.
    pub fn preempt(&mut self) -> Option<ProcessId> {
        if let Some(pid) = self.running.take() {
            self.ready.push_back(pid);
        }
        self.run_next()
    }

    /// Empty the CPU slot without re-queuing its occupant
    pub fn clear_running(&mut self) -> Option<ProcessId> {
        self.running.take()
    }

    /// Drop a PID from the ready queue if present
    pub fn remove(&mut self, pid: ProcessId) {
        self.ready.retain(|&p| p != pid);
    }
}
