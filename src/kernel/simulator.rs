// src/kernel/simulator.rs

//! The simulator façade.
//!
//! `SimOs` receives the externally supplied events, checks their
//! preconditions, and orchestrates the process table, scheduler, disks
//! and memory so that every cross-component invariant holds again
//! before the handler returns. Queries read through without mutating.
//!
//! Event handlers validate before they touch anything: an `Err` return
//! means the simulator is exactly as it was.

use crate::errors::{SimError, SimResult};
use crate::kernel::disk::{DiskController, FileReadRequest};
use crate::kernel::mm::{MemoryItem, MemoryManager};
use crate::kernel::process::{NO_PROCESS, Process, ProcessId, ProcessState, ProcessTable};
use crate::kernel::scheduler::CpuScheduler;

/// The simulated machine
pub struct SimOs {
    processes: ProcessTable,
    cpu: CpuScheduler,
    disks: Vec<DiskController>,
    ram: MemoryManager,
}

impl SimOs {
    /// Build a machine with `num_disks` disks and a frame table of
    /// `ram_bytes / page_size` frames. Disk, frame and page
    /// enumerations all start from 0.
    ///
    /// # Errors
    /// `SimError::NoFrames` when `page_size` is zero or larger than
    /// `ram_bytes` (the frame table would be empty).
    pub fn new(num_disks: usize, ram_bytes: u64, page_size: u64) -> SimResult<Self> {
        if page_size == 0 || ram_bytes / page_size == 0 {
            return Err(SimError::NoFrames);
        }
        Ok(Self {
            processes: ProcessTable::new(),
            cpu: CpuScheduler::new(),
            disks: vec![DiskController::new(); num_disks],
            ram: MemoryManager::new(ram_bytes, page_size),
        })
    }

    //----------------------------------------------------------------
    // Events
    //----------------------------------------------------------------

    /// Create a process. It starts running if the CPU is idle,
    /// otherwise it joins the ready-queue tail. PIDs count up from 1
    /// and are never reused.
    pub fn new_process(&mut self) {
        let pid = self.processes.allocate(None);
        self.dispatch(pid);
    }

    /// The running process forks a child; the child lands at the
    /// ready-queue tail and the parent keeps the CPU.
    ///
    /// # Errors
    /// `SimError::NoRunningProcess` when the CPU is idle.
    pub fn sim_fork(&mut self) -> SimResult<()> {
        let parent = self.running_pid()?;
        let child = self.processes.allocate(Some(parent));
        if let Some(p) = self.processes.get_mut(parent) {
            p.add_child(child);
        }
        self.dispatch(child);
        log::debug!("fork: {parent} -> {child}");
        Ok(())
    }

    /// The running process terminates, taking every descendant with
    /// it. Its memory is released immediately. A parent already in
    /// `sim_wait` reaps it on the spot and becomes runnable again;
    /// otherwise the process lingers as a zombie for a later wait.
    ///
    /// # Errors
    /// `SimError::NoRunningProcess` when the CPU is idle.
    pub fn sim_exit(&mut self) -> SimResult<()> {
        let pid = self.running_pid()?;

        // Cascading termination, deepest descendants first.
        for descendant in self.processes.descendants(pid) {
            self.terminate(descendant);
        }

        self.ram.free_by_pid(pid);
        self.cpu.clear_running();

        let parent = self.processes.get(pid).and_then(Process::parent);
        match parent {
            None => {
                self.set_state(pid, ProcessState::Terminated);
            }
            Some(q) if self.processes.state_of(q) == ProcessState::Waiting => {
                // Parent is blocked in sim_wait: reap immediately.
                self.set_state(pid, ProcessState::Terminated);
                if let Some(record) = self.processes.get_mut(q) {
                    record.remove_child(pid);
                }
                self.dispatch(q);
                log::debug!("exit: {pid} reaped by waiting parent {q}");
            }
            Some(q) => {
                self.set_state(pid, ProcessState::Zombie);
                log::debug!("exit: {pid} is now a zombie child of {q}");
            }
        }

        if !self.cpu.is_busy() {
            self.run_next();
        }
        Ok(())
    }

    /// The running process waits for a child to terminate.
    ///
    /// With a zombie child the wait is over at once: the zombie is
    /// reaped (earliest fork first) and the caller keeps the CPU;
    /// other zombies stay for future waits. With only live children
    /// the process leaves the CPU until one of them exits. With no
    /// children at all this is a no-op.
    ///
    /// # Errors
    /// `SimError::NoRunningProcess` when the CPU is idle.
    pub fn sim_wait(&mut self) -> SimResult<()> {
        let pid = self.running_pid()?;

        if let Some(zombie) = self.processes.find_child_in_state(pid, ProcessState::Zombie) {
            self.set_state(zombie, ProcessState::Terminated);
            if let Some(record) = self.processes.get_mut(pid) {
                record.remove_child(zombie);
            }
            log::debug!("wait: {pid} reaped zombie {zombie}");
        } else if self.processes.get(pid).is_some_and(Process::has_children) {
            self.set_state(pid, ProcessState::Waiting);
            self.cpu.clear_running();
            self.run_next();
            log::debug!("wait: {pid} blocked on its children");
        }
        Ok(())
    }

    /// The running process's time slice is over: it goes to the
    /// ready-queue tail and the queue head takes the CPU. With an
    /// empty queue the same process resumes immediately.
    ///
    /// # Errors
    /// `SimError::NoRunningProcess` when the CPU is idle.
    pub fn timer_interrupt(&mut self) -> SimResult<()> {
        let previous = self.running_pid()?;
        self.set_state(previous, ProcessState::Ready);
        if let Some(next) = self.cpu.preempt() {
            self.set_state(next, ProcessState::Running);
            log::debug!("timer: {previous} -> {next}");
        }
        Ok(())
    }

    /// The running process asks disk `disk` for `file_name` and stops
    /// using the CPU immediately, even if the ready queue is empty.
    ///
    /// # Errors
    /// `SimError::BadDisk` for an unknown disk number (checked first),
    /// `SimError::NoRunningProcess` when the CPU is idle.
    pub fn disk_read_request(&mut self, disk: usize, file_name: &str) -> SimResult<()> {
        self.check_disk(disk)?;
        let pid = self.running_pid()?;

        self.disks[disk].enqueue(FileReadRequest::new(pid, file_name));
        self.set_state(pid, ProcessState::BlockedIo);
        self.cpu.clear_running();
        self.run_next();
        log::debug!("disk {disk}: {pid} blocked reading {file_name}");
        Ok(())
    }

    /// Disk `disk` reports its current job finished; the served
    /// process returns to the scheduler and the next waiter (if any)
    /// is put in service. Completions arrive from outside, so an idle
    /// CPU is fine here; a completion on an idle disk is ignored.
    ///
    /// # Errors
    /// `SimError::BadDisk` for an unknown disk number.
    pub fn disk_job_completed(&mut self, disk: usize) -> SimResult<()> {
        self.check_disk(disk)?;
        if let Some(pid) = self.disks[disk].complete() {
            self.dispatch(pid);
            log::debug!("disk {disk}: job for {pid} completed");
        }
        Ok(())
    }

    /// The running process touches a logical address; the page it
    /// falls in is brought into a frame (or refreshed) under global
    /// LRU replacement.
    ///
    /// # Errors
    /// `SimError::NoRunningProcess` when the CPU is idle.
    pub fn access_memory_address(&mut self, address: u64) -> SimResult<()> {
        let pid = self.running_pid()?;
        let page = self.ram.page_number(address);
        self.ram.access(pid, page);
        Ok(())
    }

    //----------------------------------------------------------------
    // Queries
    //----------------------------------------------------------------

    /// PID using the CPU, `NO_PROCESS` if idle
    #[must_use]
    pub fn get_cpu(&self) -> ProcessId {
        self.cpu.running().unwrap_or(NO_PROCESS)
    }

    /// Ready-queue PIDs, front = next to run
    #[must_use]
    pub fn get_ready_queue(&self) -> Vec<ProcessId> {
        self.cpu.ready().iter().copied().collect()
    }

    /// Occupied frames in ascending frame-index order. Zombie and
    /// terminated processes hold no memory, so they never show up.
    #[must_use]
    pub fn get_memory(&self) -> Vec<MemoryItem> {
        self.ram.usage()
    }

    /// Request disk `disk` is serving, default `(0, "")` if idle
    ///
    /// # Errors
    /// `SimError::BadDisk` for an unknown disk number.
    pub fn get_disk(&self, disk: usize) -> SimResult<FileReadRequest> {
        self.check_disk(disk)?;
        Ok(self.disks[disk].in_service().clone())
    }

    /// Waiting queue of disk `disk`, front = next to be served; the
    /// in-service request is not part of it
    ///
    /// # Errors
    /// `SimError::BadDisk` for an unknown disk number.
    pub fn get_disk_queue(&self, disk: usize) -> SimResult<Vec<FileReadRequest>> {
        self.check_disk(disk)?;
        Ok(self.disks[disk].waiting().iter().cloned().collect())
    }

    /// State a process is in, `Terminated` for unknown PIDs
    #[must_use]
    pub fn process_state(&self, pid: ProcessId) -> ProcessState {
        self.processes.state_of(pid)
    }

    //----------------------------------------------------------------
    // Internals
    //----------------------------------------------------------------

    fn running_pid(&self) -> SimResult<ProcessId> {
        self.cpu.running().ok_or(SimError::NoRunningProcess)
    }

    fn check_disk(&self, disk: usize) -> SimResult<()> {
        if disk < self.disks.len() {
            Ok(())
        } else {
            Err(SimError::BadDisk)
        }
    }

    /// Hand a PID to the scheduler and record the state it lands in
    fn dispatch(&mut self, pid: ProcessId) {
        let state = self.cpu.admit(pid);
        self.set_state(pid, state);
    }

    /// Pop the ready-queue head onto the CPU, if there is one
    fn run_next(&mut self) {
        if let Some(next) = self.cpu.run_next() {
            self.set_state(next, ProcessState::Running);
        }
    }

    fn set_state(&mut self, pid: ProcessId, state: ProcessState) {
        if let Some(record) = self.processes.get_mut(pid) {
            record.set_state(state);
        }
    }

    /// Kill one descendant during cascading termination: its frames
    /// are released and it is purged from the ready queue and from
    /// every disk. The waiting set needs no purge; `Terminated`
    /// replaces `Waiting` in the record itself.
    fn terminate(&mut self, pid: ProcessId) {
        self.set_state(pid, ProcessState::Terminated);
        self.ram.free_by_pid(pid);
        self.cpu.remove(pid);
        for disk in &mut self.disks {
            disk.remove_pid(pid);
        }
        log::debug!("cascade: {pid} terminated");
    }
}
