// src/lib.rs

//! sim_os - a single-machine operating-system simulator.
//!
//! The simulator is driven by discrete, externally supplied events
//! (new process, fork, exit, wait, timer interrupt, disk read, disk
//! completion, memory access) and exposes pure queries so a driver
//! can observe the machine after every event. It models a CPU with a
//! FIFO ready queue, per-disk I/O queues, and demand-paged memory
//! with global LRU replacement.
//!
//! Nothing here is concurrent or real: one event mutates the machine
//! at a time, "blocking" a process just means taking it off the CPU
//! slot, and timers only tick when the driver says so.
//!
//! ```
//! use sim_os::{NO_PROCESS, ProcessId, SimOs};
//!
//! let mut sim = SimOs::new(3, 1000, 10).expect("valid geometry");
//! assert_eq!(sim.get_cpu(), NO_PROCESS);
//!
//! sim.new_process();
//! assert_eq!(sim.get_cpu(), ProcessId::new(1));
//! ```

pub mod constants;
pub mod errors;
pub mod kernel;

pub use errors::{SimError, SimResult};
pub use kernel::disk::FileReadRequest;
pub use kernel::mm::MemoryItem;
pub use kernel::process::{NO_PROCESS, ProcessId, ProcessState};
pub use kernel::simulator::SimOs;
