// src/errors/unified.rs

//! Unified error types for the simulator.
//!
//! Every failure is reported synchronously at the façade boundary; an
//! operation that returns an error has not mutated any state.

use core::fmt;

/// Result type alias for simulator operations
pub type SimResult<T> = Result<T, SimError>;

/// Top-level simulator error type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SimError {
    /// An event that requires a running process arrived while the CPU
    /// slot was empty
    NoRunningProcess,
    /// A disk number outside `0..num_disks` was used
    BadDisk,
    /// The RAM size and page size given at construction yield zero
    /// frames
    NoFrames,
}

impl SimError {
    pub const fn as_str(&self) -> &'static str {
        match self {
            SimError::NoRunningProcess => "this instruction requires a running process",
            SimError::BadDisk => "the disk with the requested number does not exist",
            SimError::NoFrames => "RAM size and page size yield no usable frames",
        }
    }
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for SimError {}
