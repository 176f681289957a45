// src/constants.rs

//! Shared constants and driver-facing text tables.

/// Commands understood by the interactive driver.
///
/// Each tuple contains a (syntax, description) pair; the driver prints
/// this table in response to `help`.
pub const DRIVER_COMMANDS: &[(&str, &str)] = &[
    ("new", "create a new process"),
    ("fork", "fork the running process"),
    ("exit", "terminate the running process (cascading)"),
    ("wait", "running process waits for a child"),
    ("timer", "deliver a timer interrupt"),
    ("read <disk> <file>", "running process reads a file from a disk"),
    ("done <disk>", "disk reports its current job finished"),
    ("access <addr>", "running process touches a memory address"),
    ("cpu", "show the PID using the CPU"),
    ("ready", "show the ready queue"),
    ("mem", "show occupied frames"),
    ("disk <disk>", "show the request a disk is serving"),
    ("queue <disk>", "show a disk's waiting queue"),
    ("help", "show this table"),
    ("quit", "leave the driver"),
];

/// Banner printed when the driver starts.
pub const DRIVER_BANNER: &[&str] = &[
    "simos interactive driver",
    "one event or query per line; `help` lists commands",
];
