// src/main.rs

//! Interactive driver for the simulator.
//!
//! Reads one event or query per line from stdin, applies it to the
//! global machine, and prints what a test harness would inspect.
//! Errors from the simulator are reported and the session continues;
//! the machine state is untouched by a failed event.

use std::env;
use std::io::{self, BufRead, Write};

use lazy_static::lazy_static;
use log::{LevelFilter, Metadata, Record};
use spin::Mutex;

use sim_os::constants::{DRIVER_BANNER, DRIVER_COMMANDS};
use sim_os::{FileReadRequest, NO_PROCESS, SimOs};

lazy_static! {
    /// The one simulated machine this driver talks to.
    static ref SIM: Mutex<Option<SimOs>> = Mutex::new(None);
}

/// Minimal stderr backend for the `log` facade, controlled by the
/// `SIMOS_LOG` environment variable (error..trace, default off).
struct StderrLogger;

static LOGGER: StderrLogger = StderrLogger;

impl log::Log for StderrLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if self.enabled(record.metadata()) {
            eprintln!("[{}] {}", record.level(), record.args());
        }
    }

    fn flush(&self) {}
}

fn init_logging() {
    let level = match env::var("SIMOS_LOG").ok().as_deref() {
        Some("error") => LevelFilter::Error,
        Some("warn") => LevelFilter::Warn,
        Some("info") => LevelFilter::Info,
        Some("debug") => LevelFilter::Debug,
        Some("trace") => LevelFilter::Trace,
        _ => LevelFilter::Off,
    };
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(level);
    }
}

/// Machine geometry: `simos [num_disks ram_bytes page_size]`.
fn parse_geometry() -> Result<(usize, u64, u64), String> {
    let args: Vec<String> = env::args().skip(1).collect();
    match args.len() {
        0 => Ok((3, 1000, 10)),
        3 => {
            let disks = args[0]
                .parse()
                .map_err(|_| format!("bad disk count: {}", args[0]))?;
            let ram = args[1]
                .parse()
                .map_err(|_| format!("bad RAM size: {}", args[1]))?;
            let page = args[2]
                .parse()
                .map_err(|_| format!("bad page size: {}", args[2]))?;
            Ok((disks, ram, page))
        }
        _ => Err("usage: simos [num_disks ram_bytes page_size]".to_string()),
    }
}

fn print_help() {
    for (syntax, description) in DRIVER_COMMANDS {
        println!("  {syntax:<22} {description}");
    }
}

fn format_request(request: &FileReadRequest) -> String {
    format!("({}, \"{}\")", request.pid, request.file_name)
}

fn report(result: sim_os::SimResult<()>) {
    if let Err(e) = result {
        println!("error: {e}");
    }
}

fn parse_index(token: Option<&str>) -> Option<usize> {
    token?.parse().ok()
}

/// Apply one command line to the machine. Returns `false` on `quit`.
fn dispatch(sim: &mut SimOs, line: &str) -> bool {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return true;
    };

    match command {
        "new" => sim.new_process(),
        "fork" => report(sim.sim_fork()),
        "exit" => report(sim.sim_exit()),
        "wait" => report(sim.sim_wait()),
        "timer" => report(sim.timer_interrupt()),
        "read" => match (parse_index(words.next()), words.next()) {
            (Some(disk), Some(file)) => report(sim.disk_read_request(disk, file)),
            _ => println!("usage: read <disk> <file>"),
        },
        "done" => match parse_index(words.next()) {
            Some(disk) => report(sim.disk_job_completed(disk)),
            None => println!("usage: done <disk>"),
        },
        "access" => match words.next().and_then(|w| w.parse().ok()) {
            Some(address) => report(sim.access_memory_address(address)),
            None => println!("usage: access <addr>"),
        },
        "cpu" => {
            let pid = sim.get_cpu();
            if pid == NO_PROCESS {
                println!("cpu: idle");
            } else {
                println!("cpu: {pid}");
            }
        }
        "ready" => {
            let queue: Vec<String> = sim
                .get_ready_queue()
                .iter()
                .map(ToString::to_string)
                .collect();
            println!("ready: [{}]", queue.join(", "));
        }
        "mem" => {
            let usage = sim.get_memory();
            if usage.is_empty() {
                println!("mem: empty");
            }
            for item in usage {
                println!(
                    "  frame {:>3}  page {:>4}  pid {}",
                    item.frame_number, item.page_number, item.pid
                );
            }
        }
        "disk" => match parse_index(words.next()) {
            Some(disk) => match sim.get_disk(disk) {
                Ok(request) => println!("disk {}: {}", disk, format_request(&request)),
                Err(e) => println!("error: {e}"),
            },
            None => println!("usage: disk <disk>"),
        },
        "queue" => match parse_index(words.next()) {
            Some(disk) => match sim.get_disk_queue(disk) {
                Ok(queue) => {
                    let items: Vec<String> = queue.iter().map(format_request).collect();
                    println!("queue {}: [{}]", disk, items.join(", "));
                }
                Err(e) => println!("error: {e}"),
            },
            None => println!("usage: queue <disk>"),
        },
        "help" => print_help(),
        "quit" | "q" => return false,
        other => println!("unknown command: {other} (try `help`)"),
    }
    true
}

fn main() {
    init_logging();

    let (disks, ram, page) = match parse_geometry() {
        Ok(geometry) => geometry,
        Err(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    };

    match SimOs::new(disks, ram, page) {
        Ok(sim) => *SIM.lock() = Some(sim),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }

    for line in DRIVER_BANNER {
        println!("{line}");
    }
    println!("machine: {disks} disk(s), {ram} bytes RAM, {page} bytes/page");

    let stdin = io::stdin();
    loop {
        print!("> ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match stdin.lock().read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }

        let mut guard = SIM.lock();
        let Some(sim) = guard.as_mut() else {
            break;
        };
        if !dispatch(sim, &line) {
            break;
        }
    }
}
