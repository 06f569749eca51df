//! Process lifecycle management for child processes
//!
//! This module ensures that SDK tool processes are terminated when Avidia
//! exits (gracefully or via signal), and that the terminal is restored before
//! the process goes away.
//!
//! # Problem Solved
//! A package download or profile creation keeps running if the front-end is
//! killed while it waits on the child, and a killed full-screen UI leaves the
//! user's shell in raw mode.
//!
//! # Solution
//! - Spawn children in their own process group with a parent-death signal
//! - Track all child PIDs in a global registry
//! - On parent exit (Drop, SIGTERM, SIGINT, SIGHUP), restore the terminal and
//!   send SIGTERM to all children, then SIGKILL after a grace period

use nix::libc;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::{Duration, Instant};

/// Global registry of child process IDs
static CHILD_REGISTRY: OnceLock<Arc<Mutex<ChildRegistry>>> = OnceLock::new();

/// Registry tracking all spawned child processes
#[derive(Debug, Default)]
pub struct ChildRegistry {
    /// Set of child PIDs currently running
    pids: HashSet<u32>,
    /// Whether cleanup has already been initiated (prevent double-cleanup)
    cleanup_initiated: bool,
}

impl ChildRegistry {
    /// Get or create the global child registry
    pub fn global() -> Arc<Mutex<ChildRegistry>> {
        CHILD_REGISTRY
            .get_or_init(|| Arc::new(Mutex::new(ChildRegistry::default())))
            .clone()
    }

    /// Register a new child process
    pub fn register(&mut self, pid: u32) {
        self.pids.insert(pid);
        tracing::debug!(pid, "registered child process");
    }

    /// Unregister a child process (called when it exits normally)
    pub fn unregister(&mut self, pid: u32) {
        self.pids.remove(&pid);
        tracing::debug!(pid, "unregistered child process");
    }

    /// Get count of tracked children
    pub fn count(&self) -> usize {
        self.pids.len()
    }

    /// Whether a PID is currently tracked
    pub fn contains(&self, pid: u32) -> bool {
        self.pids.contains(&pid)
    }

    /// Terminate all tracked child processes
    /// Sends SIGTERM to each process group, waits up to `grace_period`, then SIGKILL
    pub fn terminate_all(&mut self, grace_period: Duration) {
        if self.cleanup_initiated {
            tracing::debug!("cleanup already initiated, skipping");
            return;
        }
        self.cleanup_initiated = true;

        if self.pids.is_empty() {
            tracing::debug!("no child processes to terminate");
            return;
        }

        tracing::info!(count = self.pids.len(), "terminating child processes");

        let pids: Vec<u32> = self.pids.iter().copied().collect();
        for &pid in &pids {
            // Group signal first so helpers spawned by the SDK scripts go too
            if let Err(e) = send_signal_to_group(pid, Signal::SIGTERM) {
                tracing::warn!(pid, error = %e, "failed to signal process group");
                if let Err(e2) = send_signal(pid, Signal::SIGTERM) {
                    tracing::warn!(pid, error = %e2, "failed to send SIGTERM");
                }
            }
        }

        if wait_until_dead(&pids, grace_period) {
            tracing::info!("all child processes terminated gracefully");
            self.pids.clear();
            return;
        }

        for &pid in &pids {
            if is_process_alive(pid) {
                tracing::warn!(pid, "process group did not terminate, sending SIGKILL");
                kill_process_group(pid);
            }
        }

        self.pids.clear();
        tracing::info!("child process cleanup complete");
    }
}

/// Stop a process that is not our child (a running emulator started from
/// another shell): SIGTERM, wait up to `grace_period`, then SIGKILL.
///
/// Returns `true` once the process is gone.
pub fn terminate_process(pid: u32, grace_period: Duration) -> bool {
    if !is_process_alive(pid) {
        return true;
    }
    if let Err(e) = send_signal(pid, Signal::SIGTERM) {
        tracing::warn!(pid, error = %e, "failed to send SIGTERM");
    }
    if wait_until_dead(&[pid], grace_period) {
        return true;
    }
    tracing::warn!(pid, "process ignored SIGTERM, sending SIGKILL");
    let _ = send_signal(pid, Signal::SIGKILL);
    wait_until_dead(&[pid], Duration::from_millis(500))
}

/// SIGKILL a whole process group, falling back to the leader alone when the
/// child never became a group leader
pub fn kill_process_group(pgid: u32) {
    if send_signal_to_group(pgid, Signal::SIGKILL).is_err() {
        let _ = send_signal(pgid, Signal::SIGKILL);
    }
}

fn wait_until_dead(pids: &[u32], timeout: Duration) -> bool {
    let start = Instant::now();
    loop {
        if pids.iter().all(|&pid| !is_process_alive(pid)) {
            return true;
        }
        if start.elapsed() >= timeout {
            return false;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

/// Send a signal to a process
fn send_signal(pid: u32, signal: Signal) -> Result<(), nix::Error> {
    signal::kill(Pid::from_raw(pid as i32), signal)
}

/// Send a signal to an entire process group (negative PID)
fn send_signal_to_group(pgid: u32, signal: Signal) -> Result<(), nix::Error> {
    signal::kill(Pid::from_raw(-(pgid as i32)), signal)
}

/// Check if a process is still alive (not dead or zombie)
pub fn is_process_alive(pid: u32) -> bool {
    if signal::kill(Pid::from_raw(pid as i32), None).is_err() {
        return false;
    }

    // Field 3 of /proc/pid/stat is the state: Z=zombie, X=dead
    if let Ok(stat) = std::fs::read_to_string(format!("/proc/{}/stat", pid)) {
        // The command name may contain spaces; the state follows the last ')'
        if let Some(rest) = stat.rsplit_once(')').map(|(_, rest)| rest) {
            if let Some(state) = rest.split_whitespace().next() {
                return !matches!(state, "Z" | "X");
            }
        }
    }

    true
}

/// RAII guard that terminates all children on drop
/// Held by `main` for the lifetime of the interactive session
pub struct ProcessGuard {
    registry: Arc<Mutex<ChildRegistry>>,
}

impl ProcessGuard {
    /// Create a new process guard attached to the global registry
    pub fn new() -> Self {
        Self {
            registry: ChildRegistry::global(),
        }
    }

    /// Get the number of tracked children
    pub fn child_count(&self) -> usize {
        self.registry.lock().map(|r| r.count()).unwrap_or(0)
    }
}

impl Default for ProcessGuard {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for ProcessGuard {
    fn drop(&mut self) {
        tracing::debug!("ProcessGuard dropped, initiating cleanup");
        if let Ok(mut registry) = self.registry.lock() {
            registry.terminate_all(Duration::from_secs(5));
        }
    }
}

/// Initialize global signal handlers for graceful shutdown
/// Handles SIGINT (Ctrl+C), SIGTERM, and SIGHUP
/// Call this once at program start
pub fn init_signal_handlers() -> Result<(), std::io::Error> {
    use signal_hook::consts::signal::{SIGHUP, SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;
    use std::thread;

    let mut signals = Signals::new([SIGINT, SIGTERM, SIGHUP])?;

    thread::spawn(move || {
        if let Some(sig) = signals.forever().next() {
            let signal_name = match sig {
                SIGINT => "SIGINT",
                SIGTERM => "SIGTERM",
                SIGHUP => "SIGHUP",
                _ => "UNKNOWN",
            };

            tracing::info!(signal = signal_name, "received signal, cleaning up");

            // Terminal first: the user gets their shell back even if a child
            // takes the whole grace period to die
            crate::ui::restore_terminal();

            if let Ok(mut registry) = ChildRegistry::global().lock() {
                registry.terminate_all(Duration::from_secs(3));
            }

            std::process::exit(128 + sig);
        }
    });

    Ok(())
}

/// Extension trait for std::process::Command to set up process groups
pub trait CommandProcessGroup {
    /// Configure the command to run in its own process group
    /// This allows us to kill the entire process tree with a single signal
    fn in_new_process_group(&mut self) -> &mut Self;
}

impl CommandProcessGroup for std::process::Command {
    fn in_new_process_group(&mut self) -> &mut Self {
        use std::os::unix::process::CommandExt;
        unsafe {
            self.pre_exec(|| {
                nix::unistd::setpgid(Pid::from_raw(0), Pid::from_raw(0))
                    .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

                // Child gets SIGTERM when we die
                if libc::prctl(libc::PR_SET_PDEATHSIG, libc::SIGTERM) == -1 {
                    return Err(std::io::Error::last_os_error());
                }

                Ok(())
            });
        }
        self
    }
}
