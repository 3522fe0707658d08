//! Platform-specific ways of stopping a child and everything it started.
//!
//! On Unix the child leads its own process group, so signals go to the whole group.
//! On Windows `taskkill /T` walks the process tree.

use tokio::process::Child;
use tracing::{debug, warn};

#[cfg(unix)]
pub fn request_stop(child: &Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if let Some(pid) = child.id() {
        if let Err(err) = killpg(Pid::from_raw(pid as i32), Signal::SIGTERM) {
            warn!(pid, error = %err, "failed to send SIGTERM to process group");
        }
    }
}

#[cfg(unix)]
pub fn kill(child: &mut Child) {
    use nix::sys::signal::{killpg, Signal};
    use nix::unistd::Pid;

    if let Some(pid) = child.id() {
        if let Err(err) = killpg(Pid::from_raw(pid as i32), Signal::SIGKILL) {
            debug!(pid, error = %err, "failed to send SIGKILL to process group");
        }
    }
    if let Err(err) = child.start_kill() {
        debug!(error = %err, "child already gone");
    }
}

#[cfg(windows)]
pub(crate) const CREATE_NO_WINDOW: u32 = 0x08000000;

#[cfg(windows)]
fn taskkill(pid: u32, force: bool) {
    use std::os::windows::process::CommandExt;

    let mut command = std::process::Command::new("taskkill");
    command.args(["/PID", &pid.to_string(), "/T"]);
    if force {
        command.arg("/F");
    }
    command.creation_flags(CREATE_NO_WINDOW);
    if let Err(err) = command.spawn() {
        warn!(pid, force, error = %err, "failed to run taskkill");
    }
}

#[cfg(windows)]
pub fn request_stop(child: &Child) {
    if let Some(pid) = child.id() {
        taskkill(pid, false);
    }
}

#[cfg(windows)]
pub fn kill(child: &mut Child) {
    if let Some(pid) = child.id() {
        taskkill(pid, true);
    }
    if let Err(err) = child.start_kill() {
        debug!(error = %err, "child already gone");
    }
}

#[cfg(not(any(unix, windows)))]
pub fn request_stop(_child: &Child) {}

#[cfg(not(any(unix, windows)))]
pub fn kill(child: &mut Child) {
    if let Err(err) = child.start_kill() {
        debug!(error = %err, "child already gone");
    }
}
