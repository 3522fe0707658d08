mod actor;
mod messages;
mod reader;

use crate::config::SupervisorConfig;
use crate::events::JobEvent;
use crate::types::{CommandLine, JobId};
use actor::Actor;
use messages::WorkerMessage;
use std::io::{self, PipeReader};
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::{
    process::{self, Child},
    sync::mpsc,
};
use tracing::info;

/// Owns one running child process.
///
/// This struct is an actor handle; the actor spawned by `WorkerHandle::spawn` waits on the child,
/// forwards its output and carries out cancellation.
#[derive(Clone)]
pub struct WorkerHandle {
    sender: mpsc::UnboundedSender<WorkerMessage>,
}

impl WorkerHandle {
    /// Spawn the child described by `command` and start relaying its output into `events_tx`.
    ///
    /// Fails only if the child could not be started; nothing is sent on `events_tx` in that case.
    pub fn spawn(
        job_id: JobId,
        command: &CommandLine,
        events_tx: mpsc::UnboundedSender<JobEvent>,
        config: &SupervisorConfig,
    ) -> io::Result<Self> {
        let program = resolve_program(&command.dir, &command.program);
        let (child, output) = launch(&program, &command.args, &command.dir)?;
        info!(
            %job_id,
            pid = ?child.id(),
            program = %program.display(),
            dir = %command.dir.display(),
            "spawned child process"
        );
        let lines_rx = reader::spawn(job_id, output)?;
        let (sender, inbox) = mpsc::unbounded_channel();
        Actor::spawn(job_id, inbox, events_tx, child, lines_rx, config);
        Ok(Self { sender })
    }

    /// Ask the child to terminate. Ignored once the child has exited.
    pub fn cancel(&self) {
        let _ = self.sender.send(WorkerMessage::Cancel);
    }

    pub fn kill(&self) {
        let _ = self.sender.send(WorkerMessage::Kill);
    }
}

/// Prefer a program shipped inside the working directory over one found on `PATH`.
fn resolve_program(dir: &Path, program: &str) -> PathBuf {
    let local = dir.join(program);
    if local.is_file() {
        // relative program paths combined with `current_dir` are resolved differently per platform
        std::path::absolute(&local).unwrap_or(local)
    } else {
        PathBuf::from(program)
    }
}

/// Start the child with stdout and stderr writing into the same pipe, so the reader sees
/// the two streams in the order the child wrote them.
fn launch(program: &Path, args: &[String], dir: &Path) -> io::Result<(Child, PipeReader)> {
    let (output, writer) = io::pipe()?;
    let mut command = process::Command::new(program);
    command
        .args(args)
        .current_dir(dir)
        .stdin(Stdio::null())
        .stdout(writer.try_clone()?)
        .stderr(writer)
        .kill_on_drop(true);
    #[cfg(unix)]
    command.process_group(0);
    #[cfg(windows)]
    command.creation_flags(crate::terminate::CREATE_NO_WINDOW);
    let child = command.spawn()?;
    // `command` still holds our copies of the write end; they close here so EOF can arrive.
    Ok((child, output))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn program_inside_dir_wins() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("dslite.bat"), "@echo off\r\n").unwrap();
        let resolved = resolve_program(dir.path(), "dslite.bat");
        assert!(resolved.is_absolute());
        assert_eq!(resolved.file_name().unwrap(), "dslite.bat");
    }

    #[test]
    fn unknown_program_is_left_for_path_lookup() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(resolve_program(dir.path(), "sh"), PathBuf::from("sh"));
    }

    #[test]
    fn directories_are_not_programs() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("tools")).unwrap();
        assert_eq!(resolve_program(dir.path(), "tools"), PathBuf::from("tools"));
    }
}
