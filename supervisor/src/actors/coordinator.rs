mod actor;
mod messages;

use self::{
    actor::JobCoordinator,
    messages::CoordinatorMessage::{self, CurrentJob, StartJob},
};
use crate::config::SupervisorConfig;
use crate::error::{self, Error};
use crate::events::JobStatus;
use crate::job::JobHandle;
use crate::types::{Args, CommandLine, Dir, Program};
use tokio::sync::{mpsc, oneshot};

/// A `Supervisor` which runs one external command at a time and reports on it.
///
/// This struct is actually an actor handle, the real work is done in the actor spawned by `CoordinatorHandle::spawn`,
/// but from the user perspective all that matters is that this struct provides methods for managing jobs.
/// The actor-handle abstraction allows this struct to be cloned freely in a multi-thread async context,
/// without requiring an `Arc<Mutex>` or any other means of synchronization.
#[derive(Clone)]
pub struct CoordinatorHandle {
    sender: mpsc::Sender<CoordinatorMessage>,
}

impl CoordinatorHandle {
    /// Spawn a new supervisor. Must be called from within a tokio runtime.
    pub fn spawn(config: SupervisorConfig) -> Self {
        let (sender, receiver) = mpsc::channel(config.message_capacity);
        JobCoordinator::spawn(receiver, config);
        Self { sender }
    }

    /// Start `program` with `args` in `dir`.
    ///
    /// Returns as soon as the child has been spawned. A program that cannot be spawned still yields a
    /// handle, whose status is already [`JobStatus::ErroredBeforeStart`].
    ///
    /// # Errors
    ///
    /// [`Error::AlreadyRunning`] while the previous job has not finished, and
    /// [`Error::InvalidWorkingDirectory`] if `dir` is not an existing directory.
    pub async fn start(
        &self,
        dir: impl Into<Dir>,
        program: impl Into<Program>,
        args: Args,
    ) -> error::Result<JobHandle> {
        let (tx, rx) = oneshot::channel();
        let msg = StartJob {
            command: CommandLine {
                program: program.into(),
                args,
                dir: dir.into(),
            },
            response: tx,
        };
        self.sender.send(msg).await.map_err(|_| Error::Shutdown)?;
        rx.await.map_err(|_| Error::Shutdown)?
    }

    /// Request termination of `job`. A no-op once the job is terminal.
    pub fn cancel(&self, job: &JobHandle) {
        job.cancel();
    }

    /// Kill `job` at once, skipping the termination grace period.
    pub fn kill(&self, job: &JobHandle) {
        job.kill();
    }

    /// Wait for `job` to reach a terminal status.
    pub async fn wait(&self, job: &JobHandle) -> JobStatus {
        job.wait().await
    }

    /// Snapshot of `job`'s status, without waiting.
    pub fn status(&self, job: &JobHandle) -> JobStatus {
        job.status()
    }

    /// The most recently started job, running or not.
    pub async fn current_job(&self) -> error::Result<Option<JobHandle>> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(CurrentJob { response: tx })
            .await
            .map_err(|_| Error::Shutdown)?;
        rx.await.map_err(|_| Error::Shutdown)
    }
}
