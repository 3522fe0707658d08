use crate::actors::{broadcaster::BroadcasterHandle, worker::WorkerHandle};
use crate::config::SupervisorConfig;
use crate::events::{JobEvent, JobStatus, OutputEvent};
use crate::types::{CommandLine, JobId, Timestamp};
use tokio::sync::{mpsc, watch};
use tracing::warn;

/// Handle to one invocation of an external command.
///
/// Cheap to clone. The child is killed once every handle to a still-running job is dropped.
#[derive(Clone)]
pub struct JobHandle {
    id: JobId,
    started_at: Timestamp,
    command: CommandLine,
    status_rx: watch::Receiver<JobStatus>,
    worker: Option<WorkerHandle>,
    broadcaster: BroadcasterHandle,
}

impl JobHandle {
    pub(crate) fn launch(command: CommandLine, config: &SupervisorConfig) -> Self {
        let id = uuid::Uuid::new_v4();
        let started_at = chrono::Local::now();
        let (events_tx, events_rx) = mpsc::unbounded_channel();

        let spawned = WorkerHandle::spawn(id, &command, events_tx.clone(), config);
        let initial = match &spawned {
            Ok(_) => JobStatus::Running,
            Err(err) => JobStatus::ErroredBeforeStart {
                message: format!("failed to start `{}`: {}", command.program, err),
            },
        };
        let (status_tx, status_rx) = watch::channel(initial.clone());
        let broadcaster = BroadcasterHandle::spawn(id, events_rx, status_tx);

        let worker = match spawned {
            Ok(worker) => Some(worker),
            Err(err) => {
                warn!(job_id = %id, %command, error = %err, "job errored before start");
                let _ = events_tx.send(JobEvent::Finished(initial));
                None
            }
        };

        Self {
            id,
            started_at,
            command,
            status_rx,
            worker,
            broadcaster,
        }
    }

    pub fn id(&self) -> JobId {
        self.id
    }

    pub fn started_at(&self) -> Timestamp {
        self.started_at
    }

    pub fn command(&self) -> &CommandLine {
        &self.command
    }

    /// Current status; never blocks.
    pub fn status(&self) -> JobStatus {
        self.status_rx.borrow().clone()
    }

    /// Best-effort termination request. Does nothing if the job already finished.
    ///
    /// The job becomes [`JobStatus::Cancelled`] once the child has actually exited. A child that ignores
    /// the request is killed after [`SupervisorConfig::terminate_grace`].
    pub fn cancel(&self) {
        if let Some(worker) = &self.worker {
            worker.cancel();
        }
    }

    /// Kill the child and everything it started without waiting out the grace period.
    /// Does nothing if the job already finished; otherwise the job ends as [`JobStatus::Cancelled`].
    pub fn kill(&self) {
        if let Some(worker) = &self.worker {
            worker.kill();
        }
    }

    /// Wait until the job is terminal. By then every output line has been handed to subscribers.
    pub async fn wait(&self) -> JobStatus {
        let mut status_rx = self.status_rx.clone();
        let result = status_rx
            .wait_for(JobStatus::is_terminal)
            .await
            .map(|status| status.clone());
        result.unwrap_or_else(|_| status_rx.borrow().clone())
    }

    /// Stream of this job's events.
    ///
    /// Output produced before the call is replayed first. The stream ends with exactly one
    /// [`JobEvent::Finished`], then closes.
    pub fn subscribe(&self) -> mpsc::UnboundedReceiver<JobEvent> {
        self.broadcaster.subscribe()
    }

    /// Every line the job has produced so far.
    pub async fn output(&self) -> Vec<OutputEvent> {
        self.broadcaster.output().await
    }
}

impl std::fmt::Debug for JobHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JobHandle")
            .field("id", &self.id)
            .field("command", &self.command)
            .field("status", &*self.status_rx.borrow())
            .finish()
    }
}
