use super::messages::CoordinatorMessage;
use crate::config::SupervisorConfig;
use crate::error::{self, Error};
use crate::job::JobHandle;
use crate::types::CommandLine;
use tokio::sync::mpsc;
use tracing::{debug, info};

pub struct JobCoordinator {
    inbox: mpsc::Receiver<CoordinatorMessage>,
    config: SupervisorConfig,
    current: Option<JobHandle>,
}

impl JobCoordinator {
    pub fn spawn(inbox: mpsc::Receiver<CoordinatorMessage>, config: SupervisorConfig) {
        let actor = Self {
            inbox,
            config,
            current: None,
        };
        tokio::spawn(async move { actor.run().await });
    }

    async fn run(mut self) {
        use self::CoordinatorMessage::*;
        while let Some(msg) = self.inbox.recv().await {
            match msg {
                StartJob { command, response } => {
                    let result = self.start_job(command).await;
                    let _ = response.send(result);
                }
                CurrentJob { response } => {
                    let _ = response.send(self.current.clone());
                }
            }
        }
        debug!("all supervisor handles dropped, coordinator exiting");
    }

    async fn start_job(&mut self, command: CommandLine) -> error::Result<JobHandle> {
        if let Some(job) = &self.current {
            if !job.status().is_terminal() {
                return Err(Error::AlreadyRunning { job_id: job.id() });
            }
        }

        let is_dir = matches!(tokio::fs::metadata(&command.dir).await, Ok(meta) if meta.is_dir());
        if !is_dir {
            return Err(Error::InvalidWorkingDirectory { dir: command.dir });
        }

        info!(%command, dir = %command.dir.display(), "starting job");
        let job = JobHandle::launch(command, &self.config);
        // the previous job, if any, is terminal; replacing it releases our hold on it
        self.current = Some(job.clone());
        Ok(job)
    }
}
