use crate::error;
use crate::job::JobHandle;
use crate::types::CommandLine;
use tokio::sync::oneshot;

pub enum CoordinatorMessage {
    StartJob {
        command: CommandLine,
        response: oneshot::Sender<error::Result<JobHandle>>,
    },
    CurrentJob {
        response: oneshot::Sender<Option<JobHandle>>,
    },
}
