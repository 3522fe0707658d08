mod actor;
mod messages;
use crate::events::{JobEvent, JobStatus, OutputEvent};
use crate::types::JobId;
use actor::Actor;
use messages::Message;

use tokio::sync::{
    mpsc::{self, UnboundedReceiver},
    oneshot, watch,
};

/// A `Broadcaster` which records a job's output, fans it out to subscribers and publishes the job's status.
///
/// This struct is actually an actor handle. The real work is done in the actor spawned by `BroadcasterHandle::spawn`.
#[derive(Clone)]
pub struct BroadcasterHandle {
    sender: mpsc::UnboundedSender<Message>,
}

impl BroadcasterHandle {
    pub fn spawn(
        job_id: JobId,
        events_rx: UnboundedReceiver<JobEvent>,
        status_tx: watch::Sender<JobStatus>,
    ) -> Self {
        let (sender, inbox) = mpsc::unbounded_channel();
        Actor::spawn(job_id, inbox, events_rx, status_tx);
        Self { sender }
    }

    pub fn subscribe(&self) -> UnboundedReceiver<JobEvent> {
        let (subscriber, events) = mpsc::unbounded_channel();
        let _ = self.sender.send(Message::Subscribe { subscriber });
        events
    }

    pub async fn output(&self) -> Vec<OutputEvent> {
        let (tx, rx) = oneshot::channel();
        let _ = self.sender.send(Message::Snapshot { response: tx });
        rx.await.unwrap_or_default()
    }
}
