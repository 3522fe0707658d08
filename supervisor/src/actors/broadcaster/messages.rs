use crate::events::{JobEvent, OutputEvent};
use tokio::sync::{mpsc, oneshot};

#[derive(Debug)]
pub enum Message {
    Subscribe {
        subscriber: mpsc::UnboundedSender<JobEvent>,
    },
    Snapshot {
        response: oneshot::Sender<Vec<OutputEvent>>,
    },
}
