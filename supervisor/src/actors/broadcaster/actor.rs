use super::messages::Message;
use crate::events::{JobEvent, JobStatus, OutputEvent};
use crate::types::JobId;

use tokio::select;
use tokio::sync::{mpsc, watch};
use tracing::{trace, warn};

pub struct Actor {
    job_id: JobId,
    inbox: mpsc::UnboundedReceiver<Message>,
    events_rx: mpsc::UnboundedReceiver<JobEvent>,
    status_tx: watch::Sender<JobStatus>,
    output_buffer: Vec<OutputEvent>,
    subscribers: Vec<mpsc::UnboundedSender<JobEvent>>,
    finished: Option<JobStatus>,
}

impl Actor {
    pub fn spawn(
        job_id: JobId,
        inbox: mpsc::UnboundedReceiver<Message>,
        events_rx: mpsc::UnboundedReceiver<JobEvent>,
        status_tx: watch::Sender<JobStatus>,
    ) {
        let actor = Actor {
            job_id,
            inbox,
            events_rx,
            status_tx,
            output_buffer: Vec::new(),
            subscribers: Vec::new(),
            finished: None,
        };
        tokio::spawn(async move { actor.run().await });
    }

    async fn run(mut self) {
        let mut inbox_open = true;
        loop {
            select! {
                maybe_msg = self.inbox.recv(), if inbox_open => {
                    match maybe_msg {
                        Some(Message::Subscribe { subscriber }) => self.subscribe(subscriber),
                        Some(Message::Snapshot { response }) => {
                            let _ = response.send(self.output_buffer.clone());
                        }
                        None => inbox_open = false,
                    }
                }
                maybe_event = self.events_rx.recv(), if self.finished.is_none() => {
                    match maybe_event {
                        Some(JobEvent::Output(event)) => self.publish(event),
                        Some(JobEvent::Finished(status)) => self.finish(status),
                        None => {
                            warn!(job_id = %self.job_id, "worker went away without reporting an outcome");
                            self.finish(JobStatus::Failed { code: -1 });
                        }
                    }
                }
                else => break,
            }
        }
        trace!(job_id = %self.job_id, "broadcaster stopped");
    }

    fn publish(&mut self, event: OutputEvent) {
        self.subscribers.retain(|sub| {
            // only retain subscribers who have not dropped
            sub.send(JobEvent::Output(event.clone())).is_ok()
        });
        self.output_buffer.push(event);
    }

    /// Subscribers hear about the outcome before the status watch flips, and their channels close afterwards.
    fn finish(&mut self, status: JobStatus) {
        for sub in self.subscribers.drain(..) {
            let _ = sub.send(JobEvent::Finished(status.clone()));
        }
        self.status_tx.send_replace(status.clone());
        self.finished = Some(status);
    }

    /// Replay what has been recorded so far; keep the subscriber only while the job can still produce output.
    fn subscribe(&mut self, subscriber: mpsc::UnboundedSender<JobEvent>) {
        for event in &self.output_buffer {
            if subscriber.send(JobEvent::Output(event.clone())).is_err() {
                return;
            }
        }
        match &self.finished {
            Some(status) => {
                let _ = subscriber.send(JobEvent::Finished(status.clone()));
            }
            None => self.subscribers.push(subscriber),
        }
    }
}
