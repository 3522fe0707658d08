use super::messages::WorkerMessage;
use crate::config::SupervisorConfig;
use crate::events::{JobEvent, JobStatus, OutputEvent};
use crate::terminate;
use crate::types::JobId;

use futures::future::{Fuse, FutureExt};
use std::io;
use std::process::ExitStatus;
use std::time::Duration;
use tokio::{
    process::Child,
    select,
    sync::mpsc,
    time::{sleep, Sleep},
};
use tracing::{debug, info, warn};

pub struct Actor {
    job_id: JobId,
    inbox: mpsc::UnboundedReceiver<WorkerMessage>,
    events_tx: mpsc::UnboundedSender<JobEvent>,
    terminate_grace: Duration,
    drain_timeout: Duration,
    cancel_requested: bool,
}

impl Actor {
    pub fn spawn(
        job_id: JobId,
        inbox: mpsc::UnboundedReceiver<WorkerMessage>,
        events_tx: mpsc::UnboundedSender<JobEvent>,
        child: Child,
        lines_rx: mpsc::UnboundedReceiver<OutputEvent>,
        config: &SupervisorConfig,
    ) {
        let actor = Self {
            job_id,
            inbox,
            events_tx,
            terminate_grace: config.terminate_grace,
            drain_timeout: config.drain_timeout,
            cancel_requested: false,
        };
        tokio::spawn(async move { actor.run(child, lines_rx).await });
    }

    /// Relay output until the child has exited and its output is drained, then report the outcome.
    ///
    /// `Finished` is the last event this actor sends, so nobody sees a status before the final line.
    async fn run(mut self, mut child: Child, mut lines_rx: mpsc::UnboundedReceiver<OutputEvent>) {
        let mut exit: Option<io::Result<ExitStatus>> = None;
        let mut output_open = true;
        let mut inbox_open = true;
        let mut force_kill = Box::pin(Fuse::<Sleep>::terminated());
        let mut drain_limit = Box::pin(Fuse::<Sleep>::terminated());

        while exit.is_none() || output_open {
            select! {
                maybe_line = lines_rx.recv(), if output_open => {
                    match maybe_line {
                        Some(event) => {
                            let _ = self.events_tx.send(JobEvent::Output(event));
                        }
                        None => output_open = false,
                    }
                }
                // reap the child as soon as it exits
                status = child.wait(), if exit.is_none() => {
                    debug!(job_id = %self.job_id, ?status, "child exited");
                    drain_limit.set(sleep(self.drain_timeout).fuse());
                    exit = Some(status);
                }
                maybe_msg = self.inbox.recv(), if inbox_open => {
                    match maybe_msg {
                        Some(WorkerMessage::Cancel) => {
                            if exit.is_none() && !self.cancel_requested {
                                info!(job_id = %self.job_id, "cancellation requested, terminating child");
                                self.cancel_requested = true;
                                terminate::request_stop(&child);
                                force_kill.set(sleep(self.terminate_grace).fuse());
                            }
                        }
                        Some(WorkerMessage::Kill) => {
                            if exit.is_none() {
                                warn!(job_id = %self.job_id, "forced stop requested, killing child");
                                self.cancel_requested = true;
                                terminate::kill(&mut child);
                            }
                        }
                        None => {
                            // every handle dropped, nobody can observe or stop this child any more
                            inbox_open = false;
                            if exit.is_none() {
                                debug!(job_id = %self.job_id, "job abandoned, killing child");
                                terminate::kill(&mut child);
                            }
                        }
                    }
                }
                _ = &mut force_kill, if exit.is_none() => {
                    warn!(
                        job_id = %self.job_id,
                        grace = ?self.terminate_grace,
                        "child ignored termination request, killing it"
                    );
                    terminate::kill(&mut child);
                }
                _ = &mut drain_limit, if output_open => {
                    warn!(
                        job_id = %self.job_id,
                        "output pipe still open after child exit, dropping the rest"
                    );
                    output_open = false;
                }
            }
        }

        let status = match exit {
            Some(exit) => self.final_status(exit),
            None => unreachable!("loop only ends after the child exited"),
        };
        info!(job_id = %self.job_id, %status, "job finished");
        let _ = self.events_tx.send(JobEvent::Finished(status));
    }

    fn final_status(&self, exit: io::Result<ExitStatus>) -> JobStatus {
        if self.cancel_requested {
            return JobStatus::Cancelled;
        }
        match exit {
            Ok(status) => match status.code() {
                Some(0) => JobStatus::Succeeded,
                Some(code) => JobStatus::Failed { code },
                None => JobStatus::Failed {
                    code: signal_code(&status),
                },
            },
            Err(err) => {
                warn!(job_id = %self.job_id, error = %err, "waiting on child failed");
                JobStatus::Failed { code: -1 }
            }
        }
    }
}

/// Shell convention for a child killed by a signal: 128 + signal number.
#[cfg(unix)]
fn signal_code(status: &ExitStatus) -> i32 {
    use std::os::unix::process::ExitStatusExt;
    status.signal().map_or(-1, |signal| 128 + signal)
}

#[cfg(not(unix))]
fn signal_code(_status: &ExitStatus) -> i32 {
    -1
}
