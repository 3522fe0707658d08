use crate::events::OutputEvent;
use crate::framing::LineFramer;
use crate::types::JobId;
use std::io::{self, Read};
use std::thread;
use tokio::sync::mpsc;
use tracing::{debug, trace, warn};

/// Read the child's merged output on a dedicated thread, one event per line.
///
/// The returned channel closes once the pipe reaches end of stream.
pub fn spawn<R>(job_id: JobId, output: R) -> io::Result<mpsc::UnboundedReceiver<OutputEvent>>
where
    R: Read + Send + 'static,
{
    let (lines_tx, lines_rx) = mpsc::unbounded_channel();
    thread::Builder::new()
        .name(format!("job-output-{}", job_id))
        .spawn(move || pump(job_id, output, lines_tx))?;
    Ok(lines_rx)
}

fn pump(job_id: JobId, mut output: impl Read, lines_tx: mpsc::UnboundedSender<OutputEvent>) {
    let mut framer = LineFramer::new();
    let mut chunk = [0u8; 4096];
    loop {
        match output.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => {
                framer.push(&chunk[..n]);
                while let Some(line) = framer.next_line() {
                    if lines_tx.send(OutputEvent::new(line)).is_err() {
                        debug!(%job_id, "output no longer wanted, stop reading");
                        return;
                    }
                }
            }
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => {
                warn!(%job_id, error = %err, "reading child output failed");
                break;
            }
        }
    }
    if let Some(line) = framer.finish() {
        let _ = lines_tx.send(OutputEvent::new(line));
    }
    trace!(%job_id, "output stream closed");
}
