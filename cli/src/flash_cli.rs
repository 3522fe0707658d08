use crate::transcript::Transcript;

use anyhow::{Context, Result};
use std::path::Path;
use supervisor::{JobEvent, JobHandle, JobStatus, Supervisor, SupervisorConfig};
use tokio::select;

const RULE_WIDTH: usize = 60;

/// Console front end for one flash session: echoes the tool's output as it arrives and
/// keeps a transcript that can be saved afterwards.
pub struct FlashCli {
    supervisor: Supervisor,
    transcript: Transcript,
}

impl FlashCli {
    pub fn new(config: SupervisorConfig) -> Self {
        Self {
            supervisor: Supervisor::spawn(config),
            transcript: Transcript::new(),
        }
    }

    /// Run `tool` in the project folder `dir` until it finishes.
    ///
    /// Ctrl-C asks the tool to stop; a second Ctrl-C kills it.
    pub async fn flash(&mut self, dir: &Path, tool: &str, args: Vec<String>) -> Result<JobStatus> {
        let folder = dir
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| dir.display().to_string());
        self.transcript.activity(format!("Starting flash: {}", folder));
        self.echo(format!("Flashing from: {}", folder));
        self.echo("=".repeat(RULE_WIDTH));

        let job = self
            .supervisor
            .start(dir, tool, args)
            .await
            .with_context(|| format!("could not start {} in {}", tool, dir.display()))?;
        let mut events = job.subscribe();
        let mut ctrl_c = Box::pin(tokio::signal::ctrl_c());
        let mut interrupts = 0;

        let status = loop {
            select! {
                maybe_event = events.recv() => {
                    match maybe_event {
                        Some(JobEvent::Output(event)) => self.echo(event.line),
                        Some(JobEvent::Finished(status)) => break status,
                        None => break job.wait().await,
                    }
                }
                _ = &mut ctrl_c, if interrupts < 2 => {
                    interrupts += 1;
                    self.interrupt(&job, interrupts);
                    ctrl_c.set(tokio::signal::ctrl_c());
                }
            }
        };

        self.report(&status);
        Ok(status)
    }

    pub fn save_output(&self, path: &Path) -> Result<()> {
        self.transcript
            .save(path)
            .with_context(|| format!("failed to save output to {}", path.display()))?;
        tracing::info!("Output saved to: {}", path.display());
        Ok(())
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    fn interrupt(&mut self, job: &JobHandle, interrupts: u32) {
        if interrupts == 1 {
            self.transcript.activity("Stop requested, terminating the flashing tool");
            eprintln!("Stopping... press Ctrl-C again to kill the flashing tool");
            self.supervisor.cancel(job);
        } else {
            self.transcript.activity("Stop requested again, killing the flashing tool");
            self.supervisor.kill(job);
        }
    }

    fn echo(&mut self, line: impl Into<String>) {
        let line = line.into();
        println!("{}", line);
        self.transcript.output_line(line);
    }

    fn report(&mut self, status: &JobStatus) {
        let (banner, activity) = match status {
            JobStatus::Succeeded => (
                "SUCCESS: FIRMWARE FLASHED".to_string(),
                "Flash completed successfully".to_string(),
            ),
            JobStatus::Failed { code } => (
                format!("FAILED: FLASH FAILED (Exit Code: {})", code),
                format!("Flash failed with exit code: {}", code),
            ),
            JobStatus::Cancelled => (
                "STOPPED: FLASH OPERATION STOPPED BY USER".to_string(),
                "Flash operation stopped by user".to_string(),
            ),
            JobStatus::ErroredBeforeStart { message } => {
                (format!("ERROR: {}", message), format!("ERROR: {}", message))
            }
            JobStatus::Running => return,
        };
        self.echo("");
        self.echo("=".repeat(RULE_WIDTH));
        self.echo(banner);
        self.transcript.activity(activity);
    }
}

/// Process exit code for a finished flash.
pub fn exit_code(status: &JobStatus) -> i32 {
    match status {
        JobStatus::Succeeded => 0,
        JobStatus::Failed { code } => *code,
        JobStatus::Cancelled => 130,
        JobStatus::ErroredBeforeStart { .. } | JobStatus::Running => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exit_codes() {
        assert_eq!(exit_code(&JobStatus::Succeeded), 0);
        assert_eq!(exit_code(&JobStatus::Failed { code: 7 }), 7);
        assert_eq!(exit_code(&JobStatus::Cancelled), 130);
        assert_eq!(
            exit_code(&JobStatus::ErroredBeforeStart {
                message: "missing".into()
            }),
            1
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn flash_records_output_and_outcome() {
        let proj = tempfile::tempdir().unwrap();
        let mut cli = FlashCli::new(SupervisorConfig::default());
        let status = cli
            .flash(
                proj.path(),
                "sh",
                vec![
                    "-c".into(),
                    "echo 'Running...'; echo 'Error connecting to the target' >&2; exit 1".into(),
                ],
            )
            .await
            .unwrap();
        assert_eq!(status, JobStatus::Failed { code: 1 });

        let output = cli.transcript().output();
        assert!(output[0].starts_with("Flashing from: "));
        assert_eq!(output[2], "Running...");
        assert_eq!(output[3], "Error connecting to the target");
        assert_eq!(output.last().unwrap(), "FAILED: FLASH FAILED (Exit Code: 1)");

        let log = proj.path().join("flash.log");
        cli.save_output(&log).unwrap();
        let saved = std::fs::read_to_string(&log).unwrap();
        assert!(saved.contains("Flash failed with exit code: 1"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn second_interrupt_kills_a_stubborn_tool() {
        use std::time::Duration;

        let proj = tempfile::tempdir().unwrap();
        let mut cli = FlashCli::new(SupervisorConfig {
            terminate_grace: Duration::from_secs(30),
            ..SupervisorConfig::default()
        });
        let job = cli
            .supervisor
            .start(
                proj.path(),
                "sh",
                vec!["-c".into(), "trap '' TERM; echo ready; sleep 30".into()],
            )
            .await
            .unwrap();
        let mut events = job.subscribe();
        assert!(matches!(events.recv().await, Some(JobEvent::Output(_))));

        cli.interrupt(&job, 1);
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(job.status(), JobStatus::Running);

        cli.interrupt(&job, 2);
        let status = tokio::time::timeout(Duration::from_secs(10), job.wait())
            .await
            .unwrap();
        assert_eq!(status, JobStatus::Cancelled);
        assert!(cli
            .transcript()
            .render()
            .contains("Stop requested again, killing the flashing tool"));
    }

    #[tokio::test]
    async fn missing_tool_is_reported_not_raised() {
        let proj = tempfile::tempdir().unwrap();
        let mut cli = FlashCli::new(SupervisorConfig::default());
        let status = cli
            .flash(proj.path(), "dslite-missing.bat", vec![])
            .await
            .unwrap();
        assert!(matches!(status, JobStatus::ErroredBeforeStart { .. }));
        assert!(cli
            .transcript()
            .output()
            .last()
            .unwrap()
            .starts_with("ERROR: failed to start `dslite-missing.bat`"));
    }
}
