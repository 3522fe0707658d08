use crate::types::Timestamp;
use std::fmt;

/// Lifecycle state of a job.
///
/// Every state except `Running` is terminal: once a job reaches one of them it never changes again.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JobStatus {
    Running,
    Succeeded,
    Failed { code: i32 },
    Cancelled,
    ErroredBeforeStart { message: String },
}

impl JobStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, JobStatus::Running)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Running => write!(f, "running"),
            JobStatus::Succeeded => write!(f, "succeeded"),
            JobStatus::Failed { code } => write!(f, "failed with exit code {}", code),
            JobStatus::Cancelled => write!(f, "cancelled"),
            JobStatus::ErroredBeforeStart { message } => write!(f, "could not start: {}", message),
        }
    }
}

/// One line of the child's merged stdout/stderr.
#[derive(Clone, Debug)]
pub struct OutputEvent {
    pub line: String,
    pub timestamp: Timestamp,
}

impl OutputEvent {
    pub fn new(line: String) -> Self {
        Self {
            line,
            timestamp: chrono::Local::now(),
        }
    }
}

/// What a subscriber receives: output lines in production order, then exactly one `Finished`.
#[derive(Clone, Debug)]
pub enum JobEvent {
    Output(OutputEvent),
    Finished(JobStatus),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_running_is_live() {
        assert!(!JobStatus::Running.is_terminal());
        assert!(JobStatus::Succeeded.is_terminal());
        assert!(JobStatus::Failed { code: 7 }.is_terminal());
        assert!(JobStatus::Cancelled.is_terminal());
        assert!(JobStatus::ErroredBeforeStart {
            message: "nope".into()
        }
        .is_terminal());
    }

    #[test]
    fn failure_text_keeps_raw_code() {
        assert_eq!(
            JobStatus::Failed { code: -3 }.to_string(),
            "failed with exit code -3"
        );
    }
}
