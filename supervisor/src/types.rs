use std::path::PathBuf;
use uuid::Uuid;

pub type Program = String;
pub type Args = Vec<String>;
pub type Dir = PathBuf;
pub type JobId = Uuid;
pub type Timestamp = chrono::DateTime<chrono::Local>;

/// What a job was asked to run, kept for display and logs.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    pub program: Program,
    pub args: Args,
    pub dir: Dir,
}

impl std::fmt::Display for CommandLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
