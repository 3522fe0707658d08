use crate::types::JobId;
use std::path::PathBuf;
use std::result;
use thiserror;

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("working directory {} does not exist or is not a directory", .dir.display())]
    InvalidWorkingDirectory { dir: PathBuf },
    #[error("job {job_id} is still running")]
    AlreadyRunning { job_id: JobId },
    #[error("supervisor has shut down")]
    Shutdown,
}

pub type Result<T> = result::Result<T, Error>;
