//! Locating and validating UniFlash standalone project folders.
//!
//! A project folder is any directory holding the flashing tool (normally `dslite.bat`) that UniFlash's
//! "Create standalone package" export produces.

use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Folders checked by [`auto_detect`], in priority order.
pub const CANDIDATE_DIRS: &[&str] = &["single_flash", ".", "cc2650_project", "uniflash_export"];

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("{} is not a directory", .0.display())]
    NotADirectory(PathBuf),
    #[error("{} does not contain {tool}; select a UniFlash standalone project folder", .dir.display())]
    MissingTool { dir: PathBuf, tool: String },
    #[error("no UniFlash project folder found (looked for {tool} in {})", .searched.join(", "))]
    NotFound { tool: String, searched: Vec<String> },
}

/// Check that `dir` is a directory containing `tool`, and return it as an absolute path.
pub fn validate(dir: &Path, tool: &str) -> Result<PathBuf, ProjectError> {
    if !dir.is_dir() {
        return Err(ProjectError::NotADirectory(dir.to_path_buf()));
    }
    if !dir.join(tool).is_file() {
        return Err(ProjectError::MissingTool {
            dir: dir.to_path_buf(),
            tool: tool.to_string(),
        });
    }
    Ok(std::path::absolute(dir).unwrap_or_else(|_| dir.to_path_buf()))
}

/// First folder under `base` from [`CANDIDATE_DIRS`] that passes [`validate`].
pub fn auto_detect(base: &Path, tool: &str) -> Result<PathBuf, ProjectError> {
    for candidate in CANDIDATE_DIRS {
        match validate(&base.join(candidate), tool) {
            Ok(dir) => {
                debug!(candidate, dir = %dir.display(), "auto-detected project folder");
                return Ok(dir);
            }
            Err(err) => debug!(candidate, %err, "not a project folder"),
        }
    }
    Err(ProjectError::NotFound {
        tool: tool.to_string(),
        searched: CANDIDATE_DIRS.iter().map(|dir| dir.to_string()).collect(),
    })
}
