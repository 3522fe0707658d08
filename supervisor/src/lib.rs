//! Supervised execution of one external command at a time.
//!
//! A [`Supervisor`] starts a program in a given working directory, relays its merged stdout/stderr line by
//! line to subscribers, and reports a definitive [`JobStatus`] once the program is gone. Nothing here touches
//! the process-wide current directory or installs a logging subscriber; both belong to the host application.

mod actors;
pub mod config;
pub mod error;
pub mod events;
mod framing;
mod job;
mod terminate;
pub mod types;

// re-export the coordinator handle as if it is the supervisor itself.
pub use actors::coordinator::CoordinatorHandle as Supervisor;
pub use config::SupervisorConfig;
pub use events::{JobEvent, JobStatus, OutputEvent};
pub use job::JobHandle;
