use std::time::Duration;

/// Tunables for a [`Supervisor`](crate::Supervisor).
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Capacity of the supervisor's message queue. Limits the build-up of inbound requests.
    pub message_capacity: usize,
    /// How long a cancelled child gets to exit after the polite termination request before it is killed.
    pub terminate_grace: Duration,
    /// How long to keep reading output after the child exited, in case a grandchild still holds the pipe.
    ///
    /// Past this point the job finishes without the remaining output. The reader thread stays blocked on the
    /// pipe until the grandchild writes again or closes it, and exits then.
    pub drain_timeout: Duration,
}

impl Default for SupervisorConfig {
    fn default() -> Self {
        Self {
            message_capacity: 32,
            terminate_grace: Duration::from_secs(3),
            drain_timeout: Duration::from_secs(2),
        }
    }
}
