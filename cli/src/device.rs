//! Best-effort check for a connected TI debug probe.
//!
//! Purely advisory: flashing never depends on it, and a missing query tool only makes the result
//! [`Probe::Unavailable`].

use std::time::Duration;
use tokio::process::Command;
use tracing::debug;

const PROBE_MARKERS: &[&str] = &["xds110", "launchpad"];

#[derive(Debug, PartialEq, Eq)]
pub enum Probe {
    Found(String),
    NotFound,
    Unavailable(String),
}

#[cfg(windows)]
fn query() -> (&'static str, Vec<&'static str>) {
    (
        "wmic",
        vec![
            "path",
            "Win32_PnPEntity",
            "where",
            "Name like \"%XDS110%\" or Name like \"%LaunchPad%\"",
            "get",
            "Name",
        ],
    )
}

#[cfg(not(windows))]
fn query() -> (&'static str, Vec<&'static str>) {
    ("lsusb", vec![])
}

pub async fn detect(limit: Duration) -> Probe {
    let (program, args) = query();
    let mut command = Command::new(program);
    command.args(&args).kill_on_drop(true);
    match tokio::time::timeout(limit, command.output()).await {
        Err(_) => Probe::Unavailable(format!("{} did not answer within {:?}", program, limit)),
        Ok(Err(err)) => Probe::Unavailable(format!("could not run {}: {}", program, err)),
        Ok(Ok(output)) => {
            let listing = String::from_utf8_lossy(&output.stdout);
            debug!(program, status = ?output.status, "device query finished");
            find_probe(&listing).map_or(Probe::NotFound, Probe::Found)
        }
    }
}

/// First line of a device listing that names a known debug probe.
pub fn find_probe(listing: &str) -> Option<String> {
    listing
        .lines()
        .map(str::trim)
        .find(|line| {
            let line = line.to_lowercase();
            PROBE_MARKERS.iter().any(|marker| line.contains(marker))
        })
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_probe_in_lsusb_listing() {
        let listing = "\
Bus 001 Device 002: ID 8087:0024 Intel Corp. Integrated Rate Matching Hub
Bus 001 Device 005: ID 0451:bef3 Texas Instruments, Inc. CC1352R1 Launchpad
";
        assert_eq!(
            find_probe(listing).as_deref(),
            Some("Bus 001 Device 005: ID 0451:bef3 Texas Instruments, Inc. CC1352R1 Launchpad")
        );
    }

    #[test]
    fn finds_probe_in_wmic_listing() {
        let listing = "Name  \r\nXDS110 Class Auxiliary Data Port  \r\nXDS110 Class Application/User UART  \r\n";
        assert_eq!(
            find_probe(listing).as_deref(),
            Some("XDS110 Class Auxiliary Data Port")
        );
    }

    #[test]
    fn nothing_connected() {
        assert_eq!(find_probe("Name\r\n\r\n"), None);
        assert_eq!(find_probe(""), None);
    }
}
