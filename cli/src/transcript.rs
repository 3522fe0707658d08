use chrono::{DateTime, Local};
use std::io;
use std::path::Path;
use tracing::info;

/// Everything shown during a flash session: the tool's output and a timestamped activity log.
#[derive(Default)]
pub struct Transcript {
    output: Vec<String>,
    activity: Vec<(DateTime<Local>, String)>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn output_line(&mut self, line: impl Into<String>) {
        self.output.push(line.into());
    }

    pub fn activity(&mut self, message: impl Into<String>) {
        let message = message.into();
        info!("{}", message);
        self.activity.push((Local::now(), message));
    }

    pub fn output(&self) -> &[String] {
        &self.output
    }

    pub fn render(&self) -> String {
        let mut text = String::from("=== FLASH OUTPUT ===\n");
        for line in &self.output {
            text.push_str(line);
            text.push('\n');
        }
        text.push_str("\n=== ACTIVITY LOG ===\n");
        for (at, message) in &self.activity {
            text.push_str(&format!("[{}] {}\n", at.format("%H:%M:%S"), message));
        }
        text
    }

    pub fn save(&self, path: &Path) -> io::Result<()> {
        std::fs::write(path, self.render())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_output_then_activity() {
        let mut transcript = Transcript::new();
        transcript.activity("Starting flash: single_flash");
        transcript.output_line("Executing the following command:");
        transcript.output_line("");
        transcript.output_line("Success");

        let text = transcript.render();
        let (output, activity) = text.split_once("\n=== ACTIVITY LOG ===\n").unwrap();
        assert_eq!(
            output,
            "=== FLASH OUTPUT ===\nExecuting the following command:\n\nSuccess\n"
        );
        // [HH:MM:SS] message
        assert_eq!(&activity[0..1], "[");
        assert_eq!(&activity[9..], "] Starting flash: single_flash\n");
    }

    #[test]
    fn saves_to_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flash.log");
        let mut transcript = Transcript::new();
        transcript.output_line("PASS: Flashing completed");
        transcript.save(&path).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), transcript.render());
    }
}
