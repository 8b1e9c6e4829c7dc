use std::io::{self, Write};

use serde::Serialize;
use tracing::info;

use crate::app::{ConvertSummary, ProgressEvent, ProgressSink};

pub struct JsonOutput;

impl JsonOutput {
    /// Goes to stderr: stdout may be carrying the Turtle itself.
    pub fn print_summary(summary: &ConvertSummary) -> io::Result<()> {
        Self::print_json(summary, &mut io::stderr())
    }

    fn print_json<T: Serialize, W: Write>(value: &T, out: &mut W) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        out.write_all(json.as_bytes())?;
        out.write_all(b"\n")?;
        Ok(())
    }
}

/// Forwards progress events to the tracing subscriber.
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn event(&self, event: ProgressEvent) {
        match event.elapsed {
            Some(elapsed) => info!(elapsed_ms = elapsed.as_millis() as u64, "{}", event.message),
            None => info!("{}", event.message),
        }
    }
}
