//! JSON output adapter.

use anyhow::Result;
use predict_api_core::{ResponseOutput, SourcedResponse};
use std::io::{self, Write};
use std::sync::Mutex;

use crate::commands::route::OutputFormat;

/// JSON output adapter.
///
/// In JSON Lines mode every response is written as it arrives. In JSON mode
/// responses are buffered and written as one array by `flush()`.
pub struct JsonOutput {
    writer: Mutex<Box<dyn Write + Send>>,
    pending: Option<Mutex<Vec<SourcedResponse>>>,
    pretty: bool,
}

impl JsonOutput {
    /// Creates a new JSON output writing to stdout.
    #[must_use]
    pub fn stdout(format: OutputFormat, pretty: bool) -> Self {
        Self::new(Box::new(io::stdout()), format, pretty)
    }

    /// Creates a new JSON output writing to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>, format: OutputFormat, pretty: bool) -> Self {
        let pending = match format {
            OutputFormat::Jsonl => None,
            OutputFormat::Json => Some(Mutex::new(Vec::new())),
        };
        Self {
            writer: Mutex::new(writer),
            pending,
            pretty,
        }
    }

    #[allow(clippy::significant_drop_tightening)]
    fn write_line(&self, json: &str) -> Result<()> {
        let mut writer = self
            .writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?;
        writeln!(writer, "{json}")?;
        Ok(())
    }
}

impl ResponseOutput for JsonOutput {
    fn write(&self, response: &SourcedResponse) -> Result<()> {
        if let Some(pending) = &self.pending {
            pending
                .lock()
                .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
                .push(response.clone());
            return Ok(());
        }
        self.write_line(&serde_json::to_string(response)?)
    }

    fn flush(&self) -> Result<()> {
        if let Some(pending) = &self.pending {
            let responses = std::mem::take(
                &mut *pending
                    .lock()
                    .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?,
            );
            let json = if self.pretty {
                serde_json::to_string_pretty(&responses)?
            } else {
                serde_json::to_string(&responses)?
            };
            self.write_line(&json)?;
        }

        self.writer
            .lock()
            .map_err(|e| anyhow::anyhow!("Lock poisoned: {e}"))?
            .flush()?;
        Ok(())
    }
}
