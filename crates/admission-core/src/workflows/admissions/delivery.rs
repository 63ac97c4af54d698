use std::fs;
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use tracing::{debug, info};

use super::report::ReportPayload;

/// Outbound channel for emailed reports.
pub trait DeliveryChannel: Send + Sync {
    fn deliver(&self, recipient: &str, payload: &ReportPayload) -> Result<(), DeliveryError>;
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("Invalid email format")]
    InvalidRecipient,
    #[error("delivery transport unavailable: {0}")]
    Transport(String),
}

/// Stand-in for a mail transport: waits a fixed delay, then accepts any address with an `@`.
#[derive(Debug, Clone)]
pub struct SimulatedDeliveryChannel {
    delay: Duration,
}

impl SimulatedDeliveryChannel {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

impl Default for SimulatedDeliveryChannel {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY)
    }
}

impl DeliveryChannel for SimulatedDeliveryChannel {
    fn deliver(&self, recipient: &str, payload: &ReportPayload) -> Result<(), DeliveryError> {
        if !self.delay.is_zero() {
            thread::sleep(self.delay);
        }
        if !recipient.contains('@') {
            return Err(DeliveryError::InvalidRecipient);
        }
        info!(
            recipient,
            report_id = %payload.summary.report_id,
            applications = payload.applications.len(),
            "simulated report delivery"
        );
        Ok(())
    }
}

/// Hands a finished report document to something the user can open and print.
pub trait DocumentRenderer: Send + Sync {
    fn render(&self, file_name: &str, html: &str) -> Result<PathBuf, RenderError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("unable to write report {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("report file name '{0}' must not contain path separators")]
    InvalidFileName(String),
}

/// Writes report documents into a directory for download and print-to-PDF.
#[derive(Debug, Clone)]
pub struct HtmlFileRenderer {
    output_dir: PathBuf,
}

impl HtmlFileRenderer {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }
}

impl DocumentRenderer for HtmlFileRenderer {
    fn render(&self, file_name: &str, html: &str) -> Result<PathBuf, RenderError> {
        if file_name.contains('/') || file_name.contains('\\') {
            return Err(RenderError::InvalidFileName(file_name.to_string()));
        }

        fs::create_dir_all(&self.output_dir).map_err(|source| RenderError::Io {
            path: self.output_dir.clone(),
            source,
        })?;
        let path = self.output_dir.join(file_name);
        fs::write(&path, html).map_err(|source| RenderError::Io {
            path: path.clone(),
            source,
        })?;
        debug!(path = %path.display(), bytes = html.len(), "report document written");
        Ok(path)
    }
}
