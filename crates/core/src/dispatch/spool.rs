use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;

use super::{DispatchConfig, Dispatcher, MESSAGE_BODY, Outgoing};
use crate::{LinkpressError, Result};

/// Message metadata written next to the spooled document.
#[derive(Debug, Serialize)]
struct Envelope<'a> {
    from: &'a str,
    to: &'a [String],
    subject: String,
    body: &'a str,
    attachment: String,
}

/// Writes the document and a JSON envelope into a spool directory.
///
/// The mailer watching the directory owns the actual transport and its
/// credentials; the credential itself is never written to disk.
#[derive(Debug, Clone)]
pub struct SpoolDispatcher {
    spool_dir: PathBuf,
    config: DispatchConfig,
}

impl SpoolDispatcher {
    pub fn new(spool_dir: impl Into<PathBuf>, config: DispatchConfig) -> Self {
        Self { spool_dir: spool_dir.into(), config }
    }

    pub fn spool_dir(&self) -> &Path {
        &self.spool_dir
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Dispatches to the configured recipients.
    pub fn send(&self, document: &Path) -> Result<()> {
        self.dispatch(document, self.config.recipients())
    }
}

impl Dispatcher for SpoolDispatcher {
    fn dispatch(&self, document: &Path, recipients: &[String]) -> Result<()> {
        let outgoing = Outgoing::prepare(document, recipients)?;
        let delivery_failed = |e: std::io::Error| LinkpressError::DeliveryFailed(e.to_string());

        fs::create_dir_all(&self.spool_dir).map_err(delivery_failed)?;
        fs::copy(document, self.spool_dir.join(&outgoing.file_name)).map_err(delivery_failed)?;

        let envelope = Envelope {
            from: self.config.sender(),
            to: recipients,
            subject: outgoing.subject(),
            body: MESSAGE_BODY,
            attachment: outgoing.file_name.clone(),
        };
        let json = serde_json::to_string_pretty(&envelope).map_err(|e| LinkpressError::DeliveryFailed(e.to_string()))?;
        let envelope_path = self.spool_dir.join(format!("{}.json", outgoing.stem));
        fs::write(&envelope_path, json).map_err(delivery_failed)?;

        tracing::info!(
            document = %document.display(),
            envelope = %envelope_path.display(),
            recipients = recipients.len(),
            "document spooled for delivery"
        );
        Ok(())
    }
}
