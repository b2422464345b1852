//! Delivery of a finished document to its recipients.
//!
//! Configuration is validated up front by [`DispatchConfig::from_parts`], so a
//! missing credential or recipient list is reported before any network work
//! starts. [`SmtpDispatcher`] mails the document as an attachment through an
//! SMTP relay; [`SpoolDispatcher`] drops it, together with a JSON envelope,
//! into a directory watched by some other mailer.

#[cfg(feature = "smtp")]
mod smtp;
mod spool;

use std::path::Path;

use crate::{LinkpressError, Result};
#[cfg(feature = "smtp")]
pub use smtp::{EPUB_MEDIA_TYPE, GMAIL_RELAY, SUBMISSION_PORT, Security, SmtpDispatcher};
pub use spool::SpoolDispatcher;

/// Plain-text message body sent alongside the attachment.
pub const MESSAGE_BODY: &str = "Your daily Hacker News digest is attached.";

/// Validated sender, credential and recipients.
#[derive(Clone, PartialEq, Eq)]
pub struct DispatchConfig {
    sender: String,
    credential: String,
    recipients: Vec<String>,
}

impl std::fmt::Debug for DispatchConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DispatchConfig")
            .field("sender", &self.sender)
            .field("credential", &"<redacted>")
            .field("recipients", &self.recipients)
            .finish()
    }
}

impl DispatchConfig {
    /// Builds a configuration from raw values, typically environment variables.
    ///
    /// `recipients` is a comma-separated list; entries are trimmed and blanks
    /// dropped. Every problem is a [`LinkpressError::ConfigError`].
    pub fn from_parts(sender: Option<&str>, credential: Option<&str>, recipients: Option<&str>) -> Result<Self> {
        let sender = required(sender, "sender address (GMAIL_ADDRESS)")?;
        let credential = required(credential, "sender credential (GMAIL_APP_PASSWORD)")?;
        let recipients = parse_recipients(&required(recipients, "recipient list (KINDLE_EMAILS)")?)?;

        if !is_address(&sender) {
            return Err(LinkpressError::ConfigError(format!("malformed sender address: {}", sender)));
        }

        Ok(Self { sender, credential, recipients })
    }

    pub fn sender(&self) -> &str {
        &self.sender
    }

    pub fn credential(&self) -> &str {
        &self.credential
    }

    pub fn recipients(&self) -> &[String] {
        &self.recipients
    }
}

fn required(value: Option<&str>, what: &str) -> Result<String> {
    match value.map(str::trim) {
        Some(value) if !value.is_empty() => Ok(value.to_string()),
        _ => Err(LinkpressError::ConfigError(format!("missing {}", what))),
    }
}

/// Splits a comma-separated recipient list.
pub fn parse_recipients(list: &str) -> Result<Vec<String>> {
    let recipients: Vec<String> =
        list.split(',').map(str::trim).filter(|s| !s.is_empty()).map(str::to_string).collect();

    if recipients.is_empty() {
        return Err(LinkpressError::ConfigError("recipient list is empty".to_string()));
    }
    if let Some(bad) = recipients.iter().find(|r| !is_address(r)) {
        return Err(LinkpressError::ConfigError(format!("malformed recipient address: {}", bad)));
    }
    Ok(recipients)
}

fn is_address(value: &str) -> bool {
    match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty() && !domain.is_empty() && !domain.contains('@') && !value.contains(char::is_whitespace)
        }
        None => false,
    }
}

/// Delivers a document file to a list of recipients in one attempt.
pub trait Dispatcher {
    fn dispatch(&self, document: &Path, recipients: &[String]) -> Result<()>;
}

/// File name and stem of a document about to be delivered.
struct Outgoing {
    file_name: String,
    stem: String,
}

impl Outgoing {
    /// Checks the delivery preconditions shared by every dispatcher.
    fn prepare(document: &Path, recipients: &[String]) -> Result<Self> {
        if recipients.is_empty() {
            return Err(LinkpressError::ConfigError("no recipients to deliver to".to_string()));
        }
        if !document.is_file() {
            return Err(LinkpressError::DeliveryFailed(format!("document not found: {}", document.display())));
        }

        let file_name = document
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| LinkpressError::DeliveryFailed(format!("not a file: {}", document.display())))?;
        let stem = document.file_stem().map(|s| s.to_string_lossy().into_owned()).unwrap_or_else(|| file_name.clone());
        Ok(Self { file_name, stem })
    }

    /// `HN Daily - <file stem>`
    fn subject(&self) -> String {
        format!("HN Daily - {}", self.stem)
    }
}
