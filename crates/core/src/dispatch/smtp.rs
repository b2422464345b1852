use std::fs;
use std::path::Path;
use std::time::Duration;

use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};

use super::{DispatchConfig, Dispatcher, MESSAGE_BODY, Outgoing};
use crate::{LinkpressError, Result};

pub const GMAIL_RELAY: &str = "smtp.gmail.com";

/// Mail submission port, upgraded with STARTTLS.
pub const SUBMISSION_PORT: u16 = 587;

pub const EPUB_MEDIA_TYPE: &str = "application/epub+zip";

const DEFAULT_SMTP_TIMEOUT_SECS: u64 = 60;

/// How the connection to the relay is secured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Security {
    /// STARTTLS upgrade, then login with the configured credential
    StartTls,
    /// Unencrypted and unauthenticated, for a relay on the local host
    Plain,
}

/// Mails the document as an attachment through an SMTP relay.
///
/// Defaults to Gmail's submission endpoint with STARTTLS, logging in as the
/// sender with the configured app password.
#[derive(Debug, Clone)]
pub struct SmtpDispatcher {
    config: DispatchConfig,
    host: String,
    port: u16,
    security: Security,
    timeout: Duration,
}

impl SmtpDispatcher {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            config,
            host: GMAIL_RELAY.to_string(),
            port: SUBMISSION_PORT,
            security: Security::StartTls,
            timeout: Duration::from_secs(DEFAULT_SMTP_TIMEOUT_SECS),
        }
    }

    pub fn with_relay(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn with_security(mut self, security: Security) -> Self {
        self.security = security;
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = Duration::from_secs(seconds);
        self
    }

    pub fn config(&self) -> &DispatchConfig {
        &self.config
    }

    /// Dispatches to the configured recipients.
    pub fn send(&self, document: &Path) -> Result<()> {
        self.dispatch(document, self.config.recipients())
    }

    /// Builds the multipart message: a short text part plus the document.
    pub fn build_message(&self, document: &Path, recipients: &[String]) -> Result<Message> {
        let outgoing = Outgoing::prepare(document, recipients)?;
        let bytes = fs::read(document).map_err(|e| LinkpressError::DeliveryFailed(e.to_string()))?;

        let mut builder = Message::builder().from(mailbox(self.config.sender(), "sender")?).subject(outgoing.subject());
        for recipient in recipients {
            builder = builder.to(mailbox(recipient, "recipient")?);
        }

        let content_type =
            ContentType::parse(EPUB_MEDIA_TYPE).map_err(|e| LinkpressError::DeliveryFailed(e.to_string()))?;
        let attachment = Attachment::new(outgoing.file_name).body(bytes, content_type);

        builder
            .multipart(MultiPart::mixed().singlepart(SinglePart::plain(MESSAGE_BODY.to_string())).singlepart(attachment))
            .map_err(|e| LinkpressError::DeliveryFailed(format!("failed to build message: {}", e)))
    }

    fn transport(&self) -> Result<SmtpTransport> {
        let builder = match self.security {
            Security::StartTls => SmtpTransport::starttls_relay(&self.host)
                .map_err(|e| LinkpressError::DeliveryFailed(format!("cannot reach {}: {}", self.host, e)))?
                .credentials(Credentials::new(self.config.sender().to_string(), self.config.credential().to_string())),
            Security::Plain => SmtpTransport::builder_dangerous(&self.host),
        };
        Ok(builder.port(self.port).timeout(Some(self.timeout)).build())
    }
}

fn mailbox(address: &str, role: &str) -> Result<Mailbox> {
    address
        .parse()
        .map_err(|e| LinkpressError::ConfigError(format!("malformed {} address {}: {}", role, address, e)))
}

impl Dispatcher for SmtpDispatcher {
    fn dispatch(&self, document: &Path, recipients: &[String]) -> Result<()> {
        let message = self.build_message(document, recipients)?;

        self.transport()?.send(&message).map_err(|e| {
            LinkpressError::DeliveryFailed(format!("SMTP delivery via {}:{} failed: {}", self.host, self.port, e))
        })?;

        tracing::info!(
            document = %document.display(),
            relay = %self.host,
            recipients = recipients.len(),
            "document mailed"
        );
        Ok(())
    }
}
