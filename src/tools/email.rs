//! Email sending tool.
//!
//! Submission goes over SMTP with STARTTLS on an explicit host/port,
//! authenticated with a user/app-password pair from the process
//! configuration. The credential check happens before any transport work;
//! an unconfigured tool reports that instead of attempting a connection.

use std::sync::Arc;

use async_trait::async_trait;
use lettre::message::Mailbox;
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Message, SmtpTransport, Transport};
use thiserror::Error;
use tracing::{error, info};

use super::{Tool, ToolContext, wrong_arguments};
use crate::config::{Config, MailCredentials};
use crate::domain::{ToolId, ToolInvocation};

/// SMTP submission host
pub const SMTP_HOST: &str = "smtp.gmail.com";
/// SMTP submission port (STARTTLS)
pub const SMTP_PORT: u16 = 587;

/// Mail failure split by the one category worth distinguishing
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MailError {
    #[error("authentication failed: {0}")]
    Authentication(String),

    #[error("{0}")]
    Transport(String),
}

/// A message ready for submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to: String,
    pub cc: Option<String>,
    pub subject: String,
    pub body: String,
}

/// Seam to the mail submission transport
pub trait MailTransport: Send + Sync {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;
}

/// STARTTLS SMTP submission with credential login
pub struct SmtpStarttlsMailer {
    user: String,
    app_password: String,
}

impl SmtpStarttlsMailer {
    pub fn new(credentials: &MailCredentials) -> Self {
        Self {
            user: credentials.user.clone(),
            app_password: credentials.app_password.clone(),
        }
    }
}

impl MailTransport for SmtpStarttlsMailer {
    fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let from: Mailbox = self
            .user
            .parse()
            .map_err(|err| MailError::Transport(format!("invalid sender address: {err}")))?;
        let to: Mailbox = mail
            .to
            .parse()
            .map_err(|err| MailError::Transport(format!("invalid recipient address: {err}")))?;

        let mut builder = Message::builder()
            .from(from)
            .to(to)
            .subject(mail.subject.clone());
        if let Some(cc) = &mail.cc {
            let cc: Mailbox = cc
                .parse()
                .map_err(|err| MailError::Transport(format!("invalid cc address: {err}")))?;
            builder = builder.cc(cc);
        }
        let message = builder
            .header(ContentType::TEXT_PLAIN)
            .body(mail.body.clone())
            .map_err(|err| MailError::Transport(format!("cannot build message: {err}")))?;

        let transport = SmtpTransport::starttls_relay(SMTP_HOST)
            .map_err(|err| MailError::Transport(format!("cannot open relay: {err}")))?
            .port(SMTP_PORT)
            .credentials(Credentials::new(
                self.user.clone(),
                self.app_password.clone(),
            ))
            .build();

        transport.send(&message).map(|_| ()).map_err(classify)
    }
}

/// Map an SMTP error onto the authentication/transport split.
///
/// Authentication rejections come back as a permanent 535; everything
/// else stays generic.
fn classify(err: lettre::transport::smtp::Error) -> MailError {
    let text = err.to_string();
    let looks_like_auth = text.contains("535") || text.to_lowercase().contains("auth");
    if err.is_permanent() && looks_like_auth {
        MailError::Authentication(text)
    } else {
        MailError::Transport(text)
    }
}

/// Tool that sends an email through the configured transport
pub struct SendEmail {
    transport: Option<Arc<dyn MailTransport>>,
}

impl SendEmail {
    pub fn new(transport: Option<Arc<dyn MailTransport>>) -> Self {
        Self { transport }
    }

    /// Wire the real SMTP transport when credentials are configured
    pub fn from_config(config: &Config) -> Self {
        let transport = config
            .mail
            .as_ref()
            .map(|credentials| Arc::new(SmtpStarttlsMailer::new(credentials)) as Arc<dyn MailTransport>);
        Self::new(transport)
    }

    async fn send(&self, mail: OutgoingMail) -> String {
        let Some(transport) = &self.transport else {
            error!("mail credentials not found");
            return "Email sending failed: mail credentials not configured.".to_string();
        };

        let transport = transport.clone();
        let to = mail.to.clone();
        match tokio::task::spawn_blocking(move || transport.send(&mail)).await {
            Ok(Ok(())) => {
                info!(to = %to, "email sent");
                format!("Email sent successfully to {to}")
            }
            Ok(Err(MailError::Authentication(err))) => {
                error!(to = %to, error = %err, "mail authentication failed");
                "Email sending failed: Authentication error. Check mail credentials.".to_string()
            }
            Ok(Err(MailError::Transport(err))) => {
                error!(to = %to, error = %err, "mail transport failed");
                format!("Email sending failed: {err}")
            }
            Err(err) => {
                error!(to = %to, error = %err, "mail task failed");
                format!("An error occurred while sending email: {err}")
            }
        }
    }
}

#[async_trait]
impl Tool for SendEmail {
    fn id(&self) -> ToolId {
        ToolId::SendEmail
    }

    async fn call(&self, invocation: ToolInvocation, _cx: &ToolContext) -> String {
        match invocation {
            ToolInvocation::SendEmail {
                to,
                subject,
                body,
                cc,
            } => {
                self.send(OutgoingMail {
                    to,
                    cc,
                    subject,
                    body,
                })
                .await
            }
            _ => wrong_arguments(self.id()),
        }
    }
}
