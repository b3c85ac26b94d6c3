//! Transactional email.
//!
//! The transport is picked once from the deployment mode: real SMTP in
//! production, a console stub everywhere else.

pub mod templates;

use crate::config::{Config, SmtpTls};
use crate::error::HubError;
use chrono::Utc;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::{error, info};

pub use templates::{RESET_TOKEN_VALIDITY_MINUTES, reset_link};

#[derive(Clone)]
pub enum Transport {
    Smtp(AsyncSmtpTransport<Tokio1Executor>),
    /// Logs the message instead of sending it.
    Console,
}

impl Transport {
    pub fn name(&self) -> &'static str {
        match self {
            Transport::Smtp(_) => "smtp",
            Transport::Console => "console",
        }
    }
}

#[derive(Clone)]
pub struct Mailer {
    transport: Transport,
    from: Mailbox,
    frontend_url: String,
}

impl Mailer {
    pub fn new(transport: Transport, from: Mailbox, frontend_url: impl Into<String>) -> Self {
        Self {
            transport,
            from,
            frontend_url: frontend_url.into(),
        }
    }

    /// Resolve the transport for the configured deployment mode.
    pub fn from_config(cfg: &Config) -> Result<Self, HubError> {
        let from: Mailbox = cfg.email_from.parse()?;
        let transport = if cfg.is_production() {
            Transport::Smtp(build_smtp_transport(cfg)?)
        } else {
            Transport::Console
        };
        info!(transport = transport.name(), "mailer ready");
        Ok(Self::new(transport, from, cfg.frontend_url.clone()))
    }

    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Send the password reset message and return the transport's message id.
    pub async fn send_password_reset_email(
        &self,
        to: &str,
        reset_token: &str,
        display_name: &str,
    ) -> Result<String, HubError> {
        let recipient = Mailbox::new(Some(display_name.to_string()), to.parse()?);
        let link = reset_link(&self.frontend_url, reset_token);
        let text = templates::password_reset_text(display_name, &link);

        match &self.transport {
            Transport::Console => {
                info!(
                    to = %recipient,
                    subject = templates::PASSWORD_RESET_SUBJECT,
                    link = %link,
                    "email not sent (development mode):\n{}",
                    text
                );
                Ok(format!("console-{}", Utc::now().timestamp_millis()))
            }
            Transport::Smtp(smtp) => {
                let message = Message::builder()
                    .from(self.from.clone())
                    .to(recipient)
                    .subject(templates::PASSWORD_RESET_SUBJECT)
                    .multipart(MultiPart::alternative_plain_html(
                        text,
                        templates::password_reset_html(display_name, &link),
                    ))?;

                let response = smtp.send(message).await.inspect_err(|e| {
                    error!(to = %to, error = %e, "password reset email rejected");
                })?;
                let message_id = response
                    .message()
                    .next()
                    .map(str::to_string)
                    .unwrap_or_else(|| response.code().to_string());
                info!(to = %to, message_id = %message_id, "password reset email sent");
                Ok(message_id)
            }
        }
    }
}

fn build_smtp_transport(cfg: &Config) -> Result<AsyncSmtpTransport<Tokio1Executor>, HubError> {
    let host = cfg
        .smtp_host
        .as_deref()
        .ok_or_else(|| HubError::InvalidEnv {
            key: "SMTP_HOST".to_string(),
            reason: "required in production mode".to_string(),
        })?;

    let mut builder = match cfg.smtp_tls() {
        SmtpTls::Implicit => AsyncSmtpTransport::<Tokio1Executor>::relay(host)?,
        SmtpTls::StartTls => AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?,
        SmtpTls::Plain => AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(host),
    }
    .port(cfg.smtp_port);

    if let (Some(user), Some(pass)) = (cfg.smtp_user.as_ref(), cfg.smtp_pass.as_ref()) {
        builder = builder.credentials(Credentials::new(user.clone(), pass.clone()));
    }

    Ok(builder.build())
}
