//! Email Notifier Implementations
//!
//! - [`SmtpNotifier`] sends through an SMTP relay with STARTTLS
//! - [`LogNotifier`] only records that a message would have been sent

use lettre::message::{Mailbox, header::ContentType};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use crate::domain::notifier::{EmailNotifier, NotifyError};
use crate::domain::value_object::email::Email;

/// SMTP connection settings
#[derive(Debug, Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub username: String,
    pub password: String,
    /// `From` header, e.g. `Placement Portal <noreply@example.com>`
    pub from: String,
}

#[derive(Clone)]
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings) -> Result<Self, NotifyError> {
        let from: Mailbox = settings
            .from
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::Build(e.to_string()))?;

        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(|e| NotifyError::Build(e.to_string()))?
            .credentials(Credentials::new(settings.username, settings.password))
            .build();

        Ok(Self { transport, from })
    }

    async fn send(&self, to: &Email, subject: &str, html: String) -> Result<(), NotifyError> {
        let to: Mailbox = to
            .as_str()
            .parse()
            .map_err(|e: lettre::address::AddressError| NotifyError::Build(e.to_string()))?;

        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(subject)
            .header(ContentType::TEXT_HTML)
            .body(html)
            .map_err(|e| NotifyError::Build(e.to_string()))?;

        self.transport
            .send(message)
            .await
            .map_err(|e| NotifyError::Delivery(e.to_string()))?;

        Ok(())
    }
}

impl EmailNotifier for SmtpNotifier {
    async fn send_verification_code(
        &self,
        to: &Email,
        name: &str,
        code: &str,
    ) -> Result<(), NotifyError> {
        let html = format!(
            "<p>Hello {},</p>\
             <p>Your verification code is <strong>{}</strong>.</p>\
             <p>It expires in 10 minutes.</p>",
            escape_html(name),
            code
        );
        self.send(to, "Verify your email", html).await?;
        tracing::info!(email = %to, "Verification code sent");
        Ok(())
    }

    async fn send_password_reset(&self, to: &Email, reset_link: &str) -> Result<(), NotifyError> {
        let html = format!(
            "<p>A password reset was requested for your account.</p>\
             <p><a href=\"{0}\">Reset your password</a></p>\
             <p>The link expires in 60 minutes. Ignore this email if you did not ask for it.</p>",
            reset_link
        );
        self.send(to, "Reset your password", html).await?;
        tracing::info!(email = %to, "Password reset link sent");
        Ok(())
    }
}

fn escape_html(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Notifier for environments without SMTP credentials
///
/// With `reveal` set, codes and reset links go to the `debug` log so local
/// accounts can still be verified. Never enable it in production.
#[derive(Debug, Clone, Default)]
pub struct LogNotifier {
    reveal: bool,
}

impl LogNotifier {
    pub fn revealing() -> Self {
        Self { reveal: true }
    }

    pub fn reveals_secrets(&self) -> bool {
        self.reveal
    }
}

impl EmailNotifier for LogNotifier {
    async fn send_verification_code(
        &self,
        to: &Email,
        _name: &str,
        code: &str,
    ) -> Result<(), NotifyError> {
        if self.reveal {
            tracing::debug!(email = %to, code, "SMTP not configured, verification code");
        } else {
            tracing::info!(email = %to, "SMTP not configured, verification email not sent");
        }
        Ok(())
    }

    async fn send_password_reset(&self, to: &Email, reset_link: &str) -> Result<(), NotifyError> {
        if self.reveal {
            tracing::debug!(email = %to, reset_link, "SMTP not configured, password reset link");
        } else {
            tracing::info!(email = %to, "SMTP not configured, password reset email not sent");
        }
        Ok(())
    }
}
