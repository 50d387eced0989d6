use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use uuid::Uuid;

use crate::config::SmtpConfig;
use crate::plugins::traits::{Notifier, Receipt};
use crate::utils::error::NotifyError;

/// Mails announcements to the subscriber list and operator reports to a
/// single operator address.
pub struct EmailNotifier {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    subscribers: Vec<Mailbox>,
    operator: Option<Mailbox>,
}

impl EmailNotifier {
    pub fn from_config(config: &SmtpConfig) -> Result<Self, NotifyError> {
        let (Some(username), Some(password)) = (&config.username, &config.password) else {
            return Err(NotifyError::NotConfigured("SMTP username/password".to_string()));
        };
        let from_address = config
            .from_address
            .as_deref()
            .ok_or_else(|| NotifyError::NotConfigured("SMTP from_address".to_string()))?;
        if config.subscribers.is_empty() {
            return Err(NotifyError::NotConfigured("SMTP subscribers".to_string()));
        }

        let from: Mailbox = format!("{} <{}>", config.from_name, from_address).parse()?;
        let subscribers = config
            .subscribers
            .iter()
            .map(|address| address.parse::<Mailbox>())
            .collect::<Result<Vec<_>, _>>()?;
        let operator = config
            .operator_address
            .as_deref()
            .map(|address| address.parse::<Mailbox>())
            .transpose()?;

        let credentials = Credentials::new(username.clone(), password.clone());
        let mailer = if config.use_tls {
            AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)?
        } else {
            AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&config.host)
        }
        .port(config.port)
        .credentials(credentials)
        .timeout(Some(config.timeout()))
        .build();

        Ok(EmailNotifier {
            mailer,
            from,
            subscribers,
            operator,
        })
    }

    fn build_message(&self, to: &[Mailbox], subject: &str, body: &str) -> Result<Message, NotifyError> {
        let mut builder = Message::builder().from(self.from.clone()).subject(subject);
        for recipient in to {
            builder = builder.to(recipient.clone());
        }

        Ok(builder
            .header(ContentType::TEXT_PLAIN)
            .body(body.to_string())?)
    }

    async fn send(&self, to: &[Mailbox], subject: &str, body: &str) -> Result<Receipt, NotifyError> {
        let email = self.build_message(to, subject, body)?;
        self.mailer.send(email).await?;
        Ok(Receipt::new(format!("email-{}", Uuid::new_v4())))
    }
}

/// First line of the message, used as the mail subject.
fn subject_line(message: &str) -> &str {
    message.lines().next().unwrap_or(message)
}

#[async_trait]
impl Notifier for EmailNotifier {
    fn name(&self) -> &'static str {
        "email"
    }

    async fn publish(&self, message: &str) -> Result<Receipt, NotifyError> {
        self.send(&self.subscribers, subject_line(message), message).await
    }

    async fn notify_operator(&self, message: &str) -> Result<Receipt, NotifyError> {
        let operator = self
            .operator
            .as_ref()
            .ok_or_else(|| NotifyError::NotConfigured("SMTP operator_address".to_string()))?;
        let subject = format!("[restock-watcher] {}", subject_line(message));
        self.send(std::slice::from_ref(operator), &subject, message).await
    }
}
