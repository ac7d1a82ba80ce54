use lettre::{
    address::AddressError,
    message::{header::ContentType, Attachment, Mailbox, MultiPart, SinglePart},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use slotbook_common::services::{BoxFuture, EmailMessage, NotificationResult, NotificationService};
use slotbook_config::SmtpConfig;
use thiserror::Error;
use tracing::{debug, info};

/// SMTP-specific error types.
#[derive(Error, Debug)]
pub enum SmtpError {
    /// An address in the message could not be parsed
    #[error("Invalid email address: {0}")]
    Address(#[from] AddressError),

    /// The attachment content type could not be parsed
    #[error("Invalid attachment content type: {0}")]
    ContentType(String),

    /// The message could not be assembled
    #[error("Failed to build email: {0}")]
    Build(#[from] lettre::error::Error),

    /// The relay rejected the message or could not be reached
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),
}

/// Sends mail through a STARTTLS relay.
pub struct SmtpNotificationService {
    mailer: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
}

impl SmtpNotificationService {
    /// Builds the transport. No connection is made until the first send.
    pub fn new(config: &SmtpConfig) -> Result<Self, SmtpError> {
        let mailer = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&config.host)?
            .port(config.port)
            .credentials(Credentials::new(
                config.username.clone(),
                config.password.clone(),
            ))
            .build();

        let from = Mailbox::new(config.from_name.clone(), config.from_address.parse()?);

        Ok(Self { mailer, from })
    }

    /// Assembles the MIME message: the body (plain, or plain plus HTML alternative) and
    /// the optional attachment.
    pub fn build_message(&self, email: EmailMessage) -> Result<Message, SmtpError> {
        let mut builder = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse()?)
            .subject(email.subject);

        if let Some(reply_to) = email.reply_to {
            builder = builder.reply_to(reply_to.parse()?);
        }

        let attachment = match email.attachment {
            Some(attachment) => {
                let content_type = ContentType::parse(&attachment.content_type)
                    .map_err(|e| SmtpError::ContentType(e.to_string()))?;
                Some(Attachment::new(attachment.filename).body(attachment.content, content_type))
            }
            None => None,
        };

        let message = match (email.html_body, attachment) {
            (None, None) => builder.singlepart(SinglePart::plain(email.body))?,
            (None, Some(attachment)) => builder.multipart(
                MultiPart::mixed()
                    .singlepart(SinglePart::plain(email.body))
                    .singlepart(attachment),
            )?,
            (Some(html), None) => {
                builder.multipart(MultiPart::alternative_plain_html(email.body, html))?
            }
            (Some(html), Some(attachment)) => builder.multipart(
                MultiPart::mixed()
                    .multipart(MultiPart::alternative_plain_html(email.body, html))
                    .singlepart(attachment),
            )?,
        };
        Ok(message)
    }
}

impl NotificationService for SmtpNotificationService {
    type Error = SmtpError;

    fn send_email(&self, message: EmailMessage) -> BoxFuture<'_, NotificationResult, Self::Error> {
        Box::pin(async move {
            let to = message.to.clone();
            let email = self.build_message(message)?;
            debug!("Sending email to {}", to);

            let response = self.mailer.send(email).await?;
            info!("Email to {} accepted by relay ({})", to, response.code());

            let id = response.message().next().map(str::to_string);
            let status = response.code().to_string();
            Ok(NotificationResult { id, status })
        })
    }
}
