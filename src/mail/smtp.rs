use std::path::Path;

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::{EmailTransport, OutgoingEmail};
use crate::error::{AppError, Result};

/// Direct SMTP transport: one connect-authenticate-send cycle per email.
/// Delivery waits are bounded by the network stack, not enforced here.
pub struct SmtpMailer {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    sender: String,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        user: String,
        password: String,
        sender: String,
    ) -> Result<Self> {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)?
            .port(port)
            .credentials(Credentials::new(user, password))
            .build();
        Ok(Self { transport, sender })
    }
}

/// Read the attachment into memory, if there is one. Attaching an empty
/// path would fail the send; it means "no attachment" and is skipped.
async fn load_attachment(path: Option<&Path>) -> Result<Option<(String, Vec<u8>)>> {
    match path {
        Some(path) if !path.as_os_str().is_empty() => {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("invite.ics")
                .to_string();
            Ok(Some((file_name, bytes)))
        }
        _ => Ok(None),
    }
}

/// Assemble the MIME message: plain or HTML body, optionally wrapped in a
/// mixed multipart with the calendar attachment.
fn build_message(
    sender: &str,
    email: &OutgoingEmail<'_>,
    attachment: Option<(String, Vec<u8>)>,
) -> Result<Message> {
    let mut builder = Message::builder()
        .from(sender.parse::<Mailbox>()?)
        .subject(email.subject);

    // One To mailbox per recipient; an earlier version of the service
    // only kept the last one.
    for recipient in email.recipients {
        builder = builder.to(recipient.parse::<Mailbox>()?);
    }

    let body_part = if email.is_html {
        SinglePart::html(email.body.to_string())
    } else {
        SinglePart::plain(email.body.to_string())
    };

    let message = match attachment {
        Some((file_name, bytes)) => {
            let content_type = ContentType::parse("text/calendar")
                .map_err(|err| AppError::Transport(err.to_string()))?;
            builder.multipart(
                MultiPart::mixed()
                    .singlepart(body_part)
                    .singlepart(Attachment::new(file_name).body(bytes, content_type)),
            )?
        }
        None => builder.singlepart(body_part)?,
    };

    Ok(message)
}

#[async_trait]
impl EmailTransport for SmtpMailer {
    async fn send(&self, email: &OutgoingEmail<'_>) -> Result<String> {
        let attachment = load_attachment(email.attachment).await?;
        let message = build_message(&self.sender, email, attachment)?;

        let response = self.transport.send(message).await?;
        Ok(response.code().to_string())
    }
}
