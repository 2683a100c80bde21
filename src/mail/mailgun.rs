use std::time::Duration;

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;

use super::{EmailTransport, OutgoingEmail};
use crate::error::{AppError, Result};

const DEFAULT_BASE_URL: &str = "https://api.mailgun.net";

/// Upper bound on one send, connection time included.
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Hosted-API transport for Mailgun's messages endpoint.
#[derive(Clone)]
pub struct MailgunMailer {
    client: Client,
    base_url: String,
    domain: String,
    api_key: String,
    sender: String,
}

impl MailgunMailer {
    pub fn new(
        domain: impl Into<String>,
        api_key: impl Into<String>,
        sender: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: DEFAULT_BASE_URL.to_string(),
            domain: domain.into(),
            api_key: api_key.into(),
            sender: sender.into(),
        }
    }

    /// Point the mailer at a different API host (tests).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    #[serde(default)]
    id: String,
}

#[async_trait]
impl EmailTransport for MailgunMailer {
    async fn send(&self, email: &OutgoingEmail<'_>) -> Result<String> {
        let primary = email
            .recipients
            .first()
            .ok_or_else(|| AppError::Transport("no recipients".to_string()))?;

        let mut form = Form::new()
            .text("from", self.sender.clone())
            .text("to", primary.clone())
            .text("subject", email.subject.to_string())
            .text("text", email.body.to_string());

        if email.is_html {
            form = form.text("html", email.body.to_string());
        }

        // Every recipient lands on CC, the primary included, so all
        // recipients are visible to each other.
        for recipient in email.recipients {
            form = form.text("cc", recipient.clone());
        }

        if let Some(path) = email.attachment {
            let bytes = tokio::fs::read(path).await?;
            let file_name = path
                .file_name()
                .and_then(|name| name.to_str())
                .unwrap_or("invite.ics")
                .to_string();
            let part = Part::bytes(bytes)
                .file_name(file_name)
                .mime_str("text/calendar")?;
            form = form.part("attachment", part);
        }

        let url = format!("{}/v3/{}/messages", self.base_url, self.domain);
        let response = self
            .client
            .post(&url)
            .basic_auth("api", Some(&self.api_key))
            .multipart(form)
            .timeout(SEND_TIMEOUT)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Transport(format!(
                "mailgun returned {}: {}",
                status, body
            )));
        }

        let parsed: SendResponse = response.json().await?;
        Ok(parsed.id)
    }
}
