pub mod mailgun;
pub mod smtp;

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, ConfigError, TransportKind};
use crate::error::Result;

/// One outbound email, possibly carrying a calendar attachment.
pub struct OutgoingEmail<'a> {
    pub subject: &'a str,
    pub body: &'a str,
    pub is_html: bool,
    pub recipients: &'a [String],
    pub attachment: Option<&'a Path>,
}

/// Capability shared by the two mail providers.
///
/// Implementations perform a single delivery attempt and surface any failure
/// as a generic transport error; no retries happen at this level.
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Dispatch the email, returning the provider message id.
    async fn send(&self, email: &OutgoingEmail<'_>) -> Result<String>;
}

/// Wire the transport the config selects. Called once at startup; request
/// handling only ever sees the trait object.
pub fn build_transport(config: &Config) -> anyhow::Result<Arc<dyn EmailTransport>> {
    config.mail_readiness()?;

    let sender = config
        .sender_address
        .clone()
        .ok_or(ConfigError::MissingVar("CALENVITE_SVC_EMAIL_SENDER_ADDRESS"))?;

    match config.transport_kind()? {
        TransportKind::Mailgun => {
            let domain = config
                .mailgun
                .domain
                .clone()
                .ok_or(ConfigError::MissingVar("CALENVITE_SVC_MAILGUN_DOMAIN"))?;
            let api_key = config
                .mailgun
                .api_key
                .clone()
                .ok_or(ConfigError::MissingVar("CALENVITE_SVC_MAILGUN_KEY"))?;
            Ok(Arc::new(mailgun::MailgunMailer::new(domain, api_key, sender)))
        }
        TransportKind::Smtp => {
            let host = config
                .smtp
                .host
                .clone()
                .ok_or(ConfigError::MissingVar("CALENVITE_SVC_SMTP_HOST"))?;
            let port = config
                .smtp
                .port
                .ok_or(ConfigError::MissingVar("CALENVITE_SVC_SMTP_PORT"))?;
            let user = config
                .smtp
                .user
                .clone()
                .ok_or(ConfigError::MissingVar("CALENVITE_SVC_SMTP_USER"))?;
            let password = config
                .smtp
                .password
                .clone()
                .ok_or(ConfigError::MissingVar("CALENVITE_SVC_SMTP_PASSWORD"))?;
            Ok(Arc::new(smtp::SmtpMailer::new(
                &host, port, user, password, sender,
            )?))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{MailgunConfig, SmtpConfig};

    #[test]
    fn wires_mailgun_when_selected() {
        let config = Config {
            send_using: Some("MAILGUN".to_string()),
            sender_address: Some("noreply@example.com".to_string()),
            mailgun: MailgunConfig {
                domain: Some("mg.example.com".to_string()),
                api_key: Some("key".to_string()),
            },
            ..Config::default()
        };
        assert!(build_transport(&config).is_ok());
    }

    #[test]
    fn wires_smtp_when_selected() {
        let config = Config {
            send_using: Some("SMTP".to_string()),
            sender_address: Some("noreply@example.com".to_string()),
            smtp: SmtpConfig {
                host: Some("smtp.example.com".to_string()),
                port: Some(587),
                user: Some("mailer".to_string()),
                password: Some("hunter2".to_string()),
            },
            ..Config::default()
        };
        assert!(build_transport(&config).is_ok());
    }

    #[test]
    fn refuses_incomplete_config() {
        let config = Config {
            send_using: Some("MAILGUN".to_string()),
            ..Config::default()
        };
        assert!(build_transport(&config).is_err());
    }
}
