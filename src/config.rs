use std::env;

/// Which transport the service sends mail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportKind {
    Mailgun,
    Smtp,
}

impl TransportKind {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "MAILGUN" => Some(TransportKind::Mailgun),
            "SMTP" => Some(TransportKind::Smtp),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct MailgunConfig {
    pub domain: Option<String>,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SmtpConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
}

/// Immutable process configuration, loaded once at startup.
///
/// Mail settings are all optional at load time: the service starts even when
/// incomplete, and `mail_readiness` reports what is missing.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub send_using: Option<String>,
    pub sender_address: Option<String>,
    pub mailgun: MailgunConfig,
    pub smtp: SmtpConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let smtp_port = match env::var("CALENVITE_SVC_SMTP_PORT") {
            Ok(raw) => match raw.parse::<u16>() {
                Ok(port) => Some(port),
                Err(_) => {
                    tracing::warn!(value = %raw, "CALENVITE_SVC_SMTP_PORT is not a valid port, ignoring");
                    None
                }
            },
            Err(_) => None,
        };

        Ok(Config {
            server_host: env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("CALENVITE_SVC_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .map_err(|_| ConfigError::InvalidPort)?,
            send_using: env::var("CALENVITE_SVC_SEND_USING").ok(),
            sender_address: env::var("CALENVITE_SVC_EMAIL_SENDER_ADDRESS").ok(),
            mailgun: MailgunConfig {
                domain: env::var("CALENVITE_SVC_MAILGUN_DOMAIN").ok(),
                api_key: env::var("CALENVITE_SVC_MAILGUN_KEY").ok(),
            },
            smtp: SmtpConfig {
                host: env::var("CALENVITE_SVC_SMTP_HOST").ok(),
                port: smtp_port,
                user: env::var("CALENVITE_SVC_SMTP_USER").ok(),
                password: env::var("CALENVITE_SVC_SMTP_PASSWORD").ok(),
            },
        })
    }

    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }

    /// The selected transport, if `CALENVITE_SVC_SEND_USING` carries a valid value.
    pub fn transport_kind(&self) -> Result<TransportKind, ConfigError> {
        match &self.send_using {
            None => Err(ConfigError::MissingVar("CALENVITE_SVC_SEND_USING")),
            Some(raw) => {
                TransportKind::parse(raw).ok_or_else(|| ConfigError::InvalidSendUsing(raw.clone()))
            }
        }
    }

    /// Checklist for the selected transport plus the global sender address.
    ///
    /// Pure read of the config, no side effects; backs `GET /healthcheck`.
    pub fn mail_readiness(&self) -> Result<(), ConfigError> {
        let kind = self.transport_kind()?;

        match kind {
            TransportKind::Mailgun => {
                require(&self.mailgun.domain, "CALENVITE_SVC_MAILGUN_DOMAIN")?;
                require(&self.mailgun.api_key, "CALENVITE_SVC_MAILGUN_KEY")?;
            }
            TransportKind::Smtp => {
                require(&self.smtp.host, "CALENVITE_SVC_SMTP_HOST")?;
                require(&self.smtp.user, "CALENVITE_SVC_SMTP_USER")?;
                require(&self.smtp.password, "CALENVITE_SVC_SMTP_PASSWORD")?;
                if self.smtp.port.is_none() {
                    return Err(ConfigError::MissingVar("CALENVITE_SVC_SMTP_PORT"));
                }
            }
        }

        require(&self.sender_address, "CALENVITE_SVC_EMAIL_SENDER_ADDRESS")?;

        Ok(())
    }
}

fn require(value: &Option<String>, var: &'static str) -> Result<(), ConfigError> {
    match value {
        Some(v) if !v.is_empty() => Ok(()),
        _ => Err(ConfigError::MissingVar(var)),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid service port")]
    InvalidPort,
    #[error("Env var {0} not set. Check documentation")]
    MissingVar(&'static str),
    #[error("Env var CALENVITE_SVC_SEND_USING value invalid: {0}. Valid values: MAILGUN or SMTP")]
    InvalidSendUsing(String),
}
