use std::sync::Arc;

use crate::config::Config;
use crate::invite::InviteService;

/// Shared application state
///
/// `invites` is `None` when the mail transport could not be wired at startup;
/// the service still runs so the healthcheck can report what is missing.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub invites: Option<Arc<InviteService>>,
}

impl AppState {
    pub fn new(config: Config, invites: Option<InviteService>) -> Self {
        Self {
            config: Arc::new(config),
            invites: invites.map(Arc::new),
        }
    }
}
