pub mod api;
pub mod calendar;
pub mod config;
pub mod error;
pub mod invite;
pub mod mail;
pub mod models;
pub mod state;
pub mod validate;

pub use config::Config;
pub use error::{AppError, Result};
pub use state::AppState;
