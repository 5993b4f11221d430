mod config;
mod error;
mod extract;
mod handlers;
mod server;
mod state;

pub use config::{ApiConfig, VariantKind, CONFIG_ENV};
pub use error::ApiError;
pub use extract::{Caller, CALLER_HEADER};
pub use server::create_app;
pub use state::{AppState, Clock, Deployment};
