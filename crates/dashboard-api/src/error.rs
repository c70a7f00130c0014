//! Dashboard API errors

use thiserror::Error;

/// Errors raised while setting up or using the dashboard API
#[derive(Debug, Error)]
pub enum Error {
    /// Request layer error
    #[error(transparent)]
    Http(#[from] dashboard_http::HttpError),
    /// Settings could not be loaded
    #[error(transparent)]
    Config(#[from] config::ConfigError),
}
