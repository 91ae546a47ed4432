//! Navigation error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum NavigationError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Unsupported home scheme: {0}")]
    UnsupportedScheme(String),
}
