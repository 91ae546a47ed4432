//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Navigation error: {0}")]
    Navigation(#[from] webshell_navigation::NavigationError),

    #[error("Connectivity error: {0}")]
    Connectivity(#[from] webshell_connectivity::ConnectivityError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse config: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Shell is shutting down")]
    ShuttingDown,
}
