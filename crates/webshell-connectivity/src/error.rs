//! Connectivity error types

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConnectivityError {
    #[error("Probe failed ({kind}): {message}")]
    Probe {
        kind: ProbeErrorKind,
        message: String,
    },

    #[error("Invalid probe URL: {0}")]
    InvalidUrl(String),

    #[error("Probe client error: {0}")]
    Client(String),

    #[error("Network status unavailable: {0}")]
    Unavailable(String),
}

/// Coarse classification of a failed reachability probe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeErrorKind {
    Timeout,
    Connect,
    Dns,
    Tls,
    Request,
    Unknown,
}

impl ProbeErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProbeErrorKind::Timeout => "timeout",
            ProbeErrorKind::Connect => "connect",
            ProbeErrorKind::Dns => "dns",
            ProbeErrorKind::Tls => "tls",
            ProbeErrorKind::Request => "request",
            ProbeErrorKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for ProbeErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
