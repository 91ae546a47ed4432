//! Faults and user-facing alerts
//!
//! None of these are fatal. Each is recovered inside the state machine and
//! reported so hosts can log or display it.

use serde::{Deserialize, Serialize};

/// Details the surface attaches to a load error
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadFailure {
    pub url: Option<String>,
    pub code: Option<i32>,
    pub description: String,
}

impl LoadFailure {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            url: None,
            code: None,
            description: description.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Fault {
    /// Network went away
    ConnectivityLost,
    /// The surface reported a load error
    LoadFailure(LoadFailure),
    /// A non-web scheme was suppressed by the load gate
    NavigationRejected { url: String },
    /// Off-domain page failed and the drift watchdog sent the user home
    SilentOffDomainFailure { url: String },
}

impl Fault {
    /// Whether the user is shown anything for this fault
    pub fn is_user_visible(&self) -> bool {
        matches!(self, Fault::ConnectivityLost | Fault::LoadFailure(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertChoice {
    Retry,
    GoHome,
}

impl AlertChoice {
    pub fn label(&self) -> &'static str {
        match self {
            AlertChoice::Retry => "Retry",
            AlertChoice::GoHome => "Go Home",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorAlert {
    pub title: String,
    pub message: String,
    pub choices: Vec<AlertChoice>,
}

impl ErrorAlert {
    pub fn load_failed() -> Self {
        Self {
            title: "Connection Error".to_string(),
            message: "Unable to load the page. Please check your internet connection and try again."
                .to_string(),
            choices: vec![AlertChoice::Retry, AlertChoice::GoHome],
        }
    }
}
