//! Screen state
//!
//! Derived from the session flags, first match wins:
//! ```text
//! not connected  -> Offline
//! has error      -> Error
//! loading        -> Loading
//! otherwise      -> Browsing
//! ```

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScreenState {
    /// No network; pre-empts everything else
    Offline,
    /// The surface reported a load failure
    Error,
    /// A load is in flight
    Loading,
    /// Page is shown
    Browsing,
}

impl ScreenState {
    pub fn derive(is_connected: bool, has_error: bool, is_loading: bool) -> Self {
        if !is_connected {
            ScreenState::Offline
        } else if has_error {
            ScreenState::Error
        } else if is_loading {
            ScreenState::Loading
        } else {
            ScreenState::Browsing
        }
    }

    /// Whether the surface itself is visible
    pub fn shows_surface(&self) -> bool {
        matches!(self, ScreenState::Loading | ScreenState::Browsing)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ScreenState::Offline => "offline",
            ScreenState::Error => "error",
            ScreenState::Loading => "loading",
            ScreenState::Browsing => "browsing",
        }
    }
}

impl std::fmt::Display for ScreenState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ScreenState {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "offline" => Ok(ScreenState::Offline),
            "error" => Ok(ScreenState::Error),
            "loading" => Ok(ScreenState::Loading),
            "browsing" => Ok(ScreenState::Browsing),
            _ => Err(format!("Unknown screen state: {}", s)),
        }
    }
}
