//! Navigation events emitted by the embedded browser surface

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NavigationEvent {
    /// URL the surface now shows
    pub url: String,
    /// Whether the surface has an entry to go back to
    pub can_go_back: bool,
    /// Page title, when the surface knows it
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub loading: bool,
}

impl NavigationEvent {
    pub fn new(url: impl Into<String>, can_go_back: bool) -> Self {
        Self {
            url: url.into(),
            can_go_back,
            title: None,
            loading: false,
        }
    }
}
