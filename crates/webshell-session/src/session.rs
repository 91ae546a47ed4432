//! Session data structure
//!
//! One session per process. It is created fresh on every start and never
//! persisted. Only `ResilienceMachine` mutates it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use webshell_navigation::NavigationState;

use crate::state::ScreenState;

#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) id: String,
    pub(crate) navigation: NavigationState,
    pub(crate) is_connected: bool,
    pub(crate) is_loading: bool,
    pub(crate) has_error: bool,
    pub(crate) is_refreshing: bool,
    pub(crate) splash_visible: bool,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Session {
    pub(crate) fn new(navigation: NavigationState) -> Self {
        let now = Utc::now();

        Self {
            id: Uuid::new_v4().to_string(),
            navigation,
            is_connected: true,
            is_loading: true,
            has_error: false,
            is_refreshing: false,
            splash_visible: true,
            updated_at: now,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn current_url(&self) -> &str {
        &self.navigation.current_url
    }

    pub fn can_go_back(&self) -> bool {
        self.navigation.can_go_back
    }

    pub fn is_connected(&self) -> bool {
        self.is_connected
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn has_error(&self) -> bool {
        self.has_error
    }

    pub fn is_refreshing(&self) -> bool {
        self.is_refreshing
    }

    pub fn splash_visible(&self) -> bool {
        self.splash_visible
    }

    pub fn screen(&self) -> ScreenState {
        ScreenState::derive(self.is_connected, self.has_error, self.is_loading)
    }

    pub(crate) fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        let screen = self.screen();
        SessionSnapshot {
            screen,
            surface_visible: screen.shows_surface(),
            current_url: self.navigation.current_url.clone(),
            can_go_back: self.navigation.can_go_back,
            is_connected: self.is_connected,
            is_loading: self.is_loading,
            has_error: self.has_error,
            is_refreshing: self.is_refreshing,
            splash_visible: self.splash_visible,
            updated_at: self.updated_at,
        }
    }
}

/// Read model handed to the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub screen: ScreenState,
    /// Whether the web surface is shown rather than a full-screen state
    pub surface_visible: bool,
    pub current_url: String,
    pub can_go_back: bool,
    pub is_connected: bool,
    pub is_loading: bool,
    pub has_error: bool,
    pub is_refreshing: bool,
    pub splash_visible: bool,
    pub updated_at: DateTime<Utc>,
}
