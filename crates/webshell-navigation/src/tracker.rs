//! Navigation tracker
//!
//! The surface reports every navigation. The tracker keeps only the latest
//! URL and the one-level "can go back" flag.

use serde::{Deserialize, Serialize};

use crate::event::NavigationEvent;
use crate::scope::HomeScope;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavigationState {
    pub current_url: String,
    pub can_go_back: bool,
}

/// What a navigation means for the rest of the shell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavigationOutcome {
    /// Still on the home domain (or a blank placeholder)
    InScope,
    /// Left the home domain; silent failures there must be watched for
    Drifted,
}

#[derive(Debug, Clone)]
pub struct NavigationTracker {
    scope: HomeScope,
}

impl NavigationTracker {
    pub fn new(scope: HomeScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> &HomeScope {
        &self.scope
    }

    /// State before the surface has reported anything
    pub fn initial_state(&self) -> NavigationState {
        NavigationState {
            current_url: self.scope.home_url().to_string(),
            can_go_back: false,
        }
    }

    pub fn on_navigate(
        &self,
        state: &mut NavigationState,
        event: &NavigationEvent,
    ) -> NavigationOutcome {
        state.current_url = event.url.clone();
        state.can_go_back = event.can_go_back;

        if self.scope.is_drift(&event.url) {
            tracing::debug!(url = %event.url, "Navigation left the home domain");
            NavigationOutcome::Drifted
        } else {
            NavigationOutcome::InScope
        }
    }
}
