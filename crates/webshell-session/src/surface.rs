//! Embedded browser surface handle
//!
//! The state machine owns the only handle; nothing reaches the surface
//! through global state.

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Commands the core issues to the embedded browser
pub trait BrowserSurface: Send + Sync {
    /// Navigate to `url`
    fn load(&self, url: &str);

    /// Reload whatever is currently shown
    fn reload(&self);

    /// Pop one entry off the surface's own history
    fn go_back(&self);
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "command", content = "url", rename_all = "snake_case")]
pub enum SurfaceCommand {
    Load(String),
    Reload,
    GoBack,
}

/// Surface that only remembers what it was told
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    commands: Arc<Mutex<Vec<SurfaceCommand>>>,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> Vec<SurfaceCommand> {
        self.commands.lock().clone()
    }

    pub fn reload_count(&self) -> usize {
        self.commands
            .lock()
            .iter()
            .filter(|c| **c == SurfaceCommand::Reload)
            .count()
    }
}

impl BrowserSurface for RecordingSurface {
    fn load(&self, url: &str) {
        self.commands.lock().push(SurfaceCommand::Load(url.to_string()));
    }

    fn reload(&self) {
        self.commands.lock().push(SurfaceCommand::Reload);
    }

    fn go_back(&self) {
        self.commands.lock().push(SurfaceCommand::GoBack);
    }
}
