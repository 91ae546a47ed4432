//! Events flowing into the shell loop and notices flowing out

use serde::{Deserialize, Serialize};
use tokio::sync::{broadcast, oneshot};

use webshell_navigation::NavigationEvent;
use webshell_session::{ErrorAlert, Fault, LoadFailure};

/// Everything that can change the session, in one queue
#[derive(Debug)]
pub(crate) enum ShellEvent {
    Connectivity(bool),
    CheckConnectivity,
    LoadStarted,
    LoadFinished,
    LoadFailed(LoadFailure),
    Navigated(NavigationEvent),
    Retry,
    GoHome,
    BackPressed(oneshot::Sender<bool>),
    SplashElapsed,
    RefreshElapsed(u64),
    DriftElapsed(String),
    Shutdown,
}

/// Out-of-band output for the presentation layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum ShellNotice {
    /// Show a dialog with the alert's choices
    Alert(ErrorAlert),
    /// A fault was detected and handled
    Fault(Fault),
}

#[derive(Clone)]
pub struct NoticeBus {
    sender: broadcast::Sender<ShellNotice>,
}

impl NoticeBus {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ShellNotice> {
        self.sender.subscribe()
    }

    /// Returns how many subscribers saw the notice
    pub fn publish(&self, notice: ShellNotice) -> usize {
        self.sender.send(notice).unwrap_or(0)
    }
}
