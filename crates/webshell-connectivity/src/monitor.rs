//! Connectivity monitor
//!
//! Level-triggered: every check reports the current state, and the caller
//! compares it with what it saw last time via `ConnectivityChange::between`.

use std::sync::Arc;
use tokio::sync::watch;

use crate::status::NetworkStatus;

/// Edge between two consecutive connectivity observations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectivityChange {
    Unchanged,
    Lost,
    Regained,
}

impl ConnectivityChange {
    pub fn between(previous: bool, current: bool) -> Self {
        match (previous, current) {
            (true, false) => ConnectivityChange::Lost,
            (false, true) => ConnectivityChange::Regained,
            _ => ConnectivityChange::Unchanged,
        }
    }
}

#[derive(Clone)]
pub struct ConnectivityMonitor {
    status: Arc<dyn NetworkStatus>,
}

impl ConnectivityMonitor {
    pub fn new(status: Arc<dyn NetworkStatus>) -> Self {
        Self { status }
    }

    /// Query the collaborator once. Errors count as disconnected.
    pub async fn check_now(&self) -> bool {
        match self.status.network_state().await {
            Ok(state) => {
                let connected = state.is_online();
                tracing::trace!(connected, "Connectivity check");
                connected
            }
            Err(e) => {
                tracing::warn!(error = %e, "Connectivity check failed, assuming offline");
                false
            }
        }
    }

    /// Push channel, when the collaborator offers one
    pub fn subscribe(&self) -> Option<watch::Receiver<bool>> {
        self.status.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::StaticStatus;

    #[test]
    fn test_change_detection() {
        assert_eq!(
            ConnectivityChange::between(true, false),
            ConnectivityChange::Lost
        );
        assert_eq!(
            ConnectivityChange::between(false, true),
            ConnectivityChange::Regained
        );
        assert_eq!(
            ConnectivityChange::between(true, true),
            ConnectivityChange::Unchanged
        );
        assert_eq!(
            ConnectivityChange::between(false, false),
            ConnectivityChange::Unchanged
        );
    }

    #[tokio::test]
    async fn test_check_now() {
        let status = StaticStatus::new(true);
        let monitor = ConnectivityMonitor::new(Arc::new(status.clone()));
        assert!(monitor.check_now().await);

        status.set_connected(false);
        assert!(!monitor.check_now().await);
    }

    #[tokio::test]
    async fn test_collaborator_error_is_offline() {
        let status = StaticStatus::new(true);
        status.set_unavailable();
        let monitor = ConnectivityMonitor::new(Arc::new(status));
        assert!(!monitor.check_now().await);
    }
}
