//! Network status collaborator

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::watch;

use crate::error::ConnectivityError;
use crate::Result;

/// Raw network state as reported by the host platform
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkState {
    /// `None` when the platform could not determine connectivity
    pub is_connected: Option<bool>,
}

impl NetworkState {
    pub fn connected() -> Self {
        Self {
            is_connected: Some(true),
        }
    }

    pub fn disconnected() -> Self {
        Self {
            is_connected: Some(false),
        }
    }

    /// Unknown counts as offline.
    pub fn is_online(&self) -> bool {
        self.is_connected.unwrap_or(false)
    }
}

/// Source of connectivity information.
///
/// Implementations are polled through `network_state`. Platforms that can
/// push changes also return a receiver from `subscribe`, in which case the
/// shell listens to it instead of polling.
#[async_trait]
pub trait NetworkStatus: Send + Sync {
    async fn network_state(&self) -> Result<NetworkState>;

    fn subscribe(&self) -> Option<watch::Receiver<bool>> {
        None
    }
}

/// In-memory network status that is set by hand.
///
/// Used by headless hosts to simulate connectivity changes.
#[derive(Clone)]
pub struct StaticStatus {
    state: Arc<RwLock<Option<NetworkState>>>,
    push: Option<Arc<watch::Sender<bool>>>,
}

impl StaticStatus {
    pub fn new(connected: bool) -> Self {
        Self {
            state: Arc::new(RwLock::new(Some(Self::state_for(connected)))),
            push: None,
        }
    }

    /// Same as `new`, but also pushes every change to subscribers
    pub fn with_push(connected: bool) -> Self {
        let (sender, _) = watch::channel(connected);
        Self {
            state: Arc::new(RwLock::new(Some(Self::state_for(connected)))),
            push: Some(Arc::new(sender)),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        *self.state.write() = Some(Self::state_for(connected));
        if let Some(push) = &self.push {
            push.send_replace(connected);
        }
    }

    /// Make every subsequent query fail
    pub fn set_unavailable(&self) {
        *self.state.write() = None;
    }

    fn state_for(connected: bool) -> NetworkState {
        if connected {
            NetworkState::connected()
        } else {
            NetworkState::disconnected()
        }
    }
}

#[async_trait]
impl NetworkStatus for StaticStatus {
    async fn network_state(&self) -> Result<NetworkState> {
        (*self.state.read())
            .ok_or_else(|| ConnectivityError::Unavailable("status source offline".to_string()))
    }

    fn subscribe(&self) -> Option<watch::Receiver<bool>> {
        self.push.as_ref().map(|push| push.subscribe())
    }
}
