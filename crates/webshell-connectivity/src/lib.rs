//! WebShell Connectivity
//!
//! Reduces whatever the host platform knows about the network to a single
//! `connected` flag:
//! - `NetworkStatus` is the collaborator seam (polled, optionally pushed)
//! - `ConnectivityMonitor` performs checks and treats failures as offline
//! - `HttpProbe` is the default collaborator, a cheap HTTP reachability check

mod error;
mod monitor;
mod probe;
mod status;

pub use error::{ConnectivityError, ProbeErrorKind};
pub use monitor::{ConnectivityChange, ConnectivityMonitor};
pub use probe::HttpProbe;
pub use status::{NetworkState, NetworkStatus, StaticStatus};

pub type Result<T> = std::result::Result<T, ConnectivityError>;
