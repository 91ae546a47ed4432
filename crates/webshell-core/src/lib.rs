//! WebShell Core
//!
//! Wires the connectivity monitor, navigation tracker and resilience state
//! machine into one event-serialized runtime. The presentation layer only
//! reads snapshots and sends user actions through a `ShellHandle`.

mod config;
mod error;
mod events;
mod runtime;
mod timers;

pub use config::{ShellConfig, DEFAULT_HOME_URL};
pub use error::CoreError;
pub use events::{NoticeBus, ShellNotice};
pub use runtime::{Shell, ShellHandle};

// Re-export the pieces hosts need to talk to the shell
pub use webshell_connectivity::{
    ConnectivityError, HttpProbe, NetworkState, NetworkStatus, StaticStatus,
};
pub use webshell_navigation::{should_allow_load, HomeScope, NavigationError, NavigationEvent};
pub use webshell_session::{
    AlertChoice, BrowserSurface, ErrorAlert, Fault, LoadFailure, RecordingSurface, ScreenState,
    SessionSnapshot, SurfaceCommand,
};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// Logs go to stderr so hosts can keep stdout for their own output.
pub fn init_logging() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
