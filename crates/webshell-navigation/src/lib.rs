//! WebShell Navigation
//!
//! Keeps the embedded surface on the web and notices when it wanders off:
//! 1. `should_allow_load` gates every load attempt by scheme
//! 2. `HomeScope` knows what "home" and "the home domain" are
//! 3. `NavigationTracker` records surface navigations and flags drift

mod error;
mod event;
mod gate;
mod scope;
mod tracker;

pub use error::NavigationError;
pub use event::NavigationEvent;
pub use gate::{scheme_of, should_allow_load};
pub use scope::HomeScope;
pub use tracker::{NavigationOutcome, NavigationState, NavigationTracker};

pub type Result<T> = std::result::Result<T, NavigationError>;
