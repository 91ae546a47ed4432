//! WebShell Session
//!
//! The single browsing session and the state machine that owns it.
//! Connectivity, load lifecycle and navigation signals go in; one of four
//! screen states and a handful of surface commands come out.

mod back;
mod fault;
mod machine;
mod session;
mod state;
mod surface;

pub use back::BackAction;
pub use fault::{AlertChoice, ErrorAlert, Fault, LoadFailure};
pub use machine::{Directive, ResilienceMachine};
pub use session::{Session, SessionSnapshot};
pub use state::ScreenState;
pub use surface::{BrowserSurface, RecordingSurface, SurfaceCommand};
