//! Hardware back-action resolution
//!
//! Resolved against the live session at the moment of the press, never a
//! captured copy.

use webshell_navigation::HomeScope;

use crate::session::Session;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackAction {
    /// Let the surface pop its own history
    History,
    /// No history left but not home yet
    GoHome,
    /// Already home with nothing to pop; the platform decides
    Propagate,
}

impl BackAction {
    pub fn resolve(session: &Session, scope: &HomeScope) -> Self {
        if session.can_go_back() {
            BackAction::History
        } else if !scope.is_home(session.current_url()) {
            BackAction::GoHome
        } else {
            BackAction::Propagate
        }
    }

    pub fn is_handled(&self) -> bool {
        !matches!(self, BackAction::Propagate)
    }
}
