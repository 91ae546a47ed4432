//! Resilience state machine
//!
//! Transition rules, first match wins:
//! ```text
//! not connected                       -> Offline
//! load error                          -> Error    (alert: Retry | Go Home)
//! load start                          -> Loading  (error cleared)
//! load end                            -> Browsing
//! connectivity regained with an error -> retry()
//! ```
//!
//! The machine never sleeps. Anything that has to happen later is returned
//! as a `Directive` and the runtime feeds the matching signal back in when
//! the time comes.

use std::sync::Arc;

use webshell_connectivity::ConnectivityChange;
use webshell_navigation::{HomeScope, NavigationEvent, NavigationOutcome, NavigationTracker};

use crate::back::BackAction;
use crate::fault::{ErrorAlert, Fault, LoadFailure};
use crate::session::Session;
use crate::state::ScreenState;
use crate::surface::BrowserSurface;

/// Follow-up work for the runtime
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Directive {
    /// Ask the user to pick Retry or Go Home
    PresentAlert(ErrorAlert),
    /// Deliver `on_refresh_elapsed(generation)` after the refresh debounce
    ScheduleRefreshClear { generation: u64 },
    /// Deliver `on_drift_elapsed(url)` after the drift watchdog delay
    ArmDriftWatchdog { url: String },
    /// Something went wrong and was handled
    Report(Fault),
}

pub struct ResilienceMachine {
    session: Session,
    tracker: NavigationTracker,
    surface: Arc<dyn BrowserSurface>,
    /// Bumped on every retry so only the latest debounce clears the flag
    refresh_generation: u64,
}

impl ResilienceMachine {
    pub fn new(tracker: NavigationTracker, surface: Arc<dyn BrowserSurface>) -> Self {
        let session = Session::new(tracker.initial_state());

        tracing::debug!(
            session_id = %session.id,
            home = %tracker.scope().home_url(),
            "Session created"
        );

        Self {
            session,
            tracker,
            surface,
            refresh_generation: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn screen(&self) -> ScreenState {
        self.session.screen()
    }

    pub fn scope(&self) -> &HomeScope {
        self.tracker.scope()
    }

    /// Apply a connectivity observation
    pub fn on_connectivity(&mut self, connected: bool) -> Vec<Directive> {
        let change = ConnectivityChange::between(self.session.is_connected, connected);
        let mut directives = Vec::new();

        match change {
            ConnectivityChange::Unchanged => return directives,
            ConnectivityChange::Lost => {
                self.transition(|s| s.is_connected = false);
                tracing::info!(session_id = %self.session.id, "Connectivity lost");
                directives.push(Directive::Report(Fault::ConnectivityLost));
            }
            ConnectivityChange::Regained => {
                self.transition(|s| s.is_connected = true);
                tracing::info!(
                    session_id = %self.session.id,
                    has_error = self.session.has_error,
                    "Connectivity regained"
                );
                if self.session.has_error {
                    directives.extend(self.retry());
                }
            }
        }

        directives
    }

    pub fn on_load_start(&mut self) {
        self.transition(|s| {
            s.is_loading = true;
            s.has_error = false;
        });
    }

    pub fn on_load_end(&mut self) {
        self.transition(|s| s.is_loading = false);
    }

    pub fn on_load_error(&mut self, failure: LoadFailure) -> Vec<Directive> {
        tracing::warn!(
            session_id = %self.session.id,
            url = failure.url.as_deref().unwrap_or(self.session.current_url()),
            description = %failure.description,
            "Surface reported a load error"
        );

        self.transition(|s| {
            s.is_loading = false;
            s.has_error = true;
        });

        let mut directives = vec![Directive::Report(Fault::LoadFailure(failure))];

        // Offline already explains the failure; don't stack an alert on top
        if self.session.is_connected {
            directives.push(Directive::PresentAlert(ErrorAlert::load_failed()));
        }

        directives
    }

    pub fn on_navigate(&mut self, event: NavigationEvent) -> Vec<Directive> {
        let outcome = self.tracker.on_navigate(&mut self.session.navigation, &event);
        self.session.touch();

        match outcome {
            NavigationOutcome::InScope => Vec::new(),
            NavigationOutcome::Drifted => vec![Directive::ArmDriftWatchdog { url: event.url }],
        }
    }

    /// The drift watchdog armed for `url` has expired.
    ///
    /// Some off-domain pages fail without the surface ever reporting it, so
    /// an error seen by now is taken as that page's failure.
    pub fn on_drift_elapsed(&mut self, url: &str) -> Vec<Directive> {
        if !self.session.has_error {
            tracing::debug!(session_id = %self.session.id, url = %url, "Drift watchdog: no failure");
            return Vec::new();
        }

        tracing::info!(
            session_id = %self.session.id,
            url = %url,
            "Drift watchdog: off-domain failure, returning home"
        );
        self.go_home();

        vec![Directive::Report(Fault::SilentOffDomainFailure {
            url: url.to_string(),
        })]
    }

    pub fn on_splash_elapsed(&mut self) {
        if self.session.splash_visible {
            self.transition(|s| s.splash_visible = false);
        }
    }

    /// Reload the current resource on user request.
    ///
    /// `is_refreshing` is cleared by the debounce timer, not by the reload
    /// finishing.
    pub fn retry(&mut self) -> Vec<Directive> {
        self.transition(|s| {
            s.is_refreshing = true;
            s.has_error = false;
        });
        self.surface.reload();

        self.refresh_generation += 1;
        tracing::info!(
            session_id = %self.session.id,
            url = %self.session.current_url(),
            generation = self.refresh_generation,
            "Retrying"
        );

        vec![Directive::ScheduleRefreshClear {
            generation: self.refresh_generation,
        }]
    }

    pub fn on_refresh_elapsed(&mut self, generation: u64) {
        if generation == self.refresh_generation && self.session.is_refreshing {
            self.transition(|s| s.is_refreshing = false);
        }
    }

    /// Load the home resource. Returns false when already home without an
    /// error, in which case nothing happens.
    pub fn go_home(&mut self) -> bool {
        let at_home = self.tracker.scope().is_home(self.session.current_url());
        if at_home && !self.session.has_error {
            tracing::debug!(session_id = %self.session.id, "Already home");
            return false;
        }

        let home = self.tracker.scope().home_url().to_string();
        tracing::info!(
            session_id = %self.session.id,
            from = %self.session.current_url(),
            "Navigating home"
        );

        self.transition(|s| {
            s.navigation.current_url = home.clone();
            s.has_error = false;
        });
        self.surface.load(&home);

        true
    }

    /// Hardware back press. Returns whether it was handled.
    pub fn on_back_pressed(&mut self) -> bool {
        let action = BackAction::resolve(&self.session, self.tracker.scope());
        tracing::debug!(session_id = %self.session.id, ?action, "Back pressed");

        match action {
            BackAction::History => self.surface.go_back(),
            BackAction::GoHome => {
                self.go_home();
            }
            BackAction::Propagate => {}
        }

        action.is_handled()
    }

    fn transition<F>(&mut self, mutate: F)
    where
        F: FnOnce(&mut Session),
    {
        let from = self.session.screen();
        mutate(&mut self.session);
        self.session.touch();

        let to = self.session.screen();
        if from != to {
            tracing::debug!(
                session_id = %self.session.id,
                from = %from,
                to = %to,
                "Screen state transition"
            );
        }
    }
}
