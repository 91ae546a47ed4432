//! Shell runtime
//!
//! One task owns the `ResilienceMachine`. Surface callbacks, user actions,
//! connectivity results and timer expirations are all queued as
//! `ShellEvent`s and applied one at a time, so session mutations never
//! interleave. Readers get published snapshots through a `watch` channel.

use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, oneshot, watch, Notify};
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use webshell_connectivity::{ConnectivityMonitor, NetworkStatus};
use webshell_navigation::{should_allow_load, HomeScope, NavigationEvent, NavigationTracker};
use webshell_session::{
    BrowserSurface, Directive, Fault, LoadFailure, ResilienceMachine, SessionSnapshot,
};

use crate::config::ShellConfig;
use crate::error::CoreError;
use crate::events::{NoticeBus, ShellEvent, ShellNotice};
use crate::timers::TimerSet;
use crate::Result;

const NOTICE_CAPACITY: usize = 64;

pub struct Shell;

impl Shell {
    /// Start the shell on the current tokio runtime.
    ///
    /// Connectivity is checked immediately, then on every poll interval (or
    /// on every push, if the collaborator supports it). Polling resumes if
    /// the push stream ends.
    pub fn start(
        config: ShellConfig,
        network: Arc<dyn NetworkStatus>,
        surface: Arc<dyn BrowserSurface>,
    ) -> Result<ShellHandle> {
        config.validate()?;

        let scope = HomeScope::new(&config.home_url)?;
        let home_host = scope.home_host().to_string();
        let machine = ResilienceMachine::new(NavigationTracker::new(scope), surface);
        let session_id = machine.session().id().to_string();

        let (tx, rx) = mpsc::unbounded_channel();
        let (snapshot_tx, snapshot_rx) = watch::channel(machine.session().snapshot());
        let notices = NoticeBus::new(NOTICE_CAPACITY);
        let monitor = ConnectivityMonitor::new(network);
        let check_requested = Arc::new(Notify::new());

        let mut timers = TimerSet::new();
        timers.spawn(watch_connectivity(
            monitor,
            config.poll_interval(),
            check_requested.clone(),
            tx.clone(),
        ));
        timers.schedule(config.splash_delay(), tx.clone(), ShellEvent::SplashElapsed);

        let event_loop = EventLoop {
            machine,
            check_requested,
            config,
            tx: tx.clone(),
            timers,
            snapshot_tx,
            notices: notices.clone(),
        };
        let task = tokio::spawn(event_loop.run(rx));

        tracing::info!(session_id = %session_id, home = %home_host, "Shell started");

        Ok(ShellHandle {
            inner: Arc::new(HandleInner {
                tx,
                snapshot_rx,
                notices,
                task: Mutex::new(Some(task)),
            }),
        })
    }
}

struct HandleInner {
    tx: mpsc::UnboundedSender<ShellEvent>,
    snapshot_rx: watch::Receiver<SessionSnapshot>,
    notices: NoticeBus,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl Drop for HandleInner {
    fn drop(&mut self) {
        // Last handle gone: stop the loop and its timers
        let _ = self.tx.send(ShellEvent::Shutdown);
    }
}

/// Cheap, cloneable entry point for hosts and the presentation layer
#[derive(Clone)]
pub struct ShellHandle {
    inner: Arc<HandleInner>,
}

impl ShellHandle {
    fn send(&self, event: ShellEvent) -> Result<()> {
        self.inner
            .tx
            .send(event)
            .map_err(|_| CoreError::ShuttingDown)
    }

    pub fn load_started(&self) -> Result<()> {
        self.send(ShellEvent::LoadStarted)
    }

    pub fn load_finished(&self) -> Result<()> {
        self.send(ShellEvent::LoadFinished)
    }

    pub fn load_failed(&self, failure: LoadFailure) -> Result<()> {
        self.send(ShellEvent::LoadFailed(failure))
    }

    pub fn navigation_changed(&self, event: NavigationEvent) -> Result<()> {
        self.send(ShellEvent::Navigated(event))
    }

    pub fn retry(&self) -> Result<()> {
        self.send(ShellEvent::Retry)
    }

    pub fn go_home(&self) -> Result<()> {
        self.send(ShellEvent::GoHome)
    }

    /// Check connectivity now instead of waiting for the next poll
    pub fn check_connectivity(&self) -> Result<()> {
        self.send(ShellEvent::CheckConnectivity)
    }

    /// Hardware back press. `false` means the platform default should run,
    /// which is also the answer once the shell has stopped.
    pub async fn back_pressed(&self) -> bool {
        let (reply_tx, reply_rx) = oneshot::channel();
        if self.send(ShellEvent::BackPressed(reply_tx)).is_err() {
            return false;
        }
        reply_rx.await.unwrap_or(false)
    }

    /// Gate asked by the surface before every load. Needs no session state.
    pub fn should_allow_load(&self, url: &str) -> bool {
        let allowed = should_allow_load(url);
        if !allowed {
            self.inner
                .notices
                .publish(ShellNotice::Fault(Fault::NavigationRejected {
                    url: url.to_string(),
                }));
        }
        allowed
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.inner.snapshot_rx.borrow().clone()
    }

    pub fn watch(&self) -> watch::Receiver<SessionSnapshot> {
        self.inner.snapshot_rx.clone()
    }

    pub fn notices(&self) -> broadcast::Receiver<ShellNotice> {
        self.inner.notices.subscribe()
    }

    /// Stop the loop, cancel every timer and wait for the loop to exit
    pub async fn shutdown(&self) {
        let _ = self.inner.tx.send(ShellEvent::Shutdown);
        let task = self.inner.task.lock().take();
        if let Some(task) = task {
            if let Err(e) = task.await {
                tracing::warn!(error = %e, "Shell loop ended abnormally");
            }
        }
    }
}

struct EventLoop {
    machine: ResilienceMachine,
    check_requested: Arc<Notify>,
    config: ShellConfig,
    tx: mpsc::UnboundedSender<ShellEvent>,
    timers: TimerSet,
    snapshot_tx: watch::Sender<SessionSnapshot>,
    notices: NoticeBus,
}

impl EventLoop {
    async fn run(mut self, mut rx: mpsc::UnboundedReceiver<ShellEvent>) {
        while let Some(event) = rx.recv().await {
            if matches!(event, ShellEvent::Shutdown) {
                break;
            }

            self.handle(event);
            self.publish_snapshot();
        }

        tracing::debug!(pending = self.timers.pending(), "Cancelling timers");
        self.timers.shutdown();
        tracing::info!(session_id = %self.machine.session().id(), "Shell stopped");
    }

    fn handle(&mut self, event: ShellEvent) {
        let directives = match event {
            ShellEvent::Connectivity(connected) => self.machine.on_connectivity(connected),
            ShellEvent::CheckConnectivity => {
                self.request_check();
                Vec::new()
            }
            ShellEvent::LoadStarted => {
                self.machine.on_load_start();
                Vec::new()
            }
            ShellEvent::LoadFinished => {
                self.machine.on_load_end();
                Vec::new()
            }
            ShellEvent::LoadFailed(failure) => self.machine.on_load_error(failure),
            ShellEvent::Navigated(nav) => self.machine.on_navigate(nav),
            ShellEvent::Retry => {
                // Pull-to-refresh on the offline screen should not wait for the next poll
                if !self.machine.session().is_connected() {
                    self.request_check();
                }
                self.machine.retry()
            }
            ShellEvent::GoHome => {
                self.machine.go_home();
                Vec::new()
            }
            ShellEvent::BackPressed(reply) => {
                let handled = self.machine.on_back_pressed();
                let _ = reply.send(handled);
                Vec::new()
            }
            ShellEvent::SplashElapsed => {
                self.machine.on_splash_elapsed();
                Vec::new()
            }
            ShellEvent::RefreshElapsed(generation) => {
                self.machine.on_refresh_elapsed(generation);
                Vec::new()
            }
            ShellEvent::DriftElapsed(url) => self.machine.on_drift_elapsed(&url),
            ShellEvent::Shutdown => Vec::new(),
        };

        for directive in directives {
            self.apply(directive);
        }
    }

    fn apply(&mut self, directive: Directive) {
        match directive {
            Directive::PresentAlert(alert) => {
                self.notices.publish(ShellNotice::Alert(alert));
            }
            Directive::ScheduleRefreshClear { generation } => {
                self.timers.schedule(
                    self.config.refresh_debounce(),
                    self.tx.clone(),
                    ShellEvent::RefreshElapsed(generation),
                );
            }
            Directive::ArmDriftWatchdog { url } => {
                tracing::debug!(url = %url, "Drift watchdog armed");
                self.timers.schedule(
                    self.config.drift_watchdog(),
                    self.tx.clone(),
                    ShellEvent::DriftElapsed(url),
                );
            }
            Directive::Report(fault) => {
                tracing::debug!(?fault, visible = fault.is_user_visible(), "Fault handled");
                self.notices.publish(ShellNotice::Fault(fault));
            }
        }
    }

    /// Ask the connectivity task for an extra check. Requests made while a
    /// check is in flight collapse into one check after it.
    fn request_check(&self) {
        self.check_requested.notify_one();
    }

    fn publish_snapshot(&self) {
        let next = self.machine.session().snapshot();
        self.snapshot_tx.send_if_modified(|current| {
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });
    }
}

/// Feed connectivity into the loop: push when available, poll otherwise.
///
/// Checks run one at a time in this task, so results reach the loop in the
/// order they were taken.
async fn watch_connectivity(
    monitor: ConnectivityMonitor,
    every: Duration,
    check_requested: Arc<Notify>,
    tx: mpsc::UnboundedSender<ShellEvent>,
) {
    if let Some(mut pushed) = monitor.subscribe() {
        tracing::debug!("Using pushed connectivity updates");
        let initial = *pushed.borrow_and_update();
        if tx.send(ShellEvent::Connectivity(initial)).is_err() {
            return;
        }

        loop {
            let connected = tokio::select! {
                changed = pushed.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    *pushed.borrow_and_update()
                }
                _ = check_requested.notified() => monitor.check_now().await,
            };
            if tx.send(ShellEvent::Connectivity(connected)).is_err() {
                return;
            }
        }

        tracing::warn!(
            every_ms = every.as_millis() as u64,
            "Connectivity push stream closed, falling back to polling"
        );
    }

    let mut ticker = tokio::time::interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // First tick completes immediately
        tokio::select! {
            _ = ticker.tick() => {}
            _ = check_requested.notified() => ticker.reset(),
        }
        let connected = monitor.check_now().await;
        if tx.send(ShellEvent::Connectivity(connected)).is_err() {
            return;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use webshell_connectivity::{NetworkState, StaticStatus};
    use webshell_session::{RecordingSurface, ScreenState, SurfaceCommand};

    const HOME: &str = "https://drishyacity.netlify.app";

    struct Harness {
        shell: ShellHandle,
        status: StaticStatus,
        surface: RecordingSurface,
    }

    fn start_with(status: StaticStatus) -> Harness {
        let surface = RecordingSurface::new();
        let shell = Shell::start(
            ShellConfig::default(),
            Arc::new(status.clone()),
            Arc::new(surface.clone()),
        )
        .unwrap();

        Harness {
            shell,
            status,
            surface,
        }
    }

    fn start() -> Harness {
        start_with(StaticStatus::new(true))
    }

    /// Let the loop drain its queue without crossing a timer boundary
    async fn settle() {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    async fn advance_ms(ms: u64) {
        tokio::time::sleep(Duration::from_millis(ms)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_loading_at_home() {
        let h = start();
        settle().await;

        let snapshot = h.shell.snapshot();
        assert_eq!(snapshot.screen, ScreenState::Loading);
        assert_eq!(snapshot.current_url, HOME);
        assert!(snapshot.is_connected);
        assert!(snapshot.splash_visible);

        h.shell.load_started().unwrap();
        h.shell.load_finished().unwrap();
        settle().await;
        assert_eq!(h.shell.snapshot().screen, ScreenState::Browsing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_splash_dismissed_after_delay() {
        let h = start();
        settle().await;
        assert!(h.shell.snapshot().splash_visible);

        advance_ms(2_100).await;
        assert!(!h.shell.snapshot().splash_visible);
    }

    #[tokio::test(start_paused = true)]
    async fn test_offline_detected_by_poll() {
        let h = start();
        settle().await;

        h.shell.load_finished().unwrap();
        h.status.set_connected(false);
        settle().await;
        assert_eq!(h.shell.snapshot().screen, ScreenState::Browsing);

        // Next poll at 3s
        advance_ms(3_000).await;
        assert_eq!(h.shell.snapshot().screen, ScreenState::Offline);

        // Load signals arriving while offline never surface
        h.shell.load_started().unwrap();
        h.shell.load_failed(LoadFailure::new("failed")).unwrap();
        settle().await;
        assert_eq!(h.shell.snapshot().screen, ScreenState::Offline);
    }

    #[tokio::test(start_paused = true)]
    async fn test_collaborator_failure_is_offline() {
        let status = StaticStatus::new(true);
        status.set_unavailable();
        let h = start_with(status);
        settle().await;

        assert_eq!(h.shell.snapshot().screen, ScreenState::Offline);
        assert!(!h.shell.snapshot().is_connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_regain_with_error_reloads_exactly_once() {
        let h = start();
        settle().await;

        h.status.set_connected(false);
        advance_ms(3_000).await;
        assert_eq!(h.shell.snapshot().screen, ScreenState::Offline);

        h.shell.load_failed(LoadFailure::new("net::ERR_INTERNET_DISCONNECTED")).unwrap();
        settle().await;
        assert!(h.shell.snapshot().has_error);

        h.status.set_connected(true);
        advance_ms(3_000).await;
        let snapshot = h.shell.snapshot();
        assert!(snapshot.is_connected);
        assert!(!snapshot.has_error);
        assert_eq!(h.surface.reload_count(), 1);

        // Further polls while online do not reload again
        advance_ms(6_000).await;
        assert_eq!(h.surface.reload_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_push_connectivity() {
        let h = start_with(StaticStatus::with_push(true));
        settle().await;
        h.shell.load_finished().unwrap();

        h.status.set_connected(false);
        settle().await;
        assert_eq!(h.shell.snapshot().screen, ScreenState::Offline);

        h.status.set_connected(true);
        settle().await;
        assert_eq!(h.shell.snapshot().screen, ScreenState::Browsing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_load_error_presents_alert() {
        let h = start();
        let mut notices = h.shell.notices();
        settle().await;

        h.shell.load_failed(LoadFailure::new("net::ERR_FAILED")).unwrap();
        settle().await;
        assert_eq!(h.shell.snapshot().screen, ScreenState::Error);

        let mut saw_alert = false;
        while let Ok(notice) = notices.try_recv() {
            if let ShellNotice::Alert(alert) = notice {
                assert_eq!(alert.choices.len(), 2);
                saw_alert = true;
            }
        }
        assert!(saw_alert);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_debounce_is_time_based() {
        let h = start();
        settle().await;

        h.shell.load_failed(LoadFailure::new("failed")).unwrap();
        h.shell.retry().unwrap();
        settle().await;

        let snapshot = h.shell.snapshot();
        assert!(snapshot.is_refreshing);
        assert!(!snapshot.has_error);
        assert_eq!(h.surface.reload_count(), 1);

        // The reload never completes, the flag still clears
        advance_ms(900).await;
        assert!(h.shell.snapshot().is_refreshing);
        advance_ms(200).await;
        assert!(!h.shell.snapshot().is_refreshing);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_while_offline_rechecks_connectivity() {
        let h = start();
        settle().await;

        h.status.set_connected(false);
        advance_ms(3_000).await;
        assert_eq!(h.shell.snapshot().screen, ScreenState::Offline);

        h.status.set_connected(true);
        h.shell.retry().unwrap();
        settle().await;
        assert!(h.shell.snapshot().is_connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drift_with_error_returns_home() {
        let h = start();
        let mut notices = h.shell.notices();
        settle().await;

        h.shell
            .navigation_changed(NavigationEvent::new("https://other.example/", true))
            .unwrap();
        settle().await;
        advance_ms(1_000).await;
        h.shell.load_failed(LoadFailure::new("failed")).unwrap();
        settle().await;
        assert_eq!(h.shell.snapshot().current_url, "https://other.example/");

        advance_ms(4_200).await;
        let snapshot = h.shell.snapshot();
        assert_eq!(snapshot.current_url, HOME);
        assert!(!snapshot.has_error);
        assert!(h
            .surface
            .commands()
            .contains(&SurfaceCommand::Load(HOME.to_string())));

        let mut saw_silent = false;
        while let Ok(notice) = notices.try_recv() {
            if matches!(notice, ShellNotice::Fault(Fault::SilentOffDomainFailure { .. })) {
                saw_silent = true;
            }
        }
        assert!(saw_silent);
    }

    #[tokio::test(start_paused = true)]
    async fn test_drift_without_error_stays() {
        let h = start();
        settle().await;

        h.shell
            .navigation_changed(NavigationEvent::new("https://other.example/", true))
            .unwrap();
        h.shell.load_finished().unwrap();
        advance_ms(6_000).await;

        assert_eq!(h.shell.snapshot().current_url, "https://other.example/");
        assert!(h.surface.commands().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_back_pressed() {
        let h = start();
        settle().await;

        h.shell
            .navigation_changed(NavigationEvent::new("https://drishyacity.netlify.app/a", true))
            .unwrap();
        assert!(h.shell.back_pressed().await);
        assert_eq!(h.surface.commands(), vec![SurfaceCommand::GoBack]);

        h.shell
            .navigation_changed(NavigationEvent::new("https://drishyacity.netlify.app/a", false))
            .unwrap();
        assert!(h.shell.back_pressed().await);
        assert_eq!(h.shell.snapshot().current_url, HOME);

        h.shell
            .navigation_changed(NavigationEvent::new("https://drishyacity.netlify.app/", false))
            .unwrap();
        assert!(!h.shell.back_pressed().await);
    }

    #[tokio::test(start_paused = true)]
    async fn test_go_home_idempotent() {
        let h = start();
        settle().await;
        h.shell.load_finished().unwrap();
        settle().await;
        let before = h.shell.snapshot();

        h.shell.go_home().unwrap();
        settle().await;
        assert_eq!(h.shell.snapshot(), before);
        assert!(h.surface.commands().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rejected_load_is_reported() {
        let h = start();
        let mut notices = h.shell.notices();

        assert!(h.shell.should_allow_load("https://drishyacity.netlify.app/page"));
        assert!(!h.shell.should_allow_load("tel:123"));

        let notice = notices.try_recv().unwrap();
        assert_eq!(
            notice,
            ShellNotice::Fault(Fault::NavigationRejected {
                url: "tel:123".to_string()
            })
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_timers() {
        let h = start();
        settle().await;

        h.shell.load_failed(LoadFailure::new("failed")).unwrap();
        h.shell.retry().unwrap();
        h.shell
            .navigation_changed(NavigationEvent::new("https://other.example/", true))
            .unwrap();
        settle().await;

        h.shell.shutdown().await;
        let frozen = h.shell.snapshot();

        h.status.set_connected(false);
        advance_ms(10_000).await;
        assert_eq!(h.shell.snapshot(), frozen);
        assert!(frozen.is_refreshing);
        assert!(matches!(h.shell.retry(), Err(CoreError::ShuttingDown)));
        assert!(!h.shell.back_pressed().await);
        assert_eq!(h.surface.reload_count(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_config_rejected() {
        let config = ShellConfig {
            home_url: "intent://home".to_string(),
            ..ShellConfig::default()
        };
        let result = Shell::start(
            config,
            Arc::new(StaticStatus::new(true)),
            Arc::new(RecordingSurface::new()),
        );
        assert!(result.is_err());
    }

    /// Offers a push receiver whose sender is already gone
    struct ClosedPush {
        reading: StaticStatus,
    }

    #[async_trait]
    impl NetworkStatus for ClosedPush {
        async fn network_state(&self) -> webshell_connectivity::Result<NetworkState> {
            self.reading.network_state().await
        }

        fn subscribe(&self) -> Option<watch::Receiver<bool>> {
            let (_, rx) = watch::channel(false);
            Some(rx)
        }
    }

    /// Takes its reading when called and answers half a second later
    #[derive(Default)]
    struct SlowStatus {
        connected: AtomicBool,
        in_flight: AtomicUsize,
        max_in_flight: AtomicUsize,
    }

    #[async_trait]
    impl NetworkStatus for SlowStatus {
        async fn network_state(&self) -> webshell_connectivity::Result<NetworkState> {
            let connected = self.connected.load(Ordering::SeqCst);
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.max_in_flight.fetch_max(now, Ordering::SeqCst);

            tokio::time::sleep(Duration::from_millis(500)).await;

            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(if connected {
                NetworkState::connected()
            } else {
                NetworkState::disconnected()
            })
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_closed_push_stream_falls_back_to_polling() {
        let reading = StaticStatus::new(true);
        let shell = Shell::start(
            ShellConfig::default(),
            Arc::new(ClosedPush {
                reading: reading.clone(),
            }),
            Arc::new(RecordingSurface::new()),
        )
        .unwrap();

        // Last pushed value said offline; the first poll corrects it
        settle().await;
        assert!(shell.snapshot().is_connected);

        reading.set_connected(false);
        advance_ms(3_000).await;
        assert_eq!(shell.snapshot().screen, ScreenState::Offline);

        reading.set_connected(true);
        advance_ms(3_000).await;
        assert!(shell.snapshot().is_connected);
    }

    #[tokio::test(start_paused = true)]
    async fn test_requested_checks_wait_for_running_check() {
        let status = Arc::new(SlowStatus::default());
        status.connected.store(true, Ordering::SeqCst);
        let shell = Shell::start(
            ShellConfig::default(),
            status.clone(),
            Arc::new(RecordingSurface::new()),
        )
        .unwrap();

        // First poll is in flight with an online reading
        settle().await;
        status.connected.store(false, Ordering::SeqCst);
        shell.check_connectivity().unwrap();
        shell.check_connectivity().unwrap();
        shell.retry().unwrap();
        shell.check_connectivity().unwrap();

        advance_ms(1_500).await;
        assert_eq!(status.max_in_flight.load(Ordering::SeqCst), 1);
        assert!(!shell.snapshot().is_connected);
        assert_eq!(shell.snapshot().screen, ScreenState::Offline);
    }
}
