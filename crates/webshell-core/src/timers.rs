//! Timer bookkeeping
//!
//! Every timer and background poll the shell starts is tracked here so
//! that shutdown leaves no callback behind.

use std::future::Future;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

use crate::events::ShellEvent;

#[derive(Default)]
pub(crate) struct TimerSet {
    handles: Vec<JoinHandle<()>>,
}

impl TimerSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Deliver `event` once after `delay`
    pub(crate) fn schedule(
        &mut self,
        delay: Duration,
        tx: UnboundedSender<ShellEvent>,
        event: ShellEvent,
    ) {
        self.spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        });
    }

    pub(crate) fn spawn<F>(&mut self, task: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handles.retain(|h| !h.is_finished());
        self.handles.push(tokio::spawn(task));
    }

    pub(crate) fn pending(&self) -> usize {
        self.handles.iter().filter(|h| !h.is_finished()).count()
    }

    pub(crate) fn shutdown(&mut self) {
        for handle in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for TimerSet {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc;

    #[tokio::test(start_paused = true)]
    async fn test_schedule_fires_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = TimerSet::new();

        timers.schedule(Duration::from_secs(2), tx, ShellEvent::SplashElapsed);
        assert!(rx.try_recv().is_err());

        tokio::time::sleep(Duration::from_millis(2_001)).await;
        assert!(matches!(rx.try_recv(), Ok(ShellEvent::SplashElapsed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_shutdown_cancels_pending() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timers = TimerSet::new();

        timers.schedule(Duration::from_secs(1), tx.clone(), ShellEvent::RefreshElapsed(1));
        timers.schedule(Duration::from_secs(5), tx, ShellEvent::DriftElapsed("x".into()));
        assert_eq!(timers.pending(), 2);

        timers.shutdown();
        assert_eq!(timers.pending(), 0);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert!(rx.try_recv().is_err());
    }
}
