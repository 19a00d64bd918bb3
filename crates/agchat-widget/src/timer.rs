//! One-shot redraw nudge after a send

use std::time::Duration;

use tokio::{sync::mpsc, task::JoinHandle};

use crate::inbound::Inbound;

/// Delay between a send and the forced redraw
pub const DEFAULT_REDRAW_DELAY: Duration = Duration::from_millis(50);

/// Posts a single [`Inbound::Redraw`] shortly after being armed.
///
/// Cosmetic only: nothing depends on it firing.
#[derive(Debug, Default)]
pub struct FallbackTimer {
    handle: Option<JoinHandle<()>>,
}

impl FallbackTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start the timer, replacing any pending one
    pub fn arm(&mut self, tx: mpsc::UnboundedSender<Inbound>, delay: Duration) {
        self.disarm();
        self.handle = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(Inbound::Redraw);
        }));
    }

    /// Cancel the pending redraw, if any
    pub fn disarm(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    /// Whether a redraw is still pending
    pub fn is_armed(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }
}

impl Drop for FallbackTimer {
    fn drop(&mut self) {
        self.disarm();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_fires_once_after_delay() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = FallbackTimer::new();
        timer.arm(tx, DEFAULT_REDRAW_DELAY);
        assert!(timer.is_armed());

        tokio::time::sleep(Duration::from_millis(60)).await;
        assert_eq!(rx.recv().await, Some(Inbound::Redraw));
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_disarm_cancels_redraw() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = FallbackTimer::new();
        timer.arm(tx, DEFAULT_REDRAW_DELAY);
        timer.disarm();
        assert!(!timer.is_armed());

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_replaces_pending_timer() {
        let (tx, mut rx) = mpsc::unbounded_channel();
        let mut timer = FallbackTimer::new();
        timer.arm(tx.clone(), DEFAULT_REDRAW_DELAY);
        timer.arm(tx, DEFAULT_REDRAW_DELAY);
        drop(timer);

        tokio::time::sleep(Duration::from_millis(100)).await;
        assert!(rx.recv().await.is_none());
    }
}
