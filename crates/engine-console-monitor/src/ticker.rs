//! Cancel-on-drop periodic tasks.

use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, sleep_until, Instant, MissedTickBehavior};

/// A periodic task owned by the value that mounted it.
///
/// The task is aborted when the `Ticker` is dropped, so a simulator that goes
/// out of scope leaves no timer behind. Must be created inside a Tokio runtime.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Run `tick` every `period`, starting one period from now.
    pub fn every<F>(period: Duration, tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Self::spawn(None, period, tick)
    }

    /// Run `tick` once after `first`, and independently every `period`
    /// counted from now.
    pub fn with_first<F>(first: Duration, period: Duration, tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        Self::spawn(Some(first), period, tick)
    }

    fn spawn<F>(first: Option<Duration>, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let start = Instant::now();
        let handle = tokio::spawn(async move {
            let mut interval = interval_at(start + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

            if let Some(first) = first.filter(|first| *first < period) {
                sleep_until(start + first).await;
                tick();
            }
            loop {
                interval.tick().await;
                tick();
            }
        });
        Self { handle }
    }

    /// Whether the task has stopped.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
