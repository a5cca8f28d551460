use std::time::Duration;

use chrono::Local;
use log::{debug, info, warn};
use tokio::sync::watch;
use tokio::task::JoinHandle;

use crate::error::{FetchError, Result};
use crate::fetch::{QuotePair, QuoteSource};
use crate::records::Tracker;
use crate::utils::sanitize_text;

use super::{UpdateEvent, UpdateSender};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PollState {
    Idle,
    Fetching,
    Success,
    Failure,
    Sleeping,
}

/// Producer side of the pipeline: fetch, record, enqueue, sleep, repeat.
///
/// Fetch failures become [`UpdateEvent::Error`] and never stop the loop; the fixed
/// interval between attempts is the only retry policy. The interval is measured from
/// the end of each attempt, so slow responses push the cadence back.
pub struct PollLoop<S> {
    source: S,
    tracker: Tracker,
    sender: UpdateSender,
    interval: Duration,
    state: PollState,
}

impl<S: QuoteSource> PollLoop<S> {
    pub fn new(source: S, tracker: Tracker, sender: UpdateSender, interval: Duration) -> Self {
        Self {
            source,
            tracker,
            sender,
            interval,
            state: PollState::Idle,
        }
    }

    pub fn state(&self) -> PollState {
        self.state
    }

    pub fn tracker(&self) -> &Tracker {
        &self.tracker
    }

    /// Run one fetch and enqueue its outcome. Returns `false` once nobody is listening.
    pub async fn poll_once(&mut self) -> bool {
        self.transition(PollState::Fetching);

        let event = match self.source.fetch().await.and_then(ensure_finite) {
            Ok(prices) => {
                self.transition(PollState::Success);
                UpdateEvent::PriceUpdate {
                    quotes: self.tracker.record(prices),
                    fetched_at: Local::now(),
                }
            }
            Err(err) => {
                self.transition(PollState::Failure);
                warn!("Quote fetch failed: {err}");
                UpdateEvent::Error {
                    message: sanitize_text(&err.to_string()),
                }
            }
        };

        self.sender.send(event)
    }

    /// Poll until `shutdown` flips to `true` (or its sender is dropped), then hand the
    /// loop back so callers can inspect its final state.
    pub async fn run(mut self, mut shutdown: watch::Receiver<bool>) -> Self {
        info!(
            "Poll loop started, polling every {}s",
            self.interval.as_secs_f64()
        );

        loop {
            if *shutdown.borrow() {
                break;
            }

            let delivered = tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                delivered = self.poll_once() => delivered,
            };
            if !delivered {
                warn!("Update receiver dropped, stopping poll loop");
                break;
            }

            self.transition(PollState::Sleeping);
            tokio::select! {
                biased;
                _ = shutdown.changed() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
            self.transition(PollState::Idle);
        }

        info!("Poll loop stopped");
        self
    }

    fn transition(&mut self, next: PollState) {
        debug!("Poll loop {:?} -> {:?}", self.state, next);
        self.state = next;
    }
}

fn ensure_finite(prices: QuotePair) -> std::result::Result<QuotePair, FetchError> {
    if prices.0.is_finite() && prices.1.is_finite() {
        Ok(prices)
    } else {
        Err(FetchError::MissingData(
            "quote source returned a non-finite price".to_string(),
        ))
    }
}

/// Owner of a running poll loop task.
pub struct PollerHandle<S> {
    shutdown: watch::Sender<bool>,
    task: JoinHandle<PollLoop<S>>,
}

impl<S> PollerHandle<S> {
    /// Signal the loop to stop and wait for it. In-flight requests are dropped.
    pub async fn shutdown(self) -> Result<PollLoop<S>> {
        let _ = self.shutdown.send(true);
        Ok(self.task.await?)
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

pub fn spawn_poll_loop<S>(poll_loop: PollLoop<S>) -> PollerHandle<S>
where
    S: QuoteSource + Send + Sync + 'static,
{
    let (shutdown, shutdown_rx) = watch::channel(false);
    let task = tokio::spawn(poll_loop.run(shutdown_rx));
    PollerHandle { shutdown, task }
}
