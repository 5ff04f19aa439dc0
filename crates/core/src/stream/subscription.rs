//! Per-subscriber live summary streams.
//!
//! Each subscription runs its own producer task that re-evaluates the
//! summary on a configurable tick interval and pushes the result through a
//! policy channel. The core is deliberately not a broadcast bus: cancelling
//! one subscription never touches another, and resubscribing starts fresh.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use futures::Stream;
use log::debug;
use tokio::sync::watch;

use super::backpressure::{policy_channel, BackpressurePolicy, PolicyReceiver, SendError};
use crate::errors::{Error, Result};
use crate::summary::{PortfolioSummary, SummaryServiceTrait};

/// Configuration for summary subscriptions.
#[derive(Debug, Clone, Copy)]
pub struct StreamConfig {
    /// Cadence at which each subscription re-evaluates its summary.
    pub tick_interval: Duration,
    /// Policy used when a subscriber does not pick one.
    pub default_policy: BackpressurePolicy,
}

impl Default for StreamConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_secs(2),
            default_policy: BackpressurePolicy::default(),
        }
    }
}

/// Handle to cancel one subscription.
///
/// Cancelling (or dropping the handle) stops the producer promptly: the
/// cancel signal is raced against the pending tick, so shutdown does not
/// wait for the next tick to fire.
pub struct SubscriptionHandle {
    cancel_tx: watch::Sender<bool>,
}

impl SubscriptionHandle {
    /// Stops the subscription's producer task and releases its timer.
    pub fn cancel(&self) {
        // Ignore send failure: the producer already exited.
        let _ = self.cancel_tx.send(true);
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        let _ = self.cancel_tx.send(true);
    }
}

/// Subscriber end of a summary subscription.
pub struct SummaryStream {
    receiver: PolicyReceiver<PortfolioSummary>,
    terminal: Arc<Mutex<Option<Error>>>,
    finished: bool,
}

impl SummaryStream {
    /// Receives the next summary emission, in generation order.
    ///
    /// `Some(Err(..))` is a terminal overflow or aggregation failure scoped
    /// to this subscriber; `None` means the subscription ended.
    pub async fn next(&mut self) -> Option<Result<PortfolioSummary>> {
        if self.finished {
            return None;
        }
        match self.receiver.recv().await {
            Some(item) => Some(item),
            None => {
                self.finished = true;
                // The producer may have ended because a computation failed;
                // surface that once instead of ending silently.
                self.terminal.lock().unwrap().take().map(Err)
            }
        }
    }

    /// Adapts the subscription into a `futures::Stream` for wire adapters.
    pub fn into_stream(self) -> impl Stream<Item = Result<PortfolioSummary>> {
        futures::stream::unfold(self, |mut stream| async move {
            stream.next().await.map(|item| (item, stream))
        })
    }
}

/// Service producing cancellable, continuously re-evaluated summary streams.
pub struct SummaryStreamService {
    summaries: Arc<dyn SummaryServiceTrait>,
    config: StreamConfig,
}

impl SummaryStreamService {
    /// Creates a new SummaryStreamService instance.
    pub fn new(summaries: Arc<dyn SummaryServiceTrait>, config: StreamConfig) -> Self {
        Self { summaries, config }
    }

    /// Opens an independent subscription for one portfolio.
    ///
    /// Emissions are delivered to this subscriber in generation order; the
    /// first evaluation happens immediately rather than after one interval.
    pub fn subscribe(
        &self,
        portfolio_id: &str,
        policy: Option<BackpressurePolicy>,
    ) -> (SummaryStream, SubscriptionHandle) {
        let policy = policy.unwrap_or(self.config.default_policy);
        let (sender, receiver) = policy_channel::<PortfolioSummary>(policy);
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let terminal: Arc<Mutex<Option<Error>>> = Arc::new(Mutex::new(None));

        let summaries = self.summaries.clone();
        let portfolio_id = portfolio_id.to_string();
        let tick_interval = self.config.tick_interval;
        let terminal_producer = terminal.clone();

        tokio::spawn(async move {
            let mut ticks = tokio::time::interval(tick_interval);
            loop {
                tokio::select! {
                    changed = cancel_rx.changed() => {
                        // A flipped flag or a dropped handle both cancel.
                        if changed.is_err() || *cancel_rx.borrow() {
                            debug!("Subscription for '{}' cancelled", portfolio_id);
                            return;
                        }
                    }
                    _ = ticks.tick() => {
                        match summaries.get_summary(&portfolio_id).await {
                            Ok(Some(summary)) => match sender.send(summary) {
                                Ok(()) => {}
                                Err(SendError::Overflow) => {
                                    debug!(
                                        "Subscriber for '{}' overflowed, ending subscription",
                                        portfolio_id
                                    );
                                    return;
                                }
                                Err(SendError::Closed) => return,
                            },
                            Ok(None) => {
                                // Unknown portfolio: nothing to emit this
                                // generation; it may exist on a later tick.
                                debug!("No portfolio '{}' at tick", portfolio_id);
                            }
                            Err(err) => {
                                *terminal_producer.lock().unwrap() = Some(err);
                                return;
                            }
                        }
                    }
                }
            }
        });

        (
            SummaryStream {
                receiver,
                terminal,
                finished: false,
            },
            SubscriptionHandle { cancel_tx },
        )
    }
}
