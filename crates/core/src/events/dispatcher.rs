//! Event dispatcher trait and implementations.
//!
//! The dispatcher forwards change events to an external audit sink over
//! HTTP. Dispatch is best-effort: the mutation that produced an event has
//! already reported its result, and a failed or timed-out publish is logged
//! and swallowed, never surfaced to the mutation's caller.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use log::{debug, warn};

use super::ChangeEvent;
use crate::errors::{Error, Result};

/// Default timeout for a single publish call.
pub const DEFAULT_PUBLISH_TIMEOUT: Duration = Duration::from_secs(5);

/// Trait for publishing change events to an external collaborator.
///
/// # Design Rules
///
/// - `publish` carries an explicit timeout; exceeding it is a transport
///   failure (`Error::Publish`), nothing more.
/// - `publish_batch` processes each event independently; one failing event
///   never blocks or fails its siblings.
/// - Callers on write paths spawn dispatch and log failures; they never let
///   the outcome leak into the write's own result.
#[async_trait]
pub trait EventDispatcher: Send + Sync {
    /// Publishes a single event.
    async fn publish(&self, event: &ChangeEvent) -> Result<()>;

    /// Publishes a batch of events, each independently.
    ///
    /// Returns one outcome per event, in input order.
    async fn publish_batch(&self, events: &[ChangeEvent]) -> Vec<Result<()>> {
        let mut outcomes = Vec::with_capacity(events.len());
        for event in events {
            outcomes.push(self.publish(event).await);
        }
        outcomes
    }
}

/// Spawns a best-effort publish of `event`, logging any failure.
///
/// This is the write-path entry point: the caller's result is already
/// determined before dispatch starts.
pub fn dispatch_best_effort(dispatcher: Arc<dyn EventDispatcher>, event: ChangeEvent) {
    tokio::spawn(async move {
        match dispatcher.publish(&event).await {
            Ok(()) => debug!(
                "Published change event {:?} {:?} for {}",
                event.entity_type, event.change_kind, event.entity_id
            ),
            Err(err) => warn!(
                "Failed to publish change event for {} (ignored): {}",
                event.entity_id, err
            ),
        }
    });
}

/// HTTP dispatcher posting the JSON envelope to a configured audit sink.
pub struct HttpEventDispatcher {
    client: reqwest::Client,
    sink_url: String,
    timeout: Duration,
}

impl HttpEventDispatcher {
    /// Creates a dispatcher for the given sink base URL.
    pub fn new(sink_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            client: reqwest::Client::new(),
            sink_url: sink_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl EventDispatcher for HttpEventDispatcher {
    async fn publish(&self, event: &ChangeEvent) -> Result<()> {
        let response = self
            .client
            .post(&self.sink_url)
            .timeout(self.timeout)
            .json(&event.to_envelope())
            .send()
            .await
            .map_err(|e| Error::Publish(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::Publish(format!(
                "audit sink returned status {}",
                response.status()
            )));
        }
        Ok(())
    }
}

/// No-op dispatcher for contexts without an audit sink configured.
#[derive(Clone, Default)]
pub struct NoopEventDispatcher;

#[async_trait]
impl EventDispatcher for NoopEventDispatcher {
    async fn publish(&self, _event: &ChangeEvent) -> Result<()> {
        Ok(())
    }
}

/// Mock dispatcher for testing - collects published events.
#[derive(Clone, Default)]
pub struct MockEventDispatcher {
    events: Arc<Mutex<Vec<ChangeEvent>>>,
    /// When true, every publish fails with `Error::Publish`.
    fail: Arc<Mutex<bool>>,
}

impl MockEventDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all published events.
    pub fn events(&self) -> Vec<ChangeEvent> {
        self.events.lock().unwrap().clone()
    }

    /// Returns the number of published events.
    pub fn len(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    /// Returns true if no events have been published.
    pub fn is_empty(&self) -> bool {
        self.events.lock().unwrap().is_empty()
    }

    /// Makes subsequent publishes fail (or succeed again).
    pub fn set_failing(&self, fail: bool) {
        *self.fail.lock().unwrap() = fail;
    }
}

#[async_trait]
impl EventDispatcher for MockEventDispatcher {
    async fn publish(&self, event: &ChangeEvent) -> Result<()> {
        if *self.fail.lock().unwrap() {
            return Err(Error::Publish("mock dispatcher failing".to_string()));
        }
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}
