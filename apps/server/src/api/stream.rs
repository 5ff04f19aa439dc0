//! SSE adapter over live summary subscriptions.
//!
//! Each connected client gets its own subscription with its own cadence and
//! backpressure policy; this is not a broadcast bus. The subscription handle
//! travels with the stream, so a client disconnect drops it and cancels the
//! producer promptly.

use std::{convert::Infallible, sync::Arc, time::Duration};

use axum::{
    extract::{Path, Query, State},
    response::sse::{Event as SseEvent, KeepAlive, Sse},
    routing::get,
    Router,
};
use futures::stream::Stream;
use serde::Deserialize;

use crate::main_lib::AppState;
use techfolio_core::errors::Error;
use techfolio_core::stream::{BackpressurePolicy, SubscriptionHandle, SummaryStream};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StreamQuery {
    /// `buffer` (default), `drop`, or `latest`.
    policy: Option<String>,
    /// Buffer capacity; only meaningful with the buffer policy.
    capacity: Option<usize>,
}

impl StreamQuery {
    fn into_policy(self) -> Option<BackpressurePolicy> {
        match self.policy.as_deref() {
            Some("drop") => Some(BackpressurePolicy::Drop),
            Some("latest") => Some(BackpressurePolicy::Latest),
            Some("buffer") => Some(BackpressurePolicy::Buffer {
                capacity: self
                    .capacity
                    .unwrap_or(techfolio_core::stream::DEFAULT_STREAM_BUFFER),
            }),
            _ => None,
        }
    }
}

fn sse_frames(
    summaries: SummaryStream,
    handle: SubscriptionHandle,
) -> impl Stream<Item = Result<SseEvent, Infallible>> {
    let items = futures::stream::unfold((summaries, handle), |(mut stream, handle)| async move {
        stream.next().await.map(|item| (item, (stream, handle)))
    });

    futures::StreamExt::filter_map(items, |item| async move {
        match item {
            Ok(summary) => match SseEvent::default().event("summary").json_data(&summary) {
                Ok(frame) => Some(Ok(frame)),
                Err(err) => {
                    tracing::error!("Failed to serialize SSE summary frame: {}", err);
                    None
                }
            },
            Err(Error::Overflow(_)) => Some(Ok(SseEvent::default()
                .event("error")
                .data("subscription overflowed"))),
            Err(err) => {
                tracing::error!("Summary subscription failed: {}", err);
                Some(Ok(SseEvent::default()
                    .event("error")
                    .data("summary computation failed")))
            }
        }
    })
}

async fn stream_summary(
    Path(id): Path<String>,
    Query(query): Query<StreamQuery>,
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<SseEvent, Infallible>>> {
    let policy = query.into_policy();
    let (summaries, handle) = state.stream_service.subscribe(&id, policy);

    Sse::new(sse_frames(summaries, handle)).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/portfolios/{id}/stream", get(stream_summary))
}
