//! Backpressure policies for produced sequences.
//!
//! A policy channel connects one producer to one subscriber and decides what
//! happens when the subscriber cannot keep pace:
//!
//! - `Buffer(capacity)` queues up to `capacity` unread items; exceeding it
//!   surfaces `Error::Overflow` to that subscriber only.
//! - `Drop` silently replaces an unconsumed pending item with the newest one;
//!   consumed items are a strictly-ordered subsequence of produced items.
//! - `Latest` keeps only the most recent item and guarantees the subscriber
//!   eventually observes it, even if the producer has already finished.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch, Notify};

use crate::errors::{Error, Result};

/// Default bounded capacity for `Buffer`, small enough that a badly-behaving
/// subscriber cannot grow memory without bound.
pub const DEFAULT_STREAM_BUFFER: usize = 16;

/// Flow-control policy applied to one subscription.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "policy")]
pub enum BackpressurePolicy {
    /// Queue up to `capacity` unread items, then overflow.
    Buffer { capacity: usize },
    /// Newest item replaces an unconsumed pending one.
    Drop,
    /// Keep only the latest item; its delivery is guaranteed.
    Latest,
}

impl Default for BackpressurePolicy {
    fn default() -> Self {
        BackpressurePolicy::Buffer {
            capacity: DEFAULT_STREAM_BUFFER,
        }
    }
}

/// Why a send was rejected.
#[derive(Debug, PartialEq, Eq)]
pub enum SendError {
    /// The subscriber's buffer exceeded its capacity; the subscription is dead.
    Overflow,
    /// The subscriber went away.
    Closed,
}

struct BufferShared {
    overflowed: AtomicBool,
    notify: Notify,
}

struct SlotShared<T> {
    pending: Mutex<Option<T>>,
    notify: Notify,
    producer_gone: AtomicBool,
}

enum SenderInner<T> {
    Buffer {
        tx: mpsc::Sender<T>,
        shared: Arc<BufferShared>,
    },
    Drop {
        slot: Arc<SlotShared<T>>,
    },
    Latest {
        tx: watch::Sender<Option<T>>,
    },
}

/// Producer half of a policy channel.
pub struct PolicySender<T> {
    inner: SenderInner<T>,
}

impl<T: Clone + Send + 'static> PolicySender<T> {
    /// Offers an item to the subscriber under the channel's policy.
    pub fn send(&self, item: T) -> std::result::Result<(), SendError> {
        match &self.inner {
            SenderInner::Buffer { tx, shared } => match tx.try_send(item) {
                Ok(()) => Ok(()),
                Err(mpsc::error::TrySendError::Full(_)) => {
                    shared.overflowed.store(true, Ordering::SeqCst);
                    shared.notify.notify_one();
                    Err(SendError::Overflow)
                }
                Err(mpsc::error::TrySendError::Closed(_)) => Err(SendError::Closed),
            },
            SenderInner::Drop { slot } => {
                // Replacing the pending item is the policy, not a failure.
                *slot.pending.lock().unwrap() = Some(item);
                slot.notify.notify_one();
                Ok(())
            }
            SenderInner::Latest { tx } => tx
                .send(Some(item))
                .map_err(|_| SendError::Closed),
        }
    }
}

impl<T> Drop for PolicySender<T> {
    fn drop(&mut self) {
        if let SenderInner::Drop { slot } = &self.inner {
            slot.producer_gone.store(true, Ordering::SeqCst);
            slot.notify.notify_one();
        }
    }
}

enum ReceiverInner<T> {
    Buffer {
        rx: mpsc::Receiver<T>,
        shared: Arc<BufferShared>,
    },
    Drop {
        slot: Arc<SlotShared<T>>,
    },
    Latest {
        rx: watch::Receiver<Option<T>>,
    },
}

/// Subscriber half of a policy channel.
pub struct PolicyReceiver<T> {
    inner: ReceiverInner<T>,
    done: bool,
}

fn overflow_error() -> Error {
    Error::Overflow("subscriber fell behind the producer".to_string())
}

impl<T: Clone + Send + 'static> PolicyReceiver<T> {
    /// Receives the next item.
    ///
    /// `None` means the producer finished; `Some(Err(Error::Overflow))` is
    /// delivered exactly once (after draining buffered items) and terminates
    /// the sequence.
    pub async fn recv(&mut self) -> Option<Result<T>> {
        if self.done {
            return None;
        }
        match &mut self.inner {
            ReceiverInner::Buffer { rx, shared } => loop {
                match rx.try_recv() {
                    Ok(item) => return Some(Ok(item)),
                    Err(mpsc::error::TryRecvError::Empty) => {
                        if shared.overflowed.load(Ordering::SeqCst) {
                            self.done = true;
                            return Some(Err(overflow_error()));
                        }
                        tokio::select! {
                            item = rx.recv() => match item {
                                Some(item) => return Some(Ok(item)),
                                None => {
                                    // The producer is gone; an overflow it
                                    // recorded on its way out still has to
                                    // reach this subscriber.
                                    self.done = true;
                                    if shared.overflowed.load(Ordering::SeqCst) {
                                        return Some(Err(overflow_error()));
                                    }
                                    return None;
                                }
                            },
                            _ = shared.notify.notified() => {
                                // Re-check the overflow flag next iteration.
                            }
                        }
                    }
                    Err(mpsc::error::TryRecvError::Disconnected) => {
                        self.done = true;
                        if shared.overflowed.load(Ordering::SeqCst) {
                            return Some(Err(overflow_error()));
                        }
                        return None;
                    }
                }
            },
            ReceiverInner::Drop { slot } => loop {
                if let Some(item) = slot.pending.lock().unwrap().take() {
                    return Some(Ok(item));
                }
                if slot.producer_gone.load(Ordering::SeqCst) {
                    // One last look: the producer may have parked an item
                    // between our take and its shutdown.
                    if let Some(item) = slot.pending.lock().unwrap().take() {
                        return Some(Ok(item));
                    }
                    self.done = true;
                    return None;
                }
                slot.notify.notified().await;
            },
            ReceiverInner::Latest { rx } => match rx.changed().await {
                Ok(()) => {
                    let item = rx.borrow_and_update().clone();
                    match item {
                        Some(item) => Some(Ok(item)),
                        None => {
                            self.done = true;
                            None
                        }
                    }
                }
                Err(_) => {
                    self.done = true;
                    None
                }
            },
        }
    }
}

/// Creates a producer/subscriber pair governed by `policy`.
pub fn policy_channel<T: Clone + Send + 'static>(
    policy: BackpressurePolicy,
) -> (PolicySender<T>, PolicyReceiver<T>) {
    match policy {
        BackpressurePolicy::Buffer { capacity } => {
            let (tx, rx) = mpsc::channel(capacity.max(1));
            let shared = Arc::new(BufferShared {
                overflowed: AtomicBool::new(false),
                notify: Notify::new(),
            });
            (
                PolicySender {
                    inner: SenderInner::Buffer {
                        tx,
                        shared: shared.clone(),
                    },
                },
                PolicyReceiver {
                    inner: ReceiverInner::Buffer { rx, shared },
                    done: false,
                },
            )
        }
        BackpressurePolicy::Drop => {
            let slot = Arc::new(SlotShared {
                pending: Mutex::new(None),
                notify: Notify::new(),
                producer_gone: AtomicBool::new(false),
            });
            (
                PolicySender {
                    inner: SenderInner::Drop { slot: slot.clone() },
                },
                PolicyReceiver {
                    inner: ReceiverInner::Drop { slot },
                    done: false,
                },
            )
        }
        BackpressurePolicy::Latest => {
            let (tx, rx) = watch::channel(None);
            (
                PolicySender {
                    inner: SenderInner::Latest { tx },
                },
                PolicyReceiver {
                    inner: ReceiverInner::Latest { rx },
                    done: false,
                },
            )
        }
    }
}
