//! Live summary streaming - per-subscriber change streams with selectable
//! backpressure policies and prompt cancellation.

mod backpressure;
mod subscription;

pub use backpressure::{
    policy_channel, BackpressurePolicy, PolicyReceiver, PolicySender, SendError,
    DEFAULT_STREAM_BUFFER,
};
pub use subscription::{StreamConfig, SubscriptionHandle, SummaryStream, SummaryStreamService};
