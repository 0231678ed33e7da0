//! Minimal synchronous event substrate: streams, subscriptions, lifetimes.

pub mod event_stream;
pub(crate) mod registry;
pub mod subscription;

pub use event_stream::EventStream;
pub use subscription::{Lifetime, Subscription};
