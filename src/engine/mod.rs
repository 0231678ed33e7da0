//! Routing of ingestion events and live queries across conversations.

pub(crate) mod live_query;
pub mod shared_media;

pub use shared_media::{ListStats, SharedMedia};
