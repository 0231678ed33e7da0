//! Shared media — partial range index for browsing the photos, files and
//! links of a conversation without holding its whole history.
//!
//! Each (conversation, media type) pair owns a list of slices: sets of known
//! message ids together with the range they are proven complete over. Newly
//! learned ranges are merged into the list, and window queries around a
//! message return exact counts where that knowledge permits and `None`
//! where it does not.

pub mod cli;
pub mod config;
pub mod engine;
pub mod index;
pub mod stream;
pub mod types;

// Re-export commonly used types at the crate root
pub use config::{MediaConfig, UnknownTotalPolicy};
pub use engine::{ListStats, SharedMedia};
pub use index::{SharedMediaList, Slice};
pub use stream::{EventStream, Lifetime, Subscription};
pub use types::{
    MediaError, MediaResult, MsgId, MsgRange, PeerId, SharedMediaAddExisting, SharedMediaAddNew,
    SharedMediaAddSlice, SharedMediaKey, SharedMediaQuery, SharedMediaRemoveAll,
    SharedMediaRemoveOne, SharedMediaResult, SharedMediaSliceUpdate, SharedMediaType,
    SharedMediaTypesMask, SliceUpdate, HISTORY_END, HISTORY_START,
};
