//! All data types for the shared media library.

pub mod error;
pub mod event;
pub mod media_type;
pub mod range;

pub use error::{MediaError, MediaResult};
pub use event::{
    SharedMediaAddExisting, SharedMediaAddNew, SharedMediaAddSlice, SharedMediaKey,
    SharedMediaQuery, SharedMediaRemoveAll, SharedMediaRemoveOne, SharedMediaResult,
    SharedMediaSliceUpdate, SliceUpdate,
};
pub use media_type::{SharedMediaType, SharedMediaTypesMask};
pub use range::{in_history, MsgId, MsgRange, PeerId, HISTORY_END, HISTORY_START};
