//! Partial range index: slices and the per-type list that coalesces them.

pub mod list;
pub mod slice;

pub use list::SharedMediaList;
pub use slice::Slice;
