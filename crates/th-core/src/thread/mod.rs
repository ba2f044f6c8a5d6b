//! Threaded rendering
//!
//! A [`ThreadView`] keeps the per-session UI flags of each comment (collapsed,
//! reply form open) keyed by comment id, separate from the comment records,
//! and flattens a reply tree into indented [`ThreadRow`]s.

mod view;

pub use view::{NodeState, RenderSettings, ThreadRow, ThreadView};
