//! Animation playback surface
//!
//! Clip metadata, per-instance track state, and chaining helpers.

mod clip;
mod sequence;
mod state;

pub use clip::{AnimationClip, SkeletonData};
pub use sequence::{SequenceStep, play_appear_then_loop, play_sequence};
pub use state::{AnimationControl, AnimationState, Pose, TrackHandle};
