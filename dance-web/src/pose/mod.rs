//! Pose module - landmark types and reference sequences
//!
//! Re-exports only. All logic in submodules.

mod landmarks;
mod reference;

pub use landmarks::{Joint, Landmark, Pose, LANDMARK_COUNT, MOTION_JOINTS};
pub use reference::ReferenceSequence;
