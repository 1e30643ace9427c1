//! Scoring module - pose similarity and the motion gate
//!
//! Re-exports only. All logic in submodules.

mod aggregate;
mod joints;
mod motion;
mod scorer;

pub use aggregate::{aggregate_similarity, shoulder_spread, shoulder_spread_similarity};
pub use joints::{angle_similarity, distance_similarity, joint_similarities};
pub use motion::{apply_motion_gate, classify_motion, motion_energy, MotionVerdict};
pub use scorer::{FrameScore, PoseScorer};
