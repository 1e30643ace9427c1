//! Geometry module - normalization and joint angles
//!
//! Re-exports only. All logic in submodules.

mod angles;
mod normalize;

pub use angles::{angle_at_vertex, joint_angles, AngleJoint, JointAngles};
pub use normalize::{normalize, normalize_pose, to_vector_list, MIN_SCALE};
