//! Body-relative coordinate frame
//!
//! Moves the hip midpoint to the origin and divides by torso length
//! (shoulder midpoint to hip midpoint), so two poses of the same body
//! compare equal regardless of where the person stands or how far they
//! are from the camera. Out-of-plane rotation is not corrected.

use nalgebra::Vector3;

use crate::pose::{Joint, Pose};

/// Smallest torso length we divide by
pub const MIN_SCALE: f32 = 1e-6;

/// Convert a pose to plain vectors. Missing landmarks become the origin.
pub fn to_vector_list(pose: &Pose) -> Vec<Vector3<f32>> {
    pose.iter()
        .map(|lm| match lm {
            Some(lm) => Vector3::new(lm.x, lm.y, lm.depth()),
            None => Vector3::zeros(),
        })
        .collect()
}

fn point(points: &[Vector3<f32>], joint: Joint) -> Vector3<f32> {
    points.get(joint.index()).copied().unwrap_or_else(Vector3::zeros)
}

/// Translate by the hip midpoint and scale by torso length
pub fn normalize(points: &[Vector3<f32>]) -> Vec<Vector3<f32>> {
    if points.is_empty() {
        return Vec::new();
    }

    let hip_mid = (point(points, Joint::LeftHip) + point(points, Joint::RightHip)) * 0.5;
    let shoulder_mid =
        (point(points, Joint::LeftShoulder) + point(points, Joint::RightShoulder)) * 0.5;

    let scale = (shoulder_mid - hip_mid).norm();
    let scale = if scale.is_finite() { scale.max(MIN_SCALE) } else { MIN_SCALE };

    points.iter().map(|p| (p - hip_mid) / scale).collect()
}

/// `normalize(to_vector_list(pose))`
pub fn normalize_pose(pose: &Pose) -> Vec<Vector3<f32>> {
    normalize(&to_vector_list(pose))
}
