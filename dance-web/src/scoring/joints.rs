//! Per-joint similarity
//!
//! Major joints (knees, hips, elbows, shoulders) are compared by angle,
//! which does not depend on how large the body appears in frame. Every
//! other landmark falls back to distance in the body-relative frame.

use crate::config::JointScoringConfig;
use crate::geometry::{joint_angles, normalize_pose, AngleJoint};
use crate::pose::{Joint, Pose};

/// Similarity in [0, 1] for every index of the live pose.
///
/// Returns an empty vector when either pose is empty or their lengths
/// differ: the frame makes no similarity contribution.
pub fn joint_similarities(live: &Pose, target: &Pose, config: &JointScoringConfig) -> Vec<f32> {
    if live.is_empty() || target.is_empty() || live.len() != target.len() {
        return Vec::new();
    }

    let live_angles = joint_angles(live);
    let target_angles = joint_angles(target);
    let live_norm = normalize_pose(live);
    let target_norm = normalize_pose(target);

    (0..live.len())
        .map(|index| {
            let angle_joint = Joint::from_index(index).and_then(AngleJoint::at_vertex);
            let similarity = match angle_joint {
                Some(joint) => angle_similarity(
                    live_angles.get(joint),
                    target_angles.get(joint),
                    average_visibility(live, target, index),
                    config,
                ),
                None => {
                    if live.at(index).is_none() || target.at(index).is_none() {
                        config.missing_similarity
                    } else {
                        let distance = (live_norm[index] - target_norm[index]).norm();
                        distance_similarity(distance, config.distance_tolerance)
                    }
                }
            };
            sanitize(similarity)
        })
        .collect()
}

/// Angle comparison for a mapped joint. An undetectable angle scores 0
/// before flooring: a joint we cannot see must not inflate the score.
pub fn angle_similarity(
    live: Option<f32>,
    target: Option<f32>,
    visibility: f32,
    config: &JointScoringConfig,
) -> f32 {
    let raw = match (live, target) {
        (Some(live), Some(target)) => {
            (1.0 - (live - target).abs() / config.angle_tolerance_deg).max(0.0)
        }
        _ => 0.0,
    };

    // Occlusion lowers confidence but is not evidence of a mismatch
    let factor = if visibility < config.visibility_threshold {
        (visibility / config.visibility_threshold).max(config.min_visibility_factor)
    } else {
        1.0
    };

    (raw * factor).max(config.angle_floor).min(1.0)
}

/// Linear falloff from 1 at zero distance to 0 at `tolerance`
pub fn distance_similarity(distance: f32, tolerance: f32) -> f32 {
    (1.0 - distance / tolerance).clamp(0.0, 1.0)
}

fn average_visibility(live: &Pose, target: &Pose, index: usize) -> f32 {
    let live = live.at(index).map_or(0.0, |lm| lm.confidence());
    let target = target.at(index).map_or(0.0, |lm| lm.confidence());
    (live + target) / 2.0
}

fn sanitize(similarity: f32) -> f32 {
    if similarity.is_finite() {
        similarity.clamp(0.0, 1.0)
    } else {
        0.0
    }
}
