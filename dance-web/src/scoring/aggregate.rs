//! Weighted aggregate of per-joint similarities
//!
//! Limbs carry most of the weight so that standing with arms down scores
//! poorly against a target with arms raised. A shoulder spread term
//! catches "arms out to the sides" postures that angles alone miss.

use crate::config::AggregateConfig;
use crate::geometry::normalize_pose;
use crate::pose::{Joint, Pose};

/// Combine per-joint similarities into one value in [0, 1].
///
/// An empty similarity array (invalid or mismatched input) yields 0.
pub fn aggregate_similarity(
    similarities: &[f32],
    live: &Pose,
    target: &Pose,
    config: &AggregateConfig,
) -> f32 {
    if similarities.is_empty() {
        return 0.0;
    }

    let mut weighted = 0.0;
    let mut total = 0.0;

    for entry in &config.weights {
        let similarity = similarities
            .get(entry.joint.index())
            .copied()
            .filter(|s| s.is_finite())
            .unwrap_or(config.absent_joint_similarity);
        weighted += entry.weight * similarity;
        total += entry.weight;
    }

    if config.shoulder_spread_weight > 0.0 {
        let spread = shoulder_spread_similarity(live, target)
            .unwrap_or(config.absent_joint_similarity);
        weighted += config.shoulder_spread_weight * spread;
        total += config.shoulder_spread_weight;
    }

    if total <= f32::EPSILON {
        return 0.0;
    }

    let result = weighted / total;
    if result.is_finite() { result.clamp(0.0, 1.0) } else { 0.0 }
}

/// Distance between the shoulders in the body-relative frame
pub fn shoulder_spread(pose: &Pose) -> Option<f32> {
    pose.get(Joint::LeftShoulder)?;
    pose.get(Joint::RightShoulder)?;
    let points = normalize_pose(pose);
    let spread = (points[Joint::LeftShoulder.index()] - points[Joint::RightShoulder.index()]).norm();
    spread.is_finite().then_some(spread)
}

/// Ratio of the smaller to the larger shoulder spread
pub fn shoulder_spread_similarity(live: &Pose, target: &Pose) -> Option<f32> {
    let live = shoulder_spread(live)?;
    let target = shoulder_spread(target)?;

    let larger = live.max(target);
    if larger <= f32::EPSILON {
        return Some(1.0);
    }
    Some((live.min(target) / larger).clamp(0.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::Landmark;

    fn torso(shoulder_half_width: f32) -> Pose {
        let mut pose = Pose::new(vec![None; 33]);
        pose.set(Joint::LeftShoulder, Landmark::new(0.5 - shoulder_half_width, 0.3, 0.0));
        pose.set(Joint::RightShoulder, Landmark::new(0.5 + shoulder_half_width, 0.3, 0.0));
        pose.set(Joint::LeftHip, Landmark::new(0.45, 0.6, 0.0));
        pose.set(Joint::RightHip, Landmark::new(0.55, 0.6, 0.0));
        pose
    }

    #[test]
    fn test_perfect_similarities_aggregate_to_one() {
        let pose = torso(0.08);
        let sims = vec![1.0; 33];
        let result = aggregate_similarity(&sims, &pose, &pose, &AggregateConfig::default());
        assert!((result - 1.0).abs() < 1e-5);
    }

    #[test]
    fn test_empty_similarities_score_zero() {
        let pose = torso(0.08);
        assert_eq!(aggregate_similarity(&[], &pose, &pose, &AggregateConfig::default()), 0.0);
    }

    #[test]
    fn test_absent_joints_use_fallback() {
        let pose = torso(0.08);
        // Only indices 0..12 present: shoulders scored, everything else absent
        let sims = vec![1.0; 13];
        let config = AggregateConfig::default();
        let result = aggregate_similarity(&sims, &pose, &pose, &config);
        let expected = 0.07 + 0.07 + 0.08 + (1.0 - 0.22) * 0.2;
        assert!((result - expected).abs() < 1e-4);
    }

    #[test]
    fn test_shoulder_spread() {
        let narrow = torso(0.05);
        let wide = torso(0.10);
        assert!((shoulder_spread_similarity(&narrow, &wide).unwrap() - 0.5).abs() < 1e-4);
        assert_eq!(shoulder_spread_similarity(&narrow, &Pose::empty()), None);
    }

    #[test]
    fn test_limbs_outweigh_torso() {
        let pose = torso(0.08);
        let config = AggregateConfig::default();

        let mut arms_wrong = vec![1.0; 33];
        for joint in [Joint::LeftElbow, Joint::RightElbow, Joint::LeftWrist, Joint::RightWrist] {
            arms_wrong[joint.index()] = 0.0;
        }
        let mut hips_wrong = vec![1.0; 33];
        for joint in [Joint::LeftHip, Joint::RightHip] {
            hips_wrong[joint.index()] = 0.0;
        }

        let arms = aggregate_similarity(&arms_wrong, &pose, &pose, &config);
        let hips = aggregate_similarity(&hips_wrong, &pose, &pose, &config);
        assert!(arms < hips);
        assert!(arms < 0.75);
    }
}
