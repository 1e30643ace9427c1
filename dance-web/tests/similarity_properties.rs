//! Property tests for pose similarity and the session state machine

mod common;

use common::{pose_a, pose_b, transform};
use dance_web::config::{EngineConfig, JointScoringConfig, SessionConfig};
use dance_web::results::{performance_points, summarize, Difficulty, PlayerHistory};
use dance_web::scoring::{angle_similarity, distance_similarity, joint_similarities};
use dance_web::{Joint, Landmark, Pose, PoseScorer, ReferenceSequence, ScoringSession};
use proptest::prelude::*;

/// Random body with a non-degenerate torso
fn body() -> impl Strategy<Value = Pose> {
    prop::collection::vec((0.2f32..0.8, 0.1f32..0.9, -0.2f32..0.2, 0.0f32..1.0), 33).prop_map(|points| {
        let mut pose = Pose::from_landmarks(
            points
                .into_iter()
                .map(|(x, y, z, v)| Landmark::new(x, y, z).with_visibility(v))
                .collect(),
        );
        pose.set(Joint::LeftShoulder, Landmark::new(0.42, 0.3, 0.0));
        pose.set(Joint::RightShoulder, Landmark::new(0.58, 0.3, 0.0));
        pose.set(Joint::LeftHip, Landmark::new(0.45, 0.6, 0.0));
        pose.set(Joint::RightHip, Landmark::new(0.55, 0.6, 0.0));
        pose
    })
}

#[test]
fn similarity_stays_in_unit_range() {
    let scorer = PoseScorer::default();
    proptest!(|(live in body(), target in body())| {
        let score = scorer.score(&live, &target, Some(&target), Some(&live));
        prop_assert!((0.0..=1.0).contains(&score.similarity));
        prop_assert!((0.0..=1.0).contains(&score.raw_similarity));
        for s in &score.per_joint {
            prop_assert!((0.0..=1.0).contains(s));
        }
    });
}

#[test]
fn identical_poses_score_one() {
    let scorer = PoseScorer::default();
    proptest!(|(pose in body())| {
        let fully_visible = Pose::new(
            pose.iter().map(|lm| lm.map(|lm| lm.with_visibility(1.0))).collect(),
        );
        prop_assert!((scorer.similarity(&fully_visible, &fully_visible) - 1.0).abs() < 1e-4);
    });
}

#[test]
fn similarity_is_scale_invariant() {
    let scorer = PoseScorer::default();
    proptest!(|(live in body(), target in body(), scale in 0.5f32..2.0)| {
        let scaled = transform(&live, scale, 0.0, 0.0);
        let base = scorer.similarity(&live, &target);
        prop_assert!((scorer.similarity(&scaled, &target) - base).abs() < 2e-3);
    });
}

#[test]
fn similarity_is_translation_invariant() {
    let scorer = PoseScorer::default();
    proptest!(|(live in body(), target in body(), dx in -0.3f32..0.3, dy in -0.3f32..0.3)| {
        let moved = transform(&live, 1.0, dx, dy);
        let base = scorer.similarity(&live, &target);
        prop_assert!((scorer.similarity(&moved, &target) - base).abs() < 2e-3);
    });
}

#[test]
fn joint_similarity_is_monotonic() {
    let config = JointScoringConfig::default();
    proptest!(|(target in 0.0f32..180.0, near in 0.0f32..90.0, extra in 0.0f32..90.0)| {
        let closer = angle_similarity(Some(target + near), Some(target), 1.0, &config);
        let farther = angle_similarity(Some(target + near + extra), Some(target), 1.0, &config);
        prop_assert!(closer >= farther);

        let d_closer = distance_similarity(near / 100.0, config.distance_tolerance);
        let d_farther = distance_similarity((near + extra) / 100.0, config.distance_tolerance);
        prop_assert!(d_closer >= d_farther);
    });
}

#[test]
fn raising_arms_lowers_wrist_similarity() {
    let config = JointScoringConfig::default();
    proptest!(|(lift in 0.0f32..0.3, more in 0.01f32..0.2)| {
        let target = pose_a();
        let near = common::full_pose(0.6 - lift);
        let far = common::full_pose(0.6 - lift - more);
        let near_sims = joint_similarities(&near, &target, &config);
        let far_sims = joint_similarities(&far, &target, &config);
        let wrist = Joint::LeftWrist.index();
        prop_assert!(near_sims[wrist] >= far_sims[wrist]);
    });
}

#[test]
fn current_step_stays_in_bounds() {
    proptest!(|(steps in 0usize..5, frames in prop::collection::vec(any::<bool>(), 0..40), hold in 1u32..4)| {
        let reference = ReferenceSequence::new(
            (0..steps).map(|i| if i % 2 == 0 { pose_a() } else { pose_b() }).collect(),
        );
        let config = EngineConfig {
            session: SessionConfig { hold_frames: hold, ..SessionConfig::default() },
            ..EngineConfig::default()
        };
        let mut session = ScoringSession::new(reference, &config);
        session.start(0.0);

        let last = steps.saturating_sub(1);
        for (i, raised) in frames.into_iter().enumerate() {
            let live = if raised { pose_b() } else { pose_a() };
            let result = session.process_frame(live, i as f64 / 30.0).unwrap();
            prop_assert!(result.current_step_index <= last);
            prop_assert!(session.current_step() <= last);
        }
        prop_assert_eq!(session.best_scores().len(), steps);
    });
}

#[test]
fn aggregation_never_produces_nan() {
    let config = EngineConfig::default();
    proptest!(|(scores in prop::collection::vec(prop_oneof![Just(f32::NAN), 0.0f32..1.0], 0..12),
                best in 0.0f32..100.0,
                streak in 0u32..20)| {
        let report = summarize(&scores, None, Difficulty::Advanced, &config.results);
        prop_assert!((0.0..=100.0).contains(&report.final_score_percent));
        for component in [
            report.breakdown.accuracy,
            report.breakdown.consistency,
            report.breakdown.timing,
            report.breakdown.style,
        ] {
            prop_assert!((0.0..=100.0).contains(&component));
        }

        let history = PlayerHistory { personal_best: best, current_streak: streak };
        let points = performance_points(report.final_score_percent, Difficulty::Advanced, &history, &config.points);
        prop_assert!(points.total_pp >= 5);
    });
}

#[test]
fn empty_session_reports_zero() {
    let report = summarize(&[], None, Difficulty::Beginner, &EngineConfig::default().results);
    assert_eq!(report.final_score_percent, 0.0);
    assert_eq!(report.breakdown.accuracy, 0.0);
    assert_eq!(report.breakdown.consistency, 0.0);
    assert_eq!(report.breakdown.style, 0.0);
    assert_eq!(report.breakdown.timing, 50.0);
}
