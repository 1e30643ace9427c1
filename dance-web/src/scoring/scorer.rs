//! Full frame scoring pipeline: per-joint → motion gate → aggregate

use serde::Serialize;

use super::aggregate::aggregate_similarity;
use super::joints::joint_similarities;
use super::motion::{apply_motion_gate, MotionVerdict};
use crate::config::{AggregateConfig, EngineConfig, JointScoringConfig, MotionGateConfig};
use crate::pose::Pose;

/// Result of scoring one live pose against one target
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameScore {
    /// Motion-gated aggregate similarity in [0, 1]
    pub similarity: f32,
    /// Aggregate similarity before the motion gate
    pub raw_similarity: f32,
    pub per_joint: Vec<f32>,
    pub verdict: MotionVerdict,
}

impl FrameScore {
    pub fn zero() -> Self {
        Self {
            similarity: 0.0,
            raw_similarity: 0.0,
            per_joint: Vec::new(),
            verdict: MotionVerdict::Steady,
        }
    }
}

/// Scores live poses with one set of tolerances, weights and gate tiers
#[derive(Clone, Debug, Default)]
pub struct PoseScorer {
    joints: JointScoringConfig,
    aggregate: AggregateConfig,
    motion: MotionGateConfig,
}

impl PoseScorer {
    pub fn new(joints: JointScoringConfig, aggregate: AggregateConfig, motion: MotionGateConfig) -> Self {
        Self { joints, aggregate, motion }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.joints.clone(), config.aggregate.clone(), config.motion.clone())
    }

    /// Aggregate similarity without motion context
    pub fn similarity(&self, live: &Pose, target: &Pose) -> f32 {
        let per_joint = joint_similarities(live, target, &self.joints);
        aggregate_similarity(&per_joint, live, target, &self.aggregate)
    }

    /// Score a frame. `previous_target` and `previous_live` give the
    /// motion gate its before/after pair; pass `None` to skip gating.
    pub fn score(
        &self,
        live: &Pose,
        target: &Pose,
        previous_target: Option<&Pose>,
        previous_live: Option<&Pose>,
    ) -> FrameScore {
        let per_joint = joint_similarities(live, target, &self.joints);
        let raw_similarity = aggregate_similarity(&per_joint, live, target, &self.aggregate);
        if per_joint.is_empty() {
            return FrameScore::zero();
        }

        let (similarity, verdict) = apply_motion_gate(
            raw_similarity,
            previous_target,
            target,
            previous_live,
            live,
            &self.motion,
        );

        FrameScore { similarity, raw_similarity, per_joint, verdict }
    }
}
