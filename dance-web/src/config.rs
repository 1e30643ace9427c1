//! Tunable scoring configuration
//!
//! Every tunable scoring constant lives here with a default.
//! Configs deserialize from JSON (or a JS object via the bridge) with
//! missing fields filled from defaults. [`EngineConfig::validate`] never
//! fails: unusable values are swapped for defaults and reported back as
//! warnings.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigWarning, ReferenceError};
use crate::pose::Joint;

// ============================================================================
// SESSION
// ============================================================================

/// Step advancement settings for one session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SessionConfig {
    /// Similarity counted as a match for threshold-hold advancement
    pub match_threshold: f32,
    /// Consecutive matching frames needed to advance
    pub hold_frames: u32,
    /// Advance after this many seconds on a step (0 = disabled)
    pub auto_skip_seconds: f64,
    /// Never self-advance; an external clock drives the step index
    pub disable_advancement: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.75,
            hold_frames: 4,
            auto_skip_seconds: 0.0,
            disable_advancement: false,
        }
    }
}

// ============================================================================
// PER-JOINT SCORING
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct JointScoringConfig {
    /// Angle difference (degrees) at which similarity reaches 0
    pub angle_tolerance_deg: f32,
    /// Normalized distance at which similarity reaches 0
    pub distance_tolerance: f32,
    /// Average visibility below which angle similarity is scaled down
    pub visibility_threshold: f32,
    /// Lowest scale factor applied for poor visibility
    pub min_visibility_factor: f32,
    /// Lowest similarity an angle-scored joint can report
    pub angle_floor: f32,
    /// Similarity for a position-scored joint missing from either pose
    pub missing_similarity: f32,
}

impl Default for JointScoringConfig {
    fn default() -> Self {
        Self {
            angle_tolerance_deg: 30.0,
            distance_tolerance: 0.7,
            visibility_threshold: 0.2,
            min_visibility_factor: 0.5,
            angle_floor: 0.2,
            missing_similarity: 0.2,
        }
    }
}

// ============================================================================
// AGGREGATE
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct JointWeight {
    pub joint: Joint,
    pub weight: f32,
}

const fn jw(joint: Joint, weight: f32) -> JointWeight {
    JointWeight { joint, weight }
}

/// Default weight table. Arms 0.46, legs 0.32, hips 0.14; together with
/// the shoulder spread term (0.08) the total is 1.0.
pub const DEFAULT_JOINT_WEIGHTS: [JointWeight; 12] = [
    jw(Joint::LeftShoulder, 0.07),
    jw(Joint::RightShoulder, 0.07),
    jw(Joint::LeftElbow, 0.09),
    jw(Joint::RightElbow, 0.09),
    jw(Joint::LeftWrist, 0.07),
    jw(Joint::RightWrist, 0.07),
    jw(Joint::LeftHip, 0.07),
    jw(Joint::RightHip, 0.07),
    jw(Joint::LeftKnee, 0.09),
    jw(Joint::RightKnee, 0.09),
    jw(Joint::LeftAnkle, 0.07),
    jw(Joint::RightAnkle, 0.07),
];

pub const DEFAULT_SHOULDER_SPREAD_WEIGHT: f32 = 0.08;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AggregateConfig {
    pub weights: Vec<JointWeight>,
    pub shoulder_spread_weight: f32,
    /// Contribution of a weighted joint absent from the per-joint array
    pub absent_joint_similarity: f32,
}

impl Default for AggregateConfig {
    fn default() -> Self {
        Self {
            weights: DEFAULT_JOINT_WEIGHTS.to_vec(),
            shoulder_spread_weight: DEFAULT_SHOULDER_SPREAD_WEIGHT,
            absent_joint_similarity: 0.2,
        }
    }
}

impl AggregateConfig {
    pub fn total_weight(&self) -> f32 {
        self.weights.iter().map(|w| w.weight).sum::<f32>() + self.shoulder_spread_weight
    }
}

// ============================================================================
// MOTION GATE
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MotionGateConfig {
    /// Reference motion above this means the target pose is changing
    pub reference_epsilon: f32,
    /// User motion below this counts as frozen
    pub freeze_epsilon: f32,
    /// Similarity at or above this is a good match
    pub good_match: f32,
    /// Multiplier for a frozen user with a poor match
    pub frozen_penalty: f32,
    /// Multiplier for a frozen user holding a good match
    pub frozen_match_penalty: f32,
    /// User motion below this fraction of reference motion is lagging
    pub lag_ratio: f32,
    /// Multiplier for a lagging user
    pub lag_penalty: f32,
}

impl Default for MotionGateConfig {
    fn default() -> Self {
        Self {
            reference_epsilon: 0.02,
            freeze_epsilon: 0.01,
            good_match: 0.65,
            frozen_penalty: 0.08,
            frozen_match_penalty: 0.5,
            lag_ratio: 0.35,
            lag_penalty: 0.5,
        }
    }
}

// ============================================================================
// RESULTS & POINTS
// ============================================================================

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ResultsConfig {
    pub accuracy_weight: f32,
    pub consistency_weight: f32,
    pub timing_weight: f32,
    pub style_weight: f32,
    /// Standard deviation at which consistency reaches 0
    pub consistency_spread: f32,
    /// Timing component when no timing signal is supplied
    pub default_timing: f32,
    pub style_good_threshold: f32,
    pub style_excellent_threshold: f32,
    /// Share of the style score earned by steps above the good threshold
    pub style_good_weight: f32,
    /// Multiplier on the fraction of excellent steps
    pub style_excellent_scale: f32,
    /// Cap on the excellent-step part of the style score
    pub style_excellent_cap: f32,
    /// Mean inter-step displacement bounds for Intermediate, Advanced, Expert
    pub difficulty_thresholds: [f32; 3],
    /// Final score multiplier per difficulty, Beginner first
    pub difficulty_multipliers: [f32; 4],
}

impl Default for ResultsConfig {
    fn default() -> Self {
        Self {
            accuracy_weight: 0.6,
            consistency_weight: 0.2,
            timing_weight: 0.1,
            style_weight: 0.1,
            consistency_spread: 0.5,
            default_timing: 0.5,
            style_good_threshold: 0.8,
            style_excellent_threshold: 0.9,
            style_good_weight: 0.7,
            style_excellent_scale: 2.0,
            style_excellent_cap: 0.3,
            difficulty_thresholds: [0.05, 0.10, 0.18],
            difficulty_multipliers: [1.0, 1.3, 1.6, 2.0],
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PointsConfig {
    pub min_base_points: f32,
    /// Points per 100% improvement over the personal best
    pub improvement_scale: f32,
    /// Streak days per bonus tier
    pub streak_tier_length: u32,
    pub max_streak_tiers: u32,
    pub points_per_streak_tier: f32,
    /// Bonus per difficulty, Beginner first
    pub difficulty_bonuses: [f32; 4],
    /// Final score percent needed for each excellence tier, ascending
    pub excellence_thresholds: [f32; 3],
    pub excellence_bonuses: [f32; 3],
}

impl Default for PointsConfig {
    fn default() -> Self {
        Self {
            min_base_points: 5.0,
            improvement_scale: 25.0,
            streak_tier_length: 3,
            max_streak_tiers: 3,
            points_per_streak_tier: 10.0,
            difficulty_bonuses: [0.0, 20.0, 35.0, 50.0],
            excellence_thresholds: [85.0, 90.0, 95.0],
            excellence_bonuses: [5.0, 10.0, 15.0],
        }
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Complete engine configuration
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EngineConfig {
    pub session: SessionConfig,
    pub joints: JointScoringConfig,
    pub aggregate: AggregateConfig,
    pub motion: MotionGateConfig,
    pub results: ResultsConfig,
    pub points: PointsConfig,
}

impl EngineConfig {
    /// Parse and validate. Warnings are logged.
    pub fn from_json(json: &str) -> Result<Self, ReferenceError> {
        let mut config: Self = serde_json::from_str(json)?;
        for warning in config.validate() {
            log::warn!("{}", warning);
        }
        Ok(config)
    }

    /// Replace unusable values with defaults
    pub fn validate(&mut self) -> Vec<ConfigWarning> {
        let mut warnings = Vec::new();
        let w = &mut warnings;

        let session = SessionConfig::default();
        unit("session.matchThreshold", &mut self.session.match_threshold, session.match_threshold, w);
        if self.session.hold_frames == 0 {
            w.push(ConfigWarning::NotPositive {
                field: "session.holdFrames",
                value: 0.0,
                fallback: session.hold_frames as f64,
            });
            self.session.hold_frames = session.hold_frames;
        }
        if !self.session.auto_skip_seconds.is_finite() || self.session.auto_skip_seconds < 0.0 {
            w.push(ConfigWarning::OutOfRange {
                field: "session.autoSkipSeconds",
                value: self.session.auto_skip_seconds,
                min: 0.0,
                max: f64::INFINITY,
                fallback: 0.0,
            });
            self.session.auto_skip_seconds = 0.0;
        }

        let joints = JointScoringConfig::default();
        positive("joints.angleToleranceDeg", &mut self.joints.angle_tolerance_deg, joints.angle_tolerance_deg, w);
        positive("joints.distanceTolerance", &mut self.joints.distance_tolerance, joints.distance_tolerance, w);
        unit("joints.visibilityThreshold", &mut self.joints.visibility_threshold, joints.visibility_threshold, w);
        unit("joints.minVisibilityFactor", &mut self.joints.min_visibility_factor, joints.min_visibility_factor, w);
        unit("joints.angleFloor", &mut self.joints.angle_floor, joints.angle_floor, w);
        unit("joints.missingSimilarity", &mut self.joints.missing_similarity, joints.missing_similarity, w);

        self.validate_weights(w);

        let motion = MotionGateConfig::default();
        non_negative("motion.referenceEpsilon", &mut self.motion.reference_epsilon, motion.reference_epsilon, w);
        non_negative("motion.freezeEpsilon", &mut self.motion.freeze_epsilon, motion.freeze_epsilon, w);
        unit("motion.goodMatch", &mut self.motion.good_match, motion.good_match, w);
        unit("motion.frozenPenalty", &mut self.motion.frozen_penalty, motion.frozen_penalty, w);
        unit("motion.frozenMatchPenalty", &mut self.motion.frozen_match_penalty, motion.frozen_match_penalty, w);
        unit("motion.lagRatio", &mut self.motion.lag_ratio, motion.lag_ratio, w);
        unit("motion.lagPenalty", &mut self.motion.lag_penalty, motion.lag_penalty, w);

        let results = ResultsConfig::default();
        unit("results.accuracyWeight", &mut self.results.accuracy_weight, results.accuracy_weight, w);
        unit("results.consistencyWeight", &mut self.results.consistency_weight, results.consistency_weight, w);
        unit("results.timingWeight", &mut self.results.timing_weight, results.timing_weight, w);
        unit("results.styleWeight", &mut self.results.style_weight, results.style_weight, w);
        positive("results.consistencySpread", &mut self.results.consistency_spread, results.consistency_spread, w);
        unit("results.defaultTiming", &mut self.results.default_timing, results.default_timing, w);
        unit("results.styleGoodThreshold", &mut self.results.style_good_threshold, results.style_good_threshold, w);
        unit("results.styleExcellentThreshold", &mut self.results.style_excellent_threshold, results.style_excellent_threshold, w);
        unit("results.styleGoodWeight", &mut self.results.style_good_weight, results.style_good_weight, w);
        non_negative("results.styleExcellentScale", &mut self.results.style_excellent_scale, results.style_excellent_scale, w);
        unit("results.styleExcellentCap", &mut self.results.style_excellent_cap, results.style_excellent_cap, w);
        for (value, fallback) in self.results.difficulty_multipliers.iter_mut().zip(results.difficulty_multipliers) {
            positive("results.difficultyMultipliers", value, fallback, w);
        }
        let thresholds = &self.results.difficulty_thresholds;
        let ascending = thresholds.iter().all(|t| t.is_finite() && *t >= 0.0)
            && thresholds.windows(2).all(|p| p[0] <= p[1]);
        if !ascending {
            w.push(ConfigWarning::OutOfRange {
                field: "results.difficultyThresholds",
                value: f64::NAN,
                min: 0.0,
                max: f64::INFINITY,
                fallback: results.difficulty_thresholds[0] as f64,
            });
            self.results.difficulty_thresholds = results.difficulty_thresholds;
        }

        let points = PointsConfig::default();
        non_negative("points.minBasePoints", &mut self.points.min_base_points, points.min_base_points, w);
        non_negative("points.improvementScale", &mut self.points.improvement_scale, points.improvement_scale, w);
        non_negative("points.pointsPerStreakTier", &mut self.points.points_per_streak_tier, points.points_per_streak_tier, w);
        for (value, fallback) in self.points.difficulty_bonuses.iter_mut().zip(points.difficulty_bonuses) {
            non_negative("points.difficultyBonuses", value, fallback, w);
        }
        for (value, fallback) in self.points.excellence_bonuses.iter_mut().zip(points.excellence_bonuses) {
            non_negative("points.excellenceBonuses", value, fallback, w);
        }
        let tiers = &self.points.excellence_thresholds;
        let ascending = tiers.iter().all(|t| t.is_finite() && (0.0..=100.0).contains(t))
            && tiers.windows(2).all(|p| p[0] <= p[1]);
        if !ascending {
            w.push(ConfigWarning::OutOfRange {
                field: "points.excellenceThresholds",
                value: f64::NAN,
                min: 0.0,
                max: 100.0,
                fallback: points.excellence_thresholds[0] as f64,
            });
            self.points.excellence_thresholds = points.excellence_thresholds;
        }
        if self.points.streak_tier_length == 0 {
            w.push(ConfigWarning::NotPositive {
                field: "points.streakTierLength",
                value: 0.0,
                fallback: points.streak_tier_length as f64,
            });
            self.points.streak_tier_length = points.streak_tier_length;
        }

        warnings
    }

    fn validate_weights(&mut self, w: &mut Vec<ConfigWarning>) {
        let aggregate = &mut self.aggregate;
        for entry in aggregate.weights.iter_mut() {
            if !entry.weight.is_finite() || entry.weight < 0.0 {
                entry.weight = 0.0;
            }
        }
        if !aggregate.shoulder_spread_weight.is_finite() || aggregate.shoulder_spread_weight < 0.0 {
            aggregate.shoulder_spread_weight = 0.0;
        }

        let total = aggregate.total_weight();
        if total <= f32::EPSILON {
            w.push(ConfigWarning::DegenerateWeights { total: total as f64 });
            aggregate.weights = DEFAULT_JOINT_WEIGHTS.to_vec();
            aggregate.shoulder_spread_weight = DEFAULT_SHOULDER_SPREAD_WEIGHT;
        } else if (total - 1.0).abs() > 1e-4 {
            w.push(ConfigWarning::RescaledWeights { total: total as f64 });
            for entry in aggregate.weights.iter_mut() {
                entry.weight /= total;
            }
            aggregate.shoulder_spread_weight /= total;
        }

        let absent = AggregateConfig::default().absent_joint_similarity;
        unit("aggregate.absentJointSimilarity", &mut aggregate.absent_joint_similarity, absent, w);
    }
}

fn positive(field: &'static str, value: &mut f32, fallback: f32, w: &mut Vec<ConfigWarning>) {
    if !(value.is_finite() && *value > 0.0) {
        w.push(ConfigWarning::NotPositive { field, value: *value as f64, fallback: fallback as f64 });
        *value = fallback;
    }
}

fn non_negative(field: &'static str, value: &mut f32, fallback: f32, w: &mut Vec<ConfigWarning>) {
    if !(value.is_finite() && *value >= 0.0) {
        w.push(ConfigWarning::OutOfRange {
            field,
            value: *value as f64,
            min: 0.0,
            max: f64::INFINITY,
            fallback: fallback as f64,
        });
        *value = fallback;
    }
}

fn unit(field: &'static str, value: &mut f32, fallback: f32, w: &mut Vec<ConfigWarning>) {
    if !(value.is_finite() && (0.0..=1.0).contains(value)) {
        w.push(ConfigWarning::OutOfRange {
            field,
            value: *value as f64,
            min: 0.0,
            max: 1.0,
            fallback: fallback as f64,
        });
        *value = fallback;
    }
}
