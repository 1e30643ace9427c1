//! Motion gate
//!
//! Suppresses similarity when the reference pose is changing but the user
//! is not. Without it, holding the first target pose scores well through
//! an entire routine.

use serde::Serialize;

use crate::config::MotionGateConfig;
use crate::pose::{Pose, MOTION_JOINTS};

/// Mean displacement of the core body joints between two poses.
///
/// Only joints present in both poses count. `None` when nothing is
/// comparable.
pub fn motion_energy(previous: &Pose, current: &Pose) -> Option<f32> {
    let mut total = 0.0;
    let mut count = 0;

    for joint in MOTION_JOINTS {
        if let (Some(a), Some(b)) = (previous.get(joint), current.get(joint)) {
            let dx = b.x - a.x;
            let dy = b.y - a.y;
            let dz = b.depth() - a.depth();
            total += (dx * dx + dy * dy + dz * dz).sqrt();
            count += 1;
        }
    }

    if count == 0 {
        return None;
    }
    let energy = total / count as f32;
    energy.is_finite().then_some(energy)
}

/// How the user's motion compares to the reference's
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum MotionVerdict {
    /// Reference is not moving (or motion is unknown); no penalty
    Steady,
    /// User is following the reference's motion
    Tracking,
    /// User moves far less than the reference
    Lagging,
    /// User is frozen and holding a good match
    FrozenMatch,
    /// User is frozen and not matching
    Frozen,
}

impl MotionVerdict {
    pub fn multiplier(self, config: &MotionGateConfig) -> f32 {
        match self {
            MotionVerdict::Steady | MotionVerdict::Tracking => 1.0,
            MotionVerdict::Lagging => config.lag_penalty,
            MotionVerdict::FrozenMatch => config.frozen_match_penalty,
            MotionVerdict::Frozen => config.frozen_penalty,
        }
    }
}

/// Classify user motion against reference motion.
///
/// Tiers only apply while the reference pose is changing, so holding a
/// pose the reference also holds is never punished.
pub fn classify_motion(
    similarity: f32,
    reference_motion: Option<f32>,
    user_motion: Option<f32>,
    config: &MotionGateConfig,
) -> MotionVerdict {
    let (reference, user) = match (reference_motion, user_motion) {
        (Some(r), Some(u)) => (r, u),
        _ => return MotionVerdict::Steady,
    };

    if reference <= config.reference_epsilon {
        MotionVerdict::Steady
    } else if user < config.freeze_epsilon {
        if similarity < config.good_match {
            MotionVerdict::Frozen
        } else {
            MotionVerdict::FrozenMatch
        }
    } else if user < reference * config.lag_ratio {
        MotionVerdict::Lagging
    } else {
        MotionVerdict::Tracking
    }
}

/// Motion-gated similarity and the verdict that produced it
pub fn apply_motion_gate(
    similarity: f32,
    previous_target: Option<&Pose>,
    current_target: &Pose,
    previous_live: Option<&Pose>,
    current_live: &Pose,
    config: &MotionGateConfig,
) -> (f32, MotionVerdict) {
    let reference_motion = previous_target.and_then(|prev| motion_energy(prev, current_target));
    let user_motion = previous_live.and_then(|prev| motion_energy(prev, current_live));

    let verdict = classify_motion(similarity, reference_motion, user_motion, config);
    let gated = (similarity * verdict.multiplier(config)).clamp(0.0, 1.0);
    (gated, verdict)
}
