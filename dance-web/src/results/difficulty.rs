//! Routine difficulty from how much the reference moves between steps

use serde::{Deserialize, Serialize};

use crate::config::{PointsConfig, ResultsConfig};
use crate::pose::{Pose, ReferenceSequence};

/// Difficulty tiers, easiest first
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
    Expert,
}

impl Difficulty {
    /// Position in the per-difficulty config tables
    pub fn tier(self) -> usize {
        self as usize
    }

    /// Multiplier applied to the final score fraction
    pub fn multiplier(self, config: &ResultsConfig) -> f32 {
        config.difficulty_multipliers[self.tier()]
    }

    /// Performance point bonus
    pub fn bonus_points(self, config: &PointsConfig) -> f32 {
        config.difficulty_bonuses[self.tier()]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "BEGINNER",
            Difficulty::Intermediate => "INTERMEDIATE",
            Difficulty::Advanced => "ADVANCED",
            Difficulty::Expert => "EXPERT",
        }
    }

    /// Bucket a mean inter-step displacement. `thresholds` are the lower
    /// bounds of Intermediate, Advanced and Expert.
    pub fn classify(displacement: f32, thresholds: &[f32; 3]) -> Self {
        if !displacement.is_finite() || displacement < thresholds[0] {
            Difficulty::Beginner
        } else if displacement < thresholds[1] {
            Difficulty::Intermediate
        } else if displacement < thresholds[2] {
            Difficulty::Advanced
        } else {
            Difficulty::Expert
        }
    }

    pub fn from_reference(reference: &ReferenceSequence, thresholds: &[f32; 3]) -> Self {
        Self::classify(reference_motion(reference), thresholds)
    }
}

/// Mean displacement over every landmark present in both poses
pub fn mean_displacement(a: &Pose, b: &Pose) -> Option<f32> {
    let mut total = 0.0;
    let mut count = 0;

    for (la, lb) in a.iter().zip(b.iter()) {
        if let (Some(la), Some(lb)) = (la, lb) {
            let dx = lb.x - la.x;
            let dy = lb.y - la.y;
            let dz = lb.depth() - la.depth();
            total += (dx * dx + dy * dy + dz * dz).sqrt();
            count += 1;
        }
    }

    (count > 0).then(|| total / count as f32)
}

/// Average displacement between consecutive reference steps (0 for
/// sequences with fewer than two comparable steps)
pub fn reference_motion(reference: &ReferenceSequence) -> f32 {
    let displacements: Vec<f32> = reference
        .steps
        .windows(2)
        .filter_map(|pair| mean_displacement(&pair[0], &pair[1]))
        .filter(|d| d.is_finite())
        .collect();

    if displacements.is_empty() {
        return 0.0;
    }
    displacements.iter().sum::<f32>() / displacements.len() as f32
}
