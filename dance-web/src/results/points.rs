//! Performance points awarded for a finished session

use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use crate::config::PointsConfig;

/// Player history supplied by the leaderboard side
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct PlayerHistory {
    /// Best previous final score percent for this routine
    pub personal_best: f32,
    pub current_streak: u32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointsBreakdown {
    #[serde(rename = "basePP")]
    pub base_pp: f32,
    pub difficulty_bonus: f32,
    pub improvement_bonus: f32,
    pub streak_bonus: f32,
    pub excellence_bonus: f32,
}

impl PointsBreakdown {
    pub fn total(&self) -> f32 {
        self.base_pp + self.difficulty_bonus + self.improvement_bonus + self.streak_bonus + self.excellence_bonus
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PerformancePoints {
    #[serde(rename = "totalPP")]
    pub total_pp: u32,
    pub breakdown: PointsBreakdown,
}

/// Bonus of the highest excellence tier reached
fn excellence_bonus(final_percent: f32, config: &PointsConfig) -> f32 {
    config
        .excellence_thresholds
        .iter()
        .zip(config.excellence_bonuses)
        .filter(|(threshold, _)| final_percent >= **threshold)
        .last()
        .map_or(0.0, |(_, bonus)| bonus)
}

fn streak_bonus(streak: u32, config: &PointsConfig) -> f32 {
    if config.streak_tier_length == 0 || streak < config.streak_tier_length {
        return 0.0;
    }
    let tiers = (streak / config.streak_tier_length).min(config.max_streak_tiers);
    tiers as f32 * config.points_per_streak_tier
}

/// Convert a final score percent into points
pub fn performance_points(
    final_percent: f32,
    difficulty: Difficulty,
    history: &PlayerHistory,
    config: &PointsConfig,
) -> PerformancePoints {
    let score = if final_percent.is_finite() { final_percent.clamp(0.0, 100.0) } else { 0.0 };
    let personal_best = if history.personal_best.is_finite() { history.personal_best } else { 0.0 };

    let improvement_bonus = if score > personal_best {
        config.improvement_scale * (score - personal_best) / 100.0
    } else {
        0.0
    };

    let breakdown = PointsBreakdown {
        base_pp: score.max(config.min_base_points),
        difficulty_bonus: difficulty.bonus_points(config),
        improvement_bonus,
        streak_bonus: streak_bonus(history.current_streak, config),
        excellence_bonus: excellence_bonus(score, config),
    };

    PerformancePoints {
        total_pp: breakdown.total().max(0.0).round() as u32,
        breakdown,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimum_base_points() {
        let points = performance_points(0.0, Difficulty::Beginner, &PlayerHistory::default(), &PointsConfig::default());
        assert_eq!(points.breakdown.base_pp, 5.0);
        assert_eq!(points.total_pp, 5);
    }

    #[test]
    fn test_all_bonuses() {
        let history = PlayerHistory { personal_best: 80.0, current_streak: 7 };
        let points = performance_points(96.0, Difficulty::Advanced, &history, &PointsConfig::default());
        assert_eq!(points.breakdown.difficulty_bonus, 35.0);
        assert!((points.breakdown.improvement_bonus - 4.0).abs() < 1e-4);
        assert_eq!(points.breakdown.streak_bonus, 20.0);
        assert_eq!(points.breakdown.excellence_bonus, 15.0);
        assert_eq!(points.total_pp, 170);
    }

    #[test]
    fn test_streak_caps_at_three_tiers() {
        let config = PointsConfig::default();
        assert_eq!(streak_bonus(2, &config), 0.0);
        assert_eq!(streak_bonus(3, &config), 10.0);
        assert_eq!(streak_bonus(50, &config), 30.0);
    }

    #[test]
    fn test_no_improvement_below_personal_best() {
        let history = PlayerHistory { personal_best: 90.0, current_streak: 0 };
        let points = performance_points(70.0, Difficulty::Beginner, &history, &PointsConfig::default());
        assert_eq!(points.breakdown.improvement_bonus, 0.0);
        assert_eq!(points.total_pp, 70);
    }

    #[test]
    fn test_excellence_tiers() {
        let config = PointsConfig::default();
        assert_eq!(excellence_bonus(84.9, &config), 0.0);
        assert_eq!(excellence_bonus(85.0, &config), 5.0);
        assert_eq!(excellence_bonus(90.0, &config), 10.0);
        assert_eq!(excellence_bonus(100.0, &config), 15.0);
    }

    #[test]
    fn test_bonus_tables_from_config() {
        let config = PointsConfig {
            difficulty_bonuses: [0.0, 20.0, 35.0, 80.0],
            excellence_thresholds: [70.0, 80.0, 90.0],
            excellence_bonuses: [1.0, 2.0, 3.0],
            ..PointsConfig::default()
        };
        let points = performance_points(75.0, Difficulty::Expert, &PlayerHistory { personal_best: 100.0, current_streak: 0 }, &config);
        assert_eq!(points.breakdown.difficulty_bonus, 80.0);
        assert_eq!(points.breakdown.excellence_bonus, 1.0);
        assert_eq!(points.total_pp, 156);
    }

    #[test]
    fn test_non_finite_inputs() {
        let history = PlayerHistory { personal_best: f32::NAN, current_streak: 0 };
        let points = performance_points(f32::NAN, Difficulty::Beginner, &history, &PointsConfig::default());
        assert_eq!(points.total_pp, 5);
    }

    #[test]
    fn test_field_names() {
        let points = performance_points(50.0, Difficulty::Beginner, &PlayerHistory::default(), &PointsConfig::default());
        let json = serde_json::to_value(points).unwrap();
        assert!(json.get("totalPP").is_some());
        assert!(json["breakdown"].get("basePP").is_some());
        assert!(json["breakdown"].get("difficultyBonus").is_some());
    }
}
