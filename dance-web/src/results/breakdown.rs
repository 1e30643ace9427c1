//! Session summary from per-step best scores

use serde::{Deserialize, Serialize};

use super::difficulty::Difficulty;
use crate::config::ResultsConfig;

/// Component scores as percentages (0-100)
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub accuracy: f32,
    pub consistency: f32,
    pub timing: f32,
    pub style: f32,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionMetadata {
    pub total_steps: usize,
    pub valid_steps: usize,
    /// Mean of the valid steps, as a percentage
    pub average_step_score: f32,
}

/// Submission payload for one finished session
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub final_score_percent: f32,
    pub breakdown: ScoreBreakdown,
    pub difficulty: Difficulty,
    pub difficulty_multiplier: f32,
    pub metadata: SessionMetadata,
}

fn mean(values: &[f32]) -> Option<f32> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f32>() / values.len() as f32)
}

/// Population standard deviation
fn std_dev(values: &[f32]) -> Option<f32> {
    let m = mean(values)?;
    let variance = values.iter().map(|v| (v - m) * (v - m)).sum::<f32>() / values.len() as f32;
    Some(variance.sqrt())
}

fn fraction_above(values: &[f32], cutoff: f32) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().filter(|&&v| v > cutoff).count() as f32 / values.len() as f32
}

/// Timing component from optional per-step timing accuracies. Only a
/// placeholder signal: the configured neutral default unless the caller
/// supplies values.
pub fn timing_component(timing: Option<&[f32]>, config: &ResultsConfig) -> f32 {
    let finite: Vec<f32> = timing
        .unwrap_or_default()
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
        .collect();
    mean(&finite).unwrap_or(config.default_timing).clamp(0.0, 1.0)
}

/// Reduce best-per-step scores into the submission payload.
///
/// Non-finite entries are ignored. A session where no step scored above
/// zero reports 0 for everything but timing, which keeps its default.
pub fn summarize(
    best_scores: &[f32],
    timing: Option<&[f32]>,
    difficulty: Difficulty,
    config: &ResultsConfig,
) -> SessionReport {
    let scores: Vec<f32> = best_scores
        .iter()
        .filter(|v| v.is_finite())
        .map(|v| v.clamp(0.0, 1.0))
        .collect();
    let valid: Vec<f32> = scores.iter().copied().filter(|&v| v > 0.0).collect();

    let timing = timing_component(timing, config);
    let metadata = SessionMetadata {
        total_steps: best_scores.len(),
        valid_steps: valid.len(),
        average_step_score: mean(&valid).unwrap_or(0.0) * 100.0,
    };

    if valid.is_empty() {
        return SessionReport {
            final_score_percent: 0.0,
            breakdown: ScoreBreakdown {
                timing: timing * 100.0,
                ..ScoreBreakdown::default()
            },
            difficulty,
            difficulty_multiplier: difficulty.multiplier(config),
            metadata,
        };
    }

    let accuracy = mean(&scores).unwrap_or(0.0);

    let spread = if config.consistency_spread > 0.0 { config.consistency_spread } else { 0.5 };
    let consistency = std_dev(&scores).map(|s| (1.0 - s / spread).max(0.0)).unwrap_or(0.0);

    let good = fraction_above(&scores, config.style_good_threshold);
    let excellent = fraction_above(&scores, config.style_excellent_threshold);
    let style = (config.style_good_weight * good
        + (config.style_excellent_scale * excellent).min(config.style_excellent_cap))
    .clamp(0.0, 1.0);

    let weighted = accuracy * config.accuracy_weight
        + consistency * config.consistency_weight
        + timing * config.timing_weight
        + style * config.style_weight;
    let final_fraction = (weighted * difficulty.multiplier(config)).clamp(0.0, 1.0);

    SessionReport {
        final_score_percent: if final_fraction.is_finite() { final_fraction * 100.0 } else { 0.0 },
        breakdown: ScoreBreakdown {
            accuracy: accuracy * 100.0,
            consistency: consistency * 100.0,
            timing: timing * 100.0,
            style: style * 100.0,
        },
        difficulty,
        difficulty_multiplier: difficulty.multiplier(config),
        metadata,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_empty_session() {
        let report = summarize(&[], None, Difficulty::Beginner, &ResultsConfig::default());
        assert_eq!(report.final_score_percent, 0.0);
        assert_eq!(report.breakdown.accuracy, 0.0);
        assert_eq!(report.breakdown.consistency, 0.0);
        assert_eq!(report.breakdown.style, 0.0);
        assert!(close(report.breakdown.timing, 50.0));
        assert_eq!(report.metadata.total_steps, 0);
    }

    #[test]
    fn test_all_zero_session() {
        let report = summarize(&[0.0, 0.0, f32::NAN], None, Difficulty::Expert, &ResultsConfig::default());
        assert_eq!(report.final_score_percent, 0.0);
        assert_eq!(report.metadata.total_steps, 3);
        assert_eq!(report.metadata.valid_steps, 0);
        assert!(!report.breakdown.consistency.is_nan());
    }

    #[test]
    fn test_perfect_session() {
        let report = summarize(&[1.0, 1.0, 1.0], None, Difficulty::Beginner, &ResultsConfig::default());
        assert!(close(report.breakdown.accuracy, 100.0));
        assert!(close(report.breakdown.consistency, 100.0));
        assert!(close(report.breakdown.style, 100.0));
        // 0.6 + 0.2 + 0.05 + 0.1
        assert!(close(report.final_score_percent, 95.0));
        assert!(close(report.metadata.average_step_score, 100.0));
    }

    #[test]
    fn test_difficulty_multiplier_clamps() {
        let report = summarize(&[1.0, 1.0], None, Difficulty::Expert, &ResultsConfig::default());
        assert!(close(report.final_score_percent, 100.0));
        assert_eq!(report.difficulty_multiplier, 2.0);
    }

    #[test]
    fn test_mixed_session() {
        let report = summarize(&[0.5, 1.0], Some(&[1.0, 0.0]), Difficulty::Beginner, &ResultsConfig::default());
        // mean 0.75, sigma 0.25, half above 0.8 and 0.9
        assert!(close(report.breakdown.accuracy, 75.0));
        assert!(close(report.breakdown.consistency, 50.0));
        assert!(close(report.breakdown.timing, 50.0));
        assert!(close(report.breakdown.style, 65.0));
        let expected = 0.75 * 0.6 + 0.5 * 0.2 + 0.5 * 0.1 + 0.65 * 0.1;
        assert!(close(report.final_score_percent, expected * 100.0));
        assert_eq!(report.metadata.valid_steps, 2);
    }

    #[test]
    fn test_style_and_multiplier_from_config() {
        let config = ResultsConfig {
            style_good_weight: 0.5,
            style_excellent_cap: 0.1,
            difficulty_multipliers: [0.5, 1.3, 1.6, 2.0],
            ..ResultsConfig::default()
        };
        let report = summarize(&[1.0, 1.0], None, Difficulty::Beginner, &config);
        assert!(close(report.breakdown.style, 60.0));
        assert_eq!(report.difficulty_multiplier, 0.5);
        // (0.6 + 0.2 + 0.05 + 0.06) * 0.5
        assert!(close(report.final_score_percent, 45.5));
    }

    #[test]
    fn test_timing_component() {
        let config = ResultsConfig::default();
        assert_eq!(timing_component(None, &config), 0.5);
        assert_eq!(timing_component(Some(&[]), &config), 0.5);
        assert_eq!(timing_component(Some(&[f32::NAN, 2.0]), &config), 1.0);
    }

    #[test]
    fn test_report_field_names() {
        let report = summarize(&[0.9], None, Difficulty::Intermediate, &ResultsConfig::default());
        let json = serde_json::to_value(&report).unwrap();
        assert!(json.get("finalScorePercent").is_some());
        assert!(json.get("difficultyMultiplier").is_some());
        assert_eq!(json["difficulty"], "INTERMEDIATE");
        assert!(json["metadata"].get("averageStepScore").is_some());
    }
}
