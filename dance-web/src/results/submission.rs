//! Final payload for a stopped session

use serde::{Deserialize, Serialize};

use super::breakdown::{summarize, SessionReport};
use super::difficulty::Difficulty;
use super::points::{performance_points, PerformancePoints, PlayerHistory};
use crate::config::EngineConfig;
use crate::session::ScoringSession;

/// Report plus points, the shape handed to storage and the leaderboard
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Submission {
    pub report: SessionReport,
    pub points: PerformancePoints,
}

/// Aggregate a stopped session. Returns `None` while it is still running.
pub fn submission(
    session: &ScoringSession,
    history: &PlayerHistory,
    timing: Option<&[f32]>,
    config: &EngineConfig,
) -> Option<Submission> {
    let best = session.final_scores()?;
    let difficulty = Difficulty::from_reference(session.reference(), &config.results.difficulty_thresholds);
    let report = summarize(best, timing, difficulty, &config.results);
    let points = performance_points(report.final_score_percent, difficulty, history, &config.points);

    log::info!(
        "session scored {:.1}% ({}), {} PP",
        report.final_score_percent,
        difficulty.as_str(),
        points.total_pp
    );

    Some(Submission { report, points })
}
