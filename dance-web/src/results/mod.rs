//! Results module - session breakdown, difficulty and performance points
//!
//! Re-exports only. All logic in submodules.

mod breakdown;
mod difficulty;
mod points;
mod submission;

pub use breakdown::{summarize, timing_component, ScoreBreakdown, SessionMetadata, SessionReport};
pub use difficulty::{mean_displacement, reference_motion, Difficulty};
pub use points::{performance_points, PerformancePoints, PlayerHistory, PointsBreakdown};
pub use submission::{submission, Submission};
