//! Reference sequence - the target poses a session is scored against

use serde::{Deserialize, Serialize};

use super::landmarks::Pose;
use crate::error::ReferenceError;

/// Ordered target poses ("steps"), optionally paired with the time (seconds
/// into the reference video) at which each step begins.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferenceSequence {
    pub steps: Vec<Pose>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_times: Option<Vec<f64>>,
}

impl ReferenceSequence {
    pub fn new(steps: Vec<Pose>) -> Self {
        Self { steps, step_times: None }
    }

    /// Sequence with step times. A time list whose length does not match
    /// the step count is dropped.
    pub fn with_step_times(steps: Vec<Pose>, step_times: Vec<f64>) -> Self {
        let mut sequence = Self { steps, step_times: Some(step_times) };
        sequence.sanitize();
        sequence
    }

    pub fn from_json(json: &str) -> Result<Self, ReferenceError> {
        let mut sequence: Self = serde_json::from_str(json)?;
        sequence.sanitize();
        Ok(sequence)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn step(&self, index: usize) -> Option<&Pose> {
        self.steps.get(index)
    }

    /// Highest valid step index (0 for an empty sequence)
    pub fn last_index(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }

    /// Step that should be active at `video_time` seconds: the last step
    /// whose start time has passed. `None` without usable step times.
    pub fn step_at_time(&self, video_time: f64) -> Option<usize> {
        let times = self.step_times.as_ref()?;
        if times.is_empty() || !video_time.is_finite() {
            return None;
        }

        let started = times.iter().take_while(|&&t| t <= video_time).count();
        Some(started.saturating_sub(1))
    }

    /// Drop step times that cannot be used for time-synced advancement
    pub fn sanitize(&mut self) {
        let valid = match &self.step_times {
            Some(times) => {
                times.len() == self.steps.len()
                    && times.iter().all(|t| t.is_finite())
                    && times.windows(2).all(|w| w[0] <= w[1])
            }
            None => true,
        };

        if !valid {
            log::warn!(
                "Ignoring step times: expected {} ascending finite values",
                self.steps.len()
            );
            self.step_times = None;
        }
    }
}
