//! Session scoring state machine
//!
//! Tracks the active reference step, keeps the best similarity seen for
//! every step and decides when to move on. One session owns its state
//! exclusively; frames must arrive in order through `&mut self`.
//!
//! Timestamps are seconds supplied by the caller. Auto-skip compares
//! them on every frame instead of scheduling a timer.

use serde::Serialize;

use super::feed::PoseFeed;
use crate::config::{EngineConfig, SessionConfig};
use crate::pose::{Pose, ReferenceSequence};
use crate::scoring::{FrameScore, MotionVerdict, PoseScorer};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SessionPhase {
    Idle,
    Running,
    Stopped,
}

/// How the session moves from one step to the next
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AdvanceMode {
    /// Advance after `hold_frames` consecutive matching frames
    ThresholdHold { hold_frames: u32 },
    /// Advance after `seconds` on a step, whatever the match quality
    AutoSkip { seconds: f64 },
    /// Never self-advance; a clock calls `go_to_step`
    External,
}

impl AdvanceMode {
    pub fn from_config(config: &SessionConfig) -> Self {
        if config.disable_advancement {
            AdvanceMode::External
        } else if config.auto_skip_seconds > 0.0 {
            AdvanceMode::AutoSkip { seconds: config.auto_skip_seconds }
        } else {
            AdvanceMode::ThresholdHold { hold_frames: config.hold_frames.max(1) }
        }
    }
}

/// Per-frame output for the UI
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FrameResult {
    pub pose: Pose,
    /// Gated similarity as an integer percentage
    pub score: u32,
    pub similarity: f32,
    /// Step the frame was scored against
    pub current_step_index: usize,
    pub per_joint_similarities: Vec<f32>,
    pub verdict: MotionVerdict,
    /// Whether this frame moved the session to another step
    pub advanced: bool,
}

pub struct ScoringSession {
    reference: ReferenceSequence,
    scorer: PoseScorer,
    mode: AdvanceMode,
    match_threshold: f32,

    phase: SessionPhase,
    current_step: usize,
    best_scores: Vec<f32>,
    consecutive_match_frames: u32,
    step_started_at: Option<f64>,

    /// Live pose when the current step became active (motion baseline)
    step_anchor: Option<Pose>,
    last_live: Option<Pose>,
    feed: PoseFeed,
}

impl ScoringSession {
    pub fn new(mut reference: ReferenceSequence, config: &EngineConfig) -> Self {
        reference.sanitize();
        let steps = reference.len();
        Self {
            reference,
            scorer: PoseScorer::from_config(config),
            mode: AdvanceMode::from_config(&config.session),
            match_threshold: config.session.match_threshold,
            phase: SessionPhase::Idle,
            current_step: 0,
            best_scores: vec![0.0; steps],
            consecutive_match_frames: 0,
            step_started_at: None,
            step_anchor: None,
            last_live: None,
            feed: PoseFeed::new(),
        }
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Idle/Stopped → Running. Best scores are kept; call `reset` to
    /// clear them. The step timer restarts at `now`.
    pub fn start(&mut self, now: f64) {
        if self.phase == SessionPhase::Running {
            return;
        }
        self.phase = SessionPhase::Running;
        self.consecutive_match_frames = 0;
        self.step_started_at = Some(self.clock(now));
        log::debug!("Session started at step {}", self.current_step);
    }

    /// Clear best scores and return to the first step
    pub fn reset(&mut self, now: f64) {
        self.best_scores = vec![0.0; self.reference.len()];
        self.current_step = 0;
        self.consecutive_match_frames = 0;
        self.step_started_at = Some(self.clock(now));
        self.step_anchor = None;
        self.last_live = None;
    }

    /// Running → Stopped. Idempotent; later frames are ignored.
    pub fn stop(&mut self) {
        if self.phase == SessionPhase::Stopped {
            return;
        }
        self.phase = SessionPhase::Stopped;
        self.feed.clear();
        log::debug!("Session stopped with best scores {:?}", self.best_scores);
    }

    // ------------------------------------------------------------------
    // Frame processing
    // ------------------------------------------------------------------

    /// Score one live frame. `None` unless the session is running.
    pub fn process_frame(&mut self, live: Pose, now: f64) -> Option<FrameResult> {
        if self.phase != SessionPhase::Running {
            return None;
        }
        let now = self.clock(now);

        if self.reference.is_empty() {
            self.feed.publish(live.clone());
            self.last_live = Some(live.clone());
            return Some(Self::frame_result(live, FrameScore::zero(), 0, false));
        }

        if self.step_anchor.is_none() {
            self.step_anchor = Some(live.clone());
        }

        let index = self.current_step;
        let previous_target = index.checked_sub(1).and_then(|i| self.reference.step(i));
        let frame = match self.reference.step(index) {
            Some(target) => {
                self.scorer.score(&live, target, previous_target, self.step_anchor.as_ref())
            }
            None => FrameScore::zero(),
        };

        if let Some(best) = self.best_scores.get_mut(index) {
            *best = best.max(frame.similarity);
        }

        if frame.similarity >= self.match_threshold {
            self.consecutive_match_frames = self.consecutive_match_frames.saturating_add(1);
        } else {
            self.consecutive_match_frames = 0;
        }

        let advanced = match self.mode {
            AdvanceMode::ThresholdHold { hold_frames } => {
                self.consecutive_match_frames >= hold_frames && self.advance(now, &live)
            }
            AdvanceMode::AutoSkip { seconds } => {
                let started = self.step_started_at.unwrap_or(now);
                now - started >= seconds && self.advance(now, &live)
            }
            AdvanceMode::External => false,
        };

        self.feed.publish(live.clone());
        self.last_live = Some(live.clone());
        Some(Self::frame_result(live, frame, index, advanced))
    }

    /// Move to the next step. The final step never advances past itself.
    fn advance(&mut self, now: f64, live: &Pose) -> bool {
        if self.current_step >= self.reference.last_index() {
            return false;
        }
        self.current_step += 1;
        self.enter_step(now, Some(live.clone()));
        log::debug!("Advanced to step {}", self.current_step);
        true
    }

    fn enter_step(&mut self, now: f64, anchor: Option<Pose>) {
        self.consecutive_match_frames = 0;
        self.step_started_at = Some(now);
        self.step_anchor = anchor;
    }

    // ------------------------------------------------------------------
    // External control
    // ------------------------------------------------------------------

    /// Jump to a step (clamped). Used by time-synced drivers; ignored once
    /// the session is stopped. Returns the active step.
    pub fn go_to_step(&mut self, index: usize, now: f64) -> usize {
        if self.phase == SessionPhase::Stopped {
            return self.current_step;
        }
        let now = self.clock(now);
        self.current_step = index.min(self.reference.last_index());
        let anchor = self.last_live.clone();
        self.enter_step(now, anchor);
        self.current_step
    }

    /// Follow a reference-video clock: activate the step whose start time
    /// has passed. `None` when the sequence has no step times.
    pub fn sync_to_time(&mut self, video_time: f64, now: f64) -> Option<usize> {
        let step = self.reference.step_at_time(video_time)?;
        if step != self.current_step {
            self.go_to_step(step, now);
        }
        Some(self.current_step)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn mode(&self) -> AdvanceMode {
        self.mode
    }

    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn consecutive_match_frames(&self) -> u32 {
        self.consecutive_match_frames
    }

    pub fn step_started_at(&self) -> Option<f64> {
        self.step_started_at
    }

    pub fn reference(&self) -> &ReferenceSequence {
        &self.reference
    }

    /// Best similarity per step so far
    pub fn best_scores(&self) -> &[f32] {
        &self.best_scores
    }

    /// Final per-step result, available once stopped
    pub fn final_scores(&self) -> Option<&[f32]> {
        (self.phase == SessionPhase::Stopped).then_some(self.best_scores.as_slice())
    }

    pub fn feed(&self) -> &PoseFeed {
        &self.feed
    }

    pub fn feed_mut(&mut self) -> &mut PoseFeed {
        &mut self.feed
    }

    // ------------------------------------------------------------------

    fn clock(&self, now: f64) -> f64 {
        if now.is_finite() {
            now
        } else {
            self.step_started_at.unwrap_or(0.0)
        }
    }

    fn frame_result(pose: Pose, frame: FrameScore, index: usize, advanced: bool) -> FrameResult {
        FrameResult {
            pose,
            score: (frame.similarity * 100.0).round().clamp(0.0, 100.0) as u32,
            similarity: frame.similarity,
            current_step_index: index,
            per_joint_similarities: frame.per_joint,
            verdict: frame.verdict,
            advanced,
        }
    }
}
