//! Landmark sources and headless replay
//!
//! A detector is an explicit resource: acquire it, pull frames, release
//! it. [`SourceLease`] releases on drop so a session's lifetime does not
//! depend on any UI component being mounted.

use std::collections::VecDeque;

use super::state::{AdvanceMode, FrameResult, ScoringSession, SessionPhase};
use crate::error::SourceError;
use crate::pose::Pose;

/// One detector frame with its capture time in seconds
#[derive(Clone, Debug, PartialEq)]
pub struct TimedPose {
    pub timestamp: f64,
    pub pose: Pose,
}

impl TimedPose {
    pub fn new(timestamp: f64, pose: Pose) -> Self {
        Self { timestamp, pose }
    }
}

/// Anything that yields landmark frames in arrival order
pub trait LandmarkSource {
    fn acquire(&mut self) -> Result<(), SourceError>;

    /// Next frame, or `None` when the source is exhausted
    fn next_frame(&mut self) -> Option<TimedPose>;

    fn release(&mut self);
}

/// Scoped hold on a [`LandmarkSource`]; released when dropped
pub struct SourceLease<'a, S: LandmarkSource> {
    source: &'a mut S,
}

impl<'a, S: LandmarkSource> SourceLease<'a, S> {
    pub fn acquire(source: &'a mut S) -> Result<Self, SourceError> {
        source.acquire()?;
        Ok(Self { source })
    }

    pub fn next_frame(&mut self) -> Option<TimedPose> {
        self.source.next_frame()
    }
}

impl<S: LandmarkSource> Drop for SourceLease<'_, S> {
    fn drop(&mut self) {
        self.source.release();
    }
}

/// Pre-recorded frames, e.g. for server-side re-scoring
#[derive(Clone, Debug, Default)]
pub struct RecordedSource {
    frames: VecDeque<TimedPose>,
    acquired: bool,
}

impl RecordedSource {
    pub fn new(frames: Vec<TimedPose>) -> Self {
        Self { frames: frames.into(), acquired: false }
    }

    /// Frames spaced `1 / fps` seconds apart starting at 0
    pub fn at_fps(poses: Vec<Pose>, fps: f64) -> Self {
        let interval = if fps > 0.0 { 1.0 / fps } else { 0.0 };
        let frames = poses
            .into_iter()
            .enumerate()
            .map(|(i, pose)| TimedPose::new(i as f64 * interval, pose))
            .collect();
        Self::new(frames)
    }

    pub fn is_acquired(&self) -> bool {
        self.acquired
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl LandmarkSource for RecordedSource {
    fn acquire(&mut self) -> Result<(), SourceError> {
        if self.acquired {
            return Err(SourceError::AlreadyAcquired);
        }
        self.acquired = true;
        Ok(())
    }

    fn next_frame(&mut self) -> Option<TimedPose> {
        if !self.acquired {
            return None;
        }
        self.frames.pop_front()
    }

    fn release(&mut self) {
        self.acquired = false;
    }
}

/// Drive a session from a source until it runs dry, then stop it.
///
/// An idle session is started at the first frame's timestamp. In
/// external mode with step times, the step follows elapsed time since
/// the first frame.
pub fn replay<S: LandmarkSource>(
    source: &mut S,
    session: &mut ScoringSession,
) -> Result<Vec<FrameResult>, SourceError> {
    let mut lease = SourceLease::acquire(source)?;
    let mut results = Vec::new();
    let mut first_timestamp = None;

    while let Some(frame) = lease.next_frame() {
        let origin = *first_timestamp.get_or_insert(frame.timestamp);
        if session.phase() == SessionPhase::Idle {
            session.start(frame.timestamp);
        }
        if session.mode() == AdvanceMode::External {
            session.sync_to_time(frame.timestamp - origin, frame.timestamp);
        }
        if let Some(result) = session.process_frame(frame.pose, frame.timestamp) {
            results.push(result);
        }
    }

    session.stop();
    Ok(results)
}
