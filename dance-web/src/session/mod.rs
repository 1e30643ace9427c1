//! Session module - step state machine, pose feed and landmark sources
//!
//! Re-exports only. All logic in submodules.

mod feed;
mod source;
mod state;

pub use feed::{PoseFeed, SubscriptionId};
pub use source::{replay, LandmarkSource, RecordedSource, SourceLease, TimedPose};
pub use state::{AdvanceMode, FrameResult, ScoringSession, SessionPhase};
