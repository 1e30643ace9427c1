//! Dance Web - pose similarity scoring for dance practice
//!
//! Entry point for WASM module. Only contains:
//! - Module declarations
//! - wasm_bindgen entry points that delegate to submodules
//!
//! The core (`pose`, `geometry`, `scoring`, `session`, `results`) is plain
//! Rust and runs natively as well, e.g. for server-side re-scoring.

mod bridge;
pub mod config;
pub mod error;
pub mod geometry;
pub mod logging;
pub mod pose;
pub mod results;
pub mod scoring;
pub mod session;

use wasm_bindgen::prelude::*;

// Re-export wasm_bindgen classes for JS access
pub use bridge::DanceSession;

pub use config::EngineConfig;
pub use error::{ConfigWarning, ReferenceError, SourceError};
pub use pose::{Joint, Landmark, Pose, ReferenceSequence};
pub use results::{Difficulty, PerformancePoints, PlayerHistory, SessionReport, Submission};
pub use scoring::{FrameScore, MotionVerdict, PoseScorer};
pub use session::{FrameResult, ScoringSession, SessionPhase};

// ============================================================================
// CONSOLE LOGGING
// ============================================================================

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(js_namespace = console)]
    fn log(s: &str);
}

#[cfg(target_arch = "wasm32")]
macro_rules! console_log {
    ($($t:tt)*) => (log(&format_args!($($t)*).to_string()))
}

// ============================================================================
// WASM ENTRY POINTS
// ============================================================================

/// Called automatically when WASM module loads
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();
    logging::init(::log::LevelFilter::Info);
    console_log!("✅ Dance scoring engine v{} loaded", env!("CARGO_PKG_VERSION"));
}

/// Crate version, for cache busting on the JS side
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
