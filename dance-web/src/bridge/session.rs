//! `DanceSession` - the JS-facing handle around one scoring session
//!
//! JS owns the detector loop and calls `processFrame` with a flat
//! Float32Array per frame. Everything else stays inside the session.

use wasm_bindgen::prelude::*;

use crate::config::EngineConfig;
use crate::error::ReferenceError;
use crate::pose::{Pose, ReferenceSequence, LANDMARK_COUNT};
use crate::results::{submission, PlayerHistory};
use crate::session::ScoringSession;

// ============================================================================
// INPUT CONVERSION
// ============================================================================

fn reference_from_js(value: JsValue) -> Result<ReferenceSequence, ReferenceError> {
    Ok(serde_wasm_bindgen::from_value(value)?)
}

/// Missing config (`undefined` / `null`) means defaults
fn config_from_js(value: JsValue) -> Result<EngineConfig, ReferenceError> {
    let mut config: EngineConfig = if value.is_undefined() || value.is_null() {
        EngineConfig::default()
    } else {
        serde_wasm_bindgen::from_value(value)?
    };
    for warning in config.validate() {
        log::warn!("{}", warning);
    }
    Ok(config)
}

/// Decode one detector frame; a bad layout becomes an empty pose
fn pose_from_flat(data: &[f32]) -> Pose {
    Pose::from_flat(data).unwrap_or_else(|| {
        log::warn!(
            "Invalid landmark data length: {} (expected a multiple of 4, at most {})",
            data.len(),
            LANDMARK_COUNT * 4
        );
        Pose::empty()
    })
}

/// Seconds since the epoch from the JS clock
fn now_seconds() -> f64 {
    js_sys::Date::now() / 1000.0
}

fn to_js<T: serde::Serialize>(value: &T) -> Result<JsValue, JsValue> {
    serde_wasm_bindgen::to_value(value).map_err(|e| JsValue::from_str(&e.to_string()))
}

// ============================================================================
// WASM CLASS
// ============================================================================

#[wasm_bindgen]
pub struct DanceSession {
    session: ScoringSession,
    config: EngineConfig,
}

#[wasm_bindgen]
impl DanceSession {
    /// `reference`: `{ steps: [[{x, y, z, visibility}, ...], ...], stepTimes? }`.
    /// `config`: partial `EngineConfig`, camelCase; omitted fields use defaults.
    #[wasm_bindgen(constructor)]
    pub fn new(reference: JsValue, config: JsValue) -> Result<DanceSession, JsValue> {
        let reference = reference_from_js(reference)?;
        let config = config_from_js(config)?;
        log::info!("Dance session ready with {} steps", reference.len());
        Ok(Self {
            session: ScoringSession::new(reference, &config),
            config,
        })
    }

    pub fn start(&mut self, now: Option<f64>) {
        self.session.start(now.unwrap_or_else(now_seconds));
    }

    pub fn reset(&mut self, now: Option<f64>) {
        self.session.reset(now.unwrap_or_else(now_seconds));
    }

    pub fn stop(&mut self) {
        self.session.stop();
    }

    /// Score one frame. Returns `undefined` unless the session is running.
    #[wasm_bindgen(js_name = "processFrame")]
    pub fn process_frame(&mut self, data: &[f32], now: Option<f64>) -> Result<JsValue, JsValue> {
        let pose = pose_from_flat(data);
        match self.session.process_frame(pose, now.unwrap_or_else(now_seconds)) {
            Some(result) => to_js(&result),
            None => Ok(JsValue::UNDEFINED),
        }
    }

    /// Jump to a step (clamped); returns the step now active
    #[wasm_bindgen(js_name = "goToStep")]
    pub fn go_to_step(&mut self, index: usize, now: Option<f64>) -> usize {
        self.session.go_to_step(index, now.unwrap_or_else(now_seconds))
    }

    /// Follow the reference video clock when step times are known
    #[wasm_bindgen(js_name = "syncToTime")]
    pub fn sync_to_time(&mut self, video_time: f64, now: Option<f64>) -> Option<usize> {
        self.session.sync_to_time(video_time, now.unwrap_or_else(now_seconds))
    }

    #[wasm_bindgen(js_name = "currentStep")]
    pub fn current_step(&self) -> usize {
        self.session.current_step()
    }

    #[wasm_bindgen(js_name = "stepCount")]
    pub fn step_count(&self) -> usize {
        self.session.reference().len()
    }

    #[wasm_bindgen(js_name = "bestScores")]
    pub fn best_scores(&self) -> Vec<f32> {
        self.session.best_scores().to_vec()
    }

    /// Latest live pose in the same flat layout as `processFrame` input
    #[wasm_bindgen(js_name = "latestPose")]
    pub fn latest_pose(&self) -> Option<Vec<f32>> {
        self.session.feed().latest().map(Pose::to_flat)
    }

    #[wasm_bindgen(js_name = "isRunning")]
    pub fn is_running(&self) -> bool {
        self.session.phase() == crate::session::SessionPhase::Running
    }

    /// Stop the session and build `{ report, points }`.
    ///
    /// `timing` is an optional per-step timing accuracy in [0, 1].
    pub fn finish(
        &mut self,
        personal_best: f32,
        current_streak: u32,
        timing: Option<Vec<f32>>,
    ) -> Result<JsValue, JsValue> {
        self.session.stop();
        let history = PlayerHistory { personal_best, current_streak };
        let result = submission(&self.session, &history, timing.as_deref(), &self.config)
            .ok_or_else(|| JsValue::from_str("session is not stopped"))?;
        to_js(&result)
    }
}
