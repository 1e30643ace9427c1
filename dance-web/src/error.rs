//! Error taxonomy
//!
//! Malformed pose data never produces an error: scoring degrades to
//! documented fallbacks instead. Errors only exist at the edges -
//! parsing input, loading config, acquiring a landmark source.

use thiserror::Error;
use wasm_bindgen::JsValue;

/// Reference sequence or configuration could not be parsed
#[derive(Debug, Error)]
pub enum ReferenceError {
    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid JS value: {0}")]
    JsValue(String),
}

impl From<serde_wasm_bindgen::Error> for ReferenceError {
    fn from(err: serde_wasm_bindgen::Error) -> Self {
        ReferenceError::JsValue(err.to_string())
    }
}

impl From<ReferenceError> for JsValue {
    fn from(err: ReferenceError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

/// A configuration value was unusable and has been replaced by its default
#[derive(Clone, Debug, Error, PartialEq)]
pub enum ConfigWarning {
    #[error("{field} must be a finite number > 0 (got {value}), using {fallback}")]
    NotPositive { field: &'static str, value: f64, fallback: f64 },
    #[error("{field} must be within [{min}, {max}] (got {value}), using {fallback}")]
    OutOfRange { field: &'static str, value: f64, min: f64, max: f64, fallback: f64 },
    #[error("joint weights sum to {total}, using default weight table")]
    DegenerateWeights { total: f64 },
    #[error("joint weights sum to {total}, rescaled to 1.0")]
    RescaledWeights { total: f64 },
}

/// Landmark source lifecycle failures
#[derive(Debug, Error, PartialEq)]
pub enum SourceError {
    #[error("landmark source is already acquired")]
    AlreadyAcquired,
    #[error("landmark source unavailable: {0}")]
    Unavailable(String),
}
