//! Simulation errors

use thiserror::Error;

/// Rejected simulation requests. State is left untouched when one of these
/// is returned.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum SimError {
    #[error("step delta must be finite and positive, got {0}")]
    InvalidDeltaTime(f32),
}

/// Check a step delta before any state is mutated
pub fn validate_dt(dt: f32) -> Result<f32, SimError> {
    if dt.is_finite() && dt > 0.0 {
        Ok(dt)
    } else {
        Err(SimError::InvalidDeltaTime(dt))
    }
}
