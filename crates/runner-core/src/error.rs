//! Configuration and snapshot errors.

/// Errors raised while loading or validating a [`RunnerConfig`](crate::config::RunnerConfig).
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Tile pool must contain at least one tile")]
    EmptyTilePool,

    #[error("{field} must be a positive finite number, got {value}")]
    NonPositive { field: &'static str, value: f32 },

    #[error("{field} must be a non-negative finite number, got {value}")]
    Negative { field: &'static str, value: f32 },

    #[error("Spawner '{name}' uses a line pattern without offsets")]
    EmptyLinePattern { name: String },

    #[error("Recycle threshold {threshold} must lie behind the origin")]
    ThresholdAhead { threshold: f32 },

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Errors raised while encoding or decoding a [`RunSnapshot`](crate::snapshot::RunSnapshot).
#[derive(Debug, thiserror::Error)]
pub enum SnapshotError {
    #[error("Snapshot encoding failed: {0}")]
    Postcard(#[from] postcard::Error),
}

/// Checks that `value` is finite and strictly positive.
pub(crate) fn ensure_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

/// Checks that `value` is finite and not below zero.
pub(crate) fn ensure_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}
