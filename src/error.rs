//! Error types for configuration loading and session flow.
//!
//! The per-tick movement core never returns errors: an unavailable physics
//! query degrades to "airborne" and an impossible size change is reported as
//! [`crate::size::SizeChange::Unchanged`].  Errors exist only at the edges,
//! where a file is read or a chapter is looked up.

use std::path::PathBuf;

use thiserror::Error;

use crate::session::ChapterId;

/// Failure while loading or validating [`crate::config::MovementConfig`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse movement config: {0}")]
    Parse(#[from] toml::de::Error),

    /// A tunable is outside the range the movement core can honour.
    #[error("'{name}' = {value} is outside safe range {expected}")]
    OutOfRange {
        name: &'static str,
        value: f32,
        expected: &'static str,
    },

    /// A press deferred by the landing lock would expire in the buffer before
    /// the lock lifts.
    #[error("landing lock ({lock}s) must not exceed the jump buffer ({buffer}s)")]
    LockOutlivesBuffer { lock: f32, buffer: f32 },

    #[error("size profiles must grow strictly in scale from small to large")]
    TierOrder,

    #[error("{tier} profile: capsule height {height} is shorter than its diameter {diameter}")]
    DegenerateCapsule {
        tier: &'static str,
        height: f32,
        diameter: f32,
    },
}

/// Failure while completing a respawn or chapter load.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("chapter {0:?} is not in the catalog")]
    UnknownChapter(ChapterId),

    #[error("no player entity to place")]
    NoPlayer,
}

/// Convenience alias: a `Result` using [`ConfigError`] as the error type.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Returns an error unless `value` is finite and `>= 0`.
pub fn validate_non_negative(name: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            expected: "[0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is finite and strictly positive.
pub fn validate_positive(name: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            expected: "(0.0, ∞)",
        })
    }
}

/// Returns an error unless `value` is finite and strictly negative.
pub fn validate_negative(name: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() && value < 0.0 {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            expected: "(-∞, 0.0)",
        })
    }
}

/// Returns an error unless `value` is finite.
pub fn validate_finite(name: &'static str, value: f32) -> ConfigResult<()> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            name,
            value,
            expected: "(-∞, ∞)",
        })
    }
}
