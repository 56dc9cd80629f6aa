// Configuration validation error types

use std::fmt;

/// Errors raised when building a detector or pipeline from configuration
///
/// All of these are rejected at construction time; a successfully built
/// detector never re-validates its parameters mid-stream.
#[derive(Debug, PartialEq)]
pub enum ConfigError {
    /// Smoothing factor must lie strictly inside (0, 1) in adaptive mode
    InvalidAlpha { alpha: f32 },

    /// A duration parameter resolved to zero samples
    ZeroLength { field: &'static str },

    /// The analysis frame does not fit inside the detection window
    FrameExceedsWindow { frame_ms: u32, window_ms: u32 },

    /// The rolling buffer is shorter than the segment window
    WindowExceedsBuffer { window_ms: u32, buffer_ms: u32 },

    /// Both cooldown_blocks and min_stomp_sep_ms were configured
    DebounceConflict,

    /// Neither cooldown_blocks nor min_stomp_sep_ms was configured
    DebounceMissing,

    /// Energy threshold must be positive
    InvalidThreshold { threshold: f32 },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidAlpha { alpha } => {
                write!(f, "alpha must be in (0, 1), got {}", alpha)
            }
            ConfigError::ZeroLength { field } => {
                write!(f, "{} resolves to zero samples", field)
            }
            ConfigError::FrameExceedsWindow {
                frame_ms,
                window_ms,
            } => write!(
                f,
                "frame_ms {} does not fit inside window_ms {}",
                frame_ms, window_ms
            ),
            ConfigError::WindowExceedsBuffer {
                window_ms,
                buffer_ms,
            } => write!(
                f,
                "buffer_ms {} is shorter than window_ms {}",
                buffer_ms, window_ms
            ),
            ConfigError::DebounceConflict => {
                write!(
                    f,
                    "cooldown_blocks and min_stomp_sep_ms are mutually exclusive"
                )
            }
            ConfigError::DebounceMissing => {
                write!(f, "one of cooldown_blocks or min_stomp_sep_ms is required")
            }
            ConfigError::InvalidThreshold { threshold } => {
                write!(f, "energy_threshold must be positive, got {}", threshold)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
