// Audio transport error types

use std::fmt;

/// Audio-related errors
///
/// These errors cover capture device access, stream lifecycle, and
/// WAV file replay. Detection itself never raises; only the transports do.
#[derive(Debug)]
pub enum AudioError {
    /// No input device is available on the default host
    NoInputDevice,

    /// Device or configuration enumeration failed
    DeviceEnumeration { reason: String },

    /// Failed to open or start an audio stream
    StreamOpenFailed { reason: String },

    /// The capture channel closed while the consumer was still reading
    StreamClosed,

    /// The device or file does not provide the channel layout we need
    UnsupportedChannelCount { got: u16 },

    /// WAV file could not be read or decoded
    FileRead { reason: String },
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::NoInputDevice => {
                write!(f, "no audio input device available")
            }
            AudioError::DeviceEnumeration { reason } => {
                write!(f, "failed to enumerate audio devices: {}", reason)
            }
            AudioError::StreamOpenFailed { reason } => {
                write!(f, "failed to open audio stream: {}", reason)
            }
            AudioError::StreamClosed => {
                write!(f, "audio stream closed unexpectedly")
            }
            AudioError::UnsupportedChannelCount { got } => {
                write!(f, "unsupported channel count {} (need 1 or 2)", got)
            }
            AudioError::FileRead { reason } => {
                write!(f, "failed to read audio file: {}", reason)
            }
        }
    }
}

impl std::error::Error for AudioError {}

impl From<std::io::Error> for AudioError {
    fn from(err: std::io::Error) -> Self {
        AudioError::FileRead {
            reason: err.to_string(),
        }
    }
}

impl From<hound::Error> for AudioError {
    fn from(err: hound::Error) -> Self {
        AudioError::FileRead {
            reason: err.to_string(),
        }
    }
}
