//! Configuration management for dynamic parameter tuning
//!
//! This module provides runtime configuration loading from JSON files,
//! enabling fast iteration without recompilation. Detection thresholds,
//! window geometry, debounce behavior, and feature extraction parameters
//! can all be adjusted via the config file for rapid experimentation.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;

/// Complete application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub detector: DetectorConfig,
    pub features: FeatureConfig,
    pub capture: CaptureConfig,
    pub classifier: ClassifierConfig,
}

/// Thresholding strategy for the onset detector
///
/// `Adaptive` compares the window's peak energy against a multiple of the
/// exponentially-smoothed noise floor. `Static` normalizes the envelope by
/// its own peak RMS and compares against a fixed threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThresholdMode {
    Adaptive,
    Static,
}

/// Onset detector parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    /// Capture sample rate in Hz
    pub sample_rate: u32,
    /// Length of emitted segments (and of the rolling window by default), ms
    pub window_ms: u32,
    /// Rolling buffer length when it should exceed the segment window,
    /// e.g. for peak picking over replayed files; defaults to `window_ms`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buffer_ms: Option<u32>,
    /// Analysis frame length for the energy envelope, ms
    pub frame_ms: u32,
    /// Hop between envelope frames, ms
    pub hop_ms: u32,
    /// Trigger threshold: floor multiplier (adaptive) or normalized energy (static)
    pub energy_threshold: f32,
    /// Noise floor smoothing factor, only meaningful in adaptive mode
    pub alpha: f32,
    /// Thresholding strategy
    pub threshold_mode: ThresholdMode,
    /// Emit one segment per local envelope maximum instead of per window
    #[serde(default)]
    pub peak_picking: bool,
    /// Frame-count debounce: number of process calls to skip after a trigger
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cooldown_blocks: Option<u32>,
    /// Wall-clock debounce: minimum separation between accepted onsets, ms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_stomp_sep_ms: Option<u64>,
    /// Compute the envelope over the central half-window only
    #[serde(default)]
    pub mid_window: bool,
    /// Keep adapting the noise floor while a cooldown is active
    #[serde(default)]
    pub adapt_during_cooldown: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            sample_rate: 48_000,
            window_ms: 200,
            buffer_ms: None,
            frame_ms: 20,
            hop_ms: 10,
            // Tuned against hard-floor stomps; soft shoes may need ~0.2
            energy_threshold: 0.3,
            alpha: 0.05,
            threshold_mode: ThresholdMode::Adaptive,
            peak_picking: false,
            cooldown_blocks: Some(4),
            min_stomp_sep_ms: None,
            mid_window: false,
            adapt_during_cooldown: false,
        }
    }
}

impl DetectorConfig {
    /// Validate parameter ranges and the debounce selection
    ///
    /// Exactly one of `cooldown_blocks` / `min_stomp_sep_ms` must be set.
    /// Peak picking needs wall-clock debounce because candidate peaks are
    /// deduplicated by their estimated absolute time, not by call count.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sample_rate == 0 {
            return Err(ConfigError::ZeroLength {
                field: "sample_rate",
            });
        }
        if self.window_ms == 0 {
            return Err(ConfigError::ZeroLength { field: "window_ms" });
        }
        if self.frame_len() == 0 {
            return Err(ConfigError::ZeroLength { field: "frame_ms" });
        }
        if self.hop_len() == 0 {
            return Err(ConfigError::ZeroLength { field: "hop_ms" });
        }
        if self.frame_ms > self.window_ms {
            return Err(ConfigError::FrameExceedsWindow {
                frame_ms: self.frame_ms,
                window_ms: self.window_ms,
            });
        }
        if let Some(buffer_ms) = self.buffer_ms {
            if buffer_ms < self.window_ms {
                return Err(ConfigError::WindowExceedsBuffer {
                    window_ms: self.window_ms,
                    buffer_ms,
                });
            }
        }
        if self.energy_threshold <= 0.0 {
            return Err(ConfigError::InvalidThreshold {
                threshold: self.energy_threshold,
            });
        }
        if self.threshold_mode == ThresholdMode::Adaptive
            && (self.alpha <= 0.0 || self.alpha >= 1.0)
        {
            return Err(ConfigError::InvalidAlpha { alpha: self.alpha });
        }
        match (self.cooldown_blocks, self.min_stomp_sep_ms) {
            (Some(_), Some(_)) => return Err(ConfigError::DebounceConflict),
            (None, None) => return Err(ConfigError::DebounceMissing),
            _ => {}
        }
        if self.peak_picking && self.min_stomp_sep_ms.is_none() {
            return Err(ConfigError::DebounceMissing);
        }
        Ok(())
    }

    /// Envelope frame length in samples
    pub fn frame_len(&self) -> usize {
        (self.frame_ms as u64 * self.sample_rate as u64 / 1000) as usize
    }

    /// Envelope hop length in samples
    pub fn hop_len(&self) -> usize {
        (self.hop_ms as u64 * self.sample_rate as u64 / 1000) as usize
    }

    /// Detection window length in samples
    pub fn window_frames(&self) -> usize {
        (self.window_ms as u64 * self.sample_rate as u64 / 1000) as usize
    }

    /// Half of the segment window, used for centered extraction
    pub fn half_win(&self) -> usize {
        self.window_frames() / 2
    }

    /// Rolling buffer length in samples
    pub fn buffer_frames(&self) -> usize {
        (self.buffer_ms.unwrap_or(self.window_ms) as u64 * self.sample_rate as u64 / 1000) as usize
    }
}

/// Feature extraction parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeatureConfig {
    /// Fixed rate segments are resampled to before feature extraction, Hz
    pub target_rate: u32,
    /// STFT size for cepstral and spectral statistics
    pub n_fft: usize,
    /// STFT hop
    pub hop: usize,
    /// Cepstral coefficients kept per frame
    pub n_cepstra: usize,
    /// Mel filterbank size feeding the cepstrum
    pub n_mels: usize,
    /// Apply spectral noise gating before correlation features
    #[serde(default)]
    pub noise_gate: bool,
    /// Fraction of the noise profile subtracted from each magnitude bin
    pub noise_gate_strength: f32,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            target_rate: 16_000,
            n_fft: 2048,
            hop: 512,
            n_cepstra: 7,
            n_mels: 40,
            noise_gate: false,
            noise_gate_strength: 0.5,
        }
    }
}

/// Capture transport parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CaptureConfig {
    /// Block length delivered per read, ms
    pub step_ms: u32,
    /// Capacity of the capture ring buffer, in blocks
    pub queue_blocks: usize,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            step_ms: 50,
            queue_blocks: 64,
        }
    }
}

/// Fallback policy when the heuristic classifier cannot decide
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Pick a random cardinal direction
    Random,
    /// Always report center
    Center,
}

/// Classifier selection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    pub fallback: FallbackPolicy,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            fallback: FallbackPolicy::Center,
        }
    }
}

impl Default for AppConfig {
    /// Default configuration values (fallback if config file not found)
    fn default() -> Self {
        Self {
            detector: DetectorConfig::default(),
            features: FeatureConfig::default(),
            capture: CaptureConfig::default(),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    ///
    /// Missing or malformed files fall back to defaults with a warning so
    /// the CLI stays usable without an assets directory.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Self {
        match fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    log::info!("[Config] Loaded configuration from {:?}", path.as_ref());
                    config
                }
                Err(err) => {
                    log::warn!(
                        "[Config] Failed to parse JSON from {:?}: {}. Using defaults.",
                        path.as_ref(),
                        err
                    );
                    Self::default()
                }
            },
            Err(err) => {
                log::warn!(
                    "[Config] Failed to read config file {:?}: {}. Using defaults.",
                    path.as_ref(),
                    err
                );
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.detector.validate().is_ok());
        assert_eq!(config.detector.window_ms, 200);
        assert_eq!(config.features.target_rate, 16_000);
        assert_eq!(config.capture.step_ms, 50);
    }

    #[test]
    fn test_derived_lengths() {
        let config = DetectorConfig {
            sample_rate: 1000,
            ..DetectorConfig::default()
        };
        assert_eq!(config.frame_len(), 20);
        assert_eq!(config.hop_len(), 10);
        assert_eq!(config.window_frames(), 200);
        assert_eq!(config.half_win(), 100);
    }

    #[test]
    fn test_debounce_must_be_exactly_one() {
        let mut config = DetectorConfig::default();
        config.cooldown_blocks = Some(4);
        config.min_stomp_sep_ms = Some(250);
        assert_eq!(config.validate(), Err(ConfigError::DebounceConflict));

        config.cooldown_blocks = None;
        config.min_stomp_sep_ms = None;
        assert_eq!(config.validate(), Err(ConfigError::DebounceMissing));
    }

    #[test]
    fn test_peak_picking_requires_wall_clock_debounce() {
        let mut config = DetectorConfig::default();
        config.peak_picking = true;
        assert_eq!(config.validate(), Err(ConfigError::DebounceMissing));

        config.cooldown_blocks = None;
        config.min_stomp_sep_ms = Some(250);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_alpha_range_enforced_in_adaptive_mode() {
        let mut config = DetectorConfig::default();
        config.alpha = 1.5;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidAlpha { .. })
        ));

        // Static mode does not read alpha
        config.threshold_mode = ThresholdMode::Static;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_buffer_must_cover_window() {
        let mut config = DetectorConfig::default();
        config.buffer_ms = Some(100);
        assert!(matches!(
            config.validate(),
            Err(ConfigError::WindowExceedsBuffer { .. })
        ));

        config.buffer_ms = Some(1000);
        assert!(config.validate().is_ok());
        assert_eq!(config.buffer_frames(), 48_000);
    }

    #[test]
    fn test_json_roundtrip() {
        let config = AppConfig::default();
        let json = serde_json::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = serde_json::from_str(&json).unwrap();

        assert_eq!(
            parsed.detector.energy_threshold,
            config.detector.energy_threshold
        );
        assert_eq!(parsed.detector.cooldown_blocks, Some(4));
        assert_eq!(parsed.features.n_cepstra, config.features.n_cepstra);
    }
}
