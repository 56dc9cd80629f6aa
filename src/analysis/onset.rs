// OnsetDetector - energy-envelope stomp detection state machine
//
// One detector instance owns all trigger state for one audio stream: the
// adaptive noise floor, the cooldown counter or last-trigger timestamp,
// and the last accepted peak time in peak-picking mode. The caller invokes
// `process` once per incoming block with its rolling window.
//
// The three historical strategies are unified behind one contract:
// - thresholding axis: adaptive noise-floor multiple vs static normalized
// - debounce axis: frame-count cooldown vs wall-clock minimum separation
// - picker: one segment per triggering window vs one per local envelope
//   maximum (peak picking, for offline replay where timestamps are
//   meaningful)
//
// States: IDLE and COOLDOWN. A trigger moves the detector into COOLDOWN;
// the cooldown absorbs the next `cooldown_blocks` calls (or all calls
// within `min_stomp_sep_ms`) and then expires back to IDLE.

use std::time::{Duration, Instant};

use crate::analysis::envelope::EnergyEnvelope;
use crate::audio::{Segment, SlidingWindow};
use crate::config::{DetectorConfig, ThresholdMode};
use crate::error::ConfigError;

/// Windows whose peak RMS is at or below this are treated as silence and
/// never normalized, so near-zero noise cannot be amplified into a trigger.
const SILENCE_RMS: f32 = 1e-4;

/// Initial adaptive noise floor, low enough that the first real signal
/// dominates the EMA quickly.
const INITIAL_NOISE_FLOOR: f32 = 1e-3;

#[derive(Debug)]
enum DebounceState {
    /// Frame-count cooldown: a trigger suppresses the next `cooldown` calls
    Blocks { cooldown: u32, remaining: u32 },
    /// Wall-clock separation between accepted onsets
    WallClock {
        min_sep: Duration,
        last_trigger: Option<Instant>,
    },
}

impl DebounceState {
    /// Advance the debounce by one call; true means this call is absorbed
    fn tick(&mut self, now: Instant) -> bool {
        match self {
            DebounceState::Blocks { remaining, .. } => {
                if *remaining > 0 {
                    *remaining -= 1;
                    true
                } else {
                    false
                }
            }
            DebounceState::WallClock {
                min_sep,
                last_trigger,
            } => match last_trigger {
                Some(last) => now.saturating_duration_since(*last) < *min_sep,
                None => false,
            },
        }
    }

    fn arm(&mut self, now: Instant) {
        match self {
            DebounceState::Blocks {
                cooldown,
                remaining,
            } => *remaining = *cooldown,
            DebounceState::WallClock { last_trigger, .. } => *last_trigger = Some(now),
        }
    }

    fn is_cooling(&self, now: Instant) -> bool {
        match self {
            DebounceState::Blocks { remaining, .. } => *remaining > 0,
            DebounceState::WallClock {
                min_sep,
                last_trigger,
            } => last_trigger
                .map(|last| now.saturating_duration_since(last) < *min_sep)
                .unwrap_or(false),
        }
    }
}

/// Stomp onset detector over a caller-maintained rolling window
pub struct OnsetDetector {
    config: DetectorConfig,
    envelope: EnergyEnvelope,
    debounce: DebounceState,
    noise_floor: f32,
    /// Estimated time of the last accepted peak (peak-picking mode only)
    last_peak: Option<Instant>,
}

impl OnsetDetector {
    /// Build a detector from validated configuration
    pub fn new(config: DetectorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let envelope = EnergyEnvelope::new(config.frame_len(), config.hop_len());
        let debounce = match (config.cooldown_blocks, config.min_stomp_sep_ms) {
            (Some(blocks), None) => DebounceState::Blocks {
                cooldown: blocks,
                remaining: 0,
            },
            (None, Some(ms)) => DebounceState::WallClock {
                min_sep: Duration::from_millis(ms),
                last_trigger: None,
            },
            // validate() guarantees exactly one
            _ => unreachable!("config validation enforces one debounce mode"),
        };

        Ok(Self {
            config,
            envelope,
            debounce,
            noise_floor: INITIAL_NOISE_FLOOR,
            last_peak: None,
        })
    }

    /// Current adaptive noise floor estimate
    pub fn noise_floor(&self) -> f32 {
        self.noise_floor
    }

    /// Override the adaptive floor, e.g. to warm-start from a known room level
    pub fn set_noise_floor(&mut self, floor: f32) {
        self.noise_floor = floor;
    }

    /// Whether the detector is currently inside its cooldown window
    pub fn is_cooling(&self) -> bool {
        self.debounce.is_cooling(Instant::now())
    }

    /// Process the current window, returning zero or more detected segments
    pub fn process(&mut self, window: &SlidingWindow) -> Vec<Segment> {
        self.process_at(window, Instant::now())
    }

    /// `process` with an explicit clock, the testable entry point
    pub fn process_at(&mut self, window: &SlidingWindow, now: Instant) -> Vec<Segment> {
        if self.config.peak_picking {
            return self.process_peaks(window, now);
        }

        if self.debounce.tick(now) {
            if self.config.adapt_during_cooldown
                && self.config.threshold_mode == ThresholdMode::Adaptive
            {
                if let Some(env) = self.scoped_envelope(window) {
                    self.update_floor(mean(&env));
                }
            }
            return Vec::new();
        }

        let env = match self.scoped_envelope(window) {
            Some(env) => env,
            None => return Vec::new(),
        };

        let segment_energy = max(&env);
        let avg_energy = mean(&env);

        let triggered = match self.config.threshold_mode {
            ThresholdMode::Adaptive => {
                segment_energy > self.noise_floor * self.config.energy_threshold
            }
            ThresholdMode::Static => {
                let normalized_max = if segment_energy > SILENCE_RMS {
                    // Peak of envelope / its own peak RMS
                    1.0
                } else {
                    segment_energy
                };
                normalized_max >= self.config.energy_threshold
            }
        };

        if triggered {
            self.debounce.arm(now);
            // A triggering window must not inflate the floor
            vec![window.full_segment()]
        } else {
            if self.config.threshold_mode == ThresholdMode::Adaptive {
                self.update_floor(avg_energy);
            }
            Vec::new()
        }
    }

    /// Peak-picking mode: one segment per accepted local envelope maximum
    ///
    /// Candidate peaks are deduplicated against the previously accepted one
    /// by estimated absolute time, so re-seeing the same event in a shifted
    /// window does not retrigger. Candidates whose centered extraction
    /// window would run off either buffer edge are discarded.
    fn process_peaks(&mut self, window: &SlidingWindow, now: Instant) -> Vec<Segment> {
        let (scope_start, env) = match self.scoped_envelope_with_offset(window) {
            Some(v) => v,
            None => return Vec::new(),
        };

        let max_rms = max(&env);
        let normalized: Vec<f32> = if max_rms > SILENCE_RMS {
            env.iter().map(|&v| v / max_rms).collect()
        } else {
            env
        };

        let min_sep = match &self.debounce {
            DebounceState::WallClock { min_sep, .. } => *min_sep,
            // validate() ties peak picking to wall-clock debounce
            DebounceState::Blocks { .. } => unreachable!(),
        };

        let half_win = self.config.half_win();
        let sample_rate = self.config.sample_rate as f64;
        let mut segments = Vec::new();

        for i in 1..normalized.len().saturating_sub(1) {
            // >= on the right side keeps the leading edge of flat-topped peaks
            let is_peak = normalized[i] > normalized[i - 1] && normalized[i] >= normalized[i + 1];
            if !is_peak || normalized[i] < self.config.energy_threshold {
                continue;
            }

            let center = scope_start + self.envelope.center_sample(i);
            if center < half_win || center + half_win > window.len() {
                continue;
            }

            let behind = (window.len() - center) as f64 / sample_rate;
            let estimated = now
                .checked_sub(Duration::from_secs_f64(behind))
                .unwrap_or(now);

            let accept = match self.last_peak {
                Some(last) => estimated.saturating_duration_since(last) >= min_sep,
                None => true,
            };
            if !accept {
                continue;
            }

            self.last_peak = Some(estimated);
            segments.push(window.segment(center - half_win, center + half_win));
        }

        segments
    }

    fn update_floor(&mut self, avg_energy: f32) {
        let alpha = self.config.alpha;
        self.noise_floor = (1.0 - alpha) * self.noise_floor + alpha * avg_energy;
    }

    fn scoped_envelope(&self, window: &SlidingWindow) -> Option<Vec<f32>> {
        self.scoped_envelope_with_offset(window).map(|(_, env)| env)
    }

    /// Envelope over the configured scope plus the scope's start offset
    ///
    /// The mid-window variant analyzes only the central `half_win` samples,
    /// avoiding edge distortion from the rolling shift. Either way, a scope
    /// shorter than one analysis frame yields no envelope.
    fn scoped_envelope_with_offset(&self, window: &SlidingWindow) -> Option<(usize, Vec<f32>)> {
        let mono = window.mono();
        let (start, slice): (usize, &[f32]) = if self.config.mid_window {
            let half_win = self.config.half_win();
            if half_win < self.envelope.frame_len() || mono.len() < half_win {
                return None;
            }
            let start = (mono.len() - half_win) / 2;
            (start, &mono[start..start + half_win])
        } else {
            (0, &mono[..])
        };

        let env = self.envelope.compute(slice);
        if env.is_empty() {
            None
        } else {
            Some((start, env))
        }
    }
}

fn max(values: &[f32]) -> f32 {
    values.iter().fold(0.0f32, |acc, &v| acc.max(v))
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}
