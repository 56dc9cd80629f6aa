// Analysis module - DSP pipeline for stomp detection and classification
//
// This module orchestrates the complete analysis path, one synchronous
// call per incoming audio block:
//
//   block -> SlidingWindow -> OnsetDetector -> {segments}
//         -> (resample -> FeatureExtractor, when the classifier wants it)
//         -> StompClassifier -> DetectionEvent
//
// Everything runs on the caller's thread inside the block's real-time
// budget; the only per-block work in the common case is one envelope
// computation. Feature extraction happens per detected stomp, which is
// rare by construction (debounce).

pub mod envelope;
pub mod features;
pub mod onset;
pub mod resample;

pub use envelope::EnergyEnvelope;
pub use features::{FeatureExtractor, FeatureVector, FEATURE_DIM};
pub use onset::OnsetDetector;
pub use resample::{resample_channel, resample_segment};

use crate::audio::{SlidingWindow, StereoBlock};
use crate::classify::{Direction, StompClassifier, StompInput};
use crate::config::AppConfig;
use crate::error::{ClassifyError, ConfigError};

/// One classified stomp, as emitted by the pipeline
#[derive(Debug, Clone, serde::Serialize)]
pub struct DetectionEvent {
    /// Classified movement direction
    pub direction: Direction,
    /// Stream position at the end of the triggering block, in ms
    pub timestamp_ms: u64,
    /// Peak absolute amplitude of the detected segment
    pub peak_amplitude: f32,
}

/// The full detection-to-classification pipeline for one audio stream
///
/// Owns the rolling window and all detector state; one instance per
/// stream, never shared across threads.
pub struct StompPipeline {
    detector: OnsetDetector,
    extractor: FeatureExtractor,
    classifier: Box<dyn StompClassifier>,
    window: SlidingWindow,
    target_rate: u32,
    sample_rate: u32,
    processed_samples: u64,
    /// Anchor for the stream clock; `epoch + processed_samples / rate` is
    /// the detector's notion of "now", which keeps wall-clock debounce
    /// correct even when a file is replayed faster than real time
    epoch: std::time::Instant,
}

impl StompPipeline {
    pub fn new(
        config: &AppConfig,
        classifier: Box<dyn StompClassifier>,
    ) -> Result<Self, ConfigError> {
        let detector = OnsetDetector::new(config.detector.clone())?;
        let extractor = FeatureExtractor::new(config.features.clone());
        let window = SlidingWindow::new(
            config.detector.buffer_frames(),
            config.detector.sample_rate,
        );

        Ok(Self {
            detector,
            extractor,
            classifier,
            window,
            target_rate: config.features.target_rate,
            sample_rate: config.detector.sample_rate,
            processed_samples: 0,
            epoch: std::time::Instant::now(),
        })
    }

    /// Feed one capture block, returning zero or more classified events
    pub fn process_block(
        &mut self,
        block: &StereoBlock,
    ) -> Result<Vec<DetectionEvent>, ClassifyError> {
        if block.overflow {
            tracing::warn!("[Pipeline] Capture overflow reported upstream");
        }

        self.processed_samples += block.len() as u64;
        self.window.push_block(block);

        let stream_now = self.epoch
            + std::time::Duration::from_secs_f64(
                self.processed_samples as f64 / self.sample_rate as f64,
            );
        let segments = self.detector.process_at(&self.window, stream_now);
        if segments.is_empty() {
            return Ok(Vec::new());
        }

        let timestamp_ms =
            (self.processed_samples as f64 / self.sample_rate as f64 * 1000.0) as u64;

        let mut events = Vec::with_capacity(segments.len());
        for segment in segments {
            let features = if self.classifier.wants_features() {
                let resampled = resample_segment(&segment, self.target_rate);
                Some(self.extractor.extract(&resampled))
            } else {
                None
            };

            let direction = self.classifier.classify(&StompInput {
                segment: &segment,
                features: features.as_ref(),
            })?;

            let peak_amplitude = segment
                .mono()
                .iter()
                .fold(0.0f32, |acc, &v| acc.max(v.abs()));

            tracing::info!(
                "[Pipeline] Stomp at {} ms classified as '{}' (peak {:.3})",
                timestamp_ms,
                direction,
                peak_amplitude
            );

            events.push(DetectionEvent {
                direction,
                timestamp_ms,
                peak_amplitude,
            });
        }

        Ok(events)
    }

    pub fn detector(&self) -> &OnsetDetector {
        &self.detector
    }

    pub fn detector_mut(&mut self) -> &mut OnsetDetector {
        &mut self.detector
    }

    /// Total samples fed so far, the pipeline's stream clock
    pub fn processed_samples(&self) -> u64 {
        self.processed_samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::{EnergyRatioClassifier, FnScorer, ScoredClassifier, LABELS_LATERAL};
    use crate::config::{DetectorConfig, FallbackPolicy, ThresholdMode};

    fn test_app_config() -> AppConfig {
        AppConfig {
            detector: DetectorConfig {
                sample_rate: 1000,
                window_ms: 200,
                buffer_ms: None,
                frame_ms: 20,
                hop_ms: 10,
                energy_threshold: 0.5,
                alpha: 0.5,
                threshold_mode: ThresholdMode::Static,
                peak_picking: false,
                cooldown_blocks: Some(3),
                min_stomp_sep_ms: None,
                mid_window: false,
                adapt_during_cooldown: false,
            },
            ..AppConfig::default()
        }
    }

    fn silent_block() -> StereoBlock {
        StereoBlock {
            left: vec![0.0; 50],
            right: vec![0.0; 50],
            sample_rate: 1000,
            overflow: false,
        }
    }

    fn pulse_block(left_amp: f32, right_amp: f32) -> StereoBlock {
        let mut left = vec![0.0; 50];
        let mut right = vec![0.0; 50];
        for i in 15..35 {
            left[i] = left_amp;
            right[i] = right_amp;
        }
        StereoBlock {
            left,
            right,
            sample_rate: 1000,
            overflow: false,
        }
    }

    #[test]
    fn test_silence_produces_no_events() {
        let classifier = EnergyRatioClassifier::new(FallbackPolicy::Center);
        let mut pipeline = StompPipeline::new(&test_app_config(), Box::new(classifier)).unwrap();

        for _ in 0..10 {
            let events = pipeline.process_block(&silent_block()).unwrap();
            assert!(events.is_empty());
        }
    }

    #[test]
    fn test_left_heavy_stomp_yields_left_event() {
        let classifier = EnergyRatioClassifier::new(FallbackPolicy::Center);
        let mut pipeline = StompPipeline::new(&test_app_config(), Box::new(classifier)).unwrap();

        for _ in 0..4 {
            pipeline.process_block(&silent_block()).unwrap();
        }
        let events = pipeline.process_block(&pulse_block(1.0, 0.05)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].direction, Direction::Left);
        assert!(events[0].peak_amplitude > 0.4);
    }

    #[test]
    fn test_cooldown_absorbs_following_blocks() {
        let classifier = EnergyRatioClassifier::new(FallbackPolicy::Center);
        let mut pipeline = StompPipeline::new(&test_app_config(), Box::new(classifier)).unwrap();

        let events = pipeline.process_block(&pulse_block(1.0, 1.0)).unwrap();
        assert_eq!(events.len(), 1);

        // The pulse stays inside the 200 ms window for the next three
        // 50 ms blocks; cooldown must absorb all of them
        for _ in 0..3 {
            let events = pipeline.process_block(&silent_block()).unwrap();
            assert!(events.is_empty());
        }
    }

    #[test]
    fn test_learned_classifier_gets_features() {
        let scorer = FnScorer::new(2, |features: &[f32]| {
            assert_eq!(features.len(), FEATURE_DIM);
            Ok(1)
        });
        let classifier = ScoredClassifier::new(scorer, &LABELS_LATERAL, FEATURE_DIM).unwrap();
        let mut pipeline = StompPipeline::new(&test_app_config(), Box::new(classifier)).unwrap();

        let events = pipeline.process_block(&pulse_block(0.8, 0.8)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].direction, Direction::Right);
    }

    #[test]
    fn test_timestamps_advance_with_stream_position() {
        let classifier = EnergyRatioClassifier::new(FallbackPolicy::Center);
        let mut pipeline = StompPipeline::new(&test_app_config(), Box::new(classifier)).unwrap();

        for _ in 0..20 {
            pipeline.process_block(&silent_block()).unwrap();
        }
        // 20 blocks of 50 samples at 1 kHz = 1000 ms into the stream
        assert_eq!(pipeline.processed_samples(), 1000);

        let events = pipeline.process_block(&pulse_block(1.0, 1.0)).unwrap();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].timestamp_ms, 1050);
    }

    #[test]
    fn test_overflow_flag_does_not_disturb_detection() {
        let classifier = EnergyRatioClassifier::new(FallbackPolicy::Center);
        let mut pipeline = StompPipeline::new(&test_app_config(), Box::new(classifier)).unwrap();

        let mut block = pulse_block(1.0, 1.0);
        block.overflow = true;
        let events = pipeline.process_block(&block).unwrap();
        assert_eq!(events.len(), 1);
    }
}
