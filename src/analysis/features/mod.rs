// FeatureExtractor - fixed-order feature vector from a stereo segment
//
// Pipeline, per channel independently then concatenated (left block first):
// peak-normalize, frame at a fixed STFT geometry, compute mel-cepstral
// coefficients plus RMS / zero-crossing rate / spectral centroid per
// frame, and aggregate each series into mean and standard deviation.
// Cross-channel correlation statistics are computed once per segment and
// appear at the tail of both channel blocks.
//
// Module organization:
// - fft: shared forward/inverse transforms with windowing
// - cepstral: mel filterbank + DCT cepstrum
// - spectral: centroid
// - temporal: RMS, ZCR
// - correlation: cross-channel timing statistics
// - denoise: optional spectral noise gate ahead of correlation
// - types: the FeatureVector ordering contract

mod cepstral;
mod correlation;
mod denoise;
pub(crate) mod fft;
mod spectral;
mod temporal;
mod types;

pub use correlation::{cross_correlation_features, CorrelationFeatures};
pub use denoise::NoiseGate;
pub use types::{feature_dim, FeatureVector, FEATURE_DIM};

use cepstral::CepstralExtractor;
use fft::FftProcessor;
use spectral::SpectralFeatures;
use temporal::TemporalFeatures;

use crate::audio::Segment;
use crate::config::FeatureConfig;

/// Coordinates the per-segment feature extraction pipeline
///
/// Segments are expected at the configured target rate; the pipeline
/// resamples them before calling `extract`.
pub struct FeatureExtractor {
    config: FeatureConfig,
    fft: FftProcessor,
    cepstral: CepstralExtractor,
    spectral: SpectralFeatures,
    temporal: TemporalFeatures,
    gate: Option<NoiseGate>,
}

impl FeatureExtractor {
    pub fn new(config: FeatureConfig) -> Self {
        let fft = FftProcessor::new(config.n_fft);
        let cepstral = CepstralExtractor::new(
            config.target_rate,
            config.n_fft,
            config.n_mels,
            config.n_cepstra,
        );
        let spectral = SpectralFeatures::new(config.target_rate, config.n_fft);
        let gate = config
            .noise_gate
            .then(|| NoiseGate::new(config.n_fft, config.hop, config.noise_gate_strength));

        Self {
            config,
            fft,
            cepstral,
            spectral,
            temporal: TemporalFeatures,
            gate,
        }
    }

    /// Output dimension, constant for the extractor's lifetime
    pub fn dim(&self) -> usize {
        feature_dim(self.config.n_cepstra)
    }

    /// Extract the fixed-order feature vector from a stereo segment
    pub fn extract(&self, segment: &Segment) -> FeatureVector {
        let xcorr = self.correlation_block(segment);

        let mut values = Vec::with_capacity(self.dim());
        for channel in [segment.left(), segment.right()] {
            self.push_channel_stats(channel, &mut values);
            values.extend_from_slice(&xcorr.as_array());
        }

        FeatureVector::new(values)
    }

    /// Correlation statistics, optionally behind the noise gate
    fn correlation_block(&self, segment: &Segment) -> CorrelationFeatures {
        let (left, right) = match &self.gate {
            Some(gate) => (gate.apply(segment.left()), gate.apply(segment.right())),
            None => (segment.left().to_vec(), segment.right().to_vec()),
        };
        let left = peak_normalize(left);
        let right = peak_normalize(right);
        cross_correlation_features(&left, &right, segment.sample_rate())
    }

    /// Append one channel's statistics block to `values`
    fn push_channel_stats(&self, channel: &[f32], values: &mut Vec<f32>) {
        let normalized = peak_normalize(channel.to_vec());
        let frames = self.centered_frames(&normalized);

        let mut cepstra: Vec<Vec<f32>> = Vec::with_capacity(frames.len());
        let mut rms = Vec::with_capacity(frames.len());
        let mut zcr = Vec::with_capacity(frames.len());
        let mut centroid = Vec::with_capacity(frames.len());

        for frame in &frames {
            let spectrum = self.fft.compute_magnitude_spectrum(frame);
            cepstra.push(self.cepstral.compute(&spectrum));
            rms.push(self.temporal.compute_rms(frame));
            zcr.push(self.temporal.compute_zcr(frame));
            centroid.push(self.spectral.compute_centroid(&spectrum));
        }

        for c in 0..self.config.n_cepstra {
            let series: Vec<f32> = cepstra.iter().map(|frame| frame[c]).collect();
            values.push(mean(&series));
        }
        for c in 0..self.config.n_cepstra {
            let series: Vec<f32> = cepstra.iter().map(|frame| frame[c]).collect();
            values.push(std_dev(&series));
        }
        values.push(mean(&rms));
        values.push(std_dev(&rms));
        values.push(mean(&zcr));
        values.push(std_dev(&zcr));
        values.push(mean(&centroid));
        values.push(std_dev(&centroid));
    }

    /// Frames centered on hop boundaries via symmetric zero padding
    ///
    /// Even an empty channel yields one all-zero frame, so the output
    /// dimension never depends on segment length.
    fn centered_frames(&self, signal: &[f32]) -> Vec<Vec<f32>> {
        let n_fft = self.config.n_fft;
        let pad = n_fft / 2;
        let mut padded = vec![0.0f32; signal.len() + 2 * pad];
        padded[pad..pad + signal.len()].copy_from_slice(signal);

        let mut frames = Vec::new();
        let mut start = 0;
        while start + n_fft <= padded.len() {
            frames.push(padded[start..start + n_fft].to_vec());
            start += self.config.hop;
        }
        if frames.is_empty() {
            frames.push(vec![0.0; n_fft]);
        }
        frames
    }
}

/// Scale a channel to unit peak amplitude, leaving near-silence untouched
fn peak_normalize(mut samples: Vec<f32>) -> Vec<f32> {
    let peak = samples.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
    if peak > 1e-6 {
        for sample in samples.iter_mut() {
            *sample /= peak;
        }
    }
    samples
}

fn mean(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f32>() / values.len() as f32
}

fn std_dev(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let m = mean(values);
    let variance = values.iter().map(|&v| (v - m) * (v - m)).sum::<f32>() / values.len() as f32;
    variance.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> FeatureExtractor {
        FeatureExtractor::new(FeatureConfig::default())
    }

    fn test_segment(amplitude: f32) -> Segment {
        let left: Vec<f32> = (0..3200)
            .map(|i| amplitude * (i as f32 * 0.21).sin())
            .collect();
        let right: Vec<f32> = (0..3200)
            .map(|i| amplitude * (i as f32 * 0.13).cos())
            .collect();
        Segment::new(left, right, 16_000)
    }

    #[test]
    fn test_dimension_constant_across_energies() {
        let extractor = extractor();
        for amplitude in [0.0, 0.001, 0.1, 1.0, 10.0] {
            let vector = extractor.extract(&test_segment(amplitude));
            assert_eq!(vector.len(), FEATURE_DIM, "amplitude {}", amplitude);
        }
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let extractor = extractor();
        let segment = test_segment(0.5);
        assert_eq!(extractor.extract(&segment), extractor.extract(&segment));
    }

    #[test]
    fn test_correlation_block_repeats_in_both_channels() {
        let extractor = extractor();
        let vector = extractor.extract(&test_segment(0.5));
        let values = vector.as_slice();
        // Per-channel block: 7 means + 7 stds + 6 energy/shape + 4 xcorr = 24
        assert_eq!(&values[20..24], &values[44..48]);
    }

    #[test]
    fn test_identical_channels_zero_phase_unit_peak() {
        let extractor = extractor();
        let mono: Vec<f32> = (0..3200).map(|i| (i as f32 * 0.17).sin() * 0.8).collect();
        let segment = Segment::new(mono.clone(), mono, 16_000);
        let vector = extractor.extract(&segment);
        let values = vector.as_slice();

        // xcorr block of the left channel: phase shift then peak
        assert!(values[20].abs() < 1e-3, "phase shift {} ms", values[20]);
        assert!((values[21] - 1.0).abs() < 1e-3, "peak {}", values[21]);
    }

    #[test]
    fn test_short_segment_still_full_dimension() {
        let extractor = extractor();
        let segment = Segment::new(vec![0.5; 100], vec![0.5; 100], 16_000);
        assert_eq!(extractor.extract(&segment).len(), FEATURE_DIM);
    }

    #[test]
    fn test_noise_gate_changes_correlation_only() {
        let gated = FeatureExtractor::new(FeatureConfig {
            noise_gate: true,
            noise_gate_strength: 1.0,
            ..FeatureConfig::default()
        });
        let plain = extractor();

        let segment = test_segment(0.5);
        let gated_vec = gated.extract(&segment);
        let plain_vec = plain.extract(&segment);

        // Per-channel statistics are identical; only the correlation
        // block may differ under gating
        assert_eq!(gated_vec.as_slice()[..20], plain_vec.as_slice()[..20]);
        assert_eq!(gated_vec.as_slice()[24..44], plain_vec.as_slice()[24..44]);
    }
}
