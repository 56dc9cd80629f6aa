// SegmentResampler - linear-interpolation rate conversion
//
// Feature extraction runs at a fixed rate (16 kHz by default) regardless
// of the capture rate, so detected segments pass through here first. For
// percussive transients the linear kernel is accurate enough and keeps
// the conversion pure, stateless, and allocation-bounded; amplitude never
// exceeds the input peak because every output sample is a convex blend of
// two neighbors.

use crate::audio::Segment;

/// Resample one channel from `from_rate` to `to_rate`
pub fn resample_channel(samples: &[f32], from_rate: u32, to_rate: u32) -> Vec<f32> {
    if from_rate == to_rate || samples.is_empty() {
        return samples.to_vec();
    }

    let ratio = from_rate as f64 / to_rate as f64;
    let out_len = ((samples.len() as f64 / ratio).round() as usize).max(1);
    let mut out = Vec::with_capacity(out_len);

    for i in 0..out_len {
        let src_pos = i as f64 * ratio;
        let idx = src_pos as usize;
        if idx + 1 >= samples.len() {
            out.push(samples[samples.len() - 1]);
        } else {
            let frac = (src_pos - idx as f64) as f32;
            out.push(samples[idx] * (1.0 - frac) + samples[idx + 1] * frac);
        }
    }

    out
}

/// Resample a stereo segment to `target_rate`, preserving channel count
///
/// A segment already at the target rate is returned unchanged.
pub fn resample_segment(segment: &Segment, target_rate: u32) -> Segment {
    if segment.sample_rate() == target_rate {
        return segment.clone();
    }

    Segment::new(
        resample_channel(segment.left(), segment.sample_rate(), target_rate),
        resample_channel(segment.right(), segment.sample_rate(), target_rate),
        target_rate,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_at_equal_rates() {
        let samples = vec![0.1, -0.2, 0.3];
        assert_eq!(resample_channel(&samples, 16_000, 16_000), samples);
    }

    #[test]
    fn test_length_scales_with_rate_ratio() {
        let samples = vec![0.5; 480];
        let up = resample_channel(&samples, 48_000, 16_000);
        assert_eq!(up.len(), 160);

        let down = resample_channel(&samples, 16_000, 48_000);
        assert_eq!(down.len(), 1440);
    }

    #[test]
    fn test_amplitude_bounded_by_input_peak() {
        let samples: Vec<f32> = (0..1000)
            .map(|i| (i as f32 * 0.11).sin() * 0.8)
            .collect();
        let out = resample_channel(&samples, 44_100, 16_000);
        let peak = out.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
        assert!(peak <= 0.8 + 1e-6, "peak {} exceeds input", peak);
    }

    #[test]
    fn test_constant_signal_stays_constant() {
        let samples = vec![0.25; 441];
        let out = resample_channel(&samples, 44_100, 16_000);
        for &v in &out {
            assert!((v - 0.25).abs() < 1e-6);
        }
    }

    #[test]
    fn test_segment_keeps_both_channels() {
        let segment = Segment::new(vec![1.0; 48], vec![-1.0; 48], 48_000);
        let out = resample_segment(&segment, 16_000);
        assert_eq!(out.sample_rate(), 16_000);
        assert_eq!(out.len(), 16);
        assert!(out.left().iter().all(|&v| (v - 1.0).abs() < 1e-6));
        assert!(out.right().iter().all(|&v| (v + 1.0).abs() < 1e-6));
    }
}
