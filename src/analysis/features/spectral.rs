// Spectral module - frequency-domain per-frame statistics
//
// Only the spectral centroid survives into the feature vector; it carries
// the brightness cue that separates toe taps from flat-footed stomps.

/// Spectral feature computation over magnitude spectra
pub struct SpectralFeatures {
    sample_rate: u32,
    fft_size: usize,
}

impl SpectralFeatures {
    pub fn new(sample_rate: u32, fft_size: usize) -> Self {
        Self {
            sample_rate,
            fft_size,
        }
    }

    /// Spectral centroid (weighted mean frequency) in Hz
    ///
    /// centroid = sum(f_i * |X[i]|) / sum(|X[i]|), 0.0 for silence.
    pub fn compute_centroid(&self, spectrum: &[f32]) -> f32 {
        let freq_bin_width = self.sample_rate as f32 / self.fft_size as f32;

        let weighted_sum: f32 = spectrum
            .iter()
            .enumerate()
            .map(|(i, &mag)| i as f32 * freq_bin_width * mag)
            .sum();

        let magnitude_sum: f32 = spectrum.iter().sum();

        if magnitude_sum > 1e-10 {
            weighted_sum / magnitude_sum
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::features::fft::FftProcessor;

    fn sine(sample_rate: u32, frequency: f32, len: usize) -> Vec<f32> {
        (0..len)
            .map(|i| {
                (2.0 * std::f32::consts::PI * frequency * i as f32 / sample_rate as f32).sin()
            })
            .collect()
    }

    #[test]
    fn test_centroid_tracks_sine_frequency() {
        let fft = FftProcessor::new(2048);
        let spectral = SpectralFeatures::new(16_000, 2048);

        let low = fft.compute_magnitude_spectrum(&sine(16_000, 200.0, 2048));
        let high = fft.compute_magnitude_spectrum(&sine(16_000, 4000.0, 2048));

        let low_centroid = spectral.compute_centroid(&low);
        let high_centroid = spectral.compute_centroid(&high);

        assert!(low_centroid < 1000.0, "low centroid {}", low_centroid);
        assert!(high_centroid > 2500.0, "high centroid {}", high_centroid);
    }

    #[test]
    fn test_centroid_of_silence_is_zero() {
        let spectral = SpectralFeatures::new(16_000, 2048);
        assert_eq!(spectral.compute_centroid(&vec![0.0; 1025]), 0.0);
    }
}
