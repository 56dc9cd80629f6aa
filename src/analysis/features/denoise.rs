// Denoise module - spectral noise gating
//
// Estimates a per-bin noise magnitude profile from the lowest-energy
// decile of STFT frames, subtracts a scaled profile from every frame's
// magnitude (floored at zero), and reconstructs from the cleaned
// magnitude with the original phase via weighted overlap-add.
//
// This runs only when explicitly enabled, and only ahead of correlation
// feature extraction; it is far too expensive for the per-block
// detection path.

use rustfft::num_complex::Complex;

use crate::analysis::features::fft::FftProcessor;

/// Spectral noise gate over fixed STFT geometry
pub struct NoiseGate {
    fft: FftProcessor,
    hop: usize,
    strength: f32,
}

impl NoiseGate {
    /// # Arguments
    /// * `n_fft` - STFT size
    /// * `hop` - Hop between frames (hop <= n_fft / 2 keeps reconstruction stable)
    /// * `strength` - Fraction of the noise profile subtracted per bin
    pub fn new(n_fft: usize, hop: usize, strength: f32) -> Self {
        Self {
            fft: FftProcessor::new(n_fft),
            hop: hop.max(1),
            strength,
        }
    }

    /// Gate one channel, returning a cleaned signal of the same length
    pub fn apply(&self, signal: &[f32]) -> Vec<f32> {
        if signal.is_empty() {
            return Vec::new();
        }

        let n_fft = self.fft.fft_size();
        let pad = n_fft / 2;
        let mut padded = vec![0.0f32; signal.len() + 2 * pad];
        padded[pad..pad + signal.len()].copy_from_slice(signal);

        // Forward STFT, keeping full complex frames for reconstruction
        let mut spectra: Vec<Vec<Complex<f32>>> = Vec::new();
        let mut start = 0;
        while start + n_fft <= padded.len() {
            spectra.push(self.fft.compute_complex_spectrum(&padded[start..start + n_fft]));
            start += self.hop;
        }
        if spectra.is_empty() {
            return signal.to_vec();
        }

        let magnitudes: Vec<Vec<f32>> = spectra
            .iter()
            .map(|frame| frame.iter().map(|c| c.norm()).collect())
            .collect();

        let profile = self.noise_profile(&magnitudes);

        // Subtract the scaled profile, keep the original phase
        for (frame, mags) in spectra.iter_mut().zip(magnitudes.iter()) {
            for ((value, &mag), &noise) in frame.iter_mut().zip(mags.iter()).zip(profile.iter()) {
                let cleaned = (mag - self.strength * noise).max(0.0);
                if mag > 1e-10 {
                    *value *= cleaned / mag;
                } else {
                    *value = Complex::new(0.0, 0.0);
                }
            }
        }

        self.overlap_add(&spectra, padded.len(), pad, signal.len())
    }

    /// Per-bin noise magnitude profile
    ///
    /// Frames whose mean magnitude sits in the lowest decile are averaged
    /// per bin; if none qualify the per-bin minimum is used instead.
    fn noise_profile(&self, magnitudes: &[Vec<f32>]) -> Vec<f32> {
        let bins = magnitudes[0].len();

        let energies: Vec<f32> = magnitudes
            .iter()
            .map(|mags| mags.iter().sum::<f32>() / bins as f32)
            .collect();

        let mut sorted = energies.clone();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
        let threshold = sorted[(sorted.len() - 1) / 10];

        let quiet: Vec<&Vec<f32>> = magnitudes
            .iter()
            .zip(energies.iter())
            .filter(|(_, &e)| e <= threshold)
            .map(|(mags, _)| mags)
            .collect();

        if quiet.is_empty() {
            (0..bins)
                .map(|bin| {
                    magnitudes
                        .iter()
                        .map(|mags| mags[bin])
                        .fold(f32::INFINITY, f32::min)
                })
                .collect()
        } else {
            (0..bins)
                .map(|bin| quiet.iter().map(|mags| mags[bin]).sum::<f32>() / quiet.len() as f32)
                .collect()
        }
    }

    /// Weighted overlap-add reconstruction from cleaned spectra
    fn overlap_add(
        &self,
        spectra: &[Vec<Complex<f32>>],
        padded_len: usize,
        pad: usize,
        out_len: usize,
    ) -> Vec<f32> {
        let n_fft = self.fft.fft_size();
        let window = self.fft.window().to_vec();

        let mut accum = vec![0.0f32; padded_len];
        let mut weight = vec![0.0f32; padded_len];

        for (frame_idx, spectrum) in spectra.iter().enumerate() {
            let frame = self.fft.inverse(spectrum);
            let start = frame_idx * self.hop;
            for t in 0..n_fft {
                // inverse() yields the windowed frame; weighting by the
                // window again gives standard WOLA synthesis
                accum[start + t] += frame[t] * window[t];
                weight[start + t] += window[t] * window[t];
            }
        }

        (pad..pad + out_len)
            .map(|i| {
                if weight[i] > 1e-8 {
                    accum[i] / weight[i]
                } else {
                    0.0
                }
            })
            .collect()
    }
}
