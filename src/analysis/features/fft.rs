// FFT module - forward and inverse transforms with windowing
//
// Shared by the cepstral/spectral statistics (magnitude spectra) and the
// spectral noise gate (complex spectra plus reconstruction). A Hann window
// is pre-computed once; the rustfft planner caches plans internally so
// repeated calls do not re-plan.

use rustfft::{num_complex::Complex, FftPlanner};
use std::sync::{Arc, Mutex};

/// FFT processor over a fixed transform size
pub struct FftProcessor {
    fft_planner: Arc<Mutex<FftPlanner<f32>>>,
    fft_size: usize,
    /// Hann window for analysis frames (pre-computed)
    window: Vec<f32>,
}

impl FftProcessor {
    pub fn new(fft_size: usize) -> Self {
        let fft_size = fft_size.max(2);
        // Hann window to reduce spectral leakage
        let window = (0..fft_size)
            .map(|i| {
                0.5 * (1.0
                    - ((2.0 * std::f32::consts::PI * i as f32) / (fft_size as f32 - 1.0)).cos())
            })
            .collect();

        Self {
            fft_planner: Arc::new(Mutex::new(FftPlanner::new())),
            fft_size,
            window,
        }
    }

    pub fn fft_size(&self) -> usize {
        self.fft_size
    }

    /// Number of non-redundant bins of a real-input transform
    pub fn spectrum_bins(&self) -> usize {
        self.fft_size / 2 + 1
    }

    pub fn window(&self) -> &[f32] {
        &self.window
    }

    /// Windowed complex spectrum of one frame, all `fft_size` bins
    ///
    /// Frames shorter than the transform size are zero-padded.
    pub fn compute_complex_spectrum(&self, frame: &[f32]) -> Vec<Complex<f32>> {
        let mut buffer: Vec<Complex<f32>> = Vec::with_capacity(self.fft_size);
        for (i, &sample) in frame.iter().take(self.fft_size).enumerate() {
            buffer.push(Complex::new(sample * self.window[i], 0.0));
        }
        while buffer.len() < self.fft_size {
            buffer.push(Complex::new(0.0, 0.0));
        }

        let mut planner = self.fft_planner.lock().unwrap();
        let fft = planner.plan_fft_forward(self.fft_size);
        fft.process(&mut buffer);
        buffer
    }

    /// Magnitude spectrum for positive frequencies only
    pub fn compute_magnitude_spectrum(&self, frame: &[f32]) -> Vec<f32> {
        let spectrum = self.compute_complex_spectrum(frame);
        spectrum[..self.spectrum_bins()]
            .iter()
            .map(|c| c.norm())
            .collect()
    }

    /// Inverse transform back to the time domain, scaled by 1/N
    pub fn inverse(&self, spectrum: &[Complex<f32>]) -> Vec<f32> {
        let mut buffer = spectrum.to_vec();
        buffer.resize(self.fft_size, Complex::new(0.0, 0.0));

        let mut planner = self.fft_planner.lock().unwrap();
        let fft = planner.plan_fft_inverse(self.fft_size);
        fft.process(&mut buffer);

        let scale = 1.0 / self.fft_size as f32;
        buffer.iter().map(|c| c.re * scale).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sine_concentrates_energy_at_its_bin() {
        let fft = FftProcessor::new(1024);
        let sample_rate = 16_000.0;
        let frequency = 1000.0;
        let signal: Vec<f32> = (0..1024)
            .map(|i| (2.0 * std::f32::consts::PI * frequency * i as f32 / sample_rate).sin())
            .collect();

        let spectrum = fft.compute_magnitude_spectrum(&signal);
        let (peak_bin, _) = spectrum
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();

        let bin_width = sample_rate / 1024.0;
        let peak_freq = peak_bin as f32 * bin_width;
        assert!(
            (peak_freq - frequency).abs() < 2.0 * bin_width,
            "peak at {} Hz",
            peak_freq
        );
    }

    #[test]
    fn test_short_frame_is_zero_padded() {
        let fft = FftProcessor::new(256);
        let spectrum = fft.compute_magnitude_spectrum(&[0.5; 100]);
        assert_eq!(spectrum.len(), 129);
    }

    #[test]
    fn test_forward_inverse_recovers_windowed_frame() {
        let fft = FftProcessor::new(256);
        let signal: Vec<f32> = (0..256).map(|i| ((i as f32) * 0.1).sin()).collect();

        let spectrum = fft.compute_complex_spectrum(&signal);
        let recovered = fft.inverse(&spectrum);

        for (i, (&orig, &rec)) in signal.iter().zip(recovered.iter()).enumerate() {
            let windowed = orig * fft.window()[i];
            assert!(
                (windowed - rec).abs() < 1e-4,
                "sample {}: {} vs {}",
                i,
                windowed,
                rec
            );
        }
    }
}
