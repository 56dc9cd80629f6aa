// Cepstral module - mel-cepstral coefficients per analysis frame
//
// Power spectrum -> mel filterbank -> log -> DCT-II (orthonormal), keeping
// the first `n_cepstra` coefficients. The filterbank and DCT basis are
// precomputed at construction; per-frame work is two small matrix-vector
// products.
//
// Coefficient 0 tracks overall log energy, higher coefficients describe
// spectral shape at increasing detail. The classifier contract fixes the
// coefficient count, so changing it is a breaking change.

/// Floor applied before the log to keep silence finite
const LOG_FLOOR: f32 = 1e-10;

/// Mel-cepstral coefficient extractor over a fixed spectrum size
pub struct CepstralExtractor {
    n_cepstra: usize,
    /// Triangular mel filters, one row per band, `bins` columns
    filterbank: Vec<Vec<f32>>,
    /// DCT-II basis, one row per kept coefficient, `n_mels` columns
    dct_basis: Vec<Vec<f32>>,
}

impl CepstralExtractor {
    /// Build the filterbank and DCT basis
    ///
    /// # Arguments
    /// * `sample_rate` - Rate of the analyzed signal in Hz
    /// * `fft_size` - Transform size the spectra were computed with
    /// * `n_mels` - Mel bands in the filterbank
    /// * `n_cepstra` - Coefficients kept per frame
    pub fn new(sample_rate: u32, fft_size: usize, n_mels: usize, n_cepstra: usize) -> Self {
        let bins = fft_size / 2 + 1;
        let filterbank = Self::build_filterbank(sample_rate, fft_size, bins, n_mels);
        let dct_basis = Self::build_dct_basis(n_mels, n_cepstra);

        Self {
            n_cepstra,
            filterbank,
            dct_basis,
        }
    }

    pub fn n_cepstra(&self) -> usize {
        self.n_cepstra
    }

    /// Cepstral coefficients of one frame's magnitude spectrum
    pub fn compute(&self, magnitude_spectrum: &[f32]) -> Vec<f32> {
        // Mel-band log energies from the power spectrum
        let log_mel: Vec<f32> = self
            .filterbank
            .iter()
            .map(|filter| {
                let energy: f32 = filter
                    .iter()
                    .zip(magnitude_spectrum.iter())
                    .map(|(&w, &mag)| w * mag * mag)
                    .sum();
                energy.max(LOG_FLOOR).ln()
            })
            .collect();

        self.dct_basis
            .iter()
            .map(|row| row.iter().zip(log_mel.iter()).map(|(&b, &m)| b * m).sum())
            .collect()
    }

    fn hz_to_mel(hz: f32) -> f32 {
        2595.0 * (1.0 + hz / 700.0).log10()
    }

    fn mel_to_hz(mel: f32) -> f32 {
        700.0 * (10f32.powf(mel / 2595.0) - 1.0)
    }

    fn build_filterbank(
        sample_rate: u32,
        fft_size: usize,
        bins: usize,
        n_mels: usize,
    ) -> Vec<Vec<f32>> {
        let nyquist = sample_rate as f32 / 2.0;
        let max_mel = Self::hz_to_mel(nyquist);

        // n_mels + 2 edge points, evenly spaced on the mel scale
        let edges: Vec<f32> = (0..n_mels + 2)
            .map(|i| {
                let mel = max_mel * i as f32 / (n_mels + 1) as f32;
                Self::mel_to_hz(mel) * fft_size as f32 / sample_rate as f32
            })
            .collect();

        (0..n_mels)
            .map(|m| {
                let (lower, center, upper) = (edges[m], edges[m + 1], edges[m + 2]);
                (0..bins)
                    .map(|bin| {
                        let f = bin as f32;
                        if f <= lower || f >= upper {
                            0.0
                        } else if f <= center {
                            (f - lower) / (center - lower).max(1e-6)
                        } else {
                            (upper - f) / (upper - center).max(1e-6)
                        }
                    })
                    .collect()
            })
            .collect()
    }

    fn build_dct_basis(n_mels: usize, n_cepstra: usize) -> Vec<Vec<f32>> {
        (0..n_cepstra)
            .map(|c| {
                let scale = if c == 0 {
                    (1.0 / n_mels as f32).sqrt()
                } else {
                    (2.0 / n_mels as f32).sqrt()
                };
                (0..n_mels)
                    .map(|m| {
                        scale
                            * (std::f32::consts::PI * c as f32 * (2.0 * m as f32 + 1.0)
                                / (2.0 * n_mels as f32))
                                .cos()
                    })
                    .collect()
            })
            .collect()
    }
}
