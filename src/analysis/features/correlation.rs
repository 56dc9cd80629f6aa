// Correlation module - cross-channel timing statistics
//
// A stomp to the left of the microphone pair reaches the left capsule
// first; the lag of the cross-correlation peak encodes that direction cue.
// The correlation is computed once per segment over the full lag range,
// normalized by its own peak magnitude.

/// Cross-channel statistics in feature-vector order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationFeatures {
    /// Inter-channel shift at the correlation peak, in milliseconds.
    /// Positive when content appears in the right channel before the left.
    pub phase_shift_ms: f32,
    /// Peak normalized correlation value (1.0 for identical channels)
    pub peak: f32,
    /// Standard deviation of the central half of the correlation curve;
    /// extreme lags are discarded because they are supported by only a
    /// few overlapping samples
    pub central_std: f32,
    /// Total variation (sum of absolute first differences) of the full
    /// curve, a roughness measure separating clean echoes from diffuse ones
    pub total_variation: f32,
}

impl CorrelationFeatures {
    pub const DIM: usize = 4;

    pub fn as_array(&self) -> [f32; Self::DIM] {
        [
            self.phase_shift_ms,
            self.peak,
            self.central_std,
            self.total_variation,
        ]
    }
}

/// Compute correlation statistics between two channels
///
/// Degenerate input (either channel empty) yields all-zero features
/// rather than an error.
pub fn cross_correlation_features(
    left: &[f32],
    right: &[f32],
    sample_rate: u32,
) -> CorrelationFeatures {
    if left.is_empty() || right.is_empty() || sample_rate == 0 {
        return CorrelationFeatures {
            phase_shift_ms: 0.0,
            peak: 0.0,
            central_std: 0.0,
            total_variation: 0.0,
        };
    }

    let n = left.len();
    let m = right.len();
    let full_len = n + m - 1;

    // Full-overlap cross-correlation; lag index i - j + (m - 1)
    let mut corr = vec![0.0f32; full_len];
    for (i, &l) in left.iter().enumerate() {
        for (j, &r) in right.iter().enumerate() {
            corr[i + (m - 1) - j] += l * r;
        }
    }

    let max_abs = corr.iter().fold(0.0f32, |acc, &v| acc.max(v.abs()));
    for value in corr.iter_mut() {
        *value /= max_abs + 1e-10;
    }

    let (peak_idx, &peak) = corr
        .iter()
        .enumerate()
        .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal))
        .unwrap_or((full_len / 2, &0.0));

    let center = full_len / 2;
    let phase_shift_samples = peak_idx as f32 - center as f32;
    let phase_shift_ms = phase_shift_samples / sample_rate as f32 * 1000.0;

    let central = &corr[full_len / 4..(3 * full_len / 4).max(full_len / 4 + 1)];
    let central_std = std_dev(central);

    let total_variation = corr.windows(2).map(|w| (w[1] - w[0]).abs()).sum();

    CorrelationFeatures {
        phase_shift_ms,
        peak,
        central_std,
        total_variation,
    }
}

fn std_dev(values: &[f32]) -> f32 {
    if values.is_empty() {
        return 0.0;
    }
    let mean = values.iter().sum::<f32>() / values.len() as f32;
    let variance = values.iter().map(|&v| (v - mean) * (v - mean)).sum::<f32>() / values.len() as f32;
    variance.sqrt()
}
