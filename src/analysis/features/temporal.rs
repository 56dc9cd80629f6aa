// Temporal module - time-domain per-frame statistics
//
// RMS energy and zero-crossing rate are computed per analysis frame; the
// extractor aggregates them into mean/std pairs across the segment.

/// Time-domain feature computation over analysis frames
pub struct TemporalFeatures;

impl TemporalFeatures {
    /// RMS energy of one frame
    pub fn compute_rms(&self, frame: &[f32]) -> f32 {
        if frame.is_empty() {
            return 0.0;
        }
        let sum_squares: f32 = frame.iter().map(|&x| x * x).sum();
        (sum_squares / frame.len() as f32).sqrt()
    }

    /// Zero-crossing rate of one frame (0.0 to 1.0)
    ///
    /// High ZCR indicates noise-like content, low ZCR tonal or
    /// low-frequency content. Scuffs and slides read high here; clean
    /// heel strikes read low.
    pub fn compute_zcr(&self, frame: &[f32]) -> f32 {
        if frame.len() < 2 {
            return 0.0;
        }

        let mut crossings = 0;
        for i in 1..frame.len() {
            if (frame[i] >= 0.0 && frame[i - 1] < 0.0) || (frame[i] < 0.0 && frame[i - 1] >= 0.0) {
                crossings += 1;
            }
        }

        crossings as f32 / (frame.len() - 1) as f32
    }
}
