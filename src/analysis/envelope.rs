// EnergyEnvelope - short-time RMS energy over a mono signal
//
// Frames are centered on hop boundaries via symmetric zero padding, so the
// first envelope value describes the start of the signal rather than
// lagging it by half a frame. Input shorter than one analysis frame yields
// an empty envelope; for a streaming caller that simply means "not enough
// data yet", never an error.

/// Computes per-hop RMS energy at a fixed frame/hop cadence
#[derive(Debug, Clone)]
pub struct EnergyEnvelope {
    frame_len: usize,
    hop_len: usize,
}

impl EnergyEnvelope {
    /// Create an envelope computer
    ///
    /// # Arguments
    /// * `frame_len` - Analysis frame length in samples (must be > 0)
    /// * `hop_len` - Hop between frames in samples (must be > 0)
    pub fn new(frame_len: usize, hop_len: usize) -> Self {
        Self {
            frame_len: frame_len.max(1),
            hop_len: hop_len.max(1),
        }
    }

    pub fn frame_len(&self) -> usize {
        self.frame_len
    }

    pub fn hop_len(&self) -> usize {
        self.hop_len
    }

    /// Compute the RMS envelope of `signal`, one value per hop
    pub fn compute(&self, signal: &[f32]) -> Vec<f32> {
        if signal.len() < self.frame_len {
            return Vec::new();
        }

        let pad = self.frame_len / 2;
        let mut padded = vec![0.0f32; signal.len() + 2 * pad];
        padded[pad..pad + signal.len()].copy_from_slice(signal);

        let mut envelope = Vec::with_capacity(signal.len() / self.hop_len + 1);
        let mut start = 0;
        while start + self.frame_len <= padded.len() {
            let frame = &padded[start..start + self.frame_len];
            let sum_squares: f32 = frame.iter().map(|&x| x * x).sum();
            envelope.push((sum_squares / self.frame_len as f32).sqrt());
            start += self.hop_len;
        }

        envelope
    }

    /// Map an envelope index back to the sample the frame is centered on
    ///
    /// With centered framing, hop index `i` describes the signal around
    /// sample `i * hop_len`.
    pub fn center_sample(&self, hop_index: usize) -> usize {
        hop_index * self.hop_len
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_short_input_yields_empty_envelope() {
        let envelope = EnergyEnvelope::new(20, 10);
        assert!(envelope.compute(&[0.1; 19]).is_empty());
        assert!(envelope.compute(&[]).is_empty());
    }

    #[test]
    fn test_silence_yields_zero_energy() {
        let envelope = EnergyEnvelope::new(20, 10);
        let values = envelope.compute(&vec![0.0; 200]);
        assert!(!values.is_empty());
        assert!(values.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_constant_signal_interior_frames_match_amplitude() {
        let envelope = EnergyEnvelope::new(20, 10);
        let values = envelope.compute(&vec![0.5; 200]);

        // Interior frames sit fully inside the signal; edge frames overlap
        // the zero padding and come out lower.
        let interior = &values[1..values.len() - 1];
        for &v in interior {
            assert!((v - 0.5).abs() < 1e-6, "interior RMS {} != 0.5", v);
        }
        assert!(values[0] < 0.5);
        assert!(values[values.len() - 1] < 0.5);
    }

    #[test]
    fn test_envelope_peaks_at_pulse_position() {
        let envelope = EnergyEnvelope::new(20, 10);
        let mut signal = vec![0.0f32; 200];
        for sample in signal[90..110].iter_mut() {
            *sample = 1.0;
        }
        let values = envelope.compute(&signal);

        let (peak_idx, _) = values
            .iter()
            .enumerate()
            .max_by(|(_, a), (_, b)| a.partial_cmp(b).unwrap())
            .unwrap();
        // Pulse is centered at sample 100 = hop index 10
        let peak_sample = envelope.center_sample(peak_idx);
        assert!(
            (90..=110).contains(&peak_sample),
            "peak at sample {}",
            peak_sample
        );
    }

    #[test]
    fn test_frame_count_is_deterministic() {
        let envelope = EnergyEnvelope::new(20, 10);
        let a = envelope.compute(&vec![0.3; 200]).len();
        let b = envelope.compute(&vec![0.9; 200]).len();
        assert_eq!(a, b);
        assert_eq!(a, 21);
    }
}
