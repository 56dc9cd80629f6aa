// Take - accumulation and persistence of stereo recordings
//
// Used by the `record` CLI command to collect labeled training takes, one
// WAV per direction. Samples are clamped to [-1, 1] on write; recordings
// are stored as 32-bit float so no scaling is lost.

use std::path::Path;

use hound::{SampleFormat, WavSpec, WavWriter};

use crate::audio::StereoBlock;
use crate::error::AudioError;

/// A stereo recording accumulated block by block
#[derive(Debug, Default)]
pub struct Take {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: u32,
}

impl Take {
    pub fn new(sample_rate: u32) -> Self {
        Self {
            left: Vec::new(),
            right: Vec::new(),
            sample_rate,
        }
    }

    pub fn push_block(&mut self, block: &StereoBlock) {
        self.left.extend_from_slice(&block.left);
        self.right.extend_from_slice(&block.right);
    }

    /// Number of captured sample frames
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn duration_secs(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.left.len() as f64 / self.sample_rate as f64
    }

    /// Write the take as an interleaved 32-bit float stereo WAV
    pub fn save_wav<P: AsRef<Path>>(&self, path: P) -> Result<(), AudioError> {
        let spec = WavSpec {
            channels: 2,
            sample_rate: self.sample_rate,
            bits_per_sample: 32,
            sample_format: SampleFormat::Float,
        };
        let mut writer = WavWriter::create(path, spec)?;
        for (l, r) in self.left.iter().zip(self.right.iter()) {
            writer.write_sample(l.clamp(-1.0, 1.0))?;
            writer.write_sample(r.clamp(-1.0, 1.0))?;
        }
        writer.finalize()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulates_blocks() {
        let mut take = Take::new(1000);
        let block = StereoBlock {
            left: vec![0.1; 500],
            right: vec![0.2; 500],
            sample_rate: 1000,
            overflow: false,
        };
        take.push_block(&block);
        take.push_block(&block);
        assert_eq!(take.len(), 1000);
        assert!((take.duration_secs() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_save_and_reload_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("take.wav");

        let mut take = Take::new(8000);
        take.push_block(&StereoBlock {
            left: vec![0.5, -0.5, 2.0],
            right: vec![0.25, -0.25, -2.0],
            sample_rate: 8000,
            overflow: false,
        });
        take.save_wav(&path).unwrap();

        let mut reader = hound::WavReader::open(&path).unwrap();
        let samples: Vec<f32> = reader.samples::<f32>().map(|s| s.unwrap()).collect();
        // Out-of-range samples are clamped on write
        assert_eq!(samples, vec![0.5, 0.25, -0.5, -0.25, 1.0, -1.0]);
    }
}
