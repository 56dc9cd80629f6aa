// Audio module - capture transports and buffer types
//
// This module owns everything that happens before detection: the stereo
// block type delivered by the transports, the rolling window the caller
// maintains between detection calls, live capture via cpal, WAV file
// replay, and the recording utility used to collect training takes.
//
// Architecture:
// - capture: cpal input stream -> lock-free ring -> blocking block reads
// - file: WAV decode -> fixed-size blocks with end-of-file zero padding
// - window: fixed-length rolling buffer (shift left, append block)
// - recorder: accumulate blocks and persist stereo takes as WAV

pub mod capture;
pub mod file;
pub mod recorder;
pub mod window;

pub use capture::{list_input_devices, AudioCapture};
pub use file::WavBlockReader;
pub use recorder::Take;
pub use window::SlidingWindow;

/// One block of stereo audio as delivered by a transport
///
/// Blocks are owned transiently by the caller; the detection core never
/// retains them beyond one call. The `overflow` flag reports that the
/// capture ring dropped data before this block; it is logged by the
/// pipeline and ignored by detection.
#[derive(Debug, Clone)]
pub struct StereoBlock {
    pub left: Vec<f32>,
    pub right: Vec<f32>,
    pub sample_rate: u32,
    pub overflow: bool,
}

impl StereoBlock {
    /// Build a block from interleaved samples
    ///
    /// Mono input is duplicated into both channels so downstream code can
    /// assume a fixed channel count of two.
    pub fn from_interleaved(samples: &[f32], channels: u16, sample_rate: u32) -> Self {
        match channels {
            1 => Self {
                left: samples.to_vec(),
                right: samples.to_vec(),
                sample_rate,
                overflow: false,
            },
            _ => {
                let frames = samples.len() / channels as usize;
                let mut left = Vec::with_capacity(frames);
                let mut right = Vec::with_capacity(frames);
                for frame in samples.chunks_exact(channels as usize) {
                    left.push(frame[0]);
                    right.push(frame[1]);
                }
                Self {
                    left,
                    right,
                    sample_rate,
                    overflow: false,
                }
            }
        }
    }

    /// Number of sample frames in the block
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }
}

/// A fixed-length stereo excerpt extracted around a detected onset
///
/// Segments are immutable once produced and carry the rate they were
/// captured at; resampling to the feature rate produces a new segment.
#[derive(Debug, Clone)]
pub struct Segment {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: u32,
}

impl Segment {
    pub fn new(left: Vec<f32>, right: Vec<f32>, sample_rate: u32) -> Self {
        debug_assert_eq!(left.len(), right.len());
        Self {
            left,
            right,
            sample_rate,
        }
    }

    pub fn left(&self) -> &[f32] {
        &self.left
    }

    pub fn right(&self) -> &[f32] {
        &self.right
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    /// Number of sample frames per channel
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    /// Channel-averaged mono view of the segment
    pub fn mono(&self) -> Vec<f32> {
        self.left
            .iter()
            .zip(self.right.iter())
            .map(|(l, r)| (l + r) * 0.5)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_interleaved_stereo() {
        let samples = [0.1, -0.1, 0.2, -0.2, 0.3, -0.3];
        let block = StereoBlock::from_interleaved(&samples, 2, 48_000);
        assert_eq!(block.len(), 3);
        assert_eq!(block.left, vec![0.1, 0.2, 0.3]);
        assert_eq!(block.right, vec![-0.1, -0.2, -0.3]);
    }

    #[test]
    fn test_from_interleaved_mono_duplicates() {
        let samples = [0.5, 0.25];
        let block = StereoBlock::from_interleaved(&samples, 1, 16_000);
        assert_eq!(block.left, block.right);
        assert_eq!(block.len(), 2);
    }

    #[test]
    fn test_segment_mono_averages_channels() {
        let segment = Segment::new(vec![1.0, 0.0], vec![0.0, 1.0], 48_000);
        assert_eq!(segment.mono(), vec![0.5, 0.5]);
    }
}
