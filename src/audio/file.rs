// WavBlockReader - file replay transport
//
// Replays a WAV file through the same block interface live capture uses,
// so the whole pipeline can be exercised deterministically. The final
// partial block is zero-padded to full length, after which the reader
// reports itself finished.

use std::path::Path;

use hound::{SampleFormat, WavReader};

use crate::audio::StereoBlock;
use crate::error::AudioError;

/// Reads a WAV file as a sequence of fixed-size stereo blocks
pub struct WavBlockReader {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: u32,
    step_frames: usize,
    position: usize,
    finished: bool,
}

impl WavBlockReader {
    /// Decode a WAV file for replay
    ///
    /// The block length is derived from `step_ms` and the file's own
    /// sample rate, so replay geometry matches whatever rate the file was
    /// recorded at. Mono files are duplicated into both channels; files
    /// with more than two channels are rejected. Integer and 32-bit float
    /// samples are supported, both normalized to [-1, 1].
    pub fn open<P: AsRef<Path>>(path: P, step_ms: u32) -> Result<Self, AudioError> {
        let mut reader = WavReader::open(&path)?;
        let spec = reader.spec();

        if spec.channels == 0 || spec.channels > 2 {
            return Err(AudioError::UnsupportedChannelCount {
                got: spec.channels,
            });
        }

        let interleaved: Vec<f32> = match (spec.sample_format, spec.bits_per_sample) {
            (SampleFormat::Float, 32) => {
                reader.samples::<f32>().collect::<Result<_, _>>()?
            }
            (SampleFormat::Int, bits) => {
                let scale = 1.0 / (1i64 << (bits - 1)) as f32;
                reader
                    .samples::<i32>()
                    .map(|s| s.map(|v| v as f32 * scale))
                    .collect::<Result<_, _>>()?
            }
            (format, bits) => {
                return Err(AudioError::FileRead {
                    reason: format!("unsupported sample format {:?}/{} bits", format, bits),
                })
            }
        };

        let (left, right) = match spec.channels {
            1 => (interleaved.clone(), interleaved),
            _ => {
                let frames = interleaved.len() / 2;
                let mut left = Vec::with_capacity(frames);
                let mut right = Vec::with_capacity(frames);
                for frame in interleaved.chunks_exact(2) {
                    left.push(frame[0]);
                    right.push(frame[1]);
                }
                (left, right)
            }
        };

        log::info!(
            "[Replay] Loaded {:?}: {} frames at {} Hz",
            path.as_ref(),
            left.len(),
            spec.sample_rate
        );

        let step_frames =
            ((step_ms as u64 * spec.sample_rate as u64 / 1000) as usize).max(1);

        Ok(Self {
            left,
            right,
            sample_rate: spec.sample_rate,
            step_frames,
            position: 0,
            finished: false,
        })
    }

    /// Read the next block, or None once the file is exhausted
    pub fn read_block(&mut self) -> Option<StereoBlock> {
        if self.finished {
            return None;
        }

        let end = self.position + self.step_frames;
        let mut left = vec![0.0; self.step_frames];
        let mut right = vec![0.0; self.step_frames];

        let available = self.left.len().saturating_sub(self.position);
        let take = available.min(self.step_frames);
        left[..take].copy_from_slice(&self.left[self.position..self.position + take]);
        right[..take].copy_from_slice(&self.right[self.position..self.position + take]);

        if take < self.step_frames {
            self.finished = true;
        }
        self.position = end;

        Some(StereoBlock {
            left,
            right,
            sample_rate: self.sample_rate,
            overflow: false,
        })
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn finished(&self) -> bool {
        self.finished
    }
}
