// AudioCapture - live stereo capture via cpal
//
// The cpal callback runs on the audio thread and must stay cheap: it
// deinterleaves samples into fixed-size blocks and pushes them onto a
// lock-free SPSC ring. The consumer side blocks with a short poll sleep,
// which keeps the detection loop synchronous without priority inversion
// on the audio thread.
//
// When the ring is full the callback drops the block and flags the next
// delivered one with `overflow`; detection correctness does not depend on
// gapless audio, only the operator should know about it.

use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use cpal::{SampleRate, Stream, StreamConfig};
use rtrb::RingBuffer;
use std::time::Duration;

use crate::audio::StereoBlock;
use crate::error::AudioError;

/// Handle over a running cpal input stream delivering fixed-size blocks
pub struct AudioCapture {
    // Held for its Drop impl; the stream stops when the handle is dropped
    _stream: Stream,
    consumer: rtrb::Consumer<StereoBlock>,
    sample_rate: u32,
    step_frames: usize,
}

impl AudioCapture {
    /// Open the selected (or default) input device
    ///
    /// # Arguments
    /// * `device_index` - Index into the host's input device list, or None for default
    /// * `sample_rate` - Requested capture rate in Hz
    /// * `step_frames` - Block length in sample frames
    /// * `queue_blocks` - Ring capacity in blocks
    pub fn open(
        device_index: Option<usize>,
        sample_rate: u32,
        step_frames: usize,
        queue_blocks: usize,
    ) -> Result<Self, AudioError> {
        let host = cpal::default_host();
        let device = match device_index {
            Some(index) => host
                .input_devices()
                .map_err(|e| AudioError::DeviceEnumeration {
                    reason: e.to_string(),
                })?
                .nth(index)
                .ok_or(AudioError::NoInputDevice)?,
            None => host.default_input_device().ok_or(AudioError::NoInputDevice)?,
        };

        let default_config =
            device
                .default_input_config()
                .map_err(|e| AudioError::StreamOpenFailed {
                    reason: e.to_string(),
                })?;
        // Prefer stereo; mono is duplicated downstream. More channels are
        // legal, the first two are kept.
        let channels = default_config.channels().max(1);

        let config = StreamConfig {
            channels,
            sample_rate: SampleRate(sample_rate),
            buffer_size: cpal::BufferSize::Default,
        };

        let (mut producer, consumer) = RingBuffer::<StereoBlock>::new(queue_blocks.max(2));
        let mut scratch: Vec<f32> = Vec::with_capacity(step_frames * channels as usize * 2);
        let mut dropped = false;
        let samples_per_block = step_frames * channels as usize;

        let stream = device
            .build_input_stream(
                &config,
                move |data: &[f32], _: &cpal::InputCallbackInfo| {
                    scratch.extend_from_slice(data);
                    while scratch.len() >= samples_per_block {
                        let mut block = StereoBlock::from_interleaved(
                            &scratch[..samples_per_block],
                            channels,
                            sample_rate,
                        );
                        scratch.drain(..samples_per_block);
                        block.overflow = dropped;
                        if producer.push(block).is_err() {
                            dropped = true;
                        } else {
                            dropped = false;
                        }
                    }
                },
                |err| log::error!("[Capture] Stream error: {}", err),
                None,
            )
            .map_err(|e| AudioError::StreamOpenFailed {
                reason: e.to_string(),
            })?;

        stream.play().map_err(|e| AudioError::StreamOpenFailed {
            reason: e.to_string(),
        })?;

        log::info!(
            "[Capture] Input stream open: {} Hz, {} channels, {} frames/block",
            sample_rate,
            channels,
            step_frames
        );

        Ok(Self {
            _stream: stream,
            consumer,
            sample_rate,
            step_frames,
        })
    }

    /// Read the next block, blocking until one is available
    pub fn read_block(&mut self) -> Result<StereoBlock, AudioError> {
        loop {
            match self.consumer.pop() {
                Ok(block) => return Ok(block),
                Err(_) => {
                    if self.consumer.is_abandoned() {
                        return Err(AudioError::StreamClosed);
                    }
                    std::thread::sleep(Duration::from_millis(1));
                }
            }
        }
    }

    /// Read the next block without blocking
    pub fn try_read_block(&mut self) -> Option<StereoBlock> {
        self.consumer.pop().ok()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn step_frames(&self) -> usize {
        self.step_frames
    }
}

/// Enumerate input device names on the default host
pub fn list_input_devices() -> Result<Vec<String>, AudioError> {
    let host = cpal::default_host();
    let devices = host
        .input_devices()
        .map_err(|e| AudioError::DeviceEnumeration {
            reason: e.to_string(),
        })?;
    Ok(devices
        .map(|d| d.name().unwrap_or_else(|_| "<unknown>".to_string()))
        .collect())
}
