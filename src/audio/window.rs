// SlidingWindow - fixed-length rolling buffer over the capture stream
//
// The caller updates the window once per incoming block (shift left by the
// block length, append the new samples) and then hands it to the detector.
// The length is invariant across calls and shifting never reorders samples
// within a channel.

use crate::audio::{Segment, StereoBlock};

/// Rolling buffer holding the most recent `window_frames` of stereo audio
#[derive(Debug, Clone)]
pub struct SlidingWindow {
    left: Vec<f32>,
    right: Vec<f32>,
    sample_rate: u32,
}

impl SlidingWindow {
    /// Create a zero-filled window of `window_frames` sample frames
    pub fn new(window_frames: usize, sample_rate: u32) -> Self {
        Self {
            left: vec![0.0; window_frames],
            right: vec![0.0; window_frames],
            sample_rate,
        }
    }

    /// Shift the window left by the block length and append the block
    ///
    /// Blocks longer than the window keep only their trailing samples.
    pub fn push_block(&mut self, block: &StereoBlock) {
        Self::push_channel(&mut self.left, &block.left);
        Self::push_channel(&mut self.right, &block.right);
    }

    fn push_channel(window: &mut [f32], incoming: &[f32]) {
        let len = window.len();
        if incoming.len() >= len {
            window.copy_from_slice(&incoming[incoming.len() - len..]);
            return;
        }
        let keep = len - incoming.len();
        window.copy_within(incoming.len().., 0);
        window[keep..].copy_from_slice(incoming);
    }

    /// Number of sample frames held (constant for the window's lifetime)
    pub fn len(&self) -> usize {
        self.left.len()
    }

    pub fn is_empty(&self) -> bool {
        self.left.is_empty()
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn left(&self) -> &[f32] {
        &self.left
    }

    pub fn right(&self) -> &[f32] {
        &self.right
    }

    /// Channel-averaged mono copy, used for energy analysis
    pub fn mono(&self) -> Vec<f32> {
        self.left
            .iter()
            .zip(self.right.iter())
            .map(|(l, r)| (l + r) * 0.5)
            .collect()
    }

    /// Extract an immutable segment covering `start..end` of the window
    pub fn segment(&self, start: usize, end: usize) -> Segment {
        Segment::new(
            self.left[start..end].to_vec(),
            self.right[start..end].to_vec(),
            self.sample_rate,
        )
    }

    /// Extract the full window as a segment
    pub fn full_segment(&self) -> Segment {
        self.segment(0, self.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(left: Vec<f32>, right: Vec<f32>) -> StereoBlock {
        StereoBlock {
            left,
            right,
            sample_rate: 1000,
            overflow: false,
        }
    }

    #[test]
    fn test_push_shifts_and_appends() {
        let mut window = SlidingWindow::new(4, 1000);
        window.push_block(&block(vec![1.0, 2.0], vec![-1.0, -2.0]));
        assert_eq!(window.left(), &[0.0, 0.0, 1.0, 2.0]);
        assert_eq!(window.right(), &[0.0, 0.0, -1.0, -2.0]);

        window.push_block(&block(vec![3.0, 4.0], vec![-3.0, -4.0]));
        assert_eq!(window.left(), &[1.0, 2.0, 3.0, 4.0]);
        assert_eq!(window.right(), &[-1.0, -2.0, -3.0, -4.0]);
    }

    #[test]
    fn test_length_invariant_across_pushes() {
        let mut window = SlidingWindow::new(8, 1000);
        for _ in 0..10 {
            window.push_block(&block(vec![0.5; 3], vec![0.5; 3]));
            assert_eq!(window.len(), 8);
        }
    }

    #[test]
    fn test_oversized_block_keeps_tail() {
        let mut window = SlidingWindow::new(3, 1000);
        window.push_block(&block(
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
            vec![1.0, 2.0, 3.0, 4.0, 5.0],
        ));
        assert_eq!(window.left(), &[3.0, 4.0, 5.0]);
    }

    #[test]
    fn test_segment_extraction() {
        let mut window = SlidingWindow::new(4, 1000);
        window.push_block(&block(vec![1.0, 2.0, 3.0, 4.0], vec![5.0, 6.0, 7.0, 8.0]));
        let segment = window.segment(1, 3);
        assert_eq!(segment.left(), &[2.0, 3.0]);
        assert_eq!(segment.right(), &[6.0, 7.0]);
        assert_eq!(segment.sample_rate(), 1000);
    }
}
