// EnergyRatioClassifier - lateral discrimination from raw channel energy
//
// A stomp left of the microphone pair carries more energy in the left
// channel. The ratio thresholds are deliberately loose (1.5x and its
// reciprocal); anything in between falls through to the configured
// fallback policy.

use rand::Rng;

use crate::classify::{Direction, StompClassifier, StompInput};
use crate::config::FallbackPolicy;
use crate::error::ClassifyError;

const LEFT_RATIO: f32 = 1.5;
const RIGHT_RATIO: f32 = 0.66;

/// Fallback candidates under the random policy
const RANDOM_DIRECTIONS: [Direction; 4] = [
    Direction::Up,
    Direction::Down,
    Direction::Left,
    Direction::Right,
];

/// Heuristic classifier over per-channel energy of the raw segment
pub struct EnergyRatioClassifier {
    fallback: FallbackPolicy,
}

impl EnergyRatioClassifier {
    pub fn new(fallback: FallbackPolicy) -> Self {
        Self { fallback }
    }

    fn fallback_direction(&self) -> Direction {
        match self.fallback {
            FallbackPolicy::Center => Direction::Center,
            FallbackPolicy::Random => {
                RANDOM_DIRECTIONS[rand::thread_rng().gen_range(0..RANDOM_DIRECTIONS.len())]
            }
        }
    }
}

impl StompClassifier for EnergyRatioClassifier {
    fn classify(&mut self, input: &StompInput<'_>) -> Result<Direction, ClassifyError> {
        let left_energy: f32 = input.segment.left().iter().map(|&x| x * x).sum();
        let right_energy: f32 = input.segment.right().iter().map(|&x| x * x).sum();

        let ratio = left_energy / (right_energy + 1e-6);
        if ratio > LEFT_RATIO {
            Ok(Direction::Left)
        } else if ratio < RIGHT_RATIO {
            Ok(Direction::Right)
        } else {
            Ok(self.fallback_direction())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::Segment;

    fn segment(left_amp: f32, right_amp: f32) -> Segment {
        Segment::new(vec![left_amp; 400], vec![right_amp; 400], 48_000)
    }

    fn classify(classifier: &mut EnergyRatioClassifier, segment: &Segment) -> Direction {
        classifier
            .classify(&StompInput {
                segment,
                features: None,
            })
            .unwrap()
    }

    #[test]
    fn test_left_heavy_energy_is_left() {
        let mut classifier = EnergyRatioClassifier::new(FallbackPolicy::Center);
        let segment = segment(1.0, 0.1);
        assert_eq!(classify(&mut classifier, &segment), Direction::Left);
    }

    #[test]
    fn test_right_heavy_energy_is_right() {
        let mut classifier = EnergyRatioClassifier::new(FallbackPolicy::Center);
        let segment = segment(0.1, 1.0);
        assert_eq!(classify(&mut classifier, &segment), Direction::Right);
    }

    #[test]
    fn test_balanced_energy_falls_back_to_center() {
        let mut classifier = EnergyRatioClassifier::new(FallbackPolicy::Center);
        let segment = segment(0.5, 0.5);
        assert_eq!(classify(&mut classifier, &segment), Direction::Center);
    }

    #[test]
    fn test_random_fallback_stays_in_candidate_set() {
        let mut classifier = EnergyRatioClassifier::new(FallbackPolicy::Random);
        let segment = segment(0.5, 0.5);
        for _ in 0..20 {
            let direction = classify(&mut classifier, &segment);
            assert!(RANDOM_DIRECTIONS.contains(&direction), "got {}", direction);
        }
    }

    #[test]
    fn test_does_not_want_features() {
        let classifier = EnergyRatioClassifier::new(FallbackPolicy::Center);
        assert!(!classifier.wants_features());
    }
}
