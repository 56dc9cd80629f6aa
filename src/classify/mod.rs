// Classify module - the port between detection and scoring
//
// The core never depends on a concrete inference mechanism: classifiers
// implement one trait, and the learned variant receives its scoring
// function by injection. The pipeline asks a classifier up front whether
// it wants a feature vector, so heuristic strategies skip resampling and
// feature extraction entirely.

pub mod direction;
pub mod heuristic;
pub mod learned;

pub use direction::{Direction, LABELS_CARDINAL, LABELS_FULL, LABELS_LATERAL};
pub use heuristic::EnergyRatioClassifier;
pub use learned::{DirectionScorer, FnScorer, ScoredClassifier};

use crate::analysis::features::FeatureVector;
use crate::audio::Segment;
use crate::error::ClassifyError;

/// One detected stomp as handed to a classifier
///
/// The segment is raw at the capture rate; the feature vector, when
/// present, was derived from the resampled segment.
pub struct StompInput<'a> {
    pub segment: &'a Segment,
    pub features: Option<&'a FeatureVector>,
}

/// Maps one stomp to a direction label
pub trait StompClassifier {
    /// Whether the pipeline should derive a feature vector for this classifier
    fn wants_features(&self) -> bool {
        false
    }

    fn classify(&mut self, input: &StompInput<'_>) -> Result<Direction, ClassifyError>;
}
