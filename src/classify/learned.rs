// ScoredClassifier - learned scoring behind an injected function
//
// The detection core carries no dependency on any inference mechanism:
// whatever scores a feature vector (a linear model, a tree ensemble, an
// ONNX session wrapper) is injected as a `DirectionScorer`. The label
// table translates class indices to directions; its size must match the
// scorer's output cardinality at construction time, never mid-stream.

use crate::classify::{Direction, StompClassifier, StompInput};
use crate::error::ClassifyError;

/// External scoring function: feature vector in, class index out
pub trait DirectionScorer {
    /// Output cardinality of the scorer, checked against the label table
    fn num_classes(&self) -> usize;

    /// Score one feature vector into a class index
    fn score(&self, features: &[f32]) -> Result<usize, ClassifyError>;
}

/// Adapter turning a plain closure into a scorer
pub struct FnScorer<F> {
    function: F,
    num_classes: usize,
}

impl<F> FnScorer<F>
where
    F: Fn(&[f32]) -> Result<usize, ClassifyError>,
{
    pub fn new(num_classes: usize, function: F) -> Self {
        Self {
            function,
            num_classes,
        }
    }
}

impl<F> DirectionScorer for FnScorer<F>
where
    F: Fn(&[f32]) -> Result<usize, ClassifyError>,
{
    fn num_classes(&self) -> usize {
        self.num_classes
    }

    fn score(&self, features: &[f32]) -> Result<usize, ClassifyError> {
        (self.function)(features)
    }
}

/// Learned classifier: injected scorer plus a fixed label table
pub struct ScoredClassifier<S: DirectionScorer> {
    scorer: S,
    labels: Vec<Direction>,
    expected_dim: usize,
}

impl<S: DirectionScorer> ScoredClassifier<S> {
    /// Build a classifier, verifying scorer/table agreement
    ///
    /// # Arguments
    /// * `scorer` - Injected scoring function
    /// * `labels` - Class-index-to-direction table (size 2, 5, or 11)
    /// * `expected_dim` - Feature vector dimension the scorer was fit on
    pub fn new(
        scorer: S,
        labels: &[Direction],
        expected_dim: usize,
    ) -> Result<Self, ClassifyError> {
        if scorer.num_classes() != labels.len() {
            return Err(ClassifyError::LabelTableMismatch {
                scorer_classes: scorer.num_classes(),
                table_len: labels.len(),
            });
        }
        Ok(Self {
            scorer,
            labels: labels.to_vec(),
            expected_dim,
        })
    }
}

impl<S: DirectionScorer> StompClassifier for ScoredClassifier<S> {
    fn wants_features(&self) -> bool {
        true
    }

    fn classify(&mut self, input: &StompInput<'_>) -> Result<Direction, ClassifyError> {
        let features = input
            .features
            .ok_or(ClassifyError::FeatureDimensionMismatch {
                expected: self.expected_dim,
                got: 0,
            })?;

        if features.len() != self.expected_dim {
            return Err(ClassifyError::FeatureDimensionMismatch {
                expected: self.expected_dim,
                got: features.len(),
            });
        }

        let index = self.scorer.score(features.as_slice())?;
        self.labels
            .get(index)
            .copied()
            .ok_or(ClassifyError::ClassIndexOutOfRange {
                index,
                table_len: self.labels.len(),
            })
    }
}
