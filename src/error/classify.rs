// Classification error types
//
// Construction-time validation (scorer cardinality vs label table size)
// is deliberately separated from runtime scoring failures: a mismatched
// table is a configuration bug and must be rejected before any audio
// flows, while a scorer failure mid-stream is surfaced to the caller.

use std::fmt;

/// Classifier configuration and scoring errors
#[derive(Debug)]
pub enum ClassifyError {
    /// The injected scorer and the label table disagree on class count
    LabelTableMismatch {
        scorer_classes: usize,
        table_len: usize,
    },

    /// The external scorer returned an error
    ScorerFailed { reason: String },

    /// The scorer produced a class index outside the label table
    ClassIndexOutOfRange { index: usize, table_len: usize },

    /// The feature vector handed to a learned classifier has the wrong length
    FeatureDimensionMismatch { expected: usize, got: usize },
}

impl fmt::Display for ClassifyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifyError::LabelTableMismatch {
                scorer_classes,
                table_len,
            } => write!(
                f,
                "scorer emits {} classes but label table has {} entries",
                scorer_classes, table_len
            ),
            ClassifyError::ScorerFailed { reason } => {
                write!(f, "scorer failed: {}", reason)
            }
            ClassifyError::ClassIndexOutOfRange { index, table_len } => write!(
                f,
                "scorer returned class index {} outside label table of size {}",
                index, table_len
            ),
            ClassifyError::FeatureDimensionMismatch { expected, got } => write!(
                f,
                "feature vector has {} values, classifier expects {}",
                got, expected
            ),
        }
    }
}

impl std::error::Error for ClassifyError {}
