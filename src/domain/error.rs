// ============================================================
// Layer 1 — Error Taxonomy
// ============================================================
// Everything that can go wrong before a tensor ever reaches
// the attention loop is reported here, eagerly, at the call
// boundary that received the bad value:
//
//   Configuration — impossible hyperparameters
//   Shape         — tensors or sequences of the wrong size
//   Index         — an id outside its embedding table
//   InvalidTarget — a correctness label that is not 0 or 1

use thiserror::Error;

use crate::domain::feature::Feature;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SaintError {
    /// A construction parameter is out of range.
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// A tensor or sequence does not have the expected dimensions.
    #[error("Shape mismatch for {what}: expected {expected:?}, got {actual:?}")]
    Shape {
        what:     String,
        expected: Vec<usize>,
        actual:   Vec<usize>,
    },

    /// An id does not fit its feature's vocabulary.
    #[error("{feature} id {id} is outside vocabulary of size {vocab_size}")]
    Index {
        feature:    Feature,
        id:         i64,
        vocab_size: usize,
    },

    /// A correctness target other than 0 or 1.
    #[error("Correctness targets must be 0 or 1, got {value}")]
    InvalidTarget { value: i64 },
}

impl SaintError {
    pub fn config(msg: impl Into<String>) -> Self {
        SaintError::Configuration(msg.into())
    }

    pub fn shape(what: impl Into<String>, expected: &[usize], actual: &[usize]) -> Self {
        SaintError::Shape {
            what:     what.into(),
            expected: expected.to_vec(),
            actual:   actual.to_vec(),
        }
    }
}

pub type SaintResult<T> = Result<T, SaintError>;

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_message_names_feature() {
        let err = SaintError::Index { feature: Feature::Category, id: 12, vocab_size: 10 };
        assert_eq!(
            err.to_string(),
            "category id 12 is outside vocabulary of size 10"
        );
    }

    #[test]
    fn test_shape_helper_copies_dims() {
        let err = SaintError::shape("exercise ids", &[2, 5], &[2, 4]);
        assert_eq!(
            err,
            SaintError::Shape {
                what:     "exercise ids".to_string(),
                expected: vec![2, 5],
                actual:   vec![2, 4],
            }
        );
    }
}
