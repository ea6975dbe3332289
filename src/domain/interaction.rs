// ============================================================
// Layer 1 — Interaction Sequence
// ============================================================
// One learner's history, already windowed to the model's
// sequence length and already encoded as integer ids.
//
// Position t of every stream describes the same interaction:
//
//   exercises[t]    — which question was shown
//   categories[t]   — the question's part / tag
//   responses[t]    — the PREVIOUS answer's correctness
//                     (shifted by one, with a start token)
//   elapsed_time[t] — bucketised time spent answering
//   lagged_time[t]  — bucketised gap since the last interaction
//
// All five streams must be the same length. The model
// additionally requires that length to equal seq_len.

use serde::{Deserialize, Serialize};

use crate::domain::error::{SaintError, SaintResult};
use crate::domain::feature::{Feature, VocabSizes};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InteractionSequence {
    pub exercises:    Vec<u32>,
    pub categories:   Vec<u32>,
    pub responses:    Vec<u32>,
    pub elapsed_time: Vec<u32>,
    pub lagged_time:  Vec<u32>,
}

impl InteractionSequence {
    pub fn new(
        exercises:    Vec<u32>,
        categories:   Vec<u32>,
        responses:    Vec<u32>,
        elapsed_time: Vec<u32>,
        lagged_time:  Vec<u32>,
    ) -> Self {
        Self { exercises, categories, responses, elapsed_time, lagged_time }
    }

    /// Borrow one stream by feature
    pub fn stream(&self, feature: Feature) -> &[u32] {
        match feature {
            Feature::Exercise    => &self.exercises,
            Feature::Category    => &self.categories,
            Feature::Response    => &self.responses,
            Feature::ElapsedTime => &self.elapsed_time,
            Feature::LaggedTime  => &self.lagged_time,
        }
    }

    /// Check every stream has exactly `seq_len` ids and every id fits
    /// its vocabulary. Reports the first problem found.
    pub fn validate(&self, seq_len: usize, vocab: &VocabSizes) -> SaintResult<()> {
        for feature in Feature::ALL {
            let ids = self.stream(feature);
            if ids.len() != seq_len {
                return Err(SaintError::shape(
                    format!("{feature} stream"),
                    &[seq_len],
                    &[ids.len()],
                ));
            }

            let vocab_size = vocab.size(feature);
            if let Some(&id) = ids.iter().find(|&&id| id as usize >= vocab_size) {
                return Err(SaintError::Index { feature, id: id as i64, vocab_size });
            }
        }
        Ok(())
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> VocabSizes {
        VocabSizes { exercises: 10, categories: 4, responses: 3, elapsed_time: 6, lagged_time: 6 }
    }

    fn sample() -> InteractionSequence {
        InteractionSequence::new(
            vec![1, 2, 3],
            vec![0, 1, 3],
            vec![2, 1, 0],
            vec![5, 0, 1],
            vec![0, 4, 4],
        )
    }

    #[test]
    fn test_valid_sequence_passes() {
        assert!(sample().validate(3, &vocab()).is_ok());
    }

    #[test]
    fn test_wrong_length_is_shape_error() {
        let mut seq = sample();
        seq.lagged_time.pop();
        let err = seq.validate(3, &vocab()).unwrap_err();
        assert_eq!(err, SaintError::shape("lagged_time stream", &[3], &[2]));
    }

    #[test]
    fn test_sequence_shorter_than_model_window() {
        // All streams agree with each other but not with seq_len
        let err = sample().validate(5, &vocab()).unwrap_err();
        assert!(matches!(err, SaintError::Shape { .. }));
    }

    #[test]
    fn test_out_of_vocab_is_index_error() {
        let mut seq = sample();
        seq.categories[1] = 4; // vocabulary has ids 0..4
        let err = seq.validate(3, &vocab()).unwrap_err();
        assert_eq!(err, SaintError::Index { feature: Feature::Category, id: 4, vocab_size: 4 });
    }
}
