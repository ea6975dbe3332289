// ============================================================
// Layer 2 — Model Input
// ============================================================
// The five id streams of a batch as [batch, seq_len] Int
// tensors. Validation happens here, once, before anything is
// embedded, so bad data never reaches the attention loop:
//
//   1. all five tensors have shape [batch, seq_len]
//   2. batch > 0
//   3. every id is in 0..vocab_size for its feature
//
// Building from InteractionSequence runs the same checks on
// the host before the tensors are created.
//
// Reference: Burn Book §4 (Batcher)

use burn::prelude::*;

use crate::domain::error::{SaintError, SaintResult};
use crate::domain::feature::{Feature, VocabSizes};
use crate::domain::interaction::InteractionSequence;

#[derive(Debug, Clone)]
pub struct SaintInput<B: Backend> {
    pub exercises:    Tensor<B, 2, Int>,
    pub categories:   Tensor<B, 2, Int>,
    pub responses:    Tensor<B, 2, Int>,
    pub elapsed_time: Tensor<B, 2, Int>,
    pub lagged_time:  Tensor<B, 2, Int>,
}

impl<B: Backend> SaintInput<B> {
    pub fn new(
        exercises:    Tensor<B, 2, Int>,
        categories:   Tensor<B, 2, Int>,
        responses:    Tensor<B, 2, Int>,
        elapsed_time: Tensor<B, 2, Int>,
        lagged_time:  Tensor<B, 2, Int>,
    ) -> Self {
        Self { exercises, categories, responses, elapsed_time, lagged_time }
    }

    /// Stack learner sequences into a batch on `device`.
    pub fn from_sequences(
        sequences: &[InteractionSequence],
        seq_len:   usize,
        vocab:     &VocabSizes,
        device:    &B::Device,
    ) -> SaintResult<Self> {
        if sequences.is_empty() {
            return Err(SaintError::shape("sequence batch", &[1, seq_len], &[0, seq_len]));
        }
        for seq in sequences {
            seq.validate(seq_len, vocab)?;
        }

        let batch = sequences.len();
        let stack = |feature: Feature| {
            // Burn Int tensors are built from i32 here, like the batcher does
            let flat: Vec<i32> = sequences
                .iter()
                .flat_map(|s| s.stream(feature).iter().map(|&id| id as i32))
                .collect();
            Tensor::<B, 1, Int>::from_ints(flat.as_slice(), device).reshape([batch, seq_len])
        };

        Ok(Self {
            exercises:    stack(Feature::Exercise),
            categories:   stack(Feature::Category),
            responses:    stack(Feature::Response),
            elapsed_time: stack(Feature::ElapsedTime),
            lagged_time:  stack(Feature::LaggedTime),
        })
    }

    pub fn stream(&self, feature: Feature) -> &Tensor<B, 2, Int> {
        match feature {
            Feature::Exercise    => &self.exercises,
            Feature::Category    => &self.categories,
            Feature::Response    => &self.responses,
            Feature::ElapsedTime => &self.elapsed_time,
            Feature::LaggedTime  => &self.lagged_time,
        }
    }

    /// [batch, seq_len] taken from the exercise stream
    pub fn dims(&self) -> [usize; 2] {
        self.exercises.dims()
    }

    /// Shape and id checks together; see `validate_shape` and `validate_ids`.
    pub fn validate(&self, seq_len: usize, vocab: &VocabSizes) -> SaintResult<()> {
        self.validate_shape(seq_len)?;
        self.validate_ids(vocab)
    }

    /// All five streams are [batch, seq_len] with batch > 0.
    /// Host-side only, no device read-back.
    pub fn validate_shape(&self, seq_len: usize) -> SaintResult<()> {
        let [batch, _] = self.dims();
        if batch == 0 {
            return Err(SaintError::shape("input batch", &[1, seq_len], &[0, seq_len]));
        }

        for feature in Feature::ALL {
            let actual = self.stream(feature).dims();
            if actual != [batch, seq_len] {
                return Err(SaintError::shape(
                    format!("{feature} ids"),
                    &[batch, seq_len],
                    &actual,
                ));
            }
        }
        Ok(())
    }

    /// Every id lies in 0..vocab_size for its feature.
    ///
    /// Reads the min/max of every stream back from the device, so
    /// call it after `validate_shape` has ruled out an empty batch.
    pub fn validate_ids(&self, vocab: &VocabSizes) -> SaintResult<()> {
        for feature in Feature::ALL {
            let ids = self.stream(feature);
            let vocab_size = vocab.size(feature);
            let min: i64 = ids.clone().min().into_scalar().elem::<i64>();
            let max: i64 = ids.clone().max().into_scalar().elem::<i64>();
            if min < 0 {
                return Err(SaintError::Index { feature, id: min, vocab_size });
            }
            if max >= vocab_size as i64 {
                return Err(SaintError::Index { feature, id: max, vocab_size });
            }
        }
        Ok(())
    }
}
