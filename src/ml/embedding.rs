// ============================================================
// Layer 2 — Encoder / Decoder Embeddings
// ============================================================
// Both sides turn integer streams into vectors of width D and
// add a learned absolute position embedding:
//
//   encoder:  exercise_embed + category_embed + position_embed
//   decoder:  response_embed + position_embed
//
// The position table has exactly seq_len rows, so inputs must
// be exactly seq_len long. Positions 0..seq_len are generated
// on the device of the incoming ids and broadcast over batch.
//
// Elapsed and lagged time are added by the top-level model,
// not here.
//
// Reference: Burn Book §3 (Building Blocks — Embedding)

use burn::{
    nn::{Embedding, EmbeddingConfig},
    prelude::*,
};

/// Position ids [0, 1, …, seq_len-1] broadcast to [batch, seq_len]
fn position_ids<B: Backend>(batch: usize, seq_len: usize, device: &B::Device) -> Tensor<B, 2, Int> {
    Tensor::<B, 1, Int>::arange(0..seq_len as i64, device)
        .unsqueeze::<2>()
        .expand([batch, seq_len])
}

// ─── Encoder side ─────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct EncoderEmbeddingConfig {
    pub n_exercises:  usize,
    pub n_categories: usize,
    pub n_dims:       usize,
    pub seq_len:      usize,
}

impl EncoderEmbeddingConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> EncoderEmbedding<B> {
        EncoderEmbedding {
            exercise_embed: EmbeddingConfig::new(self.n_exercises,  self.n_dims).init(device),
            category_embed: EmbeddingConfig::new(self.n_categories, self.n_dims).init(device),
            position_embed: EmbeddingConfig::new(self.seq_len,      self.n_dims).init(device),
            seq_len:        self.seq_len,
        }
    }
}

#[derive(Module, Debug)]
pub struct EncoderEmbedding<B: Backend> {
    pub exercise_embed: Embedding<B>,
    pub category_embed: Embedding<B>,
    pub position_embed: Embedding<B>,
    pub seq_len:        usize,
}

impl<B: Backend> EncoderEmbedding<B> {
    /// exercises, categories: [batch, seq_len] → [batch, seq_len, n_dims]
    pub fn forward(
        &self,
        exercises:  Tensor<B, 2, Int>,
        categories: Tensor<B, 2, Int>,
    ) -> Tensor<B, 3> {
        let [batch, _] = exercises.dims();
        let positions  = position_ids::<B>(batch, self.seq_len, &exercises.device());

        let e = self.exercise_embed.forward(exercises);
        let c = self.category_embed.forward(categories);
        let p = self.position_embed.forward(positions);
        p + c + e
    }
}

// ─── Decoder side ─────────────────────────────────────────────────────────────

#[derive(Config, Debug)]
pub struct DecoderEmbeddingConfig {
    pub n_responses: usize,
    pub n_dims:      usize,
    pub seq_len:     usize,
}

impl DecoderEmbeddingConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> DecoderEmbedding<B> {
        DecoderEmbedding {
            response_embed: EmbeddingConfig::new(self.n_responses, self.n_dims).init(device),
            position_embed: EmbeddingConfig::new(self.seq_len,     self.n_dims).init(device),
            seq_len:        self.seq_len,
        }
    }
}

#[derive(Module, Debug)]
pub struct DecoderEmbedding<B: Backend> {
    pub response_embed: Embedding<B>,
    pub position_embed: Embedding<B>,
    pub seq_len:        usize,
}

impl<B: Backend> DecoderEmbedding<B> {
    /// responses: [batch, seq_len] → [batch, seq_len, n_dims]
    pub fn forward(&self, responses: Tensor<B, 2, Int>) -> Tensor<B, 3> {
        let [batch, _] = responses.dims();
        let positions  = position_ids::<B>(batch, self.seq_len, &responses.device());

        let e = self.response_embed.forward(responses);
        let p = self.position_embed.forward(positions);
        p + e
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    fn ids(values: &[i32], shape: [usize; 2]) -> Tensor<TestBackend, 2, Int> {
        Tensor::<TestBackend, 1, Int>::from_ints(values, &Default::default()).reshape(shape)
    }

    fn max_abs_diff(a: Tensor<TestBackend, 3>, b: Tensor<TestBackend, 3>) -> f32 {
        (a - b).abs().max().into_scalar().elem::<f32>()
    }

    #[test]
    fn test_position_ids_broadcast_over_batch() {
        let p = position_ids::<TestBackend>(2, 4, &Default::default());
        let values: Vec<i64> = p.into_data().to_vec::<i64>().unwrap();
        assert_eq!(values, vec![0, 1, 2, 3, 0, 1, 2, 3]);
    }

    #[test]
    fn test_encoder_is_sum_of_three_tables() {
        let device = Default::default();
        let emb: EncoderEmbedding<TestBackend> =
            EncoderEmbeddingConfig::new(10, 4, 8, 3).init(&device);

        let ex  = ids(&[1, 2, 3, 9, 0, 5], [2, 3]);
        let cat = ids(&[0, 1, 2, 3, 3, 0], [2, 3]);
        let out = emb.forward(ex.clone(), cat.clone());
        assert_eq!(out.dims(), [2, 3, 8]);

        let pos = ids(&[0, 1, 2, 0, 1, 2], [2, 3]);
        let expected = emb.exercise_embed.forward(ex)
            + emb.category_embed.forward(cat)
            + emb.position_embed.forward(pos);
        assert!(max_abs_diff(out, expected) < 1e-6);
    }

    #[test]
    fn test_same_ids_at_different_positions_differ() {
        let device = Default::default();
        let emb: DecoderEmbedding<TestBackend> = DecoderEmbeddingConfig::new(3, 8, 2).init(&device);

        // Response 1 at both positions: only the position embedding separates them
        let out = emb.forward(ids(&[1, 1], [1, 2]));
        let first  = out.clone().slice([0..1, 0..1, 0..8]);
        let second = out.slice([0..1, 1..2, 0..8]);
        assert!(max_abs_diff(first, second) > 0.0);
    }

    #[test]
    fn test_decoder_rows_depend_only_on_own_ids() {
        let device = Default::default();
        let emb: DecoderEmbedding<TestBackend> = DecoderEmbeddingConfig::new(3, 8, 4).init(&device);

        let out = emb.forward(ids(&[0, 1, 2, 1, 0, 1, 2, 0], [2, 4]));
        assert_eq!(out.dims(), [2, 4, 8]);

        // Batch rows share ids at positions 0..3, so they must match there
        let a = out.clone().slice([0..1, 0..3, 0..8]);
        let b = out.slice([1..2, 0..3, 0..8]);
        assert!(max_abs_diff(a, b) < 1e-6);
    }
}
