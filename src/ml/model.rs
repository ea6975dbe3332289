// ============================================================
// Layer 2 — SAINT+ Model
// ============================================================
// Encoder-decoder transformer for knowledge tracing.
//
//   exercises, categories ─► EncoderEmbedding ─► encoder stack (M=1)
//                                                     │ encoder_output
//   responses ─► DecoderEmbedding ─┐                  ▼
//   elapsed   ─► elapsed_embed   ──┼─(sum)─► decoder stack (M=2, break_layer=1)
//   lagged    ─► lagged_embed    ──┘                  │
//                                                     ▼
//                                             Linear(D→1) ─► logits [batch, seq_len]
//
// The logits are turned into probabilities with a sigmoid, and
// trained with binary cross-entropy on logits. The loss is
// exposed for an external training loop; forward never calls it.
//
// Reference: Shin et al. (2021) SAINT+
//            Burn Book §3 (Building Blocks), §5 (Training)

use burn::{
    nn::{
        loss::{BinaryCrossEntropyLoss, BinaryCrossEntropyLossConfig},
        Embedding, EmbeddingConfig,
        Linear, LinearConfig,
    },
    prelude::*,
    tensor::activation::sigmoid,
};

use crate::domain::error::{SaintError, SaintResult};
use crate::domain::feature::VocabSizes;
use crate::domain::interaction::InteractionSequence;
use crate::ml::attention::{StackedAttention, StackedAttentionConfig};
use crate::ml::embedding::{
    DecoderEmbedding, DecoderEmbeddingConfig, EncoderEmbedding, EncoderEmbeddingConfig,
};
use crate::ml::input::SaintInput;

/// Decoder sub-steps: self-attention, then attention over the encoder
const DECODER_MULTIHEAD: usize = 2;
/// First decoder sub-step that reads the encoder output
const DECODER_BREAK_LAYER: usize = 1;

// NOTE: #[derive(Config)] already generates Clone and Serialize/Deserialize.
#[derive(Config, Debug)]
pub struct SaintPlusConfig {
    pub n_enc_stack:    usize,
    pub n_dec_stack:    usize,
    pub n_dims:         usize,
    pub n_enc_head:     usize,
    pub n_dec_head:     usize,
    pub seq_len:        usize,
    pub n_exercises:    usize,
    pub n_categories:   usize,
    pub n_responses:    usize,
    pub n_lagged_time:  usize,
    pub n_elapsed_time: usize,
    #[config(default = 0.0)]
    pub dropout:        f64,
}

impl SaintPlusConfig {
    pub fn vocab_sizes(&self) -> VocabSizes {
        VocabSizes {
            exercises:    self.n_exercises,
            categories:   self.n_categories,
            responses:    self.n_responses,
            elapsed_time: self.n_elapsed_time,
            lagged_time:  self.n_lagged_time,
        }
    }

    pub fn encoder_config(&self) -> StackedAttentionConfig {
        StackedAttentionConfig::new(self.n_enc_stack, self.n_dims, self.n_enc_head, self.seq_len)
            .with_dropout(self.dropout)
    }

    pub fn decoder_config(&self) -> StackedAttentionConfig {
        StackedAttentionConfig::new(self.n_dec_stack, self.n_dims, self.n_dec_head, self.seq_len)
            .with_n_multihead(DECODER_MULTIHEAD)
            .with_break_layer(Some(DECODER_BREAK_LAYER))
            .with_dropout(self.dropout)
    }

    /// Check every hyperparameter without allocating any weights.
    pub fn validate(&self) -> SaintResult<()> {
        let vocab = self.vocab_sizes();
        let vocab_fields = [
            ("n_exercises",    vocab.exercises),
            ("n_categories",   vocab.categories),
            ("n_responses",    vocab.responses),
            ("n_elapsed_time", vocab.elapsed_time),
            ("n_lagged_time",  vocab.lagged_time),
        ];
        if let Some((name, _)) = vocab_fields.iter().find(|(_, size)| *size == 0) {
            return Err(SaintError::config(format!("{name} must be at least 1")));
        }
        self.encoder_config().validate()?;
        self.decoder_config().validate()
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> SaintResult<SaintPlus<B>> {
        self.validate()?;

        let encoder_embedding = EncoderEmbeddingConfig::new(
            self.n_exercises, self.n_categories, self.n_dims, self.seq_len,
        ).init(device);
        let decoder_embedding = DecoderEmbeddingConfig::new(
            self.n_responses, self.n_dims, self.seq_len,
        ).init(device);
        let elapsed_embed = EmbeddingConfig::new(self.n_elapsed_time, self.n_dims).init(device);
        let lagged_embed  = EmbeddingConfig::new(self.n_lagged_time,  self.n_dims).init(device);
        let encoder = self.encoder_config().init(device)?;
        let decoder = self.decoder_config().init(device)?;
        let head    = LinearConfig::new(self.n_dims, 1).init(device);

        let model = SaintPlus {
            encoder_embedding,
            decoder_embedding,
            elapsed_embed,
            lagged_embed,
            encoder,
            decoder,
            head,
            seq_len: self.seq_len,
            n_exercises:    self.n_exercises,
            n_categories:   self.n_categories,
            n_responses:    self.n_responses,
            n_elapsed_time: self.n_elapsed_time,
            n_lagged_time:  self.n_lagged_time,
        };
        tracing::info!(
            "SAINT+ ready: {} encoder / {} decoder stacks, n_dims={}, seq_len={}, {} parameters",
            self.n_enc_stack, self.n_dec_stack, self.n_dims, self.seq_len, model.num_params(),
        );
        Ok(model)
    }
}

#[derive(Module, Debug)]
pub struct SaintPlus<B: Backend> {
    pub encoder_embedding: EncoderEmbedding<B>,
    pub decoder_embedding: DecoderEmbedding<B>,
    pub elapsed_embed:     Embedding<B>,
    pub lagged_embed:      Embedding<B>,
    pub encoder:           StackedAttention<B>,
    pub decoder:           StackedAttention<B>,
    pub head:              Linear<B>,
    pub seq_len:           usize,
    pub n_exercises:       usize,
    pub n_categories:      usize,
    pub n_responses:       usize,
    pub n_elapsed_time:    usize,
    pub n_lagged_time:     usize,
}

impl<B: Backend> SaintPlus<B> {
    pub fn vocab_sizes(&self) -> VocabSizes {
        VocabSizes {
            exercises:    self.n_exercises,
            categories:   self.n_categories,
            responses:    self.n_responses,
            elapsed_time: self.n_elapsed_time,
            lagged_time:  self.n_lagged_time,
        }
    }

    /// Validated forward pass: five [batch, seq_len] id tensors →
    /// correctness logits [batch, seq_len].
    pub fn forward(&self, input: SaintInput<B>) -> SaintResult<Tensor<B, 2>> {
        input.validate_shape(self.seq_len)?;
        input.validate_ids(&self.vocab_sizes())?;
        self.logits(input)
    }

    /// Forward pass that checks shapes but not id ranges (no device
    /// read-back). The caller guarantees ids fit their vocabularies,
    /// e.g. via `SaintInput::from_sequences`.
    pub fn logits(&self, input: SaintInput<B>) -> SaintResult<Tensor<B, 2>> {
        input.validate_shape(self.seq_len)?;
        let [batch, seq_len] = input.dims();
        tracing::debug!("SAINT+ forward: batch={}, seq_len={}", batch, seq_len);

        let enc = self.encoder_embedding.forward(input.exercises, input.categories);
        let dec = self.decoder_embedding.forward(input.responses)
            + self.elapsed_embed.forward(input.elapsed_time)
            + self.lagged_embed.forward(input.lagged_time);

        let encoder_output = self.encoder.forward(enc.clone(), enc.clone(), enc, None)?;
        let decoder_output = self.decoder.forward(dec.clone(), dec.clone(), dec, Some(encoder_output))?;

        // [batch, seq_len, 1] → [batch, seq_len]
        Ok(self.head.forward(decoder_output).reshape([batch, seq_len]))
    }

    /// Probability of a correct response at every position.
    pub fn predict(&self, input: SaintInput<B>) -> SaintResult<Tensor<B, 2>> {
        Ok(sigmoid(self.forward(input)?))
    }

    /// Logits for a single learner, squeezed to [seq_len].
    pub fn forward_sequence(
        &self,
        sequence: &InteractionSequence,
        device:   &B::Device,
    ) -> SaintResult<Tensor<B, 1>> {
        let input = SaintInput::from_sequences(
            std::slice::from_ref(sequence), self.seq_len, &self.vocab_sizes(), device,
        )?;
        Ok(self.logits(input)?.reshape([self.seq_len]))
    }

    /// Binary cross-entropy on logits, for the training loop.
    pub fn loss(&self, device: &B::Device) -> BinaryCrossEntropyLoss<B> {
        BinaryCrossEntropyLossConfig::new()
            .with_logits(true)
            .init(device)
    }

    /// targets: [batch, seq_len] with values 0 (wrong) or 1 (correct)
    ///   → (mean loss, logits)
    pub fn forward_loss(
        &self,
        input:   SaintInput<B>,
        targets: Tensor<B, 2, Int>,
    ) -> SaintResult<(Tensor<B, 1>, Tensor<B, 2>)> {
        input.validate(self.seq_len, &self.vocab_sizes())?;
        let expected = input.dims();
        let actual   = targets.dims();
        if actual != expected {
            return Err(SaintError::shape("correctness targets", &expected, &actual));
        }
        let min: i64 = targets.clone().min().into_scalar().elem::<i64>();
        let max: i64 = targets.clone().max().into_scalar().elem::<i64>();
        if let Some(value) = [min, max].into_iter().find(|v| !(0..=1).contains(v)) {
            return Err(SaintError::InvalidTarget { value });
        }

        let logits = self.logits(input)?;
        let loss = self.loss(&logits.device()).forward(logits.clone(), targets);
        Ok((loss, logits))
    }
}
