// ============================================================
// Layer 2 — Stacked N-Multi-Head Attention
// ============================================================
// One block type serves as both the SAINT+ encoder and the
// SAINT+ decoder. A block has S stacks; each stack runs M
// attention sub-steps and then one feed-forward step:
//
//   for stack in 0..S:
//     for sub-step in 0..M:
//       h = MHA(norm(q), norm(k), norm(v), causal mask)
//       if cross-attention starts at the next sub-step:
//         q = q + h ; k = v = encoder_output
//       else:
//         q = q + h ; k = k + h ; v = v + h
//     out = FFN[stack](norm(h)) + h
//   return out of the last stack
//
//   Encoder: M = 1, no break layer      → pure self-attention
//   Decoder: M = 2, break_layer = 1     → self-attention, then
//                                         attention over the
//                                         encoder output
//
// There is ONE LayerNorm per block, reused by every stack and
// every sub-step. Attention sub-layers and FFNs are owned per
// stack.
//
// Reference: Burn Book §3 (MultiHeadAttention)
//            Shin et al. (2021) SAINT+

use burn::{
    nn::{
        attention::{generate_autoregressive_mask, MhaInput, MultiHeadAttention, MultiHeadAttentionConfig},
        LayerNorm, LayerNormConfig,
    },
    prelude::*,
};

use crate::domain::error::{SaintError, SaintResult};
use crate::ml::ffn::{FeedForward, FeedForwardConfig};

#[derive(Config, Debug)]
pub struct StackedAttentionConfig {
    /// Number of (attention sub-steps + FFN) repetitions
    pub n_stacks: usize,
    pub n_dims:   usize,
    /// Heads per attention call; n_dims must be divisible by it
    pub n_heads:  usize,
    pub seq_len:  usize,
    /// Attention sub-steps per stack
    #[config(default = 1)]
    pub n_multihead: usize,
    /// First sub-step whose key/value come from the encoder output.
    /// Must lie in 1..n_multihead.
    pub break_layer: Option<usize>,
    #[config(default = 0.0)]
    pub dropout: f64,
}

impl StackedAttentionConfig {
    pub fn validate(&self) -> SaintResult<()> {
        if self.n_stacks == 0 {
            return Err(SaintError::config("n_stacks must be at least 1"));
        }
        if self.n_multihead == 0 {
            return Err(SaintError::config("n_multihead must be at least 1"));
        }
        if self.n_dims == 0 || self.n_heads == 0 || self.seq_len == 0 {
            return Err(SaintError::config(format!(
                "n_dims ({}), n_heads ({}) and seq_len ({}) must all be positive",
                self.n_dims, self.n_heads, self.seq_len
            )));
        }
        if self.n_dims % self.n_heads != 0 {
            return Err(SaintError::config(format!(
                "n_dims ({}) must be divisible by n_heads ({})",
                self.n_dims, self.n_heads
            )));
        }
        if let Some(layer) = self.break_layer {
            // The switch fires after sub-step layer-1, so at least one
            // sub-step must precede it and one must consume it.
            if layer == 0 || layer >= self.n_multihead {
                return Err(SaintError::config(format!(
                    "break_layer ({layer}) must be in 1..{} for n_multihead = {}",
                    self.n_multihead, self.n_multihead
                )));
            }
        }
        if !(0.0..1.0).contains(&self.dropout) {
            return Err(SaintError::config(format!(
                "dropout ({}) must be in [0, 1)",
                self.dropout
            )));
        }
        Ok(())
    }

    pub fn init<B: Backend>(&self, device: &B::Device) -> SaintResult<StackedAttention<B>> {
        self.validate()?;

        let stacks = (0..self.n_stacks)
            .map(|_| self.build_stack(device))
            .collect();

        Ok(StackedAttention {
            norm:        LayerNormConfig::new(self.n_dims).init(device),
            stacks,
            n_dims:      self.n_dims,
            seq_len:     self.seq_len,
            break_layer: self.break_layer,
        })
    }

    fn build_stack<B: Backend>(&self, device: &B::Device) -> AttentionStack<B> {
        let attention = (0..self.n_multihead)
            .map(|_| {
                MultiHeadAttentionConfig::new(self.n_dims, self.n_heads)
                    .with_dropout(self.dropout)
                    .init(device)
            })
            .collect();
        let ffn = FeedForwardConfig::new(self.n_dims).init(device);
        AttentionStack { attention, ffn }
    }
}

/// One stack: M attention sub-layers followed by its own FFN.
#[derive(Module, Debug)]
pub struct AttentionStack<B: Backend> {
    pub attention: Vec<MultiHeadAttention<B>>,
    pub ffn:       FeedForward<B>,
}

#[derive(Module, Debug)]
pub struct StackedAttention<B: Backend> {
    /// Shared by every stack and sub-step
    pub norm:   LayerNorm<B>,
    pub stacks: Vec<AttentionStack<B>>,
    pub n_dims:  usize,
    pub seq_len: usize,
    /// None means the block never switches to the encoder output
    pub break_layer: Option<usize>,
}

impl<B: Backend> StackedAttention<B> {
    pub fn n_multihead(&self) -> usize {
        self.stacks.first().map_or(0, |s| s.attention.len())
    }

    /// Whether key/value are replaced by the encoder output after sub-step `m`.
    pub fn switches_after(&self, m: usize) -> bool {
        self.break_layer == Some(m + 1)
    }

    /// query/key/value (and encoder_output): [batch, seq_len, n_dims]
    ///   → [batch, seq_len, n_dims]
    ///
    /// `encoder_output` is only consulted by blocks configured with a
    /// break layer.
    pub fn forward(
        &self,
        query:          Tensor<B, 3>,
        key:            Tensor<B, 3>,
        value:          Tensor<B, 3>,
        encoder_output: Option<Tensor<B, 3>>,
    ) -> SaintResult<Tensor<B, 3>> {
        let [batch, _, _] = query.dims();
        let expected = [batch, self.seq_len, self.n_dims];
        check_dims("attention query", &query, &expected)?;
        check_dims("attention key", &key, &expected)?;
        check_dims("attention value", &value, &expected)?;
        if let Some(enc) = &encoder_output {
            check_dims("encoder output", enc, &expected)?;
        }

        // Strict upper triangle is masked: position i sees 0..=i
        let mask = generate_autoregressive_mask::<B>(batch, self.seq_len, &query.device());

        let (mut q, mut k, mut v) = (query, key, value);
        let mut block_output = None;

        for stack in &self.stacks {
            let last = stack.attention.len() - 1;

            for (m, mha) in stack.attention.iter().enumerate() {
                let input = MhaInput::new(
                    self.norm.forward(q.clone()),
                    self.norm.forward(k.clone()),
                    self.norm.forward(v.clone()),
                )
                .mask_attn(mask.clone());
                let heads = mha.forward(input).context;

                match &encoder_output {
                    Some(enc) if self.switches_after(m) => {
                        q = q + heads.clone();
                        k = enc.clone();
                        v = enc.clone();
                    }
                    _ => {
                        q = q + heads.clone();
                        k = k + heads.clone();
                        v = v + heads.clone();
                    }
                }

                if m == last {
                    let ffn_out = stack.ffn.forward(self.norm.forward(heads.clone()));
                    block_output = Some(ffn_out + heads);
                }
            }
        }

        block_output.ok_or_else(|| SaintError::config("attention block has no stacks"))
    }
}

fn check_dims<B: Backend>(what: &str, t: &Tensor<B, 3>, expected: &[usize; 3]) -> SaintResult<()> {
    let actual = t.dims();
    if &actual != expected {
        return Err(SaintError::shape(what, expected, &actual));
    }
    Ok(())
}
