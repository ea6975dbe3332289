// ============================================================
// Layer 2 — ML / Model Layer (Burn)
// ============================================================
// All Burn framework code lives in this layer. Every module
// is generic over the Burn Backend, so the same model runs on
// NdArray, Wgpu, or Autodiff<_> for training.
//
//   ffn.rs       — Linear → ReLU → Linear
//   embedding.rs — encoder / decoder token + position embeddings
//   attention.rs — stacked N-multi-head attention with the
//                  cross-attention break layer
//   input.rs     — the five id tensors and their validation
//   model.rs     — SAINT+ assembly, logits, probabilities, loss
//
// Reference: Burn Book §3 (Building Blocks)
//            Shin et al. (2021) SAINT+: Integrating Temporal
//            Features for EdNet Correctness Prediction

/// Position-wise feed-forward block
pub mod ffn;

/// Encoder and decoder embeddings with learned positions
pub mod embedding;

/// Stacked multi-head attention shared by encoder and decoder
pub mod attention;

/// Batched model input built from tensors or interaction sequences
pub mod input;

/// The SAINT+ model and its configuration
pub mod model;
