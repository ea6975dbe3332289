// ============================================================
// Layer 2 — Feed-Forward Block
// ============================================================
// Position-wise two-layer projection applied after each
// attention stack:
//
//   x → Linear(D→D) → ReLU → Linear(D→D)
//
// The caller normalises before calling and adds the residual
// afterwards, so there is no LayerNorm in here.

use burn::{
    nn::{Linear, LinearConfig},
    prelude::*,
    tensor::activation::relu,
};

#[derive(Config, Debug)]
pub struct FeedForwardConfig {
    pub n_dims: usize,
}

impl FeedForwardConfig {
    pub fn init<B: Backend>(&self, device: &B::Device) -> FeedForward<B> {
        FeedForward {
            linear1: LinearConfig::new(self.n_dims, self.n_dims).init(device),
            linear2: LinearConfig::new(self.n_dims, self.n_dims).init(device),
        }
    }
}

#[derive(Module, Debug)]
pub struct FeedForward<B: Backend> {
    pub linear1: Linear<B>,
    pub linear2: Linear<B>,
}

impl<B: Backend> FeedForward<B> {
    /// [batch, seq_len, n_dims] → [batch, seq_len, n_dims]
    pub fn forward(&self, x: Tensor<B, 3>) -> Tensor<B, 3> {
        self.linear2.forward(relu(self.linear1.forward(x)))
    }
}

// ─── Unit Tests ───────────────────────────────────────────────────────────────
#[cfg(test)]
mod tests {
    use super::*;
    use burn::backend::NdArray;

    type TestBackend = NdArray;

    #[test]
    fn test_preserves_shape() {
        let device = Default::default();
        let ffn: FeedForward<TestBackend> = FeedForwardConfig::new(8).init(&device);
        let x = Tensor::<TestBackend, 3>::ones([2, 5, 8], &device);
        assert_eq!(ffn.forward(x).dims(), [2, 5, 8]);
    }

    #[test]
    fn test_applied_independently_per_timestep() {
        let device = Default::default();
        let ffn: FeedForward<TestBackend> = FeedForwardConfig::new(4).init(&device);

        // Same vector at two positions must give the same output row
        let row = [0.5f32, -1.0, 2.0, 0.25];
        let mut flat = Vec::new();
        flat.extend_from_slice(&row);
        flat.extend_from_slice(&[9.0, 9.0, 9.0, 9.0]);
        flat.extend_from_slice(&row);
        let x = Tensor::<TestBackend, 1>::from_floats(flat.as_slice(), &device).reshape([1, 3, 4]);

        let out: Vec<f32> = ffn.forward(x).into_data().to_vec::<f32>().unwrap();
        for d in 0..4 {
            assert!((out[d] - out[8 + d]).abs() < 1e-6);
        }
    }

    #[test]
    fn test_relu_between_layers() {
        let device = Default::default();
        let ffn: FeedForward<TestBackend> = FeedForwardConfig::new(4).init(&device);
        let x = Tensor::<TestBackend, 3>::random(
            [1, 2, 4],
            burn::tensor::Distribution::Normal(0.0, 1.0),
            &device,
        );

        let hidden = relu(ffn.linear1.forward(x.clone()));
        let expected = ffn.linear2.forward(hidden);
        let diff: f32 = (ffn.forward(x) - expected).abs().max().into_scalar().elem::<f32>();
        assert!(diff < 1e-6);
    }
}
