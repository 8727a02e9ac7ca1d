//! Pure Rust inference for grid policies
//!
//! This module provides a lightweight forward pass for the A2C policy that
//! consumes the batched snake grid. It has no libtorch dependency; weights
//! trained with the `training` feature are exported into these structs.

pub mod a2c;
pub mod weights;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub use a2c::A2CInference;

/// Weights and biases for a single linear layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerWeights {
    /// Weight matrix (flattened, row-major `[out, in]`)
    pub weights: Vec<f32>,
    /// Bias vector
    pub biases: Vec<f32>,
    /// Input dimension
    pub in_features: usize,
    /// Output dimension
    pub out_features: usize,
}

impl LayerWeights {
    /// Create new layer weights
    pub fn new(weights: Vec<f32>, biases: Vec<f32>, in_features: usize, out_features: usize) -> Self {
        assert_eq!(weights.len(), in_features * out_features, "Weight matrix size mismatch");
        assert_eq!(biases.len(), out_features, "Bias vector size mismatch");

        Self { weights, biases, in_features, out_features }
    }

    /// Uniform initialisation in `±1/sqrt(in_features)`
    pub fn random<R: Rng + ?Sized>(in_features: usize, out_features: usize, rng: &mut R) -> Self {
        let bound = 1.0 / (in_features.max(1) as f32).sqrt();
        let weights = (0..in_features * out_features).map(|_| rng.gen_range(-bound..bound)).collect();
        let biases = (0..out_features).map(|_| rng.gen_range(-bound..bound)).collect();
        Self::new(weights, biases, in_features, out_features)
    }

    /// Forward pass through a linear layer
    pub fn forward(&self, input: &[f32]) -> Vec<f32> {
        assert_eq!(input.len(), self.in_features, "Input size mismatch");

        self.weights
            .chunks_exact(self.in_features.max(1))
            .zip(&self.biases)
            .map(|(row, bias)| bias + row.iter().zip(input).map(|(w, x)| w * x).sum::<f32>())
            .collect()
    }
}

/// Weights and biases for a 3×3 convolution with padding 1
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvWeights {
    /// Kernels (flattened `[out, in, 3, 3]`)
    pub weights: Vec<f32>,
    /// Bias per output channel
    pub biases: Vec<f32>,
    /// Input channels
    pub in_channels: usize,
    /// Output channels
    pub out_channels: usize,
}

impl ConvWeights {
    /// Create new convolution weights
    pub fn new(weights: Vec<f32>, biases: Vec<f32>, in_channels: usize, out_channels: usize) -> Self {
        assert_eq!(weights.len(), out_channels * in_channels * 9, "Kernel size mismatch");
        assert_eq!(biases.len(), out_channels, "Bias vector size mismatch");

        Self { weights, biases, in_channels, out_channels }
    }

    /// Uniform initialisation in `±1/sqrt(in_channels * 9)`
    pub fn random<R: Rng + ?Sized>(in_channels: usize, out_channels: usize, rng: &mut R) -> Self {
        let bound = 1.0 / ((in_channels * 9).max(1) as f32).sqrt();
        let weights =
            (0..out_channels * in_channels * 9).map(|_| rng.gen_range(-bound..bound)).collect();
        let biases = (0..out_channels).map(|_| rng.gen_range(-bound..bound)).collect();
        Self::new(weights, biases, in_channels, out_channels)
    }

    /// Convolve `[in, size, size]` planes into `[out, size, size]` planes
    pub fn forward(&self, input: &[f32], size: usize) -> Vec<f32> {
        let plane = size * size;
        assert_eq!(input.len(), self.in_channels * plane, "Input size mismatch");

        let mut output = vec![0.0; self.out_channels * plane];
        for (out_c, out_plane) in output.chunks_exact_mut(plane.max(1)).enumerate() {
            out_plane.fill(self.biases[out_c]);
            for in_c in 0..self.in_channels {
                let kernel = &self.weights[(out_c * self.in_channels + in_c) * 9..][..9];
                let in_plane = &input[in_c * plane..(in_c + 1) * plane];
                for h in 0..size {
                    for w in 0..size {
                        let mut sum = 0.0;
                        for kh in 0..3 {
                            let ih = h as isize + kh as isize - 1;
                            if ih < 0 || ih >= size as isize {
                                continue;
                            }
                            for kw in 0..3 {
                                let iw = w as isize + kw as isize - 1;
                                if iw < 0 || iw >= size as isize {
                                    continue;
                                }
                                sum += in_plane[ih as usize * size + iw as usize] * kernel[kh * 3 + kw];
                            }
                        }
                        out_plane[h * size + w] += sum;
                    }
                }
            }
        }
        output
    }
}

/// Softmax activation function
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    // Subtract max for numerical stability
    let max_logit = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let exps: Vec<f32> = logits.iter().map(|&x| (x - max_logit).exp()).collect();
    let sum: f32 = exps.iter().sum();
    exps.iter().map(|&x| x / sum).collect()
}

/// Index of the largest value (first on ties)
pub fn argmax(values: &[f32]) -> usize {
    values
        .iter()
        .enumerate()
        .fold((0, f32::NEG_INFINITY), |best, (i, &v)| if v > best.1 { (i, v) } else { best })
        .0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layer_forward() {
        // 2D input -> 3D output
        let weights = vec![
            1.0, 2.0, // First output neuron
            3.0, 4.0, // Second output neuron
            5.0, 6.0, // Third output neuron
        ];
        let biases = vec![0.1, 0.2, 0.3];
        let layer = LayerWeights::new(weights, biases, 2, 3);

        let output = layer.forward(&[1.0, 2.0]);

        // Expected: [1*1 + 2*2 + 0.1, 1*3 + 2*4 + 0.2, 1*5 + 2*6 + 0.3]
        assert!((output[0] - 5.1).abs() < 1e-5);
        assert!((output[1] - 11.2).abs() < 1e-5);
        assert!((output[2] - 17.3).abs() < 1e-5);
    }

    #[test]
    fn test_conv_identity_kernel() {
        let mut weights = vec![0.0; 9];
        weights[4] = 2.0;
        let conv = ConvWeights::new(weights, vec![0.5], 1, 1);

        let input: Vec<f32> = (0..16).map(|i| i as f32).collect();
        let output = conv.forward(&input, 4);
        for (o, i) in output.iter().zip(&input) {
            assert!((o - (2.0 * i + 0.5)).abs() < 1e-5);
        }
    }

    #[test]
    fn test_conv_respects_zero_padding() {
        // All-ones kernel sums the 3x3 neighbourhood
        let conv = ConvWeights::new(vec![1.0; 9], vec![0.0], 1, 1);
        let output = conv.forward(&[1.0; 9], 3);
        assert_eq!(output[0], 4.0); // corner
        assert_eq!(output[1], 6.0); // edge
        assert_eq!(output[4], 9.0); // centre
    }

    #[test]
    fn test_softmax() {
        let probs = softmax(&[1.0, 2.0, 3.0]);

        let sum: f32 = probs.iter().sum();
        assert!((sum - 1.0).abs() < 1e-5);
        assert!(probs[0] < probs[1]);
        assert!(probs[1] < probs[2]);
    }

    #[test]
    fn test_argmax() {
        assert_eq!(argmax(&[0.1, 0.7, 0.2]), 1);
        assert_eq!(argmax(&[0.5, 0.5]), 0);
    }
}
