//! A2C policy inference over the snake grid
//!
//! Pure Rust forward pass of the advantage actor-critic network: one 3×3
//! convolution (optionally CoordConv), a 64-unit hidden layer, and separate
//! policy and value heads.

use rand::{distributions::WeightedIndex, prelude::Distribution, Rng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use super::{argmax, softmax, ConvWeights, LayerWeights};
use crate::env::snake::{ChannelView, GridState, NUM_ACTIONS, NUM_CHANNELS};

/// Width of the hidden layer
pub const HIDDEN_UNITS: usize = 64;

/// Default number of convolution filters
pub const DEFAULT_CHANNELS: usize = 16;

/// A serializable A2C model for grid inference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct A2CInference {
    /// Grid side length
    pub size: usize,
    /// Grid channels fed to the network (3 for snake)
    pub in_channels: usize,
    /// Whether two coordinate planes are appended before the convolution
    pub coord_conv: bool,
    /// Convolution: in_channels (+2) -> filters, 3x3, padding 1
    pub conv: ConvWeights,
    /// Hidden layer: filters*size*size -> 64
    pub linear: LayerWeights,
    /// Value head: 64 -> 1
    pub value_head: LayerWeights,
    /// Policy head: 64 -> num_actions
    pub policy_head: LayerWeights,
}

impl A2CInference {
    /// Randomly initialised model for `size × size` snake grids
    pub fn random<R: Rng + ?Sized>(
        size: usize,
        channels: usize,
        coord_conv: bool,
        rng: &mut R,
    ) -> Self {
        let conv_in = NUM_CHANNELS + if coord_conv { 2 } else { 0 };
        Self {
            size,
            in_channels: NUM_CHANNELS,
            coord_conv,
            conv: ConvWeights::random(conv_in, channels, rng),
            linear: LayerWeights::random(channels * size * size, HIDDEN_UNITS, rng),
            value_head: LayerWeights::random(HIDDEN_UNITS, 1, rng),
            policy_head: LayerWeights::random(HIDDEN_UNITS, NUM_ACTIONS, rng),
        }
    }

    /// Forward pass on one environment's flattened `[channels, size, size]`
    /// planes
    ///
    /// # Returns
    /// * `(probs, value)` - Action probabilities and state value
    pub fn forward(&self, planes: &[f32]) -> (Vec<f32>, f32) {
        let plane = self.size * self.size;
        assert_eq!(planes.len(), self.in_channels * plane, "Input size mismatch");

        let input = if self.coord_conv {
            let mut input = Vec::with_capacity((self.in_channels + 2) * plane);
            input.extend_from_slice(planes);
            input.extend(coordinate_planes(self.size));
            input
        } else {
            planes.to_vec()
        };

        let features: Vec<f32> = self.conv.forward(&input, self.size).into_iter().map(relu).collect();
        let hidden: Vec<f32> = self.linear.forward(&features).into_iter().map(relu).collect();

        let value = self.value_head.forward(&hidden)[0];
        let probs = softmax(&self.policy_head.forward(&hidden));
        (probs, value)
    }

    /// Forward pass on one environment of the batch
    pub fn forward_env(&self, view: ChannelView<'_>) -> (Vec<f32>, f32) {
        self.forward(view.as_slice())
    }

    /// Forward pass on every environment, in parallel
    pub fn forward_batch(&self, grid: &GridState) -> Vec<(Vec<f32>, f32)> {
        assert_eq!(grid.size(), self.size, "Grid size mismatch");
        grid.par_views().map(|view| self.forward_env(view)).collect()
    }

    /// Most probable action per environment
    pub fn greedy_actions(&self, grid: &GridState) -> Vec<i64> {
        self.forward_batch(grid).iter().map(|(probs, _)| argmax(probs) as i64).collect()
    }

    /// Sample one action per environment from the policy
    pub fn sample_actions<R: Rng + ?Sized>(&self, grid: &GridState, rng: &mut R) -> Vec<i64> {
        self.forward_batch(grid)
            .iter()
            .map(|(probs, _)| match WeightedIndex::new(probs) {
                Ok(dist) => dist.sample(rng) as i64,
                Err(_) => argmax(probs) as i64,
            })
            .collect()
    }
}

fn relu(x: f32) -> f32 {
    x.max(0.0)
}

/// Column then row coordinate planes scaled to [-1, 1]
fn coordinate_planes(size: usize) -> Vec<f32> {
    let scale = |i: usize| {
        if size > 1 {
            2.0 * i as f32 / (size - 1) as f32 - 1.0
        } else {
            0.0
        }
    };
    let cols = (0..size * size).map(|idx| scale(idx % size));
    let rows = (0..size * size).map(|idx| scale(idx / size));
    cols.chain(rows).collect()
}
