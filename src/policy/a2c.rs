//! A2C policy network for the snake grid
//!
//! Advantage actor-critic with a hardcoded compact CNN: one 3×3 convolution
//! (optionally CoordConv), a 64-unit hidden layer, and policy/value heads.
//! Consumes the `[N, 3, S, S]` grid directly.

use anyhow::Result;
use tch::{nn, Device, Kind, Tensor};

use crate::{
    env::snake::{NUM_ACTIONS, NUM_CHANNELS},
    inference::{a2c::HIDDEN_UNITS, A2CInference, ConvWeights, LayerWeights},
};

/// A2C policy network
#[derive(Debug)]
pub struct A2C {
    conv1: nn::Conv2D,
    linear: nn::Linear,
    value_head: nn::Linear,
    policy_head: nn::Linear,
    size: i64,
    coord_conv: bool,
}

impl A2C {
    /// Create a new A2C policy
    ///
    /// # Arguments
    /// * `vs` - Variable store path for parameters
    /// * `size` - Side length of the grid
    /// * `coord_conv` - Append x/y coordinate planes before the convolution
    /// * `channels` - Number of convolution filters
    pub fn new(vs: &nn::Path, size: i64, coord_conv: bool, channels: i64) -> Self {
        let in_channels = NUM_CHANNELS as i64 + if coord_conv { 2 } else { 0 };
        let conv1 = nn::conv2d(
            vs / "conv1",
            in_channels,
            channels,
            3,
            nn::ConvConfig { padding: 1, ..Default::default() },
        );
        let hidden = HIDDEN_UNITS as i64;
        let linear = nn::linear(vs / "linear", channels * size * size, hidden, Default::default());
        let value_head = nn::linear(vs / "value_head", hidden, 1, Default::default());
        let policy_head =
            nn::linear(vs / "policy_head", hidden, NUM_ACTIONS as i64, Default::default());

        Self { conv1, linear, value_head, policy_head, size, coord_conv }
    }

    /// Append column and row coordinate planes scaled to [-1, 1]
    fn with_coordinates(&self, grid: &Tensor) -> Tensor {
        let batch_size = grid.size()[0];
        let size = self.size;
        let ramp = if size > 1 {
            Tensor::arange(size, (Kind::Float, grid.device())) * (2.0 / (size - 1) as f64) - 1.0
        } else {
            Tensor::zeros([1], (Kind::Float, grid.device()))
        };
        let cols = ramp.view([1, 1, 1, size]).expand([batch_size, 1, size, size], false);
        let rows = ramp.view([1, 1, size, 1]).expand([batch_size, 1, size, size], false);
        Tensor::cat(&[grid.shallow_clone(), cols, rows], 1)
    }

    /// Forward pass through the network
    ///
    /// # Arguments
    /// * `grid` - Input grid tensor [batch, 3, size, size]
    ///
    /// # Returns
    /// * `(action_logits, values)` - Policy logits and value estimates
    pub fn forward(&self, grid: &Tensor) -> (Tensor, Tensor) {
        let input = if self.coord_conv { self.with_coordinates(grid) } else { grid.shallow_clone() };
        let x = input.apply(&self.conv1).relu();

        let batch_size = x.size()[0];
        let features = x.view([batch_size, -1]).apply(&self.linear).relu();

        (features.apply(&self.policy_head), features.apply(&self.value_head))
    }

    /// Get action probabilities and value from observations
    pub fn forward_policy(&self, grid: &Tensor) -> (Tensor, Tensor) {
        let (logits, values) = self.forward(grid);
        (logits.softmax(-1, Kind::Float), values)
    }

    /// Sample action from policy
    pub fn sample_action(&self, grid: &Tensor) -> (Tensor, Tensor, Tensor) {
        let (logits, values) = self.forward(grid);
        let probs = logits.softmax(-1, Kind::Float);
        let action = probs.multinomial(1, true);
        let log_prob = logits.log_softmax(-1, Kind::Float).gather(1, &action, false);
        (action, log_prob, values)
    }

    /// Get deterministic action (for evaluation)
    pub fn get_action(&self, grid: &Tensor) -> Tensor {
        let (logits, _) = self.forward(grid);
        logits.argmax(-1, false)
    }

    /// Export model weights for pure Rust inference
    pub fn export_for_inference(&self) -> Result<A2CInference> {
        fn to_vec(tensor: &Tensor) -> Result<Vec<f32>> {
            let cpu = tensor.detach().to_device(Device::Cpu).to_kind(Kind::Float).contiguous();
            Ok(Vec::<f32>::try_from(&cpu.view([-1]))?)
        }
        fn bias(bs: &Option<Tensor>, len: i64) -> Result<Vec<f32>> {
            match bs {
                Some(bs) => to_vec(bs),
                None => Ok(vec![0.0; len as usize]),
            }
        }
        fn linear(layer: &nn::Linear) -> Result<LayerWeights> {
            let [out_features, in_features] = layer.ws.size()[..] else {
                anyhow::bail!("linear weight must be 2D");
            };
            Ok(LayerWeights::new(
                to_vec(&layer.ws)?,
                bias(&layer.bs, out_features)?,
                in_features as usize,
                out_features as usize,
            ))
        }

        let [out_channels, in_channels, _, _] = self.conv1.ws.size()[..] else {
            anyhow::bail!("conv weight must be 4D");
        };
        let conv = ConvWeights::new(
            to_vec(&self.conv1.ws)?,
            bias(&self.conv1.bs, out_channels)?,
            in_channels as usize,
            out_channels as usize,
        );

        let model = A2CInference {
            size: self.size as usize,
            in_channels: NUM_CHANNELS,
            coord_conv: self.coord_conv,
            conv,
            linear: linear(&self.linear)?,
            value_head: linear(&self.value_head)?,
            policy_head: linear(&self.policy_head)?,
        };
        model.check_dimensions()?;
        Ok(model)
    }
}
