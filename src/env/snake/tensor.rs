//! Torch tensor interop
//!
//! Hands the batched grid to a torch policy as a `[N, 3, S, S]` float
//! tensor and accepts actions back as an integer tensor.

use tch::{Kind, Tensor};

use super::{
    config::Device,
    environment::{SingleSnakeEnvironments, SnakeStep},
    error::SnakeError,
    grid::GridState,
};

impl From<Device> for tch::Device {
    fn from(device: Device) -> Self {
        match device {
            Device::Cpu => tch::Device::Cpu,
            Device::Cuda(ordinal) => tch::Device::Cuda(ordinal),
        }
    }
}

impl GridState {
    /// Copy the grid into a `[num_envs, 3, size, size]` float tensor
    pub fn to_tensor(&self, device: Device) -> Tensor {
        let [n, c, h, w] = self.shape();
        Tensor::from_slice(self.as_slice())
            .view([n as i64, c as i64, h as i64, w as i64])
            .to_device(device.into())
    }
}

/// Read a tensor of actions into a host vector
///
/// Only 16, 32 and 64-bit integer tensors are accepted; anything else is a
/// [`SnakeError::InvalidActionType`].
pub fn actions_from_tensor(actions: &Tensor) -> Result<Vec<i64>, SnakeError> {
    match actions.kind() {
        Kind::Int16 | Kind::Int | Kind::Int64 => {}
        other => return Err(SnakeError::InvalidActionType(format!("{other:?}"))),
    }

    let flat = actions.to_device(tch::Device::Cpu).to_kind(Kind::Int64).flatten(0, -1);
    Vec::<i64>::try_from(&flat).map_err(|e| SnakeError::InvalidActionType(e.to_string()))
}

impl SingleSnakeEnvironments {
    /// The grid as a tensor on the configured device
    pub fn grid_tensor(&self) -> Tensor {
        self.grid().to_tensor(self.config().device)
    }

    /// Step with actions sampled by a torch policy
    pub fn step_tensor(&mut self, actions: &Tensor) -> Result<SnakeStep<'_>, SnakeError> {
        let actions = actions_from_tensor(actions)?;
        self.step(&actions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::env::snake::config::SnakeConfig;

    #[test]
    fn test_grid_tensor_shape() {
        let env = SingleSnakeEnvironments::new(SnakeConfig::new().num_envs(3).seed(0)).unwrap();
        let tensor = env.grid_tensor();
        assert_eq!(tensor.size(), vec![3, 3, 12, 12]);
        assert_eq!(tensor.kind(), Kind::Float);
    }

    #[test]
    fn test_integer_kinds_accepted() {
        let actions = Tensor::from_slice(&[0_i32, 1, 2, 3]);
        assert_eq!(actions_from_tensor(&actions).unwrap(), vec![0, 1, 2, 3]);

        let actions = Tensor::from_slice(&[3_i64, 2]);
        assert_eq!(actions_from_tensor(&actions).unwrap(), vec![3, 2]);
    }

    #[test]
    fn test_float_actions_rejected() {
        let mut env = SingleSnakeEnvironments::new(SnakeConfig::new().num_envs(2).seed(0)).unwrap();
        let actions = Tensor::from_slice(&[0.0_f32, 1.0]);
        let err = env.step_tensor(&actions).unwrap_err();
        assert!(matches!(err, SnakeError::InvalidActionType(_)));
        assert!(err.is_contract_violation());
    }
}
