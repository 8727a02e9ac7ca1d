//! Configuration for the batched Snake environments
//!
//! This module defines the construction parameters, their validation, and
//! loading from JSON files.

use std::{
    fs::File,
    io::{Read, Write},
    path::Path,
};

use anyhow::Result;
use serde::{Deserialize, Serialize};

use super::error::SnakeError;

/// Smallest side length the factory can still fit a snake into (exclusive)
pub const MIN_GRID_SIZE: usize = 10;

/// The only initial snake length the factory implements
pub const SUPPORTED_SNAKE_LENGTH: usize = 3;

/// What happens to an environment after its snake dies
///
/// The engine only reports `done`; applying the policy is up to the caller,
/// who passes the done mask back into `reset`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OnDeath {
    /// Replace the environment with a freshly generated one
    #[default]
    Restart,
}

/// Compute device the grid is destined for
///
/// The engine itself always steps on the CPU; the device is used when the
/// grid is handed to a torch policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Device {
    /// Host memory
    #[default]
    Cpu,
    /// CUDA device with the given ordinal
    Cuda(usize),
}

/// Construction parameters for [`super::SingleSnakeEnvironments`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SnakeConfig {
    /// Number of environments in the batch
    pub num_envs: usize,

    /// Side length of every (square) grid, boundary ring included
    pub size: usize,

    /// Episode length budget, enforced by the caller
    pub max_timesteps: Option<usize>,

    /// Length of freshly created snakes
    pub initial_snake_length: usize,

    /// Death policy, enforced by the caller
    pub on_death: OnDeath,

    /// Target device for tensors built from the grid
    pub device: Device,

    /// Skip creating environments at construction time
    pub manual_setup: bool,

    /// Seed for the engine's random stream; entropy when absent
    pub seed: Option<u64>,
}

impl Default for SnakeConfig {
    fn default() -> Self {
        Self {
            num_envs: 64,
            size: 12,
            max_timesteps: None,
            initial_snake_length: SUPPORTED_SNAKE_LENGTH,
            on_death: OnDeath::Restart,
            device: Device::Cpu,
            manual_setup: false,
            seed: None,
        }
    }
}

impl SnakeConfig {
    /// Create a new default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate configuration parameters
    ///
    /// Only configurations the engine cannot build are rejected; they are
    /// reported as [`SnakeError::Unsupported`].
    pub fn validate(&self) -> Result<(), SnakeError> {
        if self.size <= MIN_GRID_SIZE {
            return Err(SnakeError::Unsupported(
                "cannot make an environment with side length 10 or less",
            ));
        }
        if self.initial_snake_length != SUPPORTED_SNAKE_LENGTH {
            return Err(SnakeError::Unsupported(
                "only initial snake length = 3 has been implemented",
            ));
        }
        Ok(())
    }

    /// Load a configuration from a JSON file and validate it
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut file = File::open(path)?;
        let mut contents = String::new();
        file.read_to_string(&mut contents)?;
        let config: SnakeConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a JSON file
    pub fn to_json_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    /// Set number of environments
    pub fn num_envs(mut self, num_envs: usize) -> Self {
        self.num_envs = num_envs;
        self
    }

    /// Set grid side length
    pub fn size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Set episode length budget
    pub fn max_timesteps(mut self, max_timesteps: usize) -> Self {
        self.max_timesteps = Some(max_timesteps);
        self
    }

    /// Set initial snake length
    pub fn initial_snake_length(mut self, length: usize) -> Self {
        self.initial_snake_length = length;
        self
    }

    /// Set death policy
    pub fn on_death(mut self, on_death: OnDeath) -> Self {
        self.on_death = on_death;
        self
    }

    /// Set target device
    pub fn device(mut self, device: Device) -> Self {
        self.device = device;
        self
    }

    /// Skip automatic environment creation
    pub fn manual_setup(mut self, manual_setup: bool) -> Self {
        self.manual_setup = manual_setup;
        self
    }

    /// Seed the random stream
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }
}

#[cfg(test)]
mod tests {
    use tempfile::NamedTempFile;

    use super::*;

    #[test]
    fn test_default_config() {
        let config = SnakeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.size, 12);
        assert_eq!(config.initial_snake_length, 3);
        assert_eq!(config.on_death, OnDeath::Restart);
        assert!(config.max_timesteps.is_none());
    }

    #[test]
    fn test_config_validation() {
        let config = SnakeConfig::new().size(10);
        assert_eq!(
            config.validate(),
            Err(SnakeError::Unsupported("cannot make an environment with side length 10 or less"))
        );

        let config = SnakeConfig::new().size(11);
        assert!(config.validate().is_ok());

        let config = SnakeConfig::new().initial_snake_length(4);
        assert!(config.validate().unwrap_err().is_unsupported());
    }

    #[test]
    fn test_config_builder() {
        let config = SnakeConfig::new().num_envs(8).size(16).max_timesteps(200).seed(3);

        assert_eq!(config.num_envs, 8);
        assert_eq!(config.size, 16);
        assert_eq!(config.max_timesteps, Some(200));
        assert_eq!(config.seed, Some(3));

        // Other values should remain default
        assert!(!config.manual_setup);
        assert_eq!(config.device, Device::Cpu);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: SnakeConfig =
            serde_json::from_str(r#"{"num_envs": 2, "on_death": "restart", "device": {"cuda": 1}}"#)
                .unwrap();
        assert_eq!(config.num_envs, 2);
        assert_eq!(config.size, 12);
        assert_eq!(config.device, Device::Cuda(1));
    }

    #[test]
    fn test_json_file_round_trip() {
        let file = NamedTempFile::new().unwrap();
        let config = SnakeConfig::new().num_envs(5).size(14).seed(11);
        config.to_json_file(file.path()).unwrap();

        let loaded = SnakeConfig::from_json_file(file.path()).unwrap();
        assert_eq!(loaded, config);
    }

    #[test]
    fn test_json_file_rejects_unsupported() {
        let file = NamedTempFile::new().unwrap();
        SnakeConfig::new().size(8).to_json_file(file.path()).unwrap();
        assert!(SnakeConfig::from_json_file(file.path()).is_err());
    }
}
