//! Loading environment configurations from JSON files

use anyhow::Result;
use std::io::Write;
use tempfile::NamedTempFile;
use wurm::env::snake::{Device, OnDeath, SingleSnakeEnvironments, SnakeConfig, SnakeError};

fn write_config(json: &str) -> Result<NamedTempFile> {
    let mut file = NamedTempFile::new()?;
    file.write_all(json.as_bytes())?;
    Ok(file)
}

#[test]
fn test_partial_file_fills_defaults() -> Result<()> {
    let file = write_config(r#"{ "num_envs": 8, "size": 16, "seed": 7 }"#)?;
    let config = SnakeConfig::from_json_file(file.path())?;

    assert_eq!(config.num_envs, 8);
    assert_eq!(config.size, 16);
    assert_eq!(config.seed, Some(7));
    assert_eq!(config.initial_snake_length, 3);
    assert_eq!(config.on_death, OnDeath::Restart);
    assert_eq!(config.device, Device::Cpu);
    assert!(!config.manual_setup);

    let env = SingleSnakeEnvironments::new(config)?;
    assert_eq!(env.grid().shape(), [8, 3, 16, 16]);
    Ok(())
}

#[test]
fn test_cuda_device_and_restart_policy_parse() -> Result<()> {
    let file = write_config(r#"{ "device": { "cuda": 1 }, "on_death": "restart", "max_timesteps": 500 }"#)?;
    let config = SnakeConfig::from_json_file(file.path())?;

    assert_eq!(config.device, Device::Cuda(1));
    assert_eq!(config.max_timesteps, Some(500));
    Ok(())
}

#[test]
fn test_unsupported_file_is_rejected() -> Result<()> {
    let file = write_config(r#"{ "size": 10 }"#)?;
    let err = SnakeConfig::from_json_file(file.path()).unwrap_err();
    assert!(matches!(err.downcast_ref::<SnakeError>(), Some(SnakeError::Unsupported(_))));
    Ok(())
}

#[test]
fn test_saved_config_loads_back() -> Result<()> {
    let config = SnakeConfig::new().num_envs(32).size(20).max_timesteps(1000).seed(3);
    let file = NamedTempFile::new()?;

    config.to_json_file(file.path())?;
    assert_eq!(SnakeConfig::from_json_file(file.path())?, config);
    Ok(())
}
