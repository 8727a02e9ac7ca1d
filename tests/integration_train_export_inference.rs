//! Integration test for the torch policy → export → inference pipeline
//!
//! This test validates that we can:
//! 1. Run a torch A2C policy against the batched grid
//! 2. Export its weights to JSON
//! 3. Load the JSON weights into the pure Rust inference engine
//! 4. Drive the environments with the loaded model

#![cfg(feature = "training")]

use anyhow::Result;
use tch::{nn, Device};
use tempfile::NamedTempFile;
use wurm::{
    env::snake::{SingleSnakeEnvironments, SnakeConfig},
    inference::A2CInference,
    policy::A2C,
};

#[test]
fn test_policy_export_load_inference() -> Result<()> {
    const NUM_ENVS: usize = 4;
    const SIZE: usize = 12;

    let mut envs =
        SingleSnakeEnvironments::new(SnakeConfig::new().num_envs(NUM_ENVS).size(SIZE).seed(0))?;

    let vs = nn::VarStore::new(Device::Cpu);
    let policy = A2C::new(&vs.root(), SIZE as i64, true, 8);

    // Torch policy picks actions for a few steps
    for _ in 0..5 {
        let (actions, _, _) = tch::no_grad(|| policy.sample_action(&envs.grid_tensor()));
        let dones = envs.step_tensor(&actions)?.dones;
        envs.reset(&dones)?;
    }

    let exported = policy.export_for_inference()?;
    let file = NamedTempFile::new()?;
    exported.save_json(file.path())?;
    let loaded = A2CInference::load_json(file.path())?;

    let torch_greedy: Vec<i64> =
        Vec::try_from(&tch::no_grad(|| policy.get_action(&envs.grid_tensor())))?;
    assert_eq!(loaded.greedy_actions(envs.grid()), torch_greedy);

    for _ in 0..20 {
        let actions = loaded.greedy_actions(envs.grid());
        let dones = envs.step(&actions)?.dones;
        envs.reset(&dones)?;
    }

    Ok(())
}
