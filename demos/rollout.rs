//! Roll out a policy over a batch of snake environments
//!
//! Drives the batch with an untrained A2C model, truncating episodes at
//! `max_timesteps` and restarting dead environments, then reports episode
//! statistics and throughput. Pass a JSON config path to override the
//! defaults.
//!
//! # Usage
//!
//! ```bash
//! cargo run --example rollout --release -- [config.json]
//! ```

use std::time::Instant;

use anyhow::Result;
use rand::{rngs::StdRng, SeedableRng};
use wurm::{
    env::snake::{OnDeath, SingleSnakeEnvironments, SnakeConfig},
    inference::{a2c::DEFAULT_CHANNELS, A2CInference},
};

const NUM_STEPS: usize = 1_000;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => SnakeConfig::from_json_file(path)?,
        None => SnakeConfig::new().num_envs(256).size(12).max_timesteps(500).seed(0),
    };
    let max_timesteps = config.max_timesteps.unwrap_or(usize::MAX);

    tracing::info!("Snake rollout");
    tracing::info!("  Num envs: {}", config.num_envs);
    tracing::info!("  Grid size: {}", config.size);
    tracing::info!("  Steps: {}", NUM_STEPS);

    let mut envs = SingleSnakeEnvironments::new(config)?;
    let num_envs = envs.grid().num_envs();

    let mut rng = StdRng::seed_from_u64(1);
    let policy = A2CInference::random(envs.size(), DEFAULT_CHANNELS, true, &mut rng);

    let mut timesteps = vec![0usize; num_envs];
    let mut returns = vec![0i64; num_envs];
    let mut finished_returns = Vec::new();
    let mut finished_lengths = Vec::new();

    let start = Instant::now();
    for _ in 0..NUM_STEPS {
        let actions = policy.sample_actions(envs.grid(), &mut rng);
        let step = envs.step(&actions)?;

        let mut restart = step.dones.clone();
        for env in 0..num_envs {
            returns[env] += step.rewards[env];
            timesteps[env] += 1;
            if timesteps[env] >= max_timesteps {
                restart[env] = true;
            }
            if restart[env] {
                finished_returns.push(returns[env]);
                finished_lengths.push(timesteps[env]);
                returns[env] = 0;
                timesteps[env] = 0;
            }
        }

        match envs.on_death() {
            OnDeath::Restart => envs.reset(&restart)?,
        }
    }
    let elapsed = start.elapsed();

    let episodes = finished_returns.len().max(1) as f64;
    tracing::info!("Finished episodes: {}", finished_returns.len());
    tracing::info!(
        "  Mean return: {:.3}",
        finished_returns.iter().sum::<i64>() as f64 / episodes
    );
    tracing::info!(
        "  Mean length: {:.1}",
        finished_lengths.iter().sum::<usize>() as f64 / episodes
    );
    tracing::info!(
        "  Throughput: {:.0} env steps/s",
        (NUM_STEPS * num_envs) as f64 / elapsed.as_secs_f64()
    );

    Ok(())
}
