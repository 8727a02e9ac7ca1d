//! Batched single-snake environments
//!
//! This module implements [`SingleSnakeEnvironments`], which keeps every
//! game of the batch in one [`GridState`] and advances all of them with the
//! same sequence of plane-wide operations.

use std::time::Instant;

use rand::{rngs::StdRng, SeedableRng};
use rayon::prelude::*;

use super::{
    config::{OnDeath, SnakeConfig},
    error::SnakeError,
    factory::EnvironmentFactory,
    food::spawn_food,
    grid::{ChannelViewMut, GridState},
    kernels::{conv2d_same_into, KernelBank},
    orientation::OrientationResolver,
    types::{Direction, NUM_ACTIONS, NUM_CHANNELS},
};
use crate::env::{BatchEnvironment, BatchStepResult, SpaceInfo, SpaceType, StepInfo};

/// Result of stepping the batch: grid, rewards, dones and infos
pub type SnakeStep<'a> = BatchStepResult<'a, GridState>;

/// Many environments, each containing a single snake, stored as one batched
/// grid
///
/// Each environment has three planes:
/// - food: 1 where food lies
/// - head: 1 at the head of the snake
/// - body: positive integers along the snake, 1 at the tail rising to the
///   snake length at the head
///
/// ```text
/// Body plane of a snake of length 8
/// . . . . . .
/// . . 3 4 5 .
/// . 1 2 . 6 .
/// . . . . 7 .
/// . . . . 8 .
/// . . . . . .
/// ```
#[derive(Debug)]
pub struct SingleSnakeEnvironments {
    config: SnakeConfig,
    factory: EnvironmentFactory,
    grid: GridState,
    rng: StdRng,
}

/// What happened to one environment during the per-environment pass
#[derive(Debug, Clone, Copy, Default)]
struct EnvOutcome {
    eaten: i64,
    hit_self: bool,
    hit_edge: bool,
}

impl SingleSnakeEnvironments {
    /// Create the batch
    ///
    /// Fails with [`SnakeError::Unsupported`] for grids of side 10 or less
    /// and initial lengths other than 3. Unless `manual_setup` is set, every
    /// environment is populated immediately.
    pub fn new(config: SnakeConfig) -> Result<Self, SnakeError> {
        let factory = EnvironmentFactory::new(&config)?;
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let grid = if config.manual_setup {
            GridState::new(config.num_envs, config.size)
        } else {
            factory.create(config.num_envs, &mut rng)
        };

        tracing::info!(
            num_envs = config.num_envs,
            size = config.size,
            manual_setup = config.manual_setup,
            "created snake environments"
        );

        Ok(Self { config, factory, grid, rng })
    }

    /// Configuration the batch was built with
    pub fn config(&self) -> &SnakeConfig {
        &self.config
    }

    /// Grid side length
    pub fn size(&self) -> usize {
        self.config.size
    }

    /// Episode length budget; the caller truncates episodes
    pub fn max_timesteps(&self) -> Option<usize> {
        self.config.max_timesteps
    }

    /// Death policy; the caller applies it through [`Self::reset`]
    pub fn on_death(&self) -> OnDeath {
        self.config.on_death
    }

    /// The batched grid
    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    /// Mutable access to the batched grid, for manual setup
    pub fn grid_mut(&mut self) -> &mut GridState {
        &mut self.grid
    }

    /// Restart the random stream from `seed`
    pub fn reseed(&mut self, seed: u64) {
        self.rng = StdRng::seed_from_u64(seed);
    }

    /// Advance every environment by one timestep
    ///
    /// `actions` holds one code in {0, 1, 2, 3} (up, right, down, left) per
    /// environment. Where an action equals the environment's orientation
    /// code it is replaced by the opposite action.
    ///
    /// Dead environments are stepped as well; their rows become meaningful
    /// again once passed to [`Self::reset`].
    pub fn step(&mut self, actions: &[i64]) -> Result<SnakeStep<'_>, SnakeError> {
        let num_envs = self.grid.num_envs();
        if actions.len() != num_envs {
            return Err(SnakeError::ActionCountMismatch { expected: num_envs, actual: actions.len() });
        }
        let directions = actions
            .iter()
            .enumerate()
            .map(|(env, &action)| {
                Direction::from_action(action).ok_or(SnakeError::InvalidAction { env, action })
            })
            .collect::<Result<Vec<_>, _>>()?;

        let t0 = Instant::now();
        let plane = self.grid.size() * self.grid.size();
        let outcomes: Vec<EnvOutcome> = self
            .grid
            .par_views_mut()
            .zip(directions.par_iter())
            .map_init(
                || vec![0.0; plane],
                |delta, (mut view, &direction)| advance(&mut view, direction, delta),
            )
            .collect();
        tracing::trace!(elapsed = ?t0.elapsed(), "moved heads and bodies");

        let needs_food: Vec<bool> = outcomes.iter().map(|o| o.eaten > 0).collect();
        let eaten = needs_food.iter().filter(|&&b| b).count();
        let respawned = if eaten > 0 {
            let t0 = Instant::now();
            let placed = spawn_food(&mut self.grid, &needs_food, &mut self.rng);
            tracing::trace!(elapsed = ?t0.elapsed(), placed, "respawned food");
            placed
        } else {
            0
        };

        let rewards: Vec<i64> = outcomes.iter().map(|o| o.eaten).collect();
        let dones: Vec<bool> = outcomes.iter().map(|o| o.hit_self || o.hit_edge).collect();
        let infos = vec![StepInfo::default(); num_envs];

        tracing::debug!(
            eaten,
            respawned,
            hit_self = outcomes.iter().filter(|o| o.hit_self).count(),
            hit_edge = outcomes.iter().filter(|o| o.hit_edge).count(),
            "stepped snake environments"
        );

        Ok(BatchStepResult { observation: &self.grid, rewards, dones, infos })
    }

    /// Replace every environment flagged in `done` with a fresh one
    ///
    /// Exactly as many environments are generated as there are flags set;
    /// each replaces its whole row.
    pub fn reset(&mut self, done: &[bool]) -> Result<(), SnakeError> {
        let num_envs = self.grid.num_envs();
        if done.len() != num_envs {
            return Err(SnakeError::MaskLengthMismatch { expected: num_envs, actual: done.len() });
        }

        let targets: Vec<usize> =
            done.iter().enumerate().filter(|(_, d)| **d).map(|(env, _)| env).collect();
        if targets.is_empty() {
            return Ok(());
        }

        let t0 = Instant::now();
        let fresh = self.factory.create(targets.len(), &mut self.rng);
        for (src, &dst) in targets.iter().enumerate() {
            self.grid.copy_env_from(dst, &fresh, src)?;
        }
        tracing::debug!(count = targets.len(), elapsed = ?t0.elapsed(), "reset environments");
        Ok(())
    }

    /// Replace every environment with a fresh one
    pub fn reset_all(&mut self) -> Result<(), SnakeError> {
        self.reset(&vec![true; self.grid.num_envs()])
    }
}

/// Apply one timestep to a single environment, except food respawn
///
/// `delta` is scratch space of one plane, reused across environments.
fn advance(view: &mut ChannelViewMut<'_>, direction: Direction, delta: &mut [f32]) -> EnvOutcome {
    let size = view.size();
    let length = view.as_view().snake_length();

    // Actions that match the orientation code are flipped around
    let direction = match OrientationResolver::resolve(view.as_view().body(), size) {
        Some(heading) if direction.index() as i64 == heading.orientation_code() => {
            direction.opposite()
        }
        _ => direction,
    };

    let (food, head, body) = view.planes_mut();

    conv2d_same_into(head, size, KernelBank::head_shift(direction), delta);
    for (h, d) in head.iter_mut().zip(delta.iter()) {
        *h = (*h + d).round();
    }

    // Checked against the body before it decays, so the tail still counts
    let hit_self = dot(head, body) > 0.0;

    for (b, &h) in body.iter_mut().zip(head.iter()) {
        *b = (*b - 1.0).max(0.0) + h * length;
    }

    let eaten = dot(head, food);
    if eaten > 0.0 {
        for b in body.iter_mut().filter(|b| **b > 0.0) {
            *b += 1.0;
        }
    }
    for (f, &h) in food.iter_mut().zip(head.iter()) {
        *f -= *f * h;
    }

    let hit_edge = !KernelBank::head_in_interior(head, size);

    EnvOutcome { eaten: eaten.round() as i64, hit_self, hit_edge }
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

impl BatchEnvironment for SingleSnakeEnvironments {
    type Observation = GridState;
    type Error = SnakeError;

    fn num_envs(&self) -> usize {
        self.grid.num_envs()
    }

    fn observation(&self) -> &GridState {
        &self.grid
    }

    fn step(&mut self, actions: &[i64]) -> Result<SnakeStep<'_>, SnakeError> {
        SingleSnakeEnvironments::step(self, actions)
    }

    fn reset(&mut self, done: &[bool]) -> Result<(), SnakeError> {
        SingleSnakeEnvironments::reset(self, done)
    }

    fn observation_space(&self) -> SpaceInfo {
        SpaceInfo {
            shape: vec![NUM_CHANNELS, self.config.size, self.config.size],
            space_type: SpaceType::Continuous,
        }
    }

    fn action_space(&self) -> SpaceInfo {
        SpaceInfo { shape: vec![], space_type: SpaceType::Discrete(NUM_ACTIONS) }
    }
}
