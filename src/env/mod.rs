//! Environment traits and implementations
//!
//! This module defines the batched environment interface and provides the
//! built-in batched Snake environments.

use std::collections::HashMap;

/// Core trait for batched RL environments
///
/// A batched environment owns the observations of all its environments and
/// advances them together, one action per environment per step.
pub trait BatchEnvironment {
    /// Observation type of the whole batch
    type Observation: ?Sized;

    /// Error raised by `step` and `reset`
    type Error;

    /// Number of environments in the batch
    fn num_envs(&self) -> usize;

    /// Current observation of the whole batch
    fn observation(&self) -> &Self::Observation;

    /// Step every environment with its action
    fn step(
        &mut self,
        actions: &[i64],
    ) -> Result<BatchStepResult<'_, Self::Observation>, Self::Error>;

    /// Replace the environments flagged in `done` with fresh ones
    fn reset(&mut self, done: &[bool]) -> Result<(), Self::Error>;

    /// Get the observation space dimensions of a single environment
    fn observation_space(&self) -> SpaceInfo;

    /// Get the action space dimensions of a single environment
    fn action_space(&self) -> SpaceInfo;
}

/// Result of a batched step
#[derive(Debug, Clone)]
pub struct BatchStepResult<'a, O: ?Sized> {
    /// Observation of the whole batch after the step
    pub observation: &'a O,

    /// Reward per environment
    pub rewards: Vec<i64>,

    /// Whether each episode terminated this step
    pub dones: Vec<bool>,

    /// Additional info, one independent record per environment
    pub infos: Vec<StepInfo>,
}

/// Space information for observations and actions
#[derive(Debug, Clone, PartialEq)]
pub struct SpaceInfo {
    /// Shape of the space
    pub shape: Vec<usize>,

    /// Data type
    pub space_type: SpaceType,
}

/// Space data types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceType {
    /// Discrete space with n options
    Discrete(usize),

    /// Continuous space (Box)
    Continuous,
}

/// Additional step information
///
/// Empty unless a caller records diagnostics into it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    /// Named diagnostic values
    pub diagnostics: HashMap<String, f64>,
}

pub mod snake;
