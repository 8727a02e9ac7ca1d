//! Batched single-snake environments
//!
//! Thousands of independent snake games stepped in lockstep as one
//! `N × 3 × S × S` grid.
//! - Channel 0 holds food, channel 1 the head, channel 2 the body ramp
//! - Each snake grows by one segment per food eaten (+1 reward)
//! - An episode ends when the head runs into the body or onto the boundary
//!   ring
//! - Dead environments are replaced through `reset(done)`

// Re-export main components
pub use config::{Device, OnDeath, SnakeConfig};
pub use dedup::DuplicateFilter;
pub use environment::{SingleSnakeEnvironments, SnakeStep};
pub use error::SnakeError;
pub use factory::EnvironmentFactory;
pub use grid::{ChannelView, ChannelViewMut, GridState};
pub use kernels::{KernelBank, Stencil};
pub use orientation::OrientationResolver;
pub use types::{
    CellIndex, Direction, BODY_CHANNEL, FOOD_CHANNEL, HEAD_CHANNEL, NUM_ACTIONS, NUM_CHANNELS,
};

// Submodules
pub mod config;
pub mod dedup;
mod environment;
mod error;
pub mod factory;
pub mod food;
pub mod grid;
pub mod kernels;
pub mod orientation;
mod types;

/// Tensor interop for torch policies
#[cfg(feature = "training")]
pub mod tensor;
