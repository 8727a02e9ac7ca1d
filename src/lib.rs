//! # Wurm
//!
//! Batched snake environments for reinforcement learning
//!
//! Wurm steps thousands of independent single-snake games at once. The whole
//! batch lives in one `N × 3 × S × S` grid (food, head and body planes) that
//! a convolutional policy consumes directly, and every transition is a
//! handful of 3×3 stencils applied to that grid.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use wurm::prelude::*;
//!
//! let mut envs = SingleSnakeEnvironments::new(SnakeConfig::new().num_envs(64).seed(0))?;
//! let actions = vec![0; envs.num_envs()];
//! let step = envs.step(&actions)?;
//! let dones = step.dones.clone();
//! envs.reset(&dones)?;
//! # Ok::<(), wurm::env::snake::SnakeError>(())
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Environment traits and implementations
pub mod env;

/// Pure Rust inference for grid policies
pub mod inference;

/// Torch policies (requires training feature)
#[cfg(feature = "training")]
pub mod policy;

/// Prelude module for convenient imports
///
/// This module re-exports commonly used types and traits for convenience.
pub mod prelude {
    pub use crate::{
        env::{
            snake::{Direction, GridState, SingleSnakeEnvironments, SnakeConfig, SnakeError},
            BatchEnvironment, BatchStepResult, StepInfo,
        },
        inference::A2CInference,
    };
}

/// Current version of wurm
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert_eq!(VERSION, "0.1.0");
    }
}
