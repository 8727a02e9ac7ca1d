//! Errors raised by the batched Snake environments

use thiserror::Error;

/// Errors raised when constructing or stepping the environments.
///
/// Two classes exist: caller-contract violations (bad actions, bad masks)
/// and configurations the engine does not implement.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnakeError {
    /// Action element type is not an integer type.
    #[error("actions must be an integer type (i16, i32 or i64), got {0}")]
    InvalidActionType(String),

    /// Number of actions differs from the number of environments.
    #[error("must have the same number of actions as environments: expected {expected}, got {actual}")]
    ActionCountMismatch {
        /// Environments in the batch
        expected: usize,
        /// Actions supplied
        actual: usize,
    },

    /// An action lies outside {0, 1, 2, 3}.
    #[error("action {action} for environment {env} is not in 0..4")]
    InvalidAction {
        /// Environment the action was meant for
        env: usize,
        /// Offending action code
        action: i64,
    },

    /// Reset mask length differs from the number of environments.
    #[error("done mask must have one entry per environment: expected {expected}, got {actual}")]
    MaskLengthMismatch {
        /// Environments in the batch
        expected: usize,
        /// Mask entries supplied
        actual: usize,
    },

    /// An environment index beyond the batch.
    #[error("environment index {index} out of range for batch of {num_envs}")]
    EnvIndexOutOfRange {
        /// Requested environment
        index: usize,
        /// Environments in the batch
        num_envs: usize,
    },

    /// Grids of different side lengths combined in one operation.
    #[error("grid side lengths differ: expected {expected}, got {actual}")]
    GridSizeMismatch {
        /// Side length of the receiving grid
        expected: usize,
        /// Side length of the other grid
        actual: usize,
    },

    /// Configuration outside what the engine implements.
    #[error("not implemented: {0}")]
    Unsupported(&'static str),
}

impl SnakeError {
    /// True for errors caused by the caller breaking the call contract.
    pub fn is_contract_violation(&self) -> bool {
        !self.is_unsupported()
    }

    /// True for known gaps in the engine rather than caller bugs.
    pub fn is_unsupported(&self) -> bool {
        matches!(self, SnakeError::Unsupported(_))
    }
}
