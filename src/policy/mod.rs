//! Torch policies trained against the snake grid
//!
//! Networks here run on tch-rs and export into the pure Rust
//! [`crate::inference`] structs.

#[cfg(feature = "training")]
pub mod a2c;

#[cfg(feature = "training")]
pub use a2c::A2C;
