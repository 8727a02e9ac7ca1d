//! One random candidate cell per environment
//!
//! Placing a single token at a random empty cell of every environment is
//! done batch-wide: gather every eligible cell of every environment into one
//! list, shuffle it, and keep the first hit per environment. The survivors
//! can be scattered into the grid without double writes.

use std::collections::HashSet;

use rand::{seq::SliceRandom, Rng};

use super::types::CellIndex;

/// Reduces a batch-wide candidate list to at most one cell per environment
#[derive(Debug, Clone, Copy, Default)]
pub struct DuplicateFilter;

impl DuplicateFilter {
    /// Keep the first candidate of every environment, in input order
    pub fn first_per_env(candidates: &[CellIndex]) -> Vec<CellIndex> {
        let mut seen = HashSet::with_capacity(candidates.len().min(1024));
        candidates.iter().copied().filter(|cell| seen.insert(cell.env)).collect()
    }

    /// Keep one uniformly random candidate of every environment
    ///
    /// The result is sorted by environment index.
    pub fn drop_duplicates<R: Rng + ?Sized>(
        mut candidates: Vec<CellIndex>,
        rng: &mut R,
    ) -> Vec<CellIndex> {
        candidates.shuffle(rng);
        let mut kept = Self::first_per_env(&candidates);
        kept.sort_unstable_by_key(|cell| cell.env);
        kept
    }
}
