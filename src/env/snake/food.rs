//! Food placement shared by environment creation and food respawn

use rand::Rng;
use rayon::prelude::*;

use super::{
    dedup::DuplicateFilter,
    grid::GridState,
    types::{CellIndex, FOOD_CHANNEL},
};

/// Every empty, non-boundary cell of the selected environments
///
/// A cell is empty when all three channels are zero there. Cells are listed
/// environment by environment in row-major order.
pub fn empty_interior_cells(grid: &GridState, selected: &[bool]) -> Vec<CellIndex> {
    let size = grid.size();
    grid.par_views()
        .enumerate()
        .filter(|(env, _)| selected.get(*env).copied().unwrap_or(false))
        .flat_map_iter(|(env, view)| {
            (1..size.saturating_sub(1)).flat_map(move |row| {
                (1..size - 1)
                    .filter(move |&col| view.is_empty_cell(row, col))
                    .map(move |col| CellIndex::new(env, row, col))
            })
        })
        .collect()
}

/// Drop one food token at a random empty interior cell of every selected
/// environment
///
/// Environments without an empty interior cell get nothing. Returns the
/// number of tokens placed.
pub fn spawn_food<R: Rng + ?Sized>(grid: &mut GridState, selected: &[bool], rng: &mut R) -> usize {
    let candidates = empty_interior_cells(grid, selected);
    let chosen = DuplicateFilter::drop_duplicates(candidates, rng);
    for cell in &chosen {
        grid.view_mut(cell.env).set(FOOD_CHANNEL, cell.row, cell.col, 1.0);
    }
    chosen.len()
}
