//! Heading of each snake, read off the body plane

use rayon::prelude::*;

use super::{grid::GridState, types::Direction};

/// Derives headings from body layouts
///
/// The head is the cell holding the largest body value; the neck is the
/// 4-neighbour holding that value minus one. The heading is the direction
/// from neck to head.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrientationResolver;

impl OrientationResolver {
    /// Heading of a single body plane
    ///
    /// Returns `None` for layouts without a neck (empty body, length-1 body,
    /// or a broken ramp).
    pub fn resolve(body: &[f32], size: usize) -> Option<Direction> {
        let (head_idx, head_value) = body
            .iter()
            .copied()
            .enumerate()
            .fold(None, |best: Option<(usize, f32)>, (idx, value)| match best {
                Some((_, best_value)) if best_value >= value => best,
                _ => Some((idx, value)),
            })?;
        if head_value < 2.0 {
            return None;
        }

        let (row, col) = ((head_idx / size) as isize, (head_idx % size) as isize);
        Direction::ALL.into_iter().find(|direction| {
            let (dr, dc) = direction.to_delta();
            let (nr, nc) = (row - dr, col - dc);
            nr >= 0
                && nc >= 0
                && (nr as usize) < size
                && (nc as usize) < size
                && body[nr as usize * size + nc as usize] == head_value - 1.0
        })
    }

    /// Heading of every environment in the batch
    pub fn resolve_batch(grid: &GridState) -> Vec<Option<Direction>> {
        grid.par_views().map(|view| Self::resolve(view.body(), view.size())).collect()
    }
}
