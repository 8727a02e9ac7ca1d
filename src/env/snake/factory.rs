//! Batched creation of fresh environments
//!
//! All random draws happen up front on the caller's RNG; stamping bodies and
//! heads then runs over the batch in parallel.

use rand::Rng;
use rayon::prelude::*;

use super::{
    config::SnakeConfig,
    error::SnakeError,
    food::spawn_food,
    grid::GridState,
    kernels::{conv2d_same_into, KernelBank},
    types::Direction,
};

/// Builds batches of freshly initialised environments
#[derive(Debug, Clone)]
pub struct EnvironmentFactory {
    size: usize,
    initial_snake_length: usize,
}

impl EnvironmentFactory {
    /// Create a factory for the given configuration
    ///
    /// Fails with [`SnakeError::Unsupported`] for grids of side 10 or less
    /// and for initial lengths other than 3.
    pub fn new(config: &SnakeConfig) -> Result<Self, SnakeError> {
        config.validate()?;
        Ok(Self { size: config.size, initial_snake_length: config.initial_snake_length })
    }

    /// Create `num_envs` fresh environments
    ///
    /// Each gets a straight three-segment snake at a random position with a
    /// random heading, its head lit at the body maximum, and one food token
    /// on a random empty interior cell.
    pub fn create<R: Rng + ?Sized>(&self, num_envs: usize, rng: &mut R) -> GridState {
        let size = self.size;
        let mut grid = GridState::new(num_envs, size);

        // Seed cells keep the body and its padding clear of the ring
        let margin = 1 + self.initial_snake_length;
        let seeds: Vec<(usize, usize, Direction)> = (0..num_envs)
            .map(|_| {
                let row = rng.gen_range(margin..size - margin);
                let col = rng.gen_range(margin..size - margin);
                let heading = Direction::ALL[rng.gen_range(0..Direction::ALL.len())];
                (row, col, heading)
            })
            .collect();

        grid.par_views_mut().zip(seeds.par_iter()).for_each(|(mut view, &(row, col, heading))| {
            let mut seed = vec![0.0; size * size];
            seed[row * size + col] = 1.0;

            let (_, head, body) = view.planes_mut();
            conv2d_same_into(&seed, size, KernelBank::length_3_snake(heading), body);

            let length = body.iter().copied().fold(0.0, f32::max);
            for (h, &b) in head.iter_mut().zip(body.iter()) {
                *h = if b == length { 1.0 } else { 0.0 };
            }
        });

        let placed = spawn_food(&mut grid, &vec![true; num_envs], rng);
        tracing::trace!(num_envs, placed, "created environments");
        grid
    }
}

#[cfg(test)]
mod tests {
    use rand::{rngs::StdRng, SeedableRng};

    use super::*;
    use crate::env::snake::{orientation::OrientationResolver, types::BODY_CHANNEL};

    #[test]
    fn test_rejects_unsupported_configs() {
        let err = EnvironmentFactory::new(&SnakeConfig::new().size(10)).unwrap_err();
        assert!(err.is_unsupported());

        let err = EnvironmentFactory::new(&SnakeConfig::new().initial_snake_length(5)).unwrap_err();
        assert!(err.is_unsupported());
    }

    #[test]
    fn test_created_envs_hold_invariants() {
        let mut rng = StdRng::seed_from_u64(42);
        let factory = EnvironmentFactory::new(&SnakeConfig::new().size(12)).unwrap();
        let grid = factory.create(64, &mut rng);

        assert_eq!(grid.num_envs(), 64);
        for view in grid.views() {
            assert_eq!(view.head().iter().sum::<f32>(), 1.0);
            assert_eq!(view.body_cells(), 3);
            assert_eq!(view.snake_length(), 3.0);
            assert_eq!(view.food_positions().len(), 1);
            assert!(view.boundary_is_empty());

            let (hr, hc) = view.head_position().unwrap();
            assert_eq!(view.get(BODY_CHANNEL, hr, hc), 3.0);

            let heading = OrientationResolver::resolve(view.body(), view.size()).unwrap();
            let (dr, dc) = heading.to_delta();
            let neck = ((hr as isize - dr) as usize, (hc as isize - dc) as usize);
            let tail = ((hr as isize - 2 * dr) as usize, (hc as isize - 2 * dc) as usize);
            assert_eq!(view.get(BODY_CHANNEL, neck.0, neck.1), 2.0);
            assert_eq!(view.get(BODY_CHANNEL, tail.0, tail.1), 1.0);

            let (fr, fc) = view.food_positions()[0];
            assert_eq!(view.get(BODY_CHANNEL, fr, fc), 0.0);
        }
    }

    #[test]
    fn test_headings_are_varied() {
        let mut rng = StdRng::seed_from_u64(9);
        let factory = EnvironmentFactory::new(&SnakeConfig::new().size(14)).unwrap();
        let grid = factory.create(200, &mut rng);

        let headings = OrientationResolver::resolve_batch(&grid);
        for direction in Direction::ALL {
            assert!(headings.contains(&Some(direction)), "{direction:?} never drawn");
        }
    }

    #[test]
    fn test_same_seed_same_batch() {
        let factory = EnvironmentFactory::new(&SnakeConfig::new()).unwrap();
        let a = factory.create(16, &mut StdRng::seed_from_u64(7));
        let b = factory.create(16, &mut StdRng::seed_from_u64(7));
        assert_eq!(a, b);
    }

    #[test]
    fn test_create_zero_envs() {
        let factory = EnvironmentFactory::new(&SnakeConfig::new()).unwrap();
        let grid = factory.create(0, &mut StdRng::seed_from_u64(0));
        assert_eq!(grid.num_envs(), 0);
        assert!(grid.as_slice().is_empty());
    }
}
