//! Fixed 3×3 stencils and the convolutions that apply them
//!
//! Neighbour logic (moving the head, stamping a fresh body, spotting a head
//! on the boundary ring) is expressed as a cross-correlation of one plane
//! with a small stencil, the same way a `conv2d` layer would apply it.

use super::types::Direction;

/// A 3×3 stencil, indexed `[row][col]`
pub type Stencil = [[f32; 3]; 3];

/// The environment-independent stencils used by the engine
#[derive(Debug, Clone, Copy, Default)]
pub struct KernelBank;

impl KernelBank {
    /// Head-shift stencils in action order (up, right, down, left)
    ///
    /// Applied with padding 1 to the head plane, each yields the delta that
    /// moves the head one cell: −1 at the old cell, +1 at the new one.
    pub const HEAD_SHIFTS: [Stencil; 4] = [
        [[0.0, 0.0, 0.0], [0.0, -1.0, 0.0], [0.0, 1.0, 0.0]],
        [[0.0, 0.0, 0.0], [1.0, -1.0, 0.0], [0.0, 0.0, 0.0]],
        [[0.0, 1.0, 0.0], [0.0, -1.0, 0.0], [0.0, 0.0, 0.0]],
        [[0.0, 0.0, 0.0], [0.0, -1.0, 1.0], [0.0, 0.0, 0.0]],
    ];

    /// Straight three-segment bodies in action order
    ///
    /// Applied with padding 1 to a plane holding a single seed cell, each
    /// stamps tail 1 behind the seed, 2 on it and 3 ahead of it.
    pub const LENGTH_3_SNAKES: [Stencil; 4] = [
        [[0.0, 1.0, 0.0], [0.0, 2.0, 0.0], [0.0, 3.0, 0.0]],
        [[0.0, 0.0, 0.0], [3.0, 2.0, 1.0], [0.0, 0.0, 0.0]],
        [[0.0, 3.0, 0.0], [0.0, 2.0, 0.0], [0.0, 1.0, 0.0]],
        [[0.0, 0.0, 0.0], [1.0, 2.0, 3.0], [0.0, 0.0, 0.0]],
    ];

    /// Identity stencil, applied without padding to find interior heads
    pub const NO_CHANGE: Stencil = [[0.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 0.0]];

    /// Head-shift stencil for a direction
    pub fn head_shift(direction: Direction) -> &'static Stencil {
        &Self::HEAD_SHIFTS[direction.index()]
    }

    /// Three-segment body stencil for a heading
    pub fn length_3_snake(direction: Direction) -> &'static Stencil {
        &Self::LENGTH_3_SNAKES[direction.index()]
    }

    /// True if the head plane has a lit cell strictly inside the boundary
    /// ring
    ///
    /// The valid convolution drops the outer ring, so a head on or beyond
    /// the edge leaves nothing behind.
    pub fn head_in_interior(head: &[f32], size: usize) -> bool {
        conv2d_valid_sum(head, size, &Self::NO_CHANGE) != 0.0
    }
}

/// Cross-correlate a `size × size` plane with a stencil, zero padding 1
///
/// `out` receives a plane of the same shape.
pub fn conv2d_same_into(input: &[f32], size: usize, stencil: &Stencil, out: &mut [f32]) {
    debug_assert_eq!(input.len(), size * size);
    debug_assert_eq!(out.len(), size * size);

    for r in 0..size {
        for c in 0..size {
            let mut sum = 0.0;
            for (i, stencil_row) in stencil.iter().enumerate() {
                let ir = r as isize + i as isize - 1;
                if ir < 0 || ir >= size as isize {
                    continue;
                }
                for (j, &weight) in stencil_row.iter().enumerate() {
                    let ic = c as isize + j as isize - 1;
                    if weight == 0.0 || ic < 0 || ic >= size as isize {
                        continue;
                    }
                    sum += weight * input[ir as usize * size + ic as usize];
                }
            }
            out[r * size + c] = sum;
        }
    }
}

/// Cross-correlate with zero padding 1, allocating the output plane
pub fn conv2d_same(input: &[f32], size: usize, stencil: &Stencil) -> Vec<f32> {
    let mut out = vec![0.0; size * size];
    conv2d_same_into(input, size, stencil, &mut out);
    out
}

/// Cross-correlate without padding and sum the `(size - 2) × (size - 2)`
/// output plane
pub fn conv2d_valid_sum(input: &[f32], size: usize, stencil: &Stencil) -> f32 {
    debug_assert_eq!(input.len(), size * size);
    let inner = size.saturating_sub(2);

    let mut sum = 0.0;
    for r in 0..inner {
        for c in 0..inner {
            for (i, stencil_row) in stencil.iter().enumerate() {
                for (j, &weight) in stencil_row.iter().enumerate() {
                    if weight != 0.0 {
                        sum += weight * input[(r + i) * size + c + j];
                    }
                }
            }
        }
    }
    sum
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plane_with(size: usize, cells: &[(usize, usize, f32)]) -> Vec<f32> {
        let mut plane = vec![0.0; size * size];
        for &(r, c, v) in cells {
            plane[r * size + c] = v;
        }
        plane
    }

    #[test]
    fn test_head_shift_moves_one_cell() {
        let size = 7;
        let head = plane_with(size, &[(3, 3, 1.0)]);

        for direction in Direction::ALL {
            let delta = conv2d_same(&head, size, KernelBank::head_shift(direction));
            let moved: Vec<f32> = head.iter().zip(&delta).map(|(h, d)| (h + d).round()).collect();

            let (dr, dc) = direction.to_delta();
            let target = ((3 + dr) as usize) * size + (3 + dc) as usize;
            assert_eq!(moved[target], 1.0, "{direction:?}");
            assert_eq!(moved.iter().sum::<f32>(), 1.0, "{direction:?}");
        }
    }

    #[test]
    fn test_head_shift_off_the_edge_empties_plane() {
        let size = 7;
        let head = plane_with(size, &[(0, 3, 1.0)]);
        let delta = conv2d_same(&head, size, KernelBank::head_shift(Direction::Up));
        let moved: f32 = head.iter().zip(&delta).map(|(h, d)| (h + d).round()).sum();
        assert_eq!(moved, 0.0);
    }

    #[test]
    fn test_length_3_snakes_point_along_heading() {
        let size = 9;
        let seed = plane_with(size, &[(4, 4, 1.0)]);

        for direction in Direction::ALL {
            let body = conv2d_same(&seed, size, KernelBank::length_3_snake(direction));
            let (dr, dc) = direction.to_delta();
            let at = |k: isize| body[((4 + k * dr) as usize) * size + (4 + k * dc) as usize];

            assert_eq!(at(1), 3.0, "{direction:?}");
            assert_eq!(at(0), 2.0, "{direction:?}");
            assert_eq!(at(-1), 1.0, "{direction:?}");
            assert_eq!(body.iter().filter(|&&v| v != 0.0).count(), 3);
        }
    }

    #[test]
    fn test_head_in_interior() {
        let size = 12;
        assert!(KernelBank::head_in_interior(&plane_with(size, &[(1, 1, 1.0)]), size));
        assert!(KernelBank::head_in_interior(&plane_with(size, &[(10, 10, 1.0)]), size));
        assert!(!KernelBank::head_in_interior(&plane_with(size, &[(0, 5, 1.0)]), size));
        assert!(!KernelBank::head_in_interior(&plane_with(size, &[(5, 11, 1.0)]), size));
        assert!(!KernelBank::head_in_interior(&vec![0.0; size * size], size));
    }

    #[test]
    fn test_valid_conv_sum_drops_ring() {
        // Identity over a 5x5 plane of ones keeps only the 3x3 interior
        assert_eq!(conv2d_valid_sum(&vec![1.0; 25], 5, &KernelBank::NO_CHANGE), 9.0);

        // Ring-only values vanish under the identity stencil
        let ring = plane_with(5, &[(0, 0, 1.0), (0, 4, 2.0), (4, 2, 3.0), (2, 0, 4.0)]);
        assert_eq!(conv2d_valid_sum(&ring, 5, &KernelBank::NO_CHANGE), 0.0);

        // Each output cell of an all-ones stencil sums its 3x3 neighbourhood
        let ones: Stencil = [[1.0; 3]; 3];
        assert_eq!(conv2d_valid_sum(&vec![1.0; 25], 5, &ones), 81.0);
    }
}
