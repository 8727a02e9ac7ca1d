//! Batched grid buffer and per-environment channel views
//!
//! Every environment is a `3 × size × size` block of a single contiguous
//! `f32` buffer laid out as (env, channel, row, col). Values are logically
//! integral; `f32` keeps the buffer directly consumable by a convolutional
//! policy.

use rayon::prelude::*;

use super::{
    error::SnakeError,
    types::{BODY_CHANNEL, FOOD_CHANNEL, HEAD_CHANNEL, NUM_CHANNELS},
};

/// Owned batch of environments
#[derive(Debug, Clone, PartialEq)]
pub struct GridState {
    data: Vec<f32>,
    num_envs: usize,
    size: usize,
}

impl GridState {
    /// Allocate an all-zero batch
    pub fn new(num_envs: usize, size: usize) -> Self {
        Self { data: vec![0.0; num_envs * NUM_CHANNELS * size * size], num_envs, size }
    }

    /// Number of environments
    pub fn num_envs(&self) -> usize {
        self.num_envs
    }

    /// Grid side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of values in one environment
    pub fn env_len(&self) -> usize {
        NUM_CHANNELS * self.size * self.size
    }

    /// Tensor shape `[num_envs, channels, size, size]`
    pub fn shape(&self) -> [usize; 4] {
        [self.num_envs, NUM_CHANNELS, self.size, self.size]
    }

    /// Raw buffer in (env, channel, row, col) order
    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    /// Read-only view of one environment
    ///
    /// # Panics
    ///
    /// Panics if `env` is out of range.
    pub fn view(&self, env: usize) -> ChannelView<'_> {
        let len = self.env_len();
        ChannelView { data: &self.data[env * len..(env + 1) * len], size: self.size }
    }

    /// Mutable view of one environment
    ///
    /// # Panics
    ///
    /// Panics if `env` is out of range.
    pub fn view_mut(&mut self, env: usize) -> ChannelViewMut<'_> {
        let len = self.env_len();
        ChannelViewMut { data: &mut self.data[env * len..(env + 1) * len], size: self.size }
    }

    /// Iterate over read-only views of all environments
    pub fn views(&self) -> impl Iterator<Item = ChannelView<'_>> {
        let size = self.size;
        self.data.chunks_exact(self.env_len().max(1)).map(move |data| ChannelView { data, size })
    }

    /// Parallel iterator over read-only views of all environments
    pub fn par_views(&self) -> impl IndexedParallelIterator<Item = ChannelView<'_>> {
        let size = self.size;
        self.data.par_chunks_exact(self.env_len().max(1)).map(move |data| ChannelView { data, size })
    }

    /// Parallel iterator over mutable views of all environments
    pub fn par_views_mut(&mut self) -> impl IndexedParallelIterator<Item = ChannelViewMut<'_>> {
        let size = self.size;
        let len = self.env_len().max(1);
        self.data.par_chunks_exact_mut(len).map(move |data| ChannelViewMut { data, size })
    }

    /// Overwrite environment `dst` with environment `src` of `other`
    ///
    /// The whole row is replaced; nothing of the previous contents survives.
    pub fn copy_env_from(
        &mut self,
        dst: usize,
        other: &GridState,
        src: usize,
    ) -> Result<(), SnakeError> {
        if dst >= self.num_envs {
            return Err(SnakeError::EnvIndexOutOfRange { index: dst, num_envs: self.num_envs });
        }
        if src >= other.num_envs {
            return Err(SnakeError::EnvIndexOutOfRange { index: src, num_envs: other.num_envs });
        }
        if self.size != other.size {
            return Err(SnakeError::GridSizeMismatch { expected: self.size, actual: other.size });
        }
        self.view_mut(dst).data.copy_from_slice(other.view(src).data);
        Ok(())
    }
}

/// Read-only accessors for the three planes of one environment
#[derive(Debug, Clone, Copy)]
pub struct ChannelView<'a> {
    data: &'a [f32],
    size: usize,
}

impl<'a> ChannelView<'a> {
    /// Grid side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// All three planes, channel-major
    pub fn as_slice(&self) -> &'a [f32] {
        self.data
    }

    /// One plane as a row-major `size × size` slice
    pub fn channel(&self, channel: usize) -> &'a [f32] {
        let plane = self.size * self.size;
        &self.data[channel * plane..(channel + 1) * plane]
    }

    /// Food plane
    pub fn food(&self) -> &'a [f32] {
        self.channel(FOOD_CHANNEL)
    }

    /// Head plane
    pub fn head(&self) -> &'a [f32] {
        self.channel(HEAD_CHANNEL)
    }

    /// Body plane
    pub fn body(&self) -> &'a [f32] {
        self.channel(BODY_CHANNEL)
    }

    /// Value at (channel, row, col)
    pub fn get(&self, channel: usize, row: usize, col: usize) -> f32 {
        self.channel(channel)[row * self.size + col]
    }

    /// Snake length, the largest body value
    pub fn snake_length(&self) -> f32 {
        self.body().iter().copied().fold(0.0, f32::max)
    }

    /// Position of the first lit head cell, if any
    pub fn head_position(&self) -> Option<(usize, usize)> {
        self.head().iter().position(|&v| v > 0.5).map(|idx| (idx / self.size, idx % self.size))
    }

    /// Positions of all food cells
    pub fn food_positions(&self) -> Vec<(usize, usize)> {
        lit_cells(self.food(), self.size)
    }

    /// Number of occupied body cells
    pub fn body_cells(&self) -> usize {
        self.body().iter().filter(|&&v| v > 0.0).count()
    }

    /// True if no channel holds anything at (row, col)
    pub fn is_empty_cell(&self, row: usize, col: usize) -> bool {
        (0..NUM_CHANNELS).all(|channel| self.get(channel, row, col) == 0.0)
    }

    /// True if nothing lies on the boundary ring of any channel
    pub fn boundary_is_empty(&self) -> bool {
        let last = self.size - 1;
        (0..NUM_CHANNELS).all(|channel| {
            (0..self.size).all(|i| {
                self.get(channel, 0, i) == 0.0
                    && self.get(channel, last, i) == 0.0
                    && self.get(channel, i, 0) == 0.0
                    && self.get(channel, i, last) == 0.0
            })
        })
    }
}

/// Mutable accessors for the three planes of one environment
#[derive(Debug)]
pub struct ChannelViewMut<'a> {
    data: &'a mut [f32],
    size: usize,
}

impl<'a> ChannelViewMut<'a> {
    /// Grid side length
    pub fn size(&self) -> usize {
        self.size
    }

    /// Reborrow as a read-only view
    pub fn as_view(&self) -> ChannelView<'_> {
        ChannelView { data: &*self.data, size: self.size }
    }

    /// One plane as a mutable row-major slice
    pub fn channel_mut(&mut self, channel: usize) -> &mut [f32] {
        let plane = self.size * self.size;
        &mut self.data[channel * plane..(channel + 1) * plane]
    }

    /// Food, head and body planes, borrowed together
    pub fn planes_mut(&mut self) -> (&mut [f32], &mut [f32], &mut [f32]) {
        let plane = self.size * self.size;
        let (food, rest) = self.data.split_at_mut(plane);
        let (head, body) = rest.split_at_mut(plane);
        (food, head, body)
    }

    /// Set value at (channel, row, col)
    pub fn set(&mut self, channel: usize, row: usize, col: usize, value: f32) {
        let size = self.size;
        self.channel_mut(channel)[row * size + col] = value;
    }

    /// Replace the snake with the given cells, listed tail to head
    ///
    /// Body values run 1..=len and the head plane is lit at the last cell.
    pub fn place_snake(&mut self, cells: &[(usize, usize)]) {
        let size = self.size;
        let (_, head, body) = self.planes_mut();
        head.fill(0.0);
        body.fill(0.0);
        for (i, &(row, col)) in cells.iter().enumerate() {
            body[row * size + col] = (i + 1) as f32;
        }
        if let Some(&(row, col)) = cells.last() {
            head[row * size + col] = 1.0;
        }
    }

    /// Replace the food plane with a single token at (row, col)
    pub fn place_food(&mut self, row: usize, col: usize) {
        let size = self.size;
        let food = self.channel_mut(FOOD_CHANNEL);
        food.fill(0.0);
        food[row * size + col] = 1.0;
    }
}

fn lit_cells(plane: &[f32], size: usize) -> Vec<(usize, usize)> {
    plane
        .iter()
        .enumerate()
        .filter(|(_, v)| **v > 0.5)
        .map(|(idx, _)| (idx / size, idx % size))
        .collect()
}
