//! Double-buffered world state shared between the distributor and sampler.
//!
//! Both grids are allocated once. `grids[phase]` is the current generation
//! (read side), `grids[1 - phase]` is the next generation (write side).
//! Advancing flips the phase instead of copying.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::grid::Grid;

pub struct World {
    grids: [Grid; 2],
    phase: usize,
    turn: u64,
}

impl World {
    pub fn new(initial: Grid) -> Self {
        let next = Grid::new(initial.width(), initial.height());
        Self {
            grids: [initial, next],
            phase: 0,
            turn: 0,
        }
    }

    /// The current generation.
    #[inline]
    pub fn current(&self) -> &Grid {
        &self.grids[self.phase]
    }

    /// Number of completed generations.
    #[inline]
    pub fn turn(&self) -> u64 {
        self.turn
    }

    /// Borrow the current grid for reading and the next grid for writing.
    #[inline]
    pub(crate) fn split(&mut self) -> (&Grid, &mut Grid) {
        let (lo, hi) = self.grids.split_at_mut(1);
        if self.phase == 0 {
            (&lo[0], &mut hi[0])
        } else {
            (&hi[0], &mut lo[0])
        }
    }

    /// Publish the next grid as current and count the generation.
    #[inline]
    pub(crate) fn flip(&mut self) {
        self.phase = 1 - self.phase;
        self.turn += 1;
    }
}

/// Reader/writer handle over the world.
///
/// The distributor takes the write side for the whole dispatch window
/// (workers plus buffer flip); the sampler takes the read side between
/// generations, so it never observes a half-written or half-flipped world.
#[derive(Clone)]
pub struct SharedWorld(Arc<RwLock<World>>);

impl SharedWorld {
    pub fn new(world: World) -> Self {
        Self(Arc::new(RwLock::new(world)))
    }

    // Workers run under `catch_unwind` inside the write window, so a poisoned
    // lock can only come from a panic after the grid was already consistent.
    pub fn read(&self) -> RwLockReadGuard<'_, World> {
        self.0.read().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn write(&self) -> RwLockWriteGuard<'_, World> {
        self.0.write().unwrap_or_else(PoisonError::into_inner)
    }
}
