use core::ops::RangeInclusive;
use rand::{Rng, SeedableRng, rngs::SmallRng};
use smallvec::SmallVec;

use crate::*;

/// Picks the number the player has to reach.
///
/// The engine only ever reads the target. A strategy is asked once for the opening target and again after every
/// successful match, with the tiles that were just removed.
pub trait TargetStrategy {
    fn initial(&mut self, grid: &Grid) -> TileValue;

    fn next(&mut self, grid: &Grid, matched: &[Tile]) -> TileValue;
}

/// Always the same target.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FixedTarget(pub TileValue);

impl TargetStrategy for FixedTarget {
    fn initial(&mut self, _grid: &Grid) -> TileValue {
        self.0.max(1)
    }

    fn next(&mut self, _grid: &Grid, _matched: &[Tile]) -> TileValue {
        self.0.max(1)
    }
}

/// Sum of the first `take` live tiles in reading order.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct PrefixSumTarget {
    take: usize,
}

impl PrefixSumTarget {
    pub const fn new(take: usize) -> Self {
        Self { take }
    }

    fn compute(&self, grid: &Grid) -> TileValue {
        let sum: TileValue = grid
            .live_tiles()
            .take(self.take)
            .map(|tile| tile.value)
            .fold(0, TileValue::saturating_add);
        if sum == 0 {
            log::warn!("No live tiles to build a target from, falling back to 1");
            1
        } else {
            sum
        }
    }
}

impl Default for PrefixSumTarget {
    fn default() -> Self {
        Self::new(4)
    }
}

impl TargetStrategy for PrefixSumTarget {
    fn initial(&mut self, grid: &Grid) -> TileValue {
        self.compute(grid)
    }

    fn next(&mut self, grid: &Grid, _matched: &[Tile]) -> TileValue {
        self.compute(grid)
    }
}

/// Uniformly random target, unrelated to what is left on the board.
#[derive(Clone, Debug)]
pub struct RandomTarget {
    rng: SmallRng,
    range: RangeInclusive<TileValue>,
}

impl RandomTarget {
    pub const DEFAULT_RANGE: RangeInclusive<TileValue> = 5..=24;

    pub fn new(seed: u64) -> Self {
        Self::with_range(seed, Self::DEFAULT_RANGE)
    }

    pub fn with_range(seed: u64, range: RangeInclusive<TileValue>) -> Self {
        let low = (*range.start()).max(1);
        let high = (*range.end()).max(low);
        if (low..=high) != range {
            log::warn!("Target range {range:?} adjusted to {low}..={high}");
        }
        Self {
            rng: SmallRng::seed_from_u64(seed),
            range: low..=high,
        }
    }

    fn roll(&mut self) -> TileValue {
        self.rng.random_range(self.range.clone())
    }
}

impl TargetStrategy for RandomTarget {
    fn initial(&mut self, _grid: &Grid) -> TileValue {
        self.roll()
    }

    fn next(&mut self, _grid: &Grid, _matched: &[Tile]) -> TileValue {
        self.roll()
    }
}

/// Opens with a [`PrefixSumTarget`] over four tiles, then rolls a [`RandomTarget`] in `5..=24` after each match.
#[derive(Clone, Debug)]
pub struct ClassicTarget {
    opening: PrefixSumTarget,
    after: RandomTarget,
}

impl ClassicTarget {
    pub fn new(seed: u64) -> Self {
        Self {
            opening: PrefixSumTarget::default(),
            after: RandomTarget::new(seed),
        }
    }
}

impl TargetStrategy for ClassicTarget {
    fn initial(&mut self, grid: &Grid) -> TileValue {
        self.opening.initial(grid)
    }

    fn next(&mut self, grid: &Grid, matched: &[Tile]) -> TileValue {
        self.after.next(grid, matched)
    }
}

/// Sums a random walk over live, orthogonally connected tiles, so the target can always be reached while any tile
/// is left.
#[derive(Clone, Debug)]
pub struct WalkTarget {
    rng: SmallRng,
    max_len: usize,
}

impl WalkTarget {
    pub fn new(seed: u64, max_len: usize) -> Self {
        Self {
            rng: SmallRng::seed_from_u64(seed),
            max_len: max_len.max(1),
        }
    }

    /// Tiles of a fresh walk, in walking order.
    pub fn walk(&mut self, grid: &Grid) -> Vec<Tile> {
        let live: Vec<&Tile> = grid.live_tiles().collect();
        if live.is_empty() {
            return Vec::new();
        }

        let len = self.rng.random_range(1..=self.max_len);
        let mut current = *live[self.rng.random_range(0..live.len())];
        let mut walked = vec![current];

        while walked.len() < len {
            let options: SmallVec<[Tile; 4]> = grid
                .iter_neighbors(current.position)
                .map(|pos| grid[pos])
                .filter(|tile| tile.is_live() && !walked.iter().any(|seen| seen.id == tile.id))
                .collect();
            if options.is_empty() {
                break;
            }
            current = options[self.rng.random_range(0..options.len())];
            walked.push(current);
        }

        walked
    }

    fn compute(&mut self, grid: &Grid) -> TileValue {
        let sum = self
            .walk(grid)
            .iter()
            .map(|tile| tile.value)
            .fold(0, TileValue::saturating_add);
        if sum == 0 {
            log::warn!("No live tiles to walk, falling back to 1");
            1
        } else {
            sum
        }
    }
}

impl TargetStrategy for WalkTarget {
    fn initial(&mut self, grid: &Grid) -> TileValue {
        self.compute(grid)
    }

    fn next(&mut self, grid: &Grid, _matched: &[Tile]) -> TileValue {
        self.compute(grid)
    }
}
