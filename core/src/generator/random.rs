use ndarray::Array2;
use rand::{Rng, SeedableRng, rngs::SmallRng};

use super::*;

/// Uniformly random tile values in `1..=max_value`, reproducible from the seed.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomGridGenerator {
    seed: u64,
}

impl RandomGridGenerator {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl GridGenerator for RandomGridGenerator {
    fn generate(self, config: &GameConfig, mint: &mut IdMint) -> Result<Grid> {
        let side = usize::from(config.size.max(1));
        let max_value = config.max_value.max(1);
        if side != usize::from(config.size) || max_value != config.max_value {
            log::warn!("Degenerate config {config:?}, generating {side}x{side} up to {max_value}");
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let tiles = Array2::from_shape_fn((side, side), |(row, col)| {
            Tile::new(
                mint.mint(),
                rng.random_range(1..=max_value),
                (row as Coord, col as Coord),
            )
        });

        log::debug!("Generated {side}x{side} grid from seed {}", self.seed);
        Grid::from_tiles(tiles)
    }
}
