use super::*;

/// Fixed tile values, for reproducible boards and tests.
#[derive(Clone, Debug, PartialEq)]
pub struct PresetGridGenerator {
    values: Vec<Vec<TileValue>>,
}

impl PresetGridGenerator {
    pub fn new(values: Vec<Vec<TileValue>>) -> Self {
        Self { values }
    }
}

impl GridGenerator for PresetGridGenerator {
    fn generate(self, config: &GameConfig, mint: &mut IdMint) -> Result<Grid> {
        if self.values.len() != usize::from(config.size) {
            log::warn!(
                "Preset grid is {} wide but config asks for {}, using the preset",
                self.values.len(),
                config.size
            );
        }
        Grid::from_values(&self.values, mint)
    }
}
