use crate::*;
pub use preset::*;
pub use random::*;

mod preset;
mod random;

pub trait GridGenerator {
    fn generate(self, config: &GameConfig, mint: &mut IdMint) -> Result<Grid>;
}
