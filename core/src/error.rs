use thiserror::Error;

use crate::TileId;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Tile {0} is not part of this grid")]
    UnknownTile(TileId),
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Grid must be square with at least one tile")]
    InvalidGridShape,
    #[error("Tile {0} appears more than once")]
    DuplicateTile(TileId),
    #[error("Tile {0} is stored at a position other than its own")]
    MisplacedTile(TileId),
    #[error("Tile values must be positive")]
    InvalidValue,
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

pub type Result<T> = core::result::Result<T, GameError>;
