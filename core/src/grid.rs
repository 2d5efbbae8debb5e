use core::ops::Index;
use hashbrown::HashMap;
use ndarray::Array2;
use serde::{Deserialize, Serialize};

use crate::*;

/// Square board of tiles in row-major order.
///
/// The grid is addressable by position and by [`TileId`]. Its shape and tile order never change after construction,
/// the only mutation is flipping [`Tile::removed`] when a match succeeds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Array2<Tile>", into = "Array2<Tile>")]
pub struct Grid {
    tiles: Array2<Tile>,
    index: HashMap<TileId, Coord2>,
}

impl Grid {
    /// Build a grid from a square matrix of tiles, checking that every tile sits at its own position and that ids
    /// are unique.
    pub fn from_tiles(tiles: Array2<Tile>) -> Result<Self> {
        let (rows, cols) = tiles.dim();
        if rows == 0 || rows != cols || rows > usize::from(Coord::MAX) {
            return Err(GameError::InvalidGridShape);
        }

        let tiles = if tiles.is_standard_layout() {
            tiles
        } else {
            tiles.as_standard_layout().into_owned()
        };

        let mut index = HashMap::with_capacity(tiles.len());
        for ((row, col), tile) in tiles.indexed_iter() {
            let expected = (row as Coord, col as Coord);
            if tile.position != expected {
                return Err(GameError::MisplacedTile(tile.id));
            }
            if tile.value == 0 {
                return Err(GameError::InvalidValue);
            }
            if index.insert(tile.id, expected).is_some() {
                return Err(GameError::DuplicateTile(tile.id));
            }
        }

        Ok(Self { tiles, index })
    }

    /// Build a fresh grid out of row-major values, minting an id for every tile.
    pub fn from_values(values: &[Vec<TileValue>], mint: &mut IdMint) -> Result<Self> {
        let side = values.len();
        if side > usize::from(Coord::MAX) || values.iter().any(|row| row.len() != side) {
            return Err(GameError::InvalidGridShape);
        }

        let flat: Vec<Tile> = values
            .iter()
            .enumerate()
            .flat_map(|(row, row_values)| {
                row_values
                    .iter()
                    .enumerate()
                    .map(move |(col, &value)| (row, col, value))
            })
            .map(|(row, col, value)| Tile::new(mint.mint(), value, (row as Coord, col as Coord)))
            .collect();

        let tiles =
            Array2::from_shape_vec((side, side), flat).map_err(|_| GameError::InvalidGridShape)?;
        Self::from_tiles(tiles)
    }

    /// Side length of the grid.
    pub fn size(&self) -> Coord {
        self.tiles.nrows() as Coord
    }

    pub fn total_tiles(&self) -> TileCount {
        square(self.size())
    }

    /// All tiles as a flat row-major slice.
    pub fn tiles(&self) -> &[Tile] {
        self.tiles
            .as_slice()
            .expect("grid tiles are kept in standard layout")
    }

    /// All tiles one row at a time.
    pub fn rows(&self) -> impl Iterator<Item = &[Tile]> {
        self.tiles().chunks(usize::from(self.size()))
    }

    pub fn validate_coords(&self, coords: Coord2) -> Result<Coord2> {
        let size = self.size();
        if coords.0 < size && coords.1 < size {
            Ok(coords)
        } else {
            Err(GameError::InvalidCoords)
        }
    }

    pub fn tile_at(&self, coords: Coord2) -> Option<&Tile> {
        self.tiles.get(coords.to_nd_index())
    }

    pub fn get(&self, id: TileId) -> Option<&Tile> {
        self.index.get(&id).map(|&pos| &self[pos])
    }

    /// Like [`Grid::get`], but an unknown id is reported as an error.
    pub fn tile(&self, id: TileId) -> Result<&Tile> {
        self.get(id).ok_or(GameError::UnknownTile(id))
    }

    pub fn contains(&self, id: TileId) -> bool {
        self.index.contains_key(&id)
    }

    pub fn position_of(&self, id: TileId) -> Option<Coord2> {
        self.index.get(&id).copied()
    }

    pub fn live_tiles(&self) -> impl Iterator<Item = &Tile> {
        self.tiles().iter().filter(|tile| tile.is_live())
    }

    pub fn live_count(&self) -> TileCount {
        self.live_tiles().count() as TileCount
    }

    /// Whether every tile has been matched away.
    pub fn is_cleared(&self) -> bool {
        self.tiles().iter().all(|tile| tile.removed)
    }

    pub fn iter_neighbors(&self, coords: Coord2) -> OrthogonalNeighbors {
        self.tiles.iter_neighbors(coords)
    }

    /// Flip the removed flag of a tile, returning whether it was live before.
    pub(crate) fn mark_removed(&mut self, id: TileId) -> Result<bool> {
        let pos = self.position_of(id).ok_or(GameError::UnknownTile(id))?;
        Ok(self.tiles[pos.to_nd_index()].mark_removed())
    }
}

impl Index<Coord2> for Grid {
    type Output = Tile;

    fn index(&self, coords: Coord2) -> &Self::Output {
        &self.tiles[coords.to_nd_index()]
    }
}

impl TryFrom<Array2<Tile>> for Grid {
    type Error = GameError;

    fn try_from(tiles: Array2<Tile>) -> Result<Self> {
        Self::from_tiles(tiles)
    }
}

impl From<Grid> for Array2<Tile> {
    fn from(grid: Grid) -> Self {
        grid.tiles
    }
}
