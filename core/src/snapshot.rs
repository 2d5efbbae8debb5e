use serde::{Deserialize, Serialize};

use crate::*;

/// What the presentation layer needs to draw one tile.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TileView {
    pub id: TileId,
    pub value: TileValue,
    pub position: Coord2,
    pub removed: bool,
    pub selected: bool,
}

/// Immutable picture of a game, rebuilt after every command.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub size: Coord,
    /// Row-major, `size * size` entries.
    pub tiles: Vec<TileView>,
    pub selected: Vec<TileId>,
    pub current_sum: u64,
    pub target: TileValue,
    /// Grows by one for every rejected action, watch it for changes.
    pub invalid_signal: u64,
    pub pending_clear: Option<ClearTicket>,
    pub live_count: TileCount,
}

impl Snapshot {
    pub fn from_engine(engine: &SelectionEngine, target: TileValue) -> Self {
        let tiles = engine
            .grid()
            .tiles()
            .iter()
            .map(|tile| TileView {
                id: tile.id,
                value: tile.value,
                position: tile.position,
                removed: tile.removed,
                selected: engine.is_selected(tile.id),
            })
            .collect();

        Self {
            size: engine.grid().size(),
            tiles,
            selected: engine.selected_ids().to_vec(),
            current_sum: engine.current_sum(),
            target,
            invalid_signal: engine.invalid_signal(),
            pending_clear: engine.pending_clear(),
            live_count: engine.live_count(),
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = &[TileView]> {
        self.tiles.chunks(usize::from(self.size).max(1))
    }

    pub fn tile_at(&self, (row, col): Coord2) -> Option<&TileView> {
        if row >= self.size || col >= self.size {
            return None;
        }
        self.tiles
            .get(usize::from(row) * usize::from(self.size) + usize::from(col))
    }

    pub fn is_cleared(&self) -> bool {
        self.live_count == 0
    }
}
