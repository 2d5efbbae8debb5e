use core::fmt;
use serde::{Deserialize, Serialize};

use crate::*;

/// Opaque tile identifier, stable for the lifetime of a tile and never reused by the [`IdMint`] that produced it.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(u32);

impl TileId {
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Hands out fresh [`TileId`]s.
///
/// Ids are sequential, so sharing one mint between several grids keeps ids unique across all of them.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct IdMint {
    next: u32,
}

impl IdMint {
    pub const fn new() -> Self {
        Self { next: 0 }
    }

    /// Continue minting after `last`, used when tiles were built elsewhere.
    pub const fn after(last: TileId) -> Self {
        Self {
            next: last.0.saturating_add(1),
        }
    }

    pub fn mint(&mut self) -> TileId {
        let id = TileId(self.next);
        self.next = self
            .next
            .checked_add(1)
            .expect("tile id space exhausted");
        id
    }
}

/// Numbered tile as it sits on the grid.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub id: TileId,
    pub value: TileValue,
    pub position: Coord2,
    #[serde(default)]
    pub removed: bool,
}

impl Tile {
    pub const fn new(id: TileId, value: TileValue, position: Coord2) -> Self {
        Self {
            id,
            value,
            position,
            removed: false,
        }
    }

    pub const fn is_live(&self) -> bool {
        !self.removed
    }

    pub const fn is_adjacent_to(&self, other: &Tile) -> bool {
        is_adjacent(self.position, other.position)
    }

    /// Flip the tile to removed.
    ///
    /// Returns `false` when the tile had already been removed, the flag never goes back.
    pub(crate) fn mark_removed(&mut self) -> bool {
        let was_live = !self.removed;
        self.removed = true;
        was_live
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mint_never_repeats() {
        let mut mint = IdMint::new();
        let ids: Vec<_> = (0..16).map(|_| mint.mint()).collect();
        for (i, a) in ids.iter().enumerate() {
            for b in &ids[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn mint_after_continues_past_last_id() {
        let mut first = IdMint::new();
        let last = first.mint();
        let mut second = IdMint::after(last);
        assert!(second.mint() > last);
    }

    #[test]
    fn removal_is_one_way() {
        let mut mint = IdMint::new();
        let mut tile = Tile::new(mint.mint(), 3, (0, 0));

        assert!(tile.is_live());
        assert!(tile.mark_removed());
        assert!(!tile.mark_removed());
        assert!(tile.removed);
    }
}
