use core::time::Duration;
use serde::{Deserialize, Serialize};

pub use engine::*;
pub use error::*;
pub use generator::*;
pub use grid::*;
pub use resolver::*;
pub use schedule::*;
pub use session::*;
pub use snapshot::*;
pub use target::*;
pub use tile::*;
pub use types::*;

mod engine;
mod error;
mod generator;
mod grid;
mod resolver;
mod schedule;
mod session;
mod snapshot;
mod target;
mod tile;
mod types;

/// How long the host should keep a rejected path highlighted before firing its [`ClearTicket`].
pub const DEFAULT_CLEAR_DELAY_MS: u32 = 420;

#[derive(Copy, Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Side length of the square grid.
    pub size: Coord,
    /// Largest value a generated tile can carry, values start at 1.
    pub max_value: TileValue,
    pub clear_delay_ms: u32,
}

impl GameConfig {
    pub const fn new_unchecked(size: Coord, max_value: TileValue) -> Self {
        Self {
            size,
            max_value,
            clear_delay_ms: DEFAULT_CLEAR_DELAY_MS,
        }
    }

    pub fn new(size: Coord, max_value: TileValue) -> Self {
        let clamped_size = size.max(1);
        let clamped_max = max_value.max(1);
        if clamped_size != size || clamped_max != max_value {
            log::warn!(
                "Game config clamped, requested size {} max value {}, using {} and {}",
                size,
                max_value,
                clamped_size,
                clamped_max
            );
        }
        Self::new_unchecked(clamped_size, clamped_max)
    }

    /// Parse a config from JSON, missing fields take their defaults and out of range values are clamped.
    pub fn from_json(json: &str) -> Result<Self> {
        let raw: Self =
            serde_json::from_str(json).map_err(|err| GameError::InvalidConfig(err.to_string()))?;
        Ok(Self::new(raw.size, raw.max_value).with_clear_delay_ms(raw.clear_delay_ms))
    }

    pub const fn with_clear_delay_ms(mut self, clear_delay_ms: u32) -> Self {
        self.clear_delay_ms = clear_delay_ms;
        self
    }

    pub const fn total_tiles(&self) -> TileCount {
        square(self.size)
    }

    pub const fn clear_delay(&self) -> Duration {
        Duration::from_millis(self.clear_delay_ms as u64)
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new_unchecked(6, 9)
    }
}

/// Outcome of selecting a tile
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SelectOutcome {
    /// Tile was removed or already on the path
    NoChange,
    /// Tile opened a new path
    Started,
    /// Tile was appended to the path
    Extended,
    /// Tile is not adjacent to the end of the path, the invalid signal was bumped
    Rejected,
}

impl SelectOutcome {
    pub const fn has_update(self) -> bool {
        use SelectOutcome::*;
        match self {
            NoChange => false,
            Started => true,
            Extended => true,
            Rejected => true,
        }
    }

    pub const fn is_rejected(self) -> bool {
        matches!(self, Self::Rejected)
    }
}

/// Outcome of deselecting a tile
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DeselectOutcome {
    NoChange,
    /// Tile was the end of the path and got popped
    Popped,
    /// Only the end of the path can be deselected, the invalid signal was bumped
    Rejected,
}

impl DeselectOutcome {
    pub const fn has_update(self) -> bool {
        !matches!(self, Self::NoChange)
    }

    pub const fn is_rejected(self) -> bool {
        matches!(self, Self::Rejected)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum RejectReason {
    EmptyPath,
    SumMismatch { sum: u64, target: TileValue },
}

/// Outcome of submitting the current path
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MatchOutcome {
    /// The path summed to the target, its tiles are now removed and returned in path order
    Success { matched: Vec<Tile> },
    /// The path stays highlighted until `ticket` is fired
    Rejected {
        reason: RejectReason,
        ticket: ClearTicket,
    },
}

impl MatchOutcome {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    pub fn matched(&self) -> &[Tile] {
        match self {
            Self::Success { matched } => matched.as_slice(),
            Self::Rejected { .. } => &[],
        }
    }

    pub const fn ticket(&self) -> Option<ClearTicket> {
        match self {
            Self::Success { .. } => None,
            Self::Rejected { ticket, .. } => Some(*ticket),
        }
    }
}
