use serde::{Deserialize, Serialize};
use web_time::Instant;

use crate::*;

/// Player intent forwarded by the presentation layer.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Intent {
    Select(TileId),
    Deselect(TileId),
    /// A tap on a tile, deselects when the tile is on the path and selects otherwise
    Toggle(TileId),
    Submit,
    Clear,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IntentOutcome {
    Select(SelectOutcome),
    Deselect(DeselectOutcome),
    Match(MatchOutcome),
    Cleared,
}

impl From<ToggleOutcome> for IntentOutcome {
    fn from(outcome: ToggleOutcome) -> Self {
        match outcome {
            ToggleOutcome::Select(outcome) => Self::Select(outcome),
            ToggleOutcome::Deselect(outcome) => Self::Deselect(outcome),
        }
    }
}

/// Result of applying one intent: what happened and how the game looks afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    pub outcome: IntentOutcome,
    pub snapshot: Snapshot,
}

/// A running game: the selection engine, the current target and the strategy that advances it after each match.
#[derive(Clone, Debug)]
pub struct Session<S> {
    engine: SelectionEngine,
    target: TileValue,
    strategy: S,
    matches: u32,
}

impl<S: TargetStrategy> Session<S> {
    pub fn new(grid: Grid, strategy: S) -> Self {
        Self::from_engine(SelectionEngine::new(grid), strategy)
    }

    pub fn with_config(grid: Grid, config: &GameConfig, strategy: S) -> Self {
        Self::from_engine(SelectionEngine::with_config(grid, config), strategy)
    }

    /// Generate a grid for `config` and start a game on it.
    pub fn generate(
        config: &GameConfig,
        generator: impl GridGenerator,
        strategy: S,
    ) -> Result<Self> {
        let grid = generator.generate(config, &mut IdMint::new())?;
        Ok(Self::with_config(grid, config, strategy))
    }

    fn from_engine(engine: SelectionEngine, mut strategy: S) -> Self {
        let target = strategy.initial(engine.grid()).max(1);
        log::debug!("Session started, target {target}");
        Self {
            engine,
            target,
            strategy,
            matches: 0,
        }
    }

    pub fn engine(&self) -> &SelectionEngine {
        &self.engine
    }

    pub fn target(&self) -> TileValue {
        self.target
    }

    /// Override the target from outside, e.g. when the host runs its own award logic.
    pub fn set_target(&mut self, target: TileValue) {
        self.target = target.max(1);
    }

    /// Number of successful matches so far.
    pub fn matches(&self) -> u32 {
        self.matches
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::from_engine(&self.engine, self.target)
    }

    pub fn apply(&mut self, intent: Intent) -> Result<Transition> {
        self.apply_at(intent, Instant::now())
    }

    pub fn apply_at(&mut self, intent: Intent, now: Instant) -> Result<Transition> {
        let outcome = match intent {
            Intent::Select(id) => IntentOutcome::Select(self.engine.select(id)?),
            Intent::Deselect(id) => IntentOutcome::Deselect(self.engine.deselect(id)?),
            Intent::Toggle(id) => self.engine.toggle(id)?.into(),
            Intent::Submit => IntentOutcome::Match(self.submit_at(now)?),
            Intent::Clear => {
                self.engine.clear();
                IntentOutcome::Cleared
            }
        };

        Ok(Transition {
            outcome,
            snapshot: self.snapshot(),
        })
    }

    /// Submit the path against the current target. After a match the strategy sees the removed tiles and picks the
    /// next target.
    pub fn submit_at(&mut self, now: Instant) -> Result<MatchOutcome> {
        let outcome = self.engine.submit_at(self.target, now)?;
        if let MatchOutcome::Success { matched } = &outcome {
            self.matches = self.matches.saturating_add(1);
            let next = self.strategy.next(self.engine.grid(), matched).max(1);
            log::debug!("Target advanced from {} to {}", self.target, next);
            self.target = next;
        }
        Ok(outcome)
    }

    pub fn run_scheduled_clear(&mut self, ticket: ClearTicket) -> bool {
        self.engine.run_scheduled_clear(ticket)
    }

    pub fn tick(&mut self, now: Instant) -> Option<ClearTicket> {
        self.engine.tick(now)
    }
}
