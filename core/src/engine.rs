use core::time::Duration;
use smallvec::SmallVec;
use web_time::Instant;

use crate::*;

/// Ordered tile ids picked by the player, oldest first.
pub type SelectionPath = SmallVec<[TileId; 8]>;

/// Selection state machine over a single grid.
///
/// The path is a stack: tiles can only be appended next to the current end and only the end can be taken back.
/// Every rejected player action bumps [`SelectionEngine::invalid_signal`] exactly once, the counter never goes down.
#[derive(Clone, Debug)]
pub struct SelectionEngine {
    grid: Grid,
    path: SelectionPath,
    invalid_signal: u64,
    schedule: ClearSchedule,
    clear_delay: Duration,
}

impl SelectionEngine {
    pub fn new(grid: Grid) -> Self {
        Self::with_clear_delay(grid, GameConfig::default().clear_delay())
    }

    pub fn with_config(grid: Grid, config: &GameConfig) -> Self {
        Self::with_clear_delay(grid, config.clear_delay())
    }

    pub fn with_clear_delay(grid: Grid, clear_delay: Duration) -> Self {
        Self {
            grid,
            path: SelectionPath::new(),
            invalid_signal: 0,
            schedule: ClearSchedule::new(),
            clear_delay,
        }
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn selected_ids(&self) -> &[TileId] {
        &self.path
    }

    pub fn is_selected(&self, id: TileId) -> bool {
        self.path.contains(&id)
    }

    pub fn invalid_signal(&self) -> u64 {
        self.invalid_signal
    }

    pub fn clear_delay(&self) -> Duration {
        self.clear_delay
    }

    /// Ticket of the delayed clear still waiting to be fired, if any.
    pub fn pending_clear(&self) -> Option<ClearTicket> {
        self.schedule.pending()
    }

    pub fn pending_clear_due(&self) -> Option<Instant> {
        self.schedule.due_at()
    }

    pub fn live_count(&self) -> TileCount {
        self.grid.live_count()
    }

    pub fn is_cleared(&self) -> bool {
        self.grid.is_cleared()
    }

    pub fn current_sum(&self) -> u64 {
        self.path
            .iter()
            .filter_map(|&id| self.grid.get(id))
            .map(|tile| u64::from(tile.value))
            .sum()
    }

    pub fn select(&mut self, id: TileId) -> Result<SelectOutcome> {
        use SelectOutcome::*;

        let tile = *self.grid.tile(id)?;
        if tile.removed {
            return Ok(NoChange);
        }

        let Some(&last_id) = self.path.last() else {
            log::trace!("path started at {id} {:?}", tile.position);
            self.path.push(id);
            return Ok(Started);
        };

        if self.path.contains(&id) {
            return Ok(NoChange);
        }

        let last = self.grid.tile(last_id)?;
        if !tile.is_adjacent_to(last) {
            log::trace!(
                "rejected {id} {:?}, not adjacent to {last_id} {:?}",
                tile.position,
                last.position
            );
            self.signal_invalid();
            return Ok(Rejected);
        }

        log::trace!("path extended with {id} {:?}", tile.position);
        self.path.push(id);
        Ok(Extended)
    }

    pub fn deselect(&mut self, id: TileId) -> Result<DeselectOutcome> {
        use DeselectOutcome::*;

        self.grid.tile(id)?;
        let Some(&last_id) = self.path.last() else {
            return Ok(NoChange);
        };

        if last_id == id {
            self.path.pop();
            log::trace!("path popped {id}");
            Ok(Popped)
        } else {
            log::trace!("rejected deselect of {id}, path ends at {last_id}");
            self.signal_invalid();
            Ok(Rejected)
        }
    }

    /// Route a tap: tiles already on the path are deselected, anything else is selected.
    pub fn toggle(&mut self, id: TileId) -> Result<ToggleOutcome> {
        if self.is_selected(id) {
            self.deselect(id).map(ToggleOutcome::Deselect)
        } else {
            self.select(id).map(ToggleOutcome::Select)
        }
    }

    /// Empty the path and drop any pending delayed clear. Never touches the invalid signal.
    pub fn clear(&mut self) {
        self.path.clear();
        if let Some(ticket) = self.schedule.cancel() {
            log::trace!("clear ticket {} cancelled", ticket.raw());
        }
    }

    pub fn submit(&mut self, target: TileValue) -> Result<MatchOutcome> {
        self.submit_at(target, Instant::now())
    }

    /// Submit the path against `target`, using `now` to stamp the delayed clear of a rejected path.
    pub fn submit_at(&mut self, target: TileValue, now: Instant) -> Result<MatchOutcome> {
        match evaluate(&self.path, &self.grid, target)? {
            Verdict::Accept { sum } => {
                let matched = apply_match(&self.path, &mut self.grid)?;
                self.clear();
                log::debug!(
                    "matched {} tiles summing to {}, {} tiles left",
                    matched.len(),
                    sum,
                    self.grid.live_count()
                );
                Ok(MatchOutcome::Success { matched })
            }
            Verdict::Reject(reason) => {
                self.signal_invalid();
                let ticket = self.schedule.schedule(now, self.clear_delay);
                log::debug!("submit rejected: {reason:?}, clear ticket {}", ticket.raw());
                Ok(MatchOutcome::Rejected { reason, ticket })
            }
        }
    }

    /// Fire a delayed clear. Cancelled or superseded tickets do nothing and return `false`.
    pub fn run_scheduled_clear(&mut self, ticket: ClearTicket) -> bool {
        if self.schedule.take_if(ticket) {
            log::debug!("clear ticket {} fired", ticket.raw());
            self.path.clear();
            true
        } else {
            false
        }
    }

    /// Fire the pending delayed clear if it is due at `now`.
    pub fn tick(&mut self, now: Instant) -> Option<ClearTicket> {
        let ticket = self.schedule.take_due(now)?;
        log::debug!("clear ticket {} due", ticket.raw());
        self.path.clear();
        Some(ticket)
    }

    fn signal_invalid(&mut self) {
        self.invalid_signal = self.invalid_signal.saturating_add(1);
    }
}

/// Outcome of [`SelectionEngine::toggle`], tagged with the action it turned into.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ToggleOutcome {
    Select(SelectOutcome),
    Deselect(DeselectOutcome),
}

impl ToggleOutcome {
    pub const fn has_update(self) -> bool {
        match self {
            Self::Select(outcome) => outcome.has_update(),
            Self::Deselect(outcome) => outcome.has_update(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine(values: &[Vec<TileValue>]) -> SelectionEngine {
        SelectionEngine::new(Grid::from_values(values, &mut IdMint::new()).unwrap())
    }

    /// 2x2 board: `2 3 / 4 5`
    fn small() -> SelectionEngine {
        engine(&[vec![2, 3], vec![4, 5]])
    }

    fn id(engine: &SelectionEngine, pos: Coord2) -> TileId {
        engine.grid()[pos].id
    }

    #[test]
    fn select_adjacent_tiles_accumulates_sum() {
        let mut engine = small();
        let a = id(&engine, (0, 0));
        let b = id(&engine, (0, 1));

        assert_eq!(engine.select(a).unwrap(), SelectOutcome::Started);
        assert_eq!(engine.current_sum(), 2);
        assert_eq!(engine.select(b).unwrap(), SelectOutcome::Extended);
        assert_eq!(engine.current_sum(), 5);
        assert_eq!(engine.selected_ids(), &[a, b]);
        assert_eq!(engine.invalid_signal(), 0);
    }

    #[test]
    fn select_non_adjacent_tile_is_rejected() {
        let mut engine = small();
        let a = id(&engine, (0, 0));
        let diagonal = id(&engine, (1, 1));

        engine.select(a).unwrap();
        assert_eq!(engine.select(diagonal).unwrap(), SelectOutcome::Rejected);

        assert_eq!(engine.selected_ids(), &[a]);
        assert_eq!(engine.invalid_signal(), 1);
    }

    #[test]
    fn adjacency_is_checked_against_the_end_of_the_path() {
        let mut engine = engine(&[vec![1, 1, 1], vec![1, 1, 1], vec![1, 1, 1]]);
        let start = id(&engine, (0, 0));
        let middle = id(&engine, (0, 1));
        let below_start = id(&engine, (1, 0));

        engine.select(start).unwrap();
        engine.select(middle).unwrap();

        assert_eq!(engine.select(below_start).unwrap(), SelectOutcome::Rejected);
        assert_eq!(engine.selected_ids(), &[start, middle]);
    }

    #[test]
    fn reselecting_a_path_tile_is_a_no_op() {
        let mut engine = small();
        let a = id(&engine, (0, 0));
        let b = id(&engine, (0, 1));

        engine.select(a).unwrap();
        engine.select(b).unwrap();

        assert_eq!(engine.select(a).unwrap(), SelectOutcome::NoChange);
        assert_eq!(engine.select(b).unwrap(), SelectOutcome::NoChange);
        assert_eq!(engine.selected_ids(), &[a, b]);
        assert_eq!(engine.invalid_signal(), 0);
    }

    #[test]
    fn deselect_only_pops_the_tail() {
        let mut engine = small();
        let a = id(&engine, (0, 0));
        let b = id(&engine, (0, 1));

        engine.select(a).unwrap();
        engine.select(b).unwrap();

        assert_eq!(engine.deselect(a).unwrap(), DeselectOutcome::Rejected);
        assert_eq!(engine.selected_ids(), &[a, b]);
        assert_eq!(engine.invalid_signal(), 1);

        assert_eq!(engine.deselect(b).unwrap(), DeselectOutcome::Popped);
        assert_eq!(engine.deselect(a).unwrap(), DeselectOutcome::Popped);
        assert!(engine.selected_ids().is_empty());
        assert_eq!(engine.current_sum(), 0);
    }

    #[test]
    fn deselect_on_empty_path_is_a_no_op() {
        let mut engine = small();
        let a = id(&engine, (0, 0));

        assert_eq!(engine.deselect(a).unwrap(), DeselectOutcome::NoChange);
        assert_eq!(engine.invalid_signal(), 0);
    }

    #[test]
    fn deselecting_a_tile_off_the_path_is_rejected() {
        let mut engine = small();
        let a = id(&engine, (0, 0));
        let other = id(&engine, (1, 1));

        engine.select(a).unwrap();
        assert_eq!(engine.deselect(other).unwrap(), DeselectOutcome::Rejected);
        assert_eq!(engine.invalid_signal(), 1);
    }

    #[test]
    fn toggle_routes_by_membership() {
        let mut engine = small();
        let a = id(&engine, (0, 0));

        assert_eq!(
            engine.toggle(a).unwrap(),
            ToggleOutcome::Select(SelectOutcome::Started)
        );
        assert_eq!(
            engine.toggle(a).unwrap(),
            ToggleOutcome::Deselect(DeselectOutcome::Popped)
        );
        assert!(engine.selected_ids().is_empty());
    }

    #[test]
    fn clear_is_idempotent() {
        let mut engine = small();
        engine.clear();
        assert!(engine.selected_ids().is_empty());
        assert_eq!(engine.invalid_signal(), 0);

        engine.select(id(&engine, (0, 0))).unwrap();
        engine.clear();
        engine.clear();
        assert!(engine.selected_ids().is_empty());
        assert_eq!(engine.invalid_signal(), 0);
    }

    #[test]
    fn successful_submit_removes_tiles_and_clears_path() {
        let mut engine = small();
        let a = id(&engine, (0, 0));
        let b = id(&engine, (0, 1));

        engine.select(a).unwrap();
        engine.select(b).unwrap();
        let outcome = engine.submit(5).unwrap();

        let values: Vec<_> = outcome.matched().iter().map(|t| t.value).collect();
        assert!(outcome.is_success());
        assert_eq!(values, vec![2, 3]);
        assert!(engine.grid()[(0, 0)].removed);
        assert!(engine.grid()[(0, 1)].removed);
        assert!(!engine.grid()[(1, 0)].removed);
        assert!(engine.selected_ids().is_empty());
        assert_eq!(engine.invalid_signal(), 0);
        assert_eq!(engine.live_count(), 2);
    }

    #[test]
    fn failed_submit_signals_and_keeps_path_until_ticket_fires() {
        let mut engine = small();
        let a = id(&engine, (0, 0));

        engine.select(a).unwrap();
        let outcome = engine.submit(100).unwrap();

        let MatchOutcome::Rejected { reason, ticket } = outcome else {
            panic!("expected rejection, got {outcome:?}");
        };
        assert_eq!(reason, RejectReason::SumMismatch { sum: 2, target: 100 });
        assert_eq!(engine.invalid_signal(), 1);
        assert_eq!(engine.selected_ids(), &[a]);
        assert_eq!(engine.pending_clear(), Some(ticket));
        assert!(!engine.grid()[(0, 0)].removed);

        assert!(engine.run_scheduled_clear(ticket));
        assert!(engine.selected_ids().is_empty());
        assert!(!engine.run_scheduled_clear(ticket));
        assert_eq!(engine.invalid_signal(), 1);
    }

    #[test]
    fn empty_submit_is_rejected_without_panicking() {
        let mut engine = small();

        let outcome = engine.submit(5).unwrap();

        assert_eq!(outcome.ticket(), engine.pending_clear());
        assert!(matches!(
            outcome,
            MatchOutcome::Rejected {
                reason: RejectReason::EmptyPath,
                ..
            }
        ));
        assert_eq!(engine.invalid_signal(), 1);
    }

    #[test]
    fn clear_cancels_the_pending_ticket() {
        let mut engine = small();
        engine.select(id(&engine, (0, 0))).unwrap();
        let ticket = engine.submit(100).unwrap().ticket().unwrap();

        engine.clear();
        engine.select(id(&engine, (1, 0))).unwrap();

        assert_eq!(engine.pending_clear(), None);
        assert!(!engine.run_scheduled_clear(ticket));
        assert_eq!(engine.selected_ids().len(), 1);
    }

    #[test]
    fn scheduled_clear_tolerates_a_changed_path() {
        let mut engine = small();
        let a = id(&engine, (0, 0));
        let b = id(&engine, (1, 0));

        engine.select(a).unwrap();
        let ticket = engine.submit(100).unwrap().ticket().unwrap();
        engine.select(b).unwrap();
        engine.deselect(b).unwrap();
        engine.deselect(a).unwrap();

        assert!(engine.run_scheduled_clear(ticket));
        assert!(engine.selected_ids().is_empty());
        assert_eq!(engine.invalid_signal(), 1);
    }

    #[test]
    fn tick_fires_only_once_due() {
        let mut engine = small();
        let start = Instant::now();
        engine.select(id(&engine, (0, 0))).unwrap();
        let ticket = engine.submit_at(100, start).unwrap().ticket();

        assert_eq!(engine.tick(start), None);
        assert_eq!(engine.selected_ids().len(), 1);
        assert_eq!(engine.tick(start + engine.clear_delay()), ticket);
        assert!(engine.selected_ids().is_empty());
        assert_eq!(engine.tick(start + engine.clear_delay()), None);
    }

    #[test]
    fn removed_tiles_cannot_be_selected_again() {
        let mut engine = small();
        let a = id(&engine, (0, 0));
        let b = id(&engine, (0, 1));

        engine.select(a).unwrap();
        engine.select(b).unwrap();
        engine.submit(5).unwrap();

        assert_eq!(engine.select(a).unwrap(), SelectOutcome::NoChange);
        assert!(engine.selected_ids().is_empty());

        let c = id(&engine, (1, 0));
        engine.select(c).unwrap();
        assert_eq!(engine.select(a).unwrap(), SelectOutcome::NoChange);
        assert_eq!(engine.selected_ids(), &[c]);
        assert_eq!(engine.invalid_signal(), 0);
    }

    #[test]
    fn unknown_ids_are_caller_errors() {
        let mut engine = small();
        let stranger = IdMint::after(id(&engine, (1, 1))).mint();

        assert_eq!(engine.select(stranger), Err(GameError::UnknownTile(stranger)));
        assert_eq!(engine.deselect(stranger), Err(GameError::UnknownTile(stranger)));
        assert_eq!(engine.invalid_signal(), 0);
    }

    #[test]
    fn clearing_the_whole_board() {
        let mut engine = small();
        let path = [(0, 0), (0, 1), (1, 1), (1, 0)].map(|pos| id(&engine, pos));

        for tile in path {
            engine.select(tile).unwrap();
        }
        assert_eq!(engine.current_sum(), 14);
        assert!(engine.submit(14).unwrap().is_success());
        assert!(engine.is_cleared());
    }
}
