use crate::*;

/// Decision reached for a submitted path, before anything on the grid changes.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Verdict {
    Accept { sum: u64 },
    Reject(RejectReason),
}

/// Sum of the values on `path`.
pub fn path_sum(path: &[TileId], grid: &Grid) -> Result<u64> {
    path.iter().try_fold(0u64, |sum, &id| {
        Ok(sum + u64::from(grid.tile(id)?.value))
    })
}

/// Judge a path against the target. Sums are compared exactly.
pub fn evaluate(path: &[TileId], grid: &Grid, target: TileValue) -> Result<Verdict> {
    if path.is_empty() {
        return Ok(Verdict::Reject(RejectReason::EmptyPath));
    }

    let sum = path_sum(path, grid)?;
    Ok(if sum == u64::from(target) {
        Verdict::Accept { sum }
    } else {
        Verdict::Reject(RejectReason::SumMismatch { sum, target })
    })
}

/// Remove every tile on an accepted path, returning them in path order.
pub(crate) fn apply_match(path: &[TileId], grid: &mut Grid) -> Result<Vec<Tile>> {
    let mut matched = Vec::with_capacity(path.len());
    for &id in path {
        let was_live = grid.mark_removed(id)?;
        debug_assert!(was_live, "matched tile {id} must be live");
        matched.push(*grid.tile(id)?);
    }
    Ok(matched)
}
