use ndarray::Array2;

/// Single coordinate axis used for the grid side length and positions.
pub type Coord = u8;

/// Count type used for tile counts.
pub type TileCount = u16;

/// Face value printed on a tile, also used for targets.
pub type TileValue = u32;

/// Two-dimensional coordinates `(row, col)`.
pub type Coord2 = (Coord, Coord);

pub trait ToNdIndex {
    type Output;
    fn to_nd_index(self) -> Self::Output;
}

impl ToNdIndex for Coord2 {
    type Output = [usize; 2];

    fn to_nd_index(self) -> Self::Output {
        [self.0.into(), self.1.into()]
    }
}

pub const fn square(side: Coord) -> TileCount {
    let side = side as TileCount;
    side.saturating_mul(side)
}

/// Whether `a` and `b` are orthogonal neighbors, i.e. their Manhattan distance is exactly 1.
///
/// Diagonal cells are not adjacent and a cell is never adjacent to itself.
pub const fn is_adjacent(a: Coord2, b: Coord2) -> bool {
    let dr = a.0.abs_diff(b.0);
    let dc = a.1.abs_diff(b.1);
    (dr == 1 && dc == 0) || (dr == 0 && dc == 1)
}

pub trait NeighborIterExt {
    fn iter_neighbors(&self, index: Coord2) -> OrthogonalNeighbors;
}

impl<T> NeighborIterExt for Array2<T> {
    fn iter_neighbors(&self, index: Coord2) -> OrthogonalNeighbors {
        let (rows, cols) = self.dim();
        let bounds = (
            rows.try_into().unwrap_or(Coord::MAX),
            cols.try_into().unwrap_or(Coord::MAX),
        );
        OrthogonalNeighbors::new(index, bounds)
    }
}

const DISPLACEMENTS: [(i8, i8); 4] = [(-1, 0), (0, -1), (0, 1), (1, 0)];

/// Applies `delta` to `coords`, returning a value only when it remains in bounds.
fn apply_delta(coords: Coord2, delta: (i8, i8), bounds: Coord2) -> Option<Coord2> {
    let (row, col) = coords;
    let (dr, dc) = delta;
    let (max_row, max_col) = bounds;

    let next_row = row.checked_add_signed(dr)?;
    if next_row >= max_row {
        return None;
    }

    let next_col = col.checked_add_signed(dc)?;
    if next_col >= max_col {
        return None;
    }

    Some((next_row, next_col))
}

/// In-bounds orthogonal neighbors of a cell, in reading order.
#[derive(Debug, Clone)]
pub struct OrthogonalNeighbors {
    center: Coord2,
    bounds: Coord2,
    index: u8,
}

impl OrthogonalNeighbors {
    pub fn new(center: Coord2, bounds: Coord2) -> Self {
        Self {
            center,
            bounds,
            index: 0,
        }
    }
}

impl Iterator for OrthogonalNeighbors {
    type Item = Coord2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let delta = *DISPLACEMENTS.get(usize::from(self.index))?;
            self.index += 1;

            if let Some(next_item) = apply_delta(self.center, delta, self.bounds) {
                return Some(next_item);
            }
        }
    }
}
