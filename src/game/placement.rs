//! Grid cell allocation for positioned zones

use crate::config::GridSize;
use crate::core::Position;
use crate::zones::Zone;
use crate::{Result, TabletopError};
use rustc_hash::FxHashSet;

/// Find the first free cell of a grid
///
/// Rows are scanned top to bottom and each row left to right; the first cell that no
/// card in `occupied` sits on wins. A full grid is reported as `ZoneFull` instead of
/// stacking two cards on the same cell.
pub fn first_free_cell(
    zone: Zone,
    grid: GridSize,
    occupied: impl IntoIterator<Item = Position>,
) -> Result<Position> {
    let taken: FxHashSet<Position> = occupied.into_iter().collect();

    (0..grid.rows)
        .flat_map(|row| (0..grid.cols).map(move |col| Position::new(row, col)))
        .find(|cell| !taken.contains(cell))
        .ok_or(TabletopError::ZoneFull(zone))
}

/// Pick the cell for a card entering a grid zone
///
/// An explicit drop target is used verbatim; otherwise the allocator runs.
pub fn resolve_cell(
    zone: Zone,
    grid: GridSize,
    requested: Option<Position>,
    occupied: impl IntoIterator<Item = Position>,
) -> Result<Position> {
    match requested {
        Some(cell) => Ok(cell),
        None => first_free_cell(zone, grid, occupied),
    }
}
