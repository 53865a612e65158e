/// Single coordinate axis used for board rows, columns, and positions.
pub type Coord = u8;

/// Count type used for mine counts and total-cell counts.
pub type CellCount = u16;

/// Two-dimensional `(row, col)` position.
pub type Pos = (Coord, Coord);

/// ndarray index for a position.
pub(crate) const fn nd(pos: Pos) -> [usize; 2] {
    [pos.0 as usize, pos.1 as usize]
}

pub const fn cell_product(rows: Coord, cols: Coord) -> CellCount {
    let rows = rows as CellCount;
    let cols = cols as CellCount;
    rows.saturating_mul(cols)
}

const NEIGHBOR_OFFSETS: [(i8, i8); 8] = [
    (-1, -1),
    (-1, 0),
    (-1, 1),
    (0, -1),
    (0, 1),
    (1, -1),
    (1, 0),
    (1, 1),
];

/// Applies `delta` to `pos`, returning a value only while it stays in bounds.
fn offset(pos: Pos, delta: (i8, i8), bounds: Pos) -> Option<Pos> {
    let row = pos.0.checked_add_signed(delta.0).filter(|&row| row < bounds.0)?;
    let col = pos.1.checked_add_signed(delta.1).filter(|&col| col < bounds.1)?;
    Some((row, col))
}

/// In-bounds positions of the 8-neighborhood of `pos`.
pub fn neighbors(pos: Pos, bounds: Pos) -> impl Iterator<Item = Pos> {
    NEIGHBOR_OFFSETS
        .into_iter()
        .filter_map(move |delta| offset(pos, delta, bounds))
}

/// The first-reveal safe zone: `center` plus its in-bounds neighbors.
pub fn safe_zone(center: Pos, bounds: Pos) -> impl Iterator<Item = Pos> {
    core::iter::once(center).chain(neighbors(center, bounds))
}
