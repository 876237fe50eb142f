use std::{fmt, mem};

use serde::{Deserialize, Serialize};

use crate::core::piece::Piece;

/// Maximum number of columns a board can have.
pub const MAX_BOARD_WIDTH: usize = 16;

/// Single row in the board, stored as a bitmask where bit `x` is column `x`.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct BitRow {
    bits: u16,
}

impl BitRow {
    const EMPTY: Self = Self { bits: 0 };

    const fn full_mask(width: usize) -> u16 {
        if width >= MAX_BOARD_WIDTH {
            u16::MAX
        } else {
            (1 << width) - 1
        }
    }

    #[inline]
    fn is_filled(self, width: usize) -> bool {
        self.bits == Self::full_mask(width)
    }

    #[inline]
    fn is_cell_filled(self, x: usize) -> bool {
        (self.bits & (1 << x)) != 0
    }

    #[inline]
    fn fill_cell(&mut self, x: usize) {
        self.bits |= 1 << x;
    }

    #[inline]
    fn filled_count(self) -> usize {
        self.bits.count_ones() as usize
    }
}

/// Result of [`Board::place`].
///
/// `Ok` and `RowFilled` are acceptances; the remaining variants are
/// rejections. Even a rejected placement leaves the board pending, so the
/// caller must still [`undo`](Board::undo) it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum PlaceResult {
    /// The piece was placed.
    Ok,
    /// The piece was placed and completed at least one row.
    RowFilled,
    /// Part of the piece lies outside the board.
    OutOfBounds,
    /// The piece overlaps a filled cell.
    Collision,
}

impl PlaceResult {
    /// Returns `true` if the piece was placed on the board.
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, PlaceResult::Ok | PlaceResult::RowFilled)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, derive_more::Display, derive_more::Error)]
pub enum BoardError {
    #[display("board width must be between 1 and 16, got {width}")]
    InvalidWidth { width: usize },
    #[display("board must have at least one row")]
    NoRows,
    #[display("row {row} has {len} cells, expected {width}")]
    RowWidthMismatch { row: usize, len: usize, width: usize },
    #[display("invalid cell {ch:?} at row {row}, column {column}")]
    InvalidCell { row: usize, column: usize, ch: char },
}

/// Fixed-width grid of filled/empty cells with single-step undo.
///
/// # Coordinate System
///
/// - `(0, 0)` is the bottom-left cell
/// - X increases rightward (columns)
/// - Y increases upward (rows)
/// - A piece at `(x, y)` has the lower-left corner of its bounding box there
///
/// # Commit / Undo
///
/// The board is either *committed* or holds exactly one *pending* placement.
/// [`place`](Self::place) saves the committed state and makes the board
/// pending; [`clear_rows`](Self::clear_rows) may follow; then either
/// [`undo`](Self::undo) restores the saved state or
/// [`commit`](Self::commit) keeps the new one. Searches use this to try a
/// placement, inspect the result and back it out.
///
/// # Example
///
/// ```
/// use dropbrain_engine::{Board, Piece, PieceKind, PlaceResult};
///
/// let mut board = Board::new(4, 6).unwrap();
/// let square = Piece::new(PieceKind::O);
///
/// let y = board.drop_height(square, 0);
/// assert_eq!(board.place(square, 0, y), PlaceResult::Ok);
/// assert_eq!(board.max_height(), 2);
///
/// board.undo();
/// assert_eq!(board.max_height(), 0);
/// ```
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    rows: Vec<BitRow>,
    heights: Vec<usize>,
    committed: bool,
    backup_rows: Vec<BitRow>,
    backup_heights: Vec<usize>,
}

// Backup buffers are scratch space and do not take part in equality.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.rows == other.rows
            && self.heights == other.heights
            && self.committed == other.committed
    }
}

impl Eq for Board {}

#[derive(Serialize, Deserialize)]
struct BoardRepr {
    width: usize,
    rows: Vec<String>,
}

impl Serialize for Board {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        // Format: {"width": 4, "rows": ["....", "#..#"]} (rows top to bottom)
        BoardRepr {
            width: self.width,
            rows: self.ascii_rows().collect(),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Board {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let repr = BoardRepr::deserialize(deserializer)?;
        Board::from_rows(repr.width, repr.rows.iter().map(String::as_str))
            .map_err(serde::de::Error::custom)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.ascii_rows() {
            writeln!(f, "{row}")?;
        }
        Ok(())
    }
}

impl Board {
    /// Creates an empty committed board.
    pub fn new(width: usize, height: usize) -> Result<Self, BoardError> {
        if !(1..=MAX_BOARD_WIDTH).contains(&width) {
            return Err(BoardError::InvalidWidth { width });
        }
        if height == 0 {
            return Err(BoardError::NoRows);
        }
        Ok(Self {
            width,
            rows: vec![BitRow::EMPTY; height],
            heights: vec![0; width],
            committed: true,
            backup_rows: Vec::with_capacity(height),
            backup_heights: Vec::with_capacity(width),
        })
    }

    /// Builds a committed board from text rows, top row first.
    ///
    /// `#` is a filled cell and `.` an empty one. Every row must have
    /// exactly `width` cells.
    pub fn from_rows<'a, I>(width: usize, rows: I) -> Result<Self, BoardError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let rows: Vec<&str> = rows.into_iter().collect();
        let mut board = Self::new(width, rows.len())?;
        let height = rows.len();

        for (row, line) in rows.iter().enumerate() {
            let len = line.chars().count();
            if len != width {
                return Err(BoardError::RowWidthMismatch { row, len, width });
            }
            let y = height - 1 - row;
            for (column, ch) in line.chars().enumerate() {
                match ch {
                    '#' => board.rows[y].fill_cell(column),
                    '.' => {}
                    _ => return Err(BoardError::InvalidCell { row, column, ch }),
                }
            }
        }

        board.recompute_heights();
        Ok(board)
    }

    /// Creates a board from ASCII art for testing.
    ///
    /// Blank lines and surrounding whitespace are ignored. The width is taken
    /// from the first row and the height is the number of rows.
    ///
    /// # Panics
    ///
    /// Panics if the art is not a valid board.
    #[must_use]
    pub fn from_ascii(art: &str) -> Self {
        let lines: Vec<&str> = art
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let width = lines.first().map_or(0, |line| line.chars().count());
        Self::from_rows(width, lines).unwrap_or_else(|e| panic!("invalid board art: {e}"))
    }

    #[must_use]
    pub fn width(&self) -> usize {
        self.width
    }

    #[must_use]
    pub fn height(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of filled cells in row `y`.
    #[must_use]
    pub fn row_width(&self, y: usize) -> usize {
        self.rows[y].filled_count()
    }

    /// Returns one past the highest filled cell of column `x` (0 if empty).
    #[must_use]
    pub fn column_height(&self, x: usize) -> usize {
        self.heights[x]
    }

    #[must_use]
    pub fn column_heights(&self) -> &[usize] {
        &self.heights
    }

    #[must_use]
    pub fn max_height(&self) -> usize {
        self.heights.iter().copied().max().unwrap_or(0)
    }

    #[must_use]
    pub fn min_height(&self) -> usize {
        self.heights.iter().copied().min().unwrap_or(0)
    }

    #[must_use]
    pub fn is_filled(&self, x: usize, y: usize) -> bool {
        self.rows[y].is_cell_filled(x)
    }

    #[must_use]
    pub fn is_committed(&self) -> bool {
        self.committed
    }

    /// Returns the row at which `piece` comes to rest when dropped straight
    /// down with its left edge at column `x`.
    ///
    /// Only column heights are considered, so overhangs are never slid under.
    #[must_use]
    pub fn drop_height(&self, piece: Piece, x: usize) -> usize {
        assert!(
            x + piece.width() <= self.width,
            "piece {piece} does not fit at column {x} on a board of width {}",
            self.width
        );
        piece
            .skirt()
            .iter()
            .enumerate()
            .map(|(dx, &skirt)| self.heights[x + dx].saturating_sub(skirt))
            .max()
            .unwrap_or(0)
    }

    /// Checks whether `piece` fits at `(x, y)` without touching the board.
    #[must_use]
    pub fn can_place(&self, piece: Piece, x: usize, y: usize) -> bool {
        self.in_bounds(piece, x, y)
            && piece
                .body()
                .all(|(dx, dy)| !self.rows[y + dy].is_cell_filled(x + dx))
    }

    fn in_bounds(&self, piece: Piece, x: usize, y: usize) -> bool {
        x + piece.width() <= self.width && y + piece.height() <= self.height()
    }

    /// Places `piece` with its lower-left corner at `(x, y)`.
    ///
    /// The board becomes pending whatever the result; a rejected placement
    /// may leave some of the piece's cells filled until [`undo`](Self::undo).
    ///
    /// # Panics
    ///
    /// Panics if a placement is already pending.
    pub fn place(&mut self, piece: Piece, x: usize, y: usize) -> PlaceResult {
        assert!(
            self.committed,
            "place() called while another placement is pending"
        );
        self.backup_rows.clone_from(&self.rows);
        self.backup_heights.clone_from(&self.heights);
        self.committed = false;

        if !self.in_bounds(piece, x, y) {
            return PlaceResult::OutOfBounds;
        }

        let mut result = PlaceResult::Ok;
        for (dx, dy) in piece.body() {
            let (cx, cy) = (x + dx, y + dy);
            let row = &mut self.rows[cy];
            if row.is_cell_filled(cx) {
                return PlaceResult::Collision;
            }
            row.fill_cell(cx);
            self.heights[cx] = self.heights[cx].max(cy + 1);
            if row.is_filled(self.width) {
                result = PlaceResult::RowFilled;
            }
        }
        result
    }

    /// Removes every completely filled row, shifting the rows above down, and
    /// returns the number of rows removed.
    ///
    /// When called after [`place`](Self::place), a following
    /// [`undo`](Self::undo) reverts the clear as well.
    pub fn clear_rows(&mut self) -> usize {
        let width = self.width;
        let mut count = 0;

        for y in 0..self.rows.len() {
            if self.rows[y].is_filled(width) {
                count += 1;
                continue;
            }
            if count > 0 {
                self.rows[y - count] = self.rows[y];
            }
        }

        let height = self.rows.len();
        self.rows[height - count..].fill(BitRow::EMPTY);
        if count > 0 {
            self.recompute_heights();
        }
        count
    }

    /// Restores the state saved by the pending [`place`](Self::place).
    ///
    /// Does nothing on a committed board.
    pub fn undo(&mut self) {
        if self.committed {
            return;
        }
        mem::swap(&mut self.rows, &mut self.backup_rows);
        mem::swap(&mut self.heights, &mut self.backup_heights);
        self.committed = true;
    }

    /// Keeps the pending placement as the new committed state.
    pub fn commit(&mut self) {
        self.committed = true;
    }

    fn recompute_heights(&mut self) {
        for (x, height) in self.heights.iter_mut().enumerate() {
            *height = self
                .rows
                .iter()
                .rposition(|row| row.is_cell_filled(x))
                .map_or(0, |y| y + 1);
        }
    }

    fn ascii_rows(&self) -> impl Iterator<Item = String> + '_ {
        self.rows.iter().rev().map(|row| {
            (0..self.width)
                .map(|x| if row.is_cell_filled(x) { '#' } else { '.' })
                .collect()
        })
    }
}
