//! Column metrics of a board state.
//!
//! [`BoardAnalysis`] reads the column heights and cells of a [`Board`] once and
//! exposes the aggregate measurements used by [`board_rater`](crate::board_rater).

use dropbrain_engine::Board;

/// Aggregate column measurements of one board state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoardAnalysis {
    width: usize,
    sum_height: usize,
    max_height: usize,
    min_height: usize,
    cells: usize,
}

impl BoardAnalysis {
    #[must_use]
    pub fn from_board(board: &Board) -> Self {
        let width = board.width();
        let sum_height = board.column_heights().iter().sum::<usize>();
        let cells = (0..board.height()).map(|y| board.row_width(y)).sum();

        Self {
            width,
            sum_height,
            max_height: board.max_height(),
            min_height: board.min_height(),
            cells,
        }
    }

    /// Number of filled cells.
    #[must_use]
    pub fn cells(&self) -> usize {
        self.cells
    }

    #[must_use]
    pub fn sum_height(&self) -> usize {
        self.sum_height
    }

    #[must_use]
    #[expect(clippy::cast_precision_loss)]
    pub fn avg_height(&self) -> f64 {
        self.sum_height() as f64 / self.width as f64
    }

    #[must_use]
    pub fn max_height(&self) -> usize {
        self.max_height
    }

    #[must_use]
    pub fn min_height(&self) -> usize {
        self.min_height
    }

    /// Difference between the tallest and the lowest column.
    #[must_use]
    pub fn height_spread(&self) -> usize {
        self.max_height - self.min_height
    }

    /// Number of empty cells with at least one filled cell above them in the
    /// same column.
    #[must_use]
    pub fn holes(&self) -> usize {
        // Every cell up to a column's height is either filled or a hole.
        self.sum_height - self.cells
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_board() {
        let analysis = BoardAnalysis::from_board(&Board::new(10, 20).unwrap());
        assert_eq!(analysis.sum_height(), 0);
        assert_eq!(analysis.max_height(), 0);
        assert_eq!(analysis.holes(), 0);
        assert_eq!(analysis.height_spread(), 0);
        assert!(analysis.avg_height().abs() < f64::EPSILON);
    }

    #[test]
    fn test_metrics() {
        let board = Board::from_ascii(
            r"
            .#...
            .#..#
            ##..#
            #.#.#
            ",
        );
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(board.column_heights(), &[2, 4, 1, 0, 3]);
        assert_eq!(analysis.sum_height(), 10);
        assert_eq!(analysis.max_height(), 4);
        assert_eq!(analysis.min_height(), 0);
        assert_eq!(analysis.height_spread(), 4);
        // Column 1 covers (1, 0); no other column has a gap below its top.
        assert_eq!(analysis.holes(), 1);
        assert_eq!(analysis.cells(), 9);
        assert!((analysis.avg_height() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_holes_counts_every_covered_cell() {
        let board = Board::from_ascii(
            r"
            #..
            ...
            ...
            .#.
            ",
        );
        let analysis = BoardAnalysis::from_board(&board);
        assert_eq!(analysis.holes(), 3);
    }
}
