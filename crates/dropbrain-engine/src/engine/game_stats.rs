use serde::Serialize;

/// Score values for row clears.
///
/// Index corresponds to number of rows cleared simultaneously:
/// - 0 rows: 0 points
/// - 1 row: 100 points
/// - 2 rows: 300 points
/// - 3 rows: 500 points
/// - 4 rows: 800 points
const SCORE_TABLE: [usize; 5] = [0, 100, 300, 500, 800];

/// Game statistics tracking score, cleared rows, and piece count.
///
/// # Example
///
/// ```
/// use dropbrain_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(4);
///
/// assert_eq!(stats.score(), 800);
/// assert_eq!(stats.total_cleared_rows(), 4);
/// assert_eq!(stats.row_clear_counter()[4], 1);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GameStats {
    score: usize,
    completed_pieces: usize,
    total_cleared_rows: usize,
    row_clear_counter: [usize; 5],
}

impl Default for GameStats {
    fn default() -> Self {
        Self::new()
    }
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            score: 0,
            completed_pieces: 0,
            total_cleared_rows: 0,
            row_clear_counter: [0; 5],
        }
    }

    /// Returns the current score (sum of all row clear points).
    #[must_use]
    pub const fn score(&self) -> usize {
        self.score
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_rows(&self) -> usize {
        self.total_cleared_rows
    }

    /// Returns a histogram of landings by number of rows cleared.
    ///
    /// Index `n` counts landings that cleared `n` rows; clears of more than
    /// four rows (possible on tall custom pieces only) are counted at index 4.
    #[must_use]
    pub const fn row_clear_counter(&self) -> &[usize; 5] {
        &self.row_clear_counter
    }

    /// Updates statistics after a piece lands.
    pub fn complete_piece_drop(&mut self, cleared_rows: usize) {
        let bucket = cleared_rows.min(SCORE_TABLE.len() - 1);
        self.completed_pieces += 1;
        self.total_cleared_rows += cleared_rows;
        self.row_clear_counter[bucket] += 1;
        self.score += SCORE_TABLE[bucket];
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_accumulate() {
        let mut stats = GameStats::new();
        stats.complete_piece_drop(0);
        stats.complete_piece_drop(1);
        stats.complete_piece_drop(2);
        stats.complete_piece_drop(0);

        assert_eq!(stats.completed_pieces(), 4);
        assert_eq!(stats.total_cleared_rows(), 3);
        assert_eq!(stats.score(), 400);
        assert_eq!(stats.row_clear_counter(), &[2, 1, 1, 0, 0]);
    }
}
