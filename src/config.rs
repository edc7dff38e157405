//! Game configuration.
//!
//! Bounds on players and board dimensions, the marker alphabet, and the
//! validated [`BoardSize`] handed to the board engine.

use serde::{Deserialize, Serialize};

/// Fewest players a session accepts.
pub const MIN_PLAYERS: usize = 3;

/// Most players a session accepts (one per letter of [`MARKER_ALPHABET`]).
pub const MAX_PLAYERS: usize = 7;

/// Smallest number of board rows.
pub const MIN_ROWS: usize = 4;

/// Largest number of board rows.
pub const MAX_ROWS: usize = 13;

/// Smallest number of board columns.
pub const MIN_COLUMNS: usize = 4;

/// Largest number of board columns.
pub const MAX_COLUMNS: usize = 16;

/// Length of a winning line. Fixed for every board size.
pub const WIN_LENGTH: usize = 3;

/// Markers handed out in registration order.
pub const MARKER_ALPHABET: &str = "abcdefg";

/// Marker of the player who opens every game.
pub const STARTING_MARKER: char = 'c';

/// Environment variable holding the log filter.
pub const LOG_FILTER_ENV: &str = "RUST_LOG";

/// Log filter used when [`LOG_FILTER_ENV`] is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn";

/// Board dimension that failed validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum BoardSizeError {
    #[error("Invalid input. Please enter a number between 4 and 13.")]
    Rows(usize),

    #[error("Invalid input. Please enter a number between 4 and 16.")]
    Columns(usize),
}

/// Validated board dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardSize {
    rows: usize,
    columns: usize,
}

impl BoardSize {
    /// Create a board size, rejecting dimensions outside the allowed range.
    pub fn new(rows: usize, columns: usize) -> Result<Self, BoardSizeError> {
        Self::check_rows(rows)?;
        Self::check_columns(columns)?;
        Ok(Self { rows, columns })
    }

    /// Check a row count on its own.
    pub fn check_rows(rows: usize) -> Result<usize, BoardSizeError> {
        if (MIN_ROWS..=MAX_ROWS).contains(&rows) {
            Ok(rows)
        } else {
            Err(BoardSizeError::Rows(rows))
        }
    }

    /// Check a column count on its own.
    pub fn check_columns(columns: usize) -> Result<usize, BoardSizeError> {
        if (MIN_COLUMNS..=MAX_COLUMNS).contains(&columns) {
            Ok(columns)
        } else {
            Err(BoardSizeError::Columns(columns))
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Number of cells on the board.
    pub fn cell_count(&self) -> usize {
        self.rows * self.columns
    }
}

/// Check that a player count is within bounds.
pub fn is_valid_player_count(count: usize) -> bool {
    (MIN_PLAYERS..=MAX_PLAYERS).contains(&count)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_board_size_bounds() {
        assert!(BoardSize::new(4, 4).is_ok());
        assert!(BoardSize::new(13, 16).is_ok());
        assert_eq!(BoardSize::new(3, 4), Err(BoardSizeError::Rows(3)));
        assert_eq!(BoardSize::new(14, 4), Err(BoardSizeError::Rows(14)));
        assert_eq!(BoardSize::new(4, 17), Err(BoardSizeError::Columns(17)));
        assert_eq!(BoardSize::new(4, 3), Err(BoardSizeError::Columns(3)));
    }

    #[test]
    fn test_board_size_cells() {
        let size = BoardSize::new(5, 7).unwrap();
        assert_eq!(size.rows(), 5);
        assert_eq!(size.columns(), 7);
        assert_eq!(size.cell_count(), 35);
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(
            BoardSizeError::Rows(2).to_string(),
            "Invalid input. Please enter a number between 4 and 13."
        );
        assert_eq!(
            BoardSizeError::Columns(20).to_string(),
            "Invalid input. Please enter a number between 4 and 16."
        );
    }

    #[test]
    fn test_player_count() {
        assert!(!is_valid_player_count(2));
        assert!(is_valid_player_count(3));
        assert!(is_valid_player_count(7));
        assert!(!is_valid_player_count(8));
    }

    #[test]
    fn test_alphabet_covers_max_players() {
        assert_eq!(MARKER_ALPHABET.len(), MAX_PLAYERS);
        assert!(MARKER_ALPHABET.contains(STARTING_MARKER));
    }
}
