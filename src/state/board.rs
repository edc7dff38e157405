//! Board engine.
//!
//! Owns the grid for one game, applies moves and detects wins and ties.
//!
//! A winning line is always [`WIN_LENGTH`] cells long, whatever the board
//! size. Wins are searched over the whole board, not just around the last
//! move, in this order:
//!
//! ```text
//! Horizontal     rows top to bottom, starts left to right
//! Vertical       columns left to right, starts top to bottom
//! Diagonal  ↘    rows top to bottom, starts left to right
//! Diagonal  ↙    rows top to bottom, starts from column 3 rightwards
//! ```
//!
//! The first line found is marked as the winning line.

use std::fmt;

use tracing::debug;

use crate::config::{BoardSize, BoardSizeError, WIN_LENGTH};
use crate::state::player::Marker;

/// A single grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cell {
    #[default]
    Empty,
    /// Claimed by a player.
    Owned(Marker),
    /// Part of the line that won the game.
    WonLine(Marker),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// Character shown when the board is rendered.
    pub fn symbol(&self) -> char {
        match self {
            Self::Empty => ' ',
            Self::Owned(m) => m.as_char(),
            Self::WonLine(m) => m.winning_char(),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

/// Grid position, 0-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Parse a move token such as `B3` or `c12`.
    ///
    /// The row letter is case-insensitive and the column is 1-based. The
    /// result is not checked against any board.
    pub fn parse(token: &str) -> Result<Self, MoveError> {
        let token = token.trim();
        if token.chars().count() < 2 {
            return Err(MoveError::TooShort);
        }

        let mut chars = token.chars();
        let letter = chars
            .next()
            .filter(char::is_ascii_alphabetic)
            .ok_or_else(|| MoveError::Malformed(token.to_string()))?;
        let column: i64 = chars
            .as_str()
            .parse()
            .map_err(|_| MoveError::Malformed(token.to_string()))?;

        if column < 1 {
            return Err(MoveError::OutOfBounds(token.to_string()));
        }

        let row = (letter.to_ascii_uppercase() as u8 - b'A') as usize;
        Ok(Self::new(row, (column - 1) as usize))
    }

    /// Label in move-token form, e.g. `B3`.
    ///
    /// Rows past `Z` have no letter and are shown as `?`.
    pub fn label(&self) -> String {
        let letter = u8::try_from(self.row)
            .ok()
            .filter(|r| *r < 26)
            .map(|r| (b'A' + r) as char)
            .unwrap_or('?');
        format!("{}{}", letter, self.col + 1)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// Why a move was rejected.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("Invalid input. Please enter a valid move.")]
    TooShort,

    #[error("Invalid move '{0}'. Use a row letter followed by a column number, e.g. B3.")]
    Malformed(String),

    #[error("Invalid move '{0}' is off the board. Please try again.")]
    OutOfBounds(String),

    #[error("The cell {0} is already occupied. Try a different move.")]
    Occupied(String),

    #[error("The game is already over.")]
    GameOver,
}

/// Line orientations, in the order they are searched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Orientation {
    Horizontal,
    Vertical,
    Diagonal,
    AntiDiagonal,
}

impl Orientation {
    pub const ALL: [Orientation; 4] = [
        Orientation::Horizontal,
        Orientation::Vertical,
        Orientation::Diagonal,
        Orientation::AntiDiagonal,
    ];

    /// Row and column step between consecutive cells of a line.
    fn step(self) -> (isize, isize) {
        match self {
            Self::Horizontal => (0, 1),
            Self::Vertical => (1, 0),
            Self::Diagonal => (1, 1),
            Self::AntiDiagonal => (1, -1),
        }
    }

    /// Every cell a line can start from, in search order.
    fn starts(self, rows: usize, cols: usize) -> Vec<Position> {
        let span = WIN_LENGTH - 1;
        let last_row = rows.saturating_sub(span);
        let last_col = cols.saturating_sub(span);

        match self {
            Self::Horizontal => (0..rows)
                .flat_map(|r| (0..last_col).map(move |c| Position::new(r, c)))
                .collect(),
            Self::Vertical => (0..cols)
                .flat_map(|c| (0..last_row).map(move |r| Position::new(r, c)))
                .collect(),
            Self::Diagonal => (0..last_row)
                .flat_map(|r| (0..last_col).map(move |c| Position::new(r, c)))
                .collect(),
            Self::AntiDiagonal => (0..last_row)
                .flat_map(|r| (span..cols).map(move |c| Position::new(r, c)))
                .collect(),
        }
    }

    /// The cells of the line starting at `start`.
    fn line(self, start: Position) -> [Position; WIN_LENGTH] {
        let (dr, dc) = self.step();
        std::array::from_fn(|k| {
            let k = k as isize;
            Position::new(
                (start.row as isize + k * dr) as usize,
                (start.col as isize + k * dc) as usize,
            )
        })
    }
}

/// The grid for one game.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    size: BoardSize,
    cells: Vec<Cell>,
    moves_made: usize,
}

impl Board {
    /// Create an empty board.
    pub fn new(size: BoardSize) -> Self {
        Self {
            size,
            cells: vec![Cell::Empty; size.cell_count()],
            moves_made: 0,
        }
    }

    /// Create an empty board from raw dimensions.
    pub fn with_dimensions(rows: usize, columns: usize) -> Result<Self, BoardSizeError> {
        Ok(Self::new(BoardSize::new(rows, columns)?))
    }

    pub fn rows(&self) -> usize {
        self.size.rows()
    }

    pub fn columns(&self) -> usize {
        self.size.columns()
    }

    pub fn moves_made(&self) -> usize {
        self.moves_made
    }

    /// Check if position is within the board.
    pub fn contains(&self, pos: Position) -> bool {
        pos.row < self.rows() && pos.col < self.columns()
    }

    /// Get cell at position.
    pub fn get(&self, pos: Position) -> Option<Cell> {
        if self.contains(pos) {
            Some(self.cells[self.offset(pos)])
        } else {
            None
        }
    }

    fn offset(&self, pos: Position) -> usize {
        pos.row * self.columns() + pos.col
    }

    /// Place `marker` at `pos`.
    ///
    /// Fails if the position is off the board or the cell is already taken.
    pub fn apply_move(&mut self, marker: Marker, pos: Position) -> Result<(), MoveError> {
        if !self.contains(pos) {
            debug!(marker = %marker, pos = %pos, "Move off the board");
            return Err(MoveError::OutOfBounds(pos.label()));
        }

        let offset = self.offset(pos);
        if !self.cells[offset].is_empty() {
            debug!(marker = %marker, pos = %pos, "Cell already occupied");
            return Err(MoveError::Occupied(pos.label()));
        }

        self.cells[offset] = Cell::Owned(marker);
        self.moves_made += 1;
        debug!(marker = %marker, pos = %pos, moves_made = self.moves_made, "Move applied");
        Ok(())
    }

    /// Find the first winning line for `marker`, in search order.
    pub fn find_line(&self, marker: Marker) -> Option<[Position; WIN_LENGTH]> {
        let owned = Cell::Owned(marker);

        Orientation::ALL.into_iter().find_map(|orientation| {
            orientation
                .starts(self.rows(), self.columns())
                .into_iter()
                .map(|start| orientation.line(start))
                .find(|line| line.iter().all(|p| self.get(*p) == Some(owned)))
        })
    }

    /// Check whether `marker` has a winning line.
    ///
    /// The first line found is marked [`Cell::WonLine`].
    pub fn detect_win(&mut self, marker: Marker) -> bool {
        let Some(line) = self.find_line(marker) else {
            return false;
        };

        for pos in line {
            let offset = self.offset(pos);
            self.cells[offset] = Cell::WonLine(marker);
        }
        debug!(marker = %marker, from = %line[0], to = %line[WIN_LENGTH - 1], "Winning line");
        true
    }

    /// Every cell has been played.
    pub fn is_full(&self) -> bool {
        self.moves_made == self.size.cell_count()
    }

    /// Render the board as text, with row letters and 1-based column numbers.
    pub fn render(&self) -> String {
        let cols = self.columns();

        let header: String = std::iter::once(" ".to_string())
            .chain((1..=cols).map(|i| format!("{:>4}", i)))
            .collect();
        let separator = format!("   {}", "--- ".repeat(cols));

        let mut out = String::new();
        out.push_str(&header);
        out.push('\n');
        out.push_str(&separator);
        out.push('\n');

        for (r, row) in self.cells.chunks(cols).enumerate() {
            let label = (b'A' + r as u8) as char;
            out.push(label);
            out.push_str(" |");
            for cell in row {
                out.push_str(&format!(" {} |", cell));
            }
            out.push(' ');
            out.push(label);
            out.push('\n');
            out.push_str(&separator);
            out.push('\n');
        }

        out.push_str(&header);
        out.push('\n');
        out
    }

    /// Convert board to JSON.
    pub fn to_json(&self) -> serde_json::Value {
        let rows: Vec<serde_json::Value> = self
            .cells
            .chunks(self.columns())
            .map(|row| {
                serde_json::Value::String(row.iter().map(Cell::symbol).collect())
            })
            .collect();

        serde_json::json!({
            "rows": self.rows(),
            "columns": self.columns(),
            "moves_made": self.moves_made,
            "cells": rows
        })
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
