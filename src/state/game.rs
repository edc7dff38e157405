//! Game state management.
//!
//! One game: a fresh board, the turn order and the status machine.
//!
//! ```text
//!            first move             move (no win, board not full)
//!  ┌───────┐ ─────────▶ ┌────────────┐ ◀──────┐
//!  │ Empty │            │ InProgress │ ───────┘
//!  └───────┘            └─────┬──────┘
//!                             │ winning move        board filled
//!                             ├──────────────▶ Won(m)
//!                             └──────────────▶ Tied
//! ```
//!
//! `Won` and `Tied` are terminal and refuse further moves.

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};

use crate::config::BoardSize;
use crate::state::board::{Board, MoveError, Position};
use crate::state::player::{Marker, PlayerRegistry};
use crate::state::stats::Outcome;
use crate::state::turn::TurnOrder;

/// Game state machine states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GameStatus {
    /// No move played yet
    #[default]
    Empty,
    /// At least one move played, no result
    InProgress,
    /// Won by the marker's player
    Won(Marker),
    /// Board filled without a winner
    Tied,
}

impl GameStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::InProgress => "in_progress",
            Self::Won(_) => "won",
            Self::Tied => "tied",
        }
    }

    /// Check if game accepts moves.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Empty | Self::InProgress)
    }

    /// Check if game is terminal (cannot change).
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Won(_) | Self::Tied)
    }

    /// Final outcome, once terminal.
    pub fn outcome(&self) -> Option<Outcome> {
        match self {
            Self::Won(m) => Some(Outcome::Win(*m)),
            Self::Tied => Some(Outcome::Tie),
            _ => None,
        }
    }
}

/// One game on one board.
#[derive(Debug, Clone)]
pub struct Game {
    board: Board,

    status: GameStatus,

    turns: TurnOrder,

    /// Marker whose move is awaited
    current: Marker,

    /// Accepted moves, in order
    history: Vec<(Marker, Position)>,

    /// When game was created
    pub created_at: DateTime<Utc>,

    /// When the first move was played
    pub started_at: Option<DateTime<Utc>>,

    /// When game reached a result
    pub ended_at: Option<DateTime<Utc>>,
}

impl Game {
    /// Create a game opened by `first`.
    pub fn new(size: BoardSize, turns: TurnOrder, first: Marker) -> Self {
        if !turns.contains(first) {
            warn!(first = %first, "Opening marker is not in the turn order");
        }

        Self {
            board: Board::new(size),
            status: GameStatus::Empty,
            turns,
            current: first,
            history: Vec::new(),
            created_at: Utc::now(),
            started_at: None,
            ended_at: None,
        }
    }

    /// Create a game for every registered player, opened by the fixed
    /// starting marker.
    pub fn for_registry(size: BoardSize, registry: &PlayerRegistry) -> Self {
        Self::new(size, TurnOrder::from_registry(registry), Marker::OPENING)
    }

    /// Play the current player's move at `pos`.
    ///
    /// On error the turn does not advance and the board is unchanged.
    pub fn play(&mut self, pos: Position) -> Result<GameStatus, MoveError> {
        if self.status.is_terminal() {
            return Err(MoveError::GameOver);
        }

        let marker = self.current;
        self.board.apply_move(marker, pos)?;
        self.history.push((marker, pos));
        debug!(marker = %marker, position = %pos, "Move accepted");

        if self.status == GameStatus::Empty {
            self.status = GameStatus::InProgress;
            self.started_at = Some(Utc::now());
        }

        if self.board.detect_win(marker) {
            self.finish(GameStatus::Won(marker));
        } else if self.board.is_full() {
            self.finish(GameStatus::Tied);
        } else {
            match self.turns.next(marker) {
                Some(next) => self.current = next,
                None => warn!(current = %marker, "No next marker; turn stays put"),
            }
        }

        Ok(self.status)
    }

    /// Parse a move token and play it.
    pub fn play_token(&mut self, token: &str) -> Result<GameStatus, MoveError> {
        let pos = Position::parse(token)?;
        self.play(pos)
    }

    fn finish(&mut self, status: GameStatus) {
        self.status = status;
        self.ended_at = Some(Utc::now());
        info!(
            status = status.as_str(),
            moves = self.board.moves_made(),
            "Game over"
        );
        debug!(board = %self.board.to_json(), "Final board");
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn outcome(&self) -> Option<Outcome> {
        self.status.outcome()
    }

    /// Marker whose move is awaited (the winner, once won).
    pub fn current_marker(&self) -> Marker {
        self.current
    }

    pub fn history(&self) -> &[(Marker, Position)] {
        &self.history
    }

    /// Time from first move to result.
    pub fn duration(&self) -> Option<chrono::Duration> {
        Some(self.ended_at? - self.started_at?)
    }

    /// Convert game state to JSON snapshot.
    pub fn to_json(&self) -> serde_json::Value {
        let history: Vec<serde_json::Value> = self
            .history
            .iter()
            .map(|(m, p)| serde_json::json!({"marker": m, "position": p.label()}))
            .collect();

        serde_json::json!({
            "status": self.status.as_str(),
            "outcome": self.outcome(),
            "current": self.current,
            "board": self.board.to_json(),
            "history": history,
            "created_at": self.created_at,
            "started_at": self.started_at,
            "ended_at": self.ended_at
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::board::Cell;
    use pretty_assertions::assert_eq;

    fn marker(c: char) -> Marker {
        Marker::from_char(c).unwrap()
    }

    fn registry(n: usize) -> PlayerRegistry {
        let names = [
            "Alice Smith",
            "Bob Jones",
            "Cara Lee",
            "Dan Park",
            "Eve Stone",
            "Finn Hale",
            "Gus Moore",
        ];
        let mut registry = PlayerRegistry::new();
        for name in &names[..n] {
            registry.register(name).unwrap();
        }
        registry
    }

    fn game(rows: usize, cols: usize, players: usize) -> Game {
        Game::for_registry(BoardSize::new(rows, cols).unwrap(), &registry(players))
    }

    fn play_all(game: &mut Game, tokens: &[&str]) -> GameStatus {
        let mut status = game.status();
        for token in tokens {
            status = game.play_token(token).unwrap();
        }
        status
    }

    #[test]
    fn test_game_new() {
        let g = game(4, 4, 3);
        assert_eq!(g.status(), GameStatus::Empty);
        assert_eq!(g.current_marker(), marker('c'));
        assert!(g.history().is_empty());
        assert!(g.started_at.is_none());
        assert!(g.outcome().is_none());
    }

    #[test]
    fn test_first_move_starts_game() {
        let mut g = game(4, 4, 3);
        let status = g.play_token("A1").unwrap();

        assert_eq!(status, GameStatus::InProgress);
        assert!(g.started_at.is_some());
        assert_eq!(g.current_marker(), marker('a'));
        assert_eq!(g.board().get(Position::new(0, 0)), Some(Cell::Owned(marker('c'))));
    }

    #[test]
    fn test_turns_rotate_from_c() {
        let mut g = game(5, 5, 4);
        let mut seen = Vec::new();
        for token in ["A1", "A3", "A5", "C1", "C3", "C5"] {
            seen.push(g.current_marker().as_char());
            g.play_token(token).unwrap();
        }
        assert_eq!(seen.into_iter().collect::<String>(), "cdabcd");
    }

    #[test]
    fn test_rejected_move_keeps_turn() {
        let mut g = game(4, 4, 3);
        g.play_token("A1").unwrap();
        let before = g.current_marker();

        assert_eq!(g.play_token("A1"), Err(MoveError::Occupied("A1".into())));
        assert_eq!(g.play_token("E1"), Err(MoveError::OutOfBounds("E1".into())));
        assert_eq!(g.play_token("A17"), Err(MoveError::OutOfBounds("A17".into())));
        assert_eq!(g.play_token("x"), Err(MoveError::TooShort));

        assert_eq!(g.current_marker(), before);
        assert_eq!(g.board().moves_made(), 1);
        assert_eq!(g.history().len(), 1);
    }

    #[test]
    fn test_diagonal_win() {
        // Order c, a, b. Alice (a) takes A1, B2, C3.
        let mut g = game(4, 4, 3);
        let status = play_all(&mut g, &["D4", "A1", "A4", "B1", "B2", "B4", "C1", "C3"]);

        assert_eq!(status, GameStatus::Won(marker('a')));
        assert_eq!(g.outcome(), Some(Outcome::Win(marker('a'))));
        for pos in [Position::new(0, 0), Position::new(1, 1), Position::new(2, 2)] {
            assert_eq!(g.board().get(pos), Some(Cell::WonLine(marker('a'))));
        }
        assert!(g.ended_at.is_some());
        assert!(g.duration().is_some());
    }

    #[test]
    fn test_no_moves_after_win() {
        let mut g = game(4, 4, 3);
        play_all(&mut g, &["D4", "A1", "A4", "B1", "B2", "B4", "C1", "C3"]);

        assert_eq!(g.play_token("D1"), Err(MoveError::GameOver));
        assert_eq!(g.board().moves_made(), 8);
    }

    #[test]
    fn test_tie_on_full_board() {
        // Four players, order c, d, a, b. Final layout:
        //   a b c d
        //   c d a b
        //   a b c d
        //   c d a b
        let mut g = game(4, 4, 4);
        let tokens = [
            "A3", "A4", "A1", "A2", //
            "B1", "B2", "B3", "B4", //
            "C3", "C4", "C1", "C2", //
            "D1", "D2", "D3", "D4",
        ];
        let status = play_all(&mut g, &tokens);

        assert_eq!(status, GameStatus::Tied);
        assert_eq!(g.outcome(), Some(Outcome::Tie));
        assert!(g.board().is_full());
        assert_eq!(g.play_token("A1"), Err(MoveError::GameOver));
    }

    #[test]
    fn test_status_helpers() {
        assert!(GameStatus::Empty.is_active());
        assert!(GameStatus::InProgress.is_active());
        assert!(GameStatus::Tied.is_terminal());
        assert!(GameStatus::Won(marker('a')).is_terminal());
        assert_eq!(GameStatus::Won(marker('a')).as_str(), "won");
        assert_eq!(GameStatus::InProgress.outcome(), None);
    }

    #[test]
    fn test_to_json() {
        let mut g = game(4, 4, 3);
        g.play_token("B2").unwrap();

        let json = g.to_json();
        assert_eq!(json["status"], "in_progress");
        assert_eq!(json["current"], "a");
        assert_eq!(json["history"][0]["marker"], "c");
        assert_eq!(json["history"][0]["position"], "B2");
        assert!(json["outcome"].is_null());
    }
}
