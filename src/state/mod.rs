//! Game-state engine.
//!
//! - `player` - Player registry (names, markers, counters)
//! - `board` - Grid, moves, win and tie detection
//! - `turn` - Turn order over the registered markers
//! - `game` - One game's status machine
//! - `stats` - Counter updates per outcome and the session report
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                          Session                             │
//! │                                                              │
//! │  ┌──────────────────┐        ┌────────────────────────────┐  │
//! │  │  PlayerRegistry  │        │  Game (one per round)      │  │
//! │  │                  │        │                            │  │
//! │  │  marker →        │ ─────▶ │  Board    TurnOrder        │  │
//! │  │    Player        │ roster │  status   current marker   │  │
//! │  └────────▲─────────┘        └─────────────┬──────────────┘  │
//! │           │                                │ Outcome         │
//! │           │        ┌─────────────┐         │                 │
//! │           └─────── │    stats    │ ◀───────┘                 │
//! │          counters  └─────────────┘                           │
//! │                                                              │
//! │  games_played, history                                       │
//! └──────────────────────────────────────────────────────────────┘
//! ```

pub mod board;
pub mod game;
pub mod player;
pub mod stats;
pub mod turn;

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::config::BoardSize;

// Re-export commonly used types
pub use board::{Board, Cell, MoveError, Orientation, Position};
pub use game::{Game, GameStatus};
pub use player::{Marker, NameError, Player, PlayerRegistry, RegistryError, Tally};
pub use stats::{apply_outcome, format_report, Outcome};
pub use turn::TurnOrder;

/// Session errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("Game has not finished")]
    GameNotFinished,

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// Everything that lives for the whole session: the players and the
/// running game count.
#[derive(Debug, Clone)]
pub struct Session {
    registry: PlayerRegistry,

    /// Completed games (wins and ties)
    games_played: u32,

    /// Outcome of every completed game, oldest first
    history: Vec<Outcome>,

    /// When the session began
    pub started_at: DateTime<Utc>,
}

impl Session {
    pub fn new(registry: PlayerRegistry) -> Self {
        Self {
            registry,
            games_played: 0,
            history: Vec::new(),
            started_at: Utc::now(),
        }
    }

    /// Start a fresh game for every registered player.
    pub fn new_game(&self, size: BoardSize) -> Game {
        info!(
            rows = size.rows(),
            columns = size.columns(),
            first = %Marker::OPENING,
            "New game"
        );
        Game::for_registry(size, &self.registry)
    }

    /// Record a finished game. The game is consumed, so it counts once.
    ///
    /// ```compile_fail
    /// # use multitoe::{config::BoardSize, PlayerRegistry, Session};
    /// # let mut session = Session::new(PlayerRegistry::new());
    /// let game = session.new_game(BoardSize::new(4, 4).unwrap());
    /// session.record_game(game);
    /// session.record_game(game);
    /// ```
    pub fn record_game(&mut self, game: Game) -> Result<Outcome, SessionError> {
        let outcome = game.outcome().ok_or(SessionError::GameNotFinished)?;
        self.record_outcome(outcome)?;
        Ok(outcome)
    }

    /// Apply an outcome to the counters and count the game.
    pub fn record_outcome(&mut self, outcome: Outcome) -> Result<(), RegistryError> {
        apply_outcome(&mut self.registry, outcome)?;
        self.games_played += 1;
        self.history.push(outcome);

        info!(%outcome, games_played = self.games_played, "Game recorded");
        debug!(players = %self.registry.to_json(), "Standings");
        Ok(())
    }

    pub fn registry(&self) -> &PlayerRegistry {
        &self.registry
    }

    pub fn games_played(&self) -> u32 {
        self.games_played
    }

    pub fn history(&self) -> &[Outcome] {
        &self.history
    }

    /// Player by marker.
    pub fn player(&self, marker: Marker) -> Option<&Player> {
        self.registry.get(marker)
    }

    /// Session tallies as a table.
    pub fn report(&self) -> String {
        format_report(&self.registry, self.games_played)
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "games_played": self.games_played,
            "players": self.registry.to_json(),
            "history": self.history,
            "started_at": self.started_at
        })
    }
}
