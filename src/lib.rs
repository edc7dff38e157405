//! Multitoe Library
//!
//! State engine and console session for tic-tac-toe with 3 to 7 players on
//! boards from 4×4 up to 13×16.
//!
//! # Overview
//!
//! - **Player Registry** - Validated full names, one marker per player
//!   (`a` through `g`), session-wide win/loss/draw counters.
//!
//! - **Board Engine** - Move parsing and validation, three-in-a-row
//!   detection in four orientations, tie detection, text rendering.
//!
//! - **Turn Sequencer** - Alphabetical rotation over the registered markers,
//!   starting from `c` every game.
//!
//! - **Statistics** - Outcome routing to every player's counters and the
//!   fixed-width report.
//!
//! - **Session** - Owns the registry and the games-played counter across
//!   games. The [`console`] module drives it over any reader and writer.
//!
//! # Design Principles
//!
//! 1. **Errors are values** - Invalid names, sizes and moves come back as
//!    typed errors and leave state untouched.
//!
//! 2. **Markers index players** - A marker's letter is its registry slot.
//!
//! 3. **No global state** - Everything lives in an explicit [`Session`].
//!
//! # Example
//!
//! ```rust
//! use multitoe::config::BoardSize;
//! use multitoe::{GameStatus, Marker, PlayerRegistry, Session};
//!
//! let mut registry = PlayerRegistry::new();
//! registry.register("Alice Smith").unwrap();
//! registry.register("Bob Jones").unwrap();
//! registry.register("Cara Lee").unwrap();
//!
//! let mut session = Session::new(registry);
//! let mut game = session.new_game(BoardSize::new(4, 4).unwrap());
//!
//! // Cara (c) opens, then Alice (a), then Bob (b).
//! for token in ["D4", "A1", "A4", "B1", "B2", "B4", "C1", "C3"] {
//!     game.play_token(token).unwrap();
//! }
//! assert_eq!(game.status(), GameStatus::Won(Marker::from_char('a').unwrap()));
//!
//! session.record_game(game).unwrap();
//! assert_eq!(session.games_played(), 1);
//! println!("{}", session.report());
//! ```

pub mod config;
pub mod console;
pub mod state;

// Re-export everything from state module at crate root
pub use state::*;
