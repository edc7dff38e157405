//! Player registry.
//!
//! Players register once per session. Each one gets the next marker from
//! [`MARKER_ALPHABET`] and keeps running win/loss/draw counters for the
//! whole session.
//!
//! # Markers
//!
//! ```text
//! registration order:   1st   2nd   3rd   4th   5th   6th   7th
//! marker:                a     b     c     d     e     f     g
//! registry slot:         0     1     2     3     4     5     6
//! ```
//!
//! A marker's position in the alphabet is also the player's slot in the
//! registry, so marker lookups are direct indexing.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::config::{MARKER_ALPHABET, STARTING_MARKER};

/// A player's marker: one lowercase letter of [`MARKER_ALPHABET`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Marker(u8);

impl Marker {
    /// Marker that opens every game.
    pub const OPENING: Marker = Marker(STARTING_MARKER as u8 - b'a');

    /// Marker for a registry slot.
    pub fn from_index(index: usize) -> Option<Self> {
        if index < MARKER_ALPHABET.len() {
            Some(Self(index as u8))
        } else {
            None
        }
    }

    /// Marker for a letter of the alphabet. Uppercase letters are not markers.
    pub fn from_char(c: char) -> Option<Self> {
        MARKER_ALPHABET
            .chars()
            .position(|m| m == c)
            .and_then(Self::from_index)
    }

    /// Registry slot of this marker.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// The lowercase letter placed on the board.
    pub fn as_char(self) -> char {
        (b'a' + self.0) as char
    }

    /// The uppercase letter shown on a winning line.
    pub fn winning_char(self) -> char {
        self.as_char().to_ascii_uppercase()
    }
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl Serialize for Marker {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_char(self.as_char())
    }
}

impl<'de> Deserialize<'de> for Marker {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let c = char::deserialize(deserializer)?;
        Marker::from_char(c)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown marker '{}'", c)))
    }
}

/// Per-player result of one finished game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Tally {
    Win,
    Loss,
    Draw,
}

/// Why a full name was refused.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NameError {
    #[error("Invalid name format: '{0}' is not a letter or a space")]
    InvalidCharacter(char),

    #[error("Invalid name format: expected a first and a last name, found {0} word(s)")]
    WordCount(usize),
}

/// Validate a full name and return it normalized to `"First Last"`.
///
/// Only ASCII letters and spaces are allowed. Leading, trailing and
/// repeated spaces are ignored; what remains must be exactly two words.
pub fn validate_full_name(name: &str) -> Result<String, NameError> {
    if let Some(bad) = name
        .chars()
        .find(|c| !c.is_ascii_alphabetic() && *c != ' ')
    {
        return Err(NameError::InvalidCharacter(bad));
    }

    let words: Vec<&str> = name.split(' ').filter(|w| !w.is_empty()).collect();
    if words.len() != 2 {
        return Err(NameError::WordCount(words.len()));
    }

    Ok(words.join(" "))
}

/// A registered player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Player {
    full_name: String,
    marker: Marker,
    pub wins: u32,
    pub losses: u32,
    pub draws: u32,
}

impl Player {
    /// Create a player with zeroed counters. The name is validated and normalized.
    pub fn new(full_name: &str, marker: Marker) -> Result<Self, NameError> {
        Ok(Self {
            full_name: validate_full_name(full_name)?,
            marker,
            wins: 0,
            losses: 0,
            draws: 0,
        })
    }

    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Text before the first space of the full name.
    pub fn first_name(&self) -> &str {
        self.full_name
            .split(' ')
            .next()
            .unwrap_or(&self.full_name)
    }

    pub fn marker(&self) -> Marker {
        self.marker
    }

    /// Bump the counter matching `tally` by one.
    pub fn record_result(&mut self, tally: Tally) {
        match tally {
            Tally::Win => self.wins += 1,
            Tally::Loss => self.losses += 1,
            Tally::Draw => self.draws += 1,
        }
    }

    /// Games this player has finished in the session.
    pub fn games_played(&self) -> u32 {
        self.wins + self.losses + self.draws
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::json!({
            "full_name": self.full_name,
            "marker": self.marker,
            "wins": self.wins,
            "losses": self.losses,
            "draws": self.draws
        })
    }
}

/// Registry errors.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error(transparent)]
    Name(#[from] NameError),

    #[error("Registry is full")]
    Full,

    #[error("No player holds marker '{0}'")]
    UnknownMarker(Marker),
}

/// Players in registration order, indexed by marker.
#[derive(Debug, Clone, Default)]
pub struct PlayerRegistry {
    players: Vec<Player>,
}

impl PlayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a player under the next free marker.
    pub fn register(&mut self, full_name: &str) -> Result<&Player, RegistryError> {
        let marker = Marker::from_index(self.players.len()).ok_or(RegistryError::Full)?;
        let player = Player::new(full_name, marker)?;

        info!(marker = %marker, name = %player.full_name(), "Player registered");

        self.players.push(player);
        Ok(&self.players[marker.index()])
    }

    /// Get a player by marker.
    pub fn get(&self, marker: Marker) -> Option<&Player> {
        self.players.get(marker.index())
    }

    /// Get a mutable player by marker.
    pub fn get_mut(&mut self, marker: Marker) -> Option<&mut Player> {
        self.players.get_mut(marker.index())
    }

    /// Check if a marker belongs to a registered player.
    pub fn contains(&self, marker: Marker) -> bool {
        marker.index() < self.players.len()
    }

    /// Record a result for one player.
    pub fn record_result(&mut self, marker: Marker, tally: Tally) -> Result<(), RegistryError> {
        let player = self
            .get_mut(marker)
            .ok_or(RegistryError::UnknownMarker(marker))?;
        player.record_result(tally);
        Ok(())
    }

    /// All players in registration order.
    pub fn players(&self) -> impl Iterator<Item = &Player> {
        self.players.iter()
    }

    /// All players, mutable, in registration order.
    pub fn players_mut(&mut self) -> impl Iterator<Item = &mut Player> {
        self.players.iter_mut()
    }

    /// Registered markers in registration order.
    pub fn markers(&self) -> Vec<Marker> {
        self.players.iter().map(|p| p.marker).collect()
    }

    pub fn len(&self) -> usize {
        self.players.len()
    }

    pub fn is_empty(&self) -> bool {
        self.players.is_empty()
    }

    pub fn to_json(&self) -> serde_json::Value {
        serde_json::Value::Array(self.players.iter().map(Player::to_json).collect())
    }
}
