//! Session statistics.
//!
//! Turns a finished game's outcome into counter updates for every
//! registered player, and renders the running tallies.

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::state::player::{Marker, PlayerRegistry, RegistryError, Tally};

/// Width the full name is right-aligned to in the report.
const NAME_WIDTH: usize = 28;

/// Terminal result of one game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Win(Marker),
    Tie,
}

impl Outcome {
    pub fn winner(&self) -> Option<Marker> {
        match self {
            Self::Win(m) => Some(*m),
            Self::Tie => None,
        }
    }

    pub fn is_tie(&self) -> bool {
        matches!(self, Self::Tie)
    }

    /// What this outcome means for one player.
    pub fn tally_for(&self, marker: Marker) -> Tally {
        match self {
            Self::Win(winner) if *winner == marker => Tally::Win,
            Self::Win(_) => Tally::Loss,
            Self::Tie => Tally::Draw,
        }
    }
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Win(m) => write!(f, "win for '{}'", m),
            Self::Tie => write!(f, "tie"),
        }
    }
}

/// Update every player's counters for a finished game.
///
/// On a win the winner gains a win and every other registered player a
/// loss, whether or not they moved. On a tie everyone gains a draw.
pub fn apply_outcome(registry: &mut PlayerRegistry, outcome: Outcome) -> Result<(), RegistryError> {
    if let Some(winner) = outcome.winner() {
        if !registry.contains(winner) {
            return Err(RegistryError::UnknownMarker(winner));
        }
    }

    for player in registry.players_mut() {
        let tally = outcome.tally_for(player.marker());
        player.record_result(tally);
        debug!(marker = %player.marker(), ?tally, "Result recorded");
    }

    Ok(())
}

/// Render the session tallies as a fixed-width table.
pub fn format_report(registry: &PlayerRegistry, total_games_played: u32) -> String {
    let rule = format!(
        "{}{}\n",
        " ".repeat(NAME_WIDTH + 2),
        ["- - - - - -"; 3].join(" ")
    );
    let pad = " ".repeat(9);

    let mut out = format!("Total game played = {}\n", total_games_played);
    out.push_str(&rule);
    out.push_str(&" ".repeat(NAME_WIDTH + 1));
    out.push_str("|    WIN    |    LOSS   |    DRAW   |\n");
    out.push_str(&rule);

    for player in registry.players() {
        out.push_str(&format!(
            "{:>width$} |{pad}{} |{pad}{} |{pad}{} |\n",
            player.full_name(),
            player.wins,
            player.losses,
            player.draws,
            width = NAME_WIDTH,
            pad = pad,
        ));
        out.push_str(&rule);
    }

    out
}
