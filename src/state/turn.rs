//! Turn sequencing.
//!
//! Markers take turns in alphabet order, wrapping after the last registered
//! player. The successor of marker `m` is the marker at position
//! `(index(m) + 1) mod player_count`; if no registered player holds that
//! marker, the first registered marker in alphabet order plays next.

use crate::state::player::{Marker, PlayerRegistry};

/// Fixed play order over the registered markers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TurnOrder {
    roster: Vec<Marker>,
}

impl TurnOrder {
    /// Build a turn order from any set of markers.
    pub fn new(mut roster: Vec<Marker>) -> Self {
        roster.sort();
        roster.dedup();
        Self { roster }
    }

    /// Turn order for everyone in the registry.
    pub fn from_registry(registry: &PlayerRegistry) -> Self {
        Self::new(registry.markers())
    }

    /// Marker that plays after `current`.
    ///
    /// Returns `None` only when the roster is empty, which means the game
    /// was set up without players.
    pub fn next(&self, current: Marker) -> Option<Marker> {
        if self.roster.is_empty() {
            return None;
        }

        let candidate = Marker::from_index((current.index() + 1) % self.roster.len());
        match candidate {
            Some(m) if self.contains(m) => Some(m),
            _ => self.roster.first().copied(),
        }
    }

    /// Check if a marker takes part in this order.
    pub fn contains(&self, marker: Marker) -> bool {
        self.roster.binary_search(&marker).is_ok()
    }

    /// Infinite sequence of turns starting with `start`.
    pub fn cycle(&self, start: Marker) -> impl Iterator<Item = Marker> + '_ {
        std::iter::successors(Some(start), move |m| self.next(*m))
    }

    pub fn markers(&self) -> &[Marker] {
        &self.roster
    }

    pub fn len(&self) -> usize {
        self.roster.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roster.is_empty()
    }
}
