//! Roster, PlayerStats, and the StatsTable aggregate.

use serde::{Deserialize, Serialize};

/// The four friends who play together.
pub const DEFAULT_PLAYERS: [&str; 4] = ["Juan", "Duro", "Kareka", "Oscar"];

/// How strictly a match must cover the roster.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RosterMode {
    /// Both teams together are exactly the whole roster.
    #[default]
    Strict,
    /// Two disjoint pairs of roster members.
    Relaxed,
}

/// Closed list of player names. Order is the order rows are kept in.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    names: Vec<String>,
}

impl Default for Roster {
    fn default() -> Self {
        Self::new(DEFAULT_PLAYERS)
    }
}

impl Roster {
    /// Build a roster from names. Blank names and case-insensitive repeats are dropped.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut kept: Vec<String> = Vec::new();
        for name in names {
            let name: String = name.into();
            let name = name.trim();
            if name.is_empty() || kept.iter().any(|k| k.eq_ignore_ascii_case(name)) {
                continue;
            }
            kept.push(name.to_string());
        }
        Self { names: kept }
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Roster spelling of `name`, matched case-insensitively after trimming.
    pub fn resolve(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.names
            .iter()
            .find(|n| n.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }
}

/// Cumulative statistics for one player.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct PlayerStats {
    pub player: String,
    pub wins: u32,
    /// Sum of the signed per-match differentials from this player's side.
    pub game_diff: i64,
}

impl PlayerStats {
    pub fn new(player: impl Into<String>) -> Self {
        Self {
            player: player.into(),
            wins: 0,
            game_diff: 0,
        }
    }

    /// Record a won match.
    pub fn add_win(&mut self) {
        self.wins = self.wins.saturating_add(1);
    }

    /// Add `diff` to the running differential. Returns false, leaving it unchanged, on overflow.
    #[must_use]
    pub fn add_diff(&mut self, diff: i64) -> bool {
        match self.game_diff.checked_add(diff) {
            Some(total) => {
                self.game_diff = total;
                true
            }
            None => false,
        }
    }
}

/// One stats row per roster member, in roster order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct StatsTable {
    rows: Vec<PlayerStats>,
}

impl StatsTable {
    /// All players at zero wins and zero differential.
    pub fn zeroed(roster: &Roster) -> Self {
        Self {
            rows: roster.names().iter().map(PlayerStats::new).collect(),
        }
    }

    /// Build from loaded rows, keeping only roster members and adding any that are missing.
    pub fn from_rows(roster: &Roster, rows: Vec<PlayerStats>) -> Self {
        let mut table = Self::zeroed(roster);
        for row in rows {
            let Some(name) = roster.resolve(&row.player) else {
                log::warn!("Dropping stats row for unknown player {:?}", row.player);
                continue;
            };
            let name = name.to_string();
            if let Some(slot) = table.get_mut(&name) {
                slot.wins = row.wins;
                slot.game_diff = row.game_diff;
            }
        }
        table
    }

    pub fn rows(&self) -> &[PlayerStats] {
        &self.rows
    }

    pub fn get(&self, player: &str) -> Option<&PlayerStats> {
        self.rows
            .iter()
            .find(|r| r.player.eq_ignore_ascii_case(player.trim()))
    }

    pub fn get_mut(&mut self, player: &str) -> Option<&mut PlayerStats> {
        self.rows
            .iter_mut()
            .find(|r| r.player.eq_ignore_ascii_case(player.trim()))
    }

    /// Rows sorted by wins, then differential, both descending. Ties keep roster order.
    pub fn ranked(&self) -> Vec<PlayerStats> {
        let mut rows = self.rows.clone();
        rows.sort_by(|a, b| {
            b.wins
                .cmp(&a.wins)
                .then_with(|| b.game_diff.cmp(&a.game_diff))
        });
        rows
    }

    /// Overwrite one player's numbers. This is the only path by which wins may go down.
    /// Returns false if the player is not in the table.
    pub fn correct(&mut self, player: &str, wins: u32, game_diff: i64) -> bool {
        match self.get_mut(player) {
            Some(row) => {
                row.wins = wins;
                row.game_diff = game_diff;
                true
            }
            None => false,
        }
    }

    /// Sum of every player's differential. Widened to i128 so corrected rows near the i64 limits still add up.
    pub fn total_diff(&self) -> i128 {
        self.rows.iter().map(|r| i128::from(r.game_diff)).sum()
    }

    pub fn total_wins(&self) -> u64 {
        self.rows.iter().map(|r| u64::from(r.wins)).sum()
    }
}
