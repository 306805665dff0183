//! Data structures for the tracker: roster, stats, matches, and errors.

mod error;
mod game;
mod player;

pub use error::{LedgerError, StorageError};
pub use game::{MatchEntry, MatchForm, MatchId, Team};
pub use player::{PlayerStats, Roster, RosterMode, StatsTable, DEFAULT_PLAYERS};
