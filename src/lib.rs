//! Padel tracker: library with models, business logic, and CSV storage.

pub mod auth;
pub mod config;
pub mod ledger;
pub mod logic;
pub mod models;
pub mod storage;

pub use auth::{AccessGrant, PasswordGate, SessionToken};
pub use config::Config;
pub use ledger::{ChartSeries, Ledger};
pub use logic::{
    apply_match, audit, build_entry, checked_result_diff, parse_result_diff, parse_sets, replay,
    sets_won, validate_teams, Discrepancy, SetScore,
};
pub use models::{
    LedgerError, MatchEntry, MatchForm, MatchId, PlayerStats, Roster, RosterMode, StatsTable,
    StorageError, Team, DEFAULT_PLAYERS,
};
pub use storage::CsvStore;
