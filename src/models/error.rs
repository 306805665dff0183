//! Errors returned by ledger and storage operations.

use crate::models::game::Team;
use thiserror::Error;

/// Why a submission or an access attempt was turned down.
///
/// Every variant except `Storage` is a pure rejection: nothing in memory or on
/// disk has been touched when it is returned.
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("{} needs exactly 2 players (has {size})", .team.label())]
    WrongTeamSize { team: Team, size: usize },

    #[error("{0} is selected more than once")]
    DuplicatePlayer(String),

    #[error("{0} is not one of the players")]
    UnknownPlayer(String),

    #[error("Both teams together must be all {expected} players")]
    IncompleteRoster { expected: usize },

    #[error("Pick a place for the match")]
    MissingPlace,

    #[error("{0} is not a known place")]
    UnknownPlace(String),

    #[error("Write the name of the other place")]
    EmptyOtherPlace,

    #[error("Enter a result or a game difference of at least 1")]
    MissingDifferential,

    #[error("Pick the winning team")]
    MissingWinner,

    #[error("{} is marked as winner but {} won more sets", .picked.label(), .by_sets.label())]
    WinnerMismatch { picked: Team, by_sets: Team },

    #[error("Game difference is too large to record")]
    DifferentialOverflow,

    #[error("Wrong password")]
    AccessDenied,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Failure to read or write one of the CSV files.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}
