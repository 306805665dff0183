//! Tracker business logic: result parsing, stats updates, submissions, replay.

mod replay;
mod result_parser;
mod stats_updater;
mod submission;

pub use replay::{audit, replay, Discrepancy};
pub use result_parser::{checked_result_diff, parse_result_diff, parse_sets, sets_won, SetScore};
pub use stats_updater::{apply_match, validate_teams};
pub use submission::build_entry;
