//! Recomputing the stats aggregate from the match log.

use crate::logic::stats_updater::apply_match;
use crate::models::{LedgerError, MatchEntry, Roster, StatsTable};
use serde::Serialize;

/// A player whose stored numbers differ from the replayed ones.
#[derive(Clone, Debug, Eq, PartialEq, Serialize)]
pub struct Discrepancy {
    pub player: String,
    pub stored_wins: u32,
    pub replayed_wins: u32,
    pub stored_game_diff: i64,
    pub replayed_game_diff: i64,
}

/// Stats obtained by applying every match in order, starting from zero.
pub fn replay(roster: &Roster, matches: &[MatchEntry]) -> Result<StatsTable, LedgerError> {
    matches
        .iter()
        .try_fold(StatsTable::zeroed(roster), |stats, entry| {
            apply_match(&stats, entry)
        })
}

/// Players whose stored row disagrees with a replay of `matches`.
///
/// Manual corrections show up here too; an empty result means the aggregate
/// is exactly what the log implies.
pub fn audit(
    roster: &Roster,
    stats: &StatsTable,
    matches: &[MatchEntry],
) -> Result<Vec<Discrepancy>, LedgerError> {
    let replayed = replay(roster, matches)?;
    let found = replayed
        .rows()
        .iter()
        .filter_map(|expected| {
            let (stored_wins, stored_game_diff) = stats
                .get(&expected.player)
                .map(|r| (r.wins, r.game_diff))
                .unwrap_or((0, 0));
            if stored_wins == expected.wins && stored_game_diff == expected.game_diff {
                return None;
            }
            Some(Discrepancy {
                player: expected.player.clone(),
                stored_wins,
                replayed_wins: expected.wins,
                stored_game_diff,
                replayed_game_diff: expected.game_diff,
            })
        })
        .collect();
    Ok(found)
}
