//! Score text parsing: "6-4, 6-3" style results into game differentials.

use serde::Serialize;

/// Games won by each side in one set.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Serialize)]
pub struct SetScore {
    pub team_1: i64,
    pub team_2: i64,
}

impl SetScore {
    /// Team 1 games minus team 2 games, or None if that does not fit in an i64.
    pub fn diff(self) -> Option<i64> {
        self.team_1.checked_sub(self.team_2)
    }
}

/// Games count: one or more ASCII digits, nothing else.
fn parse_games(side: &str) -> Option<i64> {
    let side = side.trim();
    if side.is_empty() || !side.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    side.parse().ok()
}

/// Parse one "<int>-<int>" token. Surrounding whitespace is ignored; signs are not accepted.
fn parse_set(token: &str) -> Option<SetScore> {
    let (a, b) = token.trim().split_once('-')?;
    let set = SetScore {
        team_1: parse_games(a)?,
        team_2: parse_games(b)?,
    };
    set.diff().map(|_| set)
}

/// All well-formed sets in `text`, in order. Malformed tokens are skipped.
pub fn parse_sets(text: &str) -> Vec<SetScore> {
    text.split(',').filter_map(parse_set).collect()
}

/// Net game differential (team 1 minus team 2) over every well-formed set,
/// or None when the total does not fit in an i64.
pub fn checked_result_diff(text: &str) -> Option<i64> {
    parse_sets(text)
        .into_iter()
        .try_fold(0i64, |total, set| total.checked_add(set.diff()?))
}

/// Net game differential (team 1 minus team 2) over every well-formed set.
///
/// Empty input gives 0. Scores are taken as written: "20-1" counts as +19.
/// A total beyond the i64 range saturates.
pub fn parse_result_diff(text: &str) -> i64 {
    parse_sets(text)
        .into_iter()
        .filter_map(SetScore::diff)
        .fold(0, i64::saturating_add)
}

/// Sets won by (team 1, team 2). Drawn sets count for neither.
pub fn sets_won(text: &str) -> (u32, u32) {
    parse_sets(text)
        .into_iter()
        .fold((0, 0), |(one, two), set| {
            match set.team_1.cmp(&set.team_2) {
                std::cmp::Ordering::Greater => (one + 1, two),
                std::cmp::Ordering::Less => (one, two + 1),
                std::cmp::Ordering::Equal => (one, two),
            }
        })
}
