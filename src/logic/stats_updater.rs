//! Team validation and applying one match to the stats table.

use crate::models::{LedgerError, MatchEntry, Roster, RosterMode, StatsTable, Team};

/// Check a team selection and return both teams in roster spelling.
///
/// Rules, checked in order:
/// 1. every name is a roster member;
/// 2. each team has exactly two players;
/// 3. no player appears twice, within a team or across teams;
/// 4. in strict mode, both teams together are the whole roster.
pub fn validate_teams(
    roster: &Roster,
    mode: RosterMode,
    team_1: &[String],
    team_2: &[String],
) -> Result<([String; 2], [String; 2]), LedgerError> {
    let resolve = |names: &[String]| -> Result<Vec<String>, LedgerError> {
        names
            .iter()
            .map(|n| {
                roster
                    .resolve(n)
                    .map(str::to_string)
                    .ok_or_else(|| LedgerError::UnknownPlayer(n.trim().to_string()))
            })
            .collect()
    };
    let one = resolve(team_1)?;
    let two = resolve(team_2)?;

    for (team, players) in [(Team::One, &one), (Team::Two, &two)] {
        if players.len() != 2 {
            return Err(LedgerError::WrongTeamSize {
                team,
                size: players.len(),
            });
        }
    }

    let mut seen: Vec<&str> = Vec::with_capacity(4);
    for p in one.iter().chain(two.iter()) {
        if seen.contains(&p.as_str()) {
            return Err(LedgerError::DuplicatePlayer(p.clone()));
        }
        seen.push(p.as_str());
    }

    if mode == RosterMode::Strict
        && (seen.len() != roster.len() || roster.names().iter().any(|n| !seen.contains(&n.as_str())))
    {
        return Err(LedgerError::IncompleteRoster {
            expected: roster.len(),
        });
    }

    Ok(([one[0].clone(), one[1].clone()], [two[0].clone(), two[1].clone()]))
}

/// Stats after `entry` is applied to `stats`. The input table is left as is.
///
/// Winners get one more win. Team 1 players add `net_diff`, team 2 players
/// subtract it, so a winner with the better games total goes up by the
/// magnitude and the losers go down by the same amount. A differential that
/// would push any player past the i64 range rejects the whole match.
pub fn apply_match(stats: &StatsTable, entry: &MatchEntry) -> Result<StatsTable, LedgerError> {
    let mut next = stats.clone();
    for team in [Team::One, Team::Two] {
        let diff = entry
            .diff_for(team)
            .ok_or(LedgerError::DifferentialOverflow)?;
        let won = entry.winner == team;
        for player in entry.team(team) {
            match next.get_mut(player) {
                Some(row) => {
                    if !row.add_diff(diff) {
                        return Err(LedgerError::DifferentialOverflow);
                    }
                    if won {
                        row.add_win();
                    }
                }
                None => log::warn!("Match {} names {} who has no stats row", entry.id, player),
            }
        }
    }
    Ok(next)
}
