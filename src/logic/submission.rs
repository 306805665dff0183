//! Turning a submitted form into a validated match entry.

use crate::config::{Config, OTHER_PLACE};
use crate::logic::result_parser::{checked_result_diff, parse_sets, sets_won};
use crate::logic::stats_updater::validate_teams;
use crate::models::{LedgerError, MatchEntry, MatchForm, Team};
use chrono::NaiveDate;
use std::cmp::Ordering;
use uuid::Uuid;

fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Known venue, or the free text when "other" is picked.
fn resolve_place(config: &Config, form: &MatchForm) -> Result<String, LedgerError> {
    let place = non_blank(&form.place).ok_or(LedgerError::MissingPlace)?;
    if place.eq_ignore_ascii_case(OTHER_PLACE) {
        return non_blank(&form.place_other)
            .map(str::to_string)
            .ok_or(LedgerError::EmptyOtherPlace);
    }
    config
        .resolve_place(place)
        .map(str::to_string)
        .ok_or_else(|| LedgerError::UnknownPlace(place.to_string()))
}

/// Result text with at least one readable set. Anything else counts as no result.
fn readable_result(form: &MatchForm) -> Option<&str> {
    let text = non_blank(&form.result_text)?;
    if parse_sets(text).is_empty() {
        log::info!("Ignoring result text with no readable set: {:?}", text);
        return None;
    }
    Some(text)
}

/// Team that took more sets in `text`, if any did.
fn winner_by_sets(text: &str) -> Option<Team> {
    let (one, two) = sets_won(text);
    match one.cmp(&two) {
        Ordering::Greater => Some(Team::One),
        Ordering::Less => Some(Team::Two),
        Ordering::Equal => None,
    }
}

/// Explicit winner, else whoever took more sets in the result text.
/// An explicit pick that contradicts a decisive set count is rejected.
fn resolve_winner(form: &MatchForm, result_text: Option<&str>) -> Result<Team, LedgerError> {
    let by_sets = result_text.and_then(winner_by_sets);
    match (form.winner, by_sets) {
        (Some(picked), Some(by_sets)) if picked != by_sets => {
            Err(LedgerError::WinnerMismatch { picked, by_sets })
        }
        (Some(picked), _) => Ok(picked),
        (None, Some(by_sets)) => Ok(by_sets),
        (None, None) => Err(LedgerError::MissingWinner),
    }
}

/// Validate `form` and build the entry that would be appended to the log.
///
/// `today` fills in a missing date. A result text with readable sets decides
/// the differential (team 1 games minus team 2 games); otherwise `manual_diff`
/// is taken as the winner's margin and must be at least 1.
pub fn build_entry(
    config: &Config,
    form: &MatchForm,
    today: NaiveDate,
) -> Result<MatchEntry, LedgerError> {
    let (team_1, team_2) =
        validate_teams(&config.roster, config.roster_mode, &form.team_1, &form.team_2)?;
    let place = resolve_place(config, form)?;
    let result_text = readable_result(form);
    let winner = resolve_winner(form, result_text)?;

    let net_diff = match (result_text, form.manual_diff) {
        (Some(text), _) => {
            checked_result_diff(text).ok_or(LedgerError::DifferentialOverflow)?
        }
        (None, Some(margin)) if margin >= 1 => match winner {
            Team::One => i64::from(margin),
            Team::Two => -i64::from(margin),
        },
        (None, _) => return Err(LedgerError::MissingDifferential),
    };

    Ok(MatchEntry {
        id: Uuid::new_v4(),
        date: form.date.unwrap_or(today),
        time: form.time.unwrap_or(config.default_time),
        place,
        team_1,
        team_2,
        winner,
        result_text: result_text.map(str::to_string),
        net_diff,
    })
}
