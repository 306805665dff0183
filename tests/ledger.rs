//! Integration tests for committing matches through the ledger.

use chrono::NaiveDate;
use padel_tracker::{
    replay, AccessGrant, Config, Ledger, LedgerError, MatchForm, PasswordGate, Team,
};
use std::fs;
use tempfile::TempDir;

fn open() -> (TempDir, Ledger, AccessGrant) {
    let dir = TempDir::new().unwrap();
    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let ledger = Ledger::open(config).unwrap();
    let grant = PasswordGate::new("secret").grant("secret").unwrap();
    (dir, ledger, grant)
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

fn form(team_1: [&str; 2], team_2: [&str; 2]) -> MatchForm {
    MatchForm {
        place: Some("Club Central".to_string()),
        team_1: team_1.iter().map(|s| s.to_string()).collect(),
        team_2: team_2.iter().map(|s| s.to_string()).collect(),
        ..MatchForm::default()
    }
}

// The match log only exists after the first commit; a missing file reads as empty.
fn files(dir: &TempDir) -> (Vec<u8>, Vec<u8>) {
    (
        fs::read(dir.path().join("padel_data.csv")).unwrap(),
        fs::read(dir.path().join("padel_matches.csv")).unwrap_or_default(),
    )
}

#[test]
fn result_text_sets_differential_and_winner() {
    let (_dir, mut ledger, grant) = open();
    let mut f = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
    f.result_text = Some("6-4, 6-3".to_string());

    let entry = ledger.record_match(&grant, &f, today()).unwrap();
    assert_eq!(entry.winner, Team::One);
    assert_eq!(entry.net_diff, 4);
    assert_eq!(entry.date, today());
    assert_eq!(entry.time.format("%H:%M").to_string(), "20:00");

    let stats = ledger.stats();
    assert_eq!(stats.get("Juan").unwrap().wins, 1);
    assert_eq!(stats.get("Juan").unwrap().game_diff, 4);
    assert_eq!(stats.get("Oscar").unwrap().wins, 0);
    assert_eq!(stats.get("Oscar").unwrap().game_diff, -4);
    assert_eq!(ledger.matches().len(), 1);
}

#[test]
fn manual_margin_is_signed_by_winner() {
    let (_dir, mut ledger, grant) = open();
    let mut f = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
    f.winner = Some(Team::Two);
    f.manual_diff = Some(5);

    let entry = ledger.record_match(&grant, &f, today()).unwrap();
    assert_eq!(entry.net_diff, -5);
    assert_eq!(ledger.stats().get("Kareka").unwrap().game_diff, 5);
    assert_eq!(ledger.stats().get("Duro").unwrap().game_diff, -5);
}

#[test]
fn zero_or_missing_margin_is_rejected() {
    let (_dir, mut ledger, grant) = open();
    let mut f = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
    f.winner = Some(Team::One);
    assert!(matches!(
        ledger.record_match(&grant, &f, today()),
        Err(LedgerError::MissingDifferential)
    ));
    f.manual_diff = Some(0);
    assert!(matches!(
        ledger.record_match(&grant, &f, today()),
        Err(LedgerError::MissingDifferential)
    ));
}

#[test]
fn winner_is_required_when_sets_are_level() {
    let (_dir, mut ledger, grant) = open();
    let mut f = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
    f.result_text = Some("6-4, 4-6".to_string());
    assert!(matches!(
        ledger.record_match(&grant, &f, today()),
        Err(LedgerError::MissingWinner)
    ));
}

#[test]
fn other_place_needs_text() {
    let (_dir, mut ledger, grant) = open();
    let mut f = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
    f.manual_diff = Some(2);
    f.winner = Some(Team::One);
    f.place = Some("other".to_string());
    assert!(matches!(
        ledger.record_match(&grant, &f, today()),
        Err(LedgerError::EmptyOtherPlace)
    ));

    f.place_other = Some("  Playa  ".to_string());
    let entry = ledger.record_match(&grant, &f, today()).unwrap();
    assert_eq!(entry.place, "Playa");

    f.place = Some("Nowhere".to_string());
    assert!(matches!(
        ledger.record_match(&grant, &f, today()),
        Err(LedgerError::UnknownPlace(_))
    ));
}

#[test]
fn rejected_match_leaves_memory_and_files_unchanged() {
    let (dir, mut ledger, grant) = open();
    let mut ok = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
    ok.result_text = Some("6-2, 6-2".to_string());
    ledger.record_match(&grant, &ok, today()).unwrap();

    let stats_before = ledger.stats().clone();
    let matches_before = ledger.matches().to_vec();
    let files_before = files(&dir);

    let mut bad = form(["Juan", "Duro"], ["Juan", "Oscar"]);
    bad.result_text = Some("6-0".to_string());
    assert!(matches!(
        ledger.record_match(&grant, &bad, today()),
        Err(LedgerError::DuplicatePlayer(_))
    ));

    assert_eq!(ledger.stats(), &stats_before);
    assert_eq!(ledger.matches(), matches_before.as_slice());
    assert_eq!(files(&dir), files_before);
}

#[test]
fn replaying_the_log_reproduces_the_stats() {
    let (_dir, mut ledger, grant) = open();
    let results = [
        (["Juan", "Duro"], ["Kareka", "Oscar"], "6-4, 6-3"),
        (["Juan", "Kareka"], ["Duro", "Oscar"], "2-6, 6-7"),
        (["Oscar", "Juan"], ["Duro", "Kareka"], "7-6, 0-6, 7-6"),
        (["Duro", "Oscar"], ["Kareka", "Juan"], "6-1, bad, 6-0"),
    ];
    for (one, two, text) in results {
        let mut f = form(one, two);
        f.result_text = Some(text.to_string());
        ledger.record_match(&grant, &f, today()).unwrap();
    }

    let replayed = replay(&ledger.config().roster, ledger.matches()).unwrap();
    assert_eq!(&replayed, ledger.stats());
    assert!(ledger.audit().unwrap().is_empty());

    // Every match adds +d for two players and -d for the other two.
    assert_eq!(ledger.stats().total_diff(), 0);
    assert_eq!(ledger.stats().total_wins(), 8);
}

#[test]
fn reopening_loads_what_was_committed() {
    let (dir, mut ledger, grant) = open();
    let mut f = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
    f.result_text = Some("6-4".to_string());
    f.place = Some("other".to_string());
    f.place_other = Some("Casa de Juan".to_string());
    let entry = ledger.record_match(&grant, &f, today()).unwrap();

    let config = Config {
        data_dir: dir.path().to_path_buf(),
        ..Config::default()
    };
    let reopened = Ledger::open(config).unwrap();
    assert_eq!(reopened.matches(), &[entry]);
    assert_eq!(reopened.stats(), ledger.stats());
}

#[test]
fn correction_then_rebuild_returns_to_the_log() {
    let (_dir, mut ledger, grant) = open();
    let mut f = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
    f.result_text = Some("6-3".to_string());
    ledger.record_match(&grant, &f, today()).unwrap();

    let row = ledger.correct_player(&grant, "juan", 0, 10).unwrap();
    assert_eq!(row.player, "Juan");
    assert_eq!(row.wins, 0);
    let audit = ledger.audit().unwrap();
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].replayed_wins, 1);
    assert_eq!(audit[0].stored_game_diff, 10);

    ledger.rebuild(&grant).unwrap();
    assert!(ledger.audit().unwrap().is_empty());
    assert_eq!(ledger.stats().get("Juan").unwrap().game_diff, 3);
}

#[test]
fn history_is_newest_first() {
    let (_dir, mut ledger, grant) = open();
    for day in [3, 1, 2] {
        let mut f = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
        f.result_text = Some("6-4".to_string());
        f.date = NaiveDate::from_ymd_opt(2024, 6, day);
        ledger.record_match(&grant, &f, today()).unwrap();
    }
    let days: Vec<u32> = ledger
        .matches_newest_first()
        .iter()
        .map(|m| chrono::Datelike::day(&m.date))
        .collect();
    assert_eq!(days, [3, 2, 1]);
}

#[test]
fn chart_follows_ranking() {
    let (_dir, mut ledger, grant) = open();
    let mut f = form(["Kareka", "Oscar"], ["Juan", "Duro"]);
    f.result_text = Some("6-0".to_string());
    ledger.record_match(&grant, &f, today()).unwrap();

    let chart = ledger.chart();
    assert_eq!(chart.labels, ["Kareka", "Oscar", "Juan", "Duro"]);
    assert_eq!(chart.wins, [1, 1, 0, 0]);
    assert_eq!(chart.game_diff, [6, 6, -6, -6]);
}

#[test]
fn winner_contradicting_the_sets_is_rejected() {
    let (dir, mut ledger, grant) = open();
    let files_before = files(&dir);
    let mut f = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
    f.result_text = Some("4-6, 3-6".to_string());
    f.winner = Some(Team::One);
    assert!(matches!(
        ledger.record_match(&grant, &f, today()),
        Err(LedgerError::WinnerMismatch { picked: Team::One, by_sets: Team::Two })
    ));
    assert!(ledger.matches().is_empty());
    assert_eq!(files(&dir), files_before);

    f.winner = Some(Team::Two);
    let entry = ledger.record_match(&grant, &f, today()).unwrap();
    assert_eq!(entry.net_diff, -5);
}

#[test]
fn explicit_winner_decides_level_sets() {
    let (_dir, mut ledger, grant) = open();
    let mut f = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
    f.result_text = Some("6-4, 4-6".to_string());
    f.winner = Some(Team::Two);
    let entry = ledger.record_match(&grant, &f, today()).unwrap();
    assert_eq!(entry.winner, Team::Two);
    assert_eq!(entry.net_diff, 0);
}

#[test]
fn unreadable_result_falls_back_to_manual_margin() {
    let (_dir, mut ledger, grant) = open();
    for text in ["garbage", "6:4, 6:3"] {
        let mut f = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
        f.result_text = Some(text.to_string());
        f.winner = Some(Team::One);
        assert!(matches!(
            ledger.record_match(&grant, &f, today()),
            Err(LedgerError::MissingDifferential)
        ));
    }
    assert!(ledger.matches().is_empty());

    let mut f = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
    f.result_text = Some("garbage".to_string());
    f.winner = Some(Team::One);
    f.manual_diff = Some(3);
    let entry = ledger.record_match(&grant, &f, today()).unwrap();
    assert_eq!(entry.net_diff, 3);
    assert_eq!(entry.result_text, None);
}

#[test]
fn oversized_result_is_rejected_without_touching_state() {
    let (dir, mut ledger, grant) = open();
    let files_before = files(&dir);
    let mut f = form(["Juan", "Duro"], ["Kareka", "Oscar"]);
    f.result_text = Some("9223372036854775807-0, 1-0".to_string());
    assert!(matches!(
        ledger.record_match(&grant, &f, today()),
        Err(LedgerError::DifferentialOverflow)
    ));
    assert!(ledger.matches().is_empty());
    assert_eq!(files(&dir), files_before);

    // a single huge set is fine until a player's running total would overflow
    f.result_text = Some("9223372036854775807-0".to_string());
    ledger.record_match(&grant, &f, today()).unwrap();
    let stats_before = ledger.stats().clone();
    let files_before = files(&dir);
    f.result_text = Some("1-0".to_string());
    assert!(matches!(
        ledger.record_match(&grant, &f, today()),
        Err(LedgerError::DifferentialOverflow)
    ));
    assert_eq!(ledger.stats(), &stats_before);
    assert_eq!(ledger.matches().len(), 1);
    assert_eq!(files(&dir), files_before);
}
