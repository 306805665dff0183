//! Ledger: the stats table and match log held together, plus the commit path.

use crate::auth::AccessGrant;
use crate::config::Config;
use crate::logic::{apply_match, audit, build_entry, replay, Discrepancy};
use crate::models::{LedgerError, MatchEntry, MatchForm, PlayerStats, StatsTable, StorageError};
use crate::storage::CsvStore;
use chrono::NaiveDate;
use serde::Serialize;

/// Bar (wins) and line (differential) series in ranking order.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize)]
pub struct ChartSeries {
    pub labels: Vec<String>,
    pub wins: Vec<u32>,
    pub game_diff: Vec<i64>,
}

impl ChartSeries {
    pub fn from_stats(stats: &StatsTable) -> Self {
        let mut series = Self::default();
        for row in stats.ranked() {
            series.labels.push(row.player);
            series.wins.push(row.wins);
            series.game_diff.push(row.game_diff);
        }
        series
    }
}

/// Both tables, loaded once and written back after every change.
#[derive(Debug)]
pub struct Ledger {
    config: Config,
    store: CsvStore,
    stats: StatsTable,
    matches: Vec<MatchEntry>,
}

impl Ledger {
    /// Load (or create) the files under the configured data directory.
    pub fn open(config: Config) -> Result<Self, StorageError> {
        let store = CsvStore::new(config.stats_path(), config.matches_path());
        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: CsvStore) -> Result<Self, StorageError> {
        let (stats, matches) = store.load(&config.roster)?;
        log::info!(
            "Loaded {} players and {} matches",
            stats.rows().len(),
            matches.len()
        );
        Ok(Self {
            config,
            store,
            stats,
            matches,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn stats(&self) -> &StatsTable {
        &self.stats
    }

    /// Rows for display: wins, then differential, both descending.
    pub fn ranked(&self) -> Vec<PlayerStats> {
        self.stats.ranked()
    }

    /// Matches in the order they were recorded.
    pub fn matches(&self) -> &[MatchEntry] {
        &self.matches
    }

    /// Matches by date and time, newest first. Same-moment matches keep reverse log order.
    pub fn matches_newest_first(&self) -> Vec<MatchEntry> {
        let mut matches: Vec<MatchEntry> = self.matches.iter().rev().cloned().collect();
        matches.sort_by(|a, b| (b.date, b.time).cmp(&(a.date, a.time)));
        matches
    }

    pub fn chart(&self) -> ChartSeries {
        ChartSeries::from_stats(&self.stats)
    }

    /// Validate and commit one match.
    ///
    /// The new stats and log are built on copies and written to disk before
    /// memory is updated, so any error leaves the ledger as it was.
    pub fn record_match(
        &mut self,
        _grant: &AccessGrant,
        form: &MatchForm,
        today: NaiveDate,
    ) -> Result<MatchEntry, LedgerError> {
        let entry = build_entry(&self.config, form, today)?;
        let stats = apply_match(&self.stats, &entry)?;
        let mut matches = self.matches.clone();
        matches.push(entry.clone());

        self.store.save(&stats, &matches)?;
        self.stats = stats;
        self.matches = matches;
        log::info!(
            "Recorded match {} on {}: {} vs {}, {} won, diff {:+}",
            entry.id,
            entry.date,
            entry.team_1.join(" & "),
            entry.team_2.join(" & "),
            entry.winner.label(),
            entry.net_diff
        );
        Ok(entry)
    }

    /// Overwrite one player's wins and differential by hand.
    pub fn correct_player(
        &mut self,
        _grant: &AccessGrant,
        player: &str,
        wins: u32,
        game_diff: i64,
    ) -> Result<PlayerStats, LedgerError> {
        let mut stats = self.stats.clone();
        if !stats.correct(player, wins, game_diff) {
            return Err(LedgerError::UnknownPlayer(player.trim().to_string()));
        }
        self.store.save_stats(&stats)?;
        self.stats = stats;
        log::info!("Corrected {} to {} wins, diff {:+}", player, wins, game_diff);
        self.stats
            .get(player)
            .cloned()
            .ok_or_else(|| LedgerError::UnknownPlayer(player.trim().to_string()))
    }

    /// Replace the stored aggregate with a replay of the whole log.
    pub fn rebuild(&mut self, _grant: &AccessGrant) -> Result<(), LedgerError> {
        let stats = replay(&self.config.roster, &self.matches)?;
        self.store.save_stats(&stats)?;
        self.stats = stats;
        log::info!("Rebuilt stats from {} matches", self.matches.len());
        Ok(())
    }

    /// Players whose stored numbers differ from what the log implies.
    pub fn audit(&self) -> Result<Vec<Discrepancy>, LedgerError> {
        audit(&self.config.roster, &self.stats, &self.matches)
    }
}
