//! CSV persistence for the stats table and the match log.
//!
//! Column names are looked up through alias lists so files written by older
//! versions of the tool load into the current model. Writes always use the
//! canonical header and go through a temporary file that is renamed into place.

mod match_file;
mod stats_file;

pub use match_file::{load_matches, save_matches, SchemaVersion, MATCH_HEADER};
pub use stats_file::{load_stats, save_stats, STATS_HEADER};

use crate::models::{MatchEntry, Roster, StatsTable, StorageError};
use csv::StringRecord;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

/// Both files of one tracker.
#[derive(Clone, Debug)]
pub struct CsvStore {
    stats_path: PathBuf,
    matches_path: PathBuf,
}

impl CsvStore {
    pub fn new(stats_path: impl Into<PathBuf>, matches_path: impl Into<PathBuf>) -> Self {
        Self {
            stats_path: stats_path.into(),
            matches_path: matches_path.into(),
        }
    }

    pub fn load(&self, roster: &Roster) -> Result<(StatsTable, Vec<MatchEntry>), StorageError> {
        let stats = load_stats(&self.stats_path, roster)?;
        let matches = load_matches(&self.matches_path, roster)?;
        Ok((stats, matches))
    }

    /// Write the log first: it is the source the stats can be rebuilt from.
    pub fn save(&self, stats: &StatsTable, matches: &[MatchEntry]) -> Result<(), StorageError> {
        save_matches(&self.matches_path, matches)?;
        save_stats(&self.stats_path, stats)
    }

    pub fn save_stats(&self, stats: &StatsTable) -> Result<(), StorageError> {
        save_stats(&self.stats_path, stats)
    }
}

/// Canonical field name and every header accepted for it.
pub(crate) type FieldAliases = (&'static str, &'static [&'static str]);

/// Position of each known field in one file's header row.
pub(crate) struct Columns {
    index: HashMap<&'static str, usize>,
}

impl Columns {
    pub(crate) fn locate(headers: &StringRecord, fields: &[FieldAliases]) -> Self {
        let mut index = HashMap::new();
        for (canonical, aliases) in fields {
            let found = headers
                .iter()
                .position(|h| aliases.iter().any(|a| a.eq_ignore_ascii_case(h.trim())));
            match found {
                Some(i) => {
                    if !headers
                        .get(i)
                        .is_some_and(|h| h.trim().eq_ignore_ascii_case(canonical))
                    {
                        log::info!("Reading column {:?} as {}", headers.get(i), canonical);
                    }
                    index.insert(*canonical, i);
                }
                None => log::debug!("Column {} not present", canonical),
            }
        }
        Self { index }
    }

    pub(crate) fn has(&self, field: &str) -> bool {
        self.index.contains_key(field)
    }

    /// Trimmed cell for `field`, or None when the column or the cell is missing or blank.
    pub(crate) fn get<'r>(&self, record: &'r StringRecord, field: &str) -> Option<&'r str> {
        let i = *self.index.get(field)?;
        record.get(i).map(str::trim).filter(|s| !s.is_empty())
    }
}

/// Whole number from a cell. Accepts "3.0" as written by spreadsheet tools.
pub(crate) fn parse_int(cell: &str) -> Option<i64> {
    let cell = cell.trim();
    cell.parse::<i64>().ok().or_else(|| {
        cell.parse::<f64>()
            .ok()
            .filter(|f| f.is_finite() && f.fract() == 0.0)
            .map(|f| f as i64)
    })
}

/// Open `path` for reading with a header row, tolerating ragged rows.
pub(crate) fn reader(path: &Path) -> Result<csv::Reader<fs::File>, StorageError> {
    Ok(csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?)
}

/// Write rows to a sibling temp file, then rename it over `path`.
pub(crate) fn write_atomic<F>(path: &Path, write: F) -> Result<(), StorageError>
where
    F: FnOnce(&mut csv::Writer<fs::File>) -> Result<(), StorageError>,
{
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    {
        let mut writer = csv::Writer::from_path(&tmp)?;
        write(&mut writer)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
