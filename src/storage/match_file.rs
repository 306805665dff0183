//! Match log file: `Fecha,Hora,Lugar,Equipo1,Equipo2,Ganador,Resultado,Diferencia,Id`.

use super::{parse_int, reader, write_atomic, Columns, FieldAliases};
use crate::config::default_time;
use crate::models::{MatchEntry, Roster, StorageError, Team};
use chrono::{NaiveDate, NaiveTime};
use csv::StringRecord;
use std::path::Path;
use uuid::Uuid;

pub const MATCH_HEADER: [&str; 9] = [
    "Fecha",
    "Hora",
    "Lugar",
    "Equipo1",
    "Equipo2",
    "Ganador",
    "Resultado",
    "Diferencia",
    "Id",
];

const DATE: &str = "Fecha";
const TIME: &str = "Hora";
const PLACE: &str = "Lugar";
const TEAM_1: &str = "Equipo1";
const TEAM_2: &str = "Equipo2";
const WINNER: &str = "Ganador";
const RESULT: &str = "Resultado";
const DIFF: &str = "Diferencia";
const ID: &str = "Id";

const FIELDS: [FieldAliases; 9] = [
    (DATE, &["Fecha", "Date"]),
    (TIME, &["Hora", "Time"]),
    (PLACE, &["Lugar", "Place"]),
    (TEAM_1, &["Equipo1", "Equipo 1"]),
    (TEAM_2, &["Equipo2", "Equipo 2"]),
    (WINNER, &["Ganador", "Winner"]),
    (RESULT, &["Resultado", "Result"]),
    (DIFF, &["Diferencia", "Dif_Juegos", "Diferencia_Juegos"]),
    (ID, &["Id"]),
];

/// Layout of a match log on disk.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SchemaVersion {
    /// Date, teams, winner, and the winner's margin as a positive number.
    V1,
    /// Adds time, place and result text; the differential is signed toward team 1.
    V2,
}

impl SchemaVersion {
    fn detect(columns: &Columns) -> Self {
        if columns.has(TIME) {
            SchemaVersion::V2
        } else {
            SchemaVersion::V1
        }
    }
}

/// "2024-05-01", also when followed by a time as some exports write it.
fn parse_date(cell: &str) -> Option<NaiveDate> {
    let day = cell.get(..10).unwrap_or(cell);
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}

fn parse_time(cell: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(cell, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(cell, "%H:%M:%S"))
        .ok()
}

/// "Juan, Duro" into two names, using roster spelling where it matches.
fn parse_team(cell: &str, roster: &Roster) -> Option<[String; 2]> {
    let names: Vec<String> = cell
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|n| roster.resolve(n).unwrap_or(n).to_string())
        .collect();
    <[String; 2]>::try_from(names).ok()
}

fn parse_row(
    record: &StringRecord,
    columns: &Columns,
    version: SchemaVersion,
    roster: &Roster,
) -> Option<MatchEntry> {
    let date = columns.get(record, DATE).and_then(parse_date)?;
    let team_1 = columns.get(record, TEAM_1).and_then(|c| parse_team(c, roster))?;
    let team_2 = columns.get(record, TEAM_2).and_then(|c| parse_team(c, roster))?;
    let winner = columns.get(record, WINNER).and_then(Team::from_label)?;
    let diff = columns.get(record, DIFF).and_then(parse_int).unwrap_or(0);
    let net_diff = match version {
        SchemaVersion::V1 => {
            let margin = diff.checked_abs()?;
            match winner {
                Team::One => margin,
                Team::Two => -margin,
            }
        }
        SchemaVersion::V2 => diff,
    };
    let id = columns
        .get(record, ID)
        .and_then(|c| Uuid::parse_str(c).ok())
        .unwrap_or_else(Uuid::new_v4);

    Some(MatchEntry {
        id,
        date,
        time: columns
            .get(record, TIME)
            .and_then(parse_time)
            .unwrap_or_else(default_time),
        place: columns.get(record, PLACE).unwrap_or_default().to_string(),
        team_1,
        team_2,
        winner,
        result_text: columns.get(record, RESULT).map(str::to_string),
        net_diff,
    })
}

/// Load the match log in file order. A missing file is an empty log.
///
/// Rows whose date, teams or winner cannot be read are skipped.
pub fn load_matches(path: &Path, roster: &Roster) -> Result<Vec<MatchEntry>, StorageError> {
    if !path.exists() {
        log::info!("No match log at {}; starting empty", path.display());
        return Ok(Vec::new());
    }

    let mut rdr = reader(path)?;
    let columns = Columns::locate(rdr.headers()?, &FIELDS);
    let version = SchemaVersion::detect(&columns);
    if version == SchemaVersion::V1 {
        log::info!("{} uses the v1 layout; signing differentials by winner", path.display());
    }

    let mut matches = Vec::new();
    for (line, record) in rdr.records().enumerate() {
        let record = record?;
        match parse_row(&record, &columns, version, roster) {
            Some(entry) => matches.push(entry),
            None => log::warn!("Skipping unreadable match on row {}: {:?}", line + 2, record),
        }
    }
    Ok(matches)
}

pub fn save_matches(path: &Path, matches: &[MatchEntry]) -> Result<(), StorageError> {
    write_atomic(path, |w| {
        w.write_record(MATCH_HEADER)?;
        for m in matches {
            w.write_record([
                m.date.format("%Y-%m-%d").to_string(),
                m.time.format("%H:%M").to_string(),
                m.place.clone(),
                m.team_1.join(", "),
                m.team_2.join(", "),
                m.winner.label().to_string(),
                m.result_text.clone().unwrap_or_default(),
                m.net_diff.to_string(),
                m.id.to_string(),
            ])?;
        }
        Ok(())
    })
}
