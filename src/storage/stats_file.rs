//! Stats file: `Jugador,Victorias,Dif_Juegos`.

use super::{parse_int, reader, write_atomic, Columns, FieldAliases};
use crate::models::{PlayerStats, Roster, StatsTable, StorageError};
use std::path::Path;

pub const STATS_HEADER: [&str; 3] = ["Jugador", "Victorias", "Dif_Juegos"];

const PLAYER: &str = "Jugador";
const WINS: &str = "Victorias";
const DIFF: &str = "Dif_Juegos";

const FIELDS: [FieldAliases; 3] = [
    (PLAYER, &["Jugador", "Player"]),
    (WINS, &["Victorias", "Wins"]),
    (DIFF, &["Dif_Juegos", "Diferencia_Juegos", "Game_Diff"]),
];

/// Load the stats table, creating a zeroed file when none exists.
///
/// Unknown players are dropped, missing roster members are added at zero, and
/// a missing or unreadable number is taken as zero.
pub fn load_stats(path: &Path, roster: &Roster) -> Result<StatsTable, StorageError> {
    if !path.exists() {
        log::info!("No stats file at {}; creating one", path.display());
        let table = StatsTable::zeroed(roster);
        save_stats(path, &table)?;
        return Ok(table);
    }

    let mut rdr = reader(path)?;
    let columns = Columns::locate(rdr.headers()?, &FIELDS);
    if !columns.has(DIFF) {
        log::warn!("{} has no differential column; starting it at 0", path.display());
    }

    let mut rows = Vec::new();
    for record in rdr.records() {
        let record = record?;
        let Some(player) = columns.get(&record, PLAYER) else {
            log::warn!("Skipping stats row without a player: {:?}", record);
            continue;
        };
        let wins = columns
            .get(&record, WINS)
            .map(|cell| {
                parse_int(cell)
                    .and_then(|n| u32::try_from(n).ok())
                    .unwrap_or_else(|| {
                        log::warn!("Bad win count {:?} for {}; using 0", cell, player);
                        0
                    })
            })
            .unwrap_or(0);
        let game_diff = columns
            .get(&record, DIFF)
            .map(|cell| {
                parse_int(cell).unwrap_or_else(|| {
                    log::warn!("Bad differential {:?} for {}; using 0", cell, player);
                    0
                })
            })
            .unwrap_or(0);
        rows.push(PlayerStats {
            player: player.to_string(),
            wins,
            game_diff,
        });
    }
    Ok(StatsTable::from_rows(roster, rows))
}

pub fn save_stats(path: &Path, stats: &StatsTable) -> Result<(), StorageError> {
    write_atomic(path, |w| {
        w.write_record(STATS_HEADER)?;
        for row in stats.rows() {
            w.write_record([
                row.player.clone(),
                row.wins.to_string(),
                row.game_diff.to_string(),
            ])?;
        }
        Ok(())
    })
}
