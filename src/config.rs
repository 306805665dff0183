//! Runtime settings, read once from the environment at startup.
//!
//! | Variable             | Default                       |
//! |----------------------|-------------------------------|
//! | `HOST`               | `0.0.0.0`                     |
//! | `PORT`               | `8080`                        |
//! | `PADEL_DATA_DIR`     | `.`                           |
//! | `PADEL_PASSWORD`     | `padel123`                    |
//! | `PADEL_PLAYERS`      | `Juan,Duro,Kareka,Oscar`      |
//! | `PADEL_PLACES`       | `Club Central,Padel Indoor`   |
//! | `PADEL_ROSTER_MODE`  | `strict` (or `relaxed`)       |
//! | `PADEL_DEFAULT_TIME` | `20:00`                       |

use crate::models::{Roster, RosterMode};
use chrono::NaiveTime;
use serde::Serialize;
use std::path::PathBuf;

/// Value of `place` that selects free text instead of a known venue.
pub const OTHER_PLACE: &str = "other";

pub const STATS_FILE: &str = "padel_data.csv";
pub const MATCHES_FILE: &str = "padel_matches.csv";

#[derive(Clone, Debug)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub data_dir: PathBuf,
    pub password: String,
    pub roster: Roster,
    pub roster_mode: RosterMode,
    pub places: Vec<String>,
    pub default_time: NaiveTime,
}

/// The part of the config the page needs to draw its form.
#[derive(Clone, Debug, Serialize)]
pub struct PublicConfig {
    pub players: Vec<String>,
    pub places: Vec<String>,
    pub other_place: &'static str,
    pub roster_mode: RosterMode,
    pub default_time: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_password() -> String {
    "padel123".to_string()
}

fn default_places() -> Vec<String> {
    vec!["Club Central".to_string(), "Padel Indoor".to_string()]
}

pub fn default_time() -> NaiveTime {
    NaiveTime::from_hms_opt(20, 0, 0).unwrap_or_default()
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_roster_mode(raw: &str) -> Option<RosterMode> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "strict" => Some(RosterMode::Strict),
        "relaxed" => Some(RosterMode::Relaxed),
        _ => None,
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            data_dir: PathBuf::from("."),
            password: default_password(),
            roster: Roster::default(),
            roster_mode: RosterMode::default(),
            places: default_places(),
            default_time: default_time(),
        }
    }
}

impl Config {
    /// Read settings from the process environment. Bad values fall back to defaults with a warning.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as `from_env` with a custom variable source.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        if let Some(host) = lookup("HOST") {
            config.host = host;
        }
        if let Some(port) = lookup("PORT") {
            match port.parse() {
                Ok(p) => config.port = p,
                Err(_) => log::warn!("Ignoring invalid PORT {:?}", port),
            }
        }
        if let Some(dir) = lookup("PADEL_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(password) = lookup("PADEL_PASSWORD") {
            config.password = password;
        }
        if let Some(players) = lookup("PADEL_PLAYERS") {
            let roster = Roster::new(split_list(&players));
            if roster.len() < 4 {
                log::warn!("PADEL_PLAYERS needs at least 4 names; keeping the default roster");
            } else {
                config.roster = roster;
            }
        }
        if let Some(places) = lookup("PADEL_PLACES") {
            config.places = split_list(&places);
        }
        if let Some(mode) = lookup("PADEL_ROSTER_MODE") {
            match parse_roster_mode(&mode) {
                Some(m) => config.roster_mode = m,
                None => log::warn!("Ignoring invalid PADEL_ROSTER_MODE {:?}", mode),
            }
        }
        if let Some(time) = lookup("PADEL_DEFAULT_TIME") {
            match NaiveTime::parse_from_str(time.trim(), "%H:%M") {
                Ok(t) => config.default_time = t,
                Err(_) => log::warn!("Ignoring invalid PADEL_DEFAULT_TIME {:?}", time),
            }
        }
        if config.roster_mode == RosterMode::Strict && config.roster.len() != 4 {
            log::warn!(
                "Strict mode needs exactly 4 players but the roster has {}; switching to relaxed",
                config.roster.len()
            );
            config.roster_mode = RosterMode::Relaxed;
        }
        config
    }

    pub fn stats_path(&self) -> PathBuf {
        self.data_dir.join(STATS_FILE)
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join(MATCHES_FILE)
    }

    /// Known venue with the given name, matched case-insensitively.
    pub fn resolve_place(&self, name: &str) -> Option<&str> {
        let name = name.trim();
        self.places
            .iter()
            .find(|p| p.eq_ignore_ascii_case(name))
            .map(String::as_str)
    }

    pub fn public(&self) -> PublicConfig {
        PublicConfig {
            players: self.roster.names().to_vec(),
            places: self.places.clone(),
            other_place: OTHER_PLACE,
            roster_mode: self.roster_mode,
            default_time: self.default_time.format("%H:%M").to_string(),
        }
    }
}
