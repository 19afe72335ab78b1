//! Binary configuration read from `TWENTY48_*` environment variables.
//!
//! Unparseable values fall back to defaults and are reported as warnings
//! rather than aborting startup.

use std::path::PathBuf;

use crate::core::{SessionConfig, SpawnOdds};
use crate::types::{DEFAULT_WIN_TILE, MAX_TILE};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppConfig {
    /// Fixed seed; `None` seeds from entropy.
    pub seed: Option<u32>,
    pub session: SessionConfig,
    /// Log file; `None` disables logging.
    pub log_path: Option<PathBuf>,
    /// Problems found while reading the environment, logged once a subscriber exists.
    pub warnings: Vec<String>,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut warnings = Vec::new();
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let seed = get("TWENTY48_SEED").and_then(|v| match v.parse::<u32>() {
            Ok(seed) => Some(seed),
            Err(_) => {
                warnings.push(format!("TWENTY48_SEED={v:?} is not a u32; seeding from entropy"));
                None
            }
        });

        let win_tile = match get("TWENTY48_WIN_TILE") {
            None => DEFAULT_WIN_TILE,
            Some(v) => match v.parse::<u32>() {
                Ok(t) if SessionConfig::is_valid_win_tile(t) => t,
                _ => {
                    warnings.push(format!(
                        "TWENTY48_WIN_TILE={v:?} is not a power of two from 4 to {MAX_TILE}; using {DEFAULT_WIN_TILE}"
                    ));
                    DEFAULT_WIN_TILE
                }
            },
        };

        let spawn_odds = match get("TWENTY48_SPAWN_ODDS") {
            None => SpawnOdds::default(),
            Some(v) => SpawnOdds::from_str(&v).unwrap_or_else(|| {
                warnings.push(format!("TWENTY48_SPAWN_ODDS={v:?} is not classic|uniform; using classic"));
                SpawnOdds::default()
            }),
        };

        let spawn_on_noop = get("TWENTY48_SPAWN_ON_NOOP")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        let log_path = get("TWENTY48_LOG").map(PathBuf::from);

        Self {
            seed,
            session: SessionConfig::default()
                .with_win_tile(win_tile)
                .with_spawn_odds(spawn_odds)
                .with_spawn_on_noop(spawn_on_noop),
            log_path,
            warnings,
        }
    }
}
