//! Roster and tuning configuration.
//!
//! The tracked players and the variant spellings their handles come back as
//! from OCR are configuration, not compiled-in constants: the parser takes
//! them as explicit parameters so any pair of handles (and any corruption
//! dictionary) can be tested. Loads from a JSON file with defaults matching
//! the two players this tracker was built for.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::parse::ScoreTuning;

/// One tracked player: stable identifier plus the corrupted spellings the
/// OCR engine has been observed to produce for their handle. The identifier
/// itself always counts as a variant.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlayerEntry {
    pub id: String,
    #[serde(default)]
    pub variants: Vec<String>,
}

/// The tracked players, in output priority order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Roster {
    #[serde(default = "default_players")]
    pub players: Vec<PlayerEntry>,
}

impl Default for Roster {
    fn default() -> Self {
        Self {
            players: default_players(),
        }
    }
}

fn default_players() -> Vec<PlayerEntry> {
    vec![
        PlayerEntry {
            id: "ridiculoid".to_string(),
            variants: vec![
                "rioiculoid".to_string(),
                "ridicul0id".to_string(),
                "r1diculoid".to_string(),
            ],
        },
        PlayerEntry {
            id: "buttstough".to_string(),
            variants: vec![
                "butt5tough".to_string(),
                "buttst0ugh".to_string(),
                "buttstouch".to_string(),
            ],
        },
    ]
}

/// Everything loadable from the config file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParserConfig {
    #[serde(default)]
    pub roster: Roster,
    #[serde(default)]
    pub tuning: ScoreTuning,
}

/// Loads configuration from the given JSON file or returns defaults.
pub fn load_config(path: &Path) -> ParserConfig {
    if path.exists() {
        match fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    crate::log(&format!("Config loaded from {}", path.display()));
                    return config;
                }
                Err(e) => {
                    crate::log(&format!(
                        "Failed to parse {}: {}. Using defaults.",
                        path.display(),
                        e
                    ));
                }
            },
            Err(e) => {
                crate::log(&format!(
                    "Failed to read {}: {}. Using defaults.",
                    path.display(),
                    e
                ));
            }
        }
    } else {
        crate::log(&format!(
            "{} not found. Using default roster.",
            path.display()
        ));
    }

    ParserConfig::default()
}
