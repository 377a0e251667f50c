//! Scoreboard OCR Parser
//!
//! Reads the raw text an OCR engine produced from a two-player scoreboard
//! screenshot and recovers per-player stat rows (kills, deaths, assists,
//! damage, healing, mitigation). Image capture, preprocessing, and the OCR
//! run itself happen upstream; this tool consumes their text output only.

mod parse;
mod roster;

use anyhow::{anyhow, Result};
use chrono::Local;
use std::io::Read;
use std::path::PathBuf;

/// Logs a diagnostic message to stderr with a timestamp. Stdout carries only
/// the parsed rows so output can be piped.
pub fn log(msg: &str) {
    let timestamp = Local::now().format("%H:%M:%S%.3f");
    eprintln!("[{}] {}", timestamp, msg);
}

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let input = args
        .get(1)
        .ok_or_else(|| anyhow!("usage: scoreboard-ocr <ocr-text-file|-> [config.json]"))?;

    let raw_text = if input == "-" {
        let mut buf = String::new();
        std::io::stdin().read_to_string(&mut buf)?;
        buf
    } else {
        std::fs::read_to_string(input)
            .map_err(|e| anyhow!("Failed to read {}: {}", input, e))?
    };

    let config_path = args
        .get(2)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("config.json"));
    let config = roster::load_config(&config_path);

    let rows = parse::parse_scoreboard(&raw_text, &config.roster, &config.tuning);
    log(&format!(
        "Resolved {} of {} players",
        rows.len(),
        config.roster.players.len()
    ));

    println!("{}", serde_json::to_string_pretty(&rows)?);
    Ok(())
}
