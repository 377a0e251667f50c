//! Scoreboard OCR text parsing.
//!
//! Turns the raw text a general-purpose OCR engine produced from a two-player
//! scoreboard screenshot into structured per-player stat rows. OCR output for
//! this UI is reliably messy: misread letters, merged and split lines, missing
//! fields, transposed KDA columns, and stray numbers from menu chrome. The
//! parser is built around that: fuzzy name location, plausibility-scored
//! stat windows, and an ordered cascade of resolution strategies that prefers
//! a best-effort row over throwing. It is a pure function of its inputs and
//! never errors; players it cannot resolve are simply absent from the output.

pub mod lines;
pub mod names;
pub mod strategy;
pub mod tokens;
pub mod window;

pub use window::{KdaOrder, ScoreTuning, StatWindow};

use serde::Serialize;

use crate::roster::Roster;
use lines::{collect_candidates, split_lines, RowCandidate};
use names::NameMatcher;
use strategy::StrategyContext;
use window::{best_window, detect_kda_order};

/// One resolved player row, shaped for the downstream match payload.
/// `hero` is never filled in here; hero identification happens downstream.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedPlayerRow {
    pub player: String,
    pub hero: Option<String>,
    #[serde(flatten)]
    pub stats: StatWindow,
}

/// Parses one screenshot's OCR text into stat rows for the roster's players.
///
/// Rows come back in roster order, not discovery order. Zero, one, or all
/// players may resolve; empty or pure-noise input yields an empty vec.
pub fn parse_scoreboard(raw_text: &str, roster: &Roster, tuning: &ScoreTuning) -> Vec<ParsedPlayerRow> {
    let lines = split_lines(raw_text);
    if lines.is_empty() {
        return Vec::new();
    }

    let order = detect_kda_order(&lines);
    let candidates = collect_candidates(&lines);

    let matchers: Vec<NameMatcher> = roster
        .players
        .iter()
        .map(|player| NameMatcher::new(player, tuning.max_name_distance))
        .collect();
    let name_lines: Vec<Option<usize>> = matchers
        .iter()
        .map(|matcher| matcher.best_line(&lines).map(|(idx, _)| idx))
        .collect();
    let any_name_found = name_lines.iter().any(Option::is_some);

    let strategies = strategy::cascade();
    let mut resolved: Vec<Option<StatWindow>> = vec![None; roster.players.len()];

    for idx in 0..roster.players.len() {
        let rivals: Vec<&NameMatcher> = matchers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != idx)
            .map(|(_, matcher)| matcher)
            .collect();
        let cx = StrategyContext {
            lines: &lines,
            candidates: &candidates,
            matcher: &matchers[idx],
            rivals: &rivals,
            name_line: name_lines[idx],
            tuning,
        };
        for strategy in &strategies {
            if let Some(found) = strategy.try_resolve(&cx) {
                resolved[idx] = Some(found.stats);
                break;
            }
        }
    }

    // Only when no roster name was recognized anywhere: assign leftover
    // candidates top-to-bottom. With even one name recognized this stays
    // off, so a resolvable row is never silently misattributed.
    if !any_name_found {
        positional_fallback(&candidates, tuning, &mut resolved);
    }

    roster
        .players
        .iter()
        .zip(resolved)
        .filter_map(|(player, window)| {
            window.map(|stats| ParsedPlayerRow {
                player: player.id.clone(),
                hero: None,
                stats: stats.normalize_order(order),
            })
        })
        .collect()
}

fn positional_fallback(
    candidates: &[RowCandidate],
    tuning: &ScoreTuning,
    resolved: &mut [Option<StatWindow>],
) {
    let mut used_lines: Vec<usize> = Vec::new();
    for slot in resolved.iter_mut() {
        if slot.is_some() {
            continue;
        }
        for candidate in candidates {
            let span: Vec<usize> =
                (candidate.line_index..candidate.line_index + candidate.span).collect();
            if span.iter().any(|line| used_lines.contains(line)) {
                continue;
            }
            if let Some(found) = best_window(&candidate.numbers, tuning) {
                *slot = Some(found.stats);
                used_lines.extend(span);
                break;
            }
        }
    }
}
