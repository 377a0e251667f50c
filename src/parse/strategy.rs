//! Row resolution strategies.
//!
//! Each strategy is one technique for binding a player to a six-number stat
//! window. They run in a fixed priority order and the cascade returns on the
//! first success; a player every strategy misses is simply absent from the
//! output. The whole-call positional fallback lives with the orchestrator
//! because it must only engage when no name was found anywhere.

use super::lines::{RawLine, RowCandidate};
use super::names::NameMatcher;
use super::tokens;
use super::window::{best_window, trailing_output_window, ScoreTuning, ScoredWindow};

/// Everything one strategy invocation may consult. Built per player.
pub struct StrategyContext<'a> {
    pub lines: &'a [RawLine],
    pub candidates: &'a [RowCandidate],
    /// Matcher for the player being resolved
    pub matcher: &'a NameMatcher,
    /// Matchers for every other roster player, for adjacent-row guards
    pub rivals: &'a [&'a NameMatcher],
    /// Coarse name line location, if any line matched
    pub name_line: Option<usize>,
    pub tuning: &'a ScoreTuning,
}

impl StrategyContext<'_> {
    fn names_rival(&self, text: &str) -> bool {
        self.rivals.iter().any(|rival| rival.names_line(text))
    }
}

pub trait ResolveStrategy {
    fn try_resolve(&self, cx: &StrategyContext) -> Option<ScoredWindow>;
}

/// The cascade in priority order.
pub fn cascade() -> Vec<Box<dyn ResolveStrategy>> {
    vec![
        Box::new(InlineAfterName),
        Box::new(NearestRow),
        Box::new(RowByName),
        Box::new(Accumulate),
        Box::new(KdaStitch),
        Box::new(TrailingOutputs),
    ]
}

/// Numbers from the name line plus up to two following lines, stopping early
/// at a line that names another roster player. Shared by the accumulation
/// strategies.
fn accumulated_numbers(cx: &StrategyContext) -> Option<Vec<u64>> {
    let name_line = cx.name_line?;
    let mut numbers = Vec::new();
    let end = (name_line + 2).min(cx.lines.len().saturating_sub(1));
    for line in &cx.lines[name_line..=end] {
        if line.index > name_line && cx.names_rival(&line.text) {
            break;
        }
        numbers.extend(tokens::extract_numbers(&line.text));
    }
    Some(numbers)
}

/// Numbers following a fuzzily matched name token on the same line.
///
/// Scans every line and keeps the globally best-scoring window rather than
/// the first match, so an incidental name mention (a chat fragment) cannot
/// shadow the real scoreboard row.
pub struct InlineAfterName;

impl ResolveStrategy for InlineAfterName {
    fn try_resolve(&self, cx: &StrategyContext) -> Option<ScoredWindow> {
        let mut best: Option<ScoredWindow> = None;
        for line in cx.lines {
            let Some((token_idx, _)) = cx.matcher.token_index(&line.text) else {
                continue;
            };
            let words: Vec<&str> = line.text.split_whitespace().collect();
            let numbers = tokens::inline_numbers(&words[token_idx + 1..]);
            if let Some(found) = best_window(&numbers, cx.tuning) {
                if best.is_none_or(|b| found.score > b.score) {
                    best = Some(found);
                }
            }
        }
        best
    }
}

/// Row candidates at or shortly after the coarse name line, skipping rows
/// that belong to another roster player. Higher score wins, then smaller
/// line distance.
pub struct NearestRow;

impl ResolveStrategy for NearestRow {
    fn try_resolve(&self, cx: &StrategyContext) -> Option<ScoredWindow> {
        let name_line = cx.name_line?;
        let mut best: Option<(ScoredWindow, usize)> = None;
        for candidate in cx.candidates {
            if candidate.line_index < name_line || candidate.line_index - name_line > 2 {
                continue;
            }
            if cx.names_rival(&candidate.text) {
                continue;
            }
            let Some(found) = best_window(&candidate.numbers, cx.tuning) else {
                continue;
            };
            let distance = candidate.line_index - name_line;
            let better = best.is_none_or(|(b, d)| {
                found.score > b.score || (found.score == b.score && distance < d)
            });
            if better {
                best = Some((found, distance));
            }
        }
        best.map(|(window, _)| window)
    }
}

/// Fuzzy-matches the name against the candidate's own word tokens, for
/// layouts where name and stats share one wrapped line. Higher score wins,
/// then smaller edit distance.
pub struct RowByName;

impl ResolveStrategy for RowByName {
    fn try_resolve(&self, cx: &StrategyContext) -> Option<ScoredWindow> {
        let mut best: Option<(ScoredWindow, usize)> = None;
        for candidate in cx.candidates {
            let Some((_, distance)) = cx.matcher.token_index(&candidate.text) else {
                continue;
            };
            let Some(found) = best_window(&candidate.numbers, cx.tuning) else {
                continue;
            };
            let better = best.is_none_or(|(b, d)| {
                found.score > b.score || (found.score == b.score && distance < d)
            });
            if better {
                best = Some((found, distance));
            }
        }
        best.map(|(window, _)| window)
    }
}

/// Accumulates numbers from the name line through up to two following lines,
/// stopping early at a line that names another player. Recovers rows whose
/// OCR output wrapped mid-row.
pub struct Accumulate;

impl ResolveStrategy for Accumulate {
    fn try_resolve(&self, cx: &StrategyContext) -> Option<ScoredWindow> {
        let numbers = accumulated_numbers(cx)?;
        best_window(&numbers, cx.tuning)
    }
}

/// Stitches a KDA triple from the line above the name line.
///
/// Handles the layout where the KDA renders one line above the output stats:
/// the name line carries only 3-4 numbers and the immediately preceding line
/// (naming nobody) carries ≥3 numbers that are all KDA-sized. The previous
/// line's last three become the KDA, the name line's first three the outputs.
pub struct KdaStitch;

impl ResolveStrategy for KdaStitch {
    fn try_resolve(&self, cx: &StrategyContext) -> Option<ScoredWindow> {
        let name_line = cx.name_line?;
        if name_line == 0 {
            return None;
        }
        let current = tokens::extract_numbers(&cx.lines[name_line].text);
        if !(3..=4).contains(&current.len()) {
            return None;
        }
        let previous = &cx.lines[name_line - 1];
        if cx.matcher.names_line(&previous.text) || cx.names_rival(&previous.text) {
            return None;
        }
        let prev_numbers = tokens::extract_numbers(&previous.text);
        if prev_numbers.len() < 3 || prev_numbers.iter().any(|&v| v > cx.tuning.max_kda) {
            return None;
        }
        let mut stitched = prev_numbers[prev_numbers.len() - 3..].to_vec();
        stitched.extend(current.iter().take(3));
        best_window(&stitched, cx.tuning)
    }
}

/// Best-effort degradation once everything else has failed: the accumulated
/// sequence's last three numbers become the output triple with a zero KDA.
/// The resulting row can be numerically wrong, but a partial row is preferred
/// over dropping the player.
pub struct TrailingOutputs;

impl ResolveStrategy for TrailingOutputs {
    fn try_resolve(&self, cx: &StrategyContext) -> Option<ScoredWindow> {
        let numbers = accumulated_numbers(cx)?;
        trailing_output_window(&numbers, cx.tuning)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parse::lines::{collect_candidates, split_lines};
    use crate::roster::PlayerEntry;

    fn matcher(id: &str) -> NameMatcher {
        let player = PlayerEntry {
            id: id.to_string(),
            variants: Vec::new(),
        };
        NameMatcher::new(&player, 2)
    }

    struct Fixture {
        lines: Vec<RawLine>,
        candidates: Vec<RowCandidate>,
        matcher: NameMatcher,
        rival: NameMatcher,
        tuning: ScoreTuning,
    }

    impl Fixture {
        fn new(raw: &str, id: &str, rival_id: &str) -> Self {
            let lines = split_lines(raw);
            let candidates = collect_candidates(&lines);
            Self {
                lines,
                candidates,
                matcher: matcher(id),
                rival: matcher(rival_id),
                tuning: ScoreTuning::default(),
            }
        }

        fn resolve(&self, strategy: &dyn ResolveStrategy) -> Option<ScoredWindow> {
            let rivals = [&self.rival];
            let cx = StrategyContext {
                lines: &self.lines,
                candidates: &self.candidates,
                matcher: &self.matcher,
                rivals: &rivals,
                name_line: self.matcher.best_line(&self.lines).map(|(i, _)| i),
                tuning: &self.tuning,
            };
            strategy.try_resolve(&cx)
        }
    }

    #[test]
    fn test_inline_after_name() {
        let f = Fixture::new(
            "RIDICULOID 12 6 9 14500 300 1200",
            "ridiculoid",
            "buttstough",
        );
        let w = f.resolve(&InlineAfterName).unwrap();
        assert_eq!(w.stats.kills, 12);
        assert_eq!(w.stats.damage, 14500);
    }

    #[test]
    fn test_inline_prefers_scoreboard_over_chat_mention() {
        // The chat fragment mentions the name first but yields no plausible
        // window; the real row later must win
        let raw = "ridiculoid: nice one 5\nRIDICULOID 12 6 9 14500 300 1200";
        let f = Fixture::new(raw, "ridiculoid", "buttstough");
        let w = f.resolve(&InlineAfterName).unwrap();
        assert_eq!(w.stats.kills, 12);
    }

    #[test]
    fn test_inline_letter_corrections() {
        // OCR read assists 4 as "A" and healing 0 as "O"
        let f = Fixture::new(
            "RIDICULOID 12 6 A 14500 O 1200",
            "ridiculoid",
            "buttstough",
        );
        let w = f.resolve(&InlineAfterName).unwrap();
        assert_eq!(w.stats.assists, 4);
        assert_eq!(w.stats.healing, 0);
    }

    #[test]
    fn test_nearest_row_skips_rival_row() {
        // Name on its own line; the first numeric row below belongs to the
        // other player and must be skipped
        let raw = "RIDICULOID\nBUTTSTOUGH 8 10 15 9000 11000 200\n12 6 9 14500 300 1200";
        let f = Fixture::new(raw, "ridiculoid", "buttstough");
        let w = f.resolve(&NearestRow).unwrap();
        assert_eq!(w.stats.kills, 12);
        assert_eq!(w.stats.damage, 14500);
    }

    #[test]
    fn test_nearest_row_within_two_lines_only() {
        let raw = "RIDICULOID\nchat\nchat\nchat\n12 6 9 14500 300 1200";
        let f = Fixture::new(raw, "ridiculoid", "buttstough");
        assert!(f.resolve(&NearestRow).is_none());
    }

    #[test]
    fn test_nearest_row_requires_name_line() {
        let raw = "12 6 9 14500 300 1200";
        let f = Fixture::new(raw, "ridiculoid", "buttstough");
        assert!(f.resolve(&NearestRow).is_none());
    }

    #[test]
    fn test_row_by_name_wrapped_layout() {
        // Name and stats merged into one candidate line; coarse line lookup
        // is not needed here
        let raw = "R1DICULOID cassidy 12 6 9 14500 300 1200";
        let f = Fixture::new(raw, "ridiculoid", "buttstough");
        let w = f.resolve(&RowByName).unwrap();
        assert_eq!(w.stats.kills, 12);
    }

    #[test]
    fn test_accumulate_across_wrap() {
        let raw = "RIDICULOID 12 6 9\n14500 300 1200";
        let f = Fixture::new(raw, "ridiculoid", "buttstough");
        let w = f.resolve(&Accumulate).unwrap();
        assert_eq!(w.stats.kills, 12);
        assert_eq!(w.stats.mitigation, 1200);
    }

    #[test]
    fn test_accumulate_stops_at_rival_line() {
        // The rival's row directly below must not bleed into the window
        let raw = "RIDICULOID 12 6 9\nBUTTSTOUGH 8 10 15 9000 11000 200";
        let f = Fixture::new(raw, "ridiculoid", "buttstough");
        assert!(f.resolve(&Accumulate).is_none());
    }

    #[test]
    fn test_kda_stitch() {
        // KDA rendered one line above the name line's output stats
        let raw = "header\n12 6 9\nRIDICULOID 14500 300 1200";
        let f = Fixture::new(raw, "ridiculoid", "buttstough");
        let w = f.resolve(&KdaStitch).unwrap();
        assert_eq!(w.stats.kills, 12);
        assert_eq!(w.stats.deaths, 6);
        assert_eq!(w.stats.assists, 9);
        assert_eq!(w.stats.damage, 14500);
    }

    #[test]
    fn test_kda_stitch_rejects_player_previous_line() {
        let raw = "BUTTSTOUGH 8 10 15\nRIDICULOID 14500 300 1200";
        let f = Fixture::new(raw, "ridiculoid", "buttstough");
        assert!(f.resolve(&KdaStitch).is_none());
    }

    #[test]
    fn test_kda_stitch_rejects_large_previous_numbers() {
        // Previous line numbers are not KDA-sized
        let raw = "header\n9000 11000 200\nRIDICULOID 14500 300 1200";
        let f = Fixture::new(raw, "ridiculoid", "buttstough");
        assert!(f.resolve(&KdaStitch).is_none());
    }

    #[test]
    fn test_trailing_outputs_best_effort() {
        // Only the output triple survived OCR: zero KDA, outputs kept
        let raw = "RIDICULOID 9000 11000 200";
        let f = Fixture::new(raw, "ridiculoid", "buttstough");
        let w = f.resolve(&TrailingOutputs).unwrap();
        assert_eq!(w.stats.kills, 0);
        assert_eq!(w.stats.damage, 9000);
        assert_eq!(w.stats.healing, 11000);
        assert_eq!(w.stats.mitigation, 200);
    }

    #[test]
    fn test_trailing_outputs_requires_name_line() {
        let raw = "9000 11000 200";
        let f = Fixture::new(raw, "ridiculoid", "buttstough");
        assert!(f.resolve(&TrailingOutputs).is_none());
    }
}
