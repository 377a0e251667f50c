use serde::{Deserialize, Serialize};

use super::lines::RawLine;

/// One player's full scoreboard row: kills/deaths/assists plus the three
/// output totals. All fields are bounded by the plausibility gate before a
/// window is ever constructed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatWindow {
    pub kills: u32,
    pub deaths: u32,
    pub assists: u32,
    pub damage: u32,
    pub healing: u32,
    pub mitigation: u32,
}

impl StatWindow {
    fn from_values(values: [u64; 6]) -> Self {
        // Values have passed the plausibility gate, so each fits in u32
        Self {
            kills: values[0] as u32,
            deaths: values[1] as u32,
            assists: values[2] as u32,
            damage: values[3] as u32,
            healing: values[4] as u32,
            mitigation: values[5] as u32,
        }
    }

    /// Remaps a window read under the given column order into K-D-A order.
    /// The swap must be applied exactly once per resolved row.
    pub fn normalize_order(mut self, order: KdaOrder) -> Self {
        if order == KdaOrder::Kad {
            std::mem::swap(&mut self.deaths, &mut self.assists);
        }
        self
    }
}

/// A stat window with its plausibility score; higher is better.
#[derive(Debug, Clone, Copy)]
pub struct ScoredWindow {
    pub stats: StatWindow,
    pub score: i32,
}

/// Column order of the KDA triple as printed on the scoreboard, detected
/// once per parse call from header-like letter runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KdaOrder {
    Kda,
    Kad,
}

/// Heuristic thresholds and score deltas for window plausibility.
///
/// These encode one game's stat ranges and carry no principled derivation;
/// they are configuration so a different title can recalibrate them without
/// touching the scorer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreTuning {
    /// Upper bound for a believable kills/deaths/assists value
    #[serde(default = "default_max_kda")]
    pub max_kda: u64,
    /// Upper bound for a believable damage/healing/mitigation value
    #[serde(default = "default_max_output")]
    pub max_output: u64,
    /// Output value that counts as real activity rather than noise
    #[serde(default = "default_output_floor")]
    pub output_floor: u64,
    /// Output value considered suspiciously large (likely a merged artifact)
    #[serde(default = "default_huge_output")]
    pub huge_output: u64,
    /// Bonus when at least one KDA value is nonzero
    #[serde(default = "default_kda_bonus")]
    pub kda_bonus: i32,
    /// Bonus when damage clears the output floor
    #[serde(default = "default_damage_bonus")]
    pub damage_bonus: i32,
    /// Bonus when healing clears the output floor
    #[serde(default = "default_healing_bonus")]
    pub healing_bonus: i32,
    /// Bonus when mitigation clears the output floor
    #[serde(default = "default_mitigation_bonus")]
    pub mitigation_bonus: i32,
    /// Penalty per output field at or above `huge_output`
    #[serde(default = "default_huge_penalty")]
    pub huge_penalty: i32,
    /// Maximum edit distance for a fuzzy name match
    #[serde(default = "default_max_name_distance")]
    pub max_name_distance: usize,
}

fn default_max_kda() -> u64 {
    80
}

fn default_max_output() -> u64 {
    200_000
}

fn default_output_floor() -> u64 {
    100
}

fn default_huge_output() -> u64 {
    100_000
}

fn default_kda_bonus() -> i32 {
    5
}

fn default_damage_bonus() -> i32 {
    3
}

fn default_healing_bonus() -> i32 {
    2
}

fn default_mitigation_bonus() -> i32 {
    2
}

fn default_huge_penalty() -> i32 {
    5
}

fn default_max_name_distance() -> usize {
    2
}

impl Default for ScoreTuning {
    fn default() -> Self {
        Self {
            max_kda: default_max_kda(),
            max_output: default_max_output(),
            output_floor: default_output_floor(),
            huge_output: default_huge_output(),
            kda_bonus: default_kda_bonus(),
            damage_bonus: default_damage_bonus(),
            healing_bonus: default_healing_bonus(),
            mitigation_bonus: default_mitigation_bonus(),
            huge_penalty: default_huge_penalty(),
            max_name_distance: default_max_name_distance(),
        }
    }
}

/// Scores six values interpreted positionally as (k, d, a, dmg, heal, mit).
/// Returns None when any value fails the plausibility gate.
fn score_values(values: &[u64; 6], tuning: &ScoreTuning) -> Option<i32> {
    let (kda, outputs) = (&values[..3], &values[3..]);
    if kda.iter().any(|&v| v > tuning.max_kda) {
        return None;
    }
    if outputs.iter().any(|&v| v > tuning.max_output) {
        return None;
    }

    let mut score = 0;
    if kda.iter().any(|&v| v > 0) {
        score += tuning.kda_bonus;
    }
    if values[3] >= tuning.output_floor {
        score += tuning.damage_bonus;
    }
    if values[4] >= tuning.output_floor {
        score += tuning.healing_bonus;
    }
    if values[5] >= tuning.output_floor {
        score += tuning.mitigation_bonus;
    }
    score -= tuning.huge_penalty
        * outputs.iter().filter(|&&v| v >= tuning.huge_output).count() as i32;

    Some(score)
}

fn scored(values: [u64; 6], tuning: &ScoreTuning) -> Option<ScoredWindow> {
    score_values(&values, tuning).map(|score| ScoredWindow {
        stats: StatWindow::from_values(values),
        score,
    })
}

/// Finds the most plausible width-6 window in a flat number sequence.
///
/// With six or more numbers, slides the window and keeps the maximum score,
/// leftmost on ties. Exactly five numbers model one field dropped by OCR:
/// the window is retried with a single zero inserted at the common drop
/// points (a KDA field or the trailing mitigation, positions 0/1/2/5).
pub fn best_window(numbers: &[u64], tuning: &ScoreTuning) -> Option<ScoredWindow> {
    if numbers.len() >= 6 {
        let mut best: Option<ScoredWindow> = None;
        for chunk in numbers.windows(6) {
            let values = [chunk[0], chunk[1], chunk[2], chunk[3], chunk[4], chunk[5]];
            if let Some(candidate) = scored(values, tuning) {
                if best.is_none_or(|b| candidate.score > b.score) {
                    best = Some(candidate);
                }
            }
        }
        return best;
    }

    if numbers.len() == 5 {
        let mut best: Option<ScoredWindow> = None;
        for pos in [0usize, 1, 2, 5] {
            let mut padded = numbers.to_vec();
            padded.insert(pos, 0);
            let values = [
                padded[0], padded[1], padded[2], padded[3], padded[4], padded[5],
            ];
            if let Some(candidate) = scored(values, tuning) {
                if best.is_none_or(|b| candidate.score > b.score) {
                    best = Some(candidate);
                }
            }
        }
        return best;
    }

    None
}

/// Last-resort degradation when no real window exists: the final three
/// numbers become (damage, healing, mitigation) with a zero KDA, provided
/// that triple alone passes the plausibility gate. A partial best-effort row
/// beats no row.
pub fn trailing_output_window(numbers: &[u64], tuning: &ScoreTuning) -> Option<ScoredWindow> {
    if numbers.len() < 3 {
        return None;
    }
    let tail = &numbers[numbers.len() - 3..];
    scored([0, 0, 0, tail[0], tail[1], tail[2]], tuning)
}

/// Detects the KDA column order from header-like letter runs. "KAD" with no
/// "KDA" anywhere tags the whole call KAD; the default is KDA.
pub fn detect_kda_order(lines: &[RawLine]) -> KdaOrder {
    let mut saw_kad = false;
    for line in lines {
        for run in letter_runs(&line.text) {
            match run.as_str() {
                "KDA" => return KdaOrder::Kda,
                "KAD" => saw_kad = true,
                _ => {}
            }
        }
    }
    if saw_kad { KdaOrder::Kad } else { KdaOrder::Kda }
}

/// Splits a line into maximal runs of ASCII letters, uppercased.
fn letter_runs(text: &str) -> Vec<String> {
    let mut runs = Vec::new();
    let mut current = String::new();
    for c in text.chars() {
        if c.is_ascii_alphabetic() {
            current.push(c.to_ascii_uppercase());
        } else if !current.is_empty() {
            runs.push(std::mem::take(&mut current));
        }
    }
    if !current.is_empty() {
        runs.push(current);
    }
    runs
}
