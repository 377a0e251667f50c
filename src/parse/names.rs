use strsim::levenshtein;

use super::lines::RawLine;
use crate::roster::PlayerEntry;

/// Normalizes a token for name comparison: uppercase, canonicalize the
/// letter/digit confusions OCR keeps producing (0↔O, 1↔I, 5↔S), drop
/// everything that is not an ASCII letter afterwards.
pub fn normalize_token(token: &str) -> String {
    token
        .chars()
        .filter_map(|c| {
            let c = match c.to_ascii_uppercase() {
                '0' => 'O',
                '1' => 'I',
                '5' => 'S',
                c => c,
            };
            c.is_ascii_alphabetic().then_some(c)
        })
        .collect()
}

/// Fuzzy matcher for one player's handle against its known OCR variants.
///
/// Built once per parse call from the roster entry; all variant strings are
/// pre-normalized. A token matches when its minimum Levenshtein distance
/// across the variants is within `max_distance`.
#[derive(Debug, Clone)]
pub struct NameMatcher {
    targets: Vec<String>,
    max_distance: usize,
}

impl NameMatcher {
    pub fn new(player: &PlayerEntry, max_distance: usize) -> Self {
        let mut targets: Vec<String> = std::iter::once(player.id.as_str())
            .chain(player.variants.iter().map(String::as_str))
            .map(normalize_token)
            .filter(|t| !t.is_empty())
            .collect();
        targets.dedup();
        Self { targets, max_distance }
    }

    /// Minimum edit distance from a raw token to any variant.
    /// Empty-after-normalization tokens never match.
    pub fn distance(&self, token: &str) -> usize {
        let normalized = normalize_token(token);
        if normalized.is_empty() {
            return usize::MAX;
        }
        self.targets
            .iter()
            .map(|t| levenshtein(&normalized, t))
            .min()
            .unwrap_or(usize::MAX)
    }

    /// Fine-grained inline mode: the index of the best-matching whitespace
    /// token within one line, with its distance. First occurrence wins ties
    /// (strict `<`).
    pub fn token_index(&self, text: &str) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for (idx, token) in text.split_whitespace().enumerate() {
            let dist = self.distance(token);
            if dist <= self.max_distance && best.is_none_or(|(_, d)| dist < d) {
                best = Some((idx, dist));
            }
        }
        best
    }

    /// Coarse mode: the line whose best token has the globally minimal
    /// distance across the whole block. First occurrence wins ties.
    pub fn best_line(&self, lines: &[RawLine]) -> Option<(usize, usize)> {
        let mut best: Option<(usize, usize)> = None;
        for (line_idx, line) in lines.iter().enumerate() {
            if let Some((_, dist)) = self.token_index(&line.text) {
                if best.is_none_or(|(_, d)| dist < d) {
                    best = Some((line_idx, dist));
                }
            }
        }
        best
    }

    /// True if any token in the text names this player.
    pub fn names_line(&self, text: &str) -> bool {
        self.token_index(text).is_some()
    }
}
