use super::tokens;

/// Menu/UI chrome fragments that carry no scoreboard data. Lines containing
/// any of these are dropped before numeric or name analysis.
const CHROME_MARKERS: &[&str] = &["SUMMARY", "TEAMS", "PERSONAL", "ENTER CHAT"];

/// A trimmed, whitespace-collapsed, non-empty line of OCR text with its
/// position in the filtered sequence.
#[derive(Debug, Clone)]
pub struct RawLine {
    pub index: usize,
    pub text: String,
}

/// A line or adjacent line pair that yielded enough numbers to hold a full
/// scoreboard row.
#[derive(Debug, Clone)]
pub struct RowCandidate {
    /// Index of the first line the candidate spans
    pub line_index: usize,
    /// Number of lines spanned (1 or 2)
    pub span: usize,
    pub text: String,
    pub numbers: Vec<u64>,
}

fn is_chrome(text: &str) -> bool {
    let upper = text.to_ascii_uppercase();
    CHROME_MARKERS.iter().any(|marker| upper.contains(marker))
}

/// Splits raw OCR output into analyzable lines: whitespace collapsed, empty
/// lines and UI chrome removed, indices assigned over the survivors.
pub fn split_lines(raw: &str) -> Vec<RawLine> {
    raw.lines()
        .map(|line| {
            line.split_whitespace()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|text| !text.is_empty() && !is_chrome(text))
        .enumerate()
        .map(|(index, text)| RawLine { index, text })
        .collect()
}

/// Builds row candidates: every single line with ≥6 numbers, plus every
/// adjacent pair reaching ≥6 only when joined (a scoreboard row wrapped
/// across an OCR line break).
pub fn collect_candidates(lines: &[RawLine]) -> Vec<RowCandidate> {
    let mut candidates = Vec::new();
    for (i, line) in lines.iter().enumerate() {
        let numbers = tokens::extract_numbers(&line.text);
        let single_qualifies = numbers.len() >= 6;
        if single_qualifies {
            candidates.push(RowCandidate {
                line_index: i,
                span: 1,
                text: line.text.clone(),
                numbers,
            });
        }
        if !single_qualifies && i + 1 < lines.len() {
            let joined = format!("{} {}", line.text, lines[i + 1].text);
            let numbers = tokens::extract_numbers(&joined);
            if numbers.len() >= 6 {
                candidates.push(RowCandidate {
                    line_index: i,
                    span: 2,
                    text: joined,
                    numbers,
                });
            }
        }
    }
    candidates
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_lines_trims_and_collapses() {
        let lines = split_lines("  RIDICULOID   12  6 9 \n\n BUTTSTOUGH 8 10 15 ");
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0].text, "RIDICULOID 12 6 9");
        assert_eq!(lines[0].index, 0);
        assert_eq!(lines[1].index, 1);
    }

    #[test]
    fn test_split_lines_drops_chrome() {
        let raw = "MATCH SUMMARY\nTEAMS\nRIDICULOID 12 6 9\nPress ENTER CHAT to talk\npersonal stats";
        let lines = split_lines(raw);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].text, "RIDICULOID 12 6 9");
    }

    #[test]
    fn test_split_lines_empty_input() {
        assert!(split_lines("").is_empty());
        assert!(split_lines("\n\n  \n").is_empty());
    }

    #[test]
    fn test_collect_candidates_single_line() {
        let lines = split_lines("RIDICULOID 12 6 9 14500 300 1200");
        let candidates = collect_candidates(&lines);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].span, 1);
        assert_eq!(candidates[0].numbers, vec![12, 6, 9, 14500, 300, 1200]);
    }

    #[test]
    fn test_collect_candidates_wrapped_pair() {
        let lines = split_lines("RIDICULOID 12 6 9\n14500 300 1200");
        let candidates = collect_candidates(&lines);
        assert_eq!(candidates.len(), 1);
        assert_eq!(candidates[0].line_index, 0);
        assert_eq!(candidates[0].span, 2);
        assert_eq!(candidates[0].numbers, vec![12, 6, 9, 14500, 300, 1200]);
    }

    #[test]
    fn test_collect_candidates_too_few_numbers() {
        let lines = split_lines("RIDICULOID 12 6\nsome chat text");
        assert!(collect_candidates(&lines).is_empty());
    }
}
