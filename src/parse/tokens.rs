use regex::Regex;
use std::sync::OnceLock;

/// Pattern to match number-like runs:
/// - Plain numbers: 14500
/// - Numbers with comma separators: 14,500 or 1,234,567
/// - Numbers with period separators: 1.234 (OCR misread of 1,234)
const NUMBER_PATTERN: &str = r"\d+(?:[.,]\d+)*";

fn number_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(NUMBER_PATTERN).expect("number pattern is valid"))
}

/// Parses a single number-like token, removing comma and period separators.
///
/// A comma is always a grouping separator. A period followed by exactly three
/// digits is a grouping separator too ("1.234" is OCR misreading "1,234");
/// any other period token still concatenates its digits, since the domain has
/// no fractional stats and a large magnitude beats fractional precision.
/// Returns None for tokens whose digits do not parse.
pub fn parse_number(token: &str) -> Option<u64> {
    let digits: String = token.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<u64>().ok()
}

/// Extracts the ordered sequence of non-negative integers from a line.
/// Unparsable fragments are dropped silently.
pub fn extract_numbers(text: &str) -> Vec<u64> {
    number_regex()
        .find_iter(text)
        .filter_map(|m| parse_number(m.as_str()))
        .collect()
}

/// Converts whitespace-split tokens to numbers, applying the single-letter
/// corrections OCR commonly needs for small stat digits: a lone "A" is a
/// misread 4 and a lone "O" a misread 0. Everything else goes through the
/// normal number extraction, so "12/6/9" still yields three values.
pub fn inline_numbers(tokens: &[&str]) -> Vec<u64> {
    let mut out = Vec::new();
    for token in tokens {
        match *token {
            "A" | "a" => out.push(4),
            "O" | "o" => out.push(0),
            _ => out.extend(extract_numbers(token)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_number() {
        assert_eq!(parse_number("14500"), Some(14500));
        assert_eq!(parse_number("14,500"), Some(14500));
        assert_eq!(parse_number("1,234,567"), Some(1234567));
        // Period with a three-digit tail is a misread thousands separator
        assert_eq!(parse_number("1.234"), Some(1234));
        // Other period tokens still collapse to their digits
        assert_eq!(parse_number("8.5"), Some(85));
        assert_eq!(parse_number("--"), None);
        assert_eq!(parse_number(""), None);
    }

    #[test]
    fn test_parse_number_overlong_garbage_dropped() {
        // 25 digits overflow u64; the token is discarded, not truncated
        assert_eq!(parse_number("1234567890123456789012345"), None);
    }

    #[test]
    fn test_extract_numbers_ordered() {
        assert_eq!(
            extract_numbers("RIDICULOID 12 6 9 14,500 300 1.200"),
            vec![12, 6, 9, 14500, 300, 1200]
        );
    }

    #[test]
    fn test_extract_numbers_slash_separated() {
        assert_eq!(extract_numbers("12/6/9"), vec![12, 6, 9]);
    }

    #[test]
    fn test_extract_numbers_no_digits() {
        assert!(extract_numbers("ENTER CHAT").is_empty());
    }

    #[test]
    fn test_inline_numbers_letter_corrections() {
        assert_eq!(inline_numbers(&["12", "A", "O", "9000"]), vec![12, 4, 0, 9000]);
        // Corrections only apply to lone letters, not words containing them
        assert_eq!(inline_numbers(&["ANA", "12"]), vec![12]);
    }
}
