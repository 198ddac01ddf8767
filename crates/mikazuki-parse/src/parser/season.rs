use regex::Regex;
use std::sync::LazyLock;

/// "S2", "S01" — standalone season prefix.
static RE_S_PREFIX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)^S(\d{1,2})$").unwrap());

/// "Season 2", "Season II", "Saison 2" (joined form).
static RE_SEASON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:Season|Saison)\s+([\dIVXivx]+)$").unwrap());

/// "2nd Season", "3rd Season" (joined form).
static RE_NTH_SEASON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d{1,2})(?:st|nd|rd|th)\s+Season$").unwrap());

/// Japanese: "第2期", "2期".
static RE_JAPANESE_SEASON: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:第)?(\d{1,2})期$").unwrap());

/// Try all season-only extraction strategies against one token (or a
/// parser-joined token pair like "Season 2").
pub fn try_extract(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Some(caps) = RE_S_PREFIX.captures(text) {
        return caps[1].parse().ok();
    }
    if let Some(caps) = RE_SEASON_WORD.captures(text) {
        return parse_number_or_roman(&caps[1]);
    }
    if let Some(caps) = RE_NTH_SEASON.captures(text) {
        return caps[1].parse().ok();
    }
    if let Some(caps) = RE_JAPANESE_SEASON.captures(text) {
        return caps[1].parse().ok();
    }

    None
}

/// Whether a token is a season keyword that expects a following number
/// ("Season 2") or a preceding ordinal ("2nd Season").
pub fn is_season_word(text: &str) -> bool {
    text.eq_ignore_ascii_case("season") || text.eq_ignore_ascii_case("saison")
}

/// Parse a number that might be Arabic or Roman numerals.
fn parse_number_or_roman(s: &str) -> Option<u32> {
    if let Ok(n) = s.parse::<u32>() {
        return Some(n);
    }
    roman_to_u32(s)
}

/// Simple Roman numeral to u32 conversion.
fn roman_to_u32(s: &str) -> Option<u32> {
    let s = s.to_uppercase();
    let mut total: i32 = 0;
    let mut prev = 0i32;

    for c in s.chars().rev() {
        let value = match c {
            'I' => 1,
            'V' => 5,
            'X' => 10,
            'L' => 50,
            _ => return None,
        };
        if value < prev {
            total -= value;
        } else {
            total += value;
        }
        prev = value;
    }

    if total > 0 {
        Some(total as u32)
    } else {
        None
    }
}
