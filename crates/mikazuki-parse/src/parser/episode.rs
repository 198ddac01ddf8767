use regex::Regex;
use std::sync::LazyLock;

/// Episode content identified within a single token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EpisodeSpan {
    /// One episode.
    Single(u32),
    /// An explicit list of episodes (e.g., `S01E03E04`).
    List(Vec<u32>),
    /// An inclusive episode range (e.g., `全12話` → 1..=12).
    Range(u32, u32),
}

/// Result of a successful episode extraction.
#[derive(Debug, Clone)]
pub struct EpisodeMatch {
    pub span: EpisodeSpan,
    /// Season number if extracted from a combined pattern (e.g., S01E05 → 1).
    pub season: Option<u32>,
}

// ── Regex patterns (compiled once) ──────────────────────────────

static RE_MULTI: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:S(\d{1,2}))?((?:E\d{1,4}){2,})$").unwrap());

static RE_MULTI_PART: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)E(\d{1,4})").unwrap());

static RE_COMBINED: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^S(\d{1,2})E(\d{1,4})(?:v\d)?$").unwrap());

static RE_COMBINED_X: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})[xX](\d{1,4})$").unwrap());

static RE_KEYWORD_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:EP\.?|E|EPS|EPISODE|#)(\d{1,4})(?:v\d)?$").unwrap());

static RE_VERSION_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,4})[vV]\d$").unwrap());

static RE_FRACTIONAL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(\d{1,4})\.5$").unwrap());

static RE_JAPANESE_COUNTER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^第(\d{1,4})[話集]$").unwrap());

static RE_JAPANESE_FULL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^全(\d{1,4})[話集]$").unwrap());

const MAX_EPISODE: u32 = 1999;

/// Try all single-token episode strategies in order of specificity.
/// Returns the first successful match.
pub fn try_extract(text: &str) -> Option<EpisodeMatch> {
    let text = text.trim();
    if text.is_empty() || is_year_like(text) {
        return None;
    }

    if let Some(m) = try_multi(text) {
        return Some(m);
    }
    if let Some(m) = try_combined(text) {
        return Some(m);
    }
    if let Some(m) = try_keyword_prefix(text) {
        return Some(m);
    }
    if let Some(m) = try_version_suffix(text) {
        return Some(m);
    }
    if let Some(m) = try_fractional(text) {
        return Some(m);
    }
    if let Some(m) = try_japanese(text) {
        return Some(m);
    }

    None
}

/// Multi-episode token: `S01E03E04`, `E01E02E03`.
fn try_multi(text: &str) -> Option<EpisodeMatch> {
    let caps = RE_MULTI.captures(text)?;
    let season: Option<u32> = caps.get(1).and_then(|m| m.as_str().parse().ok());
    let mut episodes = Vec::new();
    for part in RE_MULTI_PART.captures_iter(&caps[2]) {
        let n: u32 = part[1].parse().ok()?;
        if n > MAX_EPISODE {
            return None;
        }
        episodes.push(n);
    }
    Some(EpisodeMatch {
        span: EpisodeSpan::List(episodes),
        season,
    })
}

/// Combined format: `S01E05`, `01x05`.
fn try_combined(text: &str) -> Option<EpisodeMatch> {
    let caps = RE_COMBINED
        .captures(text)
        .or_else(|| RE_COMBINED_X.captures(text))?;
    let season: u32 = caps[1].parse().ok()?;
    let episode: u32 = caps[2].parse().ok()?;
    if episode > MAX_EPISODE {
        return None;
    }
    Some(EpisodeMatch {
        span: EpisodeSpan::Single(episode),
        season: Some(season),
    })
}

/// Keyword-prefixed: `EP05`, `E05`, `#03`.
fn try_keyword_prefix(text: &str) -> Option<EpisodeMatch> {
    let caps = RE_KEYWORD_PREFIX.captures(text)?;
    let number: u32 = caps[1].parse().ok()?;
    if number > MAX_EPISODE {
        return None;
    }
    Some(EpisodeMatch {
        span: EpisodeSpan::Single(number),
        season: None,
    })
}

/// Version suffix: `05v2` → episode 5.
fn try_version_suffix(text: &str) -> Option<EpisodeMatch> {
    let caps = RE_VERSION_SUFFIX.captures(text)?;
    let number: u32 = caps[1].parse().ok()?;
    if number > MAX_EPISODE {
        return None;
    }
    Some(EpisodeMatch {
        span: EpisodeSpan::Single(number),
        season: None,
    })
}

/// Fractional episode: `07.5` → episode 7.
fn try_fractional(text: &str) -> Option<EpisodeMatch> {
    let caps = RE_FRACTIONAL.captures(text)?;
    let number: u32 = caps[1].parse().ok()?;
    if number > MAX_EPISODE {
        return None;
    }
    Some(EpisodeMatch {
        span: EpisodeSpan::Single(number),
        season: None,
    })
}

/// Japanese counters: `第05話`/`第05集` (single), `全12話`/`全12集`
/// (complete batch → range from 1).
fn try_japanese(text: &str) -> Option<EpisodeMatch> {
    if let Some(caps) = RE_JAPANESE_COUNTER.captures(text) {
        let number: u32 = caps[1].parse().ok()?;
        if number > MAX_EPISODE {
            return None;
        }
        return Some(EpisodeMatch {
            span: EpisodeSpan::Single(number),
            season: None,
        });
    }
    let caps = RE_JAPANESE_FULL.captures(text)?;
    let count: u32 = caps[1].parse().ok()?;
    if count == 0 || count > MAX_EPISODE {
        return None;
    }
    Some(EpisodeMatch {
        span: EpisodeSpan::Range(1, count),
        season: None,
    })
}

/// Parse a plain number token as an episode number. Used by the parser only
/// in positions where an episode is plausible (after a dash, in brackets).
pub fn try_plain_number(text: &str) -> Option<u32> {
    let text = text.trim();
    if is_year_like(text) {
        return None;
    }
    let number: u32 = text.parse().ok()?;
    if number > MAX_EPISODE {
        return None;
    }
    Some(number)
}

/// Check if a 4-digit number looks like a year (1950-2050).
fn is_year_like(s: &str) -> bool {
    if s.len() == 4 {
        if let Ok(n) = s.parse::<u32>() {
            return (1950..=2050).contains(&n);
        }
    }
    false
}
