pub mod episode;
pub mod season;

use crate::descriptor::EpisodeDescriptor;
use crate::tokenizer::{self, Token, TokenKind};
use episode::EpisodeSpan;

/// Parse a release title into an episode descriptor.
///
/// Total function: malformed or structure-free input yields the default
/// descriptor, never an error.
///
/// # Example
/// ```
/// let d = mikazuki_parse::parse("Show.S01E01.1080p.WEB-DL");
/// assert_eq!(d.season, Some(1));
/// assert_eq!(d.episodes, vec![1]);
/// ```
pub fn parse(title: &str) -> EpisodeDescriptor {
    let tokens = tokenizer::tokenize(title);
    let mut desc = EpisodeDescriptor::default();
    let mut identified = vec![false; tokens.len()];

    extract_episode(&tokens, &mut desc, &mut identified);
    if desc.season.is_none() {
        extract_season(&tokens, &mut desc, &mut identified);
    }

    desc
}

/// Find episode structure. Strategies run in order of reliability; the
/// first hit wins.
fn extract_episode(tokens: &[Token], desc: &mut EpisodeDescriptor, identified: &mut [bool]) {
    // Strategy 1: token-level patterns (S01E05, E01E02, EP05, 第05話, ...),
    // with a cross-token range merge for "S01E01 - E12" / "E01-E12".
    for i in 0..tokens.len() {
        if identified[i] || tokens[i].kind == TokenKind::Delimiter || tokens[i].text == "-" {
            continue;
        }
        if let Some(m) = episode::try_extract(&tokens[i].text) {
            identified[i] = true;
            desc.season = desc.season.or(m.season);
            if let EpisodeSpan::Single(begin) = m.span {
                if let Some(end) = merge_range_suffix(tokens, identified, i, begin) {
                    desc.begin_episode = Some(begin);
                    desc.end_episode = Some(end);
                    return;
                }
            }
            apply_span(m.span, desc);
            return;
        }
    }

    // Strategy 2: dash-number ("Title - 05"), optionally extended to a
    // range ("Title - 01-13").
    for i in 0..tokens.len() {
        if identified[i] || tokens[i].kind != TokenKind::FreeText || tokens[i].text != "-" {
            continue;
        }
        identified[i] = true;
        let Some(next) = next_free_text(tokens, identified, i) else {
            continue;
        };
        let Some(begin) = episode::try_plain_number(&tokens[next].text) else {
            continue;
        };
        identified[next] = true;
        if let Some(end) = merge_range_suffix(tokens, identified, next, begin) {
            desc.begin_episode = Some(begin);
            desc.end_episode = Some(end);
        } else {
            desc.episodes = vec![begin];
        }
        return;
    }

    // Strategy 3: standalone number following free text ("Frieren 05").
    // A number right after a season keyword belongs to the season pass
    // ("Season 2"), not here.
    let mut saw_text = false;
    let mut prev_is_season_word = false;
    for i in 0..tokens.len() {
        if identified[i] || tokens[i].kind != TokenKind::FreeText {
            continue;
        }
        if let Some(n) = episode::try_plain_number(&tokens[i].text) {
            if saw_text && !prev_is_season_word {
                desc.episodes = vec![n];
                identified[i] = true;
                return;
            }
        } else {
            saw_text = true;
        }
        prev_is_season_word = season::is_season_word(&tokens[i].text);
    }

    // Strategy 4: bracketed episode number ("[01]", "[12v2]").
    for i in 0..tokens.len() {
        if identified[i] || tokens[i].kind != TokenKind::Bracketed {
            continue;
        }
        if let Some(n) = episode::try_plain_number(&tokens[i].text) {
            desc.episodes = vec![n];
            identified[i] = true;
            return;
        }
    }
}

/// Find a season marker among the tokens the episode pass left behind.
fn extract_season(tokens: &[Token], desc: &mut EpisodeDescriptor, identified: &mut [bool]) {
    for i in 0..tokens.len() {
        if identified[i] || tokens[i].kind == TokenKind::Delimiter {
            continue;
        }
        let text = &tokens[i].text;

        if let Some(n) = season::try_extract(text) {
            desc.season = Some(n);
            identified[i] = true;
            return;
        }

        // Two-token word forms: "Season 2" and "2nd Season".
        if season::is_season_word(text) {
            if let Some(next) = next_free_text(tokens, identified, i) {
                let joined = format!("{text} {}", tokens[next].text);
                if let Some(n) = season::try_extract(&joined) {
                    desc.season = Some(n);
                    identified[i] = true;
                    identified[next] = true;
                    return;
                }
            }
            if i > 0 {
                if let Some(prev) = prev_free_text(tokens, identified, i) {
                    let joined = format!("{} {text}", tokens[prev].text);
                    if let Some(n) = season::try_extract(&joined) {
                        desc.season = Some(n);
                        identified[i] = true;
                        identified[prev] = true;
                        return;
                    }
                }
            }
        }
    }
}

/// After a single episode at `i`, look for "- <episode>" to form a range.
/// Marks the consumed tokens and returns the range end on success.
fn merge_range_suffix(
    tokens: &[Token],
    identified: &mut [bool],
    i: usize,
    begin: u32,
) -> Option<u32> {
    let dash = next_free_text(tokens, identified, i)?;
    if tokens[dash].text != "-" {
        return None;
    }
    let tail = next_free_text(tokens, identified, dash)?;
    let end = match episode::try_extract(&tokens[tail].text) {
        Some(episode::EpisodeMatch {
            span: EpisodeSpan::Single(n),
            ..
        }) => n,
        Some(_) => return None,
        None => episode::try_plain_number(&tokens[tail].text)?,
    };
    if end <= begin {
        return None;
    }
    identified[dash] = true;
    identified[tail] = true;
    Some(end)
}

fn apply_span(span: EpisodeSpan, desc: &mut EpisodeDescriptor) {
    match span {
        EpisodeSpan::Single(n) => desc.episodes = vec![n],
        EpisodeSpan::List(list) => desc.episodes = list,
        EpisodeSpan::Range(begin, end) => {
            desc.begin_episode = Some(begin);
            desc.end_episode = Some(end);
        }
    }
}

/// Find the next unidentified free text token after index `start`.
fn next_free_text(tokens: &[Token], identified: &[bool], start: usize) -> Option<usize> {
    for i in (start + 1)..tokens.len() {
        if identified[i] || tokens[i].kind == TokenKind::Delimiter {
            continue;
        }
        if tokens[i].kind == TokenKind::FreeText {
            return Some(i);
        }
        return None;
    }
    None
}

/// Find the closest unidentified free text token before index `end`.
fn prev_free_text(tokens: &[Token], identified: &[bool], end: usize) -> Option<usize> {
    for i in (0..end).rev() {
        if identified[i] || tokens[i].kind == TokenKind::Delimiter {
            continue;
        }
        if tokens[i].kind == TokenKind::FreeText {
            return Some(i);
        }
        return None;
    }
    None
}
