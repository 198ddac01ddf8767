/// Token types produced by the tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenKind {
    /// Text enclosed in brackets: `[SubGroup]`, `(1080p)`.
    Bracketed,
    /// Free text between brackets/delimiters.
    FreeText,
    /// A run of delimiter characters (space, underscore, dot).
    Delimiter,
}

/// A single token from a release title.
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
}

/// Opening/closing bracket pairs, including CJK brackets.
const BRACKETS: &[(char, char)] = &[
    ('[', ']'),
    ('(', ')'),
    ('{', '}'),
    ('\u{300C}', '\u{300D}'), // 「」
    ('\u{300E}', '\u{300F}'), // 『』
    ('\u{3010}', '\u{3011}'), // 【】
];

/// Characters that separate tokens (excluding dash, which gets special treatment).
fn is_soft_delimiter(c: char) -> bool {
    matches!(c, ' ' | '_' | '.' | '\u{3000}')
}

/// Dash-family characters, emitted as `FreeText("-")` so the parser can
/// detect `Title - 05` patterns.
fn is_dash(c: char) -> bool {
    matches!(c, '-' | '\u{2013}' | '\u{2014}')
}

fn opening_bracket(c: char) -> Option<char> {
    BRACKETS
        .iter()
        .find(|(open, _)| *open == c)
        .map(|(_, close)| *close)
}

/// Tokenize a release title into structured tokens.
///
/// Handles bracket-enclosed groups (`[...]`, `(...)`, `{...}`, CJK variants),
/// delimiter-separated free text (space, underscore, dot — the dominant
/// separators in scene-style names like `Show.S01E01.1080p.WEB-DL`), and
/// dashes. A trailing video file extension is stripped first.
pub fn tokenize(input: &str) -> Vec<Token> {
    let input = strip_extension(input);
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        // Bracket-enclosed content.
        if let Some(close) = opening_bracket(c) {
            i += 1;
            let start = i;
            while i < chars.len() && chars[i] != close {
                i += 1;
            }
            let text: String = chars[start..i].iter().collect();
            if !text.is_empty() {
                tokens.push(Token {
                    kind: TokenKind::Bracketed,
                    text,
                });
            }
            if i < chars.len() {
                i += 1; // skip closing bracket
            }
            continue;
        }

        if is_dash(c) {
            tokens.push(Token {
                kind: TokenKind::FreeText,
                text: "-".into(),
            });
            i += 1;
            while i < chars.len() && is_soft_delimiter(chars[i]) {
                i += 1;
            }
            continue;
        }

        if is_soft_delimiter(c) {
            while i < chars.len() && is_soft_delimiter(chars[i]) {
                i += 1;
            }
            tokens.push(Token {
                kind: TokenKind::Delimiter,
                text: " ".into(),
            });
            continue;
        }

        // Free text: everything else until a delimiter, dash or bracket.
        let start = i;
        while i < chars.len() && !is_dash(chars[i]) && opening_bracket(chars[i]).is_none() {
            if is_soft_delimiter(chars[i]) {
                // A dot inside a pure number ("07.5") stays in the token.
                // The token so far must be all digits, otherwise dotted
                // scene names ("S01E01.1080p") would fuse into one token.
                if chars[i] == '.'
                    && i + 1 < chars.len()
                    && chars[i + 1].is_ascii_digit()
                    && i > start
                    && chars[start..i].iter().all(|c| c.is_ascii_digit())
                {
                    i += 1;
                    continue;
                }
                break;
            }
            i += 1;
        }
        let text: String = chars[start..i].iter().collect();
        if !text.is_empty() {
            tokens.push(Token {
                kind: TokenKind::FreeText,
                text,
            });
        }
    }

    tokens
}

/// Strip a trailing video file extension, if any.
fn strip_extension(input: &str) -> &str {
    for ext in &[
        ".mkv", ".mp4", ".avi", ".wmv", ".flv", ".webm", ".m4v", ".ts", ".mov", ".m2ts", ".rmvb",
    ] {
        let split_pos = input.len().wrapping_sub(ext.len());
        if split_pos < input.len() && input.is_char_boundary(split_pos) {
            let suffix = &input[split_pos..];
            if suffix.eq_ignore_ascii_case(ext) {
                return &input[..split_pos];
            }
        }
    }
    input
}
