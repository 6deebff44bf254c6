//! Converters for single raw sub-fields.

use crate::stat::Movement;

const PARAGRAPH_OPEN: &str = "<p>";
const PARAGRAPH_CLOSE: &str = "</p>";
const NOTE_LABEL: &str = "note";
const HAS_MARKER: &str = "elemento_hab'>";
const HAS_TERMINATOR: &str = "</";

/// Decode a `"<a>-<b>"` movement string (one or two digits each side).
///
/// The first match anywhere in `raw` wins. Anything without a match yields
/// `(0, 0)`; the feed carries placeholder movement strings for some troops.
pub fn parse_movement(raw: &str) -> Movement {
    let bytes = raw.as_bytes();
    (0..bytes.len())
        .find_map(|start| match_movement_at(bytes, start))
        .map(|(first, second)| Movement::from_source(first, second))
        .unwrap_or_default()
}

fn match_movement_at(bytes: &[u8], start: usize) -> Option<(i32, i32)> {
    [2, 1].into_iter().find_map(|first_len| {
        let first = digit_run(bytes, start, first_len)?;
        let dash = start + first_len;
        if bytes.get(dash) != Some(&b'-') {
            return None;
        }
        let second = digit_run(bytes, dash + 1, 2).or_else(|| digit_run(bytes, dash + 1, 1))?;
        Some((first, second))
    })
}

fn digit_run(bytes: &[u8], start: usize, len: usize) -> Option<i32> {
    let run = bytes.get(start..start + len)?;
    if !run.iter().all(u8::is_ascii_digit) {
        return None;
    }
    Some(run.iter().fold(0, |acc, b| acc * 10 + i32::from(b - b'0')))
}

/// Clean a free-text notes field into its paragraphs.
///
/// Closing `</p>` tags and `NOTE n:` labels are removed, the rest is split on
/// opening `<p>` tags. Matching is ASCII case-insensitive.
pub fn parse_notes(raw: &str) -> Vec<String> {
    let text = remove_ignore_ascii_case(raw.trim(), PARAGRAPH_CLOSE);
    let text = strip_note_labels(&text);
    split_ignore_ascii_case(&text, PARAGRAPH_OPEN)
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ASCII lowercasing keeps byte offsets, so indices found in the lowered copy
// are valid in the original.
fn split_ignore_ascii_case<'a>(text: &'a str, token: &str) -> Vec<&'a str> {
    let lowered = text.to_ascii_lowercase();
    let mut out = Vec::new();
    let mut cursor = 0;
    while let Some(offset) = lowered[cursor..].find(token) {
        out.push(&text[cursor..cursor + offset]);
        cursor += offset + token.len();
    }
    out.push(&text[cursor..]);
    out
}

fn remove_ignore_ascii_case(text: &str, token: &str) -> String {
    split_ignore_ascii_case(text, token).concat()
}

fn strip_note_labels(text: &str) -> String {
    let lowered = text.to_ascii_lowercase();
    let bytes = lowered.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut cursor = 0;
    while let Some(offset) = lowered[cursor..].find(NOTE_LABEL) {
        let start = cursor + offset;
        match note_label_end(bytes, start + NOTE_LABEL.len()) {
            Some(end) => {
                out.push_str(&text[copied..start]);
                copied = end;
                cursor = end;
            }
            None => cursor = start + NOTE_LABEL.len(),
        }
    }
    out.push_str(&text[copied..]);
    out
}

/// After the word `note`: one space, one or two digits, then a colon.
fn note_label_end(bytes: &[u8], mut pos: usize) -> Option<usize> {
    if bytes.get(pos) != Some(&b' ') {
        return None;
    }
    pos += 1;
    let digits = bytes[pos.min(bytes.len())..]
        .iter()
        .take_while(|b| b.is_ascii_digit())
        .count();
    if !(1..=2).contains(&digits) {
        return None;
    }
    pos += digits;
    (bytes.get(pos) == Some(&b':')).then_some(pos + 1)
}

/// Extract skill or equipment names from marked-up fragments.
///
/// Each entry is wrapped as `elemento_hab'>NAME</`. The first such span in
/// the concatenated input is a section header and is dropped.
pub fn parse_has(fragments: &[&str]) -> Vec<String> {
    let joined: String = fragments.iter().filter(|f| !f.is_empty()).copied().collect();
    let mut found = Vec::new();
    let mut cursor = 0;
    while let Some(offset) = joined[cursor..].find(HAS_MARKER) {
        let text_start = cursor + offset + HAS_MARKER.len();
        let rest = &joined[text_start..];
        let text_len = rest
            .char_indices()
            .find(|(_, c)| !is_has_char(*c))
            .map_or(rest.len(), |(i, _)| i);
        if text_len > 0 && rest[text_len..].starts_with(HAS_TERMINATOR) {
            found.push(rest[..text_len].to_string());
            cursor = text_start + text_len + HAS_TERMINATOR.len();
        } else {
            cursor = text_start;
        }
    }
    found.into_iter().skip(1).collect()
}

fn is_has_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == ':' || c.is_whitespace()
}
