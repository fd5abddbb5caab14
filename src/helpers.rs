//! Text cleanup shared by the title extractors.

use std::sync::OnceLock;

use regex::Regex;

/// Paired bracket glyphs, half and full width.
const BRACKET_CHARS: &[char] = &[
    '(', ')', '（', '）', '[', ']', '［', '］', '{', '}', '｛', '｝', '「', '」', '『', '』', '【',
    '】', '〈', '〉', '《', '》', '<', '>', '＜', '＞',
];

fn re_line_break() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?i)<br\s*/?>|</p>|</div>").unwrap())
}

fn re_tag() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<[^>]+>").unwrap())
}

/// Remove every bracket glyph and trim.
pub fn strip_bracket_symbols(value: &str) -> String {
    value
        .chars()
        .filter(|c| !BRACKET_CHARS.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Flatten calendar description HTML into plain text.
///
/// Line-break tags become newlines, other tags are dropped and the common
/// named entities are decoded.
pub fn html_to_plain_text(html: &str) -> String {
    if html.is_empty() {
        return String::new();
    }
    let text = re_line_break().replace_all(html, "\n");
    let text = re_tag().replace_all(&text, "");
    let text = text
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");

    text.lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Text before the first comma (calendar locations carry a full address after it).
pub fn first_segment(location: &str) -> String {
    location
        .split(',')
        .next()
        .unwrap_or("")
        .trim()
        .to_string()
}

/// Drop `prefix` from the start of `value` when present.
pub fn strip_leading<'a>(value: &'a str, prefix: &str) -> &'a str {
    value.strip_prefix(prefix).unwrap_or(value)
}
