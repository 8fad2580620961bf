// Text cleanup shared by every adapter.
//
// Platforms hand back HTML bodies (Mastodon statuses, RSS summaries) and
// entity-encoded titles (YouTube); those adapters run strip_markup. Other
// sources are plain text, where `<` is just a character. Every Activity's
// content passes through strip_angle_brackets.

use std::sync::LazyLock;

use regex_lite::Regex;

static TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<[^>]*>").expect("Invalid tag regex"));

static BREAK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)<br\s*/?>|</p>|</div>|</li>").expect("Invalid break regex")
});

static WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("Invalid whitespace regex"));

/// Reduce an HTML fragment to plain display text.
///
/// Block-level breaks become spaces, tags are removed, entities are decoded,
/// and whitespace is collapsed. Angle brackets that survive decoding
/// (`&lt;b&gt;` or a dangling `<`) are dropped so the result never contains
/// `<` or `>`.
pub fn strip_markup(html: &str) -> String {
    let spaced = BREAK_RE.replace_all(html, " ");
    let untagged = TAG_RE.replace_all(&spaced, "");
    let decoded = html_escape::decode_html_entities(&untagged);
    let retagged = TAG_RE.replace_all(&decoded, "");
    strip_angle_brackets(&retagged)
}

/// Plain-text cleanup: drop `<` and `>` characters and collapse whitespace.
/// Text between brackets is kept (`"I <3 Rust"` becomes `"I 3 Rust"`).
pub fn strip_angle_brackets(text: &str) -> String {
    let cleaned: String = text.chars().filter(|c| *c != '<' && *c != '>').collect();
    WS_RE.replace_all(&cleaned, " ").trim().to_string()
}

/// Truncate a string to at most `max_chars` characters, appending "..." if truncated.
///
/// Unlike byte slicing (`&text[..120]`), this respects UTF-8 character boundaries
/// and will never panic on multi-byte characters like emoji or kana.
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    let char_count = text.chars().count();
    if char_count <= max_chars {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_chars).collect();
        format!("{truncated}...")
    }
}
