//! Hashtag extraction and normalization.
//!
//! Two strategies: a regex scan over raw text, and slicing pre-classified
//! entity spans out of the text. Spans are preferred when the upstream
//! platform provides them, since it has already decided what is a hashtag.
//! Both modes lower-case every token; malformed input yields no tokens,
//! never an error.

use regex::Regex;
use std::sync::OnceLock;

/// A hashtag entity span as reported by the upstream platform.
///
/// `offset` and `length` are in UTF-16 code units, the platform's native
/// indexing unit. Counting in bytes or code points instead would shift span
/// boundaries whenever multi-byte characters precede the span.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntitySpan {
    /// Start of the span in UTF-16 code units.
    pub offset: usize,
    /// Length of the span in UTF-16 code units.
    pub length: usize,
}

static HASHTAG_PATTERN: OnceLock<Regex> = OnceLock::new();

/// Marker plus one or more ASCII word characters. Non-ASCII tags arrive via
/// the entity-span path.
fn hashtag_pattern() -> &'static Regex {
    HASHTAG_PATTERN
        .get_or_init(|| Regex::new(r"#[0-9A-Za-z_]+").expect("hashtag pattern is valid"))
}

/// Extract normalized hashtag tokens from `text`.
///
/// Uses entity-span slicing when `spans` is supplied, the regex scan
/// otherwise. Tokens come back in order of appearance; duplicates are kept.
pub fn extract(text: &str, spans: Option<&[EntitySpan]>) -> Vec<String> {
    match spans {
        Some(spans) => extract_from_spans(text, spans),
        None => scan(text),
    }
}

/// Regex-scan mode.
///
/// A match at the very start of the text is always accepted. Every other
/// match requires the character immediately before the marker to be ASCII
/// whitespace (like the marker pattern itself, the separator set is pinned
/// to ASCII), which rejects tokens embedded inside words (`foo#bar`).
pub fn scan(text: &str) -> Vec<String> {
    let mut tags = Vec::new();
    for found in hashtag_pattern().find_iter(text) {
        let at_start = found.start() == 0;
        let after_whitespace = text[..found.start()]
            .chars()
            .next_back()
            .is_some_and(|c| c.is_ascii_whitespace());
        if at_start || after_whitespace {
            tags.push(found.as_str().to_lowercase());
        }
    }
    tags
}

/// Entity-span mode: slice exactly the given UTF-16 spans out of `text`.
///
/// Out-of-bounds spans and spans that cut a surrogate pair in half are
/// skipped.
pub fn extract_from_spans(text: &str, spans: &[EntitySpan]) -> Vec<String> {
    if spans.is_empty() {
        return Vec::new();
    }
    let units: Vec<u16> = text.encode_utf16().collect();
    spans
        .iter()
        .filter_map(|span| {
            let end = span.offset.checked_add(span.length)?;
            let slice = units.get(span.offset..end)?;
            String::from_utf16(slice).ok()
        })
        .map(|tag| tag.to_lowercase())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(offset: usize, length: usize) -> EntitySpan {
        EntitySpan { offset, length }
    }

    #[test]
    fn scan_accepts_leading_and_whitespace_preceded_tags() {
        assert_eq!(scan("#Foo bar #baz"), vec!["#foo", "#baz"]);
    }

    #[test]
    fn scan_rejects_embedded_tags() {
        assert!(scan("no#hash here").is_empty());
        assert_eq!(scan("a#b #c"), vec!["#c"]);
    }

    #[test]
    fn scan_keeps_duplicates_in_order() {
        assert_eq!(scan("#a #b #a"), vec!["#a", "#b", "#a"]);
    }

    #[test]
    fn scan_handles_tag_free_text() {
        assert!(scan("").is_empty());
        assert!(scan("nothing to see").is_empty());
        assert!(scan("# not a tag").is_empty());
    }

    #[test]
    fn scan_accepts_tab_and_newline_separators() {
        assert_eq!(scan("one\t#two\n#three"), vec!["#two", "#three"]);
    }

    #[test]
    fn scan_rejects_non_ascii_whitespace_separators() {
        // NBSP and ideographic space are not separators; only ASCII
        // whitespace is.
        assert!(scan("a\u{a0}#tag").is_empty());
        assert!(scan("a\u{3000}#tag").is_empty());
        assert_eq!(scan("a \u{a0}#no #yes"), vec!["#yes"]);
    }

    #[test]
    fn spans_decode_utf16_offsets() {
        // "héllo 🙂 #Tag": the emoji is a surrogate pair, so UTF-16 offsets
        // differ from both byte and char offsets.
        let text = "héllo 🙂 #Tag";
        assert_eq!(extract_from_spans(text, &[span(9, 4)]), vec!["#tag"]);
    }

    #[test]
    fn spans_skip_out_of_bounds_and_broken_surrogates() {
        let text = "🙂 #ok";
        assert_eq!(extract_from_spans(text, &[span(3, 3)]), vec!["#ok"]);
        // Past the end of the text.
        assert!(extract_from_spans(text, &[span(3, 10)]).is_empty());
        assert!(extract_from_spans(text, &[span(100, 1)]).is_empty());
        // Only half of the surrogate pair.
        assert!(extract_from_spans(text, &[span(0, 1)]).is_empty());
        // Overflow does not panic.
        assert!(extract_from_spans(text, &[span(usize::MAX, 2)]).is_empty());
    }

    #[test]
    fn spans_are_preferred_over_scanning() {
        // The scan would also find #b; the spans say only #A is a hashtag.
        let tags = extract("#A #b", Some(&[span(0, 2)]));
        assert_eq!(tags, vec!["#a"]);
    }

    #[test]
    fn extract_without_spans_falls_back_to_scan() {
        assert_eq!(extract("#Hello world", None), vec!["#hello"]);
    }
}
