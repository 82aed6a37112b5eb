//! Word and cluster boundary scanning.
//!
//! Text is handled as UTF-16 code units so offsets line up with the ones the
//! DOM hands back from hit testing. The word-character predicate only admits
//! BMP code points, so surrogate halves never count as word characters.

use std::str::FromStr;

use serde::Serialize;

use crate::types::TextRange;

/// How the magnifier picks the run around the caret.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default)]
pub enum RangeMode {
    /// Whole word under the caret.
    #[default]
    Word,
    /// Fixed-width window of `count` code units centred on the caret.
    Cluster { count: usize },
}

/// Stored spelling of the magnifier mode, without the cluster width.
#[derive(Clone, Debug, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RangeModeKind {
    #[default]
    Word,
    Cluster,
}

impl FromStr for RangeModeKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "word" => Ok(Self::Word),
            "cluster" => Ok(Self::Cluster),
            _ => Err(()),
        }
    }
}

impl RangeModeKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Cluster => "cluster",
        }
    }
}

/// Check whether a character participates in a highlightable run.
///
/// ASCII letters, digits and underscore, plus the Hiragana, Katakana,
/// CJK Unified Ideographs and Hangul Syllables blocks.
pub fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || matches!(c,
            '\u{3040}'..='\u{309F}'
            | '\u{30A0}'..='\u{30FF}'
            | '\u{4E00}'..='\u{9FFF}'
            | '\u{AC00}'..='\u{D7AF}')
}

/// Same predicate over a single UTF-16 code unit.
pub fn is_word_unit(unit: u16) -> bool {
    char::from_u32(unit as u32).is_some_and(is_word_char)
}

/// Find the run to highlight around `offset` in `text`.
///
/// `offset` is in UTF-16 code units and is clamped to the text length.
/// Returns `None` when the caret is not on or next to a word character.
pub fn find_range(text: &str, offset: usize, mode: RangeMode) -> Option<TextRange> {
    let units: Vec<u16> = text.encode_utf16().collect();
    find_range_in_units(&units, offset, mode)
}

/// [`find_range`] over pre-encoded UTF-16 code units.
pub fn find_range_in_units(units: &[u16], offset: usize, mode: RangeMode) -> Option<TextRange> {
    match mode {
        RangeMode::Word => word_range(units, offset),
        RangeMode::Cluster { count } => cluster_range(units, offset, count),
    }
}

fn word_range(units: &[u16], offset: usize) -> Option<TextRange> {
    let offset = offset.min(units.len());

    let mut start = offset;
    while start > 0 && is_word_unit(units[start - 1]) {
        start -= 1;
    }

    let mut end = offset;
    while end < units.len() && is_word_unit(units[end]) {
        end += 1;
    }

    (start != end).then(|| TextRange::new(start, end))
}

fn cluster_range(units: &[u16], offset: usize, count: usize) -> Option<TextRange> {
    let len = units.len();
    if count == 0 || len == 0 {
        return None;
    }
    let offset = offset.min(len);

    let at = units.get(offset).copied().is_some_and(is_word_unit);
    let before = offset > 0 && is_word_unit(units[offset - 1]);
    if !at && !before {
        return None;
    }

    if len <= count {
        return Some(TextRange::new(0, len));
    }

    let mut start = offset.saturating_sub(count / 2);
    let mut end = start + count;
    if end > len {
        end = len;
        start = len - count;
    }

    Some(TextRange::new(start, end))
}

/// Slice `text` by a UTF-16 range.
///
/// Lossy when the range splits a surrogate pair.
pub fn slice_utf16(text: &str, range: TextRange) -> String {
    let units: Vec<u16> = text.encode_utf16().collect();
    let end = range.end.min(units.len());
    let start = range.start.min(end);
    String::from_utf16_lossy(&units[start..end])
}

/// Length of `text` in UTF-16 code units.
pub fn utf16_len(text: &str) -> usize {
    text.encode_utf16().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(text: &str, offset: usize) -> Option<String> {
        find_range(text, offset, RangeMode::Word).map(|r| slice_utf16(text, r))
    }

    #[test]
    fn test_word_predicate() {
        assert!(is_word_char('a'));
        assert!(is_word_char('Z'));
        assert!(is_word_char('7'));
        assert!(is_word_char('_'));
        assert!(is_word_char('ひ'));
        assert!(is_word_char('カ'));
        assert!(is_word_char('漢'));
        assert!(is_word_char('한'));
        assert!(!is_word_char(' '));
        assert!(!is_word_char('.'));
        assert!(!is_word_char('é'));
        assert!(!is_word_char('、'));
    }

    #[test]
    fn test_word_range_inside_word() {
        assert_eq!(word("hello world", 8).as_deref(), Some("world"));
        assert_eq!(word("hello world", 1).as_deref(), Some("hello"));
    }

    #[test]
    fn test_word_range_at_boundaries() {
        // Caret just after "hello" still picks it up from the left.
        assert_eq!(word("hello world", 5).as_deref(), Some("hello"));
        // Caret at the start of "world".
        assert_eq!(word("hello world", 6).as_deref(), Some("world"));
        assert_eq!(word("hello world", 11).as_deref(), Some("world"));
    }

    #[test]
    fn test_word_range_none_on_gap() {
        assert_eq!(word("a , b", 2), None);
        assert_eq!(word("   ", 1), None);
        assert_eq!(word("", 0), None);
    }

    #[test]
    fn test_word_range_clamps_offset() {
        assert_eq!(word("hello", 40).as_deref(), Some("hello"));
    }

    #[test]
    fn test_word_range_idempotent() {
        let text = "The quick brown fox";
        let first = find_range(text, 6, RangeMode::Word);
        for _ in 0..5 {
            assert_eq!(find_range(text, 6, RangeMode::Word), first);
        }
    }

    #[test]
    fn test_word_range_cjk_run() {
        // Japanese without spaces forms one long run up to punctuation.
        assert_eq!(word("日本語のテキスト。次", 2).as_deref(), Some("日本語のテキスト"));
        assert_eq!(word("안녕 세계", 4).as_deref(), Some("세계"));
    }

    #[test]
    fn test_word_range_utf16_offsets() {
        // The emoji takes two code units; the word after it starts at 3.
        let text = "😀 ok";
        assert_eq!(find_range(text, 4, RangeMode::Word), Some(TextRange::new(3, 5)));
    }

    #[test]
    fn test_cluster_centered_window() {
        let text = "読書はとても楽しい";
        let range = find_range(text, 4, RangeMode::Cluster { count: 3 }).unwrap();
        assert_eq!(range, TextRange::new(3, 6));
        assert_eq!(slice_utf16(text, range), "とても");
    }

    #[test]
    fn test_cluster_clamped_at_edges() {
        let text = "abcdefgh";
        assert_eq!(
            find_range(text, 0, RangeMode::Cluster { count: 4 }),
            Some(TextRange::new(0, 4))
        );
        assert_eq!(
            find_range(text, 8, RangeMode::Cluster { count: 4 }),
            Some(TextRange::new(4, 8))
        );
        assert_eq!(
            find_range(text, 7, RangeMode::Cluster { count: 4 }),
            Some(TextRange::new(4, 8))
        );
    }

    #[test]
    fn test_cluster_short_text() {
        assert_eq!(
            find_range("ab", 1, RangeMode::Cluster { count: 5 }),
            Some(TextRange::new(0, 2))
        );
    }

    #[test]
    fn test_cluster_none_over_gap() {
        assert_eq!(find_range("ab  cd", 3, RangeMode::Cluster { count: 2 }), None);
        // Next to a word character on the left is enough.
        assert!(find_range("ab  cd", 2, RangeMode::Cluster { count: 2 }).is_some());
        assert_eq!(find_range("abc", 1, RangeMode::Cluster { count: 0 }), None);
    }

    #[test]
    fn test_cluster_window_bounds_hold_everywhere() {
        let text = "accessibility matters for everyone";
        let len = utf16_len(text);
        for count in 1..=10 {
            for offset in 0..=len {
                if let Some(range) = find_range(text, offset, RangeMode::Cluster { count }) {
                    assert!(range.end <= len);
                    assert_eq!(range.len(), count.min(len));
                }
            }
        }
    }

    #[test]
    fn test_mode_kind_parse() {
        assert_eq!("word".parse::<RangeModeKind>(), Ok(RangeModeKind::Word));
        assert_eq!("cluster".parse::<RangeModeKind>(), Ok(RangeModeKind::Cluster));
        assert!("letters".parse::<RangeModeKind>().is_err());
    }
}
