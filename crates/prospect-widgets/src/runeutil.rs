//! Display-width aware string fitting.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Cut `s` to at most `width` columns, ending in `…` when shortened.
pub fn truncate(s: &str, width: usize) -> String {
    if s.width() <= width {
        return s.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in s.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > width - 1 {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

/// The longest suffix of `s` that fits in `width` columns.
///
/// Text inputs use this to keep the end of a long query (where the user is
/// typing) on screen.
pub fn tail_fit(s: &str, width: usize) -> &str {
    let mut used = 0;
    let mut start = s.len();
    for (i, ch) in s.char_indices().rev() {
        let w = ch.width().unwrap_or(0);
        if used + w > width {
            break;
        }
        used += w;
        start = i;
    }
    &s[start..]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_short_is_untouched() {
        assert_eq!(truncate("Acme", 10), "Acme");
    }

    #[test]
    fn truncate_adds_ellipsis() {
        assert_eq!(truncate("Acme Corporation", 6), "Acme …");
        assert_eq!(truncate("abc", 0), "");
    }

    #[test]
    fn truncate_wide_chars() {
        // Each CJK character is two columns wide.
        assert_eq!(truncate("東京都庁", 5), "東京…");
    }

    #[test]
    fn tail_fit_keeps_end() {
        assert_eq!(tail_fit("hello world", 5), "world");
        assert_eq!(tail_fit("hi", 5), "hi");
        assert_eq!(tail_fit("東京", 3), "京");
        assert_eq!(tail_fit("abc", 0), "");
    }
}
