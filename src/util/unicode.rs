use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells. Tabs count as 4 cells.
pub fn display_width(s: &str) -> usize {
    s.split('\t')
        .enumerate()
        .map(|(i, part)| {
            let w = UnicodeWidthStr::width(part);
            if i > 0 { w + 4 } else { w }
        })
        .sum()
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells <= 1 {
        return "\u{2026}".to_string();
    }
    let budget = max_cells - 1; // reserve 1 cell for '…'
    let mut width = 0;
    let mut result = String::new();
    for grapheme in s.graphemes(true) {
        let gw = display_width(grapheme);
        if width + gw > budget {
            break;
        }
        width += gw;
        result.push_str(grapheme);
    }
    result.push('\u{2026}');
    result
}

/// Truncate or right-pad with spaces to exactly `cells` terminal cells.
pub fn fit_to_width(s: &str, cells: usize) -> String {
    let mut out = truncate_to_width(s, cells);
    let w = display_width(&out);
    if w < cells {
        out.push_str(&" ".repeat(cells - w));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_width_wide_chars() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width("a\tb"), 6);
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate_to_width("hello", 10), "hello");
        assert_eq!(truncate_to_width("hello world", 6), "hello\u{2026}");
        assert_eq!(truncate_to_width("hello", 1), "\u{2026}");
        assert_eq!(truncate_to_width("hello", 0), "");
    }

    #[test]
    fn test_truncate_does_not_split_wide_char() {
        // 日 is 2 cells; budget of 2 after the ellipsis only fits one
        assert_eq!(truncate_to_width("日本語", 3), "日\u{2026}");
    }

    #[test]
    fn test_fit_pads() {
        assert_eq!(fit_to_width("ab", 4), "ab  ");
        assert_eq!(display_width(&fit_to_width("日本語", 5)), 5);
    }
}
