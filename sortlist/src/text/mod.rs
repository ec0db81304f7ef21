use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn display_width(s: &str) -> usize {
    s.width()
}

pub fn char_width(c: char) -> usize {
    c.width().unwrap_or(0)
}

/// Shorten `s` to at most `max_width` columns, ending in an ellipsis when
/// anything was cut.
pub fn truncate_to_width(s: &str, max_width: usize) -> String {
    if display_width(s) <= max_width {
        return s.to_string();
    }
    if max_width == 0 {
        return String::new();
    }

    let budget = max_width - 1;
    let mut width = 0;
    let mut out: String = s
        .chars()
        .take_while(|&ch| {
            width += char_width(ch);
            width <= budget
        })
        .collect();
    out.push('…');
    out
}

/// Column offset that centers `text` in `available` columns.
pub fn center_offset(text: &str, available: usize) -> usize {
    available.saturating_sub(display_width(text)) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("item", 4), "item");
    }

    #[test]
    fn test_truncate_adds_ellipsis() {
        assert_eq!(truncate_to_width("item 12", 5), "item…");
        assert_eq!(truncate_to_width("日本語", 4), "日…");
        assert_eq!(truncate_to_width("abc", 0), "");
    }

    #[test]
    fn test_center_offset() {
        assert_eq!(center_offset("ab", 6), 2);
        assert_eq!(center_offset("abcdefgh", 6), 0);
    }
}
