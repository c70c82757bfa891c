use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

/// Display width in terminal cells
pub fn display_width(s: &str) -> usize {
    UnicodeWidthStr::width(s)
}

/// Truncate a string to fit within `max_cells` terminal cells, appending `…` if truncated.
pub fn truncate_to_width(s: &str, max_cells: usize) -> String {
    if max_cells == 0 {
        return String::new();
    }
    if display_width(s) <= max_cells {
        return s.to_string();
    }
    if max_cells == 1 {
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

/// Truncate or right-pad with spaces so the result is exactly `cells` wide.
/// A wide grapheme that would straddle the edge is replaced by padding.
pub fn fit_to_width(s: &str, cells: usize) -> String {
    let mut out = truncate_to_width(s, cells);
    let w = display_width(&out);
    if w < cells {
        out.push_str(&" ".repeat(cells - w));
    }
    out
}

/// Next grapheme boundary after `byte_offset`. Returns None if at end.
pub fn next_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset >= s.len() {
        return None;
    }
    match s[byte_offset..].grapheme_indices(true).nth(1) {
        Some((i, _)) => Some(byte_offset + i),
        None => Some(s.len()),
    }
}

/// Previous grapheme boundary before `byte_offset`. Returns None if at start.
pub fn prev_grapheme_boundary(s: &str, byte_offset: usize) -> Option<usize> {
    if byte_offset == 0 {
        return None;
    }
    s[..byte_offset]
        .grapheme_indices(true)
        .last()
        .map(|(i, _)| i)
}

/// Display column of a byte offset (clamped to the string length)
pub fn byte_offset_to_display_col(s: &str, byte_offset: usize) -> usize {
    display_width(&s[..byte_offset.min(s.len())])
}

/// Start of the word left of `byte_offset`, skipping trailing whitespace first
pub fn word_boundary_left(s: &str, byte_offset: usize) -> usize {
    let graphemes: Vec<(usize, &str)> = s[..byte_offset.min(s.len())]
        .grapheme_indices(true)
        .collect();
    let is_space = |g: &str| g.chars().all(char::is_whitespace);

    let mut idx = graphemes.len();
    while idx > 0 && is_space(graphemes[idx - 1].1) {
        idx -= 1;
    }
    while idx > 0 && !is_space(graphemes[idx - 1].1) {
        idx -= 1;
    }
    graphemes.get(idx).map_or(0, |(i, _)| *i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn width_of_accented_and_wide_text() {
        assert_eq!(display_width("Informe técnico"), 15);
        assert_eq!(display_width("año"), 3);
        assert_eq!(display_width("契約"), 4);
        assert_eq!(display_width(""), 0);
    }

    #[test]
    fn width_of_combining_sequence() {
        // e + combining acute accent is one cell
        assert_eq!(display_width("e\u{0301}"), 1);
    }

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate_to_width("Planos", 10), "Planos");
        assert_eq!(truncate_to_width("Planos", 6), "Planos");
    }

    #[test]
    fn truncate_appends_ellipsis() {
        assert_eq!(truncate_to_width("Presupuesto 2026", 8), "Presupu\u{2026}");
        assert_eq!(truncate_to_width("Planos", 1), "\u{2026}");
        assert_eq!(truncate_to_width("Planos", 0), "");
    }

    #[test]
    fn truncate_never_splits_wide_grapheme() {
        // 3 cells of budget minus the ellipsis leaves 2: one CJK char
        assert_eq!(truncate_to_width("契約書", 3), "契\u{2026}");
        assert_eq!(truncate_to_width("契約書", 4), "契\u{2026}");
    }

    #[test]
    fn fit_pads_and_truncates() {
        assert_eq!(fit_to_width("PDF", 6), "PDF   ");
        assert_eq!(fit_to_width("Especificaciones", 6), "Espec\u{2026}");
        assert_eq!(display_width(&fit_to_width("契約書類", 5)), 5);
    }

    #[test]
    fn grapheme_boundaries() {
        let s = "ñe\u{0301}x";
        assert_eq!(next_grapheme_boundary(s, 0), Some(2));
        assert_eq!(next_grapheme_boundary(s, 2), Some(5));
        assert_eq!(next_grapheme_boundary(s, 5), Some(6));
        assert_eq!(next_grapheme_boundary(s, 6), None);
        assert_eq!(prev_grapheme_boundary(s, 6), Some(5));
        assert_eq!(prev_grapheme_boundary(s, 5), Some(2));
        assert_eq!(prev_grapheme_boundary(s, 0), None);
    }

    #[test]
    fn display_col_of_offset() {
        assert_eq!(byte_offset_to_display_col("契約", 3), 2);
        assert_eq!(byte_offset_to_display_col("abc", 10), 3);
    }

    #[test]
    fn word_left() {
        assert_eq!(word_boundary_left("revisar planos  ", 16), 8);
        assert_eq!(word_boundary_left("revisar planos", 14), 8);
        assert_eq!(word_boundary_left("revisar", 7), 0);
        assert_eq!(word_boundary_left("", 0), 0);
    }
}
