//! crates/study_notes_core/src/export/layout.rs
//!
//! Page geometry, word wrapping and the page-break rule for the paginated
//! export. Offsets grow downwards from the top edge of the page, in points.

/// A4 in points.
pub const PAGE_WIDTH: f32 = 595.0;
pub const PAGE_HEIGHT: f32 = 842.0;
pub const MARGIN: f32 = 56.0;
pub const CONTENT_WIDTH: f32 = PAGE_WIDTH - MARGIN * 2.0;

const LINE_SPACING: f32 = 1.25;

/// The vertical band text may occupy on a page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PageBounds {
    pub top: f32,
    pub bottom: f32,
    /// Space left after every block.
    pub gap: f32,
}

impl Default for PageBounds {
    fn default() -> Self {
        Self {
            top: MARGIN,
            bottom: PAGE_HEIGHT - 48.0,
            gap: 8.0,
        }
    }
}

/// Where a block lands and where the next one starts.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advance {
    pub start: f32,
    pub next: f32,
    pub page_break: bool,
}

/// Places a block of `block_height` at `offset`, breaking to a new page when
/// it would cross `bounds.bottom`. A block at the very top never breaks, so an
/// oversized block cannot produce an endless run of empty pages.
pub fn advance(offset: f32, block_height: f32, bounds: PageBounds) -> Advance {
    if offset + block_height > bounds.bottom && offset > bounds.top {
        Advance {
            start: bounds.top,
            next: bounds.top + block_height + bounds.gap,
            page_break: true,
        }
    } else {
        Advance {
            start: offset,
            next: offset + block_height + bounds.gap,
            page_break: false,
        }
    }
}

pub fn line_height(size: f32) -> f32 {
    size * LINE_SPACING
}

/// The standard Type1 fonts the export draws with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
    Mono,
}

/// Advance widths in 1/1000 em for printable ASCII (0x20..=0x7E), from the
/// Adobe core font metrics.
const HELVETICA_WIDTHS: [u16; 95] = [
    278, 278, 355, 556, 556, 889, 667, 191, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 278, 278, 584, 584, 584, 556,
    1015, 667, 667, 722, 722, 667, 611, 778, 722, 278, 500, 667, 556, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 278, 278, 278, 469, 556,
    333, 556, 556, 500, 556, 556, 278, 556, 556, 222, 222, 500, 222, 833, 556, 556,
    556, 556, 333, 500, 278, 556, 500, 722, 500, 500, 500, 334, 260, 334, 584,
];

const HELVETICA_BOLD_WIDTHS: [u16; 95] = [
    278, 333, 474, 556, 556, 889, 722, 238, 333, 333, 389, 584, 278, 333, 278, 278,
    556, 556, 556, 556, 556, 556, 556, 556, 556, 556, 333, 333, 584, 584, 584, 611,
    975, 722, 722, 722, 722, 667, 611, 778, 722, 278, 556, 722, 611, 833, 722, 778,
    667, 778, 722, 667, 611, 722, 667, 944, 667, 667, 611, 333, 278, 333, 584, 556,
    333, 556, 611, 556, 611, 556, 333, 611, 611, 278, 278, 556, 278, 889, 611, 611,
    611, 611, 389, 556, 333, 611, 556, 778, 556, 556, 500, 389, 280, 389, 584,
];

const COURIER_WIDTH: u16 = 600;
/// Upper bound used for anything outside printable ASCII.
const WIDEST_GLYPH: u16 = 1000;

/// Advance width of one character, in points.
pub fn char_width(c: char, font: Font, size: f32) -> f32 {
    let c = if c == '\t' { ' ' } else { c };
    let units = match font {
        Font::Mono => COURIER_WIDTH,
        Font::Regular | Font::Bold => {
            let table = if font == Font::Bold {
                &HELVETICA_BOLD_WIDTHS
            } else {
                &HELVETICA_WIDTHS
            };
            match c {
                ' '..='~' => table[c as usize - 0x20],
                _ => WIDEST_GLYPH,
            }
        }
    };
    f32::from(units) * size / 1000.0
}

/// Rendered width of `text`, in points.
pub fn text_width(text: &str, font: Font, size: f32) -> f32 {
    text.chars().map(|c| char_width(c, font, size)).sum()
}

/// Byte index at which `word` stops fitting into `room`. Always takes at
/// least one character.
fn split_point(word: &str, font: Font, size: f32, room: f32) -> usize {
    let mut width = 0.0;
    for (i, c) in word.char_indices() {
        width += char_width(c, font, size);
        if width > room {
            return if i == 0 { c.len_utf8() } else { i };
        }
    }
    word.len()
}

/// Wraps `text` so that no line is wider than `max_width` when set in `font`
/// at `size`.
///
/// Existing line breaks are kept, blank lines survive as empty lines, and a
/// word wider than a line is split across lines. Leading indentation of each
/// source line is preserved so code keeps its shape.
pub fn wrap(text: &str, font: Font, size: f32, max_width: f32) -> Vec<String> {
    let space = char_width(' ', font, size);
    let mut lines = Vec::new();

    for source in text.split('\n') {
        let source = source.trim_end();
        let mut indent: String = source.chars().take_while(|c| c.is_whitespace()).collect();
        if text_width(&indent, font, size) >= max_width {
            indent.clear();
        }
        let indent_width = text_width(&indent, font, size);

        let mut current = indent.clone();
        let mut current_width = indent_width;
        let mut has_word = false;

        for mut word in source.split_whitespace() {
            loop {
                let word_width = text_width(word, font, size);
                let needed = if has_word { word_width + space } else { word_width };
                if current_width + needed <= max_width {
                    if has_word {
                        current.push(' ');
                    }
                    current.push_str(word);
                    current_width += needed;
                    has_word = true;
                    break;
                }
                if has_word {
                    lines.push(std::mem::replace(&mut current, indent.clone()));
                    current_width = indent_width;
                    has_word = false;
                    continue;
                }
                let room = max_width - current_width;
                let (head, rest) = word.split_at(split_point(word, font, size, room));
                current.push_str(head);
                lines.push(std::mem::replace(&mut current, indent.clone()));
                current_width = indent_width;
                if rest.is_empty() {
                    break;
                }
                word = rest;
            }
        }

        if has_word {
            lines.push(current);
        } else if source.is_empty() {
            lines.push(String::new());
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDS: PageBounds = PageBounds {
        top: 50.0,
        bottom: 800.0,
        gap: 5.0,
    };

    #[test]
    fn block_that_fits_stays_on_page() {
        let a = advance(100.0, 40.0, BOUNDS);
        assert_eq!(a, Advance { start: 100.0, next: 145.0, page_break: false });
    }

    #[test]
    fn block_reaching_bottom_exactly_fits() {
        let a = advance(760.0, 40.0, BOUNDS);
        assert!(!a.page_break);
    }

    #[test]
    fn block_crossing_bottom_breaks() {
        let a = advance(761.0, 40.0, BOUNDS);
        assert_eq!(a, Advance { start: 50.0, next: 95.0, page_break: true });
    }

    #[test]
    fn oversized_block_at_top_does_not_break() {
        let a = advance(50.0, 2000.0, BOUNDS);
        assert!(!a.page_break);
        assert_eq!(a.start, 50.0);
    }

    #[test]
    fn wrap_respects_width() {
        // Courier at 10pt is 6pt per glyph, so 60pt holds ten characters.
        let lines = wrap("the quick brown fox jumps over the lazy dog", Font::Mono, 10.0, 60.0);
        assert!(lines.iter().all(|l| l.chars().count() <= 10));
        assert_eq!(lines.join(" "), "the quick brown fox jumps over the lazy dog");
    }

    #[test]
    fn wrap_keeps_line_breaks_and_indent() {
        let lines = wrap("fn main() {\n    run();\n}", Font::Mono, 10.0, 240.0);
        assert_eq!(lines, vec!["fn main() {", "    run();", "}"]);
    }

    #[test]
    fn wrap_splits_long_words() {
        let lines = wrap("abcdefghij", Font::Mono, 10.0, 24.0);
        assert_eq!(lines, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_keeps_blank_lines() {
        assert_eq!(wrap("a\n\nb", Font::Regular, 10.0, 100.0), vec!["a", "", "b"]);
    }

    #[test]
    fn widths_follow_the_font_metrics() {
        // I N T R O D U C T I O N in Helvetica-Bold: 7666 units.
        assert!((text_width("INTRODUCTION", Font::Bold, 10.0) - 76.66).abs() < 0.001);
        assert!(text_width("WWW", Font::Regular, 10.0) > text_width("iii", Font::Regular, 10.0));
        assert_eq!(text_width("iiii", Font::Mono, 10.0), text_width("WWWW", Font::Mono, 10.0));
    }

    #[test]
    fn capital_bold_heading_stays_inside_content_width() {
        let heading = "INTRODUCTION TO THERMODYNAMICS AND STATISTICAL MECHANICS OF IDEAL GASES";
        let lines = wrap(heading, Font::Bold, 14.0, CONTENT_WIDTH);
        assert!(lines.len() > 1);
        for line in &lines {
            assert!(text_width(line, Font::Bold, 14.0) <= CONTENT_WIDTH + 0.01, "{} too wide", line);
        }
        assert_eq!(lines.join(" "), heading);
    }

    #[test]
    fn oversized_word_is_split_by_measured_width() {
        let word = "M".repeat(80);
        let lines = wrap(&word, Font::Bold, 12.0, CONTENT_WIDTH);
        assert!(lines.len() > 1);
        assert!(lines.iter().all(|l| text_width(l, Font::Bold, 12.0) <= CONTENT_WIDTH + 0.01));
        assert_eq!(lines.concat(), word);
    }
}
