// Scroll renderer - wrap glyphs to the pane width and paint bottom-up
//
// Lines are painted from the bottom row of the pane upwards, starting with
// line `N - 1 - offset`. With offset 0 the newest content sits flush with the
// bottom edge. Rows left over at the top are blanked explicitly.

use super::layout::Glyph;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Style;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// One terminal cell worth of content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineCell {
    /// Base character plus any zero-width combining characters
    pub symbol: String,
    pub style: Style,
    /// Display width in columns (1 or 2)
    pub width: usize,
}

/// A logical line after wrapping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WrappedLine {
    pub cells: Vec<LineCell>,
}

impl WrappedLine {
    pub fn width(&self) -> usize {
        self.cells.iter().map(|c| c.width).sum()
    }

    /// Plain text of the line, for tests and copy
    pub fn text(&self) -> String {
        self.cells.iter().map(|c| c.symbol.as_str()).collect()
    }
}

/// Split glyphs into lines no wider than `width` columns
///
/// A new line starts at every line break, and before any glyph that would
/// push the current line past `width`. The last line is always emitted, even
/// when empty.
pub fn wrap_lines(glyphs: &[Glyph], width: usize) -> Vec<WrappedLine> {
    let mut lines = Vec::new();
    let mut line = WrappedLine::default();
    let mut x = 0;

    for glyph in glyphs {
        let (ch, style) = match *glyph {
            Glyph::LineBreak => {
                lines.push(std::mem::take(&mut line));
                x = 0;
                continue;
            }
            Glyph::Char { ch, style } => (ch, style),
        };

        let w = ch.width().unwrap_or(0);
        if w == 0 {
            // Combining marks ride on the previous cell
            if let Some(last) = line.cells.last_mut() {
                last.symbol.push(ch);
            }
            continue;
        }

        if x + w > width {
            lines.push(std::mem::take(&mut line));
            x = 0;
        }

        line.cells.push(LineCell {
            symbol: ch.to_string(),
            style,
            width: w,
        });
        x += w;
    }

    lines.push(line);
    lines
}

/// Paint wrapped lines bottom-anchored into `area` of `buf`
///
/// `blank` is the pane's default style, used for padding and empty rows and
/// as the base that glyph styles are patched onto.
pub fn paint(lines: &[WrappedLine], area: Rect, offset: usize, blank: Style, buf: &mut Buffer) {
    let area = area.intersection(buf.area);
    if area.is_empty() {
        return;
    }

    let mut row = area.bottom();
    let mut source = lines.len().checked_sub(offset + 1);

    while let Some(index) = source {
        if row == area.top() {
            break;
        }
        row -= 1;
        paint_line(&lines[index], area, row, blank, buf);
        source = index.checked_sub(1);
    }

    // Anything above the content must be blanked, or stale rows would show through
    while row > area.top() {
        row -= 1;
        blank_cells(area.left(), area.right(), row, blank, buf);
    }
}

/// Lay out nothing but the given glyphs into a fresh `width` x `height` grid
pub fn render_grid(glyphs: &[Glyph], width: u16, height: u16, offset: usize) -> Buffer {
    let area = Rect::new(0, 0, width, height);
    let mut buf = Buffer::empty(area);
    if area.is_empty() {
        return buf;
    }

    let lines = wrap_lines(glyphs, usize::from(width));
    paint(&lines, area, offset, Style::default(), &mut buf);
    buf
}

/// Text of each grid row with trailing blanks removed. Columns hidden under
/// a wide glyph are skipped.
pub fn grid_rows(buf: &Buffer) -> Vec<String> {
    (buf.area.top()..buf.area.bottom())
        .map(|y| {
            let mut row = String::new();
            let mut x = buf.area.left();
            while x < buf.area.right() {
                let symbol = buf[(x, y)].symbol();
                row.push_str(symbol);
                x += symbol.width().max(1) as u16;
            }
            row.trim_end().to_string()
        })
        .collect()
}

fn paint_line(line: &WrappedLine, area: Rect, y: u16, blank: Style, buf: &mut Buffer) {
    let mut x = area.left();
    for cell in &line.cells {
        let w = cell.width as u16;
        if x.saturating_add(w) > area.right() {
            break;
        }

        if let Some(target) = buf.cell_mut((x, y)) {
            target.reset();
            target.set_symbol(&cell.symbol).set_style(blank.patch(cell.style));
        }
        // Columns covered by a wide glyph
        for hidden in x + 1..x + w {
            if let Some(target) = buf.cell_mut((hidden, y)) {
                target.reset();
                target.set_style(blank.patch(cell.style));
            }
        }
        x += w;
    }

    blank_cells(x, area.right(), y, blank, buf);
}

fn blank_cells(from: u16, to: u16, y: u16, blank: Style, buf: &mut Buffer) {
    for x in from..to {
        if let Some(target) = buf.cell_mut((x, y)) {
            target.reset();
            target.set_symbol(" ").set_style(blank);
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ratatui::style::Color;

    fn glyphs(text: &str) -> Vec<Glyph> {
        text.chars()
            .map(|ch| match ch {
                '\n' => Glyph::LineBreak,
                ch => Glyph::char(ch, Style::default()),
            })
            .collect()
    }

    /// Symbols of one buffer row
    pub(crate) fn row_text(buf: &Buffer, y: u16) -> String {
        (buf.area.left()..buf.area.right())
            .map(|x| buf[(x, y)].symbol().to_string())
            .collect()
    }

    fn rows(buf: &Buffer) -> Vec<String> {
        (buf.area.top()..buf.area.bottom())
            .map(|y| row_text(buf, y))
            .collect()
    }

    #[test]
    fn test_wrap_on_break_and_width() {
        let lines = wrap_lines(&glyphs("abcdef\ngh"), 4);
        let texts: Vec<String> = lines.iter().map(WrappedLine::text).collect();
        assert_eq!(texts, vec!["abcd", "ef", "gh"]);
    }

    #[test]
    fn test_wrap_counts_wide_glyphs_as_two() {
        let lines = wrap_lines(&glyphs("ab中c"), 3);
        let texts: Vec<String> = lines.iter().map(WrappedLine::text).collect();
        assert_eq!(texts, vec!["ab", "中c"]);
        assert_eq!(lines[1].width(), 3);
    }

    #[test]
    fn test_trailing_break_yields_empty_last_line() {
        let lines = wrap_lines(&glyphs("a\n"), 10);
        assert_eq!(lines.len(), 2);
        assert!(lines[1].cells.is_empty());
        assert_eq!(wrap_lines(&[], 10).len(), 1);
    }

    #[test]
    fn test_combining_mark_joins_previous_cell() {
        let lines = wrap_lines(&glyphs("e\u{301}x"), 10);
        assert_eq!(lines[0].cells.len(), 2);
        assert_eq!(lines[0].cells[0].symbol, "e\u{301}");
    }

    #[test]
    fn test_one_line_per_message_top_to_bottom() {
        let buf = render_grid(&glyphs("a\nb\nc"), 5, 3, 0);
        assert_eq!(rows(&buf), vec!["a    ", "b    ", "c    "]);
    }

    #[test]
    fn test_bottom_anchored_when_content_overflows() {
        let buf = render_grid(&glyphs("1\n2\n3\n4\n5"), 3, 3, 0);
        assert_eq!(rows(&buf), vec!["3  ", "4  ", "5  "]);
    }

    #[test]
    fn test_short_content_sits_at_bottom() {
        let buf = render_grid(&glyphs("x\ny"), 2, 4, 0);
        assert_eq!(rows(&buf), vec!["  ", "  ", "x ", "y "]);
    }

    #[test]
    fn test_offset_scrolls_back() {
        let content = glyphs("1\n2\n3\n4\n5");
        let buf = render_grid(&content, 1, 3, 1);
        assert_eq!(rows(&buf), vec!["2", "3", "4"]);

        let buf = render_grid(&content, 1, 3, 4);
        assert_eq!(rows(&buf), vec![" ", " ", "1"]);

        let buf = render_grid(&content, 1, 3, 9);
        assert_eq!(rows(&buf), vec![" ", " ", " "]);
    }

    #[test]
    fn test_grid_rows_trim_and_skip_hidden_columns() {
        let buf = render_grid(&glyphs("日本\nab"), 6, 3, 0);
        assert_eq!(grid_rows(&buf), vec!["", "日本", "ab"]);
    }

    #[test]
    fn test_degenerate_geometry_is_empty() {
        let content = glyphs("hello");
        assert_eq!(render_grid(&content, 0, 5, 0).area, Rect::new(0, 0, 0, 5));
        assert!(render_grid(&content, 0, 5, 0).content.is_empty());
        assert!(render_grid(&content, 5, 0, 0).content.is_empty());
    }

    #[test]
    fn test_render_is_idempotent() {
        let content = glyphs("some longer text\nthat wraps around");
        let a = render_grid(&content, 6, 4, 1);
        let b = render_grid(&content, 6, 4, 1);
        assert_eq!(a, b);
    }

    #[test]
    fn test_paint_respects_inner_area_and_blank_style() {
        let mut buf = Buffer::empty(Rect::new(0, 0, 6, 4));
        let inner = Rect::new(1, 1, 4, 2);
        let blank = Style::default().bg(Color::Blue);
        let red = Style::default().fg(Color::Red);

        let lines = wrap_lines(&[Glyph::char('h', red), Glyph::char('i', red)], 4);
        paint(&lines, inner, 0, blank, &mut buf);

        assert_eq!(row_text(&buf, 0), "      ");
        assert_eq!(row_text(&buf, 1), "      ");
        assert_eq!(row_text(&buf, 2), " hi   ");
        assert_eq!(buf[(1, 2)].fg, Color::Red);
        assert_eq!(buf[(1, 2)].bg, Color::Blue);
        assert_eq!(buf[(4, 2)].bg, Color::Blue);
        assert_eq!(buf[(1, 1)].bg, Color::Blue);
        // Outside the inner area stays untouched
        assert_eq!(buf[(0, 2)].bg, Color::Reset);
    }
}
