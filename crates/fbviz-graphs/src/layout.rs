//! Header text layout without font metrics.
//!
//! Text is wrapped to a character budget derived from the figure width and a
//! fixed average glyph width, justified line by line, and its height is
//! estimated from line count, font size and line spacing. The figure's axes
//! are then moved down to make room for the header.

use serde::Serialize;

/// Average glyph width as a fraction of the font size.
pub const CHAR_WIDTH_FACTOR: f64 = 0.6;

/// Typographic points per inch.
pub const POINTS_PER_INCH: f64 = 72.0;

/// Characters that fit on one line of a figure `width_in` inches wide.
///
/// Never less than one.
pub fn chars_per_line(width_in: f64, font_size: f64) -> usize {
    if !(width_in > 0.0 && font_size > 0.0) {
        return 1;
    }
    let chars = (width_in * POINTS_PER_INCH / (font_size * CHAR_WIDTH_FACTOR)).floor();
    (chars as usize).max(1)
}

/// Greedy whitespace wrap to at most `width` characters per line.
///
/// Runs of whitespace collapse to one space. Words longer than `width` are
/// split. Empty or blank text yields no lines. A `width` of zero is treated
/// as one.
pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for word in text.split_whitespace() {
        let chars: Vec<char> = word.chars().collect();
        let mut chunks = chars.chunks(width).map(|c| c.iter().collect::<String>());

        // A word too long for any line is split into width-sized pieces.
        let Some(first) = chunks.next() else { continue };
        for piece in std::iter::once(first).chain(chunks) {
            let len = piece.chars().count();
            if current_len == 0 {
                current = piece;
                current_len = len;
            } else if current_len + 1 + len <= width {
                current.push(' ');
                current.push_str(&piece);
                current_len += 1 + len;
            } else {
                lines.push(std::mem::take(&mut current));
                current = piece;
                current_len = len;
            }
        }
    }
    if current_len > 0 {
        lines.push(current);
    }
    lines
}

/// Pads a line to exactly `width` characters by widening the gaps between
/// words. Leftover spaces go to the earliest gaps.
///
/// Lines with a single word, or already at least `width` long, are returned
/// unchanged.
pub fn justify_line(line: &str, width: usize) -> String {
    let words: Vec<&str> = line.split_whitespace().collect();
    let letters: usize = words.iter().map(|w| w.chars().count()).sum();
    let gaps = words.len().saturating_sub(1);
    if gaps == 0 || letters + gaps >= width {
        return line.to_string();
    }

    let spaces = width - letters;
    let (base, extra) = (spaces / gaps, spaces % gaps);
    let mut out = String::with_capacity(width);
    for (i, word) in words.iter().enumerate() {
        out.push_str(word);
        if i < gaps {
            let n = base + usize::from(i < extra);
            out.extend(std::iter::repeat(' ').take(n));
        }
    }
    out
}

/// Wraps `text` and justifies every line but the last.
pub fn justify_text(text: &str, width: usize) -> Vec<String> {
    let mut lines = wrap_text(text, width);
    let last = lines.len().saturating_sub(1);
    for line in lines.iter_mut().take(last) {
        *line = justify_line(line, width.max(1));
    }
    lines
}

/// Height of `lines` lines of text as a fraction of a figure `height_in`
/// inches tall.
pub fn estimate_text_height(lines: usize, font_size: f64, line_spacing: f64, height_in: f64) -> f64 {
    if lines == 0 || height_in <= 0.0 {
        return 0.0;
    }
    lines as f64 * font_size * line_spacing / POINTS_PER_INCH / height_in
}

/// Axes rectangle in figure fractions, origin bottom-left.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxesRect {
    /// Left edge.
    pub left: f64,
    /// Bottom edge.
    pub bottom: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl AxesRect {
    /// Creates a rectangle.
    pub const fn new(left: f64, bottom: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            bottom,
            width,
            height,
        }
    }

    /// Top edge.
    pub fn top(&self) -> f64 {
        self.bottom + self.height
    }

    /// Splits the rectangle into a `rows` x `cols` grid, row-major from the
    /// top-left, leaving `gap` between cells.
    pub fn grid(&self, rows: usize, cols: usize, gap: f64) -> Vec<Self> {
        let (rows, cols) = (rows.max(1), cols.max(1));
        let cell_w = (self.width - gap * (cols - 1) as f64) / cols as f64;
        let cell_h = (self.height - gap * (rows - 1) as f64) / rows as f64;
        (0..rows)
            .flat_map(|r| {
                (0..cols).map(move |c| Self {
                    left: self.left + c as f64 * (cell_w + gap),
                    bottom: self.top() - (r + 1) as f64 * cell_h - r as f64 * gap,
                    width: cell_w,
                    height: cell_h,
                })
            })
            .collect()
    }
}

/// Default single-axes placement.
pub const DEFAULT_AXES: AxesRect = AxesRect::new(0.1, 0.1, 0.85, 0.8);

/// Figure geometry: size, resolution and axes positions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    /// Width in inches.
    pub width_in: f64,
    /// Height in inches.
    pub height_in: f64,
    /// Pixels per inch.
    pub dpi: u32,
    /// Axes, figure fractions.
    pub axes: Vec<AxesRect>,
}

impl Figure {
    /// A figure with the given axes.
    pub fn new(width_in: f64, height_in: f64, dpi: u32, axes: Vec<AxesRect>) -> Self {
        Self {
            width_in,
            height_in,
            dpi,
            axes,
        }
    }

    /// Moves every axes down by `delta` figure fractions.
    pub fn shift_axes_down(&mut self, delta: f64) {
        for axes in &mut self.axes {
            axes.bottom -= delta;
        }
    }

    /// Lowest axes edge, never above 0.
    pub fn lowest_edge(&self) -> f64 {
        self.axes.iter().map(|a| a.bottom).fold(0.0, f64::min)
    }

    /// Nominal size in pixels.
    pub fn pixel_size(&self) -> (u32, u32) {
        let dpi = f64::from(self.dpi);
        (
            (self.width_in * dpi).round().max(1.0) as u32,
            (self.height_in * dpi).round().max(1.0) as u32,
        )
    }
}

/// Title and subtitle sizes and spacings, in points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeaderMetrics {
    /// Title font size.
    pub title_font_size: f64,
    /// Title line spacing multiplier.
    pub title_line_spacing: f64,
    /// Subtitle font size.
    pub subtitle_font_size: f64,
    /// Subtitle line spacing multiplier.
    pub subtitle_line_spacing: f64,
    /// Gap between the header and the axes, figure fraction.
    pub spacing: f64,
}

impl Default for HeaderMetrics {
    fn default() -> Self {
        Self {
            title_font_size: 15.0,
            title_line_spacing: 1.2,
            subtitle_font_size: 9.0,
            subtitle_line_spacing: 1.5,
            spacing: 0.02,
        }
    }
}

/// Wrapped header text and the room it takes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderLayout {
    /// Title lines, wrapped but not justified.
    pub title_lines: Vec<String>,
    /// Subtitle lines, justified except the last.
    pub subtitle_lines: Vec<String>,
    /// Title band height, figure fraction.
    pub title_height: f64,
    /// Subtitle height, figure fraction.
    pub subtitle_height: f64,
    /// How far the axes were moved down.
    pub shift: f64,
}

/// Lays out a title and subtitle above the figure's axes and moves the axes
/// down by the subtitle height plus the title band.
pub fn add_header(figure: &mut Figure, title: &str, subtitle: &str, metrics: &HeaderMetrics) -> HeaderLayout {
    let title_width = chars_per_line(figure.width_in, metrics.title_font_size);
    let subtitle_width = chars_per_line(figure.width_in, metrics.subtitle_font_size);

    let title_lines = wrap_text(title, title_width);
    let subtitle_lines = justify_text(subtitle, subtitle_width);

    let title_height = estimate_text_height(
        title_lines.len(),
        metrics.title_font_size,
        metrics.title_line_spacing,
        figure.height_in,
    );
    let subtitle_height = estimate_text_height(
        subtitle_lines.len(),
        metrics.subtitle_font_size,
        metrics.subtitle_line_spacing,
        figure.height_in,
    );
    let title_band = if title_lines.is_empty() {
        0.0
    } else {
        title_height + metrics.spacing
    };
    let shift = subtitle_height + title_band;
    figure.shift_axes_down(shift);

    HeaderLayout {
        title_lines,
        subtitle_lines,
        title_height,
        subtitle_height,
        shift,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chars_per_line() {
        // 8in * 72 / (9 * 0.6) = 106.67
        assert_eq!(chars_per_line(8.0, 9.0), 106);
        assert_eq!(chars_per_line(0.0, 9.0), 1);
        assert_eq!(chars_per_line(0.01, 40.0), 1);
    }

    #[test]
    fn test_wrap_collapses_whitespace() {
        assert_eq!(
            wrap_text("the  quick\n brown fox", 9),
            vec!["the quick", "brown fox"]
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap_text("abcdefgh ij", 3), vec!["abc", "def", "gh", "ij"]);
    }

    #[test]
    fn test_wrap_degenerate_inputs() {
        assert!(wrap_text("", 10).is_empty());
        assert!(wrap_text("   \n\t", 10).is_empty());
        assert_eq!(wrap_text("ab c", 0), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_justify_line_distributes_left_first() {
        // 3 letters + 6 spaces over 2 gaps
        assert_eq!(justify_line("a b c", 9), "a    b   c");
        assert_eq!(justify_line("a b c", 10), "a    b    c");
        assert_eq!(justify_line("word", 20), "word");
        assert_eq!(justify_line("already wide", 5), "already wide");
    }

    #[test]
    fn test_justify_text_keeps_last_line() {
        assert_eq!(justify_text("aa bb cc dd", 9), vec!["aa  bb cc", "dd"]);
        assert_eq!(justify_text("aa bb", 9), vec!["aa bb"]);
    }

    #[test]
    fn test_height_estimate() {
        // 4 lines * 9pt * 1.5 / 72 / 8in
        let h = estimate_text_height(4, 9.0, 1.5, 8.0);
        assert!((h - 0.09375).abs() < 1e-12);
        assert_eq!(estimate_text_height(0, 9.0, 1.5, 8.0), 0.0);
    }

    #[test]
    fn test_grid_cells() {
        let cells = AxesRect::new(0.0, 0.0, 1.0, 1.0).grid(2, 2, 0.0);
        assert_eq!(cells.len(), 4);
        assert_eq!(cells[0], AxesRect::new(0.0, 0.5, 0.5, 0.5));
        assert_eq!(cells[3], AxesRect::new(0.5, 0.0, 0.5, 0.5));
    }

    #[test]
    fn test_add_header_shifts_every_axes() {
        let mut figure = Figure::new(8.0, 8.0, 100, DEFAULT_AXES.grid(2, 1, 0.05));
        let before = figure.axes.clone();
        let layout = add_header(
            &mut figure,
            "A title",
            "A subtitle long enough to need a couple of words",
            &HeaderMetrics::default(),
        );

        assert_eq!(layout.title_lines, vec!["A title"]);
        assert_eq!(layout.subtitle_lines.len(), 1);
        assert!(layout.shift > layout.subtitle_height);
        for (old, new) in before.iter().zip(&figure.axes) {
            assert!((old.bottom - new.bottom - layout.shift).abs() < 1e-12);
            assert_eq!(old.height, new.height);
        }
    }

    #[test]
    fn test_empty_header_moves_nothing() {
        let mut figure = Figure::new(8.0, 8.0, 100, vec![DEFAULT_AXES]);
        let layout = add_header(&mut figure, "", "", &HeaderMetrics::default());
        assert_eq!(layout.shift, 0.0);
        assert_eq!(figure.axes[0], DEFAULT_AXES);
    }
}
