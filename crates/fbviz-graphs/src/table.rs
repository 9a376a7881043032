//! Cell tables, drawn as charts or printed as text.

use crate::traits::{DrawContext, PlotArea};
use crate::utils::{DESC_POINTS, LABEL_POINTS};
use fbviz_common::Result;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::Serialize;
use std::fmt::Write as _;

/// Cell shading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Shade {
    /// Plot background.
    None,
    /// Position on the low-to-high gradient, `0..=1`.
    Scale(f64),
}

/// One table cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Cell {
    /// Cell text.
    pub text: String,
    /// Background.
    pub shade: Shade,
}

impl Cell {
    /// Unshaded cell.
    pub fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shade: Shade::None,
        }
    }

    /// Cell shaded at `t` on the gradient.
    pub fn scaled(text: impl Into<String>, t: f64) -> Self {
        Self {
            text: text.into(),
            shade: Shade::Scale(t),
        }
    }
}

/// Header plus rows of cells.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    /// Column headers.
    pub header: Vec<String>,
    /// Body rows, each as wide as the header.
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    /// Column widths in characters, header included.
    pub fn column_widths(&self) -> Vec<usize> {
        let mut widths: Vec<usize> = self.header.iter().map(|h| h.chars().count()).collect();
        for row in &self.rows {
            for (i, cell) in row.iter().enumerate() {
                let len = cell.text.chars().count();
                match widths.get_mut(i) {
                    Some(width) => *width = (*width).max(len),
                    None => widths.push(len),
                }
            }
        }
        widths
    }

    /// Plain-text rendering: first column left-aligned, the rest right-aligned.
    pub fn to_text(&self) -> String {
        let widths = self.column_widths();
        let mut out = String::new();
        let mut line = |cells: Vec<&str>| {
            let mut text = String::new();
            for (i, (cell, width)) in cells.iter().zip(&widths).enumerate() {
                if i == 0 {
                    let _ = write!(text, "{:<width$}", cell, width = width);
                } else {
                    let _ = write!(text, "  {:>width$}", cell, width = width);
                }
            }
            out.push_str(text.trim_end());
            out.push('\n');
        };

        line(self.header.iter().map(String::as_str).collect());
        let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
        line(rule.iter().map(String::as_str).collect());
        for row in &self.rows {
            line(row.iter().map(|c| c.text.as_str()).collect());
        }
        out
    }
}

/// Draws `table` filling `area`. The first column gets twice the width of
/// the others.
pub fn draw_table(area: &PlotArea<'_>, ctx: &DrawContext<'_>, table: &Table) -> Result<()> {
    let (width, height) = area.dim_in_pixel();
    let columns = table.header.len().max(1);
    let lines = table.rows.len() + 1;
    let row_h = (f64::from(height) / lines as f64).min(f64::from(ctx.px(LABEL_POINTS * 2.4)));
    let unit = f64::from(width) / (columns + 1) as f64;
    let column_x = |i: usize| -> i32 {
        if i == 0 {
            0
        } else {
            (unit * (i + 1) as f64).round() as i32
        }
    };
    let column_w = |i: usize| -> f64 { if i == 0 { unit * 2.0 } else { unit } };

    let header_style = ctx.bold(DESC_POINTS, ctx.theme.title);
    for (i, text) in table.header.iter().enumerate() {
        let center = column_x(i) + (column_w(i) / 2.0) as i32;
        area.draw(&Text::new(
            text.clone(),
            (center, (row_h / 2.0) as i32),
            header_style.pos(Pos::new(HPos::Center, VPos::Center)),
        ))?;
    }
    let rule_y = row_h.round() as i32;
    area.draw(&PathElement::new(
        vec![(0, rule_y), (width as i32, rule_y)],
        ctx.theme.subtitle.stroke_width(1),
    ))?;

    for (r, row) in table.rows.iter().enumerate() {
        let top = (row_h * (r + 1) as f64).round() as i32;
        let bottom = (row_h * (r + 2) as f64).round() as i32;
        for (i, cell) in row.iter().enumerate().take(columns) {
            let left = column_x(i);
            let right = left + column_w(i).round() as i32;
            if let Shade::Scale(t) = cell.shade {
                let fill = ctx.theme.scale(t, 0.0, 1.0);
                area.draw(&Rectangle::new([(left + 1, top + 1), (right - 1, bottom - 1)], fill.filled()))?;
            }
            let (anchor, x) = if i == 0 {
                (HPos::Left, left + ctx.px(3.0) as i32)
            } else {
                (HPos::Center, (left + right) / 2)
            };
            area.draw(&Text::new(
                cell.text.clone(),
                (x, (top + bottom) / 2),
                ctx.text(LABEL_POINTS, ctx.theme.title)
                    .pos(Pos::new(anchor, VPos::Center)),
            ))?;
        }
        area.draw(&PathElement::new(
            vec![(0, bottom), (width as i32, bottom)],
            ctx.theme.grid.stroke_width(1),
        ))?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table {
            header: vec!["Team".to_string(), "Wins".to_string()],
            rows: vec![
                vec![Cell::plain("Alpha"), Cell::scaled("12", 1.0)],
                vec![Cell::plain("Be"), Cell::plain("3")],
            ],
        }
    }

    #[test]
    fn test_column_widths() {
        assert_eq!(sample().column_widths(), vec![5, 4]);
    }

    #[test]
    fn test_to_text_alignment() {
        let text = sample().to_text();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines, vec!["Team   Wins", "-----  ----", "Alpha    12", "Be        3"]);
    }

    #[test]
    fn test_empty_table_prints_header() {
        let table = Table {
            header: vec!["Team".to_string()],
            rows: Vec::new(),
        };
        assert_eq!(table.to_text(), "Team\n----\n");
    }
}
