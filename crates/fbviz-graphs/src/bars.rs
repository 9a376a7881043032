//! Horizontal bar charts: per-group rates and creator rankings.

use crate::traits::{ChartRenderer, DrawContext, PlotArea};
use crate::utils::{first_panel, padded_range, panel_title, value_bounds, DESC_POINTS, LABEL_POINTS};
use crate::layout::CHAR_WIDTH_FACTOR;
use fbviz_common::{round_to, Result};
use fbviz_metrics::{CreatorRow, GroupRate};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use serde::Serialize;

/// One bar.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarRow {
    /// Category label on the y axis.
    pub label: String,
    /// Bar length.
    pub value: f64,
    /// Text printed past the bar end.
    pub annotation: Option<String>,
    /// Colours the bar by outcome instead of by value when set.
    pub good: Option<bool>,
}

/// Bars top to bottom in the given order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BarSet {
    /// Rows, first drawn on top.
    pub rows: Vec<BarRow>,
    /// Value axis description.
    pub x_desc: String,
}

impl BarSet {
    /// Bars from a per-group rate table, highest rate on top.
    pub fn from_group_rates(rates: &[GroupRate], x_desc: impl Into<String>, with_group: bool) -> Self {
        let rows = rates
            .iter()
            .rev()
            .map(|rate| BarRow {
                label: if with_group && rate.label != rate.group {
                    format!("{} ({})", rate.label, rate.group)
                } else {
                    rate.label.clone()
                },
                value: rate.per_game,
                annotation: Some(format!("{:.2} ({} games)", rate.per_game, rate.games)),
                good: None,
            })
            .collect();
        Self {
            rows,
            x_desc: x_desc.into(),
        }
    }

    /// Assists minus xA per creator, in ranking order.
    pub fn from_creators(creators: &[CreatorRow]) -> Self {
        let rows = creators
            .iter()
            .map(|c| BarRow {
                label: c.player.clone(),
                value: round_to(c.difference, 2),
                annotation: Some(format!("{:.0} A / {:.1} xA", c.assists, c.expected_assists)),
                good: Some(c.difference >= 0.0),
            })
            .collect();
        Self {
            rows,
            x_desc: "Assists minus expected assists".to_string(),
        }
    }

    /// Value axis range, always including zero.
    pub fn value_range(&self) -> std::ops::Range<f64> {
        let (lo, hi) = value_bounds(self.rows.iter().map(|r| r.value)).unwrap_or((0.0, 1.0));
        let range = padded_range(lo.min(0.0), hi.max(0.0), 0.15);
        // Keep the zero baseline flush with the axis when nothing is negative.
        if lo >= 0.0 {
            0.0..range.end
        } else {
            range
        }
    }

    /// Longest label in characters.
    pub fn longest_label(&self) -> usize {
        self.rows.iter().map(|r| r.label.chars().count()).max().unwrap_or(0)
    }
}

/// Draws `bars` into `area`, optionally titled.
pub fn draw_bars(area: &PlotArea<'_>, ctx: &DrawContext<'_>, bars: &BarSet, title: Option<&str>) -> Result<()> {
    let n = bars.rows.len().max(1) as i32;
    let label_px = (bars.longest_label() as f64 * LABEL_POINTS * CHAR_WIDTH_FACTOR * ctx.px_per_pt) as i32 + 10;
    let top_margin = if title.is_some() { ctx.px(DESC_POINTS * 2.0) as i32 } else { ctx.px(4.0) as i32 };

    let mut chart = ChartBuilder::on(area)
        .margin(ctx.px(4.0) as i32)
        .margin_top(top_margin)
        .x_label_area_size(35)
        .y_label_area_size(label_px)
        .build_cartesian_2d(bars.value_range(), (0..n).into_segmented())?;
    chart.plotting_area().fill(&ctx.theme.plot_background)?;

    let labels: Vec<&str> = bars.rows.iter().rev().map(|r| r.label.as_str()).collect();
    let y_format = |v: &SegmentValue<i32>| match v {
        SegmentValue::CenterOf(i) => labels
            .get(usize::try_from(*i).unwrap_or(usize::MAX))
            .map_or_else(String::new, |s| (*s).to_string()),
        _ => String::new(),
    };
    let x_format = |v: &f64| format!("{:.1}", v);
    chart
        .configure_mesh()
        .disable_y_mesh()
        .light_line_style(ctx.theme.grid.mix(0.3).stroke_width(1))
        .bold_line_style(ctx.theme.grid.stroke_width(1))
        .axis_style(ctx.theme.subtitle.stroke_width(1))
        .label_style(ctx.text(LABEL_POINTS, ctx.theme.subtitle))
        .axis_desc_style(ctx.text(DESC_POINTS, ctx.theme.subtitle))
        .y_labels(labels.len())
        .y_label_formatter(&y_format)
        .x_label_formatter(&x_format)
        .x_desc(bars.x_desc.as_str())
        .draw()?;

    let (lo, hi) = value_bounds(bars.rows.iter().map(|r| r.value)).unwrap_or((0.0, 1.0));
    let bar_px = ctx.px(2.0);
    for (index, row) in bars.rows.iter().enumerate() {
        let slot = n - 1 - index as i32;
        let color = match row.good {
            Some(true) => ctx.theme.low,
            Some(false) => ctx.theme.high,
            None => ctx.theme.scale(row.value, lo, hi),
        };
        let mut bar = Rectangle::new(
            [(0.0, SegmentValue::Exact(slot)), (row.value, SegmentValue::Exact(slot + 1))],
            color.filled(),
        );
        bar.set_margin(bar_px, bar_px, 0, 0);
        chart.draw_series(std::iter::once(bar))?;

        if let Some(annotation) = row.annotation.as_deref() {
            let h = if row.value < 0.0 { HPos::Right } else { HPos::Left };
            chart.draw_series(std::iter::once(Text::new(
                format!(" {} ", annotation),
                (row.value, SegmentValue::CenterOf(slot)),
                ctx.text(LABEL_POINTS * 0.9, ctx.theme.subtitle)
                    .pos(Pos::new(h, VPos::Center)),
            )))?;
        }
    }

    if let Some(title) = title {
        panel_title(area, ctx, title)?;
    }
    Ok(())
}

/// Renders a [`BarSet`] on one axes.
pub struct BarChart {
    name: &'static str,
    description: &'static str,
}

impl BarChart {
    /// Goals per match by venue.
    pub const VENUE_GOALS: Self = Self {
        name: "venue_goals",
        description: "Goals per match at each home ground",
    };

    /// Fouls per match by referee.
    pub const REFEREE_FOULS: Self = Self {
        name: "referee_fouls",
        description: "Fouls per match by referee",
    };

    /// Assists over expected assists.
    pub const CREATORS: Self = Self {
        name: "creators",
        description: "Assists against expected assists for a team's creators",
    };
}

impl ChartRenderer for BarChart {
    type Data = BarSet;

    fn name(&self) -> &'static str {
        self.name
    }

    fn description(&self) -> &'static str {
        self.description
    }

    fn draw(&self, panels: &[PlotArea<'_>], data: &Self::Data, ctx: &DrawContext<'_>) -> Result<()> {
        draw_bars(first_panel(panels, self.name)?, ctx, data, None)
    }
}
