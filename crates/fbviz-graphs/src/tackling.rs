//! Tackles per 90 against tackle win rate, top players labelled.

use crate::traits::{ChartRenderer, DrawContext, PlotArea};
use crate::utils::{build_chart, draw_mesh, first_panel, label_at, padded_range, value_bounds};
use fbviz_common::{FbvizError, Result};
use fbviz_metrics::TacklingRow;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Scatter of a [`TacklingRow`] ranking.
pub struct TacklingChart;

impl ChartRenderer for TacklingChart {
    type Data = Vec<TacklingRow>;

    fn name(&self) -> &'static str {
        "tackling"
    }

    fn description(&self) -> &'static str {
        "Tackles per 90 against the share of tackles won"
    }

    fn draw(&self, panels: &[PlotArea<'_>], data: &Self::Data, ctx: &DrawContext<'_>) -> Result<()> {
        let area = first_panel(panels, self.name())?;
        let (x_lo, x_hi) = value_bounds(data.iter().map(|r| r.tackles_per90))
            .ok_or_else(|| FbvizError::render("No players passed the tackling filters"))?;
        let (y_lo, y_hi) = value_bounds(data.iter().map(|r| r.win_rate)).unwrap_or((0.0, 1.0));

        let mut chart = build_chart(
            area,
            ctx,
            padded_range(x_lo, x_hi, 0.08),
            padded_range(y_lo, y_hi, 0.08),
            (40, 50),
        )?;
        draw_mesh(&mut chart, ctx, "Tackles per 90", "Tackles won (share)", false)?;

        let muted = ctx.theme.low.mix(0.6).filled();
        chart.draw_series(
            data.iter()
                .filter(|r| !r.highlighted)
                .map(|r| Circle::new((r.tackles_per90, r.win_rate), ctx.px(3.0) as i32, muted)),
        )?;

        let accent = ctx.theme.high.filled();
        let outline = ctx.theme.title.stroke_width(1);
        for row in data.iter().filter(|r| r.highlighted) {
            let at = (row.tackles_per90, row.win_rate);
            chart.draw_series([
                Circle::new(at, ctx.px(4.0) as i32, accent),
                Circle::new(at, ctx.px(4.0) as i32, outline),
            ])?;
            let pos = Pos::new(HPos::Left, VPos::Bottom);
            label_at(&mut chart, ctx, &row.player, at, pos, ctx.theme.title)?;
        }
        Ok(())
    }
}
