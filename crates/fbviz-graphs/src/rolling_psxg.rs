//! Rolling PSxG faced against goals conceded for one keeper.

use crate::team_form::season_separators;
use crate::traits::{ChartRenderer, DrawContext, PlotArea};
use crate::utils::{build_chart, draw_legend, draw_mesh, draw_separators, first_panel, label_at, padded_range, value_bounds};
use fbviz_common::{FbvizError, Result};
use fbviz_metrics::RollingPsxg;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Two rolling lines with the gap between them shaded.
pub struct RollingPsxgChart;

/// Quadrilaterals between consecutive points of the two lines, each tagged
/// with whether the keeper was ahead (PSxG above goals conceded) over it.
pub fn gap_bands(psxg: &[f64], goals: &[f64]) -> Vec<(Vec<(f64, f64)>, bool)> {
    let points: Vec<(f64, f64, f64)> = psxg
        .iter()
        .zip(goals)
        .enumerate()
        .map(|(i, (p, g))| ((i + 1) as f64, *p, *g))
        .collect();
    points
        .windows(2)
        .map(|pair| {
            let (x0, p0, g0) = pair[0];
            let (x1, p1, g1) = pair[1];
            let ahead = (p0 - g0) + (p1 - g1) >= 0.0;
            (vec![(x0, p0), (x1, p1), (x1, g1), (x0, g0)], ahead)
        })
        .collect()
}

impl ChartRenderer for RollingPsxgChart {
    type Data = RollingPsxg;

    fn name(&self) -> &'static str {
        "rolling_psxg"
    }

    fn description(&self) -> &'static str {
        "Rolling post-shot xG faced against goals conceded"
    }

    fn draw(&self, panels: &[PlotArea<'_>], data: &Self::Data, ctx: &DrawContext<'_>) -> Result<()> {
        let area = first_panel(panels, self.name())?;
        let n = data.psxg_rolling.len();
        if n == 0 {
            return Err(FbvizError::render(format!("No matches for {}", data.player)));
        }

        let (lo, hi) = value_bounds(data.psxg_rolling.iter().chain(&data.ga_rolling).copied())
            .unwrap_or((0.0, 1.0));
        let y = padded_range(lo.min(0.0), hi, 0.1);
        let mut chart = build_chart(area, ctx, 0.5..(n as f64 + 0.5), y.clone(), (40, 50))?;
        draw_mesh(&mut chart, ctx, "Match", "Rolling average", true)?;

        for (band, ahead) in gap_bands(&data.psxg_rolling, &data.ga_rolling) {
            let color = if ahead { ctx.theme.low } else { ctx.theme.high };
            chart.draw_series(std::iter::once(Polygon::new(band, color.mix(0.3).filled())))?;
        }

        let line = |values: &[f64]| -> Vec<(f64, f64)> {
            values
                .iter()
                .enumerate()
                .map(|(i, v)| ((i + 1) as f64, *v))
                .collect()
        };
        let psxg_style = ctx.theme.low.stroke_width(2);
        chart
            .draw_series(LineSeries::new(line(&data.psxg_rolling), psxg_style))?
            .label("PSxG faced")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], psxg_style));
        let ga_style = ctx.theme.high.stroke_width(2);
        chart
            .draw_series(LineSeries::new(line(&data.ga_rolling), ga_style))?
            .label("Goals conceded")
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], ga_style));

        let separators = season_separators(&data.season_starts);
        let xs: Vec<f64> = separators.iter().map(|(x, _)| *x).collect();
        draw_separators(&mut chart, ctx, &xs, &y)?;
        for (x, label) in &separators {
            let pos = Pos::new(HPos::Left, VPos::Top);
            label_at(&mut chart, ctx, label, (*x + 0.3, y.end), pos, ctx.theme.subtitle)?;
        }

        draw_legend(&mut chart, ctx, SeriesLabelPosition::UpperRight)?;
        Ok(())
    }
}
