//! Rolling team form: one stacked panel per metric.

use crate::layout::{AxesRect, DEFAULT_AXES};
use crate::traits::{ChartRenderer, DrawContext, PlotArea};
use crate::utils::{build_chart, draw_mesh, draw_separators, label_at, padded_range, value_bounds};
use fbviz_common::{FbvizError, Result, SeasonId};
use fbviz_config::StyleConfig;
use fbviz_metrics::{FormMetric, TeamForm};
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

/// Stacked line panels for every [`FormMetric`].
pub struct TeamFormChart;

/// Splits a series with gaps into drawable runs. Match `i` sits at `x = i + 1`.
pub fn series_segments(values: &[Option<f64>]) -> Vec<Vec<(f64, f64)>> {
    let mut segments = Vec::new();
    let mut current = Vec::new();
    for (i, value) in values.iter().enumerate() {
        match value {
            Some(v) if v.is_finite() => current.push(((i + 1) as f64, *v)),
            _ if !current.is_empty() => segments.push(std::mem::take(&mut current)),
            _ => {}
        }
    }
    if !current.is_empty() {
        segments.push(current);
    }
    segments
}

/// Separator positions between seasons: halfway before each season's first
/// match, skipping the first season.
pub fn season_separators(starts: &[(usize, SeasonId)]) -> Vec<(f64, String)> {
    starts
        .iter()
        .filter(|(index, _)| *index > 0)
        .map(|(index, season)| (*index as f64 + 0.5, season.label()))
        .collect()
}

impl ChartRenderer for TeamFormChart {
    type Data = TeamForm;

    fn name(&self) -> &'static str {
        "team_form"
    }

    fn description(&self) -> &'static str {
        "Rolling points, goals and xG for and against"
    }

    fn axes(&self, _data: &Self::Data) -> Vec<AxesRect> {
        DEFAULT_AXES.grid(FormMetric::ALL.len(), 1, 0.02)
    }

    fn figure_size(&self, _data: &Self::Data, style: &StyleConfig) -> (f64, f64) {
        (style.width_in, style.height_in * 1.5)
    }

    fn draw(&self, panels: &[PlotArea<'_>], data: &Self::Data, ctx: &DrawContext<'_>) -> Result<()> {
        if panels.len() < FormMetric::ALL.len() {
            return Err(FbvizError::render("Team form needs one axes per metric"));
        }
        let matches = data.matches();
        if matches == 0 {
            return Err(FbvizError::render(format!("No matches for {}", data.team)));
        }
        let separators = season_separators(&data.season_starts);

        for (index, (area, metric)) in panels.iter().zip(FormMetric::ALL).enumerate() {
            let Some(series) = data.series(metric) else {
                continue;
            };
            let raw: Vec<Option<f64>> = series.raw.iter().map(|v| Some(*v)).collect();
            let (lo, hi) = value_bounds(series.raw.iter().copied()).unwrap_or((0.0, 1.0));
            let y = padded_range(lo.min(0.0), hi, 0.08);
            let last = index + 1 == FormMetric::ALL.len();

            let mut chart = build_chart(area, ctx, 0.5..(matches as f64 + 0.5), y.clone(), (if last { 35 } else { 0 }, 45))?;
            draw_mesh(&mut chart, ctx, if last { "Match" } else { "" }, metric.label(), true)?;

            let color = ctx.theme.series(0);
            for segment in series_segments(&raw) {
                chart.draw_series(LineSeries::new(segment, ctx.theme.grid.stroke_width(1)))?;
            }
            for segment in series_segments(&series.rolling) {
                chart.draw_series(LineSeries::new(segment, color.stroke_width(2)))?;
            }
            if let Some(mean) = series.mean {
                chart.draw_series(LineSeries::new(
                    vec![(0.5, mean), (matches as f64 + 0.5, mean)],
                    ctx.theme.high.mix(0.7).stroke_width(1),
                ))?;
            }

            let xs: Vec<f64> = separators.iter().map(|(x, _)| *x).collect();
            draw_separators(&mut chart, ctx, &xs, &y)?;
            if index == 0 {
                for (x, label) in &separators {
                    let pos = Pos::new(HPos::Left, VPos::Top);
                    label_at(&mut chart, ctx, label, (*x + 0.2, y.end), pos, ctx.theme.subtitle)?;
                }
            }
        }
        Ok(())
    }
}
