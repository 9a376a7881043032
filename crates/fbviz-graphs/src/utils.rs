//! Shared chart helpers.

use crate::traits::{DrawContext, PlotArea};
use fbviz_common::{FbvizError, Result};
use plotters::coord::types::RangedCoordf64;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use std::ops::Range;

/// A numeric chart on a plot area. `'b`, the bitmap buffer, outlives the
/// chart's `'a`.
pub type F64Chart<'a, 'b> = ChartContext<'a, BitMapBackend<'b>, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

/// Axis label font size, points.
pub const LABEL_POINTS: f64 = 8.0;

/// Axis description font size, points.
pub const DESC_POINTS: f64 = 9.0;

/// Minimum and maximum of the finite values, `None` when there are none.
pub fn value_bounds(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

/// `[min, max]` widened by `pad` of its span on both sides. A zero span is
/// widened by one unit.
pub fn padded_range(min: f64, max: f64, pad: f64) -> Range<f64> {
    let span = max - min;
    if span.abs() < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }
    (min - span * pad)..(max + span * pad)
}

/// First panel or a render error naming the chart.
pub fn first_panel<'p, 'b>(panels: &'p [PlotArea<'b>], chart: &str) -> Result<&'p PlotArea<'b>> {
    panels
        .first()
        .ok_or_else(|| FbvizError::render(format!("{} needs an axes", chart)))
}

/// Builds a numeric chart and fills its plotting area.
pub fn build_chart<'a, 'b: 'a>(
    area: &'a PlotArea<'b>,
    ctx: &DrawContext<'_>,
    x: Range<f64>,
    y: Range<f64>,
    label_areas: (i32, i32),
) -> Result<F64Chart<'a, 'b>> {
    let chart = ChartBuilder::on(area)
        .margin(ctx.px(4.0) as i32)
        .x_label_area_size(label_areas.0)
        .y_label_area_size(label_areas.1)
        .build_cartesian_2d(x, y)?;
    chart.plotting_area().fill(&ctx.theme.plot_background)?;
    Ok(chart)
}

/// Draws the grid and axis labels in the theme's colours.
pub fn draw_mesh(
    chart: &mut F64Chart<'_, '_>,
    ctx: &DrawContext<'_>,
    x_desc: &str,
    y_desc: &str,
    integer_x: bool,
) -> Result<()> {
    let integer = |v: &f64| format!("{:.0}", v);
    let decimal = |v: &f64| format!("{:.1}", v);
    let x_format: &dyn Fn(&f64) -> String = if integer_x { &integer } else { &decimal };

    chart
        .configure_mesh()
        .light_line_style(ctx.theme.grid.mix(0.3).stroke_width(1))
        .bold_line_style(ctx.theme.grid.stroke_width(1))
        .axis_style(ctx.theme.subtitle.stroke_width(1))
        .label_style(ctx.text(LABEL_POINTS, ctx.theme.subtitle))
        .axis_desc_style(ctx.text(DESC_POINTS, ctx.theme.subtitle))
        .x_label_formatter(x_format)
        .y_label_formatter(&decimal)
        .x_desc(x_desc)
        .y_desc(y_desc)
        .draw()?;
    Ok(())
}

/// Draws the series legend at `position`.
pub fn draw_legend<'a, 'b: 'a>(
    chart: &mut F64Chart<'a, 'b>,
    ctx: &DrawContext<'_>,
    position: SeriesLabelPosition,
) -> Result<()> {
    chart
        .configure_series_labels()
        .position(position)
        .background_style(ctx.theme.plot_background.mix(0.8).filled())
        .border_style(ctx.theme.grid.stroke_width(1))
        .label_font(ctx.text(LABEL_POINTS, ctx.theme.title))
        .draw()?;
    Ok(())
}

/// Vertical separator lines at the given x positions.
pub fn draw_separators(chart: &mut F64Chart<'_, '_>, ctx: &DrawContext<'_>, xs: &[f64], y: &Range<f64>) -> Result<()> {
    let style = ctx.theme.subtitle.mix(0.6).stroke_width(1);
    for &x in xs {
        chart.draw_series(LineSeries::new(vec![(x, y.start), (x, y.end)], style))?;
    }
    Ok(())
}

/// Panel title drawn centred at the top of `area`.
pub fn panel_title(area: &PlotArea<'_>, ctx: &DrawContext<'_>, title: &str) -> Result<()> {
    let (width, _) = area.dim_in_pixel();
    area.draw(&Text::new(
        title.to_string(),
        ((width / 2) as i32, 0),
        ctx.bold(DESC_POINTS, ctx.theme.title)
            .pos(Pos::new(HPos::Center, VPos::Top)),
    ))?;
    Ok(())
}

/// Text at chart coordinates, anchored by `pos`.
pub fn label_at(
    chart: &mut F64Chart<'_, '_>,
    ctx: &DrawContext<'_>,
    text: &str,
    at: (f64, f64),
    pos: Pos,
    color: RGBColor,
) -> Result<()> {
    chart.draw_series(std::iter::once(Text::new(
        text.to_string(),
        at,
        ctx.text(LABEL_POINTS, color).pos(pos),
    )))?;
    Ok(())
}
