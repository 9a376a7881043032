//! On/off split: four bar panels, one per team metric.

use crate::bars::{draw_bars, BarRow, BarSet};
use crate::layout::{AxesRect, DEFAULT_AXES};
use crate::traits::{ChartRenderer, DrawContext, PlotArea};
use fbviz_common::{round_to, FbvizError, Result};
use fbviz_config::StyleConfig;
use fbviz_metrics::{OnOffRow, SplitMetric};

/// 2x2 panels of per-player on-minus-off differences.
pub struct OnOffChart;

/// Bars for one metric, most improved first.
pub fn split_bars(rows: &[OnOffRow], metric: SplitMetric) -> BarSet {
    let mut ordered: Vec<&OnOffRow> = rows.iter().collect();
    ordered.sort_by(|a, b| {
        b.improvement(metric)
            .total_cmp(&a.improvement(metric))
            .then_with(|| a.player.cmp(&b.player))
    });
    BarSet {
        rows: ordered
            .into_iter()
            .map(|row| BarRow {
                label: row.player.clone(),
                value: round_to(row.difference(metric), 2),
                annotation: None,
                good: Some(row.improvement(metric) >= 0.0),
            })
            .collect(),
        x_desc: "Per match, starting minus not starting".to_string(),
    }
}

impl ChartRenderer for OnOffChart {
    type Data = Vec<OnOffRow>;

    fn name(&self) -> &'static str {
        "on_off"
    }

    fn description(&self) -> &'static str {
        "Team output with each player starting against not starting"
    }

    fn axes(&self, _data: &Self::Data) -> Vec<AxesRect> {
        AxesRect::new(DEFAULT_AXES.left, 0.06, DEFAULT_AXES.width, 0.86).grid(2, 2, 0.05)
    }

    fn figure_size(&self, data: &Self::Data, style: &StyleConfig) -> (f64, f64) {
        let height = (data.len() as f64 * 0.35).max(style.height_in);
        (style.width_in * 1.5, height)
    }

    fn draw(&self, panels: &[PlotArea<'_>], data: &Self::Data, ctx: &DrawContext<'_>) -> Result<()> {
        if data.is_empty() {
            return Err(FbvizError::render("No players qualify for the on/off split"));
        }
        if panels.len() < SplitMetric::ALL.len() {
            return Err(FbvizError::render("On/off needs four axes"));
        }
        for (area, metric) in panels.iter().zip(SplitMetric::ALL) {
            draw_bars(area, ctx, &split_bars(data, metric), Some(metric.label()))?;
        }
        Ok(())
    }
}
