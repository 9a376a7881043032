//! Clean-win table: per-season counts, totals and trend.

use crate::layout::AxesRect;
use crate::table::{draw_table, Cell, Table};
use crate::traits::{ChartRenderer, DrawContext, PlotArea};
use fbviz_common::{FbvizError, Result};
use fbviz_config::StyleConfig;
use fbviz_metrics::CleanWinTable;

/// The clean-win table as a chart.
pub struct CleanWinChart;

/// Season counts shaded against the largest count in the table; percentage
/// shaded against the top percentage.
pub fn clean_win_cells(data: &CleanWinTable) -> Table {
    let top_count = data
        .rows
        .iter()
        .flat_map(|r| r.per_season.iter().flatten())
        .copied()
        .max()
        .unwrap_or(0);
    let top_pct = data.rows.iter().map(|r| r.percentage).fold(0.0, f64::max);
    let share = |value: f64, top: f64| if top > 0.0 { value / top } else { 0.0 };

    let mut header = vec!["Team".to_string()];
    header.extend(data.seasons.iter().map(fbviz_common::SeasonId::label));
    header.extend(["Total", "Games", "%", "Trend"].map(String::from));

    let rows = data
        .rows
        .iter()
        .map(|row| {
            let mut cells = vec![Cell::plain(row.team.clone())];
            cells.extend(row.per_season.iter().map(|wins| match wins {
                Some(n) => Cell::scaled(n.to_string(), share(f64::from(*n), f64::from(top_count))),
                None => Cell::plain("-"),
            }));
            cells.push(Cell::plain(row.total.to_string()));
            cells.push(Cell::plain(row.games.to_string()));
            cells.push(Cell::scaled(format!("{:.2}", row.percentage), share(row.percentage, top_pct)));
            cells.push(Cell::plain(format!("{:+.2}", row.trend)));
            cells
        })
        .collect();

    Table { header, rows }
}

impl ChartRenderer for CleanWinChart {
    type Data = CleanWinTable;

    fn name(&self) -> &'static str {
        "clean_wins"
    }

    fn description(&self) -> &'static str {
        "Wins by two or more goals without conceding, per season"
    }

    fn axes(&self, _data: &Self::Data) -> Vec<AxesRect> {
        vec![AxesRect::new(0.04, 0.06, 0.92, 0.84)]
    }

    fn figure_size(&self, data: &Self::Data, style: &StyleConfig) -> (f64, f64) {
        let width = (3.0 + data.seasons.len() as f64 * 0.9 + 3.2).max(style.width_in);
        let height = (data.rows.len() as f64 * 0.35 + 1.5).max(style.height_in * 0.6);
        (width, height)
    }

    fn draw(&self, panels: &[PlotArea<'_>], data: &Self::Data, ctx: &DrawContext<'_>) -> Result<()> {
        let area = crate::utils::first_panel(panels, self.name())?;
        if data.rows.is_empty() {
            return Err(FbvizError::render("No played matches for the clean-win table"));
        }
        draw_table(area, ctx, &clean_win_cells(data))
    }
}
