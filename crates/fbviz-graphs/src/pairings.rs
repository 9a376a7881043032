//! Fixture pairings: one small table per target team.

use crate::layout::{AxesRect, DEFAULT_AXES};
use crate::table::{draw_table, Cell, Table};
use crate::traits::{ChartRenderer, DrawContext, PlotArea};
use fbviz_common::{FbvizError, Result};
use fbviz_config::StyleConfig;
use fbviz_metrics::{PairingReport, PairingTarget};

/// Most panels per row.
const MAX_COLUMNS: usize = 3;

/// Grid of pairing tables.
pub struct PairingChart;

/// Rows and columns of the panel grid for `targets` panels.
pub fn panel_grid(targets: usize) -> (usize, usize) {
    let cols = targets.clamp(1, MAX_COLUMNS);
    (targets.max(1).div_ceil(cols), cols)
}

/// A target's partners shaded by count relative to the report maximum.
pub fn pairing_table(target: &PairingTarget, max_count: usize) -> Table {
    let scale = |count: usize| {
        if max_count == 0 {
            0.0
        } else {
            count as f64 / max_count as f64
        }
    };
    Table {
        header: vec![target.team.clone(), "Weeks".to_string()],
        rows: target
            .pairings
            .iter()
            .map(|p| {
                vec![
                    Cell::plain(p.partner.clone()),
                    Cell::scaled(p.count.to_string(), scale(p.count)),
                ]
            })
            .collect(),
    }
}

impl ChartRenderer for PairingChart {
    type Data = PairingReport;

    fn name(&self) -> &'static str {
        "fixture_pairings"
    }

    fn description(&self) -> &'static str {
        "Teams whose easy defensive fixtures line up with another team's easy attacking ones"
    }

    fn axes(&self, data: &Self::Data) -> Vec<AxesRect> {
        let (rows, cols) = panel_grid(data.targets.len());
        let mut cells = AxesRect::new(0.04, 0.06, 0.92, 0.84).grid(rows, cols, 0.03);
        cells.truncate(data.targets.len().max(1));
        cells
    }

    fn figure_size(&self, data: &Self::Data, style: &StyleConfig) -> (f64, f64) {
        let (rows, _) = panel_grid(data.targets.len());
        let longest = data.targets.iter().map(|t| t.pairings.len()).max().unwrap_or(1);
        let per_row = (longest as f64 * 0.3 + 0.6).max(DEFAULT_AXES.height * 2.0);
        (style.width_in, (rows as f64 * per_row).max(style.height_in * 0.6))
    }

    fn draw(&self, panels: &[PlotArea<'_>], data: &Self::Data, ctx: &DrawContext<'_>) -> Result<()> {
        if data.targets.is_empty() {
            return Err(FbvizError::render("No team reaches the minimum pairing count"));
        }
        for (area, target) in panels.iter().zip(&data.targets) {
            draw_table(area, ctx, &pairing_table(target, data.max_count))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbviz_metrics::Pairing;

    #[test]
    fn test_panel_grid() {
        assert_eq!(panel_grid(0), (1, 1));
        assert_eq!(panel_grid(2), (1, 2));
        assert_eq!(panel_grid(3), (1, 3));
        assert_eq!(panel_grid(7), (3, 3));
    }

    #[test]
    fn test_pairing_table_shading() {
        let target = PairingTarget {
            team: "Alpha".to_string(),
            pairings: vec![
                Pairing {
                    partner: "Beta".to_string(),
                    count: 4,
                },
                Pairing {
                    partner: "Gamma".to_string(),
                    count: 2,
                },
            ],
        };
        let table = pairing_table(&target, 4);
        assert_eq!(table.header, vec!["Alpha", "Weeks"]);
        assert_eq!(table.rows[0][1], Cell::scaled("4", 1.0));
        assert_eq!(table.rows[1][1], Cell::scaled("2", 0.5));
    }

    #[test]
    fn test_axes_match_targets() {
        let report = PairingReport {
            targets: vec![
                PairingTarget {
                    team: "A".to_string(),
                    pairings: Vec::new(),
                };
                4
            ],
            max_count: 1,
        };
        assert_eq!(PairingChart.axes(&report).len(), 4);
    }
}
