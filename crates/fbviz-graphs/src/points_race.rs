//! Cumulative points against cumulative expected points.

use crate::traits::{ChartRenderer, DrawContext, PlotArea};
use crate::utils::{build_chart, draw_legend, draw_mesh, first_panel, padded_range};
use fbviz_common::{FbvizError, Result};
use fbviz_metrics::PointsRace;
use plotters::prelude::*;

/// Line chart of one or more [`PointsRace`]s.
pub struct PointsRaceChart;

/// Axis extents: last matchday and highest cumulative value.
pub fn race_extent(races: &[PointsRace]) -> (usize, f64) {
    races
        .iter()
        .flat_map(|race| &race.points)
        .fold((0, 0.0), |(day, top), p| {
            (day.max(p.matchday), top.max(f64::from(p.actual)).max(p.expected))
        })
}

impl ChartRenderer for PointsRaceChart {
    type Data = Vec<PointsRace>;

    fn name(&self) -> &'static str {
        "points_race"
    }

    fn description(&self) -> &'static str {
        "Cumulative points and expected points per matchday"
    }

    fn draw(&self, panels: &[PlotArea<'_>], data: &Self::Data, ctx: &DrawContext<'_>) -> Result<()> {
        let area = first_panel(panels, self.name())?;
        if data.iter().all(|race| race.points.is_empty()) {
            return Err(FbvizError::render("No matches to draw"));
        }

        let (last_day, top) = race_extent(data);
        let mut chart = build_chart(
            area,
            ctx,
            0.0..(last_day as f64 + 0.5),
            0.0..padded_range(0.0, top, 0.05).end,
            (40, 50),
        )?;
        draw_mesh(&mut chart, ctx, "Matchday", "Points", true)?;

        for (i, race) in data.iter().enumerate() {
            let color = ctx.theme.series(i);
            let actual: Vec<(f64, f64)> = race
                .points
                .iter()
                .map(|p| (p.matchday as f64, f64::from(p.actual)))
                .collect();
            let expected: Vec<(f64, f64)> = race
                .points
                .iter()
                .map(|p| (p.matchday as f64, p.expected))
                .collect();

            let solid = color.stroke_width(2);
            chart
                .draw_series(LineSeries::new(actual.clone(), solid))?
                .label(format!("{} points", race.team))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], solid));
            chart.draw_series(actual.iter().map(|&p| Circle::new(p, 2, color.filled())))?;

            let faded = color.mix(0.55).stroke_width(2);
            chart
                .draw_series(LineSeries::new(expected, faded))?
                .label(format!("{} xPts", race.team))
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 15, y)], faded));
        }

        draw_legend(&mut chart, ctx, SeriesLabelPosition::UpperLeft)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbviz_metrics::RacePoint;

    #[test]
    fn test_race_extent() {
        let races = vec![
            PointsRace {
                team: "A".to_string(),
                points: vec![
                    RacePoint { matchday: 1, actual: 3, expected: 1.9 },
                    RacePoint { matchday: 2, actual: 4, expected: 4.6 },
                ],
            },
            PointsRace {
                team: "B".to_string(),
                points: vec![RacePoint { matchday: 3, actual: 1, expected: 0.4 }],
            },
        ];
        assert_eq!(race_extent(&races), (3, 4.6));
        assert_eq!(race_extent(&[]), (0, 0.0));
    }
}
