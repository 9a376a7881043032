//! One module per subcommand. Each pairs a pure `prepare` step, testable
//! without the network, with a `run` that loads data and writes the chart.

pub mod cache;
pub mod clean_wins;
pub mod creators;
pub mod on_off;
pub mod pairings;
pub mod points_race;
pub mod rates;
pub mod rolling_psxg;
pub mod tackling;
pub mod team_form;

use fbviz_common::{file_stem, ScheduleRow, SeasonId};
use fbviz_data::played_match_ids;
use fbviz_graphs::ChartRequest;

/// `"24/25"` for one season, `"22/23-24/25"` for a range.
pub fn seasons_label(seasons: &[SeasonId]) -> String {
    match seasons {
        [] => String::new(),
        [only] => only.label(),
        [first, .., last] => format!("{}-{}", first.label(), last.label()),
    }
}

/// Played matches of one team, in schedule order.
pub fn team_match_ids(schedule: &[ScheduleRow], team: &str) -> Vec<String> {
    let rows: Vec<ScheduleRow> = schedule
        .iter()
        .filter(|row| row.involves(team))
        .cloned()
        .collect();
    played_match_ids(&rows)
}

/// Header and placement defaults shared by every chart command: the chart
/// lands in a folder named after the league.
pub fn default_request(league: &str, title: String, subtitle: String, name: &str) -> ChartRequest {
    ChartRequest {
        title,
        subtitle,
        logo_url: None,
        sub_folder: league.to_string(),
        name: file_stem(name),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbviz_common::test_utils::schedule_fixtures::{four_team_future, four_team_season};

    #[test]
    fn test_seasons_label() {
        assert_eq!(seasons_label(&[]), "");
        assert_eq!(seasons_label(&[SeasonId::new("2425")]), "24/25");
        assert_eq!(
            seasons_label(&[SeasonId::new("2223"), SeasonId::new("2324"), SeasonId::new("2425")]),
            "22/23-24/25"
        );
    }

    #[test]
    fn test_team_match_ids_only_played() {
        let mut schedule = four_team_season("2425");
        schedule.extend(four_team_future("2425"));
        let ids = team_match_ids(&schedule, "Beta");
        assert_eq!(ids.len(), 6);
        assert!(ids.iter().all(|id| id.contains("Beta")));
    }

    #[test]
    fn test_default_request() {
        let request = default_request("ENG-Premier League", "T".into(), "S".into(), "team form Aston Villa");
        assert_eq!(request.sub_folder, "ENG-Premier League");
        assert_eq!(request.name, "team_form_Aston_Villa");
        assert!(request.logo_url.is_none());
    }
}
