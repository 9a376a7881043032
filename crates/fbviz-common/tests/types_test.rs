//! Tests for the shared row model and table helpers.

use fbviz_common::*;
use proptest::prelude::*;

fn played(week: u32, home: &str, away: &str, score: &str) -> ScheduleRow {
    ScheduleRow {
        league: "TST-Test League".to_string(),
        season: SeasonId::new("2425"),
        game_id: Some(format!("{week}-{home}-{away}")),
        week: Some(week),
        round: Some(REGULAR_SEASON_ROUND.to_string()),
        date: None,
        home_team: home.to_string(),
        away_team: away.to_string(),
        home_xg: Some(1.1),
        away_xg: Some(0.4),
        score: Some(score.to_string()),
        venue: None,
        referee: None,
    }
}

fn small_season() -> Vec<ScheduleRow> {
    vec![
        played(1, "Alpha", "Beta", "2–0"),
        played(1, "Gamma", "Delta", "1–1"),
        played(2, "Beta", "Gamma", "0–3"),
        played(2, "Delta", "Alpha", "2–2"),
    ]
}

#[test]
fn test_schedule_row_deserializes_provider_shape() {
    let raw = r#"{
        "league": "ITA-Serie A",
        "season": "2425",
        "game_id": "a1b2c3",
        "week": 12,
        "round": "Regular season",
        "home_team": "Inter",
        "away_team": "Napoli",
        "home_xg": 1.8,
        "away_xg": 0.9,
        "score": "1–1",
        "venue": "Stadio Giuseppe Meazza",
        "referee": "Daniele Orsato"
    }"#;

    let row: ScheduleRow = serde_json::from_str(raw).unwrap();
    assert_eq!(row.season, SeasonId::new("2425"));
    assert_eq!(row.week, Some(12));
    assert!(row.is_played());
    assert_eq!(parse_score(row.score.as_deref().unwrap()).unwrap().total(), 2);
}

#[test]
fn test_season_id_serializes_transparently() {
    let serialized = serde_json::to_string(&SeasonId::new("2526")).unwrap();
    assert_eq!(serialized, "\"2526\"");
}

#[test]
fn test_normalized_goals_mirror_each_other() {
    let rows = small_season();
    let teams = normalize_schedule(&rows).unwrap();

    for pair in teams.chunks(2) {
        assert_eq!(pair[0].goals, pair[1].opponent_goals);
        assert_eq!(pair[0].opponent_goals, pair[1].goals);
        assert_eq!(pair[0].team, pair[1].opponent);
        assert!(pair[0].at_home && !pair[1].at_home);
    }
}

#[test]
fn test_normalize_schedule_propagates_bad_scores() {
    let mut rows = small_season();
    rows[3].score = Some("postponed".to_string());

    let err = normalize_schedule(&rows).unwrap_err();
    assert!(matches!(err, FbvizError::Validation { .. }));
}

proptest! {
    #[test]
    fn prop_score_round_trips_through_display(home in 0u32..20, away in 0u32..20) {
        let score = Score { home, away };
        let dashed = score.to_string().replace('-', "\u{2013}");
        prop_assert_eq!(parse_score(&dashed).unwrap(), score);
    }

    #[test]
    fn prop_points_sum_to_two_or_three(home in 0u32..10, away in 0u32..10) {
        let (h, a) = Score { home, away }.outcome().points();
        let total = h + a;
        prop_assert!(total == 2 || total == 3);
    }
}
