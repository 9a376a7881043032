//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use fbviz_common::SeasonId;
use std::path::PathBuf;

/// Football statistics charts from cached provider data.
#[derive(Parser, Debug)]
#[command(name = "fbviz", version)]
#[command(about = "Fetch football statistics, derive metrics and render charts", long_about = None)]
pub struct Cli {
    /// Configuration file (YAML)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Log filter, e.g. `debug` or `fbviz_data=trace`; overrides the configuration
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

/// Parses a season identifier such as `2425` or `2024`.
pub fn parse_season(value: &str) -> Result<SeasonId, String> {
    let value = value.trim();
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(format!("'{}' is not a season", value));
    }
    Ok(SeasonId::new(value))
}

/// One league season.
#[derive(Args, Debug, Clone)]
pub struct SeasonArgs {
    /// League as the provider names it, e.g. "ENG-Premier League"
    #[arg(short, long)]
    pub league: String,

    /// Season, e.g. 2425
    #[arg(short, long, value_parser = parse_season)]
    pub season: SeasonId,
}

/// Several seasons of one league.
#[derive(Args, Debug, Clone)]
pub struct SeasonsArgs {
    /// League as the provider names it
    #[arg(short, long)]
    pub league: String,

    /// Seasons, oldest first; repeat or separate with commas
    #[arg(short, long = "season", value_parser = parse_season, value_delimiter = ',', required = true)]
    pub seasons: Vec<SeasonId>,
}

/// Header and placement of the rendered chart.
#[derive(Args, Debug, Clone, Default)]
pub struct ChartArgs {
    /// Chart title
    #[arg(long)]
    pub title: Option<String>,

    /// Chart subtitle, justified under the title
    #[arg(long)]
    pub subtitle: Option<String>,

    /// Logo image to place top-right
    #[arg(long)]
    pub logo_url: Option<String>,

    /// Folder under the output directory [default: the league]
    #[arg(long)]
    pub sub_folder: Option<String>,

    /// File name without extension [default: the chart name]
    #[arg(long)]
    pub name: Option<String>,
}

/// Chart pipelines and cache maintenance.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Cumulative points against cumulative expected points
    PointsRace {
        #[command(flatten)]
        season: SeasonArgs,
        /// Teams to compare, comma separated
        #[arg(long, value_delimiter = ',', required = true)]
        teams: Vec<String>,
        #[command(flatten)]
        chart: ChartArgs,
    },

    /// Tackles per 90 against tackle success
    Tackling {
        #[command(flatten)]
        season: SeasonArgs,
        /// Only players of this team
        #[arg(long)]
        team: Option<String>,
        /// Provider stat table
        #[arg(long, default_value = "defense")]
        stat_type: String,
        #[command(flatten)]
        chart: ChartArgs,
    },

    /// Goals per match at each home ground
    VenueGoals {
        #[command(flatten)]
        seasons: SeasonsArgs,
        #[command(flatten)]
        chart: ChartArgs,
    },

    /// Fouls per match by referee
    RefereeFouls {
        #[command(flatten)]
        season: SeasonArgs,
        /// Minimum matches refereed [default: analysis.min_games]
        #[arg(long)]
        min_games: Option<usize>,
        /// Provider stat table holding fouls
        #[arg(long, default_value = "misc")]
        stat_type: String,
        #[command(flatten)]
        chart: ChartArgs,
    },

    /// A goalkeeper's rolling PSxG faced against goals conceded
    RollingPsxg {
        #[command(flatten)]
        seasons: SeasonsArgs,
        /// Goalkeeper name
        #[arg(long)]
        player: String,
        /// The keeper's team, used to find its matches
        #[arg(long)]
        team: String,
        /// Rolling window in matches [default: analysis.rolling_window]
        #[arg(long)]
        window: Option<usize>,
        /// Provider stat table
        #[arg(long, default_value = "keepers")]
        stat_type: String,
        #[command(flatten)]
        chart: ChartArgs,
    },

    /// Teams whose easy fixtures line up week after week
    FixturePairings {
        #[command(flatten)]
        season: SeasonArgs,
        /// Previous season, for teams' form and promotion
        #[arg(long, value_parser = parse_season)]
        previous_season: Option<SeasonId>,
        /// Minimum co-occurring weeks [default: analysis.min_good_gameweeks]
        #[arg(long)]
        min_count: Option<usize>,
        #[command(flatten)]
        chart: ChartArgs,
    },

    /// Team output with each player starting against not starting
    OnOff {
        #[command(flatten)]
        season: SeasonArgs,
        /// Team as the schedule names it
        #[arg(long)]
        team: String,
        /// Team as lineups name it [default: --team]
        #[arg(long)]
        lineup_team: Option<String>,
        /// Minimum starts to be listed
        #[arg(long, default_value_t = 5)]
        min_starts: usize,
        #[command(flatten)]
        chart: ChartArgs,
    },

    /// Wins by two or more goals without conceding, per season
    CleanWins {
        #[command(flatten)]
        seasons: SeasonsArgs,
        /// Print the table only
        #[arg(long)]
        no_chart: bool,
        #[command(flatten)]
        chart: ChartArgs,
    },

    /// Rolling points, goals and xG for one team
    TeamForm {
        #[command(flatten)]
        seasons: SeasonsArgs,
        /// Team name
        #[arg(long)]
        team: String,
        /// Rolling window in matches [default: analysis.rolling_window]
        #[arg(long)]
        window: Option<usize>,
        #[command(flatten)]
        chart: ChartArgs,
    },

    /// Assists against expected assists for a team's main creators
    Creators {
        #[command(flatten)]
        season: SeasonArgs,
        /// Team name
        #[arg(long)]
        team: String,
        /// Players kept, by expected assists
        #[arg(long, default_value_t = 10)]
        limit: usize,
        /// Provider stat table
        #[arg(long, default_value = "passing")]
        stat_type: String,
        #[command(flatten)]
        chart: ChartArgs,
    },

    /// Inspect or invalidate the snapshot cache
    Cache {
        #[command(subcommand)]
        action: CacheCommand,
    },
}

/// Cache maintenance.
#[derive(Subcommand, Debug)]
pub enum CacheCommand {
    /// List cached snapshots
    List,

    /// Remove every cached snapshot
    Clear,

    /// Remove snapshots matching every given filter
    Invalidate {
        /// Query kind: schedule, player_season_stats, player_match_stats, lineup
        #[arg(long)]
        kind: Option<String>,
        /// League
        #[arg(long)]
        league: Option<String>,
        /// Season
        #[arg(long, value_parser = parse_season)]
        season: Option<SeasonId>,
        /// Match identifier
        #[arg(long)]
        match_id: Option<String>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_points_race() {
        let cli = Cli::try_parse_from([
            "fbviz",
            "--log-level",
            "debug",
            "points-race",
            "-l",
            "ITA-Serie A",
            "-s",
            "2425",
            "--teams",
            "Inter,Napoli",
        ])
        .unwrap();

        assert_eq!(cli.log_level.as_deref(), Some("debug"));
        match cli.command {
            Command::PointsRace { season, teams, chart } => {
                assert_eq!(season.season, SeasonId::new("2425"));
                assert_eq!(teams, vec!["Inter", "Napoli"]);
                assert!(chart.title.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_seasons_list_and_global_config() {
        let cli = Cli::try_parse_from([
            "fbviz",
            "clean-wins",
            "-l",
            "ENG-Premier League",
            "-s",
            "2223,2324",
            "--season",
            "2425",
            "--no-chart",
            "--config",
            "custom.yaml",
        ])
        .unwrap();

        assert_eq!(cli.config, Some(PathBuf::from("custom.yaml")));
        match cli.command {
            Command::CleanWins { seasons, no_chart, .. } => {
                assert!(no_chart);
                assert_eq!(seasons.seasons.len(), 3);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_missing_required_arguments() {
        assert!(Cli::try_parse_from(["fbviz", "on-off", "-l", "X", "-s", "2425"]).is_err());
        assert!(Cli::try_parse_from(["fbviz", "venue-goals", "-l", "X"]).is_err());
    }

    #[test]
    fn test_parse_cache_invalidate() {
        let cli = Cli::try_parse_from(["fbviz", "cache", "invalidate", "--kind", "lineup", "--season", "2425"]).unwrap();
        match cli.command {
            Command::Cache {
                action: CacheCommand::Invalidate { kind, season, league, .. },
            } => {
                assert_eq!(kind.as_deref(), Some("lineup"));
                assert_eq!(season, Some(SeasonId::new("2425")));
                assert!(league.is_none());
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_parse_season() {
        assert_eq!(parse_season(" 2425 ").unwrap(), SeasonId::new("2425"));
        assert!(parse_season("").is_err());
        assert!(parse_season("24 25").is_err());
    }
}
