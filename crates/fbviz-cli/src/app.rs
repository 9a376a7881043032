//! Wiring of configuration, data loader and chart writer.

use crate::args::{ChartArgs, Command};
use crate::commands;
use crate::error::CliResult;
use async_trait::async_trait;
use fbviz_common::Result;
use fbviz_config::Config;
use fbviz_data::{DataLoader, DataSource, HttpDataSource, SnapshotCache};
use fbviz_graphs::{ChartRenderer, ChartRequest, ChartWriter, LogoSource};
use std::path::PathBuf;
use tracing::info;

/// Logos downloaded with the provider's HTTP client.
pub struct HttpLogos(HttpDataSource);

#[async_trait]
impl LogoSource for HttpLogos {
    async fn fetch_logo(&self, url: &str) -> Result<Vec<u8>> {
        self.0.fetch_bytes(url).await
    }
}

/// One configured run of the command line.
pub struct FbvizApp<S, L> {
    config: Config,
    loader: DataLoader<S>,
    writer: ChartWriter<L>,
}

impl FbvizApp<HttpDataSource, HttpLogos> {
    /// Builds the HTTP-backed application from configuration.
    pub fn from_config(config: Config) -> CliResult<Self> {
        let source = HttpDataSource::new(&config.data_source)?;
        let logos = HttpLogos(source.clone());
        let cache = SnapshotCache::from_config(&config.cache);
        Ok(Self::new(config, source, cache, logos))
    }
}

impl<S: DataSource, L: LogoSource> FbvizApp<S, L> {
    /// Assembles an application from its parts.
    pub fn new(config: Config, source: S, cache: SnapshotCache, logos: L) -> Self {
        let writer = ChartWriter::new(config.style.clone(), config.output.directory.clone(), logos);
        Self {
            loader: DataLoader::new(source, cache),
            writer,
            config,
        }
    }

    /// Active configuration.
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Cached provider access.
    pub const fn loader(&self) -> &DataLoader<S> {
        &self.loader
    }

    /// Renders a chart, filling header and placement defaults from the command.
    pub async fn write_chart<R: ChartRenderer>(
        &self,
        renderer: &R,
        data: &R::Data,
        chart: &ChartArgs,
        defaults: ChartRequest,
    ) -> CliResult<PathBuf> {
        let request = chart_request(chart, defaults);
        Ok(self.writer.write(renderer, data, &request).await?)
    }

    /// Runs one subcommand.
    pub async fn run(&self, command: Command) -> CliResult<()> {
        let saved = match command {
            Command::PointsRace { season, teams, chart } => {
                Some(commands::points_race::run(self, &season, &teams, &chart).await?)
            }
            Command::Tackling {
                season,
                team,
                stat_type,
                chart,
            } => Some(commands::tackling::run(self, &season, team.as_deref(), &stat_type, &chart).await?),
            Command::VenueGoals { seasons, chart } => Some(commands::rates::run_venue_goals(self, &seasons, &chart).await?),
            Command::RefereeFouls {
                season,
                min_games,
                stat_type,
                chart,
            } => {
                let min_games = min_games.unwrap_or(self.config.analysis.min_games);
                Some(commands::rates::run_referee_fouls(self, &season, min_games, &stat_type, &chart).await?)
            }
            Command::RollingPsxg {
                seasons,
                player,
                team,
                window,
                stat_type,
                chart,
            } => {
                let window = window.unwrap_or(self.config.analysis.rolling_window);
                Some(commands::rolling_psxg::run(self, &seasons, &player, &team, window, &stat_type, &chart).await?)
            }
            Command::FixturePairings {
                season,
                previous_season,
                min_count,
                chart,
            } => {
                let min_count = min_count.unwrap_or(self.config.analysis.min_good_gameweeks);
                commands::pairings::run(self, &season, previous_season.as_ref(), min_count, &chart).await?
            }
            Command::OnOff {
                season,
                team,
                lineup_team,
                min_starts,
                chart,
            } => {
                let lineup_team = lineup_team.unwrap_or_else(|| team.clone());
                Some(commands::on_off::run(self, &season, &team, &lineup_team, min_starts, &chart).await?)
            }
            Command::CleanWins {
                seasons,
                no_chart,
                chart,
            } => commands::clean_wins::run(self, &seasons, no_chart, &chart).await?,
            Command::TeamForm {
                seasons,
                team,
                window,
                chart,
            } => {
                let window = window.unwrap_or(self.config.analysis.rolling_window);
                Some(commands::team_form::run(self, &seasons, &team, window, &chart).await?)
            }
            Command::Creators {
                season,
                team,
                limit,
                stat_type,
                chart,
            } => Some(commands::creators::run(self, &season, &team, limit, &stat_type, &chart).await?),
            Command::Cache { action } => {
                commands::cache::run(self.loader.cache(), action).await?;
                None
            }
        };

        if let Some(path) = saved {
            info!("Chart written to {}", path.display());
            println!("{}", path.display());
        }
        Ok(())
    }
}

/// Merges user-supplied header and placement over a command's defaults.
pub fn chart_request(chart: &ChartArgs, defaults: ChartRequest) -> ChartRequest {
    ChartRequest {
        title: chart.title.clone().unwrap_or(defaults.title),
        subtitle: chart.subtitle.clone().unwrap_or(defaults.subtitle),
        logo_url: chart.logo_url.clone().or(defaults.logo_url),
        sub_folder: chart.sub_folder.clone().unwrap_or(defaults.sub_folder),
        name: chart.name.clone().unwrap_or(defaults.name),
    }
}
