//! Main entry point for fbviz.

use clap::Parser;
use fbviz_cli::{Cli, CliError, CliResult, FbvizApp};
use fbviz_common::init_logging;
use fbviz_config::ConfigLoader;
use tracing::{debug, error};

#[tokio::main]
async fn main() -> CliResult<()> {
    let cli = Cli::parse();

    let mut config = ConfigLoader::load(cli.config.as_deref())?;
    if let Some(level) = cli.log_level {
        config.logging.level = level;
    }
    init_logging(&config.logging).map_err(|e| CliError::Logging(e.to_string()))?;
    debug!("Configuration loaded: {:?}", config.data_source.base_url);

    let app = FbvizApp::from_config(config)?;
    if let Err(e) = app.run(cli.command).await {
        error!("{}", e);
        return Err(e);
    }
    Ok(())
}
