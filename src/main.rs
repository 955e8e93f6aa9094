//! New Relic MCP server - NRQL tools for logs and APM data over stdio.

use anyhow::Context;
use newrelic_mcp::cli::Cli;
use newrelic_mcp::config::{Config, FileConfig, ACCOUNT_ID_ENV, API_KEY_ENV};
use newrelic_mcp::error::Result;
use newrelic_mcp::logging;
use newrelic_mcp::mcp::McpServer;
use newrelic_mcp::newrelic::NrqlExecutor;
use newrelic_mcp::tools::ToolRouter;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    // A missing .env file is fine; real environment variables still apply.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse_args();

    if cli.log_file {
        logging::init_file_logging(&cli.log_level);
    } else {
        logging::init_stderr_logging(&cli.log_level);
    }

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            error!("{}: {}", e.category(), e);
            eprintln!("{e}");
            eprintln!("\nPlease set the following environment variables:");
            eprintln!("  - {API_KEY_ENV}: Your New Relic User API Key");
            eprintln!("  - {ACCOUNT_ID_ENV}: Your New Relic Account ID");
            std::process::exit(1);
        }
    };

    if let Err(e) = run(config).await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

/// Resolves configuration with precedence CLI/env > config file > defaults.
fn load_config(cli: &Cli) -> Result<Config> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let file = FileConfig::load_from_file(&config_path)?;
    Config::resolve(&file, &cli.overrides())
}

async fn run(config: Config) -> anyhow::Result<()> {
    let executor = NrqlExecutor::connect(&config).context("failed to create NerdGraph client")?;
    let server = McpServer::new(ToolRouter::new(executor));

    info!("New Relic MCP Server running on stdio");
    info!(account_id = %config.account_id, endpoint = %config.endpoint, "Using New Relic account");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let stdout = tokio::io::stdout();
    server
        .serve(stdin, stdout)
        .await
        .context("MCP server terminated")?;

    Ok(())
}
