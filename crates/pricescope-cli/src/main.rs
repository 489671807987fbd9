//! Interactive stock price dashboard
//!
//! # Usage
//!
//! ```bash
//! # Point at the price service
//! export PRICESCOPE_API_URL="http://localhost:8000"
//!
//! # Run the dashboard
//! cargo run --bin pricescope -- --model tree --horizon 1M
//! ```

mod commands;
mod error;
mod render;

use clap::Parser;
use commands::Command;
use pricescope_core::{
    CachedMarketService, DashboardConfig, DashboardRuntime, Horizon, HttpMarketClient,
    MarketDataService, ModelId,
};
use pricescope_utils::{AppConfig, LogFormat};
use std::io::{self, BufRead, Write};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "pricescope")]
#[command(about = "Explore stock price history and forecasts", long_about = None)]
struct Args {
    /// Base URL of the price service
    #[arg(long)]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,

    /// Initial forecast model
    #[arg(long)]
    model: Option<ModelId>,

    /// Initial forecast horizon (1D, 1W, 1M)
    #[arg(long)]
    horizon: Option<Horizon>,

    /// Always fetch fresh company lists and history
    #[arg(long)]
    no_cache: bool,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn dashboard_config(args: &Args) -> anyhow::Result<DashboardConfig> {
    let mut builder = DashboardConfig::builder().with_env();
    if let Some(url) = &args.api_url {
        builder = builder.api_base_url(url.clone());
    }
    if let Some(secs) = args.timeout_secs {
        builder = builder.request_timeout(Duration::from_secs(secs));
    }
    if let Some(model) = &args.model {
        builder = builder.default_model(model.clone());
    }
    if let Some(horizon) = args.horizon {
        builder = builder.default_horizon(horizon);
    }
    if args.no_cache {
        builder = builder.cache_ttl(Duration::ZERO);
    }
    Ok(builder.build()?)
}

fn market_service(config: &DashboardConfig) -> anyhow::Result<Arc<dyn MarketDataService>> {
    let client = HttpMarketClient::new(config)?;
    if config.caching_enabled() {
        Ok(Arc::new(CachedMarketService::new(client, config.cache_ttl)))
    } else {
        Ok(Arc::new(client))
    }
}

/// Run one parsed command; returns `false` when the session should end
async fn execute(dashboard: &DashboardRuntime, command: Command) -> anyhow::Result<bool> {
    match &command {
        Command::Exit => return Ok(false),
        Command::Help => {
            println!("{}", Command::help_text());
            return Ok(true);
        }
        Command::Companies { filter } => {
            let view = dashboard.wait_for(|v| !v.is_loading_companies).await?;
            if !view.companies_loaded {
                println!("The company list is unavailable.\n");
            } else {
                println!("{}", render::companies(&view.companies, filter.as_deref()));
            }
            return Ok(true);
        }
        _ => {}
    }

    let before = dashboard.view();
    if let Some(intent) = command.intent() {
        dashboard.dispatch(intent).await?;
    }
    let view = dashboard.wait_idle().await?;

    match &command {
        Command::Timeframe(_) | Command::Predict if before.selection.is_none() => {
            println!("Select a company first.\n");
        }
        Command::Search { query } if view.selection.is_none() && view.suggestions.is_empty() => {
            println!("No company matched '{}'.\n", query);
        }
        Command::Timeframe(tf) if view.selection.as_ref().is_some_and(|s| s.timeframe != *tf) => {
            println!("Could not load {} history; showing the previous series.\n", tf);
        }
        _ => {}
    }

    print!("{}", render::dashboard(&view));
    Ok(true)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut app_config = AppConfig::from_env()?;
    if args.json_logs {
        app_config = app_config.with_log_format(LogFormat::Json);
    }
    pricescope_utils::init_from_config(&app_config);

    let config = dashboard_config(&args)?;
    info!("Using price service at {}", config.api_base_url);

    let dashboard = DashboardRuntime::spawn(market_service(&config)?, &config);

    println!("pricescope: type a company name to search, /help for commands.\n");

    let stdin = io::stdin();
    let mut stdout = io::stdout();

    loop {
        print!("> ");
        stdout.flush()?;

        let mut input = String::new();
        match stdin.lock().read_line(&mut input) {
            Ok(0) => {
                println!();
                break;
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("Error reading input: {}", e);
                continue;
            }
        }

        if input.trim().is_empty() {
            continue;
        }

        let command = match Command::parse(&input) {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}\n", e);
                continue;
            }
        };

        match execute(&dashboard, command).await {
            Ok(true) => {}
            Ok(false) => break,
            Err(e) => {
                eprintln!("Error: {}\n", e);
                break;
            }
        }
    }

    dashboard.shutdown().await;
    Ok(())
}
