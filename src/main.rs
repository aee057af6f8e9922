use clap::Parser;
use divergence_scanner::cli::{Cli, Commands};
use divergence_scanner::config::{Config, ConfigError};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Load configuration
    let config = match Config::load(&cli.config) {
        Ok(config) => config,
        Err(ConfigError::Io { path, source }) => {
            eprintln!("Warning: Could not load config from {}: {}", path.display(), source);
            eprintln!("Using default configuration");
            Config::from_toml_str(include_str!("../config.toml.example"))?
        }
        Err(e) => return Err(e.into()),
    }
    .with_env()?;
    config.validate()?;

    // Initialize telemetry
    divergence_scanner::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting divergence scanner");
            args.execute(&config).await?;
        }
        Commands::Scan(args) => {
            tracing::info!(dry_run = args.dry_run, "Running single scan");
            args.execute(&config).await?;
        }
        Commands::Analyze(args) => {
            args.execute(&config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!("  Timeframe: {}", config.scanner.timeframe);
            println!("  Symbols: {}", config.scanner.symbols.join(", "));
            println!("  Interval: {}s", config.scanner.interval_secs);
            println!("  Candles: {}", config.scanner.candle_limit);
            println!(
                "  RSI: period={}, pivots={}/{}, range={}..={}",
                config.divergence.rsi_period,
                config.divergence.lookback_left,
                config.divergence.lookback_right,
                config.divergence.range_lower,
                config.divergence.range_upper
            );
            println!("  Endpoint: {}", config.notify.endpoint);
            println!("  Token: {}", config.masked_token());
            println!("  Targets: {}", config.notify.targets.len());
        }
    }

    Ok(())
}
