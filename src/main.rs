use clap::Parser;
use figaro_nam::cli::{Cli, Commands};
use figaro_nam::config::LoggingConfig;
use figaro_nam::logging::init_logging;
use std::process;

fn main() {
    // Load environment variables from .env file if present
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // Console-only logging for the CLI; file logging is driven by the
    // configuration of long-running deployments, not ad-hoc runs.
    let log_level = cli.log_level.as_deref().unwrap_or("info");
    let logging_config = LoggingConfig::default();
    let _logging_guard = match init_logging(log_level, &logging_config) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            process::exit(5);
        }
    };

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "figaro-nam - FIGARO national accounts exploration toolkit"
    );

    let exit_code = match execute_command(&cli) {
        Ok(code) => code,
        Err(e) => {
            tracing::error!(error = %e, "Command execution failed");
            eprintln!("Error: {e}");
            5 // Fatal error exit code
        }
    };

    process::exit(exit_code);
}

/// Execute the CLI command
fn execute_command(cli: &Cli) -> anyhow::Result<i32> {
    match &cli.command {
        Commands::Quality(args) => args.execute(&cli.config),
        Commands::Flows(args) => args.execute(&cli.config),
        Commands::Timeseries(args) => args.execute(&cli.config),
        Commands::Trend(args) => args.execute(&cli.config),
        Commands::Trade(args) => args.execute(&cli.config),
        Commands::Recovery(args) => args.execute(&cli.config),
        Commands::Dashboard(args) => args.execute(&cli.config),
        Commands::ValidateConfig(args) => args.execute(&cli.config),
    }
}
