use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use rfq_config::ConfigLoader;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod demo;

#[derive(Parser)]
#[command(name = "rfq-engine")]
#[command(about = "RFQ order settlement engine", long_about = None)]
struct Cli {
	#[command(subcommand)]
	command: Option<Commands>,

	#[arg(short, long, value_name = "FILE", default_value = "config/local.toml")]
	config: PathBuf,

	#[arg(long, env = "RFQ_LOG_LEVEL", default_value = "info")]
	log_level: String,
}

#[derive(Subcommand)]
enum Commands {
	/// Run the demonstration fill scenario
	Run,
	/// Validate the configuration file
	Validate,
}

fn main() -> Result<()> {
	let cli = Cli::parse();

	setup_tracing(&cli.log_level)?;

	match cli.command {
		Some(Commands::Run) | None => run(cli),
		Some(Commands::Validate) => validate_config(cli),
	}
}

fn run(cli: Cli) -> Result<()> {
	info!("Starting RFQ engine");
	info!("Loading configuration from: {:?}", cli.config);

	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.context("Failed to load configuration")?;

	info!("Configuration loaded successfully");
	info!("Protocol: {} v{}", config.protocol.name, config.protocol.version);
	info!("Chain id: {}", config.protocol.chain_id);

	demo::run(&config).context("Demonstration scenario failed")?;

	info!("RFQ engine finished");
	Ok(())
}

fn validate_config(cli: Cli) -> Result<()> {
	info!("Validating configuration file: {:?}", cli.config);

	let config = ConfigLoader::new()
		.with_file(&cli.config)
		.load()
		.context("Failed to load configuration")?;

	info!("Configuration is valid");
	info!("Protocol: {} v{}", config.protocol.name, config.protocol.version);
	info!("Verifying contract: {}", config.protocol.verifying_contract);
	info!("Wrapped native: {}", config.protocol.wrapped_native);

	Ok(())
}

fn setup_tracing(log_level: &str) -> Result<()> {
	let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level));

	tracing_subscriber::registry()
		.with(env_filter)
		.with(tracing_subscriber::fmt::layer())
		.init();

	Ok(())
}
