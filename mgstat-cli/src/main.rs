#![forbid(unsafe_code)]

use anyhow::Context;
use clap::{Parser, Subcommand};
use mgstat_core::{Aggregator, BatchId, MgstatConfig};
use serde_json::json;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mgstat", version, about = "Aggregate benchmark stat files into CSV summaries")]
struct Cli {
	/// Config file (default: $MGSTAT_CONFIG, then ./mgstat.toml)
	#[arg(long = "config", global = true)]
	config_file: Option<PathBuf>,
	/// Override the results directory the stat and output paths are relative to
	#[arg(long, global = true)]
	results_dir: Option<PathBuf>,

	#[command(subcommand)]
	command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
	/// Scan stat directories and append rows to the summary tables
	Run {
		/// Abort on the first malformed stat file in either table
		#[arg(long)]
		strict: bool,
	},
	/// Config helpers
	Config {
		#[command(subcommand)]
		action: ConfigCmd,
	},
}

#[derive(Debug, Subcommand)]
enum ConfigCmd {
	/// Show the effective configuration (file, env and flags resolved)
	Show,
	/// Write an mgstat.toml template
	WriteTemplate {
		/// Destination path (default: ./mgstat.toml)
		#[arg(long)]
		path: Option<PathBuf>,
		/// Overwrite if the file exists
		#[arg(long)]
		force: bool,
	},
}

const DEFAULT_CONFIG_FILE: &str = "mgstat.toml";

fn main() -> anyhow::Result<()> {
	let cli = Cli::parse();

	if let Command::Config { action: ConfigCmd::WriteTemplate { path, force } } = &cli.command {
		let p = path.clone().unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));
		if p.exists() && !force {
			eprintln!("refusing to overwrite existing file: {} (use --force)", p.display());
			std::process::exit(2);
		}
		std::fs::write(&p, TEMPLATE_MGSTAT_TOML).with_context(|| format!("writing {}", p.display()))?;
		eprintln!("wrote {}", p.display());
		return Ok(());
	}

	let cfg = resolve_config(&cli)?;
	init_tracing(&cfg.log_level);

	match cli.command {
		Command::Run { strict } => {
			let cfg = if strict { cfg.strict() } else { cfg };
			let batch = BatchId::new();
			info!(%batch, results_dir = %cfg.results_dir.display(), strict, "starting aggregation");
			let report = Aggregator::new(batch, cfg).run().map_err(|e| {
				error!(%batch, error = %e, "aggregation aborted");
				e
			})?;
			println!("{}", serde_json::to_string_pretty(&report)?);
		}
		Command::Config { action: ConfigCmd::Show } => {
			let out = json!({
				"config": cfg,
				"query_stats_dir": cfg.query_stats_dir(),
				"query_output": cfg.query_output(),
				"ingestion_stats_dir": cfg.ingestion_stats_dir(),
				"ingestion_output": cfg.ingestion_output(),
			});
			println!("{}", serde_json::to_string_pretty(&out)?);
		}
		Command::Config { action: ConfigCmd::WriteTemplate { .. } } => {}
	}
	Ok(())
}

/// `--config` > `$MGSTAT_CONFIG` > `./mgstat.toml` > defaults, then env overrides, then flags.
fn resolve_config(cli: &Cli) -> anyhow::Result<MgstatConfig> {
	let explicit = cli.config_file.clone().or_else(|| std::env::var("MGSTAT_CONFIG").ok().filter(|s| !s.trim().is_empty()).map(PathBuf::from));
	let base = match explicit {
		Some(p) => MgstatConfig::load_from_file(&p).with_context(|| format!("loading {}", p.display()))?,
		None if PathBuf::from(DEFAULT_CONFIG_FILE).exists() => MgstatConfig::load_from_file(DEFAULT_CONFIG_FILE)?,
		None => MgstatConfig::default(),
	};
	let mut cfg = base.with_env()?;
	if let Some(dir) = &cli.results_dir { cfg.results_dir = dir.clone(); }
	Ok(cfg)
}

/// `RUST_LOG` wins; otherwise the configured level. Logs go to stderr so stdout stays JSON.
fn init_tracing(level: &str) {
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	let _ = tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).with_target(false).try_init();
}

const TEMPLATE_MGSTAT_TOML: &str = r#"# mgstat configuration (template)

log_level = "info"
# Stat directories and outputs below are relative to this unless absolute.
results_dir = "../results/query_results"

[query]
stats_dir = "query_stats"
output = "query_evaluation/aeong_statistics.csv"
# first_value | first_line | strict
read_mode = "first_line"
# skip | abort
on_error = "skip"
machines_column = true
elapsed_breakdown = false

[ingestion]
stats_dir = "ingestion_stats"
output = "query_evaluation/aeong_ingestion_statistics.csv"
read_mode = "first_value"
on_error = "abort"
machines_column = false
# Adds graphElapsedTime / timeSeriesElapsedTime columns
elapsed_breakdown = false

[target]
model = "aeong"
machines = 1
dataset = "smartbench"
query_type = "edgesDirection"
"#;
