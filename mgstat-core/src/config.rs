#![forbid(unsafe_code)]

use crate::aggregate::FailurePolicy;
use crate::error::{Error, Result};
use crate::reader::ReadMode;
use crate::record::Target;
use serde::{Deserialize, Serialize};
use std::{
	fs,
	path::{Path, PathBuf},
};

/// Where one table reads its stat files from and how it treats them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TableConfig {
	/// Stat file directory, relative to `results_dir` unless absolute.
	pub stats_dir: PathBuf,
	/// Summary CSV, relative to `results_dir` unless absolute.
	pub output: PathBuf,
	pub read_mode: ReadMode,
	pub on_error: FailurePolicy,
	#[serde(default)]
	pub machines_column: bool,
	#[serde(default)]
	pub elapsed_breakdown: bool,
}

impl TableConfig {
	pub fn default_query() -> Self {
		Self {
			stats_dir: "query_stats".into(),
			output: PathBuf::from("query_evaluation").join("aeong_statistics.csv"),
			read_mode: ReadMode::FirstLine,
			on_error: FailurePolicy::Skip,
			machines_column: true,
			elapsed_breakdown: false,
		}
	}

	pub fn default_ingestion() -> Self {
		Self {
			stats_dir: "ingestion_stats".into(),
			output: PathBuf::from("query_evaluation").join("aeong_ingestion_statistics.csv"),
			read_mode: ReadMode::FirstValue,
			on_error: FailurePolicy::Abort,
			machines_column: false,
			elapsed_breakdown: false,
		}
	}
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MgstatConfig {
	#[serde(default = "MgstatConfig::default_log_level")]
	pub log_level: String,
	#[serde(default = "MgstatConfig::default_results_dir")]
	pub results_dir: PathBuf,
	#[serde(default = "TableConfig::default_query")]
	pub query: TableConfig,
	#[serde(default = "TableConfig::default_ingestion")]
	pub ingestion: TableConfig,
	#[serde(default)]
	pub target: Target,
}

impl Default for MgstatConfig {
	fn default() -> Self {
		Self {
			log_level: Self::default_log_level(),
			results_dir: Self::default_results_dir(),
			query: TableConfig::default_query(),
			ingestion: TableConfig::default_ingestion(),
			target: Target::default(),
		}
	}
}

impl MgstatConfig {
	pub const ENV_LOG_LEVEL: &'static str = "MGSTAT_LOG_LEVEL";
	pub const ENV_RESULTS_DIR: &'static str = "MGSTAT_RESULTS_DIR";

	pub fn default_log_level() -> String { "info".into() }
	pub fn default_results_dir() -> PathBuf { PathBuf::from("..").join("results").join("query_results") }

	pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
		let path = path.as_ref();
		let data = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
		let cfg: Self = toml::from_str(&data).map_err(|e| Error::config(format!("toml parse error: {e}")))?;
		cfg.validate()?;
		Ok(cfg)
	}

	pub fn write_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
		let path = path.as_ref();
		let s = toml::to_string_pretty(self).map_err(|e| Error::config(format!("toml encode error: {e}")))?;
		fs::write(path, s).map_err(|e| Error::io(path, e))
	}

	/// Applies `MGSTAT_*` environment overrides on top of `self`.
	pub fn with_env(mut self) -> Result<Self> {
		if let Ok(v) = std::env::var(Self::ENV_LOG_LEVEL) {
			if !v.trim().is_empty() { self.log_level = v.trim().to_string(); }
		}
		if let Ok(v) = std::env::var(Self::ENV_RESULTS_DIR) {
			if !v.trim().is_empty() { self.results_dir = PathBuf::from(v.trim()); }
		}
		self.validate()?;
		Ok(self)
	}

	pub fn from_env() -> Result<Self> { Self::default().with_env() }

	pub fn validate(&self) -> Result<()> {
		let allowed = ["trace", "debug", "info", "warn", "error"];
		if !allowed.contains(&self.log_level.as_str()) {
			return Err(Error::config(format!("invalid log_level: {}", self.log_level)));
		}
		if self.target.model.trim().is_empty() {
			return Err(Error::config("target.model must not be empty"));
		}
		for (name, t) in [("query", &self.query), ("ingestion", &self.ingestion)] {
			if t.stats_dir.as_os_str().is_empty() {
				return Err(Error::config(format!("{name}.stats_dir must not be empty")));
			}
			if t.output.as_os_str().is_empty() {
				return Err(Error::config(format!("{name}.output must not be empty")));
			}
		}
		Ok(())
	}

	fn resolve(&self, p: &Path) -> PathBuf {
		if p.is_absolute() { p.to_path_buf() } else { self.results_dir.join(p) }
	}

	pub fn query_stats_dir(&self) -> PathBuf { self.resolve(&self.query.stats_dir) }
	pub fn query_output(&self) -> PathBuf { self.resolve(&self.query.output) }
	pub fn ingestion_stats_dir(&self) -> PathBuf { self.resolve(&self.ingestion.stats_dir) }
	pub fn ingestion_output(&self) -> PathBuf { self.resolve(&self.ingestion.output) }

	/// Forces both tables to stop at the first bad file.
	pub fn strict(mut self) -> Self {
		self.query.on_error = FailurePolicy::Abort;
		self.ingestion.on_error = FailurePolicy::Abort;
		self
	}
}
