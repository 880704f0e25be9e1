#![forbid(unsafe_code)]

//! Directory scan driver: stat files in, summary rows out.

use crate::config::{MgstatConfig, TableConfig};
use crate::error::{Error, Result};
use crate::filename::{is_json_file, IngestionFileName, QueryFileName};
use crate::reader::read_stat_file;
use crate::record::{IngestionRecord, QueryRecord};
use crate::table::{Columns, SummaryTable};
use crate::types::BatchId;
use serde::{Deserialize, Serialize};
use std::{
	fs,
	path::{Path, PathBuf},
};
use tracing::{debug, info, warn};

/// What to do with a stat file whose content cannot be turned into a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailurePolicy {
	/// Report the file and continue with the rest of the directory.
	Skip,
	/// Stop the run with the error.
	Abort,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DirReport {
	pub appended: usize,
	pub skipped: Vec<String>,
	/// Files that decoded to nothing (blank files under line mode).
	pub empty: usize,
	/// Files filtered out by name (non-`.json` in ingestion directories).
	pub ignored: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
	pub batch: String,
	pub query_output: PathBuf,
	pub query: DirReport,
	pub ingestion_output: PathBuf,
	pub ingestion: DirReport,
}

/// Regular files in `dir` (symlinks followed), sorted by name so row order is reproducible.
fn list_files(dir: &Path) -> Result<Vec<(String, PathBuf)>> {
	let mut out = Vec::new();
	for entry in fs::read_dir(dir).map_err(|e| Error::io(dir, e))? {
		let e = entry.map_err(|e| Error::io(dir, e))?;
		let path = e.path();
		let name = e.file_name().to_string_lossy().to_string();
		match fs::metadata(&path) {
			Ok(meta) if meta.is_file() => out.push((name, path)),
			Ok(_) => debug!(file = %name, "not a regular file, ignored"),
			Err(err) => debug!(file = %name, error = %err, "unreadable entry, ignored"),
		}
	}
	out.sort();
	Ok(out)
}

pub struct Aggregator {
	batch: BatchId,
	config: MgstatConfig,
}

impl Aggregator {
	pub fn new(batch: BatchId, config: MgstatConfig) -> Self { Self { batch, config } }

	pub fn batch(&self) -> BatchId { self.batch }
	pub fn config(&self) -> &MgstatConfig { &self.config }

	/// Routes a per-file failure through the table's policy. Only JSON decode
	/// failures are skippable; shape, field and filename errors always abort.
	fn tolerate(policy: FailurePolicy, name: &str, err: Error, report: &mut DirReport) -> Result<()> {
		if policy == FailurePolicy::Skip && err.is_decode_error() {
			warn!(file = name, error = %err, "skipping file");
			report.skipped.push(name.to_string());
			return Ok(());
		}
		Err(err)
	}

	pub fn collect_queries(&self, dir: &Path, table: &mut SummaryTable) -> Result<DirReport> {
		let t: &TableConfig = &self.config.query;
		let mut report = DirReport::default();
		for (name, path) in list_files(dir)? {
			let fields = QueryFileName::parse(&name)?;
			let data = match read_stat_file(&path, t.read_mode) {
				Ok(Some(v)) => v,
				Ok(None) => {
					debug!(file = %name, "no content");
					report.empty += 1;
					continue;
				}
				Err(e) => { Self::tolerate(t.on_error, &name, e, &mut report)?; continue; }
			};
			match QueryRecord::build(self.batch, &self.config.target, &fields, &data) {
				Ok(rec) => {
					debug!(file = %name, elapsed_ms = rec.elapsed.as_millis(), "query record");
					table.append(&rec);
					report.appended += 1;
				}
				Err(e) => Self::tolerate(t.on_error, &name, e, &mut report)?,
			}
		}
		Ok(report)
	}

	pub fn collect_ingestion(&self, dir: &Path, table: &mut SummaryTable) -> Result<DirReport> {
		let t: &TableConfig = &self.config.ingestion;
		let mut report = DirReport::default();
		for (name, path) in list_files(dir)? {
			if !is_json_file(&name) {
				report.ignored += 1;
				continue;
			}
			let fields = IngestionFileName::parse(&name)?;
			let data = match read_stat_file(&path, t.read_mode) {
				Ok(Some(v)) => v,
				Ok(None) => {
					debug!(file = %name, "no content");
					report.empty += 1;
					continue;
				}
				Err(e) => { Self::tolerate(t.on_error, &name, e, &mut report)?; continue; }
			};
			match IngestionRecord::build(self.batch, &self.config.target, &fields, &data) {
				Ok(rec) => {
					debug!(file = %name, iteration = %rec.iteration, "ingestion record");
					table.append(&rec);
					report.appended += 1;
				}
				Err(e) => Self::tolerate(t.on_error, &name, e, &mut report)?,
			}
		}
		Ok(report)
	}

	pub fn open_query_table(&self) -> Result<SummaryTable> {
		SummaryTable::open_or_create(self.config.query_output(), Columns::query(self.config.query.machines_column))
	}

	pub fn open_ingestion_table(&self) -> Result<SummaryTable> {
		let t = &self.config.ingestion;
		SummaryTable::open_or_create(self.config.ingestion_output(), Columns::ingestion(t.machines_column, t.elapsed_breakdown))
	}

	/// Loads both tables, scans both directories and writes each table once.
	pub fn run(&self) -> Result<RunReport> {
		let mut queries = self.open_query_table()?;
		let mut ingestion = self.open_ingestion_table()?;

		let query = self.collect_queries(&self.config.query_stats_dir(), &mut queries)?;
		let ingest = self.collect_ingestion(&self.config.ingestion_stats_dir(), &mut ingestion)?;

		queries.flush()?;
		ingestion.flush()?;
		info!(
			batch = %self.batch,
			queries = query.appended,
			skipped = query.skipped.len() + ingest.skipped.len(),
			ingestion = ingest.appended,
			"statistics updated"
		);
		Ok(RunReport {
			batch: self.batch.to_string(),
			query_output: queries.path().to_path_buf(),
			query,
			ingestion_output: ingestion.path().to_path_buf(),
			ingestion: ingest,
		})
	}
}
