#![forbid(unsafe_code)]

//! Append-only CSV summary tables.
//!
//! A table is loaded (or created with its header) once, grows in memory, and is
//! written back whole by [`SummaryTable::flush`]. The header of an existing file is
//! authoritative: records are laid onto it by column name.

use crate::error::{Error, Result};
use crate::record::Row;
use std::{
	fs,
	path::{Path, PathBuf},
};
use tracing::{debug, info};

/// Header presets for the two tables.
pub struct Columns;

impl Columns {
	const QUERY: &'static [&'static str] = &[
		"test_id", "model", "datasetSize", "threads", "queryName", "queryType", "elapsedTime", "numEntities",
	];
	const INGESTION: &'static [&'static str] = &[
		"test_id", "model", "startTimestamp", "endTimestamp", "dataset", "datasetSize", "threads", "elapsedTime", "storage",
	];
	const BREAKDOWN: &'static [&'static str] = &["graphElapsedTime", "timeSeriesElapsedTime"];
	const MACHINES: &'static str = "numMachines";

	pub fn query(machines_column: bool) -> Vec<String> {
		let mut h: Vec<String> = Self::QUERY.iter().map(|c| c.to_string()).collect();
		if machines_column { h.push(Self::MACHINES.to_string()); }
		h
	}

	pub fn ingestion(machines_column: bool, elapsed_breakdown: bool) -> Vec<String> {
		let mut h: Vec<String> = Self::INGESTION.iter().map(|c| c.to_string()).collect();
		if elapsed_breakdown { h.extend(Self::BREAKDOWN.iter().map(|c| c.to_string())); }
		if machines_column { h.push(Self::MACHINES.to_string()); }
		h
	}
}

#[derive(Debug, Clone)]
pub struct SummaryTable {
	path: PathBuf,
	header: Vec<String>,
	rows: Vec<Vec<String>>,
}

impl SummaryTable {
	/// Loads `path` with its own header and rows, or creates it (and missing parent
	/// directories) containing only `header`.
	pub fn open_or_create(path: impl AsRef<Path>, header: Vec<String>) -> Result<Self> {
		let path = path.as_ref().to_path_buf();
		if path.exists() {
			let table = Self::load(&path)?;
			info!(path = %path.display(), rows = table.rows.len(), "statistics file already exists");
			return Ok(table);
		}
		if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
			fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
		}
		let table = Self { path, header, rows: Vec::new() };
		table.flush()?;
		info!(path = %table.path.display(), "created new statistics file");
		Ok(table)
	}

	fn load(path: &Path) -> Result<Self> {
		let mut rdr = csv::ReaderBuilder::new()
			.flexible(true)
			.from_path(path)
			.map_err(|e| Error::csv(path, e))?;
		let header = rdr.headers().map_err(|e| Error::csv(path, e))?.iter().map(str::to_string).collect();
		let mut rows = Vec::new();
		for rec in rdr.records() {
			let rec = rec.map_err(|e| Error::csv(path, e))?;
			rows.push(rec.iter().map(str::to_string).collect());
		}
		Ok(Self { path: path.to_path_buf(), header, rows })
	}

	/// Adds one row at the end. Header columns the record lacks stay empty; record
	/// cells without a matching column are dropped.
	pub fn append(&mut self, record: &impl Row) {
		let mut cells = record.cells();
		let row = self
			.header
			.iter()
			.map(|col| match cells.iter().position(|(name, _)| name == col) {
				Some(i) => cells.swap_remove(i).1,
				None => String::new(),
			})
			.collect();
		if !cells.is_empty() {
			let dropped: Vec<&str> = cells.iter().map(|(name, _)| *name).collect();
			debug!(path = %self.path.display(), ?dropped, "columns not present in table header");
		}
		self.rows.push(row);
	}

	/// Overwrites the file with the header followed by every row.
	pub fn flush(&self) -> Result<()> {
		let mut w = csv::WriterBuilder::new()
			.flexible(true)
			.from_path(&self.path)
			.map_err(|e| Error::csv(&self.path, e))?;
		w.write_record(&self.header).map_err(|e| Error::csv(&self.path, e))?;
		for row in &self.rows {
			w.write_record(row).map_err(|e| Error::csv(&self.path, e))?;
		}
		w.flush().map_err(|e| Error::io(&self.path, e))?;
		debug!(path = %self.path.display(), rows = self.rows.len(), "flushed statistics file");
		Ok(())
	}

	pub fn path(&self) -> &Path { &self.path }
	pub fn header(&self) -> &[String] { &self.header }
	pub fn rows(&self) -> &[Vec<String>] { &self.rows }
	pub fn len(&self) -> usize { self.rows.len() }
	pub fn is_empty(&self) -> bool { self.rows.is_empty() }
}
