#![forbid(unsafe_code)]

//! Positional field extraction from stat file names.
//!
//! Query stats: `<queryName>_<size>sz_<threads>wrk_*`.
//! Ingestion stats: `<prefix>_<size>_<iteration>_*.json`.
//! Tokens are taken by index only; nothing beyond the token count is validated.

use crate::error::{Error, Result};

const QUERY_NAME: usize = 0;
const DATASET_SIZE: usize = 1;
const THREADS: usize = 2;
const ITERATION: usize = 2;

fn tokens(name: &str, needed: usize) -> Result<Vec<&str>> {
	let parts: Vec<&str> = name.split('_').collect();
	if parts.len() < needed {
		return Err(Error::FileName { name: name.to_string(), needed, found: parts.len() });
	}
	Ok(parts)
}

/// Fields carried by a query-stat file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryFileName {
	pub query_name: String,
	pub dataset_size: String,
	pub threads: String,
}

impl QueryFileName {
	pub fn parse(name: &str) -> Result<Self> {
		let t = tokens(name, THREADS + 1)?;
		Ok(Self {
			query_name: t[QUERY_NAME].to_string(),
			dataset_size: t[DATASET_SIZE].replace("sz", ""),
			threads: t[THREADS].replace("wrk", ""),
		})
	}
}

/// Fields carried by an ingestion-stat file name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngestionFileName {
	pub dataset_size: String,
	pub iteration: String,
}

impl IngestionFileName {
	pub fn parse(name: &str) -> Result<Self> {
		let t = tokens(name, ITERATION + 1)?;
		Ok(Self { dataset_size: t[DATASET_SIZE].to_string(), iteration: t[ITERATION].to_string() })
	}
}

/// Ingestion directories mix in other artifacts; only `.json` files are stats.
pub fn is_json_file(name: &str) -> bool { name.ends_with(".json") }
