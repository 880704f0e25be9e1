#![forbid(unsafe_code)]

//! Stat file decoding.
//!
//! The harness writes stat files in three shapes, so the decoder is chosen per table:
//! a single JSON document, newline-delimited JSON where only the first record counts,
//! or one JSON value followed by bytes that must be ignored.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fs, path::Path};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReadMode {
	/// Decode the first complete JSON value and ignore whatever follows it.
	FirstValue,
	/// Decode the first line with non-whitespace content on its own.
	FirstLine,
	/// The whole file must be exactly one JSON value.
	Strict,
}

/// Skips leading whitespace and decodes exactly one value; trailing content is never read.
pub fn read_first_value(text: &str) -> serde_json::Result<Value> {
	let mut values = serde_json::Deserializer::from_str(text.trim_start()).into_iter::<Value>();
	match values.next() {
		Some(v) => v,
		// Nothing but whitespace: surface the same EOF error a full parse would give.
		None => serde_json::from_str::<Value>(text),
	}
}

/// `Ok(None)` when every line is blank.
pub fn read_first_line(text: &str) -> serde_json::Result<Option<Value>> {
	match text.lines().find(|l| !l.trim().is_empty()) {
		Some(line) => serde_json::from_str(line).map(Some),
		None => Ok(None),
	}
}

pub fn read_strict(text: &str) -> serde_json::Result<Value> { serde_json::from_str(text) }

/// Reads `path` and decodes it according to `mode`.
pub fn read_stat_file(path: &Path, mode: ReadMode) -> Result<Option<Value>> {
	let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
	let decoded = match mode {
		ReadMode::FirstValue => read_first_value(&text).map(Some),
		ReadMode::FirstLine => read_first_line(&text),
		ReadMode::Strict => read_strict(&text).map(Some),
	};
	decoded.map_err(|e| Error::json(path, e))
}
