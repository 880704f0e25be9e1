#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};
use thiserror::Error as ThisError;

/// Crate-wide result alias.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Errors raised while scanning stat files and maintaining summary tables.
#[derive(Debug, ThisError)]
pub enum Error {
	#[error("I/O error on {}: {source}", path.display())]
	Io { path: PathBuf, #[source] source: std::io::Error },
	#[error("JSON decode error in {}: {source}", path.display())]
	Json { path: PathBuf, #[source] source: serde_json::Error },
	#[error("CSV error on {}: {source}", path.display())]
	Csv { path: PathBuf, #[source] source: csv::Error },
	#[error("file name {name:?} has {found} underscore-separated tokens, need at least {needed}")]
	FileName { name: String, needed: usize, found: usize },
	#[error("stat record must be a JSON object, got {found}")]
	NotAnObject { found: &'static str },
	#[error("missing field: {0}")]
	MissingField(&'static str),
	#[error("invalid field {field}: {reason}")]
	InvalidField { field: &'static str, reason: String },
	#[error("configuration error: {0}")]
	Config(String),
}

impl Error {
	pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
		Error::Io { path: path.as_ref().to_path_buf(), source }
	}
	pub fn json(path: impl AsRef<Path>, source: serde_json::Error) -> Self {
		Error::Json { path: path.as_ref().to_path_buf(), source }
	}
	pub fn csv(path: impl AsRef<Path>, source: csv::Error) -> Self {
		Error::Csv { path: path.as_ref().to_path_buf(), source }
	}
	pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
		Error::InvalidField { field, reason: reason.into() }
	}
	pub fn config(msg: impl Into<String>) -> Self { Error::Config(msg.into()) }

	/// The stat file is not decodable JSON. This is the only failure a skip policy
	/// steps over; wrong shapes and field types always stop the run.
	pub fn is_decode_error(&self) -> bool { matches!(self, Error::Json { .. }) }
}
