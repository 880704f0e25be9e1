#![forbid(unsafe_code)]

//! mgstat core — benchmark stat file aggregation
//!
//! - Error/Result types (`mgstat_core::Error` / `mgstat_core::Result<T>`)
//! - Positional field extraction from stat file names (`filename`)
//! - Stat file decoders: first value, first non-empty line, strict (`reader`)
//! - Query and ingestion records with sentinel rendering (`record`)
//! - Append-only CSV summary tables (`table`)
//! - The directory scan driver tying it together (`aggregate`)

pub mod aggregate;
pub mod config;
pub mod error;
pub mod filename;
pub mod reader;
pub mod record;
pub mod table;
pub mod types;

pub use aggregate::{Aggregator, DirReport, FailurePolicy, RunReport};
pub use config::{MgstatConfig, TableConfig};
pub use error::{Error, Result};
pub use reader::ReadMode;
pub use record::{IngestionRecord, QueryRecord, Row, Target};
pub use table::{Columns, SummaryTable};
pub use types::{BatchId, ElapsedMs, MISSING_MEASUREMENT, UNKNOWN_COUNT};
