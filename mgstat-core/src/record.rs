#![forbid(unsafe_code)]

//! Typed rows built from one stat file each.

use crate::error::{Error, Result};
use crate::filename::{IngestionFileName, QueryFileName};
use crate::types::{BatchId, ElapsedMs, MISSING_MEASUREMENT, UNKNOWN_COUNT};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Number, Value};

/// Constants describing the benchmarked system; identical for every row in a run.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Target {
	pub model: String,
	pub machines: u32,
	pub dataset: String,
	pub query_type: String,
}

impl Default for Target {
	fn default() -> Self {
		Self {
			model: "aeong".into(),
			machines: 1,
			dataset: "smartbench".into(),
			query_type: "edgesDirection".into(),
		}
	}
}

/// A record that can be laid onto a summary table by column name.
pub trait Row {
	fn cells(&self) -> Vec<(&'static str, String)>;
}

/// Seconds as a JSON number, or a string holding one.
fn seconds(v: &Value, field: &'static str) -> Result<f64> {
	match v {
		Value::Number(n) => n.as_f64().ok_or_else(|| Error::invalid(field, format!("{n} is not representable"))),
		Value::String(s) => s.trim().parse::<f64>().map_err(|e| Error::invalid(field, format!("{s:?}: {e}"))),
		other => Err(Error::invalid(field, format!("expected number, got {other}"))),
	}
}

/// Storage as reported: a JSON number, or a string holding one. Kept as a number so
/// fractional values reach the table unchanged.
fn byte_count(v: &Value, field: &'static str) -> Result<Number> {
	match v {
		Value::Number(n) => Ok(n.clone()),
		Value::String(s) => {
			let t = s.trim();
			t.parse::<u64>()
				.map(Number::from)
				.ok()
				.or_else(|| t.parse::<f64>().ok().and_then(Number::from_f64))
				.ok_or_else(|| Error::invalid(field, format!("{s:?} is not a number")))
		}
		other => Err(Error::invalid(field, format!("expected number, got {other}"))),
	}
}

/// Stat records are JSON objects; any other top-level value is a broken file.
fn object(data: &Value) -> Result<&Map<String, Value>> {
	let found = match data {
		Value::Object(m) => return Ok(m),
		Value::Null => "null",
		Value::Bool(_) => "boolean",
		Value::Number(_) => "number",
		Value::String(_) => "string",
		Value::Array(_) => "array",
	};
	Err(Error::NotAnObject { found })
}

fn timestamp(v: Option<&Value>) -> Option<String> {
	match v? {
		Value::Null => None,
		Value::String(s) => Some(s.clone()),
		other => Some(other.to_string()),
	}
}

/// One query-stat file.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord {
	pub batch: BatchId,
	pub model: String,
	pub dataset_size: String,
	pub threads: String,
	pub query_name: String,
	pub query_type: String,
	pub elapsed: ElapsedMs,
	/// Not measured by the harness; rendered as `-1`.
	pub entity_count: Option<u64>,
	pub machines: u32,
}

impl QueryRecord {
	pub const DURATION: &'static str = "duration";

	/// `duration` is required; a file without it is not a query result.
	pub fn build(batch: BatchId, target: &Target, file: &QueryFileName, data: &Value) -> Result<Self> {
		let duration = object(data)?.get(Self::DURATION).ok_or(Error::MissingField(Self::DURATION))?;
		Ok(Self {
			batch,
			model: target.model.clone(),
			dataset_size: file.dataset_size.clone(),
			threads: file.threads.clone(),
			query_name: file.query_name.clone(),
			query_type: target.query_type.clone(),
			elapsed: ElapsedMs::from_secs(seconds(duration, Self::DURATION)?),
			entity_count: None,
			machines: target.machines,
		})
	}
}

impl Row for QueryRecord {
	fn cells(&self) -> Vec<(&'static str, String)> {
		vec![
			("test_id", self.batch.to_string()),
			("model", self.model.clone()),
			("datasetSize", self.dataset_size.clone()),
			("threads", self.threads.clone()),
			("queryName", self.query_name.clone()),
			("queryType", self.query_type.clone()),
			("elapsedTime", self.elapsed.to_string()),
			("numEntities", self.entity_count.map_or(UNKNOWN_COUNT.to_string(), |n| n.to_string())),
			("numMachines", self.machines.to_string()),
		]
	}
}

/// Elapsed time split by storage path. Only the graph store is measured today.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElapsedBreakdown {
	pub graph: ElapsedMs,
	pub time_series: u64,
}

/// One ingestion-stat file.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestionRecord {
	pub batch: BatchId,
	pub model: String,
	pub start: Option<String>,
	pub end: Option<String>,
	pub dataset: String,
	pub dataset_size: String,
	pub iteration: String,
	pub threads: u32,
	pub elapsed: Option<ElapsedMs>,
	/// Written to the `storage` column verbatim (`2048.75` stays `2048.75`);
	/// `None` renders as the missing-measurement sentinel.
	pub storage_bytes: Option<Number>,
	pub machines: u32,
}

impl IngestionRecord {
	pub const DURATION: &'static str = "duration";
	pub const STORAGE: &'static str = "storage_consumption";
	pub const START: &'static str = "start_time";
	pub const END: &'static str = "end_time";

	/// Ingestion runs single-threaded in the harness.
	pub const THREADS: u32 = 1;

	/// Every key is optional; absent measurements stay `None` and render as sentinels.
	/// The body itself must be an object.
	pub fn build(batch: BatchId, target: &Target, file: &IngestionFileName, data: &Value) -> Result<Self> {
		let data = object(data)?;
		let elapsed = data
			.get(Self::DURATION)
			.map(|v| seconds(v, Self::DURATION).map(ElapsedMs::from_secs))
			.transpose()?;
		let storage_bytes = data.get(Self::STORAGE).map(|v| byte_count(v, Self::STORAGE)).transpose()?;
		Ok(Self {
			batch,
			model: target.model.clone(),
			start: timestamp(data.get(Self::START)),
			end: timestamp(data.get(Self::END)),
			dataset: target.dataset.clone(),
			dataset_size: file.dataset_size.clone(),
			iteration: file.iteration.clone(),
			threads: Self::THREADS,
			elapsed,
			storage_bytes,
			machines: target.machines,
		})
	}

	pub fn elapsed_or_sentinel(&self) -> ElapsedMs { self.elapsed.unwrap_or_else(ElapsedMs::missing) }

	pub fn storage_or_sentinel(&self) -> String {
		self.storage_bytes.as_ref().map_or(MISSING_MEASUREMENT.to_string(), Number::to_string)
	}

	pub fn breakdown(&self) -> ElapsedBreakdown {
		ElapsedBreakdown { graph: self.elapsed_or_sentinel(), time_series: 0 }
	}
}

impl Row for IngestionRecord {
	fn cells(&self) -> Vec<(&'static str, String)> {
		let split = self.breakdown();
		vec![
			("test_id", self.batch.to_string()),
			("model", self.model.clone()),
			("startTimestamp", self.start.clone().unwrap_or_default()),
			("endTimestamp", self.end.clone().unwrap_or_default()),
			("dataset", self.dataset.clone()),
			("datasetSize", self.dataset_size.clone()),
			("threads", self.threads.to_string()),
			("elapsedTime", self.elapsed_or_sentinel().to_string()),
			("storage", self.storage_or_sentinel()),
			("graphElapsedTime", split.graph.to_string()),
			("timeSeriesElapsedTime", split.time_series.to_string()),
			("numMachines", self.machines.to_string()),
		]
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use serde_json::json;
	use uuid::Uuid;

	fn cell<'a>(cells: &'a [(&'static str, String)], name: &str) -> &'a str {
		cells.iter().find(|(k, _)| *k == name).map(|(_, v)| v.as_str()).unwrap()
	}

	fn ingest_name() -> IngestionFileName {
		IngestionFileName::parse("ingest_sf1_it2_stats.json").unwrap()
	}

	#[test]
	fn query_record_fixed_columns() {
		let file = QueryFileName::parse("matchAll_1000sz_4wrk_run1.json").unwrap();
		let batch = BatchId::from(Uuid::nil());
		let r = QueryRecord::build(batch, &Target::default(), &file, &json!({"duration": 0.0023})).unwrap();
		assert_eq!(r.elapsed, ElapsedMs(2));
		let cells = r.cells();
		assert_eq!(cell(&cells, "queryType"), "edgesDirection");
		assert_eq!(cell(&cells, "numEntities"), "-1");
		assert_eq!(cell(&cells, "numMachines"), "1");
		assert_eq!(cell(&cells, "model"), "aeong");
		assert_eq!(cell(&cells, "test_id"), batch.to_string());
	}

	#[test]
	fn query_record_needs_duration() {
		let file = QueryFileName::parse("q_1sz_1wrk").unwrap();
		let err = QueryRecord::build(BatchId::new(), &Target::default(), &file, &json!({"count": 3})).unwrap_err();
		assert!(matches!(err, Error::MissingField("duration")));
		let err = QueryRecord::build(BatchId::new(), &Target::default(), &file, &json!({"duration": [1]})).unwrap_err();
		assert!(matches!(err, Error::InvalidField { field: "duration", .. }));
		assert!(!err.is_decode_error());
		let err = QueryRecord::build(BatchId::new(), &Target::default(), &file, &json!({"duration": null})).unwrap_err();
		assert!(matches!(err, Error::InvalidField { field: "duration", .. }));
	}

	#[test]
	fn query_duration_accepts_numeric_string() {
		let file = QueryFileName::parse("q_1sz_1wrk").unwrap();
		let r = QueryRecord::build(BatchId::new(), &Target::default(), &file, &json!({"duration": " 1.25 "})).unwrap();
		assert_eq!(r.elapsed.as_millis(), 1250);
	}

	#[test]
	fn ingestion_record_uses_measurements() {
		let data = json!({"duration": 12.5, "storage_consumption": 2048, "start_time": "t0", "end_time": "t1"});
		let r = IngestionRecord::build(BatchId::new(), &Target::default(), &ingest_name(), &data).unwrap();
		let cells = r.cells();
		assert_eq!(cell(&cells, "elapsedTime"), "12500");
		assert_eq!(cell(&cells, "storage"), "2048");
		assert_eq!(cell(&cells, "startTimestamp"), "t0");
		assert_eq!(cell(&cells, "endTimestamp"), "t1");
		assert_eq!(cell(&cells, "threads"), "1");
		assert_eq!(cell(&cells, "dataset"), "smartbench");
		assert_eq!(cell(&cells, "datasetSize"), "sf1");
		assert_eq!(cell(&cells, "graphElapsedTime"), "12500");
		assert_eq!(cell(&cells, "timeSeriesElapsedTime"), "0");
	}

	#[test]
	fn ingestion_record_defaults_to_sentinels() {
		let r = IngestionRecord::build(BatchId::new(), &Target::default(), &ingest_name(), &json!({})).unwrap();
		assert_eq!(r.elapsed, None);
		assert_eq!(r.storage_bytes, None);
		let cells = r.cells();
		assert_eq!(cell(&cells, "elapsedTime"), "99999999000");
		assert_eq!(cell(&cells, "storage"), "99999999");
		assert_eq!(cell(&cells, "startTimestamp"), "");
		assert_eq!(cell(&cells, "endTimestamp"), "");
	}

	#[test]
	fn ingestion_numeric_timestamp_is_rendered() {
		let r = IngestionRecord::build(BatchId::new(), &Target::default(), &ingest_name(), &json!({"start_time": 1700000000})).unwrap();
		assert_eq!(r.start.as_deref(), Some("1700000000"));
	}

	#[test]
	fn ingestion_storage_keeps_fractional_text() {
		let r = IngestionRecord::build(BatchId::new(), &Target::default(), &ingest_name(), &json!({"storage_consumption": 2048.75})).unwrap();
		assert_eq!(cell(&r.cells(), "storage"), "2048.75");
		let r = IngestionRecord::build(BatchId::new(), &Target::default(), &ingest_name(), &json!({"storage_consumption": "4096"})).unwrap();
		assert_eq!(cell(&r.cells(), "storage"), "4096");
	}

	#[test]
	fn non_object_bodies_are_rejected() {
		for body in [json!([1, 2, 3]), json!(42), json!(null), json!("hello")] {
			let err = IngestionRecord::build(BatchId::new(), &Target::default(), &ingest_name(), &body).unwrap_err();
			assert!(matches!(err, Error::NotAnObject { .. }), "{body}");
		}
		let file = QueryFileName::parse("q_1sz_1wrk").unwrap();
		let err = QueryRecord::build(BatchId::new(), &Target::default(), &file, &json!([{"duration": 1}])).unwrap_err();
		assert!(matches!(err, Error::NotAnObject { found: "array" }));
	}

	#[test]
	fn ingestion_rejects_non_numeric_storage() {
		let err = IngestionRecord::build(BatchId::new(), &Target::default(), &ingest_name(), &json!({"storage_consumption": true})).unwrap_err();
		assert!(matches!(err, Error::InvalidField { field: "storage_consumption", .. }));
	}
}
