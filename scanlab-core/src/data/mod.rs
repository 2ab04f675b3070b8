//! Data ingestion and normalization

pub mod canonicalize;
pub mod ingest;
pub mod normalize;
pub mod schema;
pub mod source;

pub use canonicalize::{AnomalyReport, AnomalyType, Canonicalizer};
pub use ingest::{ingest_csv, IngestError, IngestResult, RawRow};
pub use normalize::{default_offset, parse_utc_offset, Normalizer};
pub use schema::{BarSchema, ColumnMap, SchemaError};
pub use source::{DataError, HttpClient, SourceId};
