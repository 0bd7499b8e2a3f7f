pub mod formats;
pub mod json;

use crate::export::formats::gene_metrics::GeneMetricsExport;
use chrono::{DateTime, Utc};
use serde::ser::Serializer;
use serde::Serialize;

pub const EXPORT_RECORD_TYPE: &str = "scqc.analysis";
pub const EXPORT_VERSION: &str = "1.0";

/// Root structure for all exports.
#[derive(Debug, Serialize)]
pub struct AnalysisExport {
    #[serde(rename = "$type")]
    pub record_type: String,

    pub version: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub created_at: DateTime<Utc>,
    pub tool_version: String,

    #[serde(flatten)]
    pub data: AnalysisData,

    pub metadata: ExportMetadata,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type")]
pub enum AnalysisData {
    GeneMetrics(GeneMetricsExport),
}

fn serialize_datetime<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.to_rfc3339())
}

#[derive(Debug, Default, Serialize)]
pub struct ExportMetadata {
    pub sample_id: Option<String>,
    pub source_file: Option<String>,
    pub tags: Vec<String>,
}

impl AnalysisExport {
    pub fn new(data: AnalysisData, metadata: ExportMetadata) -> Self {
        Self {
            record_type: EXPORT_RECORD_TYPE.to_string(),
            version: EXPORT_VERSION.to_string(),
            created_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            data,
            metadata,
        }
    }
}
