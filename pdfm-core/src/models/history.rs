//! Per-operation history records and the unified history view

use crate::error::Error;
use crate::id::ObjectId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::fmt;
use std::str::FromStr;

/// The four PDF operations that are logged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HistoryKind {
    Merge,
    Compress,
    Convert,
    Summary,
}

impl HistoryKind {
    pub const ALL: [HistoryKind; 4] = [
        HistoryKind::Merge,
        HistoryKind::Compress,
        HistoryKind::Convert,
        HistoryKind::Summary,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            HistoryKind::Merge => "merge",
            HistoryKind::Compress => "compress",
            HistoryKind::Convert => "convert",
            HistoryKind::Summary => "summary",
        }
    }
}

impl fmt::Display for HistoryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HistoryKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "merge" => Ok(HistoryKind::Merge),
            "compress" => Ok(HistoryKind::Compress),
            "convert" => Ok(HistoryKind::Convert),
            "summary" => Ok(HistoryKind::Summary),
            other => Err(Error::InvalidInput(format!("invalid history type: {other}"))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MergeHistory {
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub input_files: Vec<String>,
    pub output_file: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompressHistory {
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub file_name: String,
    pub original_size: i64,
    pub compressed_size: i64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertHistory {
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub file_name: String,
    pub source_format: String,
    pub target_format: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryHistory {
    pub id: ObjectId,
    pub user_id: ObjectId,
    pub file_name: String,
    pub summary_text: String,
    pub language: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MergeLog {
    #[serde(default)]
    pub input_files: Vec<String>,
    #[serde(default)]
    pub output_file: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CompressLog {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub original_size: i64,
    #[serde(default)]
    pub compressed_size: i64,
    #[serde(default)]
    pub status: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ConvertLog {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub source_format: String,
    #[serde(default)]
    pub target_format: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SummaryLog {
    #[serde(default)]
    pub file_name: String,
    #[serde(default)]
    pub summary_text: String,
    #[serde(default)]
    pub language: String,
}

/// One row of the unified history view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HistoryItem {
    pub id: ObjectId,
    #[serde(rename = "type")]
    pub kind: HistoryKind,
    pub description: String,
    pub file_name: String,
    pub details: Map<String, Value>,
    pub created_at: DateTime<Utc>,
}

fn details(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

impl From<&MergeHistory> for HistoryItem {
    fn from(record: &MergeHistory) -> Self {
        Self {
            id: record.id,
            kind: HistoryKind::Merge,
            description: format!("Merged {} PDF files", record.input_files.len()),
            file_name: record.output_file.clone(),
            details: details(json!({ "input_files": record.input_files })),
            created_at: record.created_at,
        }
    }
}

impl From<&CompressHistory> for HistoryItem {
    fn from(record: &CompressHistory) -> Self {
        Self {
            id: record.id,
            kind: HistoryKind::Compress,
            description: "Compressed PDF file".to_string(),
            file_name: record.file_name.clone(),
            details: details(json!({
                "original_size": record.original_size,
                "compressed_size": record.compressed_size,
                "status": record.status,
            })),
            created_at: record.created_at,
        }
    }
}

impl From<&ConvertHistory> for HistoryItem {
    fn from(record: &ConvertHistory) -> Self {
        Self {
            id: record.id,
            kind: HistoryKind::Convert,
            description: format!(
                "Converted {} to {}",
                record.source_format, record.target_format
            ),
            file_name: record.file_name.clone(),
            details: details(json!({
                "source_format": record.source_format,
                "target_format": record.target_format,
            })),
            created_at: record.created_at,
        }
    }
}

impl From<&SummaryHistory> for HistoryItem {
    fn from(record: &SummaryHistory) -> Self {
        Self {
            id: record.id,
            kind: HistoryKind::Summary,
            description: "Generated PDF summary".to_string(),
            file_name: record.file_name.clone(),
            details: details(json!({ "language": record.language })),
            created_at: record.created_at,
        }
    }
}
