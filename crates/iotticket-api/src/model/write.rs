use serde::{Deserialize, Serialize};

/// Outcome of a process-data write.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WriteResult {
    #[serde(rename = "totalWritten")]
    pub total_write_count: i64,
    #[serde(rename = "writeResults", default, deserialize_with = "super::null_as_empty")]
    pub datapoint_write_results: Vec<DatapointWriteResult>,
}

/// Per-datanode write count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatapointWriteResult {
    #[serde(rename = "href")]
    pub url: String,
    #[serde(rename = "writtenCount")]
    pub write_count: i64,
}
