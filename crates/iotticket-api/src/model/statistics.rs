// ── Statistical read results ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::time;

/// Result of `stat/read/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalValues {
    #[serde(rename = "href")]
    pub url: String,
    #[serde(rename = "datanodeReads", default, deserialize_with = "super::null_as_empty")]
    pub datanodes: Vec<StatisticalDatanodeReadValue>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalDatanodeReadValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(rename = "dataType")]
    pub data_type: String,
    pub path: String,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub values: Vec<StatisticalValueData>,
}

/// Aggregates for one grouping bucket.
///
/// `minimum`, `maximum` and `average` are `None` when the bucket holds no
/// samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticalValueData {
    #[serde(rename = "min", default)]
    pub minimum: Option<f64>,
    #[serde(rename = "max", default)]
    pub maximum: Option<f64>,
    #[serde(rename = "avg", default)]
    pub average: Option<f64>,
    pub count: u64,
    pub sum: f64,
    #[serde(rename = "ts")]
    pub timestamp_millis: i64,
}

impl StatisticalValueData {
    pub fn timestamp(&self) -> Result<DateTime<Utc>, Error> {
        time::from_epoch_millis(self.timestamp_millis)
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
