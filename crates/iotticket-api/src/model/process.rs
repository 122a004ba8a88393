// ── Process data read results ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Error;
use crate::time;
use crate::value::Value;

/// Result of `process/read/`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProcessValues {
    #[serde(rename = "href")]
    pub url: String,
    #[serde(rename = "datanodeReads", default, deserialize_with = "super::null_as_empty")]
    pub datanodes: Vec<DatanodeReadValue>,
}

/// Values read from one datanode.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatanodeReadValue {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(rename = "dataType")]
    pub data_type: String,
    pub path: String,
    #[serde(default, deserialize_with = "super::null_as_empty")]
    pub values: Vec<DatanodeValueData>,
}

impl DatanodeReadValue {
    /// Decode every value with this datanode's type tag.
    pub fn decoded_values(&self) -> Result<Vec<Value>, Error> {
        self.values
            .iter()
            .map(|data| data.decode(&self.data_type))
            .collect()
    }
}

/// One raw datapoint. The text is only meaningful together with the
/// owning datanode's `dataType`, which is why decoding takes it as an
/// argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatanodeValueData {
    /// `None` when the server sent `"v": null`.
    #[serde(rename = "v", default, deserialize_with = "raw_text")]
    pub raw: Option<String>,
    #[serde(rename = "ts")]
    pub timestamp_millis: i64,
}

impl DatanodeValueData {
    /// Fails with [`Error::Deserialization`] for a null value.
    pub fn decode(&self, data_type: &str) -> Result<Value, Error> {
        match self.raw {
            Some(ref raw) => Value::decode(raw, data_type),
            None => Err(Error::Deserialization {
                message: format!("datapoint at {} has no value", self.timestamp_millis),
                body: "null".to_owned(),
            }),
        }
    }

    pub fn timestamp(&self) -> Result<DateTime<Utc>, Error> {
        time::from_epoch_millis(self.timestamp_millis)
    }
}

/// The server may send `v` as a JSON string or as a bare scalar.
fn raw_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Some(s),
        serde_json::Value::Null => None,
        other => Some(other.to_string()),
    })
}
