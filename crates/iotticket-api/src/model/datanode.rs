// ── Datanode records ──

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::value::{DataType, Value};

/// A datanode as listed under a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatanodeDetail {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Raw type tag; unknown tags are kept rather than rejected.
    #[serde(rename = "dataType")]
    pub data_type: String,
    #[serde(rename = "href")]
    pub url: String,
}

/// A single datapoint to write.
///
/// The wire `dataType` is derived from `value` when the request body is
/// built; there is no way to set it independently.
#[derive(Debug, Clone, PartialEq)]
pub struct DatanodeWritableValue {
    pub name: String,
    pub path: String,
    pub unit: Option<String>,
    pub value: Value,
    /// `None` lets the server stamp the value with its own clock.
    pub timestamp: Option<DateTime<Utc>>,
}

impl DatanodeWritableValue {
    pub fn new(name: impl Into<String>, path: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            path: path.into(),
            unit: None,
            value: value.into(),
            timestamp: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_timestamp<Tz: TimeZone>(mut self, timestamp: DateTime<Tz>) -> Self {
        self.timestamp = Some(timestamp.with_timezone(&Utc));
        self
    }

    pub fn data_type(&self) -> DataType {
        self.value.data_type()
    }

    /// Encode into the JSON object sent to `process/write/`.
    pub(crate) fn to_wire(&self) -> Result<WritableWire<'_>, Error> {
        let (data_type, v) = self.value.encode()?;
        Ok(WritableWire {
            name: &self.name,
            path: &self.path,
            unit: self.unit.as_deref(),
            v,
            timestamp: self.timestamp,
            data_type,
        })
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct WritableWire<'a> {
    name: &'a str,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    unit: Option<&'a str>,
    v: serde_json::Value,
    #[serde(
        rename = "ts",
        with = "crate::time::epoch_millis_option",
        skip_serializing_if = "Option::is_none"
    )]
    timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "dataType")]
    data_type: DataType,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn minimal_value_omits_unit_and_timestamp() {
        let value = DatanodeWritableValue::new("Temperature", "room/a", 21.5);
        assert_eq!(
            serde_json::to_value(value.to_wire().unwrap()).unwrap(),
            json!({
                "name": "Temperature",
                "path": "room/a",
                "v": 21.5,
                "dataType": "double"
            })
        );
    }

    #[test]
    fn full_value_carries_unit_and_epoch_millis() {
        let ts = Utc.with_ymd_and_hms(2019, 1, 1, 0, 0, 0).unwrap();
        let value = DatanodeWritableValue::new("Blob", "raw", vec![1_u8, 2, 3])
            .with_unit("bytes")
            .with_timestamp(ts);

        assert_eq!(value.data_type(), DataType::Binary);
        assert_eq!(
            serde_json::to_value(value.to_wire().unwrap()).unwrap(),
            json!({
                "name": "Blob",
                "path": "raw",
                "unit": "bytes",
                "v": "AQID",
                "ts": 1_546_300_800_000_i64,
                "dataType": "binary"
            })
        );
    }

    #[test]
    fn detail_parses_wire_names() {
        let detail: DatanodeDetail = serde_json::from_value(json!({
            "name": "Speed",
            "unit": "km/h",
            "dataType": "double",
            "href": "https://my.iot-ticket.com/api/v1/process/read/d-1/?datanodes=Speed"
        }))
        .unwrap();
        assert_eq!(detail.unit.as_deref(), Some("km/h"));
        assert_eq!(detail.data_type, "double");
    }
}
