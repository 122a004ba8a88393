// ── Device records ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One free-form key/value attribute attached to a device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceAttribute {
    pub key: String,
    pub value: String,
}

impl DeviceAttribute {
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A device as submitted for registration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Device {
    pub name: String,
    pub manufacturer: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub device_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Attributes keep their insertion order on the wire.
    #[serde(
        default,
        deserialize_with = "super::null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub attributes: Vec<DeviceAttribute>,
}

impl Device {
    pub fn new(name: impl Into<String>, manufacturer: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            manufacturer: manufacturer.into(),
            device_type: None,
            description: None,
            attributes: Vec::new(),
        }
    }

    pub fn with_type(mut self, device_type: impl Into<String>) -> Self {
        self.device_type = Some(device_type.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push(DeviceAttribute::new(key, value));
        self
    }
}

/// A registered device, as returned by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceDetails {
    #[serde(flatten)]
    pub device: Device,
    #[serde(rename = "deviceId")]
    pub id: String,
    #[serde(rename = "href")]
    pub url: String,
    /// Second precision; carried as `yyyy-MM-ddTHH:mm:ssUTC`.
    #[serde(rename = "createdAt", with = "crate::time::created_at")]
    pub creation_date: DateTime<Utc>,
}
