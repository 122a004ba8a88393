// ── Quota snapshots ──

use serde::{Deserialize, Serialize};

/// Account-wide usage and limits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quota {
    #[serde(rename = "totalDevices")]
    pub total_device_count: i64,
    #[serde(rename = "maxNumberOfDevices")]
    pub max_device_count: i64,
    #[serde(rename = "maxDataNodePerDevice")]
    pub max_datanode_count_per_device: i64,
    #[serde(rename = "usedStorageSize")]
    pub used_storage_bytes: i64,
    #[serde(rename = "maxStorageSize")]
    pub max_storage_bytes: i64,
}

/// Usage and limits of a single device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceQuota {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    #[serde(rename = "totalRequestToday")]
    pub request_count_today: i64,
    #[serde(rename = "maxReadRequestPerDay")]
    pub max_read_request_count_per_day: i64,
    #[serde(rename = "numberOfDataNodes")]
    pub datanode_count: i64,
    #[serde(rename = "storageSize")]
    pub used_storage_bytes: i64,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use serde_json::json;

    use super::*;

    #[test]
    fn quota_parses_wire_names() {
        let quota: Quota = serde_json::from_value(json!({
            "totalDevices": 3,
            "maxNumberOfDevices": 10,
            "maxDataNodePerDevice": 50,
            "usedStorageSize": 4096,
            "maxStorageSize": 1_000_000
        }))
        .unwrap();
        assert_eq!(
            quota,
            Quota {
                total_device_count: 3,
                max_device_count: 10,
                max_datanode_count_per_device: 50,
                used_storage_bytes: 4096,
                max_storage_bytes: 1_000_000,
            }
        );
    }

    #[test]
    fn device_quota_parses_wire_names() {
        let quota: DeviceQuota = serde_json::from_value(json!({
            "deviceId": "d-1",
            "totalRequestToday": 12,
            "maxReadRequestPerDay": 1000,
            "numberOfDataNodes": 4,
            "storageSize": 512
        }))
        .unwrap();
        assert_eq!(quota.device_id, "d-1");
        assert_eq!(quota.request_count_today, 12);
        assert_eq!(quota.datanode_count, 4);
        assert_eq!(quota.used_storage_bytes, 512);
    }
}
