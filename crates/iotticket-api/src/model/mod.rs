// ── Domain model ──
//
// Records exchanged with the IoT-Ticket REST API. Field names on the Rust
// side are semantic; the `serde` attributes carry the exact wire names.

pub mod datanode;
pub mod device;
pub mod enterprise;
pub mod error_info;
pub mod paging;
pub mod process;
pub mod quota;
pub mod statistics;
pub mod write;

// ── Re-exports ──────────────────────────────────────────────────────

pub use datanode::{DatanodeDetail, DatanodeWritableValue};
pub use device::{Device, DeviceAttribute, DeviceDetails};
pub use enterprise::Enterprise;
pub use error_info::{ErrorCode, ErrorInfo};
pub use paging::PagedResult;
pub use process::{DatanodeReadValue, DatanodeValueData, ProcessValues};
pub use quota::{DeviceQuota, Quota};
pub use statistics::{StatisticalDatanodeReadValue, StatisticalValueData, StatisticalValues};
pub use write::{DatapointWriteResult, WriteResult};

use serde::{Deserialize, Deserializer};

/// Treat an explicit JSON `null` collection the same as an absent one.
pub(crate) fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<Vec<T>>::deserialize(deserializer).map(Option::unwrap_or_default)
}
