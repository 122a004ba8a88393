// iotticket-api: Async Rust client for the IoT-Ticket data platform REST API

pub mod auth;
pub mod client;
pub mod error;
pub mod model;
pub mod query;
pub mod time;
pub mod transport;
pub mod value;

pub use auth::Credentials;
pub use client::IoTTicketClient;
pub use error::Error;
pub use model::{
    DatanodeDetail, DatanodeReadValue, DatanodeValueData, DatanodeWritableValue,
    DatapointWriteResult, Device, DeviceAttribute, DeviceDetails, DeviceQuota, Enterprise,
    ErrorCode, ErrorInfo, PagedResult, ProcessValues, Quota, StatisticalDatanodeReadValue,
    StatisticalValueData, StatisticalValues, WriteResult,
};
pub use query::{DatanodeQueryCriteria, Grouping, SortOrder, StatisticalDataQueryCriteria};
pub use transport::{ClientConfig, TlsMode, TransportConfig};
pub use value::{DataType, Value};

pub use secrecy::SecretString;
pub use tokio_util::sync::CancellationToken;
