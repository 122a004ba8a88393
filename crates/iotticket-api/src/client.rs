// Async HTTP client for the IoT-Ticket REST API.
//
// Base path: /api/v1/ (whatever the configured base URL points at)
// Auth: HTTP Basic, injected as a sensitive default header

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};
use url::Url;

use crate::auth::Credentials;
use crate::error::Error;
use crate::model::{
    DatanodeDetail, DatanodeWritableValue, Device, DeviceDetails, DeviceQuota, Enterprise,
    ErrorInfo, PagedResult, ProcessValues, Quota, StatisticalValues, WriteResult,
};
use crate::query::{
    DatanodeQueryCriteria, StatisticalDataQueryCriteria, ensure_not_blank, escape_segment, paged,
};
use crate::transport::{ClientConfig, TransportConfig};

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the IoT-Ticket REST API.
///
/// Cheap to clone: clones share one connection pool, and the pool is
/// released when the last clone is dropped. Every request can be aborted
/// through the client's [`CancellationToken`]; see
/// [`with_cancellation`](Self::with_cancellation).
#[derive(Debug, Clone)]
pub struct IoTTicketClient {
    http: reqwest::Client,
    base_url: Url,
    cancel: CancellationToken,
}

impl IoTTicketClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client with default transport settings.
    pub fn new(base_url: &str, credentials: &Credentials) -> Result<Self, Error> {
        let url = Url::parse(base_url)?;
        Self::with_transport(url, credentials, &TransportConfig::default())
    }

    pub fn from_config(config: &ClientConfig) -> Result<Self, Error> {
        Self::with_transport(config.base_url.clone(), &config.credentials, &config.transport)
    }

    /// Wrap an existing `reqwest::Client` (caller manages auth headers).
    pub fn from_reqwest(base_url: &str, http: reqwest::Client) -> Result<Self, Error> {
        let base_url = Self::normalize_base_url(Url::parse(base_url)?)?;
        Ok(Self {
            http,
            base_url,
            cancel: CancellationToken::new(),
        })
    }

    fn with_transport(
        base_url: Url,
        credentials: &Credentials,
        transport: &TransportConfig,
    ) -> Result<Self, Error> {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, credentials.basic_header()?);

        let http = transport.build_client_with_headers(headers)?;
        let base_url = Self::normalize_base_url(base_url)?;

        Ok(Self {
            http,
            base_url,
            cancel: CancellationToken::new(),
        })
    }

    /// A clone whose requests are aborted when `token` is cancelled.
    ///
    /// The clone shares the connection pool with `self`.
    pub fn with_cancellation(&self, token: CancellationToken) -> Self {
        Self {
            http: self.http.clone(),
            base_url: self.base_url.clone(),
            cancel: token,
        }
    }

    pub fn cancellation_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Ensure the base ends in `/` so joining `devices/` keeps any
    /// `/api/v1` prefix.
    fn normalize_base_url(mut url: Url) -> Result<Url, Error> {
        if url.cannot_be_a_base() {
            return Err(Error::invalid_argument(
                "base_url",
                format!("{url} cannot be used as a base URL"),
            ));
        }
        if !url.path().ends_with('/') {
            let path = format!("{}/", url.path());
            url.set_path(&path);
        }
        Ok(url)
    }

    // ── Devices ──────────────────────────────────────────────────────

    pub async fn register_device(&self, device: &Device) -> Result<DeviceDetails, Error> {
        self.post("devices/", device).await
    }

    pub async fn get_devices(
        &self,
        count: u32,
        skip: u32,
    ) -> Result<PagedResult<DeviceDetails>, Error> {
        self.get(&paged("devices/", count, skip)).await
    }

    pub async fn get_device(&self, device_id: &str) -> Result<DeviceDetails, Error> {
        ensure_not_blank("device_id", device_id)?;
        self.get(&format!("devices/{}/", escape_segment(device_id)))
            .await
    }

    pub async fn get_datanodes(
        &self,
        device_id: &str,
        count: u32,
        skip: u32,
    ) -> Result<PagedResult<DatanodeDetail>, Error> {
        ensure_not_blank("device_id", device_id)?;
        let path = format!("devices/{}/datanodes/", escape_segment(device_id));
        self.get(&paged(&path, count, skip)).await
    }

    // ── Process data ─────────────────────────────────────────────────

    /// Write one datapoint. Sends exactly the same body as
    /// [`write_datapoint_collection`](Self::write_datapoint_collection)
    /// with a one-element slice.
    pub async fn write_datapoint(
        &self,
        device_id: &str,
        value: &DatanodeWritableValue,
    ) -> Result<WriteResult, Error> {
        self.write_datapoint_collection(device_id, std::slice::from_ref(value))
            .await
    }

    pub async fn write_datapoint_collection(
        &self,
        device_id: &str,
        values: &[DatanodeWritableValue],
    ) -> Result<WriteResult, Error> {
        ensure_not_blank("device_id", device_id)?;
        if values.is_empty() {
            return Err(Error::invalid_argument(
                "values",
                "at least one datapoint is required",
            ));
        }

        let body = values
            .iter()
            .map(DatanodeWritableValue::to_wire)
            .collect::<Result<Vec<_>, _>>()?;
        self.post(&format!("process/write/{}/", escape_segment(device_id)), &body)
            .await
    }

    pub async fn read_process_data(
        &self,
        criteria: &DatanodeQueryCriteria,
    ) -> Result<ProcessValues, Error> {
        self.get(&criteria.resource()).await
    }

    pub async fn read_statistical_data(
        &self,
        criteria: &StatisticalDataQueryCriteria,
    ) -> Result<StatisticalValues, Error> {
        self.get(&criteria.resource()).await
    }

    // ── Enterprises ──────────────────────────────────────────────────

    pub async fn get_root_enterprises(
        &self,
        count: u32,
        skip: u32,
    ) -> Result<PagedResult<Enterprise>, Error> {
        self.get(&paged("enterprises/", count, skip)).await
    }

    pub async fn get_sub_enterprises(
        &self,
        enterprise_id: &str,
        count: u32,
        skip: u32,
    ) -> Result<PagedResult<Enterprise>, Error> {
        ensure_not_blank("enterprise_id", enterprise_id)?;
        let path = format!("enterprises/{}/", escape_segment(enterprise_id));
        self.get(&paged(&path, count, skip)).await
    }

    // ── Quota ────────────────────────────────────────────────────────

    pub async fn get_quota(&self) -> Result<Quota, Error> {
        self.get("quota/all/").await
    }

    pub async fn get_device_quota(&self, device_id: &str) -> Result<DeviceQuota, Error> {
        ensure_not_blank("device_id", device_id)?;
        self.get(&format!("quota/{}/", escape_segment(device_id)))
            .await
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(&self, resource: &str) -> Result<T, Error> {
        let url = self.base_url.join(resource)?;
        debug!("GET {url}");

        self.execute(self.http.get(url)).await
    }

    async fn post<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        resource: &str,
        body: &B,
    ) -> Result<T, Error> {
        let url = self.base_url.join(resource)?;
        let payload = serde_json::to_vec(body).map_err(|e| Error::Serialization {
            message: e.to_string(),
        })?;
        debug!("POST {url} ({} bytes)", payload.len());

        let request = self
            .http
            .post(url)
            .header(
                CONTENT_TYPE,
                HeaderValue::from_static("application/json; charset=utf-8"),
            )
            .body(payload);
        self.execute(request).await
    }

    // ── Response handling ────────────────────────────────────────────

    /// Send `request`, racing the whole exchange against cancellation.
    async fn execute<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, Error> {
        if self.cancel.is_cancelled() {
            debug!("request not sent: already cancelled");
            return Err(Error::Cancelled);
        }

        let exchange = async {
            let resp = request.send().await.map_err(Error::Transport)?;
            Self::handle_response(resp).await
        };

        tokio::select! {
            biased;
            () = self.cancel.cancelled() => {
                debug!("request cancelled");
                Err(Error::Cancelled)
            }
            result = exchange => result,
        }
    }

    async fn handle_response<T: DeserializeOwned>(resp: Response) -> Result<T, Error> {
        let status = resp.status();
        debug!(status = status.as_u16(), "response received");

        if !status.is_success() {
            return Err(Self::parse_error(status, resp).await);
        }

        let body = resp.text().await.map_err(Error::Transport)?;
        serde_json::from_str(&body).map_err(|e| Error::Deserialization {
            message: format!("{e}"),
            body,
        })
    }

    /// Turn a non-2xx response into [`Error::ServerCommunication`],
    /// attaching the structured payload when the body is one.
    async fn parse_error(status: StatusCode, resp: Response) -> Error {
        let body = resp.text().await.unwrap_or_default();

        let reason = status.canonical_reason().unwrap_or("Unknown status");

        match serde_json::from_str::<ErrorInfo>(&body) {
            Ok(info) => Error::ServerCommunication {
                status: status.as_u16(),
                message: if info.description.is_empty() {
                    reason.to_owned()
                } else {
                    info.description.clone()
                },
                body,
                error_info: Some(info),
            },
            Err(e) => {
                warn!(
                    status = status.as_u16(),
                    error = %e,
                    "error response body is not an ErrorInfo payload"
                );
                Error::ServerCommunication {
                    status: status.as_u16(),
                    message: reason.to_owned(),
                    body,
                    error_info: None,
                }
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn client(base: &str) -> IoTTicketClient {
        IoTTicketClient::from_reqwest(base, reqwest::Client::new()).unwrap()
    }

    #[test]
    fn base_url_gains_trailing_slash() {
        assert_eq!(
            client("https://my.iot-ticket.com/api/v1").base_url().as_str(),
            "https://my.iot-ticket.com/api/v1/"
        );
        assert_eq!(
            client("https://my.iot-ticket.com/api/v1/").base_url().as_str(),
            "https://my.iot-ticket.com/api/v1/"
        );
    }

    #[test]
    fn resources_resolve_under_the_prefix() {
        let c = client("https://my.iot-ticket.com/api/v1");
        assert_eq!(
            c.base_url().join("quota/all/").unwrap().as_str(),
            "https://my.iot-ticket.com/api/v1/quota/all/"
        );
    }

    #[test]
    fn non_base_url_is_rejected() {
        let err = IoTTicketClient::from_reqwest("mailto:ops@example.com", reqwest::Client::new())
            .unwrap_err();
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn cancellation_clone_keeps_base_url() {
        let c = client("https://my.iot-ticket.com/api/v1/");
        let token = CancellationToken::new();
        let bound = c.with_cancellation(token.clone());
        token.cancel();
        assert!(bound.cancellation_token().is_cancelled());
        assert!(!c.cancellation_token().is_cancelled());
        assert_eq!(bound.base_url(), c.base_url());
    }
}
