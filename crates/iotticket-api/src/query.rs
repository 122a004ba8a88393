// Query construction
//
// Read endpoints take their filters as query parameters appended to a
// resource path. Parameter order is fixed; optional parameters are simply
// left out. Datanode paths are percent-encoded individually and then joined
// with a literal `,` so the server sees one comma-separated value.

use std::fmt::Write as _;

use chrono::{DateTime, TimeZone, Utc};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use strum::{AsRefStr, Display, EnumString};

use crate::error::Error;
use crate::time::to_epoch_millis;

/// Result ordering for reads. `Unset` leaves the choice to the server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Unset,
    Ascending,
    Descending,
}

/// Bucket width for statistical reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum Grouping {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Year,
}

// ── Process data ─────────────────────────────────────────────────────

/// Filter for `process/read/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatanodeQueryCriteria {
    device_id: String,
    datanodes: Vec<String>,
    pub count: Option<u32>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub sort_order: SortOrder,
}

impl DatanodeQueryCriteria {
    /// Fails with [`Error::InvalidArgument`] if `device_id` is blank or no
    /// datanode path is given.
    pub fn new<I, S>(device_id: impl Into<String>, datanodes: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let device_id = device_id.into();
        ensure_not_blank("device_id", &device_id)?;
        let datanodes = collect_datanodes(datanodes)?;

        Ok(Self {
            device_id,
            datanodes,
            count: None,
            start_date: None,
            end_date: None,
            sort_order: SortOrder::Unset,
        })
    }

    pub fn with_count(mut self, count: u32) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_start_date<Tz: TimeZone>(mut self, start: DateTime<Tz>) -> Self {
        self.start_date = Some(start.with_timezone(&Utc));
        self
    }

    pub fn with_end_date<Tz: TimeZone>(mut self, end: DateTime<Tz>) -> Self {
        self.end_date = Some(end.with_timezone(&Utc));
        self
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn datanodes(&self) -> &[String] {
        &self.datanodes
    }

    /// `?datanodes=..[&order=..][&fromdate=..][&todate=..][&limit=..]`
    pub fn query_string(&self) -> String {
        let mut query = format!("?datanodes={}", join_escaped(&self.datanodes));
        if self.sort_order != SortOrder::Unset {
            let _ = write!(query, "&order={}", self.sort_order);
        }
        if let Some(start) = &self.start_date {
            let _ = write!(query, "&fromdate={}", to_epoch_millis(start));
        }
        if let Some(end) = &self.end_date {
            let _ = write!(query, "&todate={}", to_epoch_millis(end));
        }
        if let Some(count) = self.count {
            let _ = write!(query, "&limit={count}");
        }
        query
    }

    /// Path and query relative to the API base URL.
    pub(crate) fn resource(&self) -> String {
        format!(
            "process/read/{}/{}",
            escape_segment(&self.device_id),
            self.query_string()
        )
    }
}

// ── Statistical data ─────────────────────────────────────────────────

/// Filter for `stat/read/`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticalDataQueryCriteria {
    device_id: String,
    grouping: Grouping,
    start_date: DateTime<Utc>,
    end_date: DateTime<Utc>,
    datanodes: Vec<String>,
    pub sort_order: SortOrder,
    pub vtags: Vec<String>,
}

impl StatisticalDataQueryCriteria {
    /// Fails with [`Error::InvalidArgument`] if `device_id` is blank, no
    /// datanode path is given, or `start` is not strictly before `end`.
    pub fn new<Tz1, Tz2, I, S>(
        device_id: impl Into<String>,
        grouping: Grouping,
        start: DateTime<Tz1>,
        end: DateTime<Tz2>,
        datanodes: I,
    ) -> Result<Self, Error>
    where
        Tz1: TimeZone,
        Tz2: TimeZone,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let device_id = device_id.into();
        ensure_not_blank("device_id", &device_id)?;
        let datanodes = collect_datanodes(datanodes)?;

        let start_date = start.with_timezone(&Utc);
        let end_date = end.with_timezone(&Utc);
        if start_date >= end_date {
            return Err(Error::invalid_argument(
                "start_date",
                format!("{start_date} is not before end date {end_date}"),
            ));
        }

        Ok(Self {
            device_id,
            grouping,
            start_date,
            end_date,
            datanodes,
            sort_order: SortOrder::Unset,
            vtags: Vec::new(),
        })
    }

    pub fn with_sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    pub fn with_vtags<I, S>(mut self, vtags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.vtags.extend(vtags.into_iter().map(Into::into));
        self
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    pub fn grouping(&self) -> Grouping {
        self.grouping
    }

    pub fn start_date(&self) -> DateTime<Utc> {
        self.start_date
    }

    pub fn end_date(&self) -> DateTime<Utc> {
        self.end_date
    }

    pub fn datanodes(&self) -> &[String] {
        &self.datanodes
    }

    /// `?datanodes=..&fromdate=..&todate=..&grouping=..[&order=..][&vtags=..]`
    pub fn query_string(&self) -> String {
        let mut query = format!(
            "?datanodes={}&fromdate={}&todate={}&grouping={}",
            join_escaped(&self.datanodes),
            to_epoch_millis(&self.start_date),
            to_epoch_millis(&self.end_date),
            self.grouping,
        );
        if self.sort_order != SortOrder::Unset {
            let _ = write!(query, "&order={}", self.sort_order);
        }
        if !self.vtags.is_empty() {
            let _ = write!(query, "&vtags={}", join_escaped(&self.vtags));
        }
        query
    }

    pub(crate) fn resource(&self) -> String {
        format!(
            "stat/read/{}/{}",
            escape_segment(&self.device_id),
            self.query_string()
        )
    }
}

// ── Helpers ──────────────────────────────────────────────────────────

/// `{path}?limit={count}&offset={skip}`; both parameters are always sent.
pub(crate) fn paged(path: &str, count: u32, skip: u32) -> String {
    format!("{path}?limit={count}&offset={skip}")
}

pub(crate) fn ensure_not_blank(argument: &'static str, value: &str) -> Result<(), Error> {
    if value.trim().is_empty() {
        return Err(Error::invalid_argument(argument, "must not be blank"));
    }
    Ok(())
}

fn collect_datanodes<I, S>(datanodes: I) -> Result<Vec<String>, Error>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let datanodes: Vec<String> = datanodes.into_iter().map(Into::into).collect();
    if datanodes.is_empty() {
        return Err(Error::invalid_argument(
            "datanodes",
            "at least one datanode path is required",
        ));
    }
    Ok(datanodes)
}

fn join_escaped(items: &[String]) -> String {
    items
        .iter()
        .map(|item| utf8_percent_encode(item, DATANODE_PATH).to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Everything outside the RFC 3986 unreserved set.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Datanode paths are slash-separated, so `/` stays literal.
const DATANODE_PATH: &AsciiSet = &SEGMENT.remove(b'/');

/// Escape a single path segment; `/` is encoded too.
pub(crate) fn escape_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}
