//! Shared helpers for command handlers.

use chrono::{DateTime, NaiveDate, Utc};

use iotticket_api::{DataType, SortOrder, Value};

use crate::cli::{GroupingArg, Order, ValueType};
use crate::error::CliError;

/// Parse a user-supplied instant: RFC 3339, a bare `YYYY-MM-DD` (midnight
/// UTC) or epoch milliseconds.
pub fn parse_instant(field: &str, raw: &str) -> Result<DateTime<Utc>, CliError> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Ok(dt.with_timezone(&Utc));
    }
    if let Some(midnight) = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }
    if let Ok(millis) = raw.parse::<i64>() {
        return iotticket_api::time::from_epoch_millis(millis).map_err(CliError::from);
    }
    Err(CliError::Validation {
        field: field.into(),
        reason: format!("expected RFC 3339, YYYY-MM-DD or epoch millis, got {raw:?}"),
    })
}

/// Interpret `--value` according to `--type`.
///
/// `auto` tries integer, then float, then boolean, and falls back to text.
pub fn parse_value(raw: &str, value_type: ValueType) -> Result<Value, CliError> {
    let data_type = match value_type {
        ValueType::Auto => return Ok(guess_value(raw)),
        ValueType::Double => DataType::Double,
        ValueType::Long => DataType::Long,
        ValueType::String => DataType::String,
        ValueType::Boolean => DataType::Boolean,
        ValueType::Binary => DataType::Binary,
    };
    Value::decode_as(raw, data_type).map_err(|e| CliError::Validation {
        field: "value".into(),
        reason: e.to_string(),
    })
}

fn guess_value(raw: &str) -> Value {
    let trimmed = raw.trim();
    if let Ok(v) = trimmed.parse::<i64>() {
        return Value::Long(v);
    }
    if let Some(v) = trimmed.parse::<f64>().ok().filter(|v| v.is_finite()) {
        return Value::Double(v);
    }
    if let Ok(v) = Value::decode_as(trimmed, DataType::Boolean) {
        return v;
    }
    Value::String(raw.to_owned())
}

pub fn sort_order(order: Option<Order>) -> SortOrder {
    match order {
        None => SortOrder::Unset,
        Some(Order::Ascending) => SortOrder::Ascending,
        Some(Order::Descending) => SortOrder::Descending,
    }
}

pub fn grouping(arg: GroupingArg) -> iotticket_api::Grouping {
    use iotticket_api::Grouping;

    match arg {
        GroupingArg::Minute => Grouping::Minute,
        GroupingArg::Hour => Grouping::Hour,
        GroupingArg::Day => Grouping::Day,
        GroupingArg::Week => Grouping::Week,
        GroupingArg::Month => Grouping::Month,
        GroupingArg::Year => Grouping::Year,
    }
}

/// Split a `KEY=VALUE` pair.
pub fn parse_key_value(raw: &str) -> Result<(String, String), CliError> {
    raw.split_once('=')
        .filter(|(key, _)| !key.trim().is_empty())
        .map(|(key, value)| (key.trim().to_owned(), value.to_owned()))
        .ok_or_else(|| CliError::Validation {
            field: "attr".into(),
            reason: format!("expected KEY=VALUE, got {raw:?}"),
        })
}

/// Render epoch millis for table cells.
pub fn format_millis(millis: i64) -> String {
    iotticket_api::time::from_epoch_millis(millis)
        .map_or_else(|_| millis.to_string(), |dt| dt.to_rfc3339())
}
