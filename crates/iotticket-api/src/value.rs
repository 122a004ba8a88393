// Scalar value codec
//
// Datapoint values travel as a `{dataType, v}` pair. The tag is one of a
// closed set of five names; binary payloads are carried as standard base64
// text. Decoding always needs the tag, which for read values comes from the
// owning datanode.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::error::Error;

/// Wire type tag of a datapoint value.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DataType {
    Double,
    Long,
    String,
    Boolean,
    Binary,
}

impl DataType {
    /// Parse a wire tag, failing with [`Error::UnsupportedDataType`] for
    /// anything outside the closed set.
    pub fn from_tag(tag: &str) -> Result<Self, Error> {
        Self::from_str(tag).map_err(|_| Error::UnsupportedDataType(tag.to_owned()))
    }
}

/// A datapoint value: one of the five scalar kinds the platform stores.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Double(f64),
    /// Every integer width is widened to 64 bits on the wire.
    Long(i64),
    String(String),
    Boolean(bool),
    Binary(Vec<u8>),
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Self::Double(_) => DataType::Double,
            Self::Long(_) => DataType::Long,
            Self::String(_) => DataType::String,
            Self::Boolean(_) => DataType::Boolean,
            Self::Binary(_) => DataType::Binary,
        }
    }

    /// Encode into the `(dataType, v)` pair sent to the server.
    ///
    /// Fails with [`Error::Serialization`] for non-finite doubles, which
    /// JSON cannot represent.
    pub fn encode(&self) -> Result<(DataType, serde_json::Value), Error> {
        let wire = match self {
            Self::Double(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .ok_or_else(|| Error::Serialization {
                    message: format!("double value {v} is not representable in JSON"),
                })?,
            Self::Long(v) => serde_json::Value::from(*v),
            Self::String(v) => serde_json::Value::String(v.clone()),
            Self::Boolean(v) => serde_json::Value::Bool(*v),
            Self::Binary(v) => serde_json::Value::String(BASE64.encode(v)),
        };
        Ok((self.data_type(), wire))
    }

    /// Decode raw wire text using its type tag.
    pub fn decode(raw: &str, tag: &str) -> Result<Self, Error> {
        Self::decode_as(raw, DataType::from_tag(tag)?)
    }

    /// Decode raw wire text as the given type.
    pub fn decode_as(raw: &str, data_type: DataType) -> Result<Self, Error> {
        let malformed = |reason: String| Error::Deserialization {
            message: format!("invalid {data_type} value: {reason}"),
            body: raw.to_owned(),
        };

        match data_type {
            DataType::Double => raw
                .trim()
                .parse::<f64>()
                .map(Self::Double)
                .map_err(|e| malformed(e.to_string())),
            DataType::Long => raw
                .trim()
                .parse::<i64>()
                .map(Self::Long)
                .map_err(|e| malformed(e.to_string())),
            DataType::String => Ok(Self::String(raw.to_owned())),
            DataType::Boolean => {
                let trimmed = raw.trim();
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(Self::Boolean(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(Self::Boolean(false))
                } else {
                    Err(malformed(format!("expected true or false, got {trimmed:?}")))
                }
            }
            DataType::Binary => BASE64
                .decode(raw.trim())
                .map(Self::Binary)
                .map_err(|e| malformed(e.to_string())),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Double(v) => write!(f, "{v}"),
            Self::Long(v) => write!(f, "{v}"),
            Self::String(v) => f.write_str(v),
            Self::Boolean(v) => write!(f, "{v}"),
            Self::Binary(v) => f.write_str(&BASE64.encode(v)),
        }
    }
}

// ── Conversions ──────────────────────────────────────────────────────

macro_rules! long_from {
    ($($t:ty),*) => {
        $(
            impl From<$t> for Value {
                fn from(v: $t) -> Self {
                    Self::Long(i64::from(v))
                }
            }
        )*
    };
}

long_from!(i8, i16, i32, i64, u8, u16, u32);

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Double(v)
    }
}

impl From<f32> for Value {
    fn from(v: f32) -> Self {
        Self::Double(f64::from(v))
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Boolean(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_owned())
    }
}

impl From<Vec<u8>> for Value {
    fn from(v: Vec<u8>) -> Self {
        Self::Binary(v)
    }
}

impl From<&[u8]> for Value {
    fn from(v: &[u8]) -> Self {
        Self::Binary(v.to_vec())
    }
}

impl TryFrom<u64> for Value {
    type Error = Error;

    /// Values above `i64::MAX` have no `long` representation.
    fn try_from(v: u64) -> Result<Self, Self::Error> {
        i64::try_from(v)
            .map(Self::Long)
            .map_err(|_| Error::UnsupportedDataType(format!("u64 value {v} exceeds i64 range")))
    }
}

impl TryFrom<serde_json::Value> for Value {
    type Error = Error;

    /// Runtime-typed input, e.g. values read from a JSON document.
    fn try_from(v: serde_json::Value) -> Result<Self, Self::Error> {
        match v {
            serde_json::Value::Bool(b) => Ok(Self::Boolean(b)),
            serde_json::Value::String(s) => Ok(Self::String(s)),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Ok(Self::Long(i))
                } else if let Some(u) = n.as_u64() {
                    Self::try_from(u)
                } else {
                    n.as_f64()
                        .map(Self::Double)
                        .ok_or_else(|| Error::UnsupportedDataType(format!("number {n}")))
                }
            }
            serde_json::Value::Null => Err(Error::UnsupportedDataType("null".into())),
            serde_json::Value::Array(_) => Err(Error::UnsupportedDataType("array".into())),
            serde_json::Value::Object(_) => Err(Error::UnsupportedDataType("object".into())),
        }
    }
}
