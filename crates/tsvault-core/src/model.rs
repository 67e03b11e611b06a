//! Measurement record and the closed set of queryable fields.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Result, TsVaultError};

/// One timestamped record with three independent numeric observations.
///
/// All four attributes are required; bulk-load input with a missing or
/// unknown attribute is rejected at deserialization.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Measurement {
    pub timestamp: DateTime<Utc>,
    pub field1: f64,
    pub field2: f64,
    pub field3: f64,
}

impl Measurement {
    pub fn new(timestamp: DateTime<Utc>, field1: f64, field2: f64, field3: f64) -> Self {
        Self {
            timestamp,
            field1,
            field2,
            field3,
        }
    }
}

/// Queryable measurement field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Field1,
    Field2,
    Field3,
}

impl Field {
    pub const ALL: [Field; 3] = [Field::Field1, Field::Field2, Field::Field3];

    /// Wire name (`field1`, `field2`, `field3`).
    pub fn as_str(self) -> &'static str {
        match self {
            Field::Field1 => "field1",
            Field::Field2 => "field2",
            Field::Field3 => "field3",
        }
    }

    /// Read this field from a record.
    #[inline]
    pub fn value(self, m: &Measurement) -> f64 {
        match self {
            Field::Field1 => m.field1,
            Field::Field2 => m.field2,
            Field::Field3 => m.field3,
        }
    }
}

impl FromStr for Field {
    type Err = TsVaultError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "field1" => Ok(Field::Field1),
            "field2" => Ok(Field::Field2),
            "field3" => Ok(Field::Field3),
            other => Err(TsVaultError::InvalidField(other.to_string())),
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
