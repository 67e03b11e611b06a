//! Field projection: records -> `{timestamp, <field>: value}` pairs.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::ser::{Serialize, SerializeMap, Serializer};

use crate::model::{Field, Measurement};

/// One projected pair. Serializes with the field name as the value key,
/// e.g. `{"timestamp":"2025-01-01T00:00:00.000Z","field1":21.5}`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedPoint {
    pub timestamp: DateTime<Utc>,
    pub field: Field,
    pub value: f64,
}

impl Serialize for ProjectedPoint {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry(
            "timestamp",
            &self.timestamp.to_rfc3339_opts(SecondsFormat::Millis, true),
        )?;
        map.serialize_entry(self.field.as_str(), &self.value)?;
        map.end()
    }
}

/// Project `field` out of `records`, one pair per record, preserving order.
pub fn project<'a, I>(records: I, field: Field) -> impl Iterator<Item = ProjectedPoint> + 'a
where
    I: IntoIterator<Item = &'a Measurement>,
    I::IntoIter: 'a,
{
    records.into_iter().map(move |m| ProjectedPoint {
        timestamp: m.timestamp,
        field,
        value: field.value(m),
    })
}
