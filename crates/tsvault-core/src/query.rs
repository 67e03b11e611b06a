//! Query planning: parameter validation and normalization into a [`QuerySpec`].
//!
//! Validation is pure and runs before the store is touched, so every
//! rejected request is classified without any storage I/O.
//!
//! Check order:
//! 1. required parameters present (empty strings count as absent)
//! 2. field name in the closed [`Field`] set
//! 3. every supplied date bound parses
//!
//! Accepted date forms are `YYYY-MM-DD` (midnight UTC) and RFC 3339.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::{Result, TsVaultError};
use crate::model::{Field, Measurement};

/// Inclusive `[start, end]` timestamp bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// Both ends inclusive.
    #[inline]
    pub fn contains(&self, ts: DateTime<Utc>) -> bool {
        self.start <= ts && ts <= self.end
    }

    /// True when no timestamp can satisfy the bound (`start > end`).
    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }
}

/// Which endpoint a query is planned for; they differ in bound strictness.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Field projection over a range. Both bounds are required.
    Range,
    /// Summary statistics. Bounds are optional and only applied as a pair.
    Metrics,
}

/// Validated, normalized request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QuerySpec {
    pub field: Field,
    pub range: Option<TimeRange>,
}

impl QuerySpec {
    /// Filter predicate handed to scans that cannot use the sorted index.
    pub fn matches(&self, m: &Measurement) -> bool {
        self.range.map_or(true, |r| r.contains(m.timestamp))
    }
}

/// Parse a date bound as `YYYY-MM-DD` (midnight UTC) or an RFC 3339 instant.
pub fn parse_date_bound(s: &str) -> Result<DateTime<Utc>> {
    if let Ok(day) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        if let Some(midnight) = day.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| TsVaultError::InvalidDateFormat(s.to_string()))
}

fn present(v: Option<&str>) -> Option<&str> {
    v.filter(|s| !s.is_empty())
}

/// Validate raw caller parameters and build a [`QuerySpec`].
pub fn validate_and_build(
    kind: QueryKind,
    field: Option<&str>,
    start: Option<&str>,
    end: Option<&str>,
) -> Result<QuerySpec> {
    let field = present(field);
    let start = present(start);
    let end = present(end);

    if kind == QueryKind::Range {
        let missing: Vec<&str> = [("field", field), ("start_date", start), ("end_date", end)]
            .into_iter()
            .filter(|(_, v)| v.is_none())
            .map(|(name, _)| name)
            .collect();
        if !missing.is_empty() {
            return Err(TsVaultError::MissingParameter(missing.join(", ")));
        }
    }

    let field: Field = field
        .ok_or_else(|| TsVaultError::MissingParameter("field".into()))?
        .parse()?;

    // A lone bound is still format-checked, but only a complete pair filters.
    let start = start.map(parse_date_bound).transpose()?;
    let end = end.map(parse_date_bound).transpose()?;

    let range = match (start, end) {
        (Some(start), Some(end)) => Some(TimeRange::new(start, end)),
        (s, e) => {
            if s.is_some() != e.is_some() {
                tracing::debug!(%field, "single date bound supplied; ignoring range filter");
            }
            None
        }
    };

    Ok(QuerySpec { field, range })
}
