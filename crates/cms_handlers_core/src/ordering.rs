use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::contract::Record;

/// Newest-first ordering over content records.
///
/// A record sorts by `primary_field`, falling back to `secondary_field` when
/// the primary is absent or unparseable. A record holding neither sorts as
/// the minimal element (the Unix epoch). That last rule preserves the
/// long-standing "invalid date sorts oldest" behavior of the handlers this
/// replaces; it is a documented default, not a confirmed product decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentOrdering {
    pub primary_field: String,
    pub secondary_field: String,
}

impl ContentOrdering {
    pub fn new(primary_field: impl Into<String>, secondary_field: impl Into<String>) -> Self {
        Self {
            primary_field: primary_field.into(),
            secondary_field: secondary_field.into(),
        }
    }

    /// The instant this record sorts by. Missing or unparseable timestamps
    /// collapse to the epoch.
    pub fn sort_instant(&self, record: &Record) -> DateTime<Utc> {
        parse_timestamp_field(record, &self.primary_field)
            .or_else(|| parse_timestamp_field(record, &self.secondary_field))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    pub fn compare(&self, left: &Record, right: &Record) -> Ordering {
        self.sort_instant(right).cmp(&self.sort_instant(left))
    }

    /// Applies the total order once, over the fully accumulated sequence.
    /// Stable, so records with equal instants keep their arrival order.
    pub fn sort_newest_first(&self, records: &mut [Record]) {
        records.sort_by(|left, right| self.compare(left, right));
    }
}

fn parse_timestamp_field(record: &Record, field: &str) -> Option<DateTime<Utc>> {
    let raw = record.get(field)?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|parsed| parsed.with_timezone(&Utc))
}
