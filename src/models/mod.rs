pub mod activity;
pub mod employee;
pub mod profile;
pub mod report;
pub mod transaction;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Reads a `deletedAt` stamp. Older snapshots kept a localized display
/// string there; anything that is not RFC 3339 reads as unknown.
pub(crate) fn lenient_timestamp<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<Value>::deserialize(deserializer)?;
    Ok(match raw {
        Some(Value::String(text)) => match DateTime::parse_from_rfc3339(&text) {
            Ok(at) => Some(at.with_timezone(&Utc)),
            Err(_) => {
                log::warn!("Unreadable deletedAt {:?} treated as unknown", text);
                None
            }
        },
        Some(Value::Null) | None => None,
        Some(other) => {
            log::warn!("Unreadable deletedAt {} treated as unknown", other);
            None
        }
    })
}
