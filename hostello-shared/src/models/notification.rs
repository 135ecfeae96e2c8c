//! Notification records and their ids.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identifier of a backend record.
///
/// The backend emits numeric ids, but some payloads stringify them. Both
/// forms compare equal; each id is written back in the form it arrived in,
/// so `"007"` stays a string while `7` stays a number.
#[derive(Debug, Clone)]
pub struct RecordId {
    value: String,
    numeric: bool,
}

impl RecordId {
    /// Id that arrived as text.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            numeric: false,
        }
    }

    /// Textual form, used in query strings.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl PartialEq for RecordId {
    fn eq(&self, other: &Self) -> bool {
        self.value == other.value
    }
}

impl Eq for RecordId {}

impl Hash for RecordId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.value.hash(state);
    }
}

impl PartialOrd for RecordId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for RecordId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.value.cmp(&other.value)
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self {
            value: value.to_string(),
            numeric: true,
        }
    }
}

impl From<&str> for RecordId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.numeric {
            if let Ok(number) = self.value.parse::<i64>() {
                return serializer.serialize_i64(number);
            }
        }
        serializer.serialize_str(&self.value)
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Number(i64),
            Text(String),
        }

        Ok(match Raw::deserialize(deserializer)? {
            Raw::Number(number) => Self::from(number),
            Raw::Text(text) => Self::new(text),
        })
    }
}

/// A notification as delivered by the backend. Read-only to the client.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    /// Server id.
    #[serde(alias = "notificationId")]
    pub id: RecordId,
    /// Headline.
    #[serde(default = "default_title")]
    pub title: String,
    /// Body text.
    #[serde(default)]
    pub message: String,
    /// Account that sent it.
    #[serde(default)]
    pub sender_id: Option<RecordId>,
    /// Role the notification was addressed to.
    #[serde(default)]
    pub receiver_role: Option<String>,
    /// Individual recipient, when not broadcast.
    #[serde(default)]
    pub receiver_id: Option<RecordId>,
    /// Send time as emitted by the server (ISO-8601 date or date-time).
    #[serde(default, alias = "sentAt")]
    pub date: Option<String>,
    /// `NORMAL`, `HIGH` or `URGENT`.
    #[serde(default = "default_priority")]
    pub priority: String,
    /// Server-side read flag. Not trusted on its own; see the read-state overlay.
    #[serde(default, alias = "read")]
    pub is_read: bool,
}

fn default_title() -> String {
    "Notification".to_string()
}

fn default_priority() -> String {
    "NORMAL".to_string()
}

impl Notification {
    /// Calendar day the notification was sent, if the timestamp parses.
    #[must_use]
    pub fn sent_on(&self) -> Option<chrono::NaiveDate> {
        let raw = self.date.as_deref()?.trim();
        if let Ok(timestamp) = chrono::DateTime::parse_from_rfc3339(raw) {
            return Some(timestamp.date_naive());
        }
        if let Ok(timestamp) = chrono::NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f") {
            return Some(timestamp.date());
        }
        raw.get(..10)
            .and_then(|day| chrono::NaiveDate::parse_from_str(day, "%Y-%m-%d").ok())
    }

    /// `true` for the urgent/high priorities.
    #[must_use]
    pub fn is_high_priority(&self) -> bool {
        matches!(self.priority.to_lowercase().as_str(), "urgent" | "high")
    }
}

/// A notification paired with the read state the user should see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayedNotification {
    /// The server record, unchanged.
    pub record: Notification,
    /// `record.is_read` OR the id is in the local read set.
    pub read: bool,
}

impl DisplayedNotification {
    /// Id of the underlying record.
    #[must_use]
    pub fn id(&self) -> &RecordId {
        &self.record.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    #[test]
    fn accepts_both_id_spellings() {
        let by_id: Notification = serde_json::from_value(json!({ "id": 7, "message": "m" })).unwrap();
        let by_name: Notification =
            serde_json::from_value(json!({ "notificationId": "7", "message": "m" })).unwrap();
        assert_eq!(by_id.id, by_name.id);
        assert_eq!(by_id.id.as_str(), "7");
    }

    #[test]
    fn defaults_title_and_priority() {
        let notification: Notification =
            serde_json::from_value(json!({ "id": 1, "message": "Water cut at 6pm" })).unwrap();
        assert_eq!(notification.title, "Notification");
        assert_eq!(notification.priority, "NORMAL");
        assert!(!notification.is_read);
        assert!(!notification.is_high_priority());
    }

    #[test]
    fn sent_at_alias_and_date_parsing() {
        let notification: Notification = serde_json::from_value(json!({
            "id": 2,
            "sentAt": "2026-03-14T09:30:00"
        }))
        .unwrap();
        assert_eq!(notification.sent_on(), NaiveDate::from_ymd_opt(2026, 3, 14));

        let zoned: Notification = serde_json::from_value(json!({
            "id": 3,
            "date": "2026-03-15T23:10:00Z"
        }))
        .unwrap();
        assert_eq!(zoned.sent_on(), NaiveDate::from_ymd_opt(2026, 3, 15));
    }

    #[test]
    fn numeric_ids_serialize_as_numbers() {
        let ids = vec![RecordId::from(4), RecordId::new("abc")];
        assert_eq!(serde_json::to_value(&ids).unwrap(), json!([4, "abc"]));
    }

    #[test]
    fn ids_keep_the_form_they_arrived_in() {
        let ids: Vec<RecordId> = serde_json::from_value(json!([7, "007", "12"])).unwrap();
        assert_eq!(serde_json::to_value(&ids).unwrap(), json!([7, "007", "12"]));
        assert_eq!(ids[0], RecordId::from("7"));
        assert_ne!(ids[1], RecordId::from(7));
    }
}
