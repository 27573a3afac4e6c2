use crate::error::{CoreError, Result};
use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

/// How long a record stays resident after it is created.
pub const TTL: SignedDuration = SignedDuration::from_mins(30);

/// Opaque identifier of a tracked record, backed by a random v4 UUID.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Generates a fresh random id.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl From<Uuid> for RecordId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Debug for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("RecordId").field(&self.0.hyphenated()).finish()
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

/// One shortened link being tracked until it expires.
///
/// Everything except the click counter is fixed at creation. Instants are
/// kept at millisecond precision so they survive the durable encoding
/// unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "StoredRecord", into = "StoredRecord")]
pub struct Record {
    id: RecordId,
    original_url: String,
    short_url: String,
    click_count: u64,
    created_at: Timestamp,
    expires_at: Timestamp,
}

impl Record {
    /// Creates a record that expires [`TTL`] after `now`.
    pub fn new(
        original_url: impl Into<String>,
        short_url: impl Into<String>,
        now: Timestamp,
    ) -> Result<Self> {
        Self::with_ttl(original_url, short_url, now, TTL)
    }

    /// Creates a record with a custom lifetime. The lifetime must be at
    /// least one millisecond.
    pub fn with_ttl(
        original_url: impl Into<String>,
        short_url: impl Into<String>,
        now: Timestamp,
        ttl: SignedDuration,
    ) -> Result<Self> {
        if ttl < SignedDuration::from_millis(1) {
            return Err(CoreError::InvalidTtl(format!(
                "ttl must be at least 1ms, got {ttl:?}"
            )));
        }

        let created_at = truncate_to_millis(now)?;
        let expires_at = created_at
            .checked_add(ttl)
            .map_err(|e| CoreError::InvalidTtl(e.to_string()))?;

        Ok(Self {
            id: RecordId::random(),
            original_url: original_url.into(),
            short_url: short_url.into(),
            click_count: 0,
            created_at,
            expires_at,
        })
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn original_url(&self) -> &str {
        &self.original_url
    }

    pub fn short_url(&self) -> &str {
        &self.short_url
    }

    pub fn click_count(&self) -> u64 {
        self.click_count
    }

    pub fn created_at(&self) -> Timestamp {
        self.created_at
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    /// A record is stale from its expiry instant onwards.
    pub fn is_expired_at(&self, now: Timestamp) -> bool {
        now >= self.expires_at
    }

    pub(crate) fn increment_clicks(&mut self) -> u64 {
        self.click_count = self.click_count.saturating_add(1);
        self.click_count
    }
}

fn truncate_to_millis(ts: Timestamp) -> Result<Timestamp> {
    Timestamp::from_millisecond(ts.as_millisecond())
        .map_err(|e| CoreError::InvalidTtl(format!("unrepresentable instant: {e}")))
}

/// Durable shape of a record: camelCase keys, instants as epoch milliseconds.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredRecord {
    id: RecordId,
    #[serde(rename = "original")]
    original_url: String,
    #[serde(rename = "short")]
    short_url: String,
    #[serde(rename = "clicks")]
    click_count: u64,
    created_at: i64,
    expires_at: i64,
}

impl From<Record> for StoredRecord {
    fn from(value: Record) -> Self {
        Self {
            id: value.id,
            original_url: value.original_url,
            short_url: value.short_url,
            click_count: value.click_count,
            created_at: value.created_at.as_millisecond(),
            expires_at: value.expires_at.as_millisecond(),
        }
    }
}

impl TryFrom<StoredRecord> for Record {
    type Error = String;

    fn try_from(value: StoredRecord) -> std::result::Result<Self, Self::Error> {
        let created_at = Timestamp::from_millisecond(value.created_at)
            .map_err(|e| format!("invalid createdAt {}: {e}", value.created_at))?;
        let expires_at = Timestamp::from_millisecond(value.expires_at)
            .map_err(|e| format!("invalid expiresAt {}: {e}", value.expires_at))?;
        if expires_at <= created_at {
            return Err(format!(
                "record {} expires at {expires_at} which is not after {created_at}",
                value.id
            ));
        }

        Ok(Self {
            id: value.id,
            original_url: value.original_url,
            short_url: value.short_url,
            click_count: value.click_count,
            created_at,
            expires_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(ms: i64) -> Timestamp {
        Timestamp::from_millisecond(ms).unwrap()
    }

    #[test]
    fn new_record_expires_after_thirty_minutes() {
        let record = Record::new("https://example.com/long", "https://tiny.cc/x", at(1_000)).unwrap();

        assert_eq!(record.click_count(), 0);
        assert_eq!(record.created_at(), at(1_000));
        assert_eq!(record.expires_at(), at(1_000 + 1_800_000));
        assert!(record.expires_at() > record.created_at());
    }

    #[test]
    fn ids_are_not_reused() {
        let a = Record::new("https://a.com", "https://t/a", at(0)).unwrap();
        let b = Record::new("https://a.com", "https://t/a", at(0)).unwrap();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn sub_millisecond_precision_is_dropped() {
        let now = Timestamp::new(1_700_000_000, 123_456_789).unwrap();
        let record = Record::new("https://a.com", "https://t/a", now).unwrap();
        assert_eq!(record.created_at().as_millisecond(), 1_700_000_000_123);
        assert_eq!(record.created_at().subsec_nanosecond(), 123_000_000);
    }

    #[test]
    fn zero_ttl_is_rejected() {
        let err = Record::with_ttl("https://a.com", "https://t/a", at(0), SignedDuration::ZERO)
            .unwrap_err();
        assert!(matches!(err, CoreError::InvalidTtl(_)));
    }

    #[test]
    fn expiry_is_inclusive() {
        let record =
            Record::with_ttl("https://a.com", "https://t/a", at(0), SignedDuration::from_secs(1))
                .unwrap();
        assert!(!record.is_expired_at(at(999)));
        assert!(record.is_expired_at(at(1_000)));
    }

    #[test]
    fn stored_form_uses_camel_case_and_millis() {
        let record = Record::new("https://example.com", "https://t/x", at(5)).unwrap();
        let json = serde_json::to_value(&record).unwrap();

        assert_eq!(json["id"], record.id().to_string());
        assert_eq!(json["original"], "https://example.com");
        assert_eq!(json["short"], "https://t/x");
        assert_eq!(json["clicks"], 0);
        assert_eq!(json["createdAt"], 5);
        assert_eq!(json["expiresAt"], 1_800_005);
    }

    #[test]
    fn stored_form_rejects_inverted_instants() {
        let json = r#"{
            "id": "8f7c3d4e-0a1b-4c2d-9e3f-5a6b7c8d9e0f",
            "original": "https://example.com",
            "short": "https://t/x",
            "clicks": 3,
            "createdAt": 2000,
            "expiresAt": 1000
        }"#;
        assert!(serde_json::from_str::<Record>(json).is_err());
    }

    #[test]
    fn record_id_parses_its_display_form() {
        let id = RecordId::random();
        let parsed: RecordId = id.to_string().parse().unwrap();
        assert_eq!(id, parsed);
        assert!("not-a-uuid".parse::<RecordId>().is_err());
    }
}
