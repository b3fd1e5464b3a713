//! # Timestamps
//!
//! Fibery entity ids are v1 UUIDs, so their creation time is embedded in the
//! id itself. This module decodes it, generates fresh ids for client-side
//! entities, and parses the ISO-8601 dates found in entity records.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Decode the creation time embedded in a v1 UUID.
///
/// Returns `None` for unparsable strings and for UUIDs of any other version.
#[must_use]
pub fn uuid_to_datetime(id: &str) -> Option<DateTime<Utc>> {
    let uuid = Uuid::parse_str(id).ok()?;
    if uuid.get_version_num() != 1 {
        return None;
    }
    let (secs, nanos) = uuid.get_timestamp()?.to_unix();
    DateTime::from_timestamp(i64::try_from(secs).ok()?, nanos)
}

/// Generate a fresh v1 UUID for an entity created on the client.
///
/// The node id is random with the multicast bit set, as RFC 4122 asks for
/// nodes that are not a real MAC address.
#[must_use]
pub fn generate_entity_id() -> String {
    let seed = Uuid::new_v4();
    let bytes = seed.as_bytes();
    let node = [bytes[0] | 0x01, bytes[1], bytes[2], bytes[3], bytes[4], bytes[5]];
    Uuid::now_v1(&node).to_string()
}

/// Parse an RFC 3339 timestamp into UTC.
#[must_use]
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_known_v1_id() {
        let date = uuid_to_datetime("750bb3e0-a851-11ea-9163-48203d178ac1").expect("v1");
        assert_eq!(date.timestamp_millis(), 1_591_487_839_774);
        assert_eq!(date.format("%Y-%m-%d").to_string(), "2020-06-06");
    }

    #[test]
    fn rejects_other_versions_and_garbage() {
        assert_eq!(uuid_to_datetime("not-a-uuid"), None);
        assert_eq!(uuid_to_datetime(&Uuid::new_v4().to_string()), None);
    }

    #[test]
    fn generated_ids_are_v1_and_recent() {
        let id = generate_entity_id();
        let parsed = Uuid::parse_str(&id).expect("valid uuid");
        assert_eq!(parsed.get_version_num(), 1);

        let created = uuid_to_datetime(&id).expect("timestamp");
        let age = Utc::now().signed_duration_since(created);
        assert!(age.num_seconds().abs() < 60);
    }

    #[test]
    fn generated_ids_are_unique() {
        assert_ne!(generate_entity_id(), generate_entity_id());
    }

    #[test]
    fn parses_rfc3339() {
        let dt = parse_timestamp("2020-06-06T23:57:19.774Z").expect("parse");
        assert_eq!(dt.timestamp(), 1_591_487_839);
        assert_eq!(parse_timestamp("yesterday"), None);
    }
}
