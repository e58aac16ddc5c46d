//! `#[serde(with = "crate::serde_millis")]` for retry delays, so YAML and JSON
//! configs spell `base_delay: 100` instead of a `{secs, nanos}` struct.

use serde::{Deserialize, Deserializer, Serializer};
use std::time::Duration;

pub fn serialize<S: Serializer>(delay: &Duration, out: S) -> Result<S::Ok, S::Error> {
    // Delays beyond u64::MAX milliseconds saturate.
    let millis = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX);
    out.serialize_u64(millis)
}

pub fn deserialize<'de, D: Deserializer<'de>>(input: D) -> Result<Duration, D::Error> {
    u64::deserialize(input).map(Duration::from_millis)
}
