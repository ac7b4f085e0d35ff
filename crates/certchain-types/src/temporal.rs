use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

/// Block creation time in wall-clock milliseconds since the UNIX epoch.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Timestamp(u64);

impl Timestamp {
    pub const fn from_millis(millis: u64) -> Self {
        Self(millis)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        let millis = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;
        Self(millis)
    }

    /// Current time, clamped so it is never earlier than `previous`.
    ///
    /// Keeps block timestamps non-decreasing along a chain even if the
    /// wall clock steps backwards between two seals.
    pub fn now_after(previous: Self) -> Self {
        Self::now().max(previous)
    }

    pub const fn as_millis(&self) -> u64 {
        self.0
    }

    /// Whole seconds since the epoch.
    pub const fn as_secs(&self) -> u64 {
        self.0 / 1000
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({}ms)", self.0)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.0 / 1000, self.0 % 1000)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_produces_reasonable_timestamp() {
        // Should be after 2020-01-01 (1577836800000 ms)
        assert!(Timestamp::now().as_millis() > 1_577_836_800_000);
    }

    #[test]
    fn now_after_never_goes_backwards() {
        let future = Timestamp::from_millis(u64::MAX / 2);
        assert_eq!(Timestamp::now_after(future), future);

        let past = Timestamp::from_millis(1);
        assert!(Timestamp::now_after(past) > past);
    }

    #[test]
    fn display_format() {
        assert_eq!(Timestamp::from_millis(1_700_000_000_042).to_string(), "1700000000.042");
        assert_eq!(Timestamp::from_millis(5_000).as_secs(), 5);
    }

    #[test]
    fn serializes_as_plain_number() {
        let ts = Timestamp::from_millis(1234);
        assert_eq!(serde_json::to_string(&ts).unwrap(), "1234");
        let parsed: Timestamp = serde_json::from_str("1234").unwrap();
        assert_eq!(parsed, ts);
    }
}
