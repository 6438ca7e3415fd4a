//! Normalized OpenPGP timestamps.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Seconds since the Unix epoch, floored to whole seconds.
///
/// OpenPGP timestamps are 32-bit second counts, but we keep 64 bits
/// internally so that arithmetic on far-future expiration times
/// doesn't wrap; callers that need wire-format values narrow
/// explicitly.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(u64);

impl Timestamp {
    /// Returns the current time, floored to seconds.
    pub fn now() -> Self {
        Self::from_system_time(SystemTime::now())
    }

    /// Converts a `SystemTime`, flooring to seconds.
    pub fn from_system_time(t: SystemTime) -> Self {
        let secs = t.duration_since(UNIX_EPOCH).unwrap_or(Duration::ZERO).as_secs();
        Timestamp(secs)
    }

    /// Returns the number of seconds since the Unix epoch.
    pub fn as_secs(&self) -> u64 {
        self.0
    }

    /// Adds a duration, saturating rather than overflowing.
    pub fn checked_add_secs(&self, secs: u64) -> Option<Timestamp> {
        self.0.checked_add(secs).map(Timestamp)
    }

    /// `normalizeDate`: floors a system time to seconds.  There is no
    /// `None` case in the Rust rendition since `Option<Timestamp>` at
    /// the call site already expresses "no date" (`null` in the
    /// source's loosely-typed host language).
    pub fn normalize(t: SystemTime) -> Self {
        Self::from_system_time(t)
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.0)
    }
}

impl From<u64> for Timestamp {
    fn from(secs: u64) -> Self {
        Timestamp(secs)
    }
}

impl From<SystemTime> for Timestamp {
    fn from(t: SystemTime) -> Self {
        Self::from_system_time(t)
    }
}
