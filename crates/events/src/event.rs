use std::fmt;

use chrono::{DateTime, Utc};

/// Name and schema version of a persisted event, e.g. `cashbook.created@v1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EventSchema {
    pub event_type: &'static str,
    pub version: u32,
}

impl EventSchema {
    /// Whether a stored record with this type and version decodes as `self`.
    pub fn describes(&self, event_type: &str, version: u32) -> bool {
        self.event_type == event_type && self.version == version
    }
}

impl fmt::Display for EventSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@v{}", self.event_type, self.version)
    }
}

/// A fact recorded in a cashbook stream.
///
/// Once appended, an event is never rewritten; changing its shape means
/// bumping `version`.
pub trait Event: Clone + fmt::Debug + Send + Sync + 'static {
    /// Stable name, e.g. `cashbook.payment_recorded`.
    fn event_type(&self) -> &'static str;

    fn version(&self) -> u32;

    /// Business time of the fact (not the time it was stored).
    fn occurred_at(&self) -> DateTime<Utc>;

    fn schema(&self) -> EventSchema {
        EventSchema {
            event_type: self.event_type(),
            version: self.version(),
        }
    }
}
