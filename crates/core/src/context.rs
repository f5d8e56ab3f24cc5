//! Explicit request context threaded into every core call.
//!
//! The surrounding application knows who is acting, in which warehouse, and
//! what time it is. None of that is read from process-wide state here; it is
//! captured once per request in a [`RequestContext`].

use chrono::{DateTime, NaiveDate, Utc};
use weft_shared::types::{UserId, WarehouseId};

/// Source of the current time.
pub trait Clock: Send + Sync {
    /// Returns the current instant in UTC.
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A clock frozen at one instant, for tests and replays.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Who is acting, where, and when.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestContext {
    /// The user performing the operation; recorded as creator on new records.
    pub user_id: UserId,
    /// The warehouse the user is working in.
    pub warehouse_id: WarehouseId,
    /// The instant the request is evaluated at.
    pub now: DateTime<Utc>,
}

impl RequestContext {
    /// Captures a context, reading the time from `clock` exactly once.
    pub fn new(user_id: UserId, warehouse_id: WarehouseId, clock: &impl Clock) -> Self {
        Self {
            user_id,
            warehouse_id,
            now: clock.now(),
        }
    }

    /// The current calendar date in UTC.
    #[must_use]
    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }
}
