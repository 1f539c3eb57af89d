//! cachesched-core: cache TTLs derived from a recurring weekly freshness schedule.
//!
//! A [`Schedule`] marks parts of the week as up to date or stale. The
//! [`Scheduler`] returns the caller's TTL while content is up to date, and the
//! seconds until the next up-to-date switch-over (plus optional
//! [`ExpirationSpread`] jitter) while it is stale.

pub mod clock;
pub mod error;
pub mod point;
pub mod schedule;
pub mod scheduler;
pub mod spread;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ClockReadError, ComputationError, Error};
pub use point::SwitchOverPoint;
pub use schedule::{DesiredState, Schedule, ScheduleEntry};
pub use scheduler::{Scheduler, seconds_until};
pub use spread::ExpirationSpread;
