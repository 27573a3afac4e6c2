//! Core types for the Ephemera link tracker.
//!
//! This crate holds the record model, the in-memory record store with TTL
//! eviction, the countdown state machine and the URL boundary check. It has
//! no I/O; persistence and the shortening gateway live in sibling crates.

pub mod clock;
pub mod countdown;
pub mod error;
pub mod record;
pub mod store;
pub mod target;

pub use clock::{Clock, ManualClock, SystemClock};
pub use countdown::{Countdown, CountdownState};
pub use error::{CoreError, Result};
pub use record::{Record, RecordId, TTL};
pub use store::RecordStore;
pub use target::validate_target;
