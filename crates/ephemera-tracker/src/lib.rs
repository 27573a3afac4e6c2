//! Session layer of the Ephemera link tracker.
//!
//! A [`Session`] owns the record store for the lifetime of one run: it loads
//! and sweeps the persisted records on [`Session::init`], persists after every
//! mutation, runs the [`ExpirySweeper`] in the background and hands out
//! [`CountdownHandle`]s for display. [`Session::teardown`] stops all of it.

pub mod countdown;
pub mod error;
pub mod session;
pub mod settings;
pub mod sweeper;

pub use countdown::{CountdownHandle, CountdownSource, CountdownTicker};
pub use error::{Result, SessionError};
pub use session::Session;
pub use settings::SessionSettings;
pub use sweeper::{ExpirySweeper, Sweep, SweeperHandle};
