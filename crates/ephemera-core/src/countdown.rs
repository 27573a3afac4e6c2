use jiff::{SignedDuration, Timestamp};
use std::fmt::Display;

/// Derived display state for one record's remaining lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownState {
    /// Time is left; `remaining` is always positive.
    Counting { remaining: SignedDuration },
    /// Terminal. Once reached, the countdown never goes back to counting.
    Expired,
}

impl Display for CountdownState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CountdownState::Counting { remaining } => {
                let millis = remaining.as_millis();
                let minutes = millis / 60_000;
                let seconds = (millis % 60_000) / 1_000;
                write!(f, "Expires in: {minutes}m {seconds:02}s")
            }
            CountdownState::Expired => f.write_str("Expired"),
        }
    }
}

/// A read-only countdown towards an expiry instant.
///
/// The countdown never touches the record it describes; eviction is the
/// sweeper's job, so a record can read "Expired" while still resident.
#[derive(Debug, Clone)]
pub struct Countdown {
    expires_at: Timestamp,
    state: CountdownState,
}

impl Countdown {
    /// Creates a countdown and evaluates it once at `now`.
    pub fn new(expires_at: Timestamp, now: Timestamp) -> Self {
        let mut countdown = Self {
            expires_at,
            state: CountdownState::Expired,
        };
        countdown.state = countdown.evaluate(now);
        countdown
    }

    /// Recomputes the state at `now` and returns it.
    pub fn observe(&mut self, now: Timestamp) -> CountdownState {
        if !self.is_expired() {
            self.state = self.evaluate(now);
        }
        self.state
    }

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn is_expired(&self) -> bool {
        self.state == CountdownState::Expired
    }

    pub fn expires_at(&self) -> Timestamp {
        self.expires_at
    }

    fn evaluate(&self, now: Timestamp) -> CountdownState {
        let remaining = self.expires_at.duration_since(now);
        if remaining <= SignedDuration::ZERO {
            CountdownState::Expired
        } else {
            CountdownState::Counting { remaining }
        }
    }
}

impl Display for Countdown {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.state.fmt(f)
    }
}
