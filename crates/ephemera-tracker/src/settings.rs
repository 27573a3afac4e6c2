use crate::error::{Result, SessionError};
use jiff::SignedDuration;
use std::time::Duration;
use typed_builder::TypedBuilder;

/// Tunables of a [`Session`](crate::Session).
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct SessionSettings {
    /// How often the expiry sweeper runs.
    #[builder(default = Duration::from_secs(5))]
    pub sweep_interval: Duration,
    /// How often a countdown recomputes its text.
    #[builder(default = Duration::from_secs(1))]
    pub countdown_interval: Duration,
    /// Deadline for one gateway call; exceeding it is a network error.
    #[builder(default = Duration::from_secs(10))]
    pub gateway_timeout: Duration,
    /// Lifetime given to new records.
    #[builder(default = ephemera_core::TTL)]
    pub ttl: SignedDuration,
}

impl SessionSettings {
    /// Checks that every period is non-zero and that new records live for at
    /// least one millisecond.
    pub fn validate(&self) -> Result<()> {
        let periods = [
            ("sweep_interval", self.sweep_interval),
            ("countdown_interval", self.countdown_interval),
            ("gateway_timeout", self.gateway_timeout),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, period)| period.is_zero()) {
            return Err(SessionError::InvalidSettings(format!("{name} must be non-zero")));
        }
        if self.ttl < SignedDuration::from_millis(1) {
            return Err(SessionError::InvalidSettings(format!(
                "ttl must be at least 1ms, got {:?}",
                self.ttl
            )));
        }
        Ok(())
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::builder().build()
    }
}
