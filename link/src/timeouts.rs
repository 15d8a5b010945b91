//! Timeout configuration for EduLake client operations.
//!
//! Centralizes every duration knob the client uses: HTTP connection and
//! request timeouts, the polling backoff schedule, the overall polling
//! budget, and the best-effort cancellation bound.

use std::time::Duration;

/// Timeout configuration for EduLake client operations.
///
/// All values have sensible defaults; the polling schedule defaults to
/// 1s initial delay, doubling up to 15s, with a 60s overall budget.
///
/// # Examples
///
/// ```rust
/// use edulake_link::EduLinkTimeouts;
/// use std::time::Duration;
///
/// // Defaults (recommended)
/// let timeouts = EduLinkTimeouts::default();
///
/// // Patient settings for a congested workgroup
/// let timeouts = EduLinkTimeouts::builder()
///     .poll_budget(Duration::from_secs(300))
///     .max_poll_delay(Duration::from_secs(30))
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct EduLinkTimeouts {
    /// Timeout for establishing connections (TCP + TLS handshake).
    /// Default: 10 seconds
    pub connection_timeout: Duration,

    /// Timeout for a single HTTP request/response round trip.
    /// Default: 30 seconds
    pub request_timeout: Duration,

    /// Delay between the first and second status probes; later probes
    /// back off exponentially from here.
    /// Default: 1 second
    pub initial_poll_delay: Duration,

    /// Cap on the exponential backoff between status probes.
    /// Default: 15 seconds
    pub max_poll_delay: Duration,

    /// Overall budget for polling one execution to a terminal state.
    /// Exceeding it surfaces a timeout (after a best-effort cancel).
    /// Default: 60 seconds
    pub poll_budget: Duration,

    /// Bound on the best-effort remote cancel. The client never waits
    /// longer than this for cancellation confirmation.
    /// Default: 5 seconds
    pub cancel_timeout: Duration,
}

impl Default for EduLinkTimeouts {
    fn default() -> Self {
        Self {
            connection_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            initial_poll_delay: Duration::from_secs(1),
            max_poll_delay: Duration::from_secs(15),
            poll_budget: Duration::from_secs(60),
            cancel_timeout: Duration::from_secs(5),
        }
    }
}

impl EduLinkTimeouts {
    /// Create a new builder for custom timeout configuration.
    pub fn builder() -> EduLinkTimeoutsBuilder {
        EduLinkTimeoutsBuilder::new()
    }

    /// Timeouts suited to small interactive queries against a warm store.
    pub fn fast() -> Self {
        Self {
            connection_timeout: Duration::from_secs(2),
            request_timeout: Duration::from_secs(10),
            initial_poll_delay: Duration::from_millis(250),
            max_poll_delay: Duration::from_secs(2),
            poll_budget: Duration::from_secs(20),
            cancel_timeout: Duration::from_secs(2),
        }
    }

    /// Timeouts suited to heavy scans or a congested workgroup.
    pub fn relaxed() -> Self {
        Self {
            connection_timeout: Duration::from_secs(30),
            request_timeout: Duration::from_secs(120),
            initial_poll_delay: Duration::from_secs(2),
            max_poll_delay: Duration::from_secs(30),
            poll_budget: Duration::from_secs(600),
            cancel_timeout: Duration::from_secs(10),
        }
    }

    /// Millisecond-scale timeouts for tests driving a fake store.
    pub fn for_testing(poll_budget_ms: u64) -> Self {
        Self {
            connection_timeout: Duration::from_secs(1),
            request_timeout: Duration::from_secs(1),
            initial_poll_delay: Duration::from_millis(1),
            max_poll_delay: Duration::from_millis(4),
            poll_budget: Duration::from_millis(poll_budget_ms),
            cancel_timeout: Duration::from_millis(50),
        }
    }

    /// Next backoff delay: doubles the previous one, clamped to the cap.
    pub(crate) fn next_poll_delay(&self, previous: Duration) -> Duration {
        let doubled = previous.saturating_mul(2);
        doubled.min(self.max_poll_delay)
    }
}

/// Builder for [`EduLinkTimeouts`].
#[derive(Debug, Clone)]
pub struct EduLinkTimeoutsBuilder {
    timeouts: EduLinkTimeouts,
}

impl EduLinkTimeoutsBuilder {
    fn new() -> Self {
        Self {
            timeouts: EduLinkTimeouts::default(),
        }
    }

    /// Set the connection timeout (TCP + TLS handshake).
    pub fn connection_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.connection_timeout = timeout;
        self
    }

    /// Set the per-request HTTP timeout.
    pub fn request_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.request_timeout = timeout;
        self
    }

    /// Set the delay between the first and second status probes.
    pub fn initial_poll_delay(mut self, delay: Duration) -> Self {
        self.timeouts.initial_poll_delay = delay;
        self
    }

    /// Set the cap on the exponential backoff between probes.
    pub fn max_poll_delay(mut self, delay: Duration) -> Self {
        self.timeouts.max_poll_delay = delay;
        self
    }

    /// Set the overall polling budget for one execution.
    pub fn poll_budget(mut self, budget: Duration) -> Self {
        self.timeouts.poll_budget = budget;
        self
    }

    /// Set the bound on best-effort cancellation.
    pub fn cancel_timeout(mut self, timeout: Duration) -> Self {
        self.timeouts.cancel_timeout = timeout;
        self
    }

    /// Build the timeout configuration.
    pub fn build(self) -> EduLinkTimeouts {
        self.timeouts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeouts() {
        let timeouts = EduLinkTimeouts::default();
        assert_eq!(timeouts.initial_poll_delay, Duration::from_secs(1));
        assert_eq!(timeouts.max_poll_delay, Duration::from_secs(15));
        assert_eq!(timeouts.poll_budget, Duration::from_secs(60));
    }

    #[test]
    fn test_builder() {
        let timeouts = EduLinkTimeouts::builder()
            .poll_budget(Duration::from_secs(300))
            .max_poll_delay(Duration::from_secs(30))
            .build();

        assert_eq!(timeouts.poll_budget, Duration::from_secs(300));
        assert_eq!(timeouts.max_poll_delay, Duration::from_secs(30));
        // Untouched fields keep defaults
        assert_eq!(timeouts.initial_poll_delay, Duration::from_secs(1));
    }

    #[test]
    fn test_backoff_doubles_and_caps() {
        let timeouts = EduLinkTimeouts::default();
        let mut delay = timeouts.initial_poll_delay;
        delay = timeouts.next_poll_delay(delay);
        assert_eq!(delay, Duration::from_secs(2));
        delay = timeouts.next_poll_delay(delay);
        assert_eq!(delay, Duration::from_secs(4));
        for _ in 0..10 {
            delay = timeouts.next_poll_delay(delay);
        }
        assert_eq!(delay, Duration::from_secs(15));
    }

    #[test]
    fn test_for_testing_preset() {
        let timeouts = EduLinkTimeouts::for_testing(50);
        assert_eq!(timeouts.poll_budget, Duration::from_millis(50));
        assert!(timeouts.initial_poll_delay < Duration::from_millis(10));
    }
}
