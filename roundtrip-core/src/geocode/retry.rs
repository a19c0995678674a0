//! Exponential backoff for transient geocoding failures.

use std::time::Duration;

use geo::Coord;

use super::{GeoCoder, GeocodeError, GeocodeOutcome, GeocodeRequest};

/// How often and how patiently to retry transient failures.
///
/// Attempt `k` (counting the first call as attempt 1) that fails with a
/// retryable error is followed by a pause of
/// `initial_backoff * multiplier^(k - 1)`, capped at `max_backoff`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per address, including the first. Zero behaves as one.
    pub max_attempts: u32,
    /// Pause after the first failed attempt.
    pub initial_backoff: Duration,
    /// Growth factor applied to the pause after each further failure.
    pub multiplier: u32,
    /// Upper bound on any single pause.
    pub max_backoff: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_backoff: Duration::from_secs(1),
            multiplier: 2,
            max_backoff: Duration::from_secs(10),
        }
    }
}

impl RetryPolicy {
    /// Policy that never retries.
    #[must_use]
    pub const fn none() -> Self {
        Self {
            max_attempts: 1,
            initial_backoff: Duration::ZERO,
            multiplier: 1,
            max_backoff: Duration::ZERO,
        }
    }

    /// Set the total number of attempts.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Set the pause after the first failure.
    #[must_use]
    pub const fn with_initial_backoff(mut self, initial_backoff: Duration) -> Self {
        self.initial_backoff = initial_backoff;
        self
    }

    /// Pause to observe after failed attempt number `attempt` (1-based).
    ///
    /// # Examples
    /// ```
    /// use std::time::Duration;
    /// use roundtrip_core::RetryPolicy;
    ///
    /// let policy = RetryPolicy::default();
    /// assert_eq!(policy.backoff_after(1), Duration::from_secs(1));
    /// assert_eq!(policy.backoff_after(3), Duration::from_secs(4));
    /// assert_eq!(policy.backoff_after(10), Duration::from_secs(10));
    /// ```
    #[must_use]
    pub fn backoff_after(&self, attempt: u32) -> Duration {
        let factor = self
            .multiplier
            .saturating_pow(attempt.saturating_sub(1));
        self.initial_backoff
            .saturating_mul(factor)
            .min(self.max_backoff)
    }

    const fn attempts(&self) -> u32 {
        if self.max_attempts == 0 {
            1
        } else {
            self.max_attempts
        }
    }
}

/// Wraps a [`GeoCoder`] and retries transient failures.
///
/// Only errors for which [`GeocodeError::is_retryable`] holds are retried.
/// The sleep function is injectable so tests can run without waiting.
///
/// # Examples
/// ```
/// use std::time::Duration;
/// use geo::Coord;
/// use roundtrip_core::{GeoCoder, GeocodeError, RetryPolicy, RetryingGeoCoder};
///
/// struct Fixed;
///
/// impl GeoCoder for Fixed {
///     fn resolve(&self, _address: &str) -> Result<Coord<f64>, GeocodeError> {
///         Ok(Coord { x: 1.0, y: 2.0 })
///     }
/// }
///
/// let coder = RetryingGeoCoder::new(Fixed, RetryPolicy::default()).with_sleep(|_| {});
/// assert_eq!(coder.resolve("anywhere")?, Coord { x: 1.0, y: 2.0 });
/// # Ok::<(), GeocodeError>(())
/// ```
pub struct RetryingGeoCoder<G> {
    inner: G,
    policy: RetryPolicy,
    sleep: fn(Duration),
}

impl<G: std::fmt::Debug> std::fmt::Debug for RetryingGeoCoder<G> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryingGeoCoder")
            .field("inner", &self.inner)
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl<G: GeoCoder> RetryingGeoCoder<G> {
    /// Wrap `inner`, sleeping with [`std::thread::sleep`] between attempts.
    #[must_use]
    pub const fn new(inner: G, policy: RetryPolicy) -> Self {
        Self {
            inner,
            policy,
            sleep: std::thread::sleep,
        }
    }

    /// Replace the sleep function.
    #[must_use]
    pub const fn with_sleep(mut self, sleep: fn(Duration)) -> Self {
        self.sleep = sleep;
        self
    }

    /// The configured policy.
    #[must_use]
    pub const fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Borrow the wrapped coder.
    #[must_use]
    pub const fn inner(&self) -> &G {
        &self.inner
    }

    /// Keep retrying `address` while `first` is a retryable failure.
    fn retry(
        &self,
        address: &str,
        first: Result<Coord<f64>, GeocodeError>,
    ) -> Result<Coord<f64>, GeocodeError> {
        let max_attempts = self.policy.attempts();
        let mut attempt = 1;
        let mut result = first;
        loop {
            match result {
                Err(err) if err.is_retryable() && attempt < max_attempts => {
                    let delay = self.policy.backoff_after(attempt);
                    log::debug!(
                        "geocoding {address:?} failed on attempt {attempt}/{max_attempts}: {err}; retrying in {delay:?}"
                    );
                    (self.sleep)(delay);
                    attempt += 1;
                    result = self.inner.resolve(address);
                }
                other => return other,
            }
        }
    }
}

impl<G: GeoCoder> GeoCoder for RetryingGeoCoder<G> {
    fn resolve(&self, address: &str) -> Result<Coord<f64>, GeocodeError> {
        let first = self.inner.resolve(address);
        self.retry(address, first)
    }

    /// Resolve the batch through the inner coder, then retry the transient
    /// failures one by one.
    fn resolve_many(&self, requests: &[GeocodeRequest]) -> Vec<GeocodeOutcome> {
        let outcomes = self.inner.resolve_many(requests);
        outcomes
            .into_iter()
            .map(|outcome| {
                let query = requests
                    .iter()
                    .find(|request| request.id == outcome.id)
                    .map(|request| request.query.as_str());
                match query {
                    Some(address) => GeocodeOutcome {
                        result: self.retry(address, outcome.result),
                        id: outcome.id,
                    },
                    None => outcome,
                }
            })
            .collect()
    }
}
