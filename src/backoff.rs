use std::time::Duration;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Retry delays starting at `retry_delay`, doubling on every attempt up to `max_delay`, with full jitter.
pub(crate) fn exponential_backoff(retry_delay: Duration, max_delay: Duration) -> impl Iterator<Item = Duration> {
    doubling(retry_delay, max_delay).map(jitter)
}

fn doubling(retry_delay: Duration, max_delay: Duration) -> impl Iterator<Item = Duration> {
    // Steps are 2, 4, 8... ms and saturate, halved they are the multiplier of the configured delay
    ExponentialBackoff::from_millis(2).map(move |step| {
        let multiplier = u32::try_from(step.as_millis() / 2).unwrap_or(u32::MAX);
        retry_delay.saturating_mul(multiplier).min(max_delay)
    })
}
