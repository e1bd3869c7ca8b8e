use chrono::{DateTime, Utc};
use rand::Rng;
use std::time::Duration;

/// Random jitter drawn uniformly from [0, 1) seconds.
pub fn jitter() -> Duration {
    let secs = rand::thread_rng().gen_range(0.0..1.0);
    Duration::from_secs_f64(secs)
}

/// Parse a `Retry-After` header value.
///
/// Accepts delta-seconds (`"120"`) or an HTTP-date
/// (`"Wed, 21 Oct 2015 07:28:00 GMT"`), resolved against `now`. Dates in the
/// past resolve to zero.
pub fn parse_retry_after(value: &str, now: DateTime<Utc>) -> Option<Duration> {
    let value = value.trim();
    if let Ok(secs) = value.parse::<u64>() {
        return Some(Duration::from_secs(secs));
    }

    let date = DateTime::parse_from_rfc2822(value).ok()?;
    let wait = date.with_timezone(&Utc) - now;
    Some(wait.to_std().unwrap_or(Duration::ZERO))
}

/// Sleep on the current task.
pub async fn wait(duration: Duration) {
    if !duration.is_zero() {
        tokio::time::sleep(duration).await;
    }
}
