use chrono::{DateTime, Duration, Utc};

/// Default trailing window: the last 24 hours.
pub const DEFAULT_WINDOW_SECS: i64 = 24 * 60 * 60;

/// Default cap on the number of records a single query returns.
pub const DEFAULT_QUERY_LIMIT: usize = 1000;

/// A trailing time range `[now - duration, now]` plus an optional result cap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueryWindow {
    pub duration: Duration,
    /// Maximum number of records returned, oldest first. `None` = no cap.
    pub limit: Option<usize>,
}

impl QueryWindow {
    pub fn new(duration: Duration) -> Self {
        Self { duration, limit: Some(DEFAULT_QUERY_LIMIT) }
    }

    pub fn unbounded(duration: Duration) -> Self {
        Self { duration, limit: None }
    }

    pub fn last_hours(hours: i64) -> Self {
        Self::new(Duration::hours(hours))
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Inclusive lower bound of the window as seen from `now`. A window
    /// reaching past the earliest representable instant covers all history.
    pub fn lower_bound(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        now.checked_sub_signed(self.duration)
            .unwrap_or(DateTime::<Utc>::MIN_UTC)
    }
}

/// Longest window that still maps onto representable timestamps.
pub fn max_window() -> Duration {
    DateTime::<Utc>::MAX_UTC.signed_duration_since(DateTime::<Utc>::MIN_UTC)
}

impl Default for QueryWindow {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_WINDOW_SECS))
    }
}

/// Parse a compact duration such as `90s`, `30m`, `3h`, `2d` or a bare
/// number of seconds.
pub fn parse_window(input: &str) -> Option<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }
    let (digits, unit) = match input.find(|c: char| !c.is_ascii_digit()) {
        Some(idx) => input.split_at(idx),
        None => (input, "s"),
    };
    let value: i64 = digits.parse().ok()?;
    let secs = match unit {
        "s" => value,
        "m" => value.checked_mul(60)?,
        "h" => value.checked_mul(60 * 60)?,
        "d" => value.checked_mul(24 * 60 * 60)?,
        _ => return None,
    };
    if secs <= 0 {
        return None;
    }
    Duration::try_seconds(secs).filter(|d| *d <= max_window())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_last_day_with_cap() {
        let window = QueryWindow::default();
        assert_eq!(window.duration, Duration::hours(24));
        assert_eq!(window.limit, Some(DEFAULT_QUERY_LIMIT));
    }

    #[test]
    fn test_lower_bound() {
        let now = Utc::now();
        let window = QueryWindow::last_hours(3);
        assert_eq!(window.lower_bound(now), now - Duration::hours(3));
    }

    #[test]
    fn test_oversized_window_covers_all_history() {
        let now = Utc::now();
        let window = QueryWindow::new(Duration::MAX);
        assert_eq!(window.lower_bound(now), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_parse_window_units() {
        assert_eq!(parse_window("90s"), Some(Duration::seconds(90)));
        assert_eq!(parse_window("30m"), Some(Duration::minutes(30)));
        assert_eq!(parse_window("3h"), Some(Duration::hours(3)));
        assert_eq!(parse_window("2d"), Some(Duration::days(2)));
        assert_eq!(parse_window("120"), Some(Duration::seconds(120)));
    }

    #[test]
    fn test_parse_window_rejects_garbage() {
        assert_eq!(parse_window(""), None);
        assert_eq!(parse_window("h"), None);
        assert_eq!(parse_window("0m"), None);
        assert_eq!(parse_window("5w"), None);
        assert_eq!(parse_window("-3h"), None);
    }

    #[test]
    fn test_parse_window_rejects_unrepresentable_spans() {
        assert_eq!(parse_window("9999999999d"), None);
        assert_eq!(parse_window("9223372036854775807"), None);
        assert!(parse_window("36500d").is_some());
    }
}
