//! Uptime phrasing

const SECS_PER_MINUTE: u64 = 60;
const SECS_PER_HOUR: u64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: u64 = 24 * SECS_PER_HOUR;

/// Render an elapsed duration as a phrase like `1 day, 2 hours, and 5 seconds`.
///
/// Fractional seconds are truncated and zero-valued units are left out. A
/// zero duration reads `0 seconds`.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.trunc() as u64
    } else {
        0
    };

    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let secs = total % SECS_PER_MINUTE;

    let parts: Vec<String> = [(days, "day"), (hours, "hour"), (minutes, "minute"), (secs, "second")]
        .into_iter()
        .filter(|(value, _)| *value > 0)
        .map(|(value, unit)| unit_phrase(value, unit))
        .collect();

    match parts.as_slice() {
        [] => unit_phrase(0, "second"),
        [only] => only.clone(),
        [first, second] => format!("{} and {}", first, second),
        [head @ .., last] => format!("{}, and {}", head.join(", "), last),
    }
}

fn unit_phrase(value: u64, unit: &str) -> String {
    if value == 1 {
        format!("{} {}", value, unit)
    } else {
        format!("{} {}s", value, unit)
    }
}
