use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeZone, Timelike};
use chrono_tz::Tz;

pub const WEEKDAYS_SHORT: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
pub const WEEKDAYS_FULL: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];
pub const MONTHS_SHORT: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];
pub const MONTHS_FULL: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Label shown when a timestamp string cannot be parsed.
pub const UNPARSED_LABEL: &str = "\u{2014}";

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;

/// Parse an ISO-8601 timestamp. Offset-carrying strings keep their own
/// instant; zone-less strings (the upstream generator emits these) are
/// interpreted in the display timezone.
pub fn parse_instant(raw: &str, tz: Tz) -> Option<DateTime<Tz>> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.with_timezone(&tz));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, fmt) {
            if let Some(dt) = tz.from_local_datetime(&naive).earliest() {
                return Some(dt);
            }
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(naive) = date.and_hms_opt(0, 0, 0) {
            return tz.from_local_datetime(&naive).earliest();
        }
    }
    None
}

pub fn parse_instant_ms(raw: &str, tz: Tz) -> Option<i64> {
    parse_instant(raw, tz).map(|dt| dt.timestamp_millis())
}

/// Relative "ago" label for the activity feed. Integer-floor division,
/// half-open lower bounds; anything older than a week gets an absolute
/// "{Mon} {day}" label.
pub fn relative_label(ts_ms: i64, now_ms: i64, tz: Tz) -> String {
    let delta = now_ms - ts_ms;
    if delta < MINUTE_MS {
        return "Just now".to_string();
    }
    let minutes = delta / MINUTE_MS;
    if minutes < 60 {
        return format!("{minutes}m ago");
    }
    let hours = delta / HOUR_MS;
    if hours < 24 {
        return format!("{hours}h ago");
    }
    let days = delta / DAY_MS;
    if days < 7 {
        return format!("{days}d ago");
    }
    match tz.timestamp_millis_opt(ts_ms).single() {
        Some(dt) => format!("{} {}", MONTHS_SHORT[dt.month0() as usize], dt.day()),
        None => UNPARSED_LABEL.to_string(),
    }
}

/// "Today at 9:05 AM" / "Tomorrow at 9:05 AM" / "Mon Feb 9 at 9:05 AM".
pub fn human_date(ts_ms: i64, now_ms: i64, tz: Tz) -> String {
    let Some(dt) = tz.timestamp_millis_opt(ts_ms).single() else {
        return UNPARSED_LABEL.to_string();
    };
    let Some(now) = tz.timestamp_millis_opt(now_ms).single() else {
        return UNPARSED_LABEL.to_string();
    };
    let time = clock_label(dt.hour(), dt.minute());
    let date = dt.date_naive();
    let today = now.date_naive();
    if date == today {
        format!("Today at {time}")
    } else if Some(date) == today.succ_opt() {
        format!("Tomorrow at {time}")
    } else {
        format!(
            "{} {} {} at {}",
            WEEKDAYS_SHORT[date.weekday().num_days_from_sunday() as usize],
            MONTHS_SHORT[date.month0() as usize],
            date.day(),
            time
        )
    }
}

/// 12-hour clock, no leading zero on the hour, zero-padded minutes.
pub fn clock_label(hour: u32, minute: u32) -> String {
    let suffix = if hour < 12 { "AM" } else { "PM" };
    let display = match hour % 12 {
        0 => 12,
        h => h,
    };
    format!("{display}:{minute:02} {suffix}")
}

/// Hour-only 12-hour label: 0 -> "12 AM", 12 -> "12 PM".
pub fn hour_label(hour: u32) -> String {
    match hour {
        0 => "12 AM".to_string(),
        12 => "12 PM".to_string(),
        h if h < 12 => format!("{h} AM"),
        h => format!("{} PM", h - 12),
    }
}
