use std::str::FromStr;

use chrono::{NaiveDateTime, TimeZone, Utc};
use chrono_tz::Tz;

use crate::model::Schedule;
use crate::timefmt::{self, clock_label, hour_label, WEEKDAYS_FULL};

const MINUTE_MS: i64 = 60_000;
const HOUR_MS: i64 = 3_600_000;
const DAY_MS: i64 = 86_400_000;

/// Human-readable sentence for a job schedule. `now_ms`/`tz` feed the
/// relative date labels for one-time schedules.
pub fn schedule_text(schedule: Option<&Schedule>, now_ms: i64, tz: Tz) -> String {
    let Some(schedule) = schedule else {
        return "Unknown schedule".to_string();
    };
    match schedule {
        Schedule::Every { every_ms } => every_text(*every_ms),
        Schedule::At { at_ms: Some(at) } => {
            format!("One-time: {}", timefmt::human_date(*at, now_ms, tz))
        }
        Schedule::At { at_ms: None } => "One-time job".to_string(),
        Schedule::Cron { expr, timezone } => match timezone {
            Some(zone) => format!("{} ({zone})", cron_text(expr)),
            None => cron_text(expr),
        },
        Schedule::Other(value) => value.to_string(),
        Schedule::Legacy(raw) => legacy_text(raw, now_ms, tz),
    }
}

fn every_text(every_ms: i64) -> String {
    if every_ms >= DAY_MS {
        counted_unit(every_ms, DAY_MS, "day")
    } else if every_ms >= HOUR_MS {
        counted_unit(every_ms, HOUR_MS, "hour")
    } else {
        counted_unit(every_ms, MINUTE_MS, "minute")
    }
}

fn counted_unit(every_ms: i64, unit_ms: i64, word: &str) -> String {
    let count = (every_ms as f64 / unit_ms as f64).round() as i64;
    if count == 1 {
        format!("Every 1 {word}")
    } else {
        format!("Every {count} {word}s")
    }
}

fn legacy_text(raw: &str, now_ms: i64, tz: Tz) -> String {
    if let Some(rest) = raw.strip_prefix("every ") {
        return legacy_every_text(rest).unwrap_or_else(|| raw.to_string());
    }
    if let Some(rest) = raw.strip_prefix("at ") {
        let stamp = rest.trim().trim_end_matches('Z');
        return match parse_utc_stamp(stamp) {
            Some(ms) => format!("One-time: {}", timefmt::human_date(ms, now_ms, tz)),
            None => raw.to_string(),
        };
    }
    if let Some(rest) = raw.strip_prefix("cron ") {
        // Anything after " @ " is a timezone annotation; the legacy form
        // drops it from the label.
        let expr = rest.split(" @ ").next().unwrap_or(rest).trim();
        return cron_text(expr);
    }
    raw.to_string()
}

fn legacy_every_text(rest: &str) -> Option<String> {
    let rest = rest.trim();
    let digits_end = rest.find(|c: char| !c.is_ascii_digit())?;
    if digits_end == 0 {
        return None;
    }
    let count: i64 = rest[..digits_end].parse().ok()?;
    let word = match &rest[digits_end..] {
        "m" => "minute",
        "h" => "hour",
        "d" => "day",
        _ => return None,
    };
    if count == 1 {
        Some(format!("Every 1 {word}"))
    } else {
        Some(format!("Every {count} {word}s"))
    }
}

fn parse_utc_stamp(stamp: &str) -> Option<i64> {
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(stamp, fmt) {
            return Some(Utc.from_utc_datetime(&naive).timestamp_millis());
        }
    }
    None
}

/// Humanize a 5-field cron expression (minute hour day-of-month month
/// day-of-week). Expressions with fewer than five fields come back
/// unchanged; unmatched patterns fall back to "Cron: {expr}".
pub fn cron_text(expr: &str) -> String {
    let fields: Vec<&str> = expr.split_whitespace().collect();
    if fields.len() < 5 {
        return expr.to_string();
    }
    let (minute, hour, dom, month, dow) = (fields[0], fields[1], fields[2], fields[3], fields[4]);
    let rest_wild = dom == "*" && month == "*" && dow == "*";

    if let Some(step) = minute.strip_prefix("*/").and_then(|s| s.parse::<u32>().ok()) {
        if hour == "*" && rest_wild {
            return format!("Every {step} minutes");
        }
        if let Some((from, to)) = parse_hour_range(hour) {
            return format!(
                "Every {step} min from {} to {}",
                hour_label(from),
                hour_label(to)
            );
        }
    }

    if let Some(minute_v) = parse_field(minute) {
        if hour == "*" && rest_wild {
            return format!("Every hour at :{minute_v:02}");
        }
        if let Some(hour_v) = parse_field(hour) {
            if rest_wild {
                return format!("Every day at {}", clock_label(hour_v, minute_v));
            }
            if dom == "*" && month == "*" {
                if let Some(day) = parse_field(dow).filter(|d| *d <= 6) {
                    return format!(
                        "Every {} at {}",
                        WEEKDAYS_FULL[day as usize],
                        clock_label(hour_v, minute_v)
                    );
                }
            }
        } else if rest_wild && hour.contains(',') {
            if let Some(hours) = parse_hour_list(hour) {
                let times: Vec<String> = hours
                    .into_iter()
                    .map(|h| clock_label(h, minute_v))
                    .collect();
                return format!("Daily at {}", times.join(" and "));
            }
        }
    }

    format!("Cron: {expr}")
}

fn parse_field(field: &str) -> Option<u32> {
    field.parse::<u32>().ok()
}

fn parse_hour_range(field: &str) -> Option<(u32, u32)> {
    let (from, to) = field.split_once('-')?;
    Some((from.parse().ok()?, to.parse().ok()?))
}

fn parse_hour_list(field: &str) -> Option<Vec<u32>> {
    field
        .split(',')
        .map(|part| part.trim().parse::<u32>().ok())
        .collect()
}

/// Upcoming run instants for a schedule, walked from `now_ms` up to
/// `horizon_ms` ahead and capped at `cap` entries. Used when a job record
/// arrives without precomputed next runs.
pub fn upcoming_runs(schedule: &Schedule, now_ms: i64, horizon_ms: i64, cap: usize) -> Vec<i64> {
    let end = now_ms.saturating_add(horizon_ms);
    match schedule {
        Schedule::At { at_ms: Some(at) } if *at > now_ms => vec![*at],
        Schedule::At { .. } => Vec::new(),
        Schedule::Every { every_ms } if *every_ms > 0 => {
            let mut runs = Vec::new();
            let mut next = now_ms + every_ms;
            while next <= end && runs.len() < cap {
                runs.push(next);
                next += every_ms;
            }
            runs
        }
        Schedule::Every { .. } => Vec::new(),
        Schedule::Cron { expr, timezone } => {
            let normalized = normalize_cron_expr(expr);
            let Ok(parsed) = cron::Schedule::from_str(&normalized) else {
                return Vec::new();
            };
            let zone: Tz = timezone
                .as_deref()
                .and_then(|s| s.parse().ok())
                .unwrap_or(chrono_tz::UTC);
            let Some(start) = Utc.timestamp_millis_opt(now_ms).single() else {
                return Vec::new();
            };
            let start = start.with_timezone(&zone);
            parsed
                .after(&start)
                .map(|dt| dt.timestamp_millis())
                .take_while(|ms| *ms <= end)
                .take(cap)
                .collect()
        }
        Schedule::Legacy(raw) => match structured_from_legacy(raw) {
            Some(schedule) => upcoming_runs(&schedule, now_ms, horizon_ms, cap),
            None => Vec::new(),
        },
        Schedule::Other(_) => Vec::new(),
    }
}

/// The cron crate wants a seconds field; dashboard data uses the standard
/// 5-field form.
fn normalize_cron_expr(expr: &str) -> String {
    if expr.split_whitespace().count() == 5 {
        format!("0 {expr}")
    } else {
        expr.to_string()
    }
}

/// Structured counterpart of a legacy schedule string, for run computation
/// only (the display path keeps legacy wording rules of its own).
fn structured_from_legacy(raw: &str) -> Option<Schedule> {
    if let Some(rest) = raw.strip_prefix("every ") {
        let rest = rest.trim();
        let digits_end = rest.find(|c: char| !c.is_ascii_digit())?;
        let count: i64 = rest[..digits_end].parse().ok()?;
        let unit_ms = match &rest[digits_end..] {
            "m" => MINUTE_MS,
            "h" => HOUR_MS,
            "d" => DAY_MS,
            _ => return None,
        };
        return Some(Schedule::Every {
            every_ms: count * unit_ms,
        });
    }
    if let Some(rest) = raw.strip_prefix("at ") {
        let stamp = rest.trim().trim_end_matches('Z');
        return Some(Schedule::At {
            at_ms: parse_utc_stamp(stamp),
        });
    }
    if let Some(rest) = raw.strip_prefix("cron ") {
        let (expr, timezone) = match rest.split_once(" @ ") {
            Some((expr, zone)) => (expr.trim(), Some(zone.trim().to_string())),
            None => (rest.trim(), None),
        };
        return Some(Schedule::Cron {
            expr: expr.to_string(),
            timezone,
        });
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use chrono_tz::UTC;
    use serde_json::json;

    fn ms(year: i32, month: u32, day: u32, hour: u32, minute: u32, second: u32) -> i64 {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
            .single()
            .expect("valid datetime")
            .timestamp_millis()
    }

    #[test]
    fn cron_patterns() {
        assert_eq!(cron_text("*/15 * * * *"), "Every 15 minutes");
        assert_eq!(cron_text("0 9 * * *"), "Every day at 9:00 AM");
        assert_eq!(cron_text("30 14 * * 1"), "Every Monday at 2:30 PM");
        assert_eq!(cron_text("5 * * * *"), "Every hour at :05");
        assert_eq!(
            cron_text("*/10 9-17 * * *"),
            "Every 10 min from 9 AM to 5 PM"
        );
        assert_eq!(cron_text("0 8,20 * * *"), "Daily at 8:00 AM and 8:00 PM");
        assert_eq!(cron_text("0 0 * * 0"), "Every Sunday at 12:00 AM");
    }

    #[test]
    fn cron_fallbacks() {
        // fewer than five fields: raw string unchanged
        assert_eq!(cron_text("0 9 * *"), "0 9 * *");
        // day-of-month pins don't match any pattern
        assert_eq!(cron_text("0 9 1 * *"), "Cron: 0 9 1 * *");
        // day-of-week out of the 0..=6 table
        assert_eq!(cron_text("0 9 * * 7"), "Cron: 0 9 * * 7");
    }

    #[test]
    fn every_intervals_round_to_nearest_unit() {
        let now = 0;
        let text = |ms| schedule_text(Some(&Schedule::Every { every_ms: ms }), now, UTC);
        assert_eq!(text(3_600_000), "Every 1 hour");
        assert_eq!(text(7_200_000), "Every 2 hours");
        assert_eq!(text(300_000), "Every 5 minutes");
        assert_eq!(text(86_400_000), "Every 1 day");
        assert_eq!(text(129_600_000), "Every 2 days");
        assert_eq!(text(5_400_000), "Every 2 hours");
    }

    #[test]
    fn missing_and_unknown_schedules() {
        assert_eq!(schedule_text(None, 0, UTC), "Unknown schedule");
        let odd = json!({"kind": "lunar", "phase": "full"});
        assert_eq!(
            schedule_text(Some(&Schedule::Other(odd.clone())), 0, UTC),
            odd.to_string()
        );
    }

    #[test]
    fn legacy_strings() {
        let now = ms(2026, 2, 8, 12, 0, 0);
        let text = |raw: &str| schedule_text(Some(&Schedule::Legacy(raw.to_string())), now, UTC);
        assert_eq!(text("every 15m"), "Every 15 minutes");
        assert_eq!(text("every 1h"), "Every 1 hour");
        assert_eq!(text("every 3d"), "Every 3 days");
        // unparsable "every" variants come back unchanged
        assert_eq!(text("every fortnight"), "every fortnight");
        assert_eq!(text("every 90x"), "every 90x");
        assert_eq!(text("at 2026-02-08T21:00:00Z"), "One-time: Today at 9:00 PM");
        assert_eq!(text("cron 0 9 * * *"), "Every day at 9:00 AM");
        // timezone annotation after " @ " is dropped
        assert_eq!(
            text("cron 30 14 * * 1 @ America/New_York"),
            "Every Monday at 2:30 PM"
        );
        assert_eq!(text("whenever"), "whenever");
    }

    #[test]
    fn structured_cron_appends_timezone() {
        let schedule = Schedule::Cron {
            expr: "0 9 * * *".to_string(),
            timezone: Some("Europe/Berlin".to_string()),
        };
        assert_eq!(
            schedule_text(Some(&schedule), 0, UTC),
            "Every day at 9:00 AM (Europe/Berlin)"
        );
    }

    #[test]
    fn upcoming_runs_for_interval_schedules() {
        let now = ms(2026, 2, 8, 12, 0, 0);
        let runs = upcoming_runs(
            &Schedule::Every { every_ms: 3_600_000 },
            now,
            4 * 3_600_000,
            50,
        );
        assert_eq!(runs.len(), 4);
        assert_eq!(runs[0], now + 3_600_000);
        assert_eq!(runs[3], now + 4 * 3_600_000);

        let capped = upcoming_runs(
            &Schedule::Every { every_ms: 60_000 },
            now,
            14 * 86_400_000,
            50,
        );
        assert_eq!(capped.len(), 50);
    }

    #[test]
    fn upcoming_runs_for_cron_schedules() {
        let now = ms(2026, 2, 8, 12, 0, 0);
        let schedule = Schedule::Cron {
            expr: "0 9 * * *".to_string(),
            timezone: None,
        };
        let runs = upcoming_runs(&schedule, now, 3 * 86_400_000, 50);
        assert_eq!(runs[0], ms(2026, 2, 9, 9, 0, 0));
        assert_eq!(runs[1], ms(2026, 2, 10, 9, 0, 0));
    }

    #[test]
    fn upcoming_runs_for_one_time_and_legacy() {
        let now = ms(2026, 2, 8, 12, 0, 0);
        let later = now + 90_000;
        assert_eq!(
            upcoming_runs(&Schedule::At { at_ms: Some(later) }, now, DAY_MS, 50),
            vec![later]
        );
        assert!(upcoming_runs(&Schedule::At { at_ms: Some(now - 1) }, now, DAY_MS, 50).is_empty());

        let legacy = Schedule::Legacy("every 6h".to_string());
        let runs = upcoming_runs(&legacy, now, DAY_MS, 50);
        assert_eq!(runs.len(), 4);
        assert_eq!(runs[0], now + 6 * 3_600_000);
    }
}
