use chrono::{Datelike, Days, NaiveDate, TimeZone, Timelike};
use chrono_tz::Tz;

use crate::model::CronJob;
use crate::timefmt::{self, MONTHS_FULL};

/// The Sunday-anchored 7-day range the calendar shows. `start` is always a
/// Sunday; navigation shifts it a whole week at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekWindow {
    pub start: NaiveDate,
}

impl WeekWindow {
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            start: week_start(date),
        }
    }

    pub fn prev(self) -> Self {
        Self {
            start: self.start - Days::new(7),
        }
    }

    pub fn next(self) -> Self {
        Self {
            start: self.start + Days::new(7),
        }
    }

    /// "February 2026" - the week-start's month and year.
    pub fn title(&self) -> String {
        format!(
            "{} {}",
            MONTHS_FULL[self.start.month0() as usize],
            self.start.year()
        )
    }

    pub fn days(&self) -> [NaiveDate; 7] {
        let mut out = [self.start; 7];
        for (offset, slot) in out.iter_mut().enumerate() {
            *slot = self.start + Days::new(offset as u64);
        }
        out
    }
}

/// Most recent Sunday at or before `date`.
pub fn week_start(date: NaiveDate) -> NaiveDate {
    date - Days::new(u64::from(date.weekday().num_days_from_sunday()))
}

/// Window for the week containing the instant `start_ms`, falling back to
/// the week containing `now_ms`.
pub fn window_for(start_ms: Option<i64>, now_ms: i64, tz: Tz) -> WeekWindow {
    let anchor = start_ms
        .and_then(|ms| tz.timestamp_millis_opt(ms).single())
        .or_else(|| tz.timestamp_millis_opt(now_ms).single())
        .map(|dt| dt.date_naive())
        .unwrap_or_default();
    WeekWindow::containing(anchor)
}

#[derive(Debug, Clone)]
pub struct DayCell {
    pub date: NaiveDate,
    pub is_today: bool,
    pub events: Vec<DayEvent>,
}

#[derive(Debug, Clone)]
pub struct DayEvent {
    pub job_id: String,
    pub name: String,
    pub time_label: String,
    pub recurring: bool,
}

/// Bucket jobs into the window's seven days. A job lands on a day when any
/// of its next runs falls on that calendar date (display timezone); the
/// first such run supplies the event time.
pub fn week_cells(jobs: &[CronJob], window: WeekWindow, now_ms: i64, tz: Tz) -> Vec<DayCell> {
    let today = tz
        .timestamp_millis_opt(now_ms)
        .single()
        .map(|dt| dt.date_naive());
    window
        .days()
        .iter()
        .map(|date| {
            let mut events = Vec::new();
            for job in jobs {
                let first_run = job
                    .next_runs
                    .iter()
                    .filter_map(|raw| timefmt::parse_instant(raw, tz))
                    .find(|run| run.date_naive() == *date);
                if let Some(run) = first_run {
                    events.push(DayEvent {
                        job_id: job.id.clone(),
                        name: job.name.clone(),
                        time_label: timefmt::clock_label(run.hour(), run.minute()),
                        recurring: job.is_recurring(),
                    });
                }
            }
            DayCell {
                date: *date,
                is_today: today == Some(*date),
                events,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::CronJob;
    use chrono::Utc;
    use chrono_tz::UTC;
    use serde_json::json;

    fn date(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
    }

    fn job(id: &str, name: &str, schedule: serde_json::Value, runs: &[&str]) -> CronJob {
        serde_json::from_value(json!({
            "id": id,
            "name": name,
            "schedule": schedule,
            "nextRuns": runs,
        }))
        .expect("job")
    }

    #[test]
    fn week_start_is_a_sunday_and_idempotent() {
        // 2026-02-08 is a Sunday
        assert_eq!(week_start(date(2026, 2, 8)), date(2026, 2, 8));
        assert_eq!(week_start(date(2026, 2, 11)), date(2026, 2, 8));
        assert_eq!(week_start(date(2026, 2, 14)), date(2026, 2, 8));
        for day in 8..=14 {
            let start = week_start(date(2026, 2, day));
            assert_eq!(start.weekday(), chrono::Weekday::Sun);
            assert_eq!(week_start(start), start);
        }
    }

    #[test]
    fn window_navigation_shifts_whole_weeks() {
        let window = WeekWindow::containing(date(2026, 2, 11));
        assert_eq!(window.start, date(2026, 2, 8));
        assert_eq!(window.prev().start, date(2026, 2, 1));
        assert_eq!(window.next().start, date(2026, 2, 15));
        assert_eq!(window.title(), "February 2026");
    }

    #[test]
    fn cells_cover_sunday_through_saturday() {
        let window = WeekWindow::containing(date(2026, 2, 11));
        let cells = week_cells(&[], window, 0, UTC);
        assert_eq!(cells.len(), 7);
        assert_eq!(cells[0].date, date(2026, 2, 8));
        assert_eq!(cells[6].date, date(2026, 2, 14));
        for (offset, cell) in cells.iter().enumerate() {
            assert_eq!(
                cell.date.weekday().num_days_from_sunday() as usize,
                offset
            );
        }
    }

    #[test]
    fn first_matching_run_supplies_the_event_time() {
        let jobs = vec![job(
            "digest",
            "Morning digest",
            json!("cron 0 7 * * *"),
            &[
                "2026-02-09T07:00:00Z",
                "2026-02-09T19:00:00Z",
                "2026-02-10T07:00:00Z",
            ],
        )];
        let now = Utc
            .with_ymd_and_hms(2026, 2, 8, 12, 0, 0)
            .single()
            .expect("now")
            .timestamp_millis();
        let window = WeekWindow::containing(date(2026, 2, 8));
        let cells = week_cells(&jobs, window, now, UTC);

        assert!(cells[0].is_today);
        assert!(cells[0].events.is_empty());
        // Monday: first run of that day wins, duplicate later run ignored
        assert_eq!(cells[1].events.len(), 1);
        let event = &cells[1].events[0];
        assert_eq!(event.name, "Morning digest");
        assert_eq!(event.time_label, "7:00 AM");
        assert!(event.recurring);
        // Tuesday picks up the next day's run
        assert_eq!(cells[2].events.len(), 1);
    }

    #[test]
    fn one_time_jobs_are_not_tagged_recurring() {
        let jobs = vec![job(
            "once",
            "Deploy window",
            json!({"kind": "at", "atMs": 1_770_800_000_000i64}),
            &["2026-02-11T09:30:00Z"],
        )];
        let window = WeekWindow::containing(date(2026, 2, 8));
        let cells = week_cells(&jobs, window, 0, UTC);
        assert_eq!(cells[3].events.len(), 1);
        assert!(!cells[3].events[0].recurring);
    }

    #[test]
    fn window_for_falls_back_to_now() {
        let now = Utc
            .with_ymd_and_hms(2026, 2, 11, 8, 0, 0)
            .single()
            .expect("now")
            .timestamp_millis();
        assert_eq!(window_for(None, now, UTC).start, date(2026, 2, 8));
        let shifted = window_for(Some(now + 7 * 86_400_000), now, UTC);
        assert_eq!(shifted.start, date(2026, 2, 15));
    }
}
