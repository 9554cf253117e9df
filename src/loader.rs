use std::thread;

use anyhow::{Context, Result};
use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::DataSource;
use crate::model::{ActivityEntry, CronJob, DashboardData, LoadState, SearchDoc};
use crate::schedule;
use crate::timefmt;

pub const ACTIVITY_FILE: &str = "activity.json";
pub const CRON_FILE: &str = "cron.json";
pub const SEARCH_FILE: &str = "search-index.json";

const RUN_HORIZON_MS: i64 = 14 * 86_400_000;
const RUN_CAP: usize = 50;

/// Load the three dashboard documents. Each document independently falls
/// back to an empty collection on failure; only a bad data source fails
/// the load as a whole.
pub fn load_dashboard(source: &DataSource, now_ms: i64, tz: Tz) -> DashboardData {
    match try_load(source, now_ms, tz) {
        Ok(data) => data,
        Err(err) => {
            eprintln!("[clawboard][loader] load failed: {err:#}");
            DashboardData::failed(format!("Failed to load dashboard data: {err}"))
        }
    }
}

fn try_load(source: &DataSource, now_ms: i64, tz: Tz) -> Result<DashboardData> {
    source.validate()?;
    let (activity, jobs, search) = thread::scope(|scope| {
        let activity = scope.spawn(|| fetch_doc::<ActivityEntry>(source, ACTIVITY_FILE));
        let jobs = scope.spawn(|| fetch_doc::<CronJob>(source, CRON_FILE));
        let search = scope.spawn(|| fetch_doc::<SearchDoc>(source, SEARCH_FILE));
        (join_doc(activity), join_doc(jobs), join_doc(search))
    });
    Ok(DashboardData {
        activity,
        jobs: normalize_jobs(jobs, now_ms, tz),
        search,
        state: LoadState::Loaded,
    })
}

fn join_doc<T>(handle: thread::ScopedJoinHandle<'_, Vec<T>>) -> Vec<T> {
    handle.join().unwrap_or_default()
}

fn fetch_doc<T: DeserializeOwned>(source: &DataSource, name: &str) -> Vec<T> {
    match read_doc(source, name) {
        Ok(items) => items,
        Err(err) => {
            eprintln!("[clawboard][loader] {name}: {err:#}; using empty set");
            Vec::new()
        }
    }
}

fn read_doc<T: DeserializeOwned>(source: &DataSource, name: &str) -> Result<Vec<T>> {
    match source {
        DataSource::Dir(dir) => {
            let path = dir.join(name);
            let raw = std::fs::read_to_string(&path)
                .with_context(|| format!("read {}", path.display()))?;
            serde_json::from_str(&raw).with_context(|| format!("parse {name}"))
        }
        DataSource::Url(base) => {
            let url = format!("{}/{}", base.trim_end_matches('/'), name);
            let response = reqwest::blocking::get(&url).with_context(|| format!("fetch {url}"))?;
            if !response.status().is_success() {
                anyhow::bail!("fetch {url}: {}", response.status());
            }
            response.json().with_context(|| format!("parse {name}"))
        }
    }
}

/// Post-load fixups: synthesize missing ids, keep `nextRuns` ascending
/// (the calendar picks the first run per day), and compute runs for jobs
/// that arrived without any.
fn normalize_jobs(mut jobs: Vec<CronJob>, now_ms: i64, tz: Tz) -> Vec<CronJob> {
    for job in &mut jobs {
        if job.id.trim().is_empty() {
            job.id = Uuid::new_v4().to_string();
        }
        job.next_runs
            .sort_by_cached_key(|raw| timefmt::parse_instant_ms(raw, tz).unwrap_or(i64::MAX));
        if job.next_runs.is_empty() {
            if let Some(spec) = job.schedule.as_ref() {
                job.next_runs = schedule::upcoming_runs(spec, now_ms, RUN_HORIZON_MS, RUN_CAP)
                    .into_iter()
                    .filter_map(|ms| Utc.timestamp_millis_opt(ms).single())
                    .map(|dt| dt.to_rfc3339())
                    .collect();
            }
        }
    }
    jobs
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::UTC;
    use serde_json::json;

    fn job(value: serde_json::Value) -> CronJob {
        serde_json::from_value(value).expect("job")
    }

    #[test]
    fn missing_ids_are_synthesized() {
        let jobs = normalize_jobs(vec![job(json!({"name": "Nightly backup"}))], 0, UTC);
        assert!(!jobs[0].id.is_empty());
    }

    #[test]
    fn next_runs_are_sorted_ascending() {
        let jobs = normalize_jobs(
            vec![job(json!({
                "id": "j1",
                "nextRuns": [
                    "2026-02-10T09:00:00Z",
                    "2026-02-08T09:00:00Z",
                    "2026-02-09T09:00:00Z",
                ],
            }))],
            0,
            UTC,
        );
        assert_eq!(
            jobs[0].next_runs,
            vec![
                "2026-02-08T09:00:00Z",
                "2026-02-09T09:00:00Z",
                "2026-02-10T09:00:00Z",
            ]
        );
    }

    #[test]
    fn runs_are_computed_when_absent() {
        let now = Utc
            .with_ymd_and_hms(2026, 2, 8, 12, 0, 0)
            .single()
            .expect("now")
            .timestamp_millis();
        let jobs = normalize_jobs(
            vec![job(json!({
                "id": "j1",
                "schedule": {"kind": "every", "everyMs": 86_400_000},
            }))],
            now,
            UTC,
        );
        assert_eq!(jobs[0].next_runs.len(), 14);
        assert!(jobs[0].next_runs[0].starts_with("2026-02-09T12:00:00"));
    }

    #[test]
    fn jobs_without_schedules_stay_unscheduled() {
        let jobs = normalize_jobs(vec![job(json!({"id": "j1"}))], 0, UTC);
        assert!(jobs[0].next_runs.is_empty());
    }
}
