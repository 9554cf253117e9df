use std::net::TcpListener;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde_json::json;

use clawboard::model::{DashboardData, LoadState};
use clawboard::server;

fn fixture_data() -> DashboardData {
    DashboardData {
        activity: serde_json::from_value(json!([
            {"type": "tool", "content": "exec: ls", "timestamp": "2026-02-08T11:00:00Z"},
            {"type": "message", "content": "hi there", "timestamp": "2026-02-08T10:00:00Z"}
        ]))
        .expect("activity"),
        jobs: serde_json::from_value(json!([
            {
                "id": "digest",
                "name": "Morning digest",
                "schedule": "cron 0 7 * * *",
                "status": "ok",
                "nextRuns": ["2026-02-09T07:00:00Z"]
            }
        ]))
        .expect("jobs"),
        search: serde_json::from_value(json!([
            {"file": "MEMORY.md", "type": "memory", "content": "the fox file"}
        ]))
        .expect("search"),
        state: LoadState::Loaded,
    }
}

fn start_server() -> Result<String> {
    let listener = TcpListener::bind("127.0.0.1:0")?;
    let addr = listener.local_addr()?;
    drop(listener);
    let bind = format!("{addr}");
    let thread_bind = bind.clone();
    let data = Arc::new(fixture_data());
    std::thread::spawn(move || {
        let _ = server::run_server(&thread_bind, data, chrono_tz::UTC);
    });
    std::thread::sleep(Duration::from_millis(50));
    Ok(format!("http://{bind}"))
}

#[test]
fn routes_serve_page_fragments_and_errors() -> Result<()> {
    let base = start_server()?;
    let client = reqwest::blocking::Client::new();

    let page = client.get(format!("{base}/")).send()?;
    assert!(page.status().is_success());
    assert_eq!(
        page.headers()
            .get("content-type")
            .and_then(|v| v.to_str().ok()),
        Some("text/html; charset=utf-8")
    );
    let body = page.text()?;
    assert!(body.contains("panel-activity"));
    assert!(body.contains("exec: ls"));

    let health: serde_json::Value = client.get(format!("{base}/healthz")).send()?.json()?;
    assert_eq!(health, json!({ "ok": true }));

    let filtered = client
        .get(format!("{base}/fragment/activity?filter=message"))
        .send()?
        .text()?;
    assert!(filtered.contains("hi there"));
    assert!(!filtered.contains("exec: ls"));

    let calendar = client
        .get(format!("{base}/fragment/calendar"))
        .send()?
        .text()?;
    assert!(calendar.contains("cal-grid"));

    let detail = client
        .get(format!("{base}/fragment/job/digest"))
        .send()?
        .text()?;
    assert!(detail.contains("Morning digest"));
    assert!(detail.contains("status-ok"));

    let missing = client.get(format!("{base}/fragment/job/nope")).send()?;
    assert_eq!(missing.status().as_u16(), 404);

    let search = client
        .get(format!("{base}/fragment/search?q=fox%20file"))
        .send()?
        .text()?;
    assert!(search.contains("<mark>fox file</mark>"));

    let empty_search = client
        .get(format!("{base}/fragment/search?q="))
        .send()?
        .text()?;
    assert!(empty_search.contains("Type to search"));

    let not_found = client.get(format!("{base}/definitely-not-a-route")).send()?;
    assert_eq!(not_found.status().as_u16(), 404);

    let method = client.post(format!("{base}/fragment/search")).send()?;
    assert_eq!(method.status().as_u16(), 405);

    Ok(())
}
