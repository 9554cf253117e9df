use std::io::Cursor;
use std::sync::Arc;

use anyhow::Result;
use chrono_tz::Tz;
use serde_json::{json, Value};
use tiny_http::{Method, Response, Server, StatusCode};

use crate::calendar;
use crate::model::{ActivityFilter, DashboardData};
use crate::search;
use crate::util::now_ms;
use crate::views;

type HttpResponse = Response<Cursor<Vec<u8>>>;

/// Serve the dashboard until the process exits. The data snapshot is
/// loaded once and shared read-only across requests.
pub fn run_server(bind: &str, data: Arc<DashboardData>, tz: Tz) -> Result<()> {
    let server = Server::http(bind).map_err(|err| anyhow::anyhow!("bind {bind}: {err}"))?;
    eprintln!("[clawboard][server] listening on http://{bind}");
    for request in server.incoming_requests() {
        let response = handle_request(&request, &data, tz);
        let _ = request.respond(response);
    }
    Ok(())
}

fn handle_request(request: &tiny_http::Request, data: &DashboardData, tz: Tz) -> HttpResponse {
    if *request.method() != Method::Get {
        return json_error_response("method not allowed", StatusCode(405));
    }
    // tiny_http hands us the raw path-and-query; reqwest's Url does the
    // query decoding.
    let parsed = match reqwest::Url::parse(&format!("http://localhost{}", request.url())) {
        Ok(url) => url,
        Err(_) => return json_error_response("bad request", StatusCode(400)),
    };
    let path = parsed.path().to_string();
    let param = |key: &str| -> Option<String> {
        parsed
            .query_pairs()
            .find(|(name, _)| name == key)
            .map(|(_, value)| value.into_owned())
    };
    let now = now_ms();

    match path.as_str() {
        "/" => html_response(views::page(data, now, tz)),
        "/healthz" => match json_response(json!({ "ok": true })) {
            Ok(resp) => resp,
            Err(_) => json_error_response("internal error", StatusCode(500)),
        },
        "/fragment/activity" => {
            let filter = param("filter")
                .map(|raw| ActivityFilter::from_query(&raw))
                .unwrap_or_default();
            html_response(views::activity_fragment(data, filter, now, tz))
        }
        "/fragment/calendar" => {
            let start = param("start").and_then(|raw| raw.parse::<i64>().ok());
            let window = calendar::window_for(start, now, tz);
            html_response(views::calendar_fragment(&data.jobs, window, now, tz))
        }
        "/fragment/search" => {
            let query = param("q").unwrap_or_default();
            let outcome = search::run_search(&data.search, &query);
            html_response(views::search_fragment(&outcome))
        }
        _ => {
            if let Some(id) = path.strip_prefix("/fragment/job/") {
                return match data.job(id) {
                    Some(job) => html_response(views::job_detail_fragment(job, now, tz)),
                    None => json_error_response("job not found", StatusCode(404)),
                };
            }
            json_error_response("not found", StatusCode(404))
        }
    }
}

fn html_response(body: String) -> HttpResponse {
    let response = Response::from_string(body);
    match tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"text/html; charset=utf-8"[..]) {
        Ok(header) => response.with_header(header),
        Err(_) => response,
    }
}

fn json_response(value: Value) -> Result<HttpResponse> {
    let data = serde_json::to_vec(&value)?;
    let header = tiny_http::Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..])
        .map_err(|_| anyhow::anyhow!("invalid content-type header"))?;
    Ok(Response::from_data(data).with_header(header))
}

fn json_error_response(message: &str, status: StatusCode) -> HttpResponse {
    match json_response(json!({ "ok": false, "error": message })) {
        Ok(resp) => resp.with_status_code(status),
        Err(_) => Response::from_string("error").with_status_code(status),
    }
}
