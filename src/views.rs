use chrono::Datelike;
use chrono_tz::Tz;

use crate::assets;
use crate::calendar::{self, WeekWindow};
use crate::model::{ActivityEntry, ActivityFilter, ActivityKind, CronJob, DashboardData, LoadState};
use crate::schedule;
use crate::search::{SearchHit, SearchOutcome};
use crate::timefmt::{self, WEEKDAYS_SHORT};
use crate::util::{css_token, escape_html};

/// At most this many feed entries are rendered per request.
pub const ACTIVITY_RENDER_CAP: usize = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActivityStats {
    pub total: usize,
    pub tool: usize,
    pub message: usize,
    pub cron: usize,
}

/// Counts over the full unfiltered collection, independent of the active
/// filter.
pub fn activity_stats(entries: &[ActivityEntry]) -> ActivityStats {
    let mut stats = ActivityStats {
        total: entries.len(),
        tool: 0,
        message: 0,
        cron: 0,
    };
    for entry in entries {
        match entry.kind {
            ActivityKind::Tool => stats.tool += 1,
            ActivityKind::Message => stats.message += 1,
            ActivityKind::Cron => stats.cron += 1,
        }
    }
    stats
}

pub fn activity_fragment(
    data: &DashboardData,
    filter: ActivityFilter,
    now_ms: i64,
    tz: Tz,
) -> String {
    if let LoadState::Failed(message) = &data.state {
        return format!(
            "<div class=\"load-error\">{}</div>",
            escape_html(message)
        );
    }

    let stats = activity_stats(&data.activity);
    let mut out = String::new();
    out.push_str(&format!(
        concat!(
            "<div class=\"stats\">",
            "<div class=\"stat\"><span class=\"stat-value\">{total}</span><span class=\"stat-label\">events</span></div>",
            "<div class=\"stat\"><span class=\"stat-value\">{tool}</span><span class=\"stat-label\">tool calls</span></div>",
            "<div class=\"stat\"><span class=\"stat-value\">{message}</span><span class=\"stat-label\">messages</span></div>",
            "<div class=\"stat\"><span class=\"stat-value\">{cron}</span><span class=\"stat-label\">cron wakes</span></div>",
            "</div>"
        ),
        total = stats.total,
        tool = stats.tool,
        message = stats.message,
        cron = stats.cron,
    ));

    let shown: Vec<&ActivityEntry> = data
        .activity
        .iter()
        .filter(|entry| filter.accepts(entry.kind))
        .take(ACTIVITY_RENDER_CAP)
        .collect();

    if shown.is_empty() {
        out.push_str("<div class=\"empty\">No activity to show</div>");
        return out;
    }

    out.push_str("<ul class=\"feed\">");
    for entry in shown {
        let when = timefmt::parse_instant_ms(&entry.timestamp, tz)
            .map(|ts| timefmt::relative_label(ts, now_ms, tz))
            .unwrap_or_else(|| timefmt::UNPARSED_LABEL.to_string());
        out.push_str(&format!(
            concat!(
                "<li class=\"feed-item kind-{kind}\">",
                "<span class=\"feed-when\">{when}</span>",
                "<span class=\"feed-content\">{content}</span>",
                "</li>"
            ),
            kind = entry.kind.as_str(),
            when = escape_html(&when),
            content = escape_html(&entry.content),
        ));
    }
    out.push_str("</ul>");
    out
}

pub fn calendar_fragment(jobs: &[CronJob], window: WeekWindow, now_ms: i64, tz: Tz) -> String {
    let cells = calendar::week_cells(jobs, window, now_ms, tz);
    let mut out = String::new();
    out.push_str(&format!(
        concat!(
            "<div class=\"cal-header\">",
            "<span class=\"cal-title\">{title}</span>",
            "<span class=\"cal-nav\">",
            "<button data-week=\"prev\">&#8249;</button>",
            "<button data-week=\"today\">Today</button>",
            "<button data-week=\"next\">&#8250;</button>",
            "</span>",
            "</div>"
        ),
        title = escape_html(&window.title()),
    ));
    out.push_str(&format!(
        "<div class=\"cal-grid\" data-week-start=\"{}\">",
        window.start
    ));
    for cell in cells {
        let today_class = if cell.is_today { " today" } else { "" };
        out.push_str(&format!(
            concat!(
                "<div class=\"cal-day{today}\">",
                "<div class=\"cal-day-head\">{weekday} {day}</div>"
            ),
            today = today_class,
            weekday = WEEKDAYS_SHORT[cell.date.weekday().num_days_from_sunday() as usize],
            day = cell.date.day(),
        ));
        for event in &cell.events {
            let recurring_class = if event.recurring { " recurring" } else { "" };
            out.push_str(&format!(
                concat!(
                    "<button class=\"event{recurring}\" data-job=\"{id}\">",
                    "<span class=\"event-time\">{time}</span> {name}",
                    "</button>"
                ),
                recurring = recurring_class,
                id = escape_html(&event.job_id),
                time = escape_html(&event.time_label),
                name = escape_html(&event.name),
            ));
        }
        out.push_str("</div>");
    }
    out.push_str("</div>");
    out
}

pub fn job_detail_fragment(job: &CronJob, now_ms: i64, tz: Tz) -> String {
    let schedule_line = schedule::schedule_text(job.schedule.as_ref(), now_ms, tz);
    let description = match job.description.as_deref() {
        Some(text) => text.to_string(),
        None => default_description(&job.name).to_string(),
    };
    let next_run = job
        .next_runs
        .iter()
        .filter_map(|raw| timefmt::parse_instant_ms(raw, tz))
        .next()
        .map(|ms| timefmt::human_date(ms, now_ms, tz))
        .unwrap_or_else(|| "Not scheduled".to_string());
    let status = job.status.as_deref().unwrap_or("unknown");
    let status_class = match job.status.as_deref() {
        Some(raw) => {
            let token = css_token(raw);
            if token.is_empty() {
                "pending".to_string()
            } else {
                token
            }
        }
        None => "pending".to_string(),
    };

    let mut out = String::new();
    out.push_str(&format!(
        concat!(
            "<div class=\"job-detail\" data-job=\"{id}\">",
            "<div class=\"job-head\">",
            "<span class=\"job-name\">{name}</span>",
            "<span class=\"status status-{status_class}\">{status}</span>",
            "</div>",
            "<div class=\"job-schedule\">{schedule}</div>",
            "<p class=\"job-description\">{description}</p>",
            "<div class=\"job-row\"><span class=\"label\">Next run</span>{next_run}</div>"
        ),
        id = escape_html(&job.id),
        name = escape_html(&job.name),
        status_class = status_class,
        status = escape_html(status),
        schedule = escape_html(&schedule_line),
        description = escape_html(&description),
        next_run = escape_html(&next_run),
    ));
    if let Some(last) = job
        .last_run
        .as_deref()
        .and_then(|raw| timefmt::parse_instant_ms(raw, tz))
    {
        out.push_str(&format!(
            "<div class=\"job-row\"><span class=\"label\">Last run</span>{}</div>",
            escape_html(&timefmt::human_date(last, now_ms, tz)),
        ));
    }
    if let (Some(label), Some(full)) = (job.handler_label(), job.model.as_deref()) {
        out.push_str(&format!(
            "<div class=\"job-row\"><span class=\"label\">Model</span><span title=\"{}\">{}</span></div>",
            escape_html(full),
            escape_html(label),
        ));
    }
    if let Some(script) = job.script.as_deref() {
        out.push_str(&format!(
            "<pre class=\"job-script\">{}</pre>",
            escape_html(script)
        ));
    }
    out.push_str("</div>");
    out
}

pub fn search_fragment(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Prompt => {
            "<div class=\"empty\">Type to search memory, notes, and sessions</div>".to_string()
        }
        SearchOutcome::NoMatches { query } => format!(
            "<div class=\"empty\">No results for &quot;{}&quot;</div>",
            escape_html(query)
        ),
        SearchOutcome::Hits(hits) => {
            let mut out = String::new();
            out.push_str("<div class=\"results\">");
            for hit in hits {
                out.push_str(&result_html(hit));
            }
            out.push_str("</div>");
            out
        }
    }
}

fn result_html(hit: &SearchHit) -> String {
    format!(
        concat!(
            "<div class=\"result\">",
            "<div class=\"result-meta\">",
            "<span class=\"result-file\">{file}</span>",
            "<span class=\"result-kind\">{kind}</span>",
            "</div>",
            "<div class=\"snippet\">{snippet}</div>",
            "</div>"
        ),
        file = escape_html(&hit.file),
        kind = escape_html(hit.kind.as_deref().unwrap_or("doc")),
        // already escaped and highlighted by the search layer
        snippet = hit.snippet_html,
    )
}

/// Keyword-derived description for jobs that don't carry one. Ordered;
/// first match wins, so overlapping keywords resolve the same way on every
/// render.
const KEYWORD_DESCRIPTIONS: &[(&str, &str)] = &[
    ("backup", "Creates a backup of agent state and workspace files."),
    ("sync", "Keeps a local copy in step with a remote source."),
    ("security", "Reviews recent changes for security problems."),
    ("digest", "Collects recent activity into a digest."),
    ("report", "Compiles and delivers a summary report."),
    ("clean", "Removes stale files and expired entries."),
    ("update", "Checks for and applies updates."),
    ("monitor", "Checks health and raises an alert when something is off."),
    ("remind", "Delivers a scheduled reminder."),
    ("mail", "Triages incoming mail."),
];

pub fn default_description(name: &str) -> &'static str {
    let lowered = name.to_lowercase();
    for (keyword, text) in KEYWORD_DESCRIPTIONS {
        if lowered.contains(keyword) {
            return text;
        }
    }
    "Scheduled automation task"
}

/// The full dashboard page: embedded styles and script, every view
/// pre-rendered so the page is also useful as a static snapshot.
pub fn page(data: &DashboardData, now_ms: i64, tz: Tz) -> String {
    let activity = activity_fragment(data, ActivityFilter::All, now_ms, tz);
    let window = calendar::window_for(None, now_ms, tz);
    let cal = calendar_fragment(&data.jobs, window, now_ms, tz);
    let search = search_fragment(&SearchOutcome::Prompt);

    format!(
        concat!(
            "<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n",
            "<title>clawboard</title>\n",
            "<style>{css}</style>\n",
            "</head>\n<body>\n",
            "<header><h1>clawboard</h1><span class=\"subtitle\">agent mission control</span></header>\n",
            "<nav class=\"tabs\">",
            "<button class=\"tab active\" data-tab=\"activity\">Activity</button>",
            "<button class=\"tab\" data-tab=\"calendar\">Calendar</button>",
            "<button class=\"tab\" data-tab=\"search\">Search</button>",
            "</nav>\n",
            "<main>\n",
            "<section id=\"panel-activity\" class=\"panel active\">",
            "<div class=\"filters\">",
            "<button class=\"filter active\" data-filter=\"all\">All</button>",
            "<button class=\"filter\" data-filter=\"tool\">Tools</button>",
            "<button class=\"filter\" data-filter=\"message\">Messages</button>",
            "<button class=\"filter\" data-filter=\"cron\">Cron</button>",
            "</div>",
            "<div id=\"activity-body\">{activity}</div>",
            "</section>\n",
            "<section id=\"panel-calendar\" class=\"panel\">",
            "<div id=\"calendar-body\">{calendar}</div>",
            "<div id=\"job-detail\"></div>",
            "</section>\n",
            "<section id=\"panel-search\" class=\"panel\">",
            "<input id=\"search-input\" type=\"search\" placeholder=\"Search memory, notes, sessions...\" autocomplete=\"off\">",
            "<div id=\"search-body\">{search}</div>",
            "</section>\n",
            "</main>\n",
            "<script>{js}</script>\n",
            "</body>\n</html>\n"
        ),
        css = assets::STYLES_CSS,
        activity = activity,
        calendar = cal,
        search = search,
        js = assets::PAGE_JS,
    )
}
