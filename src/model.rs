use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActivityKind {
    Tool,
    Message,
    Cron,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::Tool => "tool",
            ActivityKind::Message => "message",
            ActivityKind::Cron => "cron",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub timestamp: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub content: String,
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActivityFilter {
    #[default]
    All,
    Tool,
    Message,
    Cron,
}

impl ActivityFilter {
    pub fn from_query(raw: &str) -> Self {
        match raw {
            "tool" => ActivityFilter::Tool,
            "message" => ActivityFilter::Message,
            "cron" => ActivityFilter::Cron,
            _ => ActivityFilter::All,
        }
    }

    pub fn accepts(&self, kind: ActivityKind) -> bool {
        match self {
            ActivityFilter::All => true,
            ActivityFilter::Tool => kind == ActivityKind::Tool,
            ActivityFilter::Message => kind == ActivityKind::Message,
            ActivityFilter::Cron => kind == ActivityKind::Cron,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityFilter::All => "all",
            ActivityFilter::Tool => "tool",
            ActivityFilter::Message => "message",
            ActivityFilter::Cron => "cron",
        }
    }
}

/// Job schedule. Upstream data carries either a structured object
/// (`{kind: "cron" | "every" | "at", ...}`) or a legacy encoded string
/// ("cron 0 9 * * *", "every 2h", "at 2026-03-01T09:00:00Z"); both land in
/// one tagged union so downstream handling is exhaustive.
#[derive(Debug, Clone, PartialEq)]
pub enum Schedule {
    Every { every_ms: i64 },
    At { at_ms: Option<i64> },
    Cron { expr: String, timezone: Option<String> },
    /// Structured value with an unrecognized kind, kept verbatim.
    Other(Value),
    /// Legacy encoded string, kept verbatim.
    Legacy(String),
}

impl Schedule {
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::Null => None,
            Value::String(raw) => {
                let trimmed = raw.trim();
                if trimmed.is_empty() {
                    None
                } else {
                    Some(Schedule::Legacy(trimmed.to_string()))
                }
            }
            Value::Object(obj) => {
                let kind = obj.get("kind").and_then(|v| v.as_str()).unwrap_or("cron");
                match kind {
                    "every" => obj
                        .get("everyMs")
                        .or_else(|| obj.get("every_ms"))
                        .and_then(|v| v.as_i64())
                        .map(|every_ms| Schedule::Every { every_ms })
                        .or_else(|| Some(Schedule::Other(value.clone()))),
                    "at" => {
                        let at_ms = obj
                            .get("atMs")
                            .or_else(|| obj.get("at_ms"))
                            .and_then(|v| v.as_i64())
                            .or_else(|| {
                                obj.get("at")
                                    .and_then(|v| v.as_str())
                                    .and_then(|raw| {
                                        chrono::DateTime::parse_from_rfc3339(raw).ok()
                                    })
                                    .map(|dt| dt.timestamp_millis())
                            });
                        Some(Schedule::At { at_ms })
                    }
                    "cron" => {
                        let timezone = obj
                            .get("timezone")
                            .or_else(|| obj.get("tz"))
                            .or_else(|| obj.get("timeZone"))
                            .and_then(|v| v.as_str())
                            .map(|s| s.to_string());
                        obj.get("cron")
                            .or_else(|| obj.get("expr"))
                            .and_then(|v| v.as_str())
                            .map(|expr| Schedule::Cron {
                                expr: expr.to_string(),
                                timezone,
                            })
                            .or_else(|| Some(Schedule::Other(value.clone())))
                    }
                    _ => Some(Schedule::Other(value.clone())),
                }
            }
            other => Some(Schedule::Other(other.clone())),
        }
    }

    /// Calendar "recurring" tag: structured cron/every schedules, or legacy
    /// strings with the literal "cron" prefix. Legacy "every ..." strings are
    /// deliberately not tagged (upstream behavior).
    pub fn is_recurring(&self) -> bool {
        match self {
            Schedule::Every { .. } | Schedule::Cron { .. } => true,
            Schedule::Legacy(raw) => raw.starts_with("cron"),
            Schedule::At { .. } | Schedule::Other(_) => false,
        }
    }
}

fn de_schedule<'de, D>(deserializer: D) -> Result<Option<Schedule>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(Schedule::from_value(&value))
}

#[derive(Debug, Clone, Deserialize)]
pub struct CronJob {
    /// Empty when the record carried none; the loader synthesizes one.
    #[serde(default)]
    pub id: String,
    #[serde(default = "default_job_name")]
    pub name: String,
    #[serde(default, deserialize_with = "de_schedule")]
    pub schedule: Option<Schedule>,
    #[serde(default, alias = "nextRuns")]
    pub next_runs: Vec<String>,
    #[serde(default, alias = "lastRun")]
    pub last_run: Option<String>,
    #[serde(default)]
    pub model: Option<String>,
    #[serde(default)]
    pub script: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

fn default_job_name() -> String {
    "Unnamed".to_string()
}

impl CronJob {
    /// Short handler label: the part of `model` after the final '/'.
    pub fn handler_label(&self) -> Option<&str> {
        self.model
            .as_deref()
            .map(|model| model.rsplit('/').next().unwrap_or(model))
    }

    pub fn is_recurring(&self) -> bool {
        self.schedule
            .as_ref()
            .map(Schedule::is_recurring)
            .unwrap_or(false)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SearchDoc {
    pub file: String,
    /// "memory" | "notes" | "session" upstream; treated as an open set.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
    pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    Loaded,
    Failed(String),
}

/// Everything the rendering layer works from. Built once per load; the
/// views never mutate it.
#[derive(Debug, Clone)]
pub struct DashboardData {
    pub activity: Vec<ActivityEntry>,
    pub jobs: Vec<CronJob>,
    pub search: Vec<SearchDoc>,
    pub state: LoadState,
}

impl DashboardData {
    pub fn empty() -> Self {
        Self {
            activity: Vec::new(),
            jobs: Vec::new(),
            search: Vec::new(),
            state: LoadState::Loaded,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            activity: Vec::new(),
            jobs: Vec::new(),
            search: Vec::new(),
            state: LoadState::Failed(message.into()),
        }
    }

    pub fn job(&self, id: &str) -> Option<&CronJob> {
        self.jobs.iter().find(|job| job.id == id)
    }
}
