use chrono::{DateTime, Duration, Utc};
use fs_err as fs;
use std::io::Write;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::presence::Transition;

/// One completed session, persisted exactly once per detected logout.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionRecord {
    pub subject_id: String,
    pub login_at: Option<DateTime<Utc>>,
    pub logout_at: DateTime<Utc>,
    pub duration_seconds: Option<i64>,
    pub unknown_start: bool,
    pub recorded_at: DateTime<Utc>,
}

pub trait SessionStore {
    fn record(&self, record: &SessionRecord) -> Result<(), String>;
}

/// Append-only text log carrying the operator-facing status blocks.
pub struct LogSink {
    path: PathBuf,
}

impl LogSink {
    pub fn new(path: PathBuf) -> Result<Self, String> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .map_err(|err| format!("Failed to create session log directory: {}", err))?;
        }
        // An unwritable path should fail at startup, not on the first logout.
        fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&path)
            .map_err(|err| format!("Failed to open session log: {}", err))?;
        Ok(Self { path })
    }

    fn append(&self, block: &str) -> Result<(), String> {
        let mut file = fs::OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)
            .map_err(|err| format!("Failed to open session log: {}", err))?;
        file.write_all(block.as_bytes())
            .and_then(|_| file.write_all(b"\n"))
            .map_err(|err| format!("Failed to append session log entry: {}", err))
    }
}

pub struct Recorder<S> {
    subject_id: String,
    store: S,
    sink: LogSink,
}

impl<S: SessionStore> Recorder<S> {
    pub fn new(subject_id: String, store: S, sink: LogSink) -> Self {
        Self {
            subject_id,
            store,
            sink,
        }
    }

    /// Persists logouts and appends the status block for every transition.
    ///
    /// The durable write and the log append are independent side effects;
    /// either failure is logged and swallowed so the polling loop keeps
    /// observing, and so an operator can reconcile from the surviving copy.
    pub fn record(&self, transition: &Transition) {
        match transition {
            Transition::Login { at } => {
                info!(
                    subject = %self.subject_id,
                    at = %at.to_rfc3339(),
                    "Subject logged in"
                );
            }
            Transition::Logout {
                at,
                duration,
                unknown_start,
            } => {
                let record =
                    build_record(&self.subject_id, *at, *duration, *unknown_start, Utc::now());
                info!(
                    subject = %self.subject_id,
                    at = %at.to_rfc3339(),
                    duration_seconds = ?record.duration_seconds,
                    unknown_start = *unknown_start,
                    "Subject logged out"
                );
                if let Err(err) = self.store.record(&record) {
                    warn!(error = %err, "Failed to persist session record");
                }
            }
        }

        if let Err(err) = self.sink.append(&format_transition(transition)) {
            warn!(error = %err, "Failed to append session log entry");
        }
    }
}

fn build_record(
    subject_id: &str,
    logout_at: DateTime<Utc>,
    duration: Option<Duration>,
    unknown_start: bool,
    recorded_at: DateTime<Utc>,
) -> SessionRecord {
    SessionRecord {
        subject_id: subject_id.to_string(),
        login_at: duration.map(|value| logout_at - value),
        logout_at,
        duration_seconds: duration.map(|value| value.num_seconds()),
        unknown_start,
        recorded_at,
    }
}

fn format_transition(transition: &Transition) -> String {
    match transition {
        Transition::Login { at } => format!("[{}] Logged in.", render_timestamp(*at)),
        Transition::Logout {
            at,
            duration,
            unknown_start,
        } => {
            let length = match duration {
                Some(value) => render_duration(*value),
                None => "Unknown".to_string(),
            };
            let mut block = format!(
                "[{}] Logged out.\nSession length: {}",
                render_timestamp(*at),
                length
            );
            if *unknown_start {
                block.push_str("\n!!Unknown Start Time!!");
            }
            block
        }
    }
}

fn render_timestamp(at: DateTime<Utc>) -> String {
    at.format("%Y-%m-%d %H:%M:%S").to_string()
}

// Whole-second H:MM:SS, hours unpadded.
fn render_duration(duration: Duration) -> String {
    let total = duration.num_seconds().max(0);
    format!("{}:{:02}:{:02}", total / 3600, (total % 3600) / 60, total % 60)
}
