use std::{
    fs::{self, File, OpenOptions},
    io::Write,
    path::PathBuf,
    time::{SystemTime, UNIX_EPOCH},
};

use anyhow::{Context, Result};
use garage_door_monitor::StateChange;
use serde_json::json;

pub const LOG_JSON_ENV: &str = "DOOR_REPLAY_LOG_JSON_PATH";

/// Human-readable lines on stderr (stdout carries the status stream), plus an
/// optional JSON-lines copy.
pub struct Logger {
    json_file: Option<File>,
}

impl Logger {
    /// `--log-json` wins over the environment.
    pub fn from_args(path: Option<PathBuf>) -> Result<Self> {
        let path = path.or_else(|| std::env::var(LOG_JSON_ENV).ok().map(PathBuf::from));
        Self::new(path)
    }

    pub fn new(path: Option<PathBuf>) -> Result<Self> {
        let json_file = match path {
            Some(path) => {
                if let Some(parent) = path.parent() {
                    fs::create_dir_all(parent)?;
                }
                let file = OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .with_context(|| format!("failed to open log file {}", path.display()))?;
                Some(file)
            }
            None => None,
        };
        Ok(Self { json_file })
    }

    pub fn info(&mut self, message: impl AsRef<str>) {
        eprintln!("{}", message.as_ref());
        self.event("info", message.as_ref(), None);
    }

    pub fn warn(&mut self, message: impl AsRef<str>) {
        eprintln!("warning: {}", message.as_ref());
        self.event("warn", message.as_ref(), None);
    }

    pub fn transition(&mut self, change: &StateChange) {
        let message = format!(
            "{} ms: {:?} -> {:?} ({})",
            change.at_ms,
            change.from,
            change.to,
            change.cause.label()
        );
        eprintln!("{message}");
        self.event("info", &message, Some(change));
    }

    fn event(&mut self, level: &str, message: &str, change: Option<&StateChange>) {
        let Some(file) = &mut self.json_file else {
            return;
        };

        let ts_ms = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        let mut entry = json!({
            "ts_ms": ts_ms,
            "level": level,
            "msg": message,
        });
        if let Some(change) = change {
            entry["at_ms"] = json!(change.at_ms);
            entry["from_code"] = json!(change.from.as_u8());
            entry["to_code"] = json!(change.to.as_u8());
            entry["cause"] = json!(change.cause.label());
            entry["cause_code"] = json!(change.cause.as_u8());
        }

        let _ = writeln!(file, "{}", entry);
        let _ = file.flush();
    }
}
