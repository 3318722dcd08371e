use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;

/// One logged request. Written as a single JSON line, never read back here.
#[derive(Debug, Serialize)]
pub struct LogEntry {
    pub timestamp: DateTime<Utc>,
    pub ip: String,
    pub method: String,
    pub uri: String,
    pub user_agent: String,
}

impl LogEntry {
    pub fn new(ip: String, method: String, uri: String, user_agent: String) -> Self {
        Self {
            timestamp: Utc::now(),
            ip,
            method,
            uri,
            user_agent,
        }
    }
}

/// Append-only request log sink.
///
/// Best effort by contract: a failed append is traced and swallowed, it never
/// aborts the request being served. The mutex keeps each entry a single
/// uninterleaved line under concurrent requests.
pub struct RequestLogger {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl RequestLogger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub async fn log(&self, entry: &LogEntry) {
        if let Err(e) = self.append(entry).await {
            tracing::warn!("request log append failed: {}", e);
        }
    }

    async fn append(&self, entry: &LogEntry) -> std::io::Result<()> {
        let mut line = serde_json::to_string(entry)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        line.push('\n');

        let _guard = self.write_lock.lock().await;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        let mut file = tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(line.as_bytes()).await?;
        file.flush().await
    }
}
