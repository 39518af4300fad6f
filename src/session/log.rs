// ABOUTME: JSONL transcript — appends every message the session consumes to a log file.
// ABOUTME: Stores transcripts per workspace in ~/.clawpost/sessions/<workspace_hash>/.

use std::fs::{self, File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::config::Config;
use crate::message::OutgoingMessage;

/// A single JSONL line: when the message was consumed and what it was.
#[derive(Debug, Serialize, Deserialize)]
pub struct LogEntry {
    pub timestamp: String,
    pub message: OutgoingMessage,
}

/// First 16 hex chars of the SHA-256 of the workspace path.
///
/// Stable across toolchains, so a workspace keeps its transcript directory.
pub fn workspace_hash(workspace_dir: &Path) -> String {
    let mut hasher = Sha256::new();
    hasher.update(workspace_dir.to_string_lossy().as_bytes());
    let digest = format!("{:x}", hasher.finalize());
    digest[..16].to_string()
}

fn next_log_path(session_dir: &Path) -> PathBuf {
    let timestamp = Utc::now().format("%Y-%m-%dT%H-%M-%S").to_string();
    let mut log_path = session_dir.join(format!("{}.jsonl", timestamp));
    let mut suffix = 1;
    while log_path.exists() {
        log_path = session_dir.join(format!("{}-{}.jsonl", timestamp, suffix));
        suffix += 1;
    }
    log_path
}

/// Appends consumed messages as JSONL lines to a transcript file.
///
/// The file is created on the first logged message, so a session that
/// never consumes anything leaves nothing on disk.
pub struct SessionLogger {
    writer: Option<BufWriter<File>>,
    pub session_dir: PathBuf,
    pub log_path: PathBuf,
}

impl SessionLogger {
    /// Transcript for the given workspace under the default sessions dir.
    pub fn new(workspace_dir: &Path) -> Self {
        let session_dir = Config::sessions_dir().join(workspace_hash(workspace_dir));
        Self::new_in_dir(&session_dir)
    }

    /// Transcript in a specific directory.
    ///
    /// The file is named after the current time; a numeric suffix keeps
    /// transcripts opened within the same second apart.
    pub fn new_in_dir(session_dir: &Path) -> Self {
        Self {
            writer: None,
            session_dir: session_dir.to_path_buf(),
            log_path: next_log_path(session_dir),
        }
    }

    /// Start a fresh transcript file in the same directory.
    ///
    /// On error the current transcript stays in use.
    pub fn rotate(&mut self) -> anyhow::Result<()> {
        if let Some(writer) = self.writer.as_mut() {
            writer.flush()?;
        }
        fs::create_dir_all(&self.session_dir)?;
        self.writer = None;
        self.log_path = next_log_path(&self.session_dir);
        Ok(())
    }

    fn open(&self) -> anyhow::Result<BufWriter<File>> {
        fs::create_dir_all(&self.session_dir)?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)?;
        Ok(BufWriter::new(file))
    }

    /// Append a message to the transcript.
    pub fn log_message(&mut self, msg: &OutgoingMessage) -> anyhow::Result<()> {
        let entry = LogEntry {
            timestamp: Utc::now().to_rfc3339(),
            message: msg.clone(),
        };
        let line = serde_json::to_string(&entry)?;

        let writer = match self.writer.take() {
            Some(writer) => writer,
            None => self.open()?,
        };
        let writer = self.writer.insert(writer);
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

/// Read every entry of a transcript file.
pub fn read_transcript(path: &Path) -> anyhow::Result<Vec<LogEntry>> {
    let content = fs::read_to_string(path)?;
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| Ok(serde_json::from_str(line)?))
        .collect()
}
