use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::parser::ResearchResult;
use crate::prompt::PROMPT_VERSION;

pub const DEFAULT_LOG_PATH: &str = "data/search_log.jsonl";

/// One line in the search log. The `type` field discriminates the two
/// record shapes; unknown extra fields in old lines are ignored on read.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogEntry {
    Search(SearchRecord),
    Feedback(FeedbackRecord),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub prompt_version: String,
    #[serde(default)]
    pub model: String,
    pub narrative: String,
    pub extracted_name: Option<String>,
    pub confidence: Option<String>,
    #[serde(default)]
    pub links_found: Vec<String>,
    pub input_tokens: Option<u64>,
    pub output_tokens: Option<u64>,
}

impl SearchRecord {
    /// Stamp a new search event from a finished research result.
    pub fn new(narrative: &str, result: &ResearchResult, model: &str) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            prompt_version: PROMPT_VERSION.to_string(),
            model: model.to_string(),
            narrative: narrative.to_string(),
            extracted_name: result.name.clone(),
            confidence: result.confidence.clone(),
            links_found: result.platforms_found(),
            input_tokens: result.input_tokens,
            output_tokens: result.output_tokens,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedbackRecord {
    pub search_id: String,
    pub timestamp: DateTime<Utc>,
    pub correct: Verdict,
    #[serde(default)]
    pub comment: String,
}

impl FeedbackRecord {
    pub fn new(search_id: &str, correct: Verdict, comment: &str) -> Self {
        Self {
            search_id: search_id.to_string(),
            timestamp: Utc::now(),
            correct,
            comment: comment.to_string(),
        }
    }
}

/// Was the researched person the right one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Yes,
    Partial,
    No,
}

impl Verdict {
    pub fn badge(self) -> &'static str {
        match self {
            Verdict::Yes => "✓",
            Verdict::Partial => "~",
            Verdict::No => "✗",
        }
    }
}

/// Append-only newline-delimited JSON store with an injected file path.
/// Existing lines are never rewritten; there is no update or delete path.
pub struct SearchLog {
    path: PathBuf,
}

impl SearchLog {
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Serialize one record as a single JSON line and append it.
    pub fn append(&self, entry: &LogEntry) -> Result<()> {
        if let Some(dir) = self.path.parent() {
            if !dir.as_os_str().is_empty() {
                fs::create_dir_all(dir).with_context(|| {
                    format!("Failed to create log directory {}", dir.display())
                })?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open log file {}", self.path.display()))?;
        let line = serde_json::to_string(entry)?;
        writeln!(file, "{line}")
            .with_context(|| format!("Failed to append to log file {}", self.path.display()))?;
        Ok(())
    }

    /// Read every parseable record, in file order.
    ///
    /// Lines that are not valid records are skipped: a torn trailing write
    /// from an interrupted process must not poison the rest of the log.
    pub fn load_all(&self) -> Result<Vec<LogEntry>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read log file {}", self.path.display()))?;

        let mut entries = Vec::new();
        for line in contents.lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<LogEntry>(line) {
                Ok(entry) => entries.push(entry),
                Err(e) => debug!("Skipping malformed log line: {}", e),
            }
        }
        Ok(entries)
    }
}
