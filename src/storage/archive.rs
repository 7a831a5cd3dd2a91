//! JSONL archive of approved drafts.
//!
//! Append-only, one JSON object per line. Corrupt lines are skipped on read
//! so a damaged archive never blocks new approvals.

use std::fs::{self, File, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::domain::RunReport;
use crate::error::Result;
use crate::id::generate_draft_id;

/// One archived draft
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DraftRecord {
    pub id: String,
    pub topic: String,
    pub draft: String,
    pub rounds: u32,
    pub input_tokens: u64,
    pub output_tokens: u64,
    /// RFC 3339 timestamp of when the draft was approved
    pub created_at: String,
}

impl DraftRecord {
    /// Build an archive record from a completed run
    pub fn from_report(report: &RunReport) -> Self {
        Self {
            id: generate_draft_id(),
            topic: report.history.topic().to_string(),
            draft: report.draft.clone(),
            rounds: report.rounds,
            input_tokens: report.usage.input_tokens,
            output_tokens: report.usage.output_tokens,
            created_at: Utc::now().to_rfc3339(),
        }
    }
}

/// Append-only archive of approved drafts
pub struct DraftArchive {
    path: PathBuf,
}

impl DraftArchive {
    /// Open or create an archive in the given directory
    pub fn new(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir)?;
        Ok(Self {
            path: dir.join("drafts.jsonl"),
        })
    }

    /// Path of the underlying JSONL file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record to the archive
    pub fn append(&self, record: &DraftRecord) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", serde_json::to_string(record)?)?;
        Ok(())
    }

    /// Read all records in insertion order, skipping corrupt lines
    pub fn list(&self) -> Result<Vec<DraftRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)?;
        let reader = BufReader::new(file);

        let mut records = Vec::new();
        for line in reader.lines() {
            let line = line?;
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<DraftRecord>(&line) {
                Ok(record) => records.push(record),
                Err(e) => warn!("Skipping corrupt archive line: {}", e),
            }
        }
        Ok(records)
    }

    /// The most recently archived record
    pub fn latest(&self) -> Result<Option<DraftRecord>> {
        Ok(self.list()?.pop())
    }
}
