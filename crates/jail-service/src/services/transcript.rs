//! Purge transcripts
//!
//! Messages removed when a member is jailed are written to
//! `<member-id>_purged_messages_<unix-timestamp>.txt` in the transcript
//! directory. Writes run on the blocking pool behind a semaphore; the
//! retention sweep deletes files past the retention window.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use jail_common::TranscriptConfig;
use jail_core::{Message, MessageAttachment, Snowflake};
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::error::{ServiceError, ServiceResult};

const FILE_MARKER: &str = "_purged_messages";

/// A transcript written to disk
#[derive(Debug, Clone)]
pub struct Transcript {
    pub member_id: Snowflake,
    pub path: PathBuf,
    pub contents: String,
    pub message_count: usize,
}

impl Transcript {
    /// File attached to the jail log entry
    pub fn attachment(&self) -> MessageAttachment {
        MessageAttachment::new(
            format!("{}{FILE_MARKER}.txt", self.member_id),
            self.contents.as_bytes().to_vec(),
        )
    }
}

/// Outcome of one retention sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SweepReport {
    pub removed: usize,
    pub kept: usize,
    pub failed: usize,
}

/// Transcript directory with bounded concurrent writers
#[derive(Debug)]
pub struct TranscriptStore {
    dir: PathBuf,
    retention: Duration,
    writes: Arc<Semaphore>,
}

impl TranscriptStore {
    pub fn new(config: &TranscriptConfig) -> Self {
        Self {
            dir: config.dir.clone(),
            retention: Duration::days(config.retention_days),
            writes: Arc::new(Semaphore::new(config.write_concurrency.max(1))),
        }
    }

    /// Directory holding transcripts
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Files older than this are swept
    pub fn retention(&self) -> Duration {
        self.retention
    }

    /// Write captured messages for a member
    ///
    /// Returns `None` without touching the disk when nothing was captured.
    #[instrument(skip(self, messages), fields(count = messages.len()))]
    pub async fn write(
        &self,
        member_id: Snowflake,
        messages: &[Message],
        now: DateTime<Utc>,
    ) -> ServiceResult<Option<Transcript>> {
        if messages.is_empty() {
            return Ok(None);
        }

        let contents = format_transcript(messages);
        let path = self.dir.join(transcript_file_name(member_id, now));

        let _permit = self
            .writes
            .acquire()
            .await
            .map_err(|_| ServiceError::internal("transcript writer closed"))?;

        let dir = self.dir.clone();
        let target = path.clone();
        let data = contents.clone();
        tokio::task::spawn_blocking(move || -> io::Result<()> {
            fs::create_dir_all(&dir)?;
            fs::write(&target, data.as_bytes())
        })
        .await
        .map_err(|e| ServiceError::internal(format!("transcript write task failed: {e}")))??;

        info!(member_id = %member_id, path = %path.display(), "Transcript written");

        Ok(Some(Transcript {
            member_id,
            path,
            contents,
            message_count: messages.len(),
        }))
    }

    /// Delete transcripts created before `now - retention`
    #[instrument(skip(self))]
    pub async fn sweep_expired(&self, now: DateTime<Utc>) -> ServiceResult<SweepReport> {
        let dir = self.dir.clone();
        let cutoff = now - self.retention;
        let report = tokio::task::spawn_blocking(move || sweep_dir(&dir, cutoff))
            .await
            .map_err(|e| ServiceError::internal(format!("retention sweep task failed: {e}")))??;

        if report.removed > 0 || report.failed > 0 {
            info!(
                removed = report.removed,
                kept = report.kept,
                failed = report.failed,
                "Transcript retention sweep finished"
            );
        }
        Ok(report)
    }
}

/// File name for a transcript written at `at`
pub fn transcript_file_name(member_id: Snowflake, at: DateTime<Utc>) -> String {
    format!("{member_id}{FILE_MARKER}_{}.txt", at.timestamp())
}

/// Creation time embedded in a transcript file name
pub fn file_timestamp(file_name: &str) -> Option<DateTime<Utc>> {
    let stem = file_name.strip_suffix(".txt")?;
    let (_, rest) = stem.split_once(FILE_MARKER)?;
    let secs: i64 = rest.strip_prefix('_')?.parse().ok()?;
    DateTime::from_timestamp(secs, 0)
}

/// One line per message: `[timestamp] author (id): content`
pub fn format_transcript(messages: &[Message]) -> String {
    let mut out = String::new();
    for message in messages {
        let _ = writeln!(
            out,
            "[{}] {} ({}): {}",
            message.created_at.format("%Y-%m-%d %H:%M:%S UTC"),
            message.author_name,
            message.author_id,
            message.content
        );
    }
    out
}

fn sweep_dir(dir: &Path, cutoff: DateTime<Utc>) -> io::Result<SweepReport> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(SweepReport::default()),
        Err(e) => return Err(e),
    };
    Ok(sweep_paths(entries.map(|entry| entry.map(|e| e.path())), cutoff))
}

/// A bad entry is counted in `failed` and never stops the sweep
fn sweep_paths(paths: impl IntoIterator<Item = io::Result<PathBuf>>, cutoff: DateTime<Utc>) -> SweepReport {
    let mut report = SweepReport::default();

    for path in paths {
        let path = match path {
            Ok(path) => path,
            Err(e) => {
                warn!(error = %e, "Unreadable entry in transcript directory");
                report.failed += 1;
                continue;
            }
        };
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else { continue };
        if !name.contains(FILE_MARKER) {
            continue;
        }

        let metadata = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata,
            Err(e) => {
                warn!(file = name, error = %e, "Cannot inspect transcript");
                report.failed += 1;
                continue;
            }
        };
        if !metadata.is_file() {
            continue;
        }

        let created = match file_timestamp(name) {
            Some(at) => at,
            None => match metadata.modified() {
                Ok(modified) => DateTime::<Utc>::from(modified),
                Err(e) => {
                    warn!(file = name, error = %e, "Cannot determine transcript age");
                    report.failed += 1;
                    continue;
                }
            },
        };

        if created >= cutoff {
            report.kept += 1;
            continue;
        }

        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(file = name, "Expired transcript removed");
                report.removed += 1;
            }
            Err(e) => {
                warn!(file = name, error = %e, "Failed to remove expired transcript");
                report.failed += 1;
            }
        }
    }

    report
}
