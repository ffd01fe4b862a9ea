//! Identity of a single backup run.

use std::path::{Path, PathBuf};

use jiff::Zoned;

/// Timestamp layout shared by every object key of a run.
const KEY_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H%M%S";

/// Run identity captured once at startup.
///
/// Every key and path derived here embeds the same timestamp token, so the
/// archive and logs of one run always sort together in the bucket.
#[derive(Debug, Clone)]
pub struct RunContext {
    started_at: Zoned,
    archive_key: String,
    logs_key: String,
    archive_path: PathBuf,
}

impl RunContext {
    /// Starts a run now, in the system time zone.
    pub fn new(temp_dir: impl AsRef<Path>) -> Self {
        Self::at(Zoned::now(), temp_dir)
    }

    /// Starts a run at a fixed instant.
    pub fn at(started_at: Zoned, temp_dir: impl AsRef<Path>) -> Self {
        let token = started_at.strftime(KEY_TIMESTAMP_FORMAT).to_string();
        let archive_key = format!("dump.{token}.archive");
        let logs_key = format!("dump.{token}.logs");
        let archive_path = temp_dir.as_ref().join(&archive_key);

        Self {
            started_at,
            archive_key,
            logs_key,
            archive_path,
        }
    }

    pub fn started_at(&self) -> &Zoned {
        &self.started_at
    }

    /// Object key of the dump archive.
    pub fn archive_key(&self) -> &str {
        &self.archive_key
    }

    /// Object key of the captured dump output.
    pub fn logs_key(&self) -> &str {
        &self.logs_key
    }

    /// Local path the dump tool writes the archive to.
    pub fn archive_path(&self) -> &Path {
        &self.archive_path
    }

    /// Whole seconds between the start of the run and `now`.
    pub fn elapsed_secs(&self, now: &Zoned) -> i64 {
        now.timestamp()
            .duration_since(self.started_at.timestamp())
            .as_secs()
            .max(0)
    }
}

/// Formats the wall-clock time of `at` as `HH:MM:SS`.
pub(crate) fn clock(at: &Zoned) -> String {
    at.strftime("%H:%M:%S").to_string()
}
