//! Rotating file adapter
//!
//! Appends timestamped log lines to a single file and rotates it by size
//! and/or by calendar day. A rotation archives the active file under
//! `<stem>-<YYYY-MM-DD><ext>` and reopens a fresh file at the original path.
//! An occupied archive name aborts the rotation: the adapter never
//! overwrites an archive, it keeps appending to the over-limit file instead.

use crate::core::adapter::Adapter;
use crate::core::error::{LogError, Result};
use crate::core::level::Level;
use chrono::{Datelike, Duration, Local, NaiveDate};
use parking_lot::Mutex;
use serde::Deserialize;
use std::fmt::Write as _;
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::atomic::{AtomicU32, AtomicU64, Ordering};

/// Parsed `init` configuration. Unknown keys are ignored; every key except
/// `filename` has a default.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct FileConfig {
    filename: String,
    maxsize: u64,
    daily: bool,
    maxdays: i64,
    rotate: bool,
    #[serde(deserialize_with = "deserialize_perm")]
    perm: u32,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            filename: String::new(),
            maxsize: 1 << 30,
            daily: true,
            maxdays: 0,
            rotate: true,
            perm: 0o660,
        }
    }
}

/// Accept the file mode as a number (`416`) or an octal string (`"0640"`).
fn deserialize_perm<'de, D>(deserializer: D) -> std::result::Result<u32, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::de::Error as _;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Octal(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Number(mode) => Ok(mode),
        Raw::Octal(text) => u32::from_str_radix(text.trim_start_matches("0o"), 8)
            .map_err(|e| D::Error::custom(format!("invalid perm {text:?}: {e}"))),
    }
}

/// Size- and day-rotating file sink, registered in the shared registry under
/// the name `"file"`.
///
/// Internally thread-safe: the handle mutex covers rotation and the
/// write-plus-size update, while `written` and `open_day` are atomics so the
/// optimistic rotation check stays lock-free.
pub struct FileAdapter {
    config: FileConfig,
    handle: Mutex<Option<File>>,
    /// Bytes appended since the file was last (re)opened. Seeded from the
    /// existing file size on open, reset by rotation.
    written: AtomicU64,
    /// Local day-of-month at last (re)open; changes only on rotation or open.
    open_day: AtomicU32,
}

impl FileAdapter {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: FileConfig::default(),
            handle: Mutex::new(None),
            written: AtomicU64::new(0),
            open_day: AtomicU32::new(0),
        }
    }

    /// Configured retention in days. Parsed for config compatibility but not
    /// enforced: archives are never pruned, because silently deleting files
    /// would conflict with the never-overwrite archive policy.
    #[must_use]
    pub fn max_days(&self) -> i64 {
        self.config.maxdays
    }

    fn need_rotate(&self, day: u32) -> bool {
        (self.config.maxsize > 0 && self.written.load(Ordering::Relaxed) >= self.config.maxsize)
            || (self.config.daily && day != self.open_day.load(Ordering::Relaxed))
    }

    /// Open (or reopen) the active file at the configured path, seed
    /// `written` from its current size and stamp `open_day` with today.
    fn open_active(&self, slot: &mut Option<File>) -> Result<()> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.config.filename)
            .map_err(|e| {
                LogError::file(&self.config.filename, format!("failed to open: {e}"))
            })?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(self.config.perm))
                .map_err(|e| {
                    LogError::file(&self.config.filename, format!("failed to chmod: {e}"))
                })?;
        }

        let metadata = file.metadata().map_err(|e| {
            LogError::file(&self.config.filename, format!("cannot stat: {e}"))
        })?;
        self.written.store(metadata.len(), Ordering::Relaxed);
        self.open_day.store(Local::now().day(), Ordering::Relaxed);
        *slot = Some(file);
        Ok(())
    }

    /// Archive the active file and reopen a fresh one. Caller holds the
    /// handle lock and has already re-confirmed `need_rotate`.
    fn rotate(&self, handle: &mut Option<File>) -> Result<()> {
        let filename = &self.config.filename;
        if fs::symlink_metadata(filename).is_err() {
            return Err(LogError::rotation(filename, "active log file no longer exists"));
        }

        let yesterday = (Local::now() - Duration::days(1)).date_naive();
        let archived = archived_name(filename, yesterday);
        if Path::new(&archived).exists() {
            // Never overwrite an archive. The active file stays open and
            // keeps growing until the conflict is resolved externally.
            return Err(LogError::rotation(
                filename,
                format!("cannot rename onto existing archive '{archived}'"),
            ));
        }

        // Close before rename. The reopen below is attempted even when the
        // rename failed, so the adapter can always accept further writes.
        handle.take();
        let rename_err = fs::rename(filename, &archived).err();
        let reopen_err = self.open_active(handle).err();

        match (rename_err, reopen_err) {
            (None, None) => Ok(()),
            (Some(e), None) => Err(LogError::rotation(
                filename,
                format!("rename to '{archived}' failed: {e}"),
            )),
            (None, Some(e)) => Err(LogError::rotation(filename, format!("reopen failed: {e}"))),
            (Some(rename), Some(reopen)) => Err(LogError::rotation(
                filename,
                format!("rename to '{archived}' failed: {rename}; reopen failed: {reopen}"),
            )),
        }
    }

    #[cfg(test)]
    fn inject_open_day(&self, day: u32) {
        self.open_day.store(day, Ordering::Relaxed);
    }
}

impl Default for FileAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl Adapter for FileAdapter {
    fn init(&mut self, config: &str) -> Result<()> {
        let parsed: FileConfig = serde_json::from_str(config)?;
        if parsed.filename.is_empty() {
            return Err(LogError::config("file", "config must have filename"));
        }
        self.config = parsed;
        let mut handle = self.handle.lock();
        self.open_active(&mut handle)
    }

    fn write_msg(&self, text: &str, _level: Level) -> Result<()> {
        let now = Local::now();
        // 2016/01/12 21:34:33<TAB>message<LF>
        let mut line = String::with_capacity(20 + text.len() + 1);
        let _ = write!(line, "{}\t{}", now.format("%Y/%m/%d %H:%M:%S"), text);
        line.push('\n');

        let day = now.day();
        if self.config.rotate && self.need_rotate(day) {
            let mut handle = self.handle.lock();
            // Re-check under the lock: another writer may have rotated
            // between the optimistic check and the acquisition.
            if self.need_rotate(day) {
                if let Err(e) = self.rotate(&mut handle) {
                    eprintln!("logpipe: FileAdapter({:?}): {}", self.config.filename, e);
                }
            }
        }

        let mut handle = self.handle.lock();
        match handle.as_mut() {
            Some(file) => {
                file.write_all(line.as_bytes()).map_err(|e| {
                    LogError::file(&self.config.filename, format!("write failed: {e}"))
                })?;
                self.written.fetch_add(line.len() as u64, Ordering::Relaxed);
                Ok(())
            }
            None => Err(LogError::file(&self.config.filename, "file is not open")),
        }
    }

    /// Sync file contents to stable storage, not merely the OS cache.
    fn flush(&self) {
        let handle = self.handle.lock();
        if let Some(file) = handle.as_ref() {
            if let Err(e) = file.sync_all() {
                eprintln!(
                    "logpipe: FileAdapter({:?}): sync failed: {}",
                    self.config.filename, e
                );
            }
        }
    }

    fn destroy(&self) {
        // Dropping the handle closes the file; a second call is a no-op.
        self.handle.lock().take();
    }
}

/// Insert `-<date>` before the extension; files without an extension archive
/// as `.log`.
fn archived_name(filename: &str, date: NaiveDate) -> String {
    let suffix = Path::new(filename)
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy()))
        .unwrap_or_default();
    let stem = filename.strip_suffix(suffix.as_str()).unwrap_or(filename);
    let suffix = if suffix.is_empty() {
        ".log".to_string()
    } else {
        suffix
    };
    format!("{}-{}{}", stem, date.format("%Y-%m-%d"), suffix)
}
