//! Append-only diagnostic file log.
//!
//! A deliberately small troubleshooting aid: timestamped lines appended to a
//! fixed file under the OS temp directory, gated by an activation flag that
//! defaults to off.  The log is an explicit handle passed to whoever wants to
//! trace, never a process global.
//!
//! Failure policy: a write that fails is dropped (the caller's work must
//! never stall on tracing).  Failing to create the log directory is treated
//! as unrecoverable for the log subsystem — the handle disables itself — but
//! still never reaches the caller through [`DiagnosticLog::note`].

use std::fmt;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Local;

/// Directory under the OS temp dir that holds the log file.
const LOG_DIR_NAME: &str = "twofa-companion";

/// File name of the diagnostic log.
const LOG_FILE_NAME: &str = "log.txt";

// ─── Error type ─────────────────────────────────────────────────────────────

/// Why a diagnostic write failed.
#[derive(Debug)]
pub enum DiagnosticError {
    /// The log directory could not be created.  The handle has disabled
    /// itself; subsequent appends are no-ops.
    DirectoryCreation(std::io::Error),
    /// Appending to the log file failed.  Transient; the line is lost.
    Write(std::io::Error),
}

impl fmt::Display for DiagnosticError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DirectoryCreation(e) => {
                write!(f, "could not create log directory: {}", e)
            }
            Self::Write(e) => write!(f, "could not append to log file: {}", e),
        }
    }
}

impl From<DiagnosticError> for String {
    fn from(e: DiagnosticError) -> String {
        e.to_string()
    }
}

// ─── Log handle ─────────────────────────────────────────────────────────────

/// Handle to the append-only diagnostic log.
///
/// Cheap to share behind an `Arc`; the activation flag is atomic so the
/// handle can be toggled through a shared reference.
#[derive(Debug)]
pub struct DiagnosticLog {
    path: PathBuf,
    enabled: AtomicBool,
}

impl DiagnosticLog {
    /// Create a handle writing to `path`.  Nothing touches the filesystem
    /// until the first enabled append.
    pub fn new(path: impl Into<PathBuf>, enabled: bool) -> Self {
        Self {
            path: path.into(),
            enabled: AtomicBool::new(enabled),
        }
    }

    /// Create a handle at [`DiagnosticLog::default_path`].
    pub fn at_default_path(enabled: bool) -> Self {
        Self::new(Self::default_path(), enabled)
    }

    /// The fixed default location: `<temp>/twofa-companion/log.txt`.
    pub fn default_path() -> PathBuf {
        std::env::temp_dir().join(LOG_DIR_NAME).join(LOG_FILE_NAME)
    }

    /// Path this handle appends to.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Whether appends currently write anything.
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(Ordering::Relaxed)
    }

    /// Toggle the activation flag.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, Ordering::Relaxed);
    }

    /// Append one timestamped line.  No-op while disabled.
    ///
    /// Blank messages are written as an empty timestamped line rather than
    /// rejected, so call sites never have to pre-validate.
    pub fn append(&self, message: &str) -> Result<(), DiagnosticError> {
        if !self.is_enabled() {
            return Ok(());
        }

        if let Some(dir) = self.path.parent() {
            if !dir.exists() {
                if let Err(e) = fs::create_dir_all(dir) {
                    // Unrecoverable for the log subsystem only.
                    self.set_enabled(false);
                    return Err(DiagnosticError::DirectoryCreation(e));
                }
            }
        }

        let line = format!(
            "[{}] {}\n",
            Local::now().format("%Y-%m-%d %H:%M:%S"),
            message.trim()
        );
        OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .and_then(|mut file| file.write_all(line.as_bytes()))
            .map_err(DiagnosticError::Write)
    }

    /// Best-effort append: failures are routed to the `log` facade and
    /// swallowed.  This is the entry point business code should use.
    pub fn note(&self, message: &str) {
        match self.append(message) {
            Ok(()) => {}
            Err(e @ DiagnosticError::DirectoryCreation(_)) => {
                log::warn!("diagnostic log disabled: {}", e);
            }
            Err(e @ DiagnosticError::Write(_)) => {
                log::debug!("diagnostic log line dropped: {}", e);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read_log(log: &DiagnosticLog) -> String {
        fs::read_to_string(log.path()).unwrap_or_default()
    }

    // ── Activation flag ─────────────────────────────────────────────

    #[test]
    fn disabled_log_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let log = DiagnosticLog::new(dir.path().join("log.txt"), false);
        log.append("hello").unwrap();
        assert!(!log.path().exists());
    }

    #[test]
    fn toggling_enables_and_disables_writes() {
        let dir = tempfile::tempdir().unwrap();
        let log = DiagnosticLog::new(dir.path().join("log.txt"), false);

        log.note("dropped");
        log.set_enabled(true);
        log.note("kept");
        log.set_enabled(false);
        log.note("dropped too");

        let contents = read_log(&log);
        assert!(contents.contains("kept"));
        assert!(!contents.contains("dropped"));
    }

    // ── Appending ───────────────────────────────────────────────────

    #[test]
    fn lines_are_timestamped() {
        let dir = tempfile::tempdir().unwrap();
        let log = DiagnosticLog::new(dir.path().join("log.txt"), true);
        log.append("generation requested").unwrap();

        let contents = read_log(&log);
        assert!(contents.starts_with('['));
        assert!(contents.contains("] generation requested\n"));
    }

    #[test]
    fn appends_accumulate() {
        let dir = tempfile::tempdir().unwrap();
        let log = DiagnosticLog::new(dir.path().join("log.txt"), true);
        log.append("first").unwrap();
        log.append("second").unwrap();

        let contents = read_log(&log);
        assert_eq!(contents.lines().count(), 2);
    }

    #[test]
    fn blank_message_becomes_empty_line() {
        let dir = tempfile::tempdir().unwrap();
        let log = DiagnosticLog::new(dir.path().join("log.txt"), true);
        log.append("   ").unwrap();

        let contents = read_log(&log);
        assert_eq!(contents.lines().count(), 1);
        assert!(contents.trim_end().ends_with(']'));
    }

    #[test]
    fn creates_missing_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let log = DiagnosticLog::new(dir.path().join("nested").join("log.txt"), true);
        log.append("created on demand").unwrap();
        assert!(log.path().exists());
    }

    // ── Failure policy ──────────────────────────────────────────────

    #[test]
    fn directory_creation_failure_disables_the_log() {
        let dir = tempfile::tempdir().unwrap();
        // A regular file where the log directory should go.
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let log = DiagnosticLog::new(blocker.join("log.txt"), true);
        let err = log.append("never written").unwrap_err();
        assert!(matches!(err, DiagnosticError::DirectoryCreation(_)));
        assert!(!log.is_enabled());

        // Subsequent appends are silent no-ops.
        log.append("still nothing").unwrap();
    }

    #[test]
    fn note_swallows_directory_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, b"not a directory").unwrap();

        let log = DiagnosticLog::new(blocker.join("log.txt"), true);
        log.note("must not panic or propagate");
        assert!(!log.is_enabled());
    }

    #[test]
    fn default_path_is_under_temp() {
        let path = DiagnosticLog::default_path();
        assert!(path.starts_with(std::env::temp_dir()));
        assert!(path.ends_with("twofa-companion/log.txt"));
    }

    #[test]
    fn error_display_names_the_failure() {
        let e = DiagnosticError::Write(std::io::Error::new(
            std::io::ErrorKind::Other,
            "disk full",
        ));
        let s: String = e.into();
        assert!(s.contains("append"));
        assert!(s.contains("disk full"));
    }
}
