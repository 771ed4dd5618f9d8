//! Per-session log file for the viewer.
//!
//! `init` truncates `<data dir>/pixelview/pixelview.log` and mirrors panics
//! into it. The data dir is `%APPDATA%` on Windows,
//! `~/Library/Application Support` on macOS and `$XDG_DATA_HOME` (falling
//! back to `~/.local/share`) elsewhere.
//!
//! Log through `log_info!`, `log_warn!` and `log_err!`. Before `init` they
//! discard their message, which keeps the CLI and unit tests off the disk.

use std::fmt;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Mutex, OnceLock};
use std::time::{SystemTime, UNIX_EPOCH};

static SESSION: OnceLock<Session> = OnceLock::new();

struct Session {
    path: PathBuf,
    file: Mutex<File>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    Info,
    Warn,
    Error,
    Panic,
}

impl Level {
    pub fn tag(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warn => "WARN",
            Level::Error => "ERROR",
            Level::Panic => "PANIC",
        }
    }
}

/// Path of the open session log, if `init` succeeded.
pub fn log_path() -> Option<&'static Path> {
    SESSION.get().map(|s| s.path.as_path())
}

fn append(line: &str) {
    if let Some(session) = SESSION.get()
        && let Ok(mut file) = session.file.lock()
    {
        let _ = writeln!(file, "{}", line);
    }
}

/// Append one timestamped line. Does nothing before `init`.
pub fn write(level: Level, msg: fmt::Arguments<'_>) {
    if SESSION.get().is_none() {
        return;
    }
    append(&format_line(&clock_now(), level, &msg.to_string()));
}

fn format_line(clock: &str, level: Level, msg: &str) -> String {
    format!("[{}] [{}] {}", clock, level.tag(), msg)
}

#[macro_export]
macro_rules! log_info {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Info, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_warn {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Warn, format_args!($($arg)*))
    };
}

#[macro_export]
macro_rules! log_err {
    ($($arg:tt)*) => {
        $crate::logger::write($crate::logger::Level::Error, format_args!($($arg)*))
    };
}

fn open_session(path: &Path) -> io::Result<File> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    OpenOptions::new().create(true).write(true).truncate(true).open(path)
}

/// Start the session log and hook panics into it. Only the first call has
/// an effect; a log that cannot be opened is reported on stderr and skipped.
pub fn init() {
    if SESSION.get().is_some() {
        return;
    }
    let path = data_dir().join("pixelview").join("pixelview.log");
    let file = match open_session(&path) {
        Ok(file) => file,
        Err(e) => {
            eprintln!("[logger] cannot open {}: {}", path.display(), e);
            return;
        }
    };
    let _ = SESSION.set(Session { path: path.clone(), file: Mutex::new(file) });

    append(&format!(
        "=== pixelview {} session, unix time {} ===",
        env!("CARGO_PKG_VERSION"),
        unix_seconds().unwrap_or(0)
    ));
    append(&format!("log: {}", path.display()));

    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        append(&format_line(&clock_now(), Level::Panic, &info.to_string()));
        default_hook(info);
    }));
}

fn data_dir() -> PathBuf {
    let env_dir = |key: &str| std::env::var_os(key).map(PathBuf::from);

    #[cfg(target_os = "windows")]
    let platform = env_dir("APPDATA");
    #[cfg(target_os = "macos")]
    let platform = env_dir("HOME").map(|h| h.join("Library").join("Application Support"));
    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let platform = env_dir("XDG_DATA_HOME")
        .or_else(|| env_dir("HOME").map(|h| h.join(".local").join("share")));

    platform.unwrap_or_else(|| PathBuf::from("."))
}

fn unix_seconds() -> Option<u64> {
    SystemTime::now().duration_since(UNIX_EPOCH).ok().map(|d| d.as_secs())
}

fn clock_now() -> String {
    unix_seconds().map_or_else(|| "--:--:--".to_string(), format_clock)
}

/// UTC wall clock as HH:MM:SS.
fn format_clock(secs: u64) -> String {
    let day = secs % 86_400;
    format!("{:02}:{:02}:{:02}", day / 3600, day % 3600 / 60, day % 60)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clock_wraps_at_midnight() {
        assert_eq!(format_clock(0), "00:00:00");
        assert_eq!(format_clock(86_399), "23:59:59");
        assert_eq!(format_clock(86_400 + 3661), "01:01:01");
    }

    #[test]
    fn lines_carry_level_tag() {
        assert_eq!(format_line("12:00:00", Level::Warn, "hi"), "[12:00:00] [WARN] hi");
        assert_eq!(Level::Error.tag(), "ERROR");
    }

    #[test]
    fn writing_before_init_is_a_no_op() {
        crate::log_info!("nothing to see {}", 1);
        assert!(log_path().is_none());
    }

    #[test]
    fn session_file_is_created_with_parents_and_truncated() {
        let dir = std::env::temp_dir().join(format!("pixelview-log-{}", std::process::id()));
        let path = dir.join("nested").join("session.log");
        open_session(&path).unwrap().write_all(b"old session").unwrap();
        open_session(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "");
        let _ = fs::remove_dir_all(&dir);
    }
}
