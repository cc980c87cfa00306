//! The per-mod run log
//!
//! Every message of a run goes to the terminal and to a log file at the mod
//! root it concerns. Each mod root's file is truncated the first time the
//! run touches it and starts with a timestamped header.

use crate::util::{self, OutputHandler};
use chrono::Local;
use log::{debug, warn};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Per-reference detail, on the terminal only with `-v`
    Detail,
    Info,
    Success,
    Warn,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLine {
    pub severity: Severity,
    pub text: String,
}

/// Lines collected while a unit of work runs, flushed later in a fixed order
#[derive(Debug, Clone, Default)]
pub struct LogBuffer {
    lines: Vec<(PathBuf, LogLine)>,
}

impl LogBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push<S: Into<String>>(&mut self, mod_root: &Path, severity: Severity, text: S) {
        self.lines.push((
            mod_root.to_path_buf(),
            LogLine {
                severity,
                text: text.into(),
            },
        ));
    }

    pub fn detail<S: Into<String>>(&mut self, mod_root: &Path, text: S) {
        self.push(mod_root, Severity::Detail, text);
    }

    pub fn info<S: Into<String>>(&mut self, mod_root: &Path, text: S) {
        self.push(mod_root, Severity::Info, text);
    }

    pub fn success<S: Into<String>>(&mut self, mod_root: &Path, text: S) {
        self.push(mod_root, Severity::Success, text);
    }

    pub fn warn<S: Into<String>>(&mut self, mod_root: &Path, text: S) {
        self.push(mod_root, Severity::Warn, text);
    }

    pub fn error<S: Into<String>>(&mut self, mod_root: &Path, text: S) {
        self.push(mod_root, Severity::Error, text);
    }

    pub fn lines(&self) -> impl Iterator<Item = (&Path, &LogLine)> {
        self.lines.iter().map(|(root, line)| (root.as_path(), line))
    }
}

pub fn header() -> String {
    format!(
        "I3D Mapper Log - {}\n{}",
        Local::now().format("%Y-%m-%d %H:%M:%S"),
        "=".repeat(40)
    )
}

pub struct RunLog {
    file_name: String,
    enabled: bool,
    verbose: bool,
    output: OutputHandler,
    files: HashMap<PathBuf, Option<File>>,
}

impl RunLog {
    pub fn new(file_name: &str, enabled: bool, verbose: bool, output: OutputHandler) -> Self {
        Self {
            file_name: file_name.to_string(),
            enabled,
            verbose,
            output,
            files: HashMap::new(),
        }
    }

    /// Start the log for `mod_root` unless this run already did. Returns
    /// whether this call started it.
    ///
    /// A file that cannot be created only costs the file copy of the log.
    pub fn start(&mut self, mod_root: &Path) -> bool {
        if self.files.contains_key(mod_root) {
            return false;
        }
        let header = header();
        self.output.print_info(&header);

        let file = if self.enabled {
            let path = mod_root.join(&self.file_name);
            match File::create(&path).and_then(|mut file| {
                writeln!(file, "{header}")?;
                Ok(file)
            }) {
                Ok(file) => {
                    debug!("Logging to {}", path.display());
                    Some(file)
                }
                Err(e) => {
                    warn!("Cannot write log file {}: {e}", path.display());
                    None
                }
            }
        } else {
            None
        };
        self.files.insert(mod_root.to_path_buf(), file);
        true
    }

    /// Terminal-only message for inputs that belong to no mod root
    pub fn print_only(&self, severity: Severity, text: &str) {
        self.print(&LogLine {
            severity,
            text: text.to_string(),
        });
    }

    pub fn emit(&mut self, mod_root: &Path, line: &LogLine) {
        self.start(mod_root);
        self.print(line);
        if let Some(Some(file)) = self.files.get_mut(mod_root) {
            if let Err(e) = writeln!(file, "{}", line.text) {
                warn!("Cannot append to log file: {e}");
            }
        }
    }

    pub fn emit_text<S: Into<String>>(&mut self, mod_root: &Path, severity: Severity, text: S) {
        self.emit(
            mod_root,
            &LogLine {
                severity,
                text: text.into(),
            },
        );
    }

    pub fn flush(&mut self, buffer: &LogBuffer) {
        for (mod_root, line) in buffer.lines() {
            self.emit(mod_root, line);
        }
    }

    fn print(&self, line: &LogLine) {
        match line.severity {
            Severity::Detail if self.verbose => {
                self.output.print_info(&util::colorize_detail(&line.text))
            }
            Severity::Detail => {}
            Severity::Info => self.output.print_info(&line.text),
            Severity::Success => self.output.print_info(&util::colorize_success(&line.text)),
            Severity::Warn => self.output.print_info(&util::colorize_warning(&line.text)),
            Severity::Error => self.output.print_error(&util::colorize_error(&line.text)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_header_format() {
        let header = header();
        let (title, rule) = header.split_once('\n').unwrap();
        let stamp = title.strip_prefix("I3D Mapper Log - ").unwrap();
        assert!(chrono::NaiveDateTime::parse_from_str(stamp, "%Y-%m-%d %H:%M:%S").is_ok());
        assert_eq!(rule, "=".repeat(40));
    }

    #[test]
    fn test_file_truncated_once_per_run() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("log.txt");
        std::fs::write(&path, "old run\n").unwrap();

        let mut log = RunLog::new("log.txt", true, false, OutputHandler::new(true));
        log.emit_text(tmp.path(), Severity::Info, "first");
        assert!(!log.start(tmp.path()));
        let mut buffer = LogBuffer::new();
        buffer.warn(tmp.path(), "second");
        buffer.detail(tmp.path(), "third");
        log.flush(&buffer);
        drop(log);

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("I3D Mapper Log - "));
        assert!(!text.contains("old run"));
        let body: Vec<&str> = text.lines().skip(2).collect();
        assert_eq!(body, ["first", "second", "third"]);
    }

    #[test]
    fn test_disabled_file() {
        let tmp = TempDir::new().unwrap();
        let mut log = RunLog::new("log.txt", false, false, OutputHandler::new(true));
        log.emit_text(tmp.path(), Severity::Info, "only on screen");
        assert!(!tmp.path().join("log.txt").exists());
    }
}
