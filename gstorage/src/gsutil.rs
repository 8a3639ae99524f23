use crate::error::StorageError;
use crate::remote::RemoteStorage;
use std::path::PathBuf;
use std::process::{Command, Output};
use tracing::debug;

/// `RemoteStorage` backed by the `gsutil` command line tool.
pub struct Gsutil {
    program: PathBuf,
}

impl Gsutil {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Gsutil {
            program: program.into(),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(args);
        cmd
    }

    fn describe(&self, args: &[&str]) -> String {
        let mut text = self.program.display().to_string();
        for arg in args {
            text.push(' ');
            text.push_str(arg);
        }
        text
    }

    fn spawn_error(&self, source: std::io::Error) -> StorageError {
        StorageError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }
}

fn command_summary(out: &Output) -> String {
    let stderr = String::from_utf8_lossy(&out.stderr).trim().to_string();
    if !stderr.is_empty() {
        return stderr;
    }
    format!("{}", out.status)
}

impl RemoteStorage for Gsutil {
    fn display(&self) -> String {
        self.program.display().to_string()
    }

    fn list(&self, path: &str) -> Result<Vec<(String, u64)>, StorageError> {
        let args = ["ls", "-l", path];
        debug!(command = %self.describe(&args), "listing remote");
        let out = self
            .command(&args)
            .output()
            .map_err(|e| self.spawn_error(e))?;
        if !out.status.success() {
            return Err(StorageError::CommandFailed {
                command: format!("{} ls -l", self.display()),
                detail: command_summary(&out),
            });
        }
        parse_listing(&String::from_utf8_lossy(&out.stdout), path)
    }

    fn copy(&self, sources: &[String], destination: &str) -> Result<(), StorageError> {
        let mut args = vec!["cp"];
        args.extend(sources.iter().map(String::as_str));
        args.push(destination);
        debug!(command = %self.describe(&args), "copying");
        // Progress output goes straight to the terminal.
        let status = self
            .command(&args)
            .status()
            .map_err(|e| self.spawn_error(e))?;
        if !status.success() {
            return Err(StorageError::CommandFailed {
                command: format!("{} cp", self.display()),
                detail: format!("{status}"),
            });
        }
        Ok(())
    }
}

/// Parses `gsutil ls -l <base>` output into names relative to `base`.
///
/// Object lines look like `<size>  <timestamp>  <url>`. Sub-directories show
/// up as a bare url ending in `/` and the listing ends with a `TOTAL:` line.
pub fn parse_listing(output: &str, base: &str) -> Result<Vec<(String, u64)>, StorageError> {
    let prefix = format!("{}/", base.trim_end_matches('/'));
    let mut entries = Vec::new();
    for line in output.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with("TOTAL:") {
            continue;
        }
        let parts: Vec<&str> = line.split_whitespace().collect();
        if let [url] = parts.as_slice() {
            if url.ends_with('/') {
                continue;
            }
        }
        let bad_line = |reason: &str| StorageError::Listing {
            line: line.to_string(),
            reason: reason.to_string(),
        };
        let [size, _date, url @ ..] = parts.as_slice() else {
            return Err(bad_line("expected <size> <timestamp> <url>"));
        };
        if url.is_empty() {
            return Err(bad_line("expected <size> <timestamp> <url>"));
        }
        let size: u64 = size.parse().map_err(|_| bad_line("size is not a number"))?;
        let url = url.join(" ");
        let Some(name) = url.strip_prefix(&prefix) else {
            return Err(bad_line(&format!("url is not under {prefix}")));
        };
        if name.is_empty() || name.ends_with('/') {
            continue;
        }
        entries.push((name.to_string(), size));
    }
    Ok(entries)
}
