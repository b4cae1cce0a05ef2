//! Launching the external scanner and feeding its output to the driver.

use std::fs::File;
use std::io::BufRead;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info};

use sharetally_core::{RawLine, RollupConfig, RollupError};

use crate::driver::IngestDriver;

/// Executable looked up on `PATH` when no scanner is configured.
pub const DEFAULT_SCANNER: &str = "xcp";

/// Find the scanner executable.
///
/// An explicit path is used as-is when it names a file, otherwise it is
/// resolved through `PATH` like the default.
pub fn locate_scanner(explicit: Option<&Path>) -> Result<PathBuf, RollupError> {
    match explicit {
        Some(path) if path.is_file() => Ok(path.to_path_buf()),
        Some(path) => which::which(path).map_err(|_| RollupError::ScannerNotFound {
            program: path.display().to_string(),
        }),
        None => which::which(DEFAULT_SCANNER).map_err(|_| RollupError::ScannerNotFound {
            program: DEFAULT_SCANNER.to_string(),
        }),
    }
}

/// A resolved scanner invocation.
#[derive(Debug, Clone)]
pub struct ScannerCommand {
    program: PathBuf,
    args: Vec<String>,
}

impl ScannerCommand {
    pub fn new(program: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    /// Locate the scanner and expand its arguments for a configured run.
    pub fn from_config(config: &RollupConfig) -> Result<Self, RollupError> {
        let program = locate_scanner(config.scanner.as_deref())?;
        Ok(Self::new(program, config.expanded_scanner_args()?))
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Run the scanner to completion, feeding every output line to `driver`.
    ///
    /// Returns the scanner's exit code (`None` if killed by a signal).
    pub fn run(&self, driver: &mut IngestDriver) -> Result<Option<i32>, RollupError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|source| self.spawn_error(source))?;
        runtime.block_on(self.stream_into(driver))
    }

    async fn stream_into(&self, driver: &mut IngestDriver) -> Result<Option<i32>, RollupError> {
        info!(program = %self.program.display(), args = ?self.args, "starting scanner");

        let mut child = Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| self.spawn_error(source))?;

        let (Some(stdout), Some(stderr)) = (child.stdout.take(), child.stderr.take()) else {
            return Err(self.spawn_error(std::io::Error::other("scanner pipes unavailable")));
        };
        let mut stdout = BufReader::new(stdout);
        let mut stderr = BufReader::new(stderr);
        let mut out_buf = Vec::new();
        let mut err_buf = Vec::new();
        let mut out_open = true;
        let mut err_open = true;

        // Partial reads stay in the buffers, so losing a select race drops nothing.
        while out_open || err_open {
            tokio::select! {
                read = stdout.read_until(b'\n', &mut out_buf), if out_open => {
                    if read.map_err(|e| RollupError::io(&self.program, e))? == 0 {
                        out_open = false;
                    } else {
                        driver.ingest(&RawLine::Output(decode_line(&out_buf)));
                        out_buf.clear();
                    }
                }
                read = stderr.read_until(b'\n', &mut err_buf), if err_open => {
                    if read.map_err(|e| RollupError::io(&self.program, e))? == 0 {
                        err_open = false;
                    } else {
                        driver.ingest(&RawLine::Error(decode_line(&err_buf)));
                        err_buf.clear();
                    }
                }
            }
        }

        let status = child
            .wait()
            .await
            .map_err(|e| RollupError::io(&self.program, e))?;
        debug!(%status, "scanner exited");
        Ok(status.code())
    }

    fn spawn_error(&self, source: std::io::Error) -> RollupError {
        RollupError::Spawn {
            program: self.program.display().to_string(),
            source,
        }
    }
}

/// Feed a captured scanner transcript through the driver.
///
/// Every line is treated as regular output and the run counts as a clean exit.
pub fn replay(path: &Path, driver: &mut IngestDriver) -> Result<Option<i32>, RollupError> {
    let file = File::open(path).map_err(|e| RollupError::io(path, e))?;
    let mut reader = std::io::BufReader::new(file);
    let mut buf = Vec::new();

    info!(path = %path.display(), "replaying scanner transcript");
    loop {
        buf.clear();
        let read = reader
            .read_until(b'\n', &mut buf)
            .map_err(|e| RollupError::io(path, e))?;
        if read == 0 {
            break;
        }
        driver.ingest(&RawLine::Output(decode_line(&buf)));
    }
    Ok(Some(0))
}

/// Decode one line lossily and drop its terminator.
fn decode_line(bytes: &[u8]) -> String {
    let bytes = bytes.strip_suffix(b"\n").unwrap_or(bytes);
    let bytes = bytes.strip_suffix(b"\r").unwrap_or(bytes);
    String::from_utf8_lossy(bytes).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_line() {
        assert_eq!(decode_line(b"abc\r\n"), "abc");
        assert_eq!(decode_line(b"abc"), "abc");
        assert_eq!(decode_line(b"a\xffb\n"), "a\u{fffd}b");
    }

    #[test]
    fn test_locate_missing_scanner() {
        let err = locate_scanner(Some(Path::new("sharetally-no-such-scanner-binary"))).unwrap_err();
        assert!(matches!(err, RollupError::ScannerNotFound { .. }));
    }

    #[test]
    fn test_from_config_expands_args() {
        let dir = tempfile::tempdir().unwrap();
        let fake = dir.path().join("xcp");
        std::fs::write(&fake, "").unwrap();

        let config = RollupConfig::builder()
            .root(r"\\fs01\projects")
            .parallel(2u8)
            .scanner(fake.clone())
            .build()
            .unwrap();
        let command = ScannerCommand::from_config(&config).unwrap();

        assert_eq!(command.program(), fake.as_path());
        assert_eq!(command.args()[4], "2");
        assert_eq!(command.args()[5], r"\\fs01\projects");
    }
}
