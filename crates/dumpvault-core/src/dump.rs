//! Dump tool invocation.

use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::TRACING_TARGET_DUMP;

/// Output of a successful dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpOutput {
    /// Stdout and stderr, interleaved in the order they were written.
    pub output: String,
    /// Exit code of the dump tool, when it exited normally.
    pub exit_code: Option<i32>,
}

/// Failure to produce an archive.
#[derive(Debug, thiserror::Error)]
pub enum DumpError {
    /// The directory holding the archive could not be created.
    #[error("failed to create temp directory {}: {source}", path.display())]
    TempDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The dump tool could not be started.
    #[error("failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The dump tool's output could not be collected.
    #[error("failed to collect output of {program}: {source}")]
    Output {
        program: String,
        #[source]
        source: std::io::Error,
    },
    /// The dump tool ran but reported failure.
    #[error("{program} exited with {}", exit_code.map_or_else(|| "a signal".to_string(), |c| format!("status {c}")))]
    Failed {
        program: String,
        exit_code: Option<i32>,
        output: String,
    },
}

impl DumpError {
    /// Whatever the dump tool printed before failing.
    pub fn output(&self) -> &str {
        match self {
            Self::Failed { output, .. } => output,
            Self::TempDir { .. } | Self::Spawn { .. } | Self::Output { .. } => "",
        }
    }

    /// Captured output, a blank line, then the error itself.
    pub fn report(&self) -> String {
        format!("{}\n\n{self}", self.output())
    }
}

/// Produces a database archive at a given path.
#[async_trait::async_trait]
pub trait Dumper: Send + Sync {
    /// Dumps the database at `uri` into the archive file at `archive`.
    async fn dump(&self, uri: &str, archive: &Path) -> Result<DumpOutput, DumpError>;
}

/// Runs `mongodump` (or a compatible executable) as a child process.
#[derive(Debug, Clone)]
pub struct MongoDump {
    program: String,
}

impl MongoDump {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    fn spawn_error(&self, source: std::io::Error) -> DumpError {
        DumpError::Spawn {
            program: self.program.clone(),
            source,
        }
    }

    fn output_error(&self, source: std::io::Error) -> DumpError {
        DumpError::Output {
            program: self.program.clone(),
            source,
        }
    }
}

impl Default for MongoDump {
    fn default() -> Self {
        Self::new("mongodump")
    }
}

#[async_trait::async_trait]
impl Dumper for MongoDump {
    #[tracing::instrument(
        name = "dump.mongodump",
        skip(self, uri),
        target = TRACING_TARGET_DUMP,
        fields(program = %self.program, archive = %archive.display())
    )]
    async fn dump(&self, uri: &str, archive: &Path) -> Result<DumpOutput, DumpError> {
        if let Some(dir) = archive.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|source| DumpError::TempDir {
                    path: dir.to_path_buf(),
                    source,
                })?;
        }

        tracing::info!(target: TRACING_TARGET_DUMP, "starting database dump");

        // Both streams share one pipe so the log keeps the tool's own ordering.
        let (mut reader, stdout) = std::io::pipe().map_err(|e| self.spawn_error(e))?;
        let stderr = stdout.try_clone().map_err(|e| self.spawn_error(e))?;

        let mut command = Command::new(&self.program);
        command
            .arg("-vvv")
            .arg(format!("--uri={uri}"))
            .arg(format!("--archive={}", archive.display()))
            .stdin(Stdio::null())
            .stdout(stdout)
            .stderr(stderr)
            .kill_on_drop(true);

        let mut child = command.spawn().map_err(|e| self.spawn_error(e))?;
        // Release the parent's write ends so the reader sees EOF on exit.
        drop(command);

        let collect = tokio::task::spawn_blocking(move || {
            let mut raw = Vec::new();
            reader.read_to_end(&mut raw).map(|_| raw)
        });

        let status = child.wait().await.map_err(|e| self.output_error(e))?;
        let raw = collect
            .await
            .map_err(|e| self.output_error(std::io::Error::other(e)))?
            .map_err(|e| self.output_error(e))?;

        let output = String::from_utf8_lossy(&raw).into_owned();
        let exit_code = status.code();

        if !status.success() {
            tracing::error!(
                target: TRACING_TARGET_DUMP,
                exit_code,
                output_len = output.len(),
                "dump tool failed"
            );
            return Err(DumpError::Failed {
                program: self.program.clone(),
                exit_code,
                output,
            });
        }

        tracing::info!(
            target: TRACING_TARGET_DUMP,
            output_len = output.len(),
            "database dump finished"
        );

        Ok(DumpOutput { output, exit_code })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn report_puts_output_before_error() {
        let err = DumpError::Failed {
            program: "mongodump".into(),
            exit_code: Some(1),
            output: "Failed: connection refused".into(),
        };

        assert_eq!(
            err.report(),
            "Failed: connection refused\n\nmongodump exited with status 1"
        );
    }

    #[tokio::test]
    async fn missing_program_is_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let archive = dir.path().join("dump.archive");

        let dumper = MongoDump::new("dumpvault-no-such-dump-tool");
        let err = dumper.dump("mongodb://localhost", &archive).await.unwrap_err();

        assert!(matches!(err, DumpError::Spawn { .. }));
        assert!(err.output().is_empty());
        assert!(!archive.exists());
    }

    #[cfg(unix)]
    mod unix {
        use std::os::unix::fs::PermissionsExt;

        use super::*;

        fn script(dir: &Path, body: &str) -> String {
            let path = dir.join("fake-mongodump");
            std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path.display().to_string()
        }

        #[tokio::test]
        async fn passes_arguments_and_captures_output() {
            let dir = tempfile::tempdir().unwrap();
            let program = script(
                dir.path(),
                r#"echo "args: $*"
echo "progress on stderr" 1>&2
for arg in "$@"; do
  case "$arg" in
    --archive=*) printf 'archive-bytes' > "${arg#--archive=}" ;;
  esac
done"#,
            );
            let archive = dir.path().join("nested/temp/dump.archive");

            let output = MongoDump::new(program)
                .dump("mongodb://db:27017", &archive)
                .await
                .unwrap();

            let expected_args = format!(
                "args: -vvv --uri=mongodb://db:27017 --archive={}",
                archive.display()
            );
            assert!(output.output.starts_with(&expected_args));
            assert!(output.output.ends_with("progress on stderr\n"));
            assert_eq!(output.exit_code, Some(0));
            assert_eq!(std::fs::read(&archive).unwrap(), b"archive-bytes");
        }

        #[tokio::test]
        async fn keeps_stream_interleaving() {
            let dir = tempfile::tempdir().unwrap();
            let program = script(
                dir.path(),
                "echo 'connecting' 1>&2\necho 'dumping users'\necho 'done' 1>&2",
            );

            let output = MongoDump::new(program)
                .dump("mongodb://db:27017", &dir.path().join("dump.archive"))
                .await
                .unwrap();

            assert_eq!(output.output, "connecting\ndumping users\ndone\n");
        }

        #[tokio::test]
        async fn non_zero_exit_keeps_output() {
            let dir = tempfile::tempdir().unwrap();
            let program = script(dir.path(), "echo 'Failed: auth error' 1>&2\nexit 3");

            let err = MongoDump::new(program)
                .dump("mongodb://db:27017", &dir.path().join("dump.archive"))
                .await
                .unwrap_err();

            match &err {
                DumpError::Failed { exit_code, .. } => assert_eq!(*exit_code, Some(3)),
                other => panic!("unexpected error: {other}"),
            }
            assert_eq!(err.output(), "Failed: auth error\n");
            assert!(err.report().ends_with("exited with status 3"));
        }
    }
}
