//! Process execution and the checked-command policy.

use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use std::process::Stdio;

use async_trait::async_trait;
use darn_common::{DarnError, DarnResult};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::command::{ToolCommand, ToolOutput};

/// Executes [`ToolCommand`]s.
///
/// The pipeline only talks to the toolkit through this trait, so tests can
/// substitute a recording implementation.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the command to completion.
    ///
    /// A non-zero exit is not an error at this level; failing to start the
    /// program is.
    async fn run(&self, cmd: &ToolCommand) -> DarnResult<ToolOutput>;
}

/// Runs commands as child processes with tokio.
#[derive(Debug, Clone, Default)]
pub struct ProcessRunner {
    /// Directory searched first for program names (RST `bin/`)
    bin_dir: Option<PathBuf>,
    /// Extra environment (e.g. `SD_HDWPATH`, `MAPDATA`)
    env: BTreeMap<String, String>,
}

impl ProcessRunner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bin_dir(mut self, bin_dir: impl Into<PathBuf>) -> Self {
        self.bin_dir = Some(bin_dir.into());
        self
    }

    pub fn with_env<K, V>(mut self, vars: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.env
            .extend(vars.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    fn resolve(&self, program: &str) -> PathBuf {
        if let Some(dir) = &self.bin_dir {
            let candidate = dir.join(program);
            if candidate.is_file() {
                return candidate;
            }
        }
        PathBuf::from(program)
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(&self, cmd: &ToolCommand) -> DarnResult<ToolOutput> {
        let program = self.resolve(cmd.program());

        let mut command = Command::new(&program);
        command
            .args(cmd.get_args())
            .envs(&self.env)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        if let Some(path) = cmd.stdout_path() {
            let file = std::fs::File::create(path)?;
            command.stdout(Stdio::from(file));
        } else {
            command.stdout(Stdio::piped());
        }

        if cmd.stderr_discarded() {
            command.stderr(Stdio::null());
        } else {
            command.stderr(Stdio::piped());
        }

        debug!(program = %program.display(), "Spawning toolkit process");

        let output = command.output().await.map_err(|e| {
            DarnError::Io(io::Error::new(
                e.kind(),
                format!("failed to run {}: {}", program.display(), e),
            ))
        })?;

        Ok(ToolOutput {
            code: output.status.code(),
            stdout: output.stdout,
            stderr: output.stderr,
        })
    }
}

/// Run a toolkit command and check that it produced usable output.
///
/// Fails with [`DarnError::RstCommand`] on a non-zero exit and with
/// [`DarnError::RstFileEmpty`] when any file matching `outputs` is empty.
pub async fn run_checked(
    runner: &dyn CommandRunner,
    cmd: &ToolCommand,
    outputs: &str,
) -> DarnResult<ToolOutput> {
    let program = cmd.program_name();
    info!(command = %cmd, "Running RST command");

    let output = runner.run(cmd).await?;

    if !output.success() {
        let code = output.code.unwrap_or(-1);
        warn!(
            program = %program,
            code = code,
            stderr = %output.stderr_lossy(),
            "RST command failed"
        );
        metrics::counter!("rst_commands_total", "program" => program.clone(), "outcome" => "failed")
            .increment(1);
        return Err(DarnError::RstCommand { program, code });
    }

    let pattern = glob::glob(outputs)
        .map_err(|e| DarnError::invalid("outputs", format!("bad pattern '{}': {}", outputs, e)))?;
    for entry in pattern {
        let path = entry.map_err(|e| DarnError::Io(e.into_error()))?;
        if std::fs::metadata(&path)?.len() == 0 {
            metrics::counter!("rst_commands_total", "program" => program.clone(), "outcome" => "empty")
                .increment(1);
            return Err(DarnError::RstFileEmpty(path));
        }
    }

    metrics::counter!("rst_commands_total", "program" => program, "outcome" => "ok").increment(1);
    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Exits with a fixed code without touching the filesystem.
    struct FixedExit(i32);

    #[async_trait]
    impl CommandRunner for FixedExit {
        async fn run(&self, _cmd: &ToolCommand) -> DarnResult<ToolOutput> {
            Ok(ToolOutput {
                code: Some(self.0),
                stdout: Vec::new(),
                stderr: b"oops".to_vec(),
            })
        }
    }

    #[test]
    fn test_nonzero_exit_is_command_error() {
        let cmd = ToolCommand::new("map_fit");
        let err = tokio_test::block_on(run_checked(&FixedExit(2), &cmd, "")).unwrap_err();
        assert!(matches!(
            err,
            DarnError::RstCommand { ref program, code: 2 } if program == "map_fit"
        ));
    }

    #[test]
    fn test_no_matching_outputs_passes() {
        let cmd = ToolCommand::new("map_fit");
        let output =
            tokio_test::block_on(run_checked(&FixedExit(0), &cmd, "/nonexistent/dir/*.map")).unwrap();
        assert!(output.success());
    }
}
