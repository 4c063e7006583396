//! Command description for external toolkit binaries.

use std::fmt;
use std::path::{Path, PathBuf};

/// A single invocation of an external binary.
///
/// RST tools write their product to stdout, so the usual shape is
/// `program args... > file`; [`ToolCommand::stdout_to`] captures that without
/// going through a shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    args: Vec<String>,
    stdout: Option<PathBuf>,
    discard_stderr: bool,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            stdout: None,
            discard_stderr: false,
        }
    }

    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    pub fn path_arg(self, path: &Path) -> Self {
        self.arg(path.display().to_string())
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append user supplied options given as one whitespace separated string.
    pub fn opt_args(self, options: &str) -> Self {
        self.args(options.split_whitespace())
    }

    /// Redirect stdout into `path` (truncating it).
    pub fn stdout_to(mut self, path: impl Into<PathBuf>) -> Self {
        self.stdout = Some(path.into());
        self
    }

    pub fn discard_stderr(mut self) -> Self {
        self.discard_stderr = true;
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Program name without any directory, as reported in errors.
    pub fn program_name(&self) -> String {
        Path::new(&self.program)
            .file_name()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.program)
            .to_string()
    }

    pub fn get_args(&self) -> &[String] {
        &self.args
    }

    pub fn stdout_path(&self) -> Option<&Path> {
        self.stdout.as_deref()
    }

    pub fn stderr_discarded(&self) -> bool {
        self.discard_stderr
    }
}

impl fmt::Display for ToolCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        if let Some(out) = &self.stdout {
            write!(f, " > {}", out.display())?;
        }
        if self.discard_stderr {
            f.write_str(" 2>/dev/null")?;
        }
        Ok(())
    }
}

/// Exit status and captured streams of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToolOutput {
    /// Exit code, `None` when killed by a signal
    pub code: Option<i32>,
    /// Captured stdout (empty when redirected to a file)
    pub stdout: Vec<u8>,
    pub stderr: Vec<u8>,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    pub fn stderr_lossy(&self) -> String {
        String::from_utf8_lossy(&self.stderr).trim().to_string()
    }
}
