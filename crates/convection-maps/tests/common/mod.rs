//! Shared helpers for pipeline tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use convection_maps::{ConvectionMaps, MapParameters, PipelineConfig};
use darn_common::DarnResult;
use rst_toolkit::{CommandRunner, ToolCommand, ToolOutput};
use test_utils::MapDirs;

/// In-process stand-in for the RST binaries that records every call.
///
/// Redirected commands get a one-line product; `map_plot` writes two pages
/// into its `-path`; `convert` copies its input.
#[derive(Default)]
pub struct RecordingRunner {
    calls: Mutex<Vec<ToolCommand>>,
    /// (program, argument substring, exit code)
    failures: Mutex<Vec<(String, String, i32)>>,
    /// (program, argument substring) producing empty output
    empties: Mutex<Vec<(String, String)>>,
}

impl RecordingRunner {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self, program: &str, arg_contains: &str, code: i32) {
        self.failures
            .lock()
            .unwrap()
            .push((program.to_string(), arg_contains.to_string(), code));
    }

    pub fn empty(&self, program: &str, arg_contains: &str) {
        self.empties
            .lock()
            .unwrap()
            .push((program.to_string(), arg_contains.to_string()));
    }

    pub fn calls(&self) -> Vec<ToolCommand> {
        self.calls.lock().unwrap().clone()
    }

    /// Calls to `program`, in order.
    pub fn calls_to(&self, program: &str) -> Vec<ToolCommand> {
        self.calls()
            .into_iter()
            .filter(|c| c.program_name() == program)
            .collect()
    }

    /// Program names in call order, without the `dmapdump` channel checks.
    pub fn programs(&self) -> Vec<String> {
        self.calls()
            .iter()
            .map(|c| c.program_name())
            .filter(|p| p != "dmapdump")
            .collect()
    }

    fn matches(cmd: &ToolCommand, program: &str, needle: &str) -> bool {
        cmd.program_name() == program && cmd.get_args().iter().any(|a| a.contains(needle))
    }
}

#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, cmd: &ToolCommand) -> DarnResult<ToolOutput> {
        self.calls.lock().unwrap().push(cmd.clone());

        let failure = self
            .failures
            .lock()
            .unwrap()
            .iter()
            .find(|(p, n, _)| Self::matches(cmd, p, n))
            .map(|(_, _, code)| *code);
        let empty = self
            .empties
            .lock()
            .unwrap()
            .iter()
            .any(|(p, n)| Self::matches(cmd, p, n));

        if let Some(path) = cmd.stdout_path() {
            let contents = if empty { String::new() } else { format!("{}\n", cmd) };
            std::fs::write(path, contents)?;
        }

        if let Some(code) = failure {
            return Ok(ToolOutput {
                code: Some(code),
                stdout: Vec::new(),
                stderr: b"simulated failure".to_vec(),
            });
        }

        let args = cmd.get_args();
        match cmd.program_name().as_str() {
            "map_plot" => {
                let dir = args
                    .iter()
                    .position(|a| a == "-path")
                    .map(|i| PathBuf::from(&args[i + 1]))
                    .unwrap_or_default();
                let map = PathBuf::from(args.last().cloned().unwrap_or_default());
                let day = map
                    .file_name()
                    .and_then(|n| n.to_str())
                    .and_then(|n| n.split('.').next())
                    .unwrap_or_default()
                    .to_string();
                for page in ["0000", "0002"] {
                    std::fs::write(dir.join(format!("{}.{}.00.ps", day, page)), "%!PS\n")?;
                }
            }
            "convert" => {
                let n = args.len();
                std::fs::copy(&args[n - 2], &args[n - 1])?;
            }
            _ => {}
        }

        Ok(ToolOutput {
            code: Some(0),
            stdout: Vec::new(),
            stderr: Vec::new(),
        })
    }
}

/// A temp layout plus parameters pointing into it.
pub struct Fixture {
    pub tmp: tempfile::TempDir,
    pub dirs: MapDirs,
    pub params: MapParameters,
}

impl Fixture {
    pub fn new() -> Self {
        let tmp = test_utils::temp_test_dir_with_prefix("convection_maps_");
        let dirs = MapDirs::under(tmp.path());

        let mut params = MapParameters::new("20170301".parse().unwrap());
        params.data_path = dirs.data.clone();
        params.plot_path = dirs.plot.clone();
        params.map_path = dirs.map.clone();
        params.grid_path = dirs.grid.clone();
        params.imf_path = dirs.imf.clone();
        params.log_path = dirs.log.clone();
        params.key_path = tmp.path().join("keys");
        params.use_omni = false;

        Self { tmp, dirs, params }
    }

    /// Put a data file named `name` with `contents` into the data dir.
    pub fn data_file(&self, name: &str, contents: &[u8]) -> PathBuf {
        test_utils::write_file(&self.dirs.data, name, contents)
    }

    pub fn pipeline(&self, runner: Arc<dyn CommandRunner>) -> ConvectionMaps {
        self.pipeline_with(runner, PipelineConfig::default())
    }

    pub fn pipeline_with(
        &self,
        runner: Arc<dyn CommandRunner>,
        config: PipelineConfig,
    ) -> ConvectionMaps {
        ConvectionMaps::new(self.params.clone(), config, runner).unwrap()
    }
}

/// File names directly inside `dir`, sorted.
pub fn listing(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(Result::ok)
                .map(|e| e.file_name().to_string_lossy().into_owned())
                .collect()
        })
        .unwrap_or_default();
    names.sort();
    names
}
