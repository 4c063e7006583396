//! Process runner tests against the fake toolkit scripts.

#![cfg(unix)]

use std::io::Write;

use darn_common::DarnError;
use flate2::write::GzEncoder;
use flate2::Compression;
use rst_toolkit::{channel_present, decompress, run_checked, ProcessRunner, ToolCommand};
use test_utils::{fake_rst_toolkit, read_invocations, temp_test_dir, write_file, write_tool_script};

// ============================================================================
// Redirection and exit status
// ============================================================================

#[tokio::test]
async fn test_stdout_redirected_into_file() {
    let tmp = temp_test_dir();
    let bin = fake_rst_toolkit(&tmp.path().join("bin"));
    let runner = ProcessRunner::new().with_bin_dir(&bin);

    let out = tmp.path().join("20170301.sas.n.grid");
    let cmd = ToolCommand::new("make_grid")
        .arg("-vb")
        .arg("20170301.sas.fitacf")
        .stdout_to(&out);

    let output = run_checked(&runner, &cmd, &out.display().to_string())
        .await
        .unwrap();
    assert!(output.success());
    assert!(output.stdout.is_empty());

    let contents = std::fs::read_to_string(&out).unwrap();
    assert_eq!(contents.trim(), "grid -vb 20170301.sas.fitacf");
}

#[tokio::test]
async fn test_nonzero_exit_is_rst_command_error() {
    let tmp = temp_test_dir();
    let bin = fake_rst_toolkit(&tmp.path().join("bin"));
    let runner = ProcessRunner::new().with_bin_dir(&bin);

    let out = tmp.path().join("broken.grid");
    let cmd = ToolCommand::new("make_grid")
        .arg("20170301.broken.fitacf")
        .stdout_to(&out);

    let err = run_checked(&runner, &cmd, &out.display().to_string())
        .await
        .unwrap_err();
    match err {
        DarnError::RstCommand { program, code } => {
            assert_eq!(program, "make_grid");
            assert_eq!(code, 3);
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_empty_output_is_rst_file_empty() {
    let tmp = temp_test_dir();
    let bin = fake_rst_toolkit(&tmp.path().join("bin"));
    let runner = ProcessRunner::new().with_bin_dir(&bin);

    let out = tmp.path().join("20170301.empty.n.grid");
    let cmd = ToolCommand::new("make_grid")
        .arg("20170301.empty.fitacf")
        .stdout_to(&out);

    let err = run_checked(&runner, &cmd, &out.display().to_string())
        .await
        .unwrap_err();
    assert!(matches!(err, DarnError::RstFileEmpty(ref p) if *p == out));
}

#[tokio::test]
async fn test_missing_program_is_io_error() {
    let runner = ProcessRunner::new();
    let cmd = ToolCommand::new("definitely_not_an_rst_binary_xyz");
    let err = run_checked(&runner, &cmd, "/nonexistent/*.grid")
        .await
        .unwrap_err();
    assert!(matches!(err, DarnError::Io(_)));
}

// ============================================================================
// Environment and bin dir resolution
// ============================================================================

#[tokio::test]
async fn test_env_is_passed_to_children() {
    let tmp = temp_test_dir();
    let bin = fake_rst_toolkit(&tmp.path().join("bin"));
    let log = tmp.path().join("calls.log");
    let runner = ProcessRunner::new()
        .with_bin_dir(&bin)
        .with_env([(test_utils::FAKE_RST_LOG, log.display().to_string())]);

    let cmd = ToolCommand::new("map_addhmb").arg("-vb").arg("in.map");
    let output = runner_run(&runner, &cmd).await;
    assert_eq!(String::from_utf8_lossy(&output).trim(), "map_addhmb -vb in.map");

    assert_eq!(read_invocations(&log), vec!["map_addhmb -vb in.map"]);
}

#[tokio::test]
async fn test_bin_dir_takes_precedence() {
    let tmp = temp_test_dir();
    let bin = tmp.path().join("bin");
    std::fs::create_dir_all(&bin).unwrap();
    // Shadows the system `echo`
    write_tool_script(&bin, "echo", "printf 'shadowed\\n'\n");

    let runner = ProcessRunner::new().with_bin_dir(&bin);
    let output = runner_run(&runner, &ToolCommand::new("echo").arg("hello")).await;
    assert_eq!(String::from_utf8_lossy(&output).trim(), "shadowed");

    let plain = ProcessRunner::new();
    let output = runner_run(&plain, &ToolCommand::new("echo").arg("hello")).await;
    assert_eq!(String::from_utf8_lossy(&output).trim(), "hello");
}

async fn runner_run(runner: &ProcessRunner, cmd: &ToolCommand) -> Vec<u8> {
    use rst_toolkit::CommandRunner;
    let output = runner.run(cmd).await.unwrap();
    assert!(output.success(), "{} failed: {}", cmd, output.stderr_lossy());
    output.stdout
}

// ============================================================================
// Helper tools
// ============================================================================

#[tokio::test]
async fn test_channel_present_via_dmapdump() {
    let tmp = temp_test_dir();
    let bin = fake_rst_toolkit(&tmp.path().join("bin"));
    let runner = ProcessRunner::new().with_bin_dir(&bin);

    let stereo = write_file(tmp.path(), "20170301.han.stereo.fitacf", b"x");
    let mono = write_file(tmp.path(), "20170301.sas.fitacf", b"x");

    assert!(channel_present(&runner, &stereo, 'a').await);
    assert!(channel_present(&runner, &stereo, 'b').await);
    assert!(!channel_present(&runner, &stereo, 'c').await);
    assert!(!channel_present(&runner, &mono, 'a').await);
}

#[tokio::test]
async fn test_decompress_gzip_in_process() {
    let tmp = temp_test_dir();
    let runner = ProcessRunner::new();

    let path = tmp.path().join("20170301.0000.00.sas.fitacf.gz");
    let mut encoder = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::default());
    encoder.write_all(b"fitacf records").unwrap();
    encoder.finish().unwrap();

    let out = decompress(&runner, &path).await.unwrap();
    assert_eq!(out, tmp.path().join("20170301.0000.00.sas.fitacf"));
    assert_eq!(std::fs::read(&out).unwrap(), b"fitacf records");
    assert!(!path.exists(), "compressed source should be removed");
}

#[tokio::test]
async fn test_decompress_bzip2_through_runner() {
    let tmp = temp_test_dir();
    let bin = fake_rst_toolkit(&tmp.path().join("bin"));
    let runner = ProcessRunner::new().with_bin_dir(&bin);

    let path = write_file(tmp.path(), "20170301.0000.00.sas.fitacf.bz2", b"fake");
    let out = decompress(&runner, &path).await.unwrap();
    assert_eq!(out, tmp.path().join("20170301.0000.00.sas.fitacf"));
    assert!(out.exists());
    assert!(!path.exists());
}

#[tokio::test]
async fn test_decompress_plain_fitacf_is_noop() {
    let tmp = temp_test_dir();
    let path = write_file(tmp.path(), "20170301.sas.fitacf", b"plain");
    let out = decompress(&ProcessRunner::new(), &path).await.unwrap();
    assert_eq!(out, path);
}

#[tokio::test]
async fn test_decompress_rejects_unknown_extension() {
    let tmp = temp_test_dir();
    let path = write_file(tmp.path(), "20170301.sas.rawacf.xz", b"?");
    let err = decompress(&ProcessRunner::new(), &path).await.unwrap_err();
    assert!(matches!(err, DarnError::UnsupportedType(_)));
}
