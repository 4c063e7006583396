//! Helper tools around the main RST chain: channel probing and decompression.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use darn_common::files::strip_compression;
use darn_common::{CompressionType, DarnError, DarnResult, DataFileKind};
use flate2::read::GzDecoder;
use tracing::{debug, info};

use crate::command::ToolCommand;
use crate::runner::CommandRunner;

/// Count `"channel" = X` records in `dmapdump` output.
///
/// `dmapdump` prints the channel either as the letter or as its stereo index
/// (a = 1, b = 2, ...); both are accepted.
pub fn count_channel_records(dump: &[u8], channel: char) -> usize {
    let letter = channel.to_ascii_lowercase().to_string();
    let index = (channel.to_ascii_lowercase() as u32)
        .checked_sub('a' as u32)
        .map(|i| (i + 1).to_string());

    String::from_utf8_lossy(dump)
        .lines()
        .filter_map(|line| {
            let pos = line.find("\"channel\"")?;
            let (_, value) = line[pos..].split_once('=')?;
            Some(value.trim().trim_end_matches(';').trim_matches('"').to_string())
        })
        .filter(|value| *value == letter || Some(value) == index.as_ref())
        .count()
}

/// Whether `file` holds any records for `channel`.
///
/// Any failure to run `dmapdump` counts as "not present".
pub async fn channel_present(runner: &dyn CommandRunner, file: &Path, channel: char) -> bool {
    let cmd = ToolCommand::new("dmapdump").path_arg(file).discard_stderr();
    match runner.run(&cmd).await {
        Ok(output) if output.success() => count_channel_records(&output.stdout, channel) > 0,
        Ok(output) => {
            debug!(file = %file.display(), code = ?output.code, "dmapdump failed");
            false
        }
        Err(e) => {
            debug!(file = %file.display(), error = %e, "dmapdump could not run");
            false
        }
    }
}

/// Decompress a staged data file in place and return the uncompressed path.
///
/// Gzip is handled in-process; bzip2 goes through the `bzip2` binary.
pub async fn decompress(runner: &dyn CommandRunner, path: &Path) -> DarnResult<PathBuf> {
    let target = strip_compression(path);

    match DataFileKind::detect(path)? {
        DataFileKind::Fitacf => return Ok(path.to_path_buf()),
        DataFileKind::Compressed(CompressionType::Gzip) => {
            let src = path.to_path_buf();
            let dst = target.clone();
            tokio::task::spawn_blocking(move || gunzip(&src, &dst))
                .await
                .map_err(|e| DarnError::Io(io::Error::other(e)))??;
            tokio::fs::remove_file(path).await?;
        }
        DataFileKind::Compressed(CompressionType::Bzip2) => {
            let cmd = ToolCommand::new("bzip2").arg("-df").path_arg(path);
            let output = runner.run(&cmd).await?;
            if !output.success() {
                return Err(DarnError::RstCommand {
                    program: cmd.program_name(),
                    code: output.code.unwrap_or(-1),
                });
            }
        }
    }

    info!(file = %target.display(), "Decompressed data file");
    Ok(target)
}

fn gunzip(src: &Path, dst: &Path) -> DarnResult<()> {
    let mut decoder = GzDecoder::new(File::open(src)?);
    let mut out = BufWriter::new(File::create(dst)?);
    io::copy(&mut decoder, &mut out)?;
    Ok(())
}
