//! Fake RST toolkit binaries.
//!
//! Each script is a tiny `/bin/sh` program with the same name and output
//! contract as the real tool, so the pipeline can run end to end through the
//! real process runner. When `FAKE_RST_LOG` is set every invocation is
//! appended to that file as `program args...`.
//!
//! Failure injection: `make_grid` exits 3 for any input whose path contains
//! `broken` and prints nothing for paths containing `empty`.

use std::path::{Path, PathBuf};

/// Environment variable naming the invocation log.
pub const FAKE_RST_LOG: &str = "FAKE_RST_LOG";

const PRELUDE: &str = r#"#!/bin/sh
if [ -n "$FAKE_RST_LOG" ]; then
  echo "$(basename "$0") $*" >> "$FAKE_RST_LOG"
fi
"#;

const MAKE_GRID: &str = r#"for a in "$@"; do
  case "$a" in
    *broken*) echo "make_grid: bad record in $a" >&2; exit 3 ;;
    *empty*) exit 0 ;;
  esac
done
echo "grid $*"
"#;

const PASSTHROUGH: &str = r#"echo "$(basename "$0") $*"
"#;

const MAP_PLOT: &str = r#"dir=.
prev=
last=
for a in "$@"; do
  if [ "$prev" = "-path" ]; then dir="$a"; fi
  prev="$a"
  last="$a"
done
name=$(basename "$last")
day=${name%%.*}
echo "%!PS-Adobe-3.0" > "$dir/$day.0000.00.ps"
echo "%!PS-Adobe-3.0" > "$dir/$day.0002.00.ps"
"#;

// convert -density N in.ps out.ext
const CONVERT: &str = r#"eval src=\${$(($# - 1))}
eval dst=\${$#}
cp "$src" "$dst"
"#;

const DMAPDUMP: &str = r#"case "$1" in
  *stereo*) printf 'scalars:\n    short "channel" = 1\nscalars:\n    short "channel" = 2\n' ;;
  *) printf 'scalars:\n    short "bmnum" = 7\n' ;;
esac
"#;

// bzip2 -df file.bz2
const BZIP2: &str = r#"src="$2"
mv "$src" "${src%.bz2}"
"#;

/// Write an executable script `dir/name` with `body` after the logging prelude.
pub fn write_tool_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, format!("{}{}", PRELUDE, body)).expect("Failed to write tool script");
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755))
            .expect("Failed to chmod tool script");
    }
    path
}

/// Install the whole fake toolkit into `bin_dir` and return it.
pub fn fake_rst_toolkit(bin_dir: &Path) -> PathBuf {
    std::fs::create_dir_all(bin_dir).expect("Failed to create bin dir");
    write_tool_script(bin_dir, "make_grid", MAKE_GRID);
    for name in [
        "combine_grid",
        "map_grd",
        "map_addhmb",
        "map_addimf",
        "map_addmodel",
        "map_fit",
    ] {
        write_tool_script(bin_dir, name, PASSTHROUGH);
    }
    write_tool_script(bin_dir, "map_plot", MAP_PLOT);
    write_tool_script(bin_dir, "convert", CONVERT);
    write_tool_script(bin_dir, "dmapdump", DMAPDUMP);
    write_tool_script(bin_dir, "bzip2", BZIP2);
    bin_dir.to_path_buf()
}

/// Invocations recorded in `log`, one `program args...` line each.
pub fn read_invocations(log: &Path) -> Vec<String> {
    std::fs::read_to_string(log)
        .map(|s| s.lines().map(str::to_string).collect())
        .unwrap_or_default()
}
