//! Path utilities for test layouts.

use std::path::{Path, PathBuf};

/// Returns the workspace root directory.
///
/// This is determined by walking up from the current crate's manifest directory
/// until we find the workspace Cargo.toml.
pub fn workspace_root() -> PathBuf {
    // Start from the test-utils crate manifest dir
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    PathBuf::from(manifest_dir)
        .parent() // crates/
        .and_then(|p| p.parent()) // workspace root
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from(manifest_dir))
}

/// Creates a temporary directory for test output.
///
/// The directory is automatically cleaned up when the returned `TempDir` is dropped.
pub fn temp_test_dir() -> tempfile::TempDir {
    tempfile::tempdir().expect("Failed to create temporary test directory")
}

/// Creates a temporary directory with a specific prefix.
pub fn temp_test_dir_with_prefix(prefix: &str) -> tempfile::TempDir {
    tempfile::Builder::new()
        .prefix(prefix)
        .tempdir()
        .expect("Failed to create temporary test directory")
}

/// The directory set one map run reads from and writes to.
#[derive(Debug, Clone)]
pub struct MapDirs {
    pub data: PathBuf,
    pub plot: PathBuf,
    pub map: PathBuf,
    pub grid: PathBuf,
    pub imf: PathBuf,
    pub log: PathBuf,
    pub bin: PathBuf,
}

impl MapDirs {
    /// Lay out `data/ plots/ maps/ grids/ imf/ logs/ bin/` under `root`.
    ///
    /// Only `data/` and `bin/` are created; the pipeline creates the rest.
    pub fn under(root: &Path) -> Self {
        let dirs = Self {
            data: root.join("data"),
            plot: root.join("plots"),
            map: root.join("maps"),
            grid: root.join("grids"),
            imf: root.join("imf"),
            log: root.join("logs"),
            bin: root.join("bin"),
        };
        std::fs::create_dir_all(&dirs.data).expect("Failed to create data dir");
        std::fs::create_dir_all(&dirs.bin).expect("Failed to create bin dir");
        dirs
    }
}

/// Write `contents` to `dir/name` and return the path.
pub fn write_file(dir: &Path, name: &str, contents: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, contents).expect("Failed to write test file");
    path
}
