//! Fixed options passed to the RST binaries and OMNI timing constants.

/// `make_grid -vemax`: drop velocities with errors above this value.
pub const RST_VEMAX: u32 = 1_000_000;

/// `make_grid -minrng`: drop data below this range gate.
pub const RST_MIN_RANGE: u32 = 10;

/// `make_grid -tl`: ignore the scan flag and cut scans at this length (seconds).
pub const GRID_SCAN_LENGTH_SECS: u32 = 120;

/// `map_grd -l`: lower latitude boundary of the map.
pub const MAP_GRD_LAT_LIMIT: u32 = 50;

/// `map_addmodel -o`: order of the statistical model.
pub const MAP_MODEL_ORDER: u32 = 6;

/// Propagation delay between the OMNI spacecraft and Earth (seconds).
pub const OMNI_DELAY_SECS: i64 = 600;

/// `map_addimf -d`: delay applied to the IMF record, as hh:mm.
pub const IMF_DELAY: &str = "00:10";

/// `convert -density` used when rasterising PostScript plots.
pub const PLOT_DENSITY: u32 = 200;

/// Default colour key passed to `map_plot -vkey`.
pub const DEFAULT_KEY_FILE: &str = "rainbow.key";

/// Channel letters a radar may record.
pub const CHANNEL_LETTERS: [char; 8] = ['a', 'b', 'c', 'd', 'e', 'f', 'g', 'h'];

/// Fitted data formats accepted as pipeline input.
pub const FILE_TYPES: [&str; 1] = ["fitacf"];

/// Compression extensions accepted on fitted data files.
pub const COMPRESSION_TYPES: [&str; 2] = ["gz", "bz2"];

/// An OMNI |B| above this is a fill value.
pub const OMNI_FILL_THRESHOLD: f64 = 999.0;
