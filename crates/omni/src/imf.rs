//! OMNI listing to IMF file conversion.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use darn_common::constants::OMNI_FILL_THRESHOLD;
use tracing::{info, warn};

use crate::error::{OmniError, OmniResult};
use crate::files::OmniFiles;

/// One IMF record as written for `map_addimf`.
///
/// Hour, minute and field components keep the listing's own text so no
/// precision is lost in a float round trip.
#[derive(Debug, Clone, PartialEq)]
pub struct ImfLine {
    pub date: NaiveDate,
    pub hour: String,
    pub minute: String,
    pub bx: String,
    pub by: String,
    pub bz: String,
    /// |B| was a fill value
    pub bad: bool,
}

impl fmt::Display for ImfLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {:02} {:02} {} {} 00 {} {} {}",
            self.date.year(),
            self.date.month(),
            self.date.day(),
            self.hour,
            self.minute,
            self.bx,
            self.by,
            self.bz
        )
    }
}

/// Parse one `year doy hour minute |B| Bx By Bz` listing line.
///
/// Returns `None` for lines that are not a record.
pub fn convert_line(line: &str) -> Option<ImfLine> {
    let fields: Vec<&str> = line.split_whitespace().collect();
    if fields.len() < 8 {
        return None;
    }

    let year: i32 = fields[0].parse().ok()?;
    let doy: u32 = fields[1].parse().ok()?;
    let date = NaiveDate::from_yo_opt(year, doy)?;
    let b_total: f64 = fields[4].parse().ok()?;

    Some(ImfLine {
        date,
        hour: fields[2].to_string(),
        minute: fields[3].to_string(),
        bx: fields[5].to_string(),
        by: fields[6].to_string(),
        bz: fields[7].to_string(),
        bad: b_total > OMNI_FILL_THRESHOLD,
    })
}

/// Counts from one conversion.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImfSummary {
    pub records: usize,
    pub bad_records: usize,
}

impl ImfSummary {
    pub fn all_bad(&self) -> bool {
        self.bad_records == self.records
    }
}

/// Convert the day's OMNI listing into the IMF file.
///
/// Fails with `BadData` (and leaves no IMF file behind) when the listing
/// holds no usable record.
pub async fn convert_to_imf(files: &OmniFiles) -> OmniResult<ImfSummary> {
    let omni_path = files.omni_path();
    if !omni_path.exists() {
        return Err(OmniError::FileNotFound(omni_path));
    }

    let text = tokio::fs::read_to_string(&omni_path).await?;
    let mut summary = ImfSummary::default();
    let mut out = String::with_capacity(text.len());

    for (lineno, line) in text.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        match convert_line(line) {
            Some(record) => {
                summary.records += 1;
                if record.bad {
                    summary.bad_records += 1;
                }
                out.push_str(&record.to_string());
                out.push('\n');
            }
            None => warn!(
                file = %omni_path.display(),
                line = lineno + 1,
                "Skipping malformed OMNI line"
            ),
        }
    }

    let imf_path = files.imf_path();
    if summary.all_bad() {
        if imf_path.exists() {
            tokio::fs::remove_file(&imf_path).await?;
        }
        return Err(OmniError::BadData {
            date: files.date().to_string(),
        });
    }

    tokio::fs::write(&imf_path, out).await?;
    info!(
        path = %imf_path.display(),
        records = summary.records,
        bad_records = summary.bad_records,
        "Wrote IMF file"
    );
    Ok(summary)
}
