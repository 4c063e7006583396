//! SuperDARN radar lookup tables.
//!
//! Radars are identified by a 3-letter acronym in fitacf file names. Older
//! `fit` files used a single-letter code; the mapping is kept for lookups only.

use crate::hemisphere::Hemisphere;

/// Northern hemisphere radar acronyms.
///
/// `sch` (Schefferville) no longer operates but older data still uses it.
pub const NORTH_RADARS: [&str; 25] = [
    "ade", "adw", "bks", "cve", "cvw", "cly", "fhe", "fhw", "gbr", "han", "hok", "hkw", "inv",
    "jme", "kap", "ksr", "kod", "lyr", "pyk", "pgr", "rkn", "sas", "sch", "sto", "wal",
];

/// Southern hemisphere radar acronyms.
pub const SOUTH_RADARS: [&str; 14] = [
    "bpk", "dce", "dcn", "fir", "hal", "ker", "san", "sye", "sys", "tig", "unw", "zho", "mcm",
    "sps",
];

const NORTH_LETTERS: [(char, &str); 11] = [
    ('g', "gbr"),
    ('k', "kap"),
    ('t', "sas"),
    ('s', "sch"),
    ('w', "sto"),
    ('f', "han"),
    ('e', "pyk"),
    ('i', "wal"),
    ('a', "kod"),
    ('b', "pgr"),
    ('c', "ksr"),
];

const SOUTH_LETTERS: [(char, &str); 7] = [
    ('h', "hal"),
    ('j', "sys"),
    ('d', "san"),
    ('n', "sye"),
    ('p', "ker"),
    ('r', "tig"),
    ('u', "unw"),
];

/// All radar acronyms for a hemisphere.
pub fn radars(hemisphere: Hemisphere) -> &'static [&'static str] {
    match hemisphere {
        Hemisphere::North => &NORTH_RADARS,
        Hemisphere::South => &SOUTH_RADARS,
    }
}

/// Resolve a legacy single-letter radar code.
pub fn radar_from_letter(hemisphere: Hemisphere, letter: char) -> Option<&'static str> {
    let table: &[(char, &str)] = match hemisphere {
        Hemisphere::North => &NORTH_LETTERS,
        Hemisphere::South => &SOUTH_LETTERS,
    };
    table
        .iter()
        .find(|(l, _)| *l == letter.to_ascii_lowercase())
        .map(|(_, abbrv)| *abbrv)
}

/// Hemisphere a radar acronym belongs to.
pub fn hemisphere_of(acronym: &str) -> Option<Hemisphere> {
    let acronym = acronym.to_lowercase();
    if NORTH_RADARS.contains(&acronym.as_str()) {
        Some(Hemisphere::North)
    } else if SOUTH_RADARS.contains(&acronym.as_str()) {
        Some(Hemisphere::South)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_radar_tables_disjoint() {
        for r in NORTH_RADARS {
            assert!(!SOUTH_RADARS.contains(&r), "{} in both tables", r);
        }
    }

    #[test]
    fn test_letter_lookup() {
        assert_eq!(radar_from_letter(Hemisphere::North, 't'), Some("sas"));
        assert_eq!(radar_from_letter(Hemisphere::South, 'h'), Some("hal"));
        assert_eq!(radar_from_letter(Hemisphere::South, 't'), None);
    }

    #[test]
    fn test_hemisphere_of() {
        assert_eq!(hemisphere_of("inv"), Some(Hemisphere::North));
        assert_eq!(hemisphere_of("MCM"), Some(Hemisphere::South));
        assert_eq!(hemisphere_of("xyz"), None);
    }
}
