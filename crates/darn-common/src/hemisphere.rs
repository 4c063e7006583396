//! Hemisphere and radar channel selection.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::constants::CHANNEL_LETTERS;
use crate::error::DarnError;

/// Which polar cap a map run assimilates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Hemisphere {
    #[default]
    North,
    South,
}

impl Hemisphere {
    /// Single-letter extension used in file names.
    pub fn ext(&self) -> char {
        match self {
            Hemisphere::North => 'n',
            Hemisphere::South => 's',
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Hemisphere::North => "north",
            Hemisphere::South => "south",
        }
    }
}

impl FromStr for Hemisphere {
    type Err = DarnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "north" | "n" => Ok(Hemisphere::North),
            "south" | "s" => Ok(Hemisphere::South),
            other => Err(DarnError::invalid(
                "hemisphere",
                format!("'{}' is not one of north, south", other),
            )),
        }
    }
}

impl fmt::Display for Hemisphere {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Radar channel selection for gridding.
///
/// Stereo radars record several channels, either in separate files
/// (`20170301.0000.00.sas.a.fitacf`) or interleaved in one file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Channel {
    #[default]
    All,
    Single(char),
}

impl Channel {
    /// Letters to check for when gridding.
    pub fn letters(&self) -> Vec<char> {
        match self {
            Channel::All => CHANNEL_LETTERS.to_vec(),
            Channel::Single(c) => vec![*c],
        }
    }
}

impl FromStr for Channel {
    type Err = DarnError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(Channel::All);
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if CHANNEL_LETTERS.contains(&c.to_ascii_lowercase()) => {
                Ok(Channel::Single(c.to_ascii_lowercase()))
            }
            _ => Err(DarnError::invalid(
                "channel",
                format!("'{}' is not a channel letter a-h", s),
            )),
        }
    }
}

impl TryFrom<String> for Channel {
    type Error = DarnError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Channel> for String {
    fn from(value: Channel) -> Self {
        match value {
            Channel::All => String::new(),
            Channel::Single(c) => c.to_string(),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Channel::All => f.write_str("all"),
            Channel::Single(c) => write!(f, "{}", c),
        }
    }
}
