//! Schedule slot keys
//!
//! A slot identifies one half-hour cell of the daily grid. The wire format is
//! `"{hour}-{00|30}"` (e.g. `"9-00"`, `"14-30"`), which doubles as the JSON
//! map key in the persisted schedule.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// First hour on the grid (5am)
pub const DAY_START_HOUR: u8 = 5;
/// Last hour on the grid (11pm)
pub const DAY_END_HOUR: u8 = 23;

/// Errors from parsing a slot key string
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SlotKeyError {
    #[error("Slot key '{0}' is not in '{{hour}}-{{00|30}}' form")]
    Format(String),
    #[error("Slot hour {0} is outside {DAY_START_HOUR}..={DAY_END_HOUR}")]
    Hour(u8),
    #[error("Slot minute '{0}' must be '00' or '30'")]
    Minute(String),
}

/// Which half of the hour a slot covers
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Half {
    /// On the hour (":00")
    Top,
    /// On the half hour (":30")
    Bottom,
}

impl Half {
    /// Minute value for the wire format
    pub fn minute(self) -> u8 {
        match self {
            Self::Top => 0,
            Self::Bottom => 30,
        }
    }
}

/// Identifier for one half-hour schedule cell
///
/// Ordering is chronological (hour, then half), so a `BTreeMap` keyed by
/// `SlotKey` iterates the day top to bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct SlotKey {
    hour: u8,
    half: Half,
}

impl SlotKey {
    /// Build a slot key, validating the hour range
    pub fn new(hour: u8, half: Half) -> Result<Self, SlotKeyError> {
        if !(DAY_START_HOUR..=DAY_END_HOUR).contains(&hour) {
            return Err(SlotKeyError::Hour(hour));
        }
        Ok(Self { hour, half })
    }

    pub fn hour(self) -> u8 {
        self.hour
    }

    pub fn half(self) -> Half {
        self.half
    }

    /// Human label for the hour row, 12-hour clock ("9:00 AM", "2:30 PM")
    pub fn label(self) -> String {
        let minute = self.half.minute();
        match self.hour {
            12 => format!("12:{:02} PM", minute),
            h if h > 12 => format!("{}:{:02} PM", h - 12, minute),
            h => format!("{}:{:02} AM", h, minute),
        }
    }

    /// Every slot of the day in chronological order
    pub fn all() -> impl Iterator<Item = SlotKey> {
        (DAY_START_HOUR..=DAY_END_HOUR)
            .flat_map(|hour| [Self { hour, half: Half::Top }, Self { hour, half: Half::Bottom }])
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{:02}", self.hour, self.half.minute())
    }
}

impl FromStr for SlotKey {
    type Err = SlotKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (hour_str, minute_str) = s.split_once('-').ok_or_else(|| SlotKeyError::Format(s.to_string()))?;
        let hour: u8 = hour_str.parse().map_err(|_| SlotKeyError::Format(s.to_string()))?;
        let half = match minute_str {
            "00" => Half::Top,
            "30" => Half::Bottom,
            other => return Err(SlotKeyError::Minute(other.to_string())),
        };
        Self::new(hour, half)
    }
}

impl From<SlotKey> for String {
    fn from(key: SlotKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for SlotKey {
    type Error = SlotKeyError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
