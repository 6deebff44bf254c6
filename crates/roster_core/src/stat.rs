use std::fmt;

use serde::{Deserialize, Serialize};

/// A numeric feed value. `Unknown` marks a field that did not parse,
/// which display layers must keep apart from a real zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Stat {
    Value(i32),
    #[default]
    Unknown,
}

impl Stat {
    /// Leading-integer parse: optional whitespace and sign, then digits.
    /// Trailing text after the digits is ignored (`"12+"` is 12).
    pub fn from_raw(raw: &str) -> Self {
        let s = raw.trim_start();
        let (negative, digits) = match s.as_bytes().first() {
            Some(b'-') => (true, &s[1..]),
            Some(b'+') => (false, &s[1..]),
            _ => (false, s),
        };
        let end = digits
            .bytes()
            .position(|b| !b.is_ascii_digit())
            .unwrap_or(digits.len());
        if end == 0 {
            return Self::Unknown;
        }
        match digits[..end].parse::<i32>() {
            Ok(v) if negative => Self::Value(-v),
            Ok(v) => Self::Value(v),
            Err(_) => Self::Unknown,
        }
    }

    pub fn value(&self) -> Option<i32> {
        match *self {
            Self::Value(v) => Some(v),
            Self::Unknown => None,
        }
    }

    pub fn is_unknown(&self) -> bool {
        matches!(self, Self::Unknown)
    }
}

impl fmt::Display for Stat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Value(v) => write!(f, "{v}"),
            Self::Unknown => f.write_str("-"),
        }
    }
}

/// Stat field 7 is either wounds or structure depending on field 9.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum HitPoints {
    Wounds(i32),
    Structure(i32),
    #[default]
    Unknown,
}

impl HitPoints {
    pub const WOUNDS_DISCRIMINATOR: &'static str = "0";

    pub fn from_raw(value: &str, discriminator: &str) -> Self {
        let Some(v) = Stat::from_raw(value).value() else {
            return Self::Unknown;
        };
        if discriminator.trim() == Self::WOUNDS_DISCRIMINATOR {
            Self::Wounds(v)
        } else {
            Self::Structure(v)
        }
    }

    pub fn wounds(&self) -> Option<i32> {
        match *self {
            Self::Wounds(v) => Some(v),
            _ => None,
        }
    }

    pub fn structure(&self) -> Option<i32> {
        match *self {
            Self::Structure(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Wounds(_) => "wounds",
            Self::Structure(_) => "structure",
            Self::Unknown => "unknown",
        }
    }

    pub fn value(&self) -> Option<i32> {
        match *self {
            Self::Wounds(v) | Self::Structure(v) => Some(v),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for HitPoints {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            Self::Wounds(v) => write!(f, "W {v}"),
            Self::Structure(v) => write!(f, "STR {v}"),
            Self::Unknown => f.write_str("W -"),
        }
    }
}

/// Movement pair in output units. `(0, 0)` when the source was unparsable.
///
/// Source values are not always multiples of the source step, so the
/// converted pair keeps its fraction (`6-4` is `2.4-1.6`).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Movement {
    pub first: f64,
    pub second: f64,
}

impl Movement {
    pub const SOURCE_STEP: f64 = 5.0;
    pub const OUTPUT_STEP: f64 = 2.0;

    pub fn new(first: f64, second: f64) -> Self {
        Self { first, second }
    }

    /// Each side is `source * 2 / 5`, rounded once.
    pub fn from_source(first: i32, second: i32) -> Self {
        Self {
            first: f64::from(first) * Self::OUTPUT_STEP / Self::SOURCE_STEP,
            second: f64::from(second) * Self::OUTPUT_STEP / Self::SOURCE_STEP,
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.first, self.second)
    }
}
