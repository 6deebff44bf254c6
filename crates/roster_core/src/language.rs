use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Locales the feed is published in.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Language {
    Spanish,
    #[default]
    English,
    French,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::Spanish, Language::English, Language::French];

    pub fn from_wire_id(id: u8) -> Option<Self> {
        match id {
            1 => Some(Self::Spanish),
            2 => Some(Self::English),
            3 => Some(Self::French),
            _ => None,
        }
    }

    /// Numeric id the remote feed expects.
    pub fn wire_id(&self) -> u8 {
        match *self {
            Self::Spanish => 1,
            Self::English => 2,
            Self::French => 3,
        }
    }

    pub fn code(&self) -> &'static str {
        match *self {
            Self::Spanish => "es",
            Self::English => "en",
            Self::French => "fr",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match *self {
            Self::Spanish => "Spanish",
            Self::English => "English",
            Self::French => "French",
        }
    }

    /// Accepts a short code, the English name or the wire id.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(id) = raw.parse::<u8>() {
            return Self::from_wire_id(id);
        }
        Self::ALL
            .into_iter()
            .find(|l| raw.eq_ignore_ascii_case(l.code()) || raw.eq_ignore_ascii_case(l.as_str()))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unsupported language {s:?}, expected es|en|fr"))
    }
}
