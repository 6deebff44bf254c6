use std::collections::BTreeMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};

use crate::language::Language;
use crate::roster::{Coordinate, NameSource, RowSource, split_names};

use super::error::{CoreError, CoreErrorCode};

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Rows and names captured for one language.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedLanguage {
    pub rows: BTreeMap<Coordinate, Vec<String>>,
    pub names: Vec<String>,
}

/// An already executed feed persisted as JSON (optionally gzip-compressed).
///
/// ```json
/// { "languages": { "en": { "rows": { "11": ["header", "..."] }, "names": "A|B" } } }
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedSnapshot {
    languages: BTreeMap<Language, FeedLanguage>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RawFeed {
    #[serde(default)]
    languages: BTreeMap<String, RawFeedLanguage>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct RawFeedLanguage {
    #[serde(default)]
    rows: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    names: String,
}

impl FeedSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let bytes = fs::read(path).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to read feed snapshot {}: {e}", path.display()),
            )
        })?;
        Self::from_bytes(&bytes)
    }

    pub fn from_bytes(bytes: &[u8]) -> Result<Self, CoreError> {
        let json = if bytes.starts_with(&GZIP_MAGIC) {
            let mut out = Vec::new();
            GzDecoder::new(bytes).read_to_end(&mut out).map_err(|e| {
                CoreError::new(
                    CoreErrorCode::Io,
                    format!("failed to decompress feed snapshot: {e}"),
                )
            })?;
            out
        } else {
            bytes.to_vec()
        };

        let raw: RawFeed = serde_json::from_slice(&json).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Parse,
                format!("invalid feed snapshot JSON: {e}"),
            )
        })?;

        let mut languages = BTreeMap::new();
        for (code, raw_language) in raw.languages {
            let lang = Language::parse(&code).ok_or_else(|| {
                CoreError::new(
                    CoreErrorCode::UnsupportedLanguage,
                    format!("feed snapshot lists unsupported language {code:?}"),
                )
            })?;
            let mut rows = BTreeMap::new();
            for (key, values) in raw_language.rows {
                let coordinate = key
                    .trim()
                    .parse::<u32>()
                    .ok()
                    .and_then(Coordinate::from_code)
                    .ok_or_else(|| {
                        CoreError::new(
                            CoreErrorCode::Parse,
                            format!("invalid coordinate key {key:?} for language {code}"),
                        )
                    })?;
                rows.insert(coordinate, values);
            }
            languages.insert(
                lang,
                FeedLanguage {
                    rows,
                    names: split_names(&raw_language.names),
                },
            );
        }

        Ok(Self { languages })
    }

    /// Serialize back to the uncompressed JSON form.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        let raw = RawFeed {
            languages: self
                .languages
                .iter()
                .map(|(lang, feed)| {
                    let rows = feed
                        .rows
                        .iter()
                        .map(|(c, values)| (c.code().to_string(), values.clone()))
                        .collect();
                    (
                        lang.code().to_string(),
                        RawFeedLanguage {
                            rows,
                            names: feed.names.join("|"),
                        },
                    )
                })
                .collect(),
        };
        serde_json::to_vec_pretty(&raw).map_err(|e| {
            CoreError::new(
                CoreErrorCode::Io,
                format!("failed to serialize feed snapshot: {e}"),
            )
        })
    }

    pub fn insert(&mut self, lang: Language, feed: FeedLanguage) {
        self.languages.insert(lang, feed);
    }

    pub fn languages(&self) -> Vec<Language> {
        self.languages.keys().copied().collect()
    }

    pub fn language(&self, lang: Language) -> Option<&FeedLanguage> {
        self.languages.get(&lang)
    }
}

impl RowSource for FeedSnapshot {
    fn rows(&self, coordinate: Coordinate, lang: Language) -> Vec<String> {
        self.languages
            .get(&lang)
            .and_then(|feed| feed.rows.get(&coordinate))
            .cloned()
            .unwrap_or_default()
    }
}

impl NameSource for FeedSnapshot {
    fn names(&self, lang: Language) -> Vec<String> {
        self.languages
            .get(&lang)
            .map(|feed| feed.names.clone())
            .unwrap_or_default()
    }
}
