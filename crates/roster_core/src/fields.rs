use std::error::Error;
use std::fmt;

use crate::stat::Stat;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeErrorKind {
    Empty,
    MissingField,
    ExtraField,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodeError {
    pub kind: DecodeErrorKind,
    pub message: String,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for DecodeError {}

/// Positional view over one delimited segment of a record.
///
/// The feed never escapes its delimiters, so splitting is a plain
/// `str::split`; every accessor is index based and reports the segment
/// name on failure.
#[derive(Debug, Clone)]
pub struct FieldReader<'a> {
    context: &'static str,
    fields: Vec<&'a str>,
}

impl<'a> FieldReader<'a> {
    /// Split `raw` on `delimiter` and require at least `required` fields.
    pub fn split(
        raw: &'a str,
        delimiter: char,
        context: &'static str,
        required: usize,
    ) -> Result<Self, DecodeError> {
        let fields: Vec<&'a str> = raw.split(delimiter).collect();
        if fields.len() < required {
            return Err(DecodeError::new(
                DecodeErrorKind::MissingField,
                format!(
                    "{context}: expected at least {required} '{delimiter}'-delimited fields, got {}",
                    fields.len()
                ),
            ));
        }
        Ok(Self { context, fields })
    }

    /// Like [`FieldReader::split`], but the segment must hold exactly
    /// `count` fields.
    pub fn split_exact(
        raw: &'a str,
        delimiter: char,
        context: &'static str,
        count: usize,
    ) -> Result<Self, DecodeError> {
        let reader = Self::split(raw, delimiter, context, count)?;
        if reader.len() > count {
            return Err(DecodeError::new(
                DecodeErrorKind::ExtraField,
                format!(
                    "{context}: expected exactly {count} '{delimiter}'-delimited fields, got {}",
                    reader.len()
                ),
            ));
        }
        Ok(reader)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Number of fields carrying something other than whitespace.
    pub fn populated_count(&self) -> usize {
        self.fields.iter().filter(|f| !f.trim().is_empty()).count()
    }

    pub fn read_str(&self, index: usize) -> Result<&'a str, DecodeError> {
        self.fields.get(index).copied().ok_or_else(|| {
            DecodeError::new(
                DecodeErrorKind::MissingField,
                format!(
                    "{}: field {index} missing ({} present)",
                    self.context,
                    self.fields.len()
                ),
            )
        })
    }

    pub fn read_string(&self, index: usize) -> Result<String, DecodeError> {
        self.read_str(index).map(|s| s.trim().to_string())
    }

    pub fn read_flag(&self, index: usize) -> Result<bool, DecodeError> {
        self.read_str(index).map(|s| s.trim() == "1")
    }

    pub fn read_stat(&self, index: usize) -> Result<Stat, DecodeError> {
        self.read_str(index).map(Stat::from_raw)
    }
}
