use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::HmdbError;

static DATE_PREFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{4}-[0-9]{2}-[0-9]{2}").expect("date prefix pattern"));

/// Primary accession of a metabolite record, e.g. `HMDB0000001`.
///
/// Used verbatim as the local name of the record subject, so it must not be
/// empty or contain whitespace.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Accession(String);

impl Accession {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Accession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Accession {
    type Err = HmdbError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let normalized = value.trim();
        let is_valid = !normalized.is_empty() && !normalized.chars().any(char::is_whitespace);
        if !is_valid {
            return Err(HmdbError::InvalidAccession(value.to_string()));
        }
        Ok(Self(normalized.to_string()))
    }
}

/// ChemOnt classification code in its compact form, `C0000123`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct ChemontId(String);

impl ChemontId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChemontId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Parses the OBO form `CHEMONTID:0000123`.
impl FromStr for ChemontId {
    type Err = HmdbError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let code = value
            .trim()
            .strip_prefix("CHEMONTID:")
            .ok_or_else(|| HmdbError::InvalidChemontId(value.to_string()))?;
        if code.is_empty() {
            return Err(HmdbError::InvalidChemontId(value.to_string()));
        }
        Ok(Self(format!("C{code}")))
    }
}

/// Normalized ontology term name: lowercased, spaces replaced by `_`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct TermKey(String);

impl TermKey {
    pub const ROOT: &'static str = "root";

    pub fn normalize(text: &str) -> Self {
        Self(text.to_lowercase().replace(' ', "_"))
    }

    /// Sentinel parent of every top-level term. Never stored in a table.
    pub fn root() -> Self {
        Self(Self::ROOT.to_string())
    }

    pub fn is_root(&self) -> bool {
        self.0 == Self::ROOT
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TermKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateValue<'a> {
    Normalized(&'a str),
    PassThrough(&'a str),
}

impl<'a> DateValue<'a> {
    pub fn as_str(&self) -> &'a str {
        match self {
            DateValue::Normalized(value) | DateValue::PassThrough(value) => value,
        }
    }
}

/// Keeps the leading `YYYY-MM-DD` of a timestamp, or passes the value through.
pub fn normalize_date(value: &str) -> DateValue<'_> {
    match DATE_PREFIX.find(value) {
        Some(found) => DateValue::Normalized(found.as_str()),
        None => DateValue::PassThrough(value),
    }
}
