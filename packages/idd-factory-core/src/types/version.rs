use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::RegistryError;

/// Structured IDD version, `major.minor[.patch[.build]][-tag]`.
///
/// Comparison uses the numeric components only, with missing components
/// as zero, so `1.0` and `1.0.0` are equal. The text it was parsed from is
/// kept and is what `Display` prints.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct VersionString {
    major: u32,
    minor: u32,
    patch: Option<u32>,
    build: Option<u32>,
    raw: String,
}

impl VersionString {
    pub fn new(major: u32, minor: u32, patch: Option<u32>) -> Self {
        let raw = match patch {
            Some(patch) => format!("{}.{}.{}", major, minor, patch),
            None => format!("{}.{}", major, minor),
        };
        Self {
            major,
            minor,
            patch,
            build: None,
            raw,
        }
    }

    /// Parses a version string. A trailing `-tag` or `+tag` is kept in the
    /// text but ignored for comparison.
    pub fn parse(s: &str) -> Result<Self, RegistryError> {
        let trimmed = s.trim();
        let numeric = match trimmed.split_once(|c: char| c == '-' || c == '+') {
            Some((_, "")) => return Err(RegistryError::InvalidVersion(s.to_string())),
            Some((numeric, _)) => numeric,
            None => trimmed,
        };
        let parts: Vec<&str> = numeric.split('.').collect();
        if !(2..=4).contains(&parts.len()) {
            return Err(RegistryError::InvalidVersion(s.to_string()));
        }
        let mut numbers = Vec::with_capacity(parts.len());
        for part in &parts {
            let n = part
                .parse::<u32>()
                .map_err(|_| RegistryError::InvalidVersion(s.to_string()))?;
            numbers.push(n);
        }
        Ok(Self {
            major: numbers[0],
            minor: numbers[1],
            patch: numbers.get(2).copied(),
            build: numbers.get(3).copied(),
            raw: trimmed.to_string(),
        })
    }

    pub fn major(&self) -> u32 {
        self.major
    }

    pub fn minor(&self) -> u32 {
        self.minor
    }

    pub fn patch(&self) -> Option<u32> {
        self.patch
    }

    pub fn build(&self) -> Option<u32> {
        self.build
    }

    /// The version text as written.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    fn key(&self) -> (u32, u32, u32, u32) {
        (
            self.major,
            self.minor,
            self.patch.unwrap_or(0),
            self.build.unwrap_or(0),
        )
    }
}

impl PartialEq for VersionString {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for VersionString {}

impl Hash for VersionString {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

impl PartialOrd for VersionString {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for VersionString {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key().cmp(&other.key())
    }
}

impl fmt::Display for VersionString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl FromStr for VersionString {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for VersionString {
    type Error = RegistryError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<VersionString> for String {
    fn from(value: VersionString) -> Self {
        value.raw
    }
}
