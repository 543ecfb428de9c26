//! Template version strings.
//!
//! Versions are `major.minor` or `major.minor.patch`. The shape of the input
//! survives a parse/format round trip: a two-component version never grows a
//! patch number on its own.
//!
//! # Examples
//!
//! ```
//! use doc_blocks::version::parse_version;
//!
//! let v = parse_version(Some("1.2")).unwrap();
//! assert_eq!(v.increment_minor().to_string(), "1.3");
//!
//! let v = parse_version(Some("\"1.2.5\"")).unwrap();
//! assert_eq!(v.increment_major().to_string(), "2.0.0");
//!
//! // Absent or empty input falls back to 1.0
//! assert_eq!(parse_version(None).unwrap().to_string(), "1.0");
//! ```

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;

static VERSION_FORMAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+)\.(\d+)(?:\.(\d+))?$").expect("Invalid version regex")
});

/// Characters stripped from both ends before parsing
const QUOTES: &[char] = &['"', '\''];

/// Why a version string was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VersionError {
    #[error("Version is required")]
    Empty,

    #[error("Invalid version '{raw}': expected MAJOR.MINOR or MAJOR.MINOR.PATCH")]
    Malformed { raw: String },
}

/// A parsed `major.minor[.patch]` version
#[derive(Debug, Clone)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    /// `None` for two-component versions
    pub patch: Option<u64>,
    /// The text this version was parsed from, quotes removed
    pub raw: String,
}

impl Version {
    pub fn new(major: u64, minor: u64, patch: Option<u64>) -> Self {
        let mut version = Self {
            major,
            minor,
            patch,
            raw: String::new(),
        };
        version.raw = version.to_string();
        version
    }

    /// Next major version; minor resets, patch resets only when present
    pub fn increment_major(&self) -> Self {
        Self::new(
            self.major.saturating_add(1),
            0,
            self.patch.map(|_| 0),
        )
    }

    /// Next minor version; patch resets only when present
    pub fn increment_minor(&self) -> Self {
        Self::new(self.major, self.minor.saturating_add(1), self.patch.map(|_| 0))
    }

    /// Three-component semver view, missing patch read as 0
    pub fn to_semver(&self) -> semver::Version {
        semver::Version::new(self.major, self.minor, self.patch.unwrap_or(0))
    }
}

impl Default for Version {
    /// `1.0`
    fn default() -> Self {
        Self::new(1, 0, None)
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.patch {
            Some(patch) => write!(f, "{}.{}.{}", self.major, self.minor, patch),
            None => write!(f, "{}.{}", self.major, self.minor),
        }
    }
}

impl PartialEq for Version {
    fn eq(&self, other: &Self) -> bool {
        (self.major, self.minor, self.patch) == (other.major, other.minor, other.patch)
    }
}

impl Eq for Version {}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Version {
    /// Semver order; `1.2` and `1.2.0` tie on precedence and the shorter form sorts first
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_semver()
            .cmp(&other.to_semver())
            .then_with(|| self.patch.is_some().cmp(&other.patch.is_some()))
    }
}

impl From<&Version> for semver::Version {
    fn from(v: &Version) -> Self {
        v.to_semver()
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_version(Some(s))
    }
}

/// Strip whitespace and surrounding quote characters
fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches(QUOTES).trim()
}

/// Parse a version, tolerating surrounding quotes.
///
/// Absent or empty input yields the default `1.0`. Anything else must match
/// `MAJOR.MINOR[.PATCH]`.
pub fn parse_version(raw: Option<&str>) -> Result<Version, VersionError> {
    let text = raw.map(unquote).unwrap_or("");
    if text.is_empty() {
        return Ok(Version::default());
    }

    let caps = VERSION_FORMAT
        .captures(text)
        .ok_or_else(|| VersionError::Malformed {
            raw: text.to_string(),
        })?;
    let component = |i: usize| -> Result<Option<u64>, VersionError> {
        caps.get(i)
            .map(|m| m.as_str().parse::<u64>())
            .transpose()
            .map_err(|_| VersionError::Malformed {
                raw: text.to_string(),
            })
    };

    Ok(Version {
        major: component(1)?.unwrap_or(0),
        minor: component(2)?.unwrap_or(0),
        patch: component(3)?,
        raw: text.to_string(),
    })
}

/// Check a version string typed by a user.
///
/// Unlike [`parse_version`], empty input is an error here.
pub fn validate_version(raw: &str) -> Result<(), VersionError> {
    let text = unquote(raw);
    if text.is_empty() {
        return Err(VersionError::Empty);
    }
    if !VERSION_FORMAT.is_match(text) {
        return Err(VersionError::Malformed {
            raw: text.to_string(),
        });
    }
    Ok(())
}
