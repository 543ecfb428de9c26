//! Sequence-based record identifiers
//!
//! `ID-0001`, `INV/042`, `C0007`: a prefix, a separator, and a zero-padded
//! sequence number. Formatting is a pure function of the configuration and the
//! number; counters live with the caller.

use serde::{Deserialize, Serialize};

/// Widest zero padding applied; a `u64` never needs more
pub const MAX_ID_DIGITS: usize = 20;

/// How record ids are formatted
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IdConfig {
    pub prefix: String,
    pub separator: String,
    /// Minimum width of the sequence number, zero-padded
    pub digits: usize,
    /// First sequence number handed out
    pub start_from: u64,
    /// Existing ids are never regenerated when set
    pub frozen: bool,
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            prefix: "ID".to_string(),
            separator: "-".to_string(),
            digits: 4,
            start_from: 1,
            frozen: false,
        }
    }
}

impl IdConfig {
    /// Format `sequence` as an id under this configuration
    pub fn generate(&self, sequence: u64) -> String {
        generate_id(self, sequence)
    }

    /// Whether this configuration equals [`IdConfig::default`]
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// Format an id: `prefix + separator + zero-padded(sequence, digits)`.
///
/// Numbers wider than `digits` are printed in full, never truncated. Padding
/// stops at [`MAX_ID_DIGITS`].
///
/// ```
/// use doc_blocks::{IdConfig, generate_id};
///
/// let config = IdConfig { prefix: "C".into(), digits: 3, ..Default::default() };
/// assert_eq!(generate_id(&config, 7), "C-007");
/// assert_eq!(generate_id(&config, 1234), "C-1234");
/// ```
pub fn generate_id(config: &IdConfig, sequence: u64) -> String {
    format!(
        "{}{}{:0width$}",
        config.prefix,
        config.separator,
        sequence,
        width = config.digits.min(MAX_ID_DIGITS)
    )
}

/// Recover the sequence number from an id produced under `config`.
///
/// Returns `None` when the id does not start with the configured prefix and
/// separator or the remainder is not all digits.
pub fn parse_sequence(config: &IdConfig, id: &str) -> Option<u64> {
    let rest = id
        .strip_prefix(config.prefix.as_str())?
        .strip_prefix(config.separator.as_str())?;
    if rest.is_empty() || !rest.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    rest.parse().ok()
}

/// The sequence number following the highest one found in `ids`.
///
/// Falls back to `start_from` when no id matches, and never returns less than
/// `start_from`.
pub fn next_sequence<'a, I>(config: &IdConfig, ids: I) -> u64
where
    I: IntoIterator<Item = &'a str>,
{
    ids.into_iter()
        .filter_map(|id| parse_sequence(config, id))
        .max()
        .map_or(config.start_from, |max| {
            max.saturating_add(1).max(config.start_from)
        })
}
