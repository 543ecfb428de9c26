//! Data block payload codec
//!
//! A `data` block holds a flat YAML mapping of scalar fields:
//!
//! ```yaml
//! type: contact
//! name: Ada
//! age: 36
//! active: true
//! ```
//!
//! Field order is significant and preserved in both directions. Anything that
//! is not a flat mapping of scalars decodes to an empty field list.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Number, Value as YamlValue};

/// Key holding the schema discriminator
pub const TYPE_KEY: &str = "type";

/// Key holding the record id
pub const ID_KEY: &str = "id";

/// Largest integer an f64 represents exactly
const MAX_EXACT_INT: f64 = 9_007_199_254_740_992.0;

/// A scalar field value
///
/// Numbers keep the YAML representation they were read with, so integers
/// wider than an f64 mantissa survive a decode/encode cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Str(String),
    Num(Number),
    Bool(bool),
}

impl FieldValue {
    /// Interpret text typed by a user.
    ///
    /// `true` / `false` become booleans, anything that parses fully as a
    /// finite number becomes a number, everything else stays a string.
    ///
    /// ```
    /// use doc_blocks::FieldValue;
    ///
    /// assert_eq!(FieldValue::coerce("true"), FieldValue::Bool(true));
    /// assert_eq!(FieldValue::coerce("42"), FieldValue::Num(42.into()));
    /// assert_eq!(FieldValue::coerce("42 apples"), FieldValue::Str("42 apples".into()));
    /// ```
    pub fn coerce(raw: &str) -> Self {
        match raw {
            "true" => return Self::Bool(true),
            "false" => return Self::Bool(false),
            _ => {}
        }
        let trimmed = raw.trim();
        if let Ok(n) = trimmed.parse::<i64>() {
            return Self::Num(n.into());
        }
        if let Ok(n) = trimmed.parse::<u64>() {
            return Self::Num(n.into());
        }
        if !trimmed.is_empty()
            && let Ok(n) = trimmed.parse::<f64>()
            && n.is_finite()
        {
            return Self::Num(number_to_yaml(n));
        }
        Self::Str(raw.to_string())
    }

    pub fn empty() -> Self {
        Self::Str(String::new())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    fn to_yaml(&self) -> YamlValue {
        match self {
            Self::Str(s) => YamlValue::String(s.clone()),
            Self::Bool(b) => YamlValue::Bool(*b),
            Self::Num(n) => YamlValue::Number(n.clone()),
        }
    }

    fn from_yaml(value: &YamlValue) -> Option<Self> {
        match value {
            YamlValue::Null => Some(Self::empty()),
            YamlValue::Bool(b) => Some(Self::Bool(*b)),
            YamlValue::Number(n) => Some(Self::Num(n.clone())),
            YamlValue::String(s) => Some(Self::Str(s.clone())),
            YamlValue::Sequence(_) | YamlValue::Mapping(_) | YamlValue::Tagged(_) => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Str(s) => f.write_str(s),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Num(n) => write!(f, "{n}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Str(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Str(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Num(number_to_yaml(n))
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        Self::Num(n.into())
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

fn is_exact_int(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < MAX_EXACT_INT
}

/// Integral values are written without a fractional part
fn number_to_yaml(n: f64) -> Number {
    if is_exact_int(n) {
        Number::from(n as i64)
    } else {
        Number::from(n)
    }
}

/// One `key: value` pair
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Field {
    pub key: String,
    pub value: FieldValue,
}

impl Field {
    pub fn new(key: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// Ordered field list of a data block
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DataFields(Vec<Field>);

impl DataFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.0.iter().find(|f| f.key == key).map(|f| &f.value)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.iter().any(|f| f.key == key)
    }

    /// Replace the value in place, or append the field when the key is new
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<FieldValue>) {
        let key = key.into();
        let value = value.into();
        match self.0.iter_mut().find(|f| f.key == key) {
            Some(field) => field.value = value,
            None => self.0.push(Field { key, value }),
        }
    }

    pub fn remove(&mut self, key: &str) -> Option<FieldValue> {
        let pos = self.0.iter().position(|f| f.key == key)?;
        Some(self.0.remove(pos).value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|f| f.key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &Field> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The schema discriminator, rendered as text
    pub fn data_type(&self) -> Option<String> {
        self.get(TYPE_KEY).map(FieldValue::to_string)
    }
}

impl From<Vec<Field>> for DataFields {
    fn from(fields: Vec<Field>) -> Self {
        Self(fields)
    }
}

impl FromIterator<Field> for DataFields {
    fn from_iter<I: IntoIterator<Item = Field>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for DataFields {
    type Item = Field;
    type IntoIter = std::vec::IntoIter<Field>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

/// Decode a data block payload.
///
/// Soft-fails: content that is not a flat mapping of scalars yields an empty
/// list.
///
/// ```
/// use doc_blocks::{FieldValue, decode};
///
/// let fields = decode("type: contact\nage: 36");
/// assert_eq!(fields.data_type().as_deref(), Some("contact"));
/// assert_eq!(fields.get("age"), Some(&FieldValue::Num(36.into())));
/// assert!(decode("- not\n- a mapping").is_empty());
/// ```
pub fn decode(content: &str) -> DataFields {
    match try_decode(content) {
        Ok(fields) => fields,
        Err(reason) => {
            tracing::debug!(%reason, "Data payload did not decode, treating as empty");
            DataFields::default()
        }
    }
}

/// Strict decode: the reason is returned instead of an empty list.
///
/// Blank content is an empty mapping.
pub(crate) fn try_decode(content: &str) -> Result<DataFields, String> {
    if content.trim().is_empty() {
        return Ok(DataFields::new());
    }
    let value: YamlValue = serde_yaml::from_str(content).map_err(|e| e.to_string())?;
    let YamlValue::Mapping(map) = value else {
        return Err("payload is not a mapping".to_string());
    };

    map.iter()
        .map(|(k, v)| {
            let key = match k {
                YamlValue::String(s) => s.clone(),
                YamlValue::Number(n) => n.to_string(),
                YamlValue::Bool(b) => b.to_string(),
                _ => return Err("non-scalar key".to_string()),
            };
            let value =
                FieldValue::from_yaml(v).ok_or_else(|| format!("field '{key}' is not a scalar"))?;
            Ok(Field { key, value })
        })
        .collect()
}

/// Encode fields as `key: value` lines, in order, without a trailing newline.
///
/// Strings are quoted only where YAML would otherwise read them back as a
/// different type.
pub fn encode(fields: &DataFields) -> String {
    if fields.is_empty() {
        return String::new();
    }

    let mut map = Mapping::with_capacity(fields.len());
    for field in fields.iter() {
        map.insert(YamlValue::String(field.key.clone()), field.value.to_yaml());
    }

    // Serializing an in-memory mapping of scalars cannot fail
    serde_yaml::to_string(&YamlValue::Mapping(map))
        .map(|s| s.trim_end_matches('\n').to_string())
        .unwrap_or_default()
}
