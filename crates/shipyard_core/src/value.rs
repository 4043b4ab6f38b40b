//! Attribute values and insertion-ordered attribute maps.
//!
//! Every field the parser does not model explicitly ends up in an
//! [`AttributeMap`]. Maps keep insertion order so that serialized output is
//! reproducible and diffs cleanly between runs.

use indexmap::map::Entry;
use indexmap::IndexMap;
use serde::{Serialize, Serializer};

/// Largest magnitude written as an integer. Beyond this `f64` loses integer precision.
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// A single parsed value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Key present without a value.
    Bool(bool),
    /// Any value that fully parses as a finite floating-point number.
    Number(f64),
    /// Any other scalar text.
    String(String),
    /// Produced when a key repeats within one block.
    List(Vec<Value>),
    /// A nested indented block.
    Map(AttributeMap),
}

impl Value {
    /// Coerce raw value text: numbers become [`Value::Number`], everything else stays text.
    #[must_use]
    pub fn coerce(text: &str) -> Self {
        match parse_number(text) {
            Some(number) => Self::Number(number),
            None => Self::String(text.to_string()),
        }
    }

    /// Numeric view of the value.
    #[must_use]
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// String view of the value.
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Map view of the value.
    #[must_use]
    pub fn as_map(&self) -> Option<&AttributeMap> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    /// List view of the value.
    #[must_use]
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    /// Render a scalar back to text. Lists and maps have no text form.
    #[must_use]
    pub fn to_text(&self) -> Option<String> {
        match self {
            Self::Bool(b) => Some(b.to_string()),
            Self::Number(n) => Some(format_number(*n)),
            Self::String(s) => Some(s.clone()),
            Self::List(_) | Self::Map(_) => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Bool(b) => serializer.serialize_bool(*b),
            Self::Number(n) => serialize_number(n, serializer),
            Self::String(s) => serializer.serialize_str(s),
            Self::List(items) => items.serialize(serializer),
            Self::Map(map) => map.serialize(serializer),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<AttributeMap> for Value {
    fn from(value: AttributeMap) -> Self {
        Self::Map(value)
    }
}

/// Ordered mapping from key to [`Value`].
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct AttributeMap(IndexMap<String, Value>);

impl AttributeMap {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Insert a value with repeated-key promotion.
    ///
    /// The first occurrence is stored as-is. The second occurrence turns the
    /// entry into a list holding both values; later occurrences append to it.
    /// The entry keeps the position of its first occurrence.
    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        match self.0.entry(key.into()) {
            Entry::Vacant(slot) => {
                slot.insert(value);
            }
            Entry::Occupied(mut slot) => match slot.get_mut() {
                Value::List(items) => items.push(value),
                existing => {
                    let first = std::mem::replace(existing, Value::Bool(true));
                    *existing = Value::List(vec![first, value]);
                }
            },
        }
    }

    /// Insert or overwrite a value, keeping the position of an existing key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.0.insert(key.into(), value)
    }

    /// Apply an additive override: numbers add onto numbers, anything else overwrites.
    pub fn add(&mut self, key: impl Into<String>, value: Value) {
        match (self.0.entry(key.into()), value) {
            (Entry::Occupied(mut slot), Value::Number(delta)) => match slot.get_mut() {
                Value::Number(current) => *current += delta,
                other => *other = Value::Number(delta),
            },
            (Entry::Occupied(mut slot), value) => {
                slot.insert(value);
            }
            (Entry::Vacant(slot), value) => {
                slot.insert(value);
            }
        }
    }

    /// Look up a value.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Look up a numeric value.
    #[must_use]
    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_f64)
    }

    /// Look up a string value.
    #[must_use]
    pub fn string(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// Look up a nested map.
    #[must_use]
    pub fn map(&self, key: &str) -> Option<&AttributeMap> {
        self.get(key).and_then(Value::as_map)
    }

    /// Check if a key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the map is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl FromIterator<(String, Value)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.push(key, value);
        }
        map
    }
}

/// Parse text that is entirely a finite floating-point number.
#[must_use]
pub fn parse_number(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Write integral numbers without a fractional part.
pub fn serialize_number<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        serializer.serialize_i64(*value as i64)
    } else {
        serializer.serialize_f64(*value)
    }
}

/// [`serialize_number`] for optional fields.
pub fn serialize_optional_number<S: Serializer>(
    value: &Option<f64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(number) => serialize_number(number, serializer),
        None => serializer.serialize_none(),
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < MAX_EXACT_INTEGER {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_coerce_numbers_and_text() {
        assert_eq!(Value::coerce("1000"), Value::Number(1000.0));
        assert_eq!(Value::coerce("-0.25"), Value::Number(-0.25));
        assert_eq!(Value::coerce("1e3"), Value::Number(1000.0));
        assert_eq!(Value::coerce("5 10"), Value::String("5 10".into()));
        assert_eq!(Value::coerce("Light Warship"), Value::from("Light Warship"));
    }

    #[test]
    fn test_non_finite_numbers_stay_text() {
        assert_eq!(Value::coerce("inf"), Value::from("inf"));
        assert_eq!(Value::coerce("NaN"), Value::from("NaN"));
    }

    #[test]
    fn test_push_promotes_on_second_occurrence() {
        let mut map = AttributeMap::new();
        map.push("bonus", Value::Number(1.0));
        assert_eq!(map.get("bonus"), Some(&Value::Number(1.0)));

        map.push("bonus", Value::Number(2.0));
        map.push("bonus", Value::Number(3.0));
        assert_eq!(
            map.get("bonus"),
            Some(&Value::List(vec![1.0.into(), 2.0.into(), 3.0.into()]))
        );
    }

    #[test]
    fn test_push_keeps_first_position() {
        let mut map = AttributeMap::new();
        map.push("a", 1.0.into());
        map.push("b", 2.0.into());
        map.push("a", 3.0.into());
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn test_add_sums_numbers_and_overwrites_text() {
        let mut map = AttributeMap::new();
        map.insert("shields", 100.0.into());
        map.insert("category", "Light Warship".into());

        map.add("shields", 50.0.into());
        map.add("category", "Heavy Warship".into());
        map.add("hull", 25.0.into());

        assert_eq!(map.number("shields"), Some(150.0));
        assert_eq!(map.string("category"), Some("Heavy Warship"));
        assert_eq!(map.number("hull"), Some(25.0));
    }

    #[test]
    fn test_add_number_over_text_overwrites() {
        let mut map = AttributeMap::new();
        map.insert("mass", "heavy".into());
        map.add("mass", 10.0.into());
        assert_eq!(map.number("mass"), Some(10.0));
    }

    #[test]
    fn test_integral_numbers_serialize_without_fraction() {
        let mut map = AttributeMap::new();
        map.insert("cost", 1000.0.into());
        map.insert("drag", 2.5.into());
        let json = serde_json::to_string(&map).unwrap();
        assert_eq!(json, r#"{"cost":1000,"drag":2.5}"#);
    }

    #[test]
    fn test_serialized_shape_of_each_value() {
        let mut nested = AttributeMap::new();
        nested.insert("frame rate", 8.0.into());

        let mut map = AttributeMap::new();
        map.insert("flag", true.into());
        map.insert("drag", 0.5.into());
        map.insert("noun", "craft".into());
        map.insert("bonus", Value::List(vec![1.0.into(), "x".into()]));
        map.insert("spriteData", nested.into());

        assert_eq!(
            serde_json::to_value(&map).unwrap(),
            serde_json::json!({
                "flag": true,
                "drag": 0.5,
                "noun": "craft",
                "bonus": [1, "x"],
                "spriteData": {"frame rate": 8}
            })
        );
    }

    #[test]
    fn test_to_text() {
        assert_eq!(Value::Number(5.0).to_text().as_deref(), Some("5"));
        assert_eq!(Value::from("ship/a").to_text().as_deref(), Some("ship/a"));
        assert_eq!(Value::Map(AttributeMap::new()).to_text(), None);
    }
}
