#![forbid(unsafe_code)]

//! Field values held by a filter form.
//!
//! [`FilterValues`] is an ordered map from field name to [`FieldValue`].
//! Equality is shallow and key-wise, which is exactly what dirty tracking
//! compares against the committed snapshot.
//!
//! Setting a field to an empty value removes the key: an emptied text input
//! or a multi-select with nothing chosen is "no filter", not a filter on the
//! empty string.

use std::collections::BTreeMap;
use std::fmt;

#[cfg(feature = "config")]
use serde::{Deserialize, Serialize};

/// A single filter field value.
///
/// Numbers compare with [`f64::total_cmp`], so a NaN equals itself and an
/// unchanged NaN field never reads as an edit.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(untagged))]
pub enum FieldValue {
    /// Free text, e.g. a keyword search.
    Text(String),
    /// Numeric input, e.g. a price bound.
    Number(f64),
    /// Checkbox-style toggle.
    Flag(bool),
    /// Multi-select options.
    Many(Vec<String>),
}

impl FieldValue {
    /// Empty text or an empty selection.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Text(s) => s.is_empty(),
            Self::Many(items) => items.is_empty(),
            Self::Number(_) | Self::Flag(_) => false,
        }
    }

    /// Text content, if this is a text value.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a.total_cmp(b).is_eq(),
            (Self::Flag(a), Self::Flag(b)) => a == b,
            (Self::Many(a), Self::Many(b)) => a == b,
            _ => false,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => write!(f, "{s}"),
            Self::Number(n) => write!(f, "{n}"),
            Self::Flag(b) => write!(f, "{b}"),
            Self::Many(items) => write!(f, "{}", items.join(",")),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        Self::Text(s.to_owned())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

impl From<f64> for FieldValue {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        Self::Flag(b)
    }
}

impl From<Vec<String>> for FieldValue {
    fn from(items: Vec<String>) -> Self {
        Self::Many(items)
    }
}

/// Field name to value mapping for one filter form.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "config", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "config", serde(transparent))]
pub struct FilterValues {
    fields: BTreeMap<String, FieldValue>,
}

impl FilterValues {
    /// No fields set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, for initial values.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.set(name, value);
        self
    }

    /// Set a field. Empty values remove the field.
    ///
    /// Returns `true` if the stored value changed.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<FieldValue>) -> bool {
        let name = name.into();
        let value = value.into();
        if value.is_empty() {
            return self.fields.remove(&name).is_some();
        }
        match self.fields.get(&name) {
            Some(existing) if *existing == value => false,
            _ => {
                self.fields.insert(name, value);
                true
            }
        }
    }

    /// Remove a field. Returns the previous value.
    pub fn remove(&mut self, name: &str) -> Option<FieldValue> {
        self.fields.remove(name)
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Drop every field.
    pub fn clear(&mut self) {
        self.fields.clear();
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Names of fields whose value differs between `self` and `other`,
    /// including fields present on only one side.
    #[must_use]
    pub fn changed_fields(&self, other: &Self) -> Vec<String> {
        let mut changed: Vec<String> = self
            .fields
            .iter()
            .filter(|(k, v)| other.fields.get(*k) != Some(*v))
            .map(|(k, _)| k.clone())
            .collect();
        changed.extend(
            other
                .fields
                .keys()
                .filter(|k| !self.fields.contains_key(*k))
                .cloned(),
        );
        changed.sort();
        changed
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for FilterValues {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut values = Self::new();
        for (k, v) in iter {
            values.set(k, v);
        }
        values
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_value_removes_field() {
        let mut values = FilterValues::new().with("keywords", "bike");
        assert!(values.contains("keywords"));

        assert!(values.set("keywords", ""));
        assert!(!values.contains("keywords"));

        // Removing an absent field is not a change.
        assert!(!values.set("keywords", ""));
    }

    #[test]
    fn set_reports_change() {
        let mut values = FilterValues::new();
        assert!(values.set("price", 10.0));
        assert!(!values.set("price", 10.0));
        assert!(values.set("price", 12.0));
    }

    #[test]
    fn equality_is_key_wise() {
        let a = FilterValues::new().with("a", "1").with("b", true);
        let b = FilterValues::new().with("b", true).with("a", "1");
        assert_eq!(a, b);

        let c = b.clone().with("c", vec!["x".to_owned()]);
        assert_ne!(a, c);
    }

    #[test]
    fn changed_fields_covers_both_sides() {
        let old = FilterValues::new().with("a", "1").with("b", "2");
        let new = FilterValues::new().with("a", "1").with("b", "3").with("c", "4");
        assert_eq!(new.changed_fields(&old), vec!["b".to_owned(), "c".to_owned()]);
        assert_eq!(old.changed_fields(&new), vec!["b".to_owned(), "c".to_owned()]);
    }

    #[test]
    fn nan_number_equals_itself() {
        assert_eq!(FieldValue::Number(f64::NAN), FieldValue::Number(f64::NAN));
        assert_ne!(FieldValue::Number(f64::NAN), FieldValue::Number(1.0));
        assert_ne!(FieldValue::Number(1.0), FieldValue::Text("1".into()));

        let mut values = FilterValues::new();
        assert!(values.set("price", f64::NAN));
        assert!(!values.set("price", f64::NAN));
        assert_eq!(values, FilterValues::new().with("price", f64::NAN));
    }

    #[test]
    fn display_joins_lists() {
        let v = FieldValue::Many(vec!["a".into(), "b".into()]);
        assert_eq!(v.to_string(), "a,b");
        assert_eq!(FieldValue::from("bike").as_text(), Some("bike"));
        assert_eq!(FieldValue::Flag(true).as_text(), None);
    }
}
