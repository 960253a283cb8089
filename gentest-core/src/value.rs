//! Named records and dynamically typed values.

use std::fmt;

/// A value with named fields, in declaration order.
///
/// Produced by [`crate::Gen::shape`].
#[derive(Clone, PartialEq)]
pub struct Record<T> {
    fields: Vec<(String, T)>,
}

impl<T> Record<T> {
    /// Build a record from `(name, value)` pairs.
    pub fn new(fields: Vec<(String, T)>) -> Self {
        Record { fields }
    }

    /// Look a field up by name.
    pub fn get(&self, name: &str) -> Option<&T> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn into_fields(self) -> Vec<(String, T)> {
        self.fields
    }
}

impl<T: fmt::Debug> fmt::Debug for Record<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

/// A dynamically typed generated value.
///
/// Lets generators of different types share one [`Record`], e.g. a shape
/// with an integer field and a boolean field. See [`crate::Gen::dynamic`].
#[derive(Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Bool(bool),
    Char(char),
    Str(String),
    List(Vec<Value>),
    Record(Record<Value>),
}

impl Value {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_char(&self) -> Option<char> {
        match self {
            Value::Char(c) => Some(*c),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_record(&self) -> Option<&Record<Value>> {
        match self {
            Value::Record(record) => Some(record),
            _ => None,
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n:?}"),
            Value::Bool(b) => write!(f, "{b:?}"),
            Value::Char(c) => write!(f, "{c:?}"),
            Value::Str(s) => write!(f, "{s:?}"),
            Value::List(items) => f.debug_list().entries(items).finish(),
            Value::Record(record) => fmt::Debug::fmt(record, f),
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Value::Char(c)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Record<T>> for Value {
    fn from(record: Record<T>) -> Self {
        Value::Record(Record::new(
            record
                .into_fields()
                .into_iter()
                .map(|(name, value)| (name, value.into()))
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_lookup() {
        let record = Record::new(vec![("a".to_string(), 1), ("b".to_string(), 2)]);
        assert_eq!(record.get("b"), Some(&2));
        assert_eq!(record.get("c"), None);
        assert_eq!(record.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(record.len(), 2);
        assert_eq!(format!("{record:?}"), r#"{"a": 1, "b": 2}"#);
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(Value::from(3i64).as_int(), Some(3));
        assert_eq!(Value::from(true).as_bool(), Some(true));
        assert_eq!(Value::from('x').as_char(), Some('x'));
        assert_eq!(Value::from("hi").as_str(), Some("hi"));
        assert_eq!(Value::from(vec![1i64, 2]).as_list().map(<[Value]>::len), Some(2));
        assert_eq!(Value::from(1i64).as_bool(), None);
    }

    #[test]
    fn test_value_debug_is_plain() {
        let record = Record::new(vec![
            ("n".to_string(), Value::from(-4i64)),
            ("flags".to_string(), Value::from(vec![true, false])),
        ]);
        let value = Value::from(record);
        assert_eq!(format!("{value:?}"), r#"{"n": -4, "flags": [true, false]}"#);
        assert!(value.as_record().is_some());
    }
}
