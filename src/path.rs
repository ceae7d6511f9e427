//! Flat key paths and the traversal that walks them.
//!
//! A path is an ordered list of string or integer keys. It is not an
//! expression language: `"a.b"` is one key named `a.b`, never two.
use std::fmt;

use crate::error::{Error, Result};
use crate::value::Value;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    Name(String),
    Index(i64),
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct Path(Vec<Key>);

// ————————————————————————————————————————————————————————————————————————————
// KEY
// ————————————————————————————————————————————————————————————————————————————

impl Key {
    fn from_value(value: &Value) -> Option<Key> {
        match value {
            Value::String(s) => Some(Key::Name(s.clone())),
            Value::Number(n) if is_integral(*n) => Some(Key::Index(*n as i64)),
            _ => None,
        }
    }

    fn to_value(&self) -> Value {
        match self {
            Key::Name(name) => Value::String(name.clone()),
            Key::Index(i) => Value::from(*i),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Name(name) => f.write_str(name),
            Key::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Key {
    fn from(name: &str) -> Self {
        Key::Name(name.to_string())
    }
}

impl From<String> for Key {
    fn from(name: String) -> Self {
        Key::Name(name)
    }
}

impl From<i64> for Key {
    fn from(i: i64) -> Self {
        Key::Index(i)
    }
}

// ————————————————————————————————————————————————————————————————————————————
// PATH
// ————————————————————————————————————————————————————————————————————————————

impl Path {
    pub fn new(keys: Vec<Key>) -> Self {
        Self(keys)
    }

    pub fn keys(&self) -> &[Key] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Normalize a loosely shaped path: a string is a single key, an array
    /// of strings and integers is used as is. Anything else, including an
    /// array holding any other element, is a bad path.
    pub fn parse(raw: &Value) -> Result<Path> {
        let bad = || Error::BadPath(raw.to_json_text());
        match raw {
            Value::String(name) => Ok(Path(vec![Key::Name(name.clone())])),
            Value::Array(items) => items
                .iter()
                .map(|item| Key::from_value(item).ok_or_else(bad))
                .collect::<Result<Vec<_>>>()
                .map(Path),
            _ => Err(bad()),
        }
    }

    /// Walk the path left to right. A missing key, a step into something
    /// that is not a container, or a `null`/`undefined` result is `None`.
    /// The empty path yields the container itself.
    pub fn lookup<'a>(&self, container: &'a Value) -> Option<&'a Value> {
        self.0
            .iter()
            .try_fold(container, step)
            .filter(|found| !found.is_nullish())
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.0.iter().map(Key::to_value).collect())
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_value().to_json_text())
    }
}

impl From<&str> for Path {
    fn from(name: &str) -> Self {
        Path(vec![Key::from(name)])
    }
}

impl From<Vec<Key>> for Path {
    fn from(keys: Vec<Key>) -> Self {
        Path(keys)
    }
}

impl FromIterator<Key> for Path {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

// ————————————————————————————————————————————————————————————————————————————
// INTERNAL HELPERS
// ————————————————————————————————————————————————————————————————————————————

fn step<'a>(current: &'a Value, key: &Key) -> Option<&'a Value> {
    match (current, key) {
        (Value::Object(map), Key::Name(name)) => map.get(name),
        // Negative indices only count from the end of arrays; objects have no end.
        (Value::Object(map), Key::Index(i)) if *i >= 0 => map.get(&i.to_string()),
        (Value::Array(items), Key::Index(i)) => element(items, *i),
        (Value::Array(items), Key::Name(name)) => {
            canonical_index(name).and_then(|i| items.get(i))
        }
        _ => None,
    }
}

// Negative indices count from the end.
fn element(items: &[Value], i: i64) -> Option<&Value> {
    let i = if i < 0 { items.len() as i64 + i } else { i };
    usize::try_from(i).ok().and_then(|i| items.get(i))
}

// "3" names element 3; "03" and "+3" name nothing.
fn canonical_index(name: &str) -> Option<usize> {
    let i = name.parse::<usize>().ok()?;
    (i.to_string() == name).then_some(i)
}

fn is_integral(n: f64) -> bool {
    n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Value {
        Value::from(json!({
            "a": {"b": {"c": 1}, "list": [10, 20, 30]},
            "a.b": "dotted",
            "7": "seven",
            "gone": null
        }))
    }

    #[test]
    fn string_is_single_key() {
        let path = Path::parse(&Value::from("a.b")).unwrap();
        assert_eq!(path.keys(), [Key::Name("a.b".into())]);
        assert_eq!(path.lookup(&doc()), Some(&Value::from("dotted")));
    }

    #[test]
    fn array_of_keys_traverses() {
        let path = Path::parse(&Value::from(json!(["a", "b", "c"]))).unwrap();
        assert_eq!(path.lookup(&doc()), Some(&Value::Number(1.0)));

        let path = Path::parse(&Value::from(json!(["a", "list", 1]))).unwrap();
        assert_eq!(path.lookup(&doc()), Some(&Value::Number(20.0)));
    }

    #[test]
    fn index_forms_on_arrays_and_objects() {
        let d = doc();
        let list = |key: Key| Path::new(vec!["a".into(), "list".into(), key]).lookup(&d).cloned();
        assert_eq!(list(Key::Index(-1)), Some(Value::Number(30.0)));
        assert_eq!(list(Key::Index(3)), None);
        assert_eq!(list(Key::Index(-4)), None);
        assert_eq!(list("2".into()), Some(Value::Number(30.0)));
        assert_eq!(list("02".into()), None);
        assert_eq!(Path::new(vec![Key::Index(7)]).lookup(&d), Some(&Value::from("seven")));
    }

    #[test]
    fn negative_index_on_object_is_not_found() {
        let d = Value::from(json!({"-1": "minus one", "list": [1, 2]}));
        assert_eq!(Path::new(vec![Key::Index(-1)]).lookup(&d), None);
        assert_eq!(Path::from("-1").lookup(&d), Some(&Value::from("minus one")));
        let last = Path::new(vec!["list".into(), Key::Index(-1)]);
        assert_eq!(last.lookup(&d), Some(&Value::Number(2.0)));
    }

    #[test]
    fn missing_and_null_are_not_found() {
        let d = doc();
        assert_eq!(Path::from("nope").lookup(&d), None);
        assert_eq!(Path::from("gone").lookup(&d), None);
        let too_deep = Path::new(vec!["a".into(), "b".into(), "c".into(), "d".into()]);
        assert_eq!(too_deep.lookup(&d), None);
        assert_eq!(Path::from("a").lookup(&Value::from("a string")), None);
    }

    #[test]
    fn empty_path_is_the_container() {
        let d = doc();
        assert_eq!(Path::default().lookup(&d), Some(&d));
        assert_eq!(Path::default().lookup(&Value::Null), None);
    }

    #[test]
    fn bad_shapes_are_rejected() {
        for raw in [json!(null), json!(3), json!({"a": 1}), json!(["a", true]), json!(["a", 1.5])] {
            let raw = Value::from(raw);
            assert_eq!(Path::parse(&raw), Err(Error::BadPath(raw.to_json_text())));
        }
        assert_eq!(Path::parse(&Value::Undefined), Err(Error::BadPath("undefined".into())));
    }

    #[test]
    fn display_is_json_array() {
        let path: Path = vec![Key::from("a"), Key::Index(0)].into();
        assert_eq!(path.to_string(), r#"["a",0]"#);
    }
}
