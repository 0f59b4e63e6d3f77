//! The settings value model.
//!
//! Settings are Python literals on the other end, so the model carries the
//! shapes a Django settings module uses: `None`, tuples next to lists, and
//! ordered dicts. [`Dict`] keeps insertion order and replaces values in place,
//! which is what `dict.update()` does and what the rendered file relies on.

/// A single settings value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    None,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    List(Vec<Value>),
    Tuple(Vec<Value>),
    Dict(Dict),
}

impl Value {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(i) => Some(*i),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_dict(&self) -> Option<&Dict> {
        match self {
            Value::Dict(d) => Some(d),
            _ => None,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Str(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Str(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Int(i)
    }
}

impl From<f64> for Value {
    fn from(f: f64) -> Self {
        Value::Float(f)
    }
}

impl From<Dict> for Value {
    fn from(d: Dict) -> Self {
        Value::Dict(d)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Value::None, Into::into)
    }
}

/// Build a list value.
pub fn list<I, V>(items: I) -> Value
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Value::List(items.into_iter().map(Into::into).collect())
}

/// Build a tuple value.
pub fn tuple<I, V>(items: I) -> Value
where
    I: IntoIterator<Item = V>,
    V: Into<Value>,
{
    Value::Tuple(items.into_iter().map(Into::into).collect())
}

/// Build a dict value from `(key, value)` pairs.
pub fn dict<I, K, V>(entries: I) -> Value
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<Value>,
{
    Value::Dict(entries.into_iter().collect())
}

/// An insertion-ordered string-keyed map.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dict {
    entries: Vec<(String, Value)>,
}

impl Dict {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Value> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Insert or replace. A replaced key keeps its position.
    /// Returns the previous value, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.get_mut(&key) {
            Some(slot) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.push((key, value));
                None
            }
        }
    }

    /// Shallow overlay: every key of `other` replaces the whole value here.
    pub fn update(&mut self, other: Dict) {
        for (key, value) in other.entries {
            self.insert(key, value);
        }
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Dict {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut out = Dict::new();
        for (k, v) in iter {
            out.insert(k, v);
        }
        out
    }
}

impl IntoIterator for Dict {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insert_preserves_order() {
        let mut d = Dict::new();
        d.insert("B", 1i64);
        d.insert("A", 2i64);
        assert_eq!(d.keys().collect::<Vec<_>>(), vec!["B", "A"]);
    }

    #[test]
    fn replace_keeps_position() {
        let mut d = Dict::new();
        d.insert("DEBUG", true);
        d.insert("SITE_ID", 1i64);
        let old = d.insert("DEBUG", false);
        assert_eq!(old, Some(Value::Bool(true)));
        assert_eq!(d.keys().collect::<Vec<_>>(), vec!["DEBUG", "SITE_ID"]);
        assert_eq!(d.get("DEBUG"), Some(&Value::Bool(false)));
    }

    #[test]
    fn update_is_shallow() {
        let mut base: Dict = [("CACHES", dict([("default", dict([("TIMEOUT", 1i64)]))]))]
            .into_iter()
            .collect();
        let overlay: Dict = [("CACHES", dict([("other", Value::None)]))]
            .into_iter()
            .collect();
        base.update(overlay);
        let caches = base.get("CACHES").unwrap().as_dict().unwrap();
        assert!(!caches.contains_key("default"));
        assert!(caches.contains_key("other"));
    }

    #[test]
    fn accessors_match_variant() {
        assert_eq!(Value::Bool(true).as_bool(), Some(true));
        assert_eq!(Value::Int(8).as_int(), Some(8));
        assert_eq!(Value::Int(8).as_bool(), None);
        assert_eq!(Value::from("8").as_int(), None);
        assert_eq!(Value::None.as_str(), None);
        assert!(list(["a"]).as_dict().is_none());
        assert!(tuple(["a"]).as_list().is_none());
    }

    #[test]
    fn option_converts_to_none() {
        assert_eq!(Value::from(None::<&str>), Value::None);
        assert_eq!(Value::from(Some("x")), Value::Str("x".into()));
    }

    #[test]
    fn get_mut_allows_in_place_edit() {
        let mut d: Dict = [("INSTALLED_APPS", list(["a"]))].into_iter().collect();
        if let Some(Value::List(apps)) = d.get_mut("INSTALLED_APPS") {
            apps.push("b".into());
        }
        assert_eq!(d.get("INSTALLED_APPS").unwrap().as_list().unwrap().len(), 2);
    }
}
