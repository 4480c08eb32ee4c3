//! Canonical header multi-map
//!
//! Headers are stored as a flat, insertion-ordered list of (name, value)
//! pairs. Lookup is case-insensitive; emission preserves the casing each
//! entry was appended with. A name with zero values is simply absent.

use smallvec::SmallVec;

/// Host-native header value shape: a name may be absent, carry a single
/// value, or carry several.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawValue {
    Absent,
    Single(String),
    Many(Vec<String>),
}

/// Ordered, case-insensitive header multi-map
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Headers {
    /// (name, value) pairs in insertion order (stack-allocated for small counts)
    entries: SmallVec<[(String, String); 16]>,
}

impl Headers {
    /// Create an empty header map
    pub fn new() -> Self {
        Self {
            entries: SmallVec::new(),
        }
    }

    /// Fold host-native header shapes into the canonical form.
    ///
    /// Absent names are skipped entirely; multi-valued names keep their
    /// value order.
    pub fn from_raw<I>(raw: I) -> Self
    where
        I: IntoIterator<Item = (String, RawValue)>,
    {
        let mut headers = Self::new();
        for (name, value) in raw {
            match value {
                RawValue::Absent => {}
                RawValue::Single(v) => headers.append(name, v),
                RawValue::Many(vs) => {
                    for v in vs {
                        headers.append(name.clone(), v);
                    }
                }
            }
        }
        headers
    }

    /// Append a value under a name, preserving insertion order
    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Get the first value for a name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values for a name, in append order
    pub fn get_all<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.entries
            .iter()
            .filter(move |(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Check whether a name is present
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Iterate all (name, value) pairs in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Number of (name, value) entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
