use std::collections::HashMap;

/// Column names keyed by their ASCII-uppercase form.
///
/// Dictionary names are lower-cased on import, but callers and hand-written
/// layouts may use any casing; lookups resolve to the original spelling.
#[derive(Debug, Clone, Default)]
pub struct CaseInsensitiveSet {
    map: HashMap<String, String>,
}

impl CaseInsensitiveSet {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut set = Self::default();
        for name in names {
            set.insert(name.as_ref());
        }
        set
    }

    /// Insert a name; returns false if an equivalent name was already present.
    /// The first spelling wins.
    pub fn insert(&mut self, name: &str) -> bool {
        let key = name.to_ascii_uppercase();
        if self.map.contains_key(&key) {
            return false;
        }
        self.map.insert(key, name.to_string());
        true
    }

    /// Original spelling of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.to_ascii_uppercase())
            .map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.map.contains_key(&name.to_ascii_uppercase())
    }
}
