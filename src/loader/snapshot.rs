use std::collections::hash_map::{self, HashMap};

/// Read-only copy of a loader mapping taken at one point in time
///
/// Later registrations are not reflected, and nothing on a snapshot writes back.
#[derive(Debug, Clone)]
pub struct LoaderSnapshot<V> {
    entries: HashMap<String, V>,
}

impl<V> LoaderSnapshot<V> {
    pub fn get(&self, key: &str) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> hash_map::Iter<'_, String, V> {
        self.entries.iter()
    }
}

impl<V> Default for LoaderSnapshot<V> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<V> FromIterator<(String, V)> for LoaderSnapshot<V> {
    fn from_iter<I: IntoIterator<Item = (String, V)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl<'a, V> IntoIterator for &'a LoaderSnapshot<V> {
    type Item = (&'a String, &'a V);
    type IntoIter = hash_map::Iter<'a, String, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
