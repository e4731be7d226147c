use std::hash::{Hash, Hasher};

use indexmap::{Equivalent, IndexMap};

/// A polymorphic mapping from distinct keys to values.
///
/// encoding name = "map8", encoding code = 0xc1,
/// category = compound, width = 1
///
/// encoding name = "map32", encoding code = 0xd1,
/// category = compound, width = 4
///
/// Unless known to be otherwise, maps MUST be considered ordered; two maps
/// that differ only in entry order are not equal. The wrapper keeps
/// insertion order via [`IndexMap`] and implements order-sensitive
/// [`PartialEq`], [`Ord`], and [`Hash`].
#[derive(Debug, Clone)]
pub struct OrderedMap<K, V>(IndexMap<K, V>);

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self(IndexMap::new())
    }
}

impl<K, V> From<IndexMap<K, V>> for OrderedMap<K, V> {
    fn from(map: IndexMap<K, V>) -> Self {
        Self(map)
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Creates an empty map
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    /// Creates an empty map with the given capacity
    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    /// Number of entries in the map
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map holds no entries
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate the entries in insertion order
    pub fn iter(&self) -> indexmap::map::Iter<'_, K, V> {
        self.0.iter()
    }

    /// Get a reference to the inner [`IndexMap`]
    pub fn as_inner(&self) -> &IndexMap<K, V> {
        &self.0
    }

    /// Consumes the wrapper and returns the inner [`IndexMap`]
    pub fn into_inner(self) -> IndexMap<K, V> {
        self.0
    }
}

impl<K, V> OrderedMap<K, V>
where
    K: Hash + Eq,
{
    /// Calls [`IndexMap::insert`] internally
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        self.0.insert(key, value)
    }

    /// Calls [`IndexMap::get`] internally
    pub fn get<Q: ?Sized>(&self, key: &Q) -> Option<&V>
    where
        Q: Hash + Equivalent<K>,
    {
        self.0.get(key)
    }

    /// Calls [`IndexMap::get_mut`] internally
    pub fn get_mut<Q: ?Sized>(&mut self, key: &Q) -> Option<&mut V>
    where
        Q: Hash + Equivalent<K>,
    {
        self.0.get_mut(key)
    }

    /// Calls [`IndexMap::swap_remove`] internally
    pub fn remove<Q: ?Sized>(&mut self, key: &Q) -> Option<V>
    where
        Q: Hash + Equivalent<K>,
    {
        self.0.swap_remove(key)
    }

    /// Calls [`IndexMap::contains_key`] internally
    pub fn contains_key<Q: ?Sized>(&self, key: &Q) -> bool
    where
        Q: Hash + Equivalent<K>,
    {
        self.0.contains_key(key)
    }
}

impl<K, V> FromIterator<(K, V)> for OrderedMap<K, V>
where
    K: Hash + Eq,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

impl<K, V> IntoIterator for OrderedMap<K, V> {
    type Item = (K, V);
    type IntoIter = indexmap::map::IntoIter<K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = indexmap::map::Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K, V> PartialEq for OrderedMap<K, V>
where
    K: PartialEq,
    V: PartialEq,
{
    fn eq(&self, other: &Self) -> bool {
        self.0.len() == other.0.len() && self.0.iter().zip(&other.0).all(|(a, b)| a == b)
    }
}

impl<K, V> Eq for OrderedMap<K, V>
where
    K: Eq,
    V: Eq,
{
}

impl<K, V> PartialOrd for OrderedMap<K, V>
where
    K: PartialOrd,
    V: PartialOrd,
{
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.0.iter().partial_cmp(other.0.iter())
    }
}

impl<K, V> Ord for OrderedMap<K, V>
where
    K: Ord,
    V: Ord,
{
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.0.iter().cmp(other.0.iter())
    }
}

impl<K, V> Hash for OrderedMap<K, V>
where
    K: Hash,
    V: Hash,
{
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.len().hash(state);
        for entry in &self.0 {
            entry.hash(state);
        }
    }
}
