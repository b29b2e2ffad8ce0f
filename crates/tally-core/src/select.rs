//! Active-subset selection from filter and selection key sets.

use crate::datum::Key;
use crate::index::{Row, RowIndex};
use std::collections::HashSet;

/// Keys announced on the filter bus.
///
/// `None` from the bus and an empty list both mean "nothing active", so an
/// empty set is never stored; use [`KeySet::from_event`] to normalize.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeySet {
    keys: HashSet<Key>,
}

impl KeySet {
    /// Create a key set.
    #[must_use]
    pub fn new<I, K>(keys: I) -> Self
    where
        I: IntoIterator<Item = K>,
        K: Into<Key>,
    {
        Self {
            keys: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Normalize a bus payload: absent and empty are both "inactive".
    #[must_use]
    pub fn from_event(keys: Option<Vec<Key>>) -> Option<Self> {
        keys.filter(|k| !k.is_empty()).map(Self::new)
    }

    /// Membership test.
    #[must_use]
    pub fn contains(&self, key: &Key) -> bool {
        self.keys.contains(key)
    }

    /// Number of keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Intersection with another set.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        Self {
            keys: self.keys.intersection(&other.keys).cloned().collect(),
        }
    }

    /// Iterate keys in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &Key> {
        self.keys.iter()
    }
}

impl<K: Into<Key>> FromIterator<K> for KeySet {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self::new(iter)
    }
}

/// Derive the rows that are both filtered in and selected.
///
/// Absent or empty sets do not restrict. Keys not in the index are ignored.
/// The result keeps index order.
#[must_use]
pub fn select<'a>(
    index: &'a RowIndex,
    filter: Option<&KeySet>,
    selection: Option<&KeySet>,
) -> Vec<&'a Row> {
    let filter = filter.filter(|s| !s.is_empty());
    let selection = selection.filter(|s| !s.is_empty());

    index
        .iter()
        .filter(|row| filter.map_or(true, |f| f.contains(&row.key)))
        .filter(|row| selection.map_or(true, |s| s.contains(&row.key)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::datum::Datum;
    use crate::index::RowColumns;
    use proptest::prelude::*;

    fn index_of(n: usize) -> RowIndex {
        let data = (0..n).map(|i| Datum::Number(i as f64)).collect();
        RowIndex::build(RowColumns::values(data)).unwrap()
    }

    fn keys(rows: &[&Row]) -> Vec<String> {
        rows.iter().map(|r| r.key.to_string()).collect()
    }

    #[test]
    fn test_select_no_filters_returns_all() {
        let index = index_of(4);
        assert_eq!(keys(&select(&index, None, None)), ["0", "1", "2", "3"]);
    }

    #[test]
    fn test_select_filter_only() {
        let index = index_of(4);
        let f = KeySet::new(["3", "1"]);
        assert_eq!(keys(&select(&index, Some(&f), None)), ["1", "3"]);
    }

    #[test]
    fn test_select_selection_only() {
        let index = index_of(4);
        let s = KeySet::new(["2"]);
        assert_eq!(keys(&select(&index, None, Some(&s))), ["2"]);
    }

    #[test]
    fn test_select_intersection() {
        let index = index_of(5);
        let f = KeySet::new(["0", "1", "2"]);
        let s = KeySet::new(["1", "2", "3"]);
        assert_eq!(keys(&select(&index, Some(&f), Some(&s))), ["1", "2"]);
    }

    #[test]
    fn test_select_disjoint_is_empty() {
        let index = index_of(5);
        let f = KeySet::new(["0", "1"]);
        let s = KeySet::new(["3", "4"]);
        assert!(select(&index, Some(&f), Some(&s)).is_empty());
    }

    #[test]
    fn test_select_empty_set_is_absent() {
        let index = index_of(3);
        let empty = KeySet::default();
        assert_eq!(select(&index, Some(&empty), None).len(), 3);
        assert_eq!(select(&index, None, Some(&empty)).len(), 3);
    }

    #[test]
    fn test_select_ignores_unknown_keys() {
        let index = index_of(3);
        let f = KeySet::new(["1", "99", "zzz"]);
        assert_eq!(keys(&select(&index, Some(&f), None)), ["1"]);
    }

    #[test]
    fn test_from_event_normalizes_empty() {
        assert!(KeySet::from_event(None).is_none());
        assert!(KeySet::from_event(Some(vec![])).is_none());
        let set = KeySet::from_event(Some(vec![Key::new("a")])).unwrap();
        assert!(set.contains(&Key::new("a")));
    }

    #[test]
    fn test_intersect() {
        let a = KeySet::new(["a", "b"]);
        let b = KeySet::new(["b", "c"]);
        let both = a.intersect(&b);
        assert_eq!(both.len(), 1);
        assert!(both.contains(&Key::new("b")));
    }

    proptest! {
        #[test]
        fn prop_select_commutes(
            a in proptest::collection::vec(0usize..30, 0..20),
            b in proptest::collection::vec(0usize..30, 0..20),
        ) {
            let index = index_of(20);
            let a = KeySet::new(a);
            let b = KeySet::new(b);
            let ab = keys(&select(&index, Some(&a), Some(&b)));
            let ba = keys(&select(&index, Some(&b), Some(&a)));
            prop_assert_eq!(ab, ba);
        }

        #[test]
        fn prop_select_matches_set_intersection(
            a in proptest::collection::vec(0usize..30, 1..20),
            b in proptest::collection::vec(0usize..30, 1..20),
        ) {
            let index = index_of(20);
            let a = KeySet::new(a);
            let b = KeySet::new(b);
            let direct = keys(&select(&index, Some(&a.intersect(&b)), None));
            let nested = keys(&select(&index, Some(&a), Some(&b)));
            // An empty intersection reads as "no filter" when passed alone.
            if !a.intersect(&b).is_empty() {
                prop_assert_eq!(direct, nested);
            } else {
                prop_assert!(nested.is_empty());
            }
        }

        #[test]
        fn prop_no_filter_is_identity(n in 0usize..50) {
            let index = index_of(n);
            prop_assert_eq!(select(&index, None, None).len(), n);
        }
    }
}
