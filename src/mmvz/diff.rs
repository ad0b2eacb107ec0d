use std::collections::{BTreeMap, BTreeSet};
use std::fmt::Debug;

/// Keys sorted into the three reconciliation buckets
#[derive(Debug, PartialEq)]
pub struct KeyedDiff<'a, K, D> {
    pub enter: Vec<(K, &'a D)>,
    pub update: Vec<(K, &'a D)>,
    pub exit: Vec<K>,
}

/// Matches the next items against the previously rendered keys.
///
/// Enter and update keep the order of `next`; exit follows key order. A key that
/// occurs twice in `next` is reported once, with its first item.
pub fn keyed_diff<'a, K, V, D, I>(previous: &BTreeMap<K, V>, next: I) -> KeyedDiff<'a, K, D>
where
    K: Ord + Clone + Debug,
    D: 'a,
    I: IntoIterator<Item = (K, &'a D)>,
{
    let mut seen = BTreeSet::new();
    let mut enter = Vec::new();
    let mut update = Vec::new();

    for (key, datum) in next {
        if !seen.insert(key.clone()) {
            log::warn!("Duplicate element key {:?}; keeping the first occurrence", key);
            continue;
        }
        if previous.contains_key(&key) {
            update.push((key, datum));
        } else {
            enter.push((key, datum));
        }
    }

    let exit = previous
        .keys()
        .filter(|key| !seen.contains(*key))
        .cloned()
        .collect();

    KeyedDiff { enter, update, exit }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn previous(keys: &[i64]) -> BTreeMap<i64, ()> {
        keys.iter().map(|&key| (key, ())).collect()
    }

    fn keys<D>(items: &[(i64, &D)]) -> Vec<i64> {
        items.iter().map(|(key, _)| *key).collect()
    }

    #[test]
    fn splits_into_enter_update_exit() {
        let data = [3, 4, 5, 6];
        let diff = keyed_diff(&previous(&[1, 2, 3, 4]), data.iter().map(|d| (*d, d)));
        assert_eq!(keys(&diff.enter), vec![5, 6]);
        assert_eq!(keys(&diff.update), vec![3, 4]);
        assert_eq!(diff.exit, vec![1, 2]);
    }

    #[test]
    fn same_keys_only_update() {
        let data = [1, 2, 3];
        let diff = keyed_diff(&previous(&[1, 2, 3]), data.iter().map(|d| (*d, d)));
        assert!(diff.enter.is_empty());
        assert!(diff.exit.is_empty());
        assert_eq!(diff.update.len(), 3);
    }

    #[test]
    fn first_duplicate_wins() {
        let data = [(7, "a"), (7, "b"), (8, "c")];
        let diff = keyed_diff(&BTreeMap::<i64, ()>::new(), data.iter().map(|(k, v)| (*k, v)));
        assert_eq!(diff.enter.len(), 2);
        assert_eq!(*diff.enter[0].1, "a");
    }

    #[test]
    fn empty_next_exits_everything() {
        let diff = keyed_diff::<_, _, i64, _>(&previous(&[1, 2]), std::iter::empty());
        assert!(diff.enter.is_empty());
        assert_eq!(diff.exit, vec![1, 2]);
    }
}
