//! Group-by helpers for the chart builder.

use std::collections::BTreeMap;

use crate::dataset::PostRecord;

/// Mean of `value` per `key`, ordered by key.
pub fn group_mean<K, FK, FV>(rows: &[PostRecord], key: FK, value: FV) -> Vec<(K, f64)>
where
    K: Ord,
    FK: Fn(&PostRecord) -> K,
    FV: Fn(&PostRecord) -> f64,
{
    let mut groups: BTreeMap<K, (f64, usize)> = BTreeMap::new();
    for row in rows {
        let entry = groups.entry(key(row)).or_insert((0.0, 0));
        entry.0 += value(row);
        entry.1 += 1;
    }

    groups
        .into_iter()
        .map(|(k, (sum, count))| (k, sum / count as f64))
        .collect()
}

/// Row count per `key`, most frequent first. Ties keep key order.
pub fn value_counts<K, FK>(rows: &[PostRecord], key: FK) -> Vec<(K, usize)>
where
    K: Ord,
    FK: Fn(&PostRecord) -> K,
{
    let mut counts: BTreeMap<K, usize> = BTreeMap::new();
    for row in rows {
        *counts.entry(key(row)).or_default() += 1;
    }

    let mut counts: Vec<(K, usize)> = counts.into_iter().collect();
    // Stable sort keeps key order among equal counts.
    counts.sort_by(|a, b| b.1.cmp(&a.1));
    counts
}
