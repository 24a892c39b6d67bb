//! Module: aggregate
//! Responsibility: derived statistics over collection snapshots.
//! Every function is pure over its input; nothing here caches.

mod groups;

pub use groups::Groups;

use std::{collections::HashSet, hash::Hash};

/// Count the items matching a predicate.
pub fn count_where<'a, T: 'a>(
    items: impl IntoIterator<Item = &'a T>,
    mut pred: impl FnMut(&T) -> bool,
) -> usize {
    items.into_iter().filter(|item| pred(item)).count()
}

/// Sum a numeric projection.
pub fn sum_by<'a, T: 'a>(items: impl IntoIterator<Item = &'a T>, f: impl FnMut(&T) -> f64) -> f64 {
    items.into_iter().map(f).sum()
}

/// Arithmetic mean of a projection, `0.0` for an empty input.
pub fn average_by<'a, T: 'a>(
    items: impl IntoIterator<Item = &'a T>,
    mut f: impl FnMut(&T) -> f64,
) -> f64 {
    let (sum, count) = items
        .into_iter()
        .fold((0.0, 0_u32), |(sum, count), item| (sum + f(item), count + 1));

    if count == 0 {
        0.0
    } else {
        sum / f64::from(count)
    }
}

/// Round half away from zero to a fixed number of decimal places.
#[must_use]
pub fn round_to(value: f64, places: u32) -> f64 {
    let Ok(exp) = i32::try_from(places) else {
        return value;
    };
    let factor = 10_f64.powi(exp);
    let rounded = (value * factor).round() / factor;

    if rounded.is_finite() { rounded } else { value }
}

/// `round(part / whole * 100)`, defined as `0.0` when `whole` is zero.
#[must_use]
#[allow(clippy::float_cmp)]
pub fn percent_of(part: f64, whole: f64) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }

    (part / whole * 100.0).round()
}

/// Distinct values of a projection, sorted ascending.
pub fn unique_sorted<'a, T: 'a, K: Ord>(
    items: impl IntoIterator<Item = &'a T>,
    f: impl FnMut(&'a T) -> K,
) -> Vec<K> {
    let mut keys: Vec<K> = items.into_iter().map(f).collect();
    keys.sort();
    keys.dedup();

    keys
}

/// Distinct values of a projection, in order of first appearance.
pub fn unique_in_order<'a, T: 'a, K: Clone + Eq + Hash>(
    items: impl IntoIterator<Item = &'a T>,
    mut f: impl FnMut(&'a T) -> K,
) -> Vec<K> {
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for item in items {
        let key = f(item);
        if seen.insert(key.clone()) {
            keys.push(key);
        }
    }

    keys
}

/// Number of distinct values of a projection.
pub fn distinct_count<'a, T: 'a, K: Eq + Hash>(
    items: impl IntoIterator<Item = &'a T>,
    f: impl FnMut(&'a T) -> K,
) -> usize {
    items.into_iter().map(f).collect::<HashSet<_>>().len()
}

/// Group items by a key, preserving first-appearance order of the keys.
pub fn group_by<'a, T: Clone + 'a, K: Clone + Eq + Hash>(
    items: impl IntoIterator<Item = &'a T>,
    mut f: impl FnMut(&'a T) -> K,
) -> Groups<K, T> {
    let mut groups = Groups::new();
    for item in items {
        groups.push(f(item), item.clone());
    }

    groups
}

///
/// TESTS
///
