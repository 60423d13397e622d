// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shared categorical domains.

extern crate alloc;

use alloc::vec::Vec;
use core::convert::Infallible;

use hashbrown::HashSet;
use vizir_data::{Dataset, NormalizedKey, ToKey, normalize_key};

/// Collects the distinct normalized keys across all datasets.
///
/// Each key appears exactly once. Keys are returned in first-seen order, but callers that only
/// need a domain should treat the result as a set.
pub fn domain_keys<'a, T, K, FK>(
    datasets: impl IntoIterator<Item = &'a Dataset<T>>,
    key: FK,
) -> Vec<NormalizedKey>
where
    T: 'a,
    K: ToKey,
    FK: Fn(&T, usize, &Dataset<T>) -> K,
{
    match try_domain_keys(datasets, |d: &T, i: usize, ds: &Dataset<T>| {
        Ok::<_, Infallible>(key(d, i, ds))
    }) {
        Ok(keys) => keys,
        Err(never) => match never {},
    }
}

/// Fallible form of [`domain_keys`]; the first accessor error is returned unchanged.
pub fn try_domain_keys<'a, T, K, E, FK>(
    datasets: impl IntoIterator<Item = &'a Dataset<T>>,
    key: FK,
) -> Result<Vec<NormalizedKey>, E>
where
    T: 'a,
    K: ToKey,
    FK: Fn(&T, usize, &Dataset<T>) -> Result<K, E>,
{
    let mut seen = HashSet::new();
    let mut keys = Vec::new();
    for dataset in datasets {
        for (index, datum) in dataset.rows() {
            let k = normalize_key(&key(datum, index, dataset)?);
            if seen.insert(k.clone()) {
                keys.push(k);
            }
        }
    }
    Ok(keys)
}
