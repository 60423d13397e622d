// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack aggregation: per-dataset, per-key values and offsets.

extern crate alloc;

use alloc::vec::Vec;
use core::convert::Infallible;

use hashbrown::HashMap;
use hashbrown::hash_map::Entry;
use vizir_data::{Dataset, DatasetId, NormalizedKey, ToKey, ToNumber, normalize_key};

/// One datum's contribution to a stack.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StackedDatum {
    /// The datum's own (coerced) value.
    pub value: f64,
    /// Sum of same-signed values at the same key from datasets stacked earlier.
    pub offset: f64,
}

impl StackedDatum {
    /// Returns the far edge of this datum's span (`value + offset`).
    pub fn end(&self) -> f64 {
        self.value + self.offset
    }
}

/// The stacked data for a single dataset.
pub struct StackEntry<T> {
    dataset: Dataset<T>,
    data: HashMap<NormalizedKey, StackedDatum>,
}

impl<T> StackEntry<T> {
    /// Returns the dataset this entry was computed from.
    ///
    /// This is a cheap clone of the caller's dataset taken at aggregation time.
    pub fn dataset(&self) -> &Dataset<T> {
        &self.dataset
    }

    /// Returns the stacked datum for a normalized key.
    pub fn get(&self, key: &str) -> Option<&StackedDatum> {
        self.data.get(key)
    }

    /// Iterates `(key, datum)` pairs in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = (&NormalizedKey, &StackedDatum)> + '_ {
        self.data.iter()
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the dataset contributed no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl<T> Clone for StackEntry<T> {
    fn clone(&self) -> Self {
        Self {
            dataset: self.dataset.clone(),
            data: self.data.clone(),
        }
    }
}

impl<T> core::fmt::Debug for StackEntry<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StackEntry")
            .field("dataset", &self.dataset)
            .field("data", &self.data)
            .finish()
    }
}

/// Stacked data for every dataset, keyed by dataset identity.
///
/// Entries are kept in stacking order. Equality compares dataset ids, dataset versions and the
/// stacked values, never record contents.
pub struct StackInformation<T> {
    entries: Vec<StackEntry<T>>,
}

impl<T> StackInformation<T> {
    /// Creates an empty layout.
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// Returns the entry for dataset `id`.
    pub fn get(&self, id: DatasetId) -> Option<&StackEntry<T>> {
        self.entries.iter().find(|e| e.dataset.id() == id)
    }

    /// Returns the stacked datum for `(id, key)`.
    pub fn datum(&self, id: DatasetId, key: &str) -> Option<StackedDatum> {
        self.get(id)?.get(key).copied()
    }

    /// Iterates entries in stacking order.
    pub fn iter(&self) -> core::slice::Iter<'_, StackEntry<T>> {
        self.entries.iter()
    }

    /// Iterates dataset ids in stacking order.
    pub fn dataset_ids(&self) -> impl ExactSizeIterator<Item = DatasetId> + '_ {
        self.entries.iter().map(|e| e.dataset.id())
    }

    /// Returns the number of datasets.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no datasets were stacked.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for StackInformation<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for StackInformation<T> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<T> PartialEq for StackInformation<T> {
    fn eq(&self, other: &Self) -> bool {
        self.entries.len() == other.entries.len()
            && self.entries.iter().zip(&other.entries).all(|(a, b)| {
                a.dataset.id() == b.dataset.id()
                    && a.dataset.version() == b.dataset.version()
                    && a.data == b.data
            })
    }
}

impl<T> core::fmt::Debug for StackInformation<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_list().entries(&self.entries).finish()
    }
}

impl<'a, T> IntoIterator for &'a StackInformation<T> {
    type Item = &'a StackEntry<T>;
    type IntoIter = core::slice::Iter<'a, StackEntry<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

/// Computes the value and offset of every datum in every dataset.
///
/// `datasets` is stacked in iteration order: the first dataset contributing a value of a given
/// sign at a key sits on the baseline (`offset == 0`), later ones are placed on the running total
/// of same-signed values at that key. Keys are normalized with
/// [`normalize_key`](vizir_data::normalize_key) and values with [`ToNumber`].
///
/// If a dataset repeats a key, every occurrence feeds the running totals but only the last one is
/// kept in that dataset's entry.
pub fn compute_stack_information<'a, T, K, V, FK, FV>(
    datasets: impl IntoIterator<Item = &'a Dataset<T>>,
    key: FK,
    value: FV,
) -> StackInformation<T>
where
    T: 'a,
    K: ToKey,
    V: ToNumber,
    FK: Fn(&T, usize, &Dataset<T>) -> K,
    FV: Fn(&T, usize, &Dataset<T>) -> V,
{
    let stacked = try_compute_stack_information(
        datasets,
        |d: &T, i: usize, ds: &Dataset<T>| Ok::<_, Infallible>(key(d, i, ds)),
        |d: &T, i: usize, ds: &Dataset<T>| Ok::<_, Infallible>(value(d, i, ds)),
    );
    match stacked {
        Ok(info) => info,
        Err(never) => match never {},
    }
}

/// Fallible form of [`compute_stack_information`].
///
/// The first accessor error aborts the pass and is returned as-is; no partial layout is produced.
pub fn try_compute_stack_information<'a, T, K, V, E, FK, FV>(
    datasets: impl IntoIterator<Item = &'a Dataset<T>>,
    key: FK,
    value: FV,
) -> Result<StackInformation<T>, E>
where
    T: 'a,
    K: ToKey,
    V: ToNumber,
    FK: Fn(&T, usize, &Dataset<T>) -> Result<K, E>,
    FV: Fn(&T, usize, &Dataset<T>) -> Result<V, E>,
{
    let mut positive: HashMap<NormalizedKey, f64> = HashMap::new();
    let mut negative: HashMap<NormalizedKey, f64> = HashMap::new();
    let mut entries = Vec::new();
    let mut datums = 0_usize;

    for dataset in datasets {
        let mut data = HashMap::with_capacity(dataset.len());
        for (index, datum) in dataset.rows() {
            let k = normalize_key(&key(datum, index, dataset)?);
            let v = value(datum, index, dataset)?.to_number();
            if v.is_nan() {
                log::debug!(
                    "value at index {index} (key `{k}`) of dataset {} is not a number",
                    dataset.id().0
                );
            }

            // NaN fails `>= 0` and lands with the negatives.
            let running = if v >= 0.0 {
                &mut positive
            } else {
                &mut negative
            };
            let offset = match running.entry(k.clone()) {
                Entry::Occupied(mut e) => {
                    let offset = *e.get();
                    *e.get_mut() = offset + v;
                    offset
                }
                Entry::Vacant(e) => {
                    e.insert(v);
                    0.0
                }
            };

            data.insert(k, StackedDatum { value: v, offset });
        }
        datums += dataset.len();
        entries.push(StackEntry {
            dataset: dataset.clone(),
            data,
        });
    }

    log::trace!("stacked {} datasets ({datums} datums)", entries.len());
    Ok(StackInformation { entries })
}
