// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack extent: the value domain spanned by a stacked layout.

extern crate alloc;

use alloc::boxed::Box;
use alloc::vec::Vec;
use core::convert::Infallible;

use vizir_data::reduce::{max_or, min_or};
use vizir_data::{Dataset, NormalizedKey, ToKey, normalize_key};

use crate::error::StackError;
use crate::stack::StackInformation;

type DatumPredicate<'a, T, E> = dyn Fn(&T, usize, &Dataset<T>) -> Result<bool, E> + 'a;
type KeyPredicate<'a, E> = dyn Fn(&NormalizedKey) -> Result<bool, E> + 'a;

/// Selects which data points contribute to a stack extent.
///
/// Rejected data still occupy their place in the stack; they are only left out of the extent
/// (for example, series hidden by a legend toggle).
pub enum ExtentFilter<'a, T, E = Infallible> {
    /// Every datum contributes.
    All,
    /// Predicate over the original `(datum, index, dataset)` triple.
    Datum(Box<DatumPredicate<'a, T, E>>),
    /// Predicate over the normalized key only.
    Key(Box<KeyPredicate<'a, E>>),
}

impl<'a, T, E> ExtentFilter<'a, T, E> {
    /// Creates a filter from a predicate over `(datum, index, dataset)`.
    pub fn datum(f: impl Fn(&T, usize, &Dataset<T>) -> bool + 'a) -> Self {
        Self::Datum(Box::new(move |d: &T, i: usize, ds: &Dataset<T>| {
            Ok::<_, E>(f(d, i, ds))
        }))
    }

    /// Creates a filter from a fallible predicate over `(datum, index, dataset)`.
    pub fn try_datum(f: impl Fn(&T, usize, &Dataset<T>) -> Result<bool, E> + 'a) -> Self {
        Self::Datum(Box::new(f))
    }

    /// Creates a filter from a predicate over the normalized key.
    pub fn key(f: impl Fn(&NormalizedKey) -> bool + 'a) -> Self {
        Self::Key(Box::new(move |k: &NormalizedKey| Ok::<_, E>(f(k))))
    }

    /// Creates a filter from a fallible predicate over the normalized key.
    pub fn try_key(f: impl Fn(&NormalizedKey) -> Result<bool, E> + 'a) -> Self {
        Self::Key(Box::new(f))
    }
}

impl<T, E> Default for ExtentFilter<'_, T, E> {
    fn default() -> Self {
        Self::All
    }
}

impl<T, E> core::fmt::Debug for ExtentFilter<'_, T, E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Self::All => f.write_str("All"),
            Self::Datum(_) => f.write_str("Datum(<fn>)"),
            Self::Key(_) => f.write_str("Key(<fn>)"),
        }
    }
}

/// Computes the `(min, max)` domain covered by a stacked layout.
///
/// Each dataset in `info` is re-read in order; every datum accepted by `filter` contributes the
/// end of its stacked span (`value + offset`), looked up through `key`. `NaN` ends are ignored.
/// The result always contains `0.0`, and is `(0.0, 0.0)` when nothing contributes.
pub fn compute_stack_extent<T, K, FK>(
    info: &StackInformation<T>,
    key: FK,
    filter: &ExtentFilter<'_, T>,
) -> Result<(f64, f64), StackError>
where
    K: ToKey,
    FK: Fn(&T, usize, &Dataset<T>) -> K,
{
    try_compute_stack_extent(
        info,
        |d: &T, i: usize, ds: &Dataset<T>| Ok::<_, Infallible>(key(d, i, ds)),
        filter,
    )
}

/// Fallible form of [`compute_stack_extent`].
///
/// Datum filters run before the key accessor, so rejected data are never keyed. Key filters need
/// the key and run after it.
pub fn try_compute_stack_extent<T, K, E, FK>(
    info: &StackInformation<T>,
    key: FK,
    filter: &ExtentFilter<'_, T, E>,
) -> Result<(f64, f64), StackError<E>>
where
    K: ToKey,
    FK: Fn(&T, usize, &Dataset<T>) -> Result<K, E>,
{
    let mut ends = Vec::new();

    for entry in info {
        let dataset = entry.dataset();
        for (index, datum) in dataset.rows() {
            if let ExtentFilter::Datum(accept) = filter
                && !accept(datum, index, dataset).map_err(StackError::Accessor)?
            {
                continue;
            }
            let k = normalize_key(&key(datum, index, dataset).map_err(StackError::Accessor)?);
            if let ExtentFilter::Key(accept) = filter
                && !accept(&k).map_err(StackError::Accessor)?
            {
                continue;
            }
            let Some(stacked) = entry.get(k.as_str()) else {
                return Err(StackError::MissingDatum {
                    dataset: dataset.id(),
                    key: k,
                });
            };
            ends.push(stacked.end());
        }
    }

    let max = max_or(ends.iter().copied(), 0.0);
    let min = min_or(ends.iter().copied(), 0.0);
    Ok((min.min(0.0), max.max(0.0)))
}
