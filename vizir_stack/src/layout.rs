// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Reusable key/value accessors for stacking.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;

use vizir_data::{Dataset, NormalizedKey, ToKey, ToNumber, normalize_key};

use crate::domain::domain_keys;
use crate::error::StackError;
use crate::extent::{ExtentFilter, compute_stack_extent};
use crate::stack::{StackInformation, compute_stack_information};

type KeyAccessor<T> = dyn Fn(&T, usize, &Dataset<T>) -> NormalizedKey;
type ValueAccessor<T> = dyn Fn(&T, usize, &Dataset<T>) -> f64;

/// The key and value accessors of a stacked chart, bundled for reuse.
///
/// Accessors are expected to be pure: the same datum, index and dataset must always produce the
/// same key and value.
pub struct StackLayout<T> {
    /// Key accessor (already normalized).
    pub key: Arc<KeyAccessor<T>>,
    /// Value accessor (already coerced).
    pub value: Arc<ValueAccessor<T>>,
}

impl<T> Clone for StackLayout<T> {
    fn clone(&self) -> Self {
        Self {
            key: Arc::clone(&self.key),
            value: Arc::clone(&self.value),
        }
    }
}

impl<T> core::fmt::Debug for StackLayout<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StackLayout")
            .field("key", &"<fn>")
            .field("value", &"<fn>")
            .finish()
    }
}

impl<T> StackLayout<T> {
    /// Creates a layout from key and value accessors.
    pub fn new<K, V>(
        key: impl Fn(&T, usize, &Dataset<T>) -> K + 'static,
        value: impl Fn(&T, usize, &Dataset<T>) -> V + 'static,
    ) -> Self
    where
        K: ToKey,
        V: ToNumber,
    {
        Self {
            key: Arc::new(move |d: &T, i: usize, ds: &Dataset<T>| normalize_key(&key(d, i, ds))),
            value: Arc::new(move |d: &T, i: usize, ds: &Dataset<T>| value(d, i, ds).to_number()),
        }
    }

    /// Replaces the key accessor.
    pub fn with_key<K: ToKey>(
        mut self,
        key: impl Fn(&T, usize, &Dataset<T>) -> K + 'static,
    ) -> Self {
        self.key = Arc::new(move |d: &T, i: usize, ds: &Dataset<T>| normalize_key(&key(d, i, ds)));
        self
    }

    /// Replaces the value accessor.
    pub fn with_value<V: ToNumber>(
        mut self,
        value: impl Fn(&T, usize, &Dataset<T>) -> V + 'static,
    ) -> Self {
        self.value = Arc::new(move |d: &T, i: usize, ds: &Dataset<T>| value(d, i, ds).to_number());
        self
    }

    /// Stacks `datasets` in iteration order.
    ///
    /// See [`compute_stack_information`].
    pub fn stack_information<'a>(
        &self,
        datasets: impl IntoIterator<Item = &'a Dataset<T>>,
    ) -> StackInformation<T>
    where
        T: 'a,
    {
        compute_stack_information(datasets, &*self.key, &*self.value)
    }

    /// Returns the extent of a layout produced by this accessor pair, counting every datum.
    pub fn extent(&self, info: &StackInformation<T>) -> Result<(f64, f64), StackError> {
        compute_stack_extent(info, &*self.key, &ExtentFilter::All)
    }

    /// Returns the extent of a layout, counting only data accepted by `filter`.
    pub fn extent_filtered(
        &self,
        info: &StackInformation<T>,
        filter: &ExtentFilter<'_, T>,
    ) -> Result<(f64, f64), StackError> {
        compute_stack_extent(info, &*self.key, filter)
    }

    /// Collects the distinct keys across `datasets`.
    pub fn domain_keys<'a>(
        &self,
        datasets: impl IntoIterator<Item = &'a Dataset<T>>,
    ) -> Vec<NormalizedKey>
    where
        T: 'a,
    {
        domain_keys(datasets, &*self.key)
    }
}
