// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Datasets and the identity-keyed arena that orders them.

extern crate alloc;

use alloc::sync::Arc;
use alloc::vec::Vec;

/// Stable handle identifying a [`Dataset`].
///
/// Stacking results are keyed by this handle, never by dataset contents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct DatasetId(pub u64);

/// An ordered run of caller records with a stable identity.
///
/// Records are shared behind an `Arc`, so cloning a dataset is cheap and never copies data. The
/// `version` starts at `1` and is bumped every time the data is replaced, which lets incremental
/// consumers detect changes without comparing records.
pub struct Dataset<T> {
    id: DatasetId,
    version: u64,
    data: Arc<[T]>,
}

impl<T> Dataset<T> {
    /// Creates a dataset with the given id and records.
    pub fn new(id: DatasetId, data: impl Into<Arc<[T]>>) -> Self {
        Self {
            id,
            version: 1,
            data: data.into(),
        }
    }

    /// Creates an empty dataset.
    pub fn empty(id: DatasetId) -> Self {
        Self::new(id, Vec::new())
    }

    /// Returns this dataset's identity.
    pub fn id(&self) -> DatasetId {
        self.id
    }

    /// Returns the data version.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Returns the records in order.
    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if there are no records.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterates `(index, record)` pairs in dataset order.
    pub fn rows(&self) -> impl ExactSizeIterator<Item = (usize, &T)> + '_ {
        self.data.iter().enumerate()
    }

    /// Returns `true` if `other` has the same id and version and shares this dataset's record
    /// allocation.
    ///
    /// Two datasets built separately from equal records are never the same snapshot.
    pub fn same_snapshot(&self, other: &Self) -> bool {
        self.id == other.id
            && self.version == other.version
            && Arc::ptr_eq(&self.data, &other.data)
    }

    /// Replaces the records and bumps the version.
    pub fn set_data(&mut self, data: impl Into<Arc<[T]>>) {
        self.data = data.into();
        self.bump();
    }

    /// Marks the dataset as changed without replacing its records.
    pub fn bump(&mut self) {
        self.version = self.version.wrapping_add(1);
    }
}

impl<T> Clone for Dataset<T> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            version: self.version,
            data: Arc::clone(&self.data),
        }
    }
}

impl<T> core::fmt::Debug for Dataset<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Dataset")
            .field("id", &self.id)
            .field("version", &self.version)
            .field("data", &self.data.len())
            .finish()
    }
}

/// An ordered collection of datasets keyed by [`DatasetId`].
///
/// Iteration order is insertion order unless changed with [`DatasetArena::move_to`]; it is the
/// order datasets are stacked in.
pub struct DatasetArena<T> {
    datasets: Vec<Dataset<T>>,
    next_id: u64,
}

impl<T> Default for DatasetArena<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> core::fmt::Debug for DatasetArena<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DatasetArena")
            .field("datasets", &self.datasets)
            .field("next_id", &self.next_id)
            .finish()
    }
}

impl<T> DatasetArena<T> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self {
            datasets: Vec::new(),
            next_id: 0,
        }
    }

    /// Appends a new dataset on top of the stack and returns its freshly allocated id.
    pub fn push(&mut self, data: impl Into<Arc<[T]>>) -> DatasetId {
        let id = DatasetId(self.next_id);
        self.next_id += 1;
        self.datasets.push(Dataset::new(id, data));
        log::trace!("dataset {id:?} pushed at position {}", self.datasets.len() - 1);
        id
    }

    /// Inserts a dataset with a caller-chosen id.
    ///
    /// If a dataset with the same id exists it is replaced in place (keeping its stacking
    /// position), and the incoming version is raised above the old one so the change stays
    /// observable. Returns the replaced dataset.
    pub fn insert(&mut self, mut dataset: Dataset<T>) -> Option<Dataset<T>> {
        let id = dataset.id;
        self.next_id = self.next_id.max(id.0.saturating_add(1));
        match self.position(id) {
            Some(pos) => {
                let old = &self.datasets[pos];
                if dataset.version <= old.version {
                    dataset.version = old.version.wrapping_add(1);
                }
                Some(core::mem::replace(&mut self.datasets[pos], dataset))
            }
            None => {
                self.datasets.push(dataset);
                None
            }
        }
    }

    /// Returns the dataset for `id`, if present.
    pub fn get(&self, id: DatasetId) -> Option<&Dataset<T>> {
        self.datasets.iter().find(|d| d.id == id)
    }

    /// Returns the dataset for `id` mutably, if present.
    pub fn get_mut(&mut self, id: DatasetId) -> Option<&mut Dataset<T>> {
        self.datasets.iter_mut().find(|d| d.id == id)
    }

    /// Replaces the records of dataset `id` and bumps its version.
    ///
    /// Returns `false` if no such dataset exists.
    pub fn set_data(&mut self, id: DatasetId, data: impl Into<Arc<[T]>>) -> bool {
        let Some(dataset) = self.get_mut(id) else {
            return false;
        };
        dataset.set_data(data);
        log::trace!("dataset {id:?} updated to version {}", dataset.version);
        true
    }

    /// Removes dataset `id`, returning it.
    pub fn remove(&mut self, id: DatasetId) -> Option<Dataset<T>> {
        let pos = self.position(id)?;
        Some(self.datasets.remove(pos))
    }

    /// Moves dataset `id` to `position` in stacking order (clamped to the last slot).
    ///
    /// Returns `false` if no such dataset exists.
    pub fn move_to(&mut self, id: DatasetId, position: usize) -> bool {
        let Some(from) = self.position(id) else {
            return false;
        };
        let dataset = self.datasets.remove(from);
        let to = position.min(self.datasets.len());
        self.datasets.insert(to, dataset);
        true
    }

    /// Returns the stacking position of dataset `id`.
    pub fn position(&self, id: DatasetId) -> Option<usize> {
        self.datasets.iter().position(|d| d.id == id)
    }

    /// Iterates datasets in stacking order.
    pub fn iter(&self) -> core::slice::Iter<'_, Dataset<T>> {
        self.datasets.iter()
    }

    /// Iterates dataset ids in stacking order.
    pub fn ids(&self) -> impl ExactSizeIterator<Item = DatasetId> + '_ {
        self.datasets.iter().map(|d| d.id)
    }

    /// Returns the datasets as a slice in stacking order.
    pub fn as_slice(&self) -> &[Dataset<T>] {
        &self.datasets
    }

    /// Returns the number of datasets.
    pub fn len(&self) -> usize {
        self.datasets.len()
    }

    /// Returns `true` if the arena holds no datasets.
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }
}

impl<'a, T> IntoIterator for &'a DatasetArena<T> {
    type Item = &'a Dataset<T>;
    type IntoIter = core::slice::Iter<'a, Dataset<T>>;

    fn into_iter(self) -> Self::IntoIter {
        self.datasets.iter()
    }
}
