// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Cached stack layout that recomputes when its inputs change.

extern crate alloc;

use alloc::vec::Vec;

use vizir_data::Dataset;

use crate::error::StackError;
use crate::layout::StackLayout;
use crate::stack::StackInformation;

/// A stack layout plus the inputs it was last computed from.
///
/// Inputs are compared as ordered dataset snapshots (see [`Dataset::same_snapshot`]), so adding,
/// removing, reordering, bumping or rebuilding a dataset triggers a full recompute on the next
/// [`update`](Self::update). Anything else (including a change in accessor behavior) needs an
/// explicit [`invalidate`](Self::invalidate).
pub struct StackState<T> {
    layout: StackLayout<T>,
    valid: bool,
    info: StackInformation<T>,
    extent: (f64, f64),
}

impl<T> core::fmt::Debug for StackState<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("StackState")
            .field("layout", &self.layout)
            .field("valid", &self.valid)
            .field("info", &self.info)
            .field("extent", &self.extent)
            .finish()
    }
}

impl<T> StackState<T> {
    /// Creates an empty state; the first [`update`](Self::update) always computes.
    pub fn new(layout: StackLayout<T>) -> Self {
        Self {
            layout,
            valid: false,
            info: StackInformation::new(),
            extent: (0.0, 0.0),
        }
    }

    /// Returns the accessors in use.
    pub fn layout(&self) -> &StackLayout<T> {
        &self.layout
    }

    /// Replaces the accessors and invalidates the cached layout.
    pub fn set_layout(&mut self, layout: StackLayout<T>) {
        self.layout = layout;
        self.invalidate();
    }

    /// Returns the most recently computed layout.
    pub fn info(&self) -> &StackInformation<T> {
        &self.info
    }

    /// Returns the extent of the most recently computed layout.
    pub fn extent(&self) -> (f64, f64) {
        self.extent
    }

    /// Forces the next [`update`](Self::update) to recompute.
    pub fn invalidate(&mut self) {
        self.valid = false;
    }

    /// Brings the cached layout up to date with `datasets` (in stacking order).
    ///
    /// Returns `Ok(true)` if the layout was recomputed and `Ok(false)` if the inputs were
    /// unchanged. On error the previous layout is kept and the state stays invalid.
    pub fn update<'a>(
        &mut self,
        datasets: impl IntoIterator<Item = &'a Dataset<T>>,
    ) -> Result<bool, StackError>
    where
        T: 'a,
    {
        let datasets: Vec<&Dataset<T>> = datasets.into_iter().collect();
        let unchanged = self.valid
            && self.info.len() == datasets.len()
            && self
                .info
                .iter()
                .zip(&datasets)
                .all(|(entry, dataset)| entry.dataset().same_snapshot(dataset));
        if unchanged {
            log::debug!("stack inputs unchanged ({} datasets)", datasets.len());
            return Ok(false);
        }

        self.valid = false;
        let info = self.layout.stack_information(datasets.iter().copied());
        let extent = self.layout.extent(&info)?;
        log::debug!(
            "restacked {} datasets, extent [{}, {}]",
            datasets.len(),
            extent.0,
            extent.1
        );

        self.info = info;
        self.extent = extent;
        self.valid = true;
        Ok(true)
    }
}
