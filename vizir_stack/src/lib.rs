// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked-series layout.
//!
//! Given several datasets that share a categorical key space, this crate computes where every
//! datum sits in a stacked bar/area chart:
//! - [`compute_stack_information`] folds datasets in order and records, per dataset and key, the
//!   datum's value and the running total of same-signed values stacked beneath it,
//! - [`compute_stack_extent`] reduces that layout to a `(min, max)` domain that always includes
//!   the zero baseline,
//! - [`domain_keys`] collects the de-duplicated keys across all datasets (for band/point scale
//!   domains).
//!
//! Positive and negative values are accumulated separately, so stacks grow away from zero in both
//! directions. Zero counts as positive.
//!
//! Every entry point is a pure, synchronous pass over its inputs. [`StackState`] adds a thin
//! caching layer that recomputes only when its ordered input snapshots change.

#![no_std]

extern crate alloc;

mod domain;
mod error;
mod extent;
mod layout;
mod stack;
#[cfg(test)]
mod stacked_tests;
mod state;

pub use domain::{domain_keys, try_domain_keys};
pub use error::StackError;
pub use extent::{ExtentFilter, compute_stack_extent, try_compute_stack_extent};
pub use layout::StackLayout;
pub use stack::{
    StackEntry, StackInformation, StackedDatum, compute_stack_information,
    try_compute_stack_information,
};
pub use state::StackState;

pub use vizir_data::{Dataset, DatasetArena, DatasetId, NormalizedKey, Scalar, ToKey, ToNumber};
