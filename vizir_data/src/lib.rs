// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dataset model for stacked layouts.
//!
//! This crate provides the pieces the stacking engine reads from:
//! - [`Dataset`]: an ordered, cheaply clonable run of caller records with a stable
//!   [`DatasetId`] and a version that bumps whenever its data changes,
//! - [`DatasetArena`]: an ordered, identity-keyed collection of datasets (its order is the
//!   stacking order),
//! - [`NormalizedKey`]: stringified categorical keys, so keys of different source types compare
//!   consistently,
//! - [`ToNumber`] and [`Scalar`]: lenient numeric coercion for sparse or loosely typed data,
//! - [`reduce`]: min/max reductions with an explicit value for empty input.

#![no_std]

extern crate alloc;

mod dataset;
mod key;
pub mod reduce;
mod scalar;

pub use dataset::{Dataset, DatasetArena, DatasetId};
pub use key::{NormalizedKey, ToKey, normalize_key};
pub use scalar::{Scalar, ToNumber, string_to_number};
