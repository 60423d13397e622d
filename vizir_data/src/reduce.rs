// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Numeric reductions with an explicit result for empty input.
//!
//! `NaN` entries are skipped. If nothing remains, the caller-supplied `default` is returned, which
//! keeps extents well defined when every value was filtered out.

/// Returns the largest non-`NaN` value, or `default` if there is none.
pub fn max_or(values: impl IntoIterator<Item = f64>, default: f64) -> f64 {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .reduce(f64::max)
        .unwrap_or(default)
}

/// Returns the smallest non-`NaN` value, or `default` if there is none.
pub fn min_or(values: impl IntoIterator<Item = f64>, default: f64) -> f64 {
    values
        .into_iter()
        .filter(|v| !v.is_nan())
        .reduce(f64::min)
        .unwrap_or(default)
}
