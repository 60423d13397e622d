// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Errors reported by the stacking passes.

use core::convert::Infallible;
use core::fmt;

use vizir_data::{DatasetId, NormalizedKey};

/// Errors returned while reducing a stack layout.
///
/// `E` is the error type of caller-supplied accessors; it is [`Infallible`] for the plain entry
/// points.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StackError<E = Infallible> {
    /// A key, value or filter accessor failed. The error is passed through unchanged.
    Accessor(E),
    /// A datum's key has no entry in the stack information for its dataset.
    ///
    /// This happens when the key accessor used for the extent disagrees with the one the layout
    /// was stacked with.
    MissingDatum {
        /// Dataset being reduced.
        dataset: DatasetId,
        /// Normalized key that was looked up.
        key: NormalizedKey,
    },
}

impl<E: fmt::Display> fmt::Display for StackError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Accessor(err) => write!(f, "accessor failed: {err}"),
            Self::MissingDatum { dataset, key } => {
                write!(f, "no stacked datum for key `{key}` in dataset {}", dataset.0)
            }
        }
    }
}

impl<E: core::error::Error + 'static> core::error::Error for StackError<E> {
    fn source(&self) -> Option<&(dyn core::error::Error + 'static)> {
        match self {
            Self::Accessor(err) => Some(err),
            Self::MissingDatum { .. } => None,
        }
    }
}
