// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stack key normalization.

extern crate alloc;

use alloc::string::{String, ToString};
use core::borrow::Borrow;
use core::fmt;

/// A categorical key after normalization.
///
/// Keys are compared by their string rendering, so a numeric `1` and a text `"1"` land in the same
/// stack. That collapse is intentional and callers that need to keep such keys apart must encode
/// the distinction in the key itself.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NormalizedKey(String);

impl NormalizedKey {
    /// Returns the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the key, returning its text.
    pub fn into_string(self) -> String {
        self.0
    }
}

/// Conversion of a raw categorical key into its stacking bucket.
///
/// Text is taken as-is, integers and booleans use their usual rendering, and floats are rendered
/// the same way as [`Scalar::Number`](crate::Scalar::Number), so `-0.0` and `0.0` share a bucket
/// and a bare `1e21` key matches `Scalar::Number(1e21)`. Implement this for custom key types
/// (usually by delegating to one of the impls here).
pub trait ToKey {
    /// Converts `self` to a normalized key.
    fn to_key(&self) -> NormalizedKey;
}

/// Normalizes a raw key into its stacking bucket.
pub fn normalize_key<K: ToKey + ?Sized>(key: &K) -> NormalizedKey {
    key.to_key()
}

impl ToKey for str {
    fn to_key(&self) -> NormalizedKey {
        NormalizedKey::from(self)
    }
}

impl ToKey for String {
    fn to_key(&self) -> NormalizedKey {
        NormalizedKey(self.clone())
    }
}

impl ToKey for NormalizedKey {
    fn to_key(&self) -> NormalizedKey {
        self.clone()
    }
}

macro_rules! display_to_key {
    ($($t:ty),*) => {
        $(impl ToKey for $t {
            fn to_key(&self) -> NormalizedKey {
                NormalizedKey(self.to_string())
            }
        })*
    };
}

display_to_key!(
    bool, char, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);

impl ToKey for f64 {
    fn to_key(&self) -> NormalizedKey {
        NormalizedKey(Number(*self).to_string())
    }
}

impl ToKey for f32 {
    fn to_key(&self) -> NormalizedKey {
        f64::from(*self).to_key()
    }
}

impl<T: ToKey + ?Sized> ToKey for &T {
    fn to_key(&self) -> NormalizedKey {
        (**self).to_key()
    }
}

struct Number(f64);

impl fmt::Display for Number {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_number(f, self.0)
    }
}

impl fmt::Display for NormalizedKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Borrow<str> for NormalizedKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for NormalizedKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for NormalizedKey {
    fn from(s: &str) -> Self {
        Self(String::from(s))
    }
}

impl From<String> for NormalizedKey {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Writes a number the way chart data keys are conventionally stringified.
///
/// Integral values carry no fractional part, `-0` prints as `0`, infinities print as `Infinity` /
/// `-Infinity`, and very large or very small magnitudes switch to exponent form with an explicit
/// exponent sign (`1e+21`, `1e-7`).
pub(crate) fn write_number(f: &mut fmt::Formatter<'_>, v: f64) -> fmt::Result {
    if v.is_nan() {
        return f.write_str("NaN");
    }
    if v.is_infinite() {
        return f.write_str(if v > 0.0 { "Infinity" } else { "-Infinity" });
    }
    if v == 0.0 {
        return f.write_str("0");
    }
    let abs = v.abs();
    if !(1e-6..1e21).contains(&abs) {
        let s = alloc::format!("{v:e}");
        return match s.split_once('e') {
            Some((mantissa, exp)) if !exp.starts_with('-') => write!(f, "{mantissa}e+{exp}"),
            _ => f.write_str(&s),
        };
    }
    write!(f, "{v}")
}
