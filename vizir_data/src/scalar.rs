// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loosely typed cell values and numeric coercion.

extern crate alloc;

use alloc::string::{String, ToString};
use core::fmt;

use crate::key::{NormalizedKey, ToKey, write_number};

/// A loosely typed value, as found in sparse or hand-written chart data.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Scalar {
    /// An absent value.
    #[default]
    Null,
    /// A boolean.
    Bool(bool),
    /// A number.
    Number(f64),
    /// Free-form text.
    Text(String),
}

impl ToKey for Scalar {
    fn to_key(&self) -> NormalizedKey {
        NormalizedKey::from(self.to_string())
    }
}

impl fmt::Display for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("null"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Number(v) => write_number(f, *v),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<f64> for Scalar {
    fn from(v: f64) -> Self {
        Self::Number(v)
    }
}

impl From<i32> for Scalar {
    fn from(v: i32) -> Self {
        Self::Number(f64::from(v))
    }
}

impl From<bool> for Scalar {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<&str> for Scalar {
    fn from(v: &str) -> Self {
        Self::Text(String::from(v))
    }
}

impl From<String> for Scalar {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl<T: Into<Self>> From<Option<T>> for Scalar {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// Lenient conversion to `f64`.
///
/// Conversion never fails: values that cannot be read as a number become `NaN`, and absent values
/// (`None`, [`Scalar::Null`], empty text) become `0.0` so sparse series still stack.
pub trait ToNumber {
    /// Converts `self` to a number.
    fn to_number(&self) -> f64;
}

impl ToNumber for f64 {
    fn to_number(&self) -> f64 {
        *self
    }
}

impl ToNumber for f32 {
    fn to_number(&self) -> f64 {
        f64::from(*self)
    }
}

macro_rules! lossless_to_number {
    ($($t:ty),*) => {
        $(impl ToNumber for $t {
            fn to_number(&self) -> f64 {
                f64::from(*self)
            }
        })*
    };
}

lossless_to_number!(i8, i16, i32, u8, u16, u32);

macro_rules! rounding_to_number {
    ($($t:ty),*) => {
        $(impl ToNumber for $t {
            #[allow(clippy::cast_precision_loss, reason = "rounds to the nearest f64 like any other number")]
            fn to_number(&self) -> f64 {
                *self as f64
            }
        })*
    };
}

rounding_to_number!(i64, u64, i128, u128, isize, usize);

impl ToNumber for bool {
    fn to_number(&self) -> f64 {
        if *self { 1.0 } else { 0.0 }
    }
}

impl ToNumber for str {
    fn to_number(&self) -> f64 {
        string_to_number(self)
    }
}

impl ToNumber for String {
    fn to_number(&self) -> f64 {
        string_to_number(self)
    }
}

impl ToNumber for Scalar {
    fn to_number(&self) -> f64 {
        match self {
            Self::Null => 0.0,
            Self::Bool(b) => b.to_number(),
            Self::Number(v) => *v,
            Self::Text(s) => string_to_number(s),
        }
    }
}

impl<T: ToNumber> ToNumber for Option<T> {
    fn to_number(&self) -> f64 {
        self.as_ref().map_or(0.0, ToNumber::to_number)
    }
}

impl<T: ToNumber + ?Sized> ToNumber for &T {
    fn to_number(&self) -> f64 {
        (**self).to_number()
    }
}

/// Converts text to a number using the conventional loose string rules.
///
/// - Surrounding whitespace (Unicode white space other than U+0085, plus the byte order mark) is
///   ignored.
/// - Empty text is `0`.
/// - `Infinity`, `+Infinity` and `-Infinity` are recognized (case-sensitive).
/// - Unsigned `0x`, `0o` and `0b` prefixes select hexadecimal, octal and binary integers.
/// - Otherwise the text must be a plain decimal literal with optional sign, fraction and
///   exponent.
///
/// Anything else is `NaN`; in particular `inf`, `nan` and trailing garbage are rejected.
pub fn string_to_number(s: &str) -> f64 {
    let s = s.trim_matches(is_number_padding);
    if s.is_empty() {
        return 0.0;
    }
    match s {
        "Infinity" | "+Infinity" => return f64::INFINITY,
        "-Infinity" => return f64::NEG_INFINITY,
        _ => {}
    }
    if let Some(v) = radix_literal(s) {
        return v;
    }
    if is_decimal_literal(s) {
        s.parse::<f64>().unwrap_or(f64::NAN)
    } else {
        f64::NAN
    }
}

fn is_number_padding(c: char) -> bool {
    match c {
        '\u{85}' => false,
        '\u{feff}' => true,
        _ => c.is_whitespace(),
    }
}

fn radix_literal(s: &str) -> Option<f64> {
    let radix = match s.as_bytes() {
        [b'0', b'x' | b'X', ..] => 16,
        [b'0', b'o' | b'O', ..] => 8,
        [b'0', b'b' | b'B', ..] => 2,
        _ => return None,
    };
    let digits = &s[2..];
    if digits.is_empty() {
        return Some(f64::NAN);
    }
    let mut acc = 0.0_f64;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else {
            return Some(f64::NAN);
        };
        acc = acc * f64::from(radix) + f64::from(d);
    }
    Some(acc)
}

fn is_decimal_literal(s: &str) -> bool {
    let b = s.as_bytes();
    let mut i = 0;
    if matches!(b.first(), Some(b'+' | b'-')) {
        i += 1;
    }
    let int_start = i;
    while b.get(i).is_some_and(u8::is_ascii_digit) {
        i += 1;
    }
    let mut digits = i - int_start;
    if b.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        digits += i - frac_start;
    }
    if digits == 0 {
        return false;
    }
    if matches!(b.get(i), Some(b'e' | b'E')) {
        i += 1;
        if matches!(b.get(i), Some(b'+' | b'-')) {
            i += 1;
        }
        let exp_start = i;
        while b.get(i).is_some_and(u8::is_ascii_digit) {
            i += 1;
        }
        if i == exp_start {
            return false;
        }
    }
    i == b.len()
}
