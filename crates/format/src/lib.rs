//! Common utility for extended `std` type formatting
//!
//! These are left public for convenience.
//!
//! Both output formats are plain text, so consistent number formatting is
//! needed everywhere.

// standard library
use std::fmt::Display;

// Alias for the format! macro out of laziness
pub use std::format as f;

/// Extends floating point primitives with decimal formatting options
pub trait NumFormat {
    /// Decimal formatting with an optional fixed precision
    ///
    /// With `None` the shortest representation that parses back to exactly the
    /// same value is used. Whole numbers are written without a decimal point,
    /// which is what most legacy text formats expect for integer-like values.
    ///
    /// With `Some(p)` the value is always written with `p` decimal places.
    ///
    /// ```rust
    /// # use mictools_format::NumFormat;
    /// assert_eq!(1.57.decimal(None), "1.57");
    /// assert_eq!(2.0.decimal(None), "2");
    /// assert_eq!(1.57.decimal(Some(4)), "1.5700");
    /// assert_eq!(0.0.decimal(Some(1)), "0.0");
    /// ```
    fn decimal(&self, precision: Option<usize>) -> String;
}

impl NumFormat for f64 {
    fn decimal(&self, precision: Option<usize>) -> String {
        match precision {
            Some(p) => f!("{:.p$}", self, p = p),
            None => f!("{}", self),
        }
    }
}

impl NumFormat for f32 {
    fn decimal(&self, precision: Option<usize>) -> String {
        f64::from(*self).decimal(precision)
    }
}

/// Extends Option for easy display formatting
pub trait OptionFormat {
    /// Display the value or a placeholder
    ///
    /// Generic over anything that implements `Display`, this will either be the
    /// value contained within `Some()` or the `placeholder` for the `None`
    /// variant.
    ///
    /// ```rust
    /// # use mictools_format::OptionFormat;
    /// let x: Option<u32> = Some(2);
    /// assert_eq!(x.display_or("?"), "2");
    ///
    /// let x: Option<u32> = None;
    /// assert_eq!(x.display_or("?"), "?");
    /// ```
    fn display_or(&self, placeholder: &str) -> String;
}

impl<T: Display> OptionFormat for Option<T> {
    fn display_or(&self, placeholder: &str) -> String {
        match self {
            Some(value) => f!("{value}"),
            None => placeholder.to_string(),
        }
    }
}
