//! Grain table extraction and MICRESS grain property files
//!
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod error;
mod extract;
mod grain;
mod reader;
mod rotation;
mod writer;

// Inline anything important for a nice public API
#[doc(inline)]
pub use grain::{AngleUnit, Grain};

#[doc(inline)]
pub use extract::{extract_grains, GrainTableExtractor};

#[doc(inline)]
pub use rotation::{rotate, Rotation};

#[doc(inline)]
pub use writer::{format_grain, write_table, write_txt, Delimiter, TxtOptions};

#[doc(inline)]
pub use reader::{parse_txt, read_txt};

#[doc(inline)]
pub use error::{Error, Result};
