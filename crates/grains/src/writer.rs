//! Write operations for MICRESS grain property tables

// standard library
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::grain::Grain;

// mictools modules
use mictools_format::{f, NumFormat};

// external crates
use log::info;
use serde::{Deserialize, Serialize};

/// Column separator of a grain table
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Delimiter {
    /// A single space
    #[default]
    Whitespace,
    /// A single comma
    Comma,
}

impl Delimiter {
    /// The separator text
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Whitespace => " ",
            Self::Comma => ",",
        }
    }
}

/// Formatting options for [write_txt()]
///
/// `precision` of `None` writes the shortest form of every angle that parses
/// back to exactly the same value.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TxtOptions {
    /// Fixed number of decimals for Euler angles
    pub precision: Option<usize>,
    /// Column separator
    pub delimiter: Delimiter,
}

impl TxtOptions {
    /// Set a fixed number of decimals for the angles
    pub fn precision(mut self, precision: Option<usize>) -> Self {
        self.precision = precision;
        self
    }

    /// Set the column separator
    pub fn delimiter(mut self, delimiter: Delimiter) -> Self {
        self.delimiter = delimiter;
        self
    }
}

/// Write a grain table to a MICRESS grain property file
///
/// The file is a single header with the grain count and column names followed
/// by one line per grain, in the order given.
///
/// ```text
/// # 2 grains: id phase phi1 Phi phi2
/// 1 2 0.1 0.2 0.3
/// 2 1 1.57 0 3.14
/// ```
///
/// A failure part way through leaves a truncated file behind.
///
/// ```rust, no_run
/// # use mictools_grains::{write_txt, Grain, TxtOptions, Delimiter};
/// let grains = vec![Grain::new(1, 2, [0.1, 0.2, 0.3])];
/// let options = TxtOptions::default().delimiter(Delimiter::Comma);
/// write_txt(&grains, "./grains.txt", &options).unwrap();
/// ```
pub fn write_txt<P: AsRef<Path>>(grains: &[Grain], path: P, options: &TxtOptions) -> Result<()> {
    let path = path.as_ref();
    let io_error = |source| Error::IOWriteError {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::new(file);
    write_table(&mut writer, grains, options).map_err(io_error)?;
    writer.flush().map_err(io_error)?;

    info!("Written {} grains to {path:?}", grains.len());
    Ok(())
}

/// Write a grain table to any writer
pub fn write_table<W: Write>(
    writer: &mut W,
    grains: &[Grain],
    options: &TxtOptions,
) -> std::io::Result<()> {
    let d = options.delimiter.as_str();
    writeln!(
        writer,
        "# {} grains: {}",
        grains.len(),
        ["id", "phase", "phi1", "Phi", "phi2"].join(d)
    )?;

    for grain in grains {
        writeln!(writer, "{}", format_grain(grain, options))?;
    }
    Ok(())
}

/// One table row for a grain
pub fn format_grain(grain: &Grain, options: &TxtOptions) -> String {
    let d = options.delimiter.as_str();
    let angles = grain
        .euler
        .iter()
        .map(|a| a.decimal(options.precision))
        .collect::<Vec<String>>()
        .join(d);
    f!("{}{d}{}{d}{angles}", grain.id, grain.phase)
}
