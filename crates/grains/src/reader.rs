//! Read grain property tables back into memory
//!
//! Used to verify written tables. Either delimiter is accepted on any line so
//! the same reader works for every [TxtOptions](crate::TxtOptions).

// standard library
use std::path::Path;

// crate modules
use crate::error::{Error, Result};
use crate::grain::Grain;

// mictools modules
use mictools_format::f;

// external crates
use log::{debug, info};

// nom parser combinators
use nom::branch::alt;
use nom::bytes::complete::tag;
use nom::character::complete::{char, not_line_ending, space0, space1};
use nom::character::complete::{i64 as integer, u64 as unsigned};
use nom::combinator::{all_consuming, map};
use nom::number::complete::double;
use nom::sequence::{delimited, preceded, tuple};
use nom::IResult;

/// Read a grain table from a file
///
/// ```rust, no_run
/// # use mictools_grains::read_txt;
/// let grains = read_txt("./grains.txt").unwrap();
/// println!("{}", grains[0]);
/// ```
pub fn read_txt<P: AsRef<Path>>(path: P) -> Result<Vec<Grain>> {
    let path = path.as_ref();
    info!("Reading {path:?}");
    let content = std::fs::read_to_string(path)?;
    parse_txt(&content)
}

/// Parse the text of a grain table
///
/// The grain count in the header must match the number of rows.
///
/// ```rust
/// # use mictools_grains::{parse_txt, Grain};
/// let text = "# 1 grains: id,phase,phi1,Phi,phi2\n1,2,0.1,0.2,0.3\n";
/// let grains = parse_txt(text).unwrap();
/// assert_eq!(grains, vec![Grain::new(1, 2, [0.1, 0.2, 0.3])]);
/// ```
pub fn parse_txt(content: &str) -> Result<Vec<Grain>> {
    let mut lines = content
        .lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty());

    let (_, first) = lines
        .next()
        .ok_or_else(|| Error::ParseError("empty grain table".to_string()))?;

    let (_, count) = all_consuming(header)(first.trim_end())
        .map_err(|e| Error::ParseError(f!("invalid header \"{first}\": {e}")))?;
    debug!("Header declares {count} grains");

    let grains = lines
        .map(|(n, line)| {
            all_consuming(row)(line.trim_end())
                .map(|(_, grain)| grain)
                .map_err(|e| Error::ParseError(f!("invalid row on line {}: {e}", n + 1)))
        })
        .collect::<Result<Vec<Grain>>>()?;

    if grains.len() as u64 != count {
        return Err(Error::ParseError(f!(
            "header declares {count} grains but {} rows were found",
            grains.len()
        )));
    }

    Ok(grains)
}

/// `# <N> grains: <column names>`
fn header(i: &str) -> IResult<&str, u64> {
    let (i, _) = tuple((char('#'), space0))(i)?;
    let (i, count) = unsigned(i)?;
    let (i, _) = tuple((space1, tag("grains:"), not_line_ending))(i)?;
    Ok((i, count))
}

/// `<id> <phase> <phi1> <Phi> <phi2>` with either delimiter
fn row(i: &str) -> IResult<&str, Grain> {
    let (i, id) = preceded(space0, unsigned)(i)?;
    let (i, phase) = preceded(separator, integer)(i)?;
    let (i, phi1) = preceded(separator, double)(i)?;
    let (i, phi) = preceded(separator, double)(i)?;
    let (i, phi2) = preceded(separator, double)(i)?;
    Ok((i, Grain::new(id as usize, phase, [phi1, phi, phi2])))
}

/// A comma with optional padding, or plain whitespace
fn separator(i: &str) -> IResult<&str, ()> {
    alt((
        map(delimited(space0, char(','), space0), |_| ()),
        map(space1, |_| ()),
    ))(i)
}
