//! Per-artifact results of a conversion run

// standard library
use std::fmt;
use std::path::PathBuf;

// crate modules
use crate::error::Error;

// external crates
use serde::Serialize;

/// An output file (or set of files) a conversion can produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Artifact {
    /// Grain property table
    Txt,
    /// Structured points grain structure
    Vtk,
    /// MICRESS driving file
    Driving,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Self::Txt => "TXT",
            Self::Vtk => "VTK",
            Self::Driving => "driving file",
        };
        write!(f, "{name}")
    }
}

/// Category of a failed artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    /// A configured logical path is absent from the input
    PathNotFound,
    /// A resolved object is not the expected kind of array
    TypeMismatch,
    /// Array lengths disagree with each other or the grid
    ShapeMismatch,
    /// Grid dimensions are non-positive or inconsistent
    Dimensionality,
    /// A destination could not be written
    IoWrite,
    /// The configuration is missing something or contradicts itself
    Config,
    /// The driving file template could not be used
    Template,
    /// Any other input/output failure
    Io,
}

/// What happened to one requested artifact
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Every file written, in order
    Written(Vec<PathBuf>),
    /// Nothing usable was produced
    Failed { kind: ErrorKind, message: String },
}

impl Outcome {
    /// Failure outcome from an error, with the full message chain
    pub fn failed(error: &Error) -> Self {
        Self::Failed {
            kind: error.kind(),
            message: error.chain(),
        }
    }

    /// True for [Outcome::Written]
    pub fn is_written(&self) -> bool {
        matches!(self, Self::Written(_))
    }
}

/// Results of every artifact requested in one run
///
/// Entries are in the order the artifacts were attempted. Each artifact
/// succeeds or fails on its own, so a failed grain table never hides a good
/// voxel grid.
///
/// ```rust
/// # use mictools_convert::{Artifact, ConversionReport, Outcome};
/// let mut report = ConversionReport::new();
/// report.push(Artifact::Vtk, Outcome::Written(vec!["grains.vtk".into()]));
/// assert!(report.is_success());
/// assert_eq!(report.failures().count(), 0);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ConversionReport {
    entries: Vec<(Artifact, Outcome)>,
}

impl ConversionReport {
    /// An empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Record the outcome of an artifact
    pub fn push(&mut self, artifact: Artifact, outcome: Outcome) {
        self.entries.push((artifact, outcome));
    }

    /// Record the result of an artifact
    pub fn record(&mut self, artifact: Artifact, result: Result<Vec<PathBuf>, Error>) {
        let outcome = match result {
            Ok(paths) => Outcome::Written(paths),
            Err(e) => Outcome::failed(&e),
        };
        self.push(artifact, outcome);
    }

    /// All entries in the order attempted
    pub fn entries(&self) -> &[(Artifact, Outcome)] {
        &self.entries
    }

    /// Outcome of a single artifact, if it was requested
    pub fn outcome(&self, artifact: Artifact) -> Option<&Outcome> {
        self.entries
            .iter()
            .find(|(a, _)| *a == artifact)
            .map(|(_, outcome)| outcome)
    }

    /// Only the failed entries
    pub fn failures(&self) -> impl Iterator<Item = &(Artifact, Outcome)> {
        self.entries.iter().filter(|(_, o)| !o.is_written())
    }

    /// True if every requested artifact was written
    pub fn is_success(&self) -> bool {
        self.failures().next().is_none()
    }

    /// True if nothing was requested
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl fmt::Display for ConversionReport {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (artifact, outcome) in &self.entries {
            match outcome {
                Outcome::Written(paths) => {
                    let paths = paths
                        .iter()
                        .map(|p| p.display().to_string())
                        .collect::<Vec<String>>()
                        .join(", ");
                    writeln!(f, "{artifact}: written {paths}")?;
                }
                Outcome::Failed { kind, message } => {
                    writeln!(f, "{artifact}: failed ({kind:?}) {message}")?;
                }
            }
        }
        Ok(())
    }
}
