//! Configuration driven conversion of microstructures into MICRESS inputs
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod config;
mod driving;
mod error;
mod orchestrator;
mod report;

// inline important the conversion modules for a nice public API
#[doc(inline)]
pub use config::{
    read_config, ConversionConfig, DrivingConfig, GrainsConfig, GridConfig, OutputConfig,
};

#[doc(inline)]
pub use driving::{
    render_driving, write_driving, DrivingContext, TAG_CELLS, TAG_GRAIN_PROPERTIES,
    TAG_GRAIN_STRUCTURE, TAG_SPACING,
};

#[doc(inline)]
pub use orchestrator::run;

#[doc(inline)]
pub use report::{Artifact, ConversionReport, ErrorKind, Outcome};

#[doc(inline)]
pub use error::{Error, Result};
