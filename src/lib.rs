//! `mictools` is a modular toolkit for turning synthetic microstructures into
//! MICRESS inputs
//!
#![doc = include_str!("../readme.md")]
#![deny(missing_docs, missing_debug_implementations)]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]

// Re-exports of toolkit crates.
#[doc(inline)]
pub use mictools_format as format;

#[cfg(feature = "convert")]
#[cfg_attr(docsrs, doc(cfg(feature = "convert")))]
#[doc(inline)]
pub use mictools_convert as convert;

#[cfg(feature = "grains")]
#[cfg_attr(docsrs, doc(cfg(feature = "grains")))]
#[doc(inline)]
pub use mictools_grains as grains;

#[cfg(feature = "store")]
#[cfg_attr(docsrs, doc(cfg(feature = "store")))]
#[doc(inline)]
pub use mictools_store as store;

#[cfg(feature = "voxels")]
#[cfg_attr(docsrs, doc(cfg(feature = "voxels")))]
#[doc(inline)]
pub use mictools_voxels as voxels;
