//! Path-based lookup of numeric arrays in hierarchical data stores
#![doc = include_str!("../readme.md")]

// Split into subfiles for development, but anything important is re-exported
mod array;
mod error;
mod json;
mod memory;
mod resolve;

#[cfg(feature = "hdf5")]
mod hdf5_store;

// inline important the store-related modules for a nice public API
#[doc(inline)]
pub use array::{Array, ArrayData};

#[doc(inline)]
pub use resolve::{normalise_path, open_store, split_path, Node, Resolve};

#[doc(inline)]
pub use json::JsonStore;

#[doc(inline)]
pub use memory::MemoryStore;

#[cfg(feature = "hdf5")]
#[doc(inline)]
pub use hdf5_store::Hdf5Store;

#[doc(inline)]
pub use error::{Error, Result};
