//! Editing and writing Wii U BFFNT font containers
//!
//! This crate provides owned versions of each section of a container,
//! along with a [`Document`] that ties them together. A document can be
//! decoded from bytes, edited, validated and encoded again; offsets between
//! sections are recomputed on every encode.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use write_bffnt::Document;
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let mut doc = Document::decode(&font_bytes).expect("failed to read font data");
//! doc.scale(1.5).expect("metrics out of range");
//! let bytes = doc.encode().expect("failed to encode");
//! # let _ = bytes;
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![forbid(unsafe_code)]
#![deny(rustdoc::broken_intra_doc_links)]

mod document;
pub mod error;
pub mod from_obj;
mod round;
pub mod tables;
pub mod validate;
mod write;

pub use document::Document;
pub use error::{Error, RangeError};
pub use tables::tglp::SheetLayout;
pub use validate::{Validate, ValidationReport};
pub use write::{encode_chain, ChainBlock, FontWrite, TableWriter};

/// Public re-export of the read-bffnt crate.
pub extern crate read_bffnt as read;

/// Public re-export of the bffnt-types crate.
pub extern crate bffnt_types as types;
