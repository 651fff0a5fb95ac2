//! Owned versions of each section.

pub mod cmap;
pub mod cwdh;
pub mod ffnt;
pub mod finf;
pub mod krng;
pub mod tglp;
