//! Singly linked section chains
//!
//! Width and character map blocks are stored as chains: the head is
//! referenced from `FINF`, and each block records the offset of the next,
//! with zero marking the end.

use std::marker::PhantomData;

use crate::{
    section::{read_section, section_position},
    FontData, ReadError, Section,
};

/// A section that is a member of a chain.
pub trait ChainLink {
    /// The stored offset of the next block, or zero for the last block.
    fn next_offset(&self) -> u32;

    /// The absolute position of this block in the file.
    fn position(&self) -> usize;
}

/// An iterator over the blocks of a chain.
///
/// Each block must start after the one before it; a chain that points
/// backwards (or at itself) is reported as malformed, so iteration always
/// terminates. Iteration stops after the first error.
#[derive(Clone)]
pub struct Chain<'a, T> {
    file: FontData<'a>,
    next: Option<Result<usize, ReadError>>,
    phantom: PhantomData<T>,
}

impl<'a, T> Chain<'a, T> {
    /// Create a chain whose head is referenced by the stored `offset`.
    pub fn new(file: FontData<'a>, offset: u32) -> Self {
        Chain {
            file,
            next: Some(section_position(offset)),
            phantom: PhantomData,
        }
    }
}

impl<'a, T: Section<'a> + ChainLink> Iterator for Chain<'a, T> {
    type Item = Result<T, ReadError>;

    fn next(&mut self) -> Option<Self::Item> {
        let position = match self.next.take()? {
            Ok(position) => position,
            Err(e) => return Some(Err(e)),
        };
        let link = match read_section::<T>(self.file, position) {
            Ok(link) => link,
            Err(e) => return Some(Err(e)),
        };
        self.next = match link.next_offset() {
            0 => None,
            offset => Some(section_position(offset).and_then(|next| {
                if next > position {
                    Ok(next)
                } else {
                    Err(ReadError::MalformedData("chain offset does not point forward"))
                }
            })),
        };
        Some(Ok(link))
    }
}

impl<T> std::iter::FusedIterator for Chain<'_, T> where Self: Iterator {}
