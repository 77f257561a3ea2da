//! Cells: the bit-packed tree records used for storage and message bodies.
//!
//! A cell carries up to 1023 data bits and up to 4 references to child cells.
//! Fields are positional: nothing in the encoding names or tags them, so the
//! reader must know the layout it expects.
//!
//! The identity of a cell is its representation hash (see [`Cell::hash`]).
//! That hash is what gets signed, and what contract addresses derive from, so
//! the representation below is FROZEN.

use std::fmt;
use std::sync::Arc;

use crate::crypto::CellHash;
use crate::slice::CellSlice;

/// Maximum number of data bits in a single cell.
pub const MAX_CELL_BITS: usize = 1023;

/// Maximum number of child references in a single cell.
pub const MAX_CELL_REFS: usize = 4;

/// Maximum depth of a cell tree, counted in references from the root.
pub const MAX_CELL_DEPTH: u16 = 1024;

/// An immutable ordinary cell.
///
/// Construct cells with [`CellBuilder`](crate::builder::CellBuilder), read
/// them back with [`Cell::parse`].
#[derive(Clone, PartialEq, Eq)]
pub struct Cell {
    /// Packed data, MSB first. Bits past `bit_len` are always zero.
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
    /// Fixed at construction; children are immutable.
    depth: u16,
    hash: CellHash,
}

impl Cell {
    /// Assemble a cell from parts. Callers guarantee the capacity and depth
    /// limits.
    ///
    /// Depth and hash are computed here, once, from the children's cached
    /// values, so hashing a tree costs one digest per cell.
    pub(crate) fn from_parts(data: Vec<u8>, bit_len: usize, refs: Vec<Arc<Cell>>) -> Self {
        debug_assert!(bit_len <= MAX_CELL_BITS);
        debug_assert!(refs.len() <= MAX_CELL_REFS);
        debug_assert_eq!(data.len(), bit_len.div_ceil(8));

        let depth = refs.iter().map(|r| r.depth + 1).max().unwrap_or(0);
        debug_assert!(depth <= MAX_CELL_DEPTH);

        let mut cell = Self {
            data,
            bit_len,
            refs,
            depth,
            hash: CellHash([0; 32]),
        };
        cell.hash = CellHash::digest(&cell.representation());
        cell
    }

    /// The empty cell: no bits, no references.
    pub fn empty() -> Self {
        Self::from_parts(Vec::new(), 0, Vec::new())
    }

    /// Number of data bits.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Packed data bytes. A partial final byte is zero-filled.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Child references, in store order.
    pub fn references(&self) -> &[Arc<Cell>] {
        &self.refs
    }

    /// Whether the cell has neither bits nor references.
    pub fn is_empty(&self) -> bool {
        self.bit_len == 0 && self.refs.is_empty()
    }

    /// Read a single bit. `index` must be below `bit_len`.
    pub(crate) fn bit(&self, index: usize) -> bool {
        (self.data[index / 8] >> (7 - index % 8)) & 1 == 1
    }

    /// Start a positional read of this cell.
    pub fn parse(&self) -> CellSlice<'_> {
        CellSlice::new(self)
    }

    /// Depth of the tree rooted at this cell: 0 for a leaf.
    pub fn depth(&self) -> u16 {
        self.depth
    }

    /// Representation hash of the cell.
    ///
    /// SHA-256 over `d1 || d2 || padded data || child depths || child hashes`.
    pub fn hash(&self) -> CellHash {
        self.hash
    }

    /// Data bytes with the completion tag: when the bit length is not a
    /// multiple of 8, a single `1` bit follows the data, then zeros.
    fn padded_data(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.bit_len % 8 != 0 {
            out[self.bit_len / 8] |= 0x80 >> (self.bit_len % 8);
        }
        out
    }

    /// Descriptor bytes followed by the payload that is hashed.
    fn representation(&self) -> Vec<u8> {
        let mut repr = Vec::with_capacity(2 + self.data.len() + self.refs.len() * 34);

        // d1: reference count; ordinary cell at level 0.
        repr.push(self.refs.len() as u8);
        // d2: floor(bits / 8) + ceil(bits / 8).
        repr.push((self.bit_len / 8 + self.bit_len.div_ceil(8)) as u8);

        repr.extend_from_slice(&self.padded_data());

        for child in &self.refs {
            repr.extend_from_slice(&child.depth.to_be_bytes());
        }
        for child in &self.refs {
            repr.extend_from_slice(child.hash.as_bytes());
        }

        repr
    }

    /// Fift-style rendering of the data bits, e.g. `x{C_}`.
    fn fift_hex(&self) -> String {
        let mut hex = hex::encode_upper(self.padded_data());
        match self.bit_len % 8 {
            0 => {}
            4 => {
                // Whole nibble of data; the low nibble holds only the tag.
                hex.pop();
            }
            1..=3 => {
                hex.pop();
                hex.push('_');
            }
            _ => hex.push('_'),
        }
        format!("x{{{hex}}}")
    }
}

impl Default for Cell {
    fn default() -> Self {
        Self::empty()
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Cell({} bits, {} refs, {})", self.bit_len, self.refs.len(), self.fift_hex())
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_tree(cell: &Cell, indent: usize, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            writeln!(f, "{:indent$}{}", "", cell.fift_hex(), indent = indent)?;
            for child in &cell.refs {
                write_tree(child, indent + 1, f)?;
            }
            Ok(())
        }
        write_tree(self, 0, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::CellBuilder;

    #[test]
    fn test_empty_cell_hash() {
        // Well-known hash of the empty ordinary cell.
        assert_eq!(
            Cell::empty().hash().to_hex(),
            "96a296d224f285c67bee93c30f8a309157f0daa35dc5b87e410b78630a09cfc7"
        );
    }

    #[test]
    fn test_padded_data_completion_tag() {
        let mut b = CellBuilder::new();
        b.store_uint(0b1, 1).unwrap();
        let cell = b.build();
        assert_eq!(cell.padded_data(), vec![0b1100_0000]);

        let mut b = CellBuilder::new();
        b.store_uint(0xAB, 8).unwrap();
        let cell = b.build();
        assert_eq!(cell.padded_data(), vec![0xAB]);
    }

    #[test]
    fn test_depth() {
        let leaf = CellBuilder::new().build();
        let mut mid = CellBuilder::new();
        mid.store_ref(leaf.clone()).unwrap();
        let mid = mid.build();
        let mut root = CellBuilder::new();
        root.store_ref(mid).unwrap().store_ref(leaf).unwrap();
        let root = root.build();

        assert_eq!(root.depth(), 2);
    }

    #[test]
    fn test_shared_subtrees_hash_once_per_level() {
        // Each level references the previous one four times: 4^40 paths, 41 cells.
        let mut cell = Arc::new(Cell::empty());
        for _ in 0..40 {
            let mut b = CellBuilder::new();
            for _ in 0..MAX_CELL_REFS {
                b.store_ref(Arc::clone(&cell)).unwrap();
            }
            cell = Arc::new(b.build());
        }

        assert_eq!(cell.depth(), 40);
        assert_eq!(cell.hash(), CellHash::digest(&cell.representation()));
        assert_ne!(cell.hash(), cell.references()[0].hash());
    }

    #[test]
    fn test_hash_deterministic_and_content_sensitive() {
        let build = |v: u128| {
            let mut b = CellBuilder::new();
            b.store_uint(v, 8).unwrap();
            b.build()
        };
        assert_eq!(build(1).hash(), build(1).hash());
        assert_ne!(build(1).hash(), build(2).hash());
    }

    #[test]
    fn test_hash_depends_on_children() {
        let child_a = {
            let mut b = CellBuilder::new();
            b.store_uint(1, 8).unwrap();
            b.build()
        };
        let child_b = {
            let mut b = CellBuilder::new();
            b.store_uint(2, 8).unwrap();
            b.build()
        };
        let mut ra = CellBuilder::new();
        ra.store_ref(child_a).unwrap();
        let mut rb = CellBuilder::new();
        rb.store_ref(child_b).unwrap();

        assert_ne!(ra.build().hash(), rb.build().hash());
    }

    #[test]
    fn test_debug_fift_hex() {
        let mut b = CellBuilder::new();
        b.store_uint(0b1, 1).unwrap();
        assert_eq!(format!("{:?}", b.build()), "Cell(1 bits, 0 refs, x{C_})");

        let mut b = CellBuilder::new();
        b.store_uint(0x01, 8).unwrap();
        assert_eq!(format!("{:?}", b.build()), "Cell(8 bits, 0 refs, x{01})");
    }
}
