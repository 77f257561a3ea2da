//! Positional cell writer.
//!
//! Every `store_*` call appends bits MSB first and returns `&mut Self` so
//! writes chain with `?`:
//!
//! ```rust
//! use escrow_core::CellBuilder;
//!
//! let mut b = CellBuilder::new();
//! b.store_uint(1, 8)?.store_bit(true)?;
//! let cell = b.build();
//! assert_eq!(cell.bit_len(), 9);
//! # Ok::<(), escrow_core::CellError>(())
//! ```

use std::sync::Arc;

use crate::address::Address;
use crate::cell::{Cell, MAX_CELL_BITS, MAX_CELL_DEPTH, MAX_CELL_REFS};
use crate::error::CellError;

/// Tag bits of `addr_none$00`.
pub(crate) const ADDR_NONE_TAG: u8 = 0b00;
/// Tag bits of `addr_std$10`.
pub(crate) const ADDR_STD_TAG: u8 = 0b10;

/// Largest byte length a `VarUInteger 16` coin amount can declare.
pub(crate) const MAX_COINS_BYTES: usize = 15;

/// Builder for a single cell.
#[derive(Debug, Clone, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<Arc<Cell>>,
}

impl CellBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Bits written so far.
    pub fn bits_used(&self) -> usize {
        self.bit_len
    }

    /// Bits that can still be written.
    pub fn bits_left(&self) -> usize {
        MAX_CELL_BITS - self.bit_len
    }

    /// References that can still be stored.
    pub fn refs_left(&self) -> usize {
        MAX_CELL_REFS - self.refs.len()
    }

    fn ensure_bits(&self, requested: usize) -> Result<(), CellError> {
        if requested > self.bits_left() {
            return Err(CellError::BitOverflow {
                requested,
                available: self.bits_left(),
            });
        }
        Ok(())
    }

    /// Append one bit. Capacity is checked by the caller.
    fn push_bit(&mut self, bit: bool) {
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            let last = self.data.len() - 1;
            self.data[last] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    /// Append the low `bits` bits of `value`, MSB first. Capacity is checked
    /// by the caller.
    fn push_uint(&mut self, value: u128, bits: usize) {
        for i in (0..bits).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
    }

    /// Store a single bit.
    pub fn store_bit(&mut self, bit: bool) -> Result<&mut Self, CellError> {
        self.ensure_bits(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    /// Store `value` as a `bits`-wide unsigned integer.
    ///
    /// Fails if `value` needs more than `bits` bits.
    pub fn store_uint(&mut self, value: u128, bits: usize) -> Result<&mut Self, CellError> {
        if bits > 128 {
            return Err(CellError::UnsupportedWidth(bits));
        }
        if bits < 128 && value >> bits != 0 {
            return Err(CellError::ValueOutOfRange {
                value: value.to_string(),
                bits,
            });
        }
        self.ensure_bits(bits)?;
        self.push_uint(value, bits);
        Ok(self)
    }

    /// Store `value` as a `bits`-wide two's complement integer.
    pub fn store_int(&mut self, value: i128, bits: usize) -> Result<&mut Self, CellError> {
        if bits == 0 || bits > 128 {
            return Err(CellError::UnsupportedWidth(bits));
        }
        if bits < 128 {
            let bound = 1i128 << (bits - 1);
            if value < -bound || value >= bound {
                return Err(CellError::ValueOutOfRange {
                    value: value.to_string(),
                    bits,
                });
            }
        }
        self.ensure_bits(bits)?;
        self.push_uint(value as u128, bits);
        Ok(self)
    }

    /// Store raw bytes.
    pub fn store_buffer(&mut self, bytes: &[u8]) -> Result<&mut Self, CellError> {
        self.ensure_bits(bytes.len() * 8)?;
        if self.bit_len % 8 == 0 {
            self.data.extend_from_slice(bytes);
            self.bit_len += bytes.len() * 8;
        } else {
            for &byte in bytes {
                self.push_uint(byte as u128, 8);
            }
        }
        Ok(self)
    }

    /// Store a coin amount as `VarUInteger 16`: a 4-bit byte length, then
    /// the value in that many bytes.
    pub fn store_coins(&mut self, amount: u128) -> Result<&mut Self, CellError> {
        let byte_len = (128 - amount.leading_zeros() as usize).div_ceil(8);
        if byte_len > MAX_COINS_BYTES {
            return Err(CellError::ValueOutOfRange {
                value: amount.to_string(),
                bits: MAX_COINS_BYTES * 8,
            });
        }
        self.ensure_bits(4 + byte_len * 8)?;
        self.push_uint(byte_len as u128, 4);
        self.push_uint(amount, byte_len * 8);
        Ok(self)
    }

    /// Store `addr_std$10 anycast:nothing workchain_id:int8 address:bits256`.
    pub fn store_address(&mut self, address: &Address) -> Result<&mut Self, CellError> {
        self.ensure_bits(Address::BIT_LEN)?;
        self.push_uint(ADDR_STD_TAG as u128, 2);
        // No anycast.
        self.push_bit(false);
        self.push_uint(address.workchain as u8 as u128, 8);
        self.store_buffer(&address.hash)
    }

    /// Store `addr_none$00`.
    pub fn store_address_none(&mut self) -> Result<&mut Self, CellError> {
        self.ensure_bits(2)?;
        self.push_uint(ADDR_NONE_TAG as u128, 2);
        Ok(self)
    }

    /// Store a child reference.
    pub fn store_ref(&mut self, cell: impl Into<Arc<Cell>>) -> Result<&mut Self, CellError> {
        if self.refs.len() >= MAX_CELL_REFS {
            return Err(CellError::RefOverflow { max: MAX_CELL_REFS });
        }
        let cell = cell.into();
        let depth = u32::from(cell.depth()) + 1;
        if depth > u32::from(MAX_CELL_DEPTH) {
            return Err(CellError::DepthOverflow {
                depth,
                max: MAX_CELL_DEPTH,
            });
        }
        self.refs.push(cell);
        Ok(self)
    }

    /// Finish the cell.
    pub fn build(self) -> Cell {
        Cell::from_parts(self.data, self.bit_len, self.refs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_uint_msb_first() {
        let mut b = CellBuilder::new();
        b.store_uint(0b101, 3).unwrap().store_uint(0x1F, 5).unwrap();
        let cell = b.build();
        assert_eq!(cell.bit_len(), 8);
        assert_eq!(cell.data(), &[0b1011_1111]);
    }

    #[test]
    fn test_store_uint_rejects_wide_value() {
        let mut b = CellBuilder::new();
        let err = b.store_uint(256, 8).unwrap_err();
        assert!(matches!(err, CellError::ValueOutOfRange { bits: 8, .. }));
        // Nothing was written.
        assert_eq!(b.bits_used(), 0);
    }

    #[test]
    fn test_store_int_twos_complement() {
        let mut b = CellBuilder::new();
        b.store_int(-1, 8).unwrap();
        assert_eq!(b.build().data(), &[0xFF]);

        let mut b = CellBuilder::new();
        assert!(b.store_int(128, 8).is_err());
        assert!(b.store_int(-129, 8).is_err());
        assert!(b.store_int(-128, 8).is_ok());
    }

    #[test]
    fn test_unaligned_buffer() {
        let mut b = CellBuilder::new();
        b.store_bit(true).unwrap().store_buffer(&[0xFF, 0x00]).unwrap();
        let cell = b.build();
        assert_eq!(cell.bit_len(), 17);
        assert_eq!(cell.data(), &[0xFF, 0x80, 0x00]);
    }

    #[test]
    fn test_bit_overflow() {
        let mut b = CellBuilder::new();
        b.store_buffer(&[0u8; 127]).unwrap();
        assert_eq!(b.bits_left(), 7);
        let err = b.store_uint(0, 8).unwrap_err();
        assert_eq!(
            err,
            CellError::BitOverflow {
                requested: 8,
                available: 7
            }
        );
        b.store_uint(0, 7).unwrap();
        assert_eq!(b.bits_left(), 0);
    }

    #[test]
    fn test_ref_overflow() {
        let mut b = CellBuilder::new();
        for _ in 0..MAX_CELL_REFS {
            b.store_ref(Cell::empty()).unwrap();
        }
        assert_eq!(
            b.store_ref(Cell::empty()).unwrap_err(),
            CellError::RefOverflow { max: 4 }
        );
    }

    #[test]
    fn test_depth_limit() {
        let mut cell = Cell::empty();
        for _ in 0..MAX_CELL_DEPTH {
            let mut b = CellBuilder::new();
            b.store_ref(cell).unwrap();
            cell = b.build();
        }
        assert_eq!(cell.depth(), MAX_CELL_DEPTH);

        let mut b = CellBuilder::new();
        assert_eq!(
            b.store_ref(cell).unwrap_err(),
            CellError::DepthOverflow {
                depth: 1025,
                max: 1024
            }
        );
        assert_eq!(b.refs_left(), MAX_CELL_REFS);
    }

    #[test]
    fn test_store_coins() {
        let mut b = CellBuilder::new();
        b.store_coins(0).unwrap();
        assert_eq!(b.bits_used(), 4);

        let mut b = CellBuilder::new();
        b.store_coins(1_000_000_000).unwrap();
        // 0x3B9ACA00 needs 4 bytes.
        assert_eq!(b.bits_used(), 4 + 32);

        let mut b = CellBuilder::new();
        assert!(b.store_coins(u128::MAX).is_err());
    }

    #[test]
    fn test_store_address_width() {
        let mut b = CellBuilder::new();
        b.store_address(&Address::new(0, [0xAA; 32])).unwrap();
        assert_eq!(b.bits_used(), Address::BIT_LEN);

        let mut b = CellBuilder::new();
        b.store_address_none().unwrap();
        assert_eq!(b.bits_used(), 2);
    }
}
