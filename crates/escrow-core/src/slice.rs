//! Positional cell reader.
//!
//! A [`CellSlice`] walks a cell's bits and references in store order. Each
//! `load_*` is bounds-checked; reading past the end yields
//! [`CellError::BitUnderflow`] or [`CellError::RefUnderflow`] instead of a
//! panic.

use crate::address::Address;
use crate::builder::{ADDR_NONE_TAG, ADDR_STD_TAG};
use crate::cell::Cell;
use crate::error::CellError;

/// A read cursor over one cell.
#[derive(Debug, Clone)]
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bit_pos: usize,
    ref_pos: usize,
}

impl<'a> CellSlice<'a> {
    pub(crate) fn new(cell: &'a Cell) -> Self {
        Self {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    /// Bits not yet read.
    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    /// References not yet loaded.
    pub fn remaining_refs(&self) -> usize {
        self.cell.references().len() - self.ref_pos
    }

    fn ensure_bits(&self, needed: usize) -> Result<(), CellError> {
        if needed > self.remaining_bits() {
            return Err(CellError::BitUnderflow {
                needed,
                remaining: self.remaining_bits(),
            });
        }
        Ok(())
    }

    /// Read `bits` bits as an unsigned integer. Bounds are checked by the caller.
    fn take_uint(&mut self, bits: usize) -> u128 {
        let mut value = 0u128;
        for _ in 0..bits {
            value = (value << 1) | self.cell.bit(self.bit_pos) as u128;
            self.bit_pos += 1;
        }
        value
    }

    pub fn load_bit(&mut self) -> Result<bool, CellError> {
        self.ensure_bits(1)?;
        let bit = self.cell.bit(self.bit_pos);
        self.bit_pos += 1;
        Ok(bit)
    }

    pub fn load_uint(&mut self, bits: usize) -> Result<u128, CellError> {
        if bits > 128 {
            return Err(CellError::UnsupportedWidth(bits));
        }
        self.ensure_bits(bits)?;
        Ok(self.take_uint(bits))
    }

    pub fn load_u8(&mut self) -> Result<u8, CellError> {
        Ok(self.load_uint(8)? as u8)
    }

    /// Read a `bits`-wide two's complement integer.
    pub fn load_int(&mut self, bits: usize) -> Result<i128, CellError> {
        if bits == 0 || bits > 128 {
            return Err(CellError::UnsupportedWidth(bits));
        }
        self.ensure_bits(bits)?;
        let raw = self.take_uint(bits);
        if bits < 128 && raw >> (bits - 1) & 1 == 1 {
            // Sign-extend.
            return Ok((raw | (u128::MAX << bits)) as i128);
        }
        Ok(raw as i128)
    }

    /// Read `len` raw bytes.
    pub fn load_buffer(&mut self, len: usize) -> Result<Vec<u8>, CellError> {
        self.ensure_bits(len * 8)?;
        Ok((0..len).map(|_| self.take_uint(8) as u8).collect())
    }

    /// Read exactly `N` raw bytes into an array.
    pub fn load_array<const N: usize>(&mut self) -> Result<[u8; N], CellError> {
        self.ensure_bits(N * 8)?;
        let mut out = [0u8; N];
        for byte in out.iter_mut() {
            *byte = self.take_uint(8) as u8;
        }
        Ok(out)
    }

    /// Read a `VarUInteger 16` coin amount.
    pub fn load_coins(&mut self) -> Result<u128, CellError> {
        let byte_len = self.load_uint(4)? as usize;
        self.load_uint(byte_len * 8)
    }

    /// Read a `MsgAddress` that may be `addr_none`.
    ///
    /// Only `addr_none$00` and `addr_std$10` without anycast are recognized;
    /// any other tag is malformed.
    pub fn load_maybe_address(&mut self) -> Result<Option<Address>, CellError> {
        let tag = self.load_uint(2)? as u8;
        match tag {
            ADDR_NONE_TAG => Ok(None),
            ADDR_STD_TAG => {
                if self.load_bit()? {
                    return Err(CellError::AnycastUnsupported);
                }
                let workchain = self.load_int(8)? as i8;
                let hash = self.load_array::<32>()?;
                Ok(Some(Address::new(workchain, hash)))
            }
            other => Err(CellError::UnsupportedAddressTag(other)),
        }
    }

    /// Read a standard address; `addr_none` is an error here.
    pub fn load_address(&mut self) -> Result<Address, CellError> {
        self.load_maybe_address()?.ok_or(CellError::MissingAddress)
    }

    /// Load the next child reference.
    pub fn load_ref(&mut self) -> Result<&'a Cell, CellError> {
        let cell: &'a Cell = self.cell;
        let child = cell
            .references()
            .get(self.ref_pos)
            .ok_or(CellError::RefUnderflow)?;
        self.ref_pos += 1;
        Ok(child.as_ref())
    }

    /// Assert the slice is fully consumed.
    pub fn end_parse(&self) -> Result<(), CellError> {
        if self.remaining_bits() != 0 || self.remaining_refs() != 0 {
            return Err(CellError::TrailingData {
                bits: self.remaining_bits(),
                refs: self.remaining_refs(),
            });
        }
        Ok(())
    }
}
