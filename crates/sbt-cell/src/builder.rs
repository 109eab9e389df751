//! CellBuilder for constructing cells.
//!
//! The builder stores bits, integers, coins, addresses and references, then
//! `build()` consumes it and produces the immutable Cell. Because `build`
//! takes the builder by value, a finalized builder cannot be written to or
//! finalized again:
//!
//! ```compile_fail
//! use sbt_cell::CellBuilder;
//!
//! let mut builder = CellBuilder::new();
//! builder.store_u8(1).unwrap();
//! let _cell = builder.build().unwrap();
//! builder.store_u8(2).unwrap();
//! ```

use std::sync::Arc;

use crate::{
    Address, BitWriter, Cell, CellError, CellResult, CellType, MAX_CELL_BITS, MAX_CELL_DEPTH,
    MAX_CELL_REFS,
};

/// Whole bytes a fresh cell holds.
const SNAKE_CELL_BYTES: usize = MAX_CELL_BITS / 8;

/// Builder for constructing cells.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use sbt_cell::CellBuilder;
///
/// let mut child = CellBuilder::new();
/// child.store_u8(0xab).unwrap();
/// let child = Arc::new(child.build().unwrap());
///
/// let mut builder = CellBuilder::new();
/// builder.store_u32(0x12345678).unwrap();
/// builder.store_coins(1_000_000_000).unwrap();
/// builder.store_ref(child).unwrap();
/// let cell = builder.build().unwrap();
/// assert_eq!(cell.reference_count(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct CellBuilder {
    bits: BitWriter,
    references: Vec<Arc<Cell>>,
}

impl CellBuilder {
    /// Create a new empty CellBuilder.
    pub fn new() -> Self {
        CellBuilder {
            bits: BitWriter::new(),
            references: Vec::new(),
        }
    }

    /// Store a single bit.
    pub fn store_bit(&mut self, bit: bool) -> CellResult<&mut Self> {
        self.bits.write_bit(bit)?;
        Ok(self)
    }

    /// Store an unsigned 8-bit integer.
    pub fn store_u8(&mut self, value: u8) -> CellResult<&mut Self> {
        self.store_uint(value as u128, 8)
    }

    /// Store an unsigned 32-bit integer (big-endian).
    pub fn store_u32(&mut self, value: u32) -> CellResult<&mut Self> {
        self.store_uint(value as u128, 32)
    }

    /// Store an unsigned 64-bit integer (big-endian).
    pub fn store_u64(&mut self, value: u64) -> CellResult<&mut Self> {
        self.store_uint(value as u128, 64)
    }

    /// Store an unsigned integer with a specific bit width.
    pub fn store_uint(&mut self, value: u128, bits: usize) -> CellResult<&mut Self> {
        self.bits.write_uint(value, bits)?;
        Ok(self)
    }

    /// Store a signed integer with a specific bit width (two's complement).
    pub fn store_int(&mut self, value: i128, bits: usize) -> CellResult<&mut Self> {
        self.bits.write_int(value, bits)?;
        Ok(self)
    }

    /// Store a byte array.
    pub fn store_bytes(&mut self, bytes: &[u8]) -> CellResult<&mut Self> {
        self.bits.write_bytes(bytes)?;
        Ok(self)
    }

    /// Store coins (VarUInteger 16).
    pub fn store_coins(&mut self, nanotons: u128) -> CellResult<&mut Self> {
        self.bits.write_coins(nanotons)?;
        Ok(self)
    }

    /// Store a message address, `None` being `addr_none`.
    pub fn store_address(&mut self, address: Option<&Address>) -> CellResult<&mut Self> {
        self.bits.write_address(address)?;
        Ok(self)
    }

    /// Store a reference to another cell.
    pub fn store_ref(&mut self, cell: Arc<Cell>) -> CellResult<&mut Self> {
        if self.references.len() >= MAX_CELL_REFS {
            return Err(CellError::TooManyReferences(self.references.len() + 1));
        }
        self.references.push(cell);
        Ok(self)
    }

    /// Store `Maybe ^Cell`: a 0 bit when absent, a 1 bit and the reference
    /// when present.
    pub fn store_maybe_ref(&mut self, cell: Option<Arc<Cell>>) -> CellResult<&mut Self> {
        match cell {
            None => self.store_bit(false),
            Some(cell) => {
                if self.references.len() >= MAX_CELL_REFS {
                    return Err(CellError::TooManyReferences(self.references.len() + 1));
                }
                self.store_bit(true)?;
                self.store_ref(cell)
            }
        }
    }

    /// Store bytes as a snake: as many whole bytes as fit here, the rest in
    /// a chain of cells hanging off this cell's next reference.
    ///
    /// Nothing is stored when the chain would be deeper than a cell tree may
    /// be.
    pub fn store_snake_bytes(&mut self, bytes: &[u8]) -> CellResult<&mut Self> {
        let fits = self.bits_left() / 8;
        if bytes.len() <= fits {
            return self.store_bytes(bytes);
        }
        if self.refs_left() == 0 {
            return Err(CellError::TooManyReferences(self.references.len() + 1));
        }

        let (head, tail) = bytes.split_at(fits);
        let chain_len = tail.len().div_ceil(SNAKE_CELL_BYTES);
        if chain_len > MAX_CELL_DEPTH {
            return Err(CellError::DepthExceeded(chain_len));
        }

        // Built from the last cell back so each link already has its tail.
        let mut next: Option<Arc<Cell>> = None;
        for chunk in tail.chunks(SNAKE_CELL_BYTES).rev() {
            let mut link = CellBuilder::new();
            link.store_bytes(chunk)?;
            if let Some(tail_cell) = next.take() {
                link.store_ref(tail_cell)?;
            }
            next = Some(Arc::new(link.build()?));
        }

        self.store_bytes(head)?;
        match next {
            Some(cell) => self.store_ref(cell),
            None => Ok(self),
        }
    }

    /// Store a UTF-8 string as a snake, without any prefix.
    pub fn store_string_tail(&mut self, value: &str) -> CellResult<&mut Self> {
        self.store_snake_bytes(value.as_bytes())
    }

    /// Get the number of bits that can still be stored.
    pub fn bits_left(&self) -> usize {
        self.bits.bits_left()
    }

    /// Get the number of references that can still be added.
    pub fn refs_left(&self) -> usize {
        MAX_CELL_REFS - self.references.len()
    }

    /// Get the current number of bits stored.
    pub fn bit_len(&self) -> usize {
        self.bits.bit_len()
    }

    /// Get the current number of references.
    pub fn ref_count(&self) -> usize {
        self.references.len()
    }

    /// Build the cell.
    ///
    /// This consumes the builder and returns the constructed Cell.
    pub fn build(self) -> CellResult<Cell> {
        let (data, bit_len) = self.bits.into_parts();
        Cell::new(data, bit_len, self.references, CellType::Ordinary)
    }
}
