//! CellSlice for reading data back out of cells.

use std::sync::Arc;

use crate::{Address, Cell, CellError, CellResult};

/// A read cursor over a Cell's bits and references.
///
/// # Example
///
/// ```
/// use sbt_cell::{CellBuilder, CellSlice};
///
/// let mut builder = CellBuilder::new();
/// builder.store_u32(0x12345678).unwrap();
/// let cell = builder.build().unwrap();
///
/// let mut slice = CellSlice::new(&cell);
/// assert_eq!(slice.load_u32().unwrap(), 0x12345678);
/// ```
#[derive(Debug, Clone)]
pub struct CellSlice<'a> {
    cell: &'a Cell,
    bit_offset: usize,
    ref_offset: usize,
}

impl<'a> CellSlice<'a> {
    /// Create a new slice from a cell.
    pub fn new(cell: &'a Cell) -> Self {
        CellSlice {
            cell,
            bit_offset: 0,
            ref_offset: 0,
        }
    }

    pub fn bits_left(&self) -> usize {
        self.cell.bit_len() - self.bit_offset
    }

    pub fn refs_left(&self) -> usize {
        self.cell.reference_count() - self.ref_offset
    }

    /// True when no bits and no references remain.
    pub fn is_empty(&self) -> bool {
        self.bits_left() == 0 && self.refs_left() == 0
    }

    fn ensure_bits(&self, need: usize) -> CellResult<()> {
        if need > self.bits_left() {
            return Err(CellError::NotEnoughBits {
                need,
                have: self.bits_left(),
            });
        }
        Ok(())
    }

    /// Load a single bit.
    pub fn load_bit(&mut self) -> CellResult<bool> {
        self.ensure_bits(1)?;
        let bit = self.cell.bit_at(self.bit_offset);
        self.bit_offset += 1;
        Ok(bit)
    }

    /// Skip bits.
    pub fn skip_bits(&mut self, bits: usize) -> CellResult<()> {
        self.ensure_bits(bits)?;
        self.bit_offset += bits;
        Ok(())
    }

    /// Load an unsigned integer of up to 128 bits.
    pub fn load_uint(&mut self, bits: usize) -> CellResult<u128> {
        if bits > 128 {
            return Err(CellError::ValueOutOfRange {
                value: format!("{bits}-bit integer"),
                bits: 128,
            });
        }
        self.ensure_bits(bits)?;
        let mut result = 0u128;
        for i in 0..bits {
            result = (result << 1) | self.cell.bit_at(self.bit_offset + i) as u128;
        }
        self.bit_offset += bits;
        Ok(result)
    }

    /// Load a signed integer of up to 128 bits (two's complement).
    pub fn load_int(&mut self, bits: usize) -> CellResult<i128> {
        let unsigned = self.load_uint(bits)?;
        if bits == 0 || bits == 128 {
            return Ok(unsigned as i128);
        }
        let sign_bit = 1u128 << (bits - 1);
        if unsigned & sign_bit != 0 {
            Ok((unsigned | !((1u128 << bits) - 1)) as i128)
        } else {
            Ok(unsigned as i128)
        }
    }

    pub fn load_u8(&mut self) -> CellResult<u8> {
        self.load_uint(8).map(|v| v as u8)
    }

    pub fn load_u32(&mut self) -> CellResult<u32> {
        self.load_uint(32).map(|v| v as u32)
    }

    pub fn load_u64(&mut self) -> CellResult<u64> {
        self.load_uint(64).map(|v| v as u64)
    }

    /// Load `count` whole bytes.
    pub fn load_bytes(&mut self, count: usize) -> CellResult<Vec<u8>> {
        self.ensure_bits(count * 8)?;
        let mut result = Vec::with_capacity(count);
        for _ in 0..count {
            result.push(self.load_u8()?);
        }
        Ok(result)
    }

    /// Load coins (VarUInteger 16).
    pub fn load_coins(&mut self) -> CellResult<u128> {
        let byte_len = self.load_uint(4)? as usize;
        self.load_uint(byte_len * 8)
    }

    /// Load a message address. `addr_none` yields `None`.
    pub fn load_address(&mut self) -> CellResult<Option<Address>> {
        match self.load_uint(2)? {
            0b00 => Ok(None),
            0b10 => {
                if self.load_bit()? {
                    return Err(CellError::InvalidAddress(
                        "anycast addresses are not supported".to_string(),
                    ));
                }
                let workchain = self.load_int(8)? as i8;
                let mut hash = [0u8; 32];
                hash.copy_from_slice(&self.load_bytes(32)?);
                Ok(Some(Address::new(workchain, hash)))
            }
            tag => Err(CellError::InvalidAddress(format!(
                "unsupported address tag {tag:02b}"
            ))),
        }
    }

    /// Load the next reference.
    pub fn load_ref(&mut self) -> CellResult<&'a Arc<Cell>> {
        let reference = self
            .cell
            .reference(self.ref_offset)
            .ok_or(CellError::NotEnoughRefs { need: 1, have: 0 })?;
        self.ref_offset += 1;
        Ok(reference)
    }

    /// Load `Maybe ^Cell`.
    pub fn load_maybe_ref(&mut self) -> CellResult<Option<&'a Arc<Cell>>> {
        if self.load_bit()? {
            self.load_ref().map(Some)
        } else {
            Ok(None)
        }
    }

    /// Load the rest of this slice as snake bytes, following the chain of
    /// first references to its end.
    pub fn load_snake_bytes(&mut self) -> CellResult<Vec<u8>> {
        let mut result = Vec::new();
        let mut current = self.clone();
        loop {
            if !current.bits_left().is_multiple_of(8) {
                return Err(CellError::InvalidString(format!(
                    "snake cell holds {} bits, not whole bytes",
                    current.bits_left()
                )));
            }
            result.extend(current.load_bytes(current.bits_left() / 8)?);
            if current.refs_left() == 0 {
                break;
            }
            current = CellSlice::new(current.load_ref()?);
        }
        self.bit_offset = self.cell.bit_len();
        if self.refs_left() > 0 {
            self.ref_offset += 1;
        }
        Ok(result)
    }

    /// Load the rest of this slice as a UTF-8 snake string.
    pub fn load_string_tail(&mut self) -> CellResult<String> {
        let bytes = self.load_snake_bytes()?;
        String::from_utf8(bytes).map_err(|e| CellError::InvalidString(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::CellBuilder;

    #[test]
    fn test_load_integers() {
        let mut builder = CellBuilder::new();
        builder.store_u8(0xff).unwrap();
        builder.store_u32(0x12345678).unwrap();
        builder.store_u64(0xDEADBEEFCAFEBABE).unwrap();
        builder.store_int(-42, 8).unwrap();
        builder.store_int(-15, 6).unwrap();
        builder.store_uint(1000, 12).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = CellSlice::new(&cell);
        assert_eq!(slice.load_u8().unwrap(), 0xff);
        assert_eq!(slice.load_u32().unwrap(), 0x12345678);
        assert_eq!(slice.load_u64().unwrap(), 0xDEADBEEFCAFEBABE);
        assert_eq!(slice.load_int(8).unwrap(), -42);
        assert_eq!(slice.load_int(6).unwrap(), -15);
        assert_eq!(slice.load_uint(12).unwrap(), 1000);
        assert!(slice.is_empty());
    }

    #[test]
    fn test_load_past_end() {
        let mut builder = CellBuilder::new();
        builder.store_uint(3, 2).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = CellSlice::new(&cell);
        assert_eq!(
            slice.load_u8().unwrap_err(),
            CellError::NotEnoughBits { need: 8, have: 2 }
        );
        assert!(matches!(
            slice.load_ref(),
            Err(CellError::NotEnoughRefs { .. })
        ));
        assert_eq!(slice.load_uint(2).unwrap(), 3);
    }

    #[test]
    fn test_load_coins() {
        for amount in [0u128, 1, 35_000_000, 300_000_000_000, (1 << 120) - 1] {
            let mut builder = CellBuilder::new();
            builder.store_coins(amount).unwrap();
            let cell = builder.build().unwrap();
            assert_eq!(CellSlice::new(&cell).load_coins().unwrap(), amount);
        }
    }

    #[test]
    fn test_load_address() {
        let address = Address::new(0, [0x42; 32]);
        let mut builder = CellBuilder::new();
        builder.store_address(Some(&address)).unwrap();
        builder.store_address(None).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = CellSlice::new(&cell);
        assert_eq!(slice.load_address().unwrap(), Some(address));
        assert_eq!(slice.load_address().unwrap(), None);
    }

    #[test]
    fn test_load_external_address_rejected() {
        let mut builder = CellBuilder::new();
        builder.store_uint(0b01, 2).unwrap();
        let cell = builder.build().unwrap();
        assert!(matches!(
            CellSlice::new(&cell).load_address(),
            Err(CellError::InvalidAddress(_))
        ));
    }

    #[test]
    fn test_load_maybe_ref() {
        let child = Arc::new(Cell::empty());
        let mut builder = CellBuilder::new();
        builder.store_maybe_ref(None).unwrap();
        builder.store_maybe_ref(Some(child.clone())).unwrap();
        let cell = builder.build().unwrap();

        let mut slice = CellSlice::new(&cell);
        assert!(slice.load_maybe_ref().unwrap().is_none());
        assert!(Arc::ptr_eq(slice.load_maybe_ref().unwrap().unwrap(), &child));
    }

    #[test]
    fn test_load_string_tail_rejects_invalid_utf8() {
        let mut builder = CellBuilder::new();
        builder.store_bytes(&[0xff, 0xfe]).unwrap();
        let cell = builder.build().unwrap();
        assert!(matches!(
            CellSlice::new(&cell).load_string_tail(),
            Err(CellError::InvalidString(_))
        ));
    }
}
