//! Bounded bit accumulator.
//!
//! `BitWriter` is the data half of a cell under construction. Every write
//! checks capacity and range up front, so a failed write leaves the buffer
//! exactly as it was.

use crate::{Address, CellError, CellResult, MAX_CELL_BITS};

/// Bits taken by a standard internal address: `10`, anycast bit, int8, bits256.
pub(crate) const STD_ADDRESS_BITS: usize = 2 + 1 + 8 + 256;

/// Largest byte length a coins amount can declare in its 4-bit prefix.
const MAX_COINS_BYTES: usize = 15;

/// Append-only bit buffer holding at most 1023 bits.
///
/// # Example
///
/// ```
/// use sbt_cell::BitWriter;
///
/// let mut writer = BitWriter::new();
/// writer.write_uint(0b101, 3).unwrap();
/// writer.write_coins(0).unwrap();
/// assert_eq!(writer.bit_len(), 7);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitWriter {
    data: Vec<u8>,
    bit_len: usize,
}

impl BitWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        BitWriter {
            data: Vec::with_capacity(128),
            bit_len: 0,
        }
    }

    /// Number of bits written so far.
    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    /// Number of bits that can still be written.
    pub fn bits_left(&self) -> usize {
        MAX_CELL_BITS - self.bit_len
    }

    /// Written bytes. Bits past `bit_len` in the last byte are zero.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Consume the writer, returning the bytes and the bit length.
    pub fn into_parts(self) -> (Vec<u8>, usize) {
        (self.data, self.bit_len)
    }

    fn ensure_capacity(&self, bits: usize) -> CellResult<()> {
        if bits > self.bits_left() {
            return Err(CellError::CapacityExceeded {
                needed: bits,
                available: self.bits_left(),
            });
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        let byte_index = self.bit_len / 8;
        if byte_index >= self.data.len() {
            self.data.push(0);
        }
        if bit {
            self.data[byte_index] |= 1 << (7 - self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    /// Write `bits` low bits of `value`, most significant first.
    /// Positions at or above 128 repeat `fill`.
    fn push_uint(&mut self, value: u128, bits: usize, fill: bool) {
        for i in (0..bits).rev() {
            let bit = if i >= 128 {
                fill
            } else {
                (value >> i) & 1 == 1
            };
            self.push_bit(bit);
        }
    }

    /// Write a single bit.
    pub fn write_bit(&mut self, bit: bool) -> CellResult<&mut Self> {
        self.ensure_capacity(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    /// Write an unsigned integer of the given width, big-endian.
    ///
    /// Fails with `ValueOutOfRange` when `value >= 2^bits`.
    pub fn write_uint(&mut self, value: u128, bits: usize) -> CellResult<&mut Self> {
        self.ensure_capacity(bits)?;
        if bits < 128 && value >> bits != 0 {
            return Err(CellError::ValueOutOfRange {
                value: value.to_string(),
                bits,
            });
        }
        self.push_uint(value, bits, false);
        Ok(self)
    }

    /// Write a signed integer of the given width in two's complement.
    ///
    /// The accepted range is `[-2^(bits-1), 2^(bits-1))`.
    pub fn write_int(&mut self, value: i128, bits: usize) -> CellResult<&mut Self> {
        self.ensure_capacity(bits)?;
        let fits = match bits {
            0 => value == 0,
            1..=127 => {
                let half = 1i128 << (bits - 1);
                (-half..half).contains(&value)
            }
            _ => true,
        };
        if !fits {
            return Err(CellError::ValueOutOfRange {
                value: value.to_string(),
                bits,
            });
        }
        self.push_uint(value as u128, bits, value < 0);
        Ok(self)
    }

    /// Write raw bytes. No length prefix is stored.
    pub fn write_bytes(&mut self, bytes: &[u8]) -> CellResult<&mut Self> {
        self.ensure_capacity(bytes.len() * 8)?;
        if self.bit_len.is_multiple_of(8) {
            self.data.extend_from_slice(bytes);
            self.bit_len += bytes.len() * 8;
        } else {
            for &byte in bytes {
                self.push_uint(byte as u128, 8, false);
            }
        }
        Ok(self)
    }

    /// Write a coins amount (VarUInteger 16).
    ///
    /// A 4-bit byte length followed by the big-endian magnitude. Zero is a
    /// single zero nibble.
    pub fn write_coins(&mut self, amount: u128) -> CellResult<&mut Self> {
        let byte_len = ((128 - amount.leading_zeros()) as usize).div_ceil(8);
        if byte_len > MAX_COINS_BYTES {
            return Err(CellError::ValueOutOfRange {
                value: amount.to_string(),
                bits: MAX_COINS_BYTES * 8,
            });
        }
        self.ensure_capacity(4 + byte_len * 8)?;
        self.push_uint(byte_len as u128, 4, false);
        self.push_uint(amount, byte_len * 8, false);
        Ok(self)
    }

    /// Write a message address.
    ///
    /// `None` is `addr_none$00`; a standard address is
    /// `addr_std$10 anycast:0 workchain_id:int8 address:bits256`.
    pub fn write_address(&mut self, address: Option<&Address>) -> CellResult<&mut Self> {
        match address {
            None => self.write_uint(0b00, 2),
            Some(address) => {
                self.ensure_capacity(STD_ADDRESS_BITS)?;
                self.push_uint(0b100, 3, false);
                self.push_uint(address.workchain as u8 as u128, 8, false);
                self.write_bytes(&address.hash)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_bits_msb_first() {
        let mut writer = BitWriter::new();
        writer.write_bit(true).unwrap();
        writer.write_bit(false).unwrap();
        writer.write_bit(true).unwrap();
        assert_eq!(writer.bit_len(), 3);
        assert_eq!(writer.data(), &[0b1010_0000]);
    }

    #[test]
    fn test_write_uint_out_of_range_writes_nothing() {
        let mut writer = BitWriter::new();
        writer.write_uint(0b11, 2).unwrap();
        let err = writer.write_uint(8, 3).unwrap_err();
        assert!(matches!(err, CellError::ValueOutOfRange { bits: 3, .. }));
        assert_eq!(writer.bit_len(), 2);
        assert_eq!(writer.data(), &[0b1100_0000]);
    }

    #[test]
    fn test_write_uint_zero_width() {
        let mut writer = BitWriter::new();
        writer.write_uint(0, 0).unwrap();
        assert!(writer.write_uint(1, 0).is_err());
        assert_eq!(writer.bit_len(), 0);
    }

    #[test]
    fn test_write_wide_uint_pads_with_zeros() {
        let mut writer = BitWriter::new();
        writer.write_uint(1, 256).unwrap();
        let mut expected = vec![0u8; 32];
        expected[31] = 1;
        assert_eq!(writer.data(), expected.as_slice());
    }

    #[test]
    fn test_write_int_twos_complement() {
        let mut writer = BitWriter::new();
        writer.write_int(-1, 8).unwrap();
        writer.write_int(-128, 8).unwrap();
        writer.write_int(127, 8).unwrap();
        assert_eq!(writer.data(), &[0xff, 0x80, 0x7f]);

        assert!(writer.write_int(128, 8).is_err());
        assert!(writer.write_int(-129, 8).is_err());
        assert_eq!(writer.bit_len(), 24);
    }

    #[test]
    fn test_write_int_sign_extends_past_128_bits() {
        let mut writer = BitWriter::new();
        writer.write_int(-2, 136).unwrap();
        let mut expected = vec![0xffu8; 17];
        expected[16] = 0xfe;
        assert_eq!(writer.data(), expected.as_slice());
    }

    #[test]
    fn test_capacity_exceeded_at_1024th_bit() {
        let mut writer = BitWriter::new();
        writer.write_bytes(&[0xaa; 127]).unwrap();
        writer.write_uint(0x7f, 7).unwrap();
        assert_eq!(writer.bits_left(), 0);

        let err = writer.write_bit(true).unwrap_err();
        assert_eq!(
            err,
            CellError::CapacityExceeded {
                needed: 1,
                available: 0
            }
        );
        assert_eq!(writer.bit_len(), MAX_CELL_BITS);
    }

    #[test]
    fn test_write_coins() {
        let mut writer = BitWriter::new();
        writer.write_coins(0).unwrap();
        assert_eq!(writer.bit_len(), 4);

        let mut writer = BitWriter::new();
        writer.write_coins(300_000_000_000).unwrap();
        // 5 byte magnitude
        assert_eq!(writer.bit_len(), 4 + 40);
        assert_eq!(writer.data(), &[0x54, 0x5d, 0x96, 0x4b, 0x80, 0x00]);
    }

    #[test]
    fn test_write_coins_limits() {
        let mut writer = BitWriter::new();
        writer.write_coins((1u128 << 120) - 1).unwrap();
        assert_eq!(writer.bit_len(), 124);

        let err = writer.write_coins(1u128 << 120).unwrap_err();
        assert!(matches!(err, CellError::ValueOutOfRange { bits: 120, .. }));
        assert_eq!(writer.bit_len(), 124);
    }

    #[test]
    fn test_write_coins_is_atomic_near_capacity() {
        let mut writer = BitWriter::new();
        writer.write_bytes(&[0; 126]).unwrap();
        // 15 bits left, 1_000_000 needs 4 + 24
        assert!(writer.write_coins(1_000_000).is_err());
        assert_eq!(writer.bit_len(), 1008);
    }

    #[test]
    fn test_write_address() {
        let address = Address::new(-1, [0xab; 32]);
        let mut writer = BitWriter::new();
        writer.write_address(Some(&address)).unwrap();
        assert_eq!(writer.bit_len(), STD_ADDRESS_BITS);
        // 100 then 0xff workchain
        assert_eq!(writer.data()[0], 0b1001_1111);

        let mut writer = BitWriter::new();
        writer.write_address(None).unwrap();
        assert_eq!(writer.bit_len(), 2);
        assert_eq!(writer.data(), &[0]);
    }
}
