//! Cells and Bag of Cells for building TON messages.
//!
//! This crate provides the binary data model that every on-chain message is
//! made of:
//!
//! - **BitWriter**: bounded bit accumulator
//! - **CellBuilder**: builder for creating cells
//! - **Cell**: immutable, content-addressed node
//! - **CellSlice**: reader for extracting data from cells
//! - **Address**: standard `(workchain, hash)` account address
//! - **BagOfCells**: canonical serialization format for cell graphs
//!
//! # Overview
//!
//! A cell contains:
//! - Up to 1023 bits of data
//! - Up to 4 references to other cells
//!
//! Cells are created bottom-up and shared through `Arc`, so a cell graph is
//! always a DAG. Two builders that store the same content produce cells with
//! the same hash.
//!
//! # Example
//!
//! ```
//! use sbt_cell::{BagOfCells, CellBuilder};
//!
//! let mut builder = CellBuilder::new();
//! builder.store_u32(0x12345678).unwrap();
//! builder.store_bytes(&[1, 2, 3, 4]).unwrap();
//! let cell = builder.build().unwrap();
//!
//! let hash = cell.hash();
//!
//! let bytes = BagOfCells::from_root(cell).serialize().unwrap();
//! let boc = BagOfCells::deserialize(&bytes).unwrap();
//! assert_eq!(boc.single_root().unwrap().hash(), hash);
//! ```

use sha2::{Digest, Sha256};
use thiserror::Error;

mod address;
mod bits;
mod boc;
mod builder;
mod cell;
mod level_mask;
mod slice;

pub use address::{Address, FriendlyAddress};
pub use bits::BitWriter;
pub use boc::BagOfCells;
pub use builder::CellBuilder;
pub use cell::{Cell, DEPTH_BYTES, HASH_BYTES};
pub use level_mask::LevelMask;
pub use slice::CellSlice;

/// Errors that can occur while building, reading or serializing cells.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CellError {
    /// A write would push the cell past 1023 bits.
    #[error("Cell capacity exceeded: need {needed} bits, {available} available")]
    CapacityExceeded { needed: usize, available: usize },

    /// The value does not fit in the requested width.
    #[error("Value {value} does not fit in {bits} bits")]
    ValueOutOfRange { value: String, bits: usize },

    /// The cell would have more than 4 references.
    #[error("Too many cell references: {0} (max 4)")]
    TooManyReferences(usize),

    /// The cell tree would be deeper than 1024 levels.
    #[error("Cell depth too large: {0} (max 1024)")]
    DepthExceeded(usize),

    /// Invalid Bag of Cells input.
    #[error("Malformed BoC: {0}")]
    MalformedBoc(String),

    /// Expected single root but found multiple or none.
    #[error("Expected single root, found {0}")]
    NotSingleRoot(usize),

    /// Not enough bits left in a slice.
    #[error("Not enough bits: need {need}, have {have}")]
    NotEnoughBits { need: usize, have: usize },

    /// Not enough references left in a slice.
    #[error("Not enough refs: need {need}, have {have}")]
    NotEnoughRefs { need: usize, have: usize },

    /// Invalid address text or address tag in a cell.
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Snake data is not valid UTF-8.
    #[error("Invalid string data: {0}")]
    InvalidString(String),

    /// Unknown exotic cell type.
    #[error("Invalid cell type: {0}")]
    InvalidCellType(u8),
}

/// Result type for cell operations.
pub type CellResult<T> = Result<T, CellError>;

/// Maximum number of bits in a cell's data.
pub const MAX_CELL_BITS: usize = 1023;

/// Maximum number of references a cell can have.
pub const MAX_CELL_REFS: usize = 4;

/// Maximum depth of a cell tree.
pub const MAX_CELL_DEPTH: usize = 1024;

/// BoC magic number for generic BoC.
pub const BOC_GENERIC_MAGIC: u32 = 0xb5ee9c72;

/// BoC magic number for indexed BoC.
pub const BOC_INDEXED_MAGIC: u32 = 0x68ff65f3;

/// BoC magic number for indexed CRC32 BoC.
pub const BOC_INDEXED_CRC32_MAGIC: u32 = 0xacc3a728;

/// Cell type indicator.
///
/// Only ordinary cells are ever built by this crate. Exotic cells are
/// accepted when decoding a BoC so that foreign payloads keep their hash.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum CellType {
    /// Ordinary data cell.
    Ordinary = 0,
    /// Pruned branch (for Merkle proofs).
    PrunedBranch = 1,
    /// Library reference.
    Library = 2,
    /// Merkle proof cell.
    MerkleProof = 3,
    /// Merkle update cell.
    MerkleUpdate = 4,
}

impl CellType {
    /// Check if this is an exotic (non-ordinary) cell type.
    pub fn is_exotic(&self) -> bool {
        *self != CellType::Ordinary
    }

    /// Convert the first data byte of an exotic cell to its type.
    pub fn from_exotic_tag(value: u8) -> CellResult<Self> {
        match value {
            1 => Ok(CellType::PrunedBranch),
            2 => Ok(CellType::Library),
            3 => Ok(CellType::MerkleProof),
            4 => Ok(CellType::MerkleUpdate),
            _ => Err(CellError::InvalidCellType(value)),
        }
    }
}

/// Compute SHA256 hash of the input data.
fn sha256(data: &[u8]) -> [u8; 32] {
    let mut output = [0u8; 32];
    output.copy_from_slice(&Sha256::digest(data));
    output
}

/// Compute CRC32-C checksum (Castagnoli polynomial).
fn crc32c(data: &[u8]) -> u32 {
    const CRC32C: crc::Crc<u32> = crc::Crc::<u32>::new(&crc::CRC_32_ISCSI);
    CRC32C.checksum(data)
}

/// Compute CRC16-XMODEM, the checksum of friendly addresses.
fn crc16(data: &[u8]) -> u16 {
    const CRC16: crc::Crc<u16> = crc::Crc::<u16>::new(&crc::CRC_16_XMODEM);
    CRC16.checksum(data)
}
