//! Cell implementation.
//!
//! A Cell holds up to 1023 bits of data and up to 4 references to other
//! cells. Its hash and depth are computed once, at construction, from the
//! data and the hashes and depths of its children.
//!
//! The hash kept here is the representation hash: the descriptor bytes carry
//! the full level mask and children contribute their own representation
//! hashes. For ordinary cells this is the only hash there is, and for exotic
//! cells it is the hash the chain uses to identify the cell.

use std::fmt;
use std::sync::Arc;

use crate::{
    CellError, CellResult, CellType, LevelMask, MAX_CELL_BITS, MAX_CELL_DEPTH, MAX_CELL_REFS,
    sha256,
};

/// Hash size in bytes (SHA256).
pub const HASH_BYTES: usize = 32;

/// Depth size in bytes.
pub const DEPTH_BYTES: usize = 2;

/// An immutable TON cell.
///
/// Cells are shared through `Arc<Cell>`. Two cells are equal when their
/// hashes are equal, whether or not they are the same allocation.
#[derive(Clone)]
pub struct Cell {
    data: Vec<u8>,
    bit_len: usize,
    references: Vec<Arc<Cell>>,
    cell_type: CellType,
    level_mask: LevelMask,
    depth: u16,
    hash: [u8; HASH_BYTES],
}

impl Cell {
    /// Create a cell after checking the per-cell limits.
    ///
    /// `data` must hold exactly `ceil(bit_len / 8)` bytes with the unused
    /// trailing bits cleared.
    pub(crate) fn new(
        data: Vec<u8>,
        bit_len: usize,
        references: Vec<Arc<Cell>>,
        cell_type: CellType,
    ) -> CellResult<Self> {
        if bit_len > MAX_CELL_BITS {
            return Err(CellError::CapacityExceeded {
                needed: bit_len,
                available: MAX_CELL_BITS,
            });
        }
        if references.len() > MAX_CELL_REFS {
            return Err(CellError::TooManyReferences(references.len()));
        }
        let depth = references
            .iter()
            .map(|r| usize::from(r.depth) + 1)
            .max()
            .unwrap_or(0);
        if depth > MAX_CELL_DEPTH {
            return Err(CellError::DepthExceeded(depth));
        }
        debug_assert_eq!(data.len(), bit_len.div_ceil(8));
        Ok(Self::assemble(data, bit_len, references, cell_type, depth as u16))
    }

    /// Create an empty ordinary cell.
    pub fn empty() -> Self {
        Self::assemble(Vec::new(), 0, Vec::new(), CellType::Ordinary, 0)
    }

    fn assemble(
        data: Vec<u8>,
        bit_len: usize,
        references: Vec<Arc<Cell>>,
        cell_type: CellType,
        depth: u16,
    ) -> Self {
        let level_mask = compute_level_mask(cell_type, &data, &references);

        let mut cell = Cell {
            data,
            bit_len,
            references,
            cell_type,
            level_mask,
            depth,
            hash: [0u8; HASH_BYTES],
        };
        cell.hash = sha256(&cell.representation());
        cell
    }

    /// Bytes hashed to produce the cell hash.
    ///
    /// `d1 d2 data+tag depth(ref_0..n) hash(ref_0..n)`
    pub fn representation(&self) -> Vec<u8> {
        let mut repr = Vec::with_capacity(
            2 + self.data.len() + self.references.len() * (DEPTH_BYTES + HASH_BYTES),
        );
        let (d1, d2) = self.descriptors();
        repr.push(d1);
        repr.push(d2);
        repr.extend_from_slice(&self.data_with_completion_tag());
        for reference in &self.references {
            repr.extend_from_slice(&reference.depth.to_be_bytes());
        }
        for reference in &self.references {
            repr.extend_from_slice(&reference.hash);
        }
        repr
    }

    /// Descriptor bytes `(d1, d2)`.
    ///
    /// - `d1 = refs + 8 * exotic + 32 * level_mask`
    /// - `d2 = ceil(bits / 8) + floor(bits / 8)`
    pub fn descriptors(&self) -> (u8, u8) {
        let exotic = if self.cell_type.is_exotic() { 8 } else { 0 };
        let d1 = self.references.len() as u8 + exotic + (self.level_mask.mask() << 5);
        let d2 = (self.bit_len.div_ceil(8) + self.bit_len / 8) as u8;
        (d1, d2)
    }

    /// Data with the completion tag appended when the length is not byte
    /// aligned: a single 1 bit right after the data, then zeros.
    pub fn data_with_completion_tag(&self) -> Vec<u8> {
        let mut result = self.data.clone();
        let remainder = self.bit_len % 8;
        if remainder != 0
            && let Some(last) = result.last_mut()
        {
            *last |= 1 << (7 - remainder);
        }
        result
    }

    /// SHA256 hash identifying the cell and its whole subtree.
    pub fn hash(&self) -> [u8; HASH_BYTES] {
        self.hash
    }

    /// Hex form of [`Cell::hash`].
    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    /// 0 for a leaf, otherwise 1 + the deepest reference.
    pub fn depth(&self) -> u16 {
        self.depth
    }

    pub fn level_mask(&self) -> LevelMask {
        self.level_mask
    }

    pub fn cell_type(&self) -> CellType {
        self.cell_type
    }

    pub fn is_exotic(&self) -> bool {
        self.cell_type.is_exotic()
    }

    /// Raw data bytes. Bits past `bit_len` are zero.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn references(&self) -> &[Arc<Cell>] {
        &self.references
    }

    /// Get a reference by index.
    pub fn reference(&self, index: usize) -> Option<&Arc<Cell>> {
        self.references.get(index)
    }

    pub fn reference_count(&self) -> usize {
        self.references.len()
    }

    /// Read a single bit of the data.
    pub(crate) fn bit_at(&self, index: usize) -> bool {
        (self.data[index / 8] >> (7 - index % 8)) & 1 == 1
    }
}

fn compute_level_mask(cell_type: CellType, data: &[u8], references: &[Arc<Cell>]) -> LevelMask {
    let children = || {
        references
            .iter()
            .fold(LevelMask::default(), |acc, r| acc.union(r.level_mask))
    };
    match cell_type {
        CellType::Ordinary => children(),
        // data[0] is the type tag, data[1] the stored mask
        CellType::PrunedBranch => data.get(1).map(|&m| LevelMask::new(m)).unwrap_or_default(),
        CellType::Library => LevelMask::default(),
        CellType::MerkleProof | CellType::MerkleUpdate => children().shift_right(),
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Cell {}

impl std::hash::Hash for Cell {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.hash.hash(state);
    }
}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("type", &self.cell_type)
            .field("bits", &self.bit_len)
            .field("data", &hex::encode(&self.data))
            .field("refs", &self.references.len())
            .field("hash", &self.hash_hex())
            .finish()
    }
}
