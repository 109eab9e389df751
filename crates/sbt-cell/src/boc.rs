//! Bag of Cells (BoC) serialization format.
//!
//! Layout of the generic format:
//!
//! ```text
//! magic:u32 flags:u8 off_bytes:u8
//! cells:size roots:size absent:size total_cells_size:off
//! root_idx:size * roots
//! [index:off * cells]
//! cell records
//! [crc32c:u32 LE]
//! ```
//!
//! Cells are written parents first: the root gets index 0 and every
//! reference points to a higher index. The order is the reverse of a
//! post-order walk that visits references last to first, which is what the
//! chain's reference encoder emits, so equal graphs give equal bytes.
//!
//! Deduplication is by identity. A cell reached twice through the same
//! `Arc` is written once; two separately built cells with equal content are
//! both written.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use base64::Engine;
use base64::engine::general_purpose::{STANDARD, URL_SAFE};

use crate::{
    BOC_GENERIC_MAGIC, BOC_INDEXED_CRC32_MAGIC, BOC_INDEXED_MAGIC, Cell, CellError, CellResult,
    CellType, MAX_CELL_DEPTH, MAX_CELL_REFS, crc32c,
};

/// Bag of Cells: the roots of a cell graph to be serialized, or the roots
/// recovered from bytes.
#[derive(Debug, Clone)]
pub struct BagOfCells {
    roots: Vec<Arc<Cell>>,
}

impl BagOfCells {
    /// Create a new BoC with the given root cells.
    pub fn new(roots: Vec<Arc<Cell>>) -> Self {
        BagOfCells { roots }
    }

    /// Create a BoC with a single root cell.
    pub fn from_root(root: impl Into<Arc<Cell>>) -> Self {
        BagOfCells {
            roots: vec![root.into()],
        }
    }

    /// Get all root cells.
    pub fn roots(&self) -> &[Arc<Cell>] {
        &self.roots
    }

    /// Get the single root cell (errors if not exactly one root).
    pub fn single_root(&self) -> CellResult<&Arc<Cell>> {
        match self.roots.as_slice() {
            [root] => Ok(root),
            roots => Err(CellError::NotSingleRoot(roots.len())),
        }
    }

    /// Take the single root cell out of the bag.
    pub fn into_single_root(self) -> CellResult<Arc<Cell>> {
        let count = self.roots.len();
        let mut roots = self.roots.into_iter();
        match (roots.next(), roots.next()) {
            (Some(root), None) => Ok(root),
            _ => Err(CellError::NotSingleRoot(count)),
        }
    }

    /// Serialize with a CRC32-C trailer and without an index.
    pub fn serialize(&self) -> CellResult<Vec<u8>> {
        self.serialize_with_options(true, false)
    }

    /// Serialize with options.
    ///
    /// # Arguments
    /// * `with_crc` - Append a CRC32-C of everything before it
    /// * `with_index` - Write the cumulative end offset of every cell record
    pub fn serialize_with_options(&self, with_crc: bool, with_index: bool) -> CellResult<Vec<u8>> {
        if self.roots.is_empty() {
            return Err(CellError::MalformedBoc("no root cells".to_string()));
        }

        let cells = self.collect_cells_topological();
        let index_of: HashMap<*const Cell, usize> = cells
            .iter()
            .enumerate()
            .map(|(i, cell)| (Arc::as_ptr(cell), i))
            .collect();
        let size_bytes = bytes_needed(cells.len());

        let mut records = Vec::with_capacity(cells.len());
        for cell in &cells {
            records.push(serialize_cell(cell, &index_of, size_bytes)?);
        }
        let total_cells_size: usize = records.iter().map(Vec::len).sum();
        let off_bytes = bytes_needed(total_cells_size);

        let mut result = Vec::with_capacity(
            16 + self.roots.len() * size_bytes + total_cells_size + cells.len() * off_bytes,
        );
        result.extend_from_slice(&BOC_GENERIC_MAGIC.to_be_bytes());

        // has_idx (bit 7) | has_crc32c (bit 6) | has_cache_bits (bit 5) | size_bytes (bits 2-0)
        let flags: u8 = (if with_index { 0x80 } else { 0 })
            | (if with_crc { 0x40 } else { 0 })
            | size_bytes as u8;
        result.push(flags);
        result.push(off_bytes as u8);

        write_uint(&mut result, cells.len(), size_bytes);
        write_uint(&mut result, self.roots.len(), size_bytes);
        write_uint(&mut result, 0, size_bytes);
        write_uint(&mut result, total_cells_size, off_bytes);

        for root in &self.roots {
            write_uint(&mut result, index_of[&Arc::as_ptr(root)], size_bytes);
        }

        if with_index {
            let mut end = 0;
            for record in &records {
                end += record.len();
                write_uint(&mut result, end, off_bytes);
            }
        }

        for record in &records {
            result.extend_from_slice(record);
        }

        if with_crc {
            let crc = crc32c(&result);
            result.extend_from_slice(&crc.to_le_bytes());
        }

        Ok(result)
    }

    /// Serialize to a standard base64 string.
    pub fn serialize_to_base64(&self) -> CellResult<String> {
        Ok(STANDARD.encode(self.serialize()?))
    }

    /// Deserialize from a base64 string in either alphabet.
    pub fn deserialize_from_base64(text: &str) -> CellResult<Self> {
        let text = text.trim();
        let bytes = STANDARD
            .decode(text)
            .or_else(|_| URL_SAFE.decode(text))
            .map_err(|e| CellError::MalformedBoc(format!("invalid base64: {e}")))?;
        Self::deserialize(&bytes)
    }

    /// Deserialize from bytes.
    ///
    /// Supports all three BoC formats:
    /// - `0xb5ee9c72` - Generic BoC
    /// - `0x68ff65f3` - Indexed BoC
    /// - `0xacc3a728` - Indexed BoC with CRC32C
    ///
    /// References may point either way. Any structural problem yields
    /// [`CellError::MalformedBoc`].
    pub fn deserialize(data: &[u8]) -> CellResult<Self> {
        let mut reader = ByteReader::new(data);

        let magic = reader.read_uint(4)? as u32;
        let (has_idx, has_crc, size_bytes) = match magic {
            BOC_GENERIC_MAGIC => {
                let flags = reader.read_u8()?;
                (flags & 0x80 != 0, flags & 0x40 != 0, (flags & 0x07) as usize)
            }
            BOC_INDEXED_MAGIC => (true, false, reader.read_u8()? as usize),
            BOC_INDEXED_CRC32_MAGIC => (true, true, reader.read_u8()? as usize),
            _ => return Err(malformed(format!("invalid magic {magic:08x}"))),
        };
        if !(1..=4).contains(&size_bytes) {
            return Err(malformed(format!("invalid size_bytes {size_bytes}")));
        }
        let off_bytes = reader.read_u8()? as usize;
        if !(1..=8).contains(&off_bytes) {
            return Err(malformed(format!("invalid off_bytes {off_bytes}")));
        }

        if has_crc {
            if data.len() < reader.pos + 4 {
                return Err(malformed("truncated crc32c"));
            }
            let (body, trailer) = data.split_at(data.len() - 4);
            let expected = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
            let actual = crc32c(body);
            if expected != actual {
                return Err(malformed(format!(
                    "crc32c mismatch: expected {expected:08x}, got {actual:08x}"
                )));
            }
            reader.end = body.len();
        }

        let cell_count = reader.read_uint(size_bytes)? as usize;
        let root_count = reader.read_uint(size_bytes)? as usize;
        let absent_count = reader.read_uint(size_bytes)? as usize;
        let total_cells_size = reader.read_uint(off_bytes)? as usize;

        if cell_count == 0 {
            return Err(malformed("no cells"));
        }
        if root_count == 0 || root_count > cell_count {
            return Err(malformed(format!(
                "invalid root count {root_count} for {cell_count} cells"
            )));
        }
        if absent_count != 0 {
            return Err(malformed("absent cells are not supported"));
        }

        let mut root_indices = Vec::with_capacity(root_count);
        for _ in 0..root_count {
            let index = reader.read_uint(size_bytes)? as usize;
            if index >= cell_count {
                return Err(malformed(format!("root index {index} out of range")));
            }
            root_indices.push(index);
        }

        if has_idx {
            let index_len = cell_count
                .checked_mul(off_bytes)
                .ok_or_else(|| malformed("index too large"))?;
            reader.skip(index_len)?;
        }

        if reader.remaining() != total_cells_size {
            return Err(malformed(format!(
                "cell data is {} bytes, header declares {total_cells_size}",
                reader.remaining()
            )));
        }

        let mut raw_cells = Vec::with_capacity(cell_count.min(reader.remaining() / 2));
        for index in 0..cell_count {
            raw_cells.push(RawCell::parse(&mut reader, index, cell_count, size_bytes)?);
        }
        if reader.remaining() != 0 {
            return Err(malformed(format!("{} trailing bytes after cells", reader.remaining())));
        }

        let mut graph = GraphBuilder {
            raw: &raw_cells,
            built: vec![None; cell_count],
            in_progress: vec![false; cell_count],
        };
        let roots = root_indices
            .into_iter()
            .map(|index| graph.build(index, 0))
            .collect::<CellResult<Vec<_>>>()?;

        Ok(BagOfCells { roots })
    }

    /// Collect all cells in topological order (parents first).
    fn collect_cells_topological(&self) -> Vec<Arc<Cell>> {
        let mut post_order = Vec::new();
        let mut visited = HashSet::new();
        for root in self.roots.iter().rev() {
            collect_post_order(root, &mut post_order, &mut visited);
        }
        post_order.reverse();
        post_order
    }
}

/// Depth-first post-order walk, references last to first.
fn collect_post_order(
    root: &Arc<Cell>,
    out: &mut Vec<Arc<Cell>>,
    visited: &mut HashSet<*const Cell>,
) {
    if !visited.insert(Arc::as_ptr(root)) {
        return;
    }
    // Each entry holds a cell and how many of its references remain.
    let mut stack = vec![(root.clone(), root.reference_count())];
    while let Some((cell, pending)) = stack.last_mut() {
        if *pending == 0 {
            if let Some((done, _)) = stack.pop() {
                out.push(done);
            }
            continue;
        }
        *pending -= 1;
        let reference = cell.references()[*pending].clone();
        if visited.insert(Arc::as_ptr(&reference)) {
            let remaining = reference.reference_count();
            stack.push((reference, remaining));
        }
    }
}

fn serialize_cell(
    cell: &Cell,
    index_of: &HashMap<*const Cell, usize>,
    size_bytes: usize,
) -> CellResult<Vec<u8>> {
    let mut result =
        Vec::with_capacity(2 + cell.data().len() + cell.reference_count() * size_bytes);
    let (d1, d2) = cell.descriptors();
    result.push(d1);
    result.push(d2);
    result.extend_from_slice(&cell.data_with_completion_tag());
    for reference in cell.references() {
        let index = index_of
            .get(&Arc::as_ptr(reference))
            .ok_or_else(|| malformed("reference missing from cell list"))?;
        write_uint(&mut result, *index, size_bytes);
    }
    Ok(result)
}

/// A cell record before its references are resolved.
struct RawCell {
    data: Vec<u8>,
    bit_len: usize,
    cell_type: CellType,
    level_mask: u8,
    refs: Vec<usize>,
}

impl RawCell {
    fn parse(
        reader: &mut ByteReader<'_>,
        index: usize,
        cell_count: usize,
        size_bytes: usize,
    ) -> CellResult<Self> {
        let d1 = reader.read_u8()?;
        let d2 = reader.read_u8()?;

        let ref_count = (d1 & 0x07) as usize;
        let is_exotic = d1 & 0x08 != 0;
        let has_hashes = d1 & 0x10 != 0;
        let level_mask = d1 >> 5;
        if ref_count > MAX_CELL_REFS {
            return Err(malformed(format!("cell {index} has reserved ref count {ref_count}")));
        }

        if has_hashes {
            let hash_count = level_mask.count_ones() as usize + 1;
            reader.skip(hash_count * (32 + 2))?;
        }

        let data_len = (d2 as usize).div_ceil(2);
        let mut data = reader.read_bytes(data_len)?.to_vec();
        let bit_len = if d2 % 2 == 0 {
            data_len * 8
        } else {
            let last = data
                .last_mut()
                .ok_or_else(|| malformed("empty partial byte"))?;
            if *last == 0 {
                return Err(malformed(format!("cell {index} has no completion tag")));
            }
            let tag_position = last.trailing_zeros() as usize;
            *last &= !(1u8 << tag_position);
            data_len * 8 - tag_position - 1
        };
        data.truncate(bit_len.div_ceil(8));

        let cell_type = if is_exotic {
            let tag = *data
                .first()
                .ok_or_else(|| malformed("exotic cell without type byte"))?;
            CellType::from_exotic_tag(tag).map_err(|e| malformed(e.to_string()))?
        } else {
            CellType::Ordinary
        };

        let mut refs = Vec::with_capacity(ref_count);
        for _ in 0..ref_count {
            let target = reader.read_uint(size_bytes)? as usize;
            if target >= cell_count {
                return Err(malformed(format!(
                    "cell {index} references {target}, only {cell_count} cells"
                )));
            }
            refs.push(target);
        }

        Ok(RawCell {
            data,
            bit_len,
            cell_type,
            level_mask,
            refs,
        })
    }
}

/// Resolves raw cells into `Arc<Cell>`s, sharing a cell between every
/// record that references its index.
struct GraphBuilder<'a> {
    raw: &'a [RawCell],
    built: Vec<Option<Arc<Cell>>>,
    in_progress: Vec<bool>,
}

impl GraphBuilder<'_> {
    fn build(&mut self, index: usize, depth: usize) -> CellResult<Arc<Cell>> {
        if let Some(cell) = &self.built[index] {
            return Ok(cell.clone());
        }
        if self.in_progress[index] {
            return Err(malformed(format!("reference cycle through cell {index}")));
        }
        if depth > MAX_CELL_DEPTH {
            return Err(malformed(format!("cell depth exceeds {MAX_CELL_DEPTH}")));
        }

        self.in_progress[index] = true;
        let raw = &self.raw[index];
        let mut references = Vec::with_capacity(raw.refs.len());
        for &target in &raw.refs {
            references.push(self.build(target, depth + 1)?);
        }
        self.in_progress[index] = false;

        let cell = Cell::new(raw.data.clone(), raw.bit_len, references, raw.cell_type)
            .map_err(|e| malformed(format!("cell {index}: {e}")))?;
        if cell.level_mask().mask() != raw.level_mask {
            return Err(malformed(format!(
                "cell {index} declares level mask {}, computed {}",
                raw.level_mask,
                cell.level_mask().mask()
            )));
        }

        let cell = Arc::new(cell);
        self.built[index] = Some(cell.clone());
        Ok(cell)
    }
}

struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
    end: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        ByteReader {
            data,
            pos: 0,
            end: data.len(),
        }
    }

    fn remaining(&self) -> usize {
        self.end - self.pos
    }

    fn read_bytes(&mut self, len: usize) -> CellResult<&'a [u8]> {
        if len > self.remaining() {
            return Err(malformed(format!(
                "unexpected end of data at offset {}: need {len} bytes",
                self.pos
            )));
        }
        let bytes = &self.data[self.pos..self.pos + len];
        self.pos += len;
        Ok(bytes)
    }

    fn skip(&mut self, len: usize) -> CellResult<()> {
        self.read_bytes(len).map(|_| ())
    }

    fn read_u8(&mut self) -> CellResult<u8> {
        Ok(self.read_bytes(1)?[0])
    }

    fn read_uint(&mut self, bytes: usize) -> CellResult<u64> {
        Ok(self
            .read_bytes(bytes)?
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | b as u64))
    }
}

fn malformed(message: impl Into<String>) -> CellError {
    CellError::MalformedBoc(message.into())
}

/// Bytes needed to represent `n`, at least one.
fn bytes_needed(n: usize) -> usize {
    let bits = usize::BITS - n.leading_zeros();
    (bits as usize).div_ceil(8).max(1)
}

fn write_uint(buf: &mut Vec<u8>, value: usize, bytes: usize) {
    for i in (0..bytes).rev() {
        buf.push((value >> (i * 8)) as u8);
    }
}
