//! Compiled code of the single SBT item contract.

use std::sync::Arc;

use sbt_cell::{BagOfCells, Cell, CellResult};

/// Base64 BOC of the SBT item code.
pub const SBT_ITEM_CODE_BOC: &str = concat!(
    "te6cckECGQEABBgAART/APSkE/S88sgLAQIBYgISAgLOAw8CASAEDgHtDIhxwCSXwPg0NMD+kD6Q",
    "DH6ADFx1yH6ADH6ADDwAgPTHwNxsI5MECRfBNMfghAFJMeuErqOOdM/MIAQ+EJwghDBjobSVQNtg",
    "EADyMsfEss/IW6zkwHPF5Ex4slxBcjLBVAEzxZY+gITy2rMyQH7AJEw4uAC0z+AFBPyCEC/LJqJS",
    "QLqOQDBsIjJwyMv/iwLPFoAQcIIQi3cXNUBVA4BAA8jLHxLLPyFus5MBzxeRMeLJcQXIywVQBM8W",
    "WPoCE8tqzMkB+wDgghDQw7/qUkC64wKCEATe0UhSQLrjAoIQHARBKlJAuo6FM0AD2zzgNDSCEBoL",
    "nVFSILoGBwgKAMBsM/pA1NMAMPhFcMjL/1AGzxb4Qs8WEswUyz9SMMsAA8MAlvhDUAPMAt6AEHix",
    "cIIQDdYH40A1FIBAA8jLHxLLPyFus5MBzxeRMeLJcQXIywVQBM8WWPoCE8tqzMkB+wAAyGwz+EJQ",
    "A8cF8uGRAfpA1NMAMPhFcMjL//hCzxYTzBLLP1IQywABwwCU+EMBzN6AEHixcIIQBSTHrkBVA4BA",
    "A8jLHxLLPyFus5MBzxeRMeLJcQXIywVQBM8WWPoCE8tqzMkB+wAB9PhBFMcF8uGR+kAh8AH6QNIA",
    "MfoAggr68IAXoSGUUxWgod4i1wsBwwAgkgahkTbiIML/8uGSIY49yPhBzxZQB88WgBCCEFEaRGMT",
    "cSZUSFADyMsfEss/IW6zkwHPF5Ex4slxBcjLBVAEzxZY+gITy2rMyQH7AJI2MOIDCQCAjjYi8AGA",
    "EIIQ1TJ22xRFA21xA8jLHxLLPyFus5MBzxeRMeLJcQXIywVQBM8WWPoCE8tqzMkB+wCSbDHi+GHw",
    "AwP+jhAxMvhBEscF8uGa1DD4Y/AD4DKCEB8EU3pSELqORzD4QiHHBfLhkYAQcIIQ1TJ220EEbYMG",
    "A8jLHxLLPyFus5MBzxeRMeLJcQXIywVQBM8WWPoCE8tqzMkB+wCLAvhiiwL4ZPAD4IIQb4n141IQ",
    "uuMCghDRNtOzUhC64wJsIQsMDQAuMDH4RAHHBfLhkfhFwADy4ZP4I/hl8AMAijD4QiHHBfLhkYIK",
    "+vCAcPsCgBBwghDVMnbbQQRtgwYDyMsfEss/IW6zkwHPF5Ex4slxBcjLBVAEzxZY+gITy2rMyQH7",
    "AAAgghBfzD0UupPywZ3ehA/y8AARPpEMHC68uFNgAgEgEBEANztRND6QAH4YvpAAfhh1AH4Y/pAA",
    "fhk0z8w+GWAALz4RfhDyPhCzxb4Qc8WzPhEzxbLP8ntVIAIBIBMYAgFYFBUADbVjHgBfCJACASAW",
    "FwANsB08AL4QYAANs2D8AL4RYAAZvH5/gBP7hFgXwhfCHC4EUpk=",
);

/// Hex representation hash of [`SBT_ITEM_CODE_BOC`].
pub const SBT_ITEM_CODE_HASH: &str =
    "68550b3df306e709935f2d3d97e226454a409ad7965c87163845ba56b0745f93";

/// Decode the embedded code cell.
pub fn sbt_item_code() -> CellResult<Arc<Cell>> {
    BagOfCells::deserialize_from_base64(SBT_ITEM_CODE_BOC)?.into_single_root()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_hash() {
        let code = sbt_item_code().unwrap();
        assert_eq!(code.hash_hex(), SBT_ITEM_CODE_HASH);
        assert_eq!(code.depth(), 7);
    }

    #[test]
    fn test_code_reserializes_identically() {
        let code = sbt_item_code().unwrap();
        let encoded = BagOfCells::from_root(code).serialize_to_base64().unwrap();
        assert_eq!(encoded, SBT_ITEM_CODE_BOC);
    }
}
