//! SBT item state-init and address.

use std::sync::Arc;

use sbt_cell::{Address, Cell, CellBuilder, CellResult};

use crate::metadata::content_cell;

/// Contract state-init: code and data, no split depth, special or library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StateInit {
    pub code: Arc<Cell>,
    pub data: Arc<Cell>,
}

impl StateInit {
    pub fn new(code: Arc<Cell>, data: Arc<Cell>) -> Self {
        Self { code, data }
    }

    /// Serialize as `StateInit`.
    ///
    /// ```text
    /// _ split_depth:(Maybe (## 5)) special:(Maybe TickTock)
    ///   code:(Maybe ^Cell) data:(Maybe ^Cell)
    ///   library:(Maybe ^Cell) = StateInit;
    /// ```
    pub fn to_cell(&self) -> CellResult<Arc<Cell>> {
        let mut builder = CellBuilder::new();
        builder.store_uint(0b00110, 5)?;
        builder.store_ref(self.code.clone())?;
        builder.store_ref(self.data.clone())?;
        Ok(Arc::new(builder.build()?))
    }

    /// Address the contract is deployed at.
    pub fn address(&self, workchain: i8) -> CellResult<Address> {
        Ok(Address::new(workchain, self.to_cell()?.hash()))
    }
}

/// Build the initial data of a standalone SBT item.
///
/// The owner is also the authority and the editor; `revoked_at` is zero.
pub fn item_data_cell(owner: &Address, metadata_uri: &str) -> CellResult<Arc<Cell>> {
    let mut builder = CellBuilder::new();
    builder.store_address(Some(owner))?;
    builder.store_address(Some(owner))?;
    builder.store_ref(content_cell(metadata_uri)?)?;
    builder.store_address(Some(owner))?;
    builder.store_u64(0)?;
    Ok(Arc::new(builder.build()?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sbt_cell::CellSlice;

    fn owner() -> Address {
        Address::parse("UQAI6XfeQmLtZ8qzeoNWJRYG8wfuWQZBZHZF5-eUH7kDiZVN").unwrap()
    }

    #[test]
    fn test_item_data_cell() {
        let data = item_data_cell(&owner(), "https://gw/ipfs/abc").unwrap();
        assert_eq!(
            data.hash_hex(),
            "093ff8e163026e976440a3240d5b9a5a3149469237731c39f69db1fe461b7654"
        );

        let mut slice = CellSlice::new(&data);
        for _ in 0..2 {
            assert_eq!(slice.load_address().unwrap(), Some(owner()));
        }
        let content = slice.load_ref().unwrap();
        assert_eq!(
            content.hash(),
            content_cell("https://gw/ipfs/abc").unwrap().hash()
        );
        assert_eq!(slice.load_address().unwrap(), Some(owner()));
        assert_eq!(slice.load_u64().unwrap(), 0);
        assert!(slice.is_empty());
    }

    #[test]
    fn test_state_init_prefix_and_refs() {
        let code = Arc::new(Cell::empty());
        let data = item_data_cell(&owner(), "u").unwrap();
        let state_init = StateInit::new(code.clone(), data.clone())
            .to_cell()
            .unwrap();

        assert_eq!(state_init.bit_len(), 5);
        assert_eq!(state_init.data(), &[0b0011_0000]);
        assert!(Arc::ptr_eq(state_init.reference(0).unwrap(), &code));
        assert!(Arc::ptr_eq(state_init.reference(1).unwrap(), &data));
    }

    #[test]
    fn test_address_follows_data() {
        let code = Arc::new(Cell::empty());
        let a = StateInit::new(code.clone(), item_data_cell(&owner(), "a").unwrap());
        let b = StateInit::new(code, item_data_cell(&owner(), "b").unwrap());

        let address = a.address(0).unwrap();
        assert_eq!(address.workchain, 0);
        assert_eq!(address.hash, a.to_cell().unwrap().hash());
        assert_ne!(address, b.address(0).unwrap());
        assert_eq!(a.address(-1).unwrap().workchain, -1);
    }
}
