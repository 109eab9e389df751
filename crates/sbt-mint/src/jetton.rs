//! TEP-74 jetton transfer body.

use std::sync::Arc;

use sbt_cell::{Address, Cell, CellBuilder, CellResult};

/// Jetton wallet operation codes.
pub mod opcodes {
    /// Transfer jettons to another owner (`transfer`).
    pub const JETTON_TRANSFER: u32 = 0x0f8a7ea5;

    /// Notification sent to the new owner (`transfer_notification`).
    pub const JETTON_TRANSFER_NOTIFICATION: u32 = 0x7362d09c;

    /// Excess TON returned to the response destination (`excesses`).
    pub const JETTON_EXCESSES: u32 = 0xd53276db;
}

pub use opcodes::JETTON_TRANSFER;

/// Parameters of a jetton transfer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JettonTransfer {
    pub query_id: u64,
    /// Amount in jetton base units.
    pub amount: u128,
    pub destination: Address,
    /// Where excess TON goes. `None` keeps it in the jetton wallet.
    pub response_destination: Option<Address>,
    /// TON attached to the transfer notification.
    pub forward_ton_amount: u128,
}

/// Build a transfer body.
///
/// # Message Format (TL-B)
///
/// ```text
/// transfer#0f8a7ea5
///   query_id:uint64
///   amount:(VarUInteger 16)
///   destination:MsgAddress
///   response_destination:MsgAddress
///   custom_payload:(Maybe ^Cell)
///   forward_ton_amount:(VarUInteger 16)
///   forward_payload:(Either Cell ^Cell)
/// ```
///
/// No custom payload is attached and the forward payload is an empty
/// inline cell.
pub fn jetton_transfer_body(transfer: &JettonTransfer) -> CellResult<Arc<Cell>> {
    let mut builder = CellBuilder::new();
    builder.store_u32(JETTON_TRANSFER)?;
    builder.store_u64(transfer.query_id)?;
    builder.store_coins(transfer.amount)?;
    builder.store_address(Some(&transfer.destination))?;
    builder.store_address(transfer.response_destination.as_ref())?;
    builder.store_maybe_ref(None)?;
    builder.store_coins(transfer.forward_ton_amount)?;
    // forward_payload: Either left, inline and empty
    builder.store_bit(false)?;
    Ok(Arc::new(builder.build()?))
}
