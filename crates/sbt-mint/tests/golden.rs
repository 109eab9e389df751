//! Known-good hashes and encodings for the mint payloads.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use sbt_cell::{Address, BagOfCells, CellSlice};
use sbt_mint::{
    JettonTransfer, MessageAssembler, MintConfig, MintRequest, Payment, SBT_ITEM_CODE_BOC,
    content_cell, item_data_cell, jetton_transfer_body, sbt_item_code,
};

const OWNER: &str = "UQAI6XfeQmLtZ8qzeoNWJRYG8wfuWQZBZHZF5-eUH7kDiZVN";
const URI: &str = "https://gw/ipfs/abc";

const STATE_INIT_HASH: &str = "c1257e21d89d4b0a75fb0ada17f3177147ce7aacd082f5a17fe5e27f95941480";
const TRANSFER_BODY_BOC: &str =
    "te6cckEBAQEANgAAZw+KfqUAAAAAAAAAAFRdlkuACAAR0u+8hMXaz5Vm9QasSiwN5g/csgyCyOyLz88oP3IHEgFTn8OQ";

fn owner() -> Address {
    Address::parse(OWNER).unwrap()
}

fn transfer_body(query_id: u64) -> JettonTransfer {
    JettonTransfer {
        query_id,
        amount: 300_000_000_000,
        destination: owner(),
        response_destination: None,
        forward_ton_amount: 0,
    }
}

#[test]
fn owner_address_forms() {
    let owner = owner();
    assert_eq!(
        owner.to_raw(),
        "0:08e977de4262ed67cab37a8356251606f307ee590641647645e7e7941fb90389"
    );
    assert_eq!(owner.to_friendly(false, false), OWNER);
    assert_eq!(
        owner.to_friendly(true, false),
        "EQAI6XfeQmLtZ8qzeoNWJRYG8wfuWQZBZHZF5-eUH7kDiciI"
    );
}

#[test]
fn sbt_code_boc_reserializes_identically() {
    let expected = STANDARD.decode(SBT_ITEM_CODE_BOC).unwrap();
    let code = sbt_item_code().unwrap();
    assert_eq!(
        code.hash_hex(),
        "68550b3df306e709935f2d3d97e226454a409ad7965c87163845ba56b0745f93"
    );
    assert_eq!(BagOfCells::from_root(code).serialize().unwrap(), expected);
}

#[test]
fn content_and_data_cells() {
    assert_eq!(
        content_cell(URI).unwrap().hash_hex(),
        "6ef5c17096943cd1539cc1649586b0bf1abb7eebef511d44f5b75c6f98850c5f"
    );
    assert_eq!(
        item_data_cell(&owner(), URI).unwrap().hash_hex(),
        "093ff8e163026e976440a3240d5b9a5a3149469237731c39f69db1fe461b7654"
    );
}

#[test]
fn state_init_hash_and_item_address() {
    let assembler = MessageAssembler::new(MintConfig::default()).unwrap();
    let state_init = assembler.state_init(&owner(), URI).unwrap();
    let cell = state_init.to_cell().unwrap();
    assert_eq!(cell.hash_hex(), STATE_INIT_HASH);

    let address = state_init.address(0).unwrap();
    assert_eq!(
        address.to_friendly(true, false),
        "EQDBJX4h2J1LCnX7CtoX8xdxR856rNCC9aF_5eJ_lZQUgPAc"
    );
    assert_eq!(
        address.to_friendly(false, false),
        "UQDBJX4h2J1LCnX7CtoX8xdxR856rNCC9aF_5eJ_lZQUgK3Z"
    );

    let boc = BagOfCells::from_root(cell).serialize().unwrap();
    assert_eq!(boc.len(), 1203);
}

#[test]
fn transfer_body_encoding() {
    let body = jetton_transfer_body(&transfer_body(0)).unwrap();
    assert_eq!(body.bit_len(), 415);
    assert_eq!(
        body.hash_hex(),
        "7358d656d58ac338576eb61c0a38ece0fbb6072c292dada92facfdf981e7d654"
    );

    let boc = BagOfCells::from_root(body);
    assert_eq!(boc.serialize_to_base64().unwrap(), TRANSFER_BODY_BOC);
    assert_eq!(
        hex::encode(boc.serialize().unwrap()),
        "b5ee9c724101010100360000670f8a7ea50000000000000000545d964b80080011d2efbc84c5dacf9566f506ac4a2c0de60fdcb20c82c8ec8bcfcf283f72071201539fc390"
    );
}

#[test]
fn jetton_mint_ton_connect_payload() {
    let assembler = MessageAssembler::new(MintConfig::default()).unwrap();
    let jetton_wallet = Address::new(0, [0x42; 32]);
    let mint = assembler
        .assemble(
            &MintRequest::new(owner(), URI, Payment::Jetton { jetton_wallet }),
            1_700_000_300,
            0,
        )
        .unwrap();

    let tc = mint.request.to_ton_connect().unwrap();
    assert_eq!(tc.valid_until, 1_700_000_300);
    assert_eq!(tc.messages.len(), 2);

    assert_eq!(tc.messages[0].address, format!("0:{STATE_INIT_HASH}"));
    assert_eq!(tc.messages[0].amount, "50000000");
    let state_init =
        BagOfCells::deserialize_from_base64(tc.messages[0].state_init.as_deref().unwrap())
            .unwrap()
            .into_single_root()
            .unwrap();
    assert_eq!(state_init.hash_hex(), STATE_INIT_HASH);

    assert_eq!(tc.messages[1].address, jetton_wallet.to_raw());
    assert_eq!(tc.messages[1].amount, "35000000");
    assert_eq!(tc.messages[1].payload.as_deref(), Some(TRANSFER_BODY_BOC));
}

#[test]
fn transfer_body_decodes_back() {
    let boc = BagOfCells::deserialize_from_base64(TRANSFER_BODY_BOC).unwrap();
    let body = boc.single_root().unwrap();
    let mut slice = CellSlice::new(body);
    assert_eq!(slice.load_u32().unwrap(), 0x0f8a7ea5);
    assert_eq!(slice.load_u64().unwrap(), 0);
    assert_eq!(slice.load_coins().unwrap(), 300_000_000_000);
    assert_eq!(slice.load_address().unwrap(), Some(owner()));
    assert_eq!(slice.load_address().unwrap(), None);
}
