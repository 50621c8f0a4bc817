use easel_sdk::testing::{
    MemoryStore, RecordedKind, ScriptedChain, confirm_receipt, mint_receipt,
};
use easel_sdk::{
    Address, AssetDraft, Error, FlowError, FlowState, ListingFlow, MarketConfig, Marketplace,
    Network, SigningSession, U256, parse_price,
};
use ethers_core::abi::Token;
use ethers_core::utils::id;

fn token_address() -> Address {
    Address::from_low_u64_be(0x11)
}

fn market_address() -> Address {
    Address::from_low_u64_be(0x22)
}

fn seller() -> Address {
    Address::from_low_u64_be(0x33)
}

fn config() -> MarketConfig {
    MarketConfig::new(Network::Localhost, token_address(), market_address())
}

fn valid_draft() -> AssetDraft {
    AssetDraft::new("Art", "desc", "1.5").with_file(vec![0xde, 0xad, 0xbe, 0xef])
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[test]
fn end_to_end_upload_mint_and_list() {
    let store = MemoryStore::new();
    store.push_cid("Qm_img");
    store.push_cid("Qm_meta");

    let chain = ScriptedChain::new(seller());
    chain.push_receipt(mint_receipt(3));
    chain.push_fee(parse_price("0.025").unwrap());
    chain.push_receipt(confirm_receipt());

    let mut flow = ListingFlow::new(store.clone(), chain.clone(), config());
    let receipt = flow.create_and_list(&valid_draft()).unwrap();

    assert_eq!(receipt.token_id, 3);
    assert_eq!(receipt.image.url, "http://localhost:8080/ipfs/Qm_img");
    assert_eq!(receipt.metadata.url, "http://localhost:8080/ipfs/Qm_meta");
    assert_eq!(flow.state(), FlowState::Done);

    // The second upload is the metadata document referencing the first.
    assert_eq!(store.upload_count(), 2);
    let document = String::from_utf8(store.upload(1).unwrap()).unwrap();
    assert_eq!(
        document,
        r#"{"name":"Art","description":"desc","image":"http://localhost:8080/ipfs/Qm_img"}"#
    );

    // Mint call: createToken(metadataURL) against the token contract.
    let sends = chain.sends();
    assert_eq!(sends.len(), 2);
    assert_eq!(sends[0].to, token_address());
    assert_eq!(sends[0].value, U256::zero());
    let mut expected = id("createToken(string)").to_vec();
    expected.extend(ethers_core::abi::encode(&[Token::String(
        "http://localhost:8080/ipfs/Qm_meta".into(),
    )]));
    assert_eq!(sends[0].data, expected);

    // Listing call: createMarketItem(token, 3, 1.5e18) paying the fee.
    assert_eq!(sends[1].to, market_address());
    assert_eq!(sends[1].value, parse_price("0.025").unwrap());
    let mut expected = id("createMarketItem(address,uint256,uint256)").to_vec();
    expected.extend(ethers_core::abi::encode(&[
        Token::Address(token_address()),
        Token::Uint(U256::from(3)),
        Token::Uint(U256::from(1_500_000_000_000_000_000u64)),
    ]));
    assert_eq!(sends[1].data, expected);

    // Exactly one read-only call: the live fee read.
    let reads: Vec<_> = chain
        .recorded()
        .into_iter()
        .filter(|c| c.kind == RecordedKind::Call)
        .collect();
    assert_eq!(reads.len(), 1);
    assert_eq!(reads[0].to, market_address());
    assert_eq!(reads[0].data, id("getListingPrice()").to_vec());
}

#[test]
fn missing_input_performs_no_network_calls() {
    let drafts = [
        AssetDraft::new("", "desc", "1.5").with_file(vec![1]),
        AssetDraft::new("Art", "", "1.5").with_file(vec![1]),
        AssetDraft::new("Art", "desc", "").with_file(vec![1]),
        AssetDraft::new("Art", "desc", "1.5"),
    ];
    for draft in drafts {
        let store = MemoryStore::new();
        let chain = ScriptedChain::new(seller());
        let mut flow = ListingFlow::new(store.clone(), chain.clone(), config());

        let err = flow.create_and_list(&draft).unwrap_err();
        assert!(matches!(err, FlowError::MissingInput(_)), "got {err}");
        assert_eq!(flow.state(), FlowState::Idle);
        assert_eq!(store.upload_count(), 0);
        assert!(chain.recorded().is_empty());
    }
}

#[test]
fn declined_wallet_aborts_before_any_mint_call() {
    let store = MemoryStore::new();
    let chain = ScriptedChain::disconnected();
    let mut flow = ListingFlow::new(store, chain.clone(), config());

    let err = flow.create_and_list(&valid_draft()).unwrap_err();
    match err {
        FlowError::Aborted { stage, source } => {
            assert_eq!(stage, FlowState::AwaitingSignature);
            assert!(matches!(source, Error::WalletConnectionRejected(_)));
        }
        other => panic!("expected Aborted, got {other}"),
    }
    assert_eq!(flow.state(), FlowState::Aborted);
    assert!(chain.sends().is_empty());
}

#[test]
fn storage_outage_aborts_during_upload() {
    let store = MemoryStore::new();
    store.set_unavailable(true);
    let chain = ScriptedChain::new(seller());
    let mut flow = ListingFlow::new(store, chain.clone(), config());

    let err = flow.create_and_list(&valid_draft()).unwrap_err();
    match err {
        FlowError::Aborted { stage, source } => {
            assert_eq!(stage, FlowState::Uploading);
            assert!(matches!(source, Error::StorageUnavailable(_)));
        }
        other => panic!("expected Aborted, got {other}"),
    }
    assert!(chain.recorded().is_empty());
}

#[test]
fn eventless_mint_receipt_aborts_as_malformed() {
    let store = MemoryStore::new();
    let chain = ScriptedChain::new(seller());
    chain.push_receipt(confirm_receipt());

    let mut flow = ListingFlow::new(store, chain.clone(), config());
    let err = flow.create_and_list(&valid_draft()).unwrap_err();
    match err {
        FlowError::Aborted { stage, source } => {
            assert_eq!(stage, FlowState::Minting);
            assert!(matches!(source, Error::MalformedReceipt(_)));
        }
        other => panic!("expected Aborted, got {other}"),
    }
    // The mint was submitted, but no listing call followed.
    assert_eq!(chain.sends().len(), 1);
}

#[test]
fn bad_price_fails_registration_before_any_contract_call() {
    let chain = ScriptedChain::new(seller());
    let market = Marketplace::new(&chain, market_address());
    let session = SigningSession { account: seller() };

    for bad in ["abc", "0", "-1"] {
        let err = market
            .register_listing(&session, token_address(), 7, bad)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidPrice(_)), "got {err} for {bad:?}");
    }
    assert!(chain.recorded().is_empty());
}

#[test]
fn listing_failure_after_mint_is_surfaced_as_minted_unlisted() {
    let store = MemoryStore::new();
    let chain = ScriptedChain::new(seller());
    chain.push_receipt(mint_receipt(9));
    chain.push_fee(parse_price("0.025").unwrap());
    chain.push_receipt_error(Error::TransactionReverted("fee mismatch".into()));

    let mut flow = ListingFlow::new(store, chain.clone(), config());
    let err = flow.create_and_list(&valid_draft()).unwrap_err();
    match err {
        FlowError::MintedUnlisted { token_id, source } => {
            assert_eq!(token_id, 9);
            assert!(matches!(source, Error::TransactionReverted(_)));
        }
        other => panic!("expected MintedUnlisted, got {other}"),
    }
    assert_eq!(flow.state(), FlowState::Aborted);

    // Recovery: relist the minted token without a second mint.
    chain.push_fee(parse_price("0.025").unwrap());
    chain.push_receipt(confirm_receipt());
    let confirmation = flow.relist(9, "2.0").unwrap();
    assert_eq!(confirmation.token_id, 9);
    assert_eq!(confirmation.price, parse_price("2.0").unwrap());
    assert_eq!(flow.state(), FlowState::Done);

    let sends = chain.sends();
    assert_eq!(sends.len(), 3); // mint, failed listing, relist
    let create_token_selector = id("createToken(string)").to_vec();
    assert!(&sends[2].data[..4] != create_token_selector.as_slice());
    assert_eq!(sends[2].to, market_address());
}
