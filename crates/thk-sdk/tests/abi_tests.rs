//! ABI encoding tests for thk-sdk

use proptest::prelude::*;
use thk_sdk::abi::{
    decode, encode, extract_revert_reason, is_error_output, Abi, AbiError, ParamType, Token,
};
use thk_sdk::{Address, U256};

// ==================== Layout Tests ====================

#[test]
fn test_dynamic_layout() {
    // f(uint256, string) with (1, "hi")
    let data = encode(
        &[ParamType::Uint(256), ParamType::String],
        &[Token::uint(1), Token::string("hi")],
    )
    .unwrap();

    let words: Vec<String> = data.chunks(32).map(hex::encode).collect();
    assert_eq!(words.len(), 4);
    assert_eq!(words[0], format!("{:064x}", 1));
    assert_eq!(words[1], format!("{:064x}", 0x40));
    assert_eq!(words[2], format!("{:064x}", 2));
    assert_eq!(words[3], format!("{:0<64}", "6869"));
}

#[test]
fn test_nested_array_offsets_are_relative() {
    let ty = ParamType::Array(Box::new(ParamType::String));
    let value = Token::Array(vec![Token::string("a"), Token::string("bc")]);
    let data = encode(&[ty.clone()], &[value.clone()]).unwrap();

    // array body: length, then two offsets measured from the body's first element
    let word = |i: usize| U256::from_big_endian(&data[i * 32..(i + 1) * 32]);
    assert_eq!(word(0), U256::from(0x20));
    assert_eq!(word(1), U256::from(2));
    assert_eq!(word(2), U256::from(0x40));
    assert_eq!(word(3), U256::from(0x80));
    assert_eq!(decode(&[ty], &data).unwrap(), vec![value]);
}

#[test]
fn test_fixed_array_of_static_is_inline() {
    let ty = ParamType::FixedArray(Box::new(ParamType::Uint(8)), 3);
    let value = Token::FixedArray(vec![Token::uint(1), Token::uint(2), Token::uint(3)]);
    let data = encode(&[ty.clone()], &[value.clone()]).unwrap();
    assert_eq!(data.len(), 96);
    assert_eq!(decode(&[ty], &data).unwrap(), vec![value]);
}

#[test]
fn test_tuple_roundtrip() {
    let ty: ParamType = "(int32,string[],address)".parse().unwrap();
    let value = Token::Tuple(vec![
        Token::int(-5),
        Token::Array(vec![Token::string("x")]),
        Token::Address(Address::from_bytes([0x11; 20])),
    ]);
    let data = encode(&[ty.clone()], &[value.clone()]).unwrap();
    assert_eq!(decode(&[ty], &data).unwrap(), vec![value]);
}

// ==================== Validation Tests ====================

#[test]
fn test_encode_rejects_mismatch() {
    assert!(matches!(
        encode(&[ParamType::Uint(256)], &[]),
        Err(AbiError::ArgumentCountMismatch { expected: 1, got: 0 })
    ));
    assert!(matches!(
        encode(&[ParamType::Address], &[Token::Bool(true)]),
        Err(AbiError::ArgumentTypeMismatch { .. })
    ));
    assert!(matches!(
        encode(&[ParamType::Uint(8)], &[Token::uint(256)]),
        Err(AbiError::IntegerOverflow { .. })
    ));
}

#[test]
fn test_decode_rejects_bad_data() {
    // pointer far beyond the data
    let mut data = vec![0u8; 32];
    data[31] = 0xff;
    assert!(decode(&[ParamType::Bytes], &data).is_err());

    // bool word of 2
    let mut data = vec![0u8; 32];
    data[31] = 2;
    assert!(decode(&[ParamType::Bool], &data).is_err());

    // array claiming more elements than fit
    let mut data = vec![0u8; 64];
    data[31] = 0x20;
    data[62] = 0xff;
    assert!(decode(&[ParamType::Array(Box::new(ParamType::Uint(256)))], &data).is_err());
}

#[test]
fn test_unpack_huge_fixed_array_output() {
    let abi = Abi::from_json(
        r#"[{"type":"function","name":"big","inputs":[],
            "outputs":[{"name":"","type":"uint256[576460752303423488]"}]}]"#,
    )
    .unwrap();
    assert!(matches!(
        abi.unpack("big", &[0u8; 32]),
        Err(AbiError::OffsetOutOfRange { .. })
    ));
}

#[test]
fn test_decode_enforces_declared_width() {
    let wide = encode(&[ParamType::Uint(256)], &[Token::uint(256)]).unwrap();
    assert!(matches!(
        decode(&[ParamType::Uint(8)], &wide),
        Err(AbiError::IntegerOverflow { .. })
    ));

    let wide = encode(&[ParamType::Int(256)], &[Token::int(-129)]).unwrap();
    assert!(matches!(
        decode(&[ParamType::Int(8)], &wide),
        Err(AbiError::IntegerOverflow { .. })
    ));

    let mut padded = vec![0u8; 32];
    padded[0] = 0x12;
    padded[31] = 0x01;
    assert!(matches!(
        decode(&[ParamType::FixedBytes(4)], &padded),
        Err(AbiError::InvalidData(_))
    ));
}

// ==================== Revert Tests ====================

#[test]
fn test_revert_reason() {
    let mut out = String::from("0x08c379a0");
    out.push_str(&hex::encode(
        encode(&[ParamType::String], &[Token::string("not owner")]).unwrap(),
    ));
    assert!(is_error_output(&out));
    assert_eq!(extract_revert_reason(&out).unwrap(), "not owner");

    assert!(!is_error_output("0x"));
    assert!(extract_revert_reason("0x00").is_err());
}

// ==================== JSON ABI Tests ====================

#[test]
fn test_event_data() {
    let abi = Abi::from_json(
        r#"[{"type":"event","name":"Deposit","inputs":[
            {"name":"who","type":"address","indexed":true},
            {"name":"amount","type":"uint256","indexed":false},
            {"name":"memo","type":"string","indexed":false}]}]"#,
    )
    .unwrap();
    let event = abi.event("Deposit").unwrap();
    assert_eq!(event.signature(), "Deposit(address,uint256,string)");

    let data = encode(
        &[ParamType::Uint(256), ParamType::String],
        &[Token::uint(5), Token::string("gm")],
    )
    .unwrap();
    assert_eq!(
        event.decode_data(&data).unwrap(),
        vec![Token::uint(5), Token::string("gm")]
    );
}

// ==================== Property Tests ====================

fn static_token() -> impl Strategy<Value = (ParamType, Token)> {
    prop_oneof![
        any::<[u8; 20]>().prop_map(|b| (ParamType::Address, Token::Address(Address::from_bytes(b)))),
        any::<[u8; 32]>().prop_map(|b| (
            ParamType::Uint(256),
            Token::Uint(U256::from_big_endian(&b))
        )),
        any::<bool>().prop_map(|b| (ParamType::Bool, Token::Bool(b))),
        any::<[u8; 32]>().prop_map(|b| (ParamType::FixedBytes(32), Token::FixedBytes(b.to_vec()))),
    ]
}

fn any_token() -> impl Strategy<Value = (ParamType, Token)> {
    prop_oneof![
        static_token(),
        ".{0,80}".prop_map(|s| (ParamType::String, Token::String(s))),
        proptest::collection::vec(any::<u8>(), 0..100)
            .prop_map(|b| (ParamType::Bytes, Token::Bytes(b))),
        proptest::collection::vec(any::<u64>(), 0..6).prop_map(|v| (
            ParamType::Array(Box::new(ParamType::Uint(64))),
            Token::Array(v.into_iter().map(|x| Token::uint(x.into())).collect())
        )),
    ]
}

proptest! {
    #[test]
    fn prop_encode_decode_roundtrip(params in proptest::collection::vec(any_token(), 0..6)) {
        let (types, tokens): (Vec<_>, Vec<_>) = params.into_iter().unzip();
        let data = encode(&types, &tokens).unwrap();
        prop_assert_eq!(data.len() % 32, 0);
        prop_assert_eq!(decode(&types, &data).unwrap(), tokens);
    }
}
