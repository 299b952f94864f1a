//! End-to-end scenarios across the decoder, encoder and printer.

use pretty_assertions::assert_eq;

use harc_codec::traits::InstructionDecoder;
use harc_codec::x86_64::instruction::AddressingMode;
use harc_codec::x86_64::{self, FormatterConfig, InstructionBuilder, X86_64Decoder};
use harc_codec::{DecodeError, DecodeErrorKind};
use harc_core::AssemblySyntax;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// push rbp; mov rbp, rsp; sub rsp, 0x10; call +0; pop rbp; ret
const PROLOGUE: &[u8] = &[
    0x55, 0x48, 0x89, 0xE5, 0x48, 0x83, 0xEC, 0x10, 0xE8, 0x00, 0x00, 0x00, 0x00, 0x5D, 0xC3,
];

fn listing(code: &[u8], base: u64, syntax: AssemblySyntax) -> Vec<String> {
    let mut lines = Vec::new();
    let mut offset = 0;
    while offset < code.len() {
        let decoded = x86_64::try_decode(&code[offset..])
            .unwrap_or_else(|e| panic!("offset {offset}: {e}"));
        let config = FormatterConfig::new(syntax).with_address(base + offset as u64);
        lines.push(x86_64::format_decoded(&decoded, &config));
        offset += decoded.size;
    }
    lines
}

#[test]
fn test_single_byte_and_prefixed_lengths() {
    init_logging();
    assert_eq!(x86_64::try_decode(&[0x50]).unwrap().size, 1);
    assert_eq!(x86_64::try_decode(&[0xF0, 0x01, 0xC0]).unwrap().size, 3);
    assert_eq!(x86_64::try_decode(&[0x0F, 0x1F, 0x00]).unwrap().size, 3);
    assert_eq!(x86_64::try_decode(&[0x50, 0xCC, 0xCC]).unwrap().size, 1);
}

#[test]
fn test_error_reporting() {
    init_logging();
    assert_eq!(x86_64::try_decode(&[]), Err(DecodeError::EmptyInput));

    let err = x86_64::try_decode(&[0xFF]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::TruncatedInstruction);
    assert_eq!(err.offset(), 1);

    let err = x86_64::try_decode(&[0x48, 0xC5, 0xF8, 0x77]).unwrap_err();
    assert_eq!(err.kind(), DecodeErrorKind::ConflictingPrefixEncoding);
    assert_eq!(err.offset(), 1);
    assert!(x86_64::decode(&[0x48, 0xC5, 0xF8, 0x77]).is_none());
}

#[test]
fn test_function_listing_intel() {
    init_logging();
    assert_eq!(
        listing(PROLOGUE, 0x1000, AssemblySyntax::Intel),
        vec![
            "push rbp",
            "mov rbp, rsp",
            "sub rsp, 0x10",
            "call 0x100d",
            "pop rbp",
            "ret",
        ]
    );
}

#[test]
fn test_function_listing_att() {
    init_logging();
    let lines = listing(&PROLOGUE[..8], 0x1000, AssemblySyntax::Att);
    assert_eq!(lines, vec!["push %rbp", "mov %rsp,%rbp", "sub $0x10,%rsp"]);
}

#[test]
fn test_listing_targets_follow_padded_branches() {
    init_logging();
    // ds-prefixed jmp to the ret; the padding stays in the listed length
    let code = [0x3E, 0x3E, 0xEB, 0x00, 0xC3];
    assert_eq!(listing(&code, 0x2000, AssemblySyntax::Intel), vec!["jmp 0x2004", "ret"]);
}

#[test]
fn test_block_decoding_resynchronizes() {
    init_logging();
    let decoder = X86_64Decoder::new();
    // ret; truncated call; the block decoder steps over the bad bytes one at a time
    let results = decoder.decode_block(&[0xC3, 0xE8, 0x00]);
    assert_eq!(results.len(), 3);
    assert!(results[0].is_ok());
    assert!(results[1].is_err());
    assert!(results[2].is_err());
}

#[test]
fn test_builder_encodes_prologue() {
    init_logging();
    let push = InstructionBuilder::new(0x50).opcode_register(5).build().unwrap();
    let mov = InstructionBuilder::new(0x89)
        .rex(true)
        .modrm(AddressingMode::Direct, 4, 5)
        .build()
        .unwrap();
    let ret = InstructionBuilder::new(0xC3).build().unwrap();

    let bytes = x86_64::encode_block(&[push, mov, ret]).unwrap();
    assert_eq!(bytes, vec![0x55, 0x48, 0x89, 0xE5, 0xC3]);
    assert_eq!(mov.to_string(), "mov rbp, rsp");
}

#[test]
fn test_reencoding_drops_redundant_prefixes() {
    init_logging();
    // Repeated segment prefixes collapse to the last one.
    let bytes = [0x2E, 0x2E, 0x90];
    let decoded = x86_64::try_decode(&bytes).unwrap();
    let encoded = x86_64::encode(&decoded.instruction).unwrap();
    assert_eq!(encoded, vec![0x2E, 0x90]);
    assert_eq!(x86_64::try_decode(&encoded).unwrap().instruction, decoded.instruction);
}

#[test]
fn test_codec_types_are_thread_safe() {
    fn assert_send_sync<T: Send + Sync>() {}
    assert_send_sync::<x86_64::Instruction>();
    assert_send_sync::<X86_64Decoder>();
    assert_send_sync::<x86_64::X86_64Encoder>();
    assert_send_sync::<FormatterConfig>();
    assert_send_sync::<DecodeError>();
}

#[cfg(feature = "serde")]
#[test]
fn test_instruction_serde_round_trip() {
    let decoded = x86_64::try_decode(&[0x62, 0xF1, 0x7C, 0xC9, 0x58, 0xC2]).unwrap();
    let json = serde_json::to_string(&decoded.instruction).unwrap();
    let back: x86_64::Instruction = serde_json::from_str(&json).unwrap();
    assert_eq!(back, decoded.instruction);

    let config = FormatterConfig::new(AssemblySyntax::Att).with_uppercase(true);
    let json = serde_json::to_string(&config).unwrap();
    assert_eq!(serde_json::from_str::<FormatterConfig>(&json).unwrap(), config);
}
