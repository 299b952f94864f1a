//! Property-based tests for the x86-64 codec.
//!
//! These tests verify invariants that should hold for arbitrary input:
//! - Decoding never panics and reports sizes within architectural bounds
//! - Decoding is deterministic
//! - Sequential decoding covers every byte exactly once
//! - Re-encoding a decoded instruction decodes back to the same record
//! - Printing never panics

use proptest::prelude::*;

use harc_codec::traits::{InstructionDecoder, InstructionEncoder};
use harc_codec::x86_64::{self, FormatterConfig, X86_64Decoder, X86_64Encoder};
use harc_codec::DecodeErrorKind;
use harc_core::AssemblySyntax;

// =============================================================================
// Decoder Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10000))]

    /// Decoding arbitrary bytes should never panic.
    #[test]
    fn decode_never_panics(bytes in prop::collection::vec(any::<u8>(), 0..32)) {
        let _ = x86_64::try_decode(&bytes);
    }

    /// Successfully decoded instructions have a valid size.
    #[test]
    fn decoded_size_is_valid(bytes in prop::collection::vec(any::<u8>(), 1..32)) {
        if let Ok(decoded) = x86_64::try_decode(&bytes) {
            prop_assert!(decoded.size >= 1, "Instruction size must be at least 1");
            prop_assert!(decoded.size <= x86_64::MAX_INSTRUCTION_LENGTH);
            prop_assert!(decoded.size <= bytes.len(), "Instruction size cannot exceed input length");
        }
    }

    /// Error offsets point inside the input, or past the length limit.
    #[test]
    fn error_offsets_are_bounded(bytes in prop::collection::vec(any::<u8>(), 1..32)) {
        if let Err(err) = x86_64::try_decode(&bytes) {
            prop_assert_ne!(err.kind(), DecodeErrorKind::EmptyInput);
            if err.kind() == DecodeErrorKind::InstructionTooLong {
                prop_assert!(err.offset() > x86_64::MAX_INSTRUCTION_LENGTH, "{err}");
            } else {
                prop_assert!(err.offset() <= bytes.len(), "{err}");
                prop_assert!(err.offset() <= x86_64::MAX_INSTRUCTION_LENGTH, "{err}");
            }
        }
    }

    /// Decoding is deterministic: same input always produces same output.
    #[test]
    fn decode_is_deterministic(bytes in prop::collection::vec(any::<u8>(), 1..32)) {
        let result1 = x86_64::try_decode(&bytes);
        let result2 = x86_64::try_decode(&bytes);
        prop_assert_eq!(result1, result2);
    }

    /// A truncated prefix of a decodable instruction is never decoded as
    /// something longer than itself.
    #[test]
    fn truncation_is_reported(bytes in prop::collection::vec(any::<u8>(), 2..32)) {
        if let Ok(decoded) = x86_64::try_decode(&bytes) {
            let short = &bytes[..decoded.size - 1];
            if let Ok(shorter) = x86_64::try_decode(short) {
                prop_assert!(shorter.size < decoded.size);
            }
        }
    }

    /// Sequential decoding covers all bytes (no gaps or overlaps).
    #[test]
    fn sequential_decode_covers_all_bytes(bytes in prop::collection::vec(any::<u8>(), 16..128)) {
        let decoder = X86_64Decoder::new();
        let mut offset = 0;
        let mut covered = vec![false; bytes.len()];

        for result in decoder.decode_block(&bytes) {
            let size = match result {
                Ok(decoded) => decoded.size,
                Err(_) => 1,
            };
            prop_assert!(size > 0, "Decoded size must be positive");
            for (i, covered_byte) in covered[offset..offset + size].iter_mut().enumerate() {
                prop_assert!(!*covered_byte, "Byte {} covered twice", offset + i);
                *covered_byte = true;
            }
            offset += size;
        }

        for (i, &c) in covered.iter().enumerate() {
            prop_assert!(c, "Byte {} was not covered", i);
        }
    }
}

// =============================================================================
// Encoder Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(10000))]

    /// decode(encode(i)) == i for every decoded instruction i.
    #[test]
    fn reencoding_is_a_fixpoint(bytes in prop::collection::vec(any::<u8>(), 1..32)) {
        if let Ok(decoded) = x86_64::try_decode(&bytes) {
            let encoded = x86_64::encode(&decoded.instruction)
                .map_err(|e| TestCaseError::fail(format!("{e} for {:02x?}", &bytes[..decoded.size])))?;
            prop_assert!(encoded.len() <= decoded.size, "{:02x?} grew to {:02x?}", &bytes[..decoded.size], encoded);

            let again = x86_64::try_decode(&encoded)
                .map_err(|e| TestCaseError::fail(format!("{e} for {encoded:02x?}")))?;
            prop_assert_eq!(again.size, encoded.len());
            prop_assert_eq!(again.instruction, decoded.instruction);
        }
    }

    /// Encoded length agrees with the encoder output and the trait encoder.
    #[test]
    fn encoded_length_matches(bytes in prop::collection::vec(any::<u8>(), 1..32)) {
        if let Ok(decoded) = x86_64::try_decode(&bytes) {
            let encoder = X86_64Encoder::new();
            let via_trait = encoder.encode(&decoded.instruction);
            let direct = x86_64::encode(&decoded.instruction);
            prop_assert_eq!(&via_trait, &direct);
            if let Ok(encoded) = direct {
                prop_assert_eq!(x86_64::encoded_length(&decoded.instruction), Ok(encoded.len()));
            }
        }
    }
}

// =============================================================================
// Printer Properties
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(5000))]

    /// Printing any decoded instruction succeeds in both syntaxes.
    #[test]
    fn printing_never_panics(
        bytes in prop::collection::vec(any::<u8>(), 1..32),
        address in any::<u64>(),
    ) {
        if let Ok(decoded) = x86_64::try_decode(&bytes) {
            let intel = decoded.instruction.to_string();
            prop_assert!(!intel.is_empty());

            let config = FormatterConfig::new(AssemblySyntax::Att).with_address(address);
            let att = x86_64::format_decoded(&decoded, &config);
            prop_assert!(!att.is_empty());
        }
    }
}

// =============================================================================
// Specific Prefix Pattern Tests
// =============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(1000))]

    /// A REX prefix directly before a legacy prefix is a conflict.
    #[test]
    fn rex_before_legacy_prefix_conflicts(
        rex in 0x40u8..=0x4F,
        legacy in prop::sample::select(vec![0x66u8, 0x67, 0xF0, 0xF2, 0xF3, 0x26, 0x2E, 0x36, 0x3E, 0x64, 0x65]),
        tail in prop::collection::vec(any::<u8>(), 0..8),
    ) {
        let mut bytes = vec![rex, legacy];
        bytes.extend(tail);
        let err = x86_64::try_decode(&bytes).unwrap_err();
        prop_assert_eq!(err.kind(), DecodeErrorKind::ConflictingPrefixEncoding);
        prop_assert_eq!(err.offset(), 1);
    }

    /// REX followed by a VEX2 or VEX3 lead byte is a conflict.
    #[test]
    fn rex_before_vex_conflicts(rex in 0x40u8..=0x4F, lead in prop::sample::select(vec![0xC4u8, 0xC5, 0x62, 0xD5])) {
        let bytes = [rex, lead, 0xF8, 0x77, 0x00, 0x00];
        let err = x86_64::try_decode(&bytes).unwrap_err();
        prop_assert_eq!(err.kind(), DecodeErrorKind::ConflictingPrefixEncoding);
    }

    /// Prefix runs never decode past fifteen bytes.
    #[test]
    fn long_prefix_runs_are_rejected(count in 15usize..24) {
        let mut bytes = vec![0x66u8; count];
        bytes.push(0x90);
        let err = x86_64::try_decode(&bytes).unwrap_err();
        prop_assert_eq!(err.kind(), DecodeErrorKind::InstructionTooLong);
    }
}
