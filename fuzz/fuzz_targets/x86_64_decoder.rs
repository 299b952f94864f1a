#![no_main]

use harc_codec::traits::InstructionDecoder;
use harc_codec::x86_64::{self, FormatterConfig, X86_64Decoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Invalid sequences may fail to decode, but must never panic
    if let Ok(decoded) = x86_64::try_decode(data) {
        assert!(decoded.size >= 1 && decoded.size <= x86_64::MAX_INSTRUCTION_LENGTH);
        let _ = decoded.instruction.to_string();
        let _ = x86_64::format_decoded(&decoded, &FormatterConfig::default().with_address(0x1000));
    }

    if data.len() >= 16 {
        let decoder = X86_64Decoder::new();
        for result in decoder.decode_block(data).into_iter().take(100) {
            if let Ok(decoded) = result {
                assert!(decoded.size > 0);
            }
        }
    }
});
