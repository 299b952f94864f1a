#![no_main]

use harc_codec::x86_64;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(decoded) = x86_64::try_decode(data) else {
        return;
    };

    // Every decoded instruction re-encodes, no longer than its source,
    // to bytes that decode back to the same record
    let encoded = match x86_64::encode(&decoded.instruction) {
        Ok(bytes) => bytes,
        Err(e) => panic!("{:02x?} failed to re-encode: {e}", &data[..decoded.size]),
    };
    assert!(encoded.len() <= decoded.size);

    let again = x86_64::try_decode(&encoded).expect("re-encoded bytes decode");
    assert_eq!(again.size, encoded.len());
    assert_eq!(again.instruction, decoded.instruction);
});
