#![no_main]

use h2codec::{HpackDecoder, HpackEncoder};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let mut decoder = HpackDecoder::new();

    // Parse errors are expected for malformed input
    let Ok(headers) = decoder.decode(data) else {
        return;
    };
    assert!(decoder.table().size() <= decoder.table().max_size());

    // Re-encoding may pick other representations but must decode to the
    // same fields, sensitivity included
    let mut encoder = HpackEncoder::new();
    let mut encoded = Vec::new();
    encoder.encode(&headers, &mut encoded);

    let decoded = HpackDecoder::new()
        .decode(&encoded)
        .expect("re-decoding an encoded header block failed");
    assert_eq!(headers, decoded, "roundtrip mismatch");
    for (orig, dec) in headers.iter().zip(&decoded) {
        assert_eq!(orig.is_sensitive(), dec.is_sensitive());
    }
});
