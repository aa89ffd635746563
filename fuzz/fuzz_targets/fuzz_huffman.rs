#![no_main]

use h2codec::hpack::huffman;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Arbitrary input must decode or fail cleanly
    let mut out = Vec::new();
    let _ = huffman::decode(data, &mut out);

    // Encoding is always reversible
    let mut encoded = Vec::new();
    huffman::encode(data, &mut encoded);
    assert_eq!(encoded.len(), huffman::encoded_len(data));

    let mut decoded = Vec::new();
    huffman::decode(&encoded, &mut decoded).expect("encoded data failed to decode");
    assert_eq!(decoded, data);
});
