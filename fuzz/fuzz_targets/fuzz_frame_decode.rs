#![no_main]

use bytes::BytesMut;
use h2codec::{Frame, FrameDecoder, FrameEncoder, Role};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // The first byte picks the local role and whether to validate
    let Some((&mode, data)) = data.split_first() else {
        return;
    };
    let local = if mode & 1 == 0 { Role::Client } else { Role::Server };
    let decoder = FrameDecoder::for_role(local, mode & 2 == 0);
    let mut buf = BytesMut::from(data);

    // Decode frames until we run out of data or hit an error
    while let Ok(Some(frame)) = decoder.decode(&mut buf) {
        assert!(frame.payload_size() <= decoder.max_frame_size());

        match &frame {
            Frame::Headers(f) => {
                let _ = f.priority();
                let _ = f.fragment();
            }
            Frame::Settings(f) => {
                for setting in f.settings().iter() {
                    let _ = setting.id;
                    let _ = setting.value;
                }
            }
            Frame::GoAway(f) => {
                let _ = f.error_code();
                let _ = f.debug_data();
            }
            _ => {}
        }

        // A decoded frame encodes to bytes that decode to the same frame
        let mut encoded = BytesMut::new();
        FrameEncoder::new().encode(&frame, &mut encoded);
        assert_eq!(encoded.len(), frame.encoded_len());
        let reparsed = decoder
            .decode(&mut encoded)
            .expect("re-decoding an encoded frame failed");
        assert_eq!(reparsed, Some(frame), "frame roundtrip mismatch");
    }
});
