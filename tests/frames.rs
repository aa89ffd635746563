//! Integration tests for the frame codec.
//!
//! Frames are built the way an endpoint builds them, written with
//! `FrameEncoder`, and read back with a `FrameDecoder` configured for the
//! other end of the connection.

use bytes::{BufMut, Bytes, BytesMut};
use h2codec::frame::builder::{
    ContinuationBuilder, DataBuilder, GoAwayBuilder, HeadersBuilder, PingBuilder, PriorityBuilder,
    PushPromiseBuilder, RstStreamBuilder, SettingsBuilder, WindowUpdateBuilder,
};
use h2codec::frame::flags;
use h2codec::{
    BuildContext, ErrorCode, ErrorKind, FRAME_HEADER_SIZE, Frame, FrameBuilder, FrameDecoder,
    FrameEncoder, FrameError, FrameType, Role, SettingId, Settings, StreamId,
};

/// Context for a client sending on a stream it opened.
fn client() -> BuildContext {
    BuildContext::new(Role::Client, true)
}

/// Context for a server responding on a client stream.
fn server() -> BuildContext {
    BuildContext::new(Role::Server, false)
}

fn encode(frame: &Frame) -> BytesMut {
    let mut buf = BytesMut::new();
    FrameEncoder::new().encode(frame, &mut buf);
    buf
}

/// Write a frame as `sender` and read it back at the other endpoint.
fn roundtrip(frame: impl Into<Frame>, sender: Role) -> Frame {
    let frame = frame.into();
    let mut buf = encode(&frame);
    assert_eq!(buf.len(), frame.encoded_len());

    let decoder = FrameDecoder::for_role(sender.peer(), true);
    let decoded = decoder.decode(&mut buf).unwrap().unwrap();
    assert!(buf.is_empty());
    assert_eq!(decoded, frame);
    decoded
}

fn raw_frame(frame_type: u8, flags: u8, stream_id: u32, payload: &[u8]) -> BytesMut {
    let mut buf = BytesMut::new();
    buf.put_uint(payload.len() as u64, 3);
    buf.put_u8(frame_type);
    buf.put_u8(flags);
    buf.put_u32(stream_id);
    buf.put_slice(payload);
    buf
}

// Scenarios

#[test]
fn test_ping_ack_roundtrip() -> Result<(), FrameError> {
    let mut builder = PingBuilder::new(client());
    builder
        .set_payload_size(8)?
        .set_flags(flags::ACK)?
        .set_opaque_data(0xFEDC_BA98_7654_3210)?;
    let frame = roundtrip(builder.build()?, Role::Client);

    let Frame::Ping(ping) = frame else {
        panic!("expected PING, got {:?}", frame);
    };
    assert_eq!(ping.payload_size(), 8);
    assert_eq!(ping.flags(), flags::ACK);
    assert!(ping.is_ack());
    assert_eq!(ping.opaque_data(), 0xFEDC_BA98_7654_3210);
    Ok(())
}

#[test]
fn test_goaway_http_1_1_required() -> Result<(), FrameError> {
    let mut builder = GoAwayBuilder::new(server());
    builder
        .set_last_stream_id(1)?
        .set_error_code(ErrorCode::Http11Required)?;
    let frame = roundtrip(builder.build()?, Role::Server);

    let Frame::GoAway(goaway) = frame else {
        panic!("expected GOAWAY, got {:?}", frame);
    };
    assert_eq!(goaway.payload_size(), 8);
    assert_eq!(goaway.last_stream_id().value(), 1);
    assert_eq!(goaway.error_code(), ErrorCode::Http11Required);
    assert_eq!(goaway.raw_error_code(), 0xd);
    assert!(goaway.debug_data().is_none());
    Ok(())
}

fn padded_priority_headers(payload_size: u32) -> Result<HeadersBuilder, FrameError> {
    let mut builder = HeadersBuilder::new(client());
    builder
        .set_stream_id(3)?
        .set_payload_size(payload_size)?
        .set_flags(flags::END_STREAM | flags::PADDED | flags::END_HEADERS | flags::PRIORITY)?
        .set_pad_length(3)?
        .set_dependency_stream(2)?
        .set_weight(1)?
        .set_fragment(&b"Hello World!"[..])?;
    Ok(builder)
}

#[test]
fn test_headers_padding_priority_declared_size() -> Result<(), FrameError> {
    // 1 pad length byte + 5 priority bytes + 12 fragment bytes + 3 padding
    let err = padded_priority_headers(15)?.build().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    assert!(matches!(
        err,
        FrameError::PayloadSizeMismatch {
            declared: 15,
            computed: 21,
            ..
        }
    ));

    let frame = roundtrip(padded_priority_headers(21)?.build()?, Role::Client);
    let Frame::Headers(headers) = frame else {
        panic!("expected HEADERS, got {:?}", frame);
    };
    assert_eq!(headers.payload_size(), 21);
    assert_eq!(headers.pad_length(), Some(3));
    assert!(headers.end_stream());
    assert!(headers.end_headers());
    let priority = headers.priority().unwrap();
    assert!(!priority.exclusive);
    assert_eq!(priority.dependency.value(), 2);
    assert_eq!(priority.weight, 1);
    assert_eq!(&headers.fragment()[..], b"Hello World!");
    Ok(())
}

// Round trips per frame kind

#[test]
fn test_data_roundtrip() -> Result<(), FrameError> {
    let mut builder = DataBuilder::new(client());
    builder
        .set_stream_id(1)?
        .set_flags(flags::END_STREAM)?
        .set_data(&b"request body"[..])?;
    let frame = roundtrip(builder.build()?, Role::Client);
    assert_eq!(frame.payload_size(), 12);
    Ok(())
}

#[test]
fn test_data_padded_roundtrip() -> Result<(), FrameError> {
    let mut builder = DataBuilder::new(server());
    builder
        .set_stream_id(1)?
        .set_flags(flags::PADDED)?
        .set_pad_length(10)?
        .set_data(&b"hello"[..])?;
    let frame = roundtrip(builder.build()?, Role::Server);

    let Frame::Data(data) = frame else {
        panic!("expected DATA, got {:?}", frame);
    };
    assert_eq!(data.pad_length(), Some(10));
    assert_eq!(data.payload_size(), 1 + 5 + 10);
    assert_eq!(&data.data()[..], b"hello");
    Ok(())
}

#[test]
fn test_data_max_padding() -> Result<(), FrameError> {
    let mut builder = DataBuilder::new(client());
    builder.set_stream_id(1)?.set_flags(flags::PADDED)?;
    assert!(matches!(
        builder.set_pad_length(255),
        Err(FrameError::PadTooLong { pad_length: 255 })
    ));
    builder.set_pad_length(254)?;
    let frame = roundtrip(builder.build()?, Role::Client);
    assert_eq!(frame.payload_size(), 255);
    Ok(())
}

#[test]
fn test_headers_default_priority() -> Result<(), FrameError> {
    let mut builder = HeadersBuilder::new(server());
    builder
        .set_stream_id(1)?
        .set_flags(flags::END_HEADERS | flags::PRIORITY)?
        .set_fragment(vec![0x88])?;
    let frame = roundtrip(builder.build()?, Role::Server);

    let Frame::Headers(headers) = frame else {
        panic!("expected HEADERS, got {:?}", frame);
    };
    let priority = headers.priority().unwrap();
    assert_eq!(priority.dependency.value(), 0);
    assert_eq!(priority.weight, 15);
    assert!(!priority.exclusive);
    assert_eq!(headers.payload_size(), 6);
    Ok(())
}

#[test]
fn test_priority_roundtrip() -> Result<(), FrameError> {
    let mut builder = PriorityBuilder::new(client());
    builder
        .set_stream_id(5)?
        .set_exclusive(true)?
        .set_dependency_stream(3)?
        .set_weight(255)?;
    let frame = roundtrip(builder.build()?, Role::Client);

    let Frame::Priority(priority) = frame else {
        panic!("expected PRIORITY, got {:?}", frame);
    };
    assert!(priority.priority().exclusive);
    assert_eq!(priority.priority().dependency.value(), 3);
    assert_eq!(priority.priority().weight, 255);
    Ok(())
}

#[test]
fn test_rst_stream_roundtrip() -> Result<(), FrameError> {
    let mut builder = RstStreamBuilder::new(server());
    builder.set_stream_id(7)?.set_error_code(ErrorCode::Cancel)?;
    let frame = roundtrip(builder.build()?, Role::Server);

    let Frame::RstStream(rst) = frame else {
        panic!("expected RST_STREAM, got {:?}", frame);
    };
    assert_eq!(rst.error_code(), ErrorCode::Cancel);
    assert_eq!(rst.stream_id().value(), 7);
    Ok(())
}

#[test]
fn test_settings_roundtrip() -> Result<(), FrameError> {
    let mut builder = SettingsBuilder::new(client());
    builder.set_defaults()?;
    let settings = builder.build()?;
    assert_eq!(settings.payload_size(), 36);

    let frame = roundtrip(settings, Role::Client);
    let Frame::Settings(settings) = frame else {
        panic!("expected SETTINGS, got {:?}", frame);
    };
    assert_eq!(settings.settings(), &Settings::defaults());
    assert_eq!(
        settings.settings().get(SettingId::InitialWindowSize),
        Some(65_535)
    );
    Ok(())
}

#[test]
fn test_settings_ack() -> Result<(), FrameError> {
    let mut builder = SettingsBuilder::new(server());
    builder.set_flags(flags::ACK)?;
    let frame = roundtrip(builder.build()?, Role::Server);
    assert_eq!(frame.payload_size(), 0);

    let mut builder = SettingsBuilder::new(server());
    builder
        .set_flags(flags::ACK)?
        .set_parameter(SettingId::EnablePush, 0)?;
    let err = builder.build().unwrap_err();
    assert_eq!(err, FrameError::AckWithSettings);
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    Ok(())
}

#[test]
fn test_settings_invalid_values() {
    let mut builder = SettingsBuilder::new(client());
    assert!(builder.set_parameter(SettingId::EnablePush, 2).is_err());
    assert!(
        builder
            .set_parameter(SettingId::InitialWindowSize, 0x8000_0000)
            .is_err()
    );
    assert!(builder.set_parameter(SettingId::MaxFrameSize, 16_383).is_err());
    assert!(builder.set_parameter(SettingId::MaxFrameSize, 16_384).is_ok());
}

#[test]
fn test_push_promise_roundtrip() -> Result<(), FrameError> {
    let mut builder = PushPromiseBuilder::new(server());
    builder
        .set_stream_id(1)?
        .set_flags(flags::END_HEADERS | flags::PADDED)?
        .set_pad_length(2)?
        .set_promised_stream_id(2)?
        .set_fragment(vec![0x82, 0x87])?;
    let frame = roundtrip(builder.build()?, Role::Server);

    let Frame::PushPromise(push) = frame else {
        panic!("expected PUSH_PROMISE, got {:?}", frame);
    };
    assert_eq!(push.promised_stream_id().value(), 2);
    assert_eq!(push.pad_length(), Some(2));
    assert_eq!(push.payload_size(), 1 + 4 + 2 + 2);
    Ok(())
}

#[test]
fn test_push_promise_rules() -> Result<(), FrameError> {
    let mut builder = PushPromiseBuilder::new(server());
    assert!(builder.set_promised_stream_id(3).is_err());
    assert!(builder.set_promised_stream_id(0).is_err());
    assert!(builder.set_stream_id(2).is_err());

    let mut builder = PushPromiseBuilder::new(client());
    builder.set_stream_id(1)?.set_promised_stream_id(2)?;
    assert_eq!(builder.build().unwrap_err(), FrameError::PushFromClient);
    Ok(())
}

#[test]
fn test_window_update_roundtrip() -> Result<(), FrameError> {
    for stream_id in [0, 3] {
        let mut builder = WindowUpdateBuilder::new(client());
        builder
            .set_stream_id(stream_id)?
            .set_window_size_increment(0x7FFF_FFFF)?;
        let frame = roundtrip(builder.build()?, Role::Client);
        assert_eq!(frame.stream_id().value(), stream_id);
    }

    let mut builder = WindowUpdateBuilder::new(client());
    assert!(builder.set_window_size_increment(0).is_err());
    assert!(builder.set_window_size_increment(0x8000_0000).is_err());
    Ok(())
}

#[test]
fn test_continuation_roundtrip() -> Result<(), FrameError> {
    let mut builder = ContinuationBuilder::new(client());
    builder
        .set_stream_id(1)?
        .set_flags(flags::END_HEADERS)?
        .set_fragment(vec![0x84, 0x86])?;
    roundtrip(builder.build()?, Role::Client);
    Ok(())
}

// Builder contracts

#[test]
fn test_fixed_payload_sizes() {
    let mut ping = PingBuilder::new(client());
    let mut priority = PriorityBuilder::new(client());
    let mut rst = RstStreamBuilder::new(client());
    let mut window = WindowUpdateBuilder::new(client());

    for size in [0, 3, 7, 9, 16] {
        let errors = [
            (8, ping.set_payload_size(size).err()),
            (5, priority.set_payload_size(size).err()),
            (4, rst.set_payload_size(size).err()),
            (4, window.set_payload_size(size).err()),
        ];
        for (fixed, err) in errors {
            if size == fixed {
                assert!(err.is_none());
            } else {
                let err = err.unwrap();
                assert_eq!(err.kind(), ErrorKind::MalformedArgument);
            }
        }
    }

    assert!(ping.set_payload_size(8).is_ok());
    assert!(priority.set_payload_size(5).is_ok());
    assert!(rst.set_payload_size(4).is_ok());
    assert!(window.set_payload_size(4).is_ok());
}

#[test]
fn test_payload_size_width() {
    let mut data = DataBuilder::new(client());
    assert!(matches!(
        data.set_payload_size(1 << 24),
        Err(FrameError::FieldTooWide { bits: 24, .. })
    ));
    assert!(data.set_payload_size((1 << 24) - 1).is_ok());
}

#[test]
fn test_stream_id_width() {
    let mut ping = PingBuilder::new(client());
    assert!(matches!(
        ping.set_stream_id(0x8000_0000),
        Err(FrameError::FieldTooWide { bits: 31, .. })
    ));
}

#[test]
fn test_connection_frames_reject_stream() -> Result<(), FrameError> {
    let mut settings = SettingsBuilder::new(server());
    settings.set_stream_id(1)?;
    let mut ping = PingBuilder::new(server());
    ping.set_stream_id(1)?;
    let mut goaway = GoAwayBuilder::new(server());
    goaway.set_stream_id(1)?.set_error_code(ErrorCode::NoError)?;

    for err in [
        settings.build().unwrap_err(),
        ping.build().unwrap_err(),
        goaway.build().unwrap_err(),
    ] {
        assert!(matches!(err, FrameError::StreamIdMustBeZero { .. }));
    }
    Ok(())
}

#[test]
fn test_stream_frames_require_stream() -> Result<(), FrameError> {
    let mut priority = PriorityBuilder::new(server());
    priority.set_dependency_stream(0)?.set_weight(0)?;
    let mut rst = RstStreamBuilder::new(server());
    rst.set_error_code(ErrorCode::Cancel)?;

    let errors = [
        DataBuilder::new(server()).build().unwrap_err(),
        HeadersBuilder::new(server()).build().unwrap_err(),
        priority.build().unwrap_err(),
        rst.build().unwrap_err(),
        ContinuationBuilder::new(server()).build().unwrap_err(),
    ];
    for err in errors {
        assert!(matches!(err, FrameError::StreamIdRequired { .. }));
    }
    Ok(())
}

#[test]
fn test_request_stream_parity() {
    let mut headers = HeadersBuilder::new(client());
    assert!(matches!(
        headers.set_stream_id(2),
        Err(FrameError::StreamParity { .. })
    ));
    assert!(headers.set_stream_id(3).is_ok());

    // Responses carry no parity rule beyond non-zero.
    let mut headers = HeadersBuilder::new(server());
    assert!(headers.set_stream_id(2).is_ok());
}

#[test]
fn test_illegal_flags() {
    let mut data = DataBuilder::new(client());
    assert!(matches!(
        data.set_flags(flags::PRIORITY),
        Err(FrameError::IllegalFlags { .. })
    ));
    let mut rst = RstStreamBuilder::new(client());
    assert!(rst.set_flags(0x1).is_err());
}

#[test]
fn test_priority_without_flag() -> Result<(), FrameError> {
    let mut headers = HeadersBuilder::new(client());
    headers.set_stream_id(1)?.set_weight(10)?;
    let err = headers.build().unwrap_err();
    assert!(matches!(err, FrameError::FlagRequired { .. }));
    assert_eq!(err.kind(), ErrorKind::InvalidState);
    Ok(())
}

#[test]
fn test_error_code_clamped_when_validating() -> Result<(), FrameError> {
    let mut rst = RstStreamBuilder::new(client());
    rst.set_stream_id(1)?.set_error_code(0xFFu32)?;
    let frame = rst.build()?;
    assert_eq!(frame.raw_error_code(), ErrorCode::InternalError.to_u32());

    let mut rst = RstStreamBuilder::new(client().with_validation(false));
    rst.set_stream_id(1)?.set_error_code(0xFFu32)?;
    let frame = rst.build()?;
    assert_eq!(frame.raw_error_code(), 0xFF);
    assert_eq!(frame.error_code(), ErrorCode::InternalError);
    Ok(())
}

#[test]
fn test_validation_off_skips_checks() -> Result<(), FrameError> {
    let ctx = client().with_validation(false);

    let mut ping = PingBuilder::new(ctx);
    ping.set_stream_id(3)?.set_flags(0xff)?;
    assert_eq!(ping.build()?.stream_id().value(), 3);

    let mut headers = HeadersBuilder::new(ctx);
    headers.set_stream_id(2)?;
    assert!(headers.build().is_ok());
    Ok(())
}

#[test]
fn test_unvalidated_stray_flags_roundtrip() -> Result<(), FrameError> {
    let mut data = DataBuilder::new(client().with_validation(false));
    data.set_stream_id(1)?.set_flags(0xff)?.set_data(&b"hi"[..])?;
    let frame: Frame = data.build()?.into();
    // PADDED is among the bits, so a zero pad length byte is written.
    assert_eq!(frame.payload_size(), 3);

    let mut buf = encode(&frame);
    let decoded = FrameDecoder::for_role(Role::Server, false).decode(&mut buf)?;
    assert_eq!(decoded, Some(frame));

    // A validating reader drops the undefined bits.
    let mut buf = raw_frame(0x0, 0xff, 1, &[0x00, b'h', b'i']);
    let decoded = FrameDecoder::for_role(Role::Server, true).decode(&mut buf)?.unwrap();
    assert_eq!(decoded.flags(), flags::END_STREAM | flags::PADDED);
    Ok(())
}

// Decoder behavior

#[test]
fn test_decode_incremental() -> Result<(), FrameError> {
    let mut builder = WindowUpdateBuilder::new(client());
    builder.set_window_size_increment(1000)?;
    let frame: Frame = builder.build()?.into();
    let bytes = encode(&frame);

    let decoder = FrameDecoder::for_role(Role::Server, true);
    let mut buf = BytesMut::new();
    for (i, byte) in bytes.iter().enumerate() {
        buf.put_u8(*byte);
        let decoded = decoder.decode(&mut buf)?;
        if i + 1 < bytes.len() {
            assert!(decoded.is_none());
        } else {
            assert_eq!(decoded, Some(frame.clone()));
        }
    }
    Ok(())
}

#[test]
fn test_decode_several_frames() -> Result<(), FrameError> {
    let mut ping = PingBuilder::new(server());
    ping.set_opaque_data(1)?;
    let mut window = WindowUpdateBuilder::new(server());
    window.set_window_size_increment(5)?;

    let mut buf = encode(&ping.build()?.into());
    buf.extend_from_slice(&encode(&window.build()?.into()));

    let decoder = FrameDecoder::for_role(Role::Client, true);
    assert_eq!(decoder.decode(&mut buf)?.unwrap().frame_type(), FrameType::Ping);
    assert_eq!(
        decoder.decode(&mut buf)?.unwrap().frame_type(),
        FrameType::WindowUpdate
    );
    assert!(decoder.decode(&mut buf)?.is_none());
    Ok(())
}

#[test]
fn test_decode_skips_unknown_type() -> Result<(), FrameError> {
    let mut buf = raw_frame(0xfa, 0, 1, b"extension");
    buf.extend_from_slice(&raw_frame(0x6, 0, 0, &[0; 8]));

    let decoder = FrameDecoder::for_role(Role::Server, true);
    let frame = decoder.decode(&mut buf)?.unwrap();
    assert_eq!(frame.frame_type(), FrameType::Ping);
    assert!(buf.is_empty());
    Ok(())
}

#[test]
fn test_read_frame_unknown_type() -> Result<(), FrameError> {
    let buf = raw_frame(0x20, 0, 0, b"xyz");
    let header: [u8; FRAME_HEADER_SIZE] = buf[..FRAME_HEADER_SIZE].try_into().unwrap();

    let decoder = FrameDecoder::new();
    assert_eq!(decoder.read_frame(&header, &buf[FRAME_HEADER_SIZE..])?, None);
    Ok(())
}

#[test]
fn test_read_frame_known_type() -> Result<(), FrameError> {
    let buf = raw_frame(0x8, 0, 1, &[0, 0, 0x10, 0]);
    let header: [u8; FRAME_HEADER_SIZE] = buf[..FRAME_HEADER_SIZE].try_into().unwrap();

    let frame = FrameDecoder::new()
        .read_frame(&header, &buf[FRAME_HEADER_SIZE..])?
        .unwrap();
    let Frame::WindowUpdate(window) = frame else {
        panic!("expected WINDOW_UPDATE, got {:?}", frame);
    };
    assert_eq!(window.window_size_increment(), 4096);
    Ok(())
}

#[test]
fn test_decode_rejects_bad_fixed_length() {
    let mut buf = raw_frame(0x6, 0, 0, &[0; 10]);
    let err = FrameDecoder::new().decode(&mut buf).unwrap_err();
    assert_eq!(err.to_string(), "PING frame expected 8 bytes, got 10");
    assert_eq!(err.error_code(), ErrorCode::FrameSizeError);
}

#[test]
fn test_decode_frame_too_large() {
    let mut buf = BytesMut::new();
    buf.put_uint(16_385, 3);
    buf.put_u8(0x0);
    buf.put_u8(0);
    buf.put_u32(1);

    let err = FrameDecoder::new().decode(&mut buf).unwrap_err();
    assert!(matches!(
        err,
        FrameError::FrameTooLarge {
            size: 16_385,
            max: 16_384
        }
    ));
}

#[test]
fn test_decode_ignores_undefined_flags() -> Result<(), FrameError> {
    // END_HEADERS is not defined for PING.
    let mut buf = raw_frame(0x6, flags::ACK | flags::END_HEADERS, 0, &[0; 8]);
    let frame = FrameDecoder::new().decode(&mut buf)?.unwrap();
    assert_eq!(frame.flags(), flags::ACK);
    Ok(())
}

#[test]
fn test_decode_settings_skips_unknown_parameter() -> Result<(), FrameError> {
    let mut payload = BytesMut::new();
    payload.put_u16(0x1);
    payload.put_u32(8192);
    payload.put_u16(0x99);
    payload.put_u32(7);
    let mut buf = raw_frame(0x4, 0, 0, &payload);

    let frame = FrameDecoder::new().decode(&mut buf)?.unwrap();
    let Frame::Settings(settings) = frame else {
        panic!("expected SETTINGS, got {:?}", frame);
    };
    assert_eq!(settings.settings().len(), 1);
    assert_eq!(
        settings.settings().get(SettingId::HeaderTableSize),
        Some(8192)
    );
    assert_eq!(settings.payload_size(), 6);
    Ok(())
}

#[test]
fn test_decode_all_padding_data() -> Result<(), FrameError> {
    let mut buf = raw_frame(0x0, flags::PADDED, 1, &[4, 0, 0, 0, 0]);
    let frame = FrameDecoder::for_role(Role::Server, true)
        .decode(&mut buf)?
        .unwrap();
    let Frame::Data(data) = frame else {
        panic!("expected DATA, got {:?}", frame);
    };
    assert!(data.data().is_empty());
    assert_eq!(data.pad_length(), Some(4));
    Ok(())
}

#[test]
fn test_decode_padding_exceeds_payload() {
    let mut buf = raw_frame(0x0, flags::PADDED, 1, &[5, 0, 0, 0, 0]);
    let err = FrameDecoder::for_role(Role::Server, true)
        .decode(&mut buf)
        .unwrap_err();
    assert!(matches!(err, FrameError::InvalidPadding { .. }));
}

// Encoder helpers

#[test]
fn test_encoder_helpers_decode() -> Result<(), FrameError> {
    let encoder = FrameEncoder::with_context(server());
    let mut buf = BytesMut::new();
    encoder.encode_settings(&Settings::defaults(), &mut buf)?;
    encoder.encode_settings_ack(&mut buf)?;
    encoder.encode_ping_ack(42, &mut buf)?;
    encoder.write_window_update(StreamId::CONNECTION, 1024, &mut buf)?;
    encoder.write_rst_stream(StreamId::new(1), ErrorCode::RefusedStream, &mut buf)?;
    encoder.write_goaway(StreamId::new(3), ErrorCode::NoError, b"bye", &mut buf)?;

    let decoder = FrameDecoder::for_role(Role::Client, true);
    let mut kinds = Vec::new();
    while let Some(frame) = decoder.decode(&mut buf)? {
        kinds.push(frame.frame_type());
    }
    assert_eq!(
        kinds,
        [
            FrameType::Settings,
            FrameType::Settings,
            FrameType::Ping,
            FrameType::WindowUpdate,
            FrameType::RstStream,
            FrameType::GoAway,
        ]
    );
    Ok(())
}

#[test]
fn test_encode_to_slice() -> Result<(), FrameError> {
    let mut ping = PingBuilder::new(client());
    ping.set_opaque_data(7)?;
    let frame: Frame = ping.build()?.into();

    let mut small = [0u8; 16];
    assert!(matches!(
        FrameEncoder::new().encode_to_slice(&frame, &mut small),
        Err(FrameError::Incomplete {
            needed: 17,
            available: 16
        })
    ));

    let mut scratch = [0u8; 64];
    let written = FrameEncoder::new().encode_to_slice(&frame, &mut scratch)?;
    assert_eq!(written, 17);
    assert_eq!(&scratch[..written], &encode(&frame)[..]);
    Ok(())
}

#[test]
fn test_unvalidated_declared_size_does_not_reach_wire() -> Result<(), FrameError> {
    let mut ping = PingBuilder::new(client().with_validation(false));
    ping.set_payload_size(4)?.set_opaque_data(7)?;
    let frame: Frame = ping.build()?.into();
    assert_eq!(frame.payload_size(), 8);
    assert_eq!(frame.encoded_len(), 17);

    let mut scratch = [0u8; 64];
    let written = FrameEncoder::new().encode_to_slice(&frame, &mut scratch)?;
    assert_eq!(written, 17);
    assert_eq!(&scratch[..3], &[0, 0, 8]);

    let mut buf = BytesMut::from(&scratch[..written]);
    let decoded = FrameDecoder::for_role(Role::Server, true).decode(&mut buf)?;
    assert_eq!(decoded, Some(frame));
    Ok(())
}

#[test]
fn test_fragment_is_zero_copy() -> Result<(), FrameError> {
    let fragment = Bytes::from_static(b"\x82\x86\x84");
    let mut builder = ContinuationBuilder::new(client());
    builder.set_stream_id(1)?.set_fragment(fragment.clone())?;
    let frame = builder.build()?;
    assert_eq!(frame.fragment().as_ptr(), fragment.as_ptr());
    Ok(())
}
