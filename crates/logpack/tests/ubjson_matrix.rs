use logpack::ubjson::{UbjsonEncoder, UbjsonError};

#[test]
fn explicit_type_matrix() {
    let mut enc = UbjsonEncoder::new();
    enc.write_null();
    assert_eq!(enc.flush(), b"Z");

    enc.write_bool(true).write_bool(false);
    assert_eq!(enc.flush(), b"TF");

    enc.write_int8(-1)
        .write_uint8(2)
        .write_int16(-1)
        .write_int32(2147483647)
        .write_int64(-2);
    assert_eq!(
        enc.flush(),
        b"i\xffU\x02I\xff\xffl\x7f\xff\xff\xffL\xff\xff\xff\xff\xff\xff\xff\xfe"
    );

    enc.write_char(b'A');
    assert_eq!(enc.flush(), b"CA");

    enc.write_string("abc");
    assert_eq!(enc.flush(), b"Si\x03abc");
}

#[test]
fn write_value_matrix() {
    let mut enc = UbjsonEncoder::new();
    enc.write_value(&()).unwrap().write_value(&true).unwrap().write_value(&false).unwrap();
    assert_eq!(enc.flush(), b"ZTF");

    let cases: &[(&dyn Fn(&mut UbjsonEncoder), &[u8])] = &[
        (&|e: &mut UbjsonEncoder| { e.write_value(&-128i8).unwrap(); }, b"i\x80"),
        (&|e: &mut UbjsonEncoder| { e.write_value(&128u8).unwrap(); }, b"U\x80"),
        (&|e: &mut UbjsonEncoder| { e.write_value(&0x01ffi16).unwrap(); }, b"I\x01\xff"),
        (&|e: &mut UbjsonEncoder| { e.write_value(&0xffffu16).unwrap(); }, b"l\x00\x00\xff\xff"),
        (
            &|e: &mut UbjsonEncoder| {
                e.write_value(&0x7fff_ffffi32).unwrap().write_value(&-1i32).unwrap();
            },
            b"l\x7f\xff\xff\xffi\xff",
        ),
        (
            &|e: &mut UbjsonEncoder| {
                e.write_value(&0xffff_ffffu32).unwrap().write_value(&1u32).unwrap();
            },
            b"L\x00\x00\x00\x00\xff\xff\xff\xffi\x01",
        ),
        (
            &|e: &mut UbjsonEncoder| {
                e.write_value(&0x1234_5678_90ab_cdefi64).unwrap().write_value(&-1i64).unwrap();
            },
            b"L\x12\x34\x56\x78\x90\xab\xcd\xefi\xff",
        ),
        (
            &|e: &mut UbjsonEncoder| {
                e.write_value(&0x7234_5678_90ab_cdefu64).unwrap().write_value(&1u64).unwrap();
            },
            b"L\x72\x34\x56\x78\x90\xab\xcd\xefi\x01",
        ),
        (
            &|e: &mut UbjsonEncoder| {
                e.write_value(&1i16).unwrap().write_value(&1u16).unwrap();
            },
            b"i\x01i\x01",
        ),
        (
            &|e: &mut UbjsonEncoder| {
                e.write_value(&'A').unwrap();
            },
            b"iA",
        ),
    ];
    for (write, expected) in cases {
        let mut enc = UbjsonEncoder::new();
        write(&mut enc);
        assert_eq!(enc.flush(), *expected);
    }
}

#[test]
fn big_number_is_rejected() {
    let mut enc = UbjsonEncoder::new();
    assert_eq!(
        enc.write_value(&0x8234_5678_90ab_cdefu64).unwrap_err(),
        UbjsonError::UnsupportedBigNumber(0x8234_5678_90ab_cdef)
    );
    assert!(enc.flush().is_empty());
}

#[test]
fn objects() {
    let mut enc = UbjsonEncoder::new();
    enc.start_object().end_object();
    assert_eq!(enc.flush(), b"{}");

    enc.start_object().start_sub_object("subobj").end_object().end_object();
    assert_eq!(enc.flush(), b"{i\x06subobj{}}");
}

#[test]
fn lists() {
    let mut enc = UbjsonEncoder::new();
    enc.start_list().start_list().write_value(&1).unwrap().end_list().end_list();
    assert_eq!(enc.flush(), b"[[i\x01]]");

    enc.start_object().start_sub_list("subobj").end_list().end_object();
    assert_eq!(enc.flush(), b"{i\x06subobj[]}");
}

#[test]
fn name_value_pairs() {
    let mut enc = UbjsonEncoder::new();
    enc.start_object()
        .write_name_value("pi", &3.5f64)
        .unwrap()
        .write_name_value("who", "me")
        .unwrap()
        .write_name_value("gone", &None::<u8>)
        .unwrap()
        .end_object();
    let mut expected = b"{i\x02piD".to_vec();
    expected.extend_from_slice(&3.5f64.to_be_bytes());
    expected.extend_from_slice(b"i\x03whoSi\x02mei\x04goneZ}");
    assert_eq!(enc.flush(), expected);
}

#[test]
fn long_string_length_uses_wider_integer() {
    let text = "q".repeat(300);
    let mut enc = UbjsonEncoder::new();
    enc.write_string(&text);
    let bytes = enc.flush();
    assert_eq!(&bytes[..4], b"SI\x01\x2c");
    assert_eq!(&bytes[4..], text.as_bytes());
}
