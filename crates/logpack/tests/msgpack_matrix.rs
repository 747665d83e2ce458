use logpack::msgpack::{decode_one, unpack, DecodeStep, MsgPackEncoder, MsgPackVisitor, Stop, Value};
use proptest::prelude::*;

#[derive(Debug, Default)]
struct Recorder {
    calls: Vec<String>,
}

impl MsgPackVisitor for Recorder {
    fn on_int(&mut self, val: i32) {
        self.calls.push(format!("int:{val}"));
    }
    fn on_uint(&mut self, val: u32) {
        self.calls.push(format!("uint:{val}"));
    }
    fn on_longlong(&mut self, val: i64) {
        self.calls.push(format!("longlong:{val}"));
    }
    fn on_ulonglong(&mut self, val: u64) {
        self.calls.push(format!("ulonglong:{val}"));
    }
    fn on_float(&mut self, val: f32) {
        self.calls.push(format!("float:{val}"));
    }
    fn on_double(&mut self, val: f64) {
        self.calls.push(format!("double:{val}"));
    }
    fn on_string(&mut self, bytes: &[u8]) {
        self.calls.push(format!("str:{}", String::from_utf8_lossy(bytes)));
    }
    fn on_nil(&mut self) {
        self.calls.push("nil".into());
    }
    fn on_boolean(&mut self, val: bool) {
        self.calls.push(format!("bool:{val}"));
    }
    fn on_array(&mut self, len: u32) {
        self.calls.push(format!("array:{len}"));
    }
    fn on_map(&mut self, len: u32) {
        self.calls.push(format!("map:{len}"));
    }
}

fn encode_int(v: i64) -> Vec<u8> {
    let mut enc = MsgPackEncoder::new();
    enc.write_int(v);
    enc.flush()
}

fn encode_uint(v: u64) -> Vec<u8> {
    let mut enc = MsgPackEncoder::new();
    enc.write_uint(v);
    enc.flush()
}

fn decode_single(bytes: &[u8]) -> Vec<String> {
    let mut rec = Recorder::default();
    let out = unpack(bytes, &mut rec);
    assert_eq!(out.stop, Stop::Exhausted, "bytes {bytes:02x?}");
    assert_eq!(out.consumed, bytes.len());
    assert_eq!(rec.calls.len(), 1, "expected exactly one callback");
    rec.calls
}

#[test]
fn signed_integer_wire_matrix() {
    let cases: &[(i64, &[u8], &str)] = &[
        (0, &[0x00], "int:0"),
        (1, &[0x01], "int:1"),
        (127, &[0x7f], "int:127"),
        (-1, &[0xff], "int:-1"),
        (-32, &[0xe0], "int:-32"),
        (-33, &[0xd0, 0xdf], "int:-33"),
        (-128, &[0xd0, 0x80], "int:-128"),
        (128, &[0xd1, 0x00, 0x80], "int:128"),
        (255, &[0xd1, 0x00, 0xff], "int:255"),
        (256, &[0xd1, 0x01, 0x00], "int:256"),
        (32767, &[0xd1, 0x7f, 0xff], "int:32767"),
        (-129, &[0xd1, 0xff, 0x7f], "int:-129"),
        (-32768, &[0xd1, 0x80, 0x00], "int:-32768"),
        (32768, &[0xd2, 0x00, 0x00, 0x80, 0x00], "int:32768"),
        (2147483647, &[0xd2, 0x7f, 0xff, 0xff, 0xff], "int:2147483647"),
        (-32769, &[0xd2, 0xff, 0xff, 0x7f, 0xff], "int:-32769"),
        (-2147483648, &[0xd2, 0x80, 0x00, 0x00, 0x00], "int:-2147483648"),
        (
            2147483648,
            &[0xd3, 0x00, 0x00, 0x00, 0x00, 0x80, 0x00, 0x00, 0x00],
            "longlong:2147483648",
        ),
        (
            i64::MIN,
            &[0xd3, 0x80, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00],
            "longlong:-9223372036854775808",
        ),
    ];
    for (value, wire, call) in cases {
        assert_eq!(encode_int(*value), *wire, "encoding {value}");
        assert_eq!(decode_single(wire), [*call], "decoding {value}");
    }
}

#[test]
fn unsigned_integer_wire_matrix() {
    let cases: &[(u64, &[u8], &str)] = &[
        (0, &[0x00], "int:0"),
        (127, &[0x7f], "int:127"),
        (128, &[0xcc, 0x80], "uint:128"),
        (255, &[0xcc, 0xff], "uint:255"),
        (256, &[0xcd, 0x01, 0x00], "uint:256"),
        (65535, &[0xcd, 0xff, 0xff], "uint:65535"),
        (65536, &[0xce, 0x00, 0x01, 0x00, 0x00], "uint:65536"),
        (4294967295, &[0xce, 0xff, 0xff, 0xff, 0xff], "uint:4294967295"),
        (
            4294967296,
            &[0xcf, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00],
            "ulonglong:4294967296",
        ),
    ];
    for (value, wire, call) in cases {
        assert_eq!(encode_uint(*value), *wire, "encoding {value}u");
        assert_eq!(decode_single(wire), [*call], "decoding {value}u");
    }
}

#[test]
fn explicit_width_writers_keep_their_tag() {
    let mut enc = MsgPackEncoder::new();
    enc.write_int8(1);
    enc.write_int16(1);
    enc.write_int32(1);
    enc.write_uint8(1);
    enc.write_uint16(1);
    enc.write_uint32(1);
    enc.write_uint64(1);
    enc.write_int64(1);
    let bytes = enc.flush();
    let mut rec = Recorder::default();
    assert!(unpack(&bytes, &mut rec).is_exhausted());
    assert_eq!(
        rec.calls,
        ["int:1", "int:1", "int:1", "uint:1", "uint:1", "uint:1", "ulonglong:1", "longlong:1"]
    );
}

#[test]
fn container_header_matrix() {
    let cases: &[(u32, &[u8], &[u8])] = &[
        (0, &[0x90], &[0x80]),
        (15, &[0x9f], &[0x8f]),
        (16, &[0xdc, 0x00, 0x10], &[0xde, 0x00, 0x10]),
        (65535, &[0xdc, 0xff, 0xff], &[0xde, 0xff, 0xff]),
        (65536, &[0xdd, 0x00, 0x01, 0x00, 0x00], &[0xdf, 0x00, 0x01, 0x00, 0x00]),
        (u32::MAX, &[0xdd, 0xff, 0xff, 0xff, 0xff], &[0xdf, 0xff, 0xff, 0xff, 0xff]),
    ];
    for (len, array_wire, map_wire) in cases {
        let mut enc = MsgPackEncoder::new();
        enc.write_array_header(*len);
        assert_eq!(enc.flush(), *array_wire, "array header {len}");
        enc.write_map_header(*len);
        assert_eq!(enc.flush(), *map_wire, "map header {len}");
        assert_eq!(
            decode_one(array_wire),
            DecodeStep::Consumed(array_wire.len(), Value::Array(*len))
        );
        assert_eq!(
            decode_one(map_wire),
            DecodeStep::Consumed(map_wire.len(), Value::Map(*len))
        );
    }
}

#[test]
fn string_tier_matrix() {
    let cases: &[(usize, &[u8])] = &[
        (0, &[0xa0]),
        (1, &[0xa1]),
        (31, &[0xbf]),
        (32, &[0xd9, 0x20]),
        (255, &[0xd9, 0xff]),
        (256, &[0xda, 0x01, 0x00]),
        (65535, &[0xda, 0xff, 0xff]),
        (65536, &[0xdb, 0x00, 0x01, 0x00, 0x00]),
    ];
    for (len, header) in cases {
        let text = "x".repeat(*len);
        let mut enc = MsgPackEncoder::new();
        enc.write_str(&text).unwrap();
        let bytes = enc.flush();
        assert_eq!(&bytes[..header.len()], *header, "header for {len} bytes");
        assert_eq!(&bytes[header.len()..], text.as_bytes());
        assert_eq!(
            decode_one(&bytes),
            DecodeStep::Consumed(bytes.len(), Value::Str(text.as_bytes()))
        );
    }
}

#[test]
fn scalar_wire_matrix() {
    let mut enc = MsgPackEncoder::new();
    enc.write_nil();
    enc.write_bool(false);
    enc.write_bool(true);
    enc.write_float32(0.5);
    enc.write_float64(-1.25);
    let bytes = enc.flush();
    assert_eq!(
        bytes,
        [
            0xc0, 0xc2, 0xc3, 0xca, 0x3f, 0x00, 0x00, 0x00, 0xcb, 0xbf, 0xf4, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00
        ]
    );
    let mut rec = Recorder::default();
    assert!(unpack(&bytes, &mut rec).is_exhausted());
    assert_eq!(rec.calls, ["nil", "bool:false", "bool:true", "float:0.5", "double:-1.25"]);
}

#[test]
fn nested_document_replays_flat() {
    // {"a": [1, "b"], "c": nil}
    let mut enc = MsgPackEncoder::new();
    enc.write_map_header(2);
    enc.write_str("a").unwrap();
    enc.write_array_header(2);
    enc.write_int(1);
    enc.write_str("b").unwrap();
    enc.write_str("c").unwrap();
    enc.write_nil();
    let bytes = enc.flush();
    let mut rec = Recorder::default();
    let out = unpack(&bytes, &mut rec);
    assert_eq!(out.consumed, bytes.len());
    assert_eq!(rec.calls, ["map:2", "str:a", "array:2", "int:1", "str:b", "str:c", "nil"]);
}

#[test]
fn truncated_values_consume_nothing() {
    let mut enc = MsgPackEncoder::new();
    enc.write_int(-2147483648);
    enc.write_uint(4294967296);
    enc.write_float64(1.0);
    enc.write_str(&"y".repeat(300)).unwrap();
    enc.write_array_header(70000);
    let bytes = enc.flush();
    let mut offset = 0;
    while offset < bytes.len() {
        let DecodeStep::Consumed(n, _) = decode_one(&bytes[offset..]) else {
            panic!("value at {offset} did not decode");
        };
        for cut in 0..n {
            assert_eq!(
                decode_one(&bytes[offset..offset + cut]),
                DecodeStep::NeedMoreData,
                "value at {offset} cut to {cut} bytes"
            );
        }
        offset += n;
    }
}

proptest! {
    #[test]
    fn int_round_trip(v in any::<i64>()) {
        let bytes = encode_int(v);
        let decoded = match decode_one(&bytes) {
            DecodeStep::Consumed(n, value) => {
                prop_assert_eq!(n, bytes.len());
                value
            }
            other => return Err(TestCaseError::fail(format!("{other:?}"))),
        };
        let back = match decoded {
            Value::Int(x) => x as i64,
            Value::LongLong(x) => x,
            other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
        };
        prop_assert_eq!(back, v);
    }

    #[test]
    fn uint_round_trip(v in any::<u64>()) {
        let bytes = encode_uint(v);
        let back = match decode_one(&bytes) {
            DecodeStep::Consumed(_, Value::Int(x)) => {
                prop_assert!(x >= 0);
                x as u64
            }
            DecodeStep::Consumed(_, Value::UInt(x)) => x as u64,
            DecodeStep::Consumed(_, Value::ULongLong(x)) => x,
            other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
        };
        prop_assert_eq!(back, v);
    }

    #[test]
    fn double_round_trip(v in any::<f64>()) {
        let mut enc = MsgPackEncoder::new();
        enc.write_float64(v);
        let bytes = enc.flush();
        match decode_one(&bytes) {
            DecodeStep::Consumed(9, Value::Double(x)) => prop_assert_eq!(x.to_bits(), v.to_bits()),
            other => return Err(TestCaseError::fail(format!("unexpected {other:?}"))),
        }
    }

    #[test]
    fn string_round_trip(s in ".{0,300}") {
        let mut enc = MsgPackEncoder::new();
        enc.write_str(&s).unwrap();
        let bytes = enc.flush();
        prop_assert_eq!(decode_one(&bytes), DecodeStep::Consumed(bytes.len(), Value::Str(s.as_bytes())));
    }
}
