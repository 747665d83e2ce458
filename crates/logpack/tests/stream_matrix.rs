use logpack::msgpack::{
    decode_one, msgpack_to_json, unpack, DecodeStep, MsgPackEncoder, MsgPackError, MsgPackStream,
    MsgPackToJson, MsgPackVisitor, Stop, Value,
};
use proptest::prelude::*;

#[derive(Debug, Default, PartialEq)]
struct Log(Vec<String>);

impl MsgPackVisitor for Log {
    fn on_int(&mut self, val: i32) {
        self.0.push(format!("i{val}"));
    }
    fn on_uint(&mut self, val: u32) {
        self.0.push(format!("u{val}"));
    }
    fn on_longlong(&mut self, val: i64) {
        self.0.push(format!("I{val}"));
    }
    fn on_ulonglong(&mut self, val: u64) {
        self.0.push(format!("U{val}"));
    }
    fn on_double(&mut self, val: f64) {
        self.0.push(format!("d{}", val.to_bits()));
    }
    fn on_string(&mut self, bytes: &[u8]) {
        self.0.push(format!("s{}", String::from_utf8_lossy(bytes)));
    }
    fn on_nil(&mut self) {
        self.0.push("nil".into());
    }
    fn on_boolean(&mut self, val: bool) {
        self.0.push(format!("b{val}"));
    }
    fn on_array(&mut self, len: u32) {
        self.0.push(format!("a{len}"));
    }
    fn on_map(&mut self, len: u32) {
        self.0.push(format!("m{len}"));
    }
}

fn sample_log_record() -> Vec<u8> {
    let mut enc = MsgPackEncoder::new();
    enc.write_map_header(4);
    enc.write_str("ts").unwrap();
    enc.write_uint(1_700_000_000_123);
    enc.write_str("level").unwrap();
    enc.write_str("warn").unwrap();
    enc.write_str("msg").unwrap();
    enc.write_str(&"disk almost full ".repeat(4)).unwrap();
    enc.write_str("tags").unwrap();
    enc.write_array_header(3);
    enc.write_int(-40000);
    enc.write_float64(0.75);
    enc.write_nil();
    enc.flush()
}

#[test]
fn truncated_tag_then_completion() {
    let mut enc = MsgPackEncoder::new();
    enc.write_uint(70000);
    let bytes = enc.flush();
    assert_eq!(bytes, [0xce, 0x00, 0x01, 0x11, 0x70]);
    for cut in 0..bytes.len() {
        assert_eq!(decode_one(&bytes[..cut]), DecodeStep::NeedMoreData);
    }
    assert_eq!(decode_one(&bytes), DecodeStep::Consumed(5, Value::UInt(70000)));
}

#[test]
fn unpack_reports_progress_before_tail() {
    let record = sample_log_record();
    let mut doubled = record.clone();
    doubled.extend_from_slice(&record[..record.len() - 3]);
    let mut log = Log::default();
    let out = unpack(&doubled, &mut log);
    assert_eq!(out.stop, Stop::NeedMoreData);
    // The cut drops the nil and the last two bytes of the float64.
    assert_eq!(out.consumed, doubled.len() - 7);
    assert_eq!(log.0.last().map(String::as_str), Some("i-40000"));
}

#[test]
fn byte_at_a_time_matches_whole_buffer() {
    let record = sample_log_record();
    let mut whole = Log::default();
    assert!(unpack(&record, &mut whole).is_exhausted());

    let mut stream = MsgPackStream::new();
    let mut piecewise = Log::default();
    let mut total = 0;
    for b in &record {
        stream.push(std::slice::from_ref(b));
        total += stream.drain(&mut piecewise).unwrap();
    }
    assert_eq!(total, record.len());
    assert!(stream.is_empty());
    assert_eq!(piecewise, whole);
}

#[test]
fn stream_to_json_documents_appear_as_completed() {
    let record = sample_log_record();
    let mut stream = MsgPackStream::new();
    let mut conv = MsgPackToJson::new();

    stream.push(&record[..10]);
    stream.drain(&mut conv).unwrap();
    assert!(conv.take_documents().is_empty());

    stream.push(&record[10..]);
    stream.push(&[0xc3]);
    stream.drain(&mut conv).unwrap();
    let docs = conv.take_documents();
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[1], "true");

    let parsed: serde_json::Value = serde_json::from_str(&docs[0]).unwrap();
    assert_eq!(parsed["ts"], 1_700_000_000_123u64);
    assert_eq!(parsed["level"], "warn");
    assert_eq!(parsed["tags"], serde_json::json!([-40000, 0.75, null]));
    assert_eq!(msgpack_to_json(&record).unwrap(), [docs[0].clone()]);
}

#[test]
fn invalid_tag_offset_is_absolute() {
    let record = sample_log_record();
    let mut stream = MsgPackStream::new();
    let mut log = Log::default();
    stream.push(&record);
    stream.drain(&mut log).unwrap();
    stream.push(&[0x01, 0xd4, 0x00, 0x00]);
    assert_eq!(
        stream.drain(&mut log),
        Err(MsgPackError::UnsupportedTag {
            tag: 0xd4,
            offset: record.len() + 1
        })
    );
    assert_eq!(stream.offset(), record.len() + 1);
}

proptest! {
    #[test]
    fn any_split_decodes_identically(split in 0usize..=1000) {
        let record = sample_log_record();
        let split = split % (record.len() + 1);
        let mut whole = Log::default();
        prop_assert!(unpack(&record, &mut whole).is_exhausted());

        let mut stream = MsgPackStream::new();
        let mut parts = Log::default();
        stream.push(&record[..split]);
        let first = stream.drain(&mut parts).unwrap();
        prop_assert!(first <= split);
        prop_assert_eq!(stream.pending().len(), split - first);
        stream.push(&record[split..]);
        let second = stream.drain(&mut parts).unwrap();
        prop_assert_eq!(first + second, record.len());
        prop_assert_eq!(parts, whole);
    }

    #[test]
    fn chunked_ints_decode_identically(
        values in proptest::collection::vec(any::<i64>(), 1..40),
        chunk in 1usize..16,
    ) {
        let mut enc = MsgPackEncoder::new();
        for v in &values {
            enc.write_int(*v);
        }
        let bytes = enc.flush();

        let mut stream = MsgPackStream::new();
        let mut log = Log::default();
        for piece in bytes.chunks(chunk) {
            stream.push(piece);
            stream.drain(&mut log).unwrap();
        }
        prop_assert!(stream.is_empty());
        let expected: Vec<String> = values
            .iter()
            .map(|&v| {
                if i32::try_from(v).is_ok() {
                    format!("i{v}")
                } else {
                    format!("I{v}")
                }
            })
            .collect();
        prop_assert_eq!(log.0, expected);
    }
}
