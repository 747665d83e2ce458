/// Receives one callback per decoded MessagePack value.
///
/// Array and map headers are reported as counts; their elements follow as
/// separate callbacks. Every method has an empty default so a visitor only
/// overrides the kinds it cares about.
pub trait MsgPackVisitor {
    /// Fixints and 8/16/32-bit signed tags.
    fn on_int(&mut self, _val: i32) {}
    /// 8/16/32-bit unsigned tags.
    fn on_uint(&mut self, _val: u32) {}
    /// 64-bit signed tag.
    fn on_longlong(&mut self, _val: i64) {}
    /// 64-bit unsigned tag.
    fn on_ulonglong(&mut self, _val: u64) {}
    fn on_float(&mut self, _val: f32) {}
    fn on_double(&mut self, _val: f64) {}
    /// String payload, borrowed from the decoded buffer.
    fn on_string(&mut self, _bytes: &[u8]) {}
    fn on_nil(&mut self) {}
    fn on_boolean(&mut self, _val: bool) {}
    fn on_array(&mut self, _len: u32) {}
    fn on_map(&mut self, _len: u32) {}
}

impl<V: MsgPackVisitor + ?Sized> MsgPackVisitor for &mut V {
    fn on_int(&mut self, val: i32) {
        (**self).on_int(val)
    }
    fn on_uint(&mut self, val: u32) {
        (**self).on_uint(val)
    }
    fn on_longlong(&mut self, val: i64) {
        (**self).on_longlong(val)
    }
    fn on_ulonglong(&mut self, val: u64) {
        (**self).on_ulonglong(val)
    }
    fn on_float(&mut self, val: f32) {
        (**self).on_float(val)
    }
    fn on_double(&mut self, val: f64) {
        (**self).on_double(val)
    }
    fn on_string(&mut self, bytes: &[u8]) {
        (**self).on_string(bytes)
    }
    fn on_nil(&mut self) {
        (**self).on_nil()
    }
    fn on_boolean(&mut self, val: bool) {
        (**self).on_boolean(val)
    }
    fn on_array(&mut self, len: u32) {
        (**self).on_array(len)
    }
    fn on_map(&mut self, len: u32) {
        (**self).on_map(len)
    }
}
