use std::convert::TryInto;

use crate::TagKind;

/// Writes NBT bytes by hand, one piece at a time. Nothing is checked, so
/// tests can produce truncated or otherwise broken input as easily as valid
/// documents.
///
/// Named methods (`int`, `string`, ...) write a whole compound entry. The
/// `*_payload` methods write just the value, for list elements.
pub struct Builder {
    bytes: Vec<u8>,
}

impl Builder {
    pub fn new() -> Self {
        Builder { bytes: Vec::new() }
    }

    pub fn tag(self, kind: TagKind) -> Self {
        self.raw_bytes(&[kind as u8])
    }

    /// A u16 length prefix followed by the UTF-8 bytes.
    pub fn name(self, name: &str) -> Self {
        self.raw_str_len(name.len()).raw_bytes(name.as_bytes())
    }

    pub fn start_compound(self, name: &str) -> Self {
        self.tag(TagKind::Compound).name(name)
    }

    pub fn end_compound(self) -> Self {
        self.tag(TagKind::End)
    }

    /// Compounds inside a list have no header, this only marks where one
    /// begins.
    pub fn start_anon_compound(self) -> Self {
        self
    }

    pub fn end_anon_compound(self) -> Self {
        self.tag(TagKind::End)
    }

    pub fn start_list(self, name: &str, element: TagKind, count: i32) -> Self {
        self.tag(TagKind::List)
            .name(name)
            .start_anon_list(element, count)
    }

    pub fn start_anon_list(self, element: TagKind, count: i32) -> Self {
        self.tag(element).int_payload(count)
    }

    pub fn byte(self, name: &str, v: i8) -> Self {
        self.tag(TagKind::Byte).name(name).byte_payload(v)
    }

    pub fn short(self, name: &str, v: i16) -> Self {
        self.tag(TagKind::Short).name(name).short_payload(v)
    }

    pub fn int(self, name: &str, v: i32) -> Self {
        self.tag(TagKind::Int).name(name).int_payload(v)
    }

    pub fn long(self, name: &str, v: i64) -> Self {
        self.tag(TagKind::Long).name(name).long_payload(v)
    }

    pub fn float(self, name: &str, v: f32) -> Self {
        self.tag(TagKind::Float).name(name).raw_bytes(&v.to_be_bytes())
    }

    pub fn double(self, name: &str, v: f64) -> Self {
        self.tag(TagKind::Double).name(name).double_payload(v)
    }

    pub fn string(self, name: &str, v: &str) -> Self {
        self.tag(TagKind::String).name(name).name(v)
    }

    pub fn byte_array(self, name: &str, data: &[i8]) -> Self {
        let bytes: Vec<u8> = data.iter().map(|b| *b as u8).collect();
        self.tag(TagKind::ByteArray)
            .name(name)
            .count(data.len())
            .raw_bytes(&bytes)
    }

    pub fn int_array(self, name: &str, data: &[i32]) -> Self {
        data.iter().fold(
            self.tag(TagKind::IntArray).name(name).count(data.len()),
            |b, v| b.int_payload(*v),
        )
    }

    pub fn long_array(self, name: &str, data: &[i64]) -> Self {
        data.iter().fold(
            self.tag(TagKind::LongArray).name(name).count(data.len()),
            |b, v| b.long_payload(*v),
        )
    }

    pub fn byte_payload(self, v: i8) -> Self {
        self.raw_bytes(&v.to_be_bytes())
    }

    pub fn short_payload(self, v: i16) -> Self {
        self.raw_bytes(&v.to_be_bytes())
    }

    pub fn int_payload(self, v: i32) -> Self {
        self.raw_bytes(&v.to_be_bytes())
    }

    pub fn long_payload(self, v: i64) -> Self {
        self.raw_bytes(&v.to_be_bytes())
    }

    pub fn double_payload(self, v: f64) -> Self {
        self.raw_bytes(&v.to_be_bytes())
    }

    /// Just the u16 length of a string, so tests can lie about it.
    pub fn raw_str_len(self, len: usize) -> Self {
        let len: u16 = len.try_into().expect("string length fits in u16");
        self.raw_bytes(&len.to_be_bytes())
    }

    pub fn raw_bytes(mut self, bs: &[u8]) -> Self {
        self.bytes.extend_from_slice(bs);
        self
    }

    pub fn build(self) -> Vec<u8> {
        self.bytes
    }

    fn count(self, len: usize) -> Self {
        let len: i32 = len.try_into().expect("array length fits in i32");
        self.int_payload(len)
    }
}
