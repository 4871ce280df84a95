//! Decoding of binary NBT into a [`NamedTag`].
//!
//! The decoder works on an in-memory slice so that every length prefix can be
//! checked against the input that remains before anything is allocated. Use
//! [`decode_reader`] for a `Read` source, and
//! [`compression`][`crate::compression`] to strip a gzip/zlib envelope first.
//!
//! ```
//! # use nbtedit::error::Result;
//! # fn main() -> Result<()> {
//! let tag = nbtedit::decode(&[0x0a, 0x00, 0x00, 0x00])?;
//! assert_eq!(tag.name, "");
//! assert!(tag.compound.is_empty());
//! # Ok(())
//! # }
//! ```
//!
//! # Leniency
//!
//! A few malformed constructs are common in real files and are accepted:
//!
//! * An End tag where the root compound should be is an empty document.
//! * A list with a count of zero or less is empty, whatever its element kind
//!   byte says. An unrecognised kind on such a list is read as End.
//! * A name repeated within one compound overwrites the earlier value.
//!
//! Everything else, including negative array lengths, is
//! [`MalformedInput`][`Error::MalformedInput`].

use std::convert::TryFrom;
use std::io::Read;

use byteorder::{BigEndian, ByteOrder};
use log::debug;

use crate::{
    error::{Error, Result},
    ByteArray, Compound, IntArray, List, LongArray, NamedTag, TagKind, Value,
};

/// Options to customize decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct DecodeOpts {
    max_depth: usize,
    max_seq_len: usize,
}

impl Default for DecodeOpts {
    fn default() -> Self {
        Self {
            max_depth: 512,
            max_seq_len: usize::MAX,
        }
    }
}

impl DecodeOpts {
    /// Create new options. This object follows a builder pattern.
    pub fn new() -> Self {
        Default::default()
    }

    /// Maximum number of nested lists and compounds below the root. Deeper
    /// input is rejected rather than risking the stack.
    pub fn max_depth(mut self, value: usize) -> Self {
        self.max_depth = value;
        self
    }

    /// Maximum number of elements in a single list or array. Length prefixes
    /// are always checked against the remaining input as well.
    pub fn max_seq_len(mut self, value: usize) -> Self {
        self.max_seq_len = value;
        self
    }
}

/// Decode a complete document from a slice.
pub fn decode(input: &[u8]) -> Result<NamedTag> {
    decode_with_opts(input, DecodeOpts::default())
}

/// Decode a complete document from a slice with the given options.
pub fn decode_with_opts(input: &[u8], opts: DecodeOpts) -> Result<NamedTag> {
    Decoder::new(input, opts).read_root()
}

/// Read `reader` to the end and decode it. Does not do decompression.
pub fn decode_reader<R: Read>(reader: R) -> Result<NamedTag> {
    decode_reader_with_opts(reader, DecodeOpts::default())
}

/// Like [`decode_reader`], bounded by `opts`.
pub fn decode_reader_with_opts<R: Read>(mut reader: R, opts: DecodeOpts) -> Result<NamedTag> {
    let mut buf = Vec::new();
    reader.read_to_end(&mut buf)?;
    decode_with_opts(&buf, opts)
}

/// Recursive descent decoder over a byte slice.
pub struct Decoder<'a> {
    data: &'a [u8],
    pos: usize,
    depth: usize,
    opts: DecodeOpts,
}

impl<'a> Decoder<'a> {
    pub fn new(data: &'a [u8], opts: DecodeOpts) -> Self {
        Self {
            data,
            pos: 0,
            depth: 0,
            opts,
        }
    }

    /// Number of bytes consumed so far.
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Read the root compound. Anything after it is left unread.
    pub fn read_root(&mut self) -> Result<NamedTag> {
        let start = self.pos;
        match self.read_kind()? {
            TagKind::Compound => {
                let name = self.read_str()?;
                let compound = self.read_compound()?;
                Ok(NamedTag { name, compound })
            }
            TagKind::End => {
                debug!("root tag is TAG_End, treating as empty document");
                Ok(NamedTag::default())
            }
            other => Err(Error::malformed(
                start,
                format!("invalid nbt: no root compound, found {}", other),
            )),
        }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.pos
    }

    fn consume(&mut self, n: usize) -> Result<&'a [u8]> {
        if n <= self.remaining() {
            let ret = &self.data[self.pos..self.pos + n];
            self.pos += n;
            Ok(ret)
        } else {
            Err(Error::unexpected_eof(self.pos, n - self.remaining()))
        }
    }

    fn read_u8(&mut self) -> Result<u8> {
        Ok(self.consume(1)?[0])
    }

    fn read_i16(&mut self) -> Result<i16> {
        Ok(BigEndian::read_i16(self.consume(2)?))
    }

    fn read_u16(&mut self) -> Result<u16> {
        Ok(BigEndian::read_u16(self.consume(2)?))
    }

    fn read_i32(&mut self) -> Result<i32> {
        Ok(BigEndian::read_i32(self.consume(4)?))
    }

    fn read_i64(&mut self) -> Result<i64> {
        Ok(BigEndian::read_i64(self.consume(8)?))
    }

    fn read_f32(&mut self) -> Result<f32> {
        Ok(BigEndian::read_f32(self.consume(4)?))
    }

    fn read_f64(&mut self) -> Result<f64> {
        Ok(BigEndian::read_f64(self.consume(8)?))
    }

    fn read_kind(&mut self) -> Result<TagKind> {
        let offset = self.pos;
        let id = self.read_u8()?;
        TagKind::try_from(id).map_err(|_| Error::invalid_tag(offset, id))
    }

    fn read_str(&mut self) -> Result<String> {
        let len = self.read_u16()? as usize;
        let offset = self.pos;
        let bytes = self.consume(len)?;

        match std::str::from_utf8(bytes) {
            Ok(s) => Ok(s.to_owned()),
            // The game writes Java's modified UTF-8, which only differs for
            // NUL and characters outside the BMP.
            Err(_) => cesu8::from_java_cesu8(bytes)
                .map(|s| s.into_owned())
                .map_err(|_| Error::nonunicode_string(offset, bytes)),
        }
    }

    /// Read an element count for an array or list and check it against the
    /// remaining input, given the smallest possible encoding of one element.
    fn read_count(&mut self, what: TagKind, min_elem_size: usize) -> Result<usize> {
        let offset = self.pos;
        let count = self.read_i32()?;
        let count = usize::try_from(count).map_err(|_| {
            Error::malformed(offset, format!("negative length {} for {}", count, what))
        })?;

        if count > self.opts.max_seq_len {
            return Err(Error::malformed(
                offset,
                format!(
                    "size ({}) greater than max sequence length ({})",
                    count, self.opts.max_seq_len
                ),
            ));
        }

        match count.checked_mul(min_elem_size) {
            Some(needed) if needed <= self.remaining() => Ok(count),
            _ => Err(Error::malformed(
                offset,
                format!(
                    "length {} for {} exceeds remaining input of {} bytes",
                    count,
                    what,
                    self.remaining()
                ),
            )),
        }
    }

    fn enter(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.opts.max_depth {
            return Err(Error::malformed(
                self.pos,
                format!("nesting deeper than {}", self.opts.max_depth),
            ));
        }
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }

    fn read_value(&mut self, kind: TagKind) -> Result<Value> {
        Ok(match kind {
            TagKind::Byte => Value::Byte(self.read_u8()? as i8),
            TagKind::Short => Value::Short(self.read_i16()?),
            TagKind::Int => Value::Int(self.read_i32()?),
            TagKind::Long => Value::Long(self.read_i64()?),
            TagKind::Float => Value::Float(self.read_f32()?),
            TagKind::Double => Value::Double(self.read_f64()?),
            TagKind::String => Value::String(self.read_str()?),
            TagKind::ByteArray => {
                let len = self.read_count(kind, 1)?;
                let bytes = self.consume(len)?;
                Value::ByteArray(ByteArray::new(bytes.iter().map(|b| *b as i8).collect()))
            }
            TagKind::IntArray => {
                let len = self.read_count(kind, 4)?;
                let mut data = vec![0i32; len];
                BigEndian::read_i32_into(self.consume(len * 4)?, &mut data);
                Value::IntArray(IntArray::new(data))
            }
            TagKind::LongArray => {
                let len = self.read_count(kind, 8)?;
                let mut data = vec![0i64; len];
                BigEndian::read_i64_into(self.consume(len * 8)?, &mut data);
                Value::LongArray(LongArray::new(data))
            }
            TagKind::List => {
                self.enter()?;
                let list = self.read_list()?;
                self.leave();
                Value::List(list)
            }
            TagKind::Compound => {
                self.enter()?;
                let compound = self.read_compound()?;
                self.leave();
                Value::Compound(compound)
            }
            // Callers only dispatch End for lists, which have no payload to
            // read and are handled in read_list.
            TagKind::End => {
                return Err(Error::malformed(self.pos, "unexpected TAG_End payload"))
            }
        })
    }

    fn read_compound(&mut self) -> Result<Compound> {
        let mut compound = Compound::new();
        loop {
            let kind = self.read_kind()?;
            if kind == TagKind::End {
                return Ok(compound);
            }

            let name = self.read_str()?;
            let value = self.read_value(kind)?;
            if let Some(old) = compound.insert(name, value) {
                debug!(
                    "duplicate compound key before byte {}, replacing {}",
                    self.pos,
                    old.kind()
                );
            }
        }
    }

    fn read_list(&mut self) -> Result<List> {
        let kind_offset = self.pos;
        let id = self.read_u8()?;
        let count_offset = self.pos;
        let count = self.read_i32()?;

        if count <= 0 {
            if count < 0 {
                debug!("list at byte {} has negative length {}", count_offset, count);
            }
            let kind = TagKind::try_from(id).unwrap_or_else(|_| {
                debug!("empty list at byte {} has unknown kind {}", kind_offset, id);
                TagKind::End
            });
            return Ok(List::of_kind(kind));
        }

        let kind = TagKind::try_from(id).map_err(|_| Error::invalid_tag(kind_offset, id))?;
        if kind == TagKind::End {
            return Err(Error::malformed(
                kind_offset,
                format!("list of TAG_End with length {}", count),
            ));
        }

        // Re-check the count now the kind is known.
        self.pos = count_offset;
        let len = self.read_count(TagKind::List, min_size(kind))?;

        let mut items = Vec::with_capacity(len);
        for _ in 0..len {
            items.push(self.read_value(kind)?);
        }
        Ok(List::from_raw(kind, items))
    }
}

/// Smallest number of bytes a payload of this kind can occupy.
fn min_size(kind: TagKind) -> usize {
    match kind {
        TagKind::End => 0,
        TagKind::Byte => 1,
        TagKind::Short => 2,
        TagKind::Int | TagKind::Float => 4,
        TagKind::Long | TagKind::Double => 8,
        TagKind::String => 2,
        TagKind::ByteArray | TagKind::IntArray | TagKind::LongArray => 4,
        TagKind::List => 5,
        TagKind::Compound => 1,
    }
}
