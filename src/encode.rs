//! Encoding of a [`NamedTag`] into binary NBT.
//!
//! The output mirrors what [`decode`][`crate::decode()`] accepts, so
//! decoding well-formed input and encoding the result gives back the same
//! bytes.
//!
//! ```
//! use nbtedit::{Compound, NamedTag, Value};
//!
//! let mut compound = Compound::new();
//! compound.insert("a".to_owned(), Value::Byte(1));
//! let bytes = nbtedit::encode(&NamedTag::new("", compound)).unwrap();
//!
//! assert_eq!(bytes, [0x0a, 0, 0, 0x01, 0, 1, b'a', 1, 0]);
//! ```

use std::convert::TryInto;
use std::io::Write;

use byteorder::{BigEndian, WriteBytesExt};

use crate::{
    error::{Error, Result},
    Compound, List, NamedTag, TagKind, Value,
};

/// Encode a document into a new buffer.
pub fn encode(tag: &NamedTag) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    encode_to_writer(tag, &mut buf)?;
    Ok(buf)
}

/// Encode a document into `writer`. Does not do compression.
///
/// The tree is checked before anything is written, so a tree that cannot be
/// encoded leaves the writer untouched.
pub fn encode_to_writer<W: Write>(tag: &NamedTag, mut writer: W) -> Result<()> {
    check_compound(&tag.compound)?;
    check_str(&tag.name)?;

    writer.write_tag(TagKind::Compound)?;
    writer.write_size_prefixed_str(&tag.name)?;
    write_compound(&mut writer, &tag.compound)?;
    Ok(())
}

/// Longest string or name, in encoded bytes, that fits the u16 length prefix.
pub(crate) const MAX_STR_LEN: usize = u16::MAX as usize;

pub(crate) trait WriteNbt: Write {
    fn write_tag(&mut self, tag: TagKind) -> Result<()> {
        self.write_u8(tag as u8)?;
        Ok(())
    }

    fn write_size_prefixed_str(&mut self, s: &str) -> Result<()> {
        let len: u16 = s
            .len()
            .try_into()
            .map_err(|_| Error::invalid_tree(format!("string of {} bytes too long", s.len())))?;
        self.write_u16::<BigEndian>(len)?;
        self.write_all(s.as_bytes())?;
        Ok(())
    }

    fn write_len(&mut self, len: usize) -> Result<()> {
        self.write_i32::<BigEndian>(
            len.try_into()
                .map_err(|_| Error::invalid_tree(format!("len {} too large", len)))?,
        )?;

        Ok(())
    }
}

impl<T> WriteNbt for T where T: Write {}

fn write_compound<W: Write>(w: &mut W, compound: &Compound) -> Result<()> {
    for (name, value) in compound {
        w.write_tag(value.kind())?;
        w.write_size_prefixed_str(name)?;
        write_payload(w, value)?;
    }
    w.write_tag(TagKind::End)
}

fn write_list<W: Write>(w: &mut W, list: &List) -> Result<()> {
    w.write_tag(list.element_kind())?;
    w.write_len(list.len())?;
    for item in list {
        write_payload(w, item)?;
    }
    Ok(())
}

fn write_payload<W: Write>(w: &mut W, value: &Value) -> Result<()> {
    match value {
        Value::Byte(v) => w.write_i8(*v)?,
        Value::Short(v) => w.write_i16::<BigEndian>(*v)?,
        Value::Int(v) => w.write_i32::<BigEndian>(*v)?,
        Value::Long(v) => w.write_i64::<BigEndian>(*v)?,
        Value::Float(v) => w.write_f32::<BigEndian>(*v)?,
        Value::Double(v) => w.write_f64::<BigEndian>(*v)?,
        Value::String(v) => w.write_size_prefixed_str(v)?,
        Value::ByteArray(v) => {
            w.write_len(v.len())?;
            let bytes: Vec<u8> = v.iter().map(|b| *b as u8).collect();
            w.write_all(&bytes)?;
        }
        Value::IntArray(v) => {
            w.write_len(v.len())?;
            for i in v.iter() {
                w.write_i32::<BigEndian>(*i)?;
            }
        }
        Value::LongArray(v) => {
            w.write_len(v.len())?;
            for l in v.iter() {
                w.write_i64::<BigEndian>(*l)?;
            }
        }
        Value::List(l) => write_list(w, l)?,
        Value::Compound(c) => write_compound(w, c)?,
    }
    Ok(())
}

fn check_str(s: &str) -> Result<()> {
    if s.len() > MAX_STR_LEN {
        return Err(Error::invalid_tree(format!(
            "string of {} bytes too long",
            s.len()
        )));
    }
    Ok(())
}

fn check_len(len: usize) -> Result<()> {
    if len > i32::MAX as usize {
        return Err(Error::invalid_tree(format!("len {} too large", len)));
    }
    Ok(())
}

fn check_compound(compound: &Compound) -> Result<()> {
    for (name, value) in compound {
        check_str(name)?;
        check_value(value)?;
    }
    Ok(())
}

pub(crate) fn check_value(value: &Value) -> Result<()> {
    match value {
        Value::String(s) => check_str(s),
        Value::ByteArray(v) => check_len(v.len()),
        Value::IntArray(v) => check_len(v.len()),
        Value::LongArray(v) => check_len(v.len()),
        Value::List(l) => {
            l.check()?;
            check_len(l.len())?;
            l.iter().try_for_each(check_value)
        }
        Value::Compound(c) => check_compound(c),
        Value::Byte(_)
        | Value::Short(_)
        | Value::Int(_)
        | Value::Long(_)
        | Value::Float(_)
        | Value::Double(_) => Ok(()),
    }
}
