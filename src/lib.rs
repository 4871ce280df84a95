//! nbtedit reads and writes NBT data from *Minecraft: Java Edition*. This
//! format is used by the game to store various things, such as the world
//! data in `level.dat` and player inventories.
//!
//! Unlike a serde based approach, everything here works on a lossless tag
//! tree so that unchanged data is written back byte for byte.
//!
//! * For the tag tree see [`Value`], [`List`] and [`NamedTag`].
//! * For the binary codec see [`decode`] and [`encode`].
//! * For gzip/zlib envelopes and files see [`compression`].
//! * For a UI-agnostic view of a tree with stable node handles see [`tree`].
//!
//! # Quick example
//!
//! Bump the spawn height of a world:
//!
//! ```no_run
//! use nbtedit::compression::NbtFile;
//! use nbtedit::tree::TreeModel;
//!
//! # fn main() -> nbtedit::error::Result<()> {
//! let file = NbtFile::open("level.dat")?;
//! let compression = file.compression;
//!
//! let mut model = TreeModel::new(file.tag);
//! let spawn = model.resolve("Data/SpawnY")?;
//! model.set_value(spawn, "100")?;
//!
//! NbtFile::new(model.into_named_tag(), compression).save("level.dat")?;
//! # Ok(())
//! # }
//! ```

pub mod compression;
pub mod decode;
pub mod encode;
pub mod error;
pub mod tree;

mod arrays;
mod value;

pub use arrays::*;
pub use decode::{
    decode, decode_reader, decode_reader_with_opts, decode_with_opts, DecodeOpts,
};
pub use encode::{encode, encode_to_writer};
pub use value::*;

#[cfg(test)]
mod test;

use std::convert::TryFrom;
use std::fmt;

/// The kind of an NBT tag. This does not carry the value or the name of the
/// data. The discriminants are the ids used on the wire.
#[derive(Debug, PartialEq, Eq, Hash, Clone, Copy)]
#[cfg_attr(feature = "arbitrary1", derive(arbitrary::Arbitrary))]
#[repr(u8)]
pub enum TagKind {
    /// Represents the end of a Compound object.
    End = 0,
    /// Equivalent to i8.
    Byte = 1,
    /// Equivalent to i16.
    Short = 2,
    /// Equivalent to i32.
    Int = 3,
    /// Equivalent to i64
    Long = 4,
    /// Equivalent to f32.
    Float = 5,
    /// Equivalent to f64.
    Double = 6,
    /// Represents as array of Byte (i8).
    ByteArray = 7,
    /// Represents a Unicode string.
    String = 8,
    /// Represents a list of other tags, all of the same kind.
    List = 9,
    /// Represents a struct-like structure.
    Compound = 10,
    /// Represents as array of Int (i32).
    IntArray = 11,
    /// Represents as array of Long (i64).
    LongArray = 12,
}

impl TagKind {
    /// Containers hold other tags rather than a value.
    pub fn is_container(self) -> bool {
        matches!(self, TagKind::List | TagKind::Compound)
    }

    /// The name used by the game and most NBT tooling, eg `TAG_Compound`.
    pub fn name(self) -> &'static str {
        match self {
            TagKind::End => "TAG_End",
            TagKind::Byte => "TAG_Byte",
            TagKind::Short => "TAG_Short",
            TagKind::Int => "TAG_Int",
            TagKind::Long => "TAG_Long",
            TagKind::Float => "TAG_Float",
            TagKind::Double => "TAG_Double",
            TagKind::ByteArray => "TAG_Byte_Array",
            TagKind::String => "TAG_String",
            TagKind::List => "TAG_List",
            TagKind::Compound => "TAG_Compound",
            TagKind::IntArray => "TAG_Int_Array",
            TagKind::LongArray => "TAG_Long_Array",
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// Written out by hand rather than pulling in a derive crate; the ids are
// fixed by the format.
impl TryFrom<u8> for TagKind {
    type Error = ();

    fn try_from(value: u8) -> Result<Self, ()> {
        use TagKind::*;
        Ok(match value {
            0 => End,
            1 => Byte,
            2 => Short,
            3 => Int,
            4 => Long,
            5 => Float,
            6 => Double,
            7 => ByteArray,
            8 => String,
            9 => List,
            10 => Compound,
            11 => IntArray,
            12 => LongArray,
            13..=u8::MAX => return Err(()),
        })
    }
}

impl From<TagKind> for u8 {
    fn from(kind: TagKind) -> Self {
        kind as u8
    }
}
