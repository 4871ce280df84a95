use std::ops::{Deref, DerefMut};

use serde::Serialize;

macro_rules! nbt_array {
    ($(#[$meta:meta])* $name:ident, $elem:ty) => {
        $(#[$meta])*
        #[derive(Serialize, Debug, Clone, PartialEq, Default)]
        #[cfg_attr(feature = "arbitrary1", derive(arbitrary::Arbitrary))]
        #[serde(transparent)]
        pub struct $name {
            data: Vec<$elem>,
        }

        impl $name {
            pub fn new(data: Vec<$elem>) -> Self {
                Self { data }
            }

            pub fn into_inner(self) -> Vec<$elem> {
                self.data
            }
        }

        impl Deref for $name {
            type Target = Vec<$elem>;

            fn deref(&self) -> &Self::Target {
                &self.data
            }
        }

        impl DerefMut for $name {
            fn deref_mut(&mut self) -> &mut Self::Target {
                &mut self.data
            }
        }

        impl From<Vec<$elem>> for $name {
            fn from(data: Vec<$elem>) -> Self {
                Self { data }
            }
        }
    };
}

nbt_array!(
    /// Payload of a `TAG_Byte_Array`.
    ByteArray,
    i8
);
nbt_array!(
    /// Payload of a `TAG_Int_Array`.
    IntArray,
    i32
);
nbt_array!(
    /// Payload of a `TAG_Long_Array`. Chunk data packs block states into
    /// these.
    LongArray,
    i64
);
