use std::convert::TryFrom;

use crate::TagKind;

pub mod builder;

mod encode;
mod value;

macro_rules! check_tags {
    {$($tag:ident = $val:literal),* $(,)?} => {
        $(
            assert_eq!(u8::from(TagKind::$tag), $val);
            assert_eq!(TagKind::try_from($val as u8), Ok(TagKind::$tag));
        )*
    };
}

#[test]
fn exhaustive_tag_check() {
    check_tags! {
        End = 0,
        Byte = 1,
        Short = 2,
        Int = 3,
        Long = 4,
        Float = 5,
        Double = 6,
        ByteArray = 7,
        String = 8,
        List = 9,
        Compound = 10,
        IntArray = 11,
        LongArray = 12,
    }

    for value in 13..=u8::MAX {
        assert!(TagKind::try_from(value).is_err())
    }
}

#[test]
fn only_lists_and_compounds_are_containers() {
    for id in 0..=12u8 {
        let kind = TagKind::try_from(id).unwrap();
        assert_eq!(
            kind.is_container(),
            kind == TagKind::List || kind == TagKind::Compound
        );
    }
    assert_eq!(TagKind::ByteArray.to_string(), "TAG_Byte_Array");
}
