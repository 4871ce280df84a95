use super::builder::Builder;
use crate::{
    encode, encode_to_writer, ByteArray, Compound, IntArray, List, LongArray, NamedTag, TagKind,
    Value,
};

fn single(name: &str, value: Value) -> NamedTag {
    let mut compound = Compound::new();
    compound.insert(name.to_owned(), value);
    NamedTag::new("", compound)
}

#[test]
fn simple_byte() {
    let bs = encode(&single("val", Value::Byte(123))).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .byte("val", 123)
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn simple_numbers() {
    let mut compound = Compound::new();
    compound.insert("i8".to_owned(), Value::Byte(i8::MAX));
    compound.insert("i16".to_owned(), Value::Short(i16::MIN));
    compound.insert("i32".to_owned(), Value::Int(i32::MAX));
    compound.insert("i64".to_owned(), Value::Long(i64::MIN));
    compound.insert("f32".to_owned(), Value::Float(f32::MAX));
    compound.insert("f64".to_owned(), Value::Double(f64::MIN_POSITIVE));

    let bs = encode(&NamedTag::new("root", compound)).unwrap();
    let expected = Builder::new()
        .start_compound("root")
        .byte("i8", i8::MAX)
        .short("i16", i16::MIN)
        .int("i32", i32::MAX)
        .long("i64", i64::MIN)
        .float("f32", f32::MAX)
        .double("f64", f64::MIN_POSITIVE)
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn strings() {
    let bs = encode(&single("s", Value::from("pömpel"))).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .string("s", "pömpel")
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn arrays() {
    let mut compound = Compound::new();
    compound.insert("b".to_owned(), ByteArray::new(vec![1, -1]).into());
    compound.insert("i".to_owned(), IntArray::new(vec![7, 8, 9]).into());
    compound.insert("l".to_owned(), LongArray::new(vec![]).into());

    let bs = encode(&NamedTag::new("", compound)).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .byte_array("b", &[1, -1])
        .int_array("i", &[7, 8, 9])
        .long_array("l", &[])
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn list_of_compounds() {
    let mut list = List::new();
    for n in 0..2 {
        let mut item = Compound::new();
        item.insert("n".to_owned(), Value::Int(n));
        list.push(Value::Compound(item)).unwrap();
    }

    let bs = encode(&single("items", Value::List(list))).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .start_list("items", TagKind::Compound, 2)
        .start_anon_compound()
        .int("n", 0)
        .end_anon_compound()
        .start_anon_compound()
        .int("n", 1)
        .end_anon_compound()
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn empty_list_writes_declared_kind() {
    let bs = encode(&single("l", Value::List(List::of_kind(TagKind::String)))).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .start_list("l", TagKind::String, 0)
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn mixed_list_is_invalid_tree() {
    let mut list = List::from_values(vec![Value::Int(1), Value::Int(2)]).unwrap();
    *list.get_mut(1).unwrap() = Value::Byte(2);
    let tag = single("l", Value::List(list));

    let mut out = Vec::new();
    let err = encode_to_writer(&tag, &mut out).unwrap_err();
    assert!(err.is_invalid_tree());
    assert!(out.is_empty(), "nothing should be written for an invalid tree");
}

#[test]
fn nested_mixed_list_is_invalid_tree() {
    let mut inner = List::from_values(vec![Value::from("a")]).unwrap();
    *inner.get_mut(0).unwrap() = Value::Long(1);

    let mut compound = Compound::new();
    compound.insert("inner".to_owned(), Value::List(inner));
    let outer = List::from_values(vec![Value::Compound(compound)]).unwrap();

    assert!(encode(&single("outer", Value::List(outer)))
        .unwrap_err()
        .is_invalid_tree());
}

#[test]
fn overlong_string_is_invalid_tree() {
    let long = "x".repeat(u16::MAX as usize + 1);
    assert!(encode(&single("s", Value::String(long.clone())))
        .unwrap_err()
        .is_invalid_tree());
    assert!(encode(&single(&long, Value::Byte(0)))
        .unwrap_err()
        .is_invalid_tree());

    let max = "x".repeat(u16::MAX as usize);
    assert!(encode(&single("s", Value::String(max))).is_ok());
}

#[test]
fn preserves_insertion_order() {
    let mut compound = Compound::new();
    compound.insert("b".to_owned(), Value::Byte(1));
    compound.insert("a".to_owned(), Value::Byte(2));

    let bs = encode(&NamedTag::new("", compound)).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .byte("b", 1)
        .byte("a", 2)
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}

#[test]
fn nul_in_string_is_plain_utf8() {
    let bs = encode(&single("s", Value::from("a\0b"))).unwrap();
    let expected = Builder::new()
        .start_compound("")
        .tag(TagKind::String)
        .name("s")
        .raw_str_len(3)
        .raw_bytes(&[b'a', 0, b'b'])
        .end_compound()
        .build();

    assert_eq!(expected, bs);
}
