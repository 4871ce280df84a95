use super::builder::Builder;
use crate::{decode, Compound, List, NamedTag, TagKind, Value};

#[test]
fn list_takes_kind_of_first_value() {
    let list = List::from_values(vec![Value::Short(1), Value::Short(2)]).unwrap();
    assert_eq!(list.element_kind(), TagKind::Short);
    assert_eq!(list.len(), 2);

    let empty = List::from_values(vec![]).unwrap();
    assert_eq!(empty.element_kind(), TagKind::End);
}

#[test]
fn list_rejects_mixed_kinds() {
    let err = List::from_values(vec![Value::Int(1), Value::Byte(1)]).unwrap_err();
    assert!(err.is_invalid_tree());

    let mut list = List::of_kind(TagKind::Int);
    list.push(Value::Int(1)).unwrap();
    assert!(list.push(Value::Long(1)).is_err());
    assert!(list.insert(0, Value::from("x")).is_err());
    assert_eq!(list.len(), 1);
}

#[test]
fn empty_list_adopts_kind() {
    let mut list = List::of_kind(TagKind::Byte);
    list.push(Value::Compound(Compound::new())).unwrap();
    assert_eq!(list.element_kind(), TagKind::Compound);
}

#[test]
fn list_remove_keeps_kind() {
    let mut list = List::from_values(vec![Value::Int(1)]).unwrap();
    assert_eq!(list.remove(0), Some(Value::Int(1)));
    assert_eq!(list.remove(0), None);
    assert_eq!(list.element_kind(), TagKind::Int);
    assert!(list.check().is_ok());
}

#[test]
fn list_insert_bounds() {
    let mut list = List::from_values(vec![Value::Int(1), Value::Int(3)]).unwrap();
    list.insert(1, Value::Int(2)).unwrap();
    list.insert(3, Value::Int(4)).unwrap();
    assert!(list.insert(9, Value::Int(5)).is_err());

    let items: Vec<_> = list.iter().filter_map(Value::as_i64).collect();
    assert_eq!(items, [1, 2, 3, 4]);
}

#[test]
fn list_check() {
    let mut list = List::from_values(vec![Value::Int(1)]).unwrap();
    assert!(list.check().is_ok());
    *list.get_mut(0).unwrap() = Value::Short(1);
    assert!(list.check().unwrap_err().is_invalid_tree());
}

#[test]
fn accessors() {
    assert_eq!(Value::Byte(3).as_i64(), Some(3));
    assert_eq!(Value::Double(2.5).as_f64(), Some(2.5));
    assert_eq!(Value::Float(2.5).as_i64(), Some(2));
    assert_eq!(Value::from("s").as_str(), Some("s"));
    assert_eq!(Value::from("s").as_i64(), None);
    assert_eq!(Value::from(true), Value::Byte(1));

    assert_eq!(Value::Int(1).child_count(), None);
    assert_eq!(Value::List(List::new()).child_count(), Some(0));

    let mut c = Compound::new();
    c.insert("a".to_owned(), Value::Int(1));
    let mut v = Value::Compound(c);
    assert_eq!(v.get("a"), Some(&Value::Int(1)));
    *v.get_mut("a").unwrap() = Value::Int(2);
    assert_eq!(v.get("a"), Some(&Value::Int(2)));
    assert_eq!(Value::Int(1).get("a"), None);
}

#[test]
fn serializes_to_json_in_order() {
    let input = Builder::new()
        .start_compound("root")
        .int("z", 1)
        .string("a", "x")
        .start_list("l", TagKind::Byte, 2)
        .byte_payload(1)
        .byte_payload(2)
        .long_array("arr", &[5])
        .end_compound()
        .build();

    let tag: NamedTag = decode(&input).unwrap();
    let json = serde_json::to_string(&tag).unwrap();
    assert_eq!(
        json,
        r#"{"name":"root","compound":{"z":1,"a":"x","l":[1,2],"arr":[5]}}"#
    );
}
