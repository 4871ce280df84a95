use indexmap::IndexMap;
use serde::{ser::SerializeSeq, Serialize, Serializer};

use crate::{
    error::{Error, Result},
    ByteArray, IntArray, LongArray, TagKind,
};

/// The children of a compound tag. Keeps insertion order so that unchanged
/// data is written back in the order it was read. Inserting an existing name
/// replaces the value in place.
pub type Compound = IndexMap<String, Value>;

/// Value is a complete NBT value. It owns its data. Compounds and Lists are
/// recursively owned by their parent, there is no sharing.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Byte(i8),
    Short(i16),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    ByteArray(ByteArray),
    String(String),
    List(List),
    Compound(Compound),
    IntArray(IntArray),
    LongArray(LongArray),
}

/// The root of an NBT document: a named compound. The name is usually the
/// empty string.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct NamedTag {
    pub name: String,
    pub compound: Compound,
}

impl NamedTag {
    pub fn new(name: impl Into<String>, compound: Compound) -> Self {
        Self {
            name: name.into(),
            compound,
        }
    }
}

/// A list of unnamed tags that all share one kind.
///
/// An empty list may be tagged with any kind, including `End`. Real files
/// contain empty lists of `End` and of `Byte`, and these are kept as they are
/// so the list is written back unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    kind: TagKind,
    items: Vec<Value>,
}

impl Default for List {
    fn default() -> Self {
        Self::new()
    }
}

impl List {
    /// An empty list of `End`.
    pub fn new() -> Self {
        Self::of_kind(TagKind::End)
    }

    /// An empty list declared to hold `kind`.
    pub fn of_kind(kind: TagKind) -> Self {
        Self {
            kind,
            items: Vec::new(),
        }
    }

    /// Build a list from values, taking the element kind from the first one.
    /// Fails if the values do not all share that kind.
    pub fn from_values(items: Vec<Value>) -> Result<Self> {
        let mut list = List::new();
        for item in items {
            list.push(item)?;
        }
        Ok(list)
    }

    /// Caller guarantees `items` all have kind `kind`.
    pub(crate) fn from_raw(kind: TagKind, items: Vec<Value>) -> Self {
        Self { kind, items }
    }

    pub fn element_kind(&self) -> TagKind {
        self.kind
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Append a value. An empty list takes on the kind of the value it is
    /// given; a non-empty list rejects any other kind.
    pub fn push(&mut self, value: Value) -> Result<()> {
        self.accept(&value)?;
        self.items.push(value);
        Ok(())
    }

    /// Insert at `index`, shifting later elements. Same kind rules as `push`.
    pub fn insert(&mut self, index: usize, value: Value) -> Result<()> {
        if index > self.items.len() {
            return Err(Error::invalid_tree(format!(
                "list insert index {} out of bounds (len {})",
                index,
                self.items.len()
            )));
        }
        self.accept(&value)?;
        self.items.insert(index, value);
        Ok(())
    }

    /// Remove the element at `index`. The declared kind is kept even if the
    /// list becomes empty.
    pub fn remove(&mut self, index: usize) -> Option<Value> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    pub fn get(&self, index: usize) -> Option<&Value> {
        self.items.get(index)
    }

    /// Mutable access to an element. Replacing it with a value of another
    /// kind makes the list unencodable, which the encoder reports.
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Value> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Value> {
        self.items.iter_mut()
    }

    /// Check every element has the declared kind.
    pub fn check(&self) -> Result<()> {
        if self.kind == TagKind::End && !self.items.is_empty() {
            return Err(Error::invalid_tree("non-empty list of TAG_End"));
        }
        match self.items.iter().position(|v| v.kind() != self.kind) {
            Some(i) => Err(Error::invalid_tree(format!(
                "list of {} has a {} at index {}",
                self.kind,
                self.items[i].kind(),
                i
            ))),
            None => Ok(()),
        }
    }

    fn accept(&mut self, value: &Value) -> Result<()> {
        let kind = value.kind();
        if self.items.is_empty() {
            self.kind = kind;
            Ok(())
        } else if kind == self.kind {
            Ok(())
        } else {
            Err(Error::invalid_tree(format!(
                "cannot add {} to a list of {}",
                kind, self.kind
            )))
        }
    }
}

impl<'a> IntoIterator for &'a List {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl IntoIterator for List {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

impl Value {
    pub fn kind(&self) -> TagKind {
        match self {
            Value::Byte(_) => TagKind::Byte,
            Value::Short(_) => TagKind::Short,
            Value::Int(_) => TagKind::Int,
            Value::Long(_) => TagKind::Long,
            Value::Float(_) => TagKind::Float,
            Value::Double(_) => TagKind::Double,
            Value::ByteArray(_) => TagKind::ByteArray,
            Value::String(_) => TagKind::String,
            Value::List(_) => TagKind::List,
            Value::Compound(_) => TagKind::Compound,
            Value::IntArray(_) => TagKind::IntArray,
            Value::LongArray(_) => TagKind::LongArray,
        }
    }

    pub fn is_container(&self) -> bool {
        self.kind().is_container()
    }

    /// Number of children for lists and compounds.
    pub fn child_count(&self) -> Option<usize> {
        match self {
            Value::List(l) => Some(l.len()),
            Value::Compound(c) => Some(c.len()),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match *self {
            Value::Byte(v) => Some(v as i64),
            Value::Short(v) => Some(v as i64),
            Value::Int(v) => Some(v as i64),
            Value::Long(v) => Some(v),
            Value::Float(v) => Some(v as i64),
            Value::Double(v) => Some(v as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Value::Byte(v) => Some(v as f64),
            Value::Short(v) => Some(v as f64),
            Value::Int(v) => Some(v as f64),
            Value::Long(v) => Some(v as f64),
            Value::Float(v) => Some(v as f64),
            Value::Double(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&List> {
        match self {
            Value::List(l) => Some(l),
            _ => None,
        }
    }

    pub fn as_compound(&self) -> Option<&Compound> {
        match self {
            Value::Compound(c) => Some(c),
            _ => None,
        }
    }

    /// Look up a child of a compound by name.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.as_compound()?.get(name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        match self {
            Value::Compound(c) => c.get_mut(name),
            _ => None,
        }
    }
}

impl Serialize for Value {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Value::Byte(v) => serializer.serialize_i8(*v),
            Value::Short(v) => serializer.serialize_i16(*v),
            Value::Int(v) => serializer.serialize_i32(*v),
            Value::Long(v) => serializer.serialize_i64(*v),
            Value::Float(v) => serializer.serialize_f32(*v),
            Value::Double(v) => serializer.serialize_f64(*v),
            Value::ByteArray(v) => v.serialize(serializer),
            Value::String(v) => serializer.serialize_str(v),
            Value::List(v) => v.serialize(serializer),
            Value::Compound(v) => v.serialize(serializer),
            Value::IntArray(v) => v.serialize(serializer),
            Value::LongArray(v) => v.serialize(serializer),
        }
    }
}

impl Serialize for List {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut seq = serializer.serialize_seq(Some(self.items.len()))?;
        for item in &self.items {
            seq.serialize_element(item)?;
        }
        seq.end()
    }
}

// ------------- From<T> impls -------------

macro_rules! from {
    ($type:ty, $variant:ident $(, $($part:tt)+)?) => {
        impl From<$type> for Value {
            fn from(val: $type) -> Self {
                Self::$variant(val$($($part)+)?)
            }
        }
    };
}
from!(i8, Byte);
from!(i16, Short);
from!(i32, Int);
from!(i64, Long);
from!(f32, Float);
from!(f64, Double);
from!(String, String);
from!(&str, String, .to_owned());
from!(ByteArray, ByteArray);
from!(IntArray, IntArray);
from!(LongArray, LongArray);
from!(List, List);
from!(Compound, Compound);

impl From<bool> for Value {
    fn from(val: bool) -> Self {
        Self::Byte(i8::from(val))
    }
}

#[cfg(feature = "arbitrary1")]
fn arb_items<'a, T, F>(u: &mut arbitrary::Unstructured<'a>, f: F) -> arbitrary::Result<Vec<Value>>
where
    F: FnMut(T) -> Value,
    T: arbitrary::Arbitrary<'a>,
{
    Ok(u.arbitrary_iter::<T>()?
        .collect::<arbitrary::Result<Vec<_>>>()?
        .into_iter()
        .map(f)
        .collect())
}

#[cfg(feature = "arbitrary1")]
fn arb_compound(u: &mut arbitrary::Unstructured) -> arbitrary::Result<Compound> {
    let mut compound = Compound::new();
    for _ in 0..u.arbitrary_len::<(String, Value)>()? {
        let name: String = u.arbitrary()?;
        compound.insert(name, u.arbitrary()?);
    }
    Ok(compound)
}

#[cfg(feature = "arbitrary1")]
impl<'a> arbitrary::Arbitrary<'a> for List {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        use Value::*;

        let kind = u.arbitrary::<TagKind>()?;
        let items = match kind {
            TagKind::End => vec![],
            TagKind::Byte => arb_items(u, Byte)?,
            TagKind::Short => arb_items(u, Short)?,
            TagKind::Int => arb_items(u, Int)?,
            TagKind::Long => arb_items(u, Long)?,
            TagKind::Float => arb_items(u, Float)?,
            TagKind::Double => arb_items(u, Double)?,
            TagKind::ByteArray => arb_items(u, ByteArray)?,
            TagKind::String => arb_items(u, String)?,
            TagKind::List => arb_items(u, List)?,
            TagKind::Compound => {
                let mut v = vec![];
                for _ in 0..u.arbitrary_len::<Value>()? {
                    v.push(Compound(arb_compound(u)?));
                }
                v
            }
            TagKind::IntArray => arb_items(u, IntArray)?,
            TagKind::LongArray => arb_items(u, LongArray)?,
        };
        Ok(crate::List::from_raw(kind, items))
    }
}

#[cfg(feature = "arbitrary1")]
impl<'a> arbitrary::Arbitrary<'a> for Value {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        use Value::*;

        Ok(match u.arbitrary::<TagKind>()? {
            TagKind::End => return Err(arbitrary::Error::IncorrectFormat),
            TagKind::Byte => Byte(u.arbitrary()?),
            TagKind::Short => Short(u.arbitrary()?),
            TagKind::Int => Int(u.arbitrary()?),
            TagKind::Long => Long(u.arbitrary()?),
            TagKind::Float => Float(u.arbitrary()?),
            TagKind::Double => Double(u.arbitrary()?),
            TagKind::ByteArray => ByteArray(u.arbitrary()?),
            TagKind::String => String(u.arbitrary()?),
            TagKind::List => List(u.arbitrary()?),
            TagKind::Compound => Compound(arb_compound(u)?),
            TagKind::IntArray => IntArray(u.arbitrary()?),
            TagKind::LongArray => LongArray(u.arbitrary()?),
        })
    }
}

#[cfg(feature = "arbitrary1")]
impl<'a> arbitrary::Arbitrary<'a> for NamedTag {
    fn arbitrary(u: &mut arbitrary::Unstructured<'a>) -> arbitrary::Result<Self> {
        Ok(NamedTag {
            name: u.arbitrary()?,
            compound: arb_compound(u)?,
        })
    }
}
