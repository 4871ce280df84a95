//! A UI-agnostic view of a tag tree.
//!
//! [`TreeModel`] owns a [`NamedTag`] and hands out [`NodeId`] handles for
//! every node in it. A presentation layer reads names, values and children
//! through these handles and edits the tree through the model, never by
//! holding references into the tree itself.
//!
//! Handles are never reused. Once a node is deleted, or the whole tree is
//! replaced, its handle and the handles of everything below it fail with
//! [`InvalidNode`][`Error::InvalidNode`] instead of pointing at some other
//! node.
//!
//! ```
//! use nbtedit::tree::TreeModel;
//! use nbtedit::{Compound, NamedTag, Value};
//!
//! # fn main() -> nbtedit::error::Result<()> {
//! let mut compound = Compound::new();
//! compound.insert("health".to_owned(), Value::Float(20.0));
//!
//! let mut model = TreeModel::new(NamedTag::new("", compound));
//! let health = model.resolve("health")?;
//! model.set_value(health, "12.5")?;
//!
//! assert_eq!(model.display_value(health)?, "12.5");
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use log::debug;

use crate::{
    encode::{check_value, MAX_STR_LEN},
    error::{Error, Result},
    ByteArray, Compound, IntArray, List, LongArray, NamedTag, TagKind, Value,
};

/// Handle to one node of a [`TreeModel`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

#[derive(Debug)]
struct Node {
    parent: Option<NodeId>,
    /// Position among the parent's children.
    index: usize,
    children: Vec<NodeId>,
}

/// Shape of the tag tree, keyed by handle. Children are kept in the same
/// order as in the compound or list they mirror, and every node knows its
/// own position so that finding a node costs one step per level.
#[derive(Debug, Default)]
struct NodeTable {
    nodes: HashMap<NodeId, Node>,
    next: u64,
}

impl NodeTable {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId(self.next);
        self.next += 1;
        id
    }

    fn register_root(&mut self, compound: &Compound) -> NodeId {
        let id = self.next_id();
        let children = compound
            .values()
            .enumerate()
            .map(|(i, v)| self.register(id, i, v))
            .collect();
        self.nodes.insert(
            id,
            Node {
                parent: None,
                index: 0,
                children,
            },
        );
        id
    }

    fn register(&mut self, parent: NodeId, index: usize, value: &Value) -> NodeId {
        let id = self.next_id();
        let children = match value {
            Value::Compound(c) => c
                .values()
                .enumerate()
                .map(|(i, v)| self.register(id, i, v))
                .collect(),
            Value::List(l) => l
                .iter()
                .enumerate()
                .map(|(i, v)| self.register(id, i, v))
                .collect(),
            _ => Vec::new(),
        };
        self.nodes.insert(
            id,
            Node {
                parent: Some(parent),
                index,
                children,
            },
        );
        id
    }

    /// Register `value` as the last child of `parent`.
    fn append(&mut self, parent: NodeId, value: &Value) -> Result<NodeId> {
        let index = self.get(parent)?.children.len();
        let id = self.register(parent, index, value);
        self.get_mut(parent)?.children.push(id);
        Ok(id)
    }

    /// Drop the child at `pos` of `parent` and everything below it, moving
    /// later siblings up.
    fn detach(&mut self, parent: NodeId, pos: usize) -> Result<()> {
        let siblings = &mut self.get_mut(parent)?.children;
        if pos >= siblings.len() {
            return Err(out_of_sync());
        }
        let id = siblings.remove(pos);
        let later: Vec<NodeId> = siblings[pos..].to_vec();

        for sibling in later {
            self.get_mut(sibling)?.index -= 1;
        }
        self.forget(id);
        Ok(())
    }

    fn forget(&mut self, id: NodeId) {
        if let Some(node) = self.nodes.remove(&id) {
            for child in node.children {
                self.forget(child);
            }
        }
    }

    fn get(&self, id: NodeId) -> Result<&Node> {
        self.nodes
            .get(&id)
            .ok_or_else(|| Error::invalid_node(format!("{:?} is stale or unknown", id)))
    }

    fn get_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes
            .get_mut(&id)
            .ok_or_else(|| Error::invalid_node(format!("{:?} is stale or unknown", id)))
    }

    /// Parent of `id` and the position of `id` among its children.
    fn position(&self, id: NodeId) -> Result<(NodeId, usize)> {
        let node = self.get(id)?;
        let parent = node
            .parent
            .ok_or_else(|| Error::invalid_node("the root compound has no parent"))?;
        Ok((parent, node.index))
    }

    /// Child positions leading from the root to `id`.
    fn path(&self, id: NodeId) -> Result<Vec<usize>> {
        let mut path = Vec::new();
        let mut node = self.get(id)?;
        while let Some(parent) = node.parent {
            path.push(node.index);
            node = self.get(parent)?;
        }
        path.reverse();
        Ok(path)
    }
}

fn out_of_sync() -> Error {
    Error::invalid_node("node table does not match the tag tree")
}

/// A node's name: a compound key, or an index into a list.
enum Label<'a> {
    Name(&'a str),
    Index(usize),
}

impl Label<'_> {
    fn text(&self) -> Cow<'_, str> {
        match self {
            Label::Name(n) => Cow::Borrowed(n),
            Label::Index(i) => Cow::Owned(i.to_string()),
        }
    }
}

enum Located<'a> {
    Root(&'a NamedTag),
    Child { label: Label<'a>, value: &'a Value },
}

enum ContainerMut<'a> {
    Compound(&'a mut Compound),
    List(&'a mut List),
}

fn nth_child(value: &Value, pos: usize) -> Option<(Label<'_>, &Value)> {
    match value {
        Value::Compound(c) => c.get_index(pos).map(|(k, v)| (Label::Name(k), v)),
        Value::List(l) => l.get(pos).map(|v| (Label::Index(pos), v)),
        _ => None,
    }
}

fn nth_child_mut(value: &mut Value, pos: usize) -> Option<&mut Value> {
    match value {
        Value::Compound(c) => c.get_index_mut(pos).map(|(_, v)| v),
        Value::List(l) => l.get_mut(pos),
        _ => None,
    }
}

/// Owns a tag tree and exposes it as a generic hierarchy of nodes with a
/// name, a display value and ordered children.
#[derive(Debug)]
pub struct TreeModel {
    tag: NamedTag,
    table: NodeTable,
    root: NodeId,
}

impl TreeModel {
    pub fn new(tag: NamedTag) -> Self {
        let mut table = NodeTable::default();
        let root = table.register_root(&tag.compound);
        Self { tag, table, root }
    }

    /// Swap in a new tree, returning the old one. Every handle issued before
    /// the call becomes invalid.
    pub fn replace(&mut self, tag: NamedTag) -> NamedTag {
        self.table.nodes.clear();
        self.root = self.table.register_root(&tag.compound);
        debug!("tree replaced, {} nodes", self.table.nodes.len());
        std::mem::replace(&mut self.tag, tag)
    }

    /// Drop the current tree in favour of an empty one, returning it.
    pub fn close(&mut self) -> NamedTag {
        self.replace(NamedTag::default())
    }

    pub fn named_tag(&self) -> &NamedTag {
        &self.tag
    }

    pub fn into_named_tag(self) -> NamedTag {
        self.tag
    }

    /// Encode the current tree.
    pub fn encode(&self) -> Result<Vec<u8>> {
        crate::encode(&self.tag)
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Whether `id` refers to a node in the current tree.
    pub fn contains(&self, id: NodeId) -> bool {
        self.table.nodes.contains_key(&id)
    }

    fn locate(&self, id: NodeId) -> Result<Located<'_>> {
        let path = self.table.path(id)?;
        let (first, rest) = match path.split_first() {
            Some(split) => split,
            None => return Ok(Located::Root(&self.tag)),
        };

        let (name, mut value) = self.tag.compound.get_index(*first).ok_or_else(out_of_sync)?;
        let mut label = Label::Name(name);
        for pos in rest {
            let (l, v) = nth_child(value, *pos).ok_or_else(out_of_sync)?;
            label = l;
            value = v;
        }
        Ok(Located::Child { label, value })
    }

    fn value_mut(&mut self, id: NodeId) -> Result<&mut Value> {
        let path = self.table.path(id)?;
        let (first, rest) = path
            .split_first()
            .ok_or_else(|| Error::invalid_node("the root compound has no value"))?;

        let mut value = self
            .tag
            .compound
            .get_index_mut(*first)
            .map(|(_, v)| v)
            .ok_or_else(out_of_sync)?;
        for pos in rest {
            value = nth_child_mut(value, *pos).ok_or_else(out_of_sync)?;
        }
        Ok(value)
    }

    fn container_mut(&mut self, id: NodeId) -> Result<ContainerMut<'_>> {
        if id == self.root {
            return Ok(ContainerMut::Compound(&mut self.tag.compound));
        }
        match self.value_mut(id)? {
            Value::Compound(c) => Ok(ContainerMut::Compound(c)),
            Value::List(l) => Ok(ContainerMut::List(l)),
            other => Err(Error::invalid_node(format!(
                "{} is not a container",
                other.kind()
            ))),
        }
    }

    /// Read-only access to the value of a node. The root compound is not a
    /// `Value`; use [`named_tag`][`Self::named_tag`] for it.
    pub fn value(&self, id: NodeId) -> Result<&Value> {
        match self.locate(id)? {
            Located::Root(_) => Err(Error::invalid_node("the root compound has no value")),
            Located::Child { value, .. } => Ok(value),
        }
    }

    pub fn kind(&self, id: NodeId) -> Result<TagKind> {
        Ok(match self.locate(id)? {
            Located::Root(_) => TagKind::Compound,
            Located::Child { value, .. } => value.kind(),
        })
    }

    /// The raw name: a compound key, a list index, or the root's name.
    pub fn name(&self, id: NodeId) -> Result<String> {
        Ok(match self.locate(id)? {
            Located::Root(tag) => tag.name.clone(),
            Located::Child { label, .. } => label.text().into_owned(),
        })
    }

    /// The name shown for a node. Containers are prefixed with their entry
    /// count, eg `[3] Inventory`.
    pub fn display_name(&self, id: NodeId) -> Result<String> {
        Ok(match self.locate(id)? {
            Located::Root(tag) => format!("[{}] {}", tag.compound.len(), tag.name),
            Located::Child { label, value } => match value.child_count() {
                Some(count) => format!("[{}] {}", count, label.text()),
                None => label.text().into_owned(),
            },
        })
    }

    /// The value shown for a node. Empty for containers.
    pub fn display_value(&self, id: NodeId) -> Result<String> {
        Ok(match self.locate(id)? {
            Located::Root(_) => String::new(),
            Located::Child { value, .. } => format_value(value),
        })
    }

    pub fn children(&self, id: NodeId) -> Result<Vec<NodeId>> {
        Ok(self.table.get(id)?.children.clone())
    }

    pub fn child_count(&self, id: NodeId) -> Result<usize> {
        Ok(self.table.get(id)?.children.len())
    }

    pub fn parent(&self, id: NodeId) -> Result<Option<NodeId>> {
        Ok(self.table.get(id)?.parent)
    }

    /// Leaves take value edits. Containers only take structural edits.
    pub fn is_value_editable(&self, id: NodeId) -> Result<bool> {
        Ok(!self.kind(id)?.is_container())
    }

    /// Find a child by compound key, or by index for a list.
    pub fn child_by_name(&self, id: NodeId, name: &str) -> Result<Option<NodeId>> {
        let pos = match self.locate(id)? {
            Located::Root(tag) => tag.compound.get_index_of(name),
            Located::Child { value, .. } => match value {
                Value::Compound(c) => c.get_index_of(name),
                Value::List(l) => name.parse::<usize>().ok().filter(|i| *i < l.len()),
                _ => None,
            },
        };
        Ok(pos.and_then(|p| self.table.get(id).ok()?.children.get(p).copied()))
    }

    /// Find a node by a `/` separated path of names from the root, eg
    /// `Data/Player/Inventory/0/id`. The empty path is the root.
    pub fn resolve(&self, path: &str) -> Result<NodeId> {
        let mut current = self.root;
        for part in path.split('/').filter(|p| !p.is_empty()) {
            current = self
                .child_by_name(current, part)?
                .ok_or_else(|| Error::invalid_node(format!("no node at {:?}", path)))?;
        }
        Ok(current)
    }

    /// Parse `text` as a new value for a leaf, according to the leaf's kind.
    /// On failure the old value is kept.
    pub fn set_value(&mut self, id: NodeId, text: &str) -> Result<()> {
        let kind = self.kind(id)?;
        if kind.is_container() {
            return Err(Error::invalid_node(format!("cannot set the value of a {}", kind)));
        }
        let new = parse_value(kind, text)?;
        *self.value_mut(id)? = new;
        Ok(())
    }

    /// Remove a node and everything below it, returning its value.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Value> {
        let (parent, pos) = self.table.position(id)?;
        let removed = match self.container_mut(parent)? {
            ContainerMut::Compound(c) => c.shift_remove_index(pos).map(|(_, v)| v),
            ContainerMut::List(l) => l.remove(pos),
        }
        .ok_or_else(out_of_sync)?;

        self.table.detach(parent, pos)?;
        Ok(removed)
    }

    /// Rename a child of a compound, keeping its position. Fails with
    /// [`DuplicateName`][`Error::DuplicateName`] if a sibling already has
    /// the name.
    pub fn rename_node(&mut self, id: NodeId, new_name: &str) -> Result<()> {
        let (parent, pos) = self.table.position(id)?;
        check_name(new_name)?;
        let compound = match self.container_mut(parent)? {
            ContainerMut::Compound(c) => c,
            ContainerMut::List(_) => {
                return Err(Error::invalid_node("list elements have no name"));
            }
        };

        let current = compound.get_index(pos).ok_or_else(out_of_sync)?.0;
        if current == new_name {
            return Ok(());
        }
        if compound.contains_key(new_name) {
            return Err(Error::DuplicateName(new_name.to_owned()));
        }

        let (_, value) = compound.shift_remove_index(pos).ok_or_else(out_of_sync)?;
        compound.shift_insert(pos, new_name.to_owned(), value);
        Ok(())
    }

    /// Add a named child at the end of a compound. The value must be
    /// encodable on its own.
    pub fn insert_named(&mut self, parent: NodeId, name: &str, value: Value) -> Result<NodeId> {
        check_name(name)?;
        check_value(&value)?;
        match self.container_mut(parent)? {
            ContainerMut::Compound(c) => {
                if c.contains_key(name) {
                    return Err(Error::DuplicateName(name.to_owned()));
                }
                c.insert(name.to_owned(), value.clone());
            }
            ContainerMut::List(_) => {
                return Err(Error::invalid_node("list elements have no name"));
            }
        }
        self.table.append(parent, &value)
    }

    /// Append an element to a list. The value must match the list's element
    /// kind unless the list is empty.
    pub fn push_element(&mut self, parent: NodeId, value: Value) -> Result<NodeId> {
        check_value(&value)?;
        match self.container_mut(parent)? {
            ContainerMut::List(l) => l.push(value.clone())?,
            ContainerMut::Compound(_) => {
                return Err(Error::invalid_node("compound children need a name"));
            }
        }
        self.table.append(parent, &value)
    }
}

fn check_name(name: &str) -> Result<()> {
    if name.len() > MAX_STR_LEN {
        return Err(Error::invalid_node(format!(
            "name of {} bytes is too long",
            name.len()
        )));
    }
    Ok(())
}

/// Text shown for a leaf value. Containers show nothing.
pub fn format_value(value: &Value) -> String {
    fn join<T: Display>(items: &[T]) -> String {
        let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
        format!("[{}]", parts.join(", "))
    }

    match value {
        Value::Byte(v) => v.to_string(),
        Value::Short(v) => v.to_string(),
        Value::Int(v) => v.to_string(),
        Value::Long(v) => v.to_string(),
        Value::Float(v) => v.to_string(),
        Value::Double(v) => v.to_string(),
        Value::String(v) => v.clone(),
        Value::ByteArray(v) => join(v.as_slice()),
        Value::IntArray(v) => join(v.as_slice()),
        Value::LongArray(v) => join(v.as_slice()),
        Value::List(_) | Value::Compound(_) => String::new(),
    }
}

/// Parse text as a value of the given leaf kind. This accepts everything
/// [`format_value`] produces.
pub fn parse_value(kind: TagKind, text: &str) -> Result<Value> {
    fn num<T: FromStr>(kind: TagKind, text: &str) -> Result<T> {
        text.trim().parse().map_err(|_| Error::parse(kind, text))
    }

    fn array<T: FromStr>(kind: TagKind, text: &str) -> Result<Vec<T>> {
        let inner = text.trim();
        let inner = inner
            .strip_prefix('[')
            .and_then(|s| s.strip_suffix(']'))
            .unwrap_or(inner)
            .trim();
        if inner.is_empty() {
            return Ok(Vec::new());
        }
        inner.split(',').map(|part| num(kind, part)).collect()
    }

    Ok(match kind {
        TagKind::Byte => match text.trim() {
            "true" => Value::Byte(1),
            "false" => Value::Byte(0),
            _ => Value::Byte(num(kind, text)?),
        },
        TagKind::Short => Value::Short(num(kind, text)?),
        TagKind::Int => Value::Int(num(kind, text)?),
        TagKind::Long => Value::Long(num(kind, text)?),
        TagKind::Float => Value::Float(num(kind, text)?),
        TagKind::Double => Value::Double(num(kind, text)?),
        TagKind::String if text.len() > MAX_STR_LEN => return Err(Error::parse(kind, text)),
        TagKind::String => Value::String(text.to_owned()),
        TagKind::ByteArray => Value::ByteArray(ByteArray::new(array(kind, text)?)),
        TagKind::IntArray => Value::IntArray(IntArray::new(array(kind, text)?)),
        TagKind::LongArray => Value::LongArray(LongArray::new(array(kind, text)?)),
        TagKind::End | TagKind::List | TagKind::Compound => {
            return Err(Error::parse(kind, text));
        }
    })
}
