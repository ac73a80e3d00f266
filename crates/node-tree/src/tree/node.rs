//! Core node types for the tree abstraction

use std::borrow::Cow;
use std::fmt;

use derive_more::Display;
use smallvec::SmallVec;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tree::name;

/// Unique identifier for a node within a `NodeTree`
///
/// Internally represented as an index into arena storage plus the generation
/// of the slot, so a handle to a removed node never aliases whichever node
/// later reuses the slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    pub(crate) const fn new(index: u32, generation: u32) -> Self {
        NodeId { index, generation }
    }

    /// Slot index in the arena
    pub const fn index(self) -> usize {
        self.index as usize
    }

    /// Generation of the slot this handle was issued for
    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({}v{})", self.index, self.generation)
    }
}

/// Host-supplied type tag of a node
///
/// The tag carries its name and a hash of that name; `find_by_type` compares
/// names, `find_by_type_hash` compares hashes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Display)]
#[display(fmt = "{}", name)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "String", into = "String"))]
pub struct NodeType {
    name: Cow<'static, str>,
    hash: u64,
}

impl NodeType {
    /// Tag given to nodes created without an explicit type
    pub const NODE: NodeType = NodeType::from_static("Node");

    /// Create a tag from a static name, usable in constants
    pub const fn from_static(name: &'static str) -> Self {
        NodeType {
            name: Cow::Borrowed(name),
            hash: name::fnv1a_64(name),
        }
    }

    /// Create a tag from any name
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        let name = name.into();
        let hash = name::fnv1a_64(&name);
        NodeType { name, hash }
    }

    /// The type name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hash of the type name
    pub const fn hash(&self) -> u64 {
        self.hash
    }
}

impl Default for NodeType {
    fn default() -> Self {
        NodeType::NODE
    }
}

impl From<String> for NodeType {
    fn from(name: String) -> Self {
        NodeType::new(name)
    }
}

impl From<&'static str> for NodeType {
    fn from(name: &'static str) -> Self {
        NodeType::from_static(name)
    }
}

impl From<NodeType> for String {
    fn from(kind: NodeType) -> Self {
        kind.name.into_owned()
    }
}

/// A single node in the tree
///
/// Generic over the data type `D` which can store arbitrary host payload.
/// The structural fields are owned by the arena and only change through
/// `NodeTree` operations.
#[derive(Debug, Clone)]
pub struct Node<D> {
    name: String,
    name_hash: u64,
    kind: NodeType,
    data: D,
    pub(crate) children: Vec<NodeId>,
    pub(crate) parent: Option<NodeId>,
    pub(crate) history: SmallVec<[NodeId; 2]>,
}

impl<D> Node<D> {
    /// Create a new node with the default type tag
    pub fn new(name: &str, data: D) -> Self {
        Self::typed(name, NodeType::NODE, data)
    }

    /// Create a new node with an explicit type tag
    ///
    /// Separators in `name` are replaced with underscores.
    pub fn typed(name: &str, kind: NodeType, data: D) -> Self {
        Self {
            name: name::sanitize(name).into_owned(),
            name_hash: name::name_hash(name),
            kind,
            data,
            children: Vec::new(),
            parent: None,
            history: SmallVec::new(),
        }
    }

    /// The sanitized node name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Hash of the sanitized name, the key for every indexed lookup
    pub fn name_hash(&self) -> u64 {
        self.name_hash
    }

    /// The host-supplied type tag
    pub fn kind(&self) -> &NodeType {
        &self.kind
    }

    /// Get the user data
    pub fn data(&self) -> &D {
        &self.data
    }

    /// Get mutable access to the user data
    pub fn data_mut(&mut self) -> &mut D {
        &mut self.data
    }

    /// Children in insertion order
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// The current primary parent
    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Displaced parents that still hold this node, oldest first
    pub fn parent_history(&self) -> &[NodeId] {
        &self.history
    }

    /// Number of nodes that list this one among their children
    pub fn count_parents(&self) -> usize {
        self.history.len() + usize::from(self.parent.is_some())
    }

    /// Returns true if no node holds this one
    pub fn is_detached(&self) -> bool {
        self.parent.is_none() && self.history.is_empty()
    }
}

impl<D: Default> Node<D> {
    /// Create a new node with default data
    pub fn named(name: &str) -> Self {
        Self::new(name, D::default())
    }
}

impl<D> fmt::Display for Node<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "<{} name=\"{}\">", self.kind, self.name)
    }
}
