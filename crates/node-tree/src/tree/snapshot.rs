//! Serializable snapshots of a subtree's shape
//!
//! A snapshot records names, type tags and the children sequences. Payload
//! data, hooks and historical links are not part of it.

use serde::{Deserialize, Serialize};

use crate::tree::{Node, NodeId, NodeTree, NodeType, Tree, TreeError, TreeResult};

/// Shape of a node and everything below it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub name: String,
    #[serde(default)]
    pub kind: NodeType,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NodeSnapshot>,
}

impl NodeSnapshot {
    /// Create a snapshot of a childless node with the default type
    pub fn leaf(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind: NodeType::NODE,
            children: Vec::new(),
        }
    }

    /// Add a child snapshot
    pub fn with_child(mut self, child: NodeSnapshot) -> Self {
        self.children.push(child);
        self
    }
}

impl<D> NodeTree<D> {
    /// Capture the shape of `root` and its subtree
    pub fn snapshot(&self, root: NodeId) -> TreeResult<NodeSnapshot> {
        let node = self.get(root).ok_or(TreeError::UnknownNode(root))?;
        let children = node
            .children()
            .iter()
            .map(|&child| self.snapshot(child))
            .collect::<TreeResult<Vec<_>>>()?;

        Ok(NodeSnapshot {
            name: node.name().to_string(),
            kind: node.kind().clone(),
            children,
        })
    }

    /// Build a fresh, unattached subtree from a snapshot
    ///
    /// Nodes get default data and default hooks. If the snapshot breaks a
    /// tree rule, such as two siblings sharing a name, nothing is kept.
    pub fn restore(&mut self, snapshot: &NodeSnapshot) -> TreeResult<NodeId>
    where
        D: Default,
    {
        let root = self.insert(Node::typed(&snapshot.name, snapshot.kind.clone(), D::default()));
        if let Err(err) = self.restore_children(root, &snapshot.children) {
            self.remove(root)?;
            return Err(err);
        }
        Ok(root)
    }

    fn restore_children(&mut self, parent: NodeId, children: &[NodeSnapshot]) -> TreeResult<()>
    where
        D: Default,
    {
        for child in children {
            let id = self.insert(Node::typed(&child.name, child.kind.clone(), D::default()));
            if let Err(err) = self.attach(parent, id) {
                self.remove(id)?;
                return Err(err);
            }
            self.restore_children(id, &child.children)?;
        }
        Ok(())
    }
}
