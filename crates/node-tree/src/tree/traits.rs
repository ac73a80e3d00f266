//! Read-only tree interface and traversal

use std::collections::{HashSet, VecDeque};

use crate::tree::{Node, NodeId, NodeType};

/// Read access to a tree of nodes
///
/// Implementations provide node lookup; the derived methods navigate the
/// parent links. A node may have a current parent plus any number of
/// historical parents, so "ancestor" questions come in two flavors: along
/// the current-parent chain only (`ancestors`, `depth`), or across every
/// attachment (`attachments`, `is_ancestor_of`).
///
/// # Example
///
/// ```ignore
/// fn print_tree<T: Tree>(tree: &T, root: NodeId) {
///     for id in TreeWalker::new(tree, root, TraversalOrder::PreOrder) {
///         let node = tree.get(id).unwrap();
///         println!("{:indent$}{}", "", node.name(), indent = tree.depth(id) * 2);
///     }
/// }
/// ```
pub trait Tree {
    /// User-defined data stored at each node
    type NodeData;

    /// Get a node by its ID
    ///
    /// Returns `None` if the ID is stale or foreign.
    fn get(&self, id: NodeId) -> Option<&Node<Self::NodeData>>;

    /// Count live nodes in the tree
    fn node_count(&self) -> usize;

    /// Check if an ID refers to a live node
    fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Get the current parent of a node
    fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id)?.parent()
    }

    /// Get the displaced parents still holding a node, oldest first
    fn parent_history(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.parent_history()).unwrap_or(&[])
    }

    /// Get the children of a node in insertion order
    ///
    /// Returns an empty slice for invalid IDs.
    fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Get the name of a node
    fn name(&self, id: NodeId) -> Option<&str> {
        self.get(id).map(|n| n.name())
    }

    /// Get the name hash of a node
    fn name_hash(&self, id: NodeId) -> Option<u64> {
        self.get(id).map(|n| n.name_hash())
    }

    /// Get the type tag of a node
    fn kind(&self, id: NodeId) -> Option<&NodeType> {
        self.get(id).map(|n| n.kind())
    }

    /// Count children of a node
    fn child_count(&self, id: NodeId) -> usize {
        self.children(id).len()
    }

    /// Every node holding this one: the current parent first, then history
    fn attachments(&self, id: NodeId) -> Vec<NodeId> {
        match self.get(id) {
            Some(node) => node
                .parent()
                .into_iter()
                .chain(node.parent_history().iter().copied())
                .collect(),
            None => Vec::new(),
        }
    }

    /// Get the ancestors along the current-parent chain, from parent to root
    fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut ancestors = Vec::new();
        let mut current = self.parent(id);
        while let Some(parent_id) = current {
            ancestors.push(parent_id);
            current = self.parent(parent_id);
        }
        ancestors
    }

    /// Get the depth of a node along its current-parent chain (root = 0)
    fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).len()
    }

    /// Check if `ancestor` is reachable upward from `node` through any link
    fn is_ancestor_of(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut pending = self.attachments(node);
        let mut seen = HashSet::new();
        while let Some(id) = pending.pop() {
            if id == ancestor {
                return true;
            }
            if seen.insert(id) {
                pending.extend(self.attachments(id));
            }
        }
        false
    }
}

/// Traversal order for walking the tree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TraversalOrder {
    /// Visit parent before children (top-down)
    PreOrder,
    /// Visit children before parent (bottom-up)
    PostOrder,
    /// Visit level by level (breadth-first)
    BreadthFirst,
}

/// Iterator for traversing a tree in different orders
///
/// Walks the children sequences starting at (and including) the start node.
/// A node held by two parents inside the walked subtree is yielded once per
/// attachment.
pub struct TreeWalker<'a, T: Tree + ?Sized> {
    tree: &'a T,
    order: TraversalOrder,
    // (node, children already queued) - the flag is only used post-order
    pending: VecDeque<(NodeId, bool)>,
}

impl<'a, T: Tree + ?Sized> TreeWalker<'a, T> {
    /// Create a new tree walker starting from the given node
    pub fn new(tree: &'a T, start: NodeId, order: TraversalOrder) -> Self {
        let mut pending = VecDeque::new();
        if tree.contains(start) {
            pending.push_back((start, false));
        }

        Self {
            tree,
            order,
            pending,
        }
    }

    fn next_preorder(&mut self) -> Option<NodeId> {
        let (current, _) = self.pending.pop_back()?;

        // Add children in reverse order so they're popped in correct order
        for &child in self.tree.children(current).iter().rev() {
            self.pending.push_back((child, false));
        }

        Some(current)
    }

    fn next_postorder(&mut self) -> Option<NodeId> {
        while let Some((current, expanded)) = self.pending.pop_back() {
            if expanded {
                return Some(current);
            }

            self.pending.push_back((current, true));
            for &child in self.tree.children(current).iter().rev() {
                self.pending.push_back((child, false));
            }
        }
        None
    }

    fn next_breadthfirst(&mut self) -> Option<NodeId> {
        let (current, _) = self.pending.pop_front()?;

        for &child in self.tree.children(current) {
            self.pending.push_back((child, false));
        }

        Some(current)
    }
}

impl<'a, T: Tree + ?Sized> Iterator for TreeWalker<'a, T> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        match self.order {
            TraversalOrder::PreOrder => self.next_preorder(),
            TraversalOrder::PostOrder => self.next_postorder(),
            TraversalOrder::BreadthFirst => self.next_breadthfirst(),
        }
    }
}
