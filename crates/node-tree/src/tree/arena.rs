//! Arena storage and the ownership protocol
//!
//! A node may be held by several parents at once. Exactly one of them is the
//! current parent; the others sit in the node's parent history, most recent
//! last. Reattaching a node pushes its current parent onto the history;
//! detaching it from the current parent pops the history back.
//!
//! Every structural change is reported to the hooks of the nodes involved
//! and then broadcast upward through every attachment of the changed node's
//! owner, historical links included.

use log::{debug, trace};

use crate::tree::{
    name, Change, DefaultHooks, Node, NodeContext, NodeHooks, NodeId, Tree, TreeError, TreeQuery,
    TreeResult,
};

struct Entry<D> {
    node: Node<D>,
    hooks: Box<dyn NodeHooks<D>>,
}

struct Slot<D> {
    generation: u32,
    entry: Option<Entry<D>>,
}

/// Arena owning every node of one or more trees
///
/// Nodes are addressed by `NodeId`. Parent and history links are plain IDs,
/// so removing a node can never leave another node holding a dangling
/// reference: stale IDs simply stop resolving.
///
/// # Example
///
/// ```
/// use node_tree::prelude::*;
///
/// let mut tree: NodeTree = NodeTree::new();
/// let root = tree.create("root");
/// let child = tree.create("child");
/// tree.attach(root, child).unwrap();
///
/// assert_eq!(tree.resolve_path(root, "child"), Some(child));
/// assert_eq!(tree.path(child).as_deref(), Some("root/child"));
/// ```
pub struct NodeTree<D = ()> {
    slots: Vec<Slot<D>>,
    free: Vec<u32>,
    len: usize,
}

impl<D> Default for NodeTree<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D> NodeTree<D> {
    /// Create an empty arena
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            len: 0,
        }
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the arena holds no nodes
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Create an unattached node with default data and default hooks
    pub fn create(&mut self, name: &str) -> NodeId
    where
        D: Default,
    {
        self.insert(Node::named(name))
    }

    /// Move a node into the arena with default hooks
    ///
    /// Structural links the node carried are discarded; it starts unattached.
    pub fn insert(&mut self, node: Node<D>) -> NodeId {
        self.insert_boxed(node, Box::new(DefaultHooks))
    }

    /// Move a node into the arena with the given hooks
    pub fn insert_with_hooks(&mut self, node: Node<D>, hooks: impl NodeHooks<D> + 'static) -> NodeId {
        self.insert_boxed(node, Box::new(hooks))
    }

    fn insert_boxed(&mut self, mut node: Node<D>, hooks: Box<dyn NodeHooks<D>>) -> NodeId {
        node.children.clear();
        node.parent = None;
        node.history.clear();

        let entry = Entry { node, hooks };
        self.len += 1;

        if let Some(index) = self.free.pop() {
            let slot = &mut self.slots[index as usize];
            slot.entry = Some(entry);
            return NodeId::new(index, slot.generation);
        }

        let index = self.slots.len() as u32;
        self.slots.push(Slot {
            generation: 0,
            entry: Some(entry),
        });
        NodeId::new(index, 0)
    }

    /// Replace the hooks of a node
    pub fn set_hooks(&mut self, id: NodeId, hooks: impl NodeHooks<D> + 'static) -> TreeResult<()> {
        let entry = self.entry_mut(id).ok_or(TreeError::UnknownNode(id))?;
        entry.hooks = Box::new(hooks);
        Ok(())
    }

    /// Get exclusive access to the payload of a node
    ///
    /// Names, type tags and links stay behind the tree operations.
    pub fn data_mut(&mut self, id: NodeId) -> Option<&mut D> {
        self.node_mut(id).map(|node| node.data_mut())
    }

    /// Iterate over every live node
    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<D>)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.entry
                .as_ref()
                .map(|e| (NodeId::new(index as u32, slot.generation), &e.node))
        })
    }

    /// Iterate over nodes that no parent holds
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(|(_, node)| node.is_detached())
            .map(|(id, _)| id)
    }

    /// Attach `child` under `parent`
    ///
    /// If `child` already has a current parent, that parent is pushed onto
    /// its history and `parent` takes over. The checks, in order: the
    /// parent's policy gate, the child's validity predicate, acyclicity and
    /// sibling name uniqueness.
    pub fn attach(&mut self, parent: NodeId, child: NodeId) -> TreeResult<()> {
        self.node(parent)?;
        let child_node = self.node(child)?;

        if !self.check(parent, |hooks, cx| hooks.accepts_child(cx, child)) {
            return reject(TreeError::PolicyRejected {
                kind: child_node.kind().name().to_string(),
            });
        }
        if !self.check(child, |hooks, cx| hooks.is_valid_parent(cx, parent)) {
            return reject(TreeError::InvalidParent { parent, child });
        }
        if child == parent || self.is_ancestor_of(child, parent) {
            return reject(TreeError::Cycle { parent, child });
        }
        if self.child_by_name_hash(parent, child_node.name_hash()).is_some() {
            return reject(TreeError::DuplicateName {
                name: child_node.name().to_string(),
            });
        }

        // children rely on the parent's resources, so it hears first
        self.notify(parent, |hooks, cx| hooks.on_child_change(cx, Change::Added, child));
        self.notify(child, |hooks, cx| hooks.on_parent_change(cx, Change::Added, parent));

        if let Some(node) = self.node_mut(child) {
            if let Some(previous) = node.parent.replace(parent) {
                node.history.push(previous);
            }
        }
        if let Some(node) = self.node_mut(parent) {
            node.children.push(child);
        }
        debug!("attached {} under {}", child, parent);

        self.propagate(parent, Change::Added, child);
        Ok(())
    }

    /// Attach `child` under the node found at `path` below `root`
    ///
    /// An empty path attaches directly under `root`.
    pub fn attach_at(&mut self, root: NodeId, path: &str, child: NodeId) -> TreeResult<()> {
        self.node(root)?;
        let target = if path.is_empty() {
            root
        } else {
            self.resolve_path(root, path)
                .ok_or_else(|| TreeError::NotFound {
                    name: path.to_string(),
                })?
        };
        self.attach(target, child)
    }

    /// Detach the child of `owner` whose name matches `name`
    pub fn detach_by_name(&mut self, owner: NodeId, name: &str) -> TreeResult<NodeId> {
        self.node(owner)?;
        let child = self.child_by_name(owner, name).ok_or_else(|| TreeError::NotFound {
            name: name::sanitize(name).into_owned(),
        })?;
        self.release(owner, child)?;
        Ok(child)
    }

    /// Detach `child` from `owner`
    ///
    /// `owner` may be the current parent, in which case the most recent
    /// historical parent takes over, or a historical parent, in which case
    /// only that history entry goes away.
    pub fn detach(&mut self, owner: NodeId, child: NodeId) -> TreeResult<()> {
        let owner_node = self.node(owner)?;
        let child_node = self.node(child)?;
        if !owner_node.children.contains(&child) {
            return reject(TreeError::NotFound {
                name: child_node.name().to_string(),
            });
        }
        self.release(owner, child)
    }

    /// Deliver `signal` to the child of `owner` named `name`
    pub fn signal(&mut self, owner: NodeId, name: &str, signal: &str) -> TreeResult<()> {
        self.node(owner)?;
        let child = self.child_by_name(owner, name).ok_or_else(|| TreeError::NotFound {
            name: name::sanitize(name).into_owned(),
        })?;
        trace!("signal {:?} from {} to {}", signal, owner, child);
        self.notify(child, |hooks, cx| hooks.on_signal(cx, signal, owner));
        Ok(())
    }

    /// Destroy a node
    ///
    /// The node is detached from every parent holding it, then its children
    /// are unlinked from it. Children left without any parent are destroyed
    /// in turn; children still held elsewhere survive. Returns the number of
    /// nodes destroyed. Fails without changing anything if any parent's
    /// policy refuses to let the node go.
    pub fn remove(&mut self, id: NodeId) -> TreeResult<usize> {
        let owners = self.attachments(id);
        if !self.contains(id) {
            return reject(TreeError::UnknownNode(id));
        }
        for &owner in &owners {
            if !self.check(owner, |hooks, cx| hooks.releases_child(cx, id)) {
                let kind = self.node(id)?.kind().name().to_string();
                return reject(TreeError::PolicyRejected { kind });
            }
        }

        // current parent first, then history from the top down, so each
        // unlink goes through the current-parent branch
        let mut ordered = Vec::with_capacity(owners.len());
        ordered.extend(owners.first().copied());
        ordered.extend(owners.iter().skip(1).rev().copied());
        for owner in ordered {
            self.unlink(owner, id)?;
        }

        let released = self.teardown(id);
        debug!("removed {} ({} nodes released)", id, released);
        Ok(released)
    }

    fn release(&mut self, owner: NodeId, child: NodeId) -> TreeResult<()> {
        if !self.check(owner, |hooks, cx| hooks.releases_child(cx, child)) {
            let kind = self.node(child)?.kind().name().to_string();
            return reject(TreeError::PolicyRejected { kind });
        }
        self.unlink(owner, child)
    }

    fn unlink(&mut self, owner: NodeId, child: NodeId) -> TreeResult<()> {
        let node = self.node_mut(child).ok_or(TreeError::UnknownNode(child))?;
        if node.parent == Some(owner) {
            node.parent = node.history.pop();
        } else if let Some(position) = node.history.iter().position(|&p| p == owner) {
            node.history.remove(position);
        } else {
            return reject(TreeError::NotOwned { owner, child });
        }

        self.notify(owner, |hooks, cx| hooks.on_child_change(cx, Change::Removed, child));
        self.notify(child, |hooks, cx| hooks.on_parent_change(cx, Change::Removed, owner));

        self.propagate(owner, Change::Removed, child);

        if let Some(owner_node) = self.node_mut(owner) {
            owner_node.children.retain(|&c| c != child);
        }
        debug!("detached {} from {}", child, owner);
        Ok(())
    }

    /// Unlink the children of a detached node, free it, and recurse into
    /// children nobody holds anymore
    fn teardown(&mut self, id: NodeId) -> usize {
        let children = match self.get(id) {
            Some(node) => node.children.clone(),
            None => return 0,
        };

        for &child in &children {
            if let Some(node) = self.node_mut(child) {
                if node.parent == Some(id) {
                    node.parent = node.history.pop();
                } else if let Some(position) = node.history.iter().position(|&p| p == id) {
                    node.history.remove(position);
                }
            }
            self.notify(child, |hooks, cx| hooks.on_parent_change(cx, Change::Removed, id));
        }

        self.free(id);

        let mut released = 1;
        for child in children {
            if self.get(child).is_some_and(|n| n.is_detached()) {
                released += self.teardown(child);
            }
        }
        released
    }

    fn free(&mut self, id: NodeId) {
        if let Some(slot) = self.slots.get_mut(id.index()) {
            if slot.generation == id.generation() && slot.entry.take().is_some() {
                slot.generation = slot.generation.wrapping_add(1);
                self.free.push(id.index() as u32);
                self.len -= 1;
            }
        }
    }

    /// Broadcast a change upward through every attachment of `origin`
    ///
    /// Depth-first: the current parent's whole ancestry is visited before the
    /// first historical parent. An ancestor reachable along two paths hears
    /// the change twice.
    fn propagate(&mut self, origin: NodeId, change: Change, affected: NodeId) {
        let mut pending = self.attachments(origin);
        pending.reverse();

        while let Some(ancestor) = pending.pop() {
            trace!("{} of {} reported to {}", change, affected, ancestor);
            self.notify(ancestor, |hooks, cx| {
                hooks.on_descendant_change(cx, change, affected)
            });
            pending.extend(self.attachments(ancestor).into_iter().rev());
        }
    }

    fn node(&self, id: NodeId) -> TreeResult<&Node<D>> {
        self.get(id).ok_or(TreeError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Option<&mut Node<D>> {
        self.entry_mut(id).map(|e| &mut e.node)
    }

    fn entry(&self, id: NodeId) -> Option<&Entry<D>> {
        let slot = self.slots.get(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_ref()
    }

    fn entry_mut(&mut self, id: NodeId) -> Option<&mut Entry<D>> {
        let slot = self.slots.get_mut(id.index())?;
        if slot.generation != id.generation() {
            return None;
        }
        slot.entry.as_mut()
    }

    /// Evaluate a predicate hook of `id`; stale IDs never pass
    fn check<F>(&self, id: NodeId, predicate: F) -> bool
    where
        F: FnOnce(&dyn NodeHooks<D>, &NodeContext<'_, D>) -> bool,
    {
        match self.entry(id) {
            Some(entry) => predicate(&*entry.hooks, &NodeContext::new(self, id, &entry.node)),
            None => false,
        }
    }

    /// Run a notification hook of `id` with a read-only view of the tree
    ///
    /// The hooks are moved out of the slot for the duration of the call, so
    /// the callback can borrow the whole tree.
    fn notify<F>(&mut self, id: NodeId, callback: F)
    where
        F: FnOnce(&mut dyn NodeHooks<D>, &NodeContext<'_, D>),
    {
        let mut hooks: Box<dyn NodeHooks<D>> = match self.entry_mut(id) {
            Some(entry) => std::mem::replace(&mut entry.hooks, Box::new(DefaultHooks)),
            None => return,
        };

        if let Some(entry) = self.entry(id) {
            let cx = NodeContext::new(self, id, &entry.node);
            callback(&mut *hooks, &cx);
        }

        if let Some(entry) = self.entry_mut(id) {
            entry.hooks = hooks;
        }
    }
}

impl<D> Tree for NodeTree<D> {
    type NodeData = D;

    fn get(&self, id: NodeId) -> Option<&Node<D>> {
        self.entry(id).map(|e| &e.node)
    }

    fn node_count(&self) -> usize {
        self.len
    }
}

fn reject<T>(err: TreeError) -> TreeResult<T> {
    debug!("rejected: {}", err);
    Err(err)
}
