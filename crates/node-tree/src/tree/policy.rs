//! Allow-list policy for restricting which node types may come and go

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tree::{NodeContext, NodeHooks, NodeId, NodeType};

/// Hooks that only admit and release children of listed types
///
/// Attaching a child whose type name is missing from the add list, or
/// detaching one missing from the remove list, fails with
/// `TreeError::PolicyRejected`. Everything else behaves like `DefaultHooks`.
///
/// ```
/// use node_tree::prelude::*;
///
/// let mut tree: NodeTree = NodeTree::new();
/// let scene = tree.insert_with_hooks(
///     Node::named("scene"),
///     RestrictivePolicy::new().allow_add("Mesh"),
/// );
/// let mesh = tree.insert(Node::typed("cube", NodeType::from_static("Mesh"), ()));
/// let note = tree.create("note");
///
/// assert!(tree.attach(scene, mesh).is_ok());
/// assert!(tree.attach(scene, note).is_err());
/// assert!(tree.detach(scene, mesh).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RestrictivePolicy {
    /// Type names that may be attached
    pub add: Vec<String>,
    /// Type names that may be detached
    pub remove: Vec<String>,
}

impl RestrictivePolicy {
    /// A policy that admits and releases nothing
    pub fn new() -> Self {
        Self::default()
    }

    /// Permit attaching children of this type
    pub fn allow_add(mut self, type_name: impl Into<String>) -> Self {
        self.add.push(type_name.into());
        self
    }

    /// Permit detaching children of this type
    pub fn allow_remove(mut self, type_name: impl Into<String>) -> Self {
        self.remove.push(type_name.into());
        self
    }

    /// Returns true if children of this type may be attached
    pub fn allows_add(&self, kind: &NodeType) -> bool {
        self.add.iter().any(|allowed| allowed == kind.name())
    }

    /// Returns true if children of this type may be detached
    pub fn allows_remove(&self, kind: &NodeType) -> bool {
        self.remove.iter().any(|allowed| allowed == kind.name())
    }
}

impl<D> NodeHooks<D> for RestrictivePolicy {
    fn accepts_child(&self, cx: &NodeContext<'_, D>, child: NodeId) -> bool {
        cx.get(child).is_some_and(|node| self.allows_add(node.kind()))
    }

    fn releases_child(&self, cx: &NodeContext<'_, D>, child: NodeId) -> bool {
        cx.get(child).is_some_and(|node| self.allows_remove(node.kind()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Node, NodeTree, Tree, TreeError};

    const MESH: NodeType = NodeType::from_static("Mesh");
    const LIGHT: NodeType = NodeType::from_static("Light");

    fn restricted_scene(policy: RestrictivePolicy) -> (NodeTree, NodeId) {
        let mut tree = NodeTree::new();
        let scene = tree.insert_with_hooks(Node::named("scene"), policy);
        (tree, scene)
    }

    #[test]
    fn test_allow_lists_are_independent() {
        let policy = RestrictivePolicy::new().allow_add("Mesh").allow_remove("Light");

        assert!(policy.allows_add(&MESH));
        assert!(!policy.allows_add(&LIGHT));
        assert!(policy.allows_remove(&LIGHT));
        assert!(!policy.allows_remove(&MESH));
        assert!(!RestrictivePolicy::new().allows_add(&NodeType::NODE));
    }

    #[test]
    fn test_add_allow_list() {
        let (mut tree, scene) = restricted_scene(RestrictivePolicy::new().allow_add("Mesh"));
        let mesh = tree.insert(Node::typed("cube", MESH, ()));
        let light = tree.insert(Node::typed("sun", LIGHT, ()));

        assert_eq!(tree.attach(scene, mesh), Ok(()));
        assert_eq!(
            tree.attach(scene, light),
            Err(TreeError::PolicyRejected { kind: "Light".to_string() })
        );
        assert_eq!(tree.children(scene), &[mesh]);
    }

    #[test]
    fn test_remove_allow_list() {
        let policy = RestrictivePolicy::new()
            .allow_add("Mesh")
            .allow_add("Light")
            .allow_remove("Light");
        let (mut tree, scene) = restricted_scene(policy);
        let mesh = tree.insert(Node::typed("cube", MESH, ()));
        let light = tree.insert(Node::typed("sun", LIGHT, ()));
        tree.attach(scene, mesh).unwrap();
        tree.attach(scene, light).unwrap();

        assert_eq!(
            tree.detach_by_name(scene, "cube"),
            Err(TreeError::PolicyRejected { kind: "Mesh".to_string() })
        );
        assert_eq!(tree.detach(scene, light), Ok(()));
        assert_eq!(tree.children(scene), &[mesh]);
        assert_eq!(tree.parent(mesh), Some(scene));
    }

    #[test]
    fn test_remove_is_gated_by_every_owner() {
        let (mut tree, scene) = restricted_scene(RestrictivePolicy::new().allow_add("Mesh"));
        let mesh = tree.insert(Node::typed("cube", MESH, ()));
        tree.attach(scene, mesh).unwrap();

        assert_eq!(
            tree.remove(mesh),
            Err(TreeError::PolicyRejected { kind: "Mesh".to_string() })
        );
        assert!(tree.contains(mesh));
        assert_eq!(tree.children(scene), &[mesh]);
    }

    #[test]
    fn test_policy_does_not_affect_the_node_itself() {
        let (mut tree, scene) = restricted_scene(RestrictivePolicy::new());
        let root = tree.create("root");

        assert_eq!(tree.attach(root, scene), Ok(()));
        assert_eq!(tree.detach(root, scene), Ok(()));
    }
}
