//! Path, name and type queries
//!
//! Everything here is read-only and returns `NodeId`s; callers then take
//! shared access to the node with `get`, or exclusive access to its payload
//! with `NodeTree::data_mut`.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::tree::{
    name, Node, NodeId, NodeType, RenderOptions, TraversalOrder, Tree, TreeError, TreeResult,
    TreeWalker,
};

/// How many levels below a node a recursive query may descend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Depth {
    /// At most this many levels
    Limited(usize),
    /// The whole subtree
    #[default]
    Unbounded,
}

impl Depth {
    /// Returns true when no further level may be visited
    pub const fn is_exhausted(self) -> bool {
        matches!(self, Depth::Limited(0))
    }

    /// The budget left one level further down
    pub const fn descend(self) -> Depth {
        match self {
            Depth::Limited(n) => Depth::Limited(n.saturating_sub(1)),
            Depth::Unbounded => Depth::Unbounded,
        }
    }
}

impl From<usize> for Depth {
    fn from(levels: usize) -> Self {
        Depth::Limited(levels)
    }
}

/// Extension trait providing the query engine
///
/// This trait is automatically implemented for all types that implement
/// `Tree`. Recursive searches only examine descendants of the starting node,
/// never the node itself, and collect matches in pre-order.
pub trait TreeQuery: Tree {
    /// Find a node by a `/`-separated path relative to `root`
    ///
    /// Intermediate segments are matched by name hash; the final segment must
    /// equal a child's stored name exactly.
    fn resolve_path(&self, root: NodeId, path: &str) -> Option<NodeId> {
        match path.split_once(name::SEPARATOR) {
            None => self
                .children(root)
                .iter()
                .copied()
                .find(|&child| self.name(child) == Some(path)),
            Some((head, rest)) => {
                let next = self.child_by_name_hash(root, name::name_hash(head))?;
                self.resolve_path(next, rest)
            }
        }
    }

    /// Find a node by path and require it to carry the given type tag
    fn resolve_path_as(&self, root: NodeId, path: &str, kind: &NodeType) -> TreeResult<NodeId> {
        let id = self
            .resolve_path(root, path)
            .ok_or_else(|| TreeError::NotFound {
                name: path.to_string(),
            })?;
        self.expect_kind(id, kind)
    }

    /// Return `id` if its node carries the given type tag
    fn expect_kind(&self, id: NodeId, kind: &NodeType) -> TreeResult<NodeId> {
        let node = self.get(id).ok_or(TreeError::UnknownNode(id))?;
        if node.kind() == kind {
            Ok(id)
        } else {
            Err(TreeError::WrongKind {
                expected: kind.name().to_string(),
                found: node.kind().name().to_string(),
            })
        }
    }

    /// First direct child with the given name hash
    fn child_by_name_hash(&self, root: NodeId, hash: u64) -> Option<NodeId> {
        self.children(root)
            .iter()
            .copied()
            .find(|&child| self.name_hash(child) == Some(hash))
    }

    /// First direct child with the given name
    fn child_by_name(&self, root: NodeId, name: &str) -> Option<NodeId> {
        self.child_by_name_hash(root, name::name_hash(name))
    }

    /// Direct child with the given name and type tag
    fn child_as(&self, root: NodeId, name: &str, kind: &NodeType) -> TreeResult<NodeId> {
        let id = self
            .child_by_name(root, name)
            .ok_or_else(|| TreeError::NotFound {
                name: name::sanitize(name).into_owned(),
            })?;
        self.expect_kind(id, kind)
    }

    /// Find descendants matching a predicate, at most `depth` levels down
    fn find_matching<F>(&self, root: NodeId, depth: impl Into<Depth>, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Node<Self::NodeData>) -> bool,
    {
        let mut matches = Vec::new();
        collect_matching(self, root, depth.into(), &predicate, &mut matches);
        matches
    }

    /// Find all descendants with a given name
    fn find_by_name(&self, root: NodeId, name: &str, depth: impl Into<Depth>) -> Vec<NodeId> {
        self.find_by_name_hash(root, name::name_hash(name), depth)
    }

    /// Find all descendants with a given name hash
    fn find_by_name_hash(&self, root: NodeId, hash: u64, depth: impl Into<Depth>) -> Vec<NodeId> {
        self.find_matching(root, depth, |node| node.name_hash() == hash)
    }

    /// Find all descendants whose type name matches
    fn find_by_type(&self, root: NodeId, type_name: &str, depth: impl Into<Depth>) -> Vec<NodeId> {
        self.find_matching(root, depth, |node| node.kind().name() == type_name)
    }

    /// Find all descendants whose type hash matches
    fn find_by_type_hash(&self, root: NodeId, hash: u64, depth: impl Into<Depth>) -> Vec<NodeId> {
        self.find_matching(root, depth, |node| node.kind().hash() == hash)
    }

    /// Count descendants
    ///
    /// Direct children are always counted; each further level needs one unit
    /// of depth, so `0` counts only direct children.
    fn count_nodes(&self, root: NodeId, depth: impl Into<Depth>) -> usize {
        let depth = depth.into();
        let children = self.children(root);
        let mut count = children.len();

        if !depth.is_exhausted() {
            for &child in children {
                count += self.count_nodes(child, depth.descend());
            }
        }

        count
    }

    /// Number of nodes holding `id`, current parent included
    fn count_parents(&self, id: NodeId) -> usize {
        self.get(id).map(|n| n.count_parents()).unwrap_or(0)
    }

    /// Get the path from the root of the current-parent chain to this node
    ///
    /// Returns `None` if the ID is invalid.
    fn path(&self, id: NodeId) -> Option<String> {
        let node = self.get(id)?;
        let mut segments = vec![node.name()];
        let mut current = node.parent();

        while let Some(parent_id) = current {
            let parent = self.get(parent_id)?;
            segments.push(parent.name());
            current = parent.parent();
        }

        segments.reverse();
        Some(segments.join("/"))
    }

    /// One path per attachment: historical parents first, current last
    fn all_paths(&self, id: NodeId) -> Vec<String> {
        let Some(node) = self.get(id) else {
            return Vec::new();
        };

        let mut paths: Vec<String> = node
            .parent_history()
            .iter()
            .filter_map(|&parent| self.path(parent))
            .map(|parent_path| format!("{}/{}", parent_path, node.name()))
            .collect();

        if node.parent().is_some() {
            paths.extend(self.path(id));
        }

        paths
    }

    /// Render the subtree below `root` as an indented outline
    ///
    /// ```text
    /// - root
    ///   - child
    ///     - <...>
    /// ```
    fn render_tree(&self, root: NodeId, options: &RenderOptions) -> String {
        let mut out = String::new();
        render_into(self, root, options.base_indent, options.depth, options, &mut out);
        out
    }

    /// Walk `root` and its subtree in the given order
    fn descendants(&self, root: NodeId, order: TraversalOrder) -> TreeWalker<'_, Self> {
        TreeWalker::new(self, root, order)
    }
}

// Blanket implementation for all Tree types
impl<T: Tree + ?Sized> TreeQuery for T {}

fn collect_matching<T, F>(tree: &T, root: NodeId, depth: Depth, predicate: &F, out: &mut Vec<NodeId>)
where
    T: Tree + ?Sized,
    F: Fn(&Node<T::NodeData>) -> bool,
{
    if depth.is_exhausted() {
        return;
    }

    for &child in tree.children(root) {
        if tree.get(child).is_some_and(predicate) {
            out.push(child);
        }
        collect_matching(tree, child, depth.descend(), predicate, out);
    }
}

fn render_into<T>(
    tree: &T,
    id: NodeId,
    indent: usize,
    depth: Depth,
    options: &RenderOptions,
    out: &mut String,
) where
    T: Tree + ?Sized,
{
    let Some(node) = tree.get(id) else {
        return;
    };

    out.push_str(&" ".repeat(indent));
    out.push_str("- ");
    out.push_str(node.name());
    if options.include_types {
        out.push_str(" : ");
        out.push_str(node.kind().name());
    }
    out.push('\n');

    let child_indent = indent + options.indent_step;
    if depth.is_exhausted() {
        out.push_str(&" ".repeat(child_indent));
        out.push_str("- <...>\n");
    } else {
        for &child in node.children() {
            render_into(tree, child, child_indent, depth.descend(), options, out);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::NodeTree;

    const MESH: NodeType = NodeType::from_static("Mesh");

    // root
    //   x
    //     y
    //       z : Mesh
    //   w : Mesh
    fn sample() -> (NodeTree, [NodeId; 5]) {
        let mut tree = NodeTree::new();
        let root = tree.create("root");
        let x = tree.create("x");
        let y = tree.create("y");
        let z = tree.insert(Node::typed("z", MESH, ()));
        let w = tree.insert(Node::typed("w", MESH, ()));
        tree.attach(root, x).unwrap();
        tree.attach(x, y).unwrap();
        tree.attach(y, z).unwrap();
        tree.attach(root, w).unwrap();
        (tree, [root, x, y, z, w])
    }

    #[test]
    fn test_depth() {
        assert_eq!(Depth::default(), Depth::Unbounded);
        assert!(Depth::from(0).is_exhausted());
        assert!(!Depth::from(1).is_exhausted());
        assert_eq!(Depth::from(1).descend(), Depth::Limited(0));
        assert_eq!(Depth::Unbounded.descend(), Depth::Unbounded);
    }

    #[test]
    fn test_resolve_path() {
        let (tree, [root, x, y, z, _]) = sample();

        assert_eq!(tree.resolve_path(root, "x"), Some(x));
        assert_eq!(tree.resolve_path(root, "x/y"), Some(y));
        assert_eq!(tree.resolve_path(root, "x/y/z"), Some(z));
        assert_eq!(tree.resolve_path(x, "y/z"), Some(z));
        assert_eq!(tree.resolve_path(root, "x/q/z"), None);
        assert_eq!(tree.resolve_path(root, "y"), None);
        assert_eq!(tree.resolve_path(root, "x/y/z/deeper"), None);
    }

    #[test]
    fn test_resolve_path_as() {
        let (tree, [root, _, _, z, _]) = sample();

        assert_eq!(tree.resolve_path_as(root, "x/y/z", &MESH), Ok(z));
        assert_eq!(
            tree.resolve_path_as(root, "x/y", &MESH),
            Err(TreeError::WrongKind {
                expected: "Mesh".to_string(),
                found: "Node".to_string(),
            })
        );
        assert_eq!(
            tree.resolve_path_as(root, "nope", &MESH),
            Err(TreeError::NotFound { name: "nope".to_string() })
        );
    }

    #[test]
    fn test_direct_child_lookup_is_shallow() {
        let (tree, [root, x, _, _, w]) = sample();

        assert_eq!(tree.child_by_name(root, "x"), Some(x));
        assert_eq!(tree.child_by_name_hash(root, name::name_hash("w")), Some(w));
        assert_eq!(tree.child_by_name(root, "y"), None);
        assert_eq!(tree.child_as(root, "w", &MESH), Ok(w));
        assert!(matches!(
            tree.child_as(root, "x", &MESH),
            Err(TreeError::WrongKind { .. })
        ));
    }

    #[test]
    fn test_find_by_name_respects_depth() {
        let (tree, [root, _, y, _, _]) = sample();

        assert!(tree.find_by_name(root, "y", 0).is_empty());
        assert!(tree.find_by_name(root, "y", 1).is_empty());
        assert_eq!(tree.find_by_name(root, "y", 2), vec![y]);
        assert_eq!(tree.find_by_name(root, "y", Depth::Unbounded), vec![y]);
    }

    #[test]
    fn test_find_excludes_root() {
        let (tree, [root, _, _, _, _]) = sample();

        assert!(tree.find_by_name(root, "root", Depth::Unbounded).is_empty());
    }

    #[test]
    fn test_find_by_type_is_preorder() {
        let (tree, [root, _, _, z, w]) = sample();

        assert_eq!(tree.find_by_type(root, "Mesh", Depth::Unbounded), vec![z, w]);
        assert_eq!(tree.find_by_type_hash(root, MESH.hash(), Depth::Unbounded), vec![z, w]);
        assert_eq!(tree.find_by_type(root, "Mesh", 1), vec![w]);
        assert!(tree.find_by_type(root, "Light", Depth::Unbounded).is_empty());
    }

    #[test]
    fn test_count_nodes() {
        let (tree, [root, x, _, z, _]) = sample();

        assert_eq!(tree.count_nodes(root, 0), 2);
        assert_eq!(tree.count_nodes(root, 1), 3);
        assert_eq!(tree.count_nodes(root, Depth::Unbounded), 4);
        assert_eq!(tree.count_nodes(x, Depth::Unbounded), 2);
        assert_eq!(tree.count_nodes(z, Depth::Unbounded), 0);
    }

    #[test]
    fn test_paths() {
        let (mut tree, [root, x, _, z, _]) = sample();
        assert_eq!(tree.path(z).as_deref(), Some("root/x/y/z"));
        assert_eq!(tree.all_paths(z), vec!["root/x/y/z"]);
        assert_eq!(tree.all_paths(root), Vec::<String>::new());

        let other = tree.create("other");
        tree.attach(other, x).unwrap();

        assert_eq!(tree.path(z).as_deref(), Some("other/x/y/z"));
        assert_eq!(tree.all_paths(x), vec!["root/x", "other/x"]);
        assert_eq!(tree.count_parents(x), 2);
    }

    #[test]
    fn test_render_tree() {
        let (tree, [root, ..]) = sample();

        let rendered = tree.render_tree(root, &RenderOptions::default());
        assert_eq!(rendered, "- root\n  - x\n    - y\n      - z\n  - w\n");

        let options = RenderOptions::new().include_types(true).indent_step(1).depth(1);
        let rendered = tree.render_tree(root, &options);
        assert_eq!(
            rendered,
            "- root : Node\n - x : Node\n  - <...>\n - w : Mesh\n  - <...>\n"
        );
    }

    #[test]
    fn test_descendants() {
        let (tree, [root, x, y, z, w]) = sample();

        let order: Vec<_> = tree.descendants(root, TraversalOrder::PreOrder).collect();
        assert_eq!(order, vec![root, x, y, z, w]);
    }
}
