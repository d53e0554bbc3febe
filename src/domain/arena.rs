//! Arena-backed node storage and the structural operations on it.
//!
//! Nodes live in a generational arena and refer to each other by [`NodeId`],
//! so parent back-references and traversal frontiers never hold borrows.

use std::collections::HashSet;
use std::fmt;

use generational_arena::{Arena, Index};
use tracing::{debug, instrument};

use crate::domain::brand::{Brand, BrandRelease};
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::sequence::Chain;
use crate::domain::signal::{Control, Order};
use crate::domain::traverse::{traverse, Traversal, TraversalOptions};

/// Handle of a node inside a [`Forest`].
///
/// Generational: the handle of a removed node never resolves to a node
/// inserted later into the same slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(Index);

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (slot, generation) = self.0.into_raw_parts();
        write!(f, "#{}v{}", slot, generation)
    }
}

/// One payload item with its links.
#[derive(Debug)]
pub struct Node<T> {
    item: T,
    /// None for root nodes
    parent: Option<NodeId>,
    /// In attach order
    children: Vec<NodeId>,
    brand: Option<Brand>,
}

impl<T> Node<T> {
    fn new(item: T) -> Self {
        Self {
            item,
            parent: None,
            children: Vec::new(),
            brand: None,
        }
    }

    pub fn item(&self) -> &T {
        &self.item
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn brand(&self) -> Option<Brand> {
        self.brand
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    /// Neither root nor leaf.
    pub fn is_linked(&self) -> bool {
        !self.is_root() && !self.is_leaf()
    }

    pub fn is_branded(&self) -> bool {
        self.brand.is_some()
    }
}

/// Arena of nodes forming any number of trees.
#[derive(Debug)]
pub struct Forest<T> {
    arena: Arena<Node<T>>,
}

impl<T> Default for Forest<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Forest<T> {
    pub fn new() -> Self {
        Self {
            arena: Arena::new(),
        }
    }

    /// Adds `item` as an unbranded, unlinked node.
    #[instrument(level = "trace", skip(self, item))]
    pub fn insert(&mut self, item: T) -> NodeId {
        NodeId(self.arena.insert(Node::new(item)))
    }

    /// Removes an isolated, unbranded node and hands back its item.
    #[instrument(level = "debug", skip(self))]
    pub fn remove(&mut self, id: NodeId) -> TreeResult<T> {
        let node = self.node(id)?;
        if !node.is_root() || !node.is_leaf() {
            return Err(TreeError::NotIsolated(id));
        }
        if node.is_branded() {
            return Err(TreeError::Branded(id));
        }
        self.arena
            .remove(id.0)
            .map(|node| node.item)
            .ok_or(TreeError::UnknownNode(id))
    }

    pub fn get(&self, id: NodeId) -> Option<&Node<T>> {
        self.arena.get(id.0)
    }

    pub fn item(&self, id: NodeId) -> Option<&T> {
        self.get(id).map(Node::item)
    }

    /// Mutable access to the payload; links and brand stay untouched.
    pub fn item_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.arena.get_mut(id.0).map(|node| &mut node.item)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.arena.contains(id.0)
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NodeId, &Node<T>)> {
        self.arena.iter().map(|(idx, node)| (NodeId(idx), node))
    }

    /// All nodes without a parent, in slot order.
    pub fn roots(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.iter()
            .filter(|(_, node)| node.is_root())
            .map(|(id, _)| id)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(Node::parent)
    }

    /// Children of `id`; empty for leaves and unknown ids.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(Node::children).unwrap_or(&[])
    }

    pub fn is_root(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_root)
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_leaf)
    }

    pub fn is_linked(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_linked)
    }

    pub fn is_branded(&self, id: NodeId) -> bool {
        self.get(id).is_some_and(Node::is_branded)
    }

    pub fn brand_of(&self, id: NodeId) -> Option<Brand> {
        self.get(id).and_then(Node::brand)
    }

    fn node(&self, id: NodeId) -> TreeResult<&Node<T>> {
        self.get(id).ok_or(TreeError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> TreeResult<&mut Node<T>> {
        self.arena.get_mut(id.0).ok_or(TreeError::UnknownNode(id))
    }

    /// Topmost ancestor of `id` (`id` itself for roots).
    pub fn root_of(&self, id: NodeId) -> TreeResult<NodeId> {
        let ancestry = self.ancestors(id, false)?;
        Ok(ancestry.last().unwrap_or(id))
    }

    /// Links `children` below `parent`, in the given order.
    ///
    /// Every child must be a root, appear once, not be `parent`'s own tree top,
    /// and be brand compatible with `parent`. Nothing changes unless all of
    /// them qualify.
    #[instrument(level = "debug", skip(self))]
    pub fn attach(&mut self, parent: NodeId, children: &[NodeId]) -> TreeResult<()> {
        if children.is_empty() {
            return Err(TreeError::EmptyArguments);
        }
        let parent_brand = self.node(parent)?.brand;
        let top = self.root_of(parent)?;

        let mut seen = HashSet::with_capacity(children.len());
        for &child in children {
            let node = self.node(child)?;
            if !seen.insert(child) {
                return Err(TreeError::DuplicateNode(child));
            }
            if !node.is_root() {
                return Err(TreeError::NotARoot(child));
            }
            // A root is an ancestor of `parent` only if it tops parent's tree
            if child == top {
                return Err(TreeError::WouldCycle { parent, child });
            }
            if node.brand != parent_brand {
                return Err(TreeError::BrandMismatch { parent, child });
            }
        }

        for &child in children {
            self.node_mut(child)?.parent = Some(parent);
        }
        self.node_mut(parent)?.children.extend_from_slice(children);
        debug!(%parent, count = children.len(), "attached children");
        Ok(())
    }

    /// Unlinks `children` from `parent`.
    ///
    /// Every entry must be a current, unbranded child of `parent` and appear
    /// once. Nothing changes unless all of them qualify.
    #[instrument(level = "debug", skip(self))]
    pub fn detach(&mut self, parent: NodeId, children: &[NodeId]) -> TreeResult<()> {
        if children.is_empty() {
            return Err(TreeError::EmptyArguments);
        }
        self.node(parent)?;

        let mut seen = HashSet::with_capacity(children.len());
        for &child in children {
            let node = self.node(child)?;
            if !seen.insert(child) {
                return Err(TreeError::DuplicateNode(child));
            }
            if node.parent != Some(parent) {
                return Err(TreeError::NotAChild { parent, child });
            }
            if node.is_branded() {
                return Err(TreeError::Branded(child));
            }
        }

        for &child in children {
            self.node_mut(child)?.parent = None;
        }
        let node = self.node_mut(parent)?;
        node.children.retain(|c| !seen.contains(c));
        if node.children.is_empty() {
            node.children = Vec::new();
        }
        debug!(%parent, count = children.len(), "detached children");
        Ok(())
    }

    /// Unlinks `id` from its parent.
    #[instrument(level = "debug", skip(self))]
    pub fn detach_self(&mut self, id: NodeId) -> TreeResult<()> {
        let node = self.node(id)?;
        let parent = node.parent.ok_or(TreeError::IsRoot(id))?;
        if node.is_branded() {
            return Err(TreeError::Branded(id));
        }
        self.detach(parent, &[id])
    }

    /// Breaks a subtree into isolated nodes.
    ///
    /// Every proper descendant of `id` is unlinked from its parent. With
    /// `include_ancestry` the cascade starts at the root of `id`'s tree
    /// instead, which takes the whole tree apart. Without it `id` keeps its own
    /// parent.
    ///
    /// Atomic: if any node that would be unlinked is branded, nothing changes.
    #[instrument(level = "debug", skip(self))]
    pub fn dismantle(&mut self, id: NodeId, include_ancestry: bool) -> TreeResult<()> {
        let top = if include_ancestry {
            self.root_of(id)?
        } else {
            self.node(id)?;
            id
        };
        let affected: Vec<NodeId> = self
            .descendants(top, TraversalOptions::depth_first().excluding_self())?
            .collect();
        if let Some(&branded) = affected.iter().find(|n| self.is_branded(**n)) {
            return Err(TreeError::Branded(branded));
        }

        for &node_id in &affected {
            let node = self.node_mut(node_id)?;
            node.parent = None;
            node.children = Vec::new();
        }
        self.node_mut(top)?.children = Vec::new();
        debug!(%top, count = affected.len(), "dismantled");
        Ok(())
    }

    /// Marks `id` as owned by `owner`.
    ///
    /// The returned release is the only way to clear the brand again.
    #[instrument(level = "debug", skip(self))]
    pub fn brand(&mut self, id: NodeId, owner: Brand) -> TreeResult<BrandRelease> {
        let node = self.node_mut(id)?;
        if node.is_branded() {
            return Err(TreeError::AlreadyBranded(id));
        }
        node.brand = Some(owner);
        Ok(BrandRelease::new(id, owner))
    }

    pub(crate) fn unbrand(&mut self, id: NodeId, owner: Brand) -> TreeResult<()> {
        let node = self.node_mut(id)?;
        if node.brand == Some(owner) {
            node.brand = None;
        }
        Ok(())
    }

    /// Both unbranded, or both branded by equal owners.
    pub fn is_brand_compatible(&self, a: NodeId, b: NodeId) -> TreeResult<bool> {
        Ok(self.node(a)?.brand == self.node(b)?.brand)
    }

    /// Lazy walk up the parent chain, nearest first.
    pub fn ancestors(
        &self,
        id: NodeId,
        exclude_self: bool,
    ) -> TreeResult<Chain<NodeId, impl FnMut(&NodeId) -> Option<NodeId> + '_>> {
        let node = self.node(id)?;
        let first = if exclude_self { node.parent } else { Some(id) };
        Ok(Chain::new(first, move |n: &NodeId| self.parent(*n)))
    }

    /// Lazy walk over the subtree of `id`.
    pub fn descendants(
        &self,
        id: NodeId,
        options: TraversalOptions,
    ) -> TreeResult<Traversal<NodeId, impl FnMut(&mut Control<'_, NodeId>) + '_>> {
        let node = self.node(id)?;
        let roots = if options.exclude_self {
            node.children.clone()
        } else {
            vec![id]
        };
        Ok(traverse(
            roots,
            options.order,
            options.detect_cycles,
            move |n: &NodeId| self.children(*n).iter().copied(),
        ))
    }

    pub fn get_ancestors(&self, id: NodeId, exclude_self: bool) -> TreeResult<Vec<NodeId>> {
        Ok(self.ancestors(id, exclude_self)?.collect())
    }

    pub fn get_descendants(
        &self,
        id: NodeId,
        options: TraversalOptions,
    ) -> TreeResult<Vec<NodeId>> {
        Ok(self.descendants(id, options)?.collect())
    }

    /// Number of levels in the subtree of `id`, 1 for a leaf.
    #[instrument(level = "trace", skip(self))]
    pub fn height(&self, id: NodeId) -> TreeResult<usize> {
        let deepest = self
            .descendants(id, TraversalOptions::default())?
            .with_depth()
            .map(|(_, depth)| depth)
            .max()
            .unwrap_or(0);
        Ok(deepest + 1)
    }

    /// Leaves of the subtree of `id`, left to right.
    #[instrument(level = "trace", skip(self))]
    pub fn leaves(&self, id: NodeId) -> TreeResult<Vec<NodeId>> {
        Ok(self
            .descendants(id, TraversalOptions::default().with_order(Order::DepthFirst))?
            .filter(|n| self.is_leaf(*n))
            .collect())
    }
}
