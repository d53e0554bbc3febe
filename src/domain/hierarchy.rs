//! Registry indexing whole subtrees by item identity.
//!
//! A [`Hierarchy`] owns a [`Forest`] and a [`Brand`] of its own. Every node of
//! an attached subtree is branded with that brand, which keeps it from being
//! unlinked behind the registry's back, and is indexed under the identity its
//! item yields.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use tracing::{debug, instrument, warn};

use crate::domain::arena::{Forest, NodeId};
use crate::domain::brand::{Brand, BrandRelease};
use crate::domain::builder::TreeBuilder;
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::sequence::Chain;
use crate::domain::signal::Control;
use crate::domain::traverse::{Traversal, TraversalOptions};

pub struct Hierarchy<T, Id, F> {
    forest: Forest<T>,
    /// In attach order
    roots: Vec<NodeId>,
    index: HashMap<Id, NodeId>,
    releases: HashMap<NodeId, BrandRelease>,
    brand: Brand,
    identify: F,
}

impl<T, Id, F> Hierarchy<T, Id, F>
where
    Id: Eq + Hash + Clone + fmt::Debug,
    F: Fn(&T) -> Id,
{
    pub fn new(identify: F) -> Self {
        Self::with_forest(Forest::new(), identify)
    }

    /// Registry over an existing forest. Nothing is indexed yet.
    pub fn with_forest(forest: Forest<T>, identify: F) -> Self {
        Self {
            forest,
            roots: Vec::new(),
            index: HashMap::new(),
            releases: HashMap::new(),
            brand: Brand::new(),
            identify,
        }
    }

    pub fn brand(&self) -> Brand {
        self.brand
    }

    pub fn forest(&self) -> &Forest<T> {
        &self.forest
    }

    /// Adds a free node; it joins the registry only through
    /// [`Hierarchy::attach_root`] or [`Hierarchy::attach`].
    pub fn insert(&mut self, item: T) -> NodeId {
        self.forest.insert(item)
    }

    /// Links free nodes to each other before they are attached.
    ///
    /// Members are off limits: the parent and every child must be unbranded.
    /// There is no mutable access to the forest itself.
    ///
    /// ```compile_fail
    /// use lineage::domain::Hierarchy;
    ///
    /// let mut hierarchy: Hierarchy<String, String, fn(&String) -> String> =
    ///     Hierarchy::new(String::clone);
    /// let _ = hierarchy.forest_mut();
    /// ```
    #[instrument(level = "debug", skip(self))]
    pub fn link(&mut self, parent: NodeId, children: &[NodeId]) -> TreeResult<()> {
        if let Some(&member) = std::iter::once(&parent)
            .chain(children)
            .find(|n| self.forest.is_branded(**n))
        {
            return Err(TreeError::Branded(member));
        }
        self.forest.attach(parent, children)
    }

    /// Builds the builder's trees as free nodes, turning each builder id
    /// into an item with `make`. Returns the new roots, ready for
    /// [`Hierarchy::attach_root`].
    pub fn build_with<B, M>(&mut self, builder: &TreeBuilder<B>, make: M) -> TreeResult<Vec<NodeId>>
    where
        B: Eq + Hash + Clone + fmt::Debug,
        M: FnMut(&B) -> T,
    {
        builder.build_with(&mut self.forest, make)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Number of indexed nodes.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains(&self, id: &Id) -> bool {
        self.index.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &Id> {
        self.index.keys()
    }

    pub fn get(&self, id: &Id) -> TreeResult<&T> {
        let node = self.get_node(id)?;
        self.forest.item(node).ok_or(TreeError::UnknownNode(node))
    }

    pub fn get_node(&self, id: &Id) -> TreeResult<NodeId> {
        self.index
            .get(id)
            .copied()
            .ok_or_else(|| TreeError::NotAMember(format!("{:?}", id)))
    }

    /// Identity of the item held by `node`.
    pub fn identify(&self, node: NodeId) -> TreeResult<Id> {
        self.forest
            .item(node)
            .map(&self.identify)
            .ok_or(TreeError::UnknownNode(node))
    }

    /// Takes ownership of the subtrees rooted at `nodes`.
    ///
    /// Fails unless every node is a root, every subtree node is unbranded, and
    /// no identity is already indexed or repeated.
    #[instrument(level = "debug", skip(self))]
    pub fn attach_root(&mut self, nodes: &[NodeId]) -> TreeResult<()> {
        let entries = self.absorbable(nodes)?;
        let releases = self.brand_all(&entries)?;
        self.index_all(entries, releases);
        self.roots.extend_from_slice(nodes);
        debug!(roots = self.roots.len(), indexed = self.index.len(), "attached roots");
        Ok(())
    }

    /// Links the subtrees rooted at `children` below the member `parent`.
    #[instrument(level = "debug", skip(self))]
    pub fn attach(&mut self, parent: &Id, children: &[NodeId]) -> TreeResult<()> {
        let parent = self.get_node(parent)?;
        let entries = self.absorbable(children)?;
        // Children must carry our brand to be compatible with the parent
        let releases = self.brand_all(&entries)?;
        if let Err(e) = self.forest.attach(parent, children) {
            for release in releases {
                release.release(&mut self.forest)?;
            }
            return Err(e);
        }
        self.index_all(entries, releases);
        debug!(%parent, indexed = self.index.len(), "attached children");
        Ok(())
    }

    /// Gives up the subtree of `id`: clears its brands, drops it from the
    /// index and unlinks it, returning its now free root.
    #[instrument(level = "debug", skip(self))]
    pub fn release(&mut self, id: &Id) -> TreeResult<NodeId> {
        let node = self.get_node(id)?;
        let subtree = self.forest.get_descendants(node, TraversalOptions::default())?;
        for member in subtree {
            let member_id = self.identify(member)?;
            self.index.remove(&member_id);
            if let Some(release) = self.releases.remove(&member) {
                release.release(&mut self.forest)?;
            }
        }
        if self.forest.is_root(node) {
            self.roots.retain(|r| *r != node);
        } else {
            self.forest.detach_self(node)?;
        }
        debug!(%node, indexed = self.index.len(), "released subtree");
        Ok(node)
    }

    /// Clears every brand this registry holds and hands back the forest.
    pub fn into_forest(mut self) -> Forest<T> {
        for (node, release) in self.releases.drain() {
            if let Err(e) = release.release(&mut self.forest) {
                warn!(%node, error = %e, "brand release failed");
            }
        }
        self.forest
    }

    fn absorbable(&self, nodes: &[NodeId]) -> TreeResult<Vec<(NodeId, Id)>> {
        if nodes.is_empty() {
            return Err(TreeError::EmptyArguments);
        }
        let mut seen_nodes = HashSet::new();
        let mut seen_ids = HashSet::new();
        let mut entries = Vec::new();
        for &root in nodes {
            if !seen_nodes.insert(root) {
                return Err(TreeError::DuplicateNode(root));
            }
            if !self.forest.contains(root) {
                return Err(TreeError::UnknownNode(root));
            }
            if !self.forest.is_root(root) {
                return Err(TreeError::NotARoot(root));
            }
            for member in self.forest.descendants(root, TraversalOptions::default())? {
                if self.forest.is_branded(member) {
                    return Err(TreeError::AlreadyBranded(member));
                }
                let id = self.identify(member)?;
                if self.index.contains_key(&id) || !seen_ids.insert(id.clone()) {
                    return Err(TreeError::DuplicateId(format!("{:?}", id)));
                }
                entries.push((member, id));
            }
        }
        Ok(entries)
    }

    fn brand_all(&mut self, entries: &[(NodeId, Id)]) -> TreeResult<Vec<BrandRelease>> {
        entries
            .iter()
            .map(|(node, _)| self.forest.brand(*node, self.brand))
            .collect()
    }

    fn index_all(&mut self, entries: Vec<(NodeId, Id)>, releases: Vec<BrandRelease>) {
        for ((node, id), release) in entries.into_iter().zip(releases) {
            self.index.insert(id, node);
            self.releases.insert(node, release);
        }
    }

    pub fn ancestors(
        &self,
        id: &Id,
        exclude_self: bool,
    ) -> TreeResult<Chain<NodeId, impl FnMut(&NodeId) -> Option<NodeId> + '_>> {
        self.forest.ancestors(self.get_node(id)?, exclude_self)
    }

    pub fn descendants(
        &self,
        id: &Id,
        options: TraversalOptions,
    ) -> TreeResult<Traversal<NodeId, impl FnMut(&mut Control<'_, NodeId>) + '_>> {
        self.forest.descendants(self.get_node(id)?, options)
    }

    /// Ancestor nodes of `id`, nearest first.
    pub fn get_ancestors(&self, id: &Id, exclude_self: bool) -> TreeResult<Vec<NodeId>> {
        Ok(self.ancestors(id, exclude_self)?.collect())
    }

    pub fn get_ancestor_items(&self, id: &Id, exclude_self: bool) -> TreeResult<Vec<&T>> {
        Ok(self.items(self.ancestors(id, exclude_self)?))
    }

    pub fn get_ancestor_ids(&self, id: &Id, exclude_self: bool) -> TreeResult<Vec<Id>> {
        self.ancestors(id, exclude_self)?
            .map(|node| self.identify(node))
            .collect()
    }

    pub fn get_descendants(&self, id: &Id, options: TraversalOptions) -> TreeResult<Vec<NodeId>> {
        Ok(self.descendants(id, options)?.collect())
    }

    pub fn get_descendant_items(&self, id: &Id, options: TraversalOptions) -> TreeResult<Vec<&T>> {
        Ok(self.items(self.descendants(id, options)?))
    }

    pub fn get_descendant_ids(&self, id: &Id, options: TraversalOptions) -> TreeResult<Vec<Id>> {
        self.descendants(id, options)?
            .map(|node| self.identify(node))
            .collect()
    }

    fn items(&self, nodes: impl Iterator<Item = NodeId>) -> Vec<&T> {
        nodes.filter_map(|node| self.forest.item(node)).collect()
    }
}

impl<T: fmt::Debug, Id: fmt::Debug, F> fmt::Debug for Hierarchy<T, Id, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hierarchy")
            .field("brand", &self.brand)
            .field("roots", &self.roots)
            .field("index", &self.index)
            .field("forest", &self.forest)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn identity(s: &&'static str) -> &'static str {
        *s
    }

    #[test]
    fn given_member_when_linking_directly_then_branded_error() {
        let mut hierarchy = Hierarchy::new(identity);
        let a = hierarchy.insert("a");
        let b = hierarchy.insert("b");
        hierarchy.link(a, &[b]).unwrap();
        hierarchy.attach_root(&[a]).unwrap();
        let x = hierarchy.insert("x");

        assert_eq!(hierarchy.link(b, &[x]), Err(TreeError::Branded(b)));
        assert_eq!(hierarchy.link(x, &[b]), Err(TreeError::Branded(b)));
        assert!(hierarchy.forest().is_root(x));
        assert_eq!(hierarchy.forest().brand_of(b), Some(hierarchy.brand()));
    }

    #[test]
    fn given_duplicate_identity_when_attaching_root_then_nothing_is_indexed() {
        let mut hierarchy = Hierarchy::new(identity);
        let a = hierarchy.insert("a");
        let twin = hierarchy.insert("a");
        assert_eq!(
            hierarchy.attach_root(&[a, twin]),
            Err(TreeError::DuplicateId("\"a\"".to_string()))
        );
        assert!(hierarchy.is_empty());
        assert!(!hierarchy.forest().is_branded(a));
    }

    #[test]
    fn given_member_parent_when_attaching_then_child_is_linked_and_indexed() {
        let mut hierarchy = Hierarchy::new(identity);
        let a = hierarchy.insert("a");
        hierarchy.attach_root(&[a]).unwrap();
        let x = hierarchy.insert("x");

        assert_eq!(hierarchy.attach(&"a", &[]), Err(TreeError::EmptyArguments));
        hierarchy.attach(&"a", &[x]).unwrap();
        assert_eq!(hierarchy.get_node(&"x"), Ok(x));
        assert_eq!(hierarchy.forest().parent(x), Some(a));
        assert_eq!(hierarchy.forest().brand_of(x), Some(hierarchy.brand()));
        assert_eq!(hierarchy.roots(), &[a]);
    }

    #[test]
    fn given_member_when_released_then_free_again() {
        let mut hierarchy = Hierarchy::new(identity);
        let a = hierarchy.insert("a");
        let b = hierarchy.insert("b");
        let c = hierarchy.insert("c");
        hierarchy.link(a, &[b]).unwrap();
        hierarchy.link(b, &[c]).unwrap();
        hierarchy.attach_root(&[a]).unwrap();

        let freed = hierarchy.release(&"b").unwrap();

        assert_eq!(freed, b);
        assert!(hierarchy.forest().is_root(b));
        assert!(!hierarchy.forest().is_branded(b));
        assert!(!hierarchy.forest().is_branded(c));
        assert!(hierarchy.contains(&"a"));
        assert!(!hierarchy.contains(&"c"));
        assert_eq!(hierarchy.len(), 1);
        assert!(hierarchy.forest().is_leaf(a));
    }

    #[test]
    fn given_hierarchy_when_into_forest_then_all_brands_cleared() {
        let mut hierarchy = Hierarchy::new(identity);
        let a = hierarchy.insert("a");
        let b = hierarchy.insert("b");
        hierarchy.link(a, &[b]).unwrap();
        hierarchy.attach_root(&[a]).unwrap();

        let mut forest = hierarchy.into_forest();

        assert!(!forest.is_branded(a) && !forest.is_branded(b));
        forest.detach_self(b).unwrap();
    }
}
