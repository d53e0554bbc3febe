//! Assembles linked nodes from relation lists, child-maps and parent-maps.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::hash::Hash;

use tracing::{debug, instrument};

use crate::domain::arena::{Forest, NodeId};
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::signal::Order;
use crate::domain::traverse::traverse;

/// Collects parent/child relations and turns them into unbranded trees.
///
/// Ids keep the order in which they were first seen; roots and siblings are
/// built in that order.
#[derive(Debug, Clone)]
pub struct TreeBuilder<Id> {
    relationship_cache: HashMap<Id, Vec<Id>>,
    parent_of: HashMap<Id, Id>,
    all_ids: Vec<Id>,
    known: HashSet<Id>,
}

impl<Id> Default for TreeBuilder<Id>
where
    Id: Eq + Hash + Clone + fmt::Debug,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<Id> TreeBuilder<Id>
where
    Id: Eq + Hash + Clone + fmt::Debug,
{
    pub fn new() -> Self {
        Self {
            relationship_cache: HashMap::new(),
            parent_of: HashMap::new(),
            all_ids: Vec::new(),
            known: HashSet::new(),
        }
    }

    /// From `(parent, child)` pairs.
    pub fn from_relations<I>(relations: I) -> TreeResult<Self>
    where
        I: IntoIterator<Item = (Id, Id)>,
    {
        let mut builder = Self::new();
        for (parent, child) in relations {
            builder.relation(parent, child)?;
        }
        Ok(builder)
    }

    /// From `parent -> children` entries. A parent with no children still
    /// becomes a node.
    pub fn from_child_map<I, C>(child_map: I) -> TreeResult<Self>
    where
        I: IntoIterator<Item = (Id, C)>,
        C: IntoIterator<Item = Id>,
    {
        let mut builder = Self::new();
        for (parent, children) in child_map {
            builder.node(parent.clone());
            for child in children {
                builder.relation(parent.clone(), child)?;
            }
        }
        Ok(builder)
    }

    /// From `child -> parent` entries.
    pub fn from_parent_map<I>(parent_map: I) -> TreeResult<Self>
    where
        I: IntoIterator<Item = (Id, Id)>,
    {
        Self::from_relations(parent_map.into_iter().map(|(child, parent)| (parent, child)))
    }

    /// Declares a node, with or without relations.
    pub fn node(&mut self, id: Id) -> &mut Self {
        if self.known.insert(id.clone()) {
            self.all_ids.push(id);
        }
        self
    }

    /// Declares `child` below `parent`. Repeating a relation is a no-op.
    pub fn relation(&mut self, parent: Id, child: Id) -> TreeResult<&mut Self> {
        match self.parent_of.get(&child) {
            Some(existing) if *existing == parent => return Ok(self),
            Some(_) => return Err(TreeError::MultipleParents(format!("{:?}", child))),
            None => {}
        }
        if parent == child {
            return Err(TreeError::CycleDetected(format!("{:?}", child)));
        }
        self.node(parent.clone());
        self.node(child.clone());
        self.parent_of.insert(child.clone(), parent.clone());
        self.relationship_cache.entry(parent).or_default().push(child);
        Ok(self)
    }

    pub fn len(&self) -> usize {
        self.all_ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_ids.is_empty()
    }

    fn find_root_nodes(&self) -> Vec<Id> {
        self.all_ids
            .iter()
            .filter(|id| !self.parent_of.contains_key(*id))
            .cloned()
            .collect()
    }

    fn children_of(&self, id: &Id) -> &[Id] {
        self.relationship_cache
            .get(id)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Builds the trees into `forest` with the ids as items.
    pub fn build(&self, forest: &mut Forest<Id>) -> TreeResult<Vec<NodeId>> {
        self.build_with(forest, Id::clone)
    }

    /// Builds the trees into `forest`, turning each id into an item with
    /// `make`. Returns the roots.
    ///
    /// Ids caught in a parent cycle are unreachable from any root; they are
    /// reported before anything is inserted.
    #[instrument(level = "debug", skip(self, forest, make))]
    pub fn build_with<T, M>(&self, forest: &mut Forest<T>, mut make: M) -> TreeResult<Vec<NodeId>>
    where
        M: FnMut(&Id) -> T,
    {
        let root_ids = self.find_root_nodes();

        let reachable: HashSet<Id> = traverse(
            root_ids.iter().cloned(),
            Order::DepthFirst,
            false,
            |id: &Id| self.children_of(id).iter().cloned(),
        )
        .collect();
        if let Some(stranded) = self.all_ids.iter().find(|id| !reachable.contains(*id)) {
            return Err(TreeError::CycleDetected(format!("{:?}", stranded)));
        }

        let mut roots = Vec::with_capacity(root_ids.len());
        for root_id in &root_ids {
            let root = forest.insert(make(root_id));
            roots.push(root);

            let mut stack = vec![(root_id, root)];
            while let Some((parent_id, parent)) = stack.pop() {
                let children = self.children_of(parent_id);
                let mut created = Vec::with_capacity(children.len());
                for child_id in children {
                    let child = forest.insert(make(child_id));
                    created.push(child);
                    stack.push((child_id, child));
                }
                if !created.is_empty() {
                    forest.attach(parent, &created)?;
                }
            }
        }
        debug!(roots = roots.len(), nodes = self.all_ids.len(), "built trees");
        Ok(roots)
    }
}
