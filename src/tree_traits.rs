//! Text rendering of trees via `termtree`.

use std::fmt::{self, Display};
use std::hash::Hash;

use termtree::Tree;
use tracing::instrument;

use crate::domain::arena::{Forest, NodeId};
use crate::domain::error::{TreeError, TreeResult};
use crate::domain::hierarchy::Hierarchy;

pub trait TreeNodeConvert {
    /// Renders the subtree rooted at `root`.
    fn to_tree_string(&self, root: NodeId) -> TreeResult<Tree<String>>;

    /// Renders every root.
    fn to_tree_strings(&self) -> TreeResult<Vec<Tree<String>>>;
}

fn build_tree<T: Display>(forest: &Forest<T>, node_idx: NodeId) -> TreeResult<Tree<String>> {
    let item = forest.item(node_idx).ok_or(TreeError::UnknownNode(node_idx))?;
    let leaves = forest
        .children(node_idx)
        .iter()
        .map(|&child_idx| build_tree(forest, child_idx))
        .collect::<TreeResult<Vec<_>>>()?;
    Ok(Tree::new(item.to_string()).with_leaves(leaves))
}

impl<T: Display> TreeNodeConvert for Forest<T> {
    #[instrument(level = "debug", skip(self))]
    fn to_tree_string(&self, root: NodeId) -> TreeResult<Tree<String>> {
        build_tree(self, root)
    }

    fn to_tree_strings(&self) -> TreeResult<Vec<Tree<String>>> {
        self.roots().map(|root| build_tree(self, root)).collect()
    }
}

impl<T, Id, F> TreeNodeConvert for Hierarchy<T, Id, F>
where
    T: Display,
    Id: Eq + Hash + Clone + fmt::Debug,
    F: Fn(&T) -> Id,
{
    fn to_tree_string(&self, root: NodeId) -> TreeResult<Tree<String>> {
        self.forest().to_tree_string(root)
    }

    /// Roots in attach order.
    fn to_tree_strings(&self) -> TreeResult<Vec<Tree<String>>> {
        self.roots()
            .iter()
            .map(|&root| build_tree(self.forest(), root))
            .collect()
    }
}
