//! Lazy graph traversal driven by a [`Signal`].

use std::fmt;
use std::hash::Hash;
use std::iter::FusedIterator;

use serde::{Deserialize, Serialize};

use crate::domain::signal::{Control, Order, Signal};

/// Options recognized by the traversal call sites.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct TraversalOptions {
    #[serde(rename = "type")]
    pub order: Order,
    /// Leave the start node itself out of the walk.
    #[serde(alias = "exclude_self")]
    pub exclude_self: bool,
    /// Silently drop nodes that were already examined.
    #[serde(alias = "detect_cycles")]
    pub detect_cycles: bool,
}

impl TraversalOptions {
    pub fn breadth_first() -> Self {
        Self::default()
    }

    pub fn depth_first() -> Self {
        Self {
            order: Order::DepthFirst,
            ..Self::default()
        }
    }

    pub fn with_order(mut self, order: Order) -> Self {
        self.order = order;
        self
    }

    pub fn excluding_self(mut self) -> Self {
        self.exclude_self = true;
        self
    }

    pub fn detecting_cycles(mut self) -> Self {
        self.detect_cycles = true;
        self
    }
}

/// Iterator over the nodes of a graph walk.
///
/// Every pulled node is handed to the visit callback through a [`Control`];
/// the node is yielded unless the callback skipped it.
pub struct Traversal<N, F> {
    signal: Signal<N>,
    visit: F,
}

impl<N, F> Traversal<N, F>
where
    N: Clone + Eq + Hash,
    F: FnMut(&mut Control<'_, N>),
{
    /// Walks from `roots`, letting `visit` decide about every node.
    ///
    /// A node whose callback never calls [`Control::next`] has no outgoing
    /// edges.
    pub fn with_signal<I>(roots: I, order: Order, detect_cycles: bool, visit: F) -> Self
    where
        I: IntoIterator<Item = N>,
    {
        Self {
            signal: Signal::new(roots, order, detect_cycles),
            visit,
        }
    }

    /// Depth of the node returned last.
    pub fn depth(&self) -> usize {
        self.signal.depth()
    }

    /// Number of nodes yielded so far.
    pub fn yielded(&self) -> usize {
        self.signal.count()
    }

    /// Pairs every yielded node with its depth.
    pub fn with_depth(self) -> WithDepth<N, F> {
        WithDepth { inner: self }
    }
}

/// Walks from `roots`, following `children` for every node.
pub fn traverse<N, I, C, K>(
    roots: I,
    order: Order,
    detect_cycles: bool,
    mut children: C,
) -> Traversal<N, impl FnMut(&mut Control<'_, N>)>
where
    N: Clone + Eq + Hash,
    I: IntoIterator<Item = N>,
    C: FnMut(&N) -> K,
    K: IntoIterator<Item = N>,
{
    Traversal::with_signal(roots, order, detect_cycles, move |control: &mut Control<'_, N>| {
        let edges = children(control.node());
        control.next(edges);
    })
}

impl<N, F> Iterator for Traversal<N, F>
where
    N: Clone + Eq + Hash,
    F: FnMut(&mut Control<'_, N>),
{
    type Item = N;

    fn next(&mut self) -> Option<N> {
        loop {
            let node = self.signal.pull()?;
            let mut control = self.signal.control(&node);
            (self.visit)(&mut control);
            if self.signal.settle() {
                return Some(node);
            }
        }
    }
}

impl<N, F> FusedIterator for Traversal<N, F>
where
    N: Clone + Eq + Hash,
    F: FnMut(&mut Control<'_, N>),
{
}

impl<N: fmt::Debug, F> fmt::Debug for Traversal<N, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Traversal")
            .field("signal", &self.signal)
            .finish_non_exhaustive()
    }
}

/// Adapter returned by [`Traversal::with_depth`].
pub struct WithDepth<N, F> {
    inner: Traversal<N, F>,
}

impl<N, F> Iterator for WithDepth<N, F>
where
    N: Clone + Eq + Hash,
    F: FnMut(&mut Control<'_, N>),
{
    type Item = (N, usize);

    fn next(&mut self) -> Option<(N, usize)> {
        let node = self.inner.next()?;
        Some((node, self.inner.depth()))
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use rstest::{fixture, rstest};

    use super::*;

    type Graph = HashMap<&'static str, Vec<&'static str>>;
    type Ctl<'a> = Control<'a, &'static str>;

    //      a
    //     / \
    //    b   c
    //    |   |
    //    d   e
    //        |
    //        f
    #[fixture]
    fn graph() -> Graph {
        HashMap::from([
            ("a", vec!["b", "c"]),
            ("b", vec!["d"]),
            ("c", vec!["e"]),
            ("e", vec!["f"]),
        ])
    }

    fn children<'g>(graph: &'g Graph) -> impl FnMut(&&'static str) -> Vec<&'static str> + 'g {
        move |n: &&'static str| graph.get(n).cloned().unwrap_or_default()
    }

    #[rstest]
    #[case(Order::BreadthFirst, vec![("a", 0), ("b", 1), ("c", 1), ("d", 2), ("e", 2), ("f", 3)])]
    #[case(Order::DepthFirst, vec![("a", 0), ("b", 1), ("d", 2), ("c", 1), ("e", 2), ("f", 3)])]
    fn given_tree_when_traversing_then_order_and_depth_match(
        graph: Graph,
        #[case] order: Order,
        #[case] expected: Vec<(&'static str, usize)>,
    ) {
        let walked: Vec<_> = traverse(["a"], order, false, children(&graph))
            .with_depth()
            .collect();
        assert_eq!(walked, expected);
    }

    #[rstest]
    fn given_skip_when_traversing_then_node_hidden_but_children_followed(graph: Graph) {
        let mut lookup = children(&graph);
        let visit = |c: &mut Ctl<'_>| {
            let edges = lookup(c.node());
            c.next(edges);
            if *c.node() == "c" {
                c.skip();
            }
        };
        let walked: Vec<_> =
            Traversal::with_signal(["a"], Order::BreadthFirst, false, visit).collect();
        assert_eq!(walked, vec!["a", "b", "d", "e", "f"]);
    }

    #[rstest]
    fn given_end_when_traversing_then_stops_after_current_node(graph: Graph) {
        let mut lookup = children(&graph);
        let visit = |c: &mut Ctl<'_>| {
            let edges = lookup(c.node());
            c.next(edges);
            if *c.node() == "d" {
                c.end();
            }
        };
        let mut walk = Traversal::with_signal(["a"], Order::DepthFirst, false, visit);
        let walked: Vec<_> = walk.by_ref().collect();
        assert_eq!(walked, vec!["a", "b", "d"]);
        assert_eq!(walk.yielded(), 3);
        assert_eq!(walk.next(), None);
    }

    #[rstest]
    fn given_next_override_when_traversing_then_redirects_edges(graph: Graph) {
        let mut lookup = children(&graph);
        let visit = |c: &mut Ctl<'_>| {
            if *c.node() == "a" {
                c.next(["e"]);
            } else {
                let edges = lookup(c.node());
                c.next(edges);
            }
        };
        let walked: Vec<_> =
            Traversal::with_signal(["a"], Order::BreadthFirst, false, visit).collect();
        assert_eq!(walked, vec!["a", "e", "f"]);
    }

    #[test]
    fn given_back_edge_when_detecting_cycles_then_each_node_once() {
        // root -> a -> b -> a
        let graph: Graph = HashMap::from([("root", vec!["a"]), ("a", vec!["b"]), ("b", vec!["a"])]);
        for order in [Order::BreadthFirst, Order::DepthFirst] {
            let walked: Vec<_> = traverse(["root"], order, true, children(&graph)).collect();
            assert_eq!(walked, vec!["root", "a", "b"]);
        }
    }

    #[test]
    fn given_diamond_when_detecting_cycles_then_first_visit_order_kept() {
        // a -> [b, c], b -> [d], c -> [d]
        let graph: Graph =
            HashMap::from([("a", vec!["b", "c"]), ("b", vec!["d"]), ("c", vec!["d"])]);
        let walked: Vec<_> = traverse(["a"], Order::DepthFirst, true, children(&graph)).collect();
        assert_eq!(walked, vec!["a", "b", "d", "c"]);

        let unchecked: Vec<_> =
            traverse(["a"], Order::DepthFirst, false, children(&graph)).collect();
        assert_eq!(unchecked, vec!["a", "b", "d", "c", "d"]);
    }

    #[rstest]
    fn given_lazy_walk_when_taking_first_match_then_stops_pulling(graph: Graph) {
        let mut visited = 0;
        let visit = |c: &mut Ctl<'_>| {
            visited += 1;
            let edges = graph.get(c.node()).cloned().unwrap_or_default();
            c.next(edges);
        };
        let found = Traversal::with_signal(["a"], Order::BreadthFirst, false, visit)
            .find(|n| *n == "c");
        assert_eq!(found, Some("c"));
        assert_eq!(visited, 3);
    }

    #[test]
    fn given_options_when_deserializing_then_uses_kebab_case_names() {
        let options: TraversalOptions =
            toml::from_str("type = \"depth-first\"\nexclude-self = true\n").unwrap();
        assert_eq!(options, TraversalOptions::depth_first().excluding_self());
    }
}
