//! Per-step traversal state and the consumer-facing control handle.
//!
//! A [`Signal`] owns the frontier and the depth bookkeeping of one traversal.
//! For every pulled node the driver hands a [`Control`] to the consumer, who
//! may redirect the outgoing edges, suppress the node, or end the walk.

use std::collections::HashSet;
use std::hash::Hash;

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::domain::buffer::{Linear, Queue, Stack};

/// Traversal order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Order {
    #[default]
    BreadthFirst,
    DepthFirst,
}

#[derive(Debug)]
enum Frontier<N> {
    Stack(Stack<N>),
    Queue(Queue<N>),
}

impl<N> Frontier<N> {
    fn for_order(order: Order) -> Self {
        match order {
            Order::BreadthFirst => Frontier::Queue(Queue::new()),
            Order::DepthFirst => Frontier::Stack(Stack::new()),
        }
    }
}

impl<N> Linear<N> for Frontier<N> {
    fn attach<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = N>,
    {
        match self {
            Frontier::Stack(s) => s.attach(items),
            Frontier::Queue(q) => q.attach(items),
        }
    }

    fn detach(&mut self) -> Option<N> {
        match self {
            Frontier::Stack(s) => s.detach(),
            Frontier::Queue(q) => q.detach(),
        }
    }

    fn peek(&self) -> Option<&N> {
        match self {
            Frontier::Stack(s) => s.peek(),
            Frontier::Queue(q) => q.peek(),
        }
    }

    fn count(&self) -> usize {
        match self {
            Frontier::Stack(s) => s.count(),
            Frontier::Queue(q) => q.count(),
        }
    }

    fn clear(&mut self) {
        match self {
            Frontier::Stack(s) => s.clear(),
            Frontier::Queue(q) => q.clear(),
        }
    }
}

/// State machine behind one traversal.
#[derive(Debug)]
pub struct Signal<N> {
    order: Order,
    frontier: Frontier<N>,
    /// Depth-first: siblings still pending per ancestry level.
    branches: Vec<usize>,
    /// Breadth-first: nodes still pending at the current depth.
    level_remaining: usize,
    depth: usize,
    count: usize,
    visited: Option<HashSet<N>>,
    edges: Option<Vec<N>>,
    skipped: bool,
    ended: bool,
}

impl<N> Signal<N>
where
    N: Clone + Eq + Hash,
{
    pub fn new<I>(roots: I, order: Order, detect_cycles: bool) -> Self
    where
        I: IntoIterator<Item = N>,
    {
        let mut signal = Self {
            order,
            frontier: Frontier::for_order(order),
            branches: Vec::new(),
            level_remaining: 0,
            depth: 0,
            count: 0,
            visited: detect_cycles.then(HashSet::new),
            edges: None,
            skipped: false,
            ended: false,
        };
        let seeded = signal.frontier.attach(roots);
        match order {
            Order::DepthFirst if seeded > 0 => signal.branches.push(seeded),
            Order::DepthFirst => {}
            Order::BreadthFirst => signal.level_remaining = seeded,
        }
        signal
    }

    pub fn order(&self) -> Order {
        self.order
    }

    /// Depth of the most recently pulled node, 0 for roots.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of nodes yielded so far.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Nodes still waiting in the frontier.
    pub fn pending(&self) -> usize {
        self.frontier.count()
    }

    pub fn is_exhausted(&self) -> bool {
        self.frontier.is_empty()
    }

    /// Pulls the next candidate and resets the per-step state.
    ///
    /// With cycle detection on, already examined nodes are discarded here and
    /// the next one is pulled instead.
    pub fn pull(&mut self) -> Option<N> {
        loop {
            let node = match self.order {
                Order::DepthFirst => self.pop_depth_first()?,
                Order::BreadthFirst => self.pop_breadth_first()?,
            };
            if let Some(visited) = self.visited.as_mut() {
                if !visited.insert(node.clone()) {
                    trace!(depth = self.depth, "discarding already visited node");
                    continue;
                }
            }
            self.edges = None;
            self.skipped = false;
            self.ended = false;
            return Some(node);
        }
    }

    fn pop_depth_first(&mut self) -> Option<N> {
        while self.branches.last() == Some(&0) {
            self.branches.pop();
        }
        let node = self.frontier.detach()?;
        self.depth = self.branches.len().saturating_sub(1);
        if let Some(top) = self.branches.last_mut() {
            *top -= 1;
        }
        Some(node)
    }

    fn pop_breadth_first(&mut self) -> Option<N> {
        if self.frontier.is_empty() {
            return None;
        }
        if self.level_remaining == 0 {
            self.depth += 1;
            self.level_remaining = self.frontier.count();
        }
        self.level_remaining -= 1;
        self.frontier.detach()
    }

    /// Handle for the consumer deciding about `node`.
    pub fn control<'a>(&'a mut self, node: &'a N) -> Control<'a, N> {
        Control { signal: self, node }
    }

    /// Finishes the current step: enqueues its edges and books the yield.
    ///
    /// Returns whether the current node is to be yielded.
    pub fn settle(&mut self) -> bool {
        if let Some(edges) = self.edges.take() {
            if !self.ended {
                let added = self.frontier.attach(edges);
                if self.order == Order::DepthFirst && added > 0 {
                    self.branches.push(added);
                }
            }
        }
        if self.skipped {
            return false;
        }
        self.count += 1;
        true
    }

    fn end(&mut self) {
        self.ended = true;
        self.edges = None;
        self.frontier.clear();
        self.branches.clear();
        self.level_remaining = 0;
    }
}

/// Consumer API for the node currently being examined.
pub struct Control<'a, N> {
    signal: &'a mut Signal<N>,
    node: &'a N,
}

impl<N> Control<'_, N>
where
    N: Clone + Eq + Hash,
{
    pub fn node(&self) -> &N {
        self.node
    }

    pub fn depth(&self) -> usize {
        self.signal.depth
    }

    /// Nodes yielded before this one.
    pub fn count(&self) -> usize {
        self.signal.count
    }

    /// Replaces the outgoing edges of the current node. The last call wins.
    ///
    /// Ignored once [`Control::end`] has been called in this step.
    pub fn next<I>(&mut self, nodes: I)
    where
        I: IntoIterator<Item = N>,
    {
        if self.signal.ended {
            return;
        }
        self.signal.edges = Some(nodes.into_iter().collect());
    }

    /// Keeps the current node out of the output; its edges are still followed.
    pub fn skip(&mut self) {
        self.signal.skipped = true;
    }

    /// Empties the frontier; the walk stops after this step.
    pub fn end(&mut self) {
        self.signal.end();
    }

    pub fn is_skipped(&self) -> bool {
        self.signal.skipped
    }

    pub fn is_ended(&self) -> bool {
        self.signal.ended
    }
}
