//! Lazy walk over a singly linked chain, e.g. a node's ancestry.

use std::fmt;
use std::iter::FusedIterator;

/// Forward-only iterator starting at `first` and following `next` until it
/// returns `None`.
///
/// No cycle detection is applied: a `next` that loops back never terminates.
pub struct Chain<N, F> {
    current: Option<N>,
    next: F,
}

impl<N, F> Chain<N, F>
where
    F: FnMut(&N) -> Option<N>,
{
    pub fn new(first: Option<N>, next: F) -> Self {
        Self {
            current: first,
            next,
        }
    }
}

/// Shorthand for [`Chain::new`].
pub fn chain<N, F>(first: Option<N>, next: F) -> Chain<N, F>
where
    F: FnMut(&N) -> Option<N>,
{
    Chain::new(first, next)
}

impl<N, F> Iterator for Chain<N, F>
where
    F: FnMut(&N) -> Option<N>,
{
    type Item = N;

    fn next(&mut self) -> Option<N> {
        let current = self.current.take()?;
        self.current = (self.next)(&current);
        Some(current)
    }
}

impl<N, F> FusedIterator for Chain<N, F> where F: FnMut(&N) -> Option<N> {}

impl<N: fmt::Debug, F> fmt::Debug for Chain<N, F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Chain")
            .field("current", &self.current)
            .finish_non_exhaustive()
    }
}
