//! Linear buffers backing the traversal frontier.
//!
//! A [`Stack`] drives depth-first walks, a [`Queue`] breadth-first ones.

use std::collections::VecDeque;

/// Append/remove sequence used as a traversal frontier.
pub trait Linear<T> {
    /// Appends all `items`, returning how many were appended.
    fn attach<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = T>;

    /// Removes the next item, `None` when empty.
    fn detach(&mut self) -> Option<T>;

    /// Next item without removing it.
    fn peek(&self) -> Option<&T>;

    fn count(&self) -> usize;

    fn clear(&mut self);

    fn is_empty(&self) -> bool {
        self.count() == 0
    }
}

/// LIFO buffer.
///
/// The most recently attached batch comes off first; within one batch items
/// come off in the order they were given, so children pushed as `[b, c]`
/// are visited `b` then `c`.
#[derive(Debug, Clone)]
pub struct Stack<T> {
    items: Vec<T>,
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Stack<T> {
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T> Linear<T> for Stack<T> {
    fn attach<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let start = self.items.len();
        self.items.extend(items);
        // Reverse the new batch in place for left-to-right popping
        self.items[start..].reverse();
        self.items.len() - start
    }

    fn detach(&mut self) -> Option<T> {
        self.items.pop()
    }

    fn peek(&self) -> Option<&T> {
        self.items.last()
    }

    fn count(&self) -> usize {
        self.items.len()
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}

/// FIFO buffer.
#[derive(Debug, Clone)]
pub struct Queue<T> {
    items: VecDeque<T>,
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Queue<T> {
    pub fn new() -> Self {
        Self {
            items: VecDeque::new(),
        }
    }
}

impl<T> Linear<T> for Queue<T> {
    fn attach<I>(&mut self, items: I) -> usize
    where
        I: IntoIterator<Item = T>,
    {
        let before = self.items.len();
        self.items.extend(items);
        self.items.len() - before
    }

    fn detach(&mut self) -> Option<T> {
        self.items.pop_front()
    }

    fn peek(&self) -> Option<&T> {
        self.items.front()
    }

    fn count(&self) -> usize {
        self.items.len()
    }

    fn clear(&mut self) {
        self.items.clear();
    }
}
