//! Ownership brands.
//!
//! A [`Brand`] marks which registry currently holds the right to restructure
//! a node. Branding hands out a [`BrandRelease`]; consuming it is the only way
//! to clear the brand again.

use std::fmt;

use uuid::Uuid;

use crate::domain::arena::{Forest, NodeId};
use crate::domain::error::TreeResult;

/// Opaque owner tag. Two brands are equal only if one was cloned from the other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Brand(Uuid);

impl Brand {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for Brand {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "brand:{}", self.0.simple())
    }
}

/// Single-use handle clearing the brand it was created for.
///
/// Releasing consumes the handle, so a brand cannot be released twice.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a dropped release leaves the node branded for good"]
pub struct BrandRelease {
    node: NodeId,
    brand: Brand,
}

impl BrandRelease {
    pub(crate) fn new(node: NodeId, brand: Brand) -> Self {
        Self { node, brand }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn brand(&self) -> Brand {
        self.brand
    }

    /// Clears the brand on the node. Fails if the node is gone.
    pub fn release<T>(self, forest: &mut Forest<T>) -> TreeResult<()> {
        forest.unbrand(self.node, self.brand)
    }
}
