//! Domain layer: nodes, ownership brands and the traversal engine
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod brand;
pub mod buffer;
pub mod builder;
pub mod error;
pub mod hierarchy;
pub mod sequence;
pub mod signal;
pub mod traverse;

pub use arena::{Forest, Node, NodeId};
pub use brand::{Brand, BrandRelease};
pub use buffer::{Linear, Queue, Stack};
pub use builder::TreeBuilder;
pub use error::{TreeError, TreeResult};
pub use hierarchy::Hierarchy;
pub use sequence::{chain, Chain};
pub use signal::{Control, Order, Signal};
pub use traverse::{traverse, Traversal, TraversalOptions, WithDepth};
