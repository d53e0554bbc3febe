//! Arena-backed node hierarchies with branded ownership and a controllable
//! breadth/depth-first traversal engine.
//!
//! ```
//! use lineage::domain::{traverse, Order};
//!
//! let children = |n: &u32| if *n < 4 { vec![n * 2, n * 2 + 1] } else { vec![] };
//! let walk: Vec<u32> = traverse([1], Order::BreadthFirst, false, children).collect();
//! assert_eq!(walk, vec![1, 2, 3, 4, 5, 6, 7]);
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod tree_traits;
pub mod util;

pub use domain::{
    Brand, BrandRelease, Forest, Hierarchy, Node, NodeId, Order, TraversalOptions, TreeBuilder,
    TreeError, TreeResult,
};
