//! CLI argument definitions using clap

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};

use crate::domain::Order;

/// Inspect node hierarchies described by relation files
#[derive(Parser, Debug)]
#[command(name = "lineage")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Log verbosity: -d info, -dd debug, -ddd trace
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub debug: u8,

    /// Config file, layered over the global one
    #[arg(short, long, global = true, env = "LINEAGE_CONFIG", value_hint = ValueHint::FilePath)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show every tree
    Tree {
        /// Relation file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List root ids
    Roots {
        /// Relation file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List leaf ids per tree
    Leaves {
        /// Relation file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
    },

    /// List the subtree of a node, indented by depth
    Descendants {
        /// Relation file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Start node
        id: String,
        #[command(flatten)]
        traversal: TraversalArgs,
    },

    /// Show the parent chain of a node, nearest first
    Ancestors {
        /// Relation file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Start node
        id: String,
        #[command(flatten)]
        start: StartArgs,
    },

    /// Print the relation file in normalized form
    Normalize {
        /// Relation file
        #[arg(value_hint = ValueHint::FilePath)]
        file: PathBuf,
        /// Rewrite the file in place
        #[arg(short, long)]
        write: bool,
    },

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },

    /// Generate shell completions
    Completion {
        /// Shell type
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show effective settings
    Show,
    /// Show global config file location
    Path,
}

/// Traversal flags overriding the configured defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct TraversalArgs {
    /// Walk order
    #[arg(long, value_enum)]
    pub order: Option<OrderArg>,
    #[command(flatten)]
    pub start: StartArgs,
    /// Visit every node at most once
    #[arg(long)]
    pub detect_cycles: bool,
}

/// Whether the start node is listed; without a flag the configured
/// `exclude-self` applies.
#[derive(Args, Debug, Clone, Copy, Default)]
pub struct StartArgs {
    /// Leave the start node out
    #[arg(long, conflicts_with = "include_self")]
    pub exclude_self: bool,
    /// List the start node even if the config excludes it
    #[arg(long)]
    pub include_self: bool,
}

impl StartArgs {
    pub fn exclude_self(&self, configured: bool) -> bool {
        if self.include_self {
            false
        } else {
            self.exclude_self || configured
        }
    }
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderArg {
    BreadthFirst,
    DepthFirst,
}

impl From<OrderArg> for Order {
    fn from(arg: OrderArg) -> Self {
        match arg {
            OrderArg::BreadthFirst => Order::BreadthFirst,
            OrderArg::DepthFirst => Order::DepthFirst,
        }
    }
}
