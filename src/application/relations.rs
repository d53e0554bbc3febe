//! Line-oriented relation files.
//!
//! ```text
//! # comment
//! root: child-a child-b
//! child-a: grandchild
//! standalone:
//! ```
//!
//! One parent per line, children separated by whitespace. A line with only an
//! id (with or without the colon) declares a node without children. Repeated
//! parents accumulate their children.

use std::path::Path;

use regex::Regex;
use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult};
use crate::domain::{TreeBuilder, TreeResult};

/// Parsed relation file: parents in first-seen order with their children.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RelationFile {
    entries: Vec<(String, Vec<String>)>,
}

impl RelationFile {
    #[instrument(level = "debug", skip(content))]
    pub fn parse(content: &str, path: &Path) -> ApplicationResult<Self> {
        let re = Regex::new(r"^(?P<parent>[^\s:]+)\s*(?::(?P<children>.*))?$").map_err(|e| {
            ApplicationError::OperationFailed {
                context: "compile relation regex".to_string(),
                source: Box::new(e),
            }
        })?;

        let mut file = Self::default();
        for (number, raw) in content.lines().enumerate() {
            let line = raw.split('#').next().unwrap_or_default().trim();
            if line.is_empty() {
                continue;
            }
            let caps = re.captures(line).ok_or_else(|| ApplicationError::Parse {
                path: path.to_path_buf(),
                line: number + 1,
                message: format!("expected `parent: child ...`, got `{}`", line),
            })?;
            let children: Vec<String> = caps
                .name("children")
                .map(|m| m.as_str().split_whitespace().map(str::to_string).collect())
                .unwrap_or_default();
            if let Some(bad) = children.iter().find(|c| c.contains(':')) {
                return Err(ApplicationError::Parse {
                    path: path.to_path_buf(),
                    line: number + 1,
                    message: format!("invalid child id `{}`", bad),
                });
            }
            file.push(caps["parent"].to_string(), children);
        }
        debug!(parents = file.entries.len(), "parsed relation file");
        Ok(file)
    }

    /// Repeated children of one parent are kept once, at their first place.
    fn push(&mut self, parent: String, children: Vec<String>) {
        let index = match self.entries.iter().position(|(p, _)| *p == parent) {
            Some(index) => index,
            None => {
                self.entries.push((parent, Vec::new()));
                self.entries.len() - 1
            }
        };
        let existing = &mut self.entries[index].1;
        for child in children {
            if !existing.contains(&child) {
                existing.push(child);
            }
        }
    }

    pub fn entries(&self) -> &[(String, Vec<String>)] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Renders back to the line format, one parent per line.
    pub fn render(&self) -> String {
        self.entries
            .iter()
            .map(|(parent, children)| {
                if children.is_empty() {
                    format!("{}:\n", parent)
                } else {
                    format!("{}: {}\n", parent, children.join(" "))
                }
            })
            .collect()
    }

    pub fn to_builder(&self) -> TreeResult<TreeBuilder<String>> {
        TreeBuilder::from_child_map(self.entries.iter().cloned())
    }
}
