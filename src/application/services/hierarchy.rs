//! Loading relation files into indexed hierarchies.

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, instrument};

use crate::application::{ApplicationError, ApplicationResult, IoResultExt, RelationFile};
use crate::domain::Hierarchy;
use crate::infrastructure::traits::FileSystem;

/// Hierarchy of plain string ids, each node identified by its own item.
pub type StringHierarchy = Hierarchy<String, String, fn(&String) -> String>;

#[allow(clippy::ptr_arg)]
fn identity(item: &String) -> String {
    item.clone()
}

/// Service turning relation files into hierarchies and back.
pub struct HierarchyService {
    fs: Arc<dyn FileSystem>,
}

impl HierarchyService {
    pub fn new(fs: Arc<dyn FileSystem>) -> Self {
        Self { fs }
    }

    /// Read and parse a relation file.
    #[instrument(level = "debug", skip(self))]
    pub fn read(&self, path: &Path) -> ApplicationResult<RelationFile> {
        if !self.fs.is_file(path) {
            return Err(ApplicationError::OperationFailed {
                context: format!("relation file not found: {}", path.display()),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "file does not exist",
                )),
            });
        }
        let content = self
            .fs
            .read_to_string(path)
            .with_path_context("read relation file", path)?;
        RelationFile::parse(&content, path)
    }

    /// Load a relation file and attach all of its trees.
    #[instrument(level = "debug", skip(self))]
    pub fn load(&self, path: &Path) -> ApplicationResult<StringHierarchy> {
        let relations = self.read(path)?;
        self.assemble(&relations)
    }

    /// Build a hierarchy from already parsed relations.
    pub fn assemble(&self, relations: &RelationFile) -> ApplicationResult<StringHierarchy> {
        let builder = relations.to_builder()?;
        let mut hierarchy: StringHierarchy = Hierarchy::new(identity as fn(&String) -> String);
        let roots = hierarchy.build_with(&builder, String::clone)?;
        if !roots.is_empty() {
            hierarchy.attach_root(&roots)?;
        }
        debug!(roots = roots.len(), nodes = hierarchy.len(), "assembled hierarchy");
        Ok(hierarchy)
    }

    /// Write `relations` in normalized form.
    #[instrument(level = "debug", skip(self, relations))]
    pub fn save(&self, path: &Path, relations: &RelationFile) -> ApplicationResult<()> {
        self.fs
            .write(path, &relations.render())
            .with_path_context("write relation file", path)
    }
}
