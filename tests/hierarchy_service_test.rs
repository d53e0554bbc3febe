//! Tests for HierarchyService against in-memory and real filesystems

use std::collections::HashMap;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tempfile::TempDir;

use lineage::application::services::HierarchyService;
use lineage::application::ApplicationError;
use lineage::domain::{TraversalOptions, TreeError};
use lineage::infrastructure::traits::{FileSystem, RealFileSystem};
use lineage::tree_traits::TreeNodeConvert;
use lineage::util::testing::init_test_setup;

/// Files held in a map.
#[derive(Default)]
struct MemoryFileSystem {
    files: Mutex<HashMap<PathBuf, String>>,
}

impl MemoryFileSystem {
    fn with_file(path: &str, content: &str) -> Self {
        let fs = Self::default();
        fs.files
            .lock()
            .unwrap()
            .insert(PathBuf::from(path), content.to_string());
        fs
    }

    fn content(&self, path: &str) -> Option<String> {
        self.files.lock().unwrap().get(Path::new(path)).cloned()
    }
}

impl FileSystem for MemoryFileSystem {
    fn read_to_string(&self, path: &Path) -> io::Result<String> {
        self.content(&path.to_string_lossy())
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "no such file"))
    }

    fn write(&self, path: &Path, content: &str) -> io::Result<()> {
        self.files
            .lock()
            .unwrap()
            .insert(path.to_path_buf(), content.to_string());
        Ok(())
    }

    fn is_file(&self, path: &Path) -> bool {
        self.files.lock().unwrap().contains_key(path)
    }
}

const RELATIONS: &str = "# org chart\nA: B C\nB: D\nsolo\n";

#[test]
fn given_relation_file_when_loading_then_trees_and_queries_match() {
    // Arrange
    init_test_setup();
    let fs = Arc::new(MemoryFileSystem::with_file("org.txt", RELATIONS));
    let service = HierarchyService::new(fs);

    // Act
    let hierarchy = service.load(Path::new("org.txt")).unwrap();

    // Assert
    assert_eq!(hierarchy.roots().len(), 2);
    assert_eq!(
        hierarchy
            .get_ancestor_ids(&"D".to_string(), false)
            .unwrap(),
        vec!["D", "B", "A"]
    );
    assert_eq!(
        hierarchy
            .get_descendant_ids(&"A".to_string(), TraversalOptions::depth_first())
            .unwrap(),
        vec!["A", "B", "D", "C"]
    );

    let rendered: Vec<String> = hierarchy
        .to_tree_strings()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(rendered[1].trim_end(), "solo");
}

#[test]
fn given_missing_file_when_loading_then_operation_failed() {
    let service = HierarchyService::new(Arc::new(MemoryFileSystem::default()));

    let err = service.load(Path::new("missing.txt")).unwrap_err();

    assert!(matches!(err, ApplicationError::OperationFailed { .. }));
}

#[test]
fn given_child_with_two_parents_when_loading_then_domain_error() {
    let fs = Arc::new(MemoryFileSystem::with_file("bad.txt", "A: C\nB: C\n"));
    let service = HierarchyService::new(fs);

    let err = service.load(Path::new("bad.txt")).unwrap_err();

    assert!(matches!(
        err,
        ApplicationError::Domain(TreeError::MultipleParents(_))
    ));
}

#[test]
fn given_parent_cycle_when_loading_then_cycle_detected() {
    let fs = Arc::new(MemoryFileSystem::with_file("loop.txt", "A: B\nB: A\n"));
    let service = HierarchyService::new(fs);

    let err = service.load(Path::new("loop.txt")).unwrap_err();

    assert!(
        matches!(err, ApplicationError::Domain(TreeError::CycleDetected(_))),
        "{err}"
    );
}

#[test]
fn given_loose_formatting_when_saving_then_file_is_normalized() {
    // Arrange
    let fs = Arc::new(MemoryFileSystem::with_file("org.txt", "A:   B\n\nA: C # more\nB:D\n"));
    let service = HierarchyService::new(fs.clone());
    let relations = service.read(Path::new("org.txt")).unwrap();

    // Act
    service.save(Path::new("org.txt"), &relations).unwrap();

    // Assert
    assert_eq!(fs.content("org.txt").unwrap(), "A: B C\nB: D\n");
}

#[test]
fn given_real_file_when_loading_then_same_as_in_memory() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("org.txt");
    std::fs::write(&path, RELATIONS).expect("write relation file");
    let service = HierarchyService::new(Arc::new(RealFileSystem));

    let hierarchy = service.load(&path).unwrap();

    assert_eq!(hierarchy.len(), 5);
}
