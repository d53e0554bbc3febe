//! Tests for Hierarchy registration, lookup and release

use lineage::domain::{Forest, Hierarchy, NodeId, TraversalOptions, TreeBuilder, TreeError};
use lineage::tree_traits::TreeNodeConvert;

fn identity(name: &&'static str) -> &'static str {
    *name
}

type Names = Hierarchy<&'static str, &'static str, fn(&&'static str) -> &'static str>;

/// A -> B, C; B -> D
fn sample() -> (Names, Vec<NodeId>) {
    let mut hierarchy: Names = Hierarchy::new(identity as fn(&&'static str) -> &'static str);
    let builder = TreeBuilder::from_child_map([("A", vec!["B", "C"]), ("B", vec!["D"])]).unwrap();
    let roots = hierarchy.build_with(&builder, |id: &&'static str| *id).unwrap();
    hierarchy.attach_root(&roots).unwrap();
    (hierarchy, roots)
}

#[test]
fn given_member_when_identifying_then_id_maps_back_to_node() {
    let (hierarchy, roots) = sample();

    for id in ["A", "B", "C", "D"] {
        let node = hierarchy.get_node(&id).unwrap();
        assert_eq!(hierarchy.identify(node).unwrap(), id);
        assert_eq!(hierarchy.get(&id).unwrap(), &id);
    }
    assert_eq!(hierarchy.roots(), roots.as_slice());
    assert_eq!(hierarchy.len(), 4);
}

#[test]
fn given_leaf_when_listing_ancestors_then_nearest_first() {
    let (hierarchy, _) = sample();

    assert_eq!(hierarchy.get_ancestor_ids(&"D", false).unwrap(), vec!["D", "B", "A"]);
    assert_eq!(hierarchy.get_ancestor_ids(&"D", true).unwrap(), vec!["B", "A"]);
    assert!(hierarchy.get_ancestor_ids(&"A", true).unwrap().is_empty());
}

#[test]
fn given_root_when_listing_descendants_then_options_apply() {
    let (hierarchy, _) = sample();

    assert_eq!(
        hierarchy
            .get_descendant_ids(&"A", TraversalOptions::breadth_first())
            .unwrap(),
        vec!["A", "B", "C", "D"]
    );
    assert_eq!(
        hierarchy
            .get_descendant_ids(&"A", TraversalOptions::depth_first().excluding_self())
            .unwrap(),
        vec!["B", "D", "C"]
    );
}

#[test]
fn given_unknown_id_when_querying_then_not_a_member() {
    let (hierarchy, _) = sample();

    let err = hierarchy.get_ancestor_ids(&"Z", false).unwrap_err();

    assert!(matches!(err, TreeError::NotAMember(_)));
    assert!(!hierarchy.contains(&"Z"));
}

#[test]
fn given_members_when_registered_then_all_carry_the_hierarchy_brand() {
    let (hierarchy, _) = sample();

    for id in hierarchy.ids() {
        let node = hierarchy.get_node(id).unwrap();
        assert_eq!(hierarchy.forest().brand_of(node), Some(hierarchy.brand()));
    }
}

#[test]
fn given_member_when_releasing_then_subtree_leaves_index_and_brand() {
    // Arrange
    let (mut hierarchy, _) = sample();

    // Act
    let freed = hierarchy.release(&"B").unwrap();

    // Assert
    assert!(!hierarchy.contains(&"B"));
    assert!(!hierarchy.contains(&"D"));
    assert_eq!(hierarchy.len(), 2);
    let forest = hierarchy.forest();
    assert!(forest.is_root(freed));
    assert!(!forest.is_branded(freed));
    assert_eq!(forest.children(freed).len(), 1);
}

#[test]
fn given_free_subtree_when_attaching_below_member_then_indexed() {
    // Arrange
    let (mut hierarchy, _) = sample();
    let e = hierarchy.insert("E");
    let f = hierarchy.insert("F");
    hierarchy.link(e, &[f]).unwrap();

    // Act
    hierarchy.attach(&"C", &[e]).unwrap();

    // Assert
    assert_eq!(hierarchy.get_ancestor_ids(&"F", false).unwrap(), vec!["F", "E", "C", "A"]);
    assert_eq!(hierarchy.len(), 6);
}

#[test]
fn given_colliding_id_when_attaching_then_nothing_is_branded() {
    // Arrange
    let (mut hierarchy, _) = sample();
    let dup = hierarchy.insert("D");

    // Act
    let result = hierarchy.attach(&"C", &[dup]);

    // Assert
    assert!(matches!(result, Err(TreeError::DuplicateId(_))));
    assert!(!hierarchy.forest().is_branded(dup));
    assert!(hierarchy.forest().is_root(dup));
}

#[test]
fn given_hierarchy_when_handing_back_forest_then_brands_are_cleared() {
    let (hierarchy, _) = sample();

    let forest: Forest<&'static str> = hierarchy.into_forest();

    assert_eq!(forest.len(), 4);
    assert!(forest.iter().all(|(_, node)| !node.is_branded()));
    assert_eq!(forest.roots().count(), 1);
}

#[test]
fn given_member_roots_when_linking_directly_then_rejected_and_roots_unchanged() {
    // Arrange
    let (mut hierarchy, roots) = sample();
    let other = hierarchy.insert("X");
    hierarchy.attach_root(&[other]).unwrap();
    let a = roots[0];

    // Act
    let result = hierarchy.link(a, &[other]);

    // Assert
    assert_eq!(result, Err(TreeError::Branded(a)));
    assert!(hierarchy.forest().is_root(other));
    assert_eq!(hierarchy.roots(), &[a, other]);
    let rendered: Vec<String> = hierarchy
        .to_tree_strings()
        .unwrap()
        .iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(rendered.len(), 2);
    assert_eq!(rendered[1].trim_end(), "X");
}

#[test]
fn given_free_node_when_linking_below_member_then_stays_unreachable() {
    // Arrange
    let (mut hierarchy, _) = sample();
    let a = hierarchy.get_node(&"A").unwrap();
    let x = hierarchy.insert("X");

    // Act
    let result = hierarchy.link(a, &[x]);

    // Assert
    assert_eq!(result, Err(TreeError::Branded(a)));
    assert!(hierarchy.forest().is_root(x));
    assert!(!hierarchy.forest().is_branded(x));
    assert_eq!(
        hierarchy
            .get_descendant_ids(&"A", TraversalOptions::breadth_first())
            .unwrap(),
        vec!["A", "B", "C", "D"]
    );

    // members only grow through the registry
    hierarchy.attach(&"A", &[x]).unwrap();
    assert_eq!(hierarchy.get(&"X").unwrap(), &"X");
}
