//! Integration tests driving both analyses the way the code generator does

use pretty_assertions::assert_eq;
use typeloom_analysis::{
    emission_order, CoverageChecker, EmissionOrder, NodeId, OrderError, TypeHierarchy,
};

/// Node hierarchy for a toy expression language description
fn ast_hierarchy() -> TypeHierarchy {
    let mut hierarchy = TypeHierarchy::new("AstNode");
    let root = hierarchy.root();
    let expr = hierarchy.add_node("Expr", root);
    let literal = hierarchy.add_node("Literal", expr);
    hierarchy.add_node("IntLit", literal);
    hierarchy.add_node("StrLit", literal);
    hierarchy.add_node("BinOp", expr);
    let stmt = hierarchy.add_node("Stmt", root);
    hierarchy.add_node("Assign", stmt);
    hierarchy.add_node("Return", stmt);
    hierarchy.seal();
    hierarchy
}

fn node_by_name(hierarchy: &TypeHierarchy, name: &str) -> NodeId {
    hierarchy
        .node_ids()
        .find(|&node| hierarchy.name(node) == name)
        .unwrap_or_else(|| panic!("no node named {name}"))
}

#[test]
fn test_match_scan_reports_minimal_missing_set() {
    let hierarchy = ast_hierarchy();
    let mut checker = CoverageChecker::new(&hierarchy);

    // A match construct with arms for Literal, BinOp, and Assign. Expr
    // becomes fully covered through its children; Stmt stays partial.
    assert!(!checker.include(node_by_name(&hierarchy, "Literal")));
    assert!(!checker.include(node_by_name(&hierarchy, "BinOp")));
    assert!(!checker.include(node_by_name(&hierarchy, "Assign")));

    let missing = checker.unmatched_types(hierarchy.root());
    let names: Vec<&str> = missing.iter().map(|&node| hierarchy.name(node)).collect();
    assert_eq!(names, vec!["Return"]);
}

#[test]
fn test_redundant_arm_is_detected_after_supertype_arm() {
    let hierarchy = ast_hierarchy();
    let mut checker = CoverageChecker::new(&hierarchy);

    checker.include(node_by_name(&hierarchy, "Expr"));
    // An arm for IntLit after an Expr arm can never match.
    assert!(checker.include(node_by_name(&hierarchy, "IntLit")));
}

#[test]
fn test_node_declarations_emit_parents_first() {
    let hierarchy = ast_hierarchy();

    // One generated declaration per node, each depending on its parent's.
    let pairs: Vec<(NodeId, Vec<NodeId>)> = hierarchy
        .node_ids()
        .map(|node| (node, hierarchy.parent(node).into_iter().collect()))
        .collect();

    let order = emission_order(pairs).unwrap();
    assert_eq!(order.len(), hierarchy.len());
    for (position, &node) in order.iter().enumerate() {
        if let Some(parent) = hierarchy.parent(node) {
            let parent_position = order.iter().position(|&n| n == parent).unwrap();
            assert!(
                parent_position < position,
                "{} emitted before its parent {}",
                hierarchy.name(node),
                hierarchy.name(parent)
            );
        }
    }
}

#[test]
fn test_emission_order_is_stable_across_runs() {
    let pairs = || {
        vec![
            ("ast_node".to_string(), vec![]),
            ("token".to_string(), vec![]),
            ("expr".to_string(), vec!["ast_node".to_string()]),
            ("literal".to_string(), vec!["expr".to_string(), "token".to_string()]),
        ]
    };

    let first = emission_order(pairs()).unwrap();
    let second = emission_order(pairs()).unwrap();
    assert_eq!(first, vec!["ast_node", "token", "expr", "literal"]);
    assert_eq!(first, second);
}

#[test]
fn test_unorderable_declarations_surface_in_the_failure() {
    let order = emission_order(vec![
        ("prelude", vec![]),
        ("node_kind", vec!["node_list"]),
        ("node_list", vec!["node_kind"]),
    ]);

    let err = order.unwrap_err();
    assert_eq!(err.pending_items(), &["node_kind", "node_list"]);
    assert!(err.to_string().contains("node_kind"));
}

#[test]
fn test_lazy_consumer_sees_items_before_the_source_would_be_reusable() {
    let pairs = vec![
        ("b", vec!["a"]),
        ("a", vec![]),
        ("c", vec!["b"]),
    ];

    let mut order = EmissionOrder::from_source(pairs.into_iter());
    assert_eq!(order.next(), Some(Ok("a")));
    assert_eq!(order.next(), Some(Ok("b")));
    assert_eq!(order.next(), Some(Ok("c")));
    assert_eq!(order.next(), None);
}

#[test]
fn test_empty_lazy_source_fails_while_empty_collection_succeeds() {
    let from_collection = emission_order(Vec::<(&str, Vec<&str>)>::new());
    assert_eq!(from_collection, Ok(Vec::new()));

    let mut from_source = EmissionOrder::from_source(std::iter::empty::<(&str, Vec<&str>)>());
    assert_eq!(from_source.next(), Some(Err(OrderError::EmptySource)));
}
