//! Bracket disambiguation: tuples, arrays, matrices, tensors, metadata,
//! curly containers, and code blocks

use super::support::parse_expr;
use crate::ast::NodeKind;

#[test]
fn test_empty_tuple() {
    let node = parse_expr("();");
    let NodeKind::Tuple { elements } = &node.kind else {
        panic!("expected tuple, got {:?}", node.kind);
    };
    assert!(elements.is_empty());
}

#[test]
fn test_singleton_tuple_via_trailing_comma() {
    let node = parse_expr("(x,);");
    let NodeKind::Tuple { elements } = &node.kind else {
        panic!("expected tuple, got {:?}", node.kind);
    };
    assert_eq!(elements.len(), 1);
}

#[test]
fn test_pair_tuple() {
    let node = parse_expr("(3, 4);");
    let NodeKind::Tuple { elements } = &node.kind else {
        panic!("expected tuple, got {:?}", node.kind);
    };
    assert_eq!(elements.len(), 2);
}

#[test]
fn test_trailing_comma_adds_no_element() {
    let node = parse_expr("(3, 4,);");
    let NodeKind::Tuple { elements } = &node.kind else {
        panic!("expected tuple, got {:?}", node.kind);
    };
    assert_eq!(elements.len(), 2);
}

#[test]
fn test_single_expression_is_grouping() {
    let node = parse_expr("(3);");
    assert!(matches!(node.kind, NodeKind::Grouping { .. }));
}

#[test]
fn test_parameter_list_grouping() {
    let node = parse_expr("(x, n := 5; a := 0);");
    let NodeKind::Grouping { expression } = &node.kind else {
        panic!("expected grouping, got {:?}", node.kind);
    };
    let NodeKind::ParameterList { parameters } = &expression.kind else {
        panic!("expected parameter list, got {:?}", expression.kind);
    };
    assert_eq!(parameters.positional.len(), 2);
    assert_eq!(parameters.keyword.len(), 1);
    assert_eq!(parameters.keyword[0].name, "a");
    assert!(parameters.keyword[0].default_value.is_some());
}

#[test]
fn test_empty_array() {
    let node = parse_expr("[];");
    let NodeKind::Array { elements } = &node.kind else {
        panic!("expected array, got {:?}", node.kind);
    };
    assert!(elements.is_empty());
}

#[test]
fn test_plain_array() {
    let node = parse_expr("[1, 2, 3];");
    let NodeKind::Array { elements } = &node.kind else {
        panic!("expected array, got {:?}", node.kind);
    };
    assert_eq!(elements.len(), 3);
}

#[test]
fn test_matrix_rows() {
    let node = parse_expr("[1,2;3,4];");
    let NodeKind::Matrix { rows } = &node.kind else {
        panic!("expected matrix, got {:?}", node.kind);
    };
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].len(), 2);
    assert_eq!(rows[1].len(), 2);
    assert!(matches!(rows[1][0].kind, NodeKind::Number { ref value } if value == "3"));
}

#[test]
fn test_matrix_preserves_uneven_rows() {
    let node = parse_expr("[1,2;3];");
    let NodeKind::Matrix { rows } = &node.kind else {
        panic!("expected matrix, got {:?}", node.kind);
    };
    assert_eq!(rows[0].len(), 2);
    assert_eq!(rows[1].len(), 1);
}

#[test]
fn test_matrix_preserves_empty_rows() {
    let node = parse_expr("[;1];");
    let NodeKind::Matrix { rows } = &node.kind else {
        panic!("expected matrix, got {:?}", node.kind);
    };
    assert_eq!(rows.len(), 2);
    assert!(rows[0].is_empty());

    let node = parse_expr("[1;];");
    let NodeKind::Matrix { rows } = &node.kind else {
        panic!("expected matrix, got {:?}", node.kind);
    };
    assert_eq!(rows.len(), 2);
    assert!(rows[1].is_empty());
}

#[test]
fn test_tensor_levels_and_dimension() {
    let node = parse_expr("[1,2;3,4;;5,6;7,8];");
    let NodeKind::Tensor {
        structure,
        max_dimension,
    } = &node.kind
    else {
        panic!("expected tensor, got {:?}", node.kind);
    };
    assert_eq!(*max_dimension, 3);
    let levels: Vec<u32> = structure.iter().map(|r| r.separator_level).collect();
    assert_eq!(levels, vec![1, 2, 1, 0]);
    assert_eq!(structure[0].row.len(), 2);
}

#[test]
fn test_metadata_only_array() {
    let node = parse_expr("[a := 1];");
    let NodeKind::WithMetadata { primary, metadata } = &node.kind else {
        panic!("expected metadata attachment, got {:?}", node.kind);
    };
    // metadata-only input keeps an empty array as its primary
    let NodeKind::Array { elements } = &primary.kind else {
        panic!("expected empty array primary, got {:?}", primary.kind);
    };
    assert!(elements.is_empty());
    assert!(metadata.contains_key("a"));
}

#[test]
fn test_metadata_with_single_primary() {
    let node = parse_expr(r#"[x, name := "weights"];"#);
    let NodeKind::WithMetadata { primary, metadata } = &node.kind else {
        panic!("expected metadata attachment, got {:?}", node.kind);
    };
    assert!(matches!(primary.kind, NodeKind::UserIdentifier { .. }));
    assert!(matches!(
        metadata.get("name").map(|n| &n.kind),
        Some(NodeKind::String { .. })
    ));
}

#[test]
fn test_metadata_string_key() {
    let node = parse_expr(r#"["kind" := 2];"#);
    let NodeKind::WithMetadata { metadata, .. } = &node.kind else {
        panic!("expected metadata attachment, got {:?}", node.kind);
    };
    assert!(metadata.contains_key("kind"));
}

#[test]
fn test_set_container() {
    let node = parse_expr("{3,5,6};");
    let NodeKind::Set { elements } = &node.kind else {
        panic!("expected set, got {:?}", node.kind);
    };
    assert_eq!(elements.len(), 3);
}

#[test]
fn test_empty_braces_are_a_set() {
    let node = parse_expr("{};");
    let NodeKind::Set { elements } = &node.kind else {
        panic!("expected set, got {:?}", node.kind);
    };
    assert!(elements.is_empty());
}

#[test]
fn test_map_container() {
    let node = parse_expr("{a := 4, b := 5};");
    let NodeKind::Map { elements } = &node.kind else {
        panic!("expected map, got {:?}", node.kind);
    };
    assert_eq!(elements.len(), 2);
    assert!(elements[0].is_binary_operator(":="));
}

#[test]
fn test_system_container() {
    let node = parse_expr("{x :=: 3*x + 2; y :=: x};");
    let NodeKind::System { elements } = &node.kind else {
        panic!("expected system, got {:?}", node.kind);
    };
    assert_eq!(elements.len(), 2);
    assert!(elements[0].is_binary_operator(":=:"));
}

#[test]
fn test_system_inequalities() {
    let node = parse_expr("{x :<=: 4; y :>: 0};");
    assert!(matches!(node.kind, NodeKind::System { .. }));
}

#[test]
fn test_code_block() {
    let node = parse_expr("{{ 1; 2 }};");
    let NodeKind::CodeBlock { statements } = &node.kind else {
        panic!("expected code block, got {:?}", node.kind);
    };
    assert_eq!(statements.len(), 2);
    assert!(matches!(statements[0].kind, NodeKind::Statement { .. }));
    assert!(matches!(statements[1].kind, NodeKind::Number { .. }));
}

#[test]
fn test_nested_code_blocks() {
    let node = parse_expr("{{ a := {{ 3 }} }};");
    let NodeKind::CodeBlock { statements } = &node.kind else {
        panic!("expected code block, got {:?}", node.kind);
    };
    assert_eq!(statements.len(), 1);
    let NodeKind::BinaryOperation { operator, right, .. } = &statements[0].kind else {
        panic!("expected assignment, got {:?}", statements[0].kind);
    };
    assert_eq!(operator, ":=");
    let NodeKind::CodeBlock { statements: inner } = &right.kind else {
        panic!("expected nested code block, got {:?}", right.kind);
    };
    assert_eq!(inner.len(), 1);
    assert!(matches!(inner[0].kind, NodeKind::Number { .. }));
}

#[test]
fn test_single_statement_block_is_still_a_block() {
    let node = parse_expr("{{ 42 }};");
    assert!(matches!(node.kind, NodeKind::CodeBlock { .. }));
}
