use pretty_assertions::assert_eq;
use snapshot_trace_studio::parser::{classify_line, parse_trace, DepthEncoding, TraceLine};
use snapshot_trace_studio::render::build_report_tree;
use snapshot_trace_studio::timeline::EventMap;
use snapshot_trace_studio::tree::{NodeId, TraceTree};
use snapshot_trace_studio::utils::error::ParseError;

fn names(tree: &TraceTree, id: NodeId) -> Vec<&str> {
    tree.children(id).map(|n| n.name.as_str()).collect()
}

#[test]
fn test_hex_token_trace_builds_tree_and_objects() {
    let text = "-- 10.0 obj1\n0 NodeA\n1 NodeB\n-- 10.5 obj2\n0 NodeC";
    let parsed = parse_trace(text, &EventMap::default(), DepthEncoding::HexToken).unwrap();

    assert_eq!(names(&parsed.tree, NodeId::ROOT), vec!["NodeA", "NodeC"]);
    assert_eq!(names(&parsed.tree, NodeId(1)), vec!["NodeB"]);
    assert!(parsed.tree.node(NodeId(3)).unwrap().children.is_empty());

    let durations: Vec<f64> = parsed.objects.iter().map(|o| o.duration).collect();
    assert_eq!(durations, vec![0.0, 0.5]);
    assert_eq!(parsed.objects[0].node_id, NodeId(1));
    assert_eq!(parsed.objects[1].node_id, NodeId(3));
    assert!(parsed.scripts.is_empty());
}

#[test]
fn test_indentation_trace_builds_same_tree() {
    let text = "-- 10.0 obj1\nNodeA\n  NodeB\n-- 10.5 obj2\nNodeC";
    let parsed = parse_trace(text, &EventMap::default(), DepthEncoding::Indentation).unwrap();

    assert_eq!(names(&parsed.tree, NodeId::ROOT), vec!["NodeA", "NodeC"]);
    assert_eq!(names(&parsed.tree, NodeId(1)), vec!["NodeB"]);
}

#[test]
fn test_dangling_backref_renders_without_anchor() {
    let text = "0 Object\n1 Backref (@5)";
    let parsed = parse_trace(text, &EventMap::default(), DepthEncoding::HexToken).unwrap();

    let entry = parsed.backrefs.get("@5").unwrap();
    assert_eq!(entry.defining_node, None);
    assert_eq!(entry.referencing_nodes, vec![NodeId(2)]);

    let tree = build_report_tree(&parsed.tree, &parsed.backrefs);
    let reference = tree.get("2").unwrap();
    assert!(reference.name.contains("(backref @5)"));
    assert!(!reference.name.contains("href=\"#backref-@5\""));
}

#[test]
fn test_children_are_deeper_than_parents() {
    let text = "\
0 A
2 B
5 C
3 D
1 E
a F
0 G
";
    let parsed = parse_trace(text, &EventMap::default(), DepthEncoding::HexToken).unwrap();

    assert_eq!(parsed.tree.root().depth, -1);
    for node in parsed.tree.iter().skip(1) {
        let parent = parsed.tree.node(node.parent.unwrap()).unwrap();
        assert!(node.depth > parent.depth, "{} under {}", node.name, parent.name);
    }

    assert_eq!(names(&parsed.tree, NodeId(1)), vec!["B", "E"]);
    assert_eq!(names(&parsed.tree, NodeId(2)), vec!["C", "D"]);
    assert_eq!(names(&parsed.tree, NodeId(5)), vec!["F"]);
    assert_eq!(parsed.tree.max_depth(), 10);
}

#[test]
fn test_ids_are_dense_across_skipped_lines() {
    let text = "\
[0.001] snapshot header
0 A
1 v8-version 11.0
1 heap-capacity 4096
-- 1.0 boundary
1 -B
zz not-a-depth
(set obj backref @1)
script,deserialize,7,100
2 C
";
    let parsed = parse_trace(text, &EventMap::default(), DepthEncoding::HexToken).unwrap();

    let ids: Vec<usize> = parsed.tree.iter().map(|n| n.id.0).collect();
    assert_eq!(ids, vec![0, 1, 2, 3]);
    assert_eq!(parsed.tree.node(NodeId(2)).unwrap().name, "B");
    assert_eq!(parsed.stats.malformed, 1);
}

#[test]
fn test_classifier_checks_boundaries_and_scripts_first() {
    assert!(matches!(
        classify_line("-- 1.5 0x1 <Map>", DepthEncoding::HexToken).unwrap(),
        TraceLine::ObjectBoundary { .. }
    ));
    assert!(matches!(
        classify_line("script,deserialize,1,2", DepthEncoding::HexToken).unwrap(),
        TraceLine::ScriptEvent(_)
    ));
    assert!(matches!(
        classify_line("(set obj backref @2)", DepthEncoding::HexToken).unwrap(),
        TraceLine::BackrefDefinition { .. }
    ));
    assert_eq!(classify_line("", DepthEncoding::HexToken).unwrap(), TraceLine::Ignore);
}

#[test]
fn test_missing_name_is_malformed() {
    assert!(matches!(
        classify_line("3", DepthEncoding::HexToken),
        Err(ParseError::MalformedTrace(_))
    ));
}

#[test]
fn test_markers_follow_discovery_order() {
    let text = "\
0 Object
(set obj backref @1)
1 Backref (@1)
1 Backref (@1)
1 Backref (@1)
";
    let parsed = parse_trace(text, &EventMap::default(), DepthEncoding::HexToken).unwrap();

    let entry = parsed.backrefs.get("@1").unwrap();
    let markers: Vec<(usize, NodeId)> = entry.markers().collect();
    assert_eq!(
        markers,
        vec![(0, NodeId(2)), (1, NodeId(3)), (2, NodeId(4))]
    );
}
