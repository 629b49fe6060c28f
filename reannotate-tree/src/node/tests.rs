use crate::{node, Mutations};

use color_eyre::eyre::{eyre, Report, Result};
use serde_json::{json, Map, Value};

fn example_tree() -> Value {
    json!({
        "name": "root",
        "branch_attrs": {"mutations": {"ORF1a": ["A10T"]}},
        "children": [
            {"name": "n1", "children": [{"name": "t1"}, {"name": "t2", "children": []}]},
            {"name": "t3", "branch_attrs": {"labels": {"clade": "20A"}}},
            {"name": "n2", "children": [{"name": "t4"}]}
        ]
    })
}

#[test]
fn preorder_visits_every_node() {
    let tree = example_tree();
    let observed: Vec<_> = node::preorder(&tree).filter_map(node::name).collect();
    let expected = ["root", "n1", "t1", "t2", "t3", "n2", "t4"];
    assert_eq!(expected.to_vec(), observed);
}

#[test]
fn visit_mut_matches_preorder() -> Result<(), Report> {
    let mut tree = example_tree();
    let expected: Vec<String> =
        node::preorder(&tree).filter_map(node::name).map(String::from).collect();

    let mut observed = Vec::new();
    let visited = node::visit_mut(&mut tree, |node| {
        observed.push(node::name(node).unwrap_or_default().to_string());
        Ok(())
    })?;

    assert_eq!(visited, 7);
    assert_eq!(expected, observed);
    Ok(())
}

#[test]
fn visit_mut_stops_on_error() {
    let mut tree = example_tree();
    let mut visited = 0;
    let result = node::visit_mut(&mut tree, |node| {
        visited += 1;
        match node::name(node) {
            Some("t2") => Err(eyre!("bad node")),
            _ => Ok(()),
        }
    });
    assert!(result.is_err());
    assert_eq!(visited, 4);
}

#[test]
fn visit_mut_rejects_non_array_children() {
    let mut tree = json!({"name": "root", "children": {"name": "oops"}});
    assert!(node::visit_mut(&mut tree, |_| Ok(())).is_err());
}

#[test]
fn visit_mut_deep_tree() -> Result<(), Report> {
    // a ladder deep enough to overflow a recursive traversal
    let depth = 100_000;
    let mut tree = json!({"name": "leaf"});
    for _ in 0..depth {
        let mut parent = Map::new();
        parent.insert("children".to_string(), Value::Array(vec![tree]));
        tree = Value::Object(parent);
    }
    let visited = node::visit_mut(&mut tree, |_| Ok(()))?;
    assert_eq!(visited, depth + 1);

    // unwind the ladder iteratively, dropping it recursively would overflow
    let mut next = Some(tree);
    while let Some(mut node) = next.take() {
        next = node.get_mut("children").and_then(|c| c.as_array_mut()).and_then(Vec::pop);
    }
    Ok(())
}

#[test]
fn mutations_round_trip_in_place() -> Result<(), Report> {
    let mut tree = json!({
        "name": "root",
        "branch_attrs": {"mutations": {"nuc": ["C241T"], "ORF1a": ["A10T"]}, "labels": {}},
        "children": []
    });
    let mut mutations = node::get_mutations(&tree)?.unwrap_or_default();
    mutations.insert("ORF1ab", vec!["A10T".to_string()]);
    node::set_mutations(&mut tree, &mutations)?;

    // mutations stays ahead of labels
    let attrs: Vec<_> = tree["branch_attrs"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(attrs, ["mutations", "labels"]);
    let genes: Vec<_> = tree["branch_attrs"]["mutations"].as_object().unwrap().keys().cloned().collect();
    assert_eq!(genes, ["nuc", "ORF1a", "ORF1ab"]);
    Ok(())
}

#[test]
fn set_mutations_creates_branch_attrs() -> Result<(), Report> {
    let mut tree = json!({"name": "leaf"});
    node::set_mutations(&mut tree, &Mutations::from_iter([("S", vec!["D614G"])]))?;
    assert_eq!(tree, json!({"name": "leaf", "branch_attrs": {"mutations": {"S": ["D614G"]}}}));
    Ok(())
}

#[test]
fn get_mutations_malformed() {
    let tree = json!({"branch_attrs": {"mutations": {"S": "D614G"}}});
    assert!(node::get_mutations(&tree).is_err());
}
