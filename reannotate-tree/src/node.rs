//! Accessors and traversal for the nodes of an Auspice tree.
//!
//! A node is a JSON object with an optional `children` array and optional
//! `branch_attrs.mutations`. Neither is required, a node lacking them simply has
//! no children or no mutations.

use crate::Mutations;

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use log::trace;
use serde::Deserialize;
use serde_json::{Map, Value};

/// Returns the `name` of a node, if it has one.
pub fn name(node: &Value) -> Option<&str> {
    node.get("name").and_then(Value::as_str)
}

/// Returns the children of a node, in order. Nodes without a `children` array have none.
pub fn children(node: &Value) -> &[Value] {
    node.get("children").and_then(Value::as_array).map(Vec::as_slice).unwrap_or_default()
}

/// Returns the `branch_attrs.mutations` of a node, or [`None`] when the node has none.
///
/// ## Examples
///
/// ```rust
/// use reannotate_tree::node;
/// use serde_json::json;
///
/// let node = json!({"branch_attrs": {"mutations": {"ORF1a": ["T265I"]}}});
/// let mutations = node::get_mutations(&node)?.unwrap();
/// assert_eq!(mutations.get("ORF1a"), Some(&["T265I".to_string()][..]));
///
/// assert_eq!(node::get_mutations(&json!({"name": "leaf"}))?, None);
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn get_mutations(node: &Value) -> Result<Option<Mutations>, Report> {
    match node.pointer("/branch_attrs/mutations") {
        Some(value) => Mutations::deserialize(value)
            .map(Some)
            .wrap_err_with(|| eyre!("Failed to read the mutations of node: {}", describe(node))),
        None => Ok(None),
    }
}

/// Write `mutations` to the `branch_attrs.mutations` of a node.
///
/// Existing keys keep their position in the node, missing ones are appended.
pub fn set_mutations(node: &mut Value, mutations: &Mutations) -> Result<(), Report> {
    let label = describe(node);
    let value = serde_json::to_value(mutations)
        .wrap_err_with(|| eyre!("Failed to serialize the mutations of node: {label}"))?;

    let attrs = node
        .as_object_mut()
        .ok_or_else(|| eyre!("Tree node is not a JSON object: {label}"))?
        .entry("branch_attrs")
        .or_insert_with(|| Value::Object(Map::new()))
        .as_object_mut()
        .ok_or_else(|| eyre!("The branch_attrs of node {label} is not a JSON object."))?;
    attrs.insert("mutations".to_string(), value);

    Ok(())
}

/// Iterate through every node of a tree in depth-first pre-order.
///
/// Children are visited in their original order.
///
/// ## Examples
///
/// ```rust
/// use reannotate_tree::node;
/// use serde_json::json;
///
/// let tree = json!({"name": "A", "children": [
///     {"name": "B", "children": [{"name": "C"}]},
///     {"name": "D"}
/// ]});
/// let names: Vec<_> = node::preorder(&tree).filter_map(node::name).collect();
/// assert_eq!(names, ["A", "B", "C", "D"]);
/// ```
pub fn preorder(root: &Value) -> Preorder<'_> {
    Preorder { stack: vec![root] }
}

/// Iterator returned by [`preorder`].
#[derive(Debug)]
pub struct Preorder<'a> {
    stack: Vec<&'a Value>,
}

impl<'a> Iterator for Preorder<'a> {
    type Item = &'a Value;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(children(node).iter().rev());
        Some(node)
    }
}

/// Apply `visit` to every node of a tree in depth-first pre-order, children in their original order.
///
/// Nodes are visited with an explicit stack, so the depth of the tree is not bounded by the
/// call stack. The first error returned by `visit` stops the traversal. A `children` key that
/// is not an array is an error.
///
/// Returns the number of nodes visited.
///
/// ## Examples
///
/// ```rust
/// use reannotate_tree::node;
/// use serde_json::json;
///
/// let mut tree = json!({"name": "A", "children": [{"name": "B"}, {"name": "C"}]});
/// let mut order = Vec::new();
/// let visited = node::visit_mut(&mut tree, |node| {
///     order.push(node::name(node).unwrap_or_default().to_string());
///     node["visited"] = json!(true);
///     Ok(())
/// })?;
/// assert_eq!(visited, 3);
/// assert_eq!(order, ["A", "B", "C"]);
/// assert_eq!(tree["children"][1]["visited"], json!(true));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn visit_mut<F>(root: &mut Value, mut visit: F) -> Result<usize, Report>
where
    F: FnMut(&mut Value) -> Result<(), Report>,
{
    let mut visited = 0;
    let mut stack = vec![root];

    while let Some(node) = stack.pop() {
        visit(node)?;
        visited += 1;
        trace!("Visited node {visited}: {}", describe(node));

        match node.get_mut("children") {
            Some(Value::Array(children)) => stack.extend(children.iter_mut().rev()),
            Some(_) => Err(eyre!("The children of a tree node are not a JSON array."))?,
            None => (),
        }
    }

    Ok(visited)
}

/// Label for a node in log and error messages.
fn describe(node: &Value) -> String {
    name(node).map(String::from).unwrap_or_else(|| String::from("<unnamed>"))
}

#[cfg(test)]
mod tests;
