use crate::utils::{json_depth, read_json, with_large_stack, write_json, MAX_DEPTH};

use color_eyre::eyre::{eyre, Report, Result};
use serde_json::{json, Value};

/// A tree of `depth` nodes, each the only child of the one above.
fn chain_json(depth: usize) -> String {
    let mut text = r#"{"children": ["#.repeat(depth - 1);
    text.push_str(r#"{"name": "leaf"}"#);
    text.push_str(&"]}".repeat(depth - 1));
    text
}

#[test]
fn depth_ignores_strings() {
    assert_eq!(json_depth(b"1"), 0);
    assert_eq!(json_depth(b"[[], [[]]]"), 3);
    assert_eq!(json_depth(br#"{"name": "}}]]{{[[", "x": {}}"#), 2);
    assert_eq!(json_depth(br#"["a\"[", ["b"]]"#), 2);
    assert_eq!(json_depth(chain_json(6000).as_bytes()), 11999);
}

#[test]
fn read_deep_chain() -> Result<(), Report> {
    let file = tempfile::NamedTempFile::new()?;
    std::fs::write(file.path(), chain_json(6000))?;

    let nodes = with_large_stack(|| {
        let tree: Value = read_json(&file.path())?;
        Ok(reannotate_tree::node::preorder(&tree).count())
    })?;
    assert_eq!(nodes, 6000);
    Ok(())
}

#[test]
fn read_too_deep() -> Result<(), Report> {
    let file = tempfile::NamedTempFile::new()?;
    std::fs::write(file.path(), "[".repeat(MAX_DEPTH + 1))?;

    let error = read_json::<Value, _>(&file.path()).unwrap_err();
    assert!(format!("{error:?}").contains("levels deep"));
    Ok(())
}

#[test]
fn write_deep_chain() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("deep.json");

    with_large_stack(|| {
        let input = chain_json(6000);
        let mut deserializer = serde_json::Deserializer::from_str(&input);
        deserializer.disable_recursion_limit();
        let tree: Value = serde::Deserialize::deserialize(&mut deserializer)?;
        write_json(&tree, &path, 0)
    })?;

    let written = std::fs::read(&path)?;
    assert_eq!(json_depth(&written), 11999);
    Ok(())
}

#[test]
fn large_stack_returns_errors() {
    let result: Result<(), Report> = with_large_stack(|| Err(eyre!("failed")));
    assert!(result.is_err());
    assert_eq!(with_large_stack(|| Ok(json!(1))).ok(), Some(json!(1)));
}
