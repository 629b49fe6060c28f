use crate::annotation::{Annotations, Feature};
use crate::utils::with_large_stack;
use crate::Document;

use color_eyre::eyre::{Report, Result};
use serde_json::{json, Value};

fn example() -> Value {
    json!({
        "version": "v2",
        "meta": {"title": "old", "genome_annotations": {}, "updated": "2023-01-01"},
        "tree": {"name": "root"},
        "root_sequence": {"nuc": "ACGT"}
    })
}

#[test]
fn keys_keep_order() -> Result<(), Report> {
    let mut document = Document::try_from(example())?;
    let mut annotations = Annotations::new();
    annotations.insert("nuc", Feature::new().with_span(1, 4));
    document.set_annotations(&annotations)?;
    document.set_title("new")?;

    let meta: Vec<_> = document.meta().as_object().unwrap().keys().cloned().collect();
    assert_eq!(meta, ["title", "genome_annotations", "updated"]);
    assert_eq!(document.meta()["title"], json!("new"));
    assert_eq!(document.meta()["genome_annotations"]["nuc"]["end"], json!(4));

    let json = Value::from(document);
    let keys: Vec<_> = json.as_object().unwrap().keys().cloned().collect();
    assert_eq!(keys, ["version", "meta", "tree", "root_sequence"]);
    assert_eq!(json["meta"]["updated"], json!("2023-01-01"));
    Ok(())
}

#[test]
fn invalid_documents() {
    assert!(Document::try_from(json!([])).is_err());
    assert!(Document::try_from(json!({"meta": {}})).is_err());
    assert!(Document::try_from(json!({"tree": {}})).is_err());
    assert!(Document::try_from(json!({"tree": {}, "meta": "x"})).is_err());
}

#[test]
fn write_then_read() -> Result<(), Report> {
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("tree.json");
    let document = Document::try_from(example())?;
    document.write(&path, 0)?;

    let text = std::fs::read_to_string(&path)?;
    assert!(text.starts_with("{\n\"version\": \"v2\",\n\"meta\": {\n\"title\": \"old\","));
    assert_eq!(Document::read(&path)?, document);

    document.write(&path, 2)?;
    let text = std::fs::read_to_string(&path)?;
    assert!(text.starts_with("{\n  \"version\": \"v2\",\n  \"meta\": {\n    \"title\": \"old\","));
    Ok(())
}

#[test]
fn read_deep_tree() -> Result<(), Report> {
    let depth = 10_000;
    let mut text = String::from(r#"{"meta": {}, "tree": "#);
    text.push_str(&r#"{"children": ["#.repeat(depth));
    text.push_str(r#"{"name": "leaf"}"#);
    text.push_str(&"]}".repeat(depth));
    text.push('}');

    let file = tempfile::NamedTempFile::new()?;
    std::fs::write(file.path(), text)?;
    let nodes = with_large_stack(|| {
        let document = Document::read(file.path())?;
        assert!(document.meta().as_object().is_some_and(|meta| meta.is_empty()));
        Ok(reannotate_tree::node::preorder(document.tree()).count())
    })?;
    assert_eq!(nodes, depth + 1);
    Ok(())
}

#[test]
fn read_too_deep() -> Result<(), Report> {
    let depth = crate::utils::MAX_DEPTH;
    let mut text = String::from(r#"{"meta": {}, "tree": "#);
    text.push_str(&"[".repeat(depth));
    text.push_str(&"]".repeat(depth));
    text.push('}');

    let file = tempfile::NamedTempFile::new()?;
    std::fs::write(file.path(), text)?;
    assert!(Document::read(file.path()).is_err());
    Ok(())
}

#[test]
fn read_missing_file() {
    assert!(Document::read("does/not/exist.json").is_err());
}

#[test]
fn read_not_json() -> Result<(), Report> {
    let file = tempfile::NamedTempFile::new()?;
    std::fs::write(file.path(), "{\"tree\": ")?;
    assert!(Document::read(file.path()).is_err());
    Ok(())
}
