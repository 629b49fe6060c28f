//! An Auspice JSON [`Document`]: a `tree` and its `meta`data.

use crate::annotation::Annotations;
use crate::utils;

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use serde_json::{Map, Value};
use std::fmt::Debug;
use std::path::Path;

/// An Auspice JSON [`Document`].
///
/// The whole document is held in memory. Top-level keys other than `tree` and `meta`
/// (ex. `version`) are kept and written back in their original order.
#[derive(Clone, Debug, PartialEq)]
pub struct Document {
    json: Map<String, Value>,
}

impl TryFrom<Value> for Document {
    type Error = Report;

    /// Returns a [`Document`] from JSON, which must be an object with a `tree` and a `meta` object.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use reannotate::Document;
    /// use serde_json::json;
    ///
    /// let document = Document::try_from(json!({"meta": {}, "tree": {"name": "root"}}))?;
    /// assert_eq!(document.tree(), &json!({"name": "root"}));
    ///
    /// assert!(Document::try_from(json!({"tree": {}})).is_err());
    /// assert!(Document::try_from(json!({"meta": [], "tree": {}})).is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn try_from(value: Value) -> Result<Self, Report> {
        let Value::Object(json) = value else {
            return Err(eyre!("Auspice JSON is not an object."));
        };
        if !json.contains_key("tree") {
            Err(eyre!("Auspice JSON has no tree.")
                .suggestion("Only Auspice v2 JSON, with a top-level tree, is supported."))?;
        }
        match json.get("meta") {
            Some(Value::Object(_)) => (),
            Some(_) => Err(eyre!("The meta of the Auspice JSON is not an object."))?,
            None => Err(eyre!("Auspice JSON has no meta.")
                .suggestion("Only Auspice v2 JSON, with a top-level meta, is supported."))?,
        }
        Ok(Document { json })
    }
}

impl From<Document> for Value {
    fn from(document: Document) -> Self {
        Value::Object(document.json)
    }
}

impl Document {
    /// Read a [`Document`] from an Auspice JSON file.
    pub fn read<P>(path: &P) -> Result<Document, Report>
    where
        P: AsRef<Path> + Debug + ?Sized,
    {
        let value: Value =
            utils::read_json(&path).wrap_err_with(|| eyre!("Failed to read Auspice JSON: {path:?}"))?;
        Document::try_from(value).wrap_err_with(|| eyre!("Invalid Auspice JSON: {path:?}"))
    }

    /// Write a [`Document`] to an Auspice JSON file, indented by `indent` spaces.
    ///
    /// The file is replaced at once, so a failed write leaves no partial file.
    pub fn write<P>(&self, path: &P, indent: usize) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug + ?Sized,
    {
        utils::write_json(&self.json, &path, indent)
            .wrap_err_with(|| eyre!("Failed to write Auspice JSON: {path:?}"))
    }

    pub fn tree(&self) -> &Value {
        &self.json["tree"]
    }

    pub fn tree_mut(&mut self) -> &mut Value {
        &mut self.json["tree"]
    }

    pub fn meta(&self) -> &Value {
        &self.json["meta"]
    }

    fn meta_mut(&mut self) -> Result<&mut Map<String, Value>, Report> {
        self.json["meta"]
            .as_object_mut()
            .ok_or_else(|| eyre!("The meta of the Auspice JSON is not an object."))
    }

    /// Replace the `genome_annotations` of the metadata.
    pub fn set_annotations(&mut self, annotations: &Annotations) -> Result<(), Report> {
        let annotations = serde_json::to_value(annotations).wrap_err("Failed to serialize Annotations.")?;
        self.meta_mut()?.insert("genome_annotations".to_string(), annotations);
        Ok(())
    }

    /// Replace the `title` of the metadata.
    pub fn set_title(&mut self, title: &str) -> Result<(), Report> {
        self.meta_mut()?.insert("title".to_string(), Value::from(title));
        Ok(())
    }
}

#[cfg(test)]
mod tests;
