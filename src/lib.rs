//! `reannotate` remaps the mutations of an [Auspice](https://docs.nextstrain.org/projects/auspice/) tree into new gene coordinates.
//!
//! SARS-CoV-2 trees used to record ORF1ab mutations as two genes, `ORF1a` and `ORF1b`,
//! either side of its ribosomal frameshift. `reannotate`:
//!
//! 1. Merges them into the combined `ORF1ab` frame, keeping a `PP1a` copy of `ORF1a`.
//! 1. Derives the mutations of named regions of ORF1ab (`NSP3`, `RdRp`), re-based to start at 1.
//! 1. Replaces the genome annotations and title of the tree metadata.
//!
//! ```rust
//! use reannotate::{annotation::sarscov2, remap, Document};
//! use serde_json::json;
//!
//! let json = json!({
//!     "meta": {"title": "ncov"},
//!     "tree": {"name": "root", "branch_attrs": {"mutations": {"ORF1b": ["P314L"]}}}
//! });
//! let mut document = Document::try_from(json)?;
//! remap::remap_tree(document.tree_mut(), &remap::Rules::default())?;
//! document.set_annotations(&sarscov2::build())?;
//!
//! assert_eq!(document.tree()["branch_attrs"]["mutations"]["ORF1ab"], json!(["P4715L"]));
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```

pub mod annotation;
#[cfg(feature = "cli")]
pub mod cli;
pub mod document;
pub mod remap;
pub mod utils;

#[doc(inline)]
#[cfg(feature = "cli")]
pub use crate::cli::Cli;
#[doc(inline)]
pub use crate::document::Document;
#[doc(inline)]
#[cfg(feature = "cli")]
pub use crate::utils::verbosity::Verbosity;
