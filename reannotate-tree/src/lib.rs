//! Primitives for reading and rewriting the mutations of an [Auspice](https://docs.nextstrain.org/projects/auspice/) tree.
//!
//! A tree is kept as a [`serde_json::Value`] so that every field this crate does not
//! touch (node attributes, divergence, metadata) is carried through unchanged, in its
//! original key order.
//!
//! ```rust
//! use reannotate_tree::{node, Substitution};
//! use serde_json::json;
//!
//! let tree = json!({
//!     "name": "root",
//!     "branch_attrs": {"mutations": {"S": ["D614G"]}},
//!     "children": [{"name": "A"}, {"name": "B"}]
//! });
//!
//! let names: Vec<_> = node::preorder(&tree).filter_map(node::name).collect();
//! assert_eq!(names, ["root", "A", "B"]);
//!
//! let mutations = node::get_mutations(&tree)?.unwrap_or_default();
//! assert_eq!(mutations.substitutions("S")?, ["D614G".parse::<Substitution>()?]);
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```

mod mutations;
pub mod node;
mod substitution;

#[doc(inline)]
pub use mutations::Mutations;
#[doc(inline)]
pub use substitution::Substitution;
