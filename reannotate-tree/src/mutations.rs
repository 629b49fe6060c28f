use crate::Substitution;

use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::default::Default;

// ----------------------------------------------------------------------------
// Mutations
// ----------------------------------------------------------------------------

/// The `branch_attrs.mutations` of a tree node, mapping a gene name to its mutation strings.
///
/// Genes keep their insertion order. Replacing an existing gene keeps its position,
/// new genes are appended and removing a gene leaves the order of the others intact.
///
/// ## Examples
///
/// ```rust
/// use reannotate_tree::Mutations;
///
/// let mut mutations = Mutations::from_iter([("nuc", vec!["C241T"]), ("ORF1a", vec!["T265I"])]);
/// mutations.insert("PP1a", vec!["T265I".to_string()]);
/// mutations.remove("ORF1a");
/// assert_eq!(mutations.genes().collect::<Vec<_>>(), ["nuc", "PP1a"]);
/// ```
#[derive(Clone, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Mutations(IndexMap<String, Vec<String>>);

impl<K, V> FromIterator<(K, V)> for Mutations
where
    K: Into<String>,
    V: IntoIterator,
    V::Item: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Mutations(
            iter.into_iter()
                .map(|(gene, mutations)| (gene.into(), mutations.into_iter().map(Into::into).collect()))
                .collect(),
        )
    }
}

impl Mutations {
    pub fn new() -> Self {
        Mutations(IndexMap::new())
    }

    pub fn contains(&self, gene: &str) -> bool {
        self.0.contains_key(gene)
    }

    pub fn get(&self, gene: &str) -> Option<&[String]> {
        self.0.get(gene).map(Vec::as_slice)
    }

    /// Iterate through gene names in order.
    pub fn genes(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Set the mutations of a gene, returning the previous ones if it was present.
    pub fn insert<G: Into<String>>(&mut self, gene: G, mutations: Vec<String>) -> Option<Vec<String>> {
        self.0.insert(gene.into(), mutations)
    }

    /// Append to the mutations of a gene, creating an empty list first if it is absent.
    pub fn extend<G, I>(&mut self, gene: G, mutations: I)
    where
        G: Into<String>,
        I: IntoIterator<Item = String>,
    {
        self.0.entry(gene.into()).or_default().extend(mutations);
    }

    /// Remove a gene without perturbing the order of the remaining genes.
    pub fn remove(&mut self, gene: &str) -> Option<Vec<String>> {
        self.0.shift_remove(gene)
    }

    /// Returns the mutations of a gene parsed into [`Substitution`]s.
    ///
    /// An absent gene has no substitutions. A single malformed mutation string is an error.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use reannotate_tree::Mutations;
    ///
    /// let mutations = Mutations::from_iter([("S", vec!["D614G", "N501Y"]), ("E", vec!["oops"])]);
    /// assert_eq!(mutations.substitutions("S")?.len(), 2);
    /// assert!(mutations.substitutions("M")?.is_empty());
    /// assert!(mutations.substitutions("E").is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn substitutions(&self, gene: &str) -> Result<Vec<Substitution>, Report> {
        self.get(gene)
            .unwrap_or_default()
            .iter()
            .map(|m| m.parse::<Substitution>())
            .collect::<Result<Vec<_>, _>>()
            .wrap_err_with(|| eyre!("Failed to parse the mutations of gene: {gene}"))
    }
}
