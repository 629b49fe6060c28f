//! Remap tree mutations from the split ORF1a/ORF1b frames into ORF1ab and its regions.
//!
//! SARS-CoV-2 ORF1ab is translated across a -1 ribosomal frameshift. Older trees record
//! its mutations as two genes, `ORF1a` (before the slip) and `ORF1b` (after it). This
//! module merges them into the combined `ORF1ab` frame and derives the mutations of
//! named regions (ex. `NSP3`, `RdRp`) re-based to start at position 1.
//!
//! ```rust
//! use reannotate::remap::{rewrite, Rules};
//! use reannotate_tree::Mutations;
//!
//! let rules = Rules::default();
//! let mut mutations = Mutations::from_iter([("ORF1a", vec!["S1000F"]), ("ORF1b", vec!["P314L"])]);
//! rewrite(&mut mutations, &rules)?;
//!
//! assert_eq!(mutations.get("ORF1ab").unwrap(), ["S1000F", "P4715L"]);
//! assert_eq!(mutations.get("PP1a").unwrap(), ["S1000F"]);
//! assert_eq!(mutations.get("NSP3").unwrap(), ["S182F"]);
//! assert_eq!(mutations.get("RdRp").unwrap(), ["P323L"]);
//! # Ok::<(), color_eyre::eyre::Report>(())
//! ```

use crate::annotation::{sarscov2, Annotations};
use crate::document::Document;
use crate::utils;

#[cfg(feature = "cli")]
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use indoc::formatdoc;
use itertools::Itertools;
use log::{debug, info, warn};
use reannotate_tree::{node, Mutations, Substitution};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::default::Default;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};
use strum::{EnumIter, IntoEnumIterator};

// ----------------------------------------------------------------------------
// Rules
// ----------------------------------------------------------------------------

/// Gene names and coordinates that drive the remapping of a node's mutations.
///
/// The [`Default`] rules are those of SARS-CoV-2 ORF1ab. Fields missing from a rules
/// JSON fall back to the defaults.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
#[serde(default)]
pub struct Rules {
    /// Legacy gene before the frameshift, in the same frame as the combined gene.
    pub first_segment: String,
    /// Legacy gene after the frameshift.
    pub second_segment: String,
    /// Combined gene spanning the frameshift.
    pub combined: String,
    /// Protein that shares the frame of the first segment.
    pub alias: String,
    /// Amino acid offset of the second segment in the combined frame.
    pub second_offset: isize,
    /// Regions of the combined gene, in amino acid coordinates.
    pub regions: Vec<Region>,
}

impl Default for Rules {
    fn default() -> Self {
        Rules {
            first_segment: "ORF1a".to_string(),
            second_segment: "ORF1b".to_string(),
            combined: "ORF1ab".to_string(),
            alias: "PP1a".to_string(),
            second_offset: 4401,
            regions: vec![Region::new("NSP3", 819, 2763), Region::new("RdRp", 4393, 5324)],
        }
    }
}

impl Rules {
    /// Read [`Rules`] from a JSON file.
    pub fn read<P>(path: &P) -> Result<Rules, Report>
    where
        P: AsRef<Path> + Debug + ?Sized,
    {
        let rules: Rules =
            utils::read_json(&path).wrap_err_with(|| eyre!("Failed to read Rules file: {path:?}"))?;
        rules.validate().wrap_err_with(|| eyre!("Invalid Rules file: {path:?}"))?;
        Ok(rules)
    }

    /// Check that every region has usable bounds.
    ///
    /// Overlapping regions are allowed but reported, since a mutation inside the
    /// overlap is then written to both.
    pub fn validate(&self) -> Result<(), Report> {
        for region in &self.regions {
            if region.start == 0 || region.start > region.end {
                Err(eyre!("Invalid bounds for region {}: {}-{}", region.name, region.start, region.end)
                    .suggestion("Regions are 1-based and start must not be greater than end."))?;
            }
        }
        for (a, b) in self.regions.iter().tuple_combinations() {
            if a.start <= b.end && b.start <= a.end {
                warn!("Regions {} and {} overlap.", a.name, b.name);
            }
        }
        Ok(())
    }
}

// ----------------------------------------------------------------------------
// Region
// ----------------------------------------------------------------------------

/// A named region of the combined gene, with 1-based inclusive amino acid bounds.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Region {
    pub name: String,
    pub start: usize,
    pub end: usize,
}

impl Region {
    pub fn new(name: &str, start: usize, end: usize) -> Self {
        Region { name: name.to_string(), start, end }
    }

    pub fn contains(&self, coord: usize) -> bool {
        (self.start..=self.end).contains(&coord)
    }

    /// Returns the substitutions that fall inside this region, re-based so that the
    /// region start is position 1. Substitutions outside of the region are dropped.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use reannotate::remap::Region;
    /// use reannotate_tree::Substitution;
    ///
    /// let region = Region::new("NSP3", 819, 2763);
    /// let subs: Vec<Substitution> = vec!["A819X".parse()?, "G5000Y".parse()?, "T2763C".parse()?];
    /// let observed: Vec<_> = region.extract(&subs)?.iter().map(|s| s.to_string()).collect();
    /// assert_eq!(observed, ["A1X", "T1945C"]);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn extract(&self, substitutions: &[Substitution]) -> Result<Vec<Substitution>, Report> {
        let offset = 1 - self.start as isize;
        substitutions.iter().filter(|sub| self.contains(sub.coord)).map(|sub| sub.shift(offset)).collect()
    }
}

// ----------------------------------------------------------------------------
// Legacy
// ----------------------------------------------------------------------------

/// Which legacy segment genes a node's mutations still use.
#[derive(Clone, Copy, Debug, EnumIter, Eq, Hash, PartialEq)]
pub enum Legacy {
    /// Neither legacy segment is present.
    Migrated,
    /// Only the first segment is present.
    FirstSegment,
    /// Only the second segment is present.
    SecondSegment,
    /// Both segments are present.
    BothSegments,
}

impl Display for Legacy {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Legacy::Migrated => "migrated",
            Legacy::FirstSegment => "first segment",
            Legacy::SecondSegment => "second segment",
            Legacy::BothSegments => "both segments",
        };
        write!(f, "{name}")
    }
}

impl Legacy {
    /// Classify `mutations` by the legacy segment genes of `rules` they contain.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use reannotate::remap::{Legacy, Rules};
    /// use reannotate_tree::Mutations;
    ///
    /// let rules = Rules::default();
    /// let mutations = Mutations::from_iter([("ORF1b", vec!["P314L"])]);
    /// assert_eq!(Legacy::classify(&mutations, &rules), Legacy::SecondSegment);
    /// ```
    pub fn classify(mutations: &Mutations, rules: &Rules) -> Self {
        match (mutations.contains(&rules.first_segment), mutations.contains(&rules.second_segment)) {
            (false, false) => Legacy::Migrated,
            (true, false) => Legacy::FirstSegment,
            (false, true) => Legacy::SecondSegment,
            (true, true) => Legacy::BothSegments,
        }
    }
}

// ----------------------------------------------------------------------------
// Rewrite
// ----------------------------------------------------------------------------

/// Copy the first segment into the combined gene and its alias, then remove it.
///
/// The first segment shares the frame of the combined gene, so its mutations are copied unchanged.
fn merge_first_segment(mutations: &mut Mutations, rules: &Rules) {
    if let Some(first) = mutations.get(&rules.first_segment).map(<[String]>::to_vec) {
        mutations.insert(rules.combined.as_str(), first.clone());
        mutations.insert(rules.alias.as_str(), first);
        mutations.remove(&rules.first_segment);
    }
}

/// Shift the second segment into the combined frame, append it to the combined gene, then remove it.
fn merge_second_segment(mutations: &mut Mutations, rules: &Rules) -> Result<(), Report> {
    let shifted: Vec<String> = mutations
        .substitutions(&rules.second_segment)?
        .iter()
        .map(|sub| sub.shift(rules.second_offset).map(|sub| sub.to_string()))
        .collect::<Result<_, _>>()?;
    mutations.extend(rules.combined.as_str(), shifted);
    mutations.remove(&rules.second_segment);
    Ok(())
}

/// Write the mutations of every region derived from the combined gene, even when empty.
fn derive_regions(mutations: &mut Mutations, rules: &Rules) -> Result<(), Report> {
    let combined = mutations.substitutions(&rules.combined)?;
    for region in &rules.regions {
        let extracted = region.extract(&combined)?.iter().map(Substitution::to_string).collect();
        mutations.insert(region.name.as_str(), extracted);
    }
    Ok(())
}

/// Rewrite one node's mutations in place.
///
/// 1. Merge the legacy segments into the combined gene, according to [`Legacy::classify`].
/// 2. If the combined gene is present, derive the mutations of every [`Region`].
///
/// Mutations without legacy segments or a combined gene are left untouched. Returns the
/// [`Legacy`] class the mutations had before rewriting.
pub fn rewrite(mutations: &mut Mutations, rules: &Rules) -> Result<Legacy, Report> {
    let legacy = Legacy::classify(mutations, rules);

    match legacy {
        Legacy::Migrated => (),
        Legacy::FirstSegment => merge_first_segment(mutations, rules),
        Legacy::SecondSegment => merge_second_segment(mutations, rules)?,
        Legacy::BothSegments => {
            merge_first_segment(mutations, rules);
            merge_second_segment(mutations, rules)?;
        }
    }

    if mutations.contains(&rules.combined) {
        derive_regions(mutations, rules)?;
    }

    Ok(legacy)
}

// ----------------------------------------------------------------------------
// Summary
// ----------------------------------------------------------------------------

/// Counts of the nodes seen while remapping a tree.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Summary {
    /// Every node in the tree.
    pub nodes: usize,
    /// Nodes with mutations, by their [`Legacy`] class.
    pub legacy: Vec<(Legacy, usize)>,
    /// Nodes whose regions were derived from the combined gene.
    pub derived: usize,
}

impl Summary {
    fn new() -> Self {
        Summary { nodes: 0, legacy: Legacy::iter().map(|l| (l, 0)).collect(), derived: 0 }
    }

    fn record(&mut self, legacy: Legacy) {
        if let Some((_, count)) = self.legacy.iter_mut().find(|(l, _)| *l == legacy) {
            *count += 1;
        }
    }

    /// Number of nodes with mutations of the given [`Legacy`] class.
    pub fn count(&self, legacy: Legacy) -> usize {
        self.legacy.iter().find(|(l, _)| *l == legacy).map(|(_, count)| *count).unwrap_or_default()
    }
}

impl Display for Summary {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let legacy = self.legacy.iter().map(|(l, count)| format!("{l}: {count}")).join(", ");
        let summary = formatdoc!(
            "nodes: {}
            nodes with mutations: {legacy}
            nodes with derived regions: {}",
            self.nodes,
            self.derived,
        );
        write!(f, "{summary}")
    }
}

/// Rewrite the mutations of every node in `tree`, see [`rewrite`].
///
/// Nodes are visited in depth-first pre-order. Nodes without mutations are skipped, but
/// their children are still visited. The first malformed mutation aborts the remapping.
///
/// ## Examples
///
/// ```rust
/// use reannotate::remap::{remap_tree, Legacy, Rules};
/// use serde_json::json;
///
/// let mut tree = json!({
///     "name": "root",
///     "branch_attrs": {"mutations": {"ORF1a": ["A10T"]}},
///     "children": [{"name": "leaf"}]
/// });
/// let summary = remap_tree(&mut tree, &Rules::default())?;
/// assert_eq!(summary.nodes, 2);
/// assert_eq!(summary.count(Legacy::FirstSegment), 1);
/// assert_eq!(tree["branch_attrs"]["mutations"]["ORF1ab"], json!(["A10T"]));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn remap_tree(tree: &mut Value, rules: &Rules) -> Result<Summary, Report> {
    let mut summary = Summary::new();

    let nodes = node::visit_mut(tree, |node| {
        let name = node::name(node).unwrap_or("<unnamed>").to_string();
        let Some(mut mutations) = node::get_mutations(node)? else {
            return Ok(());
        };

        let legacy = rewrite(&mut mutations, rules)
            .wrap_err_with(|| eyre!("Failed to remap the mutations of node: {name}"))?;
        summary.record(legacy);

        let derived = mutations.contains(&rules.combined);
        if derived {
            summary.derived += 1;
        }
        if legacy != Legacy::Migrated || derived {
            debug!("Remapped node {name} ({legacy}): {}", mutations.genes().join(", "));
            node::set_mutations(node, &mutations)?;
        }
        Ok(())
    })?;
    summary.nodes = nodes;

    Ok(summary)
}

// ----------------------------------------------------------------------------
// Run
// ----------------------------------------------------------------------------

/// Remap arguments.
#[derive(Debug, Deserialize, Serialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", clap(about = "Remap ORF1a/ORF1b tree mutations into ORF1ab and its regions."))]
pub struct Args {
    /// Input Auspice JSON.
    #[cfg_attr(feature = "cli", clap(short = 'i', long, default_value_os_t = Args::default().input))]
    pub input: PathBuf,

    /// Output Auspice JSON.
    ///
    /// If the directory does not exist, it will be created.
    #[cfg_attr(feature = "cli", clap(short = 'o', long, default_value_os_t = Args::default().output))]
    pub output: PathBuf,

    /// Title written to the output metadata.
    #[cfg_attr(feature = "cli", clap(short = 't', long, default_value_t = Args::default().title))]
    pub title: String,

    /// Annotations JSON to write to the output, instead of the built-in SARS-CoV-2 annotations.
    #[cfg_attr(feature = "cli", clap(short = 'a', long))]
    pub annotations: Option<PathBuf>,

    /// Rules JSON to remap with, instead of the built-in SARS-CoV-2 ORF1ab rules.
    #[cfg_attr(feature = "cli", clap(short = 'r', long))]
    pub rules: Option<PathBuf>,

    /// Number of spaces to indent the output JSON with.
    #[cfg_attr(feature = "cli", clap(long, default_value_t = 0))]
    pub indent: usize,
}

impl Default for Args {
    fn default() -> Self {
        Args::new()
    }
}

impl Args {
    pub fn new() -> Self {
        Args {
            input: PathBuf::from("./data/nextclade_sars-cov-2.json"),
            output: PathBuf::from("./datasets/entropy2023/ncov_new.json"),
            title: String::from("nCoV with adjusted annotations (use with caution!)"),
            annotations: None,
            rules: None,
            indent: 0,
        }
    }
}

/// Remap the mutations of an Auspice JSON and write it with new annotations and title.
///
/// Nothing is written if any step fails. The document is loaded, remapped and written
/// on a thread with a large stack (see [`utils::with_large_stack`]), so deep trees are
/// supported up to [`utils::MAX_DEPTH`].
///
/// ## Examples
///
/// ```rust
/// use reannotate::remap::{run, Args};
/// use serde_json::{json, Value};
///
/// let dir = tempfile::tempdir()?;
/// let input = dir.path().join("input.json");
/// let output = dir.path().join("output.json");
/// let tree = json!({"name": "root", "branch_attrs": {"mutations": {"ORF1b": ["P314L"]}}});
/// std::fs::write(&input, json!({"meta": {"title": "old"}, "tree": tree}).to_string())?;
///
/// let args = Args { input, output: output.clone(), ..Default::default() };
/// run(&args)?;
///
/// let observed: Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
/// assert_eq!(observed["meta"]["title"], json!(args.title));
/// assert_eq!(observed["tree"]["branch_attrs"]["mutations"]["RdRp"], json!(["P323L"]));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn run(args: &Args) -> Result<Summary, Report> {
    utils::with_large_stack(|| remap_file(args))
}

fn remap_file(args: &Args) -> Result<Summary, Report> {
    let rules = match &args.rules {
        Some(path) => {
            info!("Reading rules: {path:?}");
            Rules::read(path)?
        }
        None => Rules::default(),
    };
    let annotations: Annotations = match &args.annotations {
        Some(path) => {
            info!("Reading annotations: {path:?}");
            Annotations::read(path)?
        }
        None => sarscov2::build(),
    };

    info!("Reading tree: {:?}", args.input);
    let mut document = Document::read(&args.input)?;

    info!("Remapping mutations: {} + {} -> {}", rules.first_segment, rules.second_segment, rules.combined);
    let summary = remap_tree(document.tree_mut(), &rules)
        .wrap_err_with(|| eyre!("Failed to remap tree: {:?}", args.input))?;
    info!("Remapped tree:\n{summary}");

    document.set_annotations(&annotations)?;
    document.set_title(&args.title)?;

    info!("Writing tree: {:?}", args.output);
    document.write(&args.output, args.indent)?;

    Ok(summary)
}
