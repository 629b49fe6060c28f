//! Gene [`Annotations`] of a genome, in the Auspice `genome_annotations` format.

pub mod sarscov2;

use crate::utils;

#[cfg(feature = "cli")]
use clap::Parser;
use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use indexmap::IndexMap;
use log::info;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::default::Default;
use std::fmt::{Debug, Display, Formatter};
use std::path::{Path, PathBuf};

// ----------------------------------------------------------------------------
// Annotations
// ----------------------------------------------------------------------------

/// Gene [`Annotations`], mapping a feature name (ex. `S`, `ORF1ab`) to its [`Feature`].
///
/// Features keep the order in which they were declared.
///
/// ## Examples
///
/// ```rust
/// use reannotate::annotation::{Annotations, Feature};
///
/// let mut annotations = Annotations::new();
/// annotations.insert("nuc", Feature::new().with_span(1, 29903));
/// annotations.insert("S", Feature::new().with("gene", "Spike").with_span(21563, 25384));
/// assert_eq!(annotations.names().collect::<Vec<_>>(), ["nuc", "S"]);
/// # annotations.validate()?;
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Annotations(IndexMap<String, Feature>);

impl Annotations {
    pub fn new() -> Self {
        Annotations(IndexMap::new())
    }

    pub fn get(&self, name: &str) -> Option<&Feature> {
        self.0.get(name)
    }

    pub fn insert<N: Into<String>>(&mut self, name: N, feature: Feature) -> Option<Feature> {
        self.0.insert(name.into(), feature)
    }

    /// Iterate through feature names in order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Check that every feature, including nested ones, has a usable [`Span`].
    pub fn validate(&self) -> Result<(), Report> {
        self.0.iter().try_for_each(|(name, feature)| {
            feature.validate().wrap_err_with(|| eyre!("Invalid annotation for feature: {name}"))
        })
    }

    /// Read [`Annotations`] from a JSON file.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use reannotate::annotation::{sarscov2, Annotations};
    ///
    /// let file = tempfile::NamedTempFile::new()?;
    /// let expected = sarscov2::build();
    /// expected.write(file.path())?;
    /// let observed = Annotations::read(file.path())?;
    /// assert_eq!(expected, observed);
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn read<P>(path: &P) -> Result<Annotations, Report>
    where
        P: AsRef<Path> + Debug + ?Sized,
    {
        let annotations: Annotations = utils::read_json(&path)
            .wrap_err_with(|| eyre!("Failed to read Annotations file: {path:?}"))?;
        annotations.validate().wrap_err_with(|| eyre!("Invalid Annotations file: {path:?}"))?;
        Ok(annotations)
    }

    /// Write [`Annotations`] to a JSON file.
    pub fn write<P>(&self, path: &P) -> Result<(), Report>
    where
        P: AsRef<Path> + Debug + ?Sized,
    {
        utils::write_json(self, &path, 2)
            .wrap_err_with(|| eyre!("Failed to write Annotations file: {path:?}"))
    }
}

// ----------------------------------------------------------------------------
// Feature
// ----------------------------------------------------------------------------

/// A region of the genome, such as a gene or a protein domain.
///
/// Coordinates are 1-based and inclusive. A feature is either one contiguous span
/// (`start`, `end`) or a list of `segments` for spliced or frameshifted genes.
///
/// A feature is kept as its JSON object, so every key is written back in the order it
/// was read or added, including keys this type has no accessor for.
///
/// ## Examples
///
/// ```rust
/// use reannotate::annotation::{Feature, Strand};
///
/// let feature = Feature::new().with("gene", "M").with_span(26523, 27191).with_strand(Strand::Forward);
/// assert_eq!(feature.keys().collect::<Vec<_>>(), ["gene", "start", "end", "strand"]);
/// assert_eq!(feature.gene(), Some("M"));
/// assert_eq!(feature.strand()?, Some(Strand::Forward));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Feature(Map<String, Value>);

impl Feature {
    pub fn new() -> Self {
        Feature(Map::new())
    }

    /// Set `key` to `value`. A new key is appended, an existing one keeps its position.
    pub fn with<K: Into<String>, V: Into<Value>>(mut self, key: K, value: V) -> Self {
        self.0.insert(key.into(), value.into());
        self
    }

    /// Set the `start` and `end` of a contiguous feature.
    pub fn with_span(self, start: usize, end: usize) -> Self {
        self.with("start", start).with("end", end)
    }

    /// Set the `segments` of a spliced or frameshifted feature.
    pub fn with_segments(self, segments: &[(usize, usize)]) -> Self {
        let segments: Vec<Value> = segments.iter().map(|(start, end)| json!({"start": start, "end": end})).collect();
        self.with("segments", segments)
    }

    pub fn with_strand(self, strand: Strand) -> Self {
        self.with("strand", strand)
    }

    /// Set the sub-regions of this feature (ex. the receptor binding domain of spike).
    pub fn with_features(self, features: Annotations) -> Self {
        self.with("features", features)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Iterate through keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn gene(&self) -> Option<&str> {
        self.get("gene").and_then(Value::as_str)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.get("display_name").and_then(Value::as_str)
    }

    /// Hex color code (ex. `#2c7fb8`).
    pub fn color(&self) -> Option<&str> {
        self.get("color").and_then(Value::as_str)
    }

    /// Feature type (ex. `CDS`).
    pub fn kind(&self) -> Option<&str> {
        self.get("type").and_then(Value::as_str)
    }

    pub fn strand(&self) -> Result<Option<Strand>, Report> {
        self.get("strand")
            .map(Strand::deserialize)
            .transpose()
            .wrap_err("Feature strand must be \"+\" or \"-\".")
    }

    pub fn features(&self) -> Result<Option<Annotations>, Report> {
        self.get("features")
            .map(Annotations::deserialize)
            .transpose()
            .wrap_err("Failed to read the sub-features of feature.")
    }

    fn coord(&self, key: &str) -> Result<Option<usize>, Report> {
        self.get(key)
            .map(|value| {
                value
                    .as_u64()
                    .and_then(|coord| usize::try_from(coord).ok())
                    .ok_or_else(|| eyre!("Feature {key} is not a coordinate: {value}"))
            })
            .transpose()
    }

    /// Returns the [`Span`] of this feature.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use reannotate::annotation::{Feature, Segment, Span};
    ///
    /// let feature = Feature::new().with_segments(&[(266, 13468), (13468, 21555)]);
    /// let expected = vec![Segment { start: 266, end: 13468 }, Segment { start: 13468, end: 21555 }];
    /// assert_eq!(feature.span()?, Span::Segments(expected));
    ///
    /// assert!(feature.with_span(1, 10).span().is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn span(&self) -> Result<Span, Report> {
        let segments = self
            .get("segments")
            .map(Vec::<Segment>::deserialize)
            .transpose()
            .wrap_err("Failed to read the segments of feature.")?;

        match (self.coord("start")?, self.coord("end")?, segments) {
            (Some(start), Some(end), None) => Ok(Span::Single(Segment { start, end })),
            (None, None, Some(segments)) => Ok(Span::Segments(segments)),
            (_, _, Some(_)) => Err(eyre!("Feature has both start/end and segments.")
                .suggestion("Use either start and end, or segments.")),
            _ => Err(eyre!("Feature has neither start/end nor segments.")
                .suggestion("Use either start and end, or segments.")),
        }
    }

    /// Check the [`Span`] and [`Strand`] of this feature and of its sub-features.
    pub fn validate(&self) -> Result<(), Report> {
        let segments = match self.span()? {
            Span::Single(segment) => vec![segment],
            Span::Segments(segments) => segments,
        };
        if segments.is_empty() {
            Err(eyre!("Feature has an empty list of segments."))?;
        }
        for segment in segments {
            if segment.start == 0 || segment.start > segment.end {
                Err(eyre!("Invalid feature coordinates: {segment}")
                    .suggestion("Coordinates are 1-based and start must not be greater than end."))?;
            }
        }
        self.strand()?;
        match self.features()? {
            Some(features) => features.validate(),
            None => Ok(()),
        }
    }
}

/// The coordinates of a [`Feature`].
#[derive(Clone, Debug, PartialEq)]
pub enum Span {
    Single(Segment),
    Segments(Vec<Segment>),
}

/// A contiguous region, 1-based and inclusive.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Segment {
    pub start: usize,
    pub end: usize,
}

#[rustfmt::skip]
impl Display for Segment { fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}-{}", self.start, self.end) } }

/// DNA strand of a [`Feature`].
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
pub enum Strand {
    #[default]
    #[serde(rename = "+")]
    Forward,
    #[serde(rename = "-")]
    Reverse,
}

#[rustfmt::skip]
impl Display for Strand { fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}", match self { Strand::Forward => "+", Strand::Reverse => "-" }) } }

impl From<Strand> for Value {
    fn from(strand: Strand) -> Value {
        Value::from(strand.to_string())
    }
}

impl From<Annotations> for Value {
    fn from(annotations: Annotations) -> Value {
        Value::Object(annotations.0.into_iter().map(|(name, feature)| (name, Value::Object(feature.0))).collect())
    }
}

// ----------------------------------------------------------------------------
// Export
// ----------------------------------------------------------------------------

/// Export annotations arguments.
#[derive(Debug, Default, Deserialize, Serialize)]
#[cfg_attr(feature = "cli", derive(Parser))]
#[cfg_attr(feature = "cli", clap(about = "Write the built-in SARS-CoV-2 annotations as JSON."))]
pub struct Args {
    /// Output JSON file, the annotations are printed to stdout if not provided.
    #[cfg_attr(feature = "cli", clap(short = 'o', long))]
    pub output: Option<PathBuf>,
}

/// Export the built-in SARS-CoV-2 [`Annotations`].
///
/// Returns the JSON when no output file is given.
pub fn export(args: &Args) -> Result<Option<String>, Report> {
    let annotations = sarscov2::build();
    match &args.output {
        Some(path) => {
            info!("Writing annotations: {path:?}");
            annotations.write(path)?;
            Ok(None)
        }
        None => {
            let json = serde_json::to_string_pretty(&annotations).wrap_err("Failed to serialize Annotations.")?;
            Ok(Some(json))
        }
    }
}
