use crate::annotation::{Annotations, Feature, Strand};

/// First nucleotide of ORF1ab, where amino acid 1 of the polyproteins begins.
const ORF1AB_START: usize = 266;
/// Nucleotide where the -1 ribosomal frameshift of ORF1ab happens.
const FRAMESHIFT: usize = 13468;

/// Returns the nucleotide where amino acid `aa` (1-based) of ORF1ab begins, upstream of the frameshift.
const fn orf1ab_nt(aa: usize) -> usize {
    ORF1AB_START + (aa - 1) * 3
}

/// Create SARS-CoV-2 genome annotations, with ORF1ab as one frameshifted gene and
/// NSP3 and RdRp as named regions of it.
///
/// Each feature lists its keys in the order of the hand-authored table it reproduces.
///
/// ## Examples
///
/// ```rust
/// use reannotate::annotation::{sarscov2, Span, Segment};
///
/// let annotations = sarscov2::build();
/// let nsp3 = annotations.get("NSP3").unwrap();
/// assert_eq!(nsp3.span()?, Span::Single(Segment { start: 2720, end: 8551 }));
/// # Ok::<(), color_eyre::eyre::Report>(())
/// ```
pub fn build() -> Annotations {
    let mut annotations = Annotations::new();

    annotations.insert("nuc", Feature::new().with_span(1, 29903).with_strand(Strand::Forward));

    annotations.insert(
        "ORF1ab",
        Feature::new()
            .with("gene", "ORF1ab")
            .with_strand(Strand::Forward)
            .with_segments(&[(ORF1AB_START, FRAMESHIFT), (FRAMESHIFT, 21555)])
            .with("display_name", "AKA polyprotein PP1ab. -1 ribisomal frameshift. Cleaved to yield 15 nonstructural proteins (NSP1-10, 12-16)"),
    );

    annotations.insert(
        "PP1a",
        Feature::new()
            .with("gene", "ORF1ab")
            .with_span(ORF1AB_START, 13483)
            .with("display_name", "Polyprotein PP1a. Cleaved to yield 11 nonstructural proteins (NSP1-11)"),
    );

    annotations.insert(
        "NSP3",
        Feature::new()
            .with("gene", "ORF1ab")
            .with("color", "#2c7fb8")
            .with_span(orf1ab_nt(819), orf1ab_nt(2763) - 1)
            .with("display_name", "Cleaved from short + long polyproteins")
            .with_strand(Strand::Forward),
    );

    // 2796nt (932aa), the first segment ends at the slip
    annotations.insert(
        "RdRp",
        Feature::new()
            .with("gene", "ORF1ab")
            .with("color", "#41b6c4")
            .with_segments(&[(orf1ab_nt(4393), FRAMESHIFT), (FRAMESHIFT, FRAMESHIFT + 2796 - 1)])
            .with("display_name", "NSP12; Cleaved from long polyprotein only; I'm not sure if the coordinates are correct, BTW!!!")
            .with_strand(Strand::Forward),
    );

    let mut spike_features = Annotations::new();
    spike_features.insert(
        "RBD",
        Feature::new()
            .with_span(22517, 23182)
            .with("color", "#feb24c")
            .with("display_name", "S1 RBD. Coordinates from NCBI genome viewer."),
    );
    annotations.insert(
        "S",
        Feature::new()
            .with("gene", "Spike")
            .with("end", 25384)
            .with("display_name", "structural protein; spike protein; surface glycoprotein")
            .with("start", 21563)
            .with_strand(Strand::Forward)
            .with_features(spike_features),
    );

    // the display name key of E is misspelled in the source annotations and kept as is
    annotations.insert(
        "E",
        Feature::new()
            .with("end", 26472)
            .with("dsiplay_name", "ORF4; structural protein; E protein")
            .with("start", 26245)
            .with_strand(Strand::Forward)
            .with("type", "CDS"),
    );

    annotations.insert(
        "M",
        Feature::new()
            .with("end", 27191)
            .with("start", 26523)
            .with_strand(Strand::Forward)
            .with("gene", "M")
            .with("display_name", "ORF5; structural protein (membrane glycoprotein)"),
    );

    annotations.insert(
        "N",
        Feature::new()
            .with("end", 29533)
            .with("display_name", "nucleocapsid phosphoprotein (ORF9)")
            .with("start", 28274)
            .with_strand(Strand::Forward),
    );

    let rows = [
        ("ORF3a", 25393, 26220),
        ("ORF6", 27202, 27387),
        ("ORF7a", 27394, 27759),
        ("ORF7b", 27756, 27887),
        ("ORF8", 27894, 28259),
        ("ORF9b", 28284, 28577),
    ];
    for (name, start, end) in rows {
        annotations.insert(name, Feature::new().with("end", end).with("start", start).with_strand(Strand::Forward));
    }

    annotations
}
