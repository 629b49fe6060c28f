use crate::Substitution;

use color_eyre::eyre::{Report, Result};

#[test]
fn parse_residues_and_coord() -> Result<(), Report> {
    let observed: Substitution = "G5000Y".parse()?;
    let expected = Substitution { reference: 'G', coord: 5000, alt: 'Y' };
    assert_eq!(expected, observed);
    assert_eq!(observed.to_string(), "G5000Y");
    Ok(())
}

#[test]
fn parse_stop_and_deletion() -> Result<(), Report> {
    let stop: Substitution = "Q27*".parse()?;
    assert_eq!(stop.alt, '*');
    let deletion: Substitution = "H69-".parse()?;
    assert_eq!(deletion.alt, '-');
    assert_eq!(deletion.coord, 69);
    Ok(())
}

#[test]
fn parse_malformed() {
    for s in ["", "A", "AT", "A-5T", "A1.5T", "1234", "A12 T", "A12", "12T", "A0T"] {
        assert!(s.parse::<Substitution>().is_err(), "{s:?} should not parse");
    }
}

#[test]
fn shift_keeps_residues() -> Result<(), Report> {
    for (s, k) in [("A10T", 0), ("A10T", 4401), ("N501Y", -500), ("P314L", 1)] {
        let sub: Substitution = s.parse()?;
        let shifted = sub.shift(k)?;
        assert_eq!(shifted.reference, sub.reference);
        assert_eq!(shifted.alt, sub.alt);
        assert_eq!(shifted.coord as isize, sub.coord as isize + k);
    }
    Ok(())
}

#[test]
fn shift_out_of_gene() -> Result<(), Report> {
    let sub: Substitution = "A10T".parse()?;
    assert!(sub.shift(-10).is_err());
    assert!(sub.shift(isize::MIN).is_err());
    Ok(())
}
