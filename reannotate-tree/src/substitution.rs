use color_eyre::eyre::{eyre, Report, Result, WrapErr};
use color_eyre::Help;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

// ----------------------------------------------------------------------------
// Substitution
// ----------------------------------------------------------------------------

/// A single residue [`Substitution`], written as `<reference><coord><alt>` (ex. `D614G`).
///
/// The residues are not checked against any alphabet, so stop codons (`*`) and
/// deletions (`-`) are accepted like any other symbol.
#[derive(Copy, Clone, Debug, Eq, Hash, PartialEq)]
pub struct Substitution {
    /// 1-based coordinate in the frame of the gene the substitution belongs to.
    pub coord: usize,
    /// Ancestral residue.
    pub reference: char,
    /// Derived residue.
    pub alt: char,
}

#[rustfmt::skip]
impl Display for Substitution { fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result { write!(f, "{}{}{}", self.reference, self.coord, self.alt) } }

impl FromStr for Substitution {
    type Err = Report;

    /// Returns a [`Substitution`] parsed from a mutation string.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use reannotate_tree::Substitution;
    ///
    /// let sub: Substitution = "A819X".parse()?;
    /// assert_eq!(sub, Substitution { reference: 'A', coord: 819, alt: 'X' });
    ///
    /// assert!("819X".parse::<Substitution>().is_err());
    /// assert!("A0T".parse::<Substitution>().is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    fn from_str(s: &str) -> Result<Self, Report> {
        let mut chars = s.chars();
        let (reference, alt) = match (chars.next(), chars.next_back()) {
            (Some(reference), Some(alt)) => (reference, alt),
            _ => Err(eyre!("Failed to parse substitution: {s:?}")
                .suggestion("Mutations must look like <reference><coord><alt>, ex. D614G."))?,
        };
        let digits = chars.as_str();

        let is_residue = |c: char| !c.is_ascii_digit() && !c.is_whitespace();
        if digits.is_empty()
            || !digits.chars().all(|c| c.is_ascii_digit())
            || !is_residue(reference)
            || !is_residue(alt)
        {
            Err(eyre!("Failed to parse substitution: {s:?}")
                .suggestion("Mutations must look like <reference><coord><alt>, ex. D614G."))?;
        }

        let coord: usize = digits
            .parse()
            .wrap_err_with(|| eyre!("Failed to parse coordinate of substitution: {s:?}"))?;
        if coord == 0 {
            Err(eyre!("Substitution coordinates are 1-based, found 0 in: {s:?}"))?;
        }

        Ok(Substitution { coord, reference, alt })
    }
}

impl Substitution {
    /// Returns a copy of this [`Substitution`] with the coordinate moved by `offset`.
    ///
    /// The residues are never altered. Moving the coordinate below 1 is an error.
    ///
    /// ## Examples
    ///
    /// ```rust
    /// use reannotate_tree::Substitution;
    ///
    /// let sub: Substitution = "P314L".parse()?;
    /// assert_eq!(sub.shift(4401)?.to_string(), "P4715L");
    /// assert_eq!(sub.shift(-313)?.to_string(), "P1L");
    /// assert!(sub.shift(-314).is_err());
    /// # Ok::<(), color_eyre::eyre::Report>(())
    /// ```
    pub fn shift(&self, offset: isize) -> Result<Substitution, Report> {
        let coord = self
            .coord
            .checked_add_signed(offset)
            .filter(|coord| *coord > 0)
            .ok_or_else(|| eyre!("Shifting {self} by {offset} moves it outside of the gene."))?;

        Ok(Substitution { coord, ..*self })
    }
}

#[cfg(test)]
mod tests;
