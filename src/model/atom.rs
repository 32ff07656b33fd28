#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// Atom name within its residue (e.g. "CA", "H12").
    pub name: String,
    /// Force-field atom type label (e.g. "c3", "hw").
    pub type_label: String,
    /// Element symbol, used for engine element lists.
    pub element: String,
    pub charge: f64,
    pub mass: f64,
    /// Lennard-Jones well depth, kcal/mol.
    pub epsilon: f64,
    /// Lennard-Jones Rmin/2, Angstrom (CHARMM convention).
    pub rmin: f64,
    pub position: [f64; 3],
    /// Index of the owning residue. Non-owning back-reference; the
    /// residue's atom range is authoritative.
    pub residue: usize,
}

impl Atom {
    /// Lennard-Jones sigma derived from Rmin/2: Rmin = 2^(1/6) * sigma.
    pub fn sigma(&self) -> f64 {
        2.0 * self.rmin / 2f64.powf(1.0 / 6.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn sigma_from_rmin_half() {
        let atom = Atom {
            name: "O".into(),
            type_label: "ow".into(),
            element: "O".into(),
            charge: -0.8,
            mass: 15.999,
            epsilon: 0.152,
            rmin: 1.7683,
            position: [0.0; 3],
            residue: 0,
        };
        // Rmin = 2 * 1.7683 must equal 2^(1/6) * sigma.
        assert_relative_eq!(
            atom.sigma() * 2f64.powf(1.0 / 6.0),
            2.0 * 1.7683,
            epsilon = 1e-12
        );
    }
}
