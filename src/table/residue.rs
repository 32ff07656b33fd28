use crate::model::structure::Structure;

/// One representative residue per distinct residue name.
///
/// A residue name implies one topology: every residue sharing a name is
/// assumed to have identical atom ordering and bonded-term structure, so
/// parameter emission reads a single first-seen representative. Residues
/// that share a name but diverge in content are not validated here;
/// downstream serialization assertions catch the contradiction.
#[derive(Debug, Clone)]
pub struct UniqueResidues {
    /// Residue index of the representative, one per distinct name, in
    /// first-seen order.
    pub representatives: Vec<usize>,
    /// Distinct residue names, parallel to `representatives`.
    pub names: Vec<String>,
    /// Net charge of each representative, summed over its own atoms.
    pub charges: Vec<f64>,
    is_representative: Vec<bool>,
}

impl UniqueResidues {
    pub fn detect(structure: &Structure) -> Self {
        let mut representatives = Vec::new();
        let mut names: Vec<String> = Vec::new();
        let mut charges = Vec::new();
        let mut is_representative = vec![false; structure.residues.len()];

        for (res_idx, residue) in structure.residues.iter().enumerate() {
            if names.iter().any(|name| name == &residue.name) {
                continue;
            }
            names.push(residue.name.clone());
            representatives.push(res_idx);
            is_representative[res_idx] = true;
            charges.push(
                residue
                    .atom_indices()
                    .map(|atom_idx| structure.atoms[atom_idx].charge)
                    .sum(),
            );
        }

        Self {
            representatives,
            names,
            charges,
            is_representative,
        }
    }

    #[inline]
    pub fn is_representative(&self, res_idx: usize) -> bool {
        self.is_representative.get(res_idx).copied().unwrap_or(false)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::residue::Residue;

    fn atom(name: &str, charge: f64, residue: usize) -> Atom {
        Atom {
            name: name.into(),
            type_label: name.to_lowercase(),
            element: "O".into(),
            charge,
            mass: 15.999,
            epsilon: 0.152,
            rmin: 1.7683,
            position: [0.0; 3],
            residue,
        }
    }

    fn solvated() -> Structure {
        let mut s = Structure::new();
        s.atoms.push(atom("C1", 0.12, 0));
        s.atoms.push(atom("C2", -0.38, 0));
        s.atoms.push(atom("OW", -0.834, 1));
        s.atoms.push(atom("HW1", 0.417, 1));
        s.atoms.push(atom("HW2", 0.417, 1));
        s.atoms.push(atom("OW", -0.834, 2));
        s.atoms.push(atom("HW1", 0.417, 2));
        s.atoms.push(atom("HW2", 0.417, 2));
        s.residues.push(Residue::new("UNL", 0..2));
        s.residues.push(Residue::new("WAT", 2..5));
        s.residues.push(Residue::new("WAT", 5..8));
        s
    }

    #[test]
    fn picks_first_seen_representative_per_name() {
        let s = solvated();
        let unique = UniqueResidues::detect(&s);
        assert_eq!(unique.names, vec!["UNL".to_string(), "WAT".to_string()]);
        assert_eq!(unique.representatives, vec![0, 1]);
        assert!(unique.is_representative(0));
        assert!(unique.is_representative(1));
        assert!(!unique.is_representative(2));
    }

    #[test]
    fn representative_charge_sums_only_its_atoms() {
        let s = solvated();
        let unique = UniqueResidues::detect(&s);
        assert!((unique.charges[0] - (0.12 - 0.38)).abs() < 1e-6);
        assert!(unique.charges[1].abs() < 1e-6);
    }
}
