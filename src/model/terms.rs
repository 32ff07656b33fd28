use std::fmt;

/// Harmonic bond stretching parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct BondType {
    /// Force constant, kcal/mol/A^2.
    pub k: f64,
    /// Equilibrium length, Angstrom.
    pub req: f64,
    /// Provisional 0-based type id; emitters print `idx + 1`.
    pub idx: usize,
}

/// Harmonic angle bending parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AngleType {
    /// Force constant, kcal/mol/rad^2.
    pub k: f64,
    /// Equilibrium angle, degrees.
    pub theteq: f64,
    pub idx: usize,
}

/// Periodic torsion parameters, shared by proper and improper terms.
#[derive(Debug, Clone, PartialEq)]
pub struct DihedralType {
    /// Barrier height, kcal/mol.
    pub phi_k: f64,
    pub periodicity: i32,
    /// Phase offset, degrees.
    pub phase: f64,
    pub idx: usize,
    /// Improper torsions are emitted to separate sections (IMPH/IMPHI)
    /// and never mix with proper dihedrals.
    pub improper: bool,
}

impl BondType {
    /// Parameter-level equality, ignoring the provisional `idx`. Used
    /// when reconciling a fragment's types against a master structure
    /// whose table numbers the same parameters differently.
    pub fn same_parameters(&self, other: &BondType) -> bool {
        self.k == other.k && self.req == other.req
    }
}

impl AngleType {
    pub fn same_parameters(&self, other: &AngleType) -> bool {
        self.k == other.k && self.theteq == other.theteq
    }
}

impl DihedralType {
    pub fn same_parameters(&self, other: &DihedralType) -> bool {
        self.phi_k == other.phi_k
            && self.periodicity == other.periodicity
            && self.phase == other.phase
            && self.improper == other.improper
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Bond {
    pub atoms: [usize; 2],
    pub type_idx: usize,
    /// Bond order, carried through to topology comments.
    pub order: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Angle {
    pub atoms: [usize; 3],
    pub type_idx: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Dihedral {
    pub atoms: [usize; 4],
    pub type_idx: usize,
}

/// Kind marker for bonded terms, used in diagnostics and errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TermKind {
    Bond,
    Angle,
    Dihedral,
}

impl fmt::Display for TermKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermKind::Bond => write!(f, "bond"),
            TermKind::Angle => write!(f, "angle"),
            TermKind::Dihedral => write!(f, "dihedral"),
        }
    }
}

/// Tagged view over any bonded term with an explicit arity, instead of
/// probing for an `atom3`/`atom4` member.
#[derive(Debug, Clone, Copy)]
pub enum BondedTerm<'a> {
    Bond(&'a Bond),
    Angle(&'a Angle),
    Dihedral(&'a Dihedral),
}

impl<'a> BondedTerm<'a> {
    pub fn kind(&self) -> TermKind {
        match self {
            BondedTerm::Bond(_) => TermKind::Bond,
            BondedTerm::Angle(_) => TermKind::Angle,
            BondedTerm::Dihedral(_) => TermKind::Dihedral,
        }
    }

    pub fn arity(&self) -> usize {
        self.atoms().len()
    }

    pub fn atoms(&self) -> &'a [usize] {
        match self {
            BondedTerm::Bond(b) => &b.atoms,
            BondedTerm::Angle(a) => &a.atoms,
            BondedTerm::Dihedral(d) => &d.atoms,
        }
    }

    pub fn type_idx(&self) -> usize {
        match self {
            BondedTerm::Bond(b) => b.type_idx,
            BondedTerm::Angle(a) => a.type_idx,
            BondedTerm::Dihedral(d) => d.type_idx,
        }
    }
}
