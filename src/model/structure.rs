use std::borrow::Cow;

use super::atom::Atom;
use super::residue::Residue;
use super::terms::{Angle, AngleType, Bond, BondType, Dihedral, DihedralType};

/// Charge magnitude injected into the first two atoms of an exactly
/// neutral system so the reciprocal-space solver does not hit a
/// singular charge distribution.
pub const EWALD_GUARD_CHARGE: f64 = 1e-8;

/// Crystallographic cell: edge lengths in Angstrom, angles in degrees.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cell {
    pub a: f64,
    pub b: f64,
    pub c: f64,
    pub alpha: f64,
    pub beta: f64,
    pub gamma: f64,
}

impl Cell {
    pub fn new(a: f64, b: f64, c: f64, alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            a,
            b,
            c,
            alpha,
            beta,
            gamma,
        }
    }

    pub fn cubic(edge: f64) -> Self {
        Self::new(edge, edge, edge, 90.0, 90.0, 90.0)
    }
}

/// A fully parameterized molecular structure, treated as read-only for
/// the duration of serialization. Construction of the bonded graph and
/// its force-field parameters happens upstream.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    pub title: String,
    pub atoms: Vec<Atom>,
    pub residues: Vec<Residue>,
    pub bonds: Vec<Bond>,
    pub angles: Vec<Angle>,
    pub dihedrals: Vec<Dihedral>,
    pub bond_types: Vec<BondType>,
    pub angle_types: Vec<AngleType>,
    pub dihedral_types: Vec<DihedralType>,
    pub cell: Option<Cell>,
}

impl Structure {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.cell.is_some()
    }

    pub fn bond_type(&self, bond: &Bond) -> &BondType {
        &self.bond_types[bond.type_idx]
    }

    pub fn angle_type(&self, angle: &Angle) -> &AngleType {
        &self.angle_types[angle.type_idx]
    }

    pub fn dihedral_type(&self, dihedral: &Dihedral) -> &DihedralType {
        &self.dihedral_types[dihedral.type_idx]
    }

    pub fn net_charge(&self) -> f64 {
        self.atoms.iter().map(|a| a.charge).sum()
    }

    /// Returns a copy with the first two atom charges nudged by
    /// +/- [`EWALD_GUARD_CHARGE`] when the net charge is exactly zero,
    /// and the structure unchanged otherwise. An exactly neutral charge
    /// set makes the reciprocal-space sum singular, so the guard is a
    /// documented side effect of serialization, isolated here instead
    /// of mutating the input mid-emission.
    pub fn ewald_guarded(&self) -> Cow<'_, Structure> {
        let all_zero = self.atoms.iter().all(|a| a.charge == 0.0);
        if !all_zero || self.atoms.is_empty() {
            return Cow::Borrowed(self);
        }
        let mut guarded = self.clone();
        guarded.atoms[0].charge = EWALD_GUARD_CHARGE;
        if guarded.atoms.len() > 1 {
            guarded.atoms[1].charge = -EWALD_GUARD_CHARGE;
        }
        Cow::Owned(guarded)
    }

    /// Measured bond length, Angstrom.
    pub fn bond_length(&self, bond: &Bond) -> f64 {
        let [i, j] = bond.atoms;
        norm(sub(self.atoms[j].position, self.atoms[i].position))
    }

    /// Measured angle, degrees.
    pub fn angle_deg(&self, angle: &Angle) -> f64 {
        let [i, j, k] = angle.atoms;
        let v1 = sub(self.atoms[i].position, self.atoms[j].position);
        let v2 = sub(self.atoms[k].position, self.atoms[j].position);
        let cos = dot(v1, v2) / (norm(v1) * norm(v2));
        cos.clamp(-1.0, 1.0).acos().to_degrees()
    }

    /// Measured torsion angle, degrees in (-180, 180].
    pub fn dihedral_deg(&self, dihedral: &Dihedral) -> f64 {
        let [i, j, k, l] = dihedral.atoms;
        let b1 = sub(self.atoms[j].position, self.atoms[i].position);
        let b2 = sub(self.atoms[k].position, self.atoms[j].position);
        let b3 = sub(self.atoms[l].position, self.atoms[k].position);
        let n1 = cross(b1, b2);
        let n2 = cross(b2, b3);
        let m = cross(n1, normalize(b2));
        let x = dot(n1, n2);
        let y = dot(m, n2);
        y.atan2(x).to_degrees()
    }

    /// Harmonic bond energy at the measured geometry, kcal/mol.
    pub fn bond_energy(&self, bond: &Bond) -> f64 {
        let t = self.bond_type(bond);
        let d = self.bond_length(bond);
        t.k * (d - t.req).powi(2)
    }

    /// Harmonic angle energy at the measured geometry, kcal/mol.
    pub fn angle_energy(&self, angle: &Angle) -> f64 {
        let t = self.angle_type(angle);
        let dtheta = (self.angle_deg(angle) - t.theteq).to_radians();
        t.k * dtheta.powi(2)
    }

    /// Periodic torsion energy at the measured geometry, kcal/mol.
    pub fn dihedral_energy(&self, dihedral: &Dihedral) -> f64 {
        let t = self.dihedral_type(dihedral);
        let phi = self.dihedral_deg(dihedral).to_radians();
        t.phi_k * (1.0 + (t.periodicity as f64 * phi - t.phase.to_radians()).cos())
    }
}

fn sub(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

fn dot(a: [f64; 3], b: [f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: [f64; 3], b: [f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

fn norm(a: [f64; 3]) -> f64 {
    dot(a, a).sqrt()
}

fn normalize(a: [f64; 3]) -> [f64; 3] {
    let n = norm(a);
    [a[0] / n, a[1] / n, a[2] / n]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn atom(name: &str, charge: f64, position: [f64; 3]) -> Atom {
        Atom {
            name: name.into(),
            type_label: name.to_lowercase(),
            element: "C".into(),
            charge,
            mass: 12.011,
            epsilon: 0.1,
            rmin: 1.9,
            position,
            residue: 0,
        }
    }

    #[test]
    fn guard_nudges_exactly_neutral_system() {
        let mut s = Structure::new();
        s.atoms.push(atom("C1", 0.0, [0.0; 3]));
        s.atoms.push(atom("C2", 0.0, [1.5, 0.0, 0.0]));
        s.residues.push(Residue::new("UNL", 0..2));

        let guarded = s.ewald_guarded();
        assert_eq!(guarded.atoms[0].charge, EWALD_GUARD_CHARGE);
        assert_eq!(guarded.atoms[1].charge, -EWALD_GUARD_CHARGE);
        // Input untouched.
        assert_eq!(s.atoms[0].charge, 0.0);
    }

    #[test]
    fn guard_leaves_charged_system_alone() {
        let mut s = Structure::new();
        s.atoms.push(atom("C1", 0.2, [0.0; 3]));
        s.atoms.push(atom("C2", -0.2, [1.5, 0.0, 0.0]));

        // Net zero, but not all atom charges are zero: no nudge.
        assert!(matches!(s.ewald_guarded(), Cow::Borrowed(_)));
    }

    #[test]
    fn guard_single_atom_gets_only_positive_nudge() {
        let mut s = Structure::new();
        s.atoms.push(atom("C1", 0.0, [0.0; 3]));
        let guarded = s.ewald_guarded();
        assert_eq!(guarded.atoms[0].charge, EWALD_GUARD_CHARGE);
    }

    #[test]
    fn measures_right_angle_and_trans_dihedral() {
        let mut s = Structure::new();
        s.atoms.push(atom("C1", 0.0, [0.0, 1.0, 0.0]));
        s.atoms.push(atom("C2", 0.0, [0.0, 0.0, 0.0]));
        s.atoms.push(atom("C3", 0.0, [1.5, 0.0, 0.0]));
        s.atoms.push(atom("C4", 0.0, [1.5, -1.0, 0.0]));
        s.bond_types.push(BondType {
            k: 300.0,
            req: 1.5,
            idx: 0,
        });
        s.angle_types.push(AngleType {
            k: 50.0,
            theteq: 90.0,
            idx: 0,
        });
        s.bonds.push(Bond {
            atoms: [1, 2],
            type_idx: 0,
            order: 1.0,
        });
        s.angles.push(Angle {
            atoms: [0, 1, 2],
            type_idx: 0,
        });
        s.dihedrals.push(Dihedral {
            atoms: [0, 1, 2, 3],
            type_idx: 0,
        });
        s.dihedral_types.push(DihedralType {
            phi_k: 2.0,
            periodicity: 2,
            phase: 180.0,
            idx: 0,
            improper: false,
        });

        assert_relative_eq!(s.bond_length(&s.bonds[0]), 1.5, epsilon = 1e-12);
        assert_relative_eq!(s.angle_deg(&s.angles[0]), 90.0, epsilon = 1e-9);
        assert_relative_eq!(
            s.dihedral_deg(&s.dihedrals[0]).abs(),
            180.0,
            epsilon = 1e-9
        );
        // At the equilibrium geometry the bond stores no energy.
        assert_relative_eq!(s.bond_energy(&s.bonds[0]), 0.0, epsilon = 1e-12);
    }
}
