//! Bonds/Angles/Dihedrals section serializer shared by the data and
//! molecule writers.
//!
//! Template mode restricts emission to representative residues and
//! remaps each term's type id onto a master structure's table so a
//! fragment instantiated many times by the engine references the
//! master's coefficients. Reconciliation is a linear scan of the
//! master's term list per fragment term, O(fragment x master) per term
//! kind; fragments are single residues, so an indexed signature lookup
//! is not worth carrying until that stops being true.

use std::io::Write;

use crate::io::diag::{Diagnostic, Report};
use crate::io::error::Error;
use crate::model::structure::Structure;
use crate::model::terms::TermKind;
use crate::table::residue::UniqueResidues;

/// Rendered connectivity sections plus emitted-term counts. Counts are
/// needed before the body in molecule headers, hence the buffer.
#[derive(Debug, Clone)]
pub struct Connectivity {
    pub text: String,
    pub bonds: usize,
    pub angles: usize,
    pub dihedrals: usize,
}

/// Serializes bonded-term sections.
///
/// `restrict` limits emission to terms whose atoms lie in a
/// representative residue (template mode); `master` enables type-id
/// reconciliation against another structure's type table. An unmatched
/// fragment term keeps its local id and is reported, not failed: it
/// only occurs when the fragment introduces a term absent from the
/// master, which the caller must have anticipated.
pub fn serialize(
    structure: &Structure,
    restrict: Option<&UniqueResidues>,
    master: Option<&Structure>,
    report: &mut Report,
) -> Result<Connectivity, Error> {
    let mut buf: Vec<u8> = Vec::new();
    let included = |res_idx: usize| match restrict {
        Some(unique) => unique.is_representative(res_idx),
        None => true,
    };

    let mut bonds = 0usize;
    if !structure.bonds.is_empty() {
        writeln!(buf, "Bonds")?;
        writeln!(buf)?;
        for bond in &structure.bonds {
            check_same_residue(structure, TermKind::Bond, &bond.atoms)?;
            let residue = structure.atoms[bond.atoms[0]].residue;
            if !included(residue) {
                continue;
            }
            let mut tid = structure.bond_type(bond).idx + 1;
            if let Some(master) = master {
                match find_master_bond(structure, bond, master) {
                    Some(master_tid) => tid = master_tid,
                    None => report.push(Diagnostic::UnmatchedMasterType {
                        kind: TermKind::Bond,
                        atom_types: type_labels(structure, &bond.atoms),
                        local_id: tid,
                    }),
                }
            }
            let [i, j] = bond.atoms;
            writeln!(
                buf,
                "{:>6} {:>6} {:>6} {:>6} #{}:{}-{}",
                bonds + 1,
                tid,
                i + 1,
                j + 1,
                structure.residues[residue].name,
                structure.atoms[i].type_label,
                structure.atoms[j].type_label,
            )?;
            bonds += 1;
        }
        writeln!(buf)?;
    }

    let mut angles = 0usize;
    if !structure.angles.is_empty() {
        writeln!(buf, "Angles")?;
        writeln!(buf)?;
        for angle in &structure.angles {
            check_same_residue(structure, TermKind::Angle, &angle.atoms)?;
            let residue = structure.atoms[angle.atoms[0]].residue;
            if !included(residue) {
                continue;
            }
            let mut tid = structure.angle_type(angle).idx + 1;
            if let Some(master) = master {
                match find_master_angle(structure, angle, master) {
                    Some(master_tid) => tid = master_tid,
                    None => report.push(Diagnostic::UnmatchedMasterType {
                        kind: TermKind::Angle,
                        atom_types: type_labels(structure, &angle.atoms),
                        local_id: tid,
                    }),
                }
            }
            let [i, j, k] = angle.atoms;
            writeln!(
                buf,
                "{:>6} {:>6} {:>6} {:>6} {:>6} #{}:{}-{}-{}",
                angles + 1,
                tid,
                i + 1,
                j + 1,
                k + 1,
                structure.residues[residue].name,
                structure.atoms[i].type_label,
                structure.atoms[j].type_label,
                structure.atoms[k].type_label,
            )?;
            angles += 1;
        }
        writeln!(buf)?;
    }

    let mut dihedrals = 0usize;
    if !structure.dihedrals.is_empty() {
        writeln!(buf, "Dihedrals")?;
        writeln!(buf)?;
        for dihedral in &structure.dihedrals {
            check_same_residue(structure, TermKind::Dihedral, &dihedral.atoms)?;
            let residue = structure.atoms[dihedral.atoms[0]].residue;
            if !included(residue) {
                continue;
            }
            let mut tid = structure.dihedral_type(dihedral).idx + 1;
            if let Some(master) = master {
                match find_master_dihedral(structure, dihedral, master) {
                    Some(master_tid) => tid = master_tid,
                    None => report.push(Diagnostic::UnmatchedMasterType {
                        kind: TermKind::Dihedral,
                        atom_types: type_labels(structure, &dihedral.atoms),
                        local_id: tid,
                    }),
                }
            }
            let [i, j, k, l] = dihedral.atoms;
            writeln!(
                buf,
                "{:>6} {:>6} {:>6} {:>6} {:>6} {:>6} #{}:{}-{}-{}-{}",
                dihedrals + 1,
                tid,
                i + 1,
                j + 1,
                k + 1,
                l + 1,
                structure.residues[residue].name,
                structure.atoms[i].type_label,
                structure.atoms[j].type_label,
                structure.atoms[k].type_label,
                structure.atoms[l].type_label,
            )?;
            dihedrals += 1;
        }
    }

    let text = String::from_utf8(buf).map_err(|e| Error::Conversion(e.to_string()))?;
    Ok(Connectivity {
        text,
        bonds,
        angles,
        dihedrals,
    })
}

/// Order-sensitive master match for a bond: parameter-equal type and
/// identical atom-type labels in the same order. No reverse matching.
fn find_master_bond(
    structure: &Structure,
    bond: &crate::model::terms::Bond,
    master: &Structure,
) -> Option<usize> {
    let t = structure.bond_type(bond);
    let labels = type_labels(structure, &bond.atoms);
    master.bonds.iter().find_map(|mb| {
        let mt = master.bond_type(mb);
        (t.same_parameters(mt) && labels == type_labels(master, &mb.atoms)).then_some(mt.idx + 1)
    })
}

fn find_master_angle(
    structure: &Structure,
    angle: &crate::model::terms::Angle,
    master: &Structure,
) -> Option<usize> {
    let t = structure.angle_type(angle);
    let labels = type_labels(structure, &angle.atoms);
    master.angles.iter().find_map(|ma| {
        let mt = master.angle_type(ma);
        (t.same_parameters(mt) && labels == type_labels(master, &ma.atoms)).then_some(mt.idx + 1)
    })
}

fn find_master_dihedral(
    structure: &Structure,
    dihedral: &crate::model::terms::Dihedral,
    master: &Structure,
) -> Option<usize> {
    let t = structure.dihedral_type(dihedral);
    let labels = type_labels(structure, &dihedral.atoms);
    master.dihedrals.iter().find_map(|md| {
        let mt = master.dihedral_type(md);
        (t.same_parameters(mt) && labels == type_labels(master, &md.atoms)).then_some(mt.idx + 1)
    })
}

fn type_labels(structure: &Structure, atoms: &[usize]) -> Vec<String> {
    atoms
        .iter()
        .map(|&i| structure.atoms[i].type_label.clone())
        .collect()
}

pub(crate) fn check_same_residue(
    structure: &Structure,
    kind: TermKind,
    atoms: &[usize],
) -> Result<(), Error> {
    let first = structure.atoms[atoms[0]].residue;
    if atoms.iter().all(|&i| structure.atoms[i].residue == first) {
        return Ok(());
    }
    let names = atoms
        .iter()
        .map(|&i| structure.atoms[i].name.as_str())
        .collect::<Vec<_>>()
        .join("-");
    let residues = atoms
        .iter()
        .map(|&i| structure.atoms[i].residue.to_string())
        .collect::<Vec<_>>()
        .join(",");
    Err(Error::residue_consistency(kind, names, residues))
}
