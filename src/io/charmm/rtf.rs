use std::io::Write;

use crate::io::error::Error;
use crate::io::lammps::connect::check_same_residue;
use crate::model::structure::Structure;
use crate::model::terms::TermKind;
use crate::table::residue::UniqueResidues;
use crate::table::types::plain_atom_types;

/// Writes the residue topology file: the MASS table over bare atom
/// types, then one RESI block per distinct residue name built from its
/// representative residue. Bonded-term lines carry the measured
/// geometry and energy as comments for human inspection.
pub fn write<W: Write>(mut writer: W, structure: &Structure) -> Result<(), Error> {
    let unique = UniqueResidues::detect(structure);
    let types = plain_atom_types(structure);

    let mut buf: Vec<u8> = Vec::new();
    writeln!(buf, "* Topology File.")?;
    writeln!(buf, "* ")?;
    writeln!(buf, "   99   1")?;

    for (id, key, info) in types.iter() {
        writeln!(buf, "MASS {:>5} {:<5} {:>10.6}", id, key, info.mass)?;
    }

    // One buffered section per residue name; atoms of every section are
    // written before any bond lines, matching the engine's reader.
    let mut sections: Vec<Vec<u8>> = Vec::with_capacity(unique.len());
    for (name, charge) in unique.names.iter().zip(&unique.charges) {
        let mut sio = Vec::new();
        writeln!(sio)?;
        writeln!(sio, "RESI {}  {:>8.6}", name, charge)?;
        writeln!(sio, "GROUP")?;
        sections.push(sio);
    }
    let section_of = |unique: &UniqueResidues, res_idx: usize| {
        let name = &structure.residues[res_idx].name;
        unique.names.iter().position(|n| n == name)
    };

    for (slot, &rep) in unique.representatives.iter().enumerate() {
        let sio = &mut sections[slot];
        for atom_idx in structure.residues[rep].atom_indices() {
            let atom = &structure.atoms[atom_idx];
            writeln!(
                sio,
                "ATOM {:<5} {:<5} {:>10.6}",
                atom.name, atom.type_label, atom.charge
            )?;
        }
        writeln!(sio)?;
    }

    for bond in &structure.bonds {
        check_same_residue(structure, TermKind::Bond, &bond.atoms)?;
        let res_idx = structure.atoms[bond.atoms[0]].residue;
        if !unique.is_representative(res_idx) {
            continue;
        }
        if let Some(slot) = section_of(&unique, res_idx) {
            let [i, j] = bond.atoms;
            writeln!(
                sections[slot],
                "BOND {:<5} {:<5}  ! d,E,order={:>6.4},{:>6.4},{:>3.1}",
                structure.atoms[i].name,
                structure.atoms[j].name,
                structure.bond_length(bond),
                structure.bond_energy(bond),
                bond.order,
            )?;
        }
    }
    for sio in &mut sections {
        writeln!(sio)?;
    }

    for angle in &structure.angles {
        check_same_residue(structure, TermKind::Angle, &angle.atoms)?;
        let res_idx = structure.atoms[angle.atoms[0]].residue;
        if !unique.is_representative(res_idx) {
            continue;
        }
        if let Some(slot) = section_of(&unique, res_idx) {
            let [i, j, k] = angle.atoms;
            writeln!(
                sections[slot],
                "ANGL {:<5} {:<5} {:<5}  ! ang,E={:>6.4},{:>6.4}",
                structure.atoms[i].name,
                structure.atoms[j].name,
                structure.atoms[k].name,
                structure.angle_deg(angle),
                structure.angle_energy(angle),
            )?;
        }
    }
    for sio in &mut sections {
        writeln!(sio)?;
    }

    // Consecutive entries over the same four atoms are periodicity
    // variants of one geometric dihedral; only the first is listed in
    // the topology, the rest live at the parameter level.
    let mut last_atoms: Option<[usize; 4]> = None;
    for dihedral in &structure.dihedrals {
        if let Some(last) = last_atoms {
            if same_atom_sequence(last, dihedral.atoms) {
                last_atoms = Some(dihedral.atoms);
                continue;
            }
        }
        last_atoms = Some(dihedral.atoms);
        check_same_residue(structure, TermKind::Dihedral, &dihedral.atoms)?;
        let res_idx = structure.atoms[dihedral.atoms[0]].residue;
        if !unique.is_representative(res_idx) {
            continue;
        }
        if let Some(slot) = section_of(&unique, res_idx) {
            let [i, j, k, l] = dihedral.atoms;
            let keyword = if structure.dihedral_type(dihedral).improper {
                "IMPH"
            } else {
                "DIHE"
            };
            writeln!(
                sections[slot],
                "{} {:<5} {:<5} {:<5} {:<5} ! dihe,E={:>6.4},{:>6.4}",
                keyword,
                structure.atoms[i].name,
                structure.atoms[j].name,
                structure.atoms[k].name,
                structure.atoms[l].name,
                structure.dihedral_deg(dihedral),
                structure.dihedral_energy(dihedral),
            )?;
        }
    }

    for sio in sections {
        buf.write_all(&sio)?;
        writeln!(buf)?;
    }
    writeln!(buf)?;

    writer.write_all(&buf)?;
    Ok(())
}

fn same_atom_sequence(a: [usize; 4], b: [usize; 4]) -> bool {
    a == b || a == [b[3], b[2], b[1], b[0]]
}
