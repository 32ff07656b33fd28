use std::io::Write;

use crate::io::diag::Report;
use crate::io::error::Error;
use crate::io::LammpsConfig;
use crate::model::structure::Structure;
use crate::model::terms::BondedTerm;
use crate::table::cell::TriclinicBounds;
use crate::table::types::{clip_tag, qualified_atom_types, term_tags, AtomTypeInfo, TypeTable};

use super::connect;

/// Writes a complete data file: header counts, box bounds, Masses and
/// Coeffs tables, Atoms, and connectivity sections. Everything is
/// rendered into a buffer first; the sink sees either the whole file or
/// nothing.
pub fn write<W: Write>(
    mut writer: W,
    structure: &Structure,
    config: &LammpsConfig,
) -> Result<Report, Error> {
    let mut report = Report::new();
    let guarded = structure.ewald_guarded();
    let structure = guarded.as_ref();
    let types = qualified_atom_types(structure);

    let mut buf: Vec<u8> = Vec::new();
    write_header(&mut buf, structure, types.len())?;
    write_box(&mut buf, structure, config)?;
    write_coeffs(&mut buf, structure, &types)?;
    write_atoms(&mut buf, structure, &types, config.velocities)?;
    let connectivity = connect::serialize(structure, None, None, &mut report)?;
    buf.write_all(connectivity.text.as_bytes())?;

    writer.write_all(&buf)?;
    Ok(report)
}

fn write_header<W: Write>(buf: &mut W, structure: &Structure, atom_types: usize) -> Result<(), Error> {
    if structure.title.is_empty() {
        writeln!(buf, "#generated by xtal-forge")?;
    } else {
        writeln!(buf, "#smiles: {}", structure.title)?;
    }
    writeln!(buf)?;
    writeln!(buf, "{} atoms", structure.atoms.len())?;
    writeln!(buf, "{} bonds", structure.bonds.len())?;
    writeln!(buf, "{} angles", structure.angles.len())?;
    writeln!(buf, "{} dihedrals", structure.dihedrals.len())?;
    writeln!(buf, "{} impropers", 0)?;
    writeln!(buf)?;
    writeln!(buf, "{} atom types", atom_types)?;
    writeln!(buf, "{} bond types", structure.bond_types.len())?;
    writeln!(buf, "{} angle types", structure.angle_types.len())?;
    writeln!(buf, "{} dihedral types", structure.dihedral_types.len())?;
    writeln!(buf)?;
    Ok(())
}

fn write_box<W: Write>(
    buf: &mut W,
    structure: &Structure,
    config: &LammpsConfig,
) -> Result<(), Error> {
    match structure.cell {
        Some(cell) => {
            let b = TriclinicBounds::from_cell(&cell, config.padding)?;
            writeln!(buf, "{:>9.4} {:>9.4} xlo xhi", b.xlo, b.xhi)?;
            writeln!(buf, "{:>9.4} {:>9.4} ylo yhi", b.ylo, b.yhi)?;
            writeln!(buf, "{:>9.4} {:>9.4} zlo zhi", b.zlo, b.zhi)?;
            if config.orthogonal {
                writeln!(buf, "#{:>9.4} {:>9.4} {:>9.4} xy xz yz", b.xy, b.xz, b.yz)?;
            } else {
                writeln!(buf, "{:>9.4} {:>9.4} {:>9.4} xy xz yz", b.xy, b.xz, b.yz)?;
            }
        }
        None => {
            let b = TriclinicBounds::large_default();
            writeln!(buf, "{:>9.4} {:>9.4} xlo xhi", b.xlo, b.xhi)?;
            writeln!(buf, "{:>9.4} {:>9.4} ylo yhi", b.ylo, b.yhi)?;
            writeln!(buf, "{:>9.4} {:>9.4} zlo zhi", b.zlo, b.zhi)?;
            writeln!(buf, "{:>9.4} {:>9.4} {:>9.4} xy xz yz", 0.0, 0.0, 0.0)?;
        }
    }
    writeln!(buf)?;
    Ok(())
}

fn write_coeffs<W: Write>(
    buf: &mut W,
    structure: &Structure,
    types: &TypeTable<AtomTypeInfo>,
) -> Result<(), Error> {
    writeln!(buf, "Masses")?;
    writeln!(buf)?;
    for (id, key, info) in types.iter() {
        writeln!(buf, "{} {:>11.7} #{}", id, info.mass, key)?;
    }
    writeln!(buf)?;

    if !structure.bond_types.is_empty() {
        writeln!(buf, "Bond Coeffs")?;
        writeln!(buf)?;
        let tags = term_tags(
            structure,
            structure.bonds.iter().map(BondedTerm::Bond),
            structure.bond_types.len(),
        );
        for t in &structure.bond_types {
            writeln!(
                buf,
                "{} harmonic {:>11.7} {:>11.7} #{}",
                t.idx + 1,
                t.k,
                t.req,
                clip_tag(&tags[t.idx]),
            )?;
        }
        writeln!(buf)?;
    }

    if !structure.angle_types.is_empty() {
        writeln!(buf, "Angle Coeffs")?;
        writeln!(buf)?;
        let tags = term_tags(
            structure,
            structure.angles.iter().map(BondedTerm::Angle),
            structure.angle_types.len(),
        );
        for t in &structure.angle_types {
            writeln!(
                buf,
                "{} harmonic {:>11.7} {:>11.7} #{}",
                t.idx + 1,
                t.k,
                t.theteq,
                clip_tag(&tags[t.idx]),
            )?;
        }
        writeln!(buf)?;
    }

    if !structure.dihedral_types.is_empty() {
        writeln!(buf, "Dihedral Coeffs")?;
        writeln!(buf)?;
        let tags = term_tags(
            structure,
            structure.dihedrals.iter().map(BondedTerm::Dihedral),
            structure.dihedral_types.len(),
        );
        for t in &structure.dihedral_types {
            writeln!(
                buf,
                "{} charmm {:.6} {} {} 0.0 #{}",
                t.idx + 1,
                t.phi_k,
                t.periodicity,
                t.phase as i64,
                clip_tag(&tags[t.idx]),
            )?;
        }
        writeln!(buf)?;
    }
    Ok(())
}

fn write_atoms<W: Write>(
    buf: &mut W,
    structure: &Structure,
    types: &TypeTable<AtomTypeInfo>,
    velocities: bool,
) -> Result<(), Error> {
    writeln!(buf, "Atoms")?;
    writeln!(buf)?;
    for (i, atom) in structure.atoms.iter().enumerate() {
        let key = format!("{}{}", structure.residues[atom.residue].name, atom.type_label);
        let tid = types
            .id(&key)
            .ok_or_else(|| Error::Conversion(format!("atom type '{}' missing from table", key)))?;
        writeln!(
            buf,
            "{:>6} {:>6} {:>6} {:>13.8} {:>11.7} {:>11.7} {:>11.7}",
            i + 1,
            atom.residue + 1,
            tid,
            atom.charge,
            atom.position[0],
            atom.position[1],
            atom.position[2],
        )?;
    }
    writeln!(buf)?;
    if velocities {
        writeln!(buf, "Velocities")?;
        writeln!(buf)?;
        for i in 0..structure.atoms.len() {
            writeln!(buf, "{:>6} {:>11.7} {:>11.7} {:>11.7}", i + 1, 0.0, 0.0, 0.0)?;
        }
        writeln!(buf)?;
    }
    Ok(())
}
