use std::io::Write;

use crate::io::diag::Report;
use crate::io::error::Error;
use crate::model::structure::Structure;
use crate::table::residue::UniqueResidues;
use crate::table::types::{plain_atom_types, qualified_atom_types};

use super::connect;

/// Writes a reusable molecule template for one residue of `fragment`.
///
/// When `master` is given the Types section and the bonded-term type
/// ids are expressed in the master structure's tables, so the engine
/// can instantiate the template against the master's coefficient
/// sections; otherwise the fragment's own tables are used. Counts go in
/// the header, so the body is buffered first.
pub fn write<W: Write>(
    mut writer: W,
    fragment: &Structure,
    master: Option<&Structure>,
) -> Result<Report, Error> {
    let mut report = Report::new();
    let unique = UniqueResidues::detect(fragment);

    let template_atoms: Vec<usize> = (0..fragment.atoms.len())
        .filter(|&i| unique.is_representative(fragment.atoms[i].residue))
        .collect();

    let mut body: Vec<u8> = Vec::new();
    writeln!(body)?;
    writeln!(body, "Coords")?;
    writeln!(body)?;
    for (serial, &atom_idx) in template_atoms.iter().enumerate() {
        let p = fragment.atoms[atom_idx].position;
        writeln!(
            body,
            "{:>6} {:>11.7} {:>11.7} {:>11.7}",
            serial + 1,
            p[0],
            p[1],
            p[2]
        )?;
    }

    writeln!(body)?;
    writeln!(body, "Types")?;
    writeln!(body)?;
    match master {
        Some(master) => {
            let master_types = qualified_atom_types(master);
            for (serial, &atom_idx) in template_atoms.iter().enumerate() {
                let atom = &fragment.atoms[atom_idx];
                let key = format!(
                    "{}{}",
                    fragment.residues[atom.residue].name, atom.type_label
                );
                let tid = master_types.id(&key).ok_or_else(|| {
                    Error::Conversion(format!("atom type '{}' absent from master table", key))
                })?;
                writeln!(body, "{:>6} {:>6} #{}", serial + 1, tid, atom.type_label)?;
            }
        }
        None => {
            let types = plain_atom_types(fragment);
            for (serial, &atom_idx) in template_atoms.iter().enumerate() {
                let atom = &fragment.atoms[atom_idx];
                let tid = types.id(&atom.type_label).ok_or_else(|| {
                    Error::Conversion(format!("atom type '{}' missing", atom.type_label))
                })?;
                writeln!(body, "{:>6} {:>6} #{}", serial + 1, tid, atom.type_label)?;
            }
        }
    }

    writeln!(body)?;
    writeln!(body, "Charges")?;
    writeln!(body)?;
    for (serial, &atom_idx) in template_atoms.iter().enumerate() {
        writeln!(
            body,
            "{:>6} {:>11.7}",
            serial + 1,
            fragment.atoms[atom_idx].charge
        )?;
    }

    writeln!(body)?;
    writeln!(body, "Molecules")?;
    writeln!(body)?;
    for (serial, &atom_idx) in template_atoms.iter().enumerate() {
        writeln!(
            body,
            "{:>6} {:>6}",
            serial + 1,
            fragment.atoms[atom_idx].residue + 1
        )?;
    }
    writeln!(body)?;

    let connectivity = connect::serialize(fragment, Some(&unique), master, &mut report)?;
    body.write_all(connectivity.text.as_bytes())?;

    let mut buf: Vec<u8> = Vec::new();
    if fragment.title.is_empty() {
        writeln!(buf, "#generated by xtal-forge")?;
    } else {
        writeln!(buf, "#smiles: {}", fragment.title)?;
    }
    writeln!(buf, "{} atoms", template_atoms.len())?;
    writeln!(buf, "{} bonds", connectivity.bonds)?;
    writeln!(buf, "{} angles", connectivity.angles)?;
    writeln!(buf, "{} dihedrals", connectivity.dihedrals)?;
    writeln!(buf, "{} impropers", 0)?;
    buf.write_all(&body)?;

    writer.write_all(&buf)?;
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::residue::Residue;
    use crate::model::terms::{Bond, BondType};

    fn atom(type_label: &str, charge: f64, residue: usize) -> Atom {
        Atom {
            name: type_label.to_uppercase(),
            type_label: type_label.into(),
            element: "O".into(),
            charge,
            mass: 15.999,
            epsilon: 0.152,
            rmin: 1.7683,
            position: [0.0; 3],
            residue,
        }
    }

    fn water_fragment() -> Structure {
        let mut s = Structure::new();
        s.atoms.push(atom("ow", -0.834, 0));
        s.atoms.push(atom("hw", 0.417, 0));
        s.atoms.push(atom("hw", 0.417, 0));
        s.residues.push(Residue::new("WAT", 0..3));
        s.bond_types.push(BondType {
            k: 553.0,
            req: 0.9572,
            idx: 0,
        });
        s.bonds.push(Bond {
            atoms: [0, 1],
            type_idx: 0,
            order: 1.0,
        });
        s.bonds.push(Bond {
            atoms: [0, 2],
            type_idx: 0,
            order: 1.0,
        });
        s
    }

    /// Master whose qualified table lists a solute before the water, so
    /// WATow/WAThw land at ids 3 and 4.
    fn master_with_solute() -> Structure {
        let mut s = Structure::new();
        s.atoms.push(atom("c3", 0.1, 0));
        s.atoms.push(atom("hc", -0.1, 0));
        s.atoms.push(atom("ow", -0.834, 1));
        s.atoms.push(atom("hw", 0.417, 1));
        s.atoms.push(atom("hw", 0.417, 1));
        s.residues.push(Residue::new("UNL", 0..2));
        s.residues.push(Residue::new("WAT", 2..5));
        s.bond_types.push(BondType {
            k: 337.3,
            req: 1.092,
            idx: 0,
        });
        s.bond_types.push(BondType {
            k: 553.0,
            req: 0.9572,
            idx: 1,
        });
        s.bonds.push(Bond {
            atoms: [0, 1],
            type_idx: 0,
            order: 1.0,
        });
        s.bonds.push(Bond {
            atoms: [2, 3],
            type_idx: 1,
            order: 1.0,
        });
        s.bonds.push(Bond {
            atoms: [2, 4],
            type_idx: 1,
            order: 1.0,
        });
        s
    }

    #[test]
    fn header_counts_match_the_template_body() {
        let fragment = water_fragment();
        let mut buf = Vec::new();
        write(&mut buf, &fragment, None).expect("write molecule");
        let out = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "3 atoms");
        assert_eq!(lines[2], "2 bonds");
        assert_eq!(lines[3], "0 angles");
        assert_eq!(lines[5], "0 impropers");
        for section in ["Coords", "Types", "Charges", "Molecules", "Bonds"] {
            assert!(lines.contains(&section), "missing section {section}");
        }
    }

    #[test]
    fn master_table_supplies_type_ids() {
        let fragment = water_fragment();
        let master = master_with_solute();
        let mut buf = Vec::new();
        let report = write(&mut buf, &fragment, Some(&master)).expect("write molecule");
        assert!(report.is_clean());
        let out = String::from_utf8(buf).unwrap();
        let types_at = out.lines().position(|l| l == "Types").unwrap();
        let rows: Vec<Vec<&str>> = out
            .lines()
            .skip(types_at + 2)
            .take(3)
            .map(|l| l.split_whitespace().collect())
            .collect();
        assert_eq!(&rows[0][..2], &["1", "3"]);
        assert_eq!(&rows[1][..2], &["2", "4"]);
        assert_eq!(&rows[2][..2], &["3", "4"]);
        // Bond type ids come from the master too.
        let bonds_at = out.lines().position(|l| l == "Bonds").unwrap();
        let bond_row: Vec<&str> = out
            .lines()
            .nth(bonds_at + 2)
            .unwrap()
            .split_whitespace()
            .collect();
        assert_eq!(bond_row[1], "2");
    }
}
