use std::io::Write;

use crate::io::error::Error;
use crate::io::CharmmConfig;
use crate::model::structure::Structure;
use crate::table::cell::{TriclinicBounds, DEFAULT_CELL_EDGE};

/// Writes the control script for a single-point energy evaluation. With
/// a cell the coordinates go out fractional and are converted back by
/// the engine; without one they stay Cartesian inside a large cubic
/// image box.
pub fn write<W: Write>(
    mut writer: W,
    structure: &Structure,
    config: &CharmmConfig,
    base: &str,
) -> Result<(), Error> {
    let mut crd: Vec<u8> = Vec::new();
    writeln!(crd, "{}", structure.atoms.len())?;

    let (shape, cry) = match &structure.cell {
        Some(cell) => {
            let bounds = TriclinicBounds::from_cell(cell, [0.0; 3])?;
            for (i, atom) in structure.atoms.iter().enumerate() {
                let frac = bounds.fractional(atom.position);
                writeln!(
                    crd,
                    "{:>5} {:>5} {:<5} {:<5} {:>9.5} {:>9.5} {:>9.5}",
                    i + 1,
                    atom.residue + 1,
                    structure.residues[atom.residue].name,
                    atom.name,
                    frac[0],
                    frac[1],
                    frac[2]
                )?;
            }
            let cry = format!(
                "{} {} {} {} {} {}",
                cell.a, cell.b, cell.c, cell.alpha, cell.beta, cell.gamma
            );
            crd.extend_from_slice(format!("coor conv FRAC SYMM {cry}\n").as_bytes());
            ("triclinic", cry)
        }
        None => {
            for (i, atom) in structure.atoms.iter().enumerate() {
                writeln!(
                    crd,
                    "{:>5} {:>5} {:<5} {:<5} {:>9.5} {:>9.5} {:>9.5}",
                    i + 1,
                    atom.residue + 1,
                    structure.residues[atom.residue].name,
                    atom.name,
                    atom.position[0],
                    atom.position[1],
                    atom.position[2]
                )?;
            }
            let e = DEFAULT_CELL_EDGE;
            ("cubic", format!("{e} {e} {e} 90 90 90"))
        }
    };

    let mut res: Vec<u8> = Vec::new();
    writeln!(res, "{}", structure.residues.len())?;
    for residue in &structure.residues {
        writeln!(res, "{}", residue.name)?;
    }

    let crd = String::from_utf8(crd).map_err(|e| Error::Conversion(e.to_string()))?;
    let res = String::from_utf8(res).map_err(|e| Error::Conversion(e.to_string()))?;
    let [fftx, ffty, fftz] = config.ewald.mesh;

    let mut buf: Vec<u8> = Vec::new();
    write!(
        buf,
        "\n\
         ! Automated Charmm calculation\n\
         \n\
         bomlev -1\n\
         Read rtf card name {base}.rtf\n\
         Read param card name {base}.prm\n\
         \n\
         Read sequence card\n\
         * Reading the coordinates of residue\n\
         *\n\
         {res}\
         Generate main first none last none setup warn\n\
         Read coor card free\n\
         * Residues coordinate\n\
         *\n\
         {crd}\
         coor stat select all end\n\
         crys defi {shape} {cry}\n\
         crys build cutoff {cutoff}\n\
         ! image byres xcen ?xave ycen ?yave zcen ?zave sele resn UNK end\n\
         \n\
         Update inbfreq 10 imgfreq 10 ihbfreq 10 -\n\
         ewald pmewald -\n\
         lrc fftx {fftx} ffty {ffty} fftz {fftz} -\n\
         kappa {gewald} order 6 qcor 1.0 -\n\
         fswitch atom vatom vfswitch !\n\
         Energy ihbfrq 0 inbfq -1\n\
         Open write card unit 14 name tmp.out\n\
         Write energy card unit 14\n\
         * UNL energy before optimization\n\
         *\n\
         Energy\n\
         Write energy card unit 14\n\
         * UNL energy after optimization\n\
         *\n\
         Write coor pdb name tmp.pdb\n\
         * CELL :  ?xtla  ?xtlb  ?xtlc ?xtlalpha ?xtlbeta ?xtlgamma\n\
         * Energy(kcal): ?ener\n\
         *\n\
         \n",
        cutoff = config.cutoffs.coul,
        gewald = config.ewald.gewald,
    )?;

    writer.write_all(&buf)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::residue::Residue;
    use crate::model::structure::Cell;

    fn water(cell: Option<Cell>) -> Structure {
        let mut s = Structure::new();
        let layout = [
            ("OW", "ow", [5.0, 5.0, 5.0]),
            ("HW1", "hw", [5.96, 5.0, 5.0]),
            ("HW2", "hw", [4.76, 5.93, 5.0]),
        ];
        for (name, label, position) in layout {
            s.atoms.push(Atom {
                name: name.into(),
                type_label: label.into(),
                element: name[..1].into(),
                charge: 0.0,
                mass: 1.0,
                epsilon: 0.1,
                rmin: 1.0,
                position,
                residue: 0,
            });
        }
        s.residues.push(Residue::new("WAT", 0..3));
        s.cell = cell;
        s
    }

    #[test]
    fn periodic_structure_uses_fractional_coordinates() {
        let s = water(Some(Cell::cubic(10.0)));
        let mut buf = Vec::new();
        write(&mut buf, &s, &CharmmConfig::default(), "charmm").expect("write inp");
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("coor conv FRAC SYMM 10 10 10 90 90 90"));
        assert!(out.contains("crys defi triclinic 10 10 10 90 90 90"));
        let ow = out
            .lines()
            .find(|l| l.contains("WAT   OW"))
            .expect("OW coordinate line");
        let x: f64 = ow.split_whitespace().nth(4).unwrap().parse().unwrap();
        assert!((x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn free_structure_falls_back_to_large_cubic_image() {
        let s = water(None);
        let mut buf = Vec::new();
        write(&mut buf, &s, &CharmmConfig::default(), "charmm").expect("write inp");
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("crys defi cubic 500 500 500 90 90 90"));
        assert!(!out.contains("coor conv"));
        let ow = out.lines().find(|l| l.contains("WAT   OW")).unwrap();
        let x: f64 = ow.split_whitespace().nth(4).unwrap().parse().unwrap();
        assert!((x - 5.0).abs() < 1e-6);
    }

    #[test]
    fn script_references_sibling_topology_and_parameters() {
        let s = water(None);
        let mut buf = Vec::new();
        write(&mut buf, &s, &CharmmConfig::default(), "mol").expect("write inp");
        let out = String::from_utf8(buf).unwrap();
        assert!(out.contains("Read rtf card name mol.rtf"));
        assert!(out.contains("Read param card name mol.prm"));
        assert!(out.contains("crys build cutoff 12"));
        assert!(out.contains("fftx 24 ffty 24 fftz 24"));
        assert!(out.contains("kappa 0.35 order 6"));
    }

    #[test]
    fn sequence_block_lists_every_residue() {
        let mut s = water(None);
        let mut second = water(None);
        for atom in &mut second.atoms {
            atom.residue = 1;
        }
        s.atoms.append(&mut second.atoms);
        s.residues.push(Residue::new("WAT", 3..6));
        let mut buf = Vec::new();
        write(&mut buf, &s, &CharmmConfig::default(), "charmm").expect("write inp");
        let out = String::from_utf8(buf).unwrap();
        let header_idx = out.find("Read sequence card").unwrap();
        let tail = &out[header_idx..];
        assert!(tail.contains("*\n2\nWAT\nWAT\n"));
    }
}
