//! CHARMM writers: residue topology, parameter file, and control script.

use std::fs;
use std::path::Path;

use crate::io::diag::Report;
use crate::io::error::Error;
use crate::io::{CharmmConfig, Format};
use crate::model::structure::Structure;

pub mod inp;
pub mod prm;
pub mod rtf;

/// Renders the topology, parameter and control files for `base` and
/// writes `base.rtf`, `base.prm` and `base.inp` next to each other. All
/// three are rendered in memory before anything touches the filesystem.
pub fn write_files(
    structure: &Structure,
    config: &CharmmConfig,
    base: &Path,
) -> Result<Report, Error> {
    let stem = base
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Conversion(format!("bad output base path: {}", base.display())))?;

    let mut report = Report::new();
    let mut rtf_buf = Vec::new();
    rtf::write(&mut rtf_buf, structure)?;

    let mut prm_buf = Vec::new();
    prm::write(&mut prm_buf, structure, config, &mut report)?;

    let mut inp_buf = Vec::new();
    inp::write(&mut inp_buf, structure, config, stem)?;

    for (format, ext, buf) in [
        (Format::CharmmRtf, "rtf", rtf_buf),
        (Format::CharmmPrm, "prm", prm_buf),
        (Format::CharmmInp, "inp", inp_buf),
    ] {
        let path = base.with_extension(ext);
        fs::write(&path, buf)?;
        log::info!("wrote {} to {}", format, path.display());
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::residue::Residue;
    use crate::model::terms::{Bond, BondType};

    fn methane_pair() -> Structure {
        let mut s = Structure::new();
        s.atoms.push(Atom {
            name: "C1".into(),
            type_label: "c3".into(),
            element: "C".into(),
            charge: -0.4,
            mass: 12.011,
            epsilon: 0.1094,
            rmin: 1.908,
            position: [0.0; 3],
            residue: 0,
        });
        s.atoms.push(Atom {
            name: "H1".into(),
            type_label: "hc".into(),
            element: "H".into(),
            charge: 0.4,
            mass: 1.008,
            epsilon: 0.0157,
            rmin: 1.487,
            position: [1.09, 0.0, 0.0],
            residue: 0,
        });
        s.residues.push(Residue::new("MET", 0..2));
        s.bond_types.push(BondType {
            k: 330.6,
            req: 1.097,
            idx: 0,
        });
        s.bonds.push(Bond {
            atoms: [0, 1],
            type_idx: 0,
            order: 1.0,
        });
        s
    }

    #[test]
    fn writes_all_three_files_with_cross_references() {
        let s = methane_pair();
        let dir = tempfile::tempdir().expect("tempdir");
        let base = dir.path().join("charmm");
        let report =
            write_files(&s, &CharmmConfig::default(), &base).expect("write charmm files");
        assert!(report.is_clean());

        let rtf = fs::read_to_string(base.with_extension("rtf")).unwrap();
        let prm = fs::read_to_string(base.with_extension("prm")).unwrap();
        let inp = fs::read_to_string(base.with_extension("inp")).unwrap();
        assert!(rtf.contains("RESI MET"));
        assert!(prm.contains("BOND"));
        assert!(prm.contains("c3 hc"));
        assert!(inp.contains("Read rtf card name charmm.rtf"));
        assert!(inp.contains("Read param card name charmm.prm"));
    }
}
