//! LAMMPS writers: data file, input script, and molecule templates.

use std::fs;
use std::path::Path;

use crate::io::diag::Report;
use crate::io::error::Error;
use crate::io::LammpsConfig;
use crate::model::structure::Structure;

pub mod connect;
pub mod data;
pub mod input;
pub mod molecule;

pub use connect::Connectivity;

/// Renders the input script and data file and writes both paths. Each
/// file is rendered fully in memory before anything touches the
/// filesystem, so a failure leaves no partial output.
pub fn write_files(
    structure: &Structure,
    config: &LammpsConfig,
    input_path: &Path,
    data_path: &Path,
) -> Result<Report, Error> {
    let data_name = data_path
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| Error::Conversion(format!("bad data file path: {}", data_path.display())))?;

    let mut input_buf = Vec::new();
    input::write(&mut input_buf, structure, config, data_name)?;

    let mut data_buf = Vec::new();
    let report = data::write(&mut data_buf, structure, config)?;

    fs::write(input_path, input_buf)?;
    log::info!("wrote {} to {}", crate::io::Format::LammpsInput, input_path.display());
    fs::write(data_path, data_buf)?;
    log::info!("wrote {} to {}", crate::io::Format::LammpsData, data_path.display());
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::residue::Residue;
    use crate::model::structure::Cell;

    #[test]
    fn writes_both_files_and_references_data_by_name() {
        let mut s = Structure::new();
        s.atoms.push(Atom {
            name: "AR".into(),
            type_label: "ar".into(),
            element: "Ar".into(),
            charge: 0.0,
            mass: 39.948,
            epsilon: 0.2339,
            rmin: 1.91,
            position: [1.0, 2.0, 3.0],
            residue: 0,
        });
        s.residues.push(Residue::new("ARG", 0..1));
        s.cell = Some(Cell::cubic(25.0));

        let dir = tempfile::tempdir().expect("tempdir");
        let input_path = dir.path().join("lmp.in");
        let data_path = dir.path().join("lmp.dat");
        write_files(&s, &LammpsConfig::default(), &input_path, &data_path).expect("write files");

        let input = fs::read_to_string(&input_path).unwrap();
        let data = fs::read_to_string(&data_path).unwrap();
        assert!(input.contains("read_data lmp.dat"));
        assert!(data.contains("1 atoms"));
        assert!(data.contains("1 atom types"));
    }

    #[test]
    fn degenerate_cell_writes_nothing() {
        let mut s = Structure::new();
        s.atoms.push(Atom {
            name: "AR".into(),
            type_label: "ar".into(),
            element: "Ar".into(),
            charge: 0.0,
            mass: 39.948,
            epsilon: 0.2339,
            rmin: 1.91,
            position: [0.0; 3],
            residue: 0,
        });
        s.residues.push(Residue::new("ARG", 0..1));
        s.cell = Some(Cell::new(1.0, 1.0, 1.0, 30.0, 30.0, 150.0));

        let dir = tempfile::tempdir().expect("tempdir");
        let input_path = dir.path().join("lmp.in");
        let data_path = dir.path().join("lmp.dat");
        let err = write_files(&s, &LammpsConfig::default(), &input_path, &data_path);
        assert!(err.is_err());
        assert!(!data_path.exists(), "no partial data file on error");
        assert!(!input_path.exists(), "no partial input file on error");
    }
}
