use std::io::Write;

use crate::io::error::Error;
use crate::io::{LammpsConfig, PairStyle};
use crate::model::structure::Structure;
use crate::table::types::qualified_atom_types;

/// Writes the input script driving a data file produced by
/// [`super::data::write`]. Placeholders in the head/tail templates are
/// filled from the config; style lines for empty term classes are
/// commented out rather than removed so the script stays recognizable.
pub fn write<W: Write>(
    mut writer: W,
    structure: &Structure,
    config: &LammpsConfig,
    data_file: &str,
) -> Result<(), Error> {
    let mut buf: Vec<u8> = Vec::new();
    if structure.title.is_empty() {
        writeln!(buf, "# generated by xtal-forge")?;
    } else {
        writeln!(buf, "#smiles: {}", structure.title)?;
    }

    let mut pbc_flags = String::new();
    for periodic in config.pbc {
        pbc_flags.push_str(if periodic { "p " } else { "f " });
    }
    let slab = config.pbc.iter().any(|&p| !p);

    let mut head = format!(
        "\nunits real\natom_style full\n\ndimension 3\nboundary {pbc}#p p m\n\n\
         bond_style hybrid harmonic\nangle_style hybrid harmonic\n\
         dihedral_style hybrid charmm\n\
         special_bonds amber lj 0.0 0.0 0.50000 coul 0.0 0.0 0.83333 angle yes dihedral no\n\
         box tilt large\n\nread_data {data}\n\n\
         neighbor {skin} multi\nneigh_modify every 2 delay 4 check yes\n\n\
         {pair}\npair_modify mix arithmetic shift no tail yes\n\n",
        pbc = pbc_flags,
        data = data_file,
        skin = config.cutoffs.skin,
        pair = pair_style_command(config),
    );
    if structure.bonds.is_empty() {
        head = head.replace("bond_style ", "#bond_style ");
    }
    if structure.angles.is_empty() {
        head = head.replace("angle_style ", "#angle_style ");
    }
    if structure.dihedrals.is_empty() {
        head = head.replace("dihedral_style ", "#dihedral_style ");
    }
    buf.write_all(head.as_bytes())?;
    if slab {
        writeln!(buf, "kspace_modify slab 3.0")?;
    }

    let types = qualified_atom_types(structure);
    for (id, _key, info) in types.iter() {
        writeln!(
            buf,
            "pair_coeff {0} {0} {1:>11.7} {2:>11.7}",
            id,
            info.epsilon,
            info.sigma(),
        )?;
    }

    let elements = types
        .iter()
        .map(|(_, _, info)| info.element.as_str())
        .collect::<Vec<_>>()
        .join(" ");
    write!(
        buf,
        "\nthermo_style custom step temp vol press etotal pe ke epair ecoul elong evdwl \
         ebond eangle edihed eimp emol etail\nthermo_modify lost ignore flush yes\n\n\
         #compute peatom all pe/atom\n\
         #dump 1 all custom 1 dump.lammpstrj id type q x y z fx fy fz c_peatom element\n\
         #dump_modify 1 sort id pad 9 element {eles}\n\n\
         fix ensemble all nve\n\
         variable pxx equal pxx\nvariable pyy equal pyy\nvariable pzz equal pzz\n\
         variable pyz equal pyz\nvariable pxz equal pxz\nvariable pxy equal pxy\n\
         variable fx atom fx\nvariable fy atom fy\nvariable fz atom fz\n\
         kspace_style pppm {tol}\n\
         kspace_modify gewald {gewald} mesh {fx} {fy} {fz} order 6\n",
        eles = elements,
        tol = config.ewald.tolerance,
        gewald = config.ewald.gewald,
        fx = config.ewald.mesh[0],
        fy = config.ewald.mesh[1],
        fz = config.ewald.mesh[2],
    )?;

    writer.write_all(&buf)?;
    Ok(())
}

fn pair_style_command(config: &LammpsConfig) -> String {
    match config.pair_style {
        PairStyle::CharmmFsw => format!(
            "pair_style lj/charmmfsw/coul/long {} {} {}",
            config.cutoffs.lj_inner, config.cutoffs.lj_outer, config.cutoffs.coul
        ),
        PairStyle::LjCutCoulLong => format!(
            "pair_style lj/cut/coul/long {} {}",
            config.cutoffs.lj_outer, config.cutoffs.coul
        ),
    }
}
