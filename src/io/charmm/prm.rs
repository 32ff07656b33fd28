use std::collections::HashSet;
use std::io::Write;

use crate::io::diag::{Diagnostic, Report};
use crate::io::error::Error;
use crate::io::CharmmConfig;
use crate::model::structure::Structure;
use crate::table::types::plain_atom_types;

/// An IMPHI block whose header line matches `pattern` (a wildcard slot
/// is `None`) is replaced wholesale by `replacement`. These blocks come
/// from force fields whose improper treatment the engine cannot read
/// back verbatim.
struct ImproperPatch {
    pattern: [Option<&'static str>; 4],
    name: &'static str,
    replacement: &'static str,
}

const IMPROPER_PATCHES: &[ImproperPatch] = &[
    ImproperPatch {
        pattern: [Some("X"), Some("X"), Some("c"), Some("o")],
        name: "X X c o",
        replacement: "\nX  X  c  o     1.100      2  180.00\n\
                      X  n  c  o    10.500      2  180.00\n\
                      X  o  c  o    10.500      2  180.00\n",
    },
    ImproperPatch {
        pattern: [None, Some("o"), Some("c"), Some("oh")],
        name: "* o c oh",
        replacement: "\nX  X  c  oh    1.100      2  180.00\n\
                      X  n  c  oh   10.500      2  180.00\n\
                      X  o  c  oh   10.500      2  180.00\n",
    },
];

/// Writes the parameter file: BOND, ANGLE, DIHEDRAL and IMPHI tables
/// keyed by atom-type label tuples in first-seen order, then the
/// NONBONDED table over bare atom types. Duplicate parameter lines are
/// dropped in a postprocess pass and reported through `report`.
pub fn write<W: Write>(
    mut writer: W,
    structure: &Structure,
    config: &CharmmConfig,
    report: &mut Report,
) -> Result<(), Error> {
    let mut buf: Vec<u8> = Vec::new();
    writeln!(
        buf,
        "*>>>> CHARMM Parameter file generated by xtal-forge "
    )?;
    writeln!(buf, "* ")?;
    writeln!(buf)?;

    writeln!(buf, "BOND")?;
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    for bond in &structure.bonds {
        let labels = labels_of(structure, &bond.atoms);
        if !seen.insert(labels.clone()) {
            continue;
        }
        let bt = structure.bond_type(bond);
        writeln!(
            buf,
            "{:<2} {:<2} {:>9.5} {:>9.5}",
            labels[0], labels[1], bt.k, bt.req
        )?;
    }
    writeln!(buf)?;

    writeln!(buf, "ANGLE")?;
    seen.clear();
    for angle in &structure.angles {
        let labels = labels_of(structure, &angle.atoms);
        if !seen.insert(labels.clone()) {
            continue;
        }
        let at = structure.angle_type(angle);
        writeln!(
            buf,
            "{:<2} {:<2} {:<2} {:>9.5}   {:>10.5}",
            labels[0], labels[1], labels[2], at.k, at.theteq
        )?;
    }
    writeln!(buf)?;

    // Proper and improper lines are gathered separately so the IMPHI
    // table lands after the DIHEDRAL one. For dihedrals the key carries
    // the periodicity because one tuple legitimately appears once per
    // Fourier component.
    let mut dihe: Vec<u8> = Vec::new();
    let mut imphi: Vec<u8> = Vec::new();
    let mut seen_dihe: HashSet<(Vec<String>, i32)> = HashSet::new();
    for dihedral in &structure.dihedrals {
        let labels = labels_of(structure, &dihedral.atoms);
        let dt = structure.dihedral_type(dihedral);
        if !seen_dihe.insert((labels.clone(), dt.periodicity)) {
            continue;
        }
        let target = if dt.improper { &mut imphi } else { &mut dihe };
        writeln!(
            target,
            "{:<2} {:<2} {:<2} {:<2} {:>9.6} {:>6} {:>7.3}",
            labels[0], labels[1], labels[2], labels[3], dt.phi_k, dt.periodicity, dt.phase
        )?;
    }
    writeln!(buf, "DIHEDRAL")?;
    buf.write_all(&dihe)?;
    writeln!(buf)?;
    writeln!(buf, "IMPHI")?;
    buf.write_all(&imphi)?;
    writeln!(buf)?;

    let cutoffs = &config.cutoffs;
    writeln!(
        buf,
        "NONBONDED  NBXMOD 5  ATOM CDIEL FSHIFT VATOM VDISTANCE VFSWITCH GROUP -\n\
         CUTNB {:.1}  CTOFNB {:.1}  CTONNB {:.1}  EPS 1.0  E14FAC 0.83333333  WMIN 1.5",
        cutoffs.lj_outer + cutoffs.skin,
        cutoffs.lj_outer,
        cutoffs.lj_inner
    )?;
    writeln!(buf, "!                Emin     Rmin/2              Emin/2     Rmin  (for 1-4's)")?;
    writeln!(buf, "!             (kcal/mol)    (A)")?;
    for (_, key, info) in plain_atom_types(structure).iter() {
        if info.rmin == 0.0 || info.epsilon == 0.0 {
            writeln!(
                buf,
                "{:<2} {:>9.3} {:>9.5} {:>9.5} {:>9.5} {:>9.5} {:>9.5}",
                key, 0.0, 0.0, 0.0, 0.0, 0.0, 0.0
            )?;
        } else {
            writeln!(
                buf,
                "{:<2} {:>9.3} {:>9.5} {:>9.5} {:>9.5} {:>9.5} {:>9.5}",
                key,
                0.0,
                -info.epsilon,
                info.rmin,
                0.0,
                accurate_round(-0.5 * info.epsilon, 5),
                info.rmin
            )?;
        }
    }
    writeln!(buf)?;
    writeln!(buf, "END")?;

    let text = String::from_utf8(buf).map_err(|e| Error::Conversion(e.to_string()))?;
    let text = postprocess(&text, report);
    writer.write_all(text.as_bytes())?;
    Ok(())
}

fn labels_of(structure: &Structure, atoms: &[usize]) -> Vec<String> {
    atoms
        .iter()
        .map(|&i| structure.atoms[i].type_label.clone())
        .collect()
}

/// Rounds half away from zero at `digits` decimal places. The default
/// nearest-even rounding shifts the last printed digit of some 1-4
/// scale factors relative to the tables the engine was validated
/// against.
fn accurate_round(value: f64, digits: u32) -> f64 {
    let factor = 10f64.powi(digits as i32);
    (value * factor).round() / factor
}

/// Removes duplicate parameter lines the section writers cannot see,
/// such as a bond tuple re-listed in reversed order, and expands
/// patched IMPHI blocks.
fn postprocess(text: &str, report: &mut Report) -> String {
    let mut out = String::with_capacity(text.len());
    let mut section = "";
    let mut seen: HashSet<Vec<String>> = HashSet::new();
    for line in text.lines() {
        let trimmed = line.trim();
        if matches!(trimmed, "BOND" | "ANGLE" | "DIHEDRAL" | "IMPHI" | "END")
            || trimmed.starts_with("NONBONDED")
        {
            section = match trimmed {
                "BOND" => "BOND",
                "ANGLE" => "ANGLE",
                "DIHEDRAL" => "DIHEDRAL",
                "IMPHI" => "IMPHI",
                _ => "",
            };
            seen.clear();
            out.push_str(line);
            out.push('\n');
            continue;
        }
        let arity = match section {
            "BOND" => 2,
            "ANGLE" => 3,
            "DIHEDRAL" | "IMPHI" => 4,
            _ => 0,
        };
        if arity == 0 || trimmed.is_empty() {
            out.push_str(line);
            out.push('\n');
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        if fields.len() < arity {
            out.push_str(line);
            out.push('\n');
            continue;
        }
        let labels: Vec<String> = fields[..arity].iter().map(|s| s.to_string()).collect();

        if section == "IMPHI" {
            if let Some(patch) = IMPROPER_PATCHES.iter().find(|p| matches_pattern(p, &labels)) {
                if seen.insert(vec![patch.name.to_string()]) {
                    report.push(Diagnostic::ImproperPatched {
                        pattern: patch.name,
                        line: trimmed.to_string(),
                    });
                    out.push_str(patch.replacement);
                }
                continue;
            }
            // Impropers compare forward only; the central atom fixes
            // the orientation.
            if !seen.insert(labels) {
                report.push(Diagnostic::DuplicateRecord {
                    section,
                    line: trimmed.to_string(),
                });
                continue;
            }
        } else {
            let mut reversed = labels.clone();
            reversed.reverse();
            if seen.contains(&labels) || seen.contains(&reversed) {
                report.push(Diagnostic::DuplicateRecord {
                    section,
                    line: trimmed.to_string(),
                });
                continue;
            }
            seen.insert(labels);
        }
        out.push_str(line);
        out.push('\n');
    }
    out
}

fn matches_pattern(patch: &ImproperPatch, labels: &[String]) -> bool {
    patch
        .pattern
        .iter()
        .zip(labels)
        .all(|(slot, label)| slot.map_or(true, |s| s == label))
}
