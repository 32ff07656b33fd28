//! Format emitters for the supported simulation engines.
//!
//! Each writer is a pure function of the structure and the tables built
//! over it: output is rendered into an in-memory buffer and flushed to
//! the sink only on success, so a failing write never leaves a partial
//! file behind. The CHARMM and LAMMPS writers have no data dependency
//! on each other and may run in either order.

use std::fmt;

use serde::{Deserialize, Serialize};

pub mod charmm;
pub mod diag;
pub mod error;
pub mod lammps;

pub use diag::{Diagnostic, Report};
pub use error::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    CharmmRtf,
    CharmmPrm,
    CharmmInp,
    LammpsData,
    LammpsInput,
    LammpsMolecule,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Format::CharmmRtf => write!(f, "CHARMM topology (rtf)"),
            Format::CharmmPrm => write!(f, "CHARMM parameters (prm)"),
            Format::CharmmInp => write!(f, "CHARMM input (inp)"),
            Format::LammpsData => write!(f, "LAMMPS data"),
            Format::LammpsInput => write!(f, "LAMMPS input"),
            Format::LammpsMolecule => write!(f, "LAMMPS molecule"),
        }
    }
}

/// Real-space cutoff scheme shared by both engines, Angstrom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutoffSettings {
    pub lj_inner: f64,
    pub lj_outer: f64,
    pub coul: f64,
    pub skin: f64,
}

impl Default for CutoffSettings {
    fn default() -> Self {
        Self {
            lj_inner: 10.0,
            lj_outer: 12.0,
            coul: 12.0,
            skin: 2.0,
        }
    }
}

/// Reciprocal-space solver settings. The mesh and damping parameter are
/// computed upstream by a mesh-sizing routine; writers only embed them.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EwaldSettings {
    /// Damping parameter controlling the real/reciprocal split (kappa).
    pub gewald: f64,
    pub tolerance: f64,
    pub mesh: [usize; 3],
}

impl Default for EwaldSettings {
    fn default() -> Self {
        Self {
            gewald: 0.35,
            tolerance: 1e-5,
            mesh: [24, 24, 24],
        }
    }
}

/// Pair style selection for the LAMMPS input script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PairStyle {
    #[default]
    LjCutCoulLong,
    /// CHARMM force-switched LJ.
    CharmmFsw,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CharmmConfig {
    pub cutoffs: CutoffSettings,
    pub ewald: EwaldSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LammpsConfig {
    /// Periodicity per axis; a non-periodic axis triggers the slab
    /// correction in the input script.
    pub pbc: [bool; 3],
    pub pair_style: PairStyle,
    /// Force an orthogonal box: the tilt line in the data file is
    /// emitted commented out.
    pub orthogonal: bool,
    /// Symmetric per-axis padding added to both box bounds.
    pub padding: [f64; 3],
    /// Emit a zeroed Velocities section in the data file.
    pub velocities: bool,
    pub cutoffs: CutoffSettings,
    pub ewald: EwaldSettings,
}

impl Default for LammpsConfig {
    fn default() -> Self {
        Self {
            pbc: [true, true, true],
            pair_style: PairStyle::default(),
            orthogonal: false,
            padding: [0.0; 3],
            velocities: false,
            cutoffs: CutoffSettings::default(),
            ewald: EwaldSettings::default(),
        }
    }
}
