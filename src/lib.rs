//! A pure Rust library for emitting simulation input decks from an
//! in-memory parameterized structure. Given atoms, residues, bonded
//! terms and their force-field types, it derives the shared bookkeeping
//! both engines need (unique residues, deterministic type-id tables,
//! the triclinic cell transform) and writes CHARMM topology, parameter
//! and control files alongside LAMMPS data, input and molecule files.
//!
//! # Features
//!
//! - **Unique-residue detection** — Repeated residues collapse to one
//!   representative per name, so topology blocks and molecule templates
//!   are written once
//! - **Deterministic type tables** — Atom, bond, angle and dihedral
//!   types get stable 1-based ids in first-seen order, with provenance
//!   tags carried into file comments
//! - **Cell handling** — Crystallographic cells convert to LAMMPS
//!   triclinic bounds with tilt factors; boxless structures fall back
//!   to a large centered cube
//! - **Template reconciliation** — Molecule files written against a
//!   master structure reuse the master's type ids, with diagnostics for
//!   anything that fails to match
//!
//! # Quick Start
//!
//! ```
//! use xtal_forge::{Atom, Cell, Residue, Structure};
//! use xtal_forge::io::{lammps, LammpsConfig};
//!
//! let mut system = Structure::new();
//! system.atoms.push(Atom {
//!     name: "OW".into(),
//!     type_label: "ow".into(),
//!     element: "O".into(),
//!     charge: -0.8340,
//!     mass: 15.9994,
//!     epsilon: 0.1521,
//!     rmin: 1.7683,
//!     position: [5.0, 5.0, 5.0],
//!     residue: 0,
//! });
//! system.atoms.push(Atom {
//!     name: "HW1".into(),
//!     type_label: "hw".into(),
//!     element: "H".into(),
//!     charge: 0.4170,
//!     mass: 1.008,
//!     epsilon: 0.0,
//!     rmin: 0.0,
//!     position: [5.957, 5.0, 5.0],
//!     residue: 0,
//! });
//! system.atoms.push(Atom {
//!     name: "HW2".into(),
//!     type_label: "hw".into(),
//!     element: "H".into(),
//!     charge: 0.4170,
//!     mass: 1.008,
//!     epsilon: 0.0,
//!     rmin: 0.0,
//!     position: [4.760, 5.926, 5.0],
//!     residue: 0,
//! });
//! system.residues.push(Residue::new("WAT", 0..3));
//! system.cell = Some(Cell::cubic(12.0));
//!
//! let mut data = Vec::new();
//! let report = lammps::data::write(&mut data, &system, &LammpsConfig::default())?;
//! assert!(report.is_clean());
//!
//! let text = String::from_utf8(data).unwrap();
//! assert!(text.contains("3 atoms"));
//! assert!(text.contains("2 atom types"));
//! # Ok::<(), xtal_forge::io::Error>(())
//! ```
//!
//! # Module Organization
//!
//! - [`io`] — The CHARMM and LAMMPS writers plus their configuration
//!   and diagnostics types
//! - [`table`] — Residue, type-id and cell tables shared by the writers
//! - [`model`] — The structure model the writers consume
//!
//! # Data Types
//!
//! - [`Structure`] — Atoms, residues, bonded terms, their types, and an
//!   optional cell
//! - [`Atom`] / [`Residue`] — Per-atom parameters and contiguous atom
//!   ranges grouped by residue
//! - [`BondType`] / [`AngleType`] / [`DihedralType`] — Harmonic and
//!   periodic force-field parameters referenced by index
//! - [`Cell`] / [`TriclinicBounds`] — Crystallographic cell and its
//!   LAMMPS-style bounds-plus-tilts form
//! - [`TypeTable`] / [`UniqueResidues`] — Deterministic id assignment
//!   and representative-residue selection

pub mod io;
pub mod model;
pub mod table;

pub use model::atom::Atom;
pub use model::residue::Residue;
pub use model::structure::{Cell, Structure, EWALD_GUARD_CHARGE};
pub use model::terms::{Angle, AngleType, Bond, BondType, Dihedral, DihedralType, TermKind};
pub use table::cell::{CellError, TriclinicBounds, DEFAULT_CELL_EDGE};
pub use table::residue::UniqueResidues;
pub use table::types::{plain_atom_types, qualified_atom_types, AtomTypeInfo, TypeTable};
