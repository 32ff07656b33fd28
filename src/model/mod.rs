//! Core data structures representing parameterized molecular structures.
//!
//! The model is a read-only view consumed by the serialization engine:
//!
//! - [`atom`] – Atom records with names, force-field labels, charge, mass,
//!   Lennard-Jones parameters, and an owning-residue back-reference.
//! - [`residue`] – Residues owning contiguous atom index ranges.
//! - [`terms`] – Bonded terms (bond/angle/dihedral) and their shared
//!   parameter types, plus the tagged [`BondedTerm`] arity view.
//! - [`structure`] – The complete structure with typed accessors, measured
//!   geometry, term energies, and the isolated net-charge guard.
//!
//! [`BondedTerm`]: terms::BondedTerm

pub mod atom;
pub mod residue;
pub mod structure;
pub mod terms;
