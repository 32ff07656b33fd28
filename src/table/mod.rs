//! The consistency engine behind the format emitters.
//!
//! - [`types`] – deterministic, insertion-ordered type-id tables and
//!   provenance tags shared across output files.
//! - [`residue`] – one representative residue per distinct name.
//! - [`cell`] – crystallographic cell to simulation-cell conversion.

pub mod cell;
pub mod residue;
pub mod types;
