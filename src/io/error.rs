use thiserror::Error;

use crate::model::terms::TermKind;
use crate::table::cell::CellError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("I/O operation failed: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },

    #[error(transparent)]
    Cell(#[from] CellError),

    /// A bonded term references atoms from more than one residue. The
    /// upstream structure is malformed; generation of the current file
    /// is aborted.
    #[error("{kind} ({atoms}) spans residues {residues}; bonded terms must stay within one residue")]
    ResidueConsistency {
        kind: TermKind,
        atoms: String,
        residues: String,
    },

    #[error("failed to convert data model: {0}")]
    Conversion(String),
}

impl Error {
    pub fn residue_consistency(
        kind: TermKind,
        atoms: impl Into<String>,
        residues: impl Into<String>,
    ) -> Self {
        Self::ResidueConsistency {
            kind,
            atoms: atoms.into(),
            residues: residues.into(),
        }
    }
}
