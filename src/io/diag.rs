use std::fmt;

use crate::model::terms::TermKind;

/// Non-fatal conditions surfaced to the caller during emission. Each is
/// also mirrored to the log; none stops generation of remaining
/// sections or files.
#[derive(Debug, Clone, PartialEq)]
pub enum Diagnostic {
    /// Template-mode reconciliation found no master term matching this
    /// fragment term; its local type id was used instead.
    UnmatchedMasterType {
        kind: TermKind,
        atom_types: Vec<String>,
        local_id: usize,
    },

    /// Post-scan of emitted parameter text found a second entry with
    /// the same atom-type tuple; the later line was dropped.
    DuplicateRecord {
        section: &'static str,
        line: String,
    },

    /// A known-bad improper parameter pattern was replaced from the
    /// correction table.
    ImproperPatched {
        pattern: &'static str,
        line: String,
    },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::UnmatchedMasterType {
                kind,
                atom_types,
                local_id,
            } => write!(
                f,
                "no master {} type matches ({}); keeping local id {}",
                kind,
                atom_types.join("-"),
                local_id
            ),
            Diagnostic::DuplicateRecord { section, line } => {
                write!(f, "duplicate {} record dropped: {}", section, line.trim())
            }
            Diagnostic::ImproperPatched { pattern, line } => write!(
                f,
                "improper parameter pattern '{}' replaced: {}",
                pattern,
                line.trim()
            ),
        }
    }
}

/// Diagnostics accumulated over one writer invocation.
#[derive(Debug, Clone, Default)]
pub struct Report {
    pub diagnostics: Vec<Diagnostic>,
}

impl Report {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diag: Diagnostic) {
        log::warn!("{diag}");
        self.diagnostics.push(diag);
    }

    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn merge(&mut self, other: Report) {
        self.diagnostics.extend(other.diagnostics);
    }
}
