use std::ops::Range;

/// A residue owning a contiguous range of atom indices in the parent
/// structure's atom list.
#[derive(Debug, Clone, PartialEq)]
pub struct Residue {
    pub name: String,
    pub atoms: Range<usize>,
}

impl Residue {
    pub fn new(name: &str, atoms: Range<usize>) -> Self {
        Self {
            name: name.to_string(),
            atoms,
        }
    }

    #[inline]
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    #[inline]
    pub fn contains(&self, atom_idx: usize) -> bool {
        self.atoms.contains(&atom_idx)
    }

    pub fn atom_indices(&self) -> Range<usize> {
        self.atoms.clone()
    }
}
