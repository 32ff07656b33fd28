use std::collections::HashMap;

use crate::model::structure::Structure;
use crate::model::terms::BondedTerm;

/// Insertion-ordered mapping from canonical signature to a contiguous
/// 1-based type id, with an arbitrary payload per entry.
///
/// Ids are assigned in first-seen order and never renumbered, so repeated
/// builds over the same structure yield identical tables. Lookup is by
/// exact string equality; near-duplicate signatures stay distinct.
#[derive(Debug, Clone)]
pub struct TypeTable<T> {
    keys: Vec<String>,
    index: HashMap<String, usize>,
    payloads: Vec<T>,
}

impl<T> Default for TypeTable<T> {
    fn default() -> Self {
        Self {
            keys: Vec::new(),
            index: HashMap::new(),
            payloads: Vec::new(),
        }
    }
}

impl<T> TypeTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the 1-based id for `key`, inserting it with `payload` on
    /// first sight.
    pub fn intern(&mut self, key: &str, payload: impl FnOnce() -> T) -> usize {
        if let Some(&pos) = self.index.get(key) {
            return pos + 1;
        }
        let pos = self.keys.len();
        self.keys.push(key.to_string());
        self.index.insert(key.to_string(), pos);
        self.payloads.push(payload());
        pos + 1
    }

    /// 1-based id for a previously interned signature.
    pub fn id(&self, key: &str) -> Option<usize> {
        self.index.get(key).map(|&pos| pos + 1)
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Entries in id order as `(id, signature, payload)`.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str, &T)> {
        self.keys
            .iter()
            .zip(&self.payloads)
            .enumerate()
            .map(|(pos, (key, payload))| (pos + 1, key.as_str(), payload))
    }
}

/// Per-atom-type data carried alongside the signature table.
#[derive(Debug, Clone, PartialEq)]
pub struct AtomTypeInfo {
    /// Bare force-field label, without the residue qualifier.
    pub label: String,
    pub element: String,
    pub mass: f64,
    pub epsilon: f64,
    pub rmin: f64,
}

impl AtomTypeInfo {
    pub fn sigma(&self) -> f64 {
        2.0 * self.rmin / 2f64.powf(1.0 / 6.0)
    }
}

/// Atom type table keyed by `residue_name + type_label`.
///
/// The residue qualifier keeps nonbonded parameters residue-scoped: the
/// same chemical type appearing in two residues gets two ids.
pub fn qualified_atom_types(structure: &Structure) -> TypeTable<AtomTypeInfo> {
    build_atom_types(structure, |structure, atom_idx| {
        let atom = &structure.atoms[atom_idx];
        format!("{}{}", structure.residues[atom.residue].name, atom.type_label)
    })
}

/// Atom type table keyed by the bare force-field label, for sections
/// that are not residue-scoped (the topology MASS table).
pub fn plain_atom_types(structure: &Structure) -> TypeTable<AtomTypeInfo> {
    build_atom_types(structure, |structure, atom_idx| {
        structure.atoms[atom_idx].type_label.clone()
    })
}

fn build_atom_types(
    structure: &Structure,
    signature: impl Fn(&Structure, usize) -> String,
) -> TypeTable<AtomTypeInfo> {
    let mut table = TypeTable::new();
    for atom_idx in 0..structure.atoms.len() {
        let key = signature(structure, atom_idx);
        let atom = &structure.atoms[atom_idx];
        table.intern(&key, || AtomTypeInfo {
            label: atom.type_label.clone(),
            element: atom.element.clone(),
            mass: atom.mass,
            epsilon: atom.epsilon,
            rmin: atom.rmin,
        });
    }
    table
}

/// Human-readable provenance tags for bonded-term types, one string per
/// type in `idx` order: `resname(t1-t2,...)` groups joined by commas.
/// Debugging aid only; identity is never derived from tags.
pub fn term_tags<'a>(
    structure: &Structure,
    terms: impl Iterator<Item = BondedTerm<'a>>,
    type_count: usize,
) -> Vec<String> {
    let mut groups: Vec<Vec<(String, Vec<String>)>> = vec![Vec::new(); type_count];
    for term in terms {
        let atoms = term.atoms();
        let resname = &structure.residues[structure.atoms[atoms[0]].residue].name;
        debug_assert!(
            atoms
                .iter()
                .all(|&i| structure.atoms[i].residue == structure.atoms[atoms[0]].residue),
            "bonded term spans residues"
        );
        let tag = atoms
            .iter()
            .map(|&i| structure.atoms[i].type_label.as_str())
            .collect::<Vec<_>>()
            .join("-");
        let by_residue = &mut groups[term.type_idx()];
        match by_residue.iter_mut().find(|(name, _)| name == resname) {
            Some((_, tags)) => {
                if !tags.contains(&tag) {
                    tags.push(tag);
                }
            }
            None => by_residue.push((resname.clone(), vec![tag])),
        }
    }
    groups
        .into_iter()
        .map(|by_residue| {
            by_residue
                .iter()
                .map(|(name, tags)| format!("{}({})", name, tags.join(",")))
                .collect::<Vec<_>>()
                .join(",")
        })
        .collect()
}

/// Truncation applied to tags in file comment columns: at most 20
/// characters, cut on a char boundary.
pub fn clip_tag(tag: &str) -> &str {
    match tag.char_indices().nth(20) {
        Some((i, _)) => &tag[..i],
        None => tag,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::atom::Atom;
    use crate::model::residue::Residue;
    use crate::model::terms::{Bond, BondType};

    fn atom(type_label: &str, residue: usize) -> Atom {
        Atom {
            name: type_label.to_uppercase(),
            type_label: type_label.into(),
            element: "C".into(),
            charge: 0.0,
            mass: 12.011,
            epsilon: 0.086,
            rmin: 1.908,
            position: [0.0; 3],
            residue,
        }
    }

    fn two_residue_structure() -> Structure {
        let mut s = Structure::new();
        s.atoms.push(atom("c3", 0));
        s.atoms.push(atom("hc", 0));
        s.atoms.push(atom("c3", 1));
        s.atoms.push(atom("ow", 1));
        s.residues.push(Residue::new("MOL", 0..2));
        s.residues.push(Residue::new("WAT", 2..4));
        s
    }

    #[test]
    fn qualified_ids_are_contiguous_and_first_seen() {
        let s = two_residue_structure();
        let table = qualified_atom_types(&s);
        let ids: Vec<_> = table.iter().map(|(id, _, _)| id).collect();
        assert_eq!(ids, vec![1, 2, 3, 4]);
        assert_eq!(table.id("MOLc3"), Some(1));
        assert_eq!(table.id("MOLhc"), Some(2));
        // Same chemical type in a different residue gets its own id.
        assert_eq!(table.id("WATc3"), Some(3));
        assert_eq!(table.id("WATow"), Some(4));
    }

    #[test]
    fn repeated_builds_are_deterministic() {
        let s = two_residue_structure();
        let first: Vec<String> = qualified_atom_types(&s)
            .iter()
            .map(|(_, k, _)| k.to_string())
            .collect();
        for _ in 0..10 {
            let again: Vec<String> = qualified_atom_types(&s)
                .iter()
                .map(|(_, k, _)| k.to_string())
                .collect();
            assert_eq!(first, again);
        }
    }

    #[test]
    fn plain_table_merges_across_residues() {
        let s = two_residue_structure();
        let table = plain_atom_types(&s);
        assert_eq!(table.len(), 3);
        assert_eq!(table.id("c3"), Some(1));
        assert_eq!(table.id("ow"), Some(3));
    }

    #[test]
    fn near_duplicate_keys_stay_distinct() {
        let mut table: TypeTable<()> = TypeTable::new();
        assert_eq!(table.intern("MOLc3", || ()), 1);
        assert_eq!(table.intern("MOL c3", || ()), 2);
        assert_eq!(table.intern("MOLC3", || ()), 3);
        assert_eq!(table.intern("MOLc3", || ()), 1);
    }

    #[test]
    fn tags_group_by_residue_and_dedup() {
        let mut s = two_residue_structure();
        s.bond_types.push(BondType {
            k: 300.0,
            req: 1.09,
            idx: 0,
        });
        s.bonds.push(Bond {
            atoms: [0, 1],
            type_idx: 0,
            order: 1.0,
        });
        s.bonds.push(Bond {
            atoms: [2, 3],
            type_idx: 0,
            order: 1.0,
        });
        let tags = term_tags(&s, s.bonds.iter().map(BondedTerm::Bond), 1);
        assert_eq!(tags, vec!["MOL(c3-hc),WAT(c3-ow)".to_string()]);
        assert_eq!(clip_tag(&tags[0]), "MOL(c3-hc),WAT(c3-ow");
    }

    #[test]
    fn clip_counts_characters_not_bytes() {
        assert_eq!(clip_tag("short"), "short");
        // 20 characters exactly, no truncation.
        assert_eq!(clip_tag("MOL(c3-hc),WAT(c3-ow"), "MOL(c3-hc),WAT(c3-ow");
        // 21 characters but 22 bytes; the cut is by character count.
        assert_eq!(clip_tag("MOL(c3-hc),WAT(c3-öw)"), "MOL(c3-hc),WAT(c3-öw");
        // A multi-byte character straddling byte 20 must not split.
        assert_eq!(clip_tag("MOL(c3-hc),WAT(c3-oöw)"), "MOL(c3-hc),WAT(c3-oö");
    }
}
