use super::atom::Atom;
use super::error::ModelError;
use super::ids::AtomId;
use crate::core::utils::geometry;
use itertools::iproduct;
use nalgebra::Point3;
use serde::{Deserialize, Serialize};
use slotmap::SlotMap;
use std::collections::{HashMap, HashSet};

/// Inter-atomic distance (Angstroms) below which two atoms are considered bonded.
pub const BOND_DISTANCE_THRESHOLD: f64 = 1.7;

pub const BACKBONE_ATOM_NAMES: [&str; 3] = ["N", "CA", "C"];

const POSITION_ATOM_NAME: &str = "C";

/// Distance criteria for inferring bonds from geometry alone.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct BondCriteria {
    /// Pairs strictly closer than this distance are bonded.
    pub threshold: f64,
}

impl Default for BondCriteria {
    fn default() -> Self {
        Self {
            threshold: BOND_DISTANCE_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Residue {
    pub number: isize,                      // Residue sequence number from source file
    pub name: String,                       // Class fixed at creation (e.g., "ALA")
    pub(crate) atoms: Vec<AtomId>,          // Atom handles in file order
    atom_name_map: HashMap<String, AtomId>, // Map from atom name to its handle
}

impl Residue {
    pub(crate) fn new(number: isize, name: &str) -> Self {
        Self {
            number,
            name: name.to_string(),
            atoms: Vec::new(),
            atom_name_map: HashMap::new(),
        }
    }

    /// Registers an atom under its name.
    ///
    /// A name seen before keeps its slot in the ordering but now refers to the
    /// new atom. The displaced handle is returned.
    pub(crate) fn add_atom(&mut self, atom_name: &str, atom_id: AtomId) -> Option<AtomId> {
        let previous = self.atom_name_map.insert(atom_name.to_string(), atom_id);
        match previous {
            Some(old_id) => {
                if let Some(slot) = self.atoms.iter_mut().find(|id| **id == old_id) {
                    *slot = atom_id;
                }
            }
            None => self.atoms.push(atom_id),
        }
        previous
    }

    pub fn atoms(&self) -> &[AtomId] {
        &self.atoms
    }

    pub fn get_atom_id_by_name(&self, name: &str) -> Option<AtomId> {
        self.atom_name_map.get(name).copied()
    }
}

/// A read-only view pairing a residue with the atom store it indexes into.
///
/// Views are cheap to copy and every query borrows from the owning
/// `Structure`, so no query can run while the structure is being centered.
#[derive(Debug, Clone, Copy)]
pub struct ResidueView<'a> {
    residue: &'a Residue,
    store: &'a SlotMap<AtomId, Atom>,
}

impl<'a> ResidueView<'a> {
    pub(crate) fn new(residue: &'a Residue, store: &'a SlotMap<AtomId, Atom>) -> Self {
        Self { residue, store }
    }

    pub fn residue(self) -> &'a Residue {
        self.residue
    }

    pub fn number(self) -> isize {
        self.residue.number
    }

    pub fn name(self) -> &'a str {
        &self.residue.name
    }

    pub fn len(self) -> usize {
        self.residue.atoms.len()
    }

    pub fn is_empty(self) -> bool {
        self.residue.atoms.is_empty()
    }

    /// Atoms of this residue in file order.
    pub fn atoms(self) -> impl Iterator<Item = &'a Atom> + 'a {
        let store = self.store;
        self.residue.atoms.iter().map(move |&id| &store[id])
    }

    pub fn atom(self, name: &str) -> Option<&'a Atom> {
        self.residue
            .get_atom_id_by_name(name)
            .and_then(|id| self.store.get(id))
    }

    fn require_atom(self, name: &str) -> Result<&'a Atom, ModelError> {
        self.atom(name).ok_or_else(|| ModelError::MissingAtom {
            residue: self.residue.number,
            atom: name.to_string(),
        })
    }

    /// The representative position of the residue: its carbonyl carbon `C`.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingAtom`] if the residue has no `C` atom.
    pub fn position(self) -> Result<Point3<f64>, ModelError> {
        Ok(self.require_atom(POSITION_ATOM_NAME)?.position)
    }

    /// Backbone positions in the fixed order `N`, `CA`, `C`, independent of file order.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingAtom`] naming the first backbone atom that is absent.
    pub fn backbone(self) -> Result<[Point3<f64>; 3], ModelError> {
        let [n, ca, c] = BACKBONE_ATOM_NAMES;
        Ok([
            self.require_atom(n)?.position,
            self.require_atom(ca)?.position,
            self.require_atom(c)?.position,
        ])
    }

    /// Bonds inferred with the default [`BOND_DISTANCE_THRESHOLD`].
    pub fn bonds(self) -> impl Iterator<Item = (&'a Atom, &'a Atom)> + 'a {
        self.bonds_within(BOND_DISTANCE_THRESHOLD)
    }

    /// Lazily infers bonds between atoms of this residue.
    ///
    /// Every ordered pair of distinct atoms is visited in file order. A pair is
    /// emitted when its distance is strictly below `threshold`, after which its
    /// unordered name key is blacklisted so the swapped ordering is never
    /// emitted again. Each call starts a fresh traversal.
    pub fn bonds_within(self, threshold: f64) -> impl Iterator<Item = (&'a Atom, &'a Atom)> + 'a {
        let store = self.store;
        let atoms: Vec<(AtomId, &'a Atom)> = self
            .residue
            .atoms
            .iter()
            .map(|&id| (id, &store[id]))
            .collect();
        let n = atoms.len();
        let mut emitted: HashSet<(&'a str, &'a str)> = HashSet::new();

        iproduct!(0..n, 0..n).filter_map(move |(i, j)| {
            let (id1, atom1) = atoms[i];
            let (id2, atom2) = atoms[j];
            if id1 == id2 {
                return None;
            }
            let key = pair_key(&atom1.name, &atom2.name);
            if emitted.contains(&key) {
                return None;
            }
            if geometry::distance(&atom1.position, &atom2.position) < threshold {
                emitted.insert(key);
                Some((atom1, atom2))
            } else {
                None
            }
        })
    }
}

fn pair_key<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}
