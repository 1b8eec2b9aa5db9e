use super::atom::Atom;
use super::error::ModelError;
use super::ids::{AtomId, ResidueId};
use super::residue::{BondCriteria, Residue, ResidueView};
use crate::core::io::pdb::{PdbError, PdbFile};
use crate::core::io::traits::StructureFile;
use crate::core::utils::geometry;
use nalgebra::Point3;
use slotmap::SlotMap;
use std::collections::HashMap;
use std::path::Path;
use tracing::{debug, info, instrument, warn};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Backbone positions of every residue, in residue insertion order.
#[derive(Debug, Clone, PartialEq)]
pub enum Backbone {
    /// One flat path: `N`, `CA`, `C` of the first residue, then of the next, and so on.
    Flat(Vec<Point3<f64>>),
    /// One `[N, CA, C]` triple per residue.
    Triples(Vec<[Point3<f64>; 3]>),
}

impl Backbone {
    pub fn into_flat(self) -> Vec<Point3<f64>> {
        match self {
            Backbone::Flat(points) => points,
            Backbone::Triples(triples) => triples.into_iter().flatten().collect(),
        }
    }
}

/// Bonds inferred inside one residue.
#[derive(Debug, Clone)]
pub struct ResidueBonds<'a> {
    pub residue: ResidueView<'a>,
    pub bonds: Vec<(&'a Atom, &'a Atom)>,
}

/// The molecular model built from one PDB file.
///
/// Owns every atom (indexed by serial number) and every residue (indexed by
/// residue number, iterated in first-seen order). A secondary index groups
/// residue handles by the residue class each atom declared.
#[derive(Debug, Clone, Default)]
pub struct Structure {
    /// Primary storage for atoms, including atoms later displaced inside their residue.
    atoms: SlotMap<AtomId, Atom>,
    /// Primary storage for residues.
    residues: SlotMap<ResidueId, Residue>,
    /// Lookup map from atom serial number to atom handle.
    atom_serial_map: HashMap<isize, AtomId>,
    /// Lookup map from residue sequence number to residue handle.
    residue_number_map: HashMap<isize, ResidueId>,
    /// Residue handles in first-seen order.
    residue_order: Vec<ResidueId>,
    /// Residue handles per declared class, one entry per added atom.
    residues_by_class: HashMap<String, Vec<ResidueId>>,
    /// Chain identifiers in first-seen order.
    chains: Vec<char>,
}

impl Structure {
    /// Creates a new, empty structure.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a structure from a PDB file.
    ///
    /// # Errors
    ///
    /// Returns [`PdbError::FileAccess`] if the file cannot be opened, and
    /// propagates parse and model errors from the reader.
    pub fn read<P: AsRef<Path>>(path: P) -> Result<Self, PdbError> {
        PdbFile::read_from_path(path)
    }

    /// Adds an atom to the structure and to the residue it declares.
    ///
    /// The residue is created on first sight of its number, taking this
    /// atom's residue name as its class; later atoms never change that
    /// class. Within the residue, an atom with an already-used name replaces
    /// the earlier one, which nevertheless stays in the structure's atom store.
    ///
    /// The residue is also appended to the class index under the atom's
    /// declared residue name, once per atom, so the index may repeat a residue.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::DuplicateAtomId`] if an atom with the same serial
    /// number already exists anywhere in the structure.
    pub fn add_atom(&mut self, atom: Atom) -> Result<AtomId, ModelError> {
        if self.atom_serial_map.contains_key(&atom.serial) {
            return Err(ModelError::DuplicateAtomId {
                serial: atom.serial,
            });
        }

        let serial = atom.serial;
        let residue_number = atom.residue_number;
        let name = atom.name.clone();
        let class = atom.residue_name.clone();
        if let Some(chain) = atom.chain {
            if !self.chains.contains(&chain) {
                self.chains.push(chain);
            }
        }

        let atom_id = self.atoms.insert(atom);
        self.atom_serial_map.insert(serial, atom_id);

        let residue_id = match self.residue_number_map.get(&residue_number) {
            Some(&id) => id,
            None => {
                let id = self.residues.insert(Residue::new(residue_number, &class));
                self.residue_number_map.insert(residue_number, id);
                self.residue_order.push(id);
                id
            }
        };

        let residue = &mut self.residues[residue_id];
        if residue.name != class {
            warn!(
                serial,
                declared = %class,
                kept = %residue.name,
                residue = residue_number,
                "Atom declares a different class than its residue; keeping the first."
            );
        }
        if let Some(displaced) = residue.add_atom(&name, atom_id) {
            debug!(
                serial,
                displaced_serial = self.atoms[displaced].serial,
                atom = %name,
                residue = residue_number,
                "Atom name already present in residue; replacing."
            );
        }

        self.residues_by_class
            .entry(class)
            .or_default()
            .push(residue_id);

        Ok(atom_id)
    }

    /// Number of atoms in the store, displaced atoms included.
    pub fn atom_count(&self) -> usize {
        self.atoms.len()
    }

    pub fn residue_count(&self) -> usize {
        self.residue_order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.atoms.is_empty()
    }

    pub fn atom(&self, id: AtomId) -> Option<&Atom> {
        self.atoms.get(id)
    }

    pub fn atom_by_serial(&self, serial: isize) -> Option<&Atom> {
        self.atom_serial_map
            .get(&serial)
            .and_then(|&id| self.atoms.get(id))
    }

    /// Every atom in the store, displaced atoms included.
    pub fn atoms(&self) -> impl Iterator<Item = &Atom> {
        self.atoms.values()
    }

    pub fn chains(&self) -> &[char] {
        &self.chains
    }

    /// Looks up a residue by its sequence number.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::ResidueNotFound`] if no atom declared this number.
    pub fn residue(&self, number: isize) -> Result<ResidueView<'_>, ModelError> {
        self.residue_number_map
            .get(&number)
            .map(|&id| ResidueView::new(&self.residues[id], &self.atoms))
            .ok_or(ModelError::ResidueNotFound { number })
    }

    /// Residues in the order their numbers were first seen.
    pub fn residues(&self) -> impl Iterator<Item = ResidueView<'_>> {
        self.residue_order
            .iter()
            .map(move |&id| ResidueView::new(&self.residues[id], &self.atoms))
    }

    /// Residues registered under a class name, one entry per atom that
    /// declared the class. Returns an empty list for unknown classes.
    pub fn residues_by_class(&self, class: &str) -> Vec<ResidueView<'_>> {
        self.residues_by_class
            .get(class)
            .map(|ids| {
                ids.iter()
                    .map(|&id| ResidueView::new(&self.residues[id], &self.atoms))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Class names present in the class index.
    pub fn residue_classes(&self) -> impl Iterator<Item = &str> {
        self.residues_by_class.keys().map(String::as_str)
    }

    /// Backbone positions of every residue, flat or grouped per residue.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::MissingAtom`] for the first residue lacking `N`, `CA` or `C`.
    pub fn backbone(&self, triples: bool) -> Result<Backbone, ModelError> {
        let grouped = self
            .residues()
            .map(ResidueView::backbone)
            .collect::<Result<Vec<_>, _>>()?;
        if triples {
            Ok(Backbone::Triples(grouped))
        } else {
            Ok(Backbone::Flat(grouped.into_iter().flatten().collect()))
        }
    }

    /// The unweighted mean position of every atom in the store.
    pub fn centroid(&self) -> Option<Point3<f64>> {
        geometry::centroid(self.atoms.values().map(|atom| &atom.position))
    }

    /// Moves the structure so that its centroid sits at the origin.
    ///
    /// Every atom in the store is translated by the current centroid, which
    /// is recomputed on each call and returned.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::EmptyStructure`] without touching anything if
    /// the structure has no atoms.
    #[instrument(skip_all, name = "center_structure", fields(atoms = self.atoms.len()))]
    pub fn center(&mut self) -> Result<Point3<f64>, ModelError> {
        let centroid = self.centroid().ok_or(ModelError::EmptyStructure)?;
        let offset = centroid.coords;
        for atom in self.atoms.values_mut() {
            atom.position = geometry::translate(&atom.position, &offset);
        }
        info!(
            x = centroid.x,
            y = centroid.y,
            z = centroid.z,
            "Structure centered on its centroid."
        );
        Ok(centroid)
    }

    /// Infers bonds for every residue, in residue insertion order.
    ///
    /// With the `parallel` feature the residues are processed on the rayon
    /// thread pool; residues share no atoms, so each is an independent task.
    pub fn bonds_by_residue(&self, criteria: &BondCriteria) -> Vec<ResidueBonds<'_>> {
        let threshold = criteria.threshold;
        let views: Vec<ResidueView<'_>> = self.residues().collect();

        #[cfg(not(feature = "parallel"))]
        let iterator = views.into_iter();

        #[cfg(feature = "parallel")]
        let iterator = views.into_par_iter();

        iterator
            .map(|residue| ResidueBonds {
                residue,
                bonds: residue.bonds_within(threshold).collect(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::BOND_DISTANCE_THRESHOLD;

    const EPSILON: f64 = 1e-9;

    fn atom(serial: isize, name: &str, class: &str, number: isize, p: [f64; 3]) -> Atom {
        Atom::new(serial, name, class, number, Point3::new(p[0], p[1], p[2])).with_chain('A')
    }

    fn dipeptide() -> Structure {
        let mut structure = Structure::new();
        let atoms = [
            atom(1, "N", "GLY", 1, [0.0, 0.0, 0.0]),
            atom(2, "CA", "GLY", 1, [1.5, 0.0, 0.0]),
            atom(3, "C", "GLY", 1, [2.9, 0.0, 0.0]),
            atom(4, "N", "ALA", 2, [3.5, 1.2, 0.0]),
            atom(5, "CA", "ALA", 2, [4.9, 1.2, 0.0]),
            atom(6, "C", "ALA", 2, [5.6, 2.4, 0.0]),
            atom(7, "CB", "ALA", 2, [5.2, 0.0, 1.1]),
        ];
        for a in atoms {
            structure.add_atom(a).unwrap();
        }
        structure
    }

    #[test]
    fn new_structure_is_empty() {
        let structure = Structure::new();
        assert!(structure.is_empty());
        assert_eq!(structure.atom_count(), 0);
        assert_eq!(structure.residue_count(), 0);
        assert!(structure.centroid().is_none());
    }

    #[test]
    fn add_atom_indexes_atoms_and_residues() {
        let structure = dipeptide();
        assert_eq!(structure.atom_count(), 7);
        assert_eq!(structure.residue_count(), 2);
        assert_eq!(structure.atom_by_serial(5).unwrap().name, "CA");
        assert_eq!(structure.residue(2).unwrap().name(), "ALA");
        assert_eq!(structure.residue(2).unwrap().len(), 4);
        assert_eq!(structure.chains(), &['A']);
    }

    #[test]
    fn duplicate_serial_is_rejected_regardless_of_other_fields() {
        let mut structure = Structure::new();
        structure.add_atom(atom(42, "N", "GLY", 1, [0.0, 0.0, 0.0])).unwrap();
        let result = structure.add_atom(atom(42, "CB", "ALA", 7, [9.0, 9.0, 9.0]));
        assert_eq!(result, Err(ModelError::DuplicateAtomId { serial: 42 }));
        assert_eq!(structure.atom_count(), 1);
        assert_eq!(structure.residue_count(), 1);
        assert_eq!(structure.atom_by_serial(42).unwrap().name, "N");
    }

    #[test]
    fn residues_iterate_in_first_seen_order() {
        let mut structure = Structure::new();
        structure.add_atom(atom(1, "N", "LEU", 30, [0.0; 3])).unwrap();
        structure.add_atom(atom(2, "N", "GLY", 4, [0.0; 3])).unwrap();
        structure.add_atom(atom(3, "CA", "LEU", 30, [0.0; 3])).unwrap();
        structure.add_atom(atom(4, "N", "SER", 17, [0.0; 3])).unwrap();
        let order: Vec<_> = structure.residues().map(|r| r.number()).collect();
        assert_eq!(order, vec![30, 4, 17]);
    }

    #[test]
    fn residue_class_is_fixed_by_first_atom() {
        let mut structure = Structure::new();
        structure.add_atom(atom(1, "N", "GLY", 5, [0.0; 3])).unwrap();
        structure.add_atom(atom(2, "CA", "ALA", 5, [1.0, 0.0, 0.0])).unwrap();
        let residue = structure.residue(5).unwrap();
        assert_eq!(residue.name(), "GLY");
        assert_eq!(residue.len(), 2);
        assert_eq!(structure.residue_count(), 1);
    }

    #[test]
    fn class_index_records_one_entry_per_atom_under_declared_class() {
        let mut structure = Structure::new();
        structure.add_atom(atom(1, "N", "GLY", 5, [0.0; 3])).unwrap();
        structure.add_atom(atom(2, "CA", "GLY", 5, [0.0; 3])).unwrap();
        structure.add_atom(atom(3, "C", "ALA", 5, [0.0; 3])).unwrap();

        let gly = structure.residues_by_class("GLY");
        assert_eq!(gly.len(), 2);
        assert!(gly.iter().all(|r| r.number() == 5));

        let ala = structure.residues_by_class("ALA");
        assert_eq!(ala.len(), 1);
        assert_eq!(ala[0].name(), "GLY");

        assert!(structure.residues_by_class("TRP").is_empty());
    }

    #[test]
    fn displaced_atom_stays_in_store_and_is_centered() {
        let mut structure = Structure::new();
        structure.add_atom(atom(1, "CA", "GLY", 1, [0.0, 0.0, 0.0])).unwrap();
        structure.add_atom(atom(2, "CA", "GLY", 1, [4.0, 0.0, 0.0])).unwrap();

        let residue = structure.residue(1).unwrap();
        assert_eq!(residue.len(), 1);
        assert_eq!(residue.atom("CA").unwrap().serial, 2);
        assert_eq!(structure.atom_count(), 2);

        let centroid = structure.center().unwrap();
        assert!((centroid - Point3::new(2.0, 0.0, 0.0)).norm() < EPSILON);
        assert_eq!(
            structure.atom_by_serial(1).unwrap().position,
            Point3::new(-2.0, 0.0, 0.0)
        );

        let err = structure.add_atom(atom(1, "N", "GLY", 1, [0.0; 3]));
        assert_eq!(err, Err(ModelError::DuplicateAtomId { serial: 1 }));
    }

    #[test]
    fn unknown_residue_lookup_fails() {
        let structure = dipeptide();
        assert_eq!(
            structure.residue(99).unwrap_err(),
            ModelError::ResidueNotFound { number: 99 }
        );
    }

    #[test]
    fn center_moves_centroid_to_origin() {
        let mut structure = dipeptide();
        let before = structure.centroid().unwrap();
        let removed = structure.center().unwrap();
        assert!((before - removed).norm() < EPSILON);

        let after = structure.centroid().unwrap();
        assert!(after.coords.norm() < EPSILON);

        let second = structure.center().unwrap();
        assert!(second.coords.norm() < EPSILON);
    }

    #[test]
    fn center_preserves_relative_geometry() {
        let mut structure = dipeptide();
        let before = structure.residue(2).unwrap().bonds().count();
        structure.center().unwrap();
        let after = structure.residue(2).unwrap().bonds().count();
        assert_eq!(before, after);

        let ca = structure.residue(1).unwrap().atom("CA").unwrap().position;
        let n = structure.residue(1).unwrap().atom("N").unwrap().position;
        assert!((geometry::distance(&ca, &n) - 1.5).abs() < EPSILON);
    }

    #[test]
    fn center_on_empty_structure_fails() {
        let mut structure = Structure::new();
        assert_eq!(structure.center(), Err(ModelError::EmptyStructure));
    }

    #[test]
    fn backbone_flat_and_triples_agree() {
        let structure = dipeptide();
        let flat = structure.backbone(false).unwrap();
        let triples = structure.backbone(true).unwrap();

        match &triples {
            Backbone::Triples(t) => {
                assert_eq!(t.len(), 2);
                assert_eq!(t[1][0], Point3::new(3.5, 1.2, 0.0));
            }
            Backbone::Flat(_) => panic!("expected grouped backbone"),
        }
        match &flat {
            Backbone::Flat(points) => assert_eq!(points.len(), 6),
            Backbone::Triples(_) => panic!("expected flat backbone"),
        }
        assert_eq!(flat.into_flat(), triples.into_flat());
    }

    #[test]
    fn backbone_fails_when_a_residue_lacks_backbone_atoms() {
        let mut structure = dipeptide();
        structure.add_atom(atom(8, "O", "HOH", 100, [0.0; 3])).unwrap();
        assert_eq!(
            structure.backbone(false),
            Err(ModelError::MissingAtom {
                residue: 100,
                atom: "N".to_string()
            })
        );
    }

    #[test]
    fn bonds_by_residue_follows_residue_order() {
        let structure = dipeptide();
        let result = structure.bonds_by_residue(&BondCriteria::default());
        assert_eq!(result.len(), 2);
        assert_eq!(result[0].residue.number(), 1);
        assert_eq!(result[1].residue.number(), 2);
        for entry in &result {
            let expected: Vec<_> = entry.residue.bonds().collect();
            assert_eq!(entry.bonds, expected);
            for (a, b) in &entry.bonds {
                assert!(geometry::distance(&a.position, &b.position) < BOND_DISTANCE_THRESHOLD);
            }
        }
    }
}
