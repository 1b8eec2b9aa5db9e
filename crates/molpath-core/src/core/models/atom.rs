use nalgebra::Point3;
use std::fmt;

/// Represents one atom parsed from an `ATOM` record.
///
/// All fields are plain data; only `position` changes after loading, when a
/// structure is centered.
#[derive(Debug, Clone, PartialEq)]
pub struct Atom {
    /// The atom serial number, unique within a structure.
    pub serial: isize,
    /// The name of the atom (e.g., "CA", "N", "O").
    pub name: String,
    /// The three-letter class of the residue this atom declares (e.g., "ALA").
    pub residue_name: String,
    /// The 3D coordinates of the atom in Angstroms.
    pub position: Point3<f64>,
    /// The residue sequence number this atom declares.
    pub residue_number: isize,
    /// The chain identifier, `None` when the column is blank.
    pub chain: Option<char>,
    /// The element symbol, empty when the column is blank.
    pub element: String,
}

impl Atom {
    /// Creates a new `Atom` with no chain and no element symbol.
    ///
    /// # Arguments
    ///
    /// * `serial` - The atom serial number.
    /// * `name` - The name of the atom.
    /// * `residue_name` - The class of the residue the atom belongs to.
    /// * `residue_number` - The residue sequence number.
    /// * `position` - The 3D coordinates of the atom.
    pub fn new(
        serial: isize,
        name: &str,
        residue_name: &str,
        residue_number: isize,
        position: Point3<f64>,
    ) -> Self {
        Self {
            serial,
            name: name.to_string(),
            residue_name: residue_name.to_string(),
            position,
            residue_number,
            chain: None,
            element: String::new(),
        }
    }

    pub fn with_chain(mut self, chain: char) -> Self {
        self.chain = Some(chain);
        self
    }

    pub fn with_element(mut self, element: &str) -> Self {
        self.element = element.to_string();
        self
    }
}

impl fmt::Display for Atom {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "ATOM {:3} in residue {:3} at [{}, {}, {}]",
            self.name, self.residue_name, self.position.x, self.position.y, self.position.z
        )
    }
}
