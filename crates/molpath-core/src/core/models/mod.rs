//! # Core Models Module
//!
//! Data structures representing a molecule read from a PDB file.
//!
//! ## Key Components
//!
//! - [`atom`] - A single parsed `ATOM` record with its position
//! - [`residue`] - Atoms sharing a residue number, with backbone and bond queries
//! - [`structure`] - The aggregate owning every atom and residue
//! - [`ids`] - Stable handles for atoms and residues
//! - [`error`] - Errors raised while building or querying the model
//!
//! ## Usage
//!
//! ```
//! use molpath::core::models::{atom::Atom, structure::Structure};
//! use nalgebra::Point3;
//!
//! let mut structure = Structure::new();
//! structure.add_atom(Atom::new(1, "N", "GLY", 1, Point3::new(0.0, 0.0, 0.0)))?;
//! structure.add_atom(Atom::new(2, "CA", "GLY", 1, Point3::new(1.5, 0.0, 0.0)))?;
//!
//! let residue = structure.residue(1)?;
//! assert_eq!(residue.bonds().count(), 1);
//! # Ok::<(), molpath::core::models::error::ModelError>(())
//! ```

pub mod atom;
pub mod error;
pub mod ids;
pub mod residue;
pub mod structure;
