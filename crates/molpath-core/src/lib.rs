//! # molpath Core Library
//!
//! Reads PDB coordinate files into an in-memory molecular model and derives the
//! geometric views that visualization front-ends consume: backbone paths,
//! distance-inferred bonds, and the centroid used to center a structure.
//!
//! ## Layout
//!
//! - **[`core::models`]**: The `Structure` aggregate, its residues and atoms. Residues are
//!   addressable by residue number and atoms by name within a residue.
//! - **[`core::io`]**: The fixed-column PDB reader and the `StructureFile` trait it implements.
//! - **[`core::utils`]**: Stateless geometry helpers (distance, centroid, translation).
//! - **[`core::progress`]**: Callback-based progress reporting for long reads.
//!
//! ## Example
//!
//! ```no_run
//! use molpath::core::models::structure::Structure;
//!
//! let mut structure = Structure::read("protein.pdb")?;
//! structure.center()?;
//!
//! let residue = structure.residue(101)?;
//! for (a, b) in residue.bonds() {
//!     println!("{} -- {}", a.name, b.name);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod core;
