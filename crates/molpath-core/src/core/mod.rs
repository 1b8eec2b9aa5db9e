//! # Core Module
//!
//! The building blocks of molpath: the molecular model, the PDB reader that
//! populates it, geometry helpers, and progress reporting.
//!
//! ## Architecture
//!
//! - **Molecular Representation** ([`models`]) - Atoms, residues and the `Structure` aggregate
//! - **File I/O** ([`io`]) - Fixed-column PDB parsing
//! - **Geometry** ([`utils`]) - Distance, centroid and translation
//! - **Progress** ([`progress`]) - Optional callbacks for reporting read progress

pub mod io;
pub mod models;
pub mod progress;
pub mod utils;
