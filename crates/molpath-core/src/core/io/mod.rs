//! Provides input functionality for molecular file formats.
//!
//! The PDB reader builds a [`Structure`](crate::core::models::structure::Structure)
//! from fixed-column `ATOM` records; [`traits::StructureFile`] is the common
//! reading interface.

pub mod pdb;
pub mod traits;
