use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    #[error("Duplicate atom serial number: {serial}")]
    DuplicateAtomId { serial: isize },

    #[error("Residue {number} not found in structure")]
    ResidueNotFound { number: isize },

    #[error("Atom '{atom}' not found in residue {residue}")]
    MissingAtom { residue: isize, atom: String },

    #[error("Structure contains no atoms")]
    EmptyStructure,
}
