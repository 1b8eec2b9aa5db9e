use crate::core::models::structure::Structure;
use crate::core::progress::ProgressReporter;
use std::error::Error;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;

/// Defines the interface for reading a molecular file format into a [`Structure`].
///
/// Implementors only provide the streaming parser; opening files and the
/// progress-less variants come for free.
pub trait StructureFile {
    /// The error type for read operations.
    type Error: Error + From<io::Error>;

    /// Reads a structure from a buffered reader, reporting progress as it goes.
    ///
    /// # Arguments
    ///
    /// * `reader` - The buffered reader to read from.
    /// * `reporter` - Receives phase and per-record progress events.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from_with_progress(
        reader: &mut impl BufRead,
        reporter: &ProgressReporter,
    ) -> Result<Structure, Self::Error>;

    /// Converts a failure to open `path` into this format's error type.
    fn open_error(_path: &Path, source: io::Error) -> Self::Error {
        source.into()
    }

    /// Reads a structure from a buffered reader.
    ///
    /// # Errors
    ///
    /// Returns an error if parsing fails or I/O operations encounter issues.
    fn read_from(reader: &mut impl BufRead) -> Result<Structure, Self::Error> {
        Self::read_from_with_progress(reader, &ProgressReporter::new())
    }

    /// Reads a structure from a file path, reporting progress as it goes.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path_with_progress<P: AsRef<Path>>(
        path: P,
        reporter: &ProgressReporter,
    ) -> Result<Structure, Self::Error> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| Self::open_error(path, e))?;
        let mut reader = BufReader::new(file);
        Self::read_from_with_progress(&mut reader, reporter)
    }

    /// Reads a structure from a file path.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened or parsing fails.
    fn read_from_path<P: AsRef<Path>>(path: P) -> Result<Structure, Self::Error> {
        Self::read_from_path_with_progress(path, &ProgressReporter::new())
    }
}
