use crate::core::io::traits::StructureFile;
use crate::core::models::atom::Atom;
use crate::core::models::error::ModelError;
use crate::core::models::structure::Structure;
use crate::core::progress::{Progress, ProgressReporter};
use nalgebra::Point3;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;
use tracing::{info, instrument, trace};

const RECORD_PREFIX: &str = "ATOM";

// 0-based half-open byte ranges of each field.
const SERIAL: (usize, usize) = (7, 11);
const ATOM_NAME: (usize, usize) = (13, 16);
const RESIDUE_NAME: (usize, usize) = (17, 20);
const CHAIN: usize = 21;
const RESIDUE_SEQ: (usize, usize) = (23, 26);
const COORDINATES: (usize, usize) = (31, 54);
const ELEMENT: (usize, usize) = (76, 78);

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("Cannot open '{path}': {source}", path = path.display())]
    FileAccess {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse { line: usize, kind: ParseErrorKind },
    #[error("Invalid record on line {line}: {source}")]
    Model {
        line: usize,
        #[source]
        source: ModelError,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    #[error("Invalid integer format in columns {columns} (value: '{value}')")]
    InvalidInt { columns: &'static str, value: String },
    #[error("Invalid float format in columns {columns} (value: '{value}')")]
    InvalidFloat { columns: &'static str, value: String },
    #[error("Expected 3 coordinates in columns 32-54, found {found}")]
    CoordinateCount { found: usize },
    #[error("Line is too short for an ATOM record ({length} chars, chain id is column 22)")]
    LineTooShort { length: usize },
    #[error("Non-ASCII character '{character}' in column {column}")]
    NonAscii { column: usize, character: char },
}

fn slice_and_trim(line: &str, (start, end): (usize, usize)) -> &str {
    let end = end.min(line.len());
    line.get(start..end).unwrap_or("").trim()
}

fn parse_int<T: FromStr>(
    line: &str,
    range: (usize, usize),
    columns: &'static str,
) -> Result<T, ParseErrorKind> {
    let value = slice_and_trim(line, range);
    value.parse().map_err(|_| ParseErrorKind::InvalidInt {
        columns,
        value: value.to_string(),
    })
}

fn parse_chain(line: &str) -> Result<Option<char>, ParseErrorKind> {
    let c = line
        .get(CHAIN..)
        .and_then(|rest| rest.chars().next())
        .ok_or(ParseErrorKind::LineTooShort { length: line.len() })?;
    Ok((!c.is_whitespace()).then_some(c))
}

// Coordinates are whitespace-split inside their column window rather than
// cut at fixed widths.
fn parse_coordinates(line: &str) -> Result<Point3<f64>, ParseErrorKind> {
    let values = slice_and_trim(line, COORDINATES)
        .split_whitespace()
        .map(|token| {
            token.parse::<f64>().map_err(|_| ParseErrorKind::InvalidFloat {
                columns: "32-54",
                value: token.to_string(),
            })
        })
        .collect::<Result<Vec<_>, _>>()?;
    match values.as_slice() {
        &[x, y, z] => Ok(Point3::new(x, y, z)),
        other => Err(ParseErrorKind::CoordinateCount { found: other.len() }),
    }
}

/// Parses one line of a PDB file.
///
/// Returns `Ok(None)` for any line that does not start with `ATOM`; such
/// lines (`HETATM`, `TER`, headers, blank lines) are skipped, not rejected.
///
/// # Errors
///
/// Returns a [`ParseErrorKind`] if an `ATOM` line has a malformed serial,
/// residue number or coordinate, is too short to carry a chain column, or
/// contains non-ASCII text (columns are counted in bytes).
pub fn parse_atom_line(line: &str) -> Result<Option<Atom>, ParseErrorKind> {
    if !line.starts_with(RECORD_PREFIX) {
        return Ok(None);
    }
    if let Some((index, character)) = line.chars().enumerate().find(|(_, c)| !c.is_ascii()) {
        return Err(ParseErrorKind::NonAscii {
            column: index + 1,
            character,
        });
    }

    let serial: isize = parse_int(line, SERIAL, "8-11")?;
    let name = slice_and_trim(line, ATOM_NAME);
    let residue_name = slice_and_trim(line, RESIDUE_NAME);
    let chain = parse_chain(line)?;
    let residue_number: isize = parse_int(line, RESIDUE_SEQ, "24-26")?;
    let element = slice_and_trim(line, ELEMENT);
    let position = parse_coordinates(line)?;

    let mut atom = Atom::new(serial, name, residue_name, residue_number, position)
        .with_element(element);
    atom.chain = chain;
    Ok(Some(atom))
}

pub struct PdbFile;

impl StructureFile for PdbFile {
    type Error = PdbError;

    #[instrument(skip_all, name = "pdb_read")]
    fn read_from_with_progress(
        reader: &mut impl BufRead,
        reporter: &ProgressReporter,
    ) -> Result<Structure, Self::Error> {
        reporter.report(Progress::PhaseStart {
            name: "Reading ATOM records",
        });

        let mut structure = Structure::new();
        let mut skipped = 0usize;

        for (line_num, line_res) in reader.lines().enumerate() {
            let line = line_res?;
            let line_num = line_num + 1;

            let parsed = parse_atom_line(&line).map_err(|kind| PdbError::Parse {
                line: line_num,
                kind,
            })?;
            match parsed {
                Some(atom) => {
                    structure
                        .add_atom(atom)
                        .map_err(|source| PdbError::Model {
                            line: line_num,
                            source,
                        })?;
                    reporter.report(Progress::RecordParsed);
                }
                None => {
                    trace!(line = line_num, "Skipping non-ATOM line.");
                    skipped += 1;
                }
            }
        }

        info!(
            atoms = structure.atom_count(),
            residues = structure.residue_count(),
            skipped,
            "Finished reading PDB records."
        );
        if skipped > 0 {
            reporter.report(Progress::Message(format!(
                "{} non-ATOM lines skipped",
                skipped
            )));
        }
        reporter.report(Progress::PhaseFinish);

        Ok(structure)
    }

    fn open_error(path: &Path, source: io::Error) -> Self::Error {
        PdbError::FileAccess {
            path: path.to_path_buf(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::models::residue::BOND_DISTANCE_THRESHOLD;
    use crate::core::utils::geometry;
    use std::io::{BufReader, Cursor, Write};
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tempfile::NamedTempFile;

    #[allow(clippy::too_many_arguments)]
    fn atom_line(
        serial: isize,
        name: &str,
        res_name: &str,
        chain: char,
        res_seq: isize,
        pos: [f64; 3],
        element: &str,
    ) -> String {
        format!(
            "ATOM  {:>5}  {:<3} {:>3} {}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}          {:>2}",
            serial, name, res_name, chain, res_seq, pos[0], pos[1], pos[2], 1.0, 20.0, element
        )
    }

    fn sample_pdb() -> String {
        [
            "HEADER    TEST PEPTIDE".to_string(),
            "REMARK   1 GENERATED FOR UNIT TESTS".to_string(),
            atom_line(1, "N", "GLY", 'A', 1, [0.0, 0.0, 0.0], "N"),
            atom_line(2, "CA", "GLY", 'A', 1, [1.5, 0.0, 0.0], "C"),
            atom_line(3, "C", "GLY", 'A', 1, [2.9, 0.0, 0.0], "C"),
            atom_line(4, "O", "GLY", 'A', 1, [3.5, 1.0, 0.0], "O"),
            String::new(),
            atom_line(5, "N", "ALA", 'A', 2, [3.6, -1.2, 0.0], "N"),
            atom_line(6, "CA", "ALA", 'A', 2, [5.0, -1.2, 0.0], "C"),
            atom_line(7, "C", "ALA", 'A', 2, [5.7, 0.0, 0.0], "C"),
            atom_line(8, "CB", "ALA", 'A', 2, [5.5, -2.1, 1.1], "C"),
            "HETATM    9  O   HOH A 101      10.000  10.000  10.000  1.00 20.00           O"
                .to_string(),
            "TER       9      ALA A   2".to_string(),
            "END".to_string(),
        ]
        .join("\n")
    }

    fn read_str(content: &str) -> Result<Structure, PdbError> {
        PdbFile::read_from(&mut BufReader::new(Cursor::new(content.as_bytes())))
    }

    #[test]
    fn parses_fixed_columns_of_a_standard_atom_line() {
        let line = "ATOM      1  N   MET A   1      38.198  19.582  28.998  1.00 40.86           N";
        let atom = parse_atom_line(line).unwrap().unwrap();
        assert_eq!(atom.serial, 1);
        assert_eq!(atom.name, "N");
        assert_eq!(atom.residue_name, "MET");
        assert_eq!(atom.chain, Some('A'));
        assert_eq!(atom.residue_number, 1);
        assert_eq!(atom.position, Point3::new(38.198, 19.582, 28.998));
        assert_eq!(atom.element, "N");
    }

    #[test]
    fn parsing_is_deterministic() {
        let line = atom_line(17, "CB", "SER", 'B', 42, [-1.25, 3.5, 7.125], "C");
        assert_eq!(parse_atom_line(&line), parse_atom_line(&line));
    }

    #[test]
    fn non_atom_lines_are_skipped() {
        for line in [
            "",
            "HEADER    PROTEIN",
            "HETATM    9  O   HOH A 101      10.000  10.000  10.000  1.00 20.00           O",
            "TER",
            "END",
            "atom      1  N   MET A   1      38.198  19.582  28.998",
            " ATOM     1  N   MET A   1      38.198  19.582  28.998",
        ] {
            assert_eq!(parse_atom_line(line), Ok(None), "line: {line:?}");
        }
    }

    #[test]
    fn blank_chain_and_missing_element_are_empty() {
        let line = "ATOM      5  CA  GLY     7       1.000   2.000   3.000";
        let atom = parse_atom_line(line).unwrap().unwrap();
        assert_eq!(atom.chain, None);
        assert_eq!(atom.element, "");
        assert_eq!(atom.residue_number, 7);
        assert_eq!(atom.position, Point3::new(1.0, 2.0, 3.0));
    }

    #[test]
    fn malformed_serial_is_an_error() {
        let line = "ATOM    x1  N   MET A   1      38.198  19.582  28.998  1.00 40.86           N";
        assert_eq!(
            parse_atom_line(line),
            Err(ParseErrorKind::InvalidInt {
                columns: "8-11",
                value: "x1".to_string()
            })
        );
    }

    #[test]
    fn malformed_residue_number_is_an_error() {
        let line = "ATOM      1  N   MET A  1a      38.198  19.582  28.998  1.00 40.86           N";
        assert!(matches!(
            parse_atom_line(line),
            Err(ParseErrorKind::InvalidInt { columns: "24-26", .. })
        ));
    }

    #[test]
    fn malformed_coordinate_is_an_error() {
        let line = "ATOM      1  N   MET A   1      38.198  19.5x2  28.998  1.00 40.86           N";
        assert_eq!(
            parse_atom_line(line),
            Err(ParseErrorKind::InvalidFloat {
                columns: "32-54",
                value: "19.5x2".to_string()
            })
        );
    }

    #[test]
    fn missing_coordinate_is_an_error() {
        let line = "ATOM      1  N   MET A   1      38.198  19.582";
        assert_eq!(
            parse_atom_line(line),
            Err(ParseErrorKind::CoordinateCount { found: 2 })
        );
    }

    #[test]
    fn line_without_chain_column_is_too_short() {
        let line = "ATOM      1  N   MET";
        assert_eq!(
            parse_atom_line(line),
            Err(ParseErrorKind::LineTooShort { length: 20 })
        );
    }

    #[test]
    fn reads_structure_from_reader() {
        let structure = read_str(&sample_pdb()).unwrap();
        assert_eq!(structure.atom_count(), 8);
        assert_eq!(structure.residue_count(), 2);

        let gly = structure.residue(1).unwrap();
        assert_eq!(gly.name(), "GLY");
        let names: Vec<_> = gly.atoms().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["N", "CA", "C", "O"]);

        assert!(structure.residue(101).is_err());
    }

    #[test]
    fn reparsing_yields_identical_models() {
        let first = read_str(&sample_pdb()).unwrap();
        let second = read_str(&sample_pdb()).unwrap();

        let a: Vec<_> = first.residues().flat_map(|r| r.atoms()).collect();
        let b: Vec<_> = second.residues().flat_map(|r| r.atoms()).collect();
        assert_eq!(a, b);
        assert_eq!(first.backbone(true), second.backbone(true));
    }

    #[test]
    fn worked_example_backbone_and_bonds() {
        let structure = read_str(&sample_pdb()).unwrap();
        let gly = structure.residue(1).unwrap();
        assert_eq!(
            gly.backbone().unwrap(),
            [
                Point3::new(0.0, 0.0, 0.0),
                Point3::new(1.5, 0.0, 0.0),
                Point3::new(2.9, 0.0, 0.0),
            ]
        );

        let pairs: Vec<_> = gly
            .bonds()
            .map(|(a, b)| (a.name.clone(), b.name.clone()))
            .collect();
        assert!(pairs.contains(&("N".to_string(), "CA".to_string())));
        assert!(!pairs.iter().any(|(a, b)| {
            (a == "N" && b == "C") || (a == "C" && b == "N")
        }));
        for (a, b) in gly.bonds() {
            assert!(geometry::distance(&a.position, &b.position) < BOND_DISTANCE_THRESHOLD);
        }
    }

    #[test]
    fn duplicate_serial_aborts_the_read() {
        let content = [
            atom_line(42, "N", "GLY", 'A', 1, [0.0, 0.0, 0.0], "N"),
            atom_line(42, "CA", "GLY", 'A', 1, [1.5, 0.0, 0.0], "C"),
        ]
        .join("\n");
        let err = read_str(&content).unwrap_err();
        assert!(matches!(
            err,
            PdbError::Model {
                line: 2,
                source: ModelError::DuplicateAtomId { serial: 42 }
            }
        ));
    }

    #[test]
    fn parse_error_reports_line_number() {
        let content = [
            "HEADER    TEST".to_string(),
            atom_line(1, "N", "GLY", 'A', 1, [0.0, 0.0, 0.0], "N"),
            "ATOM      2  CA  GLY A   1       1.500   abc     0.000".to_string(),
        ]
        .join("\n");
        let err = read_str(&content).unwrap_err();
        assert!(matches!(
            err,
            PdbError::Parse {
                line: 3,
                kind: ParseErrorKind::InvalidFloat { .. }
            }
        ));
    }

    #[test]
    fn reads_from_path() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", sample_pdb()).unwrap();
        let structure = Structure::read(file.path()).unwrap();
        assert_eq!(structure.atom_count(), 8);
    }

    #[test]
    fn missing_file_is_a_file_access_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent.pdb");
        let err = PdbFile::read_from_path(&path).unwrap_err();
        match err {
            PdbError::FileAccess { path: p, source } => {
                assert_eq!(p, path);
                assert_eq!(source.kind(), io::ErrorKind::NotFound);
            }
            other => panic!("expected FileAccess, got {other:?}"),
        }
    }

    #[test]
    fn progress_reports_one_event_per_record() {
        let count = AtomicUsize::new(0);
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if matches!(event, Progress::RecordParsed) {
                count.fetch_add(1, Ordering::SeqCst);
            }
        }));
        let content = sample_pdb();
        PdbFile::read_from_with_progress(
            &mut BufReader::new(Cursor::new(content.as_bytes())),
            &reporter,
        )
        .unwrap();
        drop(reporter);
        assert_eq!(count.load(Ordering::SeqCst), 8);
    }

    #[test]
    fn skipped_lines_are_reported_as_a_message() {
        let messages = Mutex::new(Vec::new());
        let reporter = ProgressReporter::with_callback(Box::new(|event| {
            if let Progress::Message(msg) = event {
                messages.lock().unwrap().push(msg);
            }
        }));
        let content = sample_pdb();
        PdbFile::read_from_with_progress(
            &mut BufReader::new(Cursor::new(content.as_bytes())),
            &reporter,
        )
        .unwrap();
        drop(reporter);
        assert_eq!(
            messages.into_inner().unwrap(),
            vec!["6 non-ATOM lines skipped".to_string()]
        );
    }

    #[test]
    fn negative_serial_is_accepted() {
        let line = "ATOM     -1  N   MET A   1      38.198  19.582  28.998  1.00 40.86           N";
        let atom = parse_atom_line(line).unwrap().unwrap();
        assert_eq!(atom.serial, -1);
        assert_eq!(atom.residue_name, "MET");
    }

    #[test]
    fn non_ascii_atom_line_names_the_offending_column() {
        let line = "ATOM      1  N   MÉT A   1      38.198  19.582  28.998  1.00 40.86           N";
        assert_eq!(
            parse_atom_line(line),
            Err(ParseErrorKind::NonAscii {
                column: 19,
                character: 'É'
            })
        );
        assert_eq!(parse_atom_line("REMARK   café"), Ok(None));
    }
}
