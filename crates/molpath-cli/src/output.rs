use crate::cli::OutputFormat;
use crate::error::Result;
use serde::Serialize;
use std::io::Write;

const COLUMN_GAP: &str = "  ";

/// Formats a coordinate or distance the way PDB files print them.
pub fn fixed3(value: f64) -> String {
    format!("{:.3}", value)
}

/// Writes `rows` to `out`, with a header row taken from the row type's field names.
///
/// Nothing is written for an empty slice.
pub fn write_rows<W: Write, R: Serialize>(
    out: &mut W,
    format: OutputFormat,
    rows: &[R],
) -> Result<()> {
    match format {
        OutputFormat::Csv => write_csv(out, rows),
        OutputFormat::Table => write_table(out, rows),
    }
}

fn write_csv<W: Write, R: Serialize>(out: &mut W, rows: &[R]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_table<W: Write, R: Serialize>(out: &mut W, rows: &[R]) -> Result<()> {
    let mut buffer = Vec::new();
    write_csv(&mut buffer, rows)?;

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .from_reader(buffer.as_slice());
    let records = reader
        .records()
        .collect::<std::result::Result<Vec<_>, _>>()?;

    let columns = records.iter().map(|r| r.len()).max().unwrap_or(0);
    let mut widths = vec![0usize; columns];
    for record in &records {
        for (i, field) in record.iter().enumerate() {
            widths[i] = widths[i].max(field.chars().count());
        }
    }

    for record in &records {
        let line = record
            .iter()
            .enumerate()
            .map(|(i, field)| format!("{:<width$}", field, width = widths[i]))
            .collect::<Vec<_>>()
            .join(COLUMN_GAP);
        writeln!(out, "{}", line.trim_end())?;
    }
    Ok(())
}
