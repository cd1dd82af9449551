use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::WriterError;
use crate::rows::SqlRow;
use crate::sql::render_row;

/// Write `rows` into a transaction-wrapped SQL file, `chunk_size` rows per
/// INSERT statement.
///
/// Returns the number of rows written.
pub fn write_table_file<T: SqlRow>(
    path: &Path,
    rows: &[T],
    chunk_size: usize,
) -> Result<usize, WriterError> {
    let io_err = |source| WriterError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_err)?;
    let mut out = BufWriter::new(file);

    write_table(&mut out, rows, chunk_size).map_err(io_err)?;
    out.flush().map_err(io_err)?;

    Ok(rows.len())
}

/// Layout shared by every table file.
pub fn write_table<T: SqlRow, W: Write>(
    out: &mut W,
    rows: &[T],
    chunk_size: usize,
) -> std::io::Result<()> {
    writeln!(out, "-- {}", T::TABLE)?;
    writeln!(out, "BEGIN;")?;
    writeln!(out)?;

    let columns = T::COLUMNS.join(", ");
    for chunk in rows.chunks(chunk_size.max(1)) {
        writeln!(out, "INSERT INTO {} ({columns}) VALUES", T::TABLE)?;
        let values: Vec<String> = chunk.iter().map(|row| render_row(&row.values())).collect();
        writeln!(out, "{};", values.join(",\n"))?;
        writeln!(out)?;
    }

    writeln!(out, "COMMIT;")?;
    Ok(())
}

/// One `setval` line per table, for schemas that declare the ids as SERIAL.
pub fn sequence_reset(table: &str, id_column: &str) -> String {
    format!(
        "SELECT setval('{table}_{id_column}_seq', (SELECT COALESCE(MAX({id_column}),0) FROM {table}), true);"
    )
}

pub fn write_sequences_file(path: &Path, tables: &[(&str, &str)]) -> Result<(), WriterError> {
    let io_err = |source| WriterError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut out = BufWriter::new(File::create(path).map_err(io_err)?);
    let mut write = || -> std::io::Result<()> {
        writeln!(
            out,
            "-- Set sequences to the current max values (use if your DDL used SERIAL for ids)"
        )?;
        writeln!(out)?;
        for (table, id_column) in tables {
            writeln!(out, "{}", sequence_reset(table, id_column))?;
        }
        out.flush()
    };
    write().map_err(io_err)
}
