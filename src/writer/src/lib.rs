//! SQL emission for generated datasets.
//!
//! Every table lands in its own file as a single transaction of chunked
//! multi-row INSERT statements with explicit ids.

use std::fs;
use std::path::{Path, PathBuf};

use common::config::OutputConfig;
use generator::Dataset;
use generator::records::{
    Department, Employee, EmployeeLicense, OnCallShift, PayrollEntry, Position,
};

pub mod rows;
pub mod sql;
pub mod storage;

pub use rows::SqlRow;
pub use sql::SqlValue;
pub use storage::{write_sequences_file, write_table_file};

pub const SEQUENCES_FILE: &str = "set_sequences.sql";

#[derive(thiserror::Error, Debug)]
pub enum WriterError {
    #[error("Failed to create output directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to write {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Files written by one emission, in write order.
#[derive(Debug, Clone, Default)]
pub struct EmittedFiles {
    pub files: Vec<(String, PathBuf)>,
}

impl EmittedFiles {
    pub fn get(&self, key: &str) -> Option<&Path> {
        self.files
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, path)| path.as_path())
    }
}

/// Writes a [`Dataset`] as one SQL file per table.
pub struct SqlEmitter {
    out_dir: PathBuf,
    chunk_size: usize,
    write_sequences: bool,
}

impl From<&OutputConfig> for SqlEmitter {
    fn from(config: &OutputConfig) -> Self {
        Self::new(&config.dir, config.chunk_size, config.write_sequences)
    }
}

impl SqlEmitter {
    pub fn new(out_dir: impl Into<PathBuf>, chunk_size: usize, write_sequences: bool) -> Self {
        Self {
            out_dir: out_dir.into(),
            chunk_size,
            write_sequences,
        }
    }

    pub fn emit(&self, dataset: &Dataset) -> Result<EmittedFiles, WriterError> {
        fs::create_dir_all(&self.out_dir).map_err(|source| WriterError::CreateDir {
            path: self.out_dir.clone(),
            source,
        })?;

        let mut emitted = EmittedFiles::default();
        self.table::<Department>(&dataset.departments, &mut emitted)?;
        self.table::<Position>(&dataset.positions, &mut emitted)?;
        self.table::<Employee>(&dataset.employees, &mut emitted)?;
        self.table::<PayrollEntry>(&dataset.payroll, &mut emitted)?;
        self.table::<EmployeeLicense>(&dataset.licenses, &mut emitted)?;
        self.table::<OnCallShift>(&dataset.shifts, &mut emitted)?;

        if self.write_sequences {
            let path = self.out_dir.join(SEQUENCES_FILE);
            write_sequences_file(
                &path,
                &[
                    (Department::TABLE, Department::ID_COLUMN),
                    (Position::TABLE, Position::ID_COLUMN),
                    (Employee::TABLE, Employee::ID_COLUMN),
                    (PayrollEntry::TABLE, PayrollEntry::ID_COLUMN),
                    (EmployeeLicense::TABLE, EmployeeLicense::ID_COLUMN),
                    (OnCallShift::TABLE, OnCallShift::ID_COLUMN),
                ],
            )?;
            log::debug!("Wrote sequence resets to {}", path.display());
            emitted.files.push(("sequences".to_string(), path));
        }

        Ok(emitted)
    }

    fn table<T: SqlRow>(&self, rows: &[T], emitted: &mut EmittedFiles) -> Result<(), WriterError> {
        let _span = tracing::debug_span!("write_table", table = T::TABLE).entered();

        let path = self.out_dir.join(format!("{}.sql", T::TABLE));
        let written = write_table_file(&path, rows, self.chunk_size)?;
        log::info!("Wrote {written} rows to {}", path.display());

        emitted.files.push((T::TABLE.to_string(), path));
        Ok(())
    }
}
