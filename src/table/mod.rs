//! Column-oriented tables of optional strings.
//!
//! Input tables arrive from CSV/TSV files or workbooks (see [`read_table`]);
//! the Venn tabulation hands one back with short columns padded by `None`.

mod reader;

pub use reader::{TableFormat, read_table};

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Errors raised while building, reading, or writing a [`Table`].
#[derive(Debug, Error)]
pub enum TableError {
    #[error("unsupported table format: {0}")]
    UnsupportedFormat(String),

    #[error("failed to read {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("failed to read workbook {path}: {message}")]
    Workbook { path: PathBuf, message: String },

    #[error("no header row in {0}")]
    EmptySheet(PathBuf),

    #[error("row {row} has {found} cells, expected {expected}")]
    Ragged {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column {column} has {found} cells, expected {expected}")]
    UnevenColumn {
        column: String,
        expected: usize,
        found: usize,
    },

    #[error("{headers} headers for {columns} columns")]
    HeaderMismatch { headers: usize, columns: usize },

    #[error("duplicate column name: {0}")]
    DuplicateHeader(String),

    #[error("column {0} has an empty name")]
    EmptyHeader(usize),
}

/// A rectangular grid with named columns. `None` marks a missing cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Table {
    pub headers: Vec<String>,
    pub columns: Vec<Vec<Option<String>>>,
}

impl Table {
    /// Build a table from columns, checking that it is rectangular.
    ///
    /// # Errors
    ///
    /// Returns an error when the shape or the headers are invalid; see
    /// [`Table::validate`].
    pub fn from_columns(
        headers: Vec<String>,
        columns: Vec<Vec<Option<String>>>,
    ) -> Result<Self, TableError> {
        let table = Self { headers, columns };
        table.validate()?;
        Ok(table)
    }

    /// Build a table from rows of cells.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Ragged`] when a row's length differs from the
    /// header count, or any error from [`Table::validate`].
    pub fn from_rows(
        headers: Vec<String>,
        rows: Vec<Vec<Option<String>>>,
    ) -> Result<Self, TableError> {
        let width = headers.len();
        let mut columns = vec![Vec::with_capacity(rows.len()); width];
        for (index, row) in rows.into_iter().enumerate() {
            if row.len() != width {
                return Err(TableError::Ragged {
                    row: index + 1,
                    expected: width,
                    found: row.len(),
                });
            }
            for (column, cell) in columns.iter_mut().zip(row) {
                column.push(cell);
            }
        }
        Self::from_columns(headers, columns)
    }

    /// Check that every column has a unique, non-empty name and that all
    /// columns have the same length.
    ///
    /// # Errors
    ///
    /// Returns the first problem found.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.headers.len() != self.columns.len() {
            return Err(TableError::HeaderMismatch {
                headers: self.headers.len(),
                columns: self.columns.len(),
            });
        }

        let mut seen = HashSet::new();
        for (index, name) in self.headers.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(TableError::EmptyHeader(index + 1));
            }
            if !seen.insert(name.as_str()) {
                return Err(TableError::DuplicateHeader(name.clone()));
            }
        }

        let expected = self.row_count();
        for (name, column) in self.headers.iter().zip(&self.columns) {
            if column.len() != expected {
                return Err(TableError::UnevenColumn {
                    column: name.clone(),
                    expected,
                    found: column.len(),
                });
            }
        }
        Ok(())
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Length of the first column (all columns agree once validated).
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, Vec::len)
    }

    pub fn column(&self, name: &str) -> Option<&[Option<String>]> {
        self.headers
            .iter()
            .position(|h| h == name)
            .map(|index| self.columns[index].as_slice())
    }

    /// Cells of row `index`, left to right.
    pub fn row(&self, index: usize) -> Option<Vec<Option<&str>>> {
        if index >= self.row_count() {
            return None;
        }
        Some(
            self.columns
                .iter()
                .map(|column| column.get(index).and_then(Option::as_deref))
                .collect(),
        )
    }

    /// Write the table as CSV; missing cells become empty fields.
    ///
    /// # Errors
    ///
    /// Returns [`TableError::Csv`] if the file cannot be created or written.
    pub fn write_csv(&self, path: &Path) -> Result<(), TableError> {
        let wrap = |source: csv::Error| TableError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = csv::Writer::from_path(path).map_err(wrap)?;
        writer.write_record(&self.headers).map_err(wrap)?;
        for index in 0..self.row_count() {
            let row = self.row(index).unwrap_or_default();
            writer
                .write_record(row.iter().map(|cell| cell.unwrap_or("")))
                .map_err(wrap)?;
        }
        writer
            .flush()
            .map_err(|err| wrap(csv::Error::from(err)))
    }
}
