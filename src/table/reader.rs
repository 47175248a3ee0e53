//! Reading tables from delimited text and workbooks.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use super::{Table, TableError};

/// On-disk table formats, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableFormat {
    Csv,
    Tsv,
    Workbook,
}

impl TableFormat {
    /// Detect the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(Self::Csv),
            "tsv" | "tab" | "txt" => Some(Self::Tsv),
            "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Some(Self::Workbook),
            _ => None,
        }
    }
}

/// Read a table whose first row holds the column names.
///
/// `sheet` selects a worksheet by name for workbooks; the first sheet is
/// used otherwise. Blank cells become `None`.
///
/// # Errors
///
/// Returns an error for unknown extensions, unreadable files, ragged rows,
/// or a file without a header row.
pub fn read_table(path: &Path, sheet: Option<&str>) -> Result<Table, TableError> {
    let format = TableFormat::from_path(path)
        .ok_or_else(|| TableError::UnsupportedFormat(path.display().to_string()))?;
    tracing::debug!(path = %path.display(), ?format, "reading table");
    match format {
        TableFormat::Csv => read_delimited(path, b','),
        TableFormat::Tsv => read_delimited(path, b'\t'),
        TableFormat::Workbook => read_workbook(path, sheet),
    }
}

fn read_delimited(path: &Path, delimiter: u8) -> Result<Table, TableError> {
    let wrap = |source: csv::Error| TableError::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .has_headers(true)
        .flexible(false)
        .from_path(path)
        .map_err(wrap)?;

    let headers = reader
        .headers()
        .map_err(wrap)?
        .iter()
        .map(|h| h.trim().to_string())
        .collect::<Vec<_>>();
    if headers.is_empty() {
        return Err(TableError::EmptySheet(path.to_path_buf()));
    }

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record.map_err(wrap)?;
        rows.push(record.iter().map(cell_text).collect());
    }
    Table::from_rows(headers, rows)
}

fn read_workbook(path: &Path, sheet: Option<&str>) -> Result<Table, TableError> {
    let workbook_error = |message: String| TableError::Workbook {
        path: path.to_path_buf(),
        message,
    };
    let mut workbook = open_workbook_auto(path).map_err(|e| workbook_error(e.to_string()))?;

    let name = match sheet {
        Some(name) => name.to_string(),
        None => workbook
            .sheet_names()
            .first()
            .cloned()
            .ok_or_else(|| workbook_error("workbook has no sheets".to_string()))?,
    };
    let range = workbook
        .worksheet_range(&name)
        .map_err(|e| workbook_error(format!("sheet {name}: {e}")))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .ok_or_else(|| TableError::EmptySheet(path.to_path_buf()))?
        .iter()
        .map(|c| data_text(c).unwrap_or_default())
        .collect::<Vec<_>>();

    // calamine ranges are rectangular, so every row matches the header width.
    let body = rows
        .map(|row| row.iter().map(data_text).collect())
        .collect();
    Table::from_rows(headers, body)
}

fn cell_text(raw: &str) -> Option<String> {
    (!raw.is_empty()).then(|| raw.to_string())
}

fn data_text(cell: &Data) -> Option<String> {
    match cell {
        Data::Empty => None,
        Data::String(s) => cell_text(s),
        other => cell_text(&other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_format_detection_is_case_insensitive() {
        assert_eq!(TableFormat::from_path(Path::new("a.CSV")), Some(TableFormat::Csv));
        assert_eq!(TableFormat::from_path(Path::new("a.tsv")), Some(TableFormat::Tsv));
        assert_eq!(TableFormat::from_path(Path::new("a.txt")), Some(TableFormat::Tsv));
        assert_eq!(
            TableFormat::from_path(Path::new("genes.xlsx")),
            Some(TableFormat::Workbook)
        );
        assert_eq!(TableFormat::from_path(Path::new("notes.md")), None);
        assert_eq!(TableFormat::from_path(Path::new("noext")), None);
    }

    #[test]
    fn test_read_csv_maps_empty_cells_to_none_and_keeps_values() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sets.csv");
        std::fs::write(&path, "Set1,Set2\nA,B\n, C \n").unwrap();

        let table = read_table(&path, None).unwrap();

        assert_eq!(table.headers, vec!["Set1", "Set2"]);
        assert_eq!(
            table.column("Set1").unwrap(),
            &[Some("A".to_string()), None]
        );
        assert_eq!(
            table.column("Set2").unwrap(),
            &[Some("B".to_string()), Some(" C ".to_string())]
        );
    }

    #[test]
    fn test_read_tsv_uses_tab_delimiter() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("sets.tsv");
        std::fs::write(&path, "up\tdown\ngene,1\tgene2\n").unwrap();

        let table = read_table(&path, None).unwrap();

        assert_eq!(table.column_count(), 2);
        assert_eq!(table.column("up").unwrap(), &[Some("gene,1".to_string())]);
    }

    #[test]
    fn test_read_csv_rejects_ragged_rows() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        std::fs::write(&path, "a,b\n1,2\n3\n").unwrap();

        let err = read_table(&path, None).unwrap_err();
        assert!(matches!(err, TableError::Csv { .. }), "got {err:?}");
    }

    #[test]
    fn test_unknown_extension_is_rejected() {
        let err = read_table(Path::new("sets.json"), None).unwrap_err();
        assert!(matches!(err, TableError::UnsupportedFormat(_)));
    }

    #[test]
    fn test_missing_workbook_reports_path() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.xlsx");

        let err = read_table(&path, None).unwrap_err();
        assert!(err.to_string().contains("absent.xlsx"));
    }
}
