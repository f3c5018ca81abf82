//! CSV dataset loading
//!
//! Reads the bundled segregation-energy table into typed columns. Column
//! names and row order are kept exactly as stored in the file.

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::errors::{EsegError, Result};
use crate::features::REQUIRED_COLUMNS;

/// Values of a single column
#[derive(Clone, Debug, PartialEq)]
pub enum ColumnData {
    /// Every non-empty cell parsed as a float; empty cells are NaN
    Numeric(Vec<f64>),
    /// Free text, e.g. host metal symbols
    Categorical(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Numeric(values) => values.len(),
            ColumnData::Categorical(values) => values.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Named column
#[derive(Clone, Debug, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

/// Tabular dataset with ordered, named, typed columns
#[derive(Clone, Debug, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    rows: usize,
}

impl Table {
    /// Build a table from columns, all of which must have the same length
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let rows = columns.first().map(|c| c.data.len()).unwrap_or(0);
        for column in &columns {
            if column.data.len() != rows {
                return Err(EsegError::RaggedColumn {
                    column: column.name.clone(),
                    expected: rows,
                    got: column.data.len(),
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// Parse CSV with a header row, inferring each column's type
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_reader(reader);

        let headers: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.to_string())
            .collect();

        let mut cells: Vec<Vec<String>> = vec![Vec::new(); headers.len()];
        for record in csv_reader.records() {
            let record = record?;
            for (idx, cell) in record.iter().enumerate() {
                cells[idx].push(cell.to_string());
            }
        }

        let columns = headers
            .into_iter()
            .zip(cells)
            .map(|(name, raw)| Column {
                data: infer_column(raw),
                name,
            })
            .collect();

        Self::from_columns(columns)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Column names in file order
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Numeric values of a column
    pub fn numeric(&self, name: &str) -> Result<&[f64]> {
        match self.column(name) {
            Some(Column {
                data: ColumnData::Numeric(values),
                ..
            }) => Ok(values),
            Some(_) => Err(EsegError::NonNumericColumn(name.to_string())),
            None => Err(EsegError::MissingColumn(name.to_string())),
        }
    }

    /// Text values of a column
    pub fn categorical(&self, name: &str) -> Result<&[String]> {
        match self.column(name) {
            Some(Column {
                data: ColumnData::Categorical(values),
                ..
            }) => Ok(values),
            Some(_) => Err(EsegError::NonCategoricalColumn(name.to_string())),
            None => Err(EsegError::MissingColumn(name.to_string())),
        }
    }

    /// Column values as display labels, whatever the column type
    pub fn labels(&self, name: &str) -> Result<Vec<String>> {
        match self.column(name) {
            Some(Column {
                data: ColumnData::Categorical(values),
                ..
            }) => Ok(values.clone()),
            Some(Column {
                data: ColumnData::Numeric(values),
                ..
            }) => Ok(values.iter().map(|v| v.to_string()).collect()),
            None => Err(EsegError::MissingColumn(name.to_string())),
        }
    }

    /// Copy of the table with a numeric column appended (or replaced)
    pub fn with_numeric_column(&self, name: &str, values: Vec<f64>) -> Result<Self> {
        if values.len() != self.rows {
            return Err(EsegError::RaggedColumn {
                column: name.to_string(),
                expected: self.rows,
                got: values.len(),
            });
        }

        let mut columns: Vec<Column> = self
            .columns
            .iter()
            .filter(|c| c.name != name)
            .cloned()
            .collect();
        columns.push(Column {
            name: name.to_string(),
            data: ColumnData::Numeric(values),
        });

        Ok(Self {
            columns,
            rows: self.rows,
        })
    }
}

fn is_missing(cell: &str) -> bool {
    matches!(cell.trim(), "" | "NA" | "N/A" | "NaN" | "nan")
}

fn infer_column(raw: Vec<String>) -> ColumnData {
    let parsed: Option<Vec<f64>> = raw
        .iter()
        .map(|cell| {
            if is_missing(cell) {
                Some(f64::NAN)
            } else {
                cell.trim().parse::<f64>().ok()
            }
        })
        .collect();

    match parsed {
        Some(values) => ColumnData::Numeric(values),
        None => ColumnData::Categorical(raw),
    }
}

/// Locates and parses the segregation-energy CSV
#[derive(Clone, Debug)]
pub struct DatasetLoader {
    path: PathBuf,
}

impl DatasetLoader {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }

    /// Loader for `data/dataset.csv` shipped with this crate
    pub fn bundled() -> Self {
        Self::new(bundled_dataset_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read and validate the dataset
    ///
    /// Fails if the file cannot be opened, is not valid CSV, or lacks any of
    /// the descriptor, target or host columns.
    pub fn load(&self) -> Result<Table> {
        debug!("Opening dataset {}", self.path.display());
        let file = File::open(&self.path).map_err(|source| EsegError::Resource {
            path: self.path.clone(),
            source,
        })?;

        let table = Table::from_reader(file)?;
        for required in REQUIRED_COLUMNS {
            if table.column(required).is_none() {
                return Err(EsegError::MissingColumn(required.to_string()));
            }
        }

        info!(
            "Loaded {} rows x {} columns from {}",
            table.len(),
            table.columns().len(),
            self.path.display()
        );
        Ok(table)
    }
}

impl Default for DatasetLoader {
    fn default() -> Self {
        Self::bundled()
    }
}

/// Path of the dataset bundled next to this crate's manifest
pub fn bundled_dataset_path() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("data")
        .join("dataset.csv")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const HEADER: &str = "Host,Dopant,diff_CEb/cn,gordy_eneg_host,diff_EA,r_dopant,IP_dopant,Eseg";

    fn create_test_csv() -> anyhow::Result<NamedTempFile> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{HEADER}")?;
        writeln!(file, "Rh,Pd,-0.28,0.0244,0.575,1.69,8.33686,-0.239")?;
        writeln!(file, "Rh,Ag,-0.61,0.0244,0.050,1.65,7.5762,-0.512")?;
        writeln!(file, "Cu,Au,-0.12,0.0190,-1.080,1.74,9.2255,-0.301")?;
        file.flush()?;
        Ok(file)
    }

    #[test]
    fn test_load_csv() -> anyhow::Result<()> {
        let file = create_test_csv()?;
        let table = DatasetLoader::new(file.path()).load()?;

        assert_eq!(table.len(), 3);
        assert_eq!(
            table.headers(),
            vec![
                "Host",
                "Dopant",
                "diff_CEb/cn",
                "gordy_eneg_host",
                "diff_EA",
                "r_dopant",
                "IP_dopant",
                "Eseg"
            ]
        );
        assert_eq!(table.numeric("Eseg")?, &[-0.239, -0.512, -0.301]);
        assert_eq!(table.labels("Host")?, vec!["Rh", "Rh", "Cu"]);
        Ok(())
    }

    #[test]
    fn test_categorical_column() -> anyhow::Result<()> {
        let file = create_test_csv()?;
        let table = DatasetLoader::new(file.path()).load()?;

        assert_eq!(table.categorical("Dopant")?, &["Pd", "Ag", "Au"]);
        assert!(matches!(
            table.categorical("Eseg"),
            Err(EsegError::NonCategoricalColumn(ref c)) if c == "Eseg"
        ));
        assert!(matches!(
            table.categorical("Surface"),
            Err(EsegError::MissingColumn(_))
        ));
        Ok(())
    }

    #[test]
    fn test_load_is_deterministic() -> anyhow::Result<()> {
        let file = create_test_csv()?;
        let loader = DatasetLoader::new(file.path());
        assert_eq!(loader.load()?, loader.load()?);
        Ok(())
    }

    #[test]
    fn test_missing_file_is_resource_error() {
        let err = DatasetLoader::new("/definitely/not/here.csv")
            .load()
            .unwrap_err();
        assert!(matches!(err, EsegError::Resource { .. }));
    }

    #[test]
    fn test_wrong_column_set_is_rejected() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "Host,diff_CEb/cn,gordy_eneg_host,diff_EA,r_dopant,Eseg")?;
        writeln!(file, "Rh,-0.28,0.0244,0.575,1.69,-0.239")?;
        file.flush()?;

        let err = DatasetLoader::new(file.path()).load().unwrap_err();
        assert!(matches!(err, EsegError::MissingColumn(ref c) if c == "IP_dopant"));
        Ok(())
    }

    #[test]
    fn test_ragged_rows_are_malformed() -> anyhow::Result<()> {
        let mut file = NamedTempFile::new()?;
        writeln!(file, "{HEADER}")?;
        writeln!(file, "Rh,Pd,-0.28,0.0244")?;
        file.flush()?;

        let err = DatasetLoader::new(file.path()).load().unwrap_err();
        assert!(matches!(err, EsegError::Csv(_)));
        Ok(())
    }

    #[test]
    fn test_empty_cells_become_nan() -> anyhow::Result<()> {
        let csv = "a,b\n1.0,x\n,y\n";
        let table = Table::from_reader(csv.as_bytes())?;
        let a = table.numeric("a")?;
        assert_eq!(a[0], 1.0);
        assert!(a[1].is_nan());
        assert!(matches!(
            table.numeric("b"),
            Err(EsegError::NonNumericColumn(_))
        ));
        Ok(())
    }

    #[test]
    fn test_with_numeric_column_copies_table() -> anyhow::Result<()> {
        let table = Table::from_reader("a\n1\n2\n".as_bytes())?;
        let augmented = table.with_numeric_column("b", vec![3.0, 4.0])?;

        assert_eq!(table.headers(), vec!["a"]);
        assert_eq!(augmented.headers(), vec!["a", "b"]);
        assert_eq!(augmented.numeric("b")?, &[3.0, 4.0]);
        assert!(table.with_numeric_column("c", vec![1.0]).is_err());
        Ok(())
    }
}
