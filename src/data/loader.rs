//! CSV Data Loader Module
//! Reads the land-use conversion table using Polars.

use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("CSV file not found: {0}")]
    NotFound(PathBuf),
    #[error("No data loaded")]
    NoData,
}

/// Holds the loaded land-use table and where it came from.
pub struct DataLoader {
    df: Option<DataFrame>,
    file_path: Option<PathBuf>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl DataLoader {
    pub fn new() -> Self {
        Self {
            df: None,
            file_path: None,
        }
    }

    /// Load a CSV file using Polars.
    pub fn load_csv(&mut self, file_path: &Path) -> Result<&DataFrame, LoaderError> {
        let df = read_csv(file_path)?;
        tracing::info!(
            path = %file_path.display(),
            rows = df.height(),
            columns = df.width(),
            "loaded land-use table"
        );

        self.file_path = Some(file_path.to_path_buf());
        self.df = Some(df);
        self.df.as_ref().ok_or(LoaderError::NoData)
    }

    /// Get list of column names from loaded DataFrame.
    pub fn get_columns(&self) -> Vec<String> {
        self.df
            .as_ref()
            .map(|df| {
                df.get_column_names()
                    .iter()
                    .map(|s| s.to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Get the number of rows in the DataFrame.
    pub fn get_row_count(&self) -> usize {
        self.df.as_ref().map(|df| df.height()).unwrap_or(0)
    }

    /// Get a reference to the loaded DataFrame.
    pub fn get_dataframe(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    pub fn get_file_path(&self) -> Option<&PathBuf> {
        self.file_path.as_ref()
    }

    /// Set DataFrame directly (used for background loading)
    pub fn set_dataframe(&mut self, df: DataFrame, file_path: Option<PathBuf>) {
        self.df = Some(df);
        self.file_path = file_path;
    }
}

/// Read a CSV into a DataFrame without holding any loader state.
///
/// The GUI calls this from its loading thread; `DataLoader::load_csv`
/// wraps it for the command-line paths.
pub fn read_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
    if !file_path.is_file() {
        return Err(LoaderError::NotFound(file_path.to_path_buf()));
    }

    let df = LazyCsvReader::new(file_path)
        .with_infer_schema_length(Some(10000))
        .with_ignore_errors(true)
        .finish()?
        .collect()?;

    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new()
            .suffix(".csv")
            .tempfile()
            .unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_header_and_rows() {
        let file = write_csv(
            "Region,Period,Total,Wetland,Cropland\n\
             Ireland,1990-2016,300,100,200\n",
        );

        let mut loader = DataLoader::new();
        loader.load_csv(file.path()).unwrap();

        assert_eq!(
            loader.get_columns(),
            vec!["Region", "Period", "Total", "Wetland", "Cropland"]
        );
        assert_eq!(loader.get_row_count(), 1);
        assert_eq!(loader.get_file_path().unwrap(), file.path());
    }

    #[test]
    fn missing_file_is_reported() {
        let mut loader = DataLoader::new();
        let err = loader
            .load_csv(Path::new("does/not/exist.csv"))
            .unwrap_err();

        assert!(matches!(err, LoaderError::NotFound(_)));
        assert!(loader.get_dataframe().is_none());
    }

    #[test]
    fn empty_loader_has_no_columns() {
        let loader = DataLoader::default();
        assert!(loader.get_columns().is_empty());
        assert_eq!(loader.get_row_count(), 0);
    }
}
