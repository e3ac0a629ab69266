//! Data Processor Module
//! Slices one row of the land-use table into chart labels and values.

use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;

/// Columns before this index describe the row; the rest are land-use categories.
pub const FIRST_CATEGORY_COLUMN: usize = 3;

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
    #[error("Table has {found} columns; land-use categories start at the 4th column")]
    NoCategoryColumns { found: usize },
    #[error("Row {row} is out of range (table has {height} rows)")]
    RowOutOfRange { row: usize, height: usize },
    #[error("Column '{column}' has no numeric value in row {row}")]
    NonNumeric { column: String, row: usize },
    #[error("Column '{column}' has invalid hectare value {value}")]
    InvalidValue { column: String, value: f64 },
    #[error("Row {row} has no converted area to chart")]
    ZeroTotal { row: usize },
}

/// Land-use category labels with their hectare values, in header order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LandUseShares {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl LandUseShares {
    pub fn total(&self) -> f64 {
        self.values.iter().sum()
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }
}

/// Turns the loaded table into chart-ready data.
pub struct LandUseProcessor;

impl LandUseProcessor {
    /// Take row `row` from the 4th column onward as (labels, values).
    pub fn prepare_chart_data(df: &DataFrame, row: usize) -> Result<LandUseShares, ProcessorError> {
        let columns = df.get_columns();
        if columns.len() <= FIRST_CATEGORY_COLUMN {
            return Err(ProcessorError::NoCategoryColumns {
                found: columns.len(),
            });
        }
        if row >= df.height() {
            return Err(ProcessorError::RowOutOfRange {
                row,
                height: df.height(),
            });
        }

        let mut labels = Vec::with_capacity(columns.len() - FIRST_CATEGORY_COLUMN);
        let mut values = Vec::with_capacity(columns.len() - FIRST_CATEGORY_COLUMN);

        for column in &columns[FIRST_CATEGORY_COLUMN..] {
            let name = column.name().to_string();
            let value_f64 = column.cast(&DataType::Float64)?;
            let value = value_f64
                .f64()?
                .get(row)
                .ok_or_else(|| ProcessorError::NonNumeric {
                    column: name.clone(),
                    row,
                })?;

            if !value.is_finite() || value < 0.0 {
                return Err(ProcessorError::InvalidValue {
                    column: name,
                    value,
                });
            }

            labels.push(name);
            values.push(value);
        }

        let shares = LandUseShares { labels, values };
        if shares.total() <= 0.0 {
            return Err(ProcessorError::ZeroTotal { row });
        }

        Ok(shares)
    }

    /// Describe every row by its leading descriptive cells, e.g. "Ireland · 1990-2016 · 61234".
    pub fn row_labels(df: &DataFrame) -> Vec<String> {
        let leading = &df.get_columns()[..df.width().min(FIRST_CATEGORY_COLUMN)];

        (0..df.height())
            .map(|i| {
                let parts: Vec<String> = leading
                    .iter()
                    .filter_map(|col| {
                        let val = col.get(i).ok()?;
                        if val.is_null() {
                            None
                        } else {
                            Some(val.to_string().trim_matches('"').to_string())
                        }
                    })
                    .collect();

                if parts.is_empty() {
                    format!("Row {}", i + 1)
                } else {
                    parts.join(" · ")
                }
            })
            .collect()
    }
}
