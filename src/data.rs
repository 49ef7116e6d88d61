//! Data
//!
//! Tabular, all-categorical datasets. The last column is the class label and
//! every other column is a feature. Values are kept as strings in header
//! order, so dropping a column after a split is a matter of removing one index.
use crate::errors::GainsplitError;
use hashbrown::{HashMap, HashSet};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// One input row as ordered `(column, value)` pairs.
pub type Record = Vec<(String, String)>;

/// Feature name → value, used for prediction.
pub type FeatureVector = HashMap<String, String>;

/// Ordered records sharing one schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    headers: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Create a dataset from headers and rows given in header order.
    ///
    /// * `headers` - Column names, the last one is the class column.
    /// * `rows` - Row values, each with exactly one value per header.
    pub fn new(headers: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, GainsplitError> {
        if headers.is_empty() {
            return Err(GainsplitError::InvalidDataset("missing class column".to_string()));
        }
        {
            let mut seen = HashSet::with_capacity(headers.len());
            for h in &headers {
                if !seen.insert(h.as_str()) {
                    return Err(GainsplitError::InvalidDataset(format!("duplicate column `{}`", h)));
                }
            }
        }
        for (i, row) in rows.iter().enumerate() {
            if row.len() != headers.len() {
                return Err(GainsplitError::InvalidDataset(format!(
                    "row {} has {} values, expected {}",
                    i,
                    row.len(),
                    headers.len()
                )));
            }
        }
        Ok(Dataset { headers, rows })
    }

    /// Build a dataset from keyed records. The first record's key order is
    /// the schema and every other record must carry exactly the same keys.
    pub fn from_records(records: Vec<Record>) -> Result<Self, GainsplitError> {
        let first = records
            .first()
            .ok_or_else(|| GainsplitError::InvalidDataset("no records".to_string()))?;
        let headers: Vec<String> = first.iter().map(|(k, _)| k.clone()).collect();

        let mut rows = Vec::with_capacity(records.len());
        for (i, record) in records.into_iter().enumerate() {
            let n_values = record.len();
            let mut values: HashMap<String, String> = record.into_iter().collect();
            if values.len() != n_values || n_values != headers.len() {
                return Err(GainsplitError::InvalidDataset(format!(
                    "record {} does not match the schema of the first record",
                    i
                )));
            }
            let mut row = Vec::with_capacity(headers.len());
            for h in &headers {
                match values.remove(h) {
                    Some(v) => row.push(v),
                    None => {
                        return Err(GainsplitError::InvalidDataset(format!(
                            "record {} is missing column `{}`",
                            i, h
                        )))
                    }
                }
            }
            rows.push(row);
        }
        Dataset::new(headers, rows)
    }

    /// Parse a dataset from CSV with a header row. Fields are trimmed and
    /// blank lines are skipped.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, GainsplitError> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(reader);
        let headers: Vec<String> = rdr.headers()?.iter().map(|h| h.to_string()).collect();
        let mut rows = Vec::new();
        for record in rdr.records() {
            let record = record?;
            rows.push(record.iter().map(|v| v.to_string()).collect());
        }
        Dataset::new(headers, rows)
    }

    /// Parse a CSV file, see [`Dataset::from_csv_reader`].
    pub fn from_csv_path<P: AsRef<Path>>(path: P) -> Result<Self, GainsplitError> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| GainsplitError::UnableToRead(format!("{}: {}", path.display(), e)))?;
        Self::from_csv_reader(file)
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn class_index(&self) -> usize {
        self.headers.len() - 1
    }

    pub fn class_column(&self) -> &str {
        &self.headers[self.class_index()]
    }

    pub fn feature_names(&self) -> &[String] {
        &self.headers[..self.class_index()]
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Class value of row `i`.
    pub fn class_of(&self, i: usize) -> &str {
        &self.rows[i][self.class_index()]
    }

    /// True when at most one class value is present.
    pub fn is_pure(&self) -> bool {
        let ci = self.class_index();
        match self.rows.first() {
            Some(first) => self.rows.iter().all(|r| r[ci] == first[ci]),
            None => true,
        }
    }

    /// Rows whose `column` equals `value`, in their original order.
    pub fn filter_eq(&self, column: usize, value: &str) -> Dataset {
        Dataset {
            headers: self.headers.clone(),
            rows: self.rows.iter().filter(|r| r[column] == value).cloned().collect(),
        }
    }

    /// Copy of the dataset with one column removed.
    pub fn without_column(&self, column: usize) -> Dataset {
        let mut headers = self.headers.clone();
        headers.remove(column);
        let rows = self
            .rows
            .iter()
            .map(|r| {
                let mut r = r.clone();
                r.remove(column);
                r
            })
            .collect();
        Dataset { headers, rows }
    }

    /// Keyed view of one row, in header order.
    pub fn record(&self, i: usize) -> Record {
        self.headers.iter().cloned().zip(self.rows[i].iter().cloned()).collect()
    }
}
