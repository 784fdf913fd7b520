//! CSV `RecordLoader` implementation: header row as field names, a
//! configurable id column (defaults to the first column).

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use linkage_core::Record;
use tracing::info;

use crate::error::LoaderError;
use crate::loader::RecordLoader;

pub struct CsvRecordLoader {
    path: PathBuf,
    id_column: Option<String>,
}

impl CsvRecordLoader {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            id_column: None,
        }
    }

    /// Use a named column as `Record::id` instead of the first column.
    pub fn with_id_column(mut self, column: impl Into<String>) -> Self {
        self.id_column = Some(column.into());
        self
    }

    fn read_all(&self) -> Result<Vec<Record>, LoaderError> {
        let mut reader = csv::Reader::from_path(&self.path)?;
        let headers = reader.headers()?.clone();

        let id_index = match &self.id_column {
            Some(name) => headers
                .iter()
                .position(|h| h == name)
                .ok_or_else(|| LoaderError::MissingIdColumn(name.clone()))?,
            None => 0,
        };

        let mut records = Vec::new();
        for result in reader.records() {
            let row = result?;
            let id = row.get(id_index).unwrap_or("").to_string();
            let fields: HashMap<String, String> = headers
                .iter()
                .zip(row.iter())
                .map(|(name, value)| (name.to_string(), value.to_string()))
                .collect();
            records.push(Record::new(id, fields));
        }

        info!(path = %self.path.display(), count = records.len(), "loaded CSV records");
        Ok(records)
    }
}

impl RecordLoader for CsvRecordLoader {
    fn load_all(&self) -> Result<Vec<Record>, LoaderError> {
        self.read_all()
    }

    fn load_batches(&self, size: usize, offset: usize) -> Result<Vec<Record>, LoaderError> {
        let all = self.read_all()?;
        Ok(all.into_iter().skip(offset).take(size).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn write_csv(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn load_all_uses_first_column_as_id() {
        let file = write_csv("id,name,city\n1,Alice Smith,NY\n2,Bob Lee,LA\n");
        let loader = CsvRecordLoader::new(file.path());
        let records = loader.load_all().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "1");
        assert_eq!(records[0].field("name"), "Alice Smith");
        assert_eq!(records[1].field("city"), "LA");
    }

    #[test]
    fn with_id_column_selects_named_column() {
        let file = write_csv("name,city,record_id\nAlice Smith,NY,r1\n");
        let loader = CsvRecordLoader::new(file.path()).with_id_column("record_id");
        let records = loader.load_all().unwrap();
        assert_eq!(records[0].id, "r1");
    }

    #[test]
    fn missing_id_column_is_an_error() {
        let file = write_csv("name,city\nAlice Smith,NY\n");
        let loader = CsvRecordLoader::new(file.path()).with_id_column("nonexistent");
        assert!(matches!(loader.load_all(), Err(LoaderError::MissingIdColumn(_))));
    }

    #[test]
    fn load_batches_slices_by_offset_and_size() {
        let file = write_csv("id,name\n1,A\n2,B\n3,C\n4,D\n");
        let loader = CsvRecordLoader::new(file.path());
        let batch = loader.load_batches(2, 1).unwrap();
        assert_eq!(batch.len(), 2);
        assert_eq!(batch[0].id, "2");
        assert_eq!(batch[1].id, "3");
    }

    #[test]
    fn missing_field_defaults_to_empty_string() {
        let file = write_csv("id,name,city\n1,Alice,\n");
        let loader = CsvRecordLoader::new(file.path());
        let records = loader.load_all().unwrap();
        assert_eq!(records[0].field("city"), "");
    }
}
