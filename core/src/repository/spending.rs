use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use tracing::debug;

use crate::error::{MapError, Result};
use crate::model::spending::SpendingEntry;
use crate::repository::traits::SpendingRepository;

/// Reads a spending file: a bare top-level JSON array of
/// `{date, category, amount}` objects.
#[derive(Clone, Debug)]
pub struct FileSpendingRepository {
    file_path: PathBuf,
}

impl FileSpendingRepository {
    pub fn new(file_path: impl Into<PathBuf>) -> Self {
        Self {
            file_path: file_path.into(),
        }
    }

    fn parse_error(&self, reason: impl ToString) -> MapError {
        MapError::SpendingParseError {
            origin: self.file_path.display().to_string(),
            reason: reason.to_string(),
        }
    }
}

impl SpendingRepository for FileSpendingRepository {
    fn list(&self) -> Result<Vec<SpendingEntry>> {
        let file = File::open(&self.file_path).map_err(|e| self.parse_error(e))?;
        let reader = BufReader::new(file);
        let entries: Vec<SpendingEntry> =
            serde_json::from_reader(reader).map_err(|e| self.parse_error(e))?;
        debug!(path = %self.file_path.display(), entries = entries.len(), "read spending file");
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_reads_bare_array() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alice.json");
        fs::write(
            &path,
            r#"[
                {"date": "2024-03-01", "category": "EO", "amount": 12.5},
                {"date": "2024-03-02", "category": "GR", "amount": 40}
            ]"#,
        )
        .unwrap();

        let entries = FileSpendingRepository::new(&path).list().unwrap();
        assert_eq!(
            entries,
            vec![
                SpendingEntry::new("2024-03-01", "EO", 12.5),
                SpendingEntry::new("2024-03-02", "GR", 40.0),
            ]
        );
    }

    #[test]
    fn test_wrapped_object_is_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alice.json");
        fs::write(&path, r#"{"entries": []}"#).unwrap();

        assert!(matches!(
            FileSpendingRepository::new(&path).list(),
            Err(MapError::SpendingParseError { .. })
        ));
    }

    #[test]
    fn test_empty_array_parses() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("alice.json");
        fs::write(&path, "[]").unwrap();

        assert!(FileSpendingRepository::new(&path).list().unwrap().is_empty());
    }
}
