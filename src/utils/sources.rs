//! Statement sources backed by memory and by files

use async_trait::async_trait;
use std::path::{Path, PathBuf};

use crate::traits::*;
use crate::types::*;

/// Export text held in memory (uploads, tests)
#[derive(Debug, Clone)]
pub struct MemorySource {
    name: String,
    text: String,
}

impl MemorySource {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }
}

#[async_trait]
impl StatementSource for MemorySource {
    async fn read_text(&self) -> ReconcileResult<String> {
        Ok(self.text.clone())
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}

/// Export read from a file on disk
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl StatementSource for FileSource {
    async fn read_text(&self) -> ReconcileResult<String> {
        Ok(tokio::fs::read_to_string(&self.path).await?)
    }

    fn name(&self) -> String {
        self.path.display().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn test_memory_source() {
        let source = MemorySource::new("bank.csv", "Zaksięgowano,Tytuł,Kwota\n");
        assert_eq!(source.name(), "bank.csv");
        assert_eq!(source.read_text().await.unwrap(), "Zaksięgowano,Tytuł,Kwota\n");
    }

    #[tokio::test]
    async fn test_file_source() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Data\tOpis").unwrap();
        let source = FileSource::new(file.path());
        assert_eq!(source.read_text().await.unwrap(), "Data\tOpis\n");
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let source = FileSource::new("/definitely/not/here/bank.csv");
        assert!(matches!(source.read_text().await, Err(ReconcileError::Io(_))));
    }
}
