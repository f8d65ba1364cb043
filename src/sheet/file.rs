use async_trait::async_trait;
use std::path::PathBuf;

use super::{parse_csv, SheetSource};
use crate::error::Result;
use crate::types::RawTable;

/// Reads a CSV file previously downloaded from the sheet. Re-read on every
/// fetch, like the live source.
#[derive(Debug, Clone)]
pub struct FileSheetSource {
    path: PathBuf,
}

impl FileSheetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SheetSource for FileSheetSource {
    async fn fetch(&self) -> Result<RawTable> {
        let text = tokio::fs::read_to_string(&self.path).await?;
        parse_csv(&text)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}
