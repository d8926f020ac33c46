//! Tabular prompt source: a delimited file plus a target column index.
//!
//! The first row is treated as ordinary data — there is no header-based
//! column lookup — but its field count validates the column index before
//! anything else is collected. Uploaded files are adopted as temporary
//! artifacts and deleted once the read finishes, whatever the outcome.

use std::io::Read;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::ReaderBuilder;
use tempfile::TempPath;

use super::{PromptSource, DEFAULT_PROMPT_COLUMN};
use crate::error::SourceError;
use crate::types::{Prompt, PromptBatch};

/// Prompt source backed by a delimited tabular file.
///
/// # Example
///
/// ```no_run
/// use image_pipeline::source::{CsvSource, PromptSource};
///
/// # async fn run() -> Result<(), image_pipeline::SourceError> {
/// let source = CsvSource::new("prompts.csv").with_column(0);
/// let batch = source.load().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct CsvSource {
    path: PathBuf,
    column: usize,
    temporary: bool,
}

impl CsvSource {
    /// Read prompts from a file that stays in place after the load.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            column: DEFAULT_PROMPT_COLUMN,
            temporary: false,
        }
    }

    /// Adopt an uploaded temporary file. The file is deleted when the load
    /// finishes, on every exit path, independent of the parse outcome.
    pub fn temporary(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            column: DEFAULT_PROMPT_COLUMN,
            temporary: true,
        }
    }

    /// Set the target column index (0-based). Default: column A.
    pub fn with_column(mut self, column: usize) -> Self {
        self.column = column;
        self
    }

    /// The path this source reads from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Parse prompts out of any readable byte stream of delimited text.
    ///
    /// The column index is bounds-checked against the first row's field
    /// count; an out-of-bounds index short-circuits the parse with
    /// [`SourceError::ColumnOutOfBounds`] and no partial result. Rows with
    /// a present, non-empty field at the target index contribute a prompt,
    /// first row included.
    pub fn read_prompts<R: Read>(reader: R, column: usize) -> Result<PromptBatch, SourceError> {
        let mut rdr = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut prompts = Vec::new();
        let mut first_row = true;

        for record in rdr.records() {
            let record = record.map_err(|e| SourceError::Unknown {
                message: "failed to read or parse the CSV file".to_string(),
                detail: Some(e.to_string()),
            })?;

            if first_row {
                first_row = false;
                if column >= record.len() {
                    return Err(SourceError::ColumnOutOfBounds {
                        column,
                        columns: record.len(),
                    });
                }
            }

            if let Some(field) = record.get(column) {
                if let Some(prompt) = Prompt::parse(field) {
                    prompts.push(prompt);
                }
            }
        }

        if prompts.is_empty() {
            return Err(SourceError::Empty { column });
        }

        Ok(PromptBatch::new(prompts))
    }

    fn load_sync(&self) -> Result<PromptBatch, SourceError> {
        // The guard owns deletion for temporary uploads. Created before the
        // existence check so the artifact is removed even when the read
        // never starts.
        let _guard: Option<TempPath> = self
            .temporary
            .then(|| TempPath::from_path(self.path.clone()));

        let file = std::fs::File::open(&self.path).map_err(|_| SourceError::NotFound {
            path: self.path.display().to_string(),
        })?;

        Self::read_prompts(std::io::BufReader::new(file), self.column)
    }
}

#[async_trait]
impl PromptSource for CsvSource {
    async fn load(&self) -> Result<PromptBatch, SourceError> {
        self.load_sync()
    }

    fn name(&self) -> &'static str {
        "csv"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::io::Write;

    fn write_fixture(content: &str) -> PathBuf {
        let mut file = tempfile::NamedTempFile::new().expect("create fixture");
        file.write_all(content.as_bytes()).expect("write fixture");
        // Persist so the source owns deletion, not NamedTempFile.
        let (_, path) = file.keep().expect("keep fixture");
        path
    }

    #[test]
    fn test_reads_first_row_as_data() {
        let batch = CsvSource::read_prompts(Cursor::new("a fox\na cat\na dog\n"), 0).unwrap();
        let texts: Vec<&str> = batch.iter().map(|p| p.as_str()).collect();
        assert_eq!(texts, vec!["a fox", "a cat", "a dog"]);
    }

    #[test]
    fn test_picks_target_column_and_trims() {
        let data = "id,prompt\n1,  a red fox \n2,\n3, a blue cat\n";
        let batch = CsvSource::read_prompts(Cursor::new(data), 1).unwrap();
        let texts: Vec<&str> = batch.iter().map(|p| p.as_str()).collect();
        // "prompt" is the first row's cell — ordinary data, no header lookup.
        assert_eq!(texts, vec!["prompt", "a red fox", "a blue cat"]);
    }

    #[test]
    fn test_column_out_of_bounds_short_circuits() {
        // Later rows are wider than the first; the first row still governs.
        let data = "a,b\n1,2,value\n3,4,value\n";
        let err = CsvSource::read_prompts(Cursor::new(data), 2).unwrap_err();
        assert_eq!(
            err,
            SourceError::ColumnOutOfBounds {
                column: 2,
                columns: 2
            }
        );
    }

    #[test]
    fn test_out_of_bounds_beats_empty() {
        // Every cell blank AND the index out of range: the bounds error is
        // the actual cause and must win.
        let data = ",\n,\n";
        let err = CsvSource::read_prompts(Cursor::new(data), 5).unwrap_err();
        assert!(matches!(err, SourceError::ColumnOutOfBounds { .. }));
    }

    #[test]
    fn test_all_blank_column_is_empty() {
        let data = "a,\nb,\nc, \n";
        let err = CsvSource::read_prompts(Cursor::new(data), 1).unwrap_err();
        assert_eq!(err, SourceError::Empty { column: 1 });
    }

    #[test]
    fn test_empty_input_is_empty() {
        let err = CsvSource::read_prompts(Cursor::new(""), 0).unwrap_err();
        assert_eq!(err, SourceError::Empty { column: 0 });
    }

    #[test]
    fn test_quoted_fields_with_commas() {
        let data = "\"a fox, running\"\nplain\n";
        let batch = CsvSource::read_prompts(Cursor::new(data), 0).unwrap();
        let texts: Vec<&str> = batch.iter().map(|p| p.as_str()).collect();
        assert_eq!(texts, vec!["a fox, running", "plain"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_not_found() {
        let source = CsvSource::new("/definitely/not/here.csv");
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, SourceError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_temporary_file_deleted_on_success() {
        let path = write_fixture("a fox\na cat\n");
        let source = CsvSource::temporary(&path);
        let batch = source.load().await.unwrap();
        assert_eq!(batch.len(), 2);
        assert!(!path.exists(), "temporary upload must be deleted");
    }

    #[tokio::test]
    async fn test_temporary_file_deleted_on_failure() {
        let path = write_fixture("a,b\n");
        let source = CsvSource::temporary(&path).with_column(9);
        let err = source.load().await.unwrap_err();
        assert!(matches!(err, SourceError::ColumnOutOfBounds { .. }));
        assert!(!path.exists(), "temporary upload must be deleted on failure too");
    }

    #[tokio::test]
    async fn test_regular_file_left_in_place() {
        let path = write_fixture("a fox\n");
        let source = CsvSource::new(&path);
        source.load().await.unwrap();
        assert!(path.exists());
        std::fs::remove_file(&path).unwrap();
    }
}
