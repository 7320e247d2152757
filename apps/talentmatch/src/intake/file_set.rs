use std::collections::HashSet;
use std::path::Path;

use bytes::Bytes;
use tracing::{debug, info};

use crate::errors::ScanError;

/// One resume document queued for submission.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmittedFile {
    name: String,
    content: Bytes,
}

impl SubmittedFile {
    pub fn new(name: impl Into<String>, content: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Reads a file from disk. The display name is the path's final component.
    pub async fn from_path(path: &Path) -> Result<Self, ScanError> {
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                ScanError::Validation(format!("'{}' is not a readable file name", path.display()))
            })?
            .to_string();

        let content = tokio::fs::read(path)
            .await
            .map_err(|e| ScanError::Validation(format!("could not read '{name}': {e}")))?;

        Ok(Self::new(name, content))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn content(&self) -> &Bytes {
        &self.content
    }

    /// MIME type for the multipart part, inferred from the extension.
    pub fn mime_type(&self) -> &'static str {
        let is_pdf = Path::new(&self.name)
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            "application/pdf"
        } else {
            "application/octet-stream"
        }
    }
}

/// Ordered, name-unique collection of resumes.
///
/// First file with a given name wins; later files with the same name are dropped
/// without replacing it. Nothing here ever reorders the held files.
#[derive(Debug, Clone, Default)]
pub struct FileSet {
    files: Vec<SubmittedFile>,
}

impl FileSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends every file whose name is not already held. Returns how many were added.
    pub fn add(&mut self, candidates: impl IntoIterator<Item = SubmittedFile>) -> usize {
        let mut held: HashSet<String> = self.files.iter().map(|f| f.name.clone()).collect();
        let before = self.files.len();

        for file in candidates {
            if held.contains(&file.name) {
                debug!("Skipping duplicate resume '{}'", file.name);
                continue;
            }
            held.insert(file.name.clone());
            self.files.push(file);
        }

        let added = self.files.len() - before;
        info!("Added {added} resume(s), {} held", self.files.len());
        added
    }

    /// Loads each path from disk, then adds them as one batch.
    /// A read failure aborts the whole batch and leaves the set unchanged.
    pub async fn add_paths<P: AsRef<Path>>(
        &mut self,
        paths: impl IntoIterator<Item = P>,
    ) -> Result<usize, ScanError> {
        let mut loaded = Vec::new();
        for path in paths {
            loaded.push(SubmittedFile::from_path(path.as_ref()).await?);
        }
        Ok(self.add(loaded))
    }

    pub fn clear(&mut self) {
        self.files.clear();
    }

    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SubmittedFile> {
        self.files.iter()
    }

    pub fn names(&self) -> Vec<&str> {
        self.files.iter().map(|f| f.name.as_str()).collect()
    }
}
