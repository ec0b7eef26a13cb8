use std::collections::HashSet;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use tracing::{debug, info, instrument, warn};

use super::{BUSY_LABEL, IDLE_LABEL};
use crate::client::ReviewService;
use crate::error::{GateError, Result};
use crate::models::{Language, ReviewRequest, ReviewResponse, UploadedFile};

/// Message stored when the service call fails
pub const ANALYZE_FAILED: &str = "Failed to analyze project";

/// Multi-file project collector
///
/// Owns the accepted file list and the last result or error. Every file in a
/// batch must carry an extension registered for the selected language.
pub struct ProjectUploader {
    language: Language,
    files: Vec<UploadedFile>,
    analyzing: bool,
    result: Option<ReviewResponse>,
    error: Option<String>,
}

impl Default for ProjectUploader {
    fn default() -> Self {
        Self::new()
    }
}

impl ProjectUploader {
    pub fn new() -> Self {
        Self {
            language: Language::Python,
            files: Vec::new(),
            analyzing: false,
            result: None,
            error: None,
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn files(&self) -> &[UploadedFile] {
        &self.files
    }

    pub fn result(&self) -> Option<&ReviewResponse> {
        self.result.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.analyzing
    }

    pub fn submit_label(&self) -> &'static str {
        if self.analyzing {
            BUSY_LABEL
        } else {
            IDLE_LABEL
        }
    }

    /// Note shown next to the selector for languages with file-level analysis only
    pub fn language_hint(&self) -> Option<&'static str> {
        match self.language {
            Language::Javascript => Some("Project-level analysis available for Python"),
            _ => None,
        }
    }

    /// Switch language, discarding accepted files and any previous result
    pub fn set_language(&mut self, language: Language) -> Result<()> {
        if !language.supports_projects() {
            return Err(GateError::UnsupportedLanguage(language));
        }

        self.language = language;
        self.files.clear();
        self.result = None;
        self.error = None;
        Ok(())
    }

    /// Read a batch of files, replacing the accepted list.
    ///
    /// Each file is sent under its path relative to the deepest directory
    /// shared by the batch. The whole batch is rejected if any file name lacks
    /// a registered extension, two files resolve to the same path, or any read
    /// fails; the previous list is then left as is.
    #[instrument(skip(self, paths), fields(language = %self.language, count = paths.len()))]
    pub async fn upload<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<usize> {
        let batch: Vec<String> = paths.iter().map(|p| file_name(p.as_ref())).collect();
        let invalid: Vec<String> = batch
            .iter()
            .filter(|name| !self.language.accepts_file(name))
            .cloned()
            .collect();

        if !invalid.is_empty() {
            warn!(files = ?invalid, "Rejected upload with mismatched extensions");
            return Err(GateError::ExtensionMismatch {
                language: self.language,
                files: invalid,
                batch,
            });
        }

        let root = common_root(paths.iter().map(|p| p.as_ref()));
        let names: Vec<String> = paths
            .iter()
            .map(|p| relative_name(p.as_ref(), &root))
            .collect();

        let mut seen = HashSet::new();
        let mut duplicates: Vec<String> = names
            .iter()
            .filter(|name| !seen.insert(name.as_str()))
            .cloned()
            .collect();
        if !duplicates.is_empty() {
            duplicates.dedup();
            warn!(files = ?duplicates, "Rejected upload with duplicate paths");
            return Err(GateError::DuplicatePath(duplicates));
        }

        let reads = paths
            .iter()
            .zip(names)
            .map(|(p, name)| read_file(p.as_ref().to_path_buf(), name));
        let files = join_all(reads)
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        info!(count = files.len(), "Accepted project files");

        self.files = files;
        self.result = None;
        self.error = None;

        Ok(self.files.len())
    }

    /// Post the accepted files to the service and keep the response.
    ///
    /// On failure any previous result is discarded and the generic error
    /// message is stored.
    pub async fn analyze<S: ReviewService>(&mut self, service: &S) -> Result<&ReviewResponse> {
        if self.files.is_empty() {
            return Err(GateError::NoFiles);
        }

        let request = ReviewRequest::project(self.language, self.files.clone());

        self.analyzing = true;
        self.error = None;
        info!(files = self.files.len(), language = %self.language, "Analyzing project");

        let outcome = service.submit_review(&request).await;
        self.analyzing = false;

        match outcome {
            Ok(response) => Ok(&*self.result.insert(response)),
            Err(e) => {
                warn!(error = %e, "Project analysis failed");
                self.result = None;
                self.error = Some(ANALYZE_FAILED.to_string());
                Err(e)
            }
        }
    }
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}

/// Deepest directory containing every path in the batch
fn common_root<'a>(mut paths: impl Iterator<Item = &'a Path>) -> PathBuf {
    let Some(first) = paths.next() else {
        return PathBuf::new();
    };
    let mut root = first.parent().map(Path::to_path_buf).unwrap_or_default();

    for path in paths {
        while !path.starts_with(&root) {
            if !root.pop() {
                break;
            }
        }
    }
    root
}

/// Path below `root`, always `/`-separated
fn relative_name(path: &Path, root: &Path) -> String {
    let relative = path.strip_prefix(root).unwrap_or(path);
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();

    if parts.is_empty() {
        file_name(path)
    } else {
        parts.join("/")
    }
}

async fn read_file(path: PathBuf, name: String) -> Result<UploadedFile> {
    let code = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| GateError::Read {
            path: path.display().to_string(),
            source,
        })?;

    debug!(path = %path.display(), bytes = code.len(), "Read file");

    Ok(UploadedFile { path: name, code })
}
