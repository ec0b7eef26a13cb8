use thiserror::Error;

use crate::models::Language;

/// Failures surfaced by the collectors and the transport client.
///
/// Local validation variants are raised before any network call is made.
#[derive(Error, Debug)]
pub enum GateError {
    #[error("No code to analyze")]
    EmptyCode,

    #[error("Please upload at least one valid file")]
    NoFiles,

    /// `files` are the offenders, `batch` every name in the rejected upload
    #[error(
        "Upload of {} rejected. These files do not match the selected language ({language}): {}",
        .batch.join(", "),
        .files.join(", ")
    )]
    ExtensionMismatch {
        language: Language,
        files: Vec<String>,
        batch: Vec<String>,
    },

    #[error("Several uploaded files share the same path: {}", .0.join(", "))]
    DuplicatePath(Vec<String>),

    #[error("Project analysis is not available for {0}")]
    UnsupportedLanguage(Language),

    #[error("An analysis is already in progress")]
    InFlight,

    #[error("Review service base URL is not configured")]
    MissingBaseUrl,

    #[error("Invalid review service base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Failed to read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Review service request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Review service error ({status}): {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
}

impl GateError {
    /// Whether the error was raised locally, before any request was sent.
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            GateError::EmptyCode
                | GateError::NoFiles
                | GateError::ExtensionMismatch { .. }
                | GateError::DuplicatePath(_)
                | GateError::UnsupportedLanguage(_)
                | GateError::InFlight
                | GateError::Read { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, GateError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_mismatch_names_every_file() {
        let err = GateError::ExtensionMismatch {
            language: Language::Python,
            files: vec!["util.js".to_string(), "README.md".to_string()],
            batch: vec![
                "main.py".to_string(),
                "util.js".to_string(),
                "README.md".to_string(),
            ],
        };

        let message = err.to_string();
        assert!(message.contains("Upload of main.py, util.js, README.md rejected"));
        assert!(message.contains("(python): util.js, README.md"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_status_error_is_not_validation() {
        let err = GateError::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "boom".to_string(),
        };
        assert!(!err.is_validation());
        assert!(err.to_string().contains("500"));
    }
}
