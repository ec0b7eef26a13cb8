use std::sync::atomic::{AtomicBool, Ordering};

use tracing::{info, warn};

use super::{InFlightGuard, BUSY_LABEL, IDLE_LABEL};
use crate::client::ReviewService;
use crate::error::{GateError, Result};
use crate::models::{Language, ReviewContextKind, ReviewRequest, ReviewResponse};

/// Single code block collector
///
/// Holds the code text and selected language. The response is handed to a
/// caller-supplied callback; the editor keeps no result of its own.
pub struct CodeEditor {
    code: String,
    language: Language,
    context: ReviewContextKind,
    in_flight: AtomicBool,
}

impl CodeEditor {
    pub fn new(context: ReviewContextKind) -> Self {
        Self {
            code: String::new(),
            language: Language::Python,
            context,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn code(&self) -> &str {
        &self.code
    }

    pub fn set_code(&mut self, code: impl Into<String>) {
        self.code = code.into();
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn set_language(&mut self, language: Language) {
        self.language = language;
    }

    pub fn context(&self) -> ReviewContextKind {
        self.context
    }

    pub fn is_analyzing(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    pub fn submit_label(&self) -> &'static str {
        if self.is_analyzing() {
            BUSY_LABEL
        } else {
            IDLE_LABEL
        }
    }

    pub fn placeholder(&self) -> String {
        format!("Write your {} code here...", self.language)
    }

    /// Build the request for the current editor state
    pub fn build_request(&self) -> Result<ReviewRequest> {
        if self.code.trim().is_empty() {
            return Err(GateError::EmptyCode);
        }
        Ok(ReviewRequest::single(
            self.language,
            self.context,
            self.code.clone(),
        ))
    }

    /// Submit the code for review and pass the response to `on_result`.
    ///
    /// Blank code never reaches the service. A second call while one is
    /// outstanding fails with [`GateError::InFlight`].
    pub async fn submit<S, F>(&self, service: &S, on_result: F) -> Result<()>
    where
        S: ReviewService,
        F: FnOnce(ReviewResponse),
    {
        let request = self.build_request()?;
        let _guard = InFlightGuard::acquire(&self.in_flight)?;

        info!(language = %self.language, bytes = self.code.len(), "Submitting code for review");

        match service.submit_review(&request).await {
            Ok(response) => {
                on_result(response);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Analysis failed");
                Err(e)
            }
        }
    }
}
