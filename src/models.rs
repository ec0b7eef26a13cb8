use std::fmt;

use serde::{Deserialize, Serialize};

/// Path sentinel the service uses for cross-file findings
pub const PROJECT_SCOPE_PATH: &str = "__project__";

/// Source language of the submitted code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    Python,
    Javascript,
    C,
    Cpp,
    Java,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::Python => "python",
            Language::Javascript => "javascript",
            Language::C => "c",
            Language::Cpp => "cpp",
            Language::Java => "java",
        }
    }

    /// File extensions accepted for project uploads in this language.
    ///
    /// Empty for languages the project review does not support.
    pub fn extensions(&self) -> &'static [&'static str] {
        match self {
            Language::Python => &[".py"],
            Language::Javascript => &[".js"],
            Language::C | Language::Cpp | Language::Java => &[],
        }
    }

    pub fn supports_projects(&self) -> bool {
        !self.extensions().is_empty()
    }

    /// Check a file name against the registered extensions
    pub fn accepts_file(&self, name: &str) -> bool {
        self.extensions().iter().any(|ext| name.ends_with(ext))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Backend context; tailors the advisory text attached to issues
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ReviewContextKind {
    Review,
    Interview,
    Deployment,
}

/// A file read from disk, held only until submission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    pub path: String,
    pub code: String,
}

/// Body of `POST /api/v1/review`
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ReviewRequest {
    Single {
        language: Language,
        context: ReviewContextKind,
        code: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        metadata: Option<serde_json::Map<String, serde_json::Value>>,
    },
    Project {
        language: Language,
        context: ReviewContextKind,
        files: Vec<UploadedFile>,
    },
}

impl ReviewRequest {
    pub fn single(language: Language, context: ReviewContextKind, code: impl Into<String>) -> Self {
        ReviewRequest::Single {
            language,
            context,
            code: code.into(),
            metadata: None,
        }
    }

    pub fn project(language: Language, files: Vec<UploadedFile>) -> Self {
        ReviewRequest::Project {
            language,
            context: ReviewContextKind::Deployment,
            files,
        }
    }

    /// Attach free-form metadata; ignored for project requests
    pub fn with_metadata(mut self, value: serde_json::Map<String, serde_json::Value>) -> Self {
        if let ReviewRequest::Single { metadata, .. } = &mut self {
            *metadata = Some(value);
        }
        self
    }

    pub fn language(&self) -> Language {
        match self {
            ReviewRequest::Single { language, .. } | ReviewRequest::Project { language, .. } => {
                *language
            }
        }
    }

    pub fn context(&self) -> ReviewContextKind {
        match self {
            ReviewRequest::Single { context, .. } | ReviewRequest::Project { context, .. } => {
                *context
            }
        }
    }
}

/// Verdict assigned by the review service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Decision {
    Pass,
    Warn,
    Block,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Decision::Pass => "PASS",
            Decision::Warn => "WARN",
            Decision::Block => "BLOCK",
        })
    }
}

/// Severity level of a finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Severity {
    Critical,
    Medium,
    Low,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Severity::Critical => "CRITICAL",
            Severity::Medium => "MEDIUM",
            Severity::Low => "LOW",
        })
    }
}

/// One finding in a review
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub issue_type: Option<String>,
    /// Model confidence in [0, 1]
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub why_it_matters: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interview_impact: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub production_risk: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub long_term_risk: Option<String>,
}

impl Issue {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            path: None,
            line: None,
            issue_type: None,
            confidence: None,
            impact: None,
            suggestion: None,
            why_it_matters: None,
            interview_impact: None,
            production_risk: None,
            long_term_risk: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Cross-file finding rather than a single-file defect
    pub fn is_project_scope(&self) -> bool {
        self.path.as_deref() == Some(PROJECT_SCOPE_PATH)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskBreakdown {
    #[serde(default)]
    pub static_risk: Option<f64>,
    #[serde(default)]
    pub structural_risk: Option<f64>,
    #[serde(default)]
    pub ai_modifier: Option<f64>,
}

/// How deeply the service can analyze the submitted language
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coverage {
    pub percent: f64,
    #[serde(default)]
    pub level: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiSection {
    #[serde(default)]
    pub advisory: Option<String>,
    #[serde(default)]
    pub interview_readiness: Option<f64>,
}

/// Review payload returned by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewResponse {
    pub decision: Decision,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub risk_breakdown: Option<RiskBreakdown>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub coverage: Option<Coverage>,
    #[serde(default)]
    pub issues: Vec<Issue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_section: Option<AiSection>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub decision_trace: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metrics: Option<serde_json::Value>,
}

impl ReviewResponse {
    pub fn new(decision: Decision, risk_score: f64, issues: Vec<Issue>) -> Self {
        Self {
            decision,
            risk_score: Some(risk_score),
            final_score: None,
            risk_breakdown: None,
            coverage: None,
            issues,
            ai_section: None,
            decision_trace: None,
            summary: None,
            metrics: None,
        }
    }

    /// Risk score, falling back to the final score older services report
    pub fn risk(&self) -> Option<f64> {
        self.risk_score.or(self.final_score)
    }

    pub fn issues_by_severity(&self, severity: Severity) -> Vec<&Issue> {
        self.issues
            .iter()
            .filter(|i| i.severity == severity)
            .collect()
    }

    pub fn count_severity(&self, severity: Severity) -> usize {
        self.issues.iter().filter(|i| i.severity == severity).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_single_request_shape() {
        let request = ReviewRequest::single(Language::Cpp, ReviewContextKind::Review, "int x;");
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({"language": "cpp", "context": "review", "code": "int x;"})
        );
    }

    #[test]
    fn test_metadata_only_serialized_when_set() {
        let mut meta = serde_json::Map::new();
        meta.insert("source".to_string(), json!("cli"));

        let request = ReviewRequest::single(Language::Python, ReviewContextKind::Review, "x = 1")
            .with_metadata(meta);
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(value["metadata"], json!({"source": "cli"}));
    }

    #[test]
    fn test_project_request_shape() {
        let request = ReviewRequest::project(
            Language::Python,
            vec![UploadedFile {
                path: "main.py".to_string(),
                code: "print(1)".to_string(),
            }],
        );
        let value = serde_json::to_value(&request).unwrap();

        assert_eq!(
            value,
            json!({
                "language": "python",
                "context": "deployment",
                "files": [{"path": "main.py", "code": "print(1)"}]
            })
        );
        assert_eq!(request.context(), ReviewContextKind::Deployment);
    }

    #[test]
    fn test_parse_full_response() {
        let body = json!({
            "decision": "BLOCK",
            "final_score": 72,
            "risk_breakdown": {"static_risk": 40, "structural_risk": 20, "ai_modifier": 12},
            "coverage": {"percent": 90, "level": "Full", "description": "AST-based deep analysis"},
            "issues": [{
                "severity": "CRITICAL",
                "type": "Security",
                "message": "Function 'run' used but not defined",
                "path": "__project__",
                "confidence": 0.9
            }],
            "decision_trace": ["Missing definition: Function 'run' used but not defined"],
            "unknown_field": true
        });

        let response: ReviewResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.decision, Decision::Block);
        assert_eq!(response.risk(), Some(72.0));
        assert_eq!(response.issues[0].issue_type.as_deref(), Some("Security"));
        assert!(response.issues[0].is_project_scope());
        assert_eq!(response.coverage.unwrap().level, "Full");
    }

    #[test]
    fn test_unknown_severity_rejects_response() {
        let body = json!({
            "decision": "PASS",
            "issues": [{"severity": "HIGH", "message": "x"}]
        });
        assert!(serde_json::from_value::<ReviewResponse>(body).is_err());
    }

    #[test]
    fn test_language_extensions() {
        assert!(Language::Python.accepts_file("main.py"));
        assert!(!Language::Python.accepts_file("util.js"));
        assert!(Language::Javascript.accepts_file("index.js"));
        assert!(!Language::Java.supports_projects());
    }

    #[test]
    fn test_risk_prefers_risk_score() {
        let mut response = ReviewResponse::new(Decision::Warn, 40.0, vec![]);
        response.final_score = Some(55.0);
        assert_eq!(response.risk(), Some(40.0));
    }
}
