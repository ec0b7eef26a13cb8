//! Pure projections from a review response to renderable views.
//!
//! Every presenter takes `Option<&ReviewResponse>` and yields `None` when
//! there is nothing to show. Views render themselves as Markdown.

pub mod interview;
pub mod project;
pub mod review;

pub use interview::{ChecklistItem, CheckStatus, InterviewView};
pub use project::ProjectView;
pub use review::ReviewView;

use crate::models::{Decision, Issue, Severity};

/// Message shown when a review has no findings
pub const NO_ISSUES: &str = "No issues detected 🎉";

/// Color family used for badges and bars
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Green,
    Yellow,
    Red,
    Blue,
}

impl Tone {
    pub fn emoji(&self) -> &'static str {
        match self {
            Tone::Green => "🟢",
            Tone::Yellow => "🟡",
            Tone::Red => "🔴",
            Tone::Blue => "🔵",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Tone::Green => "green",
            Tone::Yellow => "yellow",
            Tone::Red => "red",
            Tone::Blue => "blue",
        }
    }
}

pub fn decision_tone(decision: Decision) -> Tone {
    match decision {
        Decision::Pass => Tone::Green,
        Decision::Warn => Tone::Yellow,
        Decision::Block => Tone::Red,
    }
}

pub fn severity_tone(severity: Severity) -> Tone {
    match severity {
        Severity::Critical => Tone::Red,
        Severity::Medium => Tone::Yellow,
        Severity::Low => Tone::Blue,
    }
}

/// Decision banner
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Badge {
    pub decision: Decision,
    pub tone: Tone,
}

impl Badge {
    pub fn new(decision: Decision) -> Self {
        Self {
            decision,
            tone: decision_tone(decision),
        }
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.tone.emoji(), self.decision)
    }
}

/// Proportional bar, always within [0, 100]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Meter {
    pub percent: u8,
    pub tone: Tone,
}

impl Meter {
    pub fn new(value: f64, tone: Tone) -> Self {
        Self {
            percent: clamp_percent(value),
            tone,
        }
    }

    /// Fixed-width text bar, e.g. `🔴 [#####---------------] 25%`
    pub fn render(&self, width: usize) -> String {
        let filled = (usize::from(self.percent) * width + 50) / 100;
        format!(
            "{} [{}{}] {}%",
            self.tone.emoji(),
            "#".repeat(filled),
            "-".repeat(width - filled),
            self.percent
        )
    }
}

/// Round and clamp a score into [0, 100]; NaN counts as 0
pub fn clamp_percent(value: f64) -> u8 {
    if value.is_nan() {
        return 0;
    }
    value.round().clamp(0.0, 100.0) as u8
}

/// Format a score without a trailing `.0` for whole numbers
pub(crate) fn format_score(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.1}", value)
    }
}

/// Issue headline plus the advisory fields that are present
pub(crate) fn push_issue(md: &mut String, issue: &Issue, show_path: bool) {
    let tone = severity_tone(issue.severity);
    md.push_str(&format!("#### {} [{}] {}\n", tone.emoji(), issue.severity, issue.message));

    if show_path {
        if let Some(path) = &issue.path {
            match issue.line {
                Some(line) => md.push_str(&format!("**File:** `{}` (line {})\n\n", path, line)),
                None => md.push_str(&format!("**File:** `{}`\n\n", path)),
            }
        }
    }

    let mut details = Vec::new();
    if let Some(kind) = &issue.issue_type {
        details.push(format!("**Type:** {}", kind));
    }
    if let Some(confidence) = issue.confidence {
        details.push(format!(
            "**Confidence:** {}%",
            clamp_percent(confidence * 100.0)
        ));
    }
    if let Some(impact) = &issue.impact {
        details.push(format!("**Impact:** {}", impact));
    }
    if let Some(text) = &issue.why_it_matters {
        details.push(format!("**Why it matters:** {}", text));
    }
    if let Some(text) = &issue.interview_impact {
        details.push(format!("**Interview impact:** {}", text));
    }
    if let Some(text) = &issue.production_risk {
        details.push(format!("**Production risk:** {}", text));
    }
    if let Some(text) = &issue.long_term_risk {
        details.push(format!("**Long-term risk:** {}", text));
    }
    if let Some(text) = &issue.suggestion {
        details.push(format!("**Suggestion:** {}", text));
    }

    for line in details {
        md.push_str(&line);
        md.push_str("\n\n");
    }
}
