use super::{format_score, Badge, Meter, Tone, NO_ISSUES};
use crate::models::{ReviewResponse, Severity};

/// Coverage percentage needed for the language coverage check
pub const COVERAGE_TARGET: f64 = 80.0;

/// Message shown once nothing blocks the interview
pub const READY_MESSAGE: &str = "Your code is suitable for technical interviews 🎉";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckStatus {
    Pass,
    Warn,
    Fail,
}

impl CheckStatus {
    pub fn icon(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "✅",
            CheckStatus::Warn => "⚠️",
            CheckStatus::Fail => "❌",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChecklistItem {
    pub label: &'static str,
    pub status: CheckStatus,
}

/// Interview readiness view
#[derive(Debug, Clone)]
pub struct InterviewView<'a> {
    pub badge: Badge,
    pub is_ready: bool,
    /// Unrounded, within [0, 100]
    pub readiness_score: f64,
    pub meter: Meter,
    pub checklist: [ChecklistItem; 3],
    pub issue_count: usize,
    /// Critical findings, listed only while not ready
    pub must_fix: Vec<&'a str>,
}

pub fn readiness_tone(score: f64) -> Tone {
    if score >= 80.0 {
        Tone::Green
    } else if score >= 50.0 {
        Tone::Yellow
    } else {
        Tone::Red
    }
}

/// Complement of the risk score, clamped to [0, 100].
///
/// Without any score the service's own readiness estimate is used, then 100.
pub fn readiness_score(response: &ReviewResponse) -> f64 {
    let value = match response.risk() {
        Some(risk) => (100.0 - risk).max(0.0),
        None => response
            .ai_section
            .as_ref()
            .and_then(|ai| ai.interview_readiness)
            .unwrap_or(100.0),
    };
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}

pub fn present(response: Option<&ReviewResponse>) -> Option<InterviewView<'_>> {
    let response = response?;

    let critical = response.issues_by_severity(Severity::Critical);
    let medium_count = response.count_severity(Severity::Medium);
    let is_ready = critical.is_empty();

    let score = readiness_score(response);
    let coverage_ok = response
        .coverage
        .as_ref()
        .is_some_and(|c| c.percent >= COVERAGE_TARGET);

    let checklist = [
        ChecklistItem {
            label: "No critical issues",
            status: if is_ready {
                CheckStatus::Pass
            } else {
                CheckStatus::Fail
            },
        },
        ChecklistItem {
            label: "No medium issues",
            status: if medium_count == 0 {
                CheckStatus::Pass
            } else {
                CheckStatus::Warn
            },
        },
        ChecklistItem {
            label: "Good language coverage",
            status: if coverage_ok {
                CheckStatus::Pass
            } else {
                CheckStatus::Warn
            },
        },
    ];

    let must_fix = if is_ready {
        Vec::new()
    } else {
        critical.into_iter().map(|i| i.message.as_str()).collect()
    };

    Some(InterviewView {
        badge: Badge::new(response.decision),
        is_ready,
        readiness_score: score,
        meter: Meter::new(score, readiness_tone(score)),
        checklist,
        issue_count: response.issues.len(),
        must_fix,
    })
}

impl InterviewView<'_> {
    pub fn status_label(&self) -> &'static str {
        if self.is_ready {
            "Interview Ready ✅"
        } else {
            "Not Ready ❌"
        }
    }

    pub fn to_markdown(&self, bar_width: usize) -> String {
        let mut md = String::new();

        md.push_str("## Interview Readiness\n\n");
        md.push_str(&format!("**Decision:** {}\n\n", self.badge.label()));
        md.push_str(&format!("**Status:** {}\n\n", self.status_label()));
        md.push_str(&format!(
            "**Readiness Score:** {}%\n\n",
            format_score(self.readiness_score)
        ));
        md.push_str(&format!("`{}`\n\n", self.meter.render(bar_width)));

        md.push_str("### Checklist\n\n");
        for item in &self.checklist {
            md.push_str(&format!("- {} {}\n", item.status.icon(), item.label));
        }
        md.push('\n');

        if self.issue_count == 0 {
            md.push_str(NO_ISSUES);
            md.push_str("\n\n");
        }

        if self.is_ready {
            md.push_str(READY_MESSAGE);
            md.push('\n');
        } else {
            md.push_str("### Must Fix Before Interview\n\n");
            for message in &self.must_fix {
                md.push_str(&format!("- ❌ {}\n", message));
            }
        }

        md
    }
}
