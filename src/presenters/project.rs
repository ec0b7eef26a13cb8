use super::review::risk_tone;
use super::{format_score, push_issue, Badge, Meter, NO_ISSUES};
use crate::models::{Issue, ReviewResponse, RiskBreakdown};

/// Multi-file project view
///
/// Issues are split on the `__project__` path sentinel: every issue lands in
/// exactly one of the two groups, in response order.
#[derive(Debug, Clone)]
pub struct ProjectView<'a> {
    pub badge: Badge,
    pub risk_score: Option<f64>,
    pub risk_meter: Option<Meter>,
    pub risk_breakdown: Option<&'a RiskBreakdown>,
    pub project_issues: Vec<&'a Issue>,
    pub file_issues: Vec<&'a Issue>,
    pub decision_trace: &'a [String],
}

pub fn present(response: Option<&ReviewResponse>) -> Option<ProjectView<'_>> {
    let response = response?;

    let (project_issues, file_issues): (Vec<&Issue>, Vec<&Issue>) = response
        .issues
        .iter()
        .partition(|issue| issue.is_project_scope());

    let risk_score = response.risk();

    Some(ProjectView {
        badge: Badge::new(response.decision),
        risk_score,
        risk_meter: risk_score.map(|score| Meter::new(score, risk_tone(score))),
        risk_breakdown: response.risk_breakdown.as_ref(),
        project_issues,
        file_issues,
        decision_trace: response.decision_trace.as_deref().unwrap_or_default(),
    })
}

impl ProjectView<'_> {
    pub fn issue_count(&self) -> usize {
        self.project_issues.len() + self.file_issues.len()
    }

    pub fn to_markdown(&self, bar_width: usize) -> String {
        let mut md = String::new();

        md.push_str("## Project Review\n\n");

        let risk = self
            .risk_score
            .map(format_score)
            .unwrap_or_else(|| "n/a".to_string());
        md.push_str(&format!(
            "**Decision:** {} | **Risk Score:** {}\n\n",
            self.badge.label(),
            risk
        ));

        if let Some(meter) = &self.risk_meter {
            md.push_str(&format!("`{}`\n\n", meter.render(bar_width)));
        }

        if let Some(breakdown) = self.risk_breakdown {
            md.push_str("### Risk Breakdown\n\n");
            md.push_str("| Component | Score |\n|-----------|-------|\n");
            for (name, value) in [
                ("Static", breakdown.static_risk),
                ("Structural", breakdown.structural_risk),
                ("AI modifier", breakdown.ai_modifier),
            ] {
                if let Some(value) = value {
                    md.push_str(&format!("| {} | {} |\n", name, format_score(value)));
                }
            }
            md.push('\n');
        }

        if self.issue_count() == 0 {
            md.push_str(NO_ISSUES);
            md.push_str("\n\n");
        }

        if !self.project_issues.is_empty() {
            md.push_str("### 📦 Project Issues\n\n");
            for issue in &self.project_issues {
                push_issue(&mut md, issue, false);
            }
        }

        if !self.file_issues.is_empty() {
            md.push_str("### 📄 File Issues\n\n");
            for issue in &self.file_issues {
                push_issue(&mut md, issue, true);
            }
        }

        if !self.decision_trace.is_empty() {
            md.push_str("### Decision Trace\n\n");
            for reason in self.decision_trace {
                md.push_str(&format!("- {}\n", reason));
            }
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Decision, Severity, PROJECT_SCOPE_PATH};
    use crate::presenters::Tone;

    fn mixed_response() -> ReviewResponse {
        let mut response = ReviewResponse::new(
            Decision::Block,
            80.0,
            vec![
                Issue::new(Severity::Critical, "Function 'run' used but not defined")
                    .with_path(PROJECT_SCOPE_PATH),
                Issue::new(Severity::Low, "Debug statement detected").with_path("main.py"),
                Issue::new(Severity::Medium, "Circular import").with_path(PROJECT_SCOPE_PATH),
                Issue::new(Severity::Low, "File is very large"),
            ],
        );
        response.decision_trace =
            Some(vec!["Missing definition: Function 'run' used but not defined".to_string()]);
        response
    }

    #[test]
    fn test_absent_response_renders_nothing() {
        assert!(present(None).is_none());
    }

    #[test]
    fn test_partition_is_exact() {
        let response = mixed_response();
        let view = present(Some(&response)).unwrap();

        assert_eq!(view.project_issues.len(), 2);
        assert_eq!(view.file_issues.len(), 2);
        assert!(view.project_issues.iter().all(|i| i.is_project_scope()));
        assert!(view.file_issues.iter().all(|i| !i.is_project_scope()));
        assert_eq!(view.issue_count(), response.issues.len());
        assert_eq!(view.project_issues[1].message, "Circular import");
    }

    #[test]
    fn test_markdown_groups_and_trace() {
        let response = mixed_response();
        let md = present(Some(&response)).unwrap().to_markdown(20);

        let project_at = md.find("Project Issues").unwrap();
        let file_at = md.find("File Issues").unwrap();
        let circular_at = md.find("Circular import").unwrap();
        let debug_at = md.find("Debug statement detected").unwrap();

        assert!(project_at < circular_at && circular_at < file_at);
        assert!(file_at < debug_at);
        assert!(md.contains("**File:** `main.py`"));
        assert!(!md.contains("`__project__`"));
        assert!(md.contains("### Decision Trace"));
        assert!(md.contains("🔴 BLOCK | **Risk Score:** 80"));
    }

    #[test]
    fn test_pass_without_issues() {
        let response = ReviewResponse::new(Decision::Pass, 5.0, vec![]);
        let view = present(Some(&response)).unwrap();
        assert_eq!(view.badge.tone, Tone::Green);

        let md = view.to_markdown(20);
        assert!(md.contains(NO_ISSUES));
        assert!(!md.contains("Project Issues"));
        assert!(!md.contains("Decision Trace"));
    }

    #[test]
    fn test_risk_bar_is_clamped() {
        let response = ReviewResponse::new(Decision::Block, 90.0, vec![]);
        let md = present(Some(&response)).unwrap().to_markdown(10);
        assert!(md.contains("🔴 [#########-] 90%"));

        let over = ReviewResponse::new(Decision::Block, 130.0, vec![]);
        let view = present(Some(&over)).unwrap();
        assert_eq!(view.risk_meter.unwrap().percent, 100);
        assert!(view.to_markdown(10).contains("[##########] 100%"));
    }

    #[test]
    fn test_no_bar_without_score() {
        let mut response = ReviewResponse::new(Decision::Pass, 0.0, vec![]);
        response.risk_score = None;
        let view = present(Some(&response)).unwrap();

        assert!(view.risk_meter.is_none());
        assert!(view.to_markdown(10).contains("**Risk Score:** n/a"));
    }

    #[test]
    fn test_risk_breakdown_rendered_when_present() {
        let mut response = ReviewResponse::new(Decision::Warn, 0.0, vec![]);
        response.risk_score = None;
        response.final_score = Some(42.0);
        response.risk_breakdown = Some(RiskBreakdown {
            static_risk: Some(30.0),
            structural_risk: Some(10.0),
            ai_modifier: None,
        });

        let md = present(Some(&response)).unwrap().to_markdown(20);
        assert!(md.contains("**Risk Score:** 42"));
        assert!(md.contains("| Static | 30 |"));
        assert!(md.contains("| Structural | 10 |"));
        assert!(!md.contains("AI modifier"));
    }
}
