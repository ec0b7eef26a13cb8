use super::{format_score, push_issue, Badge, Meter, Tone, NO_ISSUES};
use crate::models::{Coverage, Issue, ReviewResponse};

/// Risk bands matching the service's own decision thresholds
pub fn risk_tone(score: f64) -> Tone {
    if score >= 70.0 {
        Tone::Red
    } else if score >= 30.0 {
        Tone::Yellow
    } else {
        Tone::Green
    }
}

/// General code review view
#[derive(Debug, Clone)]
pub struct ReviewView<'a> {
    pub badge: Badge,
    pub risk_score: Option<f64>,
    pub risk_meter: Option<Meter>,
    pub coverage: Option<&'a Coverage>,
    pub summary: Option<&'a str>,
    pub advisory: Option<&'a str>,
    pub issues: &'a [Issue],
}

pub fn present(response: Option<&ReviewResponse>) -> Option<ReviewView<'_>> {
    let response = response?;
    let risk_score = response.risk();

    Some(ReviewView {
        badge: Badge::new(response.decision),
        risk_score,
        risk_meter: risk_score.map(|score| Meter::new(score, risk_tone(score))),
        coverage: response.coverage.as_ref(),
        summary: response.summary.as_deref(),
        advisory: response
            .ai_section
            .as_ref()
            .and_then(|ai| ai.advisory.as_deref()),
        issues: &response.issues,
    })
}

impl ReviewView<'_> {
    pub fn to_markdown(&self, bar_width: usize) -> String {
        let mut md = String::new();

        md.push_str("## Review Result\n\n");
        md.push_str(&format!("**Decision:** {}\n\n", self.badge.label()));

        if let Some(score) = self.risk_score {
            md.push_str(&format!("**Risk Score:** {}\n\n", format_score(score)));
        }
        if let Some(meter) = &self.risk_meter {
            md.push_str(&format!("`{}`\n\n", meter.render(bar_width)));
        }

        if let Some(coverage) = self.coverage {
            md.push_str(&format!(
                "**Coverage:** {}% ({}) - {}\n\n",
                format_score(coverage.percent),
                coverage.level,
                coverage.description
            ));
        }

        if let Some(summary) = self.summary {
            md.push_str(&format!("{}\n\n", summary));
        }

        md.push_str("### Issues\n\n");

        if self.issues.is_empty() {
            md.push_str(NO_ISSUES);
            md.push('\n');
        } else {
            for issue in self.issues {
                push_issue(&mut md, issue, true);
                md.push_str("---\n\n");
            }
        }

        if let Some(advisory) = self.advisory {
            md.push_str(&format!("\n### AI Advisory\n\n{}\n", advisory));
        }

        md
    }
}
