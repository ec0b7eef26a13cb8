use crate::config::GateConfig;
use crate::models::{Decision, ReviewResponse};

/// Outcome of the CI quality gate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateOutcome {
    Passed,
    Failed(Decision),
}

impl GateOutcome {
    pub fn is_failure(&self) -> bool {
        matches!(self, GateOutcome::Failed(_))
    }

    /// Process exit code for CI
    pub fn exit_code(&self) -> i32 {
        match self {
            GateOutcome::Passed => 0,
            GateOutcome::Failed(_) => 1,
        }
    }

    pub fn banner(&self) -> String {
        match self {
            GateOutcome::Passed => "✅ Quality Gate PASSED".to_string(),
            GateOutcome::Failed(decision) => format!("❌ Quality Gate FAILED ({})", decision),
        }
    }
}

/// Decides whether a review response fails the gate
#[derive(Debug, Clone)]
pub struct GatePolicy {
    fail_on: Vec<Decision>,
}

impl Default for GatePolicy {
    fn default() -> Self {
        Self::from(&GateConfig::default())
    }
}

impl From<&GateConfig> for GatePolicy {
    fn from(config: &GateConfig) -> Self {
        Self {
            fail_on: config.fail_on.clone(),
        }
    }
}

impl GatePolicy {
    pub fn evaluate(&self, response: &ReviewResponse) -> GateOutcome {
        if self.fail_on.contains(&response.decision) {
            GateOutcome::Failed(response.decision)
        } else {
            GateOutcome::Passed
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_fails_only_on_block() {
        let policy = GatePolicy::default();

        let block = ReviewResponse::new(Decision::Block, 90.0, vec![]);
        let warn = ReviewResponse::new(Decision::Warn, 40.0, vec![]);

        assert_eq!(policy.evaluate(&block), GateOutcome::Failed(Decision::Block));
        assert_eq!(policy.evaluate(&block).exit_code(), 1);
        assert_eq!(policy.evaluate(&warn), GateOutcome::Passed);
        assert_eq!(policy.evaluate(&warn).exit_code(), 0);
    }

    #[test]
    fn test_configured_warn_fails() {
        let policy = GatePolicy::from(&GateConfig {
            fail_on: vec![Decision::Block, Decision::Warn],
        });

        let warn = ReviewResponse::new(Decision::Warn, 40.0, vec![]);
        let outcome = policy.evaluate(&warn);

        assert!(outcome.is_failure());
        assert!(outcome.banner().contains("FAILED (WARN)"));
    }
}
