use crate::domain::model::ChallengeOutcome;

/// Fractional retry budget for the login loop.
///
/// A flat attempt counter either gives up too early on cheap solver retries
/// or burns too many attempts on corrupt-state crashes, so each challenge
/// outcome charges (or refunds) a different amount. Every refund is strictly
/// smaller than the 1.0 attempt charge, so each loop iteration nets at least
/// +0.25 and the loop always terminates. All increments are multiples of
/// 0.25 and therefore exact in f64.
#[derive(Debug, Clone, Copy)]
pub struct RetryBudget {
    spent: f64,
}

impl RetryBudget {
    pub const CEILING: f64 = 8.0;
    const INITIAL: f64 = -1.0;

    pub fn new() -> Self {
        Self {
            spent: Self::INITIAL,
        }
    }

    pub fn has_remaining(&self) -> bool {
        self.spent < Self::CEILING
    }

    /// Charge one full login cycle.
    pub fn charge_attempt(&mut self) {
        self.spent += 1.0;
    }

    /// Adjust the budget for a non-success challenge outcome.
    pub fn absorb(&mut self, outcome: ChallengeOutcome) {
        match outcome {
            // Callers return before absorbing a success.
            ChallengeOutcome::Success => {}
            ChallengeOutcome::Refresh => self.spent -= 0.5,
            ChallengeOutcome::Backcall => self.spent -= 0.75,
            ChallengeOutcome::Crash => self.spent += 0.5,
        }
    }

    pub fn spent(&self) -> f64 {
        self.spent
    }
}

impl Default for RetryBudget {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_budget_has_remaining() {
        let budget = RetryBudget::new();
        assert!(budget.has_remaining());
        assert_eq!(budget.spent(), -1.0);
    }

    #[test]
    fn test_outcome_weights() {
        let mut budget = RetryBudget::new();
        budget.charge_attempt();
        assert_eq!(budget.spent(), 0.0);
        budget.absorb(ChallengeOutcome::Refresh);
        assert_eq!(budget.spent(), -0.5);
        budget.absorb(ChallengeOutcome::Backcall);
        assert_eq!(budget.spent(), -1.25);
        budget.absorb(ChallengeOutcome::Crash);
        assert_eq!(budget.spent(), -0.75);
    }

    #[test]
    fn test_all_refresh_terminates_in_18_iterations() {
        let mut budget = RetryBudget::new();
        let mut iterations = 0;
        while budget.has_remaining() {
            budget.charge_attempt();
            budget.absorb(ChallengeOutcome::Refresh);
            iterations += 1;
            assert!(iterations <= 100, "budget loop failed to terminate");
        }
        assert_eq!(iterations, 18);
    }

    #[test]
    fn test_all_backcall_terminates_in_36_iterations() {
        let mut budget = RetryBudget::new();
        let mut iterations = 0;
        while budget.has_remaining() {
            budget.charge_attempt();
            budget.absorb(ChallengeOutcome::Backcall);
            iterations += 1;
            assert!(iterations <= 100, "budget loop failed to terminate");
        }
        assert_eq!(iterations, 36);
    }

    #[test]
    fn test_all_crash_terminates_in_6_iterations() {
        let mut budget = RetryBudget::new();
        let mut iterations = 0;
        while budget.has_remaining() {
            budget.charge_attempt();
            budget.absorb(ChallengeOutcome::Crash);
            iterations += 1;
        }
        assert_eq!(iterations, 6);
    }
}
