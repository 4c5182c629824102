//! Energy/resource budget (SPEC_FULL.md §D): the "Energy" ABORT
//! precondition §4.3's recommendation table references but does not
//! define. Tracks per-trace wall-clock and cost budgets alongside the
//! token budget CLM already measures.

use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnergyBudget {
    pub max_wall_clock: Duration,
    pub max_cost_usd: f64,
    started_at: Instant,
    cost_accrued: f64,
}

impl EnergyBudget {
    pub fn new(max_wall_clock: Duration, max_cost_usd: f64) -> Self {
        Self {
            max_wall_clock,
            max_cost_usd,
            started_at: Instant::now(),
            cost_accrued: 0.0,
        }
    }

    pub fn accrue_cost(&mut self, cost_usd: f64) {
        self.cost_accrued += cost_usd;
    }

    pub fn cost_accrued(&self) -> f64 {
        self.cost_accrued
    }

    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }

    /// Whether either the wall-clock or the cost budget has been exhausted —
    /// the precondition `kernel::load`'s `recommend()` consults alongside
    /// its own load aggregate to decide ABORT.
    pub fn energy_exhausted(&self) -> bool {
        self.elapsed() >= self.max_wall_clock || self.cost_accrued >= self.max_cost_usd
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cost_budget_exhaustion_is_detected() {
        let mut budget = EnergyBudget::new(Duration::from_secs(3600), 1.0);
        assert!(!budget.energy_exhausted());
        budget.accrue_cost(1.5);
        assert!(budget.energy_exhausted());
    }

    #[test]
    fn fresh_budget_is_not_exhausted() {
        let budget = EnergyBudget::new(Duration::from_secs(60), 10.0);
        assert!(!budget.energy_exhausted());
    }
}
