//! Lifecycle submodules (SPEC_FULL.md §D): identity construction, the
//! energy/resource budget, and the interrupt queue that together frame one
//! trace from spawn to its terminal `ObserverPhase`.

pub mod energy;
pub mod identity;
pub mod interrupts;

pub use energy::EnergyBudget;
pub use identity::{assess_capability, construct_identity, enforce_tool_policy, Identity, SpawnRequest};
pub use interrupts::{Interrupt, InterruptKind, InterruptQueue};

use crate::config::KernelConfig;
use std::time::Duration;

/// Everything the orchestrator threads through one trace's lifetime:
/// constructed identity, energy budget, and interrupt queue.
#[derive(Debug, Clone)]
pub struct TraceLifecycle {
    pub identity: Identity,
    pub energy: EnergyBudget,
    pub interrupts: InterruptQueue,
}

impl TraceLifecycle {
    /// Begin a trace's lifecycle from its spawn request (§4.1 step 1).
    pub fn begin(spawn: &SpawnRequest, config: &KernelConfig, max_wall_clock: Duration, max_cost_usd: f64) -> Self {
        Self {
            identity: construct_identity(spawn, config.default_quality_bar()),
            energy: EnergyBudget::new(max_wall_clock, max_cost_usd),
            interrupts: InterruptQueue::new(),
        }
    }
}
