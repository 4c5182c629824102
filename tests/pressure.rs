//! Pressure-downgrade integration test (spec.md §8 scenario 6): a COMPLEX
//! signal classified under high pressure must select the SIMPLE template
//! (downgrade by 2), and the resulting `ActivationMap` must reflect that
//! downgraded template rather than the original COMPLEX one.

use cognitive_kernel::kernel::activation::{apply_tool_availability, select_pipeline};
use cognitive_kernel::{ComplexityLevel, KernelConfig, ModuleActivation};
use std::collections::HashSet;

#[test]
fn complex_signal_under_high_pressure_downgrades_two_tiers_to_simple() {
    let cfg = KernelConfig::default();
    let pipeline = select_pipeline(ComplexityLevel::Complex, 0.85, &cfg);
    assert_eq!(pipeline.complexity, ComplexityLevel::Simple);

    // The downgraded template carries the SIMPLE module set, not the
    // COMPLEX one (e.g. no `planning` module).
    assert!(!pipeline.active_modules.iter().any(|m| m == "planning"));
    assert!(pipeline.active_modules.iter().any(|m| m == "hallucination"));

    let allowed = HashSet::new();
    let required = HashSet::new();
    let map = apply_tool_availability(&pipeline, &allowed, &required);
    for module in &pipeline.active_modules {
        assert_eq!(map.modules.get(module), Some(&ModuleActivation::Active));
    }
}

#[test]
fn moderate_pressure_downgrades_only_one_tier() {
    let cfg = KernelConfig::default();
    let pipeline = select_pipeline(ComplexityLevel::Critical, 0.65, &cfg);
    assert_eq!(pipeline.complexity, ComplexityLevel::Complex);
}

#[test]
fn downgrade_never_escapes_below_trivial() {
    let cfg = KernelConfig::default();
    let pipeline = select_pipeline(ComplexityLevel::Simple, 0.85, &cfg);
    assert_eq!(pipeline.complexity, ComplexityLevel::Trivial);
}
